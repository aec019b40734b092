//! Content supplier - keeps the queue ahead of the player
//!
//! Replenishment is split into a request and a completion so the external
//! generator call can run on another task while the current card stays on
//! screen:
//!
//! 1. [`ContentSupplier::poll`] hands out a [`ReplenishTicket`] once the buffered
//!    cards drop to the low-water mark. At most one ticket is in flight.
//! 2. [`ContentSupplier::complete`] applies the generator's result. A non-empty
//!    batch is appended; a failure or an empty batch appends a fresh permutation
//!    of the seed catalog instead, so the queue is never left unreplenished.
//!
//! Tickets carry the session generation. A completion that arrives after the
//! session was reset is discarded.

use thiserror::Error;
use tracing::{debug, warn};

use crate::catalog::sample_shuffled;
use crate::queue::ContentQueue;
use crate::rng::SimpleRng;
use crate::types::{ContentItem, RankTier, DEFAULT_LOW_WATER};

/// Why a generator call produced nothing usable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SupplyError {
    #[error("content generator unavailable")]
    Unavailable,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("generator responded with status {0}")]
    Status(u16),

    #[error("malformed generator response: {0}")]
    Malformed(String),

    #[error("generator returned no items")]
    Empty,
}

/// A replenishment request tagged with the session it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReplenishTicket {
    pub generation: u32,
    pub rank: RankTier,
}

/// What a completion did to the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SupplyOutcome {
    /// Generated items appended.
    Generated(usize),
    /// Fallback: a catalog permutation appended.
    Recycled(usize),
    /// Completion belonged to an earlier session; nothing applied.
    Stale,
    /// A request was already in flight; nothing issued.
    Suppressed,
}

#[derive(Debug, Clone)]
pub struct ContentSupplier {
    rng: SimpleRng,
    generation: u32,
    in_flight: Option<ReplenishTicket>,
    low_water: usize,
}

impl ContentSupplier {
    pub fn new(rng: SimpleRng, low_water: usize) -> Self {
        Self {
            rng,
            generation: 0,
            in_flight: None,
            low_water,
        }
    }

    /// Start a new generation: deal a shuffled catalog and forget any request
    /// still in flight.
    pub fn reseed(&mut self, queue: &mut ContentQueue, generation: u32) {
        if let Some(stale) = self.in_flight.take() {
            debug!(
                generation = stale.generation,
                "abandoning in-flight replenishment on reseed"
            );
        }
        self.generation = generation;
        queue.reseed(sample_shuffled(&mut self.rng));
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn in_flight(&self) -> Option<ReplenishTicket> {
        self.in_flight
    }

    pub fn low_water(&self) -> usize {
        self.low_water
    }

    /// Whether a new request should be issued now.
    pub fn needs_replenish(&self, queue: &ContentQueue) -> bool {
        self.in_flight.is_none() && queue.remaining() <= self.low_water
    }

    /// Issue a ticket if the queue is running low and nothing is in flight.
    pub fn poll(&mut self, queue: &ContentQueue, rank: RankTier) -> Option<ReplenishTicket> {
        if !self.needs_replenish(queue) {
            return None;
        }
        Some(self.issue(rank))
    }

    fn issue(&mut self, rank: RankTier) -> ReplenishTicket {
        let ticket = ReplenishTicket {
            generation: self.generation,
            rank,
        };
        self.in_flight = Some(ticket);
        debug!(generation = ticket.generation, rank = rank.as_str(), "replenishment requested");
        ticket
    }

    /// Apply the generator's answer to `ticket`.
    pub fn complete(
        &mut self,
        queue: &mut ContentQueue,
        ticket: ReplenishTicket,
        result: Result<Vec<ContentItem>, SupplyError>,
    ) -> SupplyOutcome {
        if ticket.generation != self.generation {
            debug!(
                ticket = ticket.generation,
                current = self.generation,
                "discarding stale replenishment"
            );
            return SupplyOutcome::Stale;
        }
        self.in_flight = None;

        let batch = result.and_then(|items| {
            let total = items.len();
            let usable: Vec<ContentItem> = items.into_iter().filter(ContentItem::is_complete).collect();
            if usable.len() < total {
                warn!(dropped = total - usable.len(), "generator returned incomplete items");
            }
            if usable.is_empty() {
                Err(SupplyError::Empty)
            } else {
                Ok(usable)
            }
        });

        match batch {
            Ok(items) => {
                let n = queue.append(items);
                debug!(count = n, "appended generated items");
                SupplyOutcome::Generated(n)
            }
            Err(err) => {
                warn!(error = %err, "content generation failed, recycling catalog");
                let n = queue.append(sample_shuffled(&mut self.rng));
                SupplyOutcome::Recycled(n)
            }
        }
    }

    /// Request and complete in one step with a synchronous generator.
    ///
    /// Suppressed while another request is in flight.
    pub fn replenish<F>(&mut self, queue: &mut ContentQueue, rank: RankTier, generate: F) -> SupplyOutcome
    where
        F: FnOnce(RankTier) -> Result<Vec<ContentItem>, SupplyError>,
    {
        if self.in_flight.is_some() {
            return SupplyOutcome::Suppressed;
        }
        let ticket = self.issue(rank);
        let result = generate(rank);
        self.complete(queue, ticket, result)
    }
}

impl Default for ContentSupplier {
    fn default() -> Self {
        Self::new(SimpleRng::default(), DEFAULT_LOW_WATER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::catalog;

    fn generated(n: usize) -> Vec<ContentItem> {
        (0..n)
            .map(|i| {
                let mut item = catalog()[i % 8].clone();
                item.id = format!("gen-{}", i);
                item
            })
            .collect()
    }

    fn seeded() -> (ContentSupplier, ContentQueue) {
        let mut supplier = ContentSupplier::new(SimpleRng::new(5), 3);
        let mut queue = ContentQueue::new();
        supplier.reseed(&mut queue, 1);
        (supplier, queue)
    }

    #[test]
    fn test_reseed_deals_catalog() {
        let (supplier, queue) = seeded();
        assert_eq!(queue.len(), 8);
        assert_eq!(queue.cursor(), 0);
        assert_eq!(supplier.generation(), 1);
        assert!(supplier.in_flight().is_none());
    }

    #[test]
    fn test_poll_waits_for_low_water() {
        let (mut supplier, mut queue) = seeded();
        for _ in 0..4 {
            queue.advance();
        }
        assert_eq!(queue.remaining(), 4);
        assert!(supplier.poll(&queue, RankTier::Novice).is_none());

        queue.advance();
        let ticket = supplier.poll(&queue, RankTier::Junior).unwrap();
        assert_eq!(ticket.generation, 1);
        assert_eq!(ticket.rank, RankTier::Junior);

        // Only one request at a time.
        queue.advance();
        assert!(supplier.poll(&queue, RankTier::Junior).is_none());
    }

    #[test]
    fn test_complete_appends_generated_batch() {
        let (mut supplier, mut queue) = seeded();
        let ticket = ReplenishTicket { generation: 1, rank: RankTier::Novice };
        supplier.in_flight = Some(ticket);
        let out = supplier.complete(&mut queue, ticket, Ok(generated(3)));
        assert_eq!(out, SupplyOutcome::Generated(3));
        assert_eq!(queue.len(), 11);
        assert_eq!(queue.items()[8].id, "gen-0");
        assert!(supplier.in_flight().is_none());
    }

    #[test]
    fn test_failure_recycles_catalog() {
        for err in [
            SupplyError::Unavailable,
            SupplyError::Empty,
            SupplyError::Status(503),
            SupplyError::Transport("reset".to_string()),
        ] {
            let (mut supplier, mut queue) = seeded();
            let out = supplier.replenish(&mut queue, RankTier::Novice, |_| Err(err.clone()));
            assert_eq!(out, SupplyOutcome::Recycled(8));
            assert_eq!(queue.len(), 16);

            let mut tail: Vec<&str> = queue.items()[8..].iter().map(|i| i.id.as_str()).collect();
            tail.sort_unstable();
            let mut ids: Vec<&str> = catalog().iter().map(|i| i.id.as_str()).collect();
            ids.sort_unstable();
            assert_eq!(tail, ids);
        }
    }

    #[test]
    fn test_empty_batch_recycles() {
        let (mut supplier, mut queue) = seeded();
        let out = supplier.replenish(&mut queue, RankTier::Novice, |_| Ok(Vec::new()));
        assert_eq!(out, SupplyOutcome::Recycled(8));
    }

    #[test]
    fn test_incomplete_items_dropped() {
        let (mut supplier, mut queue) = seeded();
        let mut batch = generated(2);
        batch[0].headline.clear();
        let out = supplier.replenish(&mut queue, RankTier::Novice, |_| Ok(batch));
        assert_eq!(out, SupplyOutcome::Generated(1));
        assert_eq!(queue.items()[8].id, "gen-1");

        let mut batch = generated(1);
        batch[0].indicators.clear();
        let out = supplier.replenish(&mut queue, RankTier::Novice, |_| Ok(batch));
        assert_eq!(out, SupplyOutcome::Recycled(8));
    }

    #[test]
    fn test_rank_passed_to_generator() {
        let (mut supplier, mut queue) = seeded();
        let mut seen = None;
        supplier.replenish(&mut queue, RankTier::Expert, |rank| {
            seen = Some(rank);
            Ok(generated(1))
        });
        assert_eq!(seen, Some(RankTier::Expert));
    }

    #[test]
    fn test_replenish_suppressed_while_in_flight() {
        let (mut supplier, mut queue) = seeded();
        for _ in 0..6 {
            queue.advance();
        }
        let ticket = supplier.poll(&queue, RankTier::Novice).unwrap();
        let mut called = false;
        let out = supplier.replenish(&mut queue, RankTier::Novice, |_| {
            called = true;
            Ok(generated(1))
        });
        assert_eq!(out, SupplyOutcome::Suppressed);
        assert!(!called);
        assert_eq!(supplier.in_flight(), Some(ticket));
    }

    #[test]
    fn test_stale_completion_discarded() {
        let (mut supplier, mut queue) = seeded();
        for _ in 0..6 {
            queue.advance();
        }
        let old = supplier.poll(&queue, RankTier::Novice).unwrap();

        supplier.reseed(&mut queue, 2);
        let fresh_len = queue.len();
        for _ in 0..6 {
            queue.advance();
        }
        let current = supplier.poll(&queue, RankTier::Novice).unwrap();
        assert_eq!(current.generation, 2);

        let out = supplier.complete(&mut queue, old, Ok(generated(4)));
        assert_eq!(out, SupplyOutcome::Stale);
        assert_eq!(queue.len(), fresh_len);
        // The current request is still outstanding.
        assert_eq!(supplier.in_flight(), Some(current));
    }
}
