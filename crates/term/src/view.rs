//! SessionView: maps a `SessionSnapshot` into styled text lines.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{topic_of, SessionSnapshot};
use crate::types::{ContentItem, Feedback, SessionPhase, RESOURCE_MAX};

/// Color role of a line. The renderer maps tones to terminal colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tone {
    #[default]
    Normal,
    Title,
    Accent,
    Good,
    Bad,
    Warn,
    Dim,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub text: String,
    pub tone: Tone,
}

impl Line {
    pub fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }

    pub fn blank() -> Self {
        Self::new(String::new(), Tone::Normal)
    }
}

const BAR_WIDTH: usize = 10;
const MIN_WIDTH: usize = 20;

/// Renders session snapshots at a fixed column width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionView {
    width: usize,
}

impl Default for SessionView {
    fn default() -> Self {
        Self { width: 72 }
    }
}

impl SessionView {
    pub fn new(width: u16) -> Self {
        Self {
            width: usize::from(width).max(MIN_WIDTH),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn render(&self, snap: &SessionSnapshot) -> Vec<Line> {
        let mut out = Vec::with_capacity(32);

        match snap.phase {
            SessionPhase::Shutdown => {
                out.push(Line::blank());
                out.push(Line::new(center("SYSTEM OFFLINE", self.width), Tone::Dim));
                return out;
            }
            SessionPhase::Menu => {
                self.menu(&mut out);
                return out;
            }
            _ => {}
        }

        self.hud(snap, &mut out);
        out.push(Line::new("-".repeat(self.width), Tone::Dim));

        match snap.phase {
            SessionPhase::Playing => self.playing(snap, &mut out),
            SessionPhase::Education => self.education(snap, &mut out),
            SessionPhase::GameOver => self.game_over(snap, &mut out),
            // RankUp has no screen of its own.
            _ => {}
        }
        out
    }

    fn menu(&self, out: &mut Vec<Line>) {
        out.push(Line::blank());
        out.push(Line::new(center("CYBER SHIELD", self.width), Tone::Title));
        out.push(Line::new(center("Hoax detection training", self.width), Tone::Accent));
        out.push(Line::blank());
        for l in wrap(
            "Read each report and decide: verified FACT or HOAX? Right calls build your score and keep you calm. Wrong calls drain the battery.",
            self.width,
        ) {
            out.push(Line::new(l, Tone::Normal));
        }
        out.push(Line::blank());
        out.push(Line::new(center("Press Enter to start", self.width), Tone::Good));
    }

    fn hud(&self, snap: &SessionSnapshot, out: &mut Vec<Line>) {
        let s = &snap.stats;
        let battery_tone = if s.battery <= 20 { Tone::Bad } else { Tone::Normal };
        out.push(Line::new(
            format!(
                "Score {}  Battery {} {:>3}%",
                s.score,
                meter(s.battery),
                s.battery
            ),
            battery_tone,
        ));
        out.push(Line::new(
            format!("Calm  {} {:>3}%  Streak {}", meter(s.calm_index), s.calm_index, s.correct_streak),
            Tone::Normal,
        ));

        let rank = match snap.next_rank {
            Some((next, at)) => format!(
                "Rank: {}  (next: {} at {}, {}%)",
                s.rank.label(),
                next.label(),
                at,
                snap.rank_progress_pct()
            ),
            None => format!("Rank: {}  (max)", s.rank.label()),
        };
        out.push(Line::new(rank, Tone::Accent));
    }

    fn playing(&self, snap: &SessionSnapshot, out: &mut Vec<Line>) {
        if snap.exit_prompt {
            out.push(Line::blank());
            out.push(Line::new("Abort the mission? Progress will be lost.", Tone::Warn));
            out.push(Line::new("[y] leave   [n] stay", Tone::Warn));
            return;
        }

        match &snap.current {
            Some(item) => self.card(item, out),
            None if snap.syncing => {
                out.push(Line::blank());
                out.push(Line::new(center("Syncing new intel...", self.width), Tone::Dim));
            }
            None => {
                out.push(Line::blank());
                out.push(Line::new(center("No reports available", self.width), Tone::Dim));
            }
        }

        match snap.feedback {
            Some(Feedback::Reward { points }) => {
                out.push(Line::blank());
                out.push(Line::new(format!("Correct! +{} pts", points), Tone::Good));
            }
            Some(Feedback::Penalty { battery }) => {
                out.push(Line::blank());
                out.push(Line::new(format!("Wrong call! -{}% battery", battery), Tone::Bad));
            }
            None => {}
        }
    }

    fn card(&self, item: &ContentItem, out: &mut Vec<Line>) {
        out.push(Line::new(truncate(&format!("[{}] {}", item.source, item.url), self.width), Tone::Dim));
        out.push(Line::blank());
        for l in wrap(&item.headline, self.width) {
            out.push(Line::new(l, Tone::Title));
        }
        out.push(Line::blank());
        for l in wrap(&item.content, self.width) {
            out.push(Line::new(l, Tone::Normal));
        }
    }

    fn education(&self, snap: &SessionSnapshot, out: &mut Vec<Line>) {
        out.push(Line::new("ANALYSIS", Tone::Warn));
        let Some(item) = &snap.last_correction else {
            return;
        };

        out.push(Line::new(
            format!("This report is a {}.", item.verdict.as_str()),
            Tone::Bad,
        ));
        if let Some(topic) = topic_of(&item.id) {
            out.push(Line::new(format!("Topic: {}", topic.label()), Tone::Dim));
        }
        out.push(Line::blank());
        for l in wrap(&item.headline, self.width) {
            out.push(Line::new(l, Tone::Accent));
        }
        out.push(Line::blank());
        for l in wrap(&item.explanation, self.width) {
            out.push(Line::new(l, Tone::Normal));
        }
        out.push(Line::blank());
        out.push(Line::new("Indicators:", Tone::Dim));
        for tag in &item.indicators {
            out.push(Line::new(truncate(&format!("  #{}", tag), self.width), Tone::Dim));
        }
    }

    fn game_over(&self, snap: &SessionSnapshot, out: &mut Vec<Line>) {
        out.push(Line::blank());
        out.push(Line::new(center("SYSTEM FAILURE", self.width), Tone::Bad));
        out.push(Line::new(center("Battery depleted", self.width), Tone::Dim));
        out.push(Line::blank());
        out.push(Line::new(
            center(&format!("Final score: {}", snap.stats.score), self.width),
            Tone::Title,
        ));
        out.push(Line::new(
            center(&format!("Rank reached: {}", snap.stats.rank.label()), self.width),
            Tone::Accent,
        ));
    }
}

/// Fixed-width bar for a 0-100 resource.
pub fn meter(value: u8) -> String {
    let filled = usize::from(value.min(RESOURCE_MAX)) * BAR_WIDTH / usize::from(RESOURCE_MAX);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

/// Greedy word wrap. Words longer than `width` are split.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut len = 0usize;

    for word in text.split_whitespace() {
        let mut chars: Vec<char> = word.chars().collect();
        while chars.len() > width {
            if len > 0 {
                lines.push(std::mem::take(&mut line));
                len = 0;
            }
            let rest = chars.split_off(width);
            lines.push(chars.into_iter().collect());
            chars = rest;
        }
        let wlen = chars.len();
        if wlen == 0 {
            continue;
        }
        if len > 0 && len + 1 + wlen > width {
            lines.push(std::mem::take(&mut line));
            len = 0;
        }
        if len > 0 {
            line.push(' ');
            len += 1;
        }
        line.extend(chars);
        len += wlen;
    }
    if len > 0 {
        lines.push(line);
    }
    lines
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut s: String = text.chars().take(width.saturating_sub(3)).collect();
    s.push_str("...");
    s
}

fn center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    let pad = width.saturating_sub(len) / 2;
    format!("{}{}", " ".repeat(pad), text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_respects_width() {
        let lines = wrap("the quick brown fox jumps over the lazy dog", 10);
        assert_eq!(lines, vec!["the quick", "brown fox", "jumps over", "the lazy", "dog"]);
        assert!(lines.iter().all(|l| l.chars().count() <= 10));
    }

    #[test]
    fn test_wrap_splits_long_words() {
        assert_eq!(wrap("abcdefgh ij", 3), vec!["abc", "def", "gh", "ij"]);
        assert!(wrap("   ", 5).is_empty());
    }

    #[test]
    fn test_meter() {
        assert_eq!(meter(100), "[##########]");
        assert_eq!(meter(45), "[####------]");
        assert_eq!(meter(0), "[----------]");
    }

    #[test]
    fn test_truncate_and_center() {
        assert_eq!(truncate("abcdef", 5), "ab...");
        assert_eq!(truncate("abc", 5), "abc");
        assert_eq!(center("ab", 6), "  ab");
    }

    #[test]
    fn test_shutdown_screen() {
        let snap = SessionSnapshot {
            phase: SessionPhase::Shutdown,
            ..SessionSnapshot::default()
        };
        let lines = SessionView::default().render(&snap);
        assert!(lines.iter().any(|l| l.text.contains("SYSTEM OFFLINE")));
        assert!(!lines.iter().any(|l| l.text.contains("Score")));
    }
}
