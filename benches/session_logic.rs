use criterion::{black_box, criterion_group, criterion_main, Criterion};
use cyber_shield::core::{
    apply_decision, catalog, derive_rank, Session, SessionConfig, SimpleRng, SupplyError,
};
use cyber_shield::types::{Command, Decision, PlayerStats};

fn bench_tick(c: &mut Criterion) {
    let mut session = Session::new(SessionConfig::seeded(12345));
    session.apply(Command::Start);

    c.bench_function("session_tick_16ms", |b| {
        b.iter(|| {
            session.tick(black_box(16));
        })
    });
}

fn bench_decision(c: &mut Criterion) {
    let stats = PlayerStats::fresh();
    let item = &catalog()[0];

    c.bench_function("apply_decision", |b| {
        b.iter(|| apply_decision(black_box(&stats), black_box(item), Decision::ClassifyFalse))
    });
}

fn bench_derive_rank(c: &mut Criterion) {
    c.bench_function("derive_rank", |b| {
        b.iter(|| {
            for score in (0..7000).step_by(250) {
                black_box(derive_rank(black_box(score)));
            }
        })
    });
}

fn bench_play_round(c: &mut Criterion) {
    let mut rng = SimpleRng::new(7);

    c.bench_function("play_round_with_replenish", |b| {
        b.iter(|| {
            let mut session = Session::new(SessionConfig::seeded(rng.next_u32()));
            session.apply(Command::Start);
            for _ in 0..16 {
                if let Some(ticket) = session.take_replenish_request() {
                    session.complete_replenish(ticket, Err(SupplyError::Unavailable));
                }
                session.apply(Command::Decide(Decision::ClassifyFalse));
                session.tick(500);
                session.apply(Command::Continue);
            }
            black_box(session.snapshot());
        })
    });
}

criterion_group!(
    benches,
    bench_tick,
    bench_decision,
    bench_derive_rank,
    bench_play_round
);
criterion_main!(benches);
