//! Criterion benchmarks for self play throughput
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use matrix_cfr::{running_average, MatrixGame, PlayerNum, Record, SelfPlay, Strategy};

fn benchmark_rps_self_play(c: &mut Criterion) {
    let game = MatrixGame::rps();
    c.bench_function("rps_1000_iterations", |b| {
        b.iter(|| {
            let mut play = SelfPlay::new(
                &game,
                Strategy::pure(3, 0),
                Strategy::pure(3, 0),
                Record::Neither,
            )
            .unwrap();
            play.run(1000);
            black_box(play.average(PlayerNum::One))
        })
    });
}

fn benchmark_cyclic_self_play(c: &mut Criterion) {
    let game = MatrixGame::cyclic(101);
    c.bench_function("cyclic_101_1000_iterations", |b| {
        b.iter(|| {
            let mut play = SelfPlay::new(
                &game,
                Strategy::pure(101, 0),
                Strategy::pure(101, 0),
                Record::Neither,
            )
            .unwrap();
            play.run(1000);
            black_box(play.average(PlayerNum::Two))
        })
    });
}

fn benchmark_running_average(c: &mut Criterion) {
    let game = MatrixGame::rps();
    let mut play = SelfPlay::new(
        &game,
        Strategy::pure(3, 0),
        Strategy::pure(3, 0),
        Record::One,
    )
    .unwrap();
    play.run(1000);
    let history = play.history(PlayerNum::One);
    c.bench_function("running_average_1000", |b| {
        b.iter(|| black_box(running_average(black_box(history))))
    });
}

criterion_group!(
    benches,
    benchmark_rps_self_play,
    benchmark_cyclic_self_play,
    benchmark_running_average,
);
criterion_main!(benches);
