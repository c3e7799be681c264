//! # Planner Benchmark

use criterion::{criterion_group, criterion_main, Criterion, black_box};

use fly_lib::{
    plan::{plan, PlanParams, Waypoint},
    seq::{Sequencer, SeqParams, VirtualClock},
    dry_run::DryRunSink,
};

fn plan_benchmark(c: &mut Criterion) {
    // ---- Build a long spiral of waypoints ----

    let waypoints: Vec<Waypoint> = (0..10_000)
        .map(|i| {
            let t = i as f64 * 0.05;
            Waypoint::new(t * t.cos(), t * t.sin(), 0.5 + 0.001 * i as f64, 0.1)
        })
        .collect();

    let params = PlanParams::default();

    c.bench_function("plan::plan", |b| {
        b.iter(|| plan(black_box(waypoints.clone()), &params).unwrap())
    });

    let flight_plan = plan(waypoints[..500].to_vec(), &params).unwrap();

    c.bench_function("Sequencer::execute::dry_run", |b| {
        b.iter(|| {
            let mut seq = Sequencer::new(SeqParams::default()).unwrap();
            seq.execute(&flight_plan, &mut DryRunSink::new(), &mut VirtualClock::new())
                .unwrap()
        })
    });
}

criterion_group!(benches, plan_benchmark);
criterion_main!(benches);
