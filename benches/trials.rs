use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use stochsim::prelude::*;

fn generate_observations(n: usize) -> Observations {
    let values = (0..n).map(|i| 1.0 + (i as f64 * 0.37).sin()).collect();
    Observations::new(values).unwrap()
}

fn bench_extinction(c: &mut Criterion) {
    let mut group = c.benchmark_group("extinction");

    for &trials in &[100usize, 1000] {
        let sequential = MonteCarloEngine::new(Some(42));
        let parallel = sequential.with_parallel(true);

        group.bench_with_input(BenchmarkId::new("sequential", trials), &trials, |b, &trials| {
            b.iter(|| black_box(extinction_probability(&sequential, 2.0, 10, trials).unwrap()))
        });
        group.bench_with_input(BenchmarkId::new("parallel", trials), &trials, |b, &trials| {
            b.iter(|| black_box(extinction_probability(&parallel, 2.0, 10, trials).unwrap()))
        });
    }

    group.finish();
}

fn bench_markov_chain(c: &mut Criterion) {
    let spec = ProcessSpec::new(TwoStateChain::lake_default(), ChainState::Zero, 1000).unwrap();

    c.bench_function("markov_1000_steps", |b| {
        let mut rng = MonteCarloEngine::trial_rng(42, 0);
        b.iter(|| black_box(run_trial(&spec, &mut rng).unwrap()))
    });
}

fn bench_gibbs(c: &mut Criterion) {
    let mut group = c.benchmark_group("gibbs_300_draws");

    for &n in &[50usize, 5000] {
        let data = generate_observations(n);
        let sampler = GibbsSampler::new(&data, NormalPrior::default()).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(n), &sampler, |b, sampler| {
            let mut rng = MonteCarloEngine::trial_rng(42, 0);
            b.iter(|| {
                black_box(
                    sampler
                        .sample(PosteriorDraw::new(0.5, 4.0), 300, &mut rng)
                        .unwrap(),
                )
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_extinction, bench_markov_chain, bench_gibbs);
criterion_main!(benches);
