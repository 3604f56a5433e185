use criterion::{black_box, criterion_group, criterion_main, Criterion};
use kube_usage_metrics::aggregate;
use kube_usage_metrics::k8s::{ContainerReading, UsageSample};

fn cluster(pods: usize, namespaces: usize) -> Vec<UsageSample> {
    (0..pods)
        .map(|i| UsageSample {
            namespace: format!("ns-{}", i % namespaces),
            containers: vec![
                ContainerReading::new("125m".parse().unwrap(), "96Mi".parse().unwrap()),
                ContainerReading::new("3500000n".parse().unwrap(), "12Mi".parse().unwrap()),
            ],
        })
        .collect()
}

fn bench_aggregate(c: &mut Criterion) {
    let samples = cluster(10_000, 200);

    c.bench_function("aggregate 10k pods / 200 namespaces", |b| {
        b.iter(|| aggregate(black_box(&samples)))
    });
}

fn bench_parse_quantity(c: &mut Criterion) {
    c.bench_function("parse quantity", |b| {
        b.iter(|| black_box("1536Mi").parse::<kube_usage_metrics::Quantity>())
    });
}

criterion_group!(benches, bench_aggregate, bench_parse_quantity);
criterion_main!(benches);
