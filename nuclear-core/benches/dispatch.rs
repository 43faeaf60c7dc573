use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use nuclear_core::reactive::{DataStore, Reactor};

struct Camera(u64);
struct Motor(u64);

fn notify_fan_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("notify");

    for subscribers in [1usize, 16, 256] {
        let store = Arc::new(DataStore::new());
        store.publish(Camera(1));
        store.publish(Motor(2));
        let reactor = Reactor::new(Arc::clone(&store));

        let sink = Arc::new(AtomicU64::new(0));
        for _ in 0..subscribers {
            let sink = Arc::clone(&sink);
            reactor
                .on::<(Camera,), (Motor,), _>(move |camera: &Camera, motor: &Motor| {
                    sink.fetch_add(camera.0 + motor.0, Ordering::Relaxed);
                })
                .expect("non-empty trigger set");
        }

        group.bench_with_input(
            BenchmarkId::from_parameter(subscribers),
            &reactor,
            |b, reactor| b.iter(|| black_box(reactor.notify::<Camera>())),
        );
    }

    group.finish();
}

fn publish_read(c: &mut Criterion) {
    let store = DataStore::new();
    c.bench_function("publish_read", |b| {
        b.iter(|| {
            store.publish(Camera(black_box(7)));
            black_box(store.read::<Camera>().map(|camera| camera.0))
        })
    });
}

criterion_group!(benches, notify_fan_out, publish_read);
criterion_main!(benches);
