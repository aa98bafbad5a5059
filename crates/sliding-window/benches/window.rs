use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sliding_window::SlidingWindow;

fn push_and_mean(c: &mut Criterion) {
    let mut window = SlidingWindow::with_default_capacity();
    let mut value = 0.0_f64;

    c.bench_function("push_and_mean", |b| {
        b.iter(|| {
            value = (value + 0.013) % 1.0;
            window.push(black_box(value));
            black_box(window.mean())
        })
    });
}

criterion_group!(benches, push_and_mean);
criterion_main!(benches);
