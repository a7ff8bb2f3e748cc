use std::hint::black_box;
use std::time::Duration;

use criterion::{criterion_group, criterion_main, Criterion};
use glam::Vec2;
use vitrine::camera::{Camera, Ray, Viewport};
use vitrine::centerpiece::{ParticleField, TorusKnot};
use vitrine::gallery::hover::intersect_meshes;
use vitrine::gallery::{DomRect, ElementKey, MeshRegistry};
use vitrine::util::easing::EasingFunction;
use vitrine::util::tween::Tweened;
use web_time::Instant;

fn easing_benchmark(c: &mut Criterion) {
    let f = EasingFunction::DEFAULT;
    c.bench_function("quadratic_out_easing", |b| {
        b.iter(|| black_box(f.evaluate(black_box(0.5))));
    });
}

fn tween_sample_benchmark(c: &mut Criterion) {
    let start = Instant::now();
    let mut hover = Tweened::new(0.0_f32);
    let mut pointer = Tweened::new(Vec2::ZERO);
    hover.ease_to(1.0, start, Duration::from_millis(300));
    pointer.ease_to(Vec2::ONE, start, Duration::from_millis(300));
    let midway = start + Duration::from_millis(150);

    c.bench_function("tween_sample_midway", |b| {
        b.iter(|| {
            black_box(hover.sample(black_box(midway)));
            black_box(pointer.sample(black_box(midway)));
        });
    });
}

fn torus_knot_benchmark(c: &mut Criterion) {
    let knot = TorusKnot::default();
    c.bench_function("torus_knot_build", |b| {
        b.iter(|| black_box(knot.build()));
    });
}

fn particle_drift_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("particle_drift");
    for count in [1_500, 10_000, 50_000] {
        let mut field = ParticleField::new(count, 10.0, 0.002, 7);
        let mut elapsed = 0.0;
        group.bench_function(format!("{count}_particles"), |b| {
            b.iter(|| {
                elapsed += 1.0 / 60.0;
                field.drift(black_box(elapsed));
            });
        });
    }
    group.finish();
}

fn hover_raycast_benchmark(c: &mut Criterion) {
    let viewport = Viewport::new(1920.0, 1080.0, 1.0);
    let boxes: Vec<Option<DomRect>> = (0..100)
        .map(|i| {
            let col = (i % 5) as f32;
            let row = (i / 5) as f32;
            Some(DomRect::new(col * 380.0, row * 300.0, 320.0, 240.0))
        })
        .collect();
    let registry = MeshRegistry::build(
        (0..boxes.len()).map(ElementKey),
        boxes.as_slice(),
        &viewport,
    );
    let camera = Camera::pixel_perfect(viewport, 20.0);
    let ray = Ray::from_ndc(Vec2::new(0.1, 0.2), camera.build_matrix());

    c.bench_function("hover_raycast_100_planes", |b| {
        b.iter(|| black_box(intersect_meshes(black_box(&ray), registry.meshes())));
    });
}

criterion_group!(
    benches,
    easing_benchmark,
    tween_sample_benchmark,
    torus_knot_benchmark,
    particle_drift_benchmark,
    hover_raycast_benchmark
);
criterion_main!(benches);
