use bat_flight::core::{
    build_transforms, AnimationParams, ControlOverlay, ControlPolygon, DrawCommand, SceneRenderer,
    SceneState, TextureHandle, TextureSlot,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec2;

/// Renderer that only counts calls
#[derive(Default)]
struct NullRenderer {
    quads: usize,
    overlays: usize,
}

impl SceneRenderer for NullRenderer {
    fn draw_quad(&mut self, _command: &DrawCommand) {
        self.quads += 1;
    }

    fn draw_overlay(&mut self, _overlay: &ControlOverlay) {
        self.overlays += 1;
    }
}

fn bench_build_transforms(c: &mut Criterion) {
    let polygon = ControlPolygon::default();
    let params = AnimationParams::default();

    c.bench_function("build_transforms", |b| {
        let mut time = 0.0f64;
        b.iter(|| {
            time += 1.0 / 60.0;
            black_box(build_transforms(black_box(time), &polygon, &params))
        })
    });
}

fn bench_hit_test(c: &mut Criterion) {
    let polygon = ControlPolygon::default();
    let mut group = c.benchmark_group("hit_test");

    for (name, cursor) in [("hit", Vec2::new(-0.7, -0.2)), ("miss", Vec2::ZERO)] {
        group.bench_with_input(BenchmarkId::from_parameter(name), &cursor, |b, &cursor| {
            b.iter(|| black_box(polygon.hit_test(black_box(cursor), 10.0 / 720.0)))
        });
    }

    group.finish();
}

fn bench_scene_draw(c: &mut Criterion) {
    let mut scene = SceneState::default();
    for (i, slot) in TextureSlot::DRAW_ORDER.into_iter().enumerate() {
        scene.textures.set(slot, TextureHandle(i as u32));
    }

    c.bench_function("scene_draw", |b| {
        let mut renderer = NullRenderer::default();
        b.iter(|| black_box(scene.draw(black_box(1.5), &mut renderer)));
        black_box((renderer.quads, renderer.overlays));
    });
}

criterion_group!(benches, bench_build_transforms, bench_hit_test, bench_scene_draw);
criterion_main!(benches);
