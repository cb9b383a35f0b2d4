use criterion::{black_box, criterion_group, criterion_main, Criterion};
use folio_motion_core::{
    Easing, Property, Stage, StaggerAnimator, StaggerGroup, StepSpec, TimelineBuilder, Value,
};

fn grid_stage(cards: usize) -> Stage {
    let mut stage = Stage::new();
    for i in 0..cards {
        stage.add_child("grid", &format!("grid/card-{i}"));
    }
    stage
}

fn bench_stagger_seek(c: &mut Criterion) {
    let stage = grid_stage(64);
    let mut tl = StaggerAnimator::new("grid")
        .animate(Property::Opacity, Value::num(0.0), Value::num(1.0))
        .animate(Property::Y, Value::px(50.0), Value::px(0.0))
        .animate(Property::Scale, Value::num(0.8), Value::num(1.0))
        .each(0.05)
        .into_timeline(&stage)
        .expect("compile");
    let duration = tl.duration();
    let mut out = Vec::with_capacity(256);
    let mut t = 0.0f32;
    c.bench_function("stagger_seek_64x3", |b| {
        b.iter(|| {
            out.clear();
            t = (t + 0.016) % duration;
            tl.seek(black_box(t), &stage, &mut out);
            black_box(out.len());
        })
    });
}

fn bench_compile(c: &mut Criterion) {
    let stage = grid_stage(32);
    let builder = TimelineBuilder::new("compile")
        .step(
            StepSpec::new(folio_motion_core::TargetRef::children_of("grid"))
                .animate(Property::X, Value::px(-100.0), Value::px(0.0))
                .duration(1.2)
                .ease(Easing::PowerOut(2)),
        )
        .stagger(
            StepSpec::new(folio_motion_core::TargetRef::children_of("grid"))
                .animate(Property::Opacity, Value::num(0.0), Value::num(1.0))
                .ease(Easing::back_out()),
            StaggerGroup::new(0.1),
        );
    c.bench_function("compile_32_children", |b| {
        b.iter(|| black_box(builder.build(&stage).expect("compile")))
    });
}

criterion_group!(benches, bench_stagger_seek, bench_compile);
criterion_main!(benches);
