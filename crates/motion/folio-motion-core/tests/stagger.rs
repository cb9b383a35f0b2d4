use approx::assert_relative_eq;
use folio_motion_core::{
    parse_timeline_json, Easing, Property, Stage, StaggerAnimator, StaggerGroup, Surface,
    Timeline, Value,
};

fn skills_stage() -> Stage {
    let fixture = folio_test_fixtures::stages::load("about").expect("about stage");
    let mut stage = Stage::new();
    for el in &fixture.elements {
        match &el.parent {
            Some(parent) => stage.add_child(parent, &el.id),
            None => stage.add(&el.id),
        };
    }
    stage
}

#[test]
fn nth_child_starts_at_n_times_each() {
    let stage = skills_stage();
    let kids = stage.children("about/skills");
    assert_eq!(kids.len(), 6);
    let tl = StaggerAnimator::new("about/skills")
        .animate(Property::Y, Value::px(50.0), Value::px(0.0))
        .each(0.15)
        .into_timeline(&stage)
        .unwrap();
    let step = &tl.steps()[0];
    for (n, (target, start)) in step.child_starts.iter().enumerate() {
        assert_eq!(target, &kids[n]);
        assert_relative_eq!(*start, n as f32 * 0.15, epsilon = 1e-6);
    }
    assert_relative_eq!(tl.duration(), 5.0 * 0.15 + 0.6, epsilon = 1e-5);
}

#[test]
fn children_reveal_in_collection_order() {
    let stage = skills_stage();
    let json = folio_test_fixtures::timelines::json("about-skills").unwrap();
    let tl = Timeline::compile(&parse_timeline_json(&json).unwrap(), &stage).unwrap();
    let starts: Vec<f32> = tl.steps()[0].child_starts.iter().map(|(_, s)| *s).collect();
    assert!(starts.windows(2).all(|w| w[0] < w[1]));

    // Halfway through, earlier children are further along than later ones.
    let mut out = Vec::new();
    let mut tl = tl;
    tl.seek(0.35, &stage, &mut out);
    let opacity = |target: &str| {
        out.iter()
            .find(|c| c.target == target && c.property == Property::Opacity)
            .and_then(|c| c.value.as_f32())
            .unwrap()
    };
    assert!(opacity("about/skill-0") > opacity("about/skill-2"));
    assert_eq!(opacity("about/skill-5"), 0.0);
}

#[test]
fn eased_distribution_keeps_order_and_total_span() {
    let g = StaggerGroup::new(0.1).with_ease(Easing::PowerIn(2));
    let offs = g.offsets(6);
    assert!(offs.windows(2).all(|w| w[0] <= w[1]));
    assert_relative_eq!(offs[5], 0.5, epsilon = 1e-6);
    assert!(offs[1] < 0.1);
}

#[test]
fn empty_container_builds_an_empty_timeline() {
    let stage = Stage::new();
    let tl = StaggerAnimator::new("nowhere")
        .animate(Property::Opacity, Value::num(0.0), Value::num(1.0))
        .into_timeline(&stage)
        .unwrap();
    assert!(tl.channels().is_empty());
    assert_relative_eq!(tl.duration(), 0.6);
}
