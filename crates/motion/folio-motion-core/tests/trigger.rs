use folio_motion_core::{
    Bounds, BoundaryKind, Config, Direction, MotionEvent, PlayState, Property, ReplayPolicy, Scope,
    Stage, StepSpec, TimelineBuilder, TimelineId, TriggerAction, TriggerSpec, Value, Viewport,
};

const VIEW_H: f32 = 800.0;

fn stage() -> Stage {
    let mut s = Stage::new();
    s.add("about").set_bounds("about", Bounds::new(1000.0, 900.0));
    s
}

fn fade(scope: &mut Scope, stage: &Stage) -> TimelineId {
    let tl = TimelineBuilder::new("about-fade")
        .step(
            StepSpec::new("about")
                .animate(Property::Opacity, Value::num(0.0), Value::num(1.0))
                .duration(1.0),
        )
        .build(stage)
        .unwrap();
    scope.add_timeline(tl, stage)
}

fn fired(scope: &mut Scope) -> Vec<TriggerAction> {
    scope
        .take_outputs()
        .events
        .into_iter()
        .filter_map(|e| match e {
            MotionEvent::TriggerFired { action, .. } => Some(action),
            _ => None,
        })
        .collect()
}

#[test]
fn play_reverse_follows_scroll_both_ways() {
    let st = stage();
    let mut scope = Scope::new("about", Config::default());
    let tl = fade(&mut scope, &st);
    let spec: TriggerSpec =
        folio_test_fixtures::triggers::load("about-section").expect("trigger fixture");
    assert_eq!(spec.policy, ReplayPolicy::PlayReverse);
    scope.bind_trigger(spec, tl, &st);

    scope.scroll(Viewport::new(0.0, VIEW_H), &st);
    assert!(fired(&mut scope).is_empty());

    scope.scroll(Viewport::new(500.0, VIEW_H), &st);
    assert_eq!(fired(&mut scope), vec![TriggerAction::Play]);
    scope.update(400, &st);

    scope.scroll(Viewport::new(0.0, VIEW_H), &st);
    assert_eq!(fired(&mut scope), vec![TriggerAction::Reverse]);
    assert_eq!(scope.timeline(tl).map(|t| t.state()), Some(PlayState::Reverse));

    // Forward again resumes from the current playhead.
    scope.update(100, &st);
    let head = scope.timeline(tl).map(|t| t.playhead()).unwrap();
    scope.scroll(Viewport::new(500.0, VIEW_H), &st);
    assert_eq!(fired(&mut scope), vec![TriggerAction::Play]);
    let resumed = scope.timeline(tl).unwrap();
    assert_eq!(resumed.state(), PlayState::Forward);
    assert_eq!(resumed.playhead(), head);
}

#[test]
fn play_once_ignores_later_crossings() {
    let st = stage();
    let mut scope = Scope::new("about", Config::default());
    let tl = fade(&mut scope, &st);
    let trigger = scope.bind_trigger(
        TriggerSpec::new("about").policy(ReplayPolicy::PlayOnce),
        tl,
        &st,
    );
    scope.scroll(Viewport::new(500.0, VIEW_H), &st);
    assert_eq!(fired(&mut scope), vec![TriggerAction::Play]);
    scope.update(2_000, &st);

    for y in [0.0, 500.0, 0.0, 900.0] {
        scope.scroll(Viewport::new(y, VIEW_H), &st);
    }
    assert!(fired(&mut scope).is_empty());
    assert_eq!(
        scope.on_crossing(trigger, BoundaryKind::Start, Direction::Forward, &st),
        TriggerAction::Ignore
    );
    assert_eq!(scope.timeline(tl).map(|t| t.state()), Some(PlayState::Finished));
}

#[test]
fn already_visible_element_fires_on_registration() {
    let st = stage();
    let mut scope = Scope::new("about", Config::default());
    scope.scroll(Viewport::new(2_000.0, VIEW_H), &st);
    let tl = fade(&mut scope, &st);
    scope.take_outputs();
    scope.bind_trigger(TriggerSpec::new("about"), tl, &st);
    assert_eq!(fired(&mut scope), vec![TriggerAction::Play]);
}

#[test]
fn removed_target_makes_trigger_a_no_op() {
    let mut st = stage();
    let mut scope = Scope::new("about", Config::default());
    let tl = fade(&mut scope, &st);
    let trigger = scope.bind_trigger(TriggerSpec::new("about"), tl, &st);
    st.remove("about");
    scope.scroll(Viewport::new(5_000.0, VIEW_H), &st);
    assert_eq!(
        scope.on_crossing(trigger, BoundaryKind::Start, Direction::Forward, &st),
        TriggerAction::Ignore
    );
    assert!(fired(&mut scope).is_empty());
    assert_eq!(scope.timeline(tl).map(|t| t.state()), Some(PlayState::Idle));
}

#[test]
fn end_boundary_crossings_do_nothing() {
    let st = stage();
    let mut scope = Scope::new("about", Config::default());
    let tl = fade(&mut scope, &st);
    let spec: TriggerSpec = folio_test_fixtures::triggers::load("about-section").unwrap();
    scope.bind_trigger(spec, tl, &st);
    scope.scroll(Viewport::new(500.0, VIEW_H), &st);
    assert_eq!(fired(&mut scope), vec![TriggerAction::Play]);
    // bottom (1900) passes 20% of the viewport (160px) once scroll_y >= 1740.
    scope.scroll(Viewport::new(1_800.0, VIEW_H), &st);
    assert!(fired(&mut scope).is_empty());
    scope.scroll(Viewport::new(500.0, VIEW_H), &st);
    assert!(fired(&mut scope).is_empty());
}

#[test]
fn trigger_fixtures_parse() {
    for key in folio_test_fixtures::triggers::keys() {
        let spec: TriggerSpec = folio_test_fixtures::triggers::load(&key)
            .unwrap_or_else(|e| panic!("{key}: {e:#}"));
        assert_eq!(spec.policy, ReplayPolicy::PlayReverse, "{key}");
        assert_eq!(spec.start.map(|b| b.to_string()).as_deref(), Some("top 80%"), "{key}");
    }
}

#[test]
fn scroll_down_then_back_restores_initial_values() {
    let mut st = stage();
    let mut scope = Scope::new("about", Config::default());
    let tl = TimelineBuilder::new("about-reveal")
        .step(
            StepSpec::new("about")
                .animate(Property::Opacity, Value::num(0.0), Value::num(1.0))
                .animate(Property::Y, Value::px(60.0), Value::px(0.0))
                .animate(Property::Blur, Value::px(10.0), Value::px(0.0))
                .duration(1.0),
        )
        .build(&st)
        .unwrap();
    let initial = tl.initial_changes();
    let tl = scope.add_timeline(tl, &st);
    scope.bind_trigger(TriggerSpec::new("about"), tl, &st);
    scope.scroll(Viewport::new(0.0, VIEW_H), &st);

    for settle_ms in [0, 370] {
        scope.scroll(Viewport::new(500.0, VIEW_H), &st);
        scope.update(settle_ms, &st);
        scope.scroll(Viewport::new(0.0, VIEW_H), &st);
        scope.update(2_000, &st);
        let out = scope.take_outputs();
        st.apply(&out);

        assert_eq!(scope.timeline(tl).map(|t| t.state()), Some(PlayState::Idle));
        for change in &initial {
            assert_eq!(
                st.value(&change.target, &change.property),
                Some(change.value),
                "{} after {settle_ms} ms",
                change.property
            );
        }
    }
}
