//! Scroll-revealed tweens shared by the sections.

use folio_motion_core::{
    Boundary, Easing, Property, ReplayPolicy, Scope, StaggerAnimator, StepSpec, Surface,
    TimelineBuilder, TimelineId, TriggerSpec, Value,
};

use crate::error::Result;

/// `(property, from, to)` triple.
pub(crate) type Tween = (Property, Value, Value);

/// Trigger on `target` crossing `start` (e.g. `"top 80%"`), replaying in
/// reverse when scrolled back.
pub(crate) fn scroll_trigger(target: &str, start: &str, end: Option<&str>) -> Result<TriggerSpec> {
    let mut spec = TriggerSpec::new(target)
        .start(start.parse::<Boundary>()?)
        .policy(ReplayPolicy::PlayReverse);
    if let Some(end) = end {
        spec = spec.end(end.parse::<Boundary>()?);
    }
    Ok(spec)
}

/// One from/to tween on `target`, played when `trigger` fires.
pub(crate) fn reveal(
    scope: &mut Scope,
    surface: &dyn Surface,
    target: &str,
    tweens: &[Tween],
    duration: f32,
    ease: Easing,
    trigger: TriggerSpec,
) -> Result<TimelineId> {
    let mut step = StepSpec::new(target).duration(duration).ease(ease);
    for (property, from, to) in tweens {
        step = step.animate(property.clone(), *from, *to);
    }
    let name = format!("{}:{}", scope.name(), target);
    let timeline = TimelineBuilder::new(&name).step(step).build(surface)?;
    let id = scope.add_timeline(timeline, surface);
    scope.bind_trigger(trigger, id, surface);
    Ok(id)
}

/// Staggered reveal of every child of `container`.
pub(crate) fn reveal_children(
    scope: &mut Scope,
    surface: &dyn Surface,
    container: &str,
    tweens: &[Tween],
    duration: f32,
    each: f32,
    ease: Easing,
    trigger: TriggerSpec,
) -> Result<TimelineId> {
    let mut animator = StaggerAnimator::new(container)
        .duration(duration)
        .each(each)
        .ease(ease);
    for (property, from, to) in tweens {
        animator = animator.animate(property.clone(), *from, *to);
    }
    let timeline = animator.into_timeline(surface)?;
    let id = scope.add_timeline(timeline, surface);
    scope.bind_trigger(trigger, id, surface);
    Ok(id)
}
