//! Hero: delayed entrance sequence plus three endlessly floating glow orbs.

use folio_motion_core::{
    Config, Easing, Position, Property, Scope, StepSpec, Surface, TimelineBuilder, TimelineId,
    Value,
};
use log::debug;

use crate::error::Result;
use crate::Section;

pub const HEADLINE: &str = "hero/headline";
pub const SUBTITLE: &str = "hero/subtitle";
pub const CTA: &str = "hero/cta";
pub const SPLINE: &str = "hero/spline";
pub const ORBS: [&str; 3] = ["hero/orb-1", "hero/orb-2", "hero/orb-3"];

fn entrance() -> TimelineBuilder {
    let hidden = [
        (Property::Opacity, Value::num(0.0)),
        (Property::Y, Value::px(50.0)),
        (Property::Blur, Value::px(10.0)),
    ];
    let shown = [
        (Property::Opacity, Value::num(1.0)),
        (Property::Y, Value::px(0.0)),
        (Property::Blur, Value::px(0.0)),
    ];
    let ease = Easing::PowerOut(2);
    TimelineBuilder::new("hero-entrance")
        .delay(0.5)
        .set(&[HEADLINE, SUBTITLE, CTA][..], hidden)
        .set(
            SPLINE,
            [
                (Property::Opacity, Value::num(0.0)),
                (Property::X, Value::px(100.0)),
                (Property::Blur, Value::px(5.0)),
            ],
        )
        .to(HEADLINE, shown.clone(), 1.2, ease, Position::AfterPrevious)
        .to(SUBTITLE, shown.clone(), 0.8, ease, Position::FromPreviousEnd(-0.6))
        .to(CTA, shown, 0.8, ease, Position::FromPreviousEnd(-0.4))
        .to(
            SPLINE,
            [
                (Property::Opacity, Value::num(1.0)),
                (Property::X, Value::px(0.0)),
                (Property::Blur, Value::px(0.0)),
            ],
            1.0,
            ease,
            Position::FromPreviousEnd(-0.8),
        )
}

/// `(dx, dy, duration, delay)` per orb.
const ORB_DRIFT: [(f32, f32, f32, f32); 3] = [
    (0.0, -20.0, 4.0, 0.0),
    (-15.0, 20.0, 5.0, 1.0),
    (25.0, -15.0, 6.0, 2.0),
];

fn orb(target: &str, (dx, dy, duration, delay): (f32, f32, f32, f32)) -> TimelineBuilder {
    let mut step = StepSpec::new(target)
        .animate(Property::Y, Value::px(0.0), Value::px(dy))
        .duration(duration)
        .ease(Easing::PowerInOut(1));
    if dx != 0.0 {
        step = step.animate(Property::X, Value::px(0.0), Value::px(dx));
    }
    TimelineBuilder::new(target)
        .delay(delay)
        .repeat_forever()
        .yoyo(true)
        .step(step)
}

#[derive(Debug, Default)]
pub struct HeroSection {
    scope: Option<Scope>,
    entrance: Option<TimelineId>,
    orbs: Vec<TimelineId>,
}

impl HeroSection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entrance(&self) -> Option<TimelineId> {
        self.entrance
    }

    pub fn orbs(&self) -> &[TimelineId] {
        &self.orbs
    }
}

impl Section for HeroSection {
    fn name(&self) -> &'static str {
        "hero"
    }

    fn mount(&mut self, surface: &dyn Surface, config: &Config) -> Result<()> {
        self.unmount();
        let mut scope = Scope::new(self.name(), config.clone());

        let tl = entrance().build(surface)?;
        let id = scope.add_timeline(tl, surface);
        scope.play(id);
        self.entrance = Some(id);

        self.orbs.clear();
        for (target, drift) in ORBS.iter().zip(ORB_DRIFT) {
            let tl = orb(target, drift).build(surface)?;
            let id = scope.add_timeline(tl, surface);
            scope.play(id);
            self.orbs.push(id);
        }
        debug!("hero mounted with {} orbs", self.orbs.len());
        self.scope = Some(scope);
        Ok(())
    }

    fn scope(&self) -> Option<&Scope> {
        self.scope.as_ref()
    }

    fn scope_mut(&mut self) -> Option<&mut Scope> {
        self.scope.as_mut()
    }

    fn take_scope(&mut self) -> Option<Scope> {
        self.entrance = None;
        self.orbs.clear();
        self.scope.take()
    }
}
