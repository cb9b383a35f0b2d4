//! Footer: slide-up reveal and drifting background particles.

use folio_motion_core::{
    Config, Easing, Property, Scope, StepSpec, Surface, TimelineBuilder, TimelineId, Value,
};

use crate::error::Result;
use crate::reveal::{reveal, scroll_trigger};
use crate::Section;

pub const FOOTER: &str = "footer";
pub const PARTICLES: &str = "footer/particles";

/// Start offset between consecutive particles, in seconds.
pub const PARTICLE_STAGGER: f32 = 0.5;

#[derive(Debug, Default)]
pub struct Footer {
    scope: Option<Scope>,
    reveal: Option<TimelineId>,
    particles: Vec<TimelineId>,
}

impl Footer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reveal(&self) -> Option<TimelineId> {
        self.reveal
    }

    pub fn particles(&self) -> &[TimelineId] {
        &self.particles
    }
}

impl Section for Footer {
    fn name(&self) -> &'static str {
        "footer"
    }

    fn mount(&mut self, surface: &dyn Surface, config: &Config) -> Result<()> {
        self.unmount();
        let mut scope = Scope::new(self.name(), config.clone());
        let id = reveal(
            &mut scope,
            surface,
            FOOTER,
            &[
                (Property::Opacity, Value::num(0.0), Value::num(1.0)),
                (Property::Y, Value::px(60.0), Value::px(0.0)),
                (Property::Blur, Value::px(10.0), Value::px(0.0)),
            ],
            1.0,
            Easing::PowerOut(2),
            scroll_trigger(FOOTER, "top 85%", None)?,
        )?;
        self.reveal = Some(id);

        // Each particle loops on its own clock, offset by its index.
        self.particles.clear();
        for (n, particle) in surface.children(PARTICLES).iter().enumerate() {
            let tl = TimelineBuilder::new(particle)
                .delay(n as f32 * PARTICLE_STAGGER)
                .repeat_forever()
                .yoyo(true)
                .step(
                    StepSpec::new(particle.as_str())
                        .animate(Property::Y, Value::px(0.0), Value::px(-20.0))
                        .duration(3.0)
                        .ease(Easing::PowerInOut(1)),
                )
                .build(surface)?;
            let id = scope.add_timeline(tl, surface);
            scope.play(id);
            self.particles.push(id);
        }
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
        self.reveal = None;
        self.particles.clear();
        self.scope.take()
    }
}
