//! About: section fade, image and content slides, staggered skill badges.
//! Every reveal replays in reverse when scrolled back above its trigger.

use folio_motion_core::{Config, Easing, Property, Scope, Surface, TimelineId, Value};

use crate::error::Result;
use crate::reveal::{reveal, reveal_children, scroll_trigger};
use crate::Section;

pub const SECTION: &str = "about";
pub const IMAGE: &str = "about/image";
pub const CONTENT: &str = "about/content";
pub const SKILLS: &str = "about/skills";

#[derive(Debug, Default)]
pub struct AboutSection {
    scope: Option<Scope>,
    reveals: Vec<TimelineId>,
}

impl AboutSection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Section fade, image, content, skills, in that order.
    pub fn reveals(&self) -> &[TimelineId] {
        &self.reveals
    }
}

impl Section for AboutSection {
    fn name(&self) -> &'static str {
        "about"
    }

    fn mount(&mut self, surface: &dyn Surface, config: &Config) -> Result<()> {
        self.unmount();
        let mut scope = Scope::new(self.name(), config.clone());
        let slide = Easing::PowerOut(2);

        let fade = reveal(
            &mut scope,
            surface,
            SECTION,
            &[
                (Property::Opacity, Value::num(0.0), Value::num(1.0)),
                (Property::Blur, Value::px(10.0), Value::px(0.0)),
            ],
            1.0,
            Easing::default(),
            scroll_trigger(SECTION, "top 80%", Some("bottom 20%"))?,
        )?;
        let image = reveal(
            &mut scope,
            surface,
            IMAGE,
            &[
                (Property::X, Value::px(-100.0), Value::px(0.0)),
                (Property::Opacity, Value::num(0.0), Value::num(1.0)),
                (Property::RotateY, Value::deg(-15.0), Value::deg(0.0)),
            ],
            1.2,
            slide,
            scroll_trigger(IMAGE, "top 80%", None)?,
        )?;
        let content = reveal(
            &mut scope,
            surface,
            CONTENT,
            &[
                (Property::X, Value::px(100.0), Value::px(0.0)),
                (Property::Opacity, Value::num(0.0), Value::num(1.0)),
            ],
            1.2,
            slide,
            scroll_trigger(CONTENT, "top 80%", None)?,
        )?;
        let skills = reveal_children(
            &mut scope,
            surface,
            SKILLS,
            &[
                (Property::Y, Value::px(50.0), Value::px(0.0)),
                (Property::Opacity, Value::num(0.0), Value::num(1.0)),
                (Property::Scale, Value::num(0.8), Value::num(1.0)),
            ],
            0.6,
            0.1,
            Easing::back_out(),
            scroll_trigger(SKILLS, "top 85%", None)?,
        )?;

        self.reveals = vec![fade, image, content, skills];
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
        self.reveals.clear();
        self.scope.take()
    }
}
