//! Projects: title reveal and staggered project cards.

use folio_motion_core::{Config, Easing, Property, Scope, Surface, TimelineId, Value};

use crate::error::Result;
use crate::reveal::{reveal, reveal_children, scroll_trigger};
use crate::Section;

pub const TITLE: &str = "projects/title";
pub const GRID: &str = "projects/grid";

/// Seconds between consecutive cards.
pub const CARD_STAGGER: f32 = 0.15;

#[derive(Debug, Default)]
pub struct ProjectsSection {
    scope: Option<Scope>,
    title: Option<TimelineId>,
    cards: Option<TimelineId>,
}

impl ProjectsSection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(&self) -> Option<TimelineId> {
        self.title
    }

    pub fn cards(&self) -> Option<TimelineId> {
        self.cards
    }
}

impl Section for ProjectsSection {
    fn name(&self) -> &'static str {
        "projects"
    }

    fn mount(&mut self, surface: &dyn Surface, config: &Config) -> Result<()> {
        self.unmount();
        let mut scope = Scope::new(self.name(), config.clone());

        let title = reveal(
            &mut scope,
            surface,
            TITLE,
            &[
                (Property::Opacity, Value::num(0.0), Value::num(1.0)),
                (Property::Y, Value::px(50.0), Value::px(0.0)),
                (Property::Blur, Value::px(10.0), Value::px(0.0)),
            ],
            1.0,
            Easing::default(),
            scroll_trigger(TITLE, "top 85%", None)?,
        )?;
        let cards = reveal_children(
            &mut scope,
            surface,
            GRID,
            &[
                (Property::Opacity, Value::num(0.0), Value::num(1.0)),
                (Property::Y, Value::px(80.0), Value::px(0.0)),
                (Property::Scale, Value::num(0.8), Value::num(1.0)),
            ],
            0.8,
            CARD_STAGGER,
            Easing::back_out(),
            scroll_trigger(GRID, "top 80%", None)?,
        )?;

        self.title = Some(title);
        self.cards = Some(cards);
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
        self.title = None;
        self.cards = None;
        self.scope.take()
    }
}
