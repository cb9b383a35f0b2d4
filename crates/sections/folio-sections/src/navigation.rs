//! Navigation bar: scrolled-state toggle and the slide-in mobile menu.

use folio_motion_core::{
    Config, Easing, ListenerId, Position, Property, Scope, Surface, TimelineBuilder, TimelineId,
    Value, Viewport,
};

use crate::error::{Result, SectionError};
use crate::Section;

pub const MENU: &str = "nav/menu";

/// Scroll offset past which the bar switches to its solid style.
pub const SCROLLED_AFTER: f32 = 50.0;

#[derive(Debug, Default)]
pub struct Navigation {
    scope: Option<Scope>,
    listener: Option<ListenerId>,
    scrolled: bool,
    open: bool,
    menu: Option<TimelineId>,
}

impl Navigation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_scrolled(&self) -> bool {
        self.scrolled
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn menu_timeline(&self) -> Option<TimelineId> {
        self.menu
    }

    /// Open or close the mobile menu. Opening slides it in from the right.
    pub fn toggle_menu(&mut self, surface: &dyn Surface) -> Result<bool> {
        let scope = self
            .scope
            .as_mut()
            .ok_or(SectionError::NotMounted("navigation"))?;
        if let Some(prev) = self.menu.take() {
            scope.kill_timeline(prev);
        }
        self.open = !self.open;
        if self.open {
            let tl = TimelineBuilder::new("nav-menu")
                .from_to(
                    MENU,
                    [
                        (Property::X, Value::percent(100.0)),
                        (Property::Opacity, Value::num(0.0)),
                    ],
                    [
                        (Property::X, Value::percent(0.0)),
                        (Property::Opacity, Value::num(1.0)),
                    ],
                    0.4,
                    Easing::PowerOut(2),
                    Position::AfterPrevious,
                )
                .build(surface)?;
            let id = scope.add_timeline(tl, surface);
            scope.play(id);
            self.menu = Some(id);
        }
        Ok(self.open)
    }

    /// Document offset to scroll to for `section`; always closes the menu.
    pub fn scroll_to_section(&mut self, section: &str, surface: &dyn Surface) -> Option<f32> {
        if self.open {
            self.open = false;
            if let (Some(scope), Some(menu)) = (self.scope.as_mut(), self.menu.take()) {
                scope.kill_timeline(menu);
            }
        }
        surface.bounds(section).map(|b| b.top)
    }
}

impl Section for Navigation {
    fn name(&self) -> &'static str {
        "navigation"
    }

    fn mount(&mut self, _surface: &dyn Surface, config: &Config) -> Result<()> {
        self.unmount();
        let mut scope = Scope::new(self.name(), config.clone());
        self.listener = Some(scope.listen("scroll"));
        self.scope = Some(scope);
        Ok(())
    }

    fn scroll(&mut self, viewport: Viewport, surface: &dyn Surface) {
        let Some(scope) = self.scope.as_mut() else {
            return;
        };
        if self.listener.is_some_and(|id| scope.is_listening(id)) {
            self.scrolled = viewport.scroll_y > SCROLLED_AFTER;
        }
        scope.scroll(viewport, surface);
    }

    fn scope(&self) -> Option<&Scope> {
        self.scope.as_ref()
    }

    fn scope_mut(&mut self) -> Option<&mut Scope> {
        self.scope.as_mut()
    }

    fn take_scope(&mut self) -> Option<Scope> {
        self.listener = None;
        self.menu = None;
        self.open = false;
        self.scope.take()
    }
}
