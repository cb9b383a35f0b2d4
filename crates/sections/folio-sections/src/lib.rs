//! Portfolio page sections built on `folio-motion-core`.
//!
//! Every section owns at most one [`Scope`] while mounted. Mounting twice
//! tears the previous scope down first, and unmounting disposes it, so a
//! fast mount/unmount cycle never leaves timers, triggers or listeners
//! behind.

pub mod about;
pub mod contact;
pub mod error;
pub mod footer;
pub mod hero;
pub mod loading;
pub mod navigation;
pub mod page;
pub mod projects;
mod reveal;

use folio_motion_core::{Config, Outputs, Scope, Surface, TeardownReport, Viewport};

pub use about::AboutSection;
pub use contact::{ContactForm, ContactSection, FormError, SubmitState};
pub use error::{Result, SectionError};
pub use footer::Footer;
pub use hero::HeroSection;
pub use loading::{LoadingPhase, LoadingScreen};
pub use navigation::Navigation;
pub use page::Page;
pub use projects::ProjectsSection;

/// A mountable page section.
pub trait Section {
    fn name(&self) -> &'static str;

    /// Create the section's scope and register its animations.
    fn mount(&mut self, surface: &dyn Surface, config: &Config) -> Result<()>;

    fn scope(&self) -> Option<&Scope>;

    fn scope_mut(&mut self) -> Option<&mut Scope>;

    /// Detach the scope, leaving the section unmounted.
    fn take_scope(&mut self) -> Option<Scope>;

    fn is_mounted(&self) -> bool {
        self.scope().is_some()
    }

    fn update(&mut self, dt_ms: u64, surface: &dyn Surface) {
        if let Some(scope) = self.scope_mut() {
            scope.update(dt_ms, surface);
        }
    }

    fn scroll(&mut self, viewport: Viewport, surface: &dyn Surface) {
        if let Some(scope) = self.scope_mut() {
            scope.scroll(viewport, surface);
        }
    }

    fn take_outputs(&mut self) -> Outputs {
        self.scope_mut().map(Scope::take_outputs).unwrap_or_default()
    }

    /// Dispose the scope. Unmounting an unmounted section is a no-op.
    fn unmount(&mut self) -> TeardownReport {
        match self.take_scope() {
            Some(mut scope) => scope.dispose(),
            None => TeardownReport::default(),
        }
    }
}
