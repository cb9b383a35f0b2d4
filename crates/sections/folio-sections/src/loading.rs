//! Loading screen.
//!
//! Sequence: logo entrance, then bar and label (staggered, overlapping the
//! logo by 0.4 s). Meanwhile a progress simulator fills the bar. Once it
//! settles at 100 the whole screen fades and shrinks away, and only when
//! that exit finishes does the host callback run, exactly once.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use folio_motion_core::{
    Config, Easing, PlayState, Position, ProgressId, ProgressSimulator, Property, Scope,
    StaggerGroup, StepSpec, Surface, TimelineBuilder, TimelineId, Value,
};
use log::debug;

use crate::error::Result;
use crate::Section;

pub const ROOT: &str = "loading";
pub const LOGO: &str = "loading/logo";
pub const BAR: &str = "loading/bar";
pub const LABEL: &str = "loading/label";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LoadingPhase {
    Unmounted,
    Loading,
    Exiting,
    Complete,
}

fn entrance() -> TimelineBuilder {
    let shown = [(Property::Opacity, Value::num(1.0)), (Property::Y, Value::px(0.0))];
    TimelineBuilder::new("loading-entrance")
        .set(
            &[LOGO, BAR, LABEL][..],
            [(Property::Opacity, Value::num(0.0)), (Property::Y, Value::px(30.0))],
        )
        .to(LOGO, shown.clone(), 0.8, Easing::PowerOut(2), Position::AfterPrevious)
        .stagger(
            {
                let mut step = StepSpec::new(&[BAR, LABEL][..])
                    .duration(0.6)
                    .ease(Easing::PowerOut(2))
                    .at(Position::FromPreviousEnd(-0.4));
                step.to = shown.into_iter().collect();
                step
            },
            StaggerGroup::new(0.1),
        )
}

fn exit() -> TimelineBuilder {
    TimelineBuilder::new("loading-exit").step(
        StepSpec::new(ROOT)
            .animate(Property::Opacity, Value::num(1.0), Value::num(0.0))
            .animate(Property::Scale, Value::num(1.0), Value::num(0.9))
            .duration(1.0)
            .ease(Easing::PowerInOut(2)),
    )
}

pub struct LoadingScreen {
    scope: Option<Scope>,
    progress: Option<ProgressId>,
    exit: Option<TimelineId>,
    settled: Rc<Cell<bool>>,
    on_complete: Option<Box<dyn FnOnce()>>,
    complete: bool,
}

impl fmt::Debug for LoadingScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadingScreen")
            .field("phase", &self.phase())
            .field("progress", &self.progress)
            .field("exit", &self.exit)
            .finish()
    }
}

impl LoadingScreen {
    pub fn new(on_complete: impl FnOnce() + 'static) -> Self {
        Self {
            scope: None,
            progress: None,
            exit: None,
            settled: Rc::new(Cell::new(false)),
            on_complete: Some(Box::new(on_complete)),
            complete: false,
        }
    }

    pub fn phase(&self) -> LoadingPhase {
        if self.complete {
            LoadingPhase::Complete
        } else if self.scope.is_none() {
            LoadingPhase::Unmounted
        } else if self.exit.is_some() {
            LoadingPhase::Exiting
        } else {
            LoadingPhase::Loading
        }
    }

    /// Current simulated progress, 0..=100.
    pub fn progress(&self) -> f32 {
        match (self.scope.as_ref(), self.progress) {
            (Some(scope), Some(id)) => scope.progress(id).map(|p| p.value()).unwrap_or(0.0),
            _ => 0.0,
        }
    }

    /// Progress label as displayed, e.g. `"42%"`.
    pub fn label(&self) -> String {
        format!("{}%", self.progress().round() as u32)
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }
}

impl Section for LoadingScreen {
    fn name(&self) -> &'static str {
        "loading"
    }

    fn mount(&mut self, surface: &dyn Surface, config: &Config) -> Result<()> {
        self.unmount();
        if self.complete {
            return Ok(());
        }
        let mut scope = Scope::new(self.name(), config.clone());
        let tl = entrance().build(surface)?;
        let id = scope.add_timeline(tl, surface);
        scope.play(id);

        let sim = ProgressSimulator::new(&config.progress)?.with_bar(BAR);
        let progress = scope.add_progress(sim);
        self.settled.set(false);
        let settled = self.settled.clone();
        if let Some(p) = scope.progress_mut(progress) {
            p.start(config.progress.interval_ms, move || settled.set(true))?;
        }
        self.progress = Some(progress);
        self.scope = Some(scope);
        Ok(())
    }

    fn update(&mut self, dt_ms: u64, surface: &dyn Surface) {
        let Some(scope) = self.scope.as_mut() else {
            return;
        };
        scope.update(dt_ms, surface);

        if self.exit.is_none() && self.settled.get() {
            match exit().build(surface) {
                Ok(tl) => {
                    let id = scope.add_timeline(tl, surface);
                    scope.play(id);
                    self.exit = Some(id);
                }
                Err(err) => debug!("loading exit not built: {err}"),
            }
        }

        let finished = self
            .exit
            .and_then(|id| scope.timeline(id))
            .is_some_and(|tl| tl.state() == PlayState::Finished);
        if finished {
            if let Some(cb) = self.on_complete.take() {
                debug!("loading screen complete");
                self.complete = true;
                cb();
            }
        }
    }

    fn scope(&self) -> Option<&Scope> {
        self.scope.as_ref()
    }

    fn scope_mut(&mut self) -> Option<&mut Scope> {
        self.scope.as_mut()
    }

    fn take_scope(&mut self) -> Option<Scope> {
        self.progress = None;
        self.exit = None;
        self.scope.take()
    }
}
