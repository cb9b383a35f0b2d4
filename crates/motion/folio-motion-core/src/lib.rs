//! Folio Motion Core (renderer-agnostic)
//!
//! Declarative timelines, viewport triggers, staggered group reveals, a
//! simulated progress counter and section-scoped lifecycle management.
//! Nothing here touches a renderer: hosts describe their elements through
//! [`Surface`], drive a [`Scope`] with elapsed time and viewport moves, and
//! apply the [`Outputs`] it produces.

pub mod config;
pub mod data;
pub mod error;
pub mod ids;
pub mod interp;
pub mod lifecycle;
pub mod outputs;
pub mod progress;
pub mod sampling;
pub mod scope;
pub mod stagger;
pub mod surface;
pub mod timeline;
pub mod timer;
pub mod trigger;
pub mod value;
pub mod viewport;

// Re-exports for consumers (adapters, sections)
pub use config::{Config, ProgressConfig};
pub use data::{
    parse_timeline_json, Position, PropertyMap, Repeat, SetSpec, StepSpec, TargetRef, TimelineSpec,
};
pub use error::{MotionError, Result};
pub use ids::{ListenerId, ProgressId, TimelineId, TimerId, TriggerId};
pub use interp::Easing;
pub use lifecycle::{HostTeardown, Lifecycle, Teardown, TeardownReport};
pub use outputs::{Change, MotionEvent, Outputs};
pub use progress::{ProgressBar, ProgressPhase, ProgressSimulator, ProgressUpdate, StartOutcome};
pub use scope::Scope;
pub use stagger::{StaggerAnimator, StaggerGroup};
pub use surface::{Bounds, Stage, Surface, TargetHandle};
pub use timeline::{PlayState, ResolvedStep, Tick, Timeline, TimelineBuilder};
pub use timer::{Fired, TimerQueue};
pub use trigger::{Boundary, Edge, ReplayPolicy, Trigger, TriggerAction, TriggerSpec};
pub use value::{Property, Unit, Value, ValueKind};
pub use viewport::{BoundaryKind, Crossing, Direction, ScrollObserver, Viewport};
