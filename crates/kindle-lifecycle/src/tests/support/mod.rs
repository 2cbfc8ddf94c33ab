//! Test harness utilities shared by the unit and behavioural suites.

mod clock;
mod context;
mod reporter;
mod world;

pub use clock::ManualClock;
pub use context::RecordingContext;
pub use reporter::{HealthEvent, RecordingHealthReporter};
pub use world::{TestWorld, world};
