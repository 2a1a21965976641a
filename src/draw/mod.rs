//! Draw module
//!
//! Reel geometry, the settle sequencer and the orchestrator that runs a
//! group-and-question pick across several reels.

pub mod animation;
pub mod baseline;
pub mod orchestrator;
pub mod reel;
pub mod selector;
pub mod sequencer;
pub mod session;

// Re-export commonly used draw types
pub use animation::{AnimationSpec, Easing};
pub use baseline::SharedBaseline;
pub use orchestrator::{PickAction, PickEvent, PickOrchestrator, PickOutcome, PickPhase, ReelSpecs};
pub use reel::{LoopingReel, ReelGeometry, ReelItem, ReelKind, VisibleItem};
pub use selector::RandomIndexSelector;
pub use sequencer::{ReelSequencer, ReelSnapshot, SettleState};
pub use session::{PickSession, PickStage};
