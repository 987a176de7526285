// Character system
//
// Everything about the single playable entity:
// - Directional clips and the action range parser that builds them
// - The state machine choosing and advancing the visible clip
// - Movement stats and the toroidal movement integrator

pub mod actions;
pub mod animation;
pub mod character;
pub mod state;
pub mod stats;

// Re-export commonly used types
pub use actions::{idle_over_all_frames, parse_actions, ActionParseError};
pub use animation::{ActionTag, AnimationClip, ClipSet, Direction, Motion};
pub use character::Entity;
pub use state::{AnimationStateMachine, PlaybackState};
pub use stats::MovementStats;
