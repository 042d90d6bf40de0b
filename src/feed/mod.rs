//! The vertical video feed: pagination, active-item tracking, playback
//! lifecycle, interactions and access gating.

pub mod access;
pub mod interaction;
pub mod list;
pub mod player;
pub mod visibility;

pub use access::{AccessGate, Gate};
pub use interaction::{Interaction, StatsPatch, compact_count};
pub use list::{FeedList, PageRequest};
pub use player::{Overlay, PlayerAdapter, PlayerState, ToggleOutcome};
pub use visibility::{VisibilityTracker, visible_entries};
