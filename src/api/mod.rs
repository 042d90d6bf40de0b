mod client;
mod error;
mod types;

pub use client::{DEFAULT_API_BASE, VideoClient, VideoPage};
pub use error::ApiError;
pub use types::{
    AccessDescriptor, AccessType, Comment, CommentAuthor, Creator, Profile, ProfileTab, SeriesRef,
    User, VideoItem, VideoStats, Wallet,
};
