pub mod card;
pub mod comments;
pub mod common;
pub mod debug;
pub mod feed;
pub mod help_overlay;
pub mod modal;
pub mod profile;
pub mod spinner;
pub mod status_bar;
pub mod video;
pub mod wallet;

#[cfg(test)]
pub mod tests;
