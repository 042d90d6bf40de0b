//! Media playback backends and the single live-player handle.

#[cfg(unix)]
mod mpv;

use std::time::Duration;

use anyhow::Result;
use tracing::debug;

use crate::feed::player::PlayerAdapter;

#[cfg(unix)]
pub use mpv::MpvBackend;

#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    Buffering(bool),
    Position(Duration),
    Ended,
    Error(String),
}

/// Something that can play one media URL at a time.
pub trait MediaBackend {
    fn load(&mut self, url: &str) -> Result<()>;
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self) -> Result<()>;
    fn seek_to_start(&mut self) -> Result<()>;
    fn release(&mut self) -> Result<()>;
    fn poll_events(&mut self) -> Vec<MediaEvent>;
    fn name(&self) -> &'static str;
}

/// Used when playback is disabled or no player is installed. Every call
/// succeeds so the rest of the app behaves the same.
#[derive(Debug, Default)]
pub struct NullBackend;

impl MediaBackend for NullBackend {
    fn load(&mut self, url: &str) -> Result<()> {
        debug!(url, "null backend load");
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        Ok(())
    }

    fn seek_to_start(&mut self) -> Result<()> {
        Ok(())
    }

    fn release(&mut self) -> Result<()> {
        Ok(())
    }

    fn poll_events(&mut self) -> Vec<MediaEvent> {
        Vec::new()
    }

    fn name(&self) -> &'static str {
        "none"
    }
}

/// Picks mpv when enabled and available, falling back to [`NullBackend`].
pub fn backend_for(enabled: bool, mpv_path: &str) -> Box<dyn MediaBackend> {
    if !enabled {
        return Box::new(NullBackend);
    }
    #[cfg(unix)]
    {
        match MpvBackend::launch(mpv_path) {
            Ok(backend) => return Box::new(backend),
            Err(e) => tracing::warn!(error = %e, "video playback disabled"),
        }
    }
    #[cfg(not(unix))]
    let _ = mpv_path;
    Box::new(NullBackend)
}

/// Screens that can own playback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenKey {
    Feed,
    Video(String),
}

/// Holds the one live player. A screen must claim it before driving
/// playback; claiming from another screen tears down the previous owner's
/// playback first.
pub struct ActivePlayer {
    adapter: PlayerAdapter,
    owner: Option<ScreenKey>,
}

impl ActivePlayer {
    pub fn new(backend: Box<dyn MediaBackend>) -> Self {
        Self {
            adapter: PlayerAdapter::new(backend),
            owner: None,
        }
    }

    pub fn claim(&mut self, screen: ScreenKey) -> &mut PlayerAdapter {
        if let Some(owner) = &self.owner
            && *owner != screen
        {
            debug!(from = ?owner, to = ?screen, "player handed over");
            self.adapter.release_now();
        }
        self.owner = Some(screen);
        &mut self.adapter
    }

    /// Releases playback no matter who owns it.
    pub fn clear(&mut self) {
        self.adapter.release_now();
        self.owner = None;
    }

    pub fn owner(&self) -> Option<&ScreenKey> {
        self.owner.as_ref()
    }

    pub fn adapter(&self) -> &PlayerAdapter {
        &self.adapter
    }

    pub fn adapter_mut(&mut self) -> &mut PlayerAdapter {
        &mut self.adapter
    }

    pub fn backend_name(&self) -> &'static str {
        self.adapter.backend_name()
    }
}
