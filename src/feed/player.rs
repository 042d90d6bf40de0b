//! Binds the media backend to whichever feed item is active.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::api::VideoItem;
use crate::feed::access::Gate;
use crate::media::{MediaBackend, MediaEvent};

/// How long a deactivated player lingers before it is torn down.
pub const RELEASE_DELAY: Duration = Duration::from_millis(200);
/// Toggles closer together than this count once.
pub const TOGGLE_DEBOUNCE: Duration = Duration::from_millis(300);
/// How long the play/pause icon stays up after a toggle.
pub const TOGGLE_OVERLAY: Duration = Duration::from_millis(800);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Idle,
    Loading,
    Ready,
    Playing,
    Paused,
    Released,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Played,
    Paused,
    Ignored,
    NeedsAccess,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Play,
    Pause,
    Spinner,
}

pub struct PlayerAdapter {
    backend: Box<dyn MediaBackend>,
    state: PlayerState,
    current: Option<String>,
    buffering: bool,
    position: Duration,
    release_at: Option<Instant>,
    last_toggle: Option<Instant>,
    error: Option<String>,
}

impl PlayerAdapter {
    pub fn new(backend: Box<dyn MediaBackend>) -> Self {
        Self {
            backend,
            state: PlayerState::Idle,
            current: None,
            buffering: false,
            position: Duration::ZERO,
            release_at: None,
            last_toggle: None,
            error: None,
        }
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn current_id(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn position(&self) -> Duration {
        self.position
    }

    pub fn is_buffering(&self) -> bool {
        self.buffering
    }

    pub fn release_pending(&self) -> bool {
        self.release_at.is_some()
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Takes the most recent playback error, if any.
    pub fn take_error(&mut self) -> Option<String> {
        self.error.take()
    }

    /// Loads `item` and plays it when the gate allows.
    pub fn activate(&mut self, item: &VideoItem, gate: &Gate, now: Instant) {
        if let Some(at) = self.release_at
            && now >= at
        {
            self.release_now();
        }
        if self.current.as_deref() == Some(item.id.as_str()) && self.is_live() {
            if self.release_at.take().is_some() {
                debug!(id = %item.id, "release cancelled");
            }
            if gate.is_open() && matches!(self.state, PlayerState::Ready | PlayerState::Paused) {
                self.start();
            }
            return;
        }

        self.current = Some(item.id.clone());
        self.position = Duration::ZERO;
        self.buffering = false;
        self.release_at = None;
        self.last_toggle = None;
        self.state = PlayerState::Loading;
        debug!(id = %item.id, "loading media");

        if let Err(e) = self.backend.load(&item.video_url) {
            warn!(error = %e, id = %item.id, "media load failed");
            self.error = Some(format!("Could not load video: {e}"));
            self.state = PlayerState::Idle;
            return;
        }
        self.state = PlayerState::Ready;
        if gate.is_open() {
            self.start();
        }
    }

    /// Pauses now and schedules the release.
    pub fn deactivate(&mut self, now: Instant) {
        if !self.is_live() {
            return;
        }
        if self.state == PlayerState::Playing {
            self.stop();
        }
        self.release_at = Some(now + RELEASE_DELAY);
    }

    /// Starts playback after access was granted for the current item.
    pub fn play_if_allowed(&mut self, gate: &Gate) {
        if gate.is_open() && matches!(self.state, PlayerState::Ready | PlayerState::Paused) {
            self.start();
        }
    }

    /// Runs due releases and drains backend events.
    pub fn tick(&mut self, now: Instant) {
        if let Some(at) = self.release_at
            && now >= at
        {
            self.release_now();
            return;
        }
        for event in self.backend.poll_events() {
            match event {
                MediaEvent::Buffering(on) => self.buffering = on,
                MediaEvent::Position(pos) => self.position = pos,
                MediaEvent::Ended => {
                    self.position = Duration::ZERO;
                    if self.state == PlayerState::Playing {
                        let looped = self
                            .backend
                            .seek_to_start()
                            .and_then(|_| self.backend.play());
                        if let Err(e) = looped {
                            warn!(error = %e, "restart failed");
                            self.state = PlayerState::Paused;
                        }
                    }
                }
                MediaEvent::Error(msg) => {
                    warn!(error = %msg, "playback error");
                    self.buffering = false;
                    if matches!(
                        self.state,
                        PlayerState::Ready | PlayerState::Playing | PlayerState::Paused
                    ) {
                        self.state = PlayerState::Idle;
                        self.current = None;
                    }
                    self.error = Some(msg);
                }
            }
        }
    }

    pub fn toggle(&mut self, now: Instant, gate: &Gate) -> ToggleOutcome {
        if let Some(last) = self.last_toggle
            && now.saturating_duration_since(last) < TOGGLE_DEBOUNCE
        {
            return ToggleOutcome::Ignored;
        }
        if !matches!(
            self.state,
            PlayerState::Ready | PlayerState::Playing | PlayerState::Paused
        ) {
            return ToggleOutcome::Ignored;
        }
        if !gate.is_open() {
            return ToggleOutcome::NeedsAccess;
        }
        self.last_toggle = Some(now);
        if self.state == PlayerState::Playing {
            self.stop();
            ToggleOutcome::Paused
        } else {
            self.start();
            ToggleOutcome::Played
        }
    }

    pub fn overlay(&self, now: Instant) -> Overlay {
        if let Some(last) = self.last_toggle
            && now.saturating_duration_since(last) < TOGGLE_OVERLAY
        {
            return if self.state == PlayerState::Playing {
                Overlay::Pause
            } else {
                Overlay::Play
            };
        }
        if self.buffering {
            Overlay::Spinner
        } else {
            Overlay::None
        }
    }

    pub fn release_now(&mut self) {
        if self.is_live() || self.state == PlayerState::Loading {
            if let Err(e) = self.backend.release() {
                warn!(error = %e, "media release failed");
            }
            debug!(id = ?self.current, "player released");
            self.state = PlayerState::Released;
        }
        self.current = None;
        self.release_at = None;
        self.buffering = false;
        self.position = Duration::ZERO;
        self.last_toggle = None;
    }

    fn is_live(&self) -> bool {
        matches!(
            self.state,
            PlayerState::Ready | PlayerState::Playing | PlayerState::Paused
        )
    }

    fn start(&mut self) {
        match self.backend.play() {
            Ok(()) => self.state = PlayerState::Playing,
            Err(e) => {
                warn!(error = %e, "play failed");
                self.error = Some(format!("Could not start playback: {e}"));
            }
        }
    }

    fn stop(&mut self) {
        match self.backend.pause() {
            Ok(()) => self.state = PlayerState::Paused,
            Err(e) => warn!(error = %e, "pause failed"),
        }
    }
}
