//! Test data builders and doubles for app and view testing.

use std::sync::Arc;

use anyhow::bail;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::api::{
    AccessDescriptor, Comment, CommentAuthor, Creator, Profile, SeriesRef, User, VideoClient,
    VideoItem, VideoStats,
};
use crate::app::{App, AppContext, Modal, ProfileState, SingleVideo, View};
use crate::deeplink::{DEFAULT_SHARE_BASE, DEFAULT_SHARE_PREFIX};
use crate::media::{ActivePlayer, MediaBackend, MediaEvent};
use crate::session::{Session, SessionStore};
use crate::store::SharedVideoStore;
use crate::theme::{Theme, ThemeVariant, default_for_variant};
use crate::time::fixed_clock;

/// Fixed timestamp for deterministic tests: 2023-11-15 00:00:00 UTC
/// Sample videos are created one day earlier, so they show as "1d ago".
pub const TEST_NOW: i64 = 1700092800;

fn timestamp(secs: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
}

pub struct VideoBuilder {
    id: String,
    name: String,
    description: Option<String>,
    url: String,
    creator: Creator,
    amount: u64,
    stats: VideoStats,
    series: Option<SeriesRef>,
    episode: Option<u32>,
    following: bool,
    access: AccessDescriptor,
    created_at: i64,
}

impl Default for VideoBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl VideoBuilder {
    pub fn new() -> Self {
        Self {
            id: "v1".to_string(),
            name: "Test Video".to_string(),
            description: None,
            url: "https://cdn.example.com/v1.mp4".to_string(),
            creator: Creator {
                id: "c1".to_string(),
                username: "maya".to_string(),
                name: None,
                profile_photo: None,
            },
            amount: 0,
            stats: VideoStats {
                likes: 10,
                shares: 2,
                gifts: 1,
                comments: 3,
            },
            series: None,
            episode: None,
            following: false,
            access: AccessDescriptor::default(),
            created_at: TEST_NOW - 86400,
        }
    }

    pub fn id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn url(mut self, url: &str) -> Self {
        self.url = url.to_string();
        self
    }

    pub fn creator(mut self, id: &str, username: &str) -> Self {
        self.creator.id = id.to_string();
        self.creator.username = username.to_string();
        self
    }

    pub fn amount(mut self, amount: u64) -> Self {
        self.amount = amount;
        self
    }

    pub fn stats(mut self, likes: u64, shares: u64, gifts: u64, comments: u64) -> Self {
        self.stats = VideoStats {
            likes,
            shares,
            gifts,
            comments,
        };
        self
    }

    pub fn series(mut self, series: SeriesRef) -> Self {
        self.series = Some(series);
        self
    }

    pub fn episode(mut self, episode: u32) -> Self {
        self.episode = Some(episode);
        self
    }

    pub fn following(mut self, following: bool) -> Self {
        self.following = following;
        self
    }

    pub fn access(mut self, access: AccessDescriptor) -> Self {
        self.access = access;
        self
    }

    pub fn created_at(mut self, secs: i64) -> Self {
        self.created_at = secs;
        self
    }

    pub fn build(self) -> VideoItem {
        VideoItem {
            id: self.id,
            name: self.name,
            description: self.description,
            video_url: self.url,
            thumbnail_url: None,
            created_by: self.creator,
            amount: self.amount,
            is_monetized: self.amount > 0,
            stats: self.stats,
            series: self.series,
            episode_number: self.episode,
            is_following_creator: self.following,
            access: self.access,
            created_at: timestamp(self.created_at),
        }
    }
}

pub struct CommentBuilder {
    id: String,
    content: String,
    username: String,
    upvotes: u64,
    replies: u64,
    time: i64,
}

impl Default for CommentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl CommentBuilder {
    pub fn new() -> Self {
        Self {
            id: "cm1".to_string(),
            content: "Test comment".to_string(),
            username: "commenter".to_string(),
            upvotes: 0,
            replies: 0,
            time: TEST_NOW - 3600,
        }
    }

    pub fn id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    pub fn content(mut self, content: &str) -> Self {
        self.content = content.to_string();
        self
    }

    pub fn author(mut self, username: &str) -> Self {
        self.username = username.to_string();
        self
    }

    pub fn upvotes(mut self, upvotes: u64) -> Self {
        self.upvotes = upvotes;
        self
    }

    pub fn replies(mut self, replies: u64) -> Self {
        self.replies = replies;
        self
    }

    pub fn time(mut self, secs: i64) -> Self {
        self.time = secs;
        self
    }

    pub fn build(self) -> Comment {
        Comment {
            id: self.id,
            content: self.content,
            user: CommentAuthor {
                username: self.username,
                name: None,
            },
            upvotes: self.upvotes,
            replies: self.replies,
            timestamp: timestamp(self.time),
        }
    }
}

/// Calls made against a [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaCall {
    Load(String),
    Play,
    Pause,
    SeekToStart,
    Release,
}

/// Media backend that records calls and replays queued events. Clones share
/// state, so a test keeps one handle while the player owns another.
#[derive(Clone, Default)]
pub struct RecordingBackend {
    calls: Arc<Mutex<Vec<MediaCall>>>,
    events: Arc<Mutex<Vec<MediaEvent>>>,
    fail_loads: bool,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_loads() -> Self {
        Self {
            fail_loads: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<MediaCall> {
        self.calls.lock().clone()
    }

    pub fn push_event(&self, event: MediaEvent) {
        self.events.lock().push(event);
    }

    fn record(&self, call: MediaCall) {
        self.calls.lock().push(call);
    }
}

impl MediaBackend for RecordingBackend {
    fn load(&mut self, url: &str) -> anyhow::Result<()> {
        self.record(MediaCall::Load(url.to_string()));
        if self.fail_loads {
            bail!("unsupported source");
        }
        Ok(())
    }

    fn play(&mut self) -> anyhow::Result<()> {
        self.record(MediaCall::Play);
        Ok(())
    }

    fn pause(&mut self) -> anyhow::Result<()> {
        self.record(MediaCall::Pause);
        Ok(())
    }

    fn seek_to_start(&mut self) -> anyhow::Result<()> {
        self.record(MediaCall::SeekToStart);
        Ok(())
    }

    fn release(&mut self) -> anyhow::Result<()> {
        self.record(MediaCall::Release);
        Ok(())
    }

    fn poll_events(&mut self) -> Vec<MediaEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

pub fn test_session() -> Session {
    Session {
        token: "test-token".to_string(),
        user: User {
            id: "u1".to_string(),
            username: "viewer".to_string(),
            name: Some("Test Viewer".to_string()),
            email: Some("viewer@example.com".to_string()),
        },
    }
}

pub struct TestAppBuilder {
    videos: Vec<VideoItem>,
    view: View,
    modal: Option<Modal>,
    has_more: bool,
    logged_in: bool,
    base_url: String,
    backend: RecordingBackend,
    theme: Theme,
    viewport_height: Option<u16>,
    debug_visible: bool,
}

impl Default for TestAppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl TestAppBuilder {
    pub fn new() -> Self {
        Self {
            videos: Vec::new(),
            view: View::Feed,
            modal: None,
            has_more: false,
            logged_in: true,
            // Nothing listens here; tests that hit the network pass a mock server.
            base_url: "http://127.0.0.1:9".to_string(),
            backend: RecordingBackend::new(),
            theme: default_for_variant(ThemeVariant::Dark),
            viewport_height: None,
            debug_visible: false,
        }
    }

    pub fn with_videos(mut self, videos: Vec<VideoItem>) -> Self {
        self.videos = videos;
        self
    }

    pub fn view(mut self, view: View) -> Self {
        self.view = view;
        self
    }

    pub fn modal(mut self, modal: Modal) -> Self {
        self.modal = Some(modal);
        self
    }

    pub fn has_more(mut self, has_more: bool) -> Self {
        self.has_more = has_more;
        self
    }

    pub fn logged_out(mut self) -> Self {
        self.logged_in = false;
        self
    }

    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    pub fn backend(mut self, backend: RecordingBackend) -> Self {
        self.backend = backend;
        self
    }

    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn viewport_height(mut self, height: u16) -> Self {
        self.viewport_height = Some(height);
        self
    }

    pub fn debug_visible(mut self) -> Self {
        self.debug_visible = true;
        self
    }

    pub fn build(self) -> App {
        let session = SessionStore::in_memory(self.logged_in.then(test_session));
        let client = VideoClient::new(self.base_url, session).expect("test client");
        // The page size decides whether the loaded page looks like the last one.
        let page_size = if self.has_more {
            self.videos.len().max(1)
        } else {
            self.videos.len() + 1
        };
        let ctx = AppContext {
            client,
            store: SharedVideoStore::new(),
            player: ActivePlayer::new(Box::new(self.backend)),
            page_size: page_size as u32,
            share_base: DEFAULT_SHARE_BASE.to_string(),
            share_prefix: DEFAULT_SHARE_PREFIX.to_string(),
        };

        let mut app = App::new(self.theme, ctx);
        app.clock = fixed_clock(TEST_NOW);
        app.viewport_height = self.viewport_height;
        app.debug.visible = self.debug_visible;

        if !self.videos.is_empty() {
            let returned = self.videos.len();
            app.feed.begin_load(1);
            app.feed.apply_page(1, self.videos, returned);
            app.store.upsert_many(app.feed.items());
        }

        app.view = self.view;
        match &app.view {
            View::Feed => app.activate_current(),
            View::Video { id } => {
                app.single = Some(SingleVideo {
                    id: id.clone(),
                    loading: false,
                    error: None,
                });
                app.tracker.set_focused(false);
                app.activate_current();
            }
            View::Wallet => app.tracker.set_focused(false),
            View::Profile { id } => {
                app.tracker.set_focused(false);
                app.profile = Some(ProfileState::new(id.clone(), page_size as u32));
            }
        }
        app.modal = self.modal;
        app
    }
}

pub fn sample_videos() -> Vec<VideoItem> {
    vec![
        VideoBuilder::new()
            .id("v1")
            .name("Sunrise over the ghats")
            .description("Morning light on the river steps.")
            .url("https://cdn.example.com/v1.mp4")
            .creator("c1", "maya")
            .stats(1200, 45, 12, 30)
            .build(),
        VideoBuilder::new()
            .id("v2")
            .name("Street food tour")
            .url("https://cdn.example.com/v2.mp4")
            .creator("c2", "arjun")
            .stats(87, 3, 0, 5)
            .created_at(TEST_NOW - 7200)
            .build(),
        VideoBuilder::new()
            .id("v3")
            .name("Monsoon timelapse")
            .url("https://cdn.example.com/v3.mp4")
            .creator("c1", "maya")
            .stats(15400, 320, 88, 210)
            .build(),
        VideoBuilder::new()
            .id("v4")
            .name("Learning the sitar, day 30")
            .url("https://cdn.example.com/v4.mp4")
            .creator("c3", "ravi")
            .stats(42, 1, 2, 4)
            .build(),
        VideoBuilder::new()
            .id("v5")
            .name("Night market")
            .url("https://cdn.example.com/v5.mp4")
            .creator("c4", "leela")
            .stats(5, 0, 0, 0)
            .build(),
    ]
}

pub fn sample_comments() -> Vec<Comment> {
    vec![
        CommentBuilder::new()
            .id("cm1")
            .content("This is beautiful, where was it shot?")
            .author("traveller")
            .upvotes(12)
            .build(),
        CommentBuilder::new()
            .id("cm2")
            .content("Varanasi, early morning.")
            .author("maya")
            .upvotes(4)
            .replies(1)
            .time(TEST_NOW - 600)
            .build(),
    ]
}

pub fn sample_profile() -> Profile {
    Profile {
        id: "c1".to_string(),
        username: "maya".to_string(),
        name: Some("Maya Rao".to_string()),
        bio: Some("River towns at first light.".to_string()),
        website: None,
        followers: 1280,
        is_following: false,
        creator_pass_price: 99,
        verified: true,
    }
}
