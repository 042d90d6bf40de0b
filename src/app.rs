use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::api::{ApiError, Comment, Profile, ProfileTab, VideoClient, VideoItem, VideoPage, Wallet};
use crate::deeplink::{self, Route};
use crate::feed::{
    AccessGate, FeedList, Gate, Interaction, PageRequest, StatsPatch, ToggleOutcome,
    VisibilityTracker, visible_entries,
};
use crate::media::{ActivePlayer, ScreenKey};
use crate::store::SharedVideoStore;
use crate::theme::Theme;
use crate::time::Clock;
use crate::wallet;

/// Rows taken by chrome around the feed (the status bar).
const LAYOUT_OVERHEAD: u16 = 1;
const DEFAULT_ITEM_HEIGHT: usize = 20;
/// Mouse scrolling settles on the nearest item after this long without input.
const SNAP_DELAY: Duration = Duration::from_millis(250);
const FLASH_DURATION: Duration = Duration::from_secs(3);
const MAX_GIFT_DIGITS: usize = 9;

pub enum AsyncResult {
    Page {
        generation: u64,
        task_id: u64,
        page: u32,
        result: Result<VideoPage, ApiError>,
    },
    Video {
        task_id: u64,
        id: String,
        result: Result<VideoItem, ApiError>,
    },
    Interaction {
        task_id: u64,
        video_id: String,
        interaction: Interaction,
        result: Result<StatsPatch, ApiError>,
    },
    Comments {
        task_id: u64,
        video_id: String,
        result: Result<Vec<Comment>, ApiError>,
    },
    Wallet {
        task_id: u64,
        result: Result<Wallet, ApiError>,
    },
    Purchase {
        task_id: u64,
        gate: Gate,
        result: Result<bool, ApiError>,
    },
    Follow {
        task_id: u64,
        creator_id: String,
        creator_name: String,
        result: Result<bool, ApiError>,
    },
    Profile {
        task_id: u64,
        user_id: String,
        result: Result<Profile, ApiError>,
    },
    ProfileVideos {
        task_id: u64,
        user_id: String,
        tab: ProfileTab,
        generation: u64,
        page: u32,
        result: Result<VideoPage, ApiError>,
    },
    CommentGift {
        task_id: u64,
        author: String,
        amount: u64,
        result: Result<(), ApiError>,
    },
}

#[derive(Debug)]
pub struct TaskInfo {
    pub id: u64,
    pub description: String,
    pub started_at: Instant,
}

#[derive(Debug)]
pub struct LogEntry {
    pub message: String,
}

/// Debug panel state: task tracking and log messages.
#[derive(Debug, Default)]
pub struct DebugState {
    pub visible: bool,
    pub running_tasks: Vec<TaskInfo>,
    pub log: VecDeque<LogEntry>,
    next_task_id: u64,
}

impl DebugState {
    const MAX_LOG_ENTRIES: usize = 50;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&mut self, msg: impl Into<String>) {
        let message = msg.into();
        debug!(target: "vidfeed::debug", "{message}");
        self.log.push_back(LogEntry { message });
        if self.log.len() > Self::MAX_LOG_ENTRIES {
            self.log.pop_front();
        }
    }

    pub fn start_task(&mut self, description: impl Into<String>) -> u64 {
        let id = self.next_task_id;
        self.next_task_id += 1;
        let desc = description.into();
        self.log(format!("Started: {desc}"));
        self.running_tasks.push(TaskInfo {
            id,
            description: desc,
            started_at: Instant::now(),
        });
        id
    }

    pub fn end_task(&mut self, id: u64, outcome: &str) {
        if let Some(pos) = self.running_tasks.iter().position(|t| t.id == id) {
            let task = self.running_tasks.remove(pos);
            let elapsed = task.started_at.elapsed();
            self.log(format!("{} {}: {:.2?}", task.description, outcome, elapsed));
        }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }
}

fn outcome<T>(result: &Result<T, ApiError>) -> &'static str {
    if result.is_ok() { "completed" } else { "failed" }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Feed,
    Video {
        id: String,
    },
    Wallet,
    Profile {
        id: String,
    },
}

#[derive(Debug, Clone)]
pub struct CommentsState {
    pub video_id: String,
    pub comments: Vec<Comment>,
    pub loading: bool,
    pub error: Option<String>,
    pub scroll: usize,
}

/// The comment a gift goes to, and the sheet to return to afterwards.
#[derive(Debug, Clone)]
pub struct GiftComment {
    pub id: String,
    pub author: String,
    pub sheet: CommentsState,
}

#[derive(Debug, Clone)]
pub enum Modal {
    Comments(CommentsState),
    Gift {
        video_id: String,
        /// Set when gifting a comment rather than the video.
        comment: Option<GiftComment>,
        input: String,
        balance: Option<u64>,
        error: Option<String>,
    },
    Purchase {
        gate: Gate,
        pending: bool,
    },
    Alert {
        title: String,
        message: String,
    },
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct Flash {
    pub message: String,
    pub kind: FlashKind,
    pub shown_at: Instant,
}

/// State of the single-video screen opened from a share link.
#[derive(Debug, Clone)]
pub struct SingleVideo {
    pub id: String,
    pub loading: bool,
    pub error: Option<String>,
}

/// A creator's profile page: the header plus one paged video tab.
#[derive(Debug)]
pub struct ProfileState {
    pub user_id: String,
    pub profile: Option<Profile>,
    pub loading: bool,
    pub error: Option<String>,
    pub tab: ProfileTab,
    pub videos: FeedList,
    pub selected: usize,
    /// Bumped on tab switches and refreshes so late pages are dropped.
    pub generation: u64,
}

impl ProfileState {
    pub fn new(user_id: String, page_size: u32) -> Self {
        Self {
            user_id,
            profile: None,
            loading: false,
            error: None,
            tab: ProfileTab::default(),
            videos: FeedList::new(page_size),
            selected: 0,
            generation: 0,
        }
    }

    pub fn selected_item(&self) -> Option<&VideoItem> {
        self.videos.get(self.selected)
    }
}

#[derive(Debug, Default)]
pub struct WalletState {
    pub wallet: Option<Wallet>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    NextVideo,
    PrevVideo,
    ScrollBy(i32),
    TogglePlay,
    Like,
    Share,
    OpenGift,
    OpenComments,
    FollowCreator,
    OpenMedia,
    OpenWallet,
    OpenProfile,
    NextTab,
    OpenSelected,
    BuyCreatorPass,
    GiftComment,
    Refresh,
    Back,
    Quit,
    ToggleHelp,
    ToggleDebug,
    ModalInput(char),
    ModalBackspace,
    ModalConfirm,
    ModalCancel,
    ModalUp,
    ModalDown,
    UpdateViewportHeight(u16),
    Tick,
}

/// Long-lived services the app drives. Built in `main`, swapped for test
/// doubles in tests.
pub struct AppContext {
    pub client: VideoClient,
    pub store: SharedVideoStore,
    pub player: ActivePlayer,
    pub page_size: u32,
    pub share_base: String,
    pub share_prefix: String,
}

pub struct App {
    pub view: View,
    pub feed: FeedList,
    pub tracker: VisibilityTracker,
    pub access: AccessGate,
    pub player: ActivePlayer,
    pub store: SharedVideoStore,
    pub client: VideoClient,
    pub modal: Option<Modal>,
    pub single: Option<SingleVideo>,
    pub profile: Option<ProfileState>,
    pub wallet: WalletState,
    pub flash: Option<Flash>,
    pub should_quit: bool,
    pub theme: Theme,
    pub clock: Arc<dyn Clock>,
    // Async task management
    pub result_tx: mpsc::Sender<AsyncResult>,
    pub result_rx: mpsc::Receiver<AsyncResult>,
    pub generation: u64,
    pub debug: DebugState,
    // Scroll position of the feed column, in terminal rows
    pub viewport_height: Option<u16>,
    pub scroll_rows: usize,
    last_scroll: Option<Instant>,
    page_size: u32,
    share_base: String,
    share_prefix: String,
}

impl App {
    pub fn new(theme: Theme, ctx: AppContext) -> Self {
        let (result_tx, result_rx) = mpsc::channel(32);
        Self {
            view: View::default(),
            feed: FeedList::new(ctx.page_size),
            tracker: VisibilityTracker::new(),
            access: AccessGate::new(),
            player: ctx.player,
            store: ctx.store,
            client: ctx.client,
            modal: None,
            single: None,
            profile: None,
            wallet: WalletState::default(),
            flash: None,
            should_quit: false,
            theme,
            clock: crate::time::system_clock(),
            result_tx,
            result_rx,
            generation: 0,
            debug: DebugState::new(),
            viewport_height: None,
            scroll_rows: 0,
            last_scroll: None,
            page_size: ctx.page_size,
            share_base: ctx.share_base,
            share_prefix: ctx.share_prefix,
        }
    }

    /// Kicks off the first screen: the feed, or a shared video.
    pub fn start(&mut self, route: Option<Route>) {
        match route {
            Some(Route::Video { id }) => self.open_video(id),
            None => self.load_feed(),
        }
    }

    /// Tears down playback before exit.
    pub fn shutdown(&mut self) {
        self.player.clear();
        info!("shutdown");
    }

    pub fn handle_async_result(&mut self, result: AsyncResult) {
        match result {
            AsyncResult::Page {
                generation,
                task_id,
                page,
                result,
            } => {
                if generation != self.generation {
                    self.debug.end_task(task_id, "discarded (stale)");
                    return;
                }
                self.debug.end_task(task_id, outcome(&result));
                match result {
                    Ok(loaded) => self.apply_page(loaded),
                    Err(e) => {
                        warn!(page, error = %e, retryable = e.is_retryable(), "feed load failed");
                        if e == ApiError::Unauthorized {
                            self.session_rejected();
                        }
                        self.feed.apply_error(page, e.user_message());
                    }
                }
            }
            AsyncResult::Video {
                task_id,
                id,
                result,
            } => {
                let is_current = matches!(&self.view, View::Video { id: current } if *current == id);
                if !is_current {
                    self.debug.end_task(task_id, "discarded (wrong view)");
                    return;
                }
                self.debug.end_task(task_id, outcome(&result));
                match result {
                    Ok(item) => {
                        self.store.upsert(item.clone());
                        self.feed.replace(item);
                        if let Some(single) = &mut self.single {
                            single.loading = false;
                            single.error = None;
                        }
                        self.activate_current();
                    }
                    Err(e) => {
                        if let Some(single) = &mut self.single {
                            single.loading = false;
                            single.error = Some(e.user_message());
                        }
                    }
                }
            }
            AsyncResult::Interaction {
                task_id,
                video_id,
                interaction,
                result,
            } => {
                self.debug.end_task(task_id, outcome(&result));
                match result {
                    Ok(patch) => {
                        self.apply_patch(&video_id, &patch);
                        match interaction {
                            Interaction::Share => {
                                let link =
                                    deeplink::share_url(&self.share_base, &self.share_prefix, &video_id);
                                self.flash_info(format!("Share link: {link}"));
                            }
                            Interaction::Gift { amount } => {
                                self.flash_info(format!("Sent a {} gift", wallet::format_amount(amount)));
                                if let Some(w) = &mut self.wallet.wallet {
                                    w.balance = w.balance.saturating_sub(amount);
                                }
                            }
                            Interaction::Like => {}
                        }
                    }
                    Err(e) if interaction.is_transactional() => {
                        self.modal = Some(Modal::Alert {
                            title: "Gift failed".to_string(),
                            message: e.user_message(),
                        });
                    }
                    Err(e) => {
                        self.flash_error(format!("Could not {}: {}", interaction.label(), e.user_message()));
                    }
                }
            }
            AsyncResult::Comments {
                task_id,
                video_id,
                result,
            } => {
                let Some(Modal::Comments(state)) = &mut self.modal else {
                    self.debug.end_task(task_id, "discarded (closed)");
                    return;
                };
                if state.video_id != video_id {
                    self.debug.end_task(task_id, "discarded (wrong video)");
                    return;
                }
                self.debug.end_task(task_id, outcome(&result));
                state.loading = false;
                match result {
                    Ok(comments) => {
                        let count = comments.len() as u64;
                        state.comments = comments;
                        state.error = None;
                        self.apply_patch(&video_id, &StatsPatch::comments(count));
                    }
                    Err(e) => state.error = Some(e.user_message()),
                }
            }
            AsyncResult::Wallet { task_id, result } => {
                self.debug.end_task(task_id, outcome(&result));
                self.wallet.loading = false;
                match result {
                    Ok(w) => {
                        self.wallet.wallet = Some(w);
                        self.wallet.error = None;
                        if let Some(Modal::Gift { balance, .. }) = &mut self.modal {
                            *balance = Some(w.balance);
                        }
                    }
                    Err(e) => self.wallet.error = Some(e.user_message()),
                }
            }
            AsyncResult::Purchase {
                task_id,
                gate,
                result,
            } => {
                self.debug.end_task(task_id, outcome(&result));
                if matches!(self.modal, Some(Modal::Purchase { .. })) {
                    self.modal = None;
                }
                match result {
                    Ok(true) => {
                        info!(gate = gate.short_label(), "access granted");
                        self.access.grant(&gate);
                        self.flash_info("Unlocked. Enjoy!");
                        self.resume_after_grant();
                    }
                    Ok(false) => {
                        self.modal = Some(Modal::Alert {
                            title: "Purchase not confirmed".to_string(),
                            message: "We could not verify your purchase yet. Please try again in a moment.".to_string(),
                        });
                    }
                    Err(e) => {
                        self.modal = Some(Modal::Alert {
                            title: "Purchase failed".to_string(),
                            message: e.user_message(),
                        });
                    }
                }
            }
            AsyncResult::Follow {
                task_id,
                creator_id,
                creator_name,
                result,
            } => {
                self.debug.end_task(task_id, outcome(&result));
                match result {
                    Ok(following) => {
                        self.feed.set_following(&creator_id, following);
                        self.store.set_following(&creator_id, following);
                        if let Some(state) = &mut self.profile {
                            state.videos.set_following(&creator_id, following);
                            if let Some(profile) =
                                state.profile.as_mut().filter(|p| p.id == creator_id)
                            {
                                profile.set_following(following);
                            }
                        }
                        if following {
                            self.flash_info(format!("Following {creator_name}"));
                        } else {
                            self.flash_info(format!("Unfollowed {creator_name}"));
                        }
                    }
                    Err(e) => self.flash_error(format!("Could not update follow: {}", e.user_message())),
                }
            }
            AsyncResult::Profile {
                task_id,
                user_id,
                result,
            } => {
                let Some(state) = self.profile.as_mut().filter(|s| s.user_id == user_id) else {
                    self.debug.end_task(task_id, "discarded (closed)");
                    return;
                };
                self.debug.end_task(task_id, outcome(&result));
                state.loading = false;
                match result {
                    Ok(profile) => {
                        state.profile = Some(profile);
                        state.error = None;
                    }
                    Err(e) => {
                        warn!(user_id = %user_id, error = %e, "profile load failed");
                        state.error = Some(e.user_message());
                    }
                }
            }
            AsyncResult::ProfileVideos {
                task_id,
                user_id,
                tab,
                generation,
                page,
                result,
            } => {
                let Some(state) = self
                    .profile
                    .as_mut()
                    .filter(|s| s.user_id == user_id && s.generation == generation)
                else {
                    self.debug.end_task(task_id, "discarded (stale)");
                    return;
                };
                self.debug.end_task(task_id, outcome(&result));
                match result {
                    Ok(loaded) => {
                        let merged = state.videos.apply_page(loaded.page, loaded.items, loaded.returned);
                        if tab == ProfileTab::Reshares {
                            state.videos.end_paging();
                        }
                        if merged.replaced {
                            state.selected = 0;
                        }
                        self.store.upsert_many(state.videos.items());
                        self.debug.log(format!(
                            "Profile {} page {}: +{} items",
                            tab.label(),
                            page,
                            merged.added
                        ));
                    }
                    Err(e) => {
                        warn!(user_id = %user_id, page, error = %e, "profile videos failed");
                        state.videos.apply_error(page, e.user_message());
                    }
                }
            }
            AsyncResult::CommentGift {
                task_id,
                author,
                amount,
                result,
            } => {
                self.debug.end_task(task_id, outcome(&result));
                match result {
                    Ok(()) => {
                        self.flash_info(format!(
                            "Sent a {} gift to @{author}",
                            wallet::format_amount(amount)
                        ));
                        if let Some(w) = &mut self.wallet.wallet {
                            w.balance = w.balance.saturating_sub(amount);
                        }
                    }
                    Err(e) => {
                        self.modal = Some(Modal::Alert {
                            title: "Gift failed".to_string(),
                            message: e.user_message(),
                        });
                    }
                }
            }
        }
    }

    pub fn update(&mut self, msg: Message) {
        match msg {
            Message::NextVideo => self.step(1),
            Message::PrevVideo => self.step(-1),
            Message::ScrollBy(delta) => self.scroll_by(delta),
            Message::TogglePlay => self.toggle_play(),
            Message::Like => self.interact(Interaction::Like),
            Message::Share => self.interact(Interaction::Share),
            Message::OpenGift => self.open_gift(),
            Message::OpenComments => self.open_comments(),
            Message::FollowCreator => self.follow_creator(),
            Message::OpenMedia => self.open_media(),
            Message::OpenWallet => self.open_wallet(),
            Message::OpenProfile => self.open_profile(),
            Message::NextTab => self.next_tab(),
            Message::OpenSelected => self.open_selected(),
            Message::BuyCreatorPass => self.buy_creator_pass(),
            Message::GiftComment => self.open_comment_gift(),
            Message::Refresh => self.refresh(),
            Message::Back => self.go_back(),
            Message::Quit => self.should_quit = true,
            Message::ToggleHelp => {
                self.modal = match self.modal {
                    Some(Modal::Help) => None,
                    _ => Some(Modal::Help),
                };
            }
            Message::ToggleDebug => self.debug.toggle(),
            Message::ModalInput(c) => self.modal_input(c),
            Message::ModalBackspace => {
                if let Some(Modal::Gift { input, error, .. }) = &mut self.modal {
                    input.pop();
                    *error = None;
                }
            }
            Message::ModalConfirm => self.modal_confirm(),
            Message::ModalCancel => self.cancel_modal(),
            Message::ModalUp => {
                if let Some(Modal::Comments(state)) = &mut self.modal {
                    state.scroll = state.scroll.saturating_sub(1);
                }
            }
            Message::ModalDown => {
                if let Some(Modal::Comments(state)) = &mut self.modal
                    && state.scroll + 1 < state.comments.len()
                {
                    state.scroll += 1;
                }
            }
            Message::UpdateViewportHeight(height) => {
                self.viewport_height = Some(height);
                self.scroll_rows = self.tracker.active() * self.item_height();
            }
            Message::Tick => self.tick(Instant::now()),
        }
    }

    fn tick(&mut self, now: Instant) {
        self.player.adapter_mut().tick(now);
        if let Some(err) = self.player.adapter_mut().take_error() {
            self.flash_error(err);
        }
        if let Some(at) = self.last_scroll
            && now.saturating_duration_since(at) >= SNAP_DELAY
        {
            self.snap();
        }
        if let Some(flash) = &self.flash
            && now.saturating_duration_since(flash.shown_at) >= FLASH_DURATION
        {
            self.flash = None;
        }
    }

    // --- feed ---

    pub fn item_height(&self) -> usize {
        self.viewport_height
            .map(|h| h.saturating_sub(LAYOUT_OVERHEAD) as usize)
            .unwrap_or(DEFAULT_ITEM_HEIGHT)
            .max(1)
    }

    pub fn active_item(&self) -> Option<&VideoItem> {
        self.feed.get(self.tracker.active())
    }

    pub fn load_feed(&mut self) {
        if !self.client.session().is_logged_in() {
            self.feed.apply_error(0, "Please log in to view videos (run `vidfeed login`)");
            return;
        }
        if let Some(req) = self.feed.next_request() {
            self.spawn_page_fetch(req);
        }
    }

    fn load_more(&mut self) {
        if let Some(req) = self.feed.next_request() {
            self.spawn_page_fetch(req);
        }
    }

    fn apply_page(&mut self, loaded: VideoPage) {
        let result = self
            .feed
            .apply_page(loaded.page, loaded.items, loaded.returned);
        self.store.upsert_many(self.feed.items());
        self.debug.log(format!(
            "Page {}: +{} items ({} total)",
            loaded.page,
            result.added,
            self.feed.len()
        ));
        if result.replaced {
            self.tracker.reset();
            self.scroll_rows = 0;
            if self.view == View::Feed {
                self.activate_current();
            }
        }
        if self.view == View::Feed && self.feed.should_prefetch(self.tracker.active()) {
            self.load_more();
        }
    }

    fn apply_patch(&mut self, video_id: &str, patch: &StatsPatch) {
        self.feed.patch(video_id, patch);
        self.store.patch(video_id, patch);
        if let Some(state) = &mut self.profile {
            state.videos.patch(video_id, patch);
        }
    }

    fn step(&mut self, delta: isize) {
        if let View::Profile { .. } = self.view {
            self.profile_step(delta);
            return;
        }
        if self.view != View::Feed || self.feed.is_empty() {
            return;
        }
        let last = self.feed.len() as isize - 1;
        let target = (self.tracker.active() as isize + delta).clamp(0, last) as usize;
        self.scroll_rows = target * self.item_height();
        self.last_scroll = None;
        self.update_visibility();
        if target as isize == last && self.feed.should_prefetch(target) {
            self.load_more();
        }
    }

    fn scroll_by(&mut self, delta: i32) {
        if self.view != View::Feed || self.feed.is_empty() {
            return;
        }
        let max = (self.feed.len() - 1) * self.item_height();
        let next = (self.scroll_rows as i64 + delta as i64).clamp(0, max as i64);
        self.scroll_rows = next as usize;
        self.last_scroll = Some(Instant::now());
        self.update_visibility();
    }

    /// Settles a partial scroll on the nearest item.
    fn snap(&mut self) {
        self.last_scroll = None;
        if self.feed.is_empty() {
            return;
        }
        let h = self.item_height();
        let index = ((self.scroll_rows + h / 2) / h).min(self.feed.len() - 1);
        self.scroll_rows = index * h;
        self.update_visibility();
    }

    fn update_visibility(&mut self) {
        let h = self.item_height();
        let entries = visible_entries(self.scroll_rows, h, h, self.feed.len());
        if let Some(index) = self.tracker.on_viewable_changed(&entries) {
            self.activate_current();
            if self.feed.should_prefetch(index) {
                self.load_more();
            }
        }
    }

    /// Binds the player to whatever the current screen shows.
    pub fn activate_current(&mut self) {
        let Some((screen, item)) = self.current_target() else {
            return;
        };
        let gate = self.access.decide(&item);
        self.debug.log(format!("Active: {} ({})", item.id, gate.short_label()));
        self.player
            .claim(screen)
            .activate(&item, &gate, Instant::now());
    }

    fn current_target(&self) -> Option<(ScreenKey, VideoItem)> {
        match &self.view {
            View::Feed => self.active_item().cloned().map(|item| (ScreenKey::Feed, item)),
            View::Video { id } => self
                .store
                .get(id)
                .map(|item| (ScreenKey::Video(id.clone()), item)),
            View::Wallet | View::Profile { .. } => None,
        }
    }

    fn leave_feed(&mut self) {
        if self.view != View::Feed {
            return;
        }
        self.tracker.set_focused(false);
        if self.player.owner() == Some(&ScreenKey::Feed) {
            self.player.adapter_mut().deactivate(Instant::now());
        }
    }

    fn enter_feed(&mut self) {
        self.view = View::Feed;
        self.single = None;
        self.profile = None;
        self.tracker.set_focused(true);
        if self.feed.is_empty() {
            self.load_feed();
        } else {
            self.activate_current();
        }
    }

    fn toggle_play(&mut self) {
        let Some((screen, item)) = self.current_target() else {
            return;
        };
        let gate = self.access.decide(&item);
        match self.player.claim(screen).toggle(Instant::now(), &gate) {
            ToggleOutcome::NeedsAccess => {
                self.modal = Some(Modal::Purchase {
                    gate,
                    pending: false,
                });
            }
            ToggleOutcome::Played => self.debug.log(format!("Play {}", item.id)),
            ToggleOutcome::Paused => self.debug.log(format!("Pause {}", item.id)),
            ToggleOutcome::Ignored => {}
        }
    }

    fn resume_after_grant(&mut self) {
        let Some((screen, item)) = self.current_target() else {
            return;
        };
        let gate = self.access.decide(&item);
        self.player.claim(screen).play_if_allowed(&gate);
    }

    fn open_media(&mut self) {
        let Some((_, item)) = self.current_target() else {
            return;
        };
        let gate = self.access.decide(&item);
        if !gate.is_open() {
            self.modal = Some(Modal::Purchase {
                gate,
                pending: false,
            });
            return;
        }
        if let Err(e) = open::that(&item.video_url) {
            self.flash_error(format!("Could not open video: {e}"));
        }
    }

    // --- interactions ---

    fn require_login(&mut self) -> bool {
        if self.client.session().is_logged_in() {
            return true;
        }
        self.flash_error("Please log in first (run `vidfeed login`)");
        false
    }

    fn interact(&mut self, interaction: Interaction) {
        let Some((_, item)) = self.current_target() else {
            return;
        };
        if !self.require_login() {
            return;
        }
        self.spawn_interaction(item.id, item.stats, interaction);
    }

    fn open_comments(&mut self) {
        let Some((_, item)) = self.current_target() else {
            return;
        };
        self.modal = Some(Modal::Comments(CommentsState {
            video_id: item.id.clone(),
            comments: Vec::new(),
            loading: true,
            error: None,
            scroll: 0,
        }));
        self.spawn_comments_fetch(item.id);
    }

    fn open_gift(&mut self) {
        let Some((_, item)) = self.current_target() else {
            return;
        };
        if !self.require_login() {
            return;
        }
        self.modal = Some(Modal::Gift {
            video_id: item.id,
            comment: None,
            input: String::new(),
            balance: self.wallet.wallet.map(|w| w.balance),
            error: None,
        });
        self.spawn_wallet_fetch();
    }

    fn follow_creator(&mut self) {
        if let View::Profile { .. } = self.view {
            let Some(profile) = self.profile.as_ref().and_then(|s| s.profile.clone()) else {
                return;
            };
            if !self.require_login() {
                return;
            }
            let name = profile.display_name().to_string();
            self.spawn_follow(profile.id, name, !profile.is_following);
            return;
        }
        let Some((_, item)) = self.current_target() else {
            return;
        };
        if item.created_by.id.is_empty() || !self.require_login() {
            return;
        }
        let follow = !item.is_following_creator;
        let creator_name = item.created_by.display_name().to_string();
        self.spawn_follow(item.created_by.id.clone(), creator_name, follow);
    }

    fn modal_input(&mut self, c: char) {
        if let Some(Modal::Gift { input, error, .. }) = &mut self.modal
            && c.is_ascii_digit()
            && input.len() < MAX_GIFT_DIGITS
        {
            input.push(c);
            *error = None;
        }
    }

    /// Gifts one comment from the open sheet: the one at the top.
    fn open_comment_gift(&mut self) {
        let Some(Modal::Comments(sheet)) = &self.modal else {
            return;
        };
        let Some(comment) = sheet.comments.get(sheet.scroll) else {
            return;
        };
        let target = GiftComment {
            id: comment.id.clone(),
            author: comment.user.username.clone(),
            sheet: sheet.clone(),
        };
        let video_id = sheet.video_id.clone();
        if !self.require_login() {
            return;
        }
        let own = self
            .client
            .session()
            .user()
            .is_some_and(|user| user.username == target.author);
        if own {
            self.flash_error("You can't gift your own comment");
            return;
        }
        self.modal = Some(Modal::Gift {
            video_id,
            comment: Some(target),
            input: String::new(),
            balance: self.wallet.wallet.map(|w| w.balance),
            error: None,
        });
        self.spawn_wallet_fetch();
    }

    /// Closes the modal. A comment gift prompt goes back to its sheet.
    fn cancel_modal(&mut self) {
        self.modal = match self.modal.take() {
            Some(Modal::Gift {
                comment: Some(target),
                ..
            }) => Some(Modal::Comments(target.sheet)),
            _ => None,
        };
    }

    fn modal_confirm(&mut self) {
        match &mut self.modal {
            Some(Modal::Gift {
                video_id,
                comment,
                input,
                balance,
                error,
            }) => match wallet::validate_gift(input, *balance) {
                Ok(amount) => {
                    let video_id = video_id.clone();
                    match comment.take() {
                        Some(target) => {
                            self.modal = Some(Modal::Comments(target.sheet));
                            self.spawn_comment_gift(video_id, target.id, target.author, amount);
                        }
                        None => {
                            self.modal = None;
                            let stats = self
                                .store
                                .get(&video_id)
                                .map(|item| item.stats)
                                .unwrap_or_default();
                            self.spawn_interaction(video_id, stats, Interaction::Gift { amount });
                        }
                    }
                }
                Err(e) => *error = Some(e.user_message()),
            },
            Some(Modal::Purchase { gate, pending }) => {
                if *pending {
                    return;
                }
                *pending = true;
                let gate = gate.clone();
                self.spawn_purchase(gate);
            }
            Some(Modal::Alert { .. }) | Some(Modal::Help) => self.modal = None,
            Some(Modal::Comments(_)) | None => {}
        }
    }

    // --- screens ---

    pub fn open_video(&mut self, id: String) {
        self.leave_feed();
        self.modal = None;
        self.view = View::Video { id: id.clone() };
        self.single = Some(SingleVideo {
            id: id.clone(),
            loading: true,
            error: None,
        });
        if self.store.get(&id).is_some() {
            self.activate_current();
        }
        if self.client.session().is_logged_in() {
            self.spawn_video_fetch(id);
        } else if let Some(single) = &mut self.single {
            single.loading = false;
            single.error = Some("Please log in to view videos (run `vidfeed login`)".to_string());
        }
    }

    fn open_wallet(&mut self) {
        if self.view == View::Wallet || !self.require_login() {
            return;
        }
        self.leave_feed();
        if let View::Video { .. } = self.view {
            self.player.clear();
        }
        self.view = View::Wallet;
        self.spawn_wallet_fetch();
    }

    fn go_back(&mut self) {
        match self.view {
            View::Feed => {}
            View::Video { .. } | View::Wallet if self.profile.is_some() => self.return_to_profile(),
            View::Video { .. } | View::Wallet | View::Profile { .. } => self.enter_feed(),
        }
    }

    // --- profiles ---

    fn open_profile(&mut self) {
        let Some((_, item)) = self.current_target() else {
            return;
        };
        if item.created_by.id.is_empty() || !self.require_login() {
            return;
        }
        self.show_profile(item.created_by.id);
    }

    /// Switches to a creator's profile and loads its header and first tab.
    pub fn show_profile(&mut self, user_id: String) {
        self.leave_feed();
        if let View::Video { .. } = self.view {
            self.player.clear();
            self.single = None;
        }
        self.modal = None;
        self.view = View::Profile {
            id: user_id.clone(),
        };
        let mut state = ProfileState::new(user_id.clone(), self.page_size);
        state.loading = true;
        self.profile = Some(state);
        self.spawn_profile_fetch(user_id);
        self.load_profile_videos(false);
    }

    fn return_to_profile(&mut self) {
        let Some(state) = &self.profile else {
            return;
        };
        let id = state.user_id.clone();
        self.player.clear();
        self.single = None;
        self.view = View::Profile { id };
    }

    /// Requests the next page of the current tab, or page one on refresh.
    fn load_profile_videos(&mut self, refresh: bool) {
        let Some(state) = &mut self.profile else {
            return;
        };
        let req = if refresh {
            let req = state.videos.begin_refresh();
            if req.is_some() {
                state.generation += 1;
            }
            req
        } else {
            state.videos.next_request()
        };
        let Some(req) = req else {
            return;
        };
        let (user_id, tab, generation) = (state.user_id.clone(), state.tab, state.generation);
        self.spawn_profile_videos(user_id, tab, generation, req);
    }

    fn next_tab(&mut self) {
        if !matches!(self.view, View::Profile { .. }) {
            return;
        }
        let Some(state) = &mut self.profile else {
            return;
        };
        state.tab = state.tab.next();
        state.generation += 1;
        state.videos = FeedList::new(self.page_size);
        state.selected = 0;
        self.load_profile_videos(false);
    }

    fn profile_step(&mut self, delta: isize) {
        let Some(state) = &mut self.profile else {
            return;
        };
        if state.videos.is_empty() {
            return;
        }
        let last = state.videos.len() as isize - 1;
        state.selected = (state.selected as isize + delta).clamp(0, last) as usize;
        if state.videos.should_prefetch(state.selected) {
            self.load_profile_videos(false);
        }
    }

    fn open_selected(&mut self) {
        let Some(item) = self
            .profile
            .as_ref()
            .and_then(ProfileState::selected_item)
            .cloned()
        else {
            return;
        };
        self.store.upsert(item.clone());
        self.open_video(item.id);
    }

    fn buy_creator_pass(&mut self) {
        let Some(profile) = self.profile.as_ref().and_then(|s| s.profile.as_ref()) else {
            return;
        };
        if profile.creator_pass_price == 0 {
            return;
        }
        let gate = Gate::CreatorPass {
            creator_id: profile.id.clone(),
            creator_name: profile.display_name().to_string(),
            price: profile.creator_pass_price,
        };
        if !self.require_login() {
            return;
        }
        self.modal = Some(Modal::Purchase {
            gate,
            pending: false,
        });
    }

    fn refresh(&mut self) {
        match &self.view {
            View::Feed => {
                if !self.client.session().is_logged_in() {
                    self.load_feed();
                    return;
                }
                if self.feed.load_more_failed() {
                    self.load_more();
                    return;
                }
                if let Some(req) = self.feed.begin_refresh() {
                    self.generation += 1;
                    self.spawn_page_fetch(req);
                }
            }
            View::Video { id } => {
                let id = id.clone();
                if let Some(single) = &mut self.single {
                    single.loading = true;
                    single.error = None;
                }
                self.spawn_video_fetch(id);
            }
            View::Wallet => self.spawn_wallet_fetch(),
            View::Profile { id } => {
                let id = id.clone();
                let retry_more = self
                    .profile
                    .as_ref()
                    .is_some_and(|s| s.videos.load_more_failed());
                if let Some(state) = &mut self.profile {
                    state.loading = true;
                }
                self.spawn_profile_fetch(id);
                self.load_profile_videos(!retry_more);
            }
        }
    }

    // --- flash messages ---

    fn flash_info(&mut self, message: impl Into<String>) {
        self.flash = Some(Flash {
            message: message.into(),
            kind: FlashKind::Info,
            shown_at: Instant::now(),
        });
    }

    /// The backend no longer accepts our token; grants and cached items
    /// belong to the old session.
    fn session_rejected(&mut self) {
        self.access.revoke_all();
        self.store.clear();
        self.debug.log("Session rejected, dropped grants and cache");
    }

    fn flash_error(&mut self, message: impl Into<String>) {
        self.flash = Some(Flash {
            message: message.into(),
            kind: FlashKind::Error,
            shown_at: Instant::now(),
        });
    }

    // --- async tasks ---

    fn spawn_page_fetch(&mut self, req: PageRequest) {
        let client = self.client.clone();
        let tx = self.result_tx.clone();
        let generation = self.generation;
        let task_id = self.debug.start_task(if req.page == 1 {
            "Load feed".to_string()
        } else {
            format!("Load feed page {}", req.page)
        });

        tokio::spawn(async move {
            let result = client.fetch_videos(req.page, req.limit).await;
            let _ = tx
                .send(AsyncResult::Page {
                    generation,
                    task_id,
                    page: req.page,
                    result,
                })
                .await;
        });
    }

    fn spawn_video_fetch(&mut self, id: String) {
        let client = self.client.clone();
        let tx = self.result_tx.clone();
        let task_id = self.debug.start_task(format!("Load video {id}"));

        tokio::spawn(async move {
            let result = client.fetch_video(&id).await;
            let _ = tx.send(AsyncResult::Video { task_id, id, result }).await;
        });
    }

    fn spawn_interaction(
        &mut self,
        video_id: String,
        stats: crate::api::VideoStats,
        interaction: Interaction,
    ) {
        let client = self.client.clone();
        let tx = self.result_tx.clone();
        let task_id = self
            .debug
            .start_task(format!("{} {}", interaction.label(), video_id));

        tokio::spawn(async move {
            let result = client.interact(&video_id, interaction, stats).await;
            let _ = tx
                .send(AsyncResult::Interaction {
                    task_id,
                    video_id,
                    interaction,
                    result,
                })
                .await;
        });
    }

    fn spawn_comments_fetch(&mut self, video_id: String) {
        let client = self.client.clone();
        let tx = self.result_tx.clone();
        let task_id = self.debug.start_task(format!("Load comments for {video_id}"));

        tokio::spawn(async move {
            let result = client.fetch_comments(&video_id).await;
            let _ = tx
                .send(AsyncResult::Comments {
                    task_id,
                    video_id,
                    result,
                })
                .await;
        });
    }

    fn spawn_wallet_fetch(&mut self) {
        let client = self.client.clone();
        let tx = self.result_tx.clone();
        self.wallet.loading = true;
        let task_id = self.debug.start_task("Load wallet");

        tokio::spawn(async move {
            let result = client.fetch_wallet().await;
            let _ = tx.send(AsyncResult::Wallet { task_id, result }).await;
        });
    }

    fn spawn_purchase(&mut self, gate: Gate) {
        let client = self.client.clone();
        let tx = self.result_tx.clone();
        let task_id = self.debug.start_task(format!("Buy {}", gate.short_label()));

        tokio::spawn(async move {
            let result = client.purchase(&gate).await;
            let _ = tx
                .send(AsyncResult::Purchase {
                    task_id,
                    gate,
                    result,
                })
                .await;
        });
    }

    fn spawn_comment_gift(&mut self, video_id: String, comment_id: String, author: String, amount: u64) {
        let client = self.client.clone();
        let tx = self.result_tx.clone();
        let task_id = self.debug.start_task(format!("Gift comment {comment_id}"));

        tokio::spawn(async move {
            let result = client.gift_comment(&video_id, &comment_id, amount).await;
            let _ = tx
                .send(AsyncResult::CommentGift {
                    task_id,
                    author,
                    amount,
                    result,
                })
                .await;
        });
    }

    fn spawn_profile_fetch(&mut self, user_id: String) {
        let client = self.client.clone();
        let tx = self.result_tx.clone();
        let task_id = self.debug.start_task(format!("Load profile {user_id}"));

        tokio::spawn(async move {
            let result = client.fetch_profile(&user_id).await;
            let _ = tx
                .send(AsyncResult::Profile {
                    task_id,
                    user_id,
                    result,
                })
                .await;
        });
    }

    fn spawn_profile_videos(&mut self, user_id: String, tab: ProfileTab, generation: u64, req: PageRequest) {
        let client = self.client.clone();
        let tx = self.result_tx.clone();
        let task_id = self
            .debug
            .start_task(format!("Load {} page {}", tab.label(), req.page));

        tokio::spawn(async move {
            let result = client
                .fetch_profile_videos(&user_id, tab, req.page, req.limit)
                .await;
            let _ = tx
                .send(AsyncResult::ProfileVideos {
                    task_id,
                    user_id,
                    tab,
                    generation,
                    page: req.page,
                    result,
                })
                .await;
        });
    }

    fn spawn_follow(&mut self, creator_id: String, creator_name: String, follow: bool) {
        let client = self.client.clone();
        let tx = self.result_tx.clone();
        let verb = if follow { "Follow" } else { "Unfollow" };
        let task_id = self.debug.start_task(format!("{verb} {creator_name}"));

        tokio::spawn(async move {
            let result = client.set_following(&creator_id, follow).await;
            let _ = tx
                .send(AsyncResult::Follow {
                    task_id,
                    creator_id,
                    creator_name,
                    result,
                })
                .await;
        });
    }
}
