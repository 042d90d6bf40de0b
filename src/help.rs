//! Dynamic help text generation from keymaps.

use crate::app::{Message, Modal, View};
use crate::keys::{
    Keymap, alert_modal_keymap, comments_modal_keymap, format_key, gift_modal_keymap,
    purchase_modal_keymap, view_keymap,
};

/// A single help item representing one or more related actions.
pub struct HelpItem {
    /// Messages to look up keys for. Keys are joined with "/".
    messages: Vec<Message>,
    /// The label to show (e.g., "nav", "like", "quit").
    label: &'static str,
}

impl HelpItem {
    /// Create a help item for a single action.
    pub fn new(message: Message, label: &'static str) -> Self {
        Self {
            messages: vec![message],
            label,
        }
    }

    /// Create a help item for paired actions (e.g., j/k for next/prev).
    pub fn pair(first: Message, second: Message, label: &'static str) -> Self {
        Self {
            messages: vec![first, second],
            label,
        }
    }

    fn keys(&self, keymap: &Keymap) -> Option<String> {
        let keys: Vec<String> = self
            .messages
            .iter()
            .filter_map(|msg| {
                keymap
                    .find_key(msg)
                    .map(|(code, mods)| format_key(code, mods))
            })
            .collect();
        if keys.is_empty() {
            return None;
        }
        Some(keys.join("/"))
    }

    /// Format this help item using the given keymap.
    /// Returns None if no keys are bound for any of the messages.
    pub fn format(&self, keymap: &Keymap) -> Option<String> {
        self.keys(keymap).map(|keys| format!("{}:{}", keys, self.label))
    }

    /// Format this help item for overlay display.
    /// Returns (`keys_string`, label) or None if no keys are bound.
    pub fn format_for_overlay(&self, keymap: &Keymap) -> Option<(String, &'static str)> {
        self.keys(keymap).map(|keys| (keys, self.label))
    }
}

/// A collection of help items for a specific context.
pub struct HelpConfig {
    /// Items to show in the help overlay.
    pub expanded: Vec<HelpItem>,
    /// Items to show in the status bar.
    pub compact: Vec<HelpItem>,
}

impl HelpConfig {
    /// Format help text for the given mode.
    pub fn format(&self, keymap: &Keymap, show_expanded: bool) -> String {
        let items = if show_expanded {
            &self.expanded
        } else {
            &self.compact
        };
        items
            .iter()
            .filter_map(|item| item.format(keymap))
            .collect::<Vec<_>>()
            .join("  ")
    }
}

/// Help configuration for the feed.
pub fn feed_help() -> HelpConfig {
    use Message::{
        FollowCreator, Like, NextVideo, OpenComments, OpenGift, OpenMedia, OpenProfile, OpenWallet,
        PrevVideo, Quit, Refresh, Share, ToggleDebug, ToggleHelp, TogglePlay,
    };
    HelpConfig {
        expanded: vec![
            HelpItem::pair(NextVideo, PrevVideo, "next/prev video"),
            HelpItem::new(TogglePlay, "play/pause"),
            HelpItem::new(Like, "like"),
            HelpItem::new(Share, "share"),
            HelpItem::new(OpenGift, "send gift"),
            HelpItem::new(OpenComments, "comments"),
            HelpItem::new(FollowCreator, "follow creator"),
            HelpItem::new(OpenProfile, "creator profile"),
            HelpItem::new(OpenMedia, "open externally"),
            HelpItem::new(OpenWallet, "wallet"),
            HelpItem::new(Refresh, "refresh"),
            HelpItem::new(ToggleDebug, "debug"),
            HelpItem::new(Quit, "quit"),
            HelpItem::new(ToggleHelp, "close"),
        ],
        compact: vec![
            HelpItem::pair(NextVideo, PrevVideo, "nav"),
            HelpItem::new(TogglePlay, "play"),
            HelpItem::new(Like, "like"),
            HelpItem::new(OpenGift, "gift"),
            HelpItem::new(OpenComments, "comments"),
            HelpItem::new(ToggleHelp, "help"),
            HelpItem::new(Quit, "quit"),
        ],
    }
}

/// Help configuration for the single video screen.
pub fn video_help() -> HelpConfig {
    use Message::{
        Back, FollowCreator, Like, OpenComments, OpenGift, OpenMedia, OpenProfile, OpenWallet,
        Quit, Refresh, Share, ToggleDebug, ToggleHelp, TogglePlay,
    };
    HelpConfig {
        expanded: vec![
            HelpItem::new(TogglePlay, "play/pause"),
            HelpItem::new(Like, "like"),
            HelpItem::new(Share, "share"),
            HelpItem::new(OpenGift, "send gift"),
            HelpItem::new(OpenComments, "comments"),
            HelpItem::new(FollowCreator, "follow creator"),
            HelpItem::new(OpenProfile, "creator profile"),
            HelpItem::new(OpenMedia, "open externally"),
            HelpItem::new(OpenWallet, "wallet"),
            HelpItem::new(Refresh, "reload"),
            HelpItem::new(Back, "back to feed"),
            HelpItem::new(ToggleDebug, "debug"),
            HelpItem::new(Quit, "quit"),
            HelpItem::new(ToggleHelp, "close"),
        ],
        compact: vec![
            HelpItem::new(TogglePlay, "play"),
            HelpItem::new(Like, "like"),
            HelpItem::new(OpenGift, "gift"),
            HelpItem::new(Back, "feed"),
            HelpItem::new(ToggleHelp, "help"),
        ],
    }
}

/// Help configuration for the wallet screen.
pub fn wallet_help() -> HelpConfig {
    use Message::{Back, Quit, Refresh, ToggleDebug, ToggleHelp};
    HelpConfig {
        expanded: vec![
            HelpItem::new(Refresh, "refresh"),
            HelpItem::new(Back, "back"),
            HelpItem::new(ToggleDebug, "debug"),
            HelpItem::new(Quit, "quit"),
            HelpItem::new(ToggleHelp, "close"),
        ],
        compact: vec![
            HelpItem::new(Refresh, "refresh"),
            HelpItem::new(Back, "back"),
            HelpItem::new(Quit, "quit"),
        ],
    }
}

/// Help configuration for a creator's profile.
pub fn profile_help() -> HelpConfig {
    use Message::{
        Back, BuyCreatorPass, FollowCreator, NextTab, NextVideo, OpenSelected, OpenWallet,
        PrevVideo, Quit, Refresh, ToggleDebug, ToggleHelp,
    };
    HelpConfig {
        expanded: vec![
            HelpItem::pair(NextVideo, PrevVideo, "select video"),
            HelpItem::new(OpenSelected, "watch"),
            HelpItem::new(NextTab, "next tab"),
            HelpItem::new(FollowCreator, "follow"),
            HelpItem::new(BuyCreatorPass, "creator pass"),
            HelpItem::new(OpenWallet, "wallet"),
            HelpItem::new(Refresh, "refresh"),
            HelpItem::new(Back, "back"),
            HelpItem::new(ToggleDebug, "debug"),
            HelpItem::new(Quit, "quit"),
            HelpItem::new(ToggleHelp, "close"),
        ],
        compact: vec![
            HelpItem::pair(NextVideo, PrevVideo, "select"),
            HelpItem::new(OpenSelected, "watch"),
            HelpItem::new(NextTab, "tab"),
            HelpItem::new(FollowCreator, "follow"),
            HelpItem::new(Back, "back"),
            HelpItem::new(ToggleHelp, "help"),
        ],
    }
}

pub fn view_help(view: &View) -> HelpConfig {
    match view {
        View::Feed => feed_help(),
        View::Video { .. } => video_help(),
        View::Wallet => wallet_help(),
        View::Profile { .. } => profile_help(),
    }
}

/// One-line hint for an open modal, shown in place of the view's help.
pub fn modal_hint(modal: &Modal) -> String {
    use Message::{GiftComment, ModalBackspace, ModalCancel, ModalConfirm, ModalDown, ModalUp};
    let (items, keymap) = match modal {
        Modal::Comments(_) => (
            vec![
                HelpItem::pair(ModalDown, ModalUp, "scroll"),
                HelpItem::new(GiftComment, "gift top comment"),
                HelpItem::new(ModalCancel, "close"),
            ],
            comments_modal_keymap(),
        ),
        Modal::Gift { .. } => (
            vec![
                HelpItem::new(ModalConfirm, "send"),
                HelpItem::new(ModalBackspace, "delete"),
                HelpItem::new(ModalCancel, "cancel"),
            ],
            gift_modal_keymap(),
        ),
        Modal::Purchase { .. } => (
            vec![
                HelpItem::new(ModalConfirm, "buy"),
                HelpItem::new(ModalCancel, "cancel"),
            ],
            purchase_modal_keymap(),
        ),
        Modal::Alert { .. } => (
            vec![HelpItem::new(ModalConfirm, "ok")],
            alert_modal_keymap(),
        ),
        Modal::Help => return String::new(),
    };
    HelpConfig {
        expanded: Vec::new(),
        compact: items,
    }
    .format(&keymap, false)
}

/// Status bar help for the current app state.
pub fn status_help(view: &View, modal: Option<&Modal>) -> String {
    match modal {
        Some(modal) if !matches!(modal, Modal::Help) => modal_hint(modal),
        _ => view_help(view).format(&view_keymap(view), false),
    }
}
