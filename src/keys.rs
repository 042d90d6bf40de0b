use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

use crate::app::{App, Message, Modal, View};

/// Rows moved per mouse wheel notch.
const WHEEL_ROWS: i32 = 3;

/// A declarative keybinding map that can be composed and extended.
#[derive(Clone)]
pub struct Keymap {
    bindings: Vec<(KeyCode, KeyModifiers, Message)>,
}

impl Keymap {
    pub const fn new() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Add a key binding with no modifiers.
    pub fn bind(mut self, code: KeyCode, message: Message) -> Self {
        self.bindings.push((code, KeyModifiers::NONE, message));
        self
    }

    /// Add a key binding with Ctrl modifier.
    pub fn bind_ctrl(mut self, code: KeyCode, message: Message) -> Self {
        self.bindings.push((code, KeyModifiers::CONTROL, message));
        self
    }

    /// Look up a message for a key event.
    /// Later bindings take precedence over earlier ones.
    pub fn get(&self, event: &KeyEvent) -> Option<Message> {
        self.bindings
            .iter()
            .rev()
            .find(|(code, mods, _)| *code == event.code && event.modifiers.contains(*mods))
            .map(|(_, _, msg)| msg.clone())
    }

    /// Extend this keymap with another. The other keymap's bindings take precedence.
    pub fn extend(mut self, other: Self) -> Self {
        self.bindings.extend(other.bindings);
        self
    }

    /// Find the first key bound to a specific message.
    pub fn find_key(&self, message: &Message) -> Option<(KeyCode, KeyModifiers)> {
        self.bindings
            .iter()
            .find(|(_, _, msg)| msg == message)
            .map(|(code, mods, _)| (*code, *mods))
    }
}

/// Format a key binding for display in help text.
pub fn format_key(code: KeyCode, mods: KeyModifiers) -> String {
    let key_str = match code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Up => "↑".to_string(),
        KeyCode::Down => "↓".to_string(),
        KeyCode::Left => "←".to_string(),
        KeyCode::Right => "→".to_string(),
        KeyCode::Backspace => "Bksp".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::F(n) => format!("F{n}"),
        _ => "?".to_string(),
    };
    if mods.contains(KeyModifiers::CONTROL) {
        format!("C-{key_str}")
    } else if mods.contains(KeyModifiers::ALT) {
        format!("M-{key_str}")
    } else {
        key_str
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new()
    }
}

/// Global keybindings that work in all views.
pub fn global_keymap() -> Keymap {
    Keymap::new()
        .bind(KeyCode::Char('q'), Message::Quit)
        .bind_ctrl(KeyCode::Char('c'), Message::Quit)
        .bind(KeyCode::Char('`'), Message::ToggleDebug)
        .bind(KeyCode::Char('?'), Message::ToggleHelp)
}

/// Actions on the video in view, shared by the feed and the single video.
fn video_actions_keymap() -> Keymap {
    Keymap::new()
        .bind(KeyCode::Char(' '), Message::TogglePlay)
        .bind(KeyCode::Char('p'), Message::TogglePlay)
        .bind(KeyCode::Char('l'), Message::Like)
        .bind(KeyCode::Char('s'), Message::Share)
        .bind(KeyCode::Char('g'), Message::OpenGift)
        .bind(KeyCode::Char('c'), Message::OpenComments)
        .bind(KeyCode::Char('f'), Message::FollowCreator)
        .bind(KeyCode::Char('u'), Message::OpenProfile)
        .bind(KeyCode::Char('o'), Message::OpenMedia)
        .bind(KeyCode::Char('r'), Message::Refresh)
        .bind(KeyCode::Char('w'), Message::OpenWallet)
}

/// Feed view keybindings.
pub fn feed_keymap() -> Keymap {
    Keymap::new()
        .bind(KeyCode::Char('j'), Message::NextVideo)
        .bind(KeyCode::Down, Message::NextVideo)
        .bind(KeyCode::Char('k'), Message::PrevVideo)
        .bind(KeyCode::Up, Message::PrevVideo)
        .extend(video_actions_keymap())
}

/// Single video view keybindings.
pub fn video_keymap() -> Keymap {
    video_actions_keymap()
        .bind(KeyCode::Esc, Message::Back)
        .bind(KeyCode::Backspace, Message::Back)
}

/// Profile view keybindings. j/k move the selection in the video tab.
pub fn profile_keymap() -> Keymap {
    Keymap::new()
        .bind(KeyCode::Char('j'), Message::NextVideo)
        .bind(KeyCode::Down, Message::NextVideo)
        .bind(KeyCode::Char('k'), Message::PrevVideo)
        .bind(KeyCode::Up, Message::PrevVideo)
        .bind(KeyCode::Enter, Message::OpenSelected)
        .bind(KeyCode::Tab, Message::NextTab)
        .bind(KeyCode::Char('f'), Message::FollowCreator)
        .bind(KeyCode::Char('b'), Message::BuyCreatorPass)
        .bind(KeyCode::Char('w'), Message::OpenWallet)
        .bind(KeyCode::Char('r'), Message::Refresh)
        .bind(KeyCode::Esc, Message::Back)
        .bind(KeyCode::Backspace, Message::Back)
}

/// Wallet view keybindings.
pub fn wallet_keymap() -> Keymap {
    Keymap::new()
        .bind(KeyCode::Char('r'), Message::Refresh)
        .bind(KeyCode::Esc, Message::Back)
        .bind(KeyCode::Backspace, Message::Back)
}

/// Keybindings for the comments sheet.
pub fn comments_modal_keymap() -> Keymap {
    Keymap::new()
        .bind(KeyCode::Char('j'), Message::ModalDown)
        .bind(KeyCode::Down, Message::ModalDown)
        .bind(KeyCode::Char('k'), Message::ModalUp)
        .bind(KeyCode::Up, Message::ModalUp)
        .bind(KeyCode::Char('g'), Message::GiftComment)
        .bind(KeyCode::Esc, Message::ModalCancel)
        .bind(KeyCode::Char('c'), Message::ModalCancel)
        .bind(KeyCode::Char('q'), Message::ModalCancel)
        .bind_ctrl(KeyCode::Char('c'), Message::Quit)
}

/// Keybindings for the gift amount prompt. Digits are handled separately.
pub fn gift_modal_keymap() -> Keymap {
    Keymap::new()
        .bind(KeyCode::Enter, Message::ModalConfirm)
        .bind(KeyCode::Backspace, Message::ModalBackspace)
        .bind(KeyCode::Esc, Message::ModalCancel)
        .bind_ctrl(KeyCode::Char('c'), Message::Quit)
}

/// Keybindings for the purchase confirmation.
pub fn purchase_modal_keymap() -> Keymap {
    Keymap::new()
        .bind(KeyCode::Enter, Message::ModalConfirm)
        .bind(KeyCode::Char('y'), Message::ModalConfirm)
        .bind(KeyCode::Esc, Message::ModalCancel)
        .bind(KeyCode::Char('n'), Message::ModalCancel)
        .bind_ctrl(KeyCode::Char('c'), Message::Quit)
}

/// Keybindings for alerts.
pub fn alert_modal_keymap() -> Keymap {
    Keymap::new()
        .bind(KeyCode::Enter, Message::ModalConfirm)
        .bind(KeyCode::Esc, Message::ModalCancel)
        .bind_ctrl(KeyCode::Char('c'), Message::Quit)
}

/// Keybindings for the help overlay popup.
fn help_overlay_keymap() -> Keymap {
    Keymap::new()
        .bind(KeyCode::Char('?'), Message::ToggleHelp)
        .bind(KeyCode::Esc, Message::ToggleHelp)
        .bind(KeyCode::Char('q'), Message::ToggleHelp)
        .bind_ctrl(KeyCode::Char('c'), Message::ToggleHelp)
}

/// The keymap in effect for the current view, without modals.
pub fn view_keymap(view: &View) -> Keymap {
    let local = match view {
        View::Feed => feed_keymap(),
        View::Video { .. } => video_keymap(),
        View::Wallet => wallet_keymap(),
        View::Profile { .. } => profile_keymap(),
    };
    global_keymap().extend(local)
}

pub fn handle_key(key: KeyEvent, app: &App) -> Option<Message> {
    // Modals take priority when open
    match &app.modal {
        Some(Modal::Gift { .. }) => {
            if let KeyCode::Char(c) = key.code
                && c.is_ascii_digit()
                && !key.modifiers.contains(KeyModifiers::CONTROL)
            {
                return Some(Message::ModalInput(c));
            }
            return gift_modal_keymap().get(&key);
        }
        Some(Modal::Comments(_)) => return comments_modal_keymap().get(&key),
        Some(Modal::Purchase { .. }) => return purchase_modal_keymap().get(&key),
        Some(Modal::Alert { .. }) => return alert_modal_keymap().get(&key),
        Some(Modal::Help) => return help_overlay_keymap().get(&key),
        None => {}
    }

    view_keymap(&app.view).get(&key)
}

/// Wheel scrolling drives the feed. Everything else is ignored.
pub fn handle_mouse(mouse: MouseEvent, app: &App) -> Option<Message> {
    if app.modal.is_some() || app.view != View::Feed {
        return None;
    }
    match mouse.kind {
        MouseEventKind::ScrollDown => Some(Message::ScrollBy(WHEEL_ROWS)),
        MouseEventKind::ScrollUp => Some(Message::ScrollBy(-WHEEL_ROWS)),
        _ => None,
    }
}
