//! Like/share/gift actions and the counter patches they produce.

use crate::api::VideoStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    Like,
    Share,
    Gift { amount: u64 },
}

impl Interaction {
    pub fn label(&self) -> &'static str {
        match self {
            Interaction::Like => "like",
            Interaction::Share => "share",
            Interaction::Gift { .. } => "gift",
        }
    }

    /// Gifts move money, so their failures get a modal instead of a flash.
    pub fn is_transactional(&self) -> bool {
        matches!(self, Interaction::Gift { .. })
    }
}

/// New absolute counter values reported by the backend.
///
/// `None` leaves a counter untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsPatch {
    pub likes: Option<u64>,
    pub shares: Option<u64>,
    pub gifts: Option<u64>,
    pub comments: Option<u64>,
}

impl StatsPatch {
    pub fn likes(n: u64) -> Self {
        Self {
            likes: Some(n),
            ..Default::default()
        }
    }

    pub fn shares(n: u64) -> Self {
        Self {
            shares: Some(n),
            ..Default::default()
        }
    }

    pub fn gifts(n: u64) -> Self {
        Self {
            gifts: Some(n),
            ..Default::default()
        }
    }

    pub fn comments(n: u64) -> Self {
        Self {
            comments: Some(n),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(&self, stats: &mut VideoStats) {
        if let Some(n) = self.likes {
            stats.likes = n;
        }
        if let Some(n) = self.shares {
            stats.shares = n;
        }
        if let Some(n) = self.gifts {
            stats.gifts = n;
        }
        if let Some(n) = self.comments {
            stats.comments = n;
        }
    }
}

/// Formats a counter compactly for the overlay: 999, 1.2K, 3.4M.
pub fn compact_count(n: u64) -> String {
    match n {
        0..=999 => n.to_string(),
        1_000..=999_999 => trim_decimal(n as f64 / 1_000.0, "K"),
        _ => trim_decimal(n as f64 / 1_000_000.0, "M"),
    }
}

fn trim_decimal(value: f64, suffix: &str) -> String {
    let rounded = (value * 10.0).floor() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{}{suffix}", rounded as u64)
    } else {
        format!("{rounded:.1}{suffix}")
    }
}
