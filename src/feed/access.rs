//! Who may play what: gates derived from the backend's access descriptor plus
//! purchases this session has verified.

use std::collections::HashSet;

use crate::api::{AccessType, VideoItem};
use crate::wallet::format_amount;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gate {
    Open,
    CreatorPass {
        creator_id: String,
        creator_name: String,
        price: u64,
    },
    VideoPurchase {
        video_id: String,
        title: String,
        price: u64,
    },
    SeriesPurchase {
        series_id: String,
        video_id: String,
        title: String,
        price: u64,
    },
}

impl Gate {
    pub fn is_open(&self) -> bool {
        matches!(self, Gate::Open)
    }

    pub fn price(&self) -> u64 {
        match self {
            Gate::Open => 0,
            Gate::CreatorPass { price, .. }
            | Gate::VideoPurchase { price, .. }
            | Gate::SeriesPurchase { price, .. } => *price,
        }
    }

    /// Text for the purchase prompt.
    pub fn prompt(&self) -> String {
        match self {
            Gate::Open => String::new(),
            Gate::CreatorPass {
                creator_name,
                price,
                ..
            } => format!(
                "Unlock every video by {creator_name} with a creator pass for {}",
                format_amount(*price)
            ),
            Gate::VideoPurchase { title, price, .. } => {
                format!("Buy \"{title}\" for {}", format_amount(*price))
            }
            Gate::SeriesPurchase { title, price, .. } => {
                format!("Buy the series \"{title}\" for {}", format_amount(*price))
            }
        }
    }

    pub fn short_label(&self) -> &'static str {
        match self {
            Gate::Open => "free",
            Gate::CreatorPass { .. } => "creator pass",
            Gate::VideoPurchase { .. } => "paid video",
            Gate::SeriesPurchase { .. } => "paid series",
        }
    }
}

/// Verified grants for the current session.
#[derive(Debug, Default)]
pub struct AccessGate {
    passes: HashSet<String>,
    videos: HashSet<String>,
    series: HashSet<String>,
}

impl AccessGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn decide(&self, item: &VideoItem) -> Gate {
        let access = &item.access;
        if access.is_playable || access.is_purchased {
            return Gate::Open;
        }
        let price = if access.price > 0 {
            access.price
        } else {
            item.amount
        };
        match (access.access_type, &item.series) {
            (AccessType::Free, _) => Gate::Open,
            (AccessType::CreatorPass, _) => {
                if self.passes.contains(&item.created_by.id) {
                    Gate::Open
                } else {
                    Gate::CreatorPass {
                        creator_id: item.created_by.id.clone(),
                        creator_name: item.created_by.display_name().to_string(),
                        price,
                    }
                }
            }
            (AccessType::PaidSeries, Some(series)) => {
                if self.series.contains(&series.id) {
                    Gate::Open
                } else {
                    Gate::SeriesPurchase {
                        series_id: series.id.clone(),
                        video_id: item.id.clone(),
                        title: series.title.clone(),
                        price: if series.price > 0 { series.price } else { price },
                    }
                }
            }
            _ => {
                if self.videos.contains(&item.id) {
                    Gate::Open
                } else {
                    Gate::VideoPurchase {
                        video_id: item.id.clone(),
                        title: item.name.clone(),
                        price,
                    }
                }
            }
        }
    }

    /// Records a purchase the backend has verified.
    pub fn grant(&mut self, gate: &Gate) {
        match gate {
            Gate::Open => {}
            Gate::CreatorPass { creator_id, .. } => {
                self.passes.insert(creator_id.clone());
            }
            Gate::VideoPurchase { video_id, .. } => {
                self.videos.insert(video_id.clone());
            }
            Gate::SeriesPurchase { series_id, .. } => {
                self.series.insert(series_id.clone());
            }
        }
    }

    pub fn revoke_all(&mut self) {
        self.passes.clear();
        self.videos.clear();
        self.series.clear();
    }
}
