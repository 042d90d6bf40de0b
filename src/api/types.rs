use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::feed::interaction::StatsPatch;

/// Reads an explicit `null` as the type's default. Pair with
/// `#[serde(default)]` so a missing key behaves the same way.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Creator {
    #[serde(rename = "_id", default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub username: String,
    pub name: Option<String>,
    pub profile_photo: Option<String>,
}

impl Creator {
    /// Display name, falling back to the username.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.username)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SeriesRef {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub price: u64,
    #[serde(rename = "type", default)]
    pub access_type: Option<String>,
}

/// How the backend describes who may watch an item.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessDescriptor {
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_purchased: bool,
    #[serde(default = "default_true")]
    pub is_playable: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub access_type: AccessType,
    #[serde(default, deserialize_with = "null_as_default")]
    pub price: u64,
}

impl Default for AccessDescriptor {
    fn default() -> Self {
        Self {
            is_purchased: false,
            is_playable: true,
            access_type: AccessType::Free,
            price: 0,
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessType {
    #[default]
    Free,
    CreatorPass,
    PaidVideo,
    PaidSeries,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct VideoStats {
    pub likes: u64,
    pub shares: u64,
    pub gifts: u64,
    pub comments: u64,
}

/// Raw backend shape. Counters arrive in a few different encodings, so the
/// conversion to [`VideoItem`] normalizes them. Older uploads carry `null`
/// for fields they never set.
#[derive(Debug, Clone, Deserialize)]
pub struct RawVideo {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(alias = "videoUrl")]
    pub video_url: Option<String>,
    #[serde(alias = "thumbnailUrl")]
    pub thumbnail_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_by: Creator,
    #[serde(default, deserialize_with = "null_as_default")]
    pub amount: u64,
    #[serde(default, alias = "isMonetized", deserialize_with = "null_as_default")]
    pub is_monetized: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub likes: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub shares: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub gifts: u64,
    #[serde(default)]
    pub comments: Option<serde_json::Value>,
    #[serde(default)]
    pub series: Option<SeriesRef>,
    #[serde(alias = "episodeNumber")]
    pub episode_number: Option<u32>,
    #[serde(
        default,
        alias = "isFollowingCreator",
        deserialize_with = "null_as_default"
    )]
    pub is_following_creator: bool,
    #[serde(default)]
    pub access: Option<AccessDescriptor>,
    #[serde(alias = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VideoItem {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub video_url: String,
    pub thumbnail_url: Option<String>,
    pub created_by: Creator,
    pub amount: u64,
    pub is_monetized: bool,
    pub stats: VideoStats,
    pub series: Option<SeriesRef>,
    pub episode_number: Option<u32>,
    pub is_following_creator: bool,
    pub access: AccessDescriptor,
    pub created_at: Option<DateTime<Utc>>,
}

impl VideoItem {
    /// Converts the backend shape, dropping entries with no media URL.
    pub fn from_raw(raw: RawVideo) -> Option<Self> {
        let video_url = raw.video_url.filter(|u| !u.is_empty())?;
        // Comments come either as a count or as the full array.
        let comments = match raw.comments {
            Some(serde_json::Value::Array(list)) => list.len() as u64,
            Some(serde_json::Value::Number(n)) => n.as_u64().unwrap_or(0),
            _ => 0,
        };
        Some(VideoItem {
            id: raw.id,
            name: raw.name,
            description: raw.description,
            video_url,
            thumbnail_url: raw.thumbnail_url,
            created_by: raw.created_by,
            amount: raw.amount,
            is_monetized: raw.is_monetized,
            stats: VideoStats {
                likes: raw.likes,
                shares: raw.shares,
                gifts: raw.gifts,
                comments,
            },
            series: raw.series,
            episode_number: raw.episode_number,
            is_following_creator: raw.is_following_creator,
            access: raw.access.unwrap_or_default(),
            created_at: raw.created_at,
        })
    }

    pub fn apply(&mut self, patch: &StatsPatch) {
        patch.apply(&mut self.stats);
    }

    /// Label shown in headers: "Series Title · Ep 3" or just the name.
    pub fn heading(&self) -> String {
        match (&self.series, self.episode_number) {
            (Some(series), Some(ep)) => format!("{} · Ep {} · {}", series.title, ep, self.name),
            _ => self.name.clone(),
        }
    }
}

/// Decodes one listed entry. A malformed entry is skipped rather than
/// failing the whole page.
fn decode_video(value: serde_json::Value) -> Option<VideoItem> {
    match serde_json::from_value::<RawVideo>(value) {
        Ok(raw) => VideoItem::from_raw(raw),
        Err(e) => {
            warn!(error = %e, "skipping undecodable video");
            None
        }
    }
}

/// Page listing envelope: the backend uses either `data` or `videos`.
#[derive(Debug, Deserialize)]
pub struct VideoListResponse {
    pub data: Option<Vec<serde_json::Value>>,
    pub videos: Option<Vec<serde_json::Value>>,
}

impl VideoListResponse {
    /// Playable items plus the number of entries the backend sent. Paging
    /// decisions use the raw count, since filtering can shorten a full page.
    pub fn into_items(self) -> (Vec<VideoItem>, usize) {
        let entries = self.data.or(self.videos).unwrap_or_default();
        let returned = entries.len();
        let items = entries.into_iter().filter_map(decode_video).collect();
        (items, returned)
    }
}

/// Reshares wrap the shared video in `long_video`.
#[derive(Debug, Deserialize)]
pub struct ResharesResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub reshares: Vec<serde_json::Value>,
}

impl ResharesResponse {
    pub fn into_items(self) -> (Vec<VideoItem>, usize) {
        let returned = self.reshares.len();
        let items = self
            .reshares
            .into_iter()
            .filter_map(|mut entry| entry.get_mut("long_video").map(serde_json::Value::take))
            .filter_map(decode_video)
            .collect();
        (items, returned)
    }
}

#[derive(Debug, Deserialize)]
pub struct SingleVideoResponse {
    pub data: Option<RawVideo>,
    pub video: Option<RawVideo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub username: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginKind {
    Email,
    Username,
}

impl LoginKind {
    /// Picks the login endpoint from the identifier's shape.
    pub fn detect(identifier: &str) -> Self {
        let looks_like_email = identifier
            .split_once('@')
            .is_some_and(|(local, domain)| {
                !local.is_empty()
                    && !local.contains(char::is_whitespace)
                    && domain.contains('.')
                    && !domain.starts_with('.')
                    && !domain.ends_with('.')
                    && !domain.contains(char::is_whitespace)
            });
        if looks_like_email {
            LoginKind::Email
        } else {
            LoginKind::Username
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LoginKind::Email => "email",
            LoginKind::Username => "username",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommentAuthor {
    #[serde(default)]
    pub username: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: String,
    pub content: String,
    pub user: CommentAuthor,
    #[serde(default)]
    pub upvotes: u64,
    #[serde(default)]
    pub replies: u64,
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct CommentsResponse {
    #[serde(default)]
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Wallet {
    #[serde(default)]
    pub balance: u64,
}

#[derive(Debug, Deserialize)]
pub struct WalletResponse {
    pub wallet: Option<Wallet>,
    pub balance: Option<u64>,
}

impl WalletResponse {
    pub fn into_wallet(self) -> Wallet {
        self.wallet.unwrap_or(Wallet {
            balance: self.balance.unwrap_or(0),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Series {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub total_episodes: u32,
    #[serde(rename = "type", default)]
    pub access_type: Option<String>,
    #[serde(default)]
    pub price: u64,
}

impl Series {
    pub fn is_paid(&self) -> bool {
        self.access_type.as_deref() == Some("Paid")
    }
}

#[derive(Debug, Deserialize)]
pub struct SeriesResponse {
    #[serde(default)]
    pub data: Vec<Series>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    pub likes: u64,
    #[serde(default)]
    pub is_liked: bool,
}

#[derive(Debug, Deserialize)]
pub struct ShareResponse {
    pub shares: u64,
}

#[derive(Debug, Deserialize)]
pub struct GiftRecord {
    pub amount: u64,
}

#[derive(Debug, Deserialize)]
pub struct GiftResponse {
    pub gift: GiftRecord,
    pub gifts: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatorPassResponse {
    pub has_creator_pass: bool,
}

/// Video tabs on a profile page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProfileTab {
    #[default]
    Videos,
    Liked,
    Reshares,
}

impl ProfileTab {
    pub const ALL: [ProfileTab; 3] = [ProfileTab::Videos, ProfileTab::Liked, ProfileTab::Reshares];

    /// Value of the `type` query parameter on `/user/videos/{id}`.
    pub fn query(&self) -> &'static str {
        match self {
            ProfileTab::Videos => "long",
            ProfileTab::Liked => "liked",
            ProfileTab::Reshares => "repost",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProfileTab::Videos => "Videos",
            ProfileTab::Liked => "Liked",
            ProfileTab::Reshares => "Reshares",
        }
    }

    pub fn next(self) -> Self {
        match self {
            ProfileTab::Videos => ProfileTab::Liked,
            ProfileTab::Liked => ProfileTab::Reshares,
            ProfileTab::Reshares => ProfileTab::Videos,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatorProfile {
    #[serde(default, deserialize_with = "null_as_default")]
    pub creator_pass_price: u64,
    pub verification_status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserDetails {
    #[serde(rename = "_id", default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub username: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub creator_profile: Option<CreatorProfile>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProfile {
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_being_followed: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_followers: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_details: UserDetails,
    #[serde(rename = "creator_profile")]
    pub creator_profile: Option<CreatorProfile>,
    pub website: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProfileResponse {
    pub user: RawProfile,
}

/// A creator's public profile header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub id: String,
    pub username: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub website: Option<String>,
    pub followers: u64,
    pub is_following: bool,
    pub creator_pass_price: u64,
    pub verified: bool,
}

impl Profile {
    pub fn from_raw(id: &str, raw: RawProfile) -> Self {
        let details = raw.user_details;
        let creator = details.creator_profile.unwrap_or_default();
        let verified = raw
            .creator_profile
            .as_ref()
            .or(Some(&creator))
            .and_then(|c| c.verification_status.as_deref())
            == Some("verified");
        Self {
            id: if details.id.is_empty() {
                id.to_string()
            } else {
                details.id
            },
            username: details.username,
            name: details.name,
            bio: details.bio.filter(|b| !b.trim().is_empty()),
            website: raw.website.filter(|w| !w.is_empty()),
            followers: raw.total_followers,
            is_following: raw.is_being_followed,
            creator_pass_price: creator.creator_pass_price,
            verified,
        }
    }

    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.username)
    }

    /// Applies a follow toggle to the header counters.
    pub fn set_following(&mut self, following: bool) {
        if following == self.is_following {
            return;
        }
        self.is_following = following;
        self.followers = if following {
            self.followers.saturating_add(1)
        } else {
            self.followers.saturating_sub(1)
        };
    }
}

/// Generic `{success, message, error}` envelope used by transactional endpoints.
#[derive(Debug, Deserialize)]
pub struct Ack {
    #[serde(default = "default_true")]
    pub success: bool,
    pub message: Option<String>,
    pub error: Option<String>,
}
