use std::time::Duration;

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, warn};

use super::error::ApiError;
use super::types::{
    Ack, Comment, CommentsResponse, CreatorPassResponse, GiftResponse, LikeResponse, LoginKind,
    LoginResponse, Profile, ProfileResponse, ProfileTab, ResharesResponse, Series,
    SeriesResponse, ShareResponse, SingleVideoResponse, VideoItem, VideoListResponse, VideoStats,
    Wallet, WalletResponse,
};
use crate::feed::access::Gate;
use crate::feed::interaction::{Interaction, StatsPatch};
use crate::session::{Session, SessionStore};
use crate::wallet::format_amount;

pub const DEFAULT_API_BASE: &str = "https://api.vidfeed.app/api/v1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// One page of videos as returned by the backend.
#[derive(Debug, Clone)]
pub struct VideoPage {
    pub page: u32,
    /// Playable items, in backend order.
    pub items: Vec<VideoItem>,
    /// Entries the backend sent, including ones dropped while decoding.
    pub returned: usize,
}

/// REST client for the video backend. Cheap to clone; clones share the
/// connection pool and the session.
#[derive(Clone)]
pub struct VideoClient {
    http: reqwest::Client,
    base: String,
    session: SessionStore,
}

impl VideoClient {
    pub fn new(base: impl Into<String>, session: SessionStore) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base: base.into().trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Builds a request carrying the session's bearer token.
    fn authed(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let token = self.session.token().ok_or(ApiError::Unauthorized)?;
        Ok(self
            .http
            .request(method, self.url(path))
            .bearer_auth(token))
    }

    /// Sends a request and decodes a 2xx JSON body. Non-2xx bodies are parsed
    /// for the backend's error message.
    async fn send_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ApiError> {
        let resp = req.send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            warn!(status = status.as_u16(), "request failed");
            return Err(ApiError::from_response(status.as_u16(), &body));
        }
        Ok(serde_json::from_str(&body)?)
    }

    /// Like [`send_json`](Self::send_json) for `{success, message, error}`
    /// endpoints, where `success: false` is a failure regardless of status.
    async fn send_ack(&self, req: RequestBuilder, fallback: &str) -> Result<Ack, ApiError> {
        let resp = req.send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        if let Ok(ack) = serde_json::from_str::<Ack>(&body)
            && !ack.success
        {
            let msg = ack.error.or(ack.message).unwrap_or_else(|| fallback.into());
            return Err(ApiError::Rejected(msg));
        }
        if !status.is_success() {
            return Err(ApiError::from_response(status.as_u16(), &body));
        }
        Ok(serde_json::from_str(&body)?)
    }

    pub async fn fetch_videos(&self, page: u32, limit: u32) -> Result<VideoPage, ApiError> {
        debug!(page, limit, "fetching videos");
        let req = self
            .authed(Method::GET, "/videos/all-videos")?
            .query(&[("page", page), ("limit", limit)]);
        let resp: VideoListResponse = self.send_json(req).await?;
        let (items, returned) = resp.into_items();
        debug!(page, count = items.len(), returned, "fetched videos");
        Ok(VideoPage {
            page,
            items,
            returned,
        })
    }

    pub async fn fetch_video(&self, id: &str) -> Result<VideoItem, ApiError> {
        let req = self.authed(Method::GET, &format!("/videos/{id}"))?;
        let resp: SingleVideoResponse = self.send_json(req).await?;
        resp.data
            .or(resp.video)
            .and_then(VideoItem::from_raw)
            .ok_or_else(|| ApiError::Parse(format!("video {id} has no playable media")))
    }

    /// Issues the backend call for a counter-changing interaction and returns
    /// the new counters. `current` fills in when the backend omits a count.
    pub async fn interact(
        &self,
        video_id: &str,
        interaction: Interaction,
        current: VideoStats,
    ) -> Result<StatsPatch, ApiError> {
        match interaction {
            Interaction::Like => {
                let req = self
                    .authed(Method::POST, "/interactions/like")?
                    .json(&json!({ "videoId": video_id }));
                let resp: LikeResponse = self.send_json(req).await?;
                debug!(video_id, liked = resp.is_liked, "like toggled");
                Ok(StatsPatch::likes(resp.likes))
            }
            Interaction::Share => {
                let req = self
                    .authed(Method::POST, "/interactions/share")?
                    .json(&json!({ "videoId": video_id }));
                let resp: ShareResponse = self.send_json(req).await?;
                Ok(StatsPatch::shares(resp.shares))
            }
            Interaction::Gift { amount } => {
                let req = self
                    .authed(Method::POST, "/interactions/gift-video")?
                    .json(&json!({ "videoId": video_id, "amount": amount }));
                let resp: GiftResponse = self.send_json(req).await?;
                debug!(video_id, amount = resp.gift.amount, "gift sent");
                Ok(StatsPatch::gifts(
                    resp.gifts.unwrap_or(current.gifts.saturating_add(1)),
                ))
            }
        }
    }

    pub async fn fetch_comments(&self, video_id: &str) -> Result<Vec<Comment>, ApiError> {
        let req = self.authed(Method::GET, &format!("/videos/{video_id}/comments"))?;
        let resp: CommentsResponse = self.send_json(req).await?;
        Ok(resp.comments)
    }

    /// Sends a gift to a comment's author.
    pub async fn gift_comment(
        &self,
        video_id: &str,
        comment_id: &str,
        amount: u64,
    ) -> Result<(), ApiError> {
        let req = self
            .authed(Method::POST, "/interactions/gift-comment")?
            .json(&json!({
                "commentId": comment_id,
                "videoId": video_id,
                "videoType": "long",
                "amount": amount,
                "giftNote": format!("Gift of {}", format_amount(amount)),
            }));
        self.send_ack(req, "Failed to send gift").await?;
        debug!(video_id, comment_id, amount, "comment gift sent");
        Ok(())
    }

    pub async fn fetch_profile(&self, user_id: &str) -> Result<Profile, ApiError> {
        let req = self.authed(Method::GET, &format!("/user/profile/{user_id}"))?;
        let resp: ProfileResponse = self.send_json(req).await?;
        Ok(Profile::from_raw(user_id, resp.user))
    }

    /// One page of a profile tab. Reshares are not paginated, so every page
    /// request returns the full list.
    pub async fn fetch_profile_videos(
        &self,
        user_id: &str,
        tab: ProfileTab,
        page: u32,
        limit: u32,
    ) -> Result<VideoPage, ApiError> {
        debug!(user_id, tab = tab.query(), page, "fetching profile videos");
        let (items, returned) = match tab {
            ProfileTab::Reshares => {
                let req = self.authed(Method::GET, &format!("/user/reshares/{user_id}"))?;
                self.send_json::<ResharesResponse>(req).await?.into_items()
            }
            ProfileTab::Videos | ProfileTab::Liked => {
                let req = self
                    .authed(Method::GET, &format!("/user/videos/{user_id}"))?
                    .query(&[("type", tab.query())])
                    .query(&[("page", page), ("limit", limit)]);
                self.send_json::<VideoListResponse>(req).await?.into_items()
            }
        };
        Ok(VideoPage {
            page,
            items,
            returned,
        })
    }

    /// Exchanges credentials for a session. Does not store it.
    pub async fn login(&self, identifier: &str, password: &str) -> Result<Session, ApiError> {
        let kind = LoginKind::detect(identifier);
        let mut body = serde_json::Map::new();
        body.insert(kind.as_str().to_string(), json!(identifier));
        body.insert("password".to_string(), json!(password));
        let req = self
            .http
            .post(self.url(&format!("/auth/login/{}", kind.as_str())))
            .json(&body);
        let resp: LoginResponse = self.send_json(req).await?;
        Ok(Session {
            token: resp.token,
            user: resp.user,
        })
    }

    /// Follows or unfollows a creator. Returns the new follow state.
    pub async fn set_following(&self, creator_id: &str, follow: bool) -> Result<bool, ApiError> {
        let path = if follow {
            "/user/follow"
        } else {
            "/user/unfollow"
        };
        let req = self
            .authed(Method::POST, path)?
            .json(&json!({ "followUserId": creator_id }));
        self.send_ack(req, "Failed to update follow").await?;
        Ok(follow)
    }

    pub async fn has_creator_pass(&self, creator_id: &str) -> Result<bool, ApiError> {
        let req = self.authed(Method::GET, &format!("/user/has-creator-pass/{creator_id}"))?;
        let resp: CreatorPassResponse = self.send_json(req).await?;
        Ok(resp.has_creator_pass)
    }

    /// Buys whatever the gate asks for, then asks the backend whether access
    /// was actually granted. Returns the verification result.
    pub async fn purchase(&self, gate: &Gate) -> Result<bool, ApiError> {
        match gate {
            Gate::Open => Ok(true),
            Gate::CreatorPass { creator_id, .. } => {
                let req = self
                    .authed(Method::POST, "/creator-pass/purchase")?
                    .json(&json!({ "creatorId": creator_id }));
                self.send_ack(req, "Failed to buy creator pass").await?;
                self.has_creator_pass(creator_id).await
            }
            Gate::VideoPurchase {
                video_id, price, ..
            } => {
                let req = self
                    .authed(Method::POST, "/wallet/purchase-video")?
                    .json(&json!({ "videoId": video_id, "amount": price }));
                self.send_ack(req, "Failed to buy video").await?;
                self.verify_video_access(video_id).await
            }
            Gate::SeriesPurchase {
                series_id,
                video_id,
                price,
                ..
            } => {
                let req = self
                    .authed(Method::POST, "/wallet/transfer-series")?
                    .json(&json!({ "seriesId": series_id, "amount": price }));
                self.send_ack(req, "Failed to buy series").await?;
                self.verify_video_access(video_id).await
            }
        }
    }

    async fn verify_video_access(&self, video_id: &str) -> Result<bool, ApiError> {
        let item = self.fetch_video(video_id).await?;
        Ok(item.access.is_purchased || item.access.is_playable)
    }

    pub async fn fetch_wallet(&self) -> Result<Wallet, ApiError> {
        let req = self.authed(Method::GET, "/wallet/")?;
        let resp: WalletResponse = self.send_json(req).await?;
        Ok(resp.into_wallet())
    }

    /// Creates a manual withdrawal request. Returns the backend's message.
    pub async fn withdraw(&self, amount: u64) -> Result<String, ApiError> {
        let req = self
            .authed(Method::POST, "/withdrawal/manual/create")?
            .json(&json!({ "amount": amount }));
        let ack = self
            .send_ack(req, "Failed to create withdrawal request")
            .await?;
        Ok(ack
            .message
            .unwrap_or_else(|| "Withdrawal request created".into()))
    }

    /// Lists series. "No series" answers are an empty list, not an error.
    pub async fn fetch_series(&self) -> Result<Vec<Series>, ApiError> {
        let req = self.authed(Method::GET, "/series/all")?;
        match self.send_json::<SeriesResponse>(req).await {
            Ok(resp) => Ok(resp.data),
            Err(ApiError::HttpStatus(404, _)) => Ok(Vec::new()),
            Err(ApiError::HttpStatus(_, msg)) if msg.to_lowercase().contains("no series") => {
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{AccessType, User};
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn logged_in() -> SessionStore {
        SessionStore::in_memory(Some(Session {
            token: "tok".to_string(),
            user: User {
                id: "u1".to_string(),
                username: "maya".to_string(),
                name: None,
                email: None,
            },
        }))
    }

    fn client_for(server: &MockServer) -> VideoClient {
        VideoClient::new(server.uri(), logged_in()).unwrap()
    }

    fn video_json(id: &str) -> serde_json::Value {
        json!({
            "_id": id,
            "name": format!("Video {id}"),
            "videoUrl": format!("https://cdn.example.com/{id}.mp4"),
            "created_by": { "_id": "c1", "username": "maya" },
            "likes": 3,
            "gifts": 1
        })
    }

    #[tokio::test]
    async fn fetch_videos_sends_paging_and_bearer() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/videos/all-videos"))
            .and(query_param("page", "2"))
            .and(query_param("limit", "6"))
            .and(header("authorization", "Bearer tok"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "data": [video_json("a"), video_json("b")] })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let page = client_for(&server).fetch_videos(2, 6).await.unwrap();

        assert_eq!(page.page, 2);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].id, "a");
    }

    #[tokio::test]
    async fn fetch_videos_accepts_videos_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/videos/all-videos"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "videos": [video_json("a")] })),
            )
            .mount(&server)
            .await;

        let page = client_for(&server).fetch_videos(1, 6).await.unwrap();
        assert_eq!(page.items.len(), 1);
    }

    #[tokio::test]
    async fn full_page_with_unplayable_entry_reports_raw_count() {
        let server = MockServer::start().await;
        let mut entries: Vec<_> = ["a", "b", "c", "d", "e"].iter().map(|id| video_json(id)).collect();
        let mut no_media = video_json("f");
        no_media["videoUrl"] = json!("");
        entries.push(no_media);
        Mock::given(method("GET"))
            .and(path("/videos/all-videos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": entries })))
            .mount(&server)
            .await;

        let page = client_for(&server).fetch_videos(1, 6).await.unwrap();

        assert_eq!(page.items.len(), 5);
        assert_eq!(page.returned, 6);
    }

    #[tokio::test]
    async fn null_fields_do_not_fail_the_page() {
        let server = MockServer::start().await;
        let mut nulls = video_json("b");
        nulls["created_by"] = json!(null);
        nulls["likes"] = json!(null);
        Mock::given(method("GET"))
            .and(path("/videos/all-videos"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "data": [video_json("a"), nulls, "garbage"] })),
            )
            .mount(&server)
            .await;

        let page = client_for(&server).fetch_videos(1, 6).await.unwrap();

        assert_eq!(page.returned, 3);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[1].stats.likes, 0);
        assert_eq!(page.items[1].created_by.username, "");
    }

    #[tokio::test]
    async fn non_2xx_carries_backend_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/videos/all-videos"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({ "message": "database down" })),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).fetch_videos(1, 6).await.unwrap_err();
        assert_eq!(err, ApiError::HttpStatus(500, "database down".into()));
    }

    #[tokio::test]
    async fn malformed_json_is_a_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/videos/all-videos"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch_videos(1, 6).await.unwrap_err();
        assert!(matches!(err, ApiError::Parse(_)));
    }

    #[tokio::test]
    async fn no_session_fails_before_sending() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = VideoClient::new(server.uri(), SessionStore::in_memory(None)).unwrap();
        let err = client.fetch_videos(1, 6).await.unwrap_err();
        assert_eq!(err, ApiError::Unauthorized);
    }

    #[tokio::test]
    async fn like_returns_new_count() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/interactions/like"))
            .and(body_json(json!({ "videoId": "a" })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "likes": 11, "isLiked": true })),
            )
            .mount(&server)
            .await;

        let patch = client_for(&server)
            .interact("a", Interaction::Like, VideoStats::default())
            .await
            .unwrap();
        assert_eq!(patch, StatsPatch::likes(11));
    }

    #[tokio::test]
    async fn gift_without_count_increments_current() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/interactions/gift-video"))
            .and(body_json(json!({ "videoId": "a", "amount": 20 })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "gift": { "amount": 20 } })),
            )
            .mount(&server)
            .await;

        let current = VideoStats {
            gifts: 4,
            ..Default::default()
        };
        let patch = client_for(&server)
            .interact("a", Interaction::Gift { amount: 20 }, current)
            .await
            .unwrap();
        assert_eq!(patch, StatsPatch::gifts(5));
    }

    #[tokio::test]
    async fn gift_comment_posts_comment_and_video() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/interactions/gift-comment"))
            .and(body_json(json!({
                "commentId": "k1",
                "videoId": "a",
                "videoType": "long",
                "amount": 25,
                "giftNote": "Gift of ₹25"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok" })))
            .expect(1)
            .mount(&server)
            .await;

        tokio_test::assert_ok!(client_for(&server).gift_comment("a", "k1", 25).await);
    }

    #[tokio::test]
    async fn gift_comment_surfaces_backend_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/interactions/gift-comment"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({ "error": "Comment not monetized" })),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).gift_comment("a", "k1", 25).await.unwrap_err();
        assert_eq!(err.user_message(), "Comment not monetized");
    }

    #[tokio::test]
    async fn fetch_profile_reads_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user/profile/c1"))
            .and(header("authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "user": {
                    "isBeingFollowed": false,
                    "totalFollowers": 42,
                    "userDetails": { "_id": "c1", "username": "maya" }
                }
            })))
            .mount(&server)
            .await;

        let profile = client_for(&server).fetch_profile("c1").await.unwrap();
        assert_eq!(profile.username, "maya");
        assert_eq!(profile.followers, 42);
        assert!(!profile.is_following);
    }

    #[tokio::test]
    async fn profile_videos_query_the_tab() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user/videos/c1"))
            .and(query_param("type", "liked"))
            .and(query_param("page", "2"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "videos": [video_json("a")] })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let page = client_for(&server)
            .fetch_profile_videos("c1", ProfileTab::Liked, 2, 6)
            .await
            .unwrap();
        assert_eq!(page.page, 2);
        assert_eq!(page.items[0].id, "a");
    }

    #[tokio::test]
    async fn reshares_use_their_own_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user/reshares/c1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "reshares": [{ "_id": "r1", "long_video": video_json("b") }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let page = client_for(&server)
            .fetch_profile_videos("c1", ProfileTab::Reshares, 1, 6)
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, "b");
    }

    #[tokio::test]
    async fn creator_pass_purchase_is_verified() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/creator-pass/purchase"))
            .and(body_json(json!({ "creatorId": "c1" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/user/has-creator-pass/c1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "hasCreatorPass": true })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let gate = Gate::CreatorPass {
            creator_id: "c1".into(),
            creator_name: "maya".into(),
            price: 99,
        };
        assert!(client_for(&server).purchase(&gate).await.unwrap());
    }

    #[tokio::test]
    async fn video_purchase_reports_failed_verification() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/wallet/purchase-video"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .mount(&server)
            .await;
        let mut still_locked = video_json("a");
        still_locked["access"] = json!({
            "isPurchased": false,
            "isPlayable": false,
            "accessType": "paid_video",
            "price": 10
        });
        Mock::given(method("GET"))
            .and(path("/videos/a"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": still_locked })))
            .mount(&server)
            .await;

        let gate = Gate::VideoPurchase {
            video_id: "a".into(),
            title: "Video a".into(),
            price: 10,
        };
        assert!(!client_for(&server).purchase(&gate).await.unwrap());
    }

    #[tokio::test]
    async fn purchase_rejected_body_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/wallet/purchase-video"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({ "success": false, "error": "Insufficient wallet balance" }),
            ))
            .mount(&server)
            .await;

        let gate = Gate::VideoPurchase {
            video_id: "a".into(),
            title: "Video a".into(),
            price: 10,
        };
        let err = client_for(&server).purchase(&gate).await.unwrap_err();
        assert_eq!(err, ApiError::Rejected("Insufficient wallet balance".into()));
    }

    #[tokio::test]
    async fn withdraw_success_false_on_200_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/withdrawal/manual/create"))
            .and(body_json(json!({ "amount": 150 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({ "success": false, "error": "No UPI ID on file" }),
            ))
            .mount(&server)
            .await;

        let err = client_for(&server).withdraw(150).await.unwrap_err();
        assert_eq!(err.user_message(), "No UPI ID on file");
    }

    #[tokio::test]
    async fn withdraw_returns_backend_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/withdrawal/manual/create"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({ "success": true, "message": "Request queued" }),
            ))
            .mount(&server)
            .await;

        let msg = tokio_test::assert_ok!(client_for(&server).withdraw(150).await);
        assert_eq!(msg, "Request queued");
    }

    #[tokio::test]
    async fn missing_series_is_empty_not_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/series/all"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({ "message": "No series found" })),
            )
            .mount(&server)
            .await;

        let series = client_for(&server).fetch_series().await.unwrap();
        assert!(series.is_empty());
    }

    #[tokio::test]
    async fn login_uses_email_endpoint_for_emails() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login/email"))
            .and(body_json(json!({ "email": "maya@example.com", "password": "pw" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token": "fresh",
                "user": { "_id": "u1", "username": "maya" }
            })))
            .mount(&server)
            .await;

        let client = VideoClient::new(server.uri(), SessionStore::in_memory(None)).unwrap();
        let session = client.login("maya@example.com", "pw").await.unwrap();
        assert_eq!(session.token, "fresh");
        assert_eq!(session.user.username, "maya");
    }

    #[tokio::test]
    async fn fetch_video_reads_access() {
        let server = MockServer::start().await;
        let mut locked = video_json("z");
        locked["access"] = json!({ "isPlayable": false, "accessType": "creator_pass" });
        Mock::given(method("GET"))
            .and(path("/videos/z"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "video": locked })))
            .mount(&server)
            .await;

        let item = client_for(&server).fetch_video("z").await.unwrap();
        assert_eq!(item.access.access_type, AccessType::CreatorPass);
        assert!(!item.access.is_playable);
    }
}
