//! Rendering tests against ratatui's test backend.

use ratatui::{Frame, Terminal, backend::TestBackend};

use crate::api::{AccessDescriptor, AccessType, Wallet};
use crate::api::ProfileTab;
use crate::app::{App, CommentsState, GiftComment, Modal, View};
use crate::feed::Gate;
use crate::test_utils::{
    TestAppBuilder, VideoBuilder, sample_comments, sample_profile, sample_videos,
};

pub fn render_to_string<F>(width: u16, height: u16, render_fn: F) -> String
where
    F: FnOnce(&mut Frame),
{
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(render_fn).unwrap();
    let buffer = terminal.backend().buffer().clone();
    let mut output = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            output.push(buffer[(x, y)].symbol().chars().next().unwrap_or(' '));
        }
        output.push('\n');
    }
    output
}

fn render_app(app: &App) -> String {
    render_to_string(80, 24, |frame| crate::render(app, frame))
}

#[test]
fn feed_shows_active_card() {
    let app = TestAppBuilder::new()
        .with_videos(sample_videos())
        .viewport_height(24)
        .build();

    let output = render_app(&app);

    assert!(output.contains("1/5"));
    assert!(output.contains("Sunrise over the ghats"));
    assert!(output.contains("@maya"));
    assert!(output.contains("1d ago"));
    assert!(output.contains("1.2K"));
    assert!(output.contains("Morning light on the river steps."));
    // Only one card fits
    assert!(!output.contains("Street food tour"));
}

#[test]
fn feed_status_bar_shows_position_and_help() {
    let app = TestAppBuilder::new()
        .with_videos(sample_videos())
        .viewport_height(24)
        .build();

    let output = render_app(&app);
    let status = output.lines().last().unwrap();

    assert!(status.contains("Feed"));
    assert!(status.contains("1/5"));
    assert!(status.contains("j/k:nav"));
    assert!(status.contains("recording"));
}

#[test]
fn half_scrolled_feed_shows_two_cards() {
    let mut app = TestAppBuilder::new()
        .with_videos(sample_videos())
        .viewport_height(24)
        .build();
    app.scroll_rows = 12;

    let output = render_app(&app);

    assert!(output.contains("2/5"));
    assert!(output.contains("Street food tour"));
}

#[test]
fn locked_card_shows_price() {
    let locked = VideoBuilder::new()
        .id("p1")
        .name("Premium cut")
        .access(AccessDescriptor {
            is_purchased: false,
            is_playable: false,
            access_type: AccessType::PaidVideo,
            price: 49,
        })
        .build();
    let app = TestAppBuilder::new()
        .with_videos(vec![locked])
        .viewport_height(24)
        .build();

    let output = render_app(&app);

    assert!(output.contains("paid video"));
    assert!(output.contains("₹49"));
    assert!(output.contains("Space to unlock"));
}

#[test]
fn empty_feed_with_error_offers_retry() {
    let mut app = TestAppBuilder::new().logged_out().build();
    app.load_feed();

    let output = render_app(&app);

    assert!(output.contains("Error"));
    assert!(output.contains("Please log in"));
    assert!(output.contains("Press r to retry"));
}

#[test]
fn empty_feed_without_error() {
    let app = TestAppBuilder::new().build();
    let output = render_app(&app);
    assert!(output.contains("No videos yet"));
}

#[test]
fn single_video_screen() {
    let app = TestAppBuilder::new()
        .with_videos(sample_videos())
        .view(View::Video { id: "v3".into() })
        .build();

    let output = render_app(&app);

    assert!(output.contains("shared video"));
    assert!(output.contains("Monsoon timelapse"));
    assert!(output.contains("15.4K"));
    assert!(output.contains("Esc:feed"));
}

#[test]
fn wallet_screen_shows_balance() {
    let mut app = TestAppBuilder::new().view(View::Wallet).build();
    app.wallet.wallet = Some(Wallet { balance: 250 });

    let output = render_app(&app);

    assert!(output.contains("Wallet"));
    assert!(output.contains("₹250"));
    assert!(output.contains("@viewer"));
    assert!(output.contains("₹100"));
}

#[test]
fn comments_sheet_lists_comments() {
    let app = TestAppBuilder::new()
        .with_videos(sample_videos())
        .modal(Modal::Comments(CommentsState {
            video_id: "v1".into(),
            comments: sample_comments(),
            loading: false,
            error: None,
            scroll: 0,
        }))
        .build();

    let output = render_app(&app);

    assert!(output.contains("Comments (2)"));
    assert!(output.contains("@traveller"));
    assert!(output.contains("where was it shot?"));
    assert!(output.contains("1 reply"));
    assert!(output.contains("j/k:scroll"));
}

#[test]
fn gift_prompt_shows_input_and_error() {
    let app = TestAppBuilder::new()
        .with_videos(sample_videos())
        .modal(Modal::Gift {
            video_id: "v1".into(),
            input: "500".into(),
            balance: Some(20),
            error: Some("Insufficient balance".into()),
            comment: None,
        })
        .build();

    let output = render_app(&app);

    assert!(output.contains("Send a gift"));
    assert!(output.contains("₹500"));
    assert!(output.contains("₹20"));
    assert!(output.contains("Insufficient balance"));
    assert!(output.contains("Enter:send"));
}

#[test]
fn comment_gift_prompt_names_author() {
    let sheet = CommentsState {
        video_id: "v1".into(),
        comments: sample_comments(),
        loading: false,
        error: None,
        scroll: 0,
    };
    let app = TestAppBuilder::new()
        .with_videos(sample_videos())
        .modal(Modal::Gift {
            video_id: "v1".into(),
            input: "10".into(),
            balance: Some(200),
            error: None,
            comment: Some(GiftComment {
                id: "cm1".into(),
                author: "traveller".into(),
                sheet,
            }),
        })
        .build();

    let output = render_app(&app);

    assert!(output.contains("Gift @traveller"));
    assert!(output.contains("₹10"));
}

#[test]
fn profile_shows_header_tabs_and_videos() {
    let mut app = TestAppBuilder::new()
        .view(View::Profile { id: "c1".into() })
        .build();
    let state = app.profile.as_mut().unwrap();
    state.profile = Some(sample_profile());
    state.videos.apply_page(1, sample_videos(), 5);

    let output = render_app(&app);

    assert!(output.contains("Maya Rao"));
    assert!(output.contains("@maya"));
    assert!(output.contains("1.2K followers"));
    assert!(output.contains("₹99/month"));
    assert!(output.contains("Videos"));
    assert!(output.contains("Reshares"));
    assert!(output.contains("Sunrise over the ghats"));
    assert!(output.lines().last().unwrap().contains("Profile"));
}

#[test]
fn profile_without_videos_says_so() {
    let mut app = TestAppBuilder::new()
        .view(View::Profile { id: "c1".into() })
        .build();
    let state = app.profile.as_mut().unwrap();
    state.profile = Some(sample_profile());
    state.tab = ProfileTab::Reshares;
    state.videos.apply_page(1, Vec::new(), 0);

    let output = render_app(&app);

    assert!(output.contains("Nothing here yet."));
}

#[test]
fn purchase_prompt_describes_gate() {
    let app = TestAppBuilder::new()
        .modal(Modal::Purchase {
            gate: Gate::CreatorPass {
                creator_id: "c1".into(),
                creator_name: "maya".into(),
                price: 99,
            },
            pending: false,
        })
        .build();

    let output = render_app(&app);

    assert!(output.contains("Creator pass"));
    assert!(output.contains("maya"));
    assert!(output.contains("₹99"));
    assert!(output.contains("Enter:buy"));
}

#[test]
fn pending_purchase_hides_controls() {
    let app = TestAppBuilder::new()
        .modal(Modal::Purchase {
            gate: Gate::VideoPurchase {
                video_id: "p1".into(),
                title: "Premium".into(),
                price: 10,
            },
            pending: true,
        })
        .build();

    let output = render_app(&app);

    assert!(output.contains("Processing purchase"));
    assert!(output.contains("Premium"));
}

#[test]
fn alert_popup() {
    let app = TestAppBuilder::new()
        .modal(Modal::Alert {
            title: "Gift failed".into(),
            message: "Insufficient balance".into(),
        })
        .build();

    let output = render_app(&app);

    assert!(output.contains("Gift failed"));
    assert!(output.contains("Insufficient balance"));
}

#[test]
fn debug_pane_shows_player() {
    let app = TestAppBuilder::new()
        .with_videos(sample_videos())
        .debug_visible()
        .build();

    let output = render_app(&app);

    assert!(output.contains("Debug"));
    assert!(output.contains("recording Playing v1"));
}
