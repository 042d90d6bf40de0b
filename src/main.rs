mod api;
mod app;
mod cli;
mod deeplink;
mod event;
mod feed;
mod help;
mod keys;
mod logging;
mod media;
mod session;
mod settings;
mod store;
mod theme;
mod time;
mod tui;
mod views;
mod wallet;

#[cfg(test)]
mod test_utils;

use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::Parser;
use ratatui::Frame;
use tracing::{info, warn};

use api::VideoClient;
use app::{App, AppContext, Message, View};
use cli::{Cli, Commands, WalletCommands};
use deeplink::Route;
use event::Event;
use media::{ActivePlayer, backend_for};
use session::SessionStore;
use settings::Settings;
use store::SharedVideoStore;
use theme::{Theme, ThemeVariant, all_themes, by_name, default_for_variant, detect_terminal_theme};
use tui::EventHandler;

#[tokio::main]
async fn main() -> Result<()> {
    let mut cli = Cli::parse();

    let config_dir = settings::config_dir(cli.config_dir.as_ref())
        .context("Could not determine config directory")?;
    let _log_guard = logging::init(&config_dir, cli.verbose)?;
    if cli.verbose {
        eprintln!("Logging to {}", logging::log_dir(&config_dir).display());
    }

    let settings = load_settings(&config_dir);
    let session = SessionStore::load(&settings::session_path(&config_dir))?;
    let api_base = cli
        .api_url
        .clone()
        .unwrap_or_else(|| settings.api_base_url().to_string());
    let client = VideoClient::new(api_base, session)?;

    match cli.command.take() {
        Some(Commands::Login {
            identifier,
            password,
        }) => login(&client, &identifier, password).await,
        Some(Commands::Logout) => {
            client.session().logout()?;
            println!("Logged out.");
            Ok(())
        }
        Some(Commands::Open { url }) => {
            let route = deeplink::parse(&url, settings.share_prefix())?;
            run_tui(&cli, &settings, client, Some(route)).await
        }
        Some(Commands::Wallet(args)) => wallet_command(&client, args.command).await,
        Some(Commands::Series) => list_series(&client).await,
        Some(Commands::Theme { name }) => theme_command(&config_dir, settings, name),
        None => run_tui(&cli, &settings, client, None).await,
    }
}

fn load_settings(config_dir: &Path) -> Settings {
    let path = settings::settings_path(config_dir);
    Settings::load(&path).unwrap_or_else(|e| {
        eprintln!("Warning: {:#}", e);
        warn!(error = %e, "using default settings");
        Settings::default()
    })
}

fn read_password() -> Result<String> {
    print!("Password: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read password")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

async fn login(client: &VideoClient, identifier: &str, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => read_password()?,
    };
    if identifier.trim().is_empty() || password.is_empty() {
        bail!("Identifier and password are required");
    }
    let session = client.login(identifier.trim(), &password).await?;
    let username = session.user.username.clone();
    client.session().login(session)?;
    println!("Logged in as @{username}.");
    Ok(())
}

async fn wallet_command(client: &VideoClient, command: WalletCommands) -> Result<()> {
    let current = client.fetch_wallet().await?;
    match command {
        WalletCommands::Balance => {
            println!("Balance: {}", wallet::format_amount(current.balance));
        }
        WalletCommands::Withdraw { amount } => {
            let amount = wallet::validate_withdrawal(amount, current.balance)?;
            let message = client.withdraw(amount).await?;
            info!(amount, "withdrawal requested");
            println!("{message}");
        }
    }
    Ok(())
}

async fn list_series(client: &VideoClient) -> Result<()> {
    let series = client.fetch_series().await?;
    if series.is_empty() {
        println!("No series yet.");
        return Ok(());
    }
    for s in series {
        let access = match s.access_type.as_deref() {
            Some(kind) if !kind.eq_ignore_ascii_case("free") => {
                format!("{kind} {}", wallet::format_amount(s.price))
            }
            _ => "free".to_string(),
        };
        println!(
            "{:<32} {:>3} episodes  {}",
            s.title, s.total_episodes, access
        );
    }
    Ok(())
}

fn theme_command(config_dir: &Path, mut settings: Settings, name: Option<String>) -> Result<()> {
    let Some(name) = name else {
        let current = settings.theme.as_deref();
        for theme in all_themes() {
            let marker = if current == Some(theme.name.as_str()) { "*" } else { " " };
            println!("{marker} {}", theme.name);
        }
        return Ok(());
    };
    if by_name(&name).is_none() {
        bail!("Theme '{}' not found", name);
    }
    settings.theme = Some(name.clone());
    settings.save(&settings::settings_path(config_dir))?;
    info!(theme = %name, "saved default theme");
    println!("Default theme set to {name}.");
    Ok(())
}

fn resolve_theme(cli: &Cli, settings: &Settings) -> Result<Theme> {
    let variant = if cli.dark {
        ThemeVariant::Dark
    } else if cli.light {
        ThemeVariant::Light
    } else {
        detect_terminal_theme()
    };

    // Priority: CLI --theme > settings file > default
    if let Some(name) = cli.theme.as_ref().or(settings.theme.as_ref()) {
        return by_name(name).with_context(|| {
            let names: Vec<String> = all_themes().into_iter().map(|t| t.name).collect();
            format!("Theme '{}' not found. Available: {}", name, names.join(", "))
        });
    }

    Ok(default_for_variant(variant))
}

async fn run_tui(
    cli: &Cli,
    settings: &Settings,
    client: VideoClient,
    route: Option<Route>,
) -> Result<()> {
    let theme = resolve_theme(cli, settings)?;
    let mpv_path = cli.mpv_path.as_deref().unwrap_or(settings.mpv_path());
    let backend = backend_for(settings.video_enabled() && !cli.no_video, mpv_path);
    info!(backend = backend.name(), "starting");

    let ctx = AppContext {
        client,
        store: SharedVideoStore::new(),
        player: ActivePlayer::new(backend),
        page_size: settings.page_size(),
        share_base: settings.share_base_url().to_string(),
        share_prefix: settings.share_prefix().to_string(),
    };

    let mut terminal = tui::init()?;
    let mut app = App::new(theme, ctx);
    let mut events = EventHandler::new(100);
    let mut last_height: Option<u16> = None;

    app.start(route);

    loop {
        terminal.draw(|frame| render(&app, frame))?;

        // Cards are sized from the viewport
        let current_height = terminal.size()?.height;
        if last_height != Some(current_height) {
            last_height = Some(current_height);
            app.update(Message::UpdateViewportHeight(current_height));
        }

        // Poll async results (non-blocking)
        while let Ok(result) = app.result_rx.try_recv() {
            app.handle_async_result(result);
        }

        if app.should_quit {
            break;
        }

        match events.next().await? {
            Event::Key(key) => {
                if let Some(msg) = keys::handle_key(key, &app) {
                    app.update(msg);
                }
            }
            Event::Mouse(mouse) => {
                if let Some(msg) = keys::handle_mouse(mouse, &app) {
                    app.update(msg);
                }
            }
            Event::Tick => app.update(Message::Tick),
            Event::Resize => {}
        }
    }

    app.shutdown();
    tui::restore()?;
    Ok(())
}

fn render(app: &App, frame: &mut Frame) {
    use ratatui::layout::{Constraint, Layout};

    let area = frame.area();

    // Split area for debug pane if visible
    let (main_area, debug_area) = if app.debug.visible {
        let chunks = Layout::vertical([
            Constraint::Min(0),     // Main content
            Constraint::Length(10), // Debug pane
        ])
        .split(area);
        (chunks[0], Some(chunks[1]))
    } else {
        (area, None)
    };

    match &app.view {
        View::Feed => views::feed::render(frame, app, main_area),
        View::Video { .. } => views::video::render(frame, app, main_area),
        View::Wallet => views::wallet::render(frame, app, main_area),
        View::Profile { .. } => views::profile::render(frame, app, main_area),
    }

    if let Some(debug_area) = debug_area {
        views::debug::render(frame, app, debug_area);
    }

    views::modal::render(frame, app, main_area);
}
