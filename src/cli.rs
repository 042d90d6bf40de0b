use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "vidfeed")]
#[command(about = "A terminal client for a short-video feed", long_about = None)]
pub struct Cli {
    /// Theme name (dark or light)
    #[arg(short, long)]
    pub theme: Option<String>,

    /// Force dark mode (overrides auto-detection)
    #[arg(long, conflicts_with = "light")]
    pub dark: bool,

    /// Force light mode (overrides auto-detection)
    #[arg(long, conflicts_with = "dark")]
    pub light: bool,

    /// Custom config directory (default: ~/.config/vidfeed)
    #[arg(long, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Backend base URL (overrides settings)
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Disable video playback
    #[arg(long)]
    pub no_video: bool,

    /// Path to the mpv binary
    #[arg(long, value_name = "PATH")]
    pub mpv_path: Option<String>,

    /// Enable verbose logging (prints log path, sets DEBUG level)
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in with an email address or username
    Login {
        /// Email or username
        identifier: String,

        /// Password (prompted for when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Open a shared video link
    Open {
        /// Share URL, e.g. https://vidfeed.app/ShareVideos/video/<id>
        url: String,
    },
    /// Wallet balance and withdrawals
    Wallet(WalletArgs),
    /// List series
    Series,
    /// List themes, or save the default theme
    Theme {
        /// Theme to save in settings.toml
        name: Option<String>,
    },
}

#[derive(Args, Debug)]
pub struct WalletArgs {
    #[command(subcommand)]
    pub command: WalletCommands,
}

#[derive(Subcommand, Debug)]
pub enum WalletCommands {
    /// Show the current balance
    Balance,
    /// Request a manual withdrawal
    Withdraw {
        /// Amount in whole currency units
        amount: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_flags() {
        let cli = Cli::try_parse_from([
            "vidfeed",
            "--api-url",
            "http://localhost:5000",
            "--no-video",
            "--dark",
        ])
        .unwrap();
        assert_eq!(cli.api_url.as_deref(), Some("http://localhost:5000"));
        assert!(cli.no_video);
        assert!(cli.dark);
        assert!(cli.command.is_none());
    }

    #[test]
    fn dark_and_light_conflict() {
        assert!(Cli::try_parse_from(["vidfeed", "--dark", "--light"]).is_err());
    }

    #[test]
    fn parses_wallet_withdraw() {
        let cli = Cli::try_parse_from(["vidfeed", "wallet", "withdraw", "250"]).unwrap();
        match cli.command {
            Some(Commands::Wallet(WalletArgs {
                command: WalletCommands::Withdraw { amount },
            })) => assert_eq!(amount, 250),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn parses_theme_with_and_without_name() {
        let cli = Cli::try_parse_from(["vidfeed", "theme", "light"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Theme { name: Some(ref n) }) if n == "light"));
        let cli = Cli::try_parse_from(["vidfeed", "theme"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Theme { name: None })));
    }

    #[test]
    fn parses_open() {
        let cli = Cli::try_parse_from(["vidfeed", "open", "https://x/ShareVideos/video/1"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Open { .. })));
    }
}
