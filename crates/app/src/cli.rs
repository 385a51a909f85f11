use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "birrcheck")]
#[command(about = "Verify photographed telebirr payment receipts")]
pub struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the receipt-lookup base URL.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Override the marker string expected in a valid lookup page.
    #[arg(long, global = true)]
    pub marker: Option<String>,

    /// Per-request timeout in seconds.
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Emit each outcome as a JSON object instead of prose.
    #[arg(long, global = true)]
    pub json: bool,

    /// Keep processed images instead of deleting them.
    #[arg(long, global = true)]
    pub keep: bool,

    /// Use a canned OCR result instead of a real backend (dry runs, demos).
    #[arg(long, global = true, value_name = "TEXT")]
    pub mock_text: Option<String>,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Verify one or more receipt images.
    Check {
        #[arg(required = true)]
        images: Vec<PathBuf>,
    },
    /// Watch a directory and verify receipt images as they appear.
    Watch { dir: PathBuf },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_check_with_overrides() {
        let cli = Cli::parse_from([
            "birrcheck",
            "--base-url",
            "https://lookup.example/receipt",
            "--json",
            "check",
            "a.jpg",
            "b.jpg",
        ]);
        assert_eq!(cli.base_url.as_deref(), Some("https://lookup.example/receipt"));
        assert!(cli.json);
        let Command::Check { images } = cli.cmd else { panic!("expected check") };
        assert_eq!(images.len(), 2);
    }

    #[test]
    fn parses_watch() {
        let cli = Cli::parse_from(["birrcheck", "watch", "/tmp/intake"]);
        assert!(matches!(cli.cmd, Command::Watch { .. }));
    }

    #[test]
    fn check_requires_at_least_one_image() {
        assert!(Cli::try_parse_from(["birrcheck", "check"]).is_err());
    }
}
