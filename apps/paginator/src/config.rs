use anyhow::{anyhow, Context, Result};

use crate::layout::{FontFamily, PaperSize};

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values abort startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Font family used when a request does not pick one.
    pub page_font: FontFamily,
    /// Paper size used when a request does not pick one.
    pub paper_size: PaperSize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Config {
            port: var("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            page_font: var("PAGE_FONT")
                .unwrap_or_else(|| "inter".to_string())
                .parse::<FontFamily>()
                .map_err(|e| anyhow!(e))
                .context("PAGE_FONT must name a supported font family")?,
            paper_size: var("PAPER_SIZE")
                .unwrap_or_else(|| "letter".to_string())
                .parse::<PaperSize>()
                .map_err(|e| anyhow!(e))
                .context("PAPER_SIZE must be 'letter' or 'a4'")?,
        })
    }
}
