//! Turnstile server — entry point for the membership gate.

mod handlers;
mod logging;
mod server;

use clap::Parser;
use std::path::PathBuf;

use turnstile_gate::{AccessGate, GateConfig};

use crate::logging::LogFormat;
use crate::server::GateServer;

#[derive(Parser)]
#[command(name = "turnstile-server", about = "Channel membership gate for Mini App sessions")]
struct Cli {
    /// Bot credential used for signature verification and membership lookups.
    #[arg(long, env = "TELEGRAM_BOT_TOKEN", hide_env_values = true)]
    bot_token: Option<String>,

    /// Chat/channel whose membership gates access (e.g. "-1001234567890").
    #[arg(long, env = "TELEGRAM_CHANNEL_ID")]
    chat_id: Option<String>,

    /// Destination URL for members.
    #[arg(long, env = "MEMBER_REDIRECT_URL")]
    member_url: Option<String>,

    /// Destination URL for non-members.
    #[arg(long, env = "NON_MEMBER_REDIRECT_URL")]
    non_member_url: Option<String>,

    /// Reject validly-signed tokens that carry no user record.
    #[arg(long, env = "TURNSTILE_REQUIRE_IDENTITY")]
    require_identity: Option<bool>,

    /// Timeout for membership lookups, in seconds.
    #[arg(long, env = "TURNSTILE_LOOKUP_TIMEOUT_SECS")]
    lookup_timeout_secs: Option<u64>,

    /// Port to listen on.
    #[arg(long, env = "TURNSTILE_LISTEN_PORT")]
    port: Option<u16>,

    /// Log format: "human" or "json".
    #[arg(long, env = "TURNSTILE_LOG_FORMAT")]
    log_format: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "TURNSTILE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Path to a TOML configuration file. If provided, file settings are
    /// used as the base; CLI flags and env vars override them.
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Cli {
    /// Merge file config (if any) with CLI/env overrides.
    fn into_config(self) -> anyhow::Result<GateConfig> {
        let mut config = match &self.config {
            Some(path) => GateConfig::from_toml_file(path)?,
            None => GateConfig::from_lookup(|key| match key {
                "TELEGRAM_BOT_TOKEN" => self.bot_token.clone(),
                "TELEGRAM_CHANNEL_ID" => self.chat_id.clone(),
                "MEMBER_REDIRECT_URL" => self.member_url.clone(),
                "NON_MEMBER_REDIRECT_URL" => self.non_member_url.clone(),
                _ => None,
            })?,
        };

        if let Some(token) = self.bot_token {
            config.bot_token = token;
        }
        if let Some(chat_id) = self.chat_id {
            config.chat_id = chat_id;
        }
        if let Some(url) = self.member_url {
            config.member_url = url;
        }
        if let Some(url) = self.non_member_url {
            config.non_member_url = url;
        }
        if let Some(flag) = self.require_identity {
            config.require_identity = flag;
        }
        if let Some(secs) = self.lookup_timeout_secs {
            config.lookup_timeout_secs = secs;
        }
        if let Some(port) = self.port {
            config.listen_port = port;
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.into_config()?;

    logging::init_logging(LogFormat::parse(&config.log_format), &config.log_level);
    tracing::info!(chat_id = %config.chat_id, port = config.listen_port, "starting turnstile");

    let port = config.listen_port;
    let gate = AccessGate::new(config)?;
    GateServer::new(port, gate).start().await
}
