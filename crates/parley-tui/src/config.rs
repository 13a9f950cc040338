//! Command-line configuration.

use std::{path::PathBuf, time::Duration};

use clap::Parser;
use parley_app::SessionConfig;
use parley_proto::{Endpoint, ProtocolError};

/// Parley terminal chat client
#[derive(Parser, Debug, Clone)]
#[command(name = "parley")]
#[command(about = "Terminal client for Parley chat rooms and direct messages")]
#[command(version)]
pub struct Args {
    /// Chat service base URL
    #[arg(short, long, env = "PARLEY_SERVER", default_value = "http://127.0.0.1:8000")]
    pub server: String,

    /// Username of the signed-in account
    #[arg(short, long, env = "PARLEY_USERNAME")]
    pub username: String,

    /// Session cookie sent with every request, e.g. `sessionid=...`
    #[arg(long, env = "PARLEY_SESSION")]
    pub session_cookie: Option<String>,

    /// Delay before reconnecting a dropped connection, in milliseconds
    #[arg(long, default_value_t = 2000)]
    pub reconnect_delay_ms: u64,

    /// Time allowed for a connection handshake, in milliseconds
    #[arg(long, default_value_t = 10_000)]
    pub connect_timeout_ms: u64,

    /// File to write logs to
    #[arg(long, default_value = "parley.log")]
    pub log_file: PathBuf,

    /// Log filter used when `RUST_LOG` is unset
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Session configuration.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            local_user: self.username.clone(),
            reconnect_delay: Duration::from_millis(self.reconnect_delay_ms),
        }
    }

    /// Handshake timeout for live connections.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Live connection endpoint derived from the server URL.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::UnsupportedScheme` if the URL is not http(s) or
    ///   ws(s)
    pub fn endpoint(&self) -> Result<Endpoint, ProtocolError> {
        Endpoint::from_server_url(&self.server)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["parley", "--username", "me"]).unwrap();
        assert_eq!(args.reconnect_delay_ms, 2000);
        assert_eq!(args.session_config(), SessionConfig::new("me"));
        assert_eq!(args.log_file, PathBuf::from("parley.log"));
        assert_eq!(args.connect_timeout(), parley_client::CONNECT_TIMEOUT);
    }

    #[test]
    fn endpoint_follows_server() {
        let args = Args::try_parse_from([
            "parley",
            "--username",
            "me",
            "--server",
            "https://chat.example.org/",
            "--reconnect-delay-ms",
            "500",
        ])
        .unwrap();
        assert_eq!(args.endpoint().unwrap().base(), "wss://chat.example.org");
        assert_eq!(args.session_config().reconnect_delay, Duration::from_millis(500));
    }

    #[test]
    fn rejects_unknown_scheme() {
        let args =
            Args::try_parse_from(["parley", "-u", "me", "-s", "ftp://example.org"]).unwrap();
        assert!(args.endpoint().is_err());
    }
}
