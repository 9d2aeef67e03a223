//! Portal configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `PORTAL_*` environment variables or a config
//! file, in that order of precedence.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_UNDO_WINDOW_MS: u64 = 5000;

/// Which store adapter backs the portal's collections.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, Deserialize, Default, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// Process-local store; data is lost on restart. Development default.
    #[default]
    Memory,
    /// Document-store REST gateway configured via `store_url`.
    Http,
}

/// Configuration values controlling the portal server.
#[derive(Debug, Clone, serde::Serialize, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PORTAL")]
pub struct PortalSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<SocketAddr>,
    /// Store adapter: `memory` or `http`.
    #[serde(default)]
    pub store_backend: StoreBackend,
    /// Base URL of the document-store gateway; required for the `http`
    /// backend.
    pub store_url: Option<String>,
    /// How long an announcement delete can be undone, in milliseconds.
    pub undo_window_ms: Option<u64>,
    /// File holding the session cookie signing key material.
    pub session_key_file: Option<PathBuf>,
    /// Set the `Secure` flag on the session cookie.
    #[ortho_config(default = true, cli_default_as_absent)]
    pub cookie_secure: bool,
}

impl PortalSettings {
    /// Bind address, falling back to the default.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr.unwrap_or_else(|| {
            DEFAULT_BIND_ADDR
                .parse()
                .unwrap_or_else(|_| unreachable!("default bind address is valid"))
        })
    }

    /// Undo window for announcement deletes, falling back to the default.
    pub fn undo_window(&self) -> Duration {
        Duration::from_millis(self.undo_window_ms.unwrap_or(DEFAULT_UNDO_WINDOW_MS))
    }

    /// Session key file, falling back to the conventional secrets path.
    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from("/var/run/secrets/session_key"))
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    fn load_from_empty_args() -> PortalSettings {
        PortalSettings::load_from_iter([OsString::from("portal-backend")])
            .expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env([
            ("PORTAL_BIND_ADDR", None::<String>),
            ("PORTAL_STORE_BACKEND", None::<String>),
            ("PORTAL_STORE_URL", None::<String>),
            ("PORTAL_UNDO_WINDOW_MS", None::<String>),
            ("PORTAL_SESSION_KEY_FILE", None::<String>),
            ("PORTAL_COOKIE_SECURE", None::<String>),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr(), "0.0.0.0:8080".parse().expect("addr"));
        assert_eq!(settings.store_backend, StoreBackend::Memory);
        assert_eq!(settings.undo_window(), Duration::from_millis(5000));
        assert!(settings.cookie_secure);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("PORTAL_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            ("PORTAL_STORE_BACKEND", Some("http".to_owned())),
            (
                "PORTAL_STORE_URL",
                Some("https://store.example.com/api".to_owned()),
            ),
            ("PORTAL_UNDO_WINDOW_MS", Some("2500".to_owned())),
            ("PORTAL_SESSION_KEY_FILE", Some("/tmp/key".to_owned())),
            ("PORTAL_COOKIE_SECURE", Some("false".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr(),
            "127.0.0.1:9000".parse().expect("addr")
        );
        assert_eq!(settings.store_backend, StoreBackend::Http);
        assert_eq!(
            settings.store_url.as_deref(),
            Some("https://store.example.com/api")
        );
        assert_eq!(settings.undo_window(), Duration::from_millis(2500));
        assert_eq!(settings.session_key_file(), PathBuf::from("/tmp/key"));
        assert!(!settings.cookie_secure);
    }
}
