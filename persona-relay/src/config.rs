//! Relay configuration

use std::path::PathBuf;

use persona_core::Audience;
use serde::Deserialize;

/// Verification API used when none is configured
pub const DEFAULT_VERIFIER_URL: &str = "https://verifier.login.persona.org/verify";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Port to listen on
    pub port: u16,

    /// This deployment's canonical origin, sent as the audience of every verification
    pub audience: Audience,

    /// Remote verification API endpoint
    pub verifier_url: String,

    /// Timeout for one verifier round-trip, in seconds
    pub verifier_timeout_secs: u64,

    /// Directory of static files to serve alongside the relay
    pub static_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            audience: Audience::loopback(3000),
            verifier_url: DEFAULT_VERIFIER_URL.to_string(),
            verifier_timeout_secs: 10,
            static_dir: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// - PERSONA_PORT (default: 3000)
    /// - PERSONA_AUDIENCE (default: http://127.0.0.1:<port>)
    /// - PERSONA_VERIFIER_URL
    /// - PERSONA_VERIFIER_TIMEOUT_SECS (default: 10)
    /// - PERSONA_STATIC_DIR
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|s| !s.is_empty());
        let defaults = Self::default();

        let port = match get("PERSONA_PORT") {
            Some(p) => p
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid PERSONA_PORT '{}': {}", p, e))?,
            None => defaults.port,
        };

        let audience = match get("PERSONA_AUDIENCE") {
            Some(a) => Audience::parse(&a)?,
            None => Audience::loopback(port),
        };

        let verifier_timeout_secs = match get("PERSONA_VERIFIER_TIMEOUT_SECS") {
            Some(t) => t.parse().map_err(|e| {
                anyhow::anyhow!("Invalid PERSONA_VERIFIER_TIMEOUT_SECS '{}': {}", t, e)
            })?,
            None => defaults.verifier_timeout_secs,
        };

        Ok(Self {
            port,
            audience,
            verifier_url: get("PERSONA_VERIFIER_URL").unwrap_or(defaults.verifier_url),
            verifier_timeout_secs,
            static_dir: get("PERSONA_STATIC_DIR").map(PathBuf::from),
        })
    }
}
