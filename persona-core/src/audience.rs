//! Audience values
//!
//! An audience is the canonical origin (scheme, host and port) a relying
//! party binds its assertions to. The relay holds exactly one, fixed at
//! startup, and never takes it from a request.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{Error, Result};

/// Canonical origin of a relying party
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Audience(String);

impl Audience {
    /// Parse an audience from a URL or origin string
    ///
    /// Paths, queries and fragments are dropped and default ports elided,
    /// so `https://example.com:443/app` and `https://example.com` yield the
    /// same audience.
    pub fn parse(value: &str) -> Result<Self> {
        let url = Url::parse(value.trim()).map_err(|e| Error::InvalidAudience {
            value: value.to_string(),
            reason: e.to_string(),
        })?;

        let origin = url.origin();
        if !origin.is_tuple() {
            return Err(Error::InvalidAudience {
                value: value.to_string(),
                reason: "not a scheme://host[:port] origin".to_string(),
            });
        }

        Ok(Self(origin.ascii_serialization()))
    }

    /// The audience used when none is configured: the relay's own loopback origin
    pub fn loopback(port: u16) -> Self {
        Self(format!("http://127.0.0.1:{}", port))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Audience {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Audience {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Audience> for String {
    fn from(audience: Audience) -> Self {
        audience.0
    }
}
