//! Adapter settings and per-call overrides

use url::Url;

use crate::error::AuthError;

/// What an adapter instance is used for
///
/// Authentication adapters keep the provider in sync with the session:
/// a failed verification also clears the provider's cached login, and
/// `watch` is available for automatic sign-in. Authorization adapters only
/// obtain a verified email for a single request and leave the provider
/// alone when verification fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Capability {
    #[default]
    Authentication,
    Authorization,
}

impl Capability {
    pub fn triggers_local_logout_on_error(&self) -> bool {
        matches!(self, Capability::Authentication)
    }

    pub fn supports_watch(&self) -> bool {
        matches!(self, Capability::Authentication)
    }
}

/// How the assertion is encoded in the relay request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentType {
    /// `application/x-www-form-urlencoded`
    #[default]
    Form,
    /// `application/json`
    Json,
}

/// How a successful relay response body is read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    /// A JSON string; a body that is not JSON at all is read as raw text
    #[default]
    Json,
    /// The body as-is
    Text,
}

impl ResponseFormat {
    /// Extract the email from a successful response body
    ///
    /// `None` when a JSON body holds anything other than a string.
    pub fn read_email(&self, body: &str) -> Option<String> {
        match self {
            ResponseFormat::Json => match serde_json::from_str::<serde_json::Value>(body) {
                Ok(serde_json::Value::String(email)) => Some(email),
                Ok(_) => None,
                Err(_) => Some(body.trim().to_string()),
            },
            ResponseFormat::Text => Some(body.trim().to_string()),
        }
    }
}

/// Whether relay requests carry cookies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CredentialsPolicy {
    #[default]
    Omit,
    Include,
}

/// Immutable settings of one adapter instance
#[derive(Debug, Clone)]
pub struct AdapterConfig {
    /// Name the application refers to this adapter by
    pub name: String,
    /// Default relay endpoint, e.g. `http://127.0.0.1:3000/verify`
    pub verification_endpoint: String,
    pub content_type: ContentType,
    pub response_format: ResponseFormat,
    pub credentials: CredentialsPolicy,
    pub capability: Capability,
}

impl AdapterConfig {
    pub fn new(name: impl Into<String>, verification_endpoint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            verification_endpoint: verification_endpoint.into(),
            content_type: ContentType::default(),
            response_format: ResponseFormat::default(),
            credentials: CredentialsPolicy::default(),
            capability: Capability::default(),
        }
    }

    pub fn with_capability(mut self, capability: Capability) -> Self {
        self.capability = capability;
        self
    }

    pub fn with_content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = content_type;
        self
    }

    pub fn with_response_format(mut self, response_format: ResponseFormat) -> Self {
        self.response_format = response_format;
        self
    }

    pub fn with_credentials(mut self, credentials: CredentialsPolicy) -> Self {
        self.credentials = credentials;
        self
    }

    /// Combine these defaults with per-call overrides
    pub fn resolve(&self, options: &VerifyOptions) -> Result<RequestSettings, AuthError> {
        let endpoint = options
            .verification_endpoint
            .as_deref()
            .unwrap_or(&self.verification_endpoint);

        Ok(RequestSettings {
            url: parse_endpoint(endpoint)?,
            content_type: options.content_type.unwrap_or(self.content_type),
            response_format: options.response_format.unwrap_or(self.response_format),
            credentials: options.credentials.unwrap_or(self.credentials),
        })
    }
}

/// Per-call overrides; unset fields fall back to the adapter's settings
#[derive(Debug, Clone, Default)]
pub struct VerifyOptions {
    pub verification_endpoint: Option<String>,
    pub content_type: Option<ContentType>,
    pub response_format: Option<ResponseFormat>,
    pub credentials: Option<CredentialsPolicy>,
}

impl VerifyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.verification_endpoint = Some(endpoint.into());
        self
    }

    pub fn content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = Some(content_type);
        self
    }

    pub fn response_format(mut self, response_format: ResponseFormat) -> Self {
        self.response_format = Some(response_format);
        self
    }

    pub fn credentials(mut self, credentials: CredentialsPolicy) -> Self {
        self.credentials = Some(credentials);
        self
    }
}

/// Effective settings of one relay request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSettings {
    pub url: Url,
    pub content_type: ContentType,
    pub response_format: ResponseFormat,
    pub credentials: CredentialsPolicy,
}

pub(crate) fn parse_endpoint(endpoint: &str) -> Result<Url, AuthError> {
    let url = Url::parse(endpoint).map_err(|e| AuthError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(AuthError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}
