use std::fmt;

use serde::Deserialize;

/// Username and secret used for HTTP Basic authentication against Gerrit.
#[derive(Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct Credential {
    username: String,
    password: String,
}

impl Credential {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Name of the user principal.
    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

// never print the password
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Connection settings for a [`QueryClient`](crate::QueryClient).
///
/// Can be built in code or deserialized from an application config file:
///
/// ```json
/// {
///     "base_url": "https://review.example.com",
///     "proxy": "http://proxy.example.com:3128",
///     "credential": { "username": "jenkins", "password": "secret" }
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct ClientConfig {
    base_url: String,
    #[serde(default)]
    proxy: Option<String>,
    credential: Credential,
}

impl ClientConfig {
    /// # Arguments
    /// * `base_url` - Front-end URL of the Gerrit server, e.g. `https://review.example.com`
    /// * `credential` - Username and password for basic auth
    pub fn new(base_url: impl Into<String>, credential: Credential) -> Self {
        Self {
            base_url: base_url.into(),
            proxy: None,
            credential,
        }
    }

    /// Record a proxy address. It is kept as part of the configuration's
    /// identity but does not affect how requests are sent.
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn proxy(&self) -> Option<&str> {
        self.proxy.as_deref()
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }
}
