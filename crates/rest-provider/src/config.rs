use std::fmt::Debug;

/// Builder for [`RestConfig`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct RestConfigBuilder {
    base_url: String,
    bearer_token: Option<String>,
}

impl RestConfigBuilder {
    /// Creates a builder for a store rooted at the given base URL.
    #[inline]
    pub fn with_base_url<S: Into<String>>(base_url: S) -> Self {
        Self {
            base_url: base_url.into(),
            bearer_token: None,
        }
    }

    /// Sets the bearer token attached to every request.
    ///
    /// How the token is obtained (and refreshed) is the caller's business;
    /// the provider never stores it anywhere but in memory.
    #[inline]
    pub fn with_bearer_token<S: Into<String>>(mut self, token: S) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Builds the configuration.
    #[inline]
    pub fn build(self) -> RestConfig {
        let mut base_url = self.base_url;
        while base_url.ends_with('/') {
            base_url.pop();
        }
        RestConfig {
            base_url,
            bearer_token: self.bearer_token,
        }
    }
}

impl Debug for RestConfigBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestConfigBuilder")
            .field("base_url", &self.base_url)
            .field("bearer_token", &"<redacted>")
            .finish()
    }
}

/// Configuration for the REST resource provider.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct RestConfig {
    pub(crate) base_url: String,
    pub(crate) bearer_token: Option<String>,
}

impl Debug for RestConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestConfig")
            .field("base_url", &self.base_url)
            .field("bearer_token", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slashes_are_stripped() {
        let config =
            RestConfigBuilder::with_base_url("https://store.test/v1///")
                .build();
        assert_eq!(config.base_url, "https://store.test/v1");
    }
}
