//! Client configuration.

/// Public PetFriends deployment the suite was written against.
pub const DEFAULT_BASE_URL: &str = "https://petfriends.skillfactory.ru";

/// Where the client sends its requests.
///
/// Only the endpoint is configurable; transport timeouts stay at ureq's
/// defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_public_service() {
        assert_eq!(ClientConfig::default().base_url, DEFAULT_BASE_URL);
    }
}
