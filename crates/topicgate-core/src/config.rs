use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Property holding the `;`-separated superuser list
pub const SUPER_USERS_PROPERTY: &str = "super.users";

const CACHE_PROPERTY_PREFIX: &str = "topicgate.cache.";

/// Longest accepted cache entry lifetime (one year)
pub const MAX_CACHE_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Sizing and expiry of one resolution cache
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of cached entries
    pub max_capacity: u64,

    /// How long a loaded entry stays valid
    #[serde(rename = "ttl_ms", with = "crate::serde_utils::duration_ms")]
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
            ttl: Duration::from_secs(300),
        }
    }
}

impl CacheConfig {
    pub fn new(max_capacity: u64, ttl: Duration) -> Self {
        Self { max_capacity, ttl }
    }

    fn validate(&self, tier: &str) -> Result<()> {
        if self.max_capacity == 0 {
            return Err(Error::InvalidConfig(format!(
                "{} cache capacity must be greater than zero",
                tier
            )));
        }
        if self.ttl.is_zero() {
            return Err(Error::InvalidConfig(format!(
                "{} cache ttl must be greater than zero",
                tier
            )));
        }
        if self.ttl > MAX_CACHE_TTL {
            return Err(Error::InvalidConfig(format!(
                "{} cache ttl must not exceed {} ms, got {} ms",
                tier,
                MAX_CACHE_TTL.as_millis(),
                self.ttl.as_millis()
            )));
        }
        Ok(())
    }
}

/// Configuration for the project authorizer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorizerConfig {
    /// `;`-separated canonical principals granted every action
    pub super_users: String,

    /// Topic -> owning project
    pub topic_cache: CacheConfig,

    /// Identity key -> (project, role)
    pub user_cache: CacheConfig,

    /// (topic project, user project) -> share permission
    pub share_cache: CacheConfig,
}

impl Default for AuthorizerConfig {
    fn default() -> Self {
        Self {
            super_users: String::new(),
            topic_cache: CacheConfig::default(),
            user_cache: CacheConfig::default(),
            share_cache: CacheConfig {
                max_capacity: 1_000,
                ..CacheConfig::default()
            },
        }
    }
}

impl AuthorizerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the superuser list
    pub fn with_super_users(mut self, super_users: impl Into<String>) -> Self {
        self.super_users = super_users.into();
        self
    }

    pub fn with_topic_cache(mut self, cache: CacheConfig) -> Self {
        self.topic_cache = cache;
        self
    }

    pub fn with_user_cache(mut self, cache: CacheConfig) -> Self {
        self.user_cache = cache;
        self
    }

    pub fn with_share_cache(mut self, cache: CacheConfig) -> Self {
        self.share_cache = cache;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.topic_cache.validate("topic")?;
        self.user_cache.validate("user")?;
        self.share_cache.validate("share")?;
        Ok(())
    }

    /// Build from broker-style `key=value` properties.
    ///
    /// Recognised keys are `super.users` and
    /// `topicgate.cache.{topic,user,share}.{max.entries,ttl.ms}`. Other keys
    /// belong to the broker and are ignored.
    pub fn from_properties<I, K, V>(properties: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Self::default();

        for (key, value) in properties {
            let (key, value) = (key.as_ref().trim(), value.as_ref().trim());

            if key == SUPER_USERS_PROPERTY {
                config.super_users = value.to_string();
                continue;
            }

            let Some(rest) = key.strip_prefix(CACHE_PROPERTY_PREFIX) else {
                continue;
            };
            let Some((tier, setting)) = rest.split_once('.') else {
                continue;
            };
            let cache = match tier {
                "topic" => &mut config.topic_cache,
                "user" => &mut config.user_cache,
                "share" => &mut config.share_cache,
                _ => continue,
            };
            match setting {
                "max.entries" => cache.max_capacity = parse_u64(key, value)?,
                "ttl.ms" => cache.ttl = Duration::from_millis(parse_u64(key, value)?),
                _ => {}
            }
        }

        config.validate()?;
        Ok(config)
    }
}

fn parse_u64(key: &str, value: &str) -> Result<u64> {
    value.parse().map_err(|_| {
        Error::InvalidConfig(format!(
            "{} must be a non-negative integer, got '{}'",
            key, value
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AuthorizerConfig::default();
        assert!(config.super_users.is_empty());
        assert_eq!(config.topic_cache.max_capacity, 10_000);
        assert_eq!(config.share_cache.max_capacity, 1_000);
        assert_eq!(config.user_cache.ttl, Duration::from_secs(300));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = AuthorizerConfig::new()
            .with_super_users("User:admin")
            .with_topic_cache(CacheConfig::new(50, Duration::from_secs(10)));

        assert_eq!(config.super_users, "User:admin");
        assert_eq!(config.topic_cache.max_capacity, 50);
        assert_eq!(config.topic_cache.ttl, Duration::from_secs(10));
    }

    #[test]
    fn test_from_properties() {
        let config = AuthorizerConfig::from_properties([
            ("super.users", "User:admin;User:CN=broker,O=hops"),
            ("topicgate.cache.topic.max.entries", "42"),
            ("topicgate.cache.user.ttl.ms", "1500"),
            ("topicgate.cache.share.ttl.ms", "60000"),
            ("listeners", "SSL://0.0.0.0:9093"),
            ("topicgate.cache.unknown.ttl.ms", "1"),
        ])
        .unwrap();

        assert_eq!(config.super_users, "User:admin;User:CN=broker,O=hops");
        assert_eq!(config.topic_cache.max_capacity, 42);
        assert_eq!(config.user_cache.ttl, Duration::from_millis(1500));
        assert_eq!(config.share_cache.ttl, Duration::from_secs(60));
    }

    #[test]
    fn test_from_properties_rejects_bad_values() {
        let err = AuthorizerConfig::from_properties([("topicgate.cache.topic.ttl.ms", "soon")])
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));

        let err = AuthorizerConfig::from_properties([("topicgate.cache.user.max.entries", "0")])
            .unwrap_err();
        assert_eq!(
            err,
            Error::InvalidConfig("user cache capacity must be greater than zero".to_string())
        );
    }

    #[test]
    fn test_from_properties_rejects_unbounded_ttl() {
        let err = AuthorizerConfig::from_properties([(
            "topicgate.cache.topic.ttl.ms",
            "18446744073709551615",
        )])
        .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(msg) if msg.starts_with("topic cache ttl")));

        let at_limit = MAX_CACHE_TTL.as_millis().to_string();
        assert!(
            AuthorizerConfig::from_properties([("topicgate.cache.share.ttl.ms", at_limit)]).is_ok()
        );
    }

    #[test]
    fn test_validate_rejects_unbounded_ttl() {
        let config = AuthorizerConfig::default()
            .with_user_cache(CacheConfig::new(10, MAX_CACHE_TTL + Duration::from_millis(1)));
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_partial_cache_config() {
        let config: AuthorizerConfig =
            serde_json::from_str(r#"{"topic_cache":{"max_capacity":5}}"#).unwrap();
        assert_eq!(config.topic_cache.max_capacity, 5);
        assert_eq!(config.topic_cache.ttl, Duration::from_secs(300));

        let config: AuthorizerConfig =
            serde_json::from_str(r#"{"user_cache":{"ttl_ms":1500}}"#).unwrap();
        assert_eq!(config.user_cache.max_capacity, 10_000);
        assert_eq!(config.user_cache.ttl, Duration::from_millis(1500));
    }

    #[test]
    fn test_serialization() {
        let config = AuthorizerConfig::default().with_super_users("User:admin");
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"ttl_ms\":300000"));

        let deserialized: AuthorizerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);

        let partial: AuthorizerConfig =
            serde_json::from_str(r#"{"super_users":"User:ops"}"#).unwrap();
        assert_eq!(partial.super_users, "User:ops");
        assert_eq!(partial.topic_cache, CacheConfig::default());
    }
}
