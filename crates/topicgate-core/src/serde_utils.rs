/// Serialization helpers for Duration as whole milliseconds
pub mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis = u64::try_from(duration.as_millis()).map_err(serde::ser::Error::custom)?;
        serializer.serialize_u64(millis)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use std::time::Duration;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Wrapper {
        #[serde(with = "super::duration_ms")]
        ttl: Duration,
    }

    #[test]
    fn test_duration_ms() {
        let json = serde_json::to_string(&Wrapper {
            ttl: Duration::from_secs(2),
        })
        .unwrap();
        assert_eq!(json, r#"{"ttl":2000}"#);

        let back: Wrapper = serde_json::from_str(r#"{"ttl":1500}"#).unwrap();
        assert_eq!(back.ttl, Duration::from_millis(1500));
    }
}
