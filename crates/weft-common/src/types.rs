//! Snowflake identifier newtypes shared by the i18n and component crates.
//!
//! The chat API sends snowflakes as decimal strings; these types accept
//! either a string or a bare number on input and always emit strings.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Wire representation accepted when deserializing a snowflake.
#[derive(Deserialize)]
#[serde(untagged)]
enum SnowflakeRepr {
    Number(u64),
    Text(String),
}

fn deserialize_snowflake<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match SnowflakeRepr::deserialize(deserializer)? {
        SnowflakeRepr::Number(value) => Ok(value),
        SnowflakeRepr::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid snowflake: {text:?}"))),
    }
}

macro_rules! snowflake_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u64);

        impl $name {
            /// Returns the raw snowflake value.
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map(Self)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(&self.0)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                deserialize_snowflake(deserializer).map(Self)
            }
        }
    };
}

snowflake_id!(
    /// A guild (server) ID.
    GuildId
);
snowflake_id!(
    /// A channel ID.
    ChannelId
);
snowflake_id!(
    /// A message ID.
    MessageId
);
snowflake_id!(
    /// An application (bot) ID.
    ApplicationId
);
snowflake_id!(
    /// A user ID.
    UserId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snowflake_serializes_as_string() {
        let id = ChannelId(123_456_789_012_345_678);
        assert_eq!(
            serde_json::to_string(&id).unwrap(),
            "\"123456789012345678\""
        );
    }

    #[test]
    fn test_snowflake_accepts_string_or_number() {
        let from_text: GuildId = serde_json::from_str("\"42\"").unwrap();
        let from_number: GuildId = serde_json::from_str("42").unwrap();
        assert_eq!(from_text, from_number);
        assert_eq!(from_text.get(), 42);
    }

    #[test]
    fn test_snowflake_rejects_garbage() {
        assert!(serde_json::from_str::<MessageId>("\"not-an-id\"").is_err());
        assert!("abc".parse::<MessageId>().is_err());
        assert_eq!(" 7 ".parse::<MessageId>().unwrap(), MessageId(7));
    }
}
