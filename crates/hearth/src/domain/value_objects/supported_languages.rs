//! Languages an agent can converse in

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Wildcard meaning "any language"
pub const MATCH_ALL: &str = "*";

/// Languages supported by a conversation agent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupportedLanguages {
    All,
    Only(Vec<String>),
}

impl SupportedLanguages {
    pub fn supports(&self, language: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(languages) => languages.iter().any(|l| l == language),
        }
    }
}

impl Serialize for SupportedLanguages {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::All => serializer.serialize_str(MATCH_ALL),
            Self::Only(languages) => languages.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for SupportedLanguages {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Wildcard(String),
            List(Vec<String>),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Wildcard(s) if s == MATCH_ALL => Ok(Self::All),
            Raw::Wildcard(s) => Err(serde::de::Error::custom(format!(
                "expected \"{}\" or a list of languages, got \"{}\"",
                MATCH_ALL, s
            ))),
            Raw::List(languages) => Ok(Self::Only(languages)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wildcard_serializes_as_star() {
        assert_eq!(serde_json::to_value(SupportedLanguages::All).unwrap(), "*");
        let parsed: SupportedLanguages = serde_json::from_str("\"*\"").unwrap();
        assert_eq!(parsed, SupportedLanguages::All);
    }

    #[test]
    fn test_list_support() {
        let langs: SupportedLanguages = serde_json::from_str(r#"["en", "nl"]"#).unwrap();
        assert!(langs.supports("nl"));
        assert!(!langs.supports("de"));
        assert!(SupportedLanguages::All.supports("de"));
    }
}
