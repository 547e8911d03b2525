//! Linked account identity
//!
//! The backend identifies a linked mailbox by its display label,
//! `"<address> (<provider>)"`. The label is opaque to the client: the set
//! the backend returns is always authoritative and client copies are caches
//! that get replaced wholesale, never merged.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Mail provider supported by the backend OAuth flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Gmail,
    Outlook,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Gmail => "gmail",
            Provider::Outlook => "outlook",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gmail" => Ok(Provider::Gmail),
            "outlook" => Ok(Provider::Outlook),
            other => Err(format!("Unknown provider: {}", other)),
        }
    }
}

/// Identifier of a linked account, as returned by the backend
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Build the backend label for an address/provider pair
    pub fn from_parts(address: &str, provider: Provider) -> Self {
        Self(format!("{} ({})", address, provider))
    }

    /// Split the label back into address and provider, when well-formed
    pub fn parts(&self) -> Option<(&str, Provider)> {
        let (address, rest) = self.0.rsplit_once(" (")?;
        let provider = rest.strip_suffix(')')?.parse().ok()?;
        Some((address, provider))
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_round_trip() {
        let id = AccountId::from_parts("jane@x.com", Provider::Gmail);
        assert_eq!(id.as_str(), "jane@x.com (gmail)");
        assert_eq!(id.parts(), Some(("jane@x.com", Provider::Gmail)));
    }

    #[test]
    fn test_malformed_label_has_no_parts() {
        assert_eq!(AccountId::new("not-a-label").parts(), None);
        assert_eq!(AccountId::new("a@b.c (carrier-pigeon)").parts(), None);
    }

    #[test]
    fn test_provider_parse() {
        assert_eq!("GMAIL".parse::<Provider>(), Ok(Provider::Gmail));
        assert_eq!("outlook".parse::<Provider>(), Ok(Provider::Outlook));
        assert!("yahoo".parse::<Provider>().is_err());
    }
}
