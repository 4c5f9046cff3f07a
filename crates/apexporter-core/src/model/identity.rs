use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::ExporterError;

/// How the tracked player is addressed on `/bridge`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerIdentity {
    Uid(String),
    Name(String),
}

impl PlayerIdentity {
    /// Query pair sent upstream.
    pub fn query_pair(&self) -> (&'static str, &str) {
        match self {
            PlayerIdentity::Uid(uid) => ("uid", uid.as_str()),
            PlayerIdentity::Name(name) => ("player_name", name.as_str()),
        }
    }
}

/// Platforms accepted by the stats API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum Platform {
    Pc,
    Ps4,
    X1,
    Switch,
}

impl Platform {
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Pc => "PC",
            Platform::Ps4 => "PS4",
            Platform::X1 => "X1",
            Platform::Switch => "SWITCH",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = ExporterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PC" => Ok(Platform::Pc),
            "PS4" => Ok(Platform::Ps4),
            "X1" => Ok(Platform::X1),
            "SWITCH" => Ok(Platform::Switch),
            other => Err(ExporterError::Config(format!(
                "unknown platform {other:?} (expected PC, PS4, X1 or SWITCH)"
            ))),
        }
    }
}

impl TryFrom<String> for Platform {
    type Error = ExporterError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn platform_is_case_insensitive() {
        assert_eq!("ps4".parse::<Platform>().unwrap(), Platform::Ps4);
        assert_eq!(" Switch ".parse::<Platform>().unwrap(), Platform::Switch);
        assert!("xbox".parse::<Platform>().is_err());
    }

    #[test]
    fn identity_query_pair() {
        let id = PlayerIdentity::Name("Wraith".into());
        assert_eq!(id.query_pair(), ("player_name", "Wraith"));
        let id = PlayerIdentity::Uid("1000".into());
        assert_eq!(id.query_pair(), ("uid", "1000"));
    }
}
