//! The scrypt options mapping.
//!
//! Options arrive as a mapping with the keys `N`, `r`, `p` and `dkLen`.
//! Every key is optional at this level so that a missing key can be
//! reported by the admission checks instead of silently defaulting.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScryptOptions {
    #[serde(rename = "N", skip_serializing_if = "Option::is_none")]
    pub n: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p: Option<i64>,
    #[serde(rename = "dkLen", skip_serializing_if = "Option::is_none")]
    pub dk_len: Option<i64>,
}

impl ScryptOptions {
    /// Builds a mapping with all four options present.
    pub fn new(n: i64, r: i64, p: i64, dk_len: i64) -> Self {
        Self {
            n: Some(n),
            r: Some(r),
            p: Some(p),
            dk_len: Some(dk_len),
        }
    }

    /// Parses a JSON object such as `{"N": 16384, "r": 8, "p": 1, "dkLen": 32}`.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Overlays the options present in `other` on top of `self`.
    pub fn merge(self, other: ScryptOptions) -> Self {
        Self {
            n: other.n.or(self.n),
            r: other.r.or(self.r),
            p: other.p.or(self.p),
            dk_len: other.dk_len.or(self.dk_len),
        }
    }
}

/// Named cost presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// N=2^14, about 16 MiB. Suitable for interactive logins.
    Interactive,
    /// N=2^17, about 128 MiB.
    Moderate,
    /// N=2^20, about 1 GiB. For keys protecting long-lived secrets.
    Sensitive,
}

impl Preset {
    pub fn options(&self) -> ScryptOptions {
        match self {
            Preset::Interactive => ScryptOptions::new(1 << 14, 8, 1, 32),
            Preset::Moderate => ScryptOptions::new(1 << 17, 8, 1, 32),
            Preset::Sensitive => ScryptOptions::new(1 << 20, 8, 1, 32),
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown preset '{0}' (expected interactive, moderate or sensitive)")]
pub struct UnknownPreset(String);

impl FromStr for Preset {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "interactive" => Ok(Preset::Interactive),
            "moderate" => Ok(Preset::Moderate),
            "sensitive" => Ok(Preset::Sensitive),
            _ => Err(UnknownPreset(s.to_string())),
        }
    }
}

impl From<Preset> for ScryptOptions {
    fn from(preset: Preset) -> Self {
        preset.options()
    }
}
