//! Cache configuration.
//!
//! ## Environment Variables
//!
//! - `DOTNET_ACCESS_SIGNATURE_KEY`: how method overloads are keyed
//!   - `"fingerprint"`: 32-bit combined hash of the argument types (default)
//!   - `"exact"`: the full ordered argument-type sequence
//! - `DOTNET_ACCESS_TRACE_MISSES`: emit a `trace` event for every resolver
//!   call (`1`/`true` to enable, `0`/`false` to disable; off by default)
use crate::error::ConfigError;
use std::{env, str::FromStr};

pub const SIGNATURE_KEY_VAR: &str = "DOTNET_ACCESS_SIGNATURE_KEY";
pub const TRACE_MISSES_VAR: &str = "DOTNET_ACCESS_TRACE_MISSES";

/// How the method cache tells overloads of one name apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignatureKeying {
    /// Key by the 32-bit signature fingerprint. Argument lists whose
    /// fingerprints collide share one cache entry.
    #[default]
    Fingerprint,
    /// Key by the full argument-type sequence. No collisions; a new entry
    /// copies its argument list.
    Exact,
}

impl FromStr for SignatureKeying {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fingerprint" | "hash" => Ok(Self::Fingerprint),
            "exact" => Ok(Self::Exact),
            _ => Err(ConfigError::InvalidValue {
                variable: SIGNATURE_KEY_VAR,
                value: s.to_string(),
                expected: "fingerprint, exact",
            }),
        }
    }
}

fn parse_flag(variable: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            variable,
            value: value.to_string(),
            expected: "1, true, 0, false",
        }),
    }
}

#[derive(Debug, Clone, Default)]
pub struct AccessCacheConfig {
    pub signature_keying: SignatureKeying,
    /// Log each resolver call with `tracing::trace!`.
    pub trace_misses: bool,
}

impl AccessCacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signature_keying(mut self, keying: SignatureKeying) -> Self {
        self.signature_keying = keying;
        self
    }

    pub fn trace_misses(mut self, enabled: bool) -> Self {
        self.trace_misses = enabled;
        self
    }

    /// Builds a configuration from the process environment, falling back to
    /// defaults for unset variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub(crate) fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(value) = lookup(SIGNATURE_KEY_VAR) {
            config.signature_keying = value.parse()?;
            tracing::debug!(keying = ?config.signature_keying, "signature keying from environment");
        }
        if let Some(value) = lookup(TRACE_MISSES_VAR) {
            config.trace_misses = parse_flag(TRACE_MISSES_VAR, &value)?;
        }
        Ok(config)
    }
}
