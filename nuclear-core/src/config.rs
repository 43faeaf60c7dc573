//! Reactor Configuration
//!
//! Settings a reactor is created with. Configurations can be built in code
//! or loaded from JSON; missing fields take their defaults.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::reactive::FailurePolicy;

/// Configuration for a single reactor.
///
/// # Example
///
/// ```
/// use nuclear_core::ReactorConfig;
///
/// let config = ReactorConfig::from_json(r#"{ "name": "vision" }"#).unwrap();
/// assert_eq!(config.name, "vision");
/// assert!(!config.fail_fast);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReactorConfig {
    /// Name used in log fields.
    pub name: String,

    /// Stop a dispatch at the first failing subscriber.
    ///
    /// Off by default: every subscriber runs and failures are reported
    /// individually.
    pub fail_fast: bool,
}

impl ReactorConfig {
    /// Default configuration with the given name.
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set whether dispatch stops at the first failure.
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Parse a configuration from JSON.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Dispatch policy implied by `fail_fast`.
    pub fn failure_policy(&self) -> FailurePolicy {
        if self.fail_fast {
            FailurePolicy::Stop
        } else {
            FailurePolicy::Continue
        }
    }
}

impl Default for ReactorConfig {
    fn default() -> Self {
        Self {
            name: "reactor".to_string(),
            fail_fast: false,
        }
    }
}
