//! Runtime configuration.
//!
//! The only setting is which instrumentation wrapper decorates dispatch:
//!
//! | Variable                    | Effect                                              |
//! |-----------------------------|-----------------------------------------------------|
//! | `HOOKLINE_INSTRUMENTATION`  | `default`, `logging` or `timing` (case-insensitive) |
//! | `HOOKLINE_DEBUG`            | `true` selects timing when the above is unset       |
//! | `HOOKLINE_TIMED_CALLBACKS`  | `true` selects timing when the above is unset       |

use hookline_core::CallbackWrapper;
use hookline_std::wrappers::{DefaultWrapper, LoggingWrapper, TimedWrapper};
use std::{fmt, str::FromStr, sync::Arc};
use thiserror::Error;

/// Explicit instrumentation choice.
pub const ENV_INSTRUMENTATION: &str = "HOOKLINE_INSTRUMENTATION";
/// Debug switch, selects timing.
pub const ENV_DEBUG: &str = "HOOKLINE_DEBUG";
/// Timing switch.
pub const ENV_TIMED_CALLBACKS: &str = "HOOKLINE_TIMED_CALLBACKS";

/// Errors raised while reading configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The instrumentation name is not recognised.
    #[error("unknown instrumentation `{0}`, expected one of: default, logging, timing")]
    UnknownInstrumentation(String),
}

/// Which wrapper decorates dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Instrumentation {
    /// No decoration.
    #[default]
    Default,
    /// One debug line per callback invocation.
    Logging,
    /// Durations per chain and per callback.
    Timing,
}

impl Instrumentation {
    /// The wrapper implementing this choice, reporting through `tracing`.
    pub fn wrapper(self) -> Arc<dyn CallbackWrapper> {
        match self {
            Instrumentation::Default => Arc::new(DefaultWrapper),
            Instrumentation::Logging => Arc::new(LoggingWrapper::new()),
            Instrumentation::Timing => Arc::new(TimedWrapper::new()),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Instrumentation::Default => "default",
            Instrumentation::Logging => "logging",
            Instrumentation::Timing => "timing",
        }
    }
}

impl FromStr for Instrumentation {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(Instrumentation::Default),
            "logging" => Ok(Instrumentation::Logging),
            "timing" => Ok(Instrumentation::Timing),
            _ => Err(ConfigError::UnknownInstrumentation(s.to_string())),
        }
    }
}

impl fmt::Display for Instrumentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for [`Callbacks::from_config`](crate::Callbacks::from_config).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct CallbacksConfig {
    /// Wrapper selection.
    pub instrumentation: Instrumentation,
}

impl CallbacksConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup.
    ///
    /// An explicit `HOOKLINE_INSTRUMENTATION` wins. Otherwise either boolean
    /// switch set to `true` selects timing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let explicit = lookup(ENV_INSTRUMENTATION).filter(|value| !value.trim().is_empty());
        if let Some(value) = explicit {
            return Ok(Self {
                instrumentation: value.parse()?,
            });
        }

        let enabled = |key: &str| {
            lookup(key).is_some_and(|value| value.trim().eq_ignore_ascii_case("true"))
        };
        let instrumentation = if enabled(ENV_DEBUG) || enabled(ENV_TIMED_CALLBACKS) {
            Instrumentation::Timing
        } else {
            Instrumentation::Default
        };
        Ok(Self { instrumentation })
    }

    /// Set instrumentation.
    pub fn with_instrumentation(mut self, instrumentation: Instrumentation) -> Self {
        self.instrumentation = instrumentation;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Timing".parse(), Ok(Instrumentation::Timing));
        assert_eq!(" logging ".parse(), Ok(Instrumentation::Logging));
        assert_eq!(
            "verbose".parse::<Instrumentation>(),
            Err(ConfigError::UnknownInstrumentation("verbose".into()))
        );
    }

    #[test]
    fn display_round_trips() {
        for choice in [
            Instrumentation::Default,
            Instrumentation::Logging,
            Instrumentation::Timing,
        ] {
            assert_eq!(choice.to_string().parse(), Ok(choice));
        }
    }

    #[test]
    fn empty_environment_is_default() {
        let config = CallbacksConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.instrumentation, Instrumentation::Default);
    }

    #[test]
    fn debug_flags_select_timing() {
        let config = CallbacksConfig::from_lookup(lookup(&[(ENV_DEBUG, "true")])).unwrap();
        assert_eq!(config.instrumentation, Instrumentation::Timing);

        let config =
            CallbacksConfig::from_lookup(lookup(&[(ENV_TIMED_CALLBACKS, "TRUE")])).unwrap();
        assert_eq!(config.instrumentation, Instrumentation::Timing);

        let config = CallbacksConfig::from_lookup(lookup(&[(ENV_DEBUG, "1")])).unwrap();
        assert_eq!(config.instrumentation, Instrumentation::Default);
    }

    #[test]
    fn explicit_choice_wins() {
        let config = CallbacksConfig::from_lookup(lookup(&[
            (ENV_INSTRUMENTATION, "logging"),
            (ENV_DEBUG, "true"),
        ]))
        .unwrap();
        assert_eq!(config.instrumentation, Instrumentation::Logging);

        let err = CallbacksConfig::from_lookup(lookup(&[(ENV_INSTRUMENTATION, "loud")]));
        assert!(err.is_err());
    }
}
