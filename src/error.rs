//! Error and advisory types for a calculation run.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Fatal failure that aborts a whole calculation run.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CalcError {
    /// The input cannot produce a meaningful design (e.g. no demand).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A stage produced a degenerate or non-finite intermediate value.
    #[error("calculation failed in {stage}: {message}")]
    Computation {
        stage: &'static str,
        message: String,
    },
}

impl CalcError {
    pub(crate) fn computation(stage: &'static str, message: impl Into<String>) -> Self {
        Self::Computation {
            stage,
            message: message.into(),
        }
    }
}

/// Non-fatal condition raised while sizing or accounting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Advisory {
    /// Stage that raised it (`"sizing"`, `"accounting"`).
    pub stage: &'static str,
    pub message: String,
}

impl Advisory {
    pub(crate) fn new(stage: &'static str, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
        }
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.stage, self.message)
    }
}

/// Checks that `value` is finite, naming it in the error otherwise.
pub(crate) fn ensure_finite(stage: &'static str, what: &str, value: f64) -> Result<f64, CalcError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::computation(stage, format!("{what} is not finite ({value})")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn computation_error_names_stage() {
        let e = CalcError::computation("sizing", "zero yield");
        assert_eq!(e.to_string(), "calculation failed in sizing: zero yield");
    }

    #[test]
    fn ensure_finite_rejects_nan_and_infinity() {
        assert!(ensure_finite("finance", "npv", f64::NAN).is_err());
        assert!(ensure_finite("finance", "npv", f64::INFINITY).is_err());
        assert_eq!(ensure_finite("finance", "npv", 1.5), Ok(1.5));
    }

    #[test]
    fn advisory_display_is_prefixed_with_stage() {
        let a = Advisory::new("sizing", "Sized for 2 diesel-free days");
        assert_eq!(a.to_string(), "[sizing] Sized for 2 diesel-free days");
    }
}
