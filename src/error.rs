//! Engine error taxonomy.

use std::error::Error;
use std::fmt;

/// Errors surfaced at the engine boundary.
///
/// The engine validates its inputs before any simulation work begins and
/// refuses to place NaN or infinite values in a report. Both failure classes
/// name the offending parameter or operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// An input parameter is outside its documented range.
    InvalidInput {
        /// Field path (e.g., `"fleet.efficiency_mi_per_kwh"`).
        field: String,
        /// Human-readable constraint description.
        message: String,
    },
    /// A computation would produce a non-finite value (division by zero,
    /// log of a non-positive argument).
    NumericDegeneracy {
        /// Description of the degenerate operation.
        context: String,
    },
}

impl EngineError {
    /// Invalid-input error for the given field.
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Numeric-degeneracy error with the given context.
    pub fn degenerate(context: impl Into<String>) -> Self {
        Self::NumericDegeneracy {
            context: context.into(),
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput { field, message } => {
                write!(f, "invalid input: {field} — {message}")
            }
            Self::NumericDegeneracy { context } => {
                write!(f, "numeric degeneracy: {context}")
            }
        }
    }
}

impl Error for EngineError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_display_names_field() {
        let e = EngineError::invalid("fleet.num_ev", "must be > 0");
        let s = format!("{e}");
        assert!(s.contains("fleet.num_ev"));
        assert!(s.contains("must be > 0"));
    }

    #[test]
    fn degeneracy_display_carries_context() {
        let e = EngineError::degenerate("usable capacity is zero");
        assert!(format!("{e}").contains("usable capacity is zero"));
    }
}
