//! Error types for NewsVerse client operations.

use thiserror::Error;

/// Classified failure of one remote round trip.
///
/// The gateway classifies; callers decide what to do with each class:
/// `Unauthorized` means "not logged in" and is never escalated to the user
/// as an error, `Conflict` gets a specific message, `Transient` is safe to
/// retry by re-invoking the same action, `Unknown` is the fallback.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Not authenticated")]
    Unauthorized,

    #[error("Conflict: {reason}")]
    Conflict { reason: String },

    #[error("Transient failure: {reason}")]
    Transient { reason: String },

    #[error("Unexpected failure: {reason}")]
    Unknown { reason: String },
}

impl GatewayError {
    /// Short classification label, used in notices and log fields.
    pub fn class(&self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::Conflict { .. } => "conflict",
            Self::Transient { .. } => "transient",
            Self::Unknown { .. } => "unknown",
        }
    }

    /// Whether re-invoking the same action is a sensible recovery.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }
}

/// Input validation errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("{field} out of range: {value} (allowed {min}-{max})")]
    OutOfRange {
        field: String,
        value: i64,
        min: i64,
        max: i64,
    },
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Master error type for all NewsVerse client errors.
#[derive(Debug, Clone, Error)]
pub enum NewsverseError {
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for NewsVerse client operations.
pub type NewsverseResult<T> = Result<T, NewsverseError>;

/// Result type alias for gateway round trips.
pub type GatewayResult<T> = Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_error_classes() {
        assert_eq!(GatewayError::Unauthorized.class(), "unauthorized");
        let conflict = GatewayError::Conflict {
            reason: "already rated".to_string(),
        };
        assert_eq!(conflict.class(), "conflict");
        assert!(!conflict.is_retryable());
        let transient = GatewayError::Transient {
            reason: "502".to_string(),
        };
        assert!(transient.is_retryable());
    }

    #[test]
    fn test_gateway_error_display() {
        let err = GatewayError::Conflict {
            reason: "already rated".to_string(),
        };
        assert!(format!("{err}").contains("already rated"));
    }

    #[test]
    fn test_master_error_from_variants() {
        let gateway = NewsverseError::from(GatewayError::Unauthorized);
        assert!(matches!(gateway, NewsverseError::Gateway(_)));

        let validation = NewsverseError::from(ValidationError::InvalidValue {
            field: "phone_number".to_string(),
            reason: "bad".to_string(),
        });
        assert!(matches!(validation, NewsverseError::Validation(_)));

        let config = NewsverseError::from(ConfigError::InvalidValue {
            field: "api_base_url".to_string(),
            value: "nope".to_string(),
            reason: "must be a URL".to_string(),
        });
        assert!(matches!(config, NewsverseError::Config(_)));
    }
}
