//! Notification preferences and article ratings, with input validation.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// E.164-ish phone number: leading `+`, 7 to 15 digits.
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+[0-9]{7,15}$").expect("phone regex is valid"));

/// 24-hour clock time, `HH:MM`.
static TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9]$").expect("time regex is valid"));

/// Daily-briefing preferences as stored by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UserPreferences {
    /// WhatsApp delivery number, `+` followed by digits.
    pub phone_number: String,
    /// Preferred delivery time, 24-hour `HH:MM`.
    pub preferred_time: String,
}

impl UserPreferences {
    pub fn new(phone_number: impl Into<String>, preferred_time: impl Into<String>) -> Self {
        Self {
            phone_number: phone_number.into(),
            preferred_time: preferred_time.into(),
        }
    }

    /// Validate both fields against the formats the service accepts.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !PHONE_RE.is_match(&self.phone_number) {
            return Err(ValidationError::InvalidValue {
                field: "phone_number".to_string(),
                reason: "expected '+' followed by 7-15 digits".to_string(),
            });
        }
        if !TIME_RE.is_match(&self.preferred_time) {
            return Err(ValidationError::InvalidValue {
                field: "preferred_time".to_string(),
                reason: "expected 24-hour HH:MM".to_string(),
            });
        }
        Ok(())
    }
}

/// A one-shot article rating.
///
/// The accepted range is 1-5, applied identically to input validation and
/// the gateway contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Construct a rating, rejecting out-of-range values.
    pub fn new(value: u8) -> Result<Self, ValidationError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ValidationError::OutOfRange {
                field: "rating".to_string(),
                value: i64::from(value),
                min: i64::from(Self::MIN),
                max: i64::from(Self::MAX),
            })
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rating_accepts_documented_range() {
        for value in Rating::MIN..=Rating::MAX {
            assert!(Rating::new(value).is_ok());
        }
    }

    #[test]
    fn test_rating_rejects_out_of_range() {
        assert!(Rating::new(0).is_err());
        assert!(Rating::new(6).is_err());
        // The original UI clamped input to 9; that bound is gone.
        assert!(Rating::new(9).is_err());
    }

    #[test]
    fn test_preferences_validate_ok() {
        let prefs = UserPreferences::new("+14155550123", "08:00");
        assert!(prefs.validate().is_ok());
    }

    #[test]
    fn test_preferences_reject_bad_phone() {
        let prefs = UserPreferences::new("14155550123", "08:00");
        assert!(matches!(
            prefs.validate(),
            Err(ValidationError::InvalidValue { field, .. }) if field == "phone_number"
        ));
    }

    #[test]
    fn test_preferences_reject_bad_time() {
        for bad in ["24:00", "8:00", "08:60", "noon"] {
            let prefs = UserPreferences::new("+14155550123", bad);
            assert!(prefs.validate().is_err(), "accepted {bad}");
        }
    }

    proptest! {
        #[test]
        fn prop_rating_never_accepts_outside_bounds(value in 0u8..=255) {
            let ok = Rating::new(value).is_ok();
            prop_assert_eq!(ok, (Rating::MIN..=Rating::MAX).contains(&value));
        }
    }
}
