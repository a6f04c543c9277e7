//! Player attribute definitions and their numeric bounds.

use serde::Serialize;
use storyloom_core::error::DomainError;

/// Inclusive range an attribute value must stay within.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AttributeBounds {
    /// Lowest permitted value.
    pub min: i32,
    /// Highest permitted value.
    pub max: i32,
}

impl AttributeBounds {
    /// Creates a bounds pair.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `min > max`.
    pub fn new(min: i32, max: i32) -> Result<Self, DomainError> {
        if min > max {
            return Err(DomainError::Validation(format!(
                "attribute lower bound {min} exceeds upper bound {max}"
            )));
        }
        Ok(Self { min, max })
    }

    /// Returns `true` if `value` lies within the bounds.
    #[must_use]
    pub fn contains(self, value: i32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Clamps a wide intermediate value into the bounds.
    #[must_use]
    pub fn clamp(self, value: i64) -> i32 {
        let clamped = value.clamp(i64::from(self.min), i64::from(self.max));
        i32::try_from(clamped).unwrap_or(self.max)
    }

    /// Applies a signed delta, saturating at the bounds.
    #[must_use]
    pub fn apply_delta(self, current: i32, delta: i32) -> i32 {
        self.clamp(i64::from(current) + i64::from(delta))
    }
}

/// A numeric attribute the player's choices move up and down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeDefinition {
    /// Unique key used in choices and saves.
    pub key: String,
    /// Display label.
    pub label: String,
    /// Value in a fresh session.
    pub initial_value: i32,
    /// Permitted range.
    pub bounds: AttributeBounds,
    /// Optional display icon.
    pub icon: Option<String>,
    /// Optional display color.
    pub color: Option<String>,
    /// Optional gameplay tip shown next to the attribute.
    pub tip: Option<String>,
}
