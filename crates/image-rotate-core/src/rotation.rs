//! Quarter-turn rotation state.
//!
//! A rotation is a position on the four-point cycle 0°, 90°, 180°, 270°.
//! Rotating left moves one step counter-clockwise and rotating right one
//! step clockwise, wrapping at the ends:
//!
//! ```text
//! new = (old + 360 + delta) % 360      delta = -90 (left) | +90 (right)
//! ```
//!
//! The angle is persisted on the image element as a string-encoded integer
//! attribute so the overlay geometry can be recomputed from the DOM alone.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Attribute holding the current rotation of an image, in degrees.
pub const ROTATION_ATTRIBUTE: &str = "_rotation";

/// Direction of a single rotate command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Counter-clockwise, -90°.
    Left,
    /// Clockwise, +90°.
    Right,
}

impl Direction {
    /// Signed step in degrees.
    #[inline]
    pub fn delta(self) -> i32 {
        match self {
            Direction::Left => -90,
            Direction::Right => 90,
        }
    }
}

/// Orientation of an image, one of four quarter turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u16)]
pub enum Rotation {
    #[default]
    Deg0 = 0,
    Deg90 = 90,
    Deg180 = 180,
    Deg270 = 270,
}

impl Rotation {
    /// All four positions in clockwise order.
    pub const ALL: [Rotation; 4] = [
        Rotation::Deg0,
        Rotation::Deg90,
        Rotation::Deg180,
        Rotation::Deg270,
    ];

    /// Build a rotation from an angle in degrees.
    ///
    /// Any multiple of 90 is accepted (including negative angles and
    /// angles beyond a full turn); other angles return `None`.
    pub fn from_degrees(degrees: i64) -> Option<Self> {
        match degrees.rem_euclid(360) {
            0 => Some(Rotation::Deg0),
            90 => Some(Rotation::Deg90),
            180 => Some(Rotation::Deg180),
            270 => Some(Rotation::Deg270),
            _ => None,
        }
    }

    /// Read a rotation from the persisted attribute value.
    ///
    /// A missing, empty or non-numeric value reads as 0°. A numeric value
    /// that is not a quarter turn is also treated as 0°.
    pub fn from_attribute(value: Option<&str>) -> Self {
        let Some(raw) = value.map(str::trim).filter(|raw| !raw.is_empty()) else {
            return Rotation::Deg0;
        };

        let degrees = match raw.parse::<f64>() {
            Ok(degrees) if degrees.is_finite() && degrees.fract() == 0.0 => degrees as i64,
            _ => {
                log::warn!("ignoring non-integer rotation attribute {:?}", raw);
                return Rotation::Deg0;
            }
        };

        Rotation::from_degrees(degrees).unwrap_or_else(|| {
            log::warn!("ignoring rotation of {} degrees, not a quarter turn", degrees);
            Rotation::Deg0
        })
    }

    /// Angle in degrees, in `0..360`.
    #[inline]
    pub fn degrees(self) -> i32 {
        self as i32
    }

    /// Advance one step in `direction`.
    pub fn rotate(self, direction: Direction) -> Self {
        let degrees = (self.degrees() + 360 + direction.delta()) % 360;
        // The cycle is closed under ±90
        Rotation::from_degrees(i64::from(degrees)).unwrap_or_default()
    }

    /// Returns true if the image lies on its side (90° or 270°).
    ///
    /// Quarter turns swap the on-screen width and height of the image.
    #[inline]
    pub fn is_quarter_turn(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }

    /// Attribute value to persist, e.g. `"90"`.
    pub fn to_attribute(self) -> String {
        self.degrees().to_string()
    }

    /// CSS transform for this rotation, e.g. `rotate(90deg)`.
    pub fn css_transform(self) -> String {
        format!("rotate({}deg)", self.degrees())
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}
