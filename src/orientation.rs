//! Head orientations a capture session walks through.

use crate::constants::{
    INSTRUCTION_CENTER, INSTRUCTION_COMPLETE, INSTRUCTION_LEFT, INSTRUCTION_RIGHT, ORIENTATION_COUNT,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Required head pose for one capture, in capture order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Looking straight at the camera
    Center,
    /// Head turned to the left (negative yaw)
    Left,
    /// Head turned to the right (positive yaw)
    Right,
}

impl Orientation {
    /// All orientations in required capture order
    pub const ALL: [Orientation; ORIENTATION_COUNT] = [Orientation::Center, Orientation::Left, Orientation::Right];

    /// Position in the capture sequence, usable as an array index
    #[must_use]
    pub const fn ordinal(self) -> usize {
        match self {
            Orientation::Center => 0,
            Orientation::Left => 1,
            Orientation::Right => 2,
        }
    }

    /// Orientation at a given ordinal
    #[must_use]
    pub fn from_ordinal(ordinal: usize) -> Option<Self> {
        Self::ALL.get(ordinal).copied()
    }

    /// Next orientation in the sequence, `None` after `Right`
    #[must_use]
    pub fn next(self) -> Option<Self> {
        Self::from_ordinal(self.ordinal() + 1)
    }

    /// Instruction shown while this orientation is the capture target
    #[must_use]
    pub const fn instruction(self) -> &'static str {
        match self {
            Orientation::Center => INSTRUCTION_CENTER,
            Orientation::Left => INSTRUCTION_LEFT,
            Orientation::Right => INSTRUCTION_RIGHT,
        }
    }

    /// Instruction to show once this orientation has been captured
    #[must_use]
    pub fn instruction_after(self) -> &'static str {
        self.next().map_or(INSTRUCTION_COMPLETE, Orientation::instruction)
    }

    /// Lowercase name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Orientation::Center => "center",
            Orientation::Left => "left",
            Orientation::Right => "right",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinals_follow_capture_order() {
        for (i, orientation) in Orientation::ALL.iter().enumerate() {
            assert_eq!(orientation.ordinal(), i);
            assert_eq!(Orientation::from_ordinal(i), Some(*orientation));
        }
        assert_eq!(Orientation::from_ordinal(3), None);
    }

    #[test]
    fn test_next_sequence() {
        assert_eq!(Orientation::Center.next(), Some(Orientation::Left));
        assert_eq!(Orientation::Left.next(), Some(Orientation::Right));
        assert_eq!(Orientation::Right.next(), None);
    }

    #[test]
    fn test_instruction_after() {
        assert_eq!(Orientation::Center.instruction_after(), INSTRUCTION_LEFT);
        assert_eq!(Orientation::Left.instruction_after(), INSTRUCTION_RIGHT);
        assert_eq!(Orientation::Right.instruction_after(), INSTRUCTION_COMPLETE);
    }
}
