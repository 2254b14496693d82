//! Collision group bitmasks and chroma tags
//!
//! Membership/filter pairs follow the usual physics-engine rule: two colliders
//! interact only if each one's memberships intersect the other's filter.

use serde::{Deserialize, Serialize};

/// Membership bit: geometry every ball collides with
pub const GROUP_UNIVERSAL: u32 = 1 << 0;
/// Membership bit: balls
pub const GROUP_BALL: u32 = 1 << 1;
pub const GROUP_RED: u32 = 1 << 2;
pub const GROUP_GREEN: u32 = 1 << 3;
pub const GROUP_BLUE: u32 = 1 << 4;
pub const GROUP_ALL: u32 = u32::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionGroups {
    pub memberships: u32,
    pub filter: u32,
}

impl CollisionGroups {
    /// Untagged track geometry
    pub const UNIVERSAL_GEOMETRY: Self = Self::new(GROUP_UNIVERSAL, GROUP_ALL);
    /// Untagged ball: hits everything
    pub const NEUTRAL_BALL: Self = Self::new(GROUP_BALL, GROUP_ALL);

    pub const fn new(memberships: u32, filter: u32) -> Self {
        Self {
            memberships,
            filter,
        }
    }

    /// Whether two colliders with these groups can interact
    #[inline]
    pub fn interacts_with(&self, other: &CollisionGroups) -> bool {
        (self.memberships & other.filter) != 0 && (other.memberships & self.filter) != 0
    }
}

/// Colour tag used by chroma gates and chroma-tagged geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChromaColor {
    Red,
    Green,
    Blue,
}

impl ChromaColor {
    pub fn bit(&self) -> u32 {
        match self {
            ChromaColor::Red => GROUP_RED,
            ChromaColor::Green => GROUP_GREEN,
            ChromaColor::Blue => GROUP_BLUE,
        }
    }

    /// Groups for a ball carrying this colour
    pub fn ball_groups(&self) -> CollisionGroups {
        CollisionGroups::new(GROUP_BALL | self.bit(), GROUP_UNIVERSAL | GROUP_BALL | self.bit())
    }

    /// Groups for geometry that only this colour collides with
    pub fn geometry_groups(&self) -> CollisionGroups {
        CollisionGroups::new(self.bit(), GROUP_ALL)
    }

    pub fn rgba(&self) -> [f32; 4] {
        match self {
            ChromaColor::Red => [1.0, 0.2, 0.25, 1.0],
            ChromaColor::Green => [0.25, 1.0, 0.4, 1.0],
            ChromaColor::Blue => [0.25, 0.45, 1.0, 1.0],
        }
    }
}
