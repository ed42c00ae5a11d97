//! Hex coordinate system using cube coordinates (q, r, s).
//!
//! This module provides the foundational coordinate type for the hive:
//! - `HexCoord`: Identifies a single cell of the unbounded hex grid
//! - `Direction`: The six unit steps between adjacent cells
//!
//! We store all three cube components so that distance and line walking stay
//! symmetric, and enforce the q + r + s = 0 invariant at construction.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when building coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum HexError {
    #[error("Invalid cube coordinate ({q}, {r}, {s}): components must sum to zero")]
    InvalidCoordinate { q: i32, r: i32, s: i32 },

    #[error("Cube coordinate ({q}, {r}, {s}) is too far from the origin")]
    OutOfRange { q: i32, r: i32, s: i32 },
}

/// Largest absolute value of any cube component.
///
/// Keeps neighbor and distance arithmetic far from `i32` overflow.
pub const MAX_COMPONENT: i32 = 1 << 24;

/// One of the six unit steps on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// Top-right
    NorthEast,
    /// Right
    East,
    /// Bottom-right
    SouthEast,
    /// Bottom-left
    SouthWest,
    /// Left
    West,
    /// Top-left
    NorthWest,
}

impl Direction {
    /// All directions in clockwise order starting from NorthEast
    pub const ALL: [Direction; 6] = [
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// Cube offset (dq, dr, ds) of a single step
    pub const fn offset(self) -> (i32, i32, i32) {
        match self {
            Direction::NorthEast => (1, -1, 0),
            Direction::East => (1, 0, -1),
            Direction::SouthEast => (0, 1, -1),
            Direction::SouthWest => (-1, 1, 0),
            Direction::West => (-1, 0, 1),
            Direction::NorthWest => (0, -1, 1),
        }
    }

    /// The direction pointing the other way
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::NorthEast => Direction::SouthWest,
            Direction::East => Direction::West,
            Direction::SouthEast => Direction::NorthWest,
            Direction::SouthWest => Direction::NorthEast,
            Direction::West => Direction::East,
            Direction::NorthWest => Direction::SouthEast,
        }
    }
}

/// Cube coordinate for the hex grid.
///
/// - `q` increases going east
/// - `r` increases going south-east
/// - `s` increases going north-west
///
/// The three components always satisfy q + r + s = 0.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(try_from = "CubeRepr")]
pub struct HexCoord {
    q: i32,
    r: i32,
    s: i32,
}

/// Unchecked wire form, validated on the way in
#[derive(Deserialize)]
struct CubeRepr {
    q: i32,
    r: i32,
    s: i32,
}

impl TryFrom<CubeRepr> for HexCoord {
    type Error = HexError;

    fn try_from(raw: CubeRepr) -> Result<Self, Self::Error> {
        HexCoord::new(raw.q, raw.r, raw.s)
    }
}

impl HexCoord {
    /// The center cell; the first piece of every game goes here
    pub const ORIGIN: HexCoord = HexCoord { q: 0, r: 0, s: 0 };

    /// Create a cube coordinate, checking q + r + s = 0 and the component range
    pub fn new(q: i32, r: i32, s: i32) -> Result<Self, HexError> {
        if i64::from(q) + i64::from(r) + i64::from(s) != 0 {
            return Err(HexError::InvalidCoordinate { q, r, s });
        }
        if [q, r, s].iter().any(|c| c.unsigned_abs() > MAX_COMPONENT.unsigned_abs()) {
            return Err(HexError::OutOfRange { q, r, s });
        }
        Ok(Self { q, r, s })
    }

    /// Create from axial components, deriving s.
    ///
    /// Unchecked: meant for literal cells near the origin. Use
    /// [`HexCoord::new`] for anything that comes from outside.
    pub const fn axial(q: i32, r: i32) -> Self {
        Self { q, r, s: -q - r }
    }

    pub const fn q(&self) -> i32 {
        self.q
    }

    pub const fn r(&self) -> i32 {
        self.r
    }

    pub const fn s(&self) -> i32 {
        self.s
    }

    /// Step once in a direction
    pub const fn add(&self, direction: Direction) -> HexCoord {
        let (dq, dr, ds) = direction.offset();
        HexCoord {
            q: self.q + dq,
            r: self.r + dr,
            s: self.s + ds,
        }
    }

    /// Alias for [`HexCoord::add`]
    pub const fn neighbor(&self, direction: Direction) -> HexCoord {
        self.add(direction)
    }

    /// The six neighboring cells in clockwise order starting from NorthEast
    pub fn neighbors(&self) -> [HexCoord; 6] {
        Direction::ALL.map(|dir| self.add(dir))
    }

    /// Distance to another cell (in steps)
    pub fn distance_to(&self, other: &HexCoord) -> u32 {
        let dq = (i64::from(self.q) - i64::from(other.q)).unsigned_abs();
        let dr = (i64::from(self.r) - i64::from(other.r)).unsigned_abs();
        let ds = (i64::from(self.s) - i64::from(other.s)).unsigned_abs();
        u32::try_from((dq + dr + ds) / 2).unwrap_or(u32::MAX)
    }

    pub fn is_adjacent(&self, other: &HexCoord) -> bool {
        self.distance_to(other) == 1
    }

    /// Direction of an adjacent cell, if it is adjacent
    pub fn direction_to(&self, other: &HexCoord) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|dir| self.add(*dir) == *other)
    }

    /// The two cells adjacent to both `self` and `other`.
    ///
    /// These are the "pinch" cells that decide whether a piece can slide
    /// between two neighbors. Returns `None` if the cells are not adjacent.
    pub fn common_neighbors(&self, other: &HexCoord) -> Option<[HexCoord; 2]> {
        let dir = self.direction_to(other)?;
        let idx = Direction::ALL.iter().position(|d| *d == dir)?;
        let before = Direction::ALL[(idx + 5) % 6];
        let after = Direction::ALL[(idx + 1) % 6];
        Some([self.add(before), self.add(after)])
    }
}

impl std::fmt::Display for HexCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.q, self.r, self.s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_invalid_coordinate_rejected() {
        assert_eq!(
            HexCoord::new(1, 1, 1),
            Err(HexError::InvalidCoordinate { q: 1, r: 1, s: 1 })
        );
        assert_eq!(HexCoord::new(1, -1, 0), Ok(HexCoord::axial(1, -1)));
    }

    #[test]
    fn test_extreme_components_rejected() {
        assert_eq!(
            HexCoord::new(i32::MAX, 1, i32::MIN),
            Err(HexError::OutOfRange {
                q: i32::MAX,
                r: 1,
                s: i32::MIN
            })
        );
        assert_eq!(
            HexCoord::new(i32::MAX, 1, 0),
            Err(HexError::InvalidCoordinate {
                q: i32::MAX,
                r: 1,
                s: 0
            })
        );
        assert_eq!(
            HexCoord::new(i32::MAX, -i32::MAX, 0),
            Err(HexError::OutOfRange {
                q: i32::MAX,
                r: -i32::MAX,
                s: 0
            })
        );
    }

    #[test]
    fn test_edge_of_range_is_usable() {
        let edge = HexCoord::new(MAX_COMPONENT, -MAX_COMPONENT, 0).unwrap();
        for neighbor in edge.neighbors() {
            assert!(edge.is_adjacent(&neighbor));
        }

        let far = HexCoord::new(-MAX_COMPONENT, MAX_COMPONENT, 0).unwrap();
        assert_eq!(edge.distance_to(&far), 2 * MAX_COMPONENT as u32);
    }

    #[test]
    fn test_deserialize_rejects_out_of_range() {
        assert!(serde_json::from_str::<HexCoord>(r#"{"q":2147483647,"r":1,"s":0}"#).is_err());
        assert!(serde_json::from_str::<HexCoord>(
            r#"{"q":2147483647,"r":-2147483647,"s":0}"#
        )
        .is_err());
        assert_eq!(
            serde_json::from_str::<HexCoord>(r#"{"q":2,"r":-3,"s":1}"#).unwrap(),
            HexCoord::axial(2, -3)
        );
    }

    #[test]
    fn test_hex_neighbors() {
        let center = HexCoord::ORIGIN;
        let neighbors = center.neighbors();

        let unique: HashSet<_> = neighbors.iter().collect();
        assert_eq!(unique.len(), 6);

        for neighbor in &neighbors {
            assert_eq!(center.distance_to(neighbor), 1);
            assert_eq!(neighbor.q() + neighbor.r() + neighbor.s(), 0);
        }
    }

    #[test]
    fn test_neighbors_start_top_right_and_go_clockwise() {
        let n = HexCoord::ORIGIN.neighbors();
        assert_eq!(n[0], HexCoord::axial(1, -1));
        assert_eq!(n[1], HexCoord::axial(1, 0));
        assert_eq!(n[2], HexCoord::axial(0, 1));
        assert_eq!(n[3], HexCoord::axial(-1, 1));
        assert_eq!(n[4], HexCoord::axial(-1, 0));
        assert_eq!(n[5], HexCoord::axial(0, -1));

        // Consecutive neighbors touch each other
        for i in 0..6 {
            assert!(n[i].is_adjacent(&n[(i + 1) % 6]));
        }
    }

    #[test]
    fn test_hex_distance() {
        let a = HexCoord::ORIGIN;
        assert_eq!(a.distance_to(&HexCoord::axial(2, -1)), 2);
        assert_eq!(a.distance_to(&HexCoord::axial(-3, 3)), 3);
        assert_eq!(a.distance_to(&a), 0);
    }

    #[test]
    fn test_opposite_direction_returns_home() {
        let start = HexCoord::axial(2, -5);
        for dir in Direction::ALL {
            assert_eq!(start.add(dir).add(dir.opposite()), start);
        }
    }

    #[test]
    fn test_common_neighbors() {
        let a = HexCoord::ORIGIN;
        let b = a.add(Direction::East);
        let [c1, c2] = a.common_neighbors(&b).unwrap();

        assert_eq!(c1, HexCoord::axial(1, -1));
        assert_eq!(c2, HexCoord::axial(0, 1));
        for c in [c1, c2] {
            assert!(c.is_adjacent(&a));
            assert!(c.is_adjacent(&b));
        }

        assert!(a.common_neighbors(&HexCoord::axial(2, 0)).is_none());
        assert!(a.common_neighbors(&a).is_none());
    }

    #[test]
    fn test_deserialize_rejects_broken_invariant() {
        let ok: HexCoord = serde_json::from_str(r#"{"q":1,"r":0,"s":-1}"#).unwrap();
        assert_eq!(ok, HexCoord::axial(1, 0));

        let bad = serde_json::from_str::<HexCoord>(r#"{"q":1,"r":0,"s":0}"#);
        assert!(bad.is_err());
    }
}
