//! Hex map geometry for power placement, adjacency, and cell lookups.
//!
//! Cells use axial coordinates on a pointy-top layout. Power poles do not sit
//! on cells but on *corners*: the vertex shared by three neighbouring hexes.
//! Every vertex of the lattice belongs to exactly one hex as either its
//! `North` (top) or `South` (bottom) corner, so a [`CornerCoordinate`] is a
//! hex plus a [`CornerPosition`].

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod map;
pub use map::{HexGrid, MapCell, Terrain};

// ---------------------------------------------------------------------------
// HexCoordinate
// ---------------------------------------------------------------------------

/// A cell on the hex map, in axial coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HexCoordinate {
    pub q: i32,
    pub r: i32,
}

impl HexCoordinate {
    pub fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Deterministic string key, `"q,r"`.
    pub fn key(&self) -> String {
        self.to_string()
    }

    /// The adjacent cell in the given direction.
    pub fn neighbor(&self, dir: HexDirection) -> HexCoordinate {
        let (dq, dr) = dir.offset();
        HexCoordinate::new(self.q + dq, self.r + dr)
    }

    /// All six adjacent cells, in [`HexDirection::all`] order.
    pub fn neighbors(&self) -> [HexCoordinate; 6] {
        HexDirection::all().map(|dir| self.neighbor(dir))
    }

    /// Whether `other` shares an edge with this cell.
    pub fn is_adjacent(&self, other: &HexCoordinate) -> bool {
        self.distance(other) == 1
    }

    /// Number of steps between two cells.
    pub fn distance(&self, other: &HexCoordinate) -> u32 {
        let dq = self.q - other.q;
        let dr = self.r - other.r;
        let ds = -dq - dr;
        (dq.unsigned_abs() + dr.unsigned_abs() + ds.unsigned_abs()) / 2
    }

    /// The six corners of this cell, clockwise from the top.
    pub fn corners(&self) -> [CornerCoordinate; 6] {
        let HexCoordinate { q, r } = *self;
        [
            CornerCoordinate::north(HexCoordinate::new(q, r)),
            CornerCoordinate::south(HexCoordinate::new(q + 1, r - 1)),
            CornerCoordinate::north(HexCoordinate::new(q, r + 1)),
            CornerCoordinate::south(HexCoordinate::new(q, r)),
            CornerCoordinate::north(HexCoordinate::new(q - 1, r + 1)),
            CornerCoordinate::south(HexCoordinate::new(q, r - 1)),
        ]
    }
}

impl fmt::Display for HexCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.q, self.r)
    }
}

/// The six edge directions of a pointy-top hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HexDirection {
    East,
    NorthEast,
    NorthWest,
    West,
    SouthWest,
    SouthEast,
}

impl HexDirection {
    /// All six directions, counter-clockwise from east.
    pub fn all() -> [HexDirection; 6] {
        [
            HexDirection::East,
            HexDirection::NorthEast,
            HexDirection::NorthWest,
            HexDirection::West,
            HexDirection::SouthWest,
            HexDirection::SouthEast,
        ]
    }

    /// Axial offset `(dq, dr)` for this direction.
    pub fn offset(&self) -> (i32, i32) {
        match self {
            HexDirection::East => (1, 0),
            HexDirection::NorthEast => (1, -1),
            HexDirection::NorthWest => (0, -1),
            HexDirection::West => (-1, 0),
            HexDirection::SouthWest => (-1, 1),
            HexDirection::SouthEast => (0, 1),
        }
    }

    pub fn opposite(&self) -> HexDirection {
        match self {
            HexDirection::East => HexDirection::West,
            HexDirection::NorthEast => HexDirection::SouthWest,
            HexDirection::NorthWest => HexDirection::SouthEast,
            HexDirection::West => HexDirection::East,
            HexDirection::SouthWest => HexDirection::NorthEast,
            HexDirection::SouthEast => HexDirection::NorthWest,
        }
    }
}

// ---------------------------------------------------------------------------
// CornerCoordinate
// ---------------------------------------------------------------------------

/// Which of its two owned vertices a corner refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CornerPosition {
    /// Top vertex, shared with the north-west and north-east neighbours.
    North,
    /// Bottom vertex, shared with the south-west and south-east neighbours.
    South,
}

/// A lattice vertex: the point shared by exactly three hexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CornerCoordinate {
    pub hex: HexCoordinate,
    pub position: CornerPosition,
}

impl CornerCoordinate {
    pub fn new(hex: HexCoordinate, position: CornerPosition) -> Self {
        Self { hex, position }
    }

    pub fn north(hex: HexCoordinate) -> Self {
        Self::new(hex, CornerPosition::North)
    }

    pub fn south(hex: HexCoordinate) -> Self {
        Self::new(hex, CornerPosition::South)
    }

    /// Deterministic string key, `"q,r,N"` or `"q,r,S"`.
    pub fn key(&self) -> String {
        self.to_string()
    }

    /// The three hexes meeting at this corner. The owning hex comes first.
    pub fn adjacent_hexes(&self) -> [HexCoordinate; 3] {
        let HexCoordinate { q, r } = self.hex;
        match self.position {
            CornerPosition::North => [
                self.hex,
                HexCoordinate::new(q, r - 1),
                HexCoordinate::new(q + 1, r - 1),
            ],
            CornerPosition::South => [
                self.hex,
                HexCoordinate::new(q - 1, r + 1),
                HexCoordinate::new(q, r + 1),
            ],
        }
    }

    /// The three corners joined to this one by a hex edge.
    ///
    /// A north corner only ever neighbours south corners and vice versa.
    pub fn adjacent_corners(&self) -> [CornerCoordinate; 3] {
        let HexCoordinate { q, r } = self.hex;
        match self.position {
            CornerPosition::North => [
                CornerCoordinate::south(HexCoordinate::new(q, r - 1)),
                CornerCoordinate::south(HexCoordinate::new(q + 1, r - 1)),
                CornerCoordinate::south(HexCoordinate::new(q + 1, r - 2)),
            ],
            CornerPosition::South => [
                CornerCoordinate::north(HexCoordinate::new(q, r + 1)),
                CornerCoordinate::north(HexCoordinate::new(q - 1, r + 1)),
                CornerCoordinate::north(HexCoordinate::new(q - 1, r + 2)),
            ],
        }
    }

    /// Whether the two corners are the endpoints of one hex edge.
    pub fn is_adjacent_to(&self, other: &CornerCoordinate) -> bool {
        self.adjacent_corners().contains(other)
    }

    /// Whether `hex` is one of the three hexes meeting here.
    pub fn touches(&self, hex: &HexCoordinate) -> bool {
        self.adjacent_hexes().contains(hex)
    }
}

impl fmt::Display for CornerCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.position {
            CornerPosition::North => 'N',
            CornerPosition::South => 'S',
        };
        write!(f, "{},{tag}", self.hex)
    }
}

/// The three hexes meeting at `corner`.
pub fn get_adjacent_hexes(corner: &CornerCoordinate) -> [HexCoordinate; 3] {
    corner.adjacent_hexes()
}

/// Whether two corners are physically adjacent vertices of the lattice.
pub fn corners_adjacent(a: &CornerCoordinate, b: &CornerCoordinate) -> bool {
    a.is_adjacent_to(b)
}

/// The six corners of `hex`, clockwise from the top.
pub fn corners_of(hex: &HexCoordinate) -> [CornerCoordinate; 6] {
    hex.corners()
}

// ===========================================================================
// Tests
// ===========================================================================
