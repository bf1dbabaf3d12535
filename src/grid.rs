use serde::{Deserialize, Serialize};

/// An integer coordinate on the ground plane. The playfield lives on the
/// XZ plane; the vertical axis is presentation-only and never reaches the
/// simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub z: i32,
}

impl Cell {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// The neighbouring cell one unit step along `dir`.
    pub fn step(self, dir: Dir) -> Self {
        let (dx, dz) = dir.delta();
        Self::new(self.x + dx, self.z + dz)
    }

    /// Euclidean distance between cell centres. Food capture is expressed
    /// as a radius check rather than exact equality.
    pub fn distance(self, other: Cell) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dz = (self.z - other.z) as f32;
        (dx * dx + dz * dz).sqrt()
    }
}

/// Movement direction along the grid axes. No diagonals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dir {
    PosX,
    NegX,
    PosZ,
    NegZ,
}

impl Dir {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Dir::PosX => (1, 0),
            Dir::NegX => (-1, 0),
            Dir::PosZ => (0, 1),
            Dir::NegZ => (0, -1),
        }
    }

    pub fn opposite(self) -> Dir {
        match self {
            Dir::PosX => Dir::NegX,
            Dir::NegX => Dir::PosX,
            Dir::PosZ => Dir::NegZ,
            Dir::NegZ => Dir::PosZ,
        }
    }

    /// True when turning from `self` to `other` would be a 180-degree turn.
    pub fn is_opposite(self, other: Dir) -> bool {
        self.opposite() == other
    }
}
