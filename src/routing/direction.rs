use crate::geometry::{Axis, Point};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Enumeration order of the direction table.
pub const DIRECTIONS: [Direction; 4] = [
    Direction::Up,
    Direction::Down,
    Direction::Left,
    Direction::Right,
];

impl Direction {
    /// Unit vector in screen space (+y points down).
    pub fn vector(self) -> Point {
        match self {
            Direction::Up => Point::new(0.0, -1.0),
            Direction::Down => Point::new(0.0, 1.0),
            Direction::Left => Point::new(-1.0, 0.0),
            Direction::Right => Point::new(1.0, 0.0),
        }
    }

    pub const fn negate(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// The axis this direction runs along.
    pub fn axis(self) -> Axis {
        match self {
            Direction::Up | Direction::Down => Axis::Y,
            Direction::Left | Direction::Right => Axis::X,
        }
    }

    /// +1 when the direction increases its axis coordinate, -1 otherwise.
    pub fn sign(self) -> f32 {
        match self {
            Direction::Down | Direction::Right => 1.0,
            Direction::Up | Direction::Left => -1.0,
        }
    }

    pub fn dot(self, other: Direction) -> f32 {
        self.vector().dot(other.vector())
    }
}

/// Outward normals of the four attachment sides of a routed edge.
///
/// `start` is the source side, `mid_enter` the label side facing the first leg,
/// `mid_exit` the opposite label side facing the second leg, `end` the target side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DirectionGroup {
    pub start: Direction,
    pub mid_enter: Direction,
    pub mid_exit: Direction,
    pub end: Direction,
}

impl DirectionGroup {
    pub const fn new(start: Direction, mid_enter: Direction, end: Direction) -> Self {
        Self {
            start,
            mid_enter,
            mid_exit: mid_enter.negate(),
            end,
        }
    }
}

const fn build_direction_table() -> [DirectionGroup; 64] {
    let mut table = [DirectionGroup::new(Direction::Up, Direction::Up, Direction::Up); 64];
    let mut i = 0;
    while i < 64 {
        table[i] = DirectionGroup::new(DIRECTIONS[i % 4], DIRECTIONS[i / 16], DIRECTIONS[(i / 4) % 4]);
        i += 1;
    }
    table
}

/// Every routing combination; the index order is the ranking tie-break.
pub static DIRECTION_TABLE: [DirectionGroup; 64] = build_direction_table();
