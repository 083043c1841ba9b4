//! Axial hex coordinates.
//!
//! The board uses axial `(q, r)` coordinates with the implicit cube component
//! `s = -q - r`. Persisted maps index tiles and units by the `"q,r"` key
//! produced by [`Coord::key`].
use core::fmt;
use core::ops::{Add, Neg, Sub};
use core::str::FromStr;

/// Axial hex coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coord {
    pub q: i32,
    pub r: i32,
}

impl Coord {
    pub const ORIGIN: Self = Self { q: 0, r: 0 };

    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Cube `s` component.
    pub const fn s(&self) -> i32 {
        -self.q - self.r
    }

    /// Hex distance through cube coordinates.
    pub fn distance(&self, other: Coord) -> u32 {
        let dq = (self.q - other.q).unsigned_abs();
        let dr = (self.r - other.r).unsigned_abs();
        let ds = (self.s() - other.s()).unsigned_abs();
        (dq + dr + ds) / 2
    }

    pub fn neighbor(&self, direction: Direction) -> Coord {
        *self + direction.delta()
    }

    /// All six neighbours in [`Direction::ALL`] order.
    pub fn neighbors(&self) -> [Coord; 6] {
        Direction::ALL.map(|direction| self.neighbor(direction))
    }

    pub fn is_adjacent(&self, other: Coord) -> bool {
        self.distance(other) == 1
    }

    /// Every coordinate within `radius` steps (including `self`), ordered by
    /// `q` then `r`.
    pub fn within(&self, radius: u32) -> Vec<Coord> {
        let n = radius as i32;
        let mut out = Vec::new();
        for dq in -n..=n {
            let lo = (-n).max(-dq - n);
            let hi = n.min(-dq + n);
            for dr in lo..=hi {
                out.push(Coord::new(self.q + dq, self.r + dr));
            }
        }
        out
    }

    /// Map key used by persisted snapshots.
    pub fn key(&self) -> String {
        format!("{},{}", self.q, self.r)
    }

    pub fn parse_key(key: &str) -> Result<Coord, CoordParseError> {
        key.parse()
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.q, self.r)
    }
}

impl Add for Coord {
    type Output = Coord;

    fn add(self, rhs: Coord) -> Coord {
        Coord::new(self.q + rhs.q, self.r + rhs.r)
    }
}

impl Sub for Coord {
    type Output = Coord;

    fn sub(self, rhs: Coord) -> Coord {
        Coord::new(self.q - rhs.q, self.r - rhs.r)
    }
}

impl Neg for Coord {
    type Output = Coord;

    fn neg(self) -> Coord {
        Coord::new(-self.q, -self.r)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid coordinate key `{0}`, expected `q,r`")]
pub struct CoordParseError(pub String);

impl FromStr for Coord {
    type Err = CoordParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoordParseError(s.to_string());
        let (q, r) = s.split_once(',').ok_or_else(invalid)?;
        let q = q.trim().parse().map_err(|_| invalid())?;
        let r = r.trim().parse().map_err(|_| invalid())?;
        Ok(Coord::new(q, r))
    }
}

/// The six hex directions, in the canonical neighbour order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Left,
    TopLeft,
    TopRight,
    Right,
    BottomRight,
    BottomLeft,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::Left,
        Direction::TopLeft,
        Direction::TopRight,
        Direction::Right,
        Direction::BottomRight,
        Direction::BottomLeft,
    ];

    pub const fn delta(self) -> Coord {
        match self {
            Direction::Left => Coord::new(-1, 0),
            Direction::TopLeft => Coord::new(0, -1),
            Direction::TopRight => Coord::new(1, -1),
            Direction::Right => Coord::new(1, 0),
            Direction::BottomRight => Coord::new(0, 1),
            Direction::BottomLeft => Coord::new(-1, 1),
        }
    }

    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::TopLeft => Direction::BottomRight,
            Direction::TopRight => Direction::BottomLeft,
            Direction::Right => Direction::Left,
            Direction::BottomRight => Direction::TopLeft,
            Direction::BottomLeft => Direction::TopRight,
        }
    }
}
