use std::fmt::{Display, Formatter};
use std::str::FromStr;

use itertools::Itertools;
use strum::{EnumString, VariantArray};

use crate::error::ParseError;
use crate::position::Position;

/// One of the four cardinal connection points of a cell.
///
/// The variants are declared in clockwise order; all rotation arithmetic is modulo 4 over this order.
#[derive(Copy, Clone, VariantArray, EnumString, strum::Display, Eq, PartialEq, Hash, Debug, Ord, PartialOrd)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Side {
    /// Up, towards row 1.
    North,
    /// Right.
    East,
    /// Down.
    South,
    /// Left, towards column 1.
    West,
}

impl Side {
    #[inline]
    fn index(&self) -> usize {
        *self as usize
    }

    /// 90 degrees clockwise.
    pub fn next(&self) -> Self {
        Self::VARIANTS[(self.index() + 1) % Self::VARIANTS.len()]
    }

    /// 90 degrees counter-clockwise.
    pub fn previous(&self) -> Self {
        Self::VARIANTS[(self.index() + Self::VARIANTS.len() - 1) % Self::VARIANTS.len()]
    }

    /// 180 degrees.
    pub fn opposite(&self) -> Self {
        Self::VARIANTS[(self.index() + 2) % Self::VARIANTS.len()]
    }

    /// Step from `position` across this side.
    ///
    /// Returns `None` when the step leaves the 1-based coordinate space; the far edges of a board are checked by the board itself.
    pub fn step_from(&self, position: Position) -> Option<Position> {
        match self {
            Self::North => position.offset_by((-1, 0)),
            Self::East => position.offset_by((0, 1)),
            Self::South => position.offset_by((1, 0)),
            Self::West => position.offset_by((0, -1)),
        }
    }

    /// The side of `a` facing `b`, if the two positions are orthogonally adjacent.
    pub fn direction_to(a: Position, b: Position) -> Option<Self> {
        Self::VARIANTS.iter().find(|side| side.step_from(a) == Some(b)).copied()
    }

    pub(crate) fn parse(name: &str) -> Result<Self, ParseError> {
        Self::from_str(name.trim()).map_err(|_| ParseError::Side(name.to_owned()))
    }
}

/// A set of [`Side`]s, iterated in the fixed north, east, south, west order.
#[derive(Clone, Copy, Default, Eq, PartialEq, Hash, Debug)]
pub struct Sides(u8);

impl Sides {
    /// No sides.
    pub const NONE: Self = Self(0);
    /// All four sides.
    pub const ALL: Self = Self(0b1111);

    #[inline]
    fn bit(side: Side) -> u8 {
        1 << side.index()
    }

    /// Whether `side` is in the set.
    pub fn contains(&self, side: Side) -> bool {
        self.0 & Self::bit(side) != 0
    }

    /// Add `side`; no-op if already present.
    pub fn insert(&mut self, side: Side) {
        self.0 |= Self::bit(side);
    }

    /// Number of sides in the set.
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Whether the set has no sides.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Whether the set holds all four sides. Such a set is unchanged by rotation.
    pub fn is_full(&self) -> bool {
        *self == Self::ALL
    }

    /// The sides in the set, north first, clockwise.
    pub fn iter(&self) -> impl Iterator<Item = Side> {
        let sides = *self;
        Side::VARIANTS.iter().copied().filter(move |side| sides.contains(*side))
    }

    /// Every side moved one step clockwise. The cardinality never changes.
    pub fn rotated_clockwise(&self) -> Self {
        self.iter().map(|side| side.next()).collect()
    }

    /// Every side moved one step counter-clockwise.
    pub fn rotated_counter_clockwise(&self) -> Self {
        self.iter().map(|side| side.previous()).collect()
    }

    /// Bit pattern with north as the lowest bit; used for glyph lookup.
    pub(crate) fn bits(&self) -> u8 {
        self.0
    }
}

impl FromIterator<Side> for Sides {
    fn from_iter<T: IntoIterator<Item = Side>>(iter: T) -> Self {
        let mut sides = Self::NONE;
        iter.into_iter().for_each(|side| sides.insert(side));
        sides
    }
}

impl<const N: usize> From<[Side; N]> for Sides {
    fn from(value: [Side; N]) -> Self {
        value.into_iter().collect()
    }
}

impl Display for Sides {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.iter().join(","))
    }
}

impl FromStr for Sides {
    type Err = ParseError;

    /// Comma-separated side names, e.g. `EAST,SOUTH`. The empty string is the empty set.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Ok(Self::NONE);
        }

        s.split(',').map(Side::parse).collect()
    }
}
