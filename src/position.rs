use std::fmt::{Display, Formatter};
use std::num::NonZero;
use std::str::FromStr;

use ndarray::Ix;

use crate::error::ParseError;

/// A 1-based row or column number.
pub type Coord = usize;
pub(crate) type Dimension = NonZero<Coord>;

/// A cell `(row, column)` on a board. Both coordinates are 1-based, so the top left corner is `Position(1, 1)`.
///
/// Renders and parses as `[row@col]`.
#[derive(Clone, Eq, Hash, Copy, PartialEq, Ord, PartialOrd, Debug)]
pub struct Position(pub Coord, pub Coord);

impl Position {
    /// 1-based row, counted from the top.
    #[inline]
    pub fn row(&self) -> Coord {
        self.0
    }

    /// 1-based column, counted from the left.
    #[inline]
    pub fn col(&self) -> Coord {
        self.1
    }

    /// Zero-based `(row, col)` index into the backing array.
    /// Only meaningful for positions with both coordinates at least 1.
    pub(crate) fn as_index(&self) -> (Ix, Ix) {
        (self.0 - 1, self.1 - 1)
    }

    /// Shift by `(rows, cols)`, or `None` if a coordinate would drop below 1.
    pub(crate) fn offset_by(self, rhs: (isize, isize)) -> Option<Self> {
        let row = self.0.checked_add_signed(rhs.0).filter(|r| *r > 0)?;
        let col = self.1.checked_add_signed(rhs.1).filter(|c| *c > 0)?;
        Some(Self(row, col))
    }
}

impl From<(Ix, Ix)> for Position {
    fn from(value: (Ix, Ix)) -> Self {
        Self(value.0 + 1, value.1 + 1)
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}@{}]", self.0, self.1)
    }
}

/// Parse the `[a@b]` pair shared by positions and the board header.
pub(crate) fn parse_pair(s: &str) -> Result<(Coord, Coord), ParseError> {
    let malformed = || ParseError::Position(s.to_owned());

    let inner = s.trim()
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(malformed)?;
    let (a, b) = inner.split_once('@').ok_or_else(malformed)?;

    Ok((
        a.trim().parse().map_err(|_| malformed())?,
        b.trim().parse().map_err(|_| malformed())?,
    ))
}

impl FromStr for Position {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (row, col) = parse_pair(s)?;
        if row == 0 || col == 0 {
            return Err(ParseError::Position(s.to_owned()));
        }

        Ok(Self(row, col))
    }
}
