use thiserror::Error;

use crate::generator::TierSettings;
use crate::node::NodeKind;
use crate::position::Position;

/// Errors raised by board construction, queries, placement, propagation setup and log loading.
///
/// Rotation and propagation themselves never fail on a constructed board.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// A board needs at least one row and one column, and no more than [`MAX_CELLS`](crate::MAX_CELLS) cells.
    #[error("cannot build a {rows}x{cols} board")]
    InvalidDimensions {
        /// Requested rows.
        rows: usize,
        /// Requested columns.
        cols: usize,
    },
    /// The position lies outside the board; treat as "no such node".
    #[error("position {0} is outside the board")]
    OutOfBounds(Position),
    /// A node could not be created; the board is unchanged.
    #[error("cannot place node at {position}: {reason}")]
    InvalidPlacement {
        /// Where the node was to go.
        position: Position,
        /// Why it was refused.
        reason: PlacementFailure,
    },
    /// Propagation was requested before a power node and at least one bulb were placed.
    #[error("board has no power source or no bulbs")]
    NoPowerSource,
    /// Generator settings that cannot yield a puzzle. See [`TierSettings`] for what is accepted.
    #[error("settings {0:?} cannot produce a puzzle")]
    UnplayableSettings(TierSettings),
    /// A malformed log line or textual value.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Reasons a node creation may be refused.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum PlacementFailure {
    /// The position lies outside the board.
    #[error("position is outside the board")]
    OutOfBounds,
    /// The cell already holds a non-empty node.
    #[error("cell is already occupied")]
    Occupied,
    /// A board has a single power node.
    #[error("a power node already exists")]
    PowerExists,
    /// The node kind needs a different number of distinct sides.
    #[error("{kind:?} node cannot have {got} side(s)")]
    SideCount {
        /// The kind being placed.
        kind: NodeKind,
        /// Distinct sides that were given.
        got: usize,
    },
    /// Empty cells are created with the board and cannot be placed.
    #[error("empty nodes cannot be placed")]
    EmptyKind,
}

/// A malformed line, position, side or node in a text log.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Not a `[row@col]` pair of positive integers.
    #[error("malformed position `{0}`")]
    Position(String),
    /// Not one of `NORTH`, `EAST`, `SOUTH`, `WEST`.
    #[error("unknown side `{0}`")]
    Side(String),
    /// Not one of `P`, `L`, `B`, `E`.
    #[error("unknown node kind `{0}`")]
    Kind(String),
    /// Not a `{K[row@col][SIDES]}` node.
    #[error("malformed node `{0}`")]
    Node(String),
    /// A line with an unknown tag.
    #[error("unrecognised log line `{0}`")]
    Line(String),
    /// The log has no `G` header before its first action.
    #[error("log does not start with a board header")]
    MissingInit,
    /// A second `G` header.
    #[error("unexpected board header `{0}` after the first")]
    RepeatedInit(String),
}
