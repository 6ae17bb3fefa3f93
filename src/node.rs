use strum::{EnumString, VariantArray};

use crate::error::ParseError;
use crate::position::Position;
use crate::side::{Side, Sides};

/// What occupies a cell.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd, VariantArray, EnumString, strum::Display)]
pub enum NodeKind {
    /// The unique energy source, always powered.
    #[strum(serialize = "P")]
    Power,
    /// A conductor with at least two connectors.
    #[strum(serialize = "L")]
    Link,
    /// A consumer with exactly one connector. All bulbs lit means the puzzle is solved.
    #[strum(serialize = "B")]
    Bulb,
    /// An unused cell; never connects and never rotates.
    #[strum(serialize = "E")]
    #[default]
    Empty,
}

impl NodeKind {
    pub(crate) fn parse(letter: &str) -> Result<Self, ParseError> {
        letter.parse().map_err(|_| ParseError::Kind(letter.to_owned()))
    }

    /// Whether `count` distinct connectors are acceptable at creation time.
    pub(crate) fn accepts_side_count(&self, count: usize) -> bool {
        match self {
            Self::Power => count >= 1,
            Self::Link => count >= 2,
            Self::Bulb => count == 1,
            Self::Empty => count == 0,
        }
    }
}

/// A single cell of a [`Board`](crate::Board).
///
/// Nodes are owned by their board. Rotation and the powered flag are changed only through board methods
/// so that every change reaches the action log, the propagation engine and subscribers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    position: Position,
    kind: NodeKind,
    sides: Sides,
    initial_sides: Sides,
    rotations: i32,
    powered: bool,
}

impl Node {
    pub(crate) fn new(position: Position, kind: NodeKind, sides: Sides) -> Self {
        Self {
            position,
            kind,
            sides,
            initial_sides: sides,
            rotations: 0,
            powered: kind == NodeKind::Power,
        }
    }

    pub(crate) fn empty(position: Position) -> Self {
        Self::new(position, NodeKind::Empty, Sides::NONE)
    }

    /// Where the node sits.
    pub fn position(&self) -> Position {
        self.position
    }

    /// What the node is.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Shorthand for `self.kind() == kind`.
    pub fn is(&self, kind: NodeKind) -> bool {
        self.kind == kind
    }

    /// Whether the node currently has a connector on `side`.
    pub fn connects(&self, side: Side) -> bool {
        self.sides.contains(side)
    }

    /// Current connectors.
    pub fn sides(&self) -> Sides {
        self.sides
    }

    /// Connectors as created, i.e. the solved orientation for generated puzzles.
    pub fn initial_sides(&self) -> Sides {
        self.initial_sides
    }

    /// Whether the node is reached from the power node. The power node itself is always powered.
    pub fn is_powered(&self) -> bool {
        self.powered
    }

    /// Net number of player turns: clockwise turns count up, player undos count down.
    pub fn rotation_count(&self) -> i32 {
        self.rotations
    }

    fn can_rotate(&self) -> bool {
        !self.is(NodeKind::Empty) && !self.sides.is_full()
    }

    /// Rotate one step clockwise. Returns whether anything moved.
    pub(crate) fn turn(&mut self, player: bool) -> bool {
        if !self.can_rotate() {
            return false;
        }

        self.sides = self.sides.rotated_clockwise();
        if player {
            self.rotations += 1;
        }
        true
    }

    /// Rotate one step counter-clockwise. Returns whether anything moved.
    pub(crate) fn turn_back(&mut self, player: bool) -> bool {
        if !self.can_rotate() {
            return false;
        }

        self.sides = self.sides.rotated_counter_clockwise();
        if player {
            self.rotations -= 1;
        }
        true
    }

    /// Set the powered flag, returning whether it changed. Power nodes stay powered.
    pub(crate) fn set_powered(&mut self, powered: bool) -> bool {
        if self.is(NodeKind::Power) || self.powered == powered {
            return false;
        }

        self.powered = powered;
        true
    }

    /// Fewest clockwise turns that bring the connectors back to their initial orientation.
    pub fn turns_to_initial_state(&self) -> u8 {
        let mut sides = self.sides;
        for turns in 0..4 {
            if sides == self.initial_sides {
                return turns;
            }
            sides = sides.rotated_clockwise();
        }

        // unreachable: rotation is a cyclic group of order 4 on a fixed-size set
        0
    }
}
