use crate::action_log::LogEntry;
use crate::node::NodeKind;
use crate::position::Position;
use crate::side::Sides;

/// A change to a [`Board`](crate::Board), delivered to subscribers after it has taken effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoardEvent {
    /// A node was placed on a previously empty cell.
    NodeCreated {
        /// Where the node was placed.
        position: Position,
        /// What was placed.
        kind: NodeKind,
        /// Its connectors.
        sides: Sides,
    },
    /// One clockwise step. `player` is false for generation-time scrambling and pre-generation log replay.
    Turned {
        /// The rotated node.
        position: Position,
        /// Whether the player made the turn.
        player: bool,
    },
    /// One counter-clockwise step, as used by undo.
    TurnedBack {
        /// The rotated node.
        position: Position,
        /// Whether the player made the turn.
        player: bool,
    },
    /// A node gained or lost power during a recompute.
    PowerChanged {
        /// The affected node.
        position: Position,
        /// Its new state.
        powered: bool,
    },
    /// A propagation pass from the power node finished via [`Board::init`](crate::Board::init).
    Initialized,
}

impl BoardEvent {
    /// The action log entry this event is recorded as, if any.
    pub(crate) fn log_entry(&self) -> Option<LogEntry> {
        match *self {
            Self::NodeCreated { position, kind, sides } => Some(LogEntry::CreateNode { kind, position, sides }),
            Self::Turned { position, .. } => Some(LogEntry::Turn { position }),
            Self::TurnedBack { .. } | Self::PowerChanged { .. } | Self::Initialized => None,
        }
    }

    /// Whether connectivity may have changed, so power has to be recomputed.
    pub(crate) fn changes_topology(&self) -> bool {
        matches!(self, Self::Turned { .. } | Self::TurnedBack { .. })
    }
}

/// Handle returned by [`Board::subscribe`](crate::Board::subscribe).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) usize);

pub(crate) type Subscriber = Box<dyn FnMut(&BoardEvent)>;
