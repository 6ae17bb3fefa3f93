use std::collections::HashSet;
use std::fmt::{Debug, Display, Formatter};
use std::num::NonZero;

use ndarray::Array2;
use petgraph::graphmap::UnGraphMap;
use petgraph::visit::Bfs;

use crate::action_log::{ActionLog, LogEntry};
use crate::error::{GridError, PlacementFailure};
use crate::event::{BoardEvent, Subscriber, SubscriptionId};
use crate::node::{Node, NodeKind};
use crate::position::{Dimension, Position};
use crate::propagation::Propagator;
use crate::side::{Side, Sides};

// indexed by `Sides::bits`, north being the lowest bit
const LIGHT_GLYPHS: [char; 16] = ['·', '╵', '╶', '└', '╷', '│', '┌', '├', '╴', '┘', '─', '┴', '┐', '┤', '┬', '┼'];
const HEAVY_GLYPHS: [char; 16] = ['·', '╹', '╺', '┗', '╻', '┃', '┏', '┣', '╸', '┛', '━', '┻', '┓', '┫', '┳', '╋'];

/// The largest number of cells a [`Board`] may have. Larger boards, including logs with huge headers, are refused
/// with [`GridError::InvalidDimensions`].
pub const MAX_CELLS: usize = 1 << 20;

/// A rectangular grid of [`Node`]s with one power source and any number of bulbs.
///
/// A new board is entirely [`Empty`](NodeKind::Empty); cells are then populated once each with
/// [`create_power`](Self::create_power), [`create_link`](Self::create_link) and [`create_bulb`](Self::create_bulb).
/// Puzzles are usually produced by a [`Generator`](crate::Generator) or rebuilt with [`Board::from_log`].
///
/// Every mutation is reported, in order, to the board's [`ActionLog`], to the propagation engine (rotations only) and
/// then to subscribers registered with [`subscribe`](Self::subscribe).
pub struct Board {
    pub(crate) nodes: Array2<Node>,
    // rows, cols
    pub(crate) dims: (Dimension, Dimension),
    pub(crate) power: Option<Position>,
    pub(crate) bulbs: Vec<Position>,
    pub(crate) log: ActionLog,
    propagator: Propagator,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: usize,
}

impl Board {
    /// An all-empty board of `rows` by `cols` cells. Records the board header in the action log.
    ///
    /// Both extents must be non-zero and the board may hold at most [`MAX_CELLS`] cells.
    pub fn new(rows: usize, cols: usize) -> Result<Self, GridError> {
        let (Some(row_dim), Some(col_dim)) = (NonZero::new(rows), NonZero::new(cols)) else {
            return Err(GridError::InvalidDimensions { rows, cols });
        };
        if rows.checked_mul(cols).filter(|cells| *cells <= MAX_CELLS).is_none() {
            return Err(GridError::InvalidDimensions { rows, cols });
        }

        let mut log = ActionLog::new();
        log.append(LogEntry::Init { rows, cols });

        Ok(Self {
            nodes: Array2::from_shape_fn((rows, cols), |index| Node::empty(Position::from(index))),
            dims: (row_dim, col_dim),
            power: None,
            bulbs: Vec::new(),
            log,
            propagator: Propagator::default(),
            subscribers: Vec::new(),
            next_subscription: 0,
        })
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.dims.0.get()
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.dims.1.get()
    }

    /// Whether `position` lies on the board.
    pub fn contains(&self, position: Position) -> bool {
        (1..=self.rows()).contains(&position.row()) && (1..=self.cols()).contains(&position.col())
    }

    /// The node at `position`, or [`GridError::OutOfBounds`].
    pub fn node(&self, position: Position) -> Result<&Node, GridError> {
        if !self.contains(position) {
            return Err(GridError::OutOfBounds(position));
        }

        self.nodes.get(position.as_index()).ok_or(GridError::OutOfBounds(position))
    }

    fn node_mut(&mut self, position: Position) -> Result<&mut Node, GridError> {
        if !self.contains(position) {
            return Err(GridError::OutOfBounds(position));
        }

        self.nodes.get_mut(position.as_index()).ok_or(GridError::OutOfBounds(position))
    }

    /// All nodes in row-major order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Where the power node is, once placed.
    pub fn power(&self) -> Option<Position> {
        self.power
    }

    /// Bulb positions in creation order.
    pub fn bulbs(&self) -> &[Position] {
        &self.bulbs
    }

    /// The board's action log.
    pub fn log(&self) -> &ActionLog {
        &self.log
    }

    /// Direct access to the log cursor. Moving the cursor does not touch the board; see
    /// [`step_back`](Self::step_back) and [`step_forward`](Self::step_forward) for undo and redo.
    pub fn log_mut(&mut self) -> &mut ActionLog {
        &mut self.log
    }

    /// Create a link with two or more `sides`.
    pub fn create_link(&mut self, position: Position, sides: impl Into<Sides>) -> Result<&Node, GridError> {
        self.create_node(position, NodeKind::Link, sides.into())
    }

    /// Create a bulb facing `side`.
    pub fn create_bulb(&mut self, position: Position, side: Side) -> Result<&Node, GridError> {
        self.create_node(position, NodeKind::Bulb, Sides::from([side]))
    }

    /// Create the power source with one or more `sides`. A board holds at most one.
    pub fn create_power(&mut self, position: Position, sides: impl Into<Sides>) -> Result<&Node, GridError> {
        self.create_node(position, NodeKind::Power, sides.into())
    }

    /// Upgrade the empty cell at `position` to `kind`.
    pub fn create_node(&mut self, position: Position, kind: NodeKind, sides: Sides) -> Result<&Node, GridError> {
        self.check_placement(position, kind, sides)
            .map_err(|reason| GridError::InvalidPlacement { position, reason })?;

        *self.node_mut(position)? = Node::new(position, kind, sides);
        match kind {
            NodeKind::Power => self.power = Some(position),
            NodeKind::Bulb => self.bulbs.push(position),
            NodeKind::Link | NodeKind::Empty => {}
        }

        self.dispatch(BoardEvent::NodeCreated { position, kind, sides });
        self.node(position)
    }

    fn check_placement(&self, position: Position, kind: NodeKind, sides: Sides) -> Result<(), PlacementFailure> {
        if kind == NodeKind::Empty {
            return Err(PlacementFailure::EmptyKind);
        }
        let existing = self.node(position).map_err(|_| PlacementFailure::OutOfBounds)?;
        if !existing.is(NodeKind::Empty) {
            return Err(PlacementFailure::Occupied);
        }
        if kind == NodeKind::Power && self.power.is_some() {
            return Err(PlacementFailure::PowerExists);
        }
        if !kind.accepts_side_count(sides.len()) {
            return Err(PlacementFailure::SideCount { kind, got: sides.len() });
        }

        Ok(())
    }

    /// True iff every bulb is powered.
    pub fn is_complete(&self) -> bool {
        self.bulbs.iter()
            .filter_map(|position| self.node(*position).ok())
            .all(Node::is_powered)
    }

    /// Energize the board from its power node.
    ///
    /// Fails with [`GridError::NoPowerSource`] until a power node and at least one bulb exist.
    pub fn init(&mut self) -> Result<(), GridError> {
        if self.power.is_none() || self.bulbs.is_empty() {
            return Err(GridError::NoPowerSource);
        }

        self.recompute_power();
        self.notify(&BoardEvent::Initialized);
        Ok(())
    }

    /// Rotate the node at `position` one step clockwise.
    ///
    /// Returns `Ok(false)` for nodes that cannot rotate (empty cells, nodes connecting all four sides).
    /// `player` turns count towards the node's [`rotation_count`](Node::rotation_count); both kinds are logged.
    pub fn turn(&mut self, position: Position, player: bool) -> Result<bool, GridError> {
        let turned = self.node_mut(position)?.turn(player);
        if turned {
            log::trace!("turn {} (player: {})", position, player);
            self.dispatch(BoardEvent::Turned { position, player });
        }
        Ok(turned)
    }

    /// Rotate the node at `position` one step counter-clockwise, undoing a [`turn`](Self::turn).
    pub fn turn_back(&mut self, position: Position, player: bool) -> Result<bool, GridError> {
        let turned = self.node_mut(position)?.turn_back(player);
        if turned {
            log::trace!("turn back {} (player: {})", position, player);
            self.dispatch(BoardEvent::TurnedBack { position, player });
        }
        Ok(turned)
    }

    /// Register `callback` for every subsequent [`BoardEvent`]. Callbacks run in registration order.
    pub fn subscribe(&mut self, callback: impl FnMut(&BoardEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Returns whether `id` was subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(subscribed, _)| *subscribed != id);
        self.subscribers.len() != before
    }

    pub(crate) fn dispatch(&mut self, event: BoardEvent) {
        if let Some(entry) = event.log_entry() {
            self.log.append(entry);
        }
        if event.changes_topology() {
            self.recompute_power();
        }
        self.notify(&event);
    }

    /// Reset and re-flood. Power changes found here are dispatched with the propagator's guard held, so they never
    /// cause a nested recompute.
    fn recompute_power(&mut self) {
        if self.propagator.is_recomputing() {
            return;
        }

        self.propagator.begin();
        let changes = self.propagator.recompute(&mut self.nodes, self.power);
        changes.into_iter().for_each(|change| self.dispatch(change));
        self.propagator.finish();
    }

    fn notify(&mut self, event: &BoardEvent) {
        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(event);
        }
    }

    /// Undirected graph of the current connections: an edge joins two adjacent positions whose nodes connect to each
    /// other. Empty cells and unconnected nodes appear as isolated vertices.
    pub fn connection_graph(&self) -> UnGraphMap<Position, Side> {
        let mut graph = UnGraphMap::with_capacity(self.nodes.len(), 2 * self.nodes.len());

        for node in self.nodes.iter() {
            graph.add_node(node.position());
        }
        for node in self.nodes.iter() {
            // south and east cover every adjacent pair once
            for side in [Side::East, Side::South] {
                let Some(neighbor) = side.step_from(node.position()).and_then(|p| self.node(p).ok()) else {
                    continue;
                };
                if node.connects(side) && neighbor.connects(side.opposite()) {
                    graph.add_edge(node.position(), neighbor.position(), side);
                }
            }
        }

        graph
    }

    /// Positions reachable from the power node over [`connection_graph`](Self::connection_graph), by breadth-first
    /// search. After [`init`](Self::init) this is exactly the set of powered nodes.
    pub fn reachable_from_power(&self) -> HashSet<Position> {
        let Some(power) = self.power else {
            return HashSet::new();
        };

        let graph = self.connection_graph();
        let mut reached = HashSet::new();
        let mut bfs = Bfs::new(&graph, power);
        while let Some(position) = bfs.next(&graph) {
            reached.insert(position);
        }

        reached
    }

    fn glyph(node: &Node) -> char {
        match node.kind() {
            NodeKind::Empty => '.',
            NodeKind::Power => 'P',
            NodeKind::Bulb => if node.is_powered() { 'O' } else { 'o' },
            NodeKind::Link => {
                let glyphs = if node.is_powered() { &HEAVY_GLYPHS } else { &LIGHT_GLYPHS };
                glyphs[node.sides().bits() as usize]
            }
        }
    }
}

impl Display for Board {
    /// One line per row: `.` empty, `P` power, `o`/`O` unlit/lit bulb, links as light (unpowered) or heavy (powered)
    /// box-drawing pipes.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let glyphs = self.nodes.map(Self::glyph);

        let mut out = String::with_capacity(glyphs.nrows() * (glyphs.ncols() + 1));
        for row in glyphs.rows() {
            for glyph in row {
                out.push(*glyph);
            }
            out.push('\n');
        }

        write!(f, "{}", out)
    }
}

impl Debug for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Board")
            .field("rows", &self.rows())
            .field("cols", &self.cols())
            .field("power", &self.power)
            .field("bulbs", &self.bulbs)
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}
