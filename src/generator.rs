//! Random puzzle generation by difficulty tier.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use itertools::Itertools;
use ndarray::Array2;
use petgraph::graphmap::UnGraphMap;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use strum::{EnumString, VariantArray};

use crate::board::Board;
use crate::error::GridError;
use crate::node::NodeKind;
use crate::position::Position;
use crate::side::{Side, Sides};

/// The built-in puzzle tiers, parsed from their names (`"Easy"`, `"Medium"`, `"Hard"`).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, VariantArray, EnumString, strum::Display)]
pub enum Difficulty {
    /// 4x4, 4 bulbs.
    Easy,
    /// 8x8, 8 bulbs.
    Medium,
    /// 16x16, 12 bulbs.
    Hard,
}

impl Difficulty {
    /// Board size and density for this tier.
    pub fn settings(&self) -> TierSettings {
        match self {
            Self::Easy => TierSettings { rows: 4, cols: 4, edge_ratio: (1, 2), bulbs: 4 },
            Self::Medium => TierSettings { rows: 8, cols: 8, edge_ratio: (3, 4), bulbs: 8 },
            Self::Hard => TierSettings { rows: 16, cols: 16, edge_ratio: (1, 1), bulbs: 12 },
        }
    }
}

/// Size and density of a generated puzzle.
///
/// Settings are playable when the board has at least two cells, the edge budget is at least one and at least one
/// bulb is requested. Every built-in tier is playable.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct TierSettings {
    /// Board rows.
    pub rows: usize,
    /// Board columns.
    pub cols: usize,
    /// `(numerator, denominator)` of `rows * cols` that bounds the number of spanning-tree edges.
    pub edge_ratio: (usize, usize),
    /// How many bulbs to place, as far as the spanning tree has room for them.
    pub bulbs: usize,
}

impl TierSettings {
    /// Used for any tier name that is not a [`Difficulty`].
    pub const FALLBACK: Self = Self { rows: 8, cols: 8, edge_ratio: (1, 2), bulbs: 6 };

    /// Settings for the tier called `name`, silently falling back to [`Self::FALLBACK`].
    pub fn for_tier(name: &str) -> Self {
        match name.parse::<Difficulty>() {
            Ok(difficulty) => difficulty.settings(),
            Err(_) => {
                log::warn!("unknown difficulty {:?}, using the default board", name);
                Self::FALLBACK
            }
        }
    }

    /// Maximum number of spanning-tree edges. A zero denominator counts as one.
    pub fn edge_limit(&self) -> usize {
        self.rows.saturating_mul(self.cols).saturating_mul(self.edge_ratio.0) / self.edge_ratio.1.max(1)
    }

    /// Whether generation with these settings can succeed.
    pub fn is_playable(&self) -> bool {
        self.rows.saturating_mul(self.cols) >= 2 && self.edge_limit() >= 1 && self.bulbs >= 1
    }
}

/// A candidate spanning-tree edge. Field order makes the weight the primary sort key.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
struct FrontierEdge {
    weight: u32,
    to: Position,
    from: Position,
}

/// Builds random, solvable puzzles.
///
/// A randomized Prim's algorithm grows a spanning tree from a random power cell. Branching cells become links, dead
/// ends become bulbs, and every node is then turned a random number of times. With [`Generator::seeded`] the same
/// seed always yields the same board.
pub struct Generator<R: Rng> {
    rng: R,
}

impl Generator<ChaCha8Rng> {
    /// A reproducible generator: equal seeds give equal boards.
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }

    /// A generator seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self::new(ChaCha8Rng::from_entropy())
    }
}

impl<R: Rng> Generator<R> {
    /// A generator drawing from `rng`.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Generate a scrambled puzzle for the tier called `name`; unknown names get [`TierSettings::FALLBACK`].
    pub fn generate(&mut self, name: &str) -> Result<Board, GridError> {
        self.generate_with(TierSettings::for_tier(name))
    }

    /// Generate a scrambled puzzle from explicit settings.
    ///
    /// Fails with [`GridError::InvalidDimensions`] for boards [`Board::new`] refuses and with
    /// [`GridError::UnplayableSettings`] when the settings are not [playable](TierSettings::is_playable). Playable
    /// settings always produce a board.
    pub fn generate_with(&mut self, settings: TierSettings) -> Result<Board, GridError> {
        let mut board = Board::new(settings.rows, settings.cols)?;
        if !settings.is_playable() {
            return Err(GridError::UnplayableSettings(settings));
        }

        let (power, connections) = self.spanning_structure(&board, settings.edge_limit());
        self.place_nodes(&mut board, power, &connections, settings.bulbs)?;
        self.scramble(&mut board)?;

        board.init()?;
        board.mark_generation_finished();

        log::debug!(
            "generated {}x{} board: {} connection(s), {} bulb(s), power at {}",
            settings.rows, settings.cols, connections.edge_count(), board.bulbs().len(), power,
        );
        Ok(board)
    }

    /// Grow a random spanning tree over the cells of `board`, stopping after `edge_limit` edges.
    ///
    /// Returns the start cell, which becomes the power node, and the tree. Every vertex of the tree is connected to the
    /// start cell.
    pub(crate) fn spanning_structure(&mut self, board: &Board, edge_limit: usize) -> (Position, UnGraphMap<Position, ()>) {
        let start = Position(self.rng.gen_range(1..=board.rows()), self.rng.gen_range(1..=board.cols()));

        let mut visited = Array2::from_elem((board.rows(), board.cols()), false);
        let mut frontier = BinaryHeap::new();
        let mut tree = UnGraphMap::new();

        tree.add_node(start);
        visited[start.as_index()] = true;
        self.push_neighbors(board, &visited, &mut frontier, start);

        while tree.edge_count() < edge_limit {
            let Some(Reverse(edge)) = frontier.pop() else {
                break;
            };
            if visited[edge.to.as_index()] {
                continue;
            }

            visited[edge.to.as_index()] = true;
            tree.add_edge(edge.from, edge.to, ());
            self.push_neighbors(board, &visited, &mut frontier, edge.to);
        }

        (start, tree)
    }

    fn push_neighbors(&mut self, board: &Board, visited: &Array2<bool>, frontier: &mut BinaryHeap<Reverse<FrontierEdge>>, from: Position) {
        for side in Side::VARIANTS {
            let Some(to) = side.step_from(from).filter(|to| board.contains(*to)) else {
                continue;
            };
            if !visited[to.as_index()] {
                frontier.push(Reverse(FrontierEdge { weight: self.rng.gen_range(0..100), to, from }));
            }
        }
    }

    /// Power at `power`, links on branching cells, bulbs on dead ends (shuffled), then on any remaining connected
    /// cell if the dead ends ran out. Dead ends that get no bulb stay empty.
    fn place_nodes(&mut self, board: &mut Board, power: Position, tree: &UnGraphMap<Position, ()>, bulbs: usize) -> Result<(), GridError> {
        let sides_of = |position: Position| -> Sides {
            tree.neighbors(position)
                .filter_map(|neighbor| Side::direction_to(position, neighbor))
                .collect()
        };

        board.create_power(power, sides_of(power))?;

        let (mut leaves, branches): (Vec<Position>, Vec<Position>) = tree.nodes()
            .filter(|position| *position != power)
            .filter(|position| tree.neighbors(*position).count() > 0)
            .partition(|position| tree.neighbors(*position).count() == 1);

        for position in branches {
            board.create_link(position, sides_of(position))?;
        }

        leaves.shuffle(&mut self.rng);
        let mut placed = 0;
        for position in leaves.into_iter().take(bulbs) {
            let side = sides_of(position).iter().next();
            if let Some(side) = side {
                board.create_bulb(position, side)?;
                placed += 1;
            }
        }

        if placed < bulbs {
            let remaining = tree.nodes()
                .filter(|position| *position != power)
                .filter(|position| board.node(*position).is_ok_and(|node| node.is(NodeKind::Empty)))
                .collect_vec();
            for position in remaining.into_iter() {
                if placed >= bulbs {
                    break;
                }
                if let Some(side) = sides_of(position).iter().next() {
                    board.create_bulb(position, side)?;
                    placed += 1;
                }
            }
        }

        Ok(())
    }

    /// Give every non-empty node 0 to 3 generation turns.
    fn scramble(&mut self, board: &mut Board) -> Result<(), GridError> {
        let occupied = board.nodes()
            .filter(|node| !node.is(NodeKind::Empty))
            .map(|node| node.position())
            .collect_vec();

        for position in occupied {
            for _ in 0..self.rng.gen_range(0..4) {
                board.turn(position, false)?;
            }
        }

        Ok(())
    }
}

/// Generate a puzzle for the tier called `name` from a fresh random seed.
pub fn generate(name: &str) -> Result<Board, GridError> {
    Generator::from_entropy().generate(name)
}
