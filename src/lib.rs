#![warn(missing_docs)]

//! # `bulbgrid`
//!
//! The engine of a pipe-rotation puzzle: a power source, links and bulbs sit on a rectangular grid, and the player
//! rotates nodes until every bulb is connected to the power source.
//!
//! Get a puzzle from a [`Generator`] (or build one by hand starting from [`Board::new`]), rotate nodes with
//! [`Board::turn`], and check [`Board::is_complete`]. Every action lands in the board's [`ActionLog`], which supports
//! undo/redo through [`Board::step_back`] and [`Board::step_forward`] and can be saved as text and replayed with
//! [`Board::from_log`].
//!
//! # Internals
//! Power is recomputed from scratch after every rotation: all nodes are switched off and a flood fill walks outward from
//! the power node, entering a neighbor only if that neighbor connects back on the shared side. A node reached twice
//! around a cycle is already powered and is not entered again, so the walk terminates on any board.
//!
//! Puzzles come from a randomized Prim's algorithm. Starting from a random power cell, frontier edges receive random
//! weights and the lightest edge to an unvisited cell is added until the tier's edge budget is spent. Cells where the
//! tree branches become links, dead ends become bulbs, and a random number of turns per node scrambles the solution.
//!
//! ```
//! use bulbgrid::{Board, Position, Side};
//!
//! let mut board = Board::new(1, 3).unwrap();
//! board.create_power(Position(1, 1), [Side::East]).unwrap();
//! board.create_link(Position(1, 2), [Side::North, Side::South]).unwrap();
//! board.create_bulb(Position(1, 3), Side::West).unwrap();
//! board.init().unwrap();
//! assert!(!board.is_complete());
//!
//! board.turn(Position(1, 2), true).unwrap();
//! assert!(board.is_complete());
//! ```

pub use action_log::{parse_log, ActionLog, LogEntry};
pub use board::{Board, MAX_CELLS};
pub use error::{GridError, ParseError, PlacementFailure};
pub use event::{BoardEvent, SubscriptionId};
pub use generator::{generate, Difficulty, Generator, TierSettings};
pub use node::{Node, NodeKind};
pub use position::Position;
pub use replay::{Diagnostic, LoadReport};
pub use side::{Side, Sides};

pub(crate) mod board;
pub(crate) mod action_log;
pub(crate) mod error;
pub(crate) mod event;
pub(crate) mod node;
pub(crate) mod position;
pub(crate) mod propagation;
pub(crate) mod side;
pub(crate) mod replay;
pub mod generator;
#[cfg(feature = "wasm")]
pub mod wasm;
