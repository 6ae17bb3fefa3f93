//! Property tests over rotation, propagation, generation and the action log.

use std::collections::{HashSet, VecDeque};

use bulbgrid::{ActionLog, Board, Difficulty, Generator, LogEntry, NodeKind, Position, Side, Sides};
use proptest::collection::vec;
use proptest::prelude::*;
use strum::VariantArray;

fn sides_from_mask(mask: u8) -> Sides {
    Side::VARIANTS.iter()
        .enumerate()
        .filter(|(bit, _)| mask & (1 << bit) != 0)
        .map(|(_, side)| *side)
        .collect()
}

/// A board whose cells are decoded from `masks`: the first cell with a side becomes the power node, then one side
/// makes a bulb, two or more a link, none an empty cell. Random masks produce plenty of cycles.
fn board_from_masks(rows: usize, cols: usize, masks: &[u8]) -> Board {
    let mut board = Board::new(rows, cols).unwrap();
    let mut power_placed = false;

    for (index, mask) in masks.iter().enumerate().take(rows * cols) {
        let position = Position(index / cols + 1, index % cols + 1);
        let sides = sides_from_mask(*mask);
        let kind = match sides.len() {
            0 => continue,
            _ if !power_placed => NodeKind::Power,
            1 => NodeKind::Bulb,
            _ => NodeKind::Link,
        };
        power_placed |= kind == NodeKind::Power;
        board.create_node(position, kind, sides).unwrap();
    }

    board
}

/// Independent breadth-first search over mutually connecting neighbors.
fn ground_truth(board: &Board) -> HashSet<Position> {
    let mut reached = HashSet::new();
    let Some(power) = board.power() else {
        return reached;
    };

    let mut queue = VecDeque::from([power]);
    reached.insert(power);
    while let Some(position) = queue.pop_front() {
        let node = board.node(position).unwrap();
        for side in node.sides().iter() {
            let Some(next) = side.step_from(position) else {
                continue;
            };
            let Ok(neighbor) = board.node(next) else {
                continue;
            };
            if neighbor.connects(side.opposite()) && reached.insert(next) {
                queue.push_back(next);
            }
        }
    }

    reached
}

fn powered(board: &Board) -> HashSet<Position> {
    board.nodes().filter(|node| node.is_powered()).map(|node| node.position()).collect()
}

proptest! {
    /// Rotation never changes how many sides a node connects.
    #[test]
    fn rotation_keeps_cardinality(mask in 1u8..16, moves in vec(any::<bool>(), 0..40)) {
        let mut board = Board::new(1, 1).unwrap();
        board.create_power(Position(1, 1), sides_from_mask(mask)).unwrap();

        for forward in moves {
            if forward {
                board.turn(Position(1, 1), true).unwrap();
            } else {
                board.turn_back(Position(1, 1), true).unwrap();
            }
            let node = board.node(Position(1, 1)).unwrap();
            prop_assert_eq!(node.sides().len(), node.initial_sides().len());
        }
    }

    /// A player turn followed by a player turn back restores sides and counter.
    #[test]
    fn turn_back_inverts_turn(mask in 1u8..16, warmup in 0usize..4) {
        let mut board = Board::new(1, 1).unwrap();
        board.create_power(Position(1, 1), sides_from_mask(mask)).unwrap();
        for _ in 0..warmup {
            board.turn(Position(1, 1), true).unwrap();
        }

        let before = board.node(Position(1, 1)).unwrap().clone();
        let turned = board.turn(Position(1, 1), true).unwrap();
        prop_assert_eq!(turned, !before.sides().is_full());
        board.turn_back(Position(1, 1), true).unwrap();

        let after = board.node(Position(1, 1)).unwrap();
        prop_assert_eq!(after.sides(), before.sides());
        prop_assert_eq!(after.rotation_count(), before.rotation_count());
    }

    /// Turning a node `turns_to_initial_state` times always brings it home.
    #[test]
    fn turns_to_initial_state_is_exact(mask in 1u8..16, turns in 0usize..12) {
        let mut board = Board::new(1, 1).unwrap();
        board.create_power(Position(1, 1), sides_from_mask(mask)).unwrap();
        for _ in 0..turns {
            board.turn(Position(1, 1), false).unwrap();
        }

        let node = board.node(Position(1, 1)).unwrap();
        let remaining = node.turns_to_initial_state();
        prop_assert!(remaining < 4);
        prop_assert_eq!(remaining == 0, node.sides() == node.initial_sides());

        for _ in 0..remaining {
            board.turn(Position(1, 1), false).unwrap();
        }
        prop_assert_eq!(board.node(Position(1, 1)).unwrap().turns_to_initial_state(), 0);
    }

    /// Powered nodes are exactly those reachable from the power node, with or without cycles, before and after
    /// arbitrary rotations.
    #[test]
    fn propagation_matches_search(
        masks in vec(0u8..16, 25),
        turns in vec(0usize..25, 0..10),
    ) {
        let mut board = board_from_masks(5, 5, &masks);
        prop_assume!(!board.bulbs().is_empty());

        board.init().unwrap();
        prop_assert_eq!(powered(&board), ground_truth(&board));
        prop_assert_eq!(board.reachable_from_power(), ground_truth(&board));

        for index in turns {
            board.turn(Position(index / 5 + 1, index % 5 + 1), true).unwrap();
            prop_assert_eq!(powered(&board), ground_truth(&board));
        }

        let complete = board.bulbs().iter().all(|bulb| ground_truth(&board).contains(bulb));
        prop_assert_eq!(board.is_complete(), complete);
    }

    /// Before scrambling, every generated link and bulb hangs off the power node.
    #[test]
    fn generated_structure_is_connected(seed in any::<u64>(), tier in 0usize..3) {
        let difficulty = Difficulty::VARIANTS[tier];
        let board = Generator::seeded(seed).generate(&difficulty.to_string()).unwrap();

        let mut solved = Board::new(board.rows(), board.cols()).unwrap();
        for node in board.nodes().filter(|node| !node.is(NodeKind::Empty)) {
            solved.create_node(node.position(), node.kind(), node.initial_sides()).unwrap();
        }
        solved.init().unwrap();

        let reached = ground_truth(&solved);
        for node in solved.nodes().filter(|node| !node.is(NodeKind::Empty)) {
            prop_assert!(reached.contains(&node.position()));
        }
        prop_assert!(solved.is_complete());
    }

    /// Appending after moving back drops everything after the cursor.
    #[test]
    fn append_truncates(count in 1usize..20, back in 0usize..20) {
        let back = back.min(count - 1);
        let mut log = ActionLog::new();
        for col in 1..=count {
            log.append(LogEntry::Turn { position: Position(1, col) });
        }
        for _ in 0..back {
            prop_assert!(log.previous());
        }

        let appended = LogEntry::GenerationFinished;
        log.append(appended);
        prop_assert_eq!(log.len(), count - back + 1);
        prop_assert_eq!(log.entries().last(), Some(&appended));
        prop_assert_eq!(log.cursor(), log.len() - 1);
    }

    /// Any log the engine writes loads back into the same board.
    #[test]
    fn log_round_trip(seed in any::<u64>(), turns in vec(0usize..16, 0..12)) {
        let mut board = Generator::seeded(seed).generate("Easy").unwrap();
        for index in turns {
            board.turn(Position(index / 4 + 1, index % 4 + 1), true).unwrap();
        }

        let report = Board::from_log(&board.log().to_string()).unwrap();
        prop_assert!(report.diagnostics.is_empty());
        for (saved, copy) in board.nodes().zip(report.board.nodes()) {
            prop_assert_eq!(saved.kind(), copy.kind());
            prop_assert_eq!(saved.sides(), copy.sides());
            prop_assert_eq!(saved.is_powered(), copy.is_powered());
        }
    }
}
