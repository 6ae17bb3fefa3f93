use ndarray::Array2;

use crate::event::BoardEvent;
use crate::node::Node;
use crate::position::Position;
use crate::side::Side;

/// Recomputes which nodes are energized.
///
/// Every recompute is a full reset followed by a flood fill from the power node. Rotation can both make and break
/// connections anywhere on the board, so nothing is updated incrementally.
///
/// `recomputing` is held by the board while it dispatches the power changes of a recompute; events arriving in that
/// window are recorded and forwarded to subscribers but never start another recompute.
#[derive(Debug, Default)]
pub(crate) struct Propagator {
    recomputing: bool,
}

impl Propagator {
    pub(crate) fn is_recomputing(&self) -> bool {
        self.recomputing
    }

    pub(crate) fn begin(&mut self) {
        self.recomputing = true;
    }

    pub(crate) fn finish(&mut self) {
        self.recomputing = false;
    }

    /// Reset every non-power node and flood from `power`, if there is one.
    ///
    /// Returns a [`BoardEvent::PowerChanged`] for each node whose flag ended up different from before.
    pub(crate) fn recompute(&self, nodes: &mut Array2<Node>, power: Option<Position>) -> Vec<BoardEvent> {
        let before = nodes.map(Node::is_powered);

        nodes.iter_mut().for_each(|node| {
            node.set_powered(false);
        });
        if let Some(power) = power {
            flood(nodes, power);
        }

        let changes = nodes.iter()
            .zip(before.iter())
            .filter(|(node, was)| node.is_powered() != **was)
            .map(|(node, _)| BoardEvent::PowerChanged { position: node.position(), powered: node.is_powered() })
            .collect::<Vec<_>>();
        log::trace!("recomputed power from {:?}: {} node(s) changed", power, changes.len());

        changes
    }
}

/// Walk the connection graph from `source`.
///
/// The source is energized unconditionally. Any other node is energized only if it is not yet powered and connects back
/// across the side it was entered from; a node reached a second time around a cycle is already powered, so the walk
/// visits each node at most once per incoming connector.
fn flood(nodes: &mut Array2<Node>, source: Position) {
    // (position, side of that position the walk entered through)
    let mut pending: Vec<(Position, Option<Side>)> = vec![(source, None)];

    while let Some((position, entered_from)) = pending.pop() {
        let Some(node) = nodes.get_mut(position.as_index()) else {
            continue;
        };

        if let Some(from) = entered_from {
            if node.is_powered() || !node.connects(from) {
                continue;
            }
            node.set_powered(true);
        }

        let sides = node.sides();
        pending.extend(sides.iter()
            .filter(|side| Some(*side) != entered_from)
            .filter_map(|side| side.step_from(position).map(|next| (next, Some(side.opposite())))));
    }
}
