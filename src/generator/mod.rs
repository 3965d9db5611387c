mod ledger;
pub mod rng;
pub mod selector;

use std::collections::VecDeque;
use std::fmt;

use thiserror::Error;

use crate::maze::{Coord, Direction, Face, Maze};
use ledger::VisitLedger;
use rng::ReversibleRng;
pub use selector::{Policy, Selector};

/// Configuration problems caught at construction. Generation itself cannot
/// fail: it is deterministic and retry-free once an engine exists.
#[derive(Debug, Error, PartialEq)]
pub enum BuildError {
    #[error("maze shape must have at least one dimension")]
    EmptyShape,
    #[error("maze extent along axis {axis} must be non-zero")]
    ZeroExtent { axis: usize },
    #[error("maze must have more than one cell")]
    SingleCell,
    #[error("selection probability {value} must lie in [0, 1]")]
    ProbabilityOutOfRange { value: f64 },
    #[error("weighted selector needs at least one policy")]
    EmptyWeights,
    #[error("weighted selector has {policies} policies but {weights} weights")]
    MismatchedWeights { policies: usize, weights: usize },
    #[error("selection weight {value} must lie in [0, 1]")]
    WeightOutOfRange { value: f64 },
    #[error("selection weights must sum to a positive total")]
    ZeroTotalWeight,
}

/// The four phases of generation, in forward order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    PlaceRoot,
    GrowTree,
    PlaceEntranceAndExit,
    Finished,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::PlaceRoot => write!(f, "placing root"),
            Phase::GrowTree => write!(f, "growing tree"),
            Phase::PlaceEntranceAndExit => write!(f, "placing entrance and exit"),
            Phase::Finished => write!(f, "finished"),
        }
    }
}

/// A growing-tree maze generator whose every step can be undone exactly.
///
/// `advance` executes one forward step and `reverse` restores the previous
/// state bit for bit, random stream included. The path-direction log is the
/// sole undo journal for the growth phase: one entry per growth step, either
/// the direction a new cell was reached from or `None` when the selected
/// cell was completed instead.
pub struct GrowingTree {
    maze: Maze,
    rng: ReversibleRng,
    selector: Selector,
    root: Coord,
    entrance: Option<Coord>,
    exit: Option<Coord>,
    ledger: VisitLedger,
    path: Vec<Option<Direction>>,
    phase: Phase,
    remaining: usize,
    steps: usize,
}

impl GrowingTree {
    /// Builds an engine over a freshly walled grid. The root cell is drawn
    /// here, one draw per dimension, before the first step.
    pub fn new(shape: &[usize], selector: Selector, seed: u64) -> Result<Self, BuildError> {
        if shape.is_empty() {
            return Err(BuildError::EmptyShape);
        }
        if let Some(axis) = shape.iter().position(|&extent| extent == 0) {
            return Err(BuildError::ZeroExtent { axis });
        }
        let size: usize = shape.iter().product();
        if size == 1 {
            return Err(BuildError::SingleCell);
        }
        let mut rng = ReversibleRng::new(seed);
        let root = Coord::new(
            shape
                .iter()
                .map(|&extent| rng.next_index(extent))
                .collect::<Vec<_>>(),
        );
        tracing::debug!("[engine] new {:?} maze, root {}, seed {}", shape, root, seed);
        Ok(GrowingTree {
            maze: Maze::new(shape),
            rng,
            selector,
            root,
            entrance: None,
            exit: None,
            ledger: VisitLedger::new(shape),
            path: Vec::new(),
            phase: Phase::PlaceRoot,
            remaining: size,
            steps: 0,
        })
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn root(&self) -> &Coord {
        &self.root
    }

    pub fn entrance(&self) -> Option<&Coord> {
        self.entrance.as_ref()
    }

    pub fn exit(&self) -> Option<&Coord> {
        self.exit.as_ref()
    }

    /// Cells not yet visited or completed.
    pub fn remaining_cells(&self) -> usize {
        self.remaining
    }

    /// Cells visited so far, active and completed together.
    pub fn visited_count(&self) -> usize {
        self.ledger.visited_count()
    }

    pub fn active_cells(&self) -> &[Coord] {
        self.ledger.active()
    }

    pub fn completed_cells(&self) -> &[Coord] {
        self.ledger.completed()
    }

    /// Net forward steps taken since construction or the last reset.
    pub fn steps_taken(&self) -> usize {
        self.steps
    }

    /// Executes exactly one forward step.
    pub fn advance(&mut self) {
        if self.phase != Phase::Finished {
            self.rng.advance();
            self.steps += 1;
        }
        match self.phase {
            Phase::PlaceRoot => {
                self.ledger.visit(self.root.clone());
                self.remaining -= 1;
                self.phase = Phase::GrowTree;
                tracing::debug!("[engine] placed root at {}", self.root);
            }
            Phase::GrowTree => self.grow(),
            Phase::PlaceEntranceAndExit => self.place_entrance_and_exit(),
            Phase::Finished => {}
        }
    }

    fn grow(&mut self) {
        let index = self.selector.select(self.ledger.active_len(), &mut self.rng);
        let cell = self.ledger.active()[index].clone();
        // Unvisited neighbors of the selected cell. Probes that leave the
        // grid on either side are skipped, not errors.
        let mut neighbors = Vec::new();
        let mut directions = Vec::new();
        for direction in Direction::all(self.maze.dimension_count()) {
            let Some(neighbor) = cell.offset(direction) else {
                continue;
            };
            if !self.ledger.is_visited(&neighbor) {
                neighbors.push(neighbor);
                directions.push(direction);
            }
        }
        if !neighbors.is_empty() {
            let pick = self.rng.next_index(neighbors.len());
            let neighbor = neighbors.swap_remove(pick);
            let direction = directions[pick];
            self.maze.remove_wall(&Face::new(cell, direction));
            self.ledger.visit(neighbor);
            self.path.push(Some(direction));
            self.remaining -= 1;
        } else {
            // Dead end: retire the cell.
            self.ledger.complete(index);
            self.path.push(None);
        }
        if self.remaining == 0 {
            self.phase = Phase::PlaceEntranceAndExit;
            tracing::debug!("[engine] tree complete after {} steps", self.steps);
        }
    }

    fn place_entrance_and_exit(&mut self) {
        // Both searches run over the finished tree before any external wall
        // opens; the second starts from the entrance the first found.
        let origin = Coord::origin(self.maze.dimension_count());
        let (entrance, exit) = match self.most_distant_edge_cell(&origin) {
            Some(entrance) => match self.most_distant_edge_cell(&entrance) {
                Some(exit) => (entrance, exit),
                None => unreachable!("no edge cell reachable from the entrance"),
            },
            None => unreachable!("no edge cell reachable from the origin"),
        };
        self.open_external_wall(&entrance);
        self.open_external_wall(&exit);
        tracing::debug!("[engine] entrance {} exit {}", entrance, exit);
        self.entrance = Some(entrance);
        self.exit = Some(exit);
        self.phase = Phase::Finished;
    }

    /// Breadth-first search through open passages for the edge cell
    /// farthest from `from`. Immediate backtracking over the edge just
    /// traversed is forbidden; nothing else is, which suffices because the
    /// finished tree has no cycles. Ties keep the first candidate in queue
    /// order, so the result is fully determined by direction enumeration
    /// order.
    fn most_distant_edge_cell(&self, from: &Coord) -> Option<Coord> {
        let mut queue = VecDeque::new();
        queue.push_back((from.clone(), None::<Direction>, 0usize));
        let mut farthest = None;
        let mut greatest_distance = 0;
        while let Some((cell, from_direction, distance)) = queue.pop_front() {
            if distance > greatest_distance && self.maze.is_edge_cell(&cell) {
                farthest = Some(cell.clone());
                greatest_distance = distance;
            }
            for direction in Direction::all(self.maze.dimension_count()) {
                if from_direction == Some(direction) {
                    continue;
                }
                if self.maze.has_wall(&Face::new(cell.clone(), direction)) {
                    continue;
                }
                let Some(next) = cell.offset(direction) else {
                    continue;
                };
                queue.push_back((next, Some(direction.invert()), distance + 1));
            }
        }
        farthest
    }

    fn open_external_wall(&mut self, cell: &Coord) {
        match self.maze.external_face(cell) {
            Some(face) => self.maze.remove_wall(&face),
            None => unreachable!("entrance/exit cell {} is not an edge cell", cell),
        }
    }

    fn close_external_wall(&mut self, cell: &Coord) {
        match self.maze.external_face(cell) {
            Some(face) => self.maze.add_wall(&face),
            None => unreachable!("entrance/exit cell {} is not an edge cell", cell),
        }
    }

    /// Executes exactly one backward step. A no-op in the initial state.
    pub fn reverse(&mut self) {
        if self.phase != Phase::PlaceRoot {
            self.rng.reverse();
            self.steps -= 1;
        }
        match self.phase {
            Phase::Finished => {
                match (self.entrance.take(), self.exit.take()) {
                    (Some(entrance), Some(exit)) => {
                        self.close_external_wall(&entrance);
                        self.close_external_wall(&exit);
                    }
                    _ => unreachable!("finished without entrance and exit"),
                }
                self.phase = Phase::PlaceEntranceAndExit;
            }
            Phase::PlaceEntranceAndExit | Phase::GrowTree => match self.path.pop() {
                Some(Some(direction)) => {
                    // A wall was opened toward the most recently visited
                    // cell: reseal it from the far side and uncover the
                    // cell.
                    let neighbor = self.ledger.unvisit_last();
                    self.maze.add_wall(&Face::new(neighbor, direction.invert()));
                    self.remaining += 1;
                    self.phase = Phase::GrowTree;
                }
                Some(None) => {
                    // A completion: the replayed selection over the
                    // pre-removal length recovers the exact slot the cell
                    // came out of.
                    let index = self
                        .selector
                        .select(self.ledger.active_len() + 1, &mut self.rng);
                    self.ledger.uncomplete(index);
                    self.phase = Phase::GrowTree;
                }
                None => {
                    // Root not yet grown from.
                    self.ledger.unvisit_root();
                    self.remaining += 1;
                    self.phase = Phase::PlaceRoot;
                }
            },
            Phase::PlaceRoot => {}
        }
    }

    /// Returns to the initial pre-generation state: seed position, full
    /// walls, empty ledger and path log.
    pub fn reset(&mut self) {
        self.rng.reset();
        self.maze.fill_walls();
        self.entrance = None;
        self.exit = None;
        self.ledger.clear();
        self.path.clear();
        self.phase = Phase::PlaceRoot;
        self.remaining = self.maze.size();
        self.steps = 0;
        tracing::debug!("[engine] reset to initial state");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_cell_rejected() {
        assert!(matches!(
            GrowingTree::new(&[1, 1], Selector::default(), 0),
            Err(BuildError::SingleCell)
        ));
        assert!(matches!(
            GrowingTree::new(&[1], Selector::default(), 0),
            Err(BuildError::SingleCell)
        ));
    }

    #[test]
    fn test_degenerate_shapes_rejected() {
        assert!(matches!(
            GrowingTree::new(&[], Selector::default(), 0),
            Err(BuildError::EmptyShape)
        ));
        assert!(matches!(
            GrowingTree::new(&[3, 0], Selector::default(), 0),
            Err(BuildError::ZeroExtent { axis: 1 })
        ));
    }

    #[test]
    fn test_first_step_places_root() {
        let mut engine = GrowingTree::new(&[3, 3], Selector::default(), 5).unwrap();
        assert_eq!(engine.phase(), Phase::PlaceRoot);
        assert_eq!(engine.remaining_cells(), 9);
        engine.advance();
        assert_eq!(engine.phase(), Phase::GrowTree);
        assert_eq!(engine.remaining_cells(), 8);
        assert_eq!(engine.active_cells(), &[engine.root().clone()]);
    }

    #[test]
    fn test_reverse_past_root_is_a_noop() {
        let mut engine = GrowingTree::new(&[2, 3], Selector::default(), 8).unwrap();
        engine.reverse();
        assert_eq!(engine.phase(), Phase::PlaceRoot);
        assert_eq!(engine.remaining_cells(), 6);
        assert_eq!(engine.steps_taken(), 0);
    }

    #[test]
    fn test_phase_labels() {
        assert_eq!(Phase::PlaceRoot.to_string(), "placing root");
        assert_eq!(Phase::GrowTree.to_string(), "growing tree");
        assert_eq!(
            Phase::PlaceEntranceAndExit.to_string(),
            "placing entrance and exit"
        );
        assert_eq!(Phase::Finished.to_string(), "finished");
    }
}
