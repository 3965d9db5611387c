use crate::maze::{Coord, NdArray};

/// Bookkeeping for cell visitation during growth.
///
/// Three structures move in lockstep: the ordered visited-active list
/// (insertion order is meaningful, selection policies pick by position), a
/// dense visited-ever matrix for O(1) neighbor checks, and the completed
/// stack. Only the compound operations below mutate them, so they cannot
/// drift apart: the matrix holds true exactly for active and completed
/// cells.
pub struct VisitLedger {
    active: Vec<Coord>,
    matrix: NdArray<bool>,
    completed: Vec<Coord>,
}

impl VisitLedger {
    pub fn new(shape: &[usize]) -> Self {
        VisitLedger {
            active: Vec::new(),
            matrix: NdArray::new(shape, false),
            completed: Vec::new(),
        }
    }

    /// Marks a previously unvisited cell active.
    pub fn visit(&mut self, coord: Coord) {
        self.matrix.set(&coord, true);
        self.active.push(coord);
    }

    /// Moves the active cell at `index` onto the completed stack, preserving
    /// the order of the cells around it. Panics if the index is out of
    /// range, which would mean corrupted bookkeeping.
    pub fn complete(&mut self, index: usize) {
        let cell = self.active.remove(index);
        self.completed.push(cell);
    }

    /// Undoes the most recent completion, reinserting the cell into the
    /// active list at `index` to reconstruct the pre-completion ordering.
    pub fn uncomplete(&mut self, index: usize) {
        match self.completed.pop() {
            Some(cell) => self.active.insert(index, cell),
            None => panic!("no completed cell to restore"),
        }
    }

    /// Undoes the most recent visit, returning the cell it uncovered.
    pub fn unvisit_last(&mut self) -> Coord {
        match self.active.pop() {
            Some(cell) => {
                self.matrix.set(&cell, false);
                cell
            }
            None => panic!("no active cell to unvisit"),
        }
    }

    /// Undoes the root visit. The root is the sole remaining active cell at
    /// that point, and it sits at position zero.
    pub fn unvisit_root(&mut self) -> Coord {
        if self.active.is_empty() {
            panic!("no root cell to unvisit");
        }
        let root = self.active.remove(0);
        self.matrix.set(&root, false);
        root
    }

    /// True if the cell has ever been visited. Out-of-range probes count as
    /// visited so neighbor scans skip them.
    pub fn is_visited(&self, coord: &Coord) -> bool {
        self.matrix.get(coord).copied().unwrap_or(true)
    }

    pub fn active(&self) -> &[Coord] {
        &self.active
    }

    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    pub fn completed(&self) -> &[Coord] {
        &self.completed
    }

    /// Cells visited so far, active and completed together.
    pub fn visited_count(&self) -> usize {
        self.active.len() + self.completed.len()
    }

    pub fn clear(&mut self) {
        self.active.clear();
        self.matrix.fill(false);
        self.completed.clear();
    }
}
