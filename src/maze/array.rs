use crate::maze::space::Coord;

/// A dense row-major array over an arbitrary number of dimensions.
/// All access is bounds-checked; out-of-range lookups return `None` rather
/// than panicking, since probing past the grid edge is an expected part of
/// neighbor scanning.
pub struct NdArray<T> {
    shape: Box<[usize]>,
    data: Box<[T]>,
}

impl<T: Clone> NdArray<T> {
    pub fn new(shape: &[usize], fill: T) -> Self {
        let len = shape.iter().product();
        NdArray {
            shape: shape.into(),
            data: vec![fill; len].into_boxed_slice(),
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Flatten a multi-dimensional index, last axis contiguous.
    fn ravel_index(&self, indices: &[usize]) -> Option<usize> {
        if indices.len() != self.shape.len() {
            return None;
        }
        let mut flat = 0;
        for (&index, &extent) in indices.iter().zip(self.shape.iter()) {
            if index >= extent {
                return None;
            }
            flat = flat * extent + index;
        }
        Some(flat)
    }

    pub fn get(&self, coord: &Coord) -> Option<&T> {
        self.ravel_index(coord.indices())
            .and_then(|flat| self.data.get(flat))
    }

    /// Store `value` at `coord`. Returns false when the coordinate is out of
    /// bounds, leaving the array untouched.
    pub fn set(&mut self, coord: &Coord, value: T) -> bool {
        match self.ravel_index(coord.indices()) {
            Some(flat) => {
                self.data[flat] = value;
                true
            }
            None => false,
        }
    }

    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }
}
