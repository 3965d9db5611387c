mod array;
pub mod space;

pub use array::NdArray;
pub use space::{Coord, Direction, Face, Sign};

/// Wall storage for a fully-walled grid of arbitrary dimensionality.
///
/// One boolean plane array per axis: the array for axis `d` has extent
/// `shape[d] + 1` along `d`, one entry per wall plane, so the face between a
/// cell and its neighbor is stored exactly once and wall mutation is
/// symmetric by construction. Planes `0` and `shape[d]` are the grid
/// boundary.
pub struct Maze {
    shape: Box<[usize]>,
    walls: Vec<NdArray<bool>>,
}

impl Maze {
    /// Creates a maze of the given shape with every wall present.
    ///
    /// Panics if the shape is empty or any extent is zero; callers validate
    /// their configuration before construction.
    pub fn new(shape: &[usize]) -> Self {
        if shape.is_empty() || shape.contains(&0) {
            panic!("maze shape must have at least one non-zero extent");
        }
        let walls = (0..shape.len())
            .map(|axis| {
                let mut plane_shape = shape.to_vec();
                plane_shape[axis] += 1;
                NdArray::new(&plane_shape, true)
            })
            .collect();
        Maze {
            shape: shape.into(),
            walls,
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn dimension_count(&self) -> usize {
        self.shape.len()
    }

    /// Total number of cells.
    pub fn size(&self) -> usize {
        self.shape.iter().product()
    }

    pub fn is_in_bounds(&self, coord: &Coord) -> bool {
        coord.dimensions() == self.shape.len()
            && coord
                .indices()
                .iter()
                .zip(self.shape.iter())
                .all(|(&index, &extent)| index < extent)
    }

    /// True if the cell touches the grid boundary in any dimension.
    pub fn is_edge_cell(&self, coord: &Coord) -> bool {
        coord
            .indices()
            .iter()
            .zip(self.shape.iter())
            .any(|(&index, &extent)| index == 0 || index == extent - 1)
    }

    /// The first boundary-facing face of an edge cell, in direction
    /// enumeration order. `None` if the cell is not an edge cell.
    pub fn external_face(&self, coord: &Coord) -> Option<Face> {
        Direction::all(self.shape.len())
            .find(|&direction| match coord.offset(direction) {
                Some(neighbor) => !self.is_in_bounds(&neighbor),
                None => true,
            })
            .map(|direction| Face::new(coord.clone(), direction))
    }

    /// The wall-plane entry a face maps to. Both sides of a wall map to the
    /// same entry.
    fn plane_coord(face: &Face) -> Coord {
        let mut indices = face.cell.indices().to_vec();
        if face.direction.sign.is_positive() {
            indices[face.direction.axis] += 1;
        }
        Coord::new(indices)
    }

    pub fn has_wall(&self, face: &Face) -> bool {
        // Probes past the grid edge count as walled.
        self.walls[face.direction.axis]
            .get(&Self::plane_coord(face))
            .copied()
            .unwrap_or(true)
    }

    /// Opens the passage at `face`. Panics if the cell is out of bounds.
    pub fn remove_wall(&mut self, face: &Face) {
        self.set_wall(face, false);
    }

    /// Reseals the wall at `face`. Panics if the cell is out of bounds.
    pub fn add_wall(&mut self, face: &Face) {
        self.set_wall(face, true);
    }

    fn set_wall(&mut self, face: &Face, present: bool) {
        if !self.is_in_bounds(&face.cell) {
            panic!("wall mutation on out-of-bounds cell {}", face.cell);
        }
        self.walls[face.direction.axis].set(&Self::plane_coord(face), present);
    }

    /// Restores every wall, boundary included.
    pub fn fill_walls(&mut self) {
        for plane in &mut self.walls {
            plane.fill(true);
        }
    }

    /// All cell coordinates in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Coord> + '_ {
        let mut next = Some(vec![0; self.shape.len()]);
        std::iter::from_fn(move || {
            let current = next.take()?;
            let coord = Coord::new(current.clone());
            let mut indices = current;
            // Odometer increment, last axis fastest.
            for axis in (0..indices.len()).rev() {
                indices[axis] += 1;
                if indices[axis] < self.shape[axis] {
                    next = Some(indices);
                    return Some(coord);
                }
                indices[axis] = 0;
            }
            Some(coord)
        })
    }
}
