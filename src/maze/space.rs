use std::fmt;

/// The two orientations of a move along an axis. More expressive than a bare
/// `+1`/`-1` or a boolean when both show up in the same expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    Positive,
    Negative,
}

impl Sign {
    pub fn is_positive(self) -> bool {
        self == Sign::Positive
    }

    pub fn invert(self) -> Sign {
        match self {
            Sign::Positive => Sign::Negative,
            Sign::Negative => Sign::Positive,
        }
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sign::Positive => write!(f, "+"),
            Sign::Negative => write!(f, "-"),
        }
    }
}

/// One of the `2×D` unit-axis moves in a D-dimensional grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Direction {
    pub axis: usize,
    pub sign: Sign,
}

impl Direction {
    pub fn new(axis: usize, sign: Sign) -> Self {
        Direction { axis, sign }
    }

    /// The opposite move along the same axis.
    pub fn invert(self) -> Direction {
        Direction {
            axis: self.axis,
            sign: self.sign.invert(),
        }
    }

    /// All directions of a D-dimensional grid, axis-major with `Positive`
    /// before `Negative`. The order is stable and observable: selection
    /// tie-breaking and the entrance/exit search both depend on it.
    pub fn all(dimensions: usize) -> impl Iterator<Item = Direction> {
        (0..dimensions).flat_map(|axis| {
            [
                Direction::new(axis, Sign::Positive),
                Direction::new(axis, Sign::Negative),
            ]
        })
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.sign, self.axis)
    }
}

/// A cell address: one non-negative index per axis.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Coord(Box<[usize]>);

impl Coord {
    pub fn new(indices: impl Into<Box<[usize]>>) -> Self {
        Coord(indices.into())
    }

    /// The all-zeros coordinate.
    pub fn origin(dimensions: usize) -> Self {
        Coord(vec![0; dimensions].into_boxed_slice())
    }

    pub fn dimensions(&self) -> usize {
        self.0.len()
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// The adjacent coordinate one step in `direction`, or `None` when the
    /// step would leave the grid on the low side. Steps past the high side
    /// are not detected here; they surface as a failed bounds check on
    /// lookup.
    pub fn offset(&self, direction: Direction) -> Option<Coord> {
        let mut indices = self.0.clone();
        let index = indices.get_mut(direction.axis)?;
        *index = match direction.sign {
            Sign::Positive => index.checked_add(1)?,
            Sign::Negative => index.checked_sub(1)?,
        };
        Some(Coord(indices))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", index)?;
        }
        write!(f, ")")
    }
}

/// The wall/passage between a cell and its neighbor in `direction`, or the
/// grid boundary when that neighbor is out of bounds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Face {
    pub cell: Coord,
    pub direction: Direction,
}

impl Face {
    pub fn new(cell: Coord, direction: Direction) -> Self {
        Face { cell, direction }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_order_is_axis_major() {
        let dirs = Direction::all(2).collect::<Vec<_>>();
        assert_eq!(
            dirs,
            vec![
                Direction::new(0, Sign::Positive),
                Direction::new(0, Sign::Negative),
                Direction::new(1, Sign::Positive),
                Direction::new(1, Sign::Negative),
            ]
        );
    }

    #[test]
    fn test_invert_round_trips() {
        for dir in Direction::all(3) {
            assert_eq!(dir.invert().invert(), dir);
            assert_ne!(dir.invert(), dir);
        }
    }

    #[test]
    fn test_offset_underflow() {
        let origin = Coord::origin(2);
        assert_eq!(
            origin.offset(Direction::new(1, Sign::Negative)),
            None,
            "stepping below zero has no coordinate"
        );
        assert_eq!(
            origin.offset(Direction::new(1, Sign::Positive)),
            Some(Coord::new(vec![0, 1]))
        );
    }
}
