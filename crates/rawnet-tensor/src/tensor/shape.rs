use core::fmt;

use serde::{Deserialize, Serialize};

/// Shape of a tensor: `m` rows, `n` columns and `o` channel planes.
///
/// The channel dimension is also used as the batch dimension, depending on the call site.
#[derive(new, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shape {
    /// Number of rows of each plane.
    pub m: usize,
    /// Number of columns of each plane.
    pub n: usize,
    /// Number of planes.
    pub o: usize,
}

impl Shape {
    /// Returns the total number of elements of a tensor having this shape, `None` on overflow.
    pub fn checked_num_elements(&self) -> Option<usize> {
        self.m.checked_mul(self.n)?.checked_mul(self.o)
    }

    /// Returns the total number of elements of a tensor having this shape.
    ///
    /// Only valid for shapes that already back a tensor; use
    /// [checked_num_elements](Shape::checked_num_elements) for untrusted shapes.
    pub fn num_elements(&self) -> usize {
        self.m * self.n * self.o
    }

    /// Number of elements in a single plane.
    pub fn plane_size(&self) -> usize {
        self.m * self.n
    }

    /// Returns the dimensions as `[m, n, o]`.
    pub fn dims(&self) -> [usize; 3] {
        [self.m, self.n, self.o]
    }

    /// The shape of the same elements viewed as a single row, `(1, m * n * o, 1)`.
    pub fn flatten(&self) -> Self {
        Self::new(1, self.num_elements(), 1)
    }

    /// Whether the shape is a single row in a single plane.
    pub fn is_flat(&self) -> bool {
        self.m == 1 && self.o == 1
    }
}

impl From<[usize; 3]> for Shape {
    fn from([m, n, o]: [usize; 3]) -> Self {
        Shape::new(m, n, o)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {} x {}", self.m, self.n, self.o)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn num_elements() {
        let shape = Shape::new(2, 3, 4);
        assert_eq!(shape.num_elements(), 24);
        assert_eq!(shape.plane_size(), 6);
    }

    #[test]
    fn should_detect_overflow() {
        let shape = Shape::new(usize::MAX, 2, 1);
        assert_eq!(shape.checked_num_elements(), None);
    }

    #[test]
    fn flatten_keeps_num_elements() {
        let shape = Shape::new(5, 5, 4).flatten();
        assert_eq!(shape, Shape::new(1, 100, 1));
        assert!(shape.is_flat());
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", Shape::new(28, 28, 1)), "28 x 28 x 1");
    }
}
