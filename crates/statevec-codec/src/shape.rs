//! Array shape and its row-major linearization.

use std::fmt;

use ndarray::IxDyn;

use crate::error::{CodecError, Result};

/// Ordered per-axis extents, axis 0 first.
///
/// Elements are linearized row-major: the last axis varies fastest. Both the
/// binary payload and [`ComplexBuffer`](crate::ComplexBuffer) use this order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Shape {
    extents: Vec<usize>,
}

impl Shape {
    pub fn new(extents: Vec<usize>) -> Self {
        Self { extents }
    }

    pub fn rank(&self) -> usize {
        self.extents.len()
    }

    pub fn extents(&self) -> &[usize] {
        &self.extents
    }

    /// Product of the extents, or [`CodecError::Overflow`].
    pub fn element_count(&self) -> Result<usize> {
        self.extents
            .iter()
            .try_fold(1usize, |acc, &e| acc.checked_mul(e))
            .ok_or_else(|| CodecError::Overflow {
                extents: self.extents.clone(),
            })
    }

    /// Flat position of a multi-dimensional index, `None` when out of bounds.
    pub fn linear_index(&self, index: &[usize]) -> Option<usize> {
        if index.len() != self.extents.len() {
            return None;
        }
        let mut linear = 0usize;
        for (&i, &extent) in index.iter().zip(&self.extents) {
            if i >= extent {
                return None;
            }
            linear = linear * extent + i;
        }
        Some(linear)
    }

    pub fn to_ix_dyn(&self) -> IxDyn {
        IxDyn(&self.extents)
    }
}

impl From<Vec<usize>> for Shape {
    fn from(extents: Vec<usize>) -> Self {
        Self::new(extents)
    }
}

impl From<&[usize]> for Shape {
    fn from(extents: &[usize]) -> Self {
        Self::new(extents.to_vec())
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, extent) in self.extents.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{extent}")?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_count_is_product() {
        assert_eq!(Shape::new(vec![2, 3, 4]).element_count().unwrap(), 24);
        assert_eq!(Shape::new(vec![5, 0, 2]).element_count().unwrap(), 0);
    }

    #[test]
    fn element_count_overflow() {
        let shape = Shape::new(vec![usize::MAX, 2]);
        assert!(matches!(
            shape.element_count(),
            Err(CodecError::Overflow { .. })
        ));
    }

    #[test]
    fn row_major_last_axis_fastest() {
        let shape = Shape::new(vec![2, 3]);
        assert_eq!(shape.linear_index(&[0, 0]), Some(0));
        assert_eq!(shape.linear_index(&[0, 2]), Some(2));
        assert_eq!(shape.linear_index(&[1, 0]), Some(3));
        assert_eq!(shape.linear_index(&[1, 2]), Some(5));
        assert_eq!(shape.linear_index(&[2, 0]), None);
    }

    #[test]
    fn display() {
        assert_eq!(Shape::new(vec![2, 3]).to_string(), "[2, 3]");
    }
}
