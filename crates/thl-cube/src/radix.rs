//! Mixed-radix cell addressing
//!
//! The last declared dimension is the least significant digit: iterating
//! dimensions from last to first, each coordinate is `index mod size` and the
//! index is then divided by `size`.

use crate::error::{CubeError, CubeResult};

/// Digit sizes of a cube, in declared dimension order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Radix {
    sizes: Vec<u64>,
    cells: u64,
}

impl Radix {
    /// Create radix from dimension sizes
    ///
    /// # Errors
    /// - [`CubeError::SizeOverflow`] if the product of sizes exceeds `u64`
    /// - [`CubeError::EmptyDimension`] if any size is zero
    pub fn new(sizes: impl IntoIterator<Item = usize>) -> CubeResult<Self> {
        let sizes: Vec<u64> = sizes
            .into_iter()
            .map(|s| u64::try_from(s).map_err(|_| CubeError::SizeOverflow))
            .collect::<CubeResult<_>>()?;

        let mut cells: u64 = 1;
        for (position, &size) in sizes.iter().enumerate() {
            if size == 0 {
                return Err(CubeError::EmptyDimension(format!("#{position}")));
            }
            cells = cells.checked_mul(size).ok_or(CubeError::SizeOverflow)?;
        }

        Ok(Self { sizes, cells })
    }

    /// Total number of addressable cells
    #[inline]
    #[must_use]
    pub fn cells(&self) -> u64 {
        self.cells
    }

    /// Number of digits (dimensions)
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    /// Check if radix has no digits
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Split a cell index into one coordinate per dimension
    ///
    /// Coordinates are returned in declared order. Returns `None` when
    /// `index` lies outside the cube.
    #[must_use]
    pub fn decompose(&self, index: u64) -> Option<Vec<usize>> {
        if index >= self.cells {
            return None;
        }

        let mut coords = vec![0usize; self.sizes.len()];
        let mut rest = index;
        for (slot, &size) in coords.iter_mut().zip(&self.sizes).rev() {
            // rest % size < size, and every size came from a usize
            *slot = usize::try_from(rest % size).ok()?;
            rest /= size;
        }
        Some(coords)
    }

    /// Combine coordinates back into a cell index
    ///
    /// Multiply-accumulate in the same last-to-first order as
    /// [`decompose`](Self::decompose).
    ///
    /// # Errors
    /// - [`CubeError::CoordinateCount`] if `coords` has the wrong length
    /// - [`CubeError::CoordinateOutOfRange`] if a coordinate exceeds its size
    pub fn compose(&self, coords: &[usize]) -> CubeResult<u64> {
        if coords.len() != self.sizes.len() {
            return Err(CubeError::CoordinateCount {
                expected: self.sizes.len(),
                actual: coords.len(),
            });
        }

        let mut index = 0u64;
        let mut weight = 1u64;
        for (&coordinate, &size) in coords.iter().zip(&self.sizes).rev() {
            let digit = u64::try_from(coordinate).map_err(|_| CubeError::SizeOverflow)?;
            if digit >= size {
                return Err(CubeError::CoordinateOutOfRange { coordinate, size });
            }
            index += digit * weight;
            weight = weight.saturating_mul(size);
        }
        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn last_dimension_varies_fastest() {
        let radix = Radix::new([1, 2, 2]).unwrap();
        assert_eq!(radix.cells(), 4);
        assert_eq!(radix.decompose(0), Some(vec![0, 0, 0]));
        assert_eq!(radix.decompose(1), Some(vec![0, 0, 1]));
        assert_eq!(radix.decompose(2), Some(vec![0, 1, 0]));
        assert_eq!(radix.decompose(3), Some(vec![0, 1, 1]));
        assert_eq!(radix.decompose(4), None);
    }

    #[test]
    fn uneven_sizes() {
        let radix = Radix::new([3, 4, 5]).unwrap();
        assert_eq!(radix.decompose(59), Some(vec![2, 3, 4]));
        assert_eq!(radix.decompose(23), Some(vec![1, 0, 3]));
    }

    #[test]
    fn no_dimensions_has_one_cell() {
        let radix = Radix::new([]).unwrap();
        assert!(radix.is_empty());
        assert_eq!(radix.cells(), 1);
        assert_eq!(radix.decompose(0), Some(vec![]));
    }

    #[test]
    fn zero_size_rejected() {
        assert!(matches!(
            Radix::new([2, 0]),
            Err(CubeError::EmptyDimension(_))
        ));
    }

    #[test]
    fn overflow_rejected() {
        assert!(matches!(
            Radix::new([usize::MAX, usize::MAX, 4]),
            Err(CubeError::SizeOverflow)
        ));
    }

    #[test]
    fn compose_rejects_bad_coordinates() {
        let radix = Radix::new([2, 3]).unwrap();
        assert!(matches!(
            radix.compose(&[1, 3]),
            Err(CubeError::CoordinateOutOfRange { coordinate: 3, .. })
        ));
        assert!(matches!(
            radix.compose(&[1]),
            Err(CubeError::CoordinateCount { expected: 2, actual: 1 })
        ));
    }

    proptest! {
        #[test]
        fn prop_decompose_compose_roundtrip(
            sizes in proptest::collection::vec(1..12usize, 0..6),
            seed in any::<u64>(),
        ) {
            let radix = Radix::new(sizes.iter().copied()).unwrap();
            let index = seed % radix.cells();

            let coords = radix.decompose(index).unwrap();
            for (coordinate, size) in coords.iter().zip(&sizes) {
                prop_assert!(coordinate < size);
            }
            prop_assert_eq!(radix.compose(&coords).unwrap(), index);
        }

        #[test]
        fn prop_every_index_is_distinct(sizes in proptest::collection::vec(1..5usize, 1..4)) {
            let radix = Radix::new(sizes.iter().copied()).unwrap();
            let mut seen = std::collections::HashSet::new();
            for index in 0..radix.cells() {
                prop_assert!(seen.insert(radix.decompose(index).unwrap()));
            }
        }
    }
}
