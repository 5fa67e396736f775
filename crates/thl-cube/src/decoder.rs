//! Dimensional decoder
//!
//! Walks the present cells in ascending index order and labels each one with
//! a category per dimension. Ascending order is what keeps cells that share
//! the slow-varying (leading) dimensions contiguous.

use crate::error::{CubeError, CubeResult};
use crate::payload::{Dimension, Payload};
use crate::radix::Radix;
use crate::record::{NarrowRecord, VALUE_FIELD};
use std::collections::btree_map;

/// Decode a payload into a lazy stream of narrow records
///
/// The whole payload is validated before the first record is produced, so a
/// malformed payload yields no records at all.
///
/// # Errors
/// - [`CubeError::SizeOverflow`] if the cube has more than `u64::MAX` cells
/// - [`CubeError::IndexOutOfRange`] if a present index lies outside the cube
pub fn decode(payload: &Payload) -> CubeResult<Cells<'_>> {
    let radix = Radix::new(payload.dimensions().iter().map(Dimension::size))?;

    if let Some(&index) = payload.values().keys().next_back() {
        if index >= radix.cells() {
            return Err(CubeError::IndexOutOfRange {
                index,
                cells: radix.cells(),
            });
        }
    }

    tracing::info!(
        dimensions = payload.dimensions().len(),
        cells = radix.cells(),
        present = payload.len(),
        "decoding payload"
    );

    Ok(Cells {
        dimensions: payload.dimensions(),
        values: payload.values().iter(),
        radix,
    })
}

/// Iterator over decoded cells, in ascending index order
///
/// Finite and forward-only; restart by calling [`decode`] again.
#[derive(Debug, Clone)]
pub struct Cells<'a> {
    dimensions: &'a [Dimension],
    values: btree_map::Iter<'a, u64, String>,
    radix: Radix,
}

impl Cells<'_> {
    /// Mixed-radix layout of the decoded cube
    #[inline]
    #[must_use]
    pub fn radix(&self) -> &Radix {
        &self.radix
    }
}

impl Iterator for Cells<'_> {
    type Item = NarrowRecord;

    fn next(&mut self) -> Option<Self::Item> {
        let (&index, raw) = self.values.next()?;

        // range checked in decode()
        let coords = self.radix.decompose(index)?;

        let mut record = NarrowRecord::new(index);
        for (dimension, position) in self.dimensions.iter().zip(coords) {
            let label = dimension.label(position)?;
            record.insert(dimension.name(), label);
        }
        record.insert(VALUE_FIELD, raw.as_str());
        Some(record)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.values.size_hint()
    }
}

impl ExactSizeIterator for Cells<'_> {}
