//! Streaming group-merge compactor
//!
//! Folds consecutive narrow records that share a group key into one wide
//! record. A group is emitted when the key changes and once more at the end
//! of input, even when the input was empty. Records are never reordered, so
//! the input must already be grouped contiguously (ascending cell order does
//! that for payloads whose group-key dimensions are declared first).

use crate::descriptor::Descriptor;
use crate::error::CompactError;
use crate::record::WideRecord;
use thl_cube::NarrowRecord;

/// Compact decoded records with a descriptor
///
/// Records are renamed with the descriptor's tables before grouping.
pub fn compact<I>(records: I, descriptor: &Descriptor) -> Compactor<'_, I::IntoIter>
where
    I: IntoIterator<Item = NarrowRecord>,
{
    Compactor::new(records.into_iter(), descriptor)
}

/// Lazy iterator of wide records
///
/// Yields `Err` at most once; the iterator is exhausted afterwards. Groups
/// completed before the failing record are still yielded first.
#[derive(Debug)]
pub struct Compactor<'d, I> {
    input: I,
    descriptor: &'d Descriptor,
    current_key: Option<Vec<String>>,
    accumulator: WideRecord,
    pending: Option<CompactError>,
    finished: bool,
    groups: usize,
    suppressed: usize,
}

impl<'d, I> Compactor<'d, I>
where
    I: Iterator<Item = NarrowRecord>,
{
    /// Create compactor over an input stream
    pub fn new(input: I, descriptor: &'d Descriptor) -> Self {
        Self {
            input,
            descriptor,
            current_key: None,
            accumulator: WideRecord::new(),
            pending: None,
            finished: false,
            groups: 0,
            suppressed: 0,
        }
    }

    /// Groups closed so far, including suppressed ones
    #[inline]
    #[must_use]
    pub fn groups(&self) -> usize {
        self.groups
    }

    /// Groups dropped by the anchor guard
    #[inline]
    #[must_use]
    pub fn suppressed(&self) -> usize {
        self.suppressed
    }

    fn release(&mut self, group: WideRecord) -> Option<WideRecord> {
        self.groups += 1;
        if self.descriptor.admits(&group) {
            tracing::debug!(
                dataset = self.descriptor.name(),
                fields = group.len(),
                "group flushed"
            );
            Some(group)
        } else {
            self.suppressed += 1;
            tracing::debug!(
                dataset = self.descriptor.name(),
                anchor = self.descriptor.anchor(),
                "group without anchor suppressed"
            );
            None
        }
    }

    fn fail(
        &mut self,
        err: CompactError,
        flushed: Option<WideRecord>,
    ) -> Option<Result<WideRecord, CompactError>> {
        self.finished = true;
        match flushed.and_then(|group| self.release(group)) {
            Some(group) => {
                self.pending = Some(err);
                Some(Ok(group))
            }
            None => Some(Err(err)),
        }
    }
}

impl<I> Iterator for Compactor<'_, I>
where
    I: Iterator<Item = NarrowRecord>,
{
    type Item = Result<WideRecord, CompactError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(err) = self.pending.take() {
            return Some(Err(err));
        }
        if self.finished {
            return None;
        }

        loop {
            let Some(raw) = self.input.next() else {
                self.finished = true;
                let group = std::mem::take(&mut self.accumulator);
                return self.release(group).map(Ok);
            };

            let record = self.descriptor.rename(&raw);
            let key = match self.descriptor.key_of(&record) {
                Ok(key) => key,
                Err(err) => return self.fail(err, None),
            };

            let flushed = match &self.current_key {
                Some(current) if *current != key => Some(std::mem::take(&mut self.accumulator)),
                _ => None,
            };
            self.current_key = Some(key);

            if let Err(err) = self.descriptor.merge(&mut self.accumulator, &record) {
                return self.fail(err, flushed);
            }

            if let Some(group) = flushed.and_then(|group| self.release(group)) {
                return Some(Ok(group));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coerce::Coercion;
    use crate::policy::{MeasureTable, Pivot, SkipWhen};
    use crate::value::FieldValue;
    use pretty_assertions::assert_eq;

    fn cell(index: u64, area: &str, measure: &str, value: &str) -> NarrowRecord {
        NarrowRecord::from_pairs(index, [("area", area), ("measure", measure), ("value", value)])
    }

    fn by_area() -> Descriptor {
        Descriptor::builder("test")
            .group_by(["area"])
            .merge(
                MeasureTable::new("measure")
                    .measure("cases", "cases", Coercion::Int)
                    .measure("population", "population", Coercion::Int),
            )
            .build()
    }

    #[test]
    fn flush_on_key_change_and_end() {
        let descriptor = by_area();
        let input = vec![
            cell(0, "A", "cases", "10"),
            cell(1, "A", "population", "1000"),
            cell(2, "B", "cases", "20"),
            cell(3, "B", "population", "2000"),
        ];
        let out: Vec<_> = compact(input, &descriptor).map(Result::unwrap).collect();

        let expected: Vec<WideRecord> = vec![
            [
                ("area", FieldValue::from("A")),
                ("cases", 10i64.into()),
                ("population", 1000i64.into()),
            ]
            .into_iter()
            .collect(),
            [
                ("area", FieldValue::from("B")),
                ("cases", 20i64.into()),
                ("population", 2000i64.into()),
            ]
            .into_iter()
            .collect(),
        ];
        assert_eq!(out, expected);
    }

    #[test]
    fn single_record_is_flushed() {
        let descriptor = by_area();
        let out: Vec<_> = compact(vec![cell(0, "A", "cases", "1")], &descriptor).collect();
        assert_eq!(out.len(), 1);
        assert!(out[0].is_ok());
    }

    #[test]
    fn empty_input_emits_one_empty_record() {
        let descriptor = by_area();
        let mut compactor = compact(Vec::new(), &descriptor);
        let out: Vec<_> = compactor.by_ref().map(Result::unwrap).collect();
        assert_eq!(out, vec![WideRecord::new()]);
        assert_eq!(compactor.groups(), 1);
    }

    #[test]
    fn empty_input_respects_anchor() {
        let descriptor = Descriptor::builder("anchored")
            .group_by(["area"])
            .anchor("cases")
            .merge(Pivot::new("{measure}", Coercion::Int))
            .build();
        let mut compactor = compact(Vec::new(), &descriptor);
        assert!(compactor.next().is_none());
        assert_eq!(compactor.suppressed(), 1);
    }

    #[test]
    fn non_contiguous_keys_form_separate_groups() {
        let descriptor = by_area();
        let input = vec![
            cell(0, "A", "cases", "1"),
            cell(1, "B", "cases", "2"),
            cell(2, "A", "population", "3"),
        ];
        let out: Vec<_> = compact(input, &descriptor).map(Result::unwrap).collect();
        assert_eq!(out.len(), 3);
        assert!(!out[2].contains("cases"));
    }

    #[test]
    fn unknown_discriminator_after_flushed_group() {
        let descriptor = by_area();
        let input = vec![
            cell(0, "A", "cases", "1"),
            cell(1, "B", "deaths", "2"),
            cell(2, "C", "cases", "3"),
        ];
        let mut out = compact(input, &descriptor);

        let first = out.next().unwrap().unwrap();
        assert_eq!(first.get("area"), Some(&FieldValue::from("A")));
        assert!(matches!(
            out.next(),
            Some(Err(CompactError::UnknownDiscriminator { index: 1, .. }))
        ));
        assert!(out.next().is_none());
        assert!(out.next().is_none());
    }

    #[test]
    fn unknown_discriminator_first_record() {
        let descriptor = by_area();
        let mut out = compact(vec![cell(0, "A", "deaths", "1")], &descriptor);
        assert!(matches!(out.next(), Some(Err(_))));
        assert!(out.next().is_none());
    }

    #[test]
    fn anchor_suppresses_leading_pseudo_group() {
        let descriptor = Descriptor::builder("ageweeks")
            .group_by(["week"])
            .anchor("total")
            .merge(SkipWhen::new("week", ["Aika"], Pivot::new("{age}", Coercion::Int)))
            .build();
        let week = |index, week: &str, age: &str, value: &str| {
            NarrowRecord::from_pairs(index, [("week", week), ("age", age), ("value", value)])
        };
        let input = vec![
            week(0, "Aika", "00-09", "100"),
            week(1, "Aika", "total", "900"),
            week(2, "w1", "00-09", "1"),
            week(3, "w1", "total", "9"),
            week(4, "w2", "00-09", "2"),
        ];

        let mut compactor = compact(input, &descriptor);
        let out: Vec<_> = compactor.by_ref().map(Result::unwrap).collect();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].get("week"), Some(&FieldValue::from("w1")));
        assert_eq!(out[0].get("total"), Some(&FieldValue::Int(9)));
        assert_eq!(compactor.groups(), 3);
        assert_eq!(compactor.suppressed(), 2);
    }

    #[test]
    fn empty_group_key_is_one_group() {
        let descriptor = Descriptor::builder("iat")
            .merge(Pivot::new("{area}", Coercion::Int))
            .build();
        let input = vec![cell(0, "A", "x", "1"), cell(1, "B", "x", "2")];
        let out: Vec<_> = compact(input, &descriptor).map(Result::unwrap).collect();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].len(), 2);
    }

    #[test]
    fn renames_before_grouping() {
        let descriptor = Descriptor::builder("test")
            .field("hcdmunicipality2020", "area")
            .value("Kaikki Alueet", "Koko maa")
            .group_by(["area"])
            .merge(MeasureTable::new("measure").measure("cases", "cases", Coercion::Int))
            .build();
        let input = vec![NarrowRecord::from_pairs(
            0,
            [("hcdmunicipality2020", "Kaikki Alueet"), ("measure", "cases"), ("value", "5")],
        )];
        let out: Vec<_> = compact(input, &descriptor).map(Result::unwrap).collect();
        assert_eq!(out[0].get("area"), Some(&FieldValue::from("Koko maa")));
    }
}
