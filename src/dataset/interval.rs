use crate::dataset::record::{Temporal, UpperBound};
use crate::foundation::core::Year;
use crate::foundation::error::{ChronomapError, ChronomapResult};

/// An immutable collection of time-bounded records with interval queries.
///
/// Construction resolves the "ongoing" sentinel (`to_year: None`) exactly once, to the
/// supplied horizon year, and drops records whose resolved span is inverted — that is a
/// data-integrity condition, reported but never fatal.
#[derive(Clone, Debug)]
pub struct IntervalDataset<T> {
    records: Vec<T>,
}

impl<T: Temporal> IntervalDataset<T> {
    /// Build a dataset, resolving open-ended records against `horizon`.
    ///
    /// Inclusive-upper categories resolve to `horizon` itself; exclusive-upper
    /// categories resolve to `horizon + 1` so an ongoing record is still active in the
    /// horizon year.
    pub fn resolve(records: Vec<T>, horizon: Year) -> Self {
        let mut kept = Vec::with_capacity(records.len());
        for mut r in records {
            if r.to_year().is_none() {
                let resolved = match r.category().upper_bound() {
                    UpperBound::Inclusive => horizon,
                    UpperBound::Exclusive => horizon.offset(1),
                };
                r.set_resolved_to(resolved);
            }
            if r.span().is_none() {
                tracing::warn!(
                    from = r.from_year().0,
                    to = r.to_year().map(|y| y.0),
                    "record with inverted span excluded from dataset"
                );
                continue;
            }
            kept.push(r);
        }
        Self { records: kept }
    }

    /// Number of records retained after integrity filtering.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Return `true` when no records survived loading.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All retained records in load order.
    pub fn records(&self) -> &[T] {
        &self.records
    }

    /// Earliest `from_year` across the dataset, if any records exist.
    pub fn earliest(&self) -> Option<Year> {
        self.records.iter().map(|r| r.from_year()).min()
    }

    /// Records active at `year` under their category's interval semantics.
    pub fn active(&self, year: Year) -> Vec<&T> {
        self.records
            .iter()
            .filter(|r| Self::is_active(r, year))
            .collect()
    }

    /// Records whose span ended before `year` but within the trailing `window` years:
    /// `to < year && year - to < window`.
    ///
    /// Sorted most-recently-ended first, and among equal end years earliest-started
    /// first — the ordering used when expired entries compete for display slots.
    pub fn recently_expired(&self, year: Year, window: i32) -> Vec<&T> {
        let mut out: Vec<&T> = self
            .records
            .iter()
            .filter(|r| match r.to_year() {
                Some(to) => to < year && year.since(to) < window,
                None => false,
            })
            .collect();
        out.sort_by(|a, b| {
            let (ta, tb) = (a.to_year(), b.to_year());
            tb.cmp(&ta).then(a.from_year().cmp(&b.from_year()))
        });
        out
    }

    /// The single record active at `year`.
    ///
    /// Zero or multiple active records is a data-integrity condition; the caller is
    /// expected to log it and omit the sub-feature for the frame.
    pub fn active_single(&self, year: Year) -> ChronomapResult<&T> {
        let hits = self.active(year);
        match hits.len() {
            1 => Ok(hits[0]),
            n => Err(ChronomapError::data_integrity(format!(
                "expected exactly one active record at {year}, found {n}"
            ))),
        }
    }

    fn is_active(r: &T, year: Year) -> bool {
        if r.from_year() > year {
            return false;
        }
        match (r.to_year(), r.category().upper_bound()) {
            (Some(to), UpperBound::Inclusive) => to >= year,
            (Some(to), UpperBound::Exclusive) => to > year,
            // Resolved at load; an unresolved record can only mean active.
            (None, _) => true,
        }
    }
}
