//! Crossfilter index implementation

use std::sync::Arc;

use ahash::AHashMap;
use roaring::RoaringBitmap;
use tracing::{debug, warn};

use super::{FilterError, Key, Predicate};

/// Handle to a registered dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DimensionId(pub(crate) usize);

/// Per-dimension filter state
///
/// Keys are projected once at registration; the key function itself is not
/// retained because the record arena is immutable after load.
struct DimensionState {
    name: String,
    keys: Arc<Vec<Key>>,
    predicate: Predicate,
    /// Records admitted by this dimension's own predicate
    members: RoaringBitmap,
}

/// The crossfilter index: one record arena, many filterable dimensions
///
/// Every dimension holds a bitmap of the records its own predicate admits.
/// The globally included set is the intersection of all bitmaps; the set a
/// dimension's aggregate is computed over intersects every bitmap *except*
/// its own, so each view shows what would be selectable under the other
/// active filters.
pub struct Crossfilter<R> {
    records: Arc<Vec<R>>,
    dimensions: Vec<DimensionState>,
    by_name: AHashMap<String, DimensionId>,
}

impl<R> Crossfilter<R> {
    /// Build an index over an owned record arena
    pub fn new(records: Vec<R>) -> Self {
        Self {
            records: Arc::new(records),
            dimensions: Vec::new(),
            by_name: AHashMap::new(),
        }
    }

    /// Register a new filterable projection of the records
    pub fn add_dimension(
        &mut self,
        name: &str,
        key_of: impl Fn(&R) -> Key,
    ) -> Result<DimensionId, FilterError> {
        if self.by_name.contains_key(name) {
            return Err(FilterError::DuplicateDimension(name.to_string()));
        }

        let keys: Vec<Key> = self.records.iter().map(&key_of).collect();
        let id = DimensionId(self.dimensions.len());
        self.dimensions.push(DimensionState {
            name: name.to_string(),
            keys: Arc::new(keys),
            predicate: Predicate::None,
            members: self.full(),
        });
        self.by_name.insert(name.to_string(), id);
        debug!(dimension = name, records = self.records.len(), "dimension registered");
        Ok(id)
    }

    /// Restrict a dimension to keys in `[low, high)`
    pub fn filter_range(&mut self, dim: DimensionId, low: Key, high: Key) {
        self.apply(dim, Predicate::Range { low, high });
    }

    /// Restrict a dimension to keys equal to `key`
    pub fn filter_exact(&mut self, dim: DimensionId, key: Key) {
        self.apply(dim, Predicate::Exact(key));
    }

    /// Remove the restriction on a dimension
    pub fn filter_all(&mut self, dim: DimensionId) {
        self.apply(dim, Predicate::None);
    }

    /// Replace a dimension's predicate and rebuild only its own bitmap
    fn apply(&mut self, dim: DimensionId, predicate: Predicate) {
        if predicate.is_degenerate() {
            warn!(
                dimension = %self.dimensions[dim.0].name,
                "degenerate range predicate; selecting zero records"
            );
        }

        let full = self.full();
        let state = &mut self.dimensions[dim.0];
        state.members = match &predicate {
            Predicate::None => full,
            _ => {
                let mut members = RoaringBitmap::new();
                for (idx, key) in state.keys.iter().enumerate() {
                    if predicate.admits(key) {
                        members.insert(idx as u32);
                    }
                }
                members
            }
        };
        state.predicate = predicate;
        debug!(
            dimension = %state.name,
            admitted = state.members.len(),
            "predicate changed"
        );
    }

    /// Records satisfying every active predicate
    pub fn included(&self) -> RoaringBitmap {
        self.intersection(None)
    }

    /// Records satisfying every active predicate except `dim`'s own
    pub fn included_excluding(&self, dim: DimensionId) -> RoaringBitmap {
        self.intersection(Some(dim))
    }

    /// Number of records satisfying every active predicate
    pub fn included_count(&self) -> u64 {
        self.included().len()
    }

    /// Included records in record-store insertion order
    pub fn included_records(&self) -> Vec<&R> {
        self.included()
            .iter()
            .map(|idx| &self.records[idx as usize])
            .collect()
    }

    fn intersection(&self, skip: Option<DimensionId>) -> RoaringBitmap {
        let mut included = self.full();
        for (idx, state) in self.dimensions.iter().enumerate() {
            if skip == Some(DimensionId(idx)) || !state.predicate.is_active() {
                continue;
            }
            included &= &state.members;
        }
        included
    }

    fn full(&self) -> RoaringBitmap {
        let mut all = RoaringBitmap::new();
        all.insert_range(0..self.records.len() as u32);
        all
    }

    /// The shared record arena
    pub fn records(&self) -> &Arc<Vec<R>> {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The cached per-record keys of a dimension
    pub fn keys(&self, dim: DimensionId) -> &Arc<Vec<Key>> {
        &self.dimensions[dim.0].keys
    }

    pub fn dimension_name(&self, dim: DimensionId) -> &str {
        &self.dimensions[dim.0].name
    }

    pub fn predicate(&self, dim: DimensionId) -> &Predicate {
        &self.dimensions[dim.0].predicate
    }

    /// Unfiltered minimum and maximum key of a dimension
    pub fn key_extent(&self, dim: DimensionId) -> Option<(Key, Key)> {
        let keys = &self.dimensions[dim.0].keys;
        let min = keys.iter().min()?;
        let max = keys.iter().max()?;
        Some((min.clone(), max.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        value: f64,
        tag: &'static str,
    }

    fn fixture() -> Crossfilter<Row> {
        Crossfilter::new(vec![
            Row { value: 1.0, tag: "a" },
            Row { value: 2.0, tag: "b" },
            Row { value: 3.0, tag: "a" },
            Row { value: 4.0, tag: "c" },
            Row { value: 5.0, tag: "b" },
        ])
    }

    #[test]
    fn test_duplicate_dimension_rejected() {
        let mut cf = fixture();
        cf.add_dimension("value", |r| Key::number(r.value)).unwrap();
        let err = cf.add_dimension("value", |r| Key::number(r.value));
        assert!(matches!(err, Err(FilterError::DuplicateDimension(_))));
    }

    #[test]
    fn test_unfiltered_includes_everything() {
        let mut cf = fixture();
        cf.add_dimension("value", |r| Key::number(r.value)).unwrap();
        cf.add_dimension("tag", |r| Key::text(r.tag)).unwrap();
        assert_eq!(cf.included_count(), 5);
        assert_eq!(cf.included_records().len(), 5);
    }

    #[test]
    fn test_range_and_exact_combine() {
        let mut cf = fixture();
        let value = cf.add_dimension("value", |r| Key::number(r.value)).unwrap();
        let tag = cf.add_dimension("tag", |r| Key::text(r.tag)).unwrap();

        cf.filter_range(value, Key::number(2.0), Key::number(5.0));
        assert_eq!(cf.included_count(), 3); // 2.0, 3.0, 4.0

        cf.filter_exact(tag, Key::text("a"));
        assert_eq!(cf.included_count(), 1); // 3.0 only
    }

    #[test]
    fn test_exclusion_of_own_predicate() {
        let mut cf = fixture();
        let value = cf.add_dimension("value", |r| Key::number(r.value)).unwrap();
        let tag = cf.add_dimension("tag", |r| Key::text(r.tag)).unwrap();

        cf.filter_exact(tag, Key::text("b"));
        cf.filter_range(value, Key::number(0.0), Key::number(3.0));

        // The value dimension sees only the tag filter, not its own range.
        let of_value = cf.included_excluding(value);
        assert_eq!(of_value.len(), 2); // both "b" rows
        // The tag dimension sees only the value filter.
        let of_tag = cf.included_excluding(tag);
        assert_eq!(of_tag.len(), 2); // 1.0 and 2.0
        // The global set applies both.
        assert_eq!(cf.included_count(), 1); // 2.0 / "b"
    }

    #[test]
    fn test_filter_all_round_trip() {
        let mut cf = fixture();
        let value = cf.add_dimension("value", |r| Key::number(r.value)).unwrap();
        let before: Vec<u32> = cf.included().iter().collect();

        cf.filter_range(value, Key::number(2.0), Key::number(4.0));
        assert_ne!(cf.included_count(), before.len() as u64);

        cf.filter_all(value);
        let after: Vec<u32> = cf.included().iter().collect();
        assert_eq!(before, after);

        // Idempotence: clearing again changes nothing.
        cf.filter_all(value);
        let again: Vec<u32> = cf.included().iter().collect();
        assert_eq!(before, again);
    }

    #[test]
    fn test_filter_order_commutes() {
        let mut ab = fixture();
        let value = ab.add_dimension("value", |r| Key::number(r.value)).unwrap();
        let tag = ab.add_dimension("tag", |r| Key::text(r.tag)).unwrap();
        ab.filter_range(value, Key::number(1.0), Key::number(4.0));
        ab.filter_exact(tag, Key::text("a"));

        let mut ba = fixture();
        let value2 = ba.add_dimension("value", |r| Key::number(r.value)).unwrap();
        let tag2 = ba.add_dimension("tag", |r| Key::text(r.tag)).unwrap();
        ba.filter_exact(tag2, Key::text("a"));
        ba.filter_range(value2, Key::number(1.0), Key::number(4.0));

        let left: Vec<u32> = ab.included().iter().collect();
        let right: Vec<u32> = ba.included().iter().collect();
        assert_eq!(left, right);
    }

    #[test]
    fn test_invalid_range_selects_zero_records() {
        let mut cf = fixture();
        let value = cf.add_dimension("value", |r| Key::number(r.value)).unwrap();
        cf.filter_range(value, Key::number(10.0), Key::number(2.0));
        assert_eq!(cf.included_count(), 0);
        assert!(cf.included_records().is_empty());

        // An empty inclusion set is a valid state, not an error.
        cf.filter_all(value);
        assert_eq!(cf.included_count(), 5);
    }

    #[test]
    fn test_replacing_predicate_is_atomic() {
        let mut cf = fixture();
        let value = cf.add_dimension("value", |r| Key::number(r.value)).unwrap();
        cf.filter_range(value, Key::number(1.0), Key::number(3.0));
        cf.filter_exact(value, Key::number(5.0));
        // Only the latest predicate applies.
        assert_eq!(cf.included_count(), 1);
        assert!(matches!(cf.predicate(value), Predicate::Exact(_)));
    }

    #[test]
    fn test_key_extent_ignores_filters() {
        let mut cf = fixture();
        let value = cf.add_dimension("value", |r| Key::number(r.value)).unwrap();
        cf.filter_range(value, Key::number(2.0), Key::number(3.0));
        let (min, max) = cf.key_extent(value).unwrap();
        assert_eq!(min, Key::number(1.0));
        assert_eq!(max, Key::number(5.0));
    }

    #[test]
    fn test_included_records_keep_insertion_order() {
        let mut cf = fixture();
        let tag = cf.add_dimension("tag", |r| Key::text(r.tag)).unwrap();
        cf.filter_exact(tag, Key::text("b"));
        let values: Vec<f64> = cf.included_records().iter().map(|r| r.value).collect();
        assert_eq!(values, vec![2.0, 5.0]);
    }
}
