//! Incremental group aggregation

use std::collections::BTreeMap;
use std::sync::Arc;

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use roaring::RoaringBitmap;

use super::{Bucket, Crossfilter, DimensionId, Key};

/// Incremental reducer over group membership changes
///
/// `add` and `remove` must be inverses so that a record entering and
/// leaving the included set restores the accumulator, and both must be
/// O(1) per membership change.
pub trait Reducer<R> {
    type Acc: Clone + PartialOrd;

    fn initial(&self) -> Self::Acc;
    fn add(&self, acc: Self::Acc, record: &R) -> Self::Acc;
    fn remove(&self, acc: Self::Acc, record: &R) -> Self::Acc;
}

/// Counts records per bucket (the default reduction)
pub struct Count;

impl<R> Reducer<R> for Count {
    type Acc = u64;

    fn initial(&self) -> u64 {
        0
    }

    fn add(&self, acc: u64, _record: &R) -> u64 {
        acc + 1
    }

    fn remove(&self, acc: u64, _record: &R) -> u64 {
        acc.saturating_sub(1)
    }
}

/// Sums a numeric projection of each record
pub struct SumBy<F>(pub F);

impl<R, F> Reducer<R> for SumBy<F>
where
    F: Fn(&R) -> f64,
{
    type Acc = f64;

    fn initial(&self) -> f64 {
        0.0
    }

    fn add(&self, acc: f64, record: &R) -> f64 {
        acc + (self.0)(record)
    }

    fn remove(&self, acc: f64, record: &R) -> f64 {
        acc - (self.0)(record)
    }
}

/// Removable min/max accumulator backed by a value multiset
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extent {
    counts: BTreeMap<OrderedFloat<f64>, usize>,
}

impl Extent {
    pub fn min(&self) -> Option<f64> {
        self.counts.keys().next().map(|v| v.0)
    }

    pub fn max(&self) -> Option<f64> {
        self.counts.keys().next_back().map(|v| v.0)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    fn insert(&mut self, value: f64) {
        *self.counts.entry(OrderedFloat(value)).or_insert(0) += 1;
    }

    fn remove(&mut self, value: f64) {
        if let Some(count) = self.counts.get_mut(&OrderedFloat(value)) {
            *count -= 1;
            if *count == 0 {
                self.counts.remove(&OrderedFloat(value));
            }
        }
    }
}

impl PartialOrd for Extent {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        (self.min(), self.max()).partial_cmp(&(other.min(), other.max()))
    }
}

/// Tracks the minimum and maximum of a numeric projection per bucket
pub struct Extrema<F>(pub F);

impl<R, F> Reducer<R> for Extrema<F>
where
    F: Fn(&R) -> f64,
{
    type Acc = Extent;

    fn initial(&self) -> Extent {
        Extent::default()
    }

    fn add(&self, mut acc: Extent, record: &R) -> Extent {
        acc.insert((self.0)(record));
        acc
    }

    fn remove(&self, mut acc: Extent, record: &R) -> Extent {
        acc.remove((self.0)(record));
        acc
    }
}

/// A grouped aggregate bound to one dimension
///
/// Buckets are registered up front from the unfiltered records, in
/// key-encounter order. That order never changes afterwards: it is the
/// deterministic tie-break for `top`/`bottom`, and buckets whose members
/// are all filtered away keep reporting their initial value instead of
/// disappearing. `refresh` walks only the membership delta since the last
/// call, so a filter change costs O(changed records), not O(records).
pub struct Group<R, D: Reducer<R>> {
    dim: DimensionId,
    records: Arc<Vec<R>>,
    keys: Arc<Vec<Key>>,
    bin_of: Box<dyn Fn(&Key) -> Key + Send + Sync>,
    reducer: D,
    buckets: IndexMap<Key, D::Acc>,
    /// Membership the buckets currently reflect
    current: RoaringBitmap,
}

impl<R, D: Reducer<R>> Group<R, D> {
    pub fn new(
        cf: &Crossfilter<R>,
        dim: DimensionId,
        bin_of: impl Fn(&Key) -> Key + Send + Sync + 'static,
        reducer: D,
    ) -> Self {
        let keys = cf.keys(dim).clone();
        let mut buckets = IndexMap::new();
        for key in keys.iter() {
            buckets.entry(bin_of(key)).or_insert_with(|| reducer.initial());
        }
        Self {
            dim,
            records: cf.records().clone(),
            keys,
            bin_of: Box::new(bin_of),
            reducer,
            buckets,
            current: RoaringBitmap::new(),
        }
    }

    /// The dimension this group aggregates over
    pub fn dimension(&self) -> DimensionId {
        self.dim
    }

    /// Number of distinct buckets
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Re-aggregate against a new inclusion set, applying only the delta
    pub fn refresh(&mut self, included: &RoaringBitmap) {
        let added = included - &self.current;
        let removed = &self.current - included;
        for idx in added {
            self.apply(idx, true);
        }
        for idx in removed {
            self.apply(idx, false);
        }
        self.current = included.clone();
    }

    fn apply(&mut self, idx: u32, is_add: bool) {
        let record = &self.records[idx as usize];
        let bin = (self.bin_of)(&self.keys[idx as usize]);
        let reducer = &self.reducer;
        let slot = self
            .buckets
            .entry(bin)
            .or_insert_with(|| reducer.initial());
        let acc = slot.clone();
        *slot = if is_add {
            reducer.add(acc, record)
        } else {
            reducer.remove(acc, record)
        };
    }

    /// All buckets in ascending key order
    pub fn all(&self) -> Vec<Bucket<D::Acc>> {
        let mut buckets: Vec<Bucket<D::Acc>> = self
            .buckets
            .iter()
            .map(|(key, acc)| Bucket::new(key.clone(), acc.clone()))
            .collect();
        buckets.sort_by(|a, b| a.key.cmp(&b.key));
        buckets
    }

    /// The `n` largest buckets by value, descending; ties keep
    /// key-encounter order
    pub fn top(&self, n: usize) -> Vec<Bucket<D::Acc>> {
        let mut buckets = self.in_encounter_order();
        buckets.sort_by(|a, b| {
            b.value
                .partial_cmp(&a.value)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        buckets.truncate(n);
        buckets
    }

    /// The `n` smallest buckets by value, ascending; ties keep
    /// key-encounter order
    pub fn bottom(&self, n: usize) -> Vec<Bucket<D::Acc>> {
        let mut buckets = self.in_encounter_order();
        buckets.sort_by(|a, b| {
            a.value
                .partial_cmp(&b.value)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        buckets.truncate(n);
        buckets
    }

    fn in_encounter_order(&self) -> Vec<Bucket<D::Acc>> {
        self.buckets
            .iter()
            .map(|(key, acc)| Bucket::new(key.clone(), acc.clone()))
            .collect()
    }
}
