//! End-to-end flow: load documents, filter through events, watch every
//! view's aggregate follow.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use parking_lot::Mutex;

use xf_core::{Bucket, FilterEvent, Key};
use xf_data::{BasicInformation, Document, DocumentSet, RawDocument};
use xf_views::{BucketSink, HostShell, LengthBin, LengthSink, SpatialSink, ViewCoordinator};

#[derive(Default)]
struct Shell {
    selected: Mutex<Vec<u64>>,
    events: AtomicUsize,
}

impl HostShell for Shell {
    fn update_selected(&self, count: u64) {
        self.selected.lock().push(count);
    }

    fn filter_event(&self) {
        self.events.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Clone, Default)]
struct Buckets(Arc<Mutex<Vec<Bucket<u64>>>>);

impl BucketSink for Buckets {
    fn update(&mut self, buckets: &[Bucket<u64>]) {
        *self.0.lock() = buckets.to_vec();
    }
}

#[derive(Clone, Default)]
struct Lengths(Arc<Mutex<Vec<LengthBin>>>);

impl LengthSink for Lengths {
    fn update(&mut self, bins: &[LengthBin]) {
        *self.0.lock() = bins.to_vec();
    }
}

#[derive(Clone, Default)]
struct Map(Arc<Mutex<Vec<Document>>>);

impl SpatialSink for Map {
    fn update(&mut self, documents: &[Document]) {
        *self.0.lock() = documents.to_vec();
    }
}

fn raw(id: u32, date: &str, length: f64, language: &str, cluster: i64) -> RawDocument {
    RawDocument {
        id,
        date: date.to_string(),
        text_length: length,
        latitude: 50.0 + id as f64,
        longitude: 5.0 + id as f64,
        language: language.to_string(),
        cluster,
    }
}

/// Five documents, one with no language value at all.
fn dataset() -> DocumentSet {
    let documents = vec![
        raw(0, "2018-02-10", 100.0, "en", 0),
        raw(1, "2018-11-03", 250.0, "en", 0),
        raw(2, "2019-06-21", 400.0, "fr", 1),
        raw(3, "2020-01-05", 550.0, "", 1),
        raw(4, "2021-09-30", 700.0, "de", 2),
    ]
    .into_iter()
    .enumerate()
    .map(|(index, raw)| raw.parse(index).unwrap())
    .collect();
    DocumentSet {
        basic_information: BasicInformation::default(),
        documents,
    }
}

struct Fixture {
    coordinator: ViewCoordinator,
    shell: Arc<Shell>,
    dates: Buckets,
    lengths: Lengths,
    map: Map,
    languages: Buckets,
    clusters: Buckets,
}

fn fixture() -> Fixture {
    let shell = Arc::new(Shell::default());
    let dates = Buckets::default();
    let lengths = Lengths::default();
    let map = Map::default();
    let languages = Buckets::default();
    let clusters = Buckets::default();

    let mut coordinator = ViewCoordinator::new(shell.clone());
    coordinator.attach_date_sink(dates.clone());
    coordinator.attach_length_sink(lengths.clone());
    coordinator.attach_map_sink(map.clone());
    coordinator.attach_language_sink(languages.clone());
    coordinator.attach_cluster_sink(clusters.clone());
    coordinator.set_documents(dataset()).unwrap();

    Fixture {
        coordinator,
        shell,
        dates,
        lengths,
        map,
        languages,
        clusters,
    }
}

fn labels(buckets: &[Bucket<u64>]) -> Vec<String> {
    buckets.iter().map(|b| b.key.to_string()).collect()
}

#[test]
fn unfiltered_language_counts_include_the_sentinel() {
    let fx = fixture();
    let buckets = fx.languages.0.lock();

    // Ties broken by key-encounter order: en first, then fr, n.a., de.
    assert_eq!(labels(&buckets), vec!["en", "fr", "n.a.", "de"]);
    let counts: Vec<u64> = buckets.iter().map(|b| b.value).collect();
    assert_eq!(counts, vec![2, 1, 1, 1]);
}

#[test]
fn selecting_a_language_recomputes_every_other_view() {
    let mut fx = fixture();
    fx.coordinator
        .emit(FilterEvent::LanguageSelected {
            language: "en".to_string(),
        })
        .unwrap();

    assert_eq!(fx.shell.selected.lock().last(), Some(&2));
    assert_eq!(fx.shell.events.load(Ordering::SeqCst), 1);

    // Date and length aggregates now cover only the two English documents.
    let date_total: u64 = fx.dates.0.lock().iter().map(|b| b.value).sum();
    assert_eq!(date_total, 2);
    let length_total: u64 = fx.lengths.0.lock().iter().map(|b| b.count).sum();
    assert_eq!(length_total, 2);
    assert_eq!(fx.map.0.lock().len(), 2);

    // The language view excludes its own predicate and still shows all
    // options under the (empty) remaining filters.
    let counts: Vec<u64> = fx.languages.0.lock().iter().map(|b| b.value).collect();
    assert_eq!(counts, vec![2, 1, 1, 1]);
}

#[test]
fn date_range_and_language_compose() {
    let mut fx = fixture();
    fx.coordinator
        .emit(FilterEvent::LanguageSelected {
            language: "en".to_string(),
        })
        .unwrap();
    fx.coordinator
        .emit(FilterEvent::DateCommitted {
            range: (
                NaiveDate::from_ymd_opt(2018, 6, 1).unwrap(),
                NaiveDate::from_ymd_opt(2019, 1, 1).unwrap(),
            ),
        })
        .unwrap();

    assert_eq!(fx.shell.selected.lock().last(), Some(&1));

    // The language view reflects the date filter but not its own:
    // only the late-2018 English document remains in range.
    let buckets = fx.languages.0.lock();
    let en = buckets.iter().find(|b| b.key == Key::text("en")).unwrap();
    assert_eq!(en.value, 1);
    let fr = buckets.iter().find(|b| b.key == Key::text("fr")).unwrap();
    assert_eq!(fr.value, 0);
    drop(buckets);

    // Clearing the date filter restores the language-only view.
    fx.coordinator.emit(FilterEvent::DateCleared).unwrap();
    assert_eq!(fx.shell.selected.lock().last(), Some(&2));
}

#[test]
fn length_bins_carry_scaled_keys() {
    let fx = fixture();
    let bins = fx.lengths.0.lock();

    // min = 100, range = 600; every document occupies its own bucket.
    assert_eq!(bins.first().map(|b| b.bin), Some(0));
    let first = bins.first().unwrap();
    assert!((first.scaled_key - 100.0).abs() < 1e-9);
    let last = bins.last().unwrap();
    assert_eq!(last.bin, 10);
    assert!((last.scaled_key - 700.0).abs() < 1e-9);
    let total: u64 = bins.iter().map(|b| b.count).sum();
    assert_eq!(total, 5);
}

#[test]
fn cluster_selection_counts_documents() {
    let mut fx = fixture();
    fx.coordinator
        .emit(FilterEvent::ClusterSelected { cluster: 1 })
        .unwrap();
    assert_eq!(fx.shell.selected.lock().last(), Some(&2));

    // The cluster view itself keeps showing all clusters.
    let counts: Vec<u64> = fx.clusters.0.lock().iter().map(|b| b.value).collect();
    assert_eq!(counts, vec![2, 2, 1]);

    fx.coordinator.emit(FilterEvent::ClusterCleared).unwrap();
    assert_eq!(fx.shell.selected.lock().last(), Some(&5));
}
