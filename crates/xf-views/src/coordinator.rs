//! The view coordinator: owns the filter engine and drives the refresh cycle

use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use parking_lot::{Mutex, RwLock};
use tracing::debug;

use xf_core::{
    BinScale, Count, Crossfilter, DimensionId, Dispatch, EventKind, FilterEvent, Group, Key,
    SearchState, LENGTH_BIN_COUNT,
};
use xf_data::{BasicInformation, Document, DocumentSet};

use crate::sinks::{BucketSink, HostShell, LengthBin, LengthSink, SpatialSink};

/// Number of cluster buckets handed to the cluster view
pub const CLUSTER_TOP: usize = 20;

/// Handles to the six registered dimensions
struct Dimensions {
    date: DimensionId,
    length: DimensionId,
    latitude: DimensionId,
    longitude: DimensionId,
    language: DimensionId,
    cluster: DimensionId,
}

/// The filter engine for one loaded dataset
///
/// Torn down and rebuilt wholesale when a new dataset replaces the old.
struct Engine {
    cf: Crossfilter<Document>,
    dims: Dimensions,
    date_group: Group<Document, Count>,
    length_group: Group<Document, Count>,
    language_group: Group<Document, Count>,
    cluster_group: Group<Document, Count>,
    length_scale: BinScale,
    basic_information: BasicInformation,
}

impl Engine {
    fn build(set: DocumentSet) -> anyhow::Result<Self> {
        let DocumentSet {
            basic_information,
            documents,
        } = set;

        let mut cf = Crossfilter::new(documents);
        let date = cf.add_dimension("date", |d: &Document| Key::Date(d.date))?;
        let length = cf.add_dimension("length", |d: &Document| Key::number(d.text_length))?;
        let latitude = cf.add_dimension("latitude", |d: &Document| Key::number(d.latitude))?;
        let longitude = cf.add_dimension("longitude", |d: &Document| Key::number(d.longitude))?;
        let language = cf.add_dimension("language", |d: &Document| Key::text(d.language.as_str()))?;
        let cluster = cf.add_dimension("cluster", |d: &Document| Key::Integer(d.cluster))?;

        // Bin boundaries come from the unfiltered extremes and stay put
        // for the life of the dataset.
        let length_scale = cf
            .key_extent(length)
            .and_then(|(min, max)| Some(BinScale::new(min.as_f64()?, max.as_f64()?, LENGTH_BIN_COUNT)))
            .unwrap_or_else(|| BinScale::new(0.0, 0.0, LENGTH_BIN_COUNT));

        let date_group = Group::new(&cf, date, year_of, Count);
        let scale = length_scale;
        let length_group = Group::new(
            &cf,
            length,
            move |key| Key::Integer(key.as_f64().map(|v| scale.bin(v) as i64).unwrap_or(0)),
            Count,
        );
        let language_group = Group::new(&cf, language, Key::clone, Count);
        let cluster_group = Group::new(&cf, cluster, Key::clone, Count);

        Ok(Self {
            cf,
            dims: Dimensions {
                date,
                length,
                latitude,
                longitude,
                language,
                cluster,
            },
            date_group,
            length_group,
            language_group,
            cluster_group,
            length_scale,
            basic_information,
        })
    }

    /// Recompute every view's aggregate and hand it over
    ///
    /// Always total across views, even though only one dimension changed:
    /// each group refresh walks only its membership delta, and every other
    /// dimension's display depends on the changed filter anyway.
    fn refresh(&mut self, sinks: &mut SinkSet, shell: &dyn HostShell) {
        self.date_group
            .refresh(&self.cf.included_excluding(self.dims.date));
        if let Some(sink) = sinks.date.as_mut() {
            sink.update(&self.date_group.all());
        }

        self.length_group
            .refresh(&self.cf.included_excluding(self.dims.length));
        if let Some(sink) = sinks.length.as_mut() {
            sink.update(&self.length_bins());
        }

        if let Some(sink) = sinks.map.as_mut() {
            let included: Vec<Document> =
                self.cf.included_records().into_iter().cloned().collect();
            sink.update(&included);
        }

        self.language_group
            .refresh(&self.cf.included_excluding(self.dims.language));
        if let Some(sink) = sinks.language.as_mut() {
            sink.update(&self.language_group.top(usize::MAX));
        }

        self.cluster_group
            .refresh(&self.cf.included_excluding(self.dims.cluster));
        if let Some(sink) = sinks.cluster.as_mut() {
            sink.update(&self.cluster_group.top(CLUSTER_TOP));
        }

        let selected = self.cf.included_count();
        debug!(selected, "views refreshed");
        shell.update_selected(selected);
    }

    /// Length buckets with their real-valued axis positions attached
    fn length_bins(&self) -> Vec<LengthBin> {
        self.length_group
            .all()
            .into_iter()
            .filter_map(|bucket| match bucket.key {
                Key::Integer(bin) => Some(LengthBin {
                    bin: bin as u32,
                    scaled_key: self.length_scale.scaled_key(bin as u32),
                    count: bucket.value,
                }),
                _ => None,
            })
            .collect()
    }
}

/// Binning function for the date histogram: one bucket per calendar year
fn year_of(key: &Key) -> Key {
    match key {
        Key::Date(date) => Key::Date(
            NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(*date),
        ),
        other => other.clone(),
    }
}

/// The attached view collaborators
#[derive(Default)]
struct SinkSet {
    date: Option<Box<dyn BucketSink>>,
    length: Option<Box<dyn LengthSink>>,
    map: Option<Box<dyn SpatialSink>>,
    language: Option<Box<dyn BucketSink>>,
    cluster: Option<Box<dyn BucketSink>>,
}

impl SinkSet {
    fn prepare_all(&mut self) {
        if let Some(sink) = self.date.as_mut() {
            sink.prepare();
        }
        if let Some(sink) = self.length.as_mut() {
            sink.prepare();
        }
        if let Some(sink) = self.map.as_mut() {
            sink.prepare();
        }
        if let Some(sink) = self.language.as_mut() {
            sink.prepare();
        }
        if let Some(sink) = self.cluster.as_mut() {
            sink.prepare();
        }
    }

    fn clear_all(&mut self) {
        if let Some(sink) = self.date.as_mut() {
            sink.update(&[]);
        }
        if let Some(sink) = self.length.as_mut() {
            sink.update(&[]);
        }
        if let Some(sink) = self.map.as_mut() {
            sink.update(&[]);
        }
        if let Some(sink) = self.language.as_mut() {
            sink.update(&[]);
        }
        if let Some(sink) = self.cluster.as_mut() {
            sink.update(&[]);
        }
    }
}

/// Coordinates the filter engine, the search state and the attached views
///
/// All filter traffic flows through `emit`: a view raises a filter-change
/// intent, the matching handler mutates exactly one dimension's predicate
/// and the search state, and a committed change triggers a total refresh.
/// Everything runs synchronously in the calling turn.
pub struct ViewCoordinator {
    engine: Arc<RwLock<Option<Engine>>>,
    search_state: Arc<RwLock<SearchState>>,
    sinks: Arc<Mutex<SinkSet>>,
    shell: Arc<dyn HostShell>,
    dispatch: Dispatch,
}

impl ViewCoordinator {
    pub fn new(shell: Arc<dyn HostShell>) -> Self {
        let mut coordinator = Self {
            engine: Arc::new(RwLock::new(None)),
            search_state: Arc::new(RwLock::new(SearchState::new())),
            sinks: Arc::new(Mutex::new(SinkSet::default())),
            shell,
            dispatch: Dispatch::new(),
        };
        coordinator.setup_dispatch();
        coordinator
    }

    /// Load a dataset, replacing any previous one wholesale
    ///
    /// Prepares every attached sink, then runs the initial refresh so
    /// views start from the unfiltered aggregates.
    pub fn set_documents(&mut self, set: DocumentSet) -> anyhow::Result<()> {
        self.search_state.write().clear_all();
        *self.engine.write() = Some(Engine::build(set)?);

        let mut sinks = self.sinks.lock();
        sinks.prepare_all();
        if let Some(engine) = self.engine.write().as_mut() {
            engine.refresh(&mut sinks, self.shell.as_ref());
        }
        Ok(())
    }

    /// Raise a filter-change intent
    pub fn emit(&mut self, event: FilterEvent) -> anyhow::Result<()> {
        self.dispatch.emit(&event)
    }

    /// Drop the dataset and push an empty state to every view
    pub fn clear(&mut self) {
        *self.engine.write() = None;
        self.search_state.write().clear_all();
        self.sinks.lock().clear_all();
    }

    /// Shared handle to the active-predicate snapshot
    pub fn search_state(&self) -> Arc<RwLock<SearchState>> {
        self.search_state.clone()
    }

    /// Records passing all active filters; 0 before a dataset is loaded
    pub fn included_count(&self) -> u64 {
        self.engine
            .read()
            .as_ref()
            .map(|engine| engine.cf.included_count())
            .unwrap_or(0)
    }

    /// Corpus metadata of the loaded dataset
    pub fn basic_information(&self) -> Option<BasicInformation> {
        self.engine
            .read()
            .as_ref()
            .map(|engine| engine.basic_information.clone())
    }

    pub fn attach_date_sink(&self, sink: impl BucketSink + 'static) {
        self.sinks.lock().date = Some(Box::new(sink));
    }

    pub fn attach_length_sink(&self, sink: impl LengthSink + 'static) {
        self.sinks.lock().length = Some(Box::new(sink));
    }

    pub fn attach_map_sink(&self, sink: impl SpatialSink + 'static) {
        self.sinks.lock().map = Some(Box::new(sink));
    }

    pub fn attach_language_sink(&self, sink: impl BucketSink + 'static) {
        self.sinks.lock().language = Some(Box::new(sink));
    }

    pub fn attach_cluster_sink(&self, sink: impl BucketSink + 'static) {
        self.sinks.lock().cluster = Some(Box::new(sink));
    }

    /// Wire every event channel to its filter action
    ///
    /// "begin" channels clear the predicate without refreshing, so views
    /// can preview an adjustment; committed and cleared channels refresh
    /// and notify the shell. The map is the exception: its begin doubles
    /// as the clear gesture and broadcasts immediately.
    fn setup_dispatch(&mut self) {
        let engine = self.engine.clone();
        let search = self.search_state.clone();
        self.dispatch.on(EventKind::DateAdjustBegin, move |_| {
            search.write().clear_date_range();
            if let Some(eng) = engine.write().as_mut() {
                eng.cf.filter_all(eng.dims.date);
            }
            Ok(())
        });

        let engine = self.engine.clone();
        let search = self.search_state.clone();
        let sinks = self.sinks.clone();
        let shell = self.shell.clone();
        self.dispatch.on(EventKind::DateCommit, move |event| {
            if let FilterEvent::DateCommitted { range } = event {
                search.write().set_date_range(*range);
                if let Some(eng) = engine.write().as_mut() {
                    eng.cf
                        .filter_range(eng.dims.date, Key::Date(range.0), Key::Date(range.1));
                    eng.refresh(&mut sinks.lock(), shell.as_ref());
                    shell.filter_event();
                }
            }
            Ok(())
        });

        let engine = self.engine.clone();
        let search = self.search_state.clone();
        let sinks = self.sinks.clone();
        let shell = self.shell.clone();
        self.dispatch.on(EventKind::DateClear, move |_| {
            search.write().clear_date_range();
            if let Some(eng) = engine.write().as_mut() {
                eng.cf.filter_all(eng.dims.date);
                eng.refresh(&mut sinks.lock(), shell.as_ref());
                shell.filter_event();
            }
            Ok(())
        });

        let engine = self.engine.clone();
        let search = self.search_state.clone();
        self.dispatch.on(EventKind::LengthAdjustBegin, move |_| {
            search.write().clear_length_range();
            if let Some(eng) = engine.write().as_mut() {
                eng.cf.filter_all(eng.dims.length);
            }
            Ok(())
        });

        let engine = self.engine.clone();
        let search = self.search_state.clone();
        let sinks = self.sinks.clone();
        let shell = self.shell.clone();
        self.dispatch.on(EventKind::LengthCommit, move |event| {
            if let FilterEvent::LengthCommitted { range } = event {
                search.write().set_length_range(*range);
                if let Some(eng) = engine.write().as_mut() {
                    eng.cf.filter_range(
                        eng.dims.length,
                        Key::number(range.0),
                        Key::number(range.1),
                    );
                    eng.refresh(&mut sinks.lock(), shell.as_ref());
                    shell.filter_event();
                }
            }
            Ok(())
        });

        let engine = self.engine.clone();
        let search = self.search_state.clone();
        let sinks = self.sinks.clone();
        let shell = self.shell.clone();
        self.dispatch.on(EventKind::LengthClear, move |_| {
            search.write().clear_length_range();
            if let Some(eng) = engine.write().as_mut() {
                eng.cf.filter_all(eng.dims.length);
                eng.refresh(&mut sinks.lock(), shell.as_ref());
                shell.filter_event();
            }
            Ok(())
        });

        let engine = self.engine.clone();
        let search = self.search_state.clone();
        let sinks = self.sinks.clone();
        let shell = self.shell.clone();
        self.dispatch.on(EventKind::MapAdjustBegin, move |_| {
            {
                let mut search = search.write();
                search.clear_latitude_range();
                search.clear_longitude_range();
            }
            if let Some(eng) = engine.write().as_mut() {
                eng.cf.filter_all(eng.dims.longitude);
                eng.cf.filter_all(eng.dims.latitude);
                eng.refresh(&mut sinks.lock(), shell.as_ref());
                shell.filter_event();
            }
            Ok(())
        });

        let engine = self.engine.clone();
        let search = self.search_state.clone();
        let sinks = self.sinks.clone();
        let shell = self.shell.clone();
        self.dispatch.on(EventKind::MapCommit, move |event| {
            if let FilterEvent::MapCommitted {
                latitude,
                longitude,
            } = event
            {
                {
                    let mut search = search.write();
                    search.set_latitude_range(*latitude);
                    search.set_longitude_range(*longitude);
                }
                if let Some(eng) = engine.write().as_mut() {
                    eng.cf.filter_range(
                        eng.dims.latitude,
                        Key::number(latitude.0),
                        Key::number(latitude.1),
                    );
                    eng.cf.filter_range(
                        eng.dims.longitude,
                        Key::number(longitude.0),
                        Key::number(longitude.1),
                    );
                    eng.refresh(&mut sinks.lock(), shell.as_ref());
                    shell.filter_event();
                }
            }
            Ok(())
        });

        let engine = self.engine.clone();
        let search = self.search_state.clone();
        let sinks = self.sinks.clone();
        let shell = self.shell.clone();
        self.dispatch.on(EventKind::LanguageSelect, move |event| {
            if let FilterEvent::LanguageSelected { language } = event {
                search.write().select_language(language.clone());
                if let Some(eng) = engine.write().as_mut() {
                    eng.cf
                        .filter_exact(eng.dims.language, Key::text(language.as_str()));
                    eng.refresh(&mut sinks.lock(), shell.as_ref());
                    shell.filter_event();
                }
            }
            Ok(())
        });

        let engine = self.engine.clone();
        let search = self.search_state.clone();
        let sinks = self.sinks.clone();
        let shell = self.shell.clone();
        self.dispatch.on(EventKind::LanguageClear, move |_| {
            search.write().clear_language();
            if let Some(eng) = engine.write().as_mut() {
                eng.cf.filter_all(eng.dims.language);
                eng.refresh(&mut sinks.lock(), shell.as_ref());
                shell.filter_event();
            }
            Ok(())
        });

        let engine = self.engine.clone();
        let search = self.search_state.clone();
        let sinks = self.sinks.clone();
        let shell = self.shell.clone();
        self.dispatch.on(EventKind::ClusterSelect, move |event| {
            if let FilterEvent::ClusterSelected { cluster } = event {
                search.write().select_cluster(*cluster);
                if let Some(eng) = engine.write().as_mut() {
                    eng.cf
                        .filter_exact(eng.dims.cluster, Key::Integer(*cluster));
                    eng.refresh(&mut sinks.lock(), shell.as_ref());
                    shell.filter_event();
                }
            }
            Ok(())
        });

        let engine = self.engine.clone();
        let search = self.search_state.clone();
        let sinks = self.sinks.clone();
        let shell = self.shell.clone();
        self.dispatch.on(EventKind::ClusterClear, move |_| {
            search.write().clear_cluster();
            if let Some(eng) = engine.write().as_mut() {
                eng.cf.filter_all(eng.dims.cluster);
                eng.refresh(&mut sinks.lock(), shell.as_ref());
                shell.filter_event();
            }
            Ok(())
        });
    }
}
