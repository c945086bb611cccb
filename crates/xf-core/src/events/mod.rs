use ahash::AHashMap;
use chrono::NaiveDate;
use tracing::debug;

/// A filter-change intent raised by a view interaction
///
/// Each range dimension has a begin/commit/clear lifecycle; "begin" marks
/// the start of an interactive adjustment, "commit" a definitive range.
/// The map raises begin/commit only: its begin doubles as the clear
/// gesture. Categorical dimensions have select/clear pairs.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterEvent {
    DateAdjustBegin,
    DateCommitted { range: (NaiveDate, NaiveDate) },
    DateCleared,
    LengthAdjustBegin,
    LengthCommitted { range: (f64, f64) },
    LengthCleared,
    MapAdjustBegin,
    MapCommitted {
        latitude: (f64, f64),
        longitude: (f64, f64),
    },
    LanguageSelected { language: String },
    LanguageCleared,
    ClusterSelected { cluster: i64 },
    ClusterCleared,
}

/// Registration slot for each event channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    DateAdjustBegin,
    DateCommit,
    DateClear,
    LengthAdjustBegin,
    LengthCommit,
    LengthClear,
    MapAdjustBegin,
    MapCommit,
    LanguageSelect,
    LanguageClear,
    ClusterSelect,
    ClusterClear,
}

impl FilterEvent {
    /// The channel this event is delivered on
    pub fn kind(&self) -> EventKind {
        match self {
            FilterEvent::DateAdjustBegin => EventKind::DateAdjustBegin,
            FilterEvent::DateCommitted { .. } => EventKind::DateCommit,
            FilterEvent::DateCleared => EventKind::DateClear,
            FilterEvent::LengthAdjustBegin => EventKind::LengthAdjustBegin,
            FilterEvent::LengthCommitted { .. } => EventKind::LengthCommit,
            FilterEvent::LengthCleared => EventKind::LengthClear,
            FilterEvent::MapAdjustBegin => EventKind::MapAdjustBegin,
            FilterEvent::MapCommitted { .. } => EventKind::MapCommit,
            FilterEvent::LanguageSelected { .. } => EventKind::LanguageSelect,
            FilterEvent::LanguageCleared => EventKind::LanguageClear,
            FilterEvent::ClusterSelected { .. } => EventKind::ClusterSelect,
            FilterEvent::ClusterCleared => EventKind::ClusterClear,
        }
    }
}

/// Handler invoked synchronously when its channel fires
pub type EventHandler = Box<dyn FnMut(&FilterEvent) -> anyhow::Result<()> + Send>;

/// Minimal synchronous pub/sub hub for filter events
///
/// One handler slot per channel; registering again replaces the previous
/// handler (a known limitation, not a queue). `emit` delivers in the
/// calling turn with no queuing, and a handler failure propagates straight
/// back to the emitter.
pub struct Dispatch {
    handlers: AHashMap<EventKind, EventHandler>,
}

impl Dispatch {
    pub fn new() -> Self {
        Self {
            handlers: AHashMap::new(),
        }
    }

    /// Register the handler for a channel; last registration wins
    pub fn on(
        &mut self,
        kind: EventKind,
        handler: impl FnMut(&FilterEvent) -> anyhow::Result<()> + Send + 'static,
    ) {
        if self.handlers.insert(kind, Box::new(handler)).is_some() {
            debug!(?kind, "event handler replaced");
        }
    }

    /// Deliver an event to its channel's handler, if any
    pub fn emit(&mut self, event: &FilterEvent) -> anyhow::Result<()> {
        match self.handlers.get_mut(&event.kind()) {
            Some(handler) => handler(event),
            None => Ok(()),
        }
    }

    pub fn is_registered(&self, kind: EventKind) -> bool {
        self.handlers.contains_key(&kind)
    }
}

impl Default for Dispatch {
    fn default() -> Self {
        Self::new()
    }
}
