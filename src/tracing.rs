use std::cell::Cell;
use std::collections::HashMap;
use std::fmt::Write;
use std::io::{stderr, Write as IoWrite};
use std::num::NonZeroU64;
use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;

use thread_local::ThreadLocal;
use tracing::field::{Field, Visit};
use tracing::span::Id;
use tracing::subscriber::SetGlobalDefaultError;
use tracing::{span, Event, Level, Metadata, Subscriber};
use tracing_core::Interest;

struct SpanState {
    parent: Option<Id>,
    /// number of existing handles, the span is dropped from the map once this reaches zero
    reference_counter: AtomicUsize,
    /// span name together with its recorded fields
    description: String,
    metadata: &'static Metadata<'static>,
    /// microseconds since the creation of the subscriber at which the span was entered, or `0`
    entered_timestamp: AtomicU64,
    depth: usize
}

///
/// A minimal [`Subscriber`] that prints the tree of algorithm spans (e.g. the calls of the
/// factorization subroutines) together with their running time and the events emitted
/// inside them.
///
/// Only spans up to depth `max_depth` are printed, so that the output of the deeply recursive
/// parts of the factorization stays readable. All output goes to `stderr`.
///
pub struct LogAlgorithmSubscriber {
    span_ids: AtomicU64,
    span_map: RwLock<HashMap<Id, SpanState>>,
    current_span: ThreadLocal<Cell<Option<NonZeroU64>>>,
    creation_instant: Instant,
    interested_level: RangeInclusive<Level>,
    max_depth: usize
}

impl LogAlgorithmSubscriber {

    fn new(levels: RangeInclusive<Level>, max_depth: usize) -> Self {
        LogAlgorithmSubscriber {
            span_ids: AtomicU64::new(1),
            span_map: RwLock::new(HashMap::new()),
            current_span: ThreadLocal::new(),
            creation_instant: Instant::now(),
            interested_level: levels,
            max_depth: max_depth
        }
    }

    ///
    /// Installs the subscriber as global default. Note that `tracing` orders levels by
    /// verbosity, so `Level::INFO..=Level::TRACE` includes everything from `INFO` on.
    ///
    pub fn init(levels: RangeInclusive<Level>, max_depth: usize) -> Result<(), SetGlobalDefaultError> {
        tracing::subscriber::set_global_default(Self::new(levels, max_depth))
    }

    ///
    /// Installs the subscriber with the settings used in tests, ignoring the failure when
    /// another test has already installed it.
    ///
    pub fn init_test() {
        _ = Self::init(Level::INFO..=Level::INFO, 1);
    }

    fn span_map<'a>(&'a self) -> RwLockReadGuard<'a, HashMap<Id, SpanState>> {
        self.span_map.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn span_map_mut<'a>(&'a self) -> RwLockWriteGuard<'a, HashMap<Id, SpanState>> {
        self.span_map.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn current(&self) -> &Cell<Option<NonZeroU64>> {
        self.current_span.get_or(|| Cell::new(None))
    }

    fn elapsed_micros(&self) -> u64 {
        Instant::now().duration_since(self.creation_instant).as_micros() as u64
    }

    fn print_line(depth: usize, line: std::fmt::Arguments) {
        let mut out = stderr().lock();
        _ = writeln!(out, "{:width$}{}", "", line, width = 2 * depth);
    }
}

struct FieldRecorder {
    message: Option<String>,
    fields: String
}

impl FieldRecorder {

    fn new() -> Self {
        FieldRecorder { message: None, fields: String::new() }
    }

    fn into_string(self) -> String {
        let mut result = self.message.unwrap_or_default();
        if !self.fields.is_empty() {
            _ = write!(result, "({})", self.fields);
        }
        return result;
    }
}

impl Visit for FieldRecorder {

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{:?}", value));
        } else {
            if !self.fields.is_empty() {
                self.fields.push_str(", ");
            }
            _ = write!(self.fields, "{}={:?}", field.name(), value);
        }
    }
}

impl Subscriber for LogAlgorithmSubscriber {

    fn register_callsite(&self, metadata: &'static Metadata<'static>) -> Interest {
        if self.interested_level.contains(metadata.level()) {
            Interest::always()
        } else {
            Interest::never()
        }
    }

    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        self.interested_level.contains(metadata.level())
    }

    fn current_span(&self) -> tracing_core::span::Current {
        let current = self.current().get().map(Id::from_non_zero_u64);
        match current.and_then(|id| self.span_map().get(&id).map(|state| (id.clone(), state.metadata))) {
            Some((id, metadata)) => tracing_core::span::Current::new(id, metadata),
            None => tracing_core::span::Current::none()
        }
    }

    fn new_span(&self, span: &span::Attributes<'_>) -> Id {
        let raw_id = self.span_ids.fetch_add(1, Ordering::Relaxed);
        let id = Id::from_u64(raw_id);
        let parent = span.parent().cloned().or_else(|| self.current().get().map(Id::from_non_zero_u64));
        let mut spans = self.span_map_mut();
        let depth = parent.as_ref().and_then(|id| spans.get(id)).map(|state| state.depth + 1).unwrap_or(0);

        let mut description = FieldRecorder::new();
        span.record(&mut description);
        description.message = Some(span.metadata().name().to_owned());

        spans.insert(id.clone(), SpanState {
            parent: parent,
            reference_counter: AtomicUsize::new(1),
            description: description.into_string(),
            metadata: span.metadata(),
            entered_timestamp: AtomicU64::new(0),
            depth: depth
        });
        return id;
    }

    fn record(&self, _span: &Id, _values: &span::Record<'_>) {
        // fields recorded after span creation are not printed
    }

    fn record_follows_from(&self, _span: &Id, _follows: &Id) {}

    fn event(&self, event: &Event<'_>) {
        let span_map = self.span_map();
        let depth = self.current().get()
            .and_then(|id| span_map.get(&Id::from_non_zero_u64(id)))
            .map(|state| state.depth + 1)
            .unwrap_or(0);
        if depth <= self.max_depth {
            let mut description = FieldRecorder::new();
            event.record(&mut description);
            Self::print_line(depth, format_args!("[{}] {}", event.metadata().level(), description.into_string()));
        }
    }

    fn enter(&self, span: &Id) {
        self.current().set(Some(span.into_non_zero_u64()));
        let span_map = self.span_map();
        if let Some(entered_span) = span_map.get(span) {
            if entered_span.depth <= self.max_depth {
                Self::print_line(entered_span.depth, format_args!("{}", entered_span.description));
            }
            entered_span.entered_timestamp.store(self.elapsed_micros(), Ordering::SeqCst);
        }
    }

    fn exit(&self, span: &Id) {
        let span_map = self.span_map();
        if let Some(exited_span) = span_map.get(span) {
            let entered_timestamp = exited_span.entered_timestamp.swap(0, Ordering::SeqCst);
            if exited_span.depth <= self.max_depth {
                Self::print_line(exited_span.depth, format_args!("done({}us)", self.elapsed_micros().saturating_sub(entered_timestamp)));
            }
            self.current().set(exited_span.parent.as_ref().map(|id| id.into_non_zero_u64()));
        }
    }

    fn clone_span(&self, id: &Id) -> Id {
        if let Some(state) = self.span_map().get(id) {
            state.reference_counter.fetch_add(1, Ordering::Relaxed);
        }
        return id.clone();
    }

    fn try_close(&self, id: Id) -> bool {
        let remaining_handles = match self.span_map().get(&id) {
            Some(state) => state.reference_counter.fetch_sub(1, Ordering::Relaxed) - 1,
            None => return false
        };
        if remaining_handles == 0 {
            self.span_map_mut().remove(&id);
            return true;
        } else {
            return false;
        }
    }
}

#[cfg(test)]
use std::sync::Arc;

#[test]
fn test_nested_spans() {
    let subscriber = Arc::new(LogAlgorithmSubscriber::new(Level::INFO..=Level::INFO, 0));
    tracing::subscriber::with_default(subscriber.clone(), || {
        let outer = tracing::span!(Level::INFO, "outer", value = 3);
        let outer_guard = outer.enter();
        let inner = tracing::span!(Level::INFO, "inner");
        let outer_id = outer.id().unwrap();
        let inner_id = inner.id().unwrap();
        {
            let _inner_guard = inner.enter();
            tracing::event!(Level::INFO, factors = 2, "found factors");
            assert_eq!(Some(inner_id.into_non_zero_u64()), subscriber.current().get());
            let spans = subscriber.span_map();
            assert_eq!(2, spans.len());
            assert_eq!("outer(value=3)", spans[&outer_id].description);
            assert_eq!(0, spans[&outer_id].depth);
            assert_eq!(1, spans[&inner_id].depth);
            assert_eq!(Some(outer_id.clone()), spans[&inner_id].parent);
        }
        assert_eq!(Some(outer_id.into_non_zero_u64()), subscriber.current().get());
        drop(inner);
        assert_eq!(1, subscriber.span_map().len());
        drop(outer_guard);
        assert_eq!(None, subscriber.current().get());
        drop(outer);
        assert!(subscriber.span_map().is_empty());
    });
}
