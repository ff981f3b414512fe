//! Tracing layer that renders events as JSON lines into a [`LogSink`].

use std::fmt::{self, Write};
use std::sync::Arc;

use serde_json::{Map, Number, Value};

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer};

use super::entry::LogEntry;
use super::sink::LogSink;
use crate::error::{EffectsError, EffectsResult};

/// A tracing layer writing each event to a sink as one JSON line.
pub struct ConsoleLayer {
    sink: Arc<dyn LogSink>,
}

impl ConsoleLayer {
    pub fn new(sink: impl LogSink) -> Self {
        Self {
            sink: Arc::new(sink),
        }
    }
}

impl<S> Layer<S> for ConsoleLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let level = metadata.level().as_str().to_lowercase();

        let (message, fields) = EventFields::collect(event).into_parts();
        let mut entry = LogEntry::new(level, metadata.target(), message);
        if let Some(fields) = fields {
            entry = entry.with_fields(fields);
        }

        if let Some(scope) = ctx.event_scope(event) {
            let spans: Vec<String> = scope.from_root().map(|span| span.name().to_string()).collect();
            if !spans.is_empty() {
                entry = entry.with_span(spans.join(" > "));
            }
        }

        // A line that fails to render is dropped; logging never panics.
        if let Ok(line) = entry.to_json_line() {
            self.sink.write_line(*metadata.level(), &line);
        }
    }
}

/// Field name tracing gives the formatted message.
const MESSAGE_FIELD: &str = "message";

/// Fields recorded on one event, keyed by name. The message is split off
/// when the entry is built.
#[derive(Default)]
struct EventFields {
    values: Map<String, Value>,
}

impl EventFields {
    fn collect(event: &Event<'_>) -> Self {
        let mut fields = Self::default();
        event.record(&mut fields);
        fields
    }

    fn put(&mut self, field: &Field, value: impl Into<Value>) {
        self.values.insert(field.name().to_string(), value.into());
    }

    /// `(message, remaining fields)`.
    fn into_parts(mut self) -> (String, Option<Value>) {
        let message = match self.values.remove(MESSAGE_FIELD) {
            Some(Value::String(text)) => text,
            Some(other) => other.to_string(),
            None => String::new(),
        };
        let rest = (!self.values.is_empty()).then(|| Value::Object(self.values));
        (message, rest)
    }
}

impl Visit for EventFields {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.put(field, format!("{:?}", value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.put(field, value);
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.put(field, value);
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.put(field, value);
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.put(field, value);
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        // JSON has no NaN or infinities
        match Number::from_f64(value) {
            Some(number) => self.put(field, number),
            None => self.put(field, value.to_string()),
        }
    }

    /// The error and its sources, outermost first, joined with ": ".
    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        let mut text = value.to_string();
        let mut source = value.source();
        while let Some(cause) = source {
            let _ = write!(text, ": {}", cause);
            source = cause.source();
        }
        self.put(field, text);
    }
}

/// Builder for the global subscriber.
#[derive(Debug, Clone)]
pub struct LoggingBuilder {
    filter: String,
}

impl Default for LoggingBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggingBuilder {
    /// Defaults to `info` for every target.
    pub fn new() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }

    /// Set the filter directives (e.g. "folio=info,folio_core=debug").
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Build the filtered subscriber without installing it.
    pub fn build_subscriber(
        &self,
        sink: impl LogSink,
    ) -> EffectsResult<impl Subscriber + Send + Sync + 'static> {
        let filter = EnvFilter::try_new(&self.filter)
            .map_err(|e| EffectsError::Logging(format!("bad filter {:?}: {}", self.filter, e)))?;
        Ok(tracing_subscriber::registry()
            .with(filter)
            .with(ConsoleLayer::new(sink)))
    }

    /// Install the subscriber globally. Fails if one is already set.
    pub fn init(&self, sink: impl LogSink) -> EffectsResult<()> {
        self.build_subscriber(sink)?
            .try_init()
            .map_err(|e| EffectsError::Logging(e.to_string()))
    }
}
