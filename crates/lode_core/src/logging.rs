//! Structured logging sink
//!
//! The render and layout crates never talk to a logging backend directly when
//! reporting outcomes a host may care about (failed texture loads, degraded
//! inset reads). They call an injected [`LogSink`] with a message and a
//! [`LogContext`]; the sink is fire-and-forget.
//!
//! Two sinks ship with the crate:
//!
//! - [`TracingSink`] forwards every call to `tracing` events
//! - [`RecordingSink`] keeps entries in memory for assertions in tests
//!
//! Internal diagnostics (cache hits, joins) go straight to `tracing` macros.
//!
//! # Example
//!
//! ```ignore
//! use lode_core::logging::{LogContext, LogSink, TracingSink};
//!
//! let sink = TracingSink;
//! sink.info(
//!     "texture cached",
//!     &LogContext::new("lode_image").with("path", "ore.svg").with("size", 64),
//! );
//! ```

use std::cell::RefCell;
use std::fmt;
use std::sync::Once;

use smallvec::SmallVec;
use tracing_subscriber::EnvFilter;

// =============================================================================
// CONTEXT
// =============================================================================

/// Key/value context attached to a log call
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LogContext {
    /// Subsystem that produced the entry (usually the crate name)
    pub source: &'static str,
    fields: SmallVec<[(&'static str, String); 4]>,
}

impl LogContext {
    pub fn new(source: &'static str) -> Self {
        Self {
            source,
            fields: SmallVec::new(),
        }
    }

    /// Add a field
    pub fn with(mut self, key: &'static str, value: impl fmt::Display) -> Self {
        self.fields.push((key, value.to_string()));
        self
    }

    /// Look up a field value by key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.fields.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

impl fmt::Display for LogContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (key, value) in &self.fields {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{}={}", key, value)?;
            first = false;
        }
        Ok(())
    }
}

// =============================================================================
// SINK TRAIT
// =============================================================================

/// Injected logging collaborator
///
/// Implementations must not panic and must not block; callers never branch
/// on the outcome of a log call.
pub trait LogSink {
    fn info(&self, message: &str, ctx: &LogContext);

    fn warn(&self, message: &str, ctx: &LogContext);

    fn error(&self, message: &str, error: &dyn std::error::Error, ctx: &LogContext);
}

/// Sink that forwards to `tracing`
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn info(&self, message: &str, ctx: &LogContext) {
        tracing::info!(source = ctx.source, context = %ctx, "{}", message);
    }

    fn warn(&self, message: &str, ctx: &LogContext) {
        tracing::warn!(source = ctx.source, context = %ctx, "{}", message);
    }

    fn error(&self, message: &str, error: &dyn std::error::Error, ctx: &LogContext) {
        tracing::error!(source = ctx.source, context = %ctx, error = %error, "{}", message);
    }
}

/// Severity of a recorded entry
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

/// One captured log call
#[derive(Clone, Debug, PartialEq)]
pub struct LogRecord {
    pub level: LogLevel,
    pub message: String,
    /// Rendered error for `error` calls
    pub error: Option<String>,
    pub context: LogContext,
}

/// Sink that stores every call, for tests and debug tooling
#[derive(Debug, Default)]
pub struct RecordingSink {
    records: RefCell<Vec<LogRecord>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all entries recorded so far
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.borrow().clone()
    }

    /// Entries at a given level
    pub fn at_level(&self, level: LogLevel) -> Vec<LogRecord> {
        self.records
            .borrow()
            .iter()
            .filter(|r| r.level == level)
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.records.borrow_mut().clear();
    }

    fn push(&self, level: LogLevel, message: &str, error: Option<String>, ctx: &LogContext) {
        self.records.borrow_mut().push(LogRecord {
            level,
            message: message.to_string(),
            error,
            context: ctx.clone(),
        });
    }
}

impl LogSink for RecordingSink {
    fn info(&self, message: &str, ctx: &LogContext) {
        self.push(LogLevel::Info, message, None, ctx);
    }

    fn warn(&self, message: &str, ctx: &LogContext) {
        self.push(LogLevel::Warn, message, None, ctx);
    }

    fn error(&self, message: &str, error: &dyn std::error::Error, ctx: &LogContext) {
        self.push(LogLevel::Error, message, Some(error.to_string()), ctx);
    }
}

// =============================================================================
// SUBSCRIBER INIT
// =============================================================================

static INIT: Once = Once::new();

/// Install a `tracing-subscriber` fmt subscriber
///
/// `filter` follows `EnvFilter` syntax (e.g. `"lode_image=debug,info"`). When
/// absent, `RUST_LOG` is used, then `info`. Idempotent: only the first call
/// has an effect, and an already-installed global subscriber is left alone.
pub fn init_tracing(filter: Option<&str>) {
    INIT.call_once(|| {
        let filter = match filter {
            Some(directives) => EnvFilter::new(directives),
            None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init();

        tracing::debug!("tracing initialized");
    });
}
