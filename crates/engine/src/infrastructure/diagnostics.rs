//! Diagnostics sink adapters.
//!
//! Every adapter implements [`DiagnosticsSink`] through a shared reference so a
//! single sink can be handed to many parses running at once.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use bestiary_domain::ItemKind;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::infrastructure::clock::SystemClock;
use crate::infrastructure::ports::{ClockPort, DiagnosticsSink};

/// One recorded diagnostic.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub recorded_at: DateTime<Utc>,
    pub kind: String,
    pub item_id: String,
    pub item_name: String,
    pub reason: String,
}

impl Diagnostic {
    pub fn new(kind: &ItemKind, fragment: &Value, reason: &str, recorded_at: DateTime<Utc>) -> Self {
        Self {
            recorded_at,
            kind: kind.to_string(),
            item_id: fragment_field(fragment, "_id"),
            item_name: fragment_field(fragment, "name"),
            reason: reason.to_string(),
        }
    }
}

fn fragment_field(fragment: &Value, key: &str) -> String {
    fragment
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

// =============================================================================
// In-memory
// =============================================================================

/// Keeps every diagnostic in memory; used for counting and in tests.
pub struct MemoryDiagnostics {
    entries: Mutex<Vec<Diagnostic>>,
    clock: Arc<dyn ClockPort>,
}

impl Default for MemoryDiagnostics {
    fn default() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }
}

impl MemoryDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clock(clock: Arc<dyn ClockPort>) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            clock,
        }
    }

    pub fn entries(&self) -> Vec<Diagnostic> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Diagnostic>> {
        // A poisoned lock still holds a consistent Vec
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl DiagnosticsSink for MemoryDiagnostics {
    fn record(&self, kind: &ItemKind, fragment: &Value, reason: &str) {
        let diagnostic = Diagnostic::new(kind, fragment, reason, self.clock.now());
        self.lock().push(diagnostic);
    }
}

// =============================================================================
// Tracing
// =============================================================================

/// Mirrors diagnostics to the log at warn level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl DiagnosticsSink for TracingDiagnostics {
    fn record(&self, kind: &ItemKind, fragment: &Value, reason: &str) {
        tracing::warn!(
            kind = %kind,
            item_id = %fragment_field(fragment, "_id"),
            item_name = %fragment_field(fragment, "name"),
            reason,
            "Item diagnostic"
        );
    }
}

// =============================================================================
// JSON lines file
// =============================================================================

/// Overflow log: appends one JSON object per diagnostic to a file.
pub struct JsonLinesDiagnostics {
    path: PathBuf,
    file: Mutex<File>,
    clock: Arc<dyn ClockPort>,
}

impl JsonLinesDiagnostics {
    /// Open (or create) the log for appending.
    pub fn open(path: impl Into<PathBuf>) -> std::io::Result<Self> {
        Self::with_clock(path, Arc::new(SystemClock))
    }

    pub fn with_clock(path: impl Into<PathBuf>, clock: Arc<dyn ClockPort>) -> std::io::Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            file: Mutex::new(file),
            clock,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, diagnostic: &Diagnostic) -> std::io::Result<()> {
        let mut line = serde_json::to_string(diagnostic)?;
        line.push('\n');
        let mut file = self.file.lock().unwrap_or_else(|e| e.into_inner());
        file.write_all(line.as_bytes())?;
        file.flush()
    }
}

impl DiagnosticsSink for JsonLinesDiagnostics {
    fn record(&self, kind: &ItemKind, fragment: &Value, reason: &str) {
        let diagnostic = Diagnostic::new(kind, fragment, reason, self.clock.now());
        if let Err(e) = self.append(&diagnostic) {
            tracing::error!(
                path = %self.path.display(),
                error = %e,
                "Failed to append to overflow log"
            );
        }
    }
}

// =============================================================================
// Fan-out
// =============================================================================

/// Forwards each diagnostic to every inner sink, in order.
#[derive(Default, Clone)]
pub struct FanoutDiagnostics {
    sinks: Vec<Arc<dyn DiagnosticsSink>>,
}

impl FanoutDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: Arc<dyn DiagnosticsSink>) -> Self {
        self.sinks.push(sink);
        self
    }
}

impl DiagnosticsSink for FanoutDiagnostics {
    fn record(&self, kind: &ItemKind, fragment: &Value, reason: &str) {
        for sink in &self.sinks {
            sink.record(kind, fragment, reason);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::ports::MockDiagnosticsSink;
    use serde_json::json;

    #[test]
    fn memory_sink_keeps_item_identity() {
        let sink = MemoryDiagnostics::with_clock(Arc::new(FixedClock::at("2024-05-01T12:00:00Z")));
        sink.record(
            &ItemKind::Condition,
            &json!({"_id": "c1", "name": "Frightened", "type": "condition"}),
            "conditions are not part of the stat block",
        );

        let entries = sink.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, "condition");
        assert_eq!(entries[0].item_id, "c1");
        assert_eq!(entries[0].item_name, "Frightened");
        assert_eq!(entries[0].recorded_at.to_rfc3339(), "2024-05-01T12:00:00+00:00");
        assert!(!sink.is_empty());
    }

    #[test]
    fn json_lines_sink_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("overflow.jsonl");
        let clock = Arc::new(FixedClock::at("2024-05-01T12:00:00Z"));

        let sink = JsonLinesDiagnostics::with_clock(&path, clock.clone()).unwrap();
        sink.record(&ItemKind::Action, &json!({"_id": "a1", "name": "Odd"}), "first");
        drop(sink);

        // Reopening must not truncate
        let sink = JsonLinesDiagnostics::with_clock(&path, clock).unwrap();
        sink.record(&ItemKind::Unknown("mystery".into()), &json!({}), "second");

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["itemId"], "a1");
        assert_eq!(lines[0]["reason"], "first");
        assert_eq!(lines[0]["recordedAt"], "2024-05-01T12:00:00Z");
        assert_eq!(lines[1]["kind"], "mystery");
    }

    #[test]
    fn fanout_forwards_to_every_sink() {
        let mut first = MockDiagnosticsSink::new();
        first
            .expect_record()
            .withf(|kind, _, reason| *kind == ItemKind::Spell && reason == "unresolved")
            .times(1)
            .return_const(());
        let second = Arc::new(MemoryDiagnostics::new());

        let fanout = FanoutDiagnostics::new()
            .with(Arc::new(first))
            .with(second.clone());
        fanout.record(&ItemKind::Spell, &json!({"_id": "s1"}), "unresolved");

        assert_eq!(second.len(), 1);
    }
}
