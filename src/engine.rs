//! Extraction engine: resolves every registered field against a document
//!
//! Each field is an independent task over the shared, read-only document.
//! Tasks write their own label's slot exactly once; the snapshot is built
//! after all of them have joined, in registry order.
//!
//! The fan-out is cooperative: `scraper::Html` is not `Sync`, so the tasks are
//! futures polled by `join_all` on the caller's task rather than spawned onto
//! worker threads. Field extraction never awaits, so in practice each task
//! runs to completion in turn.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Local};
use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, warn};

use crate::document::Document;
use crate::registry::{FieldRegistry, FieldSpec};

/// Outcome of extracting one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionResult {
    pub label: String,
    /// Empty when `found` is false
    pub value: String,
    pub found: bool,
}

impl ExtractionResult {
    fn found(label: &str, value: String) -> Self {
        Self {
            label: label.to_string(),
            value,
            found: true,
        }
    }

    fn missing(label: &str) -> Self {
        Self {
            label: label.to_string(),
            value: String::new(),
            found: false,
        }
    }
}

/// Immutable, timestamped results of one extraction run.
#[derive(Debug, Clone)]
pub struct ReportSnapshot {
    captured_at: DateTime<Local>,
    results: Vec<ExtractionResult>,
}

impl ReportSnapshot {
    pub fn captured_at(&self) -> DateTime<Local> {
        self.captured_at
    }

    /// Results in registry order, one per registered field.
    pub fn results(&self) -> &[ExtractionResult] {
        &self.results
    }

    pub fn get(&self, label: &str) -> Option<&ExtractionResult> {
        self.results.iter().find(|r| r.label == label)
    }

    #[cfg(test)]
    pub(crate) fn at(captured_at: DateTime<Local>, results: Vec<ExtractionResult>) -> Self {
        Self {
            captured_at,
            results,
        }
    }
}

/// Extract every field of `registry` from `doc`.
///
/// Never fails: a field whose selector matches nothing, or whose transform
/// rejects the value, is reported as not found with an empty value.
pub async fn extract(doc: &Document, registry: &FieldRegistry) -> ReportSnapshot {
    let specs = registry.all();
    let slots: Mutex<HashMap<&str, ExtractionResult>> =
        Mutex::new(HashMap::with_capacity(specs.len()));

    let tasks = specs.iter().map(|spec| {
        let slots = &slots;
        async move {
            let result = extract_field(doc, spec);
            slots
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(spec.label(), result);
        }
    });
    join_all(tasks).await;

    let captured_at = Local::now();
    let mut slots = slots.into_inner().unwrap_or_else(PoisonError::into_inner);
    let results = specs
        .iter()
        .map(|spec| {
            slots
                .remove(spec.label())
                .unwrap_or_else(|| ExtractionResult::missing(spec.label()))
        })
        .collect();

    ReportSnapshot {
        captured_at,
        results,
    }
}

fn extract_field(doc: &Document, spec: &FieldSpec) -> ExtractionResult {
    let Some(raw) = spec.query().first_value(doc) else {
        warn!(label = spec.label(), selector = spec.selector(), "no node matched");
        return ExtractionResult::missing(spec.label());
    };

    let Some(transform) = spec.transform() else {
        debug!(label = spec.label(), value = %raw, "field extracted");
        return ExtractionResult::found(spec.label(), raw);
    };

    match transform.apply(&raw) {
        Ok(value) => {
            debug!(
                label = spec.label(),
                value = %value,
                transform = transform.name(),
                "field extracted"
            );
            ExtractionResult::found(spec.label(), value)
        }
        Err(e) => {
            warn!(label = spec.label(), raw = %raw, error = %e, "transform failed");
            ExtractionResult::missing(spec.label())
        }
    }
}
