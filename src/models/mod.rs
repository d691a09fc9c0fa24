use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Folded value of one extracted field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Exactly one distinct value, or several joined by the field's joiner
    Scalar(String),
    /// Several distinct values and no joiner configured; encounter order, de-duplicated
    Many(Vec<String>),
}

impl FieldValue {
    /// All values regardless of multiplicity
    pub fn values(&self) -> &[String] {
        match self {
            FieldValue::Scalar(v) => std::slice::from_ref(v),
            FieldValue::Many(vs) => vs,
        }
    }

}

/// In-memory extraction result for one listing, built once and discarded after persistence
#[derive(Debug, Clone, Serialize)]
pub struct DraftRecord {
    /// Canonical listing URL, the natural dedup key; never part of `fields`
    pub page_url: String,
    pub fields: BTreeMap<&'static str, FieldValue>,
}

impl DraftRecord {
    pub fn new(page_url: impl Into<String>) -> Self {
        Self {
            page_url: page_url.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }
}

/// Summary of one pipeline run, written out as JSON at the end
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub urls_found: usize,
    pub skipped_existing: usize,
    pub persisted: usize,
    pub failed: usize,
}

impl RunReport {
    pub fn new(started_at: DateTime<Utc>, urls_found: usize) -> Self {
        Self {
            started_at,
            finished_at: started_at,
            urls_found,
            skipped_existing: 0,
            persisted: 0,
            failed: 0,
        }
    }
}
