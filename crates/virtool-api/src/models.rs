// Wire types for the Virtool REST API
//
// Documents model the fields the client reads; everything else lands in a
// flattened `extra` map so a stored document is the server payload verbatim.
// List endpoints return summaries of the same shape with fewer fields
// populated, which is why nested collections default to empty.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ── Pagination ───────────────────────────────────────────────────────

/// Envelope returned by every find/list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub documents: Vec<T>,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub page_count: u32,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub found_count: u64,
    #[serde(default)]
    pub total_count: u64,
}

/// `{ id, name }` pointer embedded in many documents (user, reference, sample).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceRef {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── References ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organism: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<ResourceRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub otu_count: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── OTUs ─────────────────────────────────────────────────────────────

/// An OTU (virus) with its isolates.
///
/// Summaries from the find endpoint carry no isolates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Otu {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub abbreviation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<ResourceRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub isolates: Vec<Isolate>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Otu {
    /// The isolate flagged as default, if any.
    pub fn default_isolate(&self) -> Option<&Isolate> {
        self.isolates.iter().find(|i| i.default)
    }

    /// Whether exactly one isolate is flagged default (vacuously true when
    /// the document carries no isolates, as list summaries do).
    pub fn has_single_default(&self) -> bool {
        self.isolates.is_empty() || self.isolates.iter().filter(|i| i.default).count() == 1
    }

    pub fn isolate(&self, isolate_id: &str) -> Option<&Isolate> {
        self.isolates.iter().find(|i| i.id == isolate_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Isolate {
    pub id: String,
    #[serde(default)]
    pub source_type: String,
    #[serde(default)]
    pub source_name: String,
    #[serde(default)]
    pub default: bool,
    #[serde(default)]
    pub sequences: Vec<Sequence>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Isolate {
    /// Human-readable name, e.g. `Isolate 8816-v2` or `Unnamed Isolate`.
    pub fn display_name(&self) -> String {
        let source_type = self.source_type.trim();
        let source_name = self.source_name.trim();

        if source_type.is_empty() || source_type == "unknown" {
            return "Unnamed Isolate".into();
        }

        let mut chars = source_type.chars();
        let capitalized: String = chars
            .next()
            .map(|c| c.to_uppercase().chain(chars).collect())
            .unwrap_or_default();

        if source_name.is_empty() {
            capitalized
        } else {
            format!("{capitalized} {source_name}")
        }
    }
}

/// A sequence record. `id` is the GenBank accession.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sequence {
    pub id: String,
    #[serde(default)]
    pub definition: String,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub sequence: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Entry from `GET /api/refs/{ref}/otus?names=true`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OtuName {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One change in an OTU's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryChange {
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub method_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub otu: Option<ResourceRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<ResourceRef>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Result of a GenBank accession lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenbankRecord {
    pub accession: String,
    #[serde(default)]
    pub definition: String,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub sequence: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── Groups ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    #[serde(default)]
    pub permissions: BTreeMap<String, bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── Samples & analyses ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub isolate: String,
    #[serde(default)]
    pub locale: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ready: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<ResourceRef>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub id: String,
    #[serde(default)]
    pub algorithm: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ready: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample: Option<ResourceRef>,
    #[serde(
        default,
        rename = "ref",
        alias = "reference",
        skip_serializing_if = "Option::is_none"
    )]
    pub reference: Option<ResourceRef>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── Jobs ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    #[serde(default)]
    pub task: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<ResourceRef>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response of `DELETE /api/jobs?filter=...`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClearedJobs {
    #[serde(default)]
    pub removed: Vec<String>,
}

// ── HMMs ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hmm {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster: Option<u64>,
    #[serde(default)]
    pub names: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `GET /api/hmms` returns the page plus the install status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HmmPage {
    #[serde(flatten)]
    pub page: Page<Hmm>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<HmmStatus>,
}

/// Ordered steps of an HMM install process.
pub const HMM_INSTALL_STEPS: [&str; 5] = [
    "check_github",
    "download",
    "decompress",
    "install_profiles",
    "import_annotations",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HmmStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installed: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process: Option<HmmProcess>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release: Option<HmmRelease>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HmmStatus {
    pub fn is_installed(&self) -> bool {
        matches!(&self.installed, Some(v) if !v.is_null() && *v != Value::Bool(false))
    }

    /// Overall install progress in percent. Each step is worth 20%.
    ///
    /// Returns `None` when no process is running or the process failed.
    pub fn install_percent(&self) -> Option<f64> {
        let process = self.process.as_ref()?;
        if process.error.is_some() {
            return None;
        }
        let index = HMM_INSTALL_STEPS
            .iter()
            .position(|s| *s == process.step)?;
        #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
        let index = index as f64;
        Some(20.0 * (index + process.progress))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HmmProcess {
    #[serde(default)]
    pub step: String,
    #[serde(default)]
    pub progress: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HmmRelease {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── Settings ─────────────────────────────────────────────────────────

/// Server settings: an open key/value document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(flatten)]
    pub values: Map<String, Value>,
}

impl Settings {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }
}

// ── Request bodies ───────────────────────────────────────────────────

/// Body of `POST /api/refs`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceCreate {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_data_type")]
    pub data_type: String,
    #[serde(default)]
    pub organism: String,
}

fn default_data_type() -> String {
    "genome".into()
}

/// Body of `POST /api/refs/{ref}/otus`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OtuCreate {
    pub name: String,
    #[serde(default)]
    pub abbreviation: String,
}

/// Partial body of `PATCH /api/otus/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OtuUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abbreviation: Option<String>,
    /// Segment schema; replaces the stored one wholesale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Vec<Value>>,
}

/// Isolate fields for both add and edit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IsolateFields {
    pub source_type: String,
    pub source_name: String,
}

/// Sequence fields. `accession` is sent as `id` on add and omitted on edit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SequenceFields {
    pub accession: String,
    #[serde(default)]
    pub definition: String,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub sequence: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment: Option<String>,
}

/// Body of `POST /api/samples`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleCreate {
    pub name: String,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub isolate: String,
    #[serde(default)]
    pub locale: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtraction: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,
}

/// Partial body of `PATCH /api/samples/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isolate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn isolate(source_type: &str, source_name: &str) -> Isolate {
        serde_json::from_value(json!({
            "id": "iso1",
            "source_type": source_type,
            "source_name": source_name,
        }))
        .unwrap()
    }

    #[test]
    fn isolate_display_name() {
        assert_eq!(isolate("isolate", "8816-v2").display_name(), "Isolate 8816-v2");
        assert_eq!(isolate("unknown", "").display_name(), "Unnamed Isolate");
        assert_eq!(isolate("clone", "").display_name(), "Clone");
    }

    #[test]
    fn otu_keeps_unknown_fields() {
        let raw = json!({
            "id": "008lgo",
            "name": "Iresine viroid",
            "abbreviation": "IrVd",
            "last_indexed_version": 0,
            "isolates": [
                { "id": "6kplarn7", "source_type": "unknown", "source_name": "", "default": true }
            ]
        });
        let otu: Otu = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(otu.extra.get("last_indexed_version"), Some(&json!(0)));
        assert!(otu.has_single_default());
        assert_eq!(otu.default_isolate().unwrap().id, "6kplarn7");
    }

    #[test]
    fn hmm_install_percent() {
        let status: HmmStatus = serde_json::from_value(json!({
            "installed": null,
            "process": { "step": "decompress", "progress": 0.5 }
        }))
        .unwrap();
        assert!(!status.is_installed());
        assert_eq!(status.install_percent(), Some(50.0));

        let failed: HmmStatus = serde_json::from_value(json!({
            "process": { "step": "download", "progress": 0.1, "error": "boom" }
        }))
        .unwrap();
        assert_eq!(failed.install_percent(), None);
    }
}
