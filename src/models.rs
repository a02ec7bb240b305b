// Data shapes returned by the results box.
// Only the fields the client relies on are typed; result records are kept
// as raw JSON so nothing the box sends is lost when printing.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;

/// Identifier of one imaging series (DICOM SeriesInstanceUID).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeriesInstanceUid(String);

impl SeriesInstanceUid {
    pub fn new(uid: impl Into<String>) -> Self {
        Self(uid.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SeriesInstanceUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Distinct series of a patient. `None` stands for a series entry the box
/// returned without a `SeriesInstanceUID`; it is kept, not dropped.
pub type SeriesSet = BTreeSet<Option<SeriesInstanceUid>>;

/// Envelope shared by the list endpoints: `{ "results": [...] }`.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub results: Vec<T>,
}

/// One entry of `GET /series`.
#[derive(Debug, Clone, Deserialize)]
pub struct SeriesEntry {
    #[serde(rename = "SeriesInstanceUID", default)]
    pub series_instance_uid: Option<SeriesInstanceUid>,
}

/// One entry of `GET /results`, exactly as the box sent it.
///
/// Typical records look like `{"name": "Texture Overlay", "value": "xxxx.png", ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultRecord(Value);

impl ResultRecord {
    pub fn new(raw: Value) -> Self {
        Self(raw)
    }

    /// The artifact label, e.g. `"CAD4TB 7"`.
    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }

    /// The payload, usually a file reference.
    pub fn value(&self) -> Option<&Value> {
        self.0.get("value")
    }

    pub fn raw(&self) -> &Value {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_series_entry_missing_uid_is_none() {
        let page: Page<SeriesEntry> = serde_json::from_value(json!({
            "results": [
                {"SeriesInstanceUID": "1.2.3", "Modality": "CR"},
                {"Modality": "CR"},
                {"SeriesInstanceUID": null}
            ]
        }))
        .unwrap();
        let uids: Vec<_> = page
            .results
            .into_iter()
            .map(|e| e.series_instance_uid)
            .collect();
        assert_eq!(uids, vec![Some(SeriesInstanceUid::new("1.2.3")), None, None]);
    }

    #[test]
    fn test_page_without_results_is_rejected() {
        let page = serde_json::from_value::<Page<SeriesEntry>>(json!({"detail": "nope"}));
        assert!(page.is_err());
    }

    #[test]
    fn test_result_record_is_kept_verbatim() {
        let raw = json!({"name": "CAD4TB 7", "value": "x.png", "id": 17, "extra": [1, 2]});
        let record: ResultRecord = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(record.name(), Some("CAD4TB 7"));
        assert_eq!(record.value(), Some(&json!("x.png")));
        assert_eq!(serde_json::to_value(&record).unwrap(), raw);
    }

    #[test]
    fn test_result_record_without_fields() {
        let record = ResultRecord::new(json!("not an object"));
        assert_eq!(record.name(), None);
        assert_eq!(record.value(), None);
    }
}
