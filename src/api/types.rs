use serde::Deserialize;

/// Containing folder of a drive item, decided once when the JSON is read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RawParentReference")]
pub enum ParentReference {
    WithPath(String),
    #[default]
    WithoutPath,
}

impl ParentReference {
    pub fn path(&self) -> Option<&str> {
        match self {
            ParentReference::WithPath(p) => Some(p),
            ParentReference::WithoutPath => None,
        }
    }
}

#[derive(Deserialize)]
struct RawParentReference {
    #[serde(default)]
    path: Option<serde_json::Value>,
}

impl From<RawParentReference> for ParentReference {
    fn from(raw: RawParentReference) -> Self {
        match raw.path {
            Some(serde_json::Value::String(p)) => ParentReference::WithPath(p),
            _ => ParentReference::WithoutPath,
        }
    }
}

/// One hit returned by `/api/search`.
///
/// `path` is empty until it is derived from the parent reference; an empty
/// path after ingestion means the item has to be looked up via `/api/item`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchResultItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub folder: Option<serde_json::Value>,
    #[serde(rename = "parentReference", default)]
    pub parent_reference: ParentReference,
    #[serde(default)]
    pub path: String,
}

impl SearchResultItem {
    pub fn is_folder(&self) -> bool {
        self.folder.is_some()
    }
}

/// A single file or folder returned by `/api/item`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DriveItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(rename = "lastModifiedDateTime", default)]
    pub last_modified: Option<String>,
    #[serde(default)]
    pub folder: Option<serde_json::Value>,
    #[serde(rename = "parentReference", default)]
    pub parent_reference: ParentReference,
}

/// Error payload sent by the index API alongside a non-2xx status.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub status: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<String>,
}
