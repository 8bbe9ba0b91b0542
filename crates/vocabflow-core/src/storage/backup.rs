//! Library backup bundle for export/import.
//!
//! A bundle wraps every list with a format version. Import also accepts a
//! bare JSON array of lists, the format written by earlier releases.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, ValidationError};
use crate::model::WordList;

/// Current backup format version. Imports must match the major component.
pub const BACKUP_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryBundle {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub lists: Vec<WordList>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BundleRepr {
    Bundle(LibraryBundle),
    Bare(Vec<WordList>),
}

impl LibraryBundle {
    pub fn new(lists: Vec<WordList>) -> Self {
        Self {
            version: BACKUP_VERSION.to_string(),
            exported_at: Utc::now(),
            lists,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and validate a backup.
    ///
    /// # Errors
    /// Malformed JSON, an incompatible major version, or an empty library.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut bundle = match serde_json::from_str::<BundleRepr>(json)? {
            BundleRepr::Bundle(bundle) => bundle,
            BundleRepr::Bare(lists) => LibraryBundle::new(lists),
        };

        if major(&bundle.version) != major(BACKUP_VERSION) {
            return Err(ValidationError::UnsupportedVersion {
                found: bundle.version,
                expected: BACKUP_VERSION.to_string(),
            }
            .into());
        }
        if bundle.lists.is_empty() {
            return Err(ValidationError::EmptyCollection("lists".into()).into());
        }
        for list in &mut bundle.lists {
            let dropped = list.normalize();
            if dropped > 0 {
                warn!(list_id = %list.id, dropped, "dropped dangling queue ids on import");
            }
        }
        Ok(bundle)
    }
}

fn major(version: &str) -> &str {
    version.split('.').next().unwrap_or(version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    #[test]
    fn export_import_roundtrip() {
        let mut list = WordList::starter();
        list.enqueue("w1");
        let bundle = LibraryBundle::new(vec![list]);
        let json = bundle.to_json().unwrap();
        let imported = LibraryBundle::from_json(&json).unwrap();
        assert_eq!(imported.lists, bundle.lists);
    }

    #[test]
    fn accepts_legacy_bare_array() {
        let json = r#"[{
            "id": "list-1",
            "name": "CET-4 Core",
            "description": "",
            "consolidationQueueIds": ["w1", "missing"],
            "words": [{
                "id": "w1", "english": "abandon", "phonetic": "", "chinese": "v. 放弃",
                "masteredDates": [], "incorrectCount": 1
            }]
        }]"#;
        let bundle = LibraryBundle::from_json(json).unwrap();
        let list = &bundle.lists[0];
        assert!(list.is_queued("w1"));
        assert!(!list.is_queued("missing"));
        assert_eq!(list.words[0].incorrect_count, 1);
    }

    #[test]
    fn rejects_empty_library() {
        assert!(matches!(
            LibraryBundle::from_json("[]"),
            Err(CoreError::Validation(ValidationError::EmptyCollection(_)))
        ));
    }

    #[test]
    fn rejects_future_major_version() {
        let mut bundle = LibraryBundle::new(vec![WordList::starter()]);
        bundle.version = "2.0.0".into();
        let json = serde_json::to_string(&bundle).unwrap();
        assert!(matches!(
            LibraryBundle::from_json(&json),
            Err(CoreError::Validation(ValidationError::UnsupportedVersion { .. }))
        ));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            LibraryBundle::from_json(r#"{"hello": 1}"#),
            Err(CoreError::Json(_))
        ));
    }
}
