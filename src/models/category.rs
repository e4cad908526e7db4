use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::null_as_default;

// ---------------------------------------------------------------------------
// Category - Product grouping label
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(default)]
    pub id: Uuid,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}
