//! Saved garden layout document.

use garden_planner_core::{LayoutId, UserId};
use serde::{Deserialize, Serialize};

use super::{Entity, ValidationError, ensure_present};

/// A named arrangement of plant placements belonging to one user.
///
/// `grid` is stored as the client sent it; only its being an array is checked
/// (by the request type).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    pub user_id: UserId,
    /// Owner's username at save time (denormalized).
    pub username: String,
    pub layout_name: String,
    pub grid: Vec<serde_json::Value>,
}

impl Entity for Layout {
    const COLLECTION: &'static str = "Layout";
    type Id = LayoutId;

    fn validate(&self) -> Result<(), ValidationError> {
        ensure_present(&self.username, "username")?;
        ensure_present(&self.layout_name, "layoutName")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_camel_case_fields() {
        let user_id = UserId::generate();
        let layout = Layout {
            user_id,
            username: "alice".into(),
            layout_name: "Spring beds".into(),
            grid: vec![json!({"row": 0, "col": 1, "plantId": "12"})],
        };
        let value = serde_json::to_value(&layout).unwrap();
        assert_eq!(value["userId"], json!(user_id.to_string()));
        assert_eq!(value["layoutName"], "Spring beds");
        assert_eq!(value["grid"][0]["plantId"], "12");
    }

    #[test]
    fn test_empty_grid_is_valid() {
        let layout = Layout {
            user_id: UserId::generate(),
            username: "alice".into(),
            layout_name: "Empty".into(),
            grid: Vec::new(),
        };
        assert!(layout.validate().is_ok());
    }

    #[test]
    fn test_missing_name_is_invalid() {
        let layout = Layout {
            user_id: UserId::generate(),
            username: "alice".into(),
            layout_name: String::new(),
            grid: Vec::new(),
        };
        assert_eq!(
            layout.validate(),
            Err(ValidationError::Required {
                field: "layoutName"
            })
        );
    }
}
