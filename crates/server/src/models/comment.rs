//! Comment document.

use chrono::{DateTime, Utc};
use garden_planner_core::CommentId;
use serde::{Deserialize, Serialize};

use super::{Entity, ValidationError, ensure_present};

/// A comment left on someone's layout.
///
/// The layout is referenced by `(layout_owner, layout_name)`; nothing checks
/// that it exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub layout_owner: String,
    pub layout_name: String,
    /// Commenter's username.
    pub username: String,
    pub comment_text: String,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl Comment {
    /// Create a comment stamped with the current time.
    #[must_use]
    pub fn new(
        layout_owner: String,
        layout_name: String,
        username: String,
        comment_text: String,
    ) -> Self {
        Self {
            layout_owner,
            layout_name,
            username,
            comment_text,
            timestamp: Utc::now(),
        }
    }
}

impl Entity for Comment {
    const COLLECTION: &'static str = "Comments";
    type Id = CommentId;

    fn validate(&self) -> Result<(), ValidationError> {
        ensure_present(&self.layout_owner, "layoutOwner")?;
        ensure_present(&self.layout_name, "layoutName")?;
        ensure_present(&self.username, "username")?;
        ensure_present(&self.comment_text, "commentText")
    }
}
