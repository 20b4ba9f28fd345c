//! `Comments` collection queries.

use super::{Collection, Filter, StoreError, Stored};
use crate::models::Comment;

impl Collection<Comment> {
    /// Comments on a layout. Either key may be omitted to match any value.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the query fails.
    pub async fn find_for_layout(
        &self,
        layout_owner: Option<&str>,
        layout_name: Option<&str>,
    ) -> Result<Vec<Stored<Comment>>, StoreError> {
        let filter = Filter::all()
            .eq_opt("layoutOwner", layout_owner)
            .eq_opt("layoutName", layout_name);
        self.find(&filter).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::db::Database;
    use crate::models::Comment;

    fn comment(owner: &str, name: &str, text: &str) -> Comment {
        Comment::new(owner.into(), name.into(), "carol".into(), text.into())
    }

    #[tokio::test]
    async fn test_find_for_layout() {
        let db = Database::in_memory();
        let comments = db.comments();
        comments.insert(comment("alice", "Herbs", "nice")).await.unwrap();
        comments.insert(comment("alice", "Veg", "ok")).await.unwrap();
        comments.insert(comment("bob", "Herbs", "wow")).await.unwrap();

        let texts = |found: Vec<crate::db::Stored<Comment>>| -> Vec<String> {
            found.into_iter().map(|c| c.entity.comment_text).collect()
        };

        let both = comments
            .find_for_layout(Some("alice"), Some("Herbs"))
            .await
            .unwrap();
        assert_eq!(texts(both), ["nice"]);

        let by_owner = comments.find_for_layout(Some("alice"), None).await.unwrap();
        assert_eq!(texts(by_owner), ["nice", "ok"]);

        let unfiltered = comments.find_for_layout(None, None).await.unwrap();
        assert_eq!(unfiltered.len(), 3);
    }
}
