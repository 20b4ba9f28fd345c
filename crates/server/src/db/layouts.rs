//! `Layout` collection queries.

use super::{Collection, Filter, StoreError, Stored};
use crate::models::Layout;

impl Collection<Layout> {
    /// Every layout, in creation order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the query fails.
    pub async fn find_all(&self) -> Result<Vec<Stored<Layout>>, StoreError> {
        self.find(&Filter::all()).await
    }

    /// Layouts saved by `username`, in creation order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the query fails.
    pub async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Vec<Stored<Layout>>, StoreError> {
        self.find(&Filter::all().eq("username", username)).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use garden_planner_core::UserId;
    use serde_json::json;

    use crate::db::Database;
    use crate::models::Layout;

    fn layout(username: &str, name: &str) -> Layout {
        Layout {
            user_id: UserId::generate(),
            username: username.to_owned(),
            layout_name: name.to_owned(),
            grid: vec![json!({"x": 0, "y": 0, "plant": "basil"})],
        }
    }

    #[tokio::test]
    async fn test_find_by_username() {
        let db = Database::in_memory();
        let layouts = db.layouts();
        layouts.insert(layout("alice", "Herbs")).await.unwrap();
        layouts.insert(layout("bob", "Roses")).await.unwrap();
        layouts.insert(layout("alice", "Veg")).await.unwrap();

        let names: Vec<String> = layouts
            .find_by_username("alice")
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.entity.layout_name)
            .collect();
        assert_eq!(names, ["Herbs", "Veg"]);
        assert_eq!(layouts.find_all().await.unwrap().len(), 3);
        assert!(layouts.find_by_username("carol").await.unwrap().is_empty());
    }
}
