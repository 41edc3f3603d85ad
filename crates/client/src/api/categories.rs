use api_types::{
    auth::MessageResponse,
    category::{Category, CategoryNew, CategoryUpdate},
};

use crate::{error::Result, http::ApiClient};

impl ApiClient {
    pub async fn categories(&self, budget_id: &str) -> Result<Vec<Category>> {
        self.get_json(&format!("/api/budgets/{budget_id}/categories"))
            .await
    }

    pub async fn create_category(&self, budget_id: &str, category: &CategoryNew) -> Result<Category> {
        self.post_json(&format!("/api/budgets/{budget_id}/categories"), category)
            .await
    }

    pub async fn update_category(
        &self,
        budget_id: &str,
        category_id: &str,
        update: &CategoryUpdate,
    ) -> Result<Category> {
        self.patch_json(
            &format!("/api/budgets/{budget_id}/categories/{category_id}"),
            update,
        )
        .await
    }

    pub async fn delete_category(
        &self,
        budget_id: &str,
        category_id: &str,
    ) -> Result<MessageResponse> {
        self.delete_json(&format!(
            "/api/budgets/{budget_id}/categories/{category_id}"
        ))
        .await
    }
}
