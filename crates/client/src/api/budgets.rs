use api_types::{
    auth::MessageResponse,
    budget::{BudgetBalance, BudgetNew, BudgetSummary, BudgetType, BudgetUpdate},
};

use crate::{error::Result, http::ApiClient};

impl ApiClient {
    /// Lists the caller's budgets, optionally narrowed by free-text search.
    pub async fn budgets(&self, search: Option<&str>) -> Result<Vec<BudgetSummary>> {
        match search {
            Some(query) if !query.is_empty() => {
                self.get_json_with("/api/budgets", &[("query", query.to_string())])
                    .await
            }
            _ => self.get_json("/api/budgets").await,
        }
    }

    pub async fn budget(&self, budget_id: &str) -> Result<BudgetSummary> {
        self.get_json(&format!("/api/budgets/{budget_id}")).await
    }

    pub async fn budget_balance(&self, budget_id: &str) -> Result<BudgetBalance> {
        self.get_json(&format!("/api/budgets/{budget_id}/balance"))
            .await
    }

    pub async fn create_budget(
        &self,
        name: &str,
        currency_code: &str,
        budget_type: Option<BudgetType>,
    ) -> Result<BudgetSummary> {
        self.post_json(
            "/api/budgets",
            &BudgetNew {
                name: name.to_string(),
                currency_code: currency_code.to_string(),
                budget_type,
            },
        )
        .await
    }

    pub async fn update_budget(
        &self,
        budget_id: &str,
        update: &BudgetUpdate,
    ) -> Result<BudgetSummary> {
        self.patch_json(&format!("/api/budgets/{budget_id}"), update)
            .await
    }

    /// Hard removal; the server cascades categories, entries, members and
    /// comments.
    pub async fn delete_budget(&self, budget_id: &str) -> Result<MessageResponse> {
        self.delete_json(&format!("/api/budgets/{budget_id}")).await
    }
}
