use api_types::{
    auth::MessageResponse,
    entry::{Entry, EntryNew, EntryUpdate},
};

use crate::{error::Result, filter::EntryFilter, http::ApiClient};

impl ApiClient {
    /// Paginated, filtered entry listing; the filter state maps 1:1 onto
    /// query parameters.
    pub async fn entries(&self, budget_id: &str, filter: &EntryFilter) -> Result<Vec<Entry>> {
        self.get_json_with(&format!("/api/budgets/{budget_id}/entries"), &filter.query())
            .await
    }

    pub async fn create_entry(&self, budget_id: &str, entry: &EntryNew) -> Result<Entry> {
        self.post_json(&format!("/api/budgets/{budget_id}/entries"), entry)
            .await
    }

    pub async fn update_entry(
        &self,
        budget_id: &str,
        entry_id: &str,
        update: &EntryUpdate,
    ) -> Result<Entry> {
        self.patch_json(
            &format!("/api/budgets/{budget_id}/entries/{entry_id}"),
            update,
        )
        .await
    }

    pub async fn delete_entry(&self, budget_id: &str, entry_id: &str) -> Result<MessageResponse> {
        self.delete_json(&format!("/api/budgets/{budget_id}/entries/{entry_id}"))
            .await
    }
}
