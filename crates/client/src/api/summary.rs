use chrono::NaiveDate;

use api_types::summary::MonthlySummary;

use crate::{error::Result, http::ApiClient};

impl ApiClient {
    /// Ordered month-by-month totals; omitted bounds fall back to the
    /// server's defaults.
    pub async fn monthly_summary(
        &self,
        budget_id: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<MonthlySummary>> {
        let mut query = Vec::new();
        if let Some(from) = from {
            query.push(("from", from.to_string()));
        }
        if let Some(to) = to {
            query.push(("to", to.to_string()));
        }
        self.get_json_with(&format!("/api/budgets/{budget_id}/summary/monthly"), &query)
            .await
    }
}
