use api_types::membership::{Member, MemberInvite, MemberUpdate, Role};

use crate::{error::Result, http::ApiClient};

impl ApiClient {
    pub async fn members(&self, budget_id: &str) -> Result<Vec<Member>> {
        self.get_json(&format!("/api/budgets/{budget_id}/members"))
            .await
    }

    /// Invites an existing user by email.
    pub async fn invite_member(&self, budget_id: &str, email: &str, role: Role) -> Result<Member> {
        self.post_json(
            &format!("/api/budgets/{budget_id}/members"),
            &MemberInvite {
                email: email.to_string(),
                role,
            },
        )
        .await
    }

    pub async fn update_member(
        &self,
        budget_id: &str,
        member_id: &str,
        role: Role,
    ) -> Result<Member> {
        self.patch_json(
            &format!("/api/budgets/{budget_id}/members/{member_id}"),
            &MemberUpdate { role },
        )
        .await
    }

    pub async fn remove_member(&self, budget_id: &str, member_id: &str) -> Result<()> {
        self.delete_unit(&format!("/api/budgets/{budget_id}/members/{member_id}"))
            .await
    }
}
