use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

pub mod auth {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SignupRequest {
        pub email: String,
        pub password: String,
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoginRequest {
        pub email: String,
        pub password: String,
    }

    /// Returned by signup, login and Google sign-in.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct AuthResponse {
        pub token: String,
        pub user: user::UserProfile,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ForgotEmailRequest {
        pub email: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ForgotOtpRequest {
        pub email: String,
        pub otp: String,
    }

    /// The OTP exchange yields a short-lived reset token.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ForgotOtpResponse {
        pub token: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ResetPasswordRequest {
        pub token: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MessageResponse {
        pub message: String,
    }
}

pub mod user {
    use super::*;

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct UserProfile {
        pub id: String,
        pub email: String,
        pub name: String,
        pub role: membership::Role,
        pub avatar: Option<String>,
        pub bio: Option<String>,
        pub timezone: String,
        pub locale: String,
        pub created_at: NaiveDateTime,
        pub updated_at: NaiveDateTime,
    }

    /// Patch body; absent fields are left untouched by the server.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct UpdateProfileRequest {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub bio: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub timezone: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub locale: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UploadAvatarRequest {
        /// Base64-encoded image payload.
        pub avatar: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AvatarResponse {
        pub avatar_url: String,
        pub message: String,
    }
}

pub mod membership {
    use super::*;

    /// Role of a user in a budget.
    ///
    /// Capabilities are strictly ordered: `owner` ⊇ `manager` ⊇ `contributor`
    /// ⊇ `viewer`. Use [`Role::rank`] for ordering comparisons.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Role {
        Owner,
        Manager,
        Contributor,
        Viewer,
    }

    impl Role {
        /// Returns the canonical role string used on the wire.
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Owner => "owner",
                Self::Manager => "manager",
                Self::Contributor => "contributor",
                Self::Viewer => "viewer",
            }
        }

        /// Position in the capability ordering; higher ranks include every
        /// lower rank's capabilities.
        pub fn rank(self) -> u8 {
            match self {
                Self::Owner => 3,
                Self::Manager => 2,
                Self::Contributor => 1,
                Self::Viewer => 0,
            }
        }

        pub fn at_least(self, minimum: Role) -> bool {
            self.rank() >= minimum.rank()
        }
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct Member {
        pub budget_id: String,
        pub user_id: String,
        pub user_name: Option<String>,
        pub user_email: String,
        pub role: Role,
        pub avatar: Option<String>,
    }

    /// Request body for inviting a member by email.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct MemberInvite {
        pub email: String,
        pub role: Role,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MemberUpdate {
        pub role: Role,
    }
}

pub mod budget {
    use super::*;

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum BudgetType {
        #[default]
        Standard,
        Saving,
        Debt,
        Invest,
        Sharing,
    }

    impl BudgetType {
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Standard => "standard",
                Self::Saving => "saving",
                Self::Debt => "debt",
                Self::Invest => "invest",
                Self::Sharing => "sharing",
            }
        }
    }

    /// Budget as listed/detailed by the server, including the caller's role.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct BudgetSummary {
        pub id: String,
        pub name: String,
        pub currency_code: String,
        pub budget_type: BudgetType,
        pub owner_id: String,
        pub description: Option<String>,
        pub archived: bool,
        pub created_at: NaiveDateTime,
        pub updated_at: NaiveDateTime,
        pub user_role: membership::Role,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetNew {
        pub name: String,
        pub currency_code: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub budget_type: Option<BudgetType>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct BudgetUpdate {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub description: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub currency_code: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub budget_type: Option<BudgetType>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub archived: Option<bool>,
    }

    /// Running totals for one budget, in major units as served.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct BudgetBalance {
        pub income: f64,
        pub expense: f64,
        pub net: f64,
        pub currency_code: String,
    }
}

pub mod category {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum CategoryKind {
        Income,
        Expense,
    }

    impl CategoryKind {
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Income => "income",
                Self::Expense => "expense",
            }
        }
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct Category {
        pub id: String,
        pub name: String,
        pub kind: CategoryKind,
        /// Soft-exclude flag; hidden categories stay referenced by entries.
        pub is_hidden: bool,
        pub color: Option<String>,
        pub icon: Option<String>,
        pub created_at: NaiveDateTime,
        pub updated_at: NaiveDateTime,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub name: String,
        pub kind: CategoryKind,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub color: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub icon: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub is_hidden: Option<bool>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CategoryUpdate {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub color: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub icon: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub is_hidden: Option<bool>,
    }
}

pub mod entry {
    use super::*;
    use super::category::CategoryKind;

    /// An income/expense line as served, joined with recording member info.
    ///
    /// `amount_minor` is always a non-negative magnitude; `kind` carries the
    /// direction.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct Entry {
        pub id: String,
        pub budget_id: String,
        pub category_id: String,
        pub kind: CategoryKind,
        pub amount_minor: i64,
        pub currency_code: String,
        pub entry_date: NaiveDate,
        pub description: Option<String>,
        pub counterparty: Option<String>,
        pub created_by: String,
        pub created_at: NaiveDateTime,
        pub member_name: String,
        pub member_email: String,
        pub member_avatar: Option<String>,
        pub comment_count: Option<i32>,
        pub attachment_count: Option<i32>,
        pub category_name: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct EntryNew {
        pub kind: CategoryKind,
        pub amount_minor: i64,
        pub entry_date: NaiveDate,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub description: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub category_id: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct EntryUpdate {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub kind: Option<CategoryKind>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub amount_minor: Option<i64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub entry_date: Option<NaiveDate>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub description: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub category_id: Option<String>,
    }
}

pub mod summary {
    use super::*;

    /// One month of aggregated totals, minor units.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct MonthlySummary {
        pub month_start: NaiveDate,
        pub income_minor: i64,
        pub expense_minor: i64,
        pub net_minor: i64,
    }
}

pub mod comment {
    use super::*;

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct Comment {
        pub id: String,
        pub entry_id: String,
        pub user_id: String,
        pub user_name: String,
        pub user_email: String,
        pub user_avatar: Option<String>,
        pub comment_text: String,
        pub mentions: Vec<Mention>,
        pub attachments: Vec<Attachment>,
        pub created_at: NaiveDateTime,
        pub updated_at: NaiveDateTime,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct Mention {
        pub user_id: String,
        pub user_name: String,
        pub user_email: String,
        pub user_avatar: Option<String>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct Attachment {
        pub id: String,
        pub file_url: String,
        pub file_name: String,
        pub file_size: i64,
        pub mime_type: String,
        pub created_at: NaiveDateTime,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CommentNew {
        pub comment_text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub mention_user_ids: Option<Vec<String>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub attachment_ids: Option<Vec<String>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CommentUpdate {
        pub comment_text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub mention_user_ids: Option<Vec<String>>,
    }

    /// Upload body for an image attached before the comment is posted.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct AttachmentUpload {
        /// Base64-encoded file content.
        pub file_data: String,
        pub file_name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AttachmentUploaded {
        pub id: String,
        pub file_url: String,
        pub file_name: String,
        pub file_size: i64,
        pub mime_type: String,
    }
}

pub mod notification {
    use super::*;

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct Notification {
        pub id: String,
        pub budget_id: String,
        pub notification_type: String,
        pub title: String,
        pub message: String,
        pub link_url: Option<String>,
        pub related_id: Option<String>,
        pub is_read: bool,
        pub created_at: NaiveDateTime,
        pub read_at: Option<NaiveDateTime>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MarkRead {
        pub notification_ids: Vec<String>,
    }

    #[derive(Clone, Copy, Debug, Serialize, Deserialize)]
    pub struct UnreadCount {
        pub count: u64,
    }
}

pub mod transfer {
    use super::*;

    /// Request for an atomic cross-budget transfer. The server fans this out
    /// into a linked expense entry on the source budget and income entry on
    /// the destination budget.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransferNew {
        pub from_budget_id: String,
        pub to_budget_id: String,
        pub amount_minor: i64,
        pub currency_code: String,
        pub transfer_date: NaiveDate,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub note: Option<String>,
        pub from_category_id: String,
        pub to_category_id: String,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct Transfer {
        pub id: String,
        pub from_budget_id: String,
        pub to_budget_id: String,
        pub amount_minor: i64,
        pub currency_code: String,
        pub transfer_date: NaiveDate,
        pub note: Option<String>,
        pub created_by: String,
        pub created_at: NaiveDateTime,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct TransferReceipt {
        pub transfer: Transfer,
        pub from_entry_id: String,
        pub to_entry_id: String,
        pub from_budget_name: String,
        pub to_budget_name: String,
    }
}
