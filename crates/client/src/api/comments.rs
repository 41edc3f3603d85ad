use base64::{Engine as _, engine::general_purpose::STANDARD};

use api_types::comment::{
    AttachmentUpload, AttachmentUploaded, Comment, CommentNew, CommentUpdate,
};

use crate::{error::Result, http::ApiClient};

impl ApiClient {
    pub async fn comments(&self, budget_id: &str, entry_id: &str) -> Result<Vec<Comment>> {
        self.get_json(&format!(
            "/api/budgets/{budget_id}/entries/{entry_id}/comments"
        ))
        .await
    }

    pub async fn create_comment(
        &self,
        budget_id: &str,
        entry_id: &str,
        comment: &CommentNew,
    ) -> Result<Comment> {
        self.post_json(
            &format!("/api/budgets/{budget_id}/entries/{entry_id}/comments"),
            comment,
        )
        .await
    }

    /// Edits preserve comment identity; mentions are replaced wholesale.
    pub async fn update_comment(
        &self,
        budget_id: &str,
        entry_id: &str,
        comment_id: &str,
        update: &CommentUpdate,
    ) -> Result<Comment> {
        self.patch_json(
            &format!("/api/budgets/{budget_id}/entries/{entry_id}/comments/{comment_id}"),
            update,
        )
        .await
    }

    pub async fn delete_comment(
        &self,
        budget_id: &str,
        entry_id: &str,
        comment_id: &str,
    ) -> Result<()> {
        self.delete_unit(&format!(
            "/api/budgets/{budget_id}/entries/{entry_id}/comments/{comment_id}"
        ))
        .await
    }

    /// Uploads an image to attach to a comment; the payload travels
    /// base64-encoded.
    pub async fn upload_attachment(
        &self,
        budget_id: &str,
        entry_id: &str,
        file_name: &str,
        image: &[u8],
    ) -> Result<AttachmentUploaded> {
        self.post_json(
            &format!("/api/budgets/{budget_id}/entries/{entry_id}/attachments"),
            &AttachmentUpload {
                file_data: STANDARD.encode(image),
                file_name: file_name.to_string(),
            },
        )
        .await
    }

    pub async fn delete_attachment(
        &self,
        budget_id: &str,
        entry_id: &str,
        attachment_id: &str,
    ) -> Result<()> {
        self.delete_unit(&format!(
            "/api/budgets/{budget_id}/entries/{entry_id}/attachments/{attachment_id}"
        ))
        .await
    }
}
