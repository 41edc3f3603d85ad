use base64::{Engine as _, engine::general_purpose::STANDARD};

use api_types::user::{AvatarResponse, UpdateProfileRequest, UploadAvatarRequest, UserProfile};

use crate::{error::Result, http::ApiClient};

impl ApiClient {
    pub async fn profile(&self) -> Result<UserProfile> {
        self.get_json("/api/profile").await
    }

    pub async fn update_profile(&self, update: &UpdateProfileRequest) -> Result<UserProfile> {
        self.patch_json("/api/profile", update).await
    }

    /// Uploads a new avatar image; the payload travels base64-encoded.
    pub async fn upload_avatar(&self, image: &[u8]) -> Result<AvatarResponse> {
        self.post_json(
            "/api/profile/avatar",
            &UploadAvatarRequest {
                avatar: STANDARD.encode(image),
            },
        )
        .await
    }

    pub async fn delete_avatar(&self) -> Result<AvatarResponse> {
        self.delete_json("/api/profile/avatar").await
    }
}
