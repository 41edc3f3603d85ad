use api_types::auth::{
    AuthResponse, ForgotEmailRequest, ForgotOtpRequest, ForgotOtpResponse, LoginRequest,
    MessageResponse, ResetPasswordRequest, SignupRequest,
};

use crate::{error::Result, http::ApiClient, session::Session};

impl ApiClient {
    /// Creates an account and signs the session context in.
    pub async fn signup(&self, email: &str, password: &str, name: &str) -> Result<AuthResponse> {
        let auth: AuthResponse = self
            .post_json(
                "/auth/signup",
                &SignupRequest {
                    email: email.to_string(),
                    password: password.to_string(),
                    name: name.to_string(),
                },
            )
            .await?;
        self.session().set(Session {
            token: auth.token.clone(),
            user: auth.user.clone(),
        });
        Ok(auth)
    }

    /// Exchanges credentials for a bearer token and signs the session
    /// context in.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse> {
        let auth: AuthResponse = self
            .post_json(
                "/auth/login",
                &LoginRequest {
                    email: email.to_string(),
                    password: password.to_string(),
                },
            )
            .await?;
        self.session().set(Session {
            token: auth.token.clone(),
            user: auth.user.clone(),
        });
        Ok(auth)
    }

    /// Local logout; the backend keeps no server-side session to revoke.
    pub fn logout(&self) {
        self.session().clear();
    }

    pub async fn forgot_email(&self, email: &str) -> Result<MessageResponse> {
        self.post_json(
            "/auth/forgot/email",
            &ForgotEmailRequest {
                email: email.to_string(),
            },
        )
        .await
    }

    pub async fn forgot_otp(&self, email: &str, otp: &str) -> Result<ForgotOtpResponse> {
        self.post_json(
            "/auth/forgot/otp",
            &ForgotOtpRequest {
                email: email.to_string(),
                otp: otp.to_string(),
            },
        )
        .await
    }

    pub async fn reset_password(&self, token: &str, password: &str) -> Result<MessageResponse> {
        self.post_json(
            "/auth/reset",
            &ResetPasswordRequest {
                token: token.to_string(),
                password: password.to_string(),
            },
        )
        .await
    }
}
