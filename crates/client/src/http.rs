use reqwest::{Response, StatusCode, Url};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{
    error::{ClientError, Result},
    session::SessionContext,
};

/// Error body shape used by the backend; some endpoints say `error`, the
/// auth ones say `message`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// HTTP client for the Philand REST API.
///
/// Carries the injected [`SessionContext`]; every request picks up the
/// current bearer token, and any 401/403 response tears the session down
/// before the error reaches the caller.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    session: SessionContext,
}

impl ApiClient {
    pub fn new(base_url: &str, session: SessionContext) -> Result<Self> {
        let base_url =
            Url::parse(base_url).map_err(|err| ClientError::BaseUrl(err.to_string()))?;
        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            session,
        })
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|err| ClientError::BaseUrl(err.to_string()))
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.session.token() {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.get_json_with(path, &[]).await
    }

    pub(crate) async fn get_json_with<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let mut req = self.authorize(self.http.get(self.endpoint(path)?));
        if !query.is_empty() {
            req = req.query(query);
        }
        let res = req.send().await.map_err(ClientError::Transport)?;
        self.decode(path, res).await
    }

    pub(crate) async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let req = self.authorize(self.http.post(self.endpoint(path)?)).json(body);
        let res = req.send().await.map_err(ClientError::Transport)?;
        self.decode(path, res).await
    }

    pub(crate) async fn patch_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let req = self.authorize(self.http.patch(self.endpoint(path)?)).json(body);
        let res = req.send().await.map_err(ClientError::Transport)?;
        self.decode(path, res).await
    }

    pub(crate) async fn delete_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let req = self.authorize(self.http.delete(self.endpoint(path)?));
        let res = req.send().await.map_err(ClientError::Transport)?;
        self.decode(path, res).await
    }

    pub(crate) async fn delete_unit(&self, path: &str) -> Result<()> {
        let req = self.authorize(self.http.delete(self.endpoint(path)?));
        let res = req.send().await.map_err(ClientError::Transport)?;
        if res.status().is_success() {
            return Ok(());
        }
        Err(self.failure(path, res).await)
    }

    async fn decode<T: DeserializeOwned>(&self, path: &str, res: Response) -> Result<T> {
        if res.status().is_success() {
            return res.json::<T>().await.map_err(ClientError::Transport);
        }
        Err(self.failure(path, res).await)
    }

    async fn failure(&self, path: &str, res: Response) -> ClientError {
        let status = res.status();
        let message = res
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.error.or(body.message))
            .unwrap_or_else(|| "unknown error".to_string());

        let err = error_for_status(status, message);
        if err.is_auth() {
            // Central session teardown: every call site sees the same
            // behavior, the front end drains the latched notice once.
            tracing::warn!("{path}: {status}, clearing session");
            self.session.expire();
        } else {
            tracing::debug!("{path}: {status}");
        }
        err
    }
}

/// Maps a non-success status plus the decoded body message to an error.
fn error_for_status(status: StatusCode, message: String) -> ClientError {
    match status.as_u16() {
        401 => ClientError::Unauthorized,
        403 => ClientError::Forbidden,
        404 => ClientError::NotFound,
        409 => ClientError::Conflict(message),
        422 => ClientError::Validation(message),
        _ => ClientError::Server(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_covers_the_taxonomy() {
        assert!(matches!(
            error_for_status(StatusCode::UNAUTHORIZED, String::new()),
            ClientError::Unauthorized
        ));
        assert!(matches!(
            error_for_status(StatusCode::FORBIDDEN, String::new()),
            ClientError::Forbidden
        ));
        assert!(matches!(
            error_for_status(StatusCode::NOT_FOUND, String::new()),
            ClientError::NotFound
        ));
        let err = error_for_status(StatusCode::UNPROCESSABLE_ENTITY, "bad date".to_string());
        assert_eq!(err.user_message(), "bad date");
        let err = error_for_status(StatusCode::INTERNAL_SERVER_ERROR, "boom".to_string());
        assert!(matches!(err, ClientError::Server(_)));
    }

    #[test]
    fn auth_statuses_are_flagged() {
        assert!(error_for_status(StatusCode::UNAUTHORIZED, String::new()).is_auth());
        assert!(error_for_status(StatusCode::FORBIDDEN, String::new()).is_auth());
        assert!(!error_for_status(StatusCode::NOT_FOUND, String::new()).is_auth());
    }
}
