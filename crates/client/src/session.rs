use std::sync::{Arc, Mutex, MutexGuard};

use api_types::user::UserProfile;

/// An authenticated session: the bearer token plus the signed-in user.
#[derive(Clone, Debug)]
pub struct Session {
    pub token: String,
    pub user: UserProfile,
}

#[derive(Debug, Default)]
struct SessionState {
    session: Option<Session>,
    /// Latched when a 401/403 tore the session down; drained once by the
    /// front end to show the "signed out" notice.
    expired: bool,
}

/// Shared, injectable session context.
///
/// Initialized at app start, handed to [`ApiClient`](crate::ApiClient), read
/// on every outgoing request, cleared on logout or when any response comes
/// back 401/403.
#[derive(Clone, Debug, Default)]
pub struct SessionContext {
    inner: Arc<Mutex<SessionState>>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.inner.lock().unwrap_or_else(|err| err.into_inner())
    }

    pub fn set(&self, session: Session) {
        let mut state = self.state();
        state.session = Some(session);
        state.expired = false;
    }

    /// Local logout; does not latch the expiry notice.
    pub fn clear(&self) {
        self.state().session = None;
    }

    /// Server-side teardown: clears the session and latches the expiry flag.
    pub fn expire(&self) {
        let mut state = self.state();
        state.session = None;
        state.expired = true;
    }

    /// Returns `true` exactly once after [`expire`](Self::expire) ran.
    pub fn take_expired(&self) -> bool {
        let mut state = self.state();
        std::mem::take(&mut state.expired)
    }

    pub fn token(&self) -> Option<String> {
        self.state().session.as_ref().map(|s| s.token.clone())
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.state().session.as_ref().map(|s| s.user.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.state().session.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_types::membership::Role;

    fn profile() -> UserProfile {
        UserProfile {
            id: "u1".to_string(),
            email: "ada@example.com".to_string(),
            name: "Ada".to_string(),
            role: Role::Owner,
            avatar: None,
            bio: None,
            timezone: "UTC".to_string(),
            locale: "en".to_string(),
            created_at: chrono::NaiveDateTime::default(),
            updated_at: chrono::NaiveDateTime::default(),
        }
    }

    #[test]
    fn expire_clears_session_and_latches_once() {
        let ctx = SessionContext::new();
        ctx.set(Session {
            token: "tok".to_string(),
            user: profile(),
        });
        assert!(ctx.is_authenticated());

        ctx.expire();
        assert!(!ctx.is_authenticated());
        assert!(ctx.take_expired());
        assert!(!ctx.take_expired());
    }

    #[test]
    fn login_resets_a_pending_expiry() {
        let ctx = SessionContext::new();
        ctx.expire();
        ctx.set(Session {
            token: "tok".to_string(),
            user: profile(),
        });
        assert!(!ctx.take_expired());
    }
}
