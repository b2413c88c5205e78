//! Cloud Authentication Capability
//!
//! Models an authenticated session with one cloud provider. The gallery
//! core never runs sign-in UI or OAuth flows itself; it checks session
//! state, asks for silent authentication, and - when the host wants an
//! interactive flow - exchanges opaque challenge/response values with the
//! platform layer.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// Opaque interactive sign-in request.
///
/// Produced by an authenticator, launched by the host (browser tab, web
/// view, platform account picker). The `request_code` ties the eventual
/// [`AuthResponse`] back to the authenticator that issued the challenge.
#[derive(Debug, Clone)]
pub struct AuthChallenge {
    /// Correlation code echoed back in the response.
    pub request_code: u32,
    /// URL (or platform-specific locator) the host must present.
    pub launch_url: String,
}

/// Opaque result of an interactive sign-in attempt.
#[derive(Debug, Clone)]
pub struct AuthResponse {
    /// Correlation code from the originating [`AuthChallenge`].
    pub request_code: u32,
    /// Whether the platform flow completed (user did not cancel).
    pub completed: bool,
    /// Provider-specific callback payload (auth code, tokens, account
    /// handle); the core never inspects this.
    pub payload: Option<Value>,
}

/// Authenticated cloud session capability, one instance per provider
/// account.
///
/// Session mutation is internal to the implementation; the same instance
/// may be shared across concurrent fetches.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::auth::CloudAuthenticator;
///
/// async fn token_if_ready(auth: &dyn CloudAuthenticator) -> Option<String> {
///     if !auth.is_authenticated() {
///         return None;
///     }
///     auth.access_token().await.ok()
/// }
/// ```
#[async_trait]
pub trait CloudAuthenticator: Send + Sync {
    /// Whether a usable session is currently available.
    fn is_authenticated(&self) -> bool;

    /// Attempt silent authentication (cached account, refresh token).
    ///
    /// Returns whether the session is usable afterwards. Must not present
    /// UI; interactive flows go through [`auth_challenge`].
    ///
    /// [`auth_challenge`]: CloudAuthenticator::auth_challenge
    async fn authenticate(&self) -> bool;

    /// Tear down the current session.
    async fn logout(&self);

    /// Access token for API calls.
    ///
    /// # Errors
    ///
    /// Fails when no session is available or the token cannot be refreshed.
    async fn access_token(&self) -> Result<String>;

    /// Produce an interactive sign-in request for the host to launch, or
    /// `None` when the provider has no interactive flow.
    fn auth_challenge(&self) -> Option<AuthChallenge>;

    /// Accept the outcome of an interactive sign-in the host ran.
    ///
    /// Returns whether the response belonged to this authenticator *and*
    /// produced a usable session. Responses with a foreign `request_code`
    /// must be ignored (return `false`) so the host can fan one response
    /// out to every configured authenticator.
    async fn handle_auth_response(&self, response: AuthResponse) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BridgeError;

    struct SignedOutAuthenticator;

    #[async_trait]
    impl CloudAuthenticator for SignedOutAuthenticator {
        fn is_authenticated(&self) -> bool {
            false
        }

        async fn authenticate(&self) -> bool {
            false
        }

        async fn logout(&self) {}

        async fn access_token(&self) -> Result<String> {
            Err(BridgeError::NotAvailable("no session".to_string()))
        }

        fn auth_challenge(&self) -> Option<AuthChallenge> {
            Some(AuthChallenge {
                request_code: 9001,
                launch_url: "https://accounts.example.com/signin".to_string(),
            })
        }

        async fn handle_auth_response(&self, response: AuthResponse) -> bool {
            response.request_code == 9001 && response.completed
        }
    }

    #[tokio::test]
    async fn test_signed_out_session() {
        let auth = SignedOutAuthenticator;
        assert!(!auth.is_authenticated());
        assert!(!auth.authenticate().await);
        assert!(auth.access_token().await.is_err());
    }

    #[tokio::test]
    async fn test_auth_response_correlation() {
        let auth = SignedOutAuthenticator;

        let foreign = AuthResponse {
            request_code: 1234,
            completed: true,
            payload: None,
        };
        assert!(!auth.handle_auth_response(foreign).await);

        let own = AuthResponse {
            request_code: 9001,
            completed: true,
            payload: Some(serde_json::json!({ "code": "abc" })),
        };
        assert!(auth.handle_auth_response(own).await);
    }
}
