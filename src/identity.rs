//! Identity resolution for the WebSocket accept path.

use async_trait::async_trait;

use pinpost_core::error::AppError;
use pinpost_core::traits::IdentityResolver;
use pinpost_core::types::id::UserId;
use pinpost_core::AppResult;

/// Trusts the user ID carried in the connection path.
///
/// Token verification happens in front of this service; by the time a
/// connection reaches the accept path its user ID is authoritative.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathIdentityResolver;

#[async_trait]
impl IdentityResolver for PathIdentityResolver {
    async fn resolve(&self, credential: &str) -> AppResult<UserId> {
        credential
            .parse::<UserId>()
            .map_err(|_| AppError::authentication("Invalid user identifier"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_resolves_valid_id() {
        let user_id = UserId::new();
        let resolved = PathIdentityResolver
            .resolve(&user_id.to_string())
            .await
            .expect("valid id");
        assert_eq!(resolved, user_id);
    }

    #[tokio::test]
    async fn test_rejects_garbage() {
        let err = PathIdentityResolver.resolve("not-a-uuid").await.expect_err("garbage");
        assert!(err.is(pinpost_core::error::ErrorKind::Authentication));
    }
}
