//! Caller identity resolution.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::id::UserId;

/// Maps a presented credential to a user identity.
///
/// Token verification lives outside this workspace; the transport path only
/// needs a user id or a rejection.
#[async_trait]
pub trait IdentityResolver: Send + Sync + std::fmt::Debug + 'static {
    /// Resolve the credential, failing with an authentication error.
    async fn resolve(&self, credential: &str) -> AppResult<UserId>;
}
