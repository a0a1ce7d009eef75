use crate::CoreResult;
use async_trait::async_trait;
use rekvi_shared::UserNo;
use serde::{Deserialize, Serialize};

/// The identity the workflow operates on behalf of.
///
/// The selected user is loaded once at startup and passed explicitly into the
/// services; nothing reads it from ambient state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    pub user_no: UserNo,
}

impl SessionContext {
    pub fn new(user_no: UserNo) -> Self {
        Self { user_no }
    }
}

/// Persists the selected user across restarts.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self) -> CoreResult<Option<SessionContext>>;
    async fn save(&self, ctx: &SessionContext) -> CoreResult<()>;
    async fn clear(&self) -> CoreResult<()>;
}
