use async_trait::async_trait;
use rekvi_core::remote::RemoteError;
use rekvi_shared::{MaterialId, UserNo};
use serde::{Deserialize, Serialize};

/// One basket line as reported by the remote basket: the aggregate pending
/// quantity of one material for one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasketLine {
    pub user_no: UserNo,
    pub material_id: MaterialId,
    pub quantity: i64,
    pub unit_multiple: i64,
    pub display_name: String,
}

/// A signed quantity delta submitted to the remote basket. The remote nets
/// deltas per (user, material); a line whose aggregate reaches zero is gone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasketWrite {
    pub user_no: UserNo,
    pub material_id: MaterialId,
    pub quantity_delta: i64,
}

/// The remote basket collaborator. Writes are creates of signed deltas;
/// the remote is the source of truth for the resulting quantities.
#[async_trait]
pub trait BasketGateway: Send + Sync {
    async fn create(&self, write: &BasketWrite) -> Result<(), RemoteError>;

    async fn query(&self, user: &UserNo) -> Result<Vec<BasketLine>, RemoteError>;
}
