use async_trait::async_trait;
use rekvi_core::remote::RemoteError;
use rekvi_shared::{MaterialId, UserNo};
use serde::{Deserialize, Serialize};

/// One favorite membership: this material is on this user's list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteEntry {
    pub user_no: UserNo,
    pub list_name: String,
    pub material_id: MaterialId,
}

/// How the target list was picked in the add dialog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ListChoice {
    /// A new list name typed by the user.
    CreateNew { name: String },
    /// An existing list selected from the user's lists.
    Existing { name: String },
}

#[async_trait]
pub trait FavoritesGateway: Send + Sync {
    async fn create(&self, entry: &FavoriteEntry) -> Result<(), RemoteError>;
    async fn delete(&self, entry: &FavoriteEntry) -> Result<(), RemoteError>;
    async fn query(&self, user: &UserNo) -> Result<Vec<FavoriteEntry>, RemoteError>;
}
