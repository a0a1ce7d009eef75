use crate::search::CatalogQuery;
use async_trait::async_trait;
use rekvi_core::remote::RemoteError;
use rekvi_shared::{MaterialId, UserNo};
use serde::{Deserialize, Serialize};

/// One orderable material as served by the remote catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
    pub id: MaterialId,
    /// Backend material number, e.g. "4711".
    pub material_no: String,
    pub short_name: String,
    pub long_name: String,
    pub supplier_code: String,
    pub keywords: String,
    /// Smallest quantity step this material can be ordered in.
    pub unit_multiple: i64,
    /// Comma-separated names of the favorite lists this material belongs to,
    /// maintained by the backend.
    pub included_in_favorites: String,
}

impl Material {
    /// Favorite lists this material currently belongs to, trimmed and with
    /// blanks dropped. The synthetic "all items" list is kept here; callers
    /// that need the real memberships filter it out.
    pub fn favorite_memberships(&self) -> Vec<String> {
        self.included_in_favorites
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Catalog access. The search runs server-side; the query type documents the
/// fixed contract the server applies.
#[async_trait]
pub trait CatalogGateway: Send + Sync {
    async fn query(
        &self,
        user: &UserNo,
        query: &CatalogQuery,
    ) -> Result<Vec<Material>, RemoteError>;

    async fn get(&self, user: &UserNo, id: MaterialId) -> Result<Option<Material>, RemoteError>;
}
