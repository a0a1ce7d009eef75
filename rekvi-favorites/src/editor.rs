use crate::models::{FavoriteEntry, FavoritesGateway, ListChoice};
use rekvi_core::remote::RemoteError;
use rekvi_shared::{MaterialId, UserNo, ALL_ITEMS_LIST};
use std::sync::Arc;

/// Edits favorite-list memberships through the remote collaborator.
///
/// "Alle varer" is never a real list: it is prepended for display, excluded
/// from creation, and excluded from removal candidates.
pub struct FavoritesService {
    gateway: Arc<dyn FavoritesGateway>,
}

impl FavoritesService {
    pub fn new(gateway: Arc<dyn FavoritesGateway>) -> Self {
        Self { gateway }
    }

    /// The user's real lists, distinct and in first-seen order.
    pub async fn lists(&self, user: &UserNo) -> Result<Vec<String>, FavoritesError> {
        let entries = self.gateway.query(user).await?;
        let mut lists: Vec<String> = Vec::new();
        for entry in entries {
            if !lists.contains(&entry.list_name) {
                lists.push(entry.list_name);
            }
        }
        Ok(lists)
    }

    /// The lists as offered for catalog filtering, with the pseudo-list
    /// for "no constraint" in front.
    pub async fn selection_lists(&self, user: &UserNo) -> Result<Vec<String>, FavoritesError> {
        let mut lists = self.lists(user).await?;
        lists.insert(0, ALL_ITEMS_LIST.to_string());
        Ok(lists)
    }

    /// Add a material to a list. The resolved list name must be non-blank,
    /// whether typed or selected; returns it on success.
    pub async fn add(
        &self,
        user: &UserNo,
        material_id: MaterialId,
        choice: ListChoice,
    ) -> Result<String, FavoritesError> {
        let name = match &choice {
            ListChoice::CreateNew { name } | ListChoice::Existing { name } => name.trim(),
        };
        if name.is_empty() {
            return Err(FavoritesError::MissingListName);
        }
        if name == ALL_ITEMS_LIST {
            return Err(FavoritesError::ReservedListName(name.to_string()));
        }
        let entry = FavoriteEntry {
            user_no: user.clone(),
            list_name: name.to_string(),
            material_id,
        };
        self.gateway.create(&entry).await?;
        tracing::debug!(user = %user, list = %entry.list_name, material = %material_id, "favorite added");
        Ok(entry.list_name)
    }

    /// Remove a material from a selected existing list.
    pub async fn remove(
        &self,
        user: &UserNo,
        material_id: MaterialId,
        list_name: &str,
    ) -> Result<(), FavoritesError> {
        let name = list_name.trim();
        if name.is_empty() {
            return Err(FavoritesError::MissingListName);
        }
        if name == ALL_ITEMS_LIST {
            return Err(FavoritesError::ReservedListName(name.to_string()));
        }
        let entry = FavoriteEntry {
            user_no: user.clone(),
            list_name: name.to_string(),
            material_id,
        };
        self.gateway.delete(&entry).await?;
        tracing::debug!(user = %user, list = %entry.list_name, material = %material_id, "favorite removed");
        Ok(())
    }

    /// Removal candidates for one material, against the user's lists as
    /// currently known to the collaborator.
    pub async fn removal_candidates_for(
        &self,
        user: &UserNo,
        memberships: &[String],
    ) -> Result<Vec<String>, FavoritesError> {
        let known = self.lists(user).await?;
        Ok(removal_candidates(memberships, &known))
    }
}

/// Lists the material can be removed from: its memberships minus the
/// pseudo-list, intersected with the known lists, in known-list order.
pub fn removal_candidates(memberships: &[String], known_lists: &[String]) -> Vec<String> {
    known_lists
        .iter()
        .filter(|list| list.as_str() != ALL_ITEMS_LIST)
        .filter(|list| memberships.iter().any(|m| m == *list))
        .cloned()
        .collect()
}

#[derive(Debug, thiserror::Error)]
pub enum FavoritesError {
    #[error("A list name must be typed or selected")]
    MissingListName,

    #[error("{0} is not an editable list")]
    ReservedListName(String),

    #[error(transparent)]
    Remote(#[from] RemoteError),
}
