use crate::error::ApiError;
use crate::session::require_user;
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use rekvi_catalog::{CatalogQuery, Material};
use rekvi_shared::MaterialId;
use serde::{Deserialize, Serialize};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/materials", get(search_materials))
        .route("/v1/materials/{id}", get(get_material))
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    search: Option<String>,
    /// Favorite list to constrain to; "Alle varer" means no constraint.
    list: Option<String>,
}

#[derive(Debug, Serialize)]
struct MaterialResponse {
    #[serde(flatten)]
    material: Material,
    favorite_memberships: Vec<String>,
}

impl From<Material> for MaterialResponse {
    fn from(material: Material) -> Self {
        let favorite_memberships = material.favorite_memberships();
        Self {
            material,
            favorite_memberships,
        }
    }
}

async fn search_materials(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<MaterialResponse>>, ApiError> {
    let user = require_user(&state).await?;
    let query = CatalogQuery {
        term: params.search,
        favorite_list: params.list,
    };
    let materials = state
        .catalog
        .query(&user, &query)
        .await
        .map_err(|e| ApiError::remote(e, "The catalog could not be searched"))?;
    Ok(Json(materials.into_iter().map(Into::into).collect()))
}

async fn get_material(
    State(state): State<AppState>,
    Path(id): Path<MaterialId>,
) -> Result<Json<MaterialResponse>, ApiError> {
    let user = require_user(&state).await?;
    let material = state
        .catalog
        .get(&user, id)
        .await
        .map_err(|e| ApiError::remote(e, "The material could not be loaded"))?
        .ok_or_else(|| ApiError::NotFound(format!("No material with id {}", id)))?;
    Ok(Json(material.into()))
}
