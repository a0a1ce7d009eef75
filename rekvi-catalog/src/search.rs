use crate::material::Material;
use rekvi_shared::ALL_ITEMS_LIST;
use serde::{Deserialize, Serialize};

/// Server-side catalog filter.
///
/// A search term matches when any of the five search fields contains it
/// (logical OR): material number, short name, long name, supplier code,
/// keywords. A favorite list name constrains the result to members of that
/// list; the synthetic "all items" list means no constraint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogQuery {
    pub term: Option<String>,
    pub favorite_list: Option<String>,
}

impl CatalogQuery {
    pub fn with_term(term: impl Into<String>) -> Self {
        Self {
            term: Some(term.into()),
            favorite_list: None,
        }
    }

    /// Whether a material passes this filter. The case-insensitive match is
    /// our choice; the original delegates matching to the server.
    pub fn matches(&self, material: &Material) -> bool {
        self.matches_term(material) && self.matches_list(material)
    }

    fn matches_term(&self, material: &Material) -> bool {
        let term = match self.term.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t.to_lowercase(),
            _ => return true,
        };
        [
            &material.material_no,
            &material.short_name,
            &material.long_name,
            &material.supplier_code,
            &material.keywords,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&term))
    }

    fn matches_list(&self, material: &Material) -> bool {
        let list = match self.favorite_list.as_deref().map(str::trim) {
            Some(l) if !l.is_empty() && l != ALL_ITEMS_LIST => l,
            _ => return true,
        };
        material
            .favorite_memberships()
            .iter()
            .any(|member| member == list)
    }
}
