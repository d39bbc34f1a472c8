//! Catalog home page summary

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Record counts shown on the catalog home page
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CatalogSummary {
    pub num_books: i64,
    pub num_instances: i64,
    /// Copies with status "available"
    pub num_instances_available: i64,
    pub num_authors: i64,
    pub num_genres: i64,
}
