//! Pagination et tri partagés par les listes paginées (chantiers, clients, techniciens).
//!
//! Format des query params: `?page=0&size=20&sort=id,desc`.

use sea_orm::sea_query::Order;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 100;
pub const DEFAULT_SORT: &str = "id,desc";

/// Paramètres `page`, `size`, `sort` bruts tels que reçus dans la query string.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<u64>,
    pub size: Option<u64>,
    pub sort: Option<String>,
}

/// Tri demandé: un nom de champ (côté API) et une direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub ascending: bool,
}

impl SortSpec {
    /// Parse `"champ,direction"`. La direction est descendante sauf si elle vaut
    /// explicitement "asc" (insensible à la casse). Un champ vide retombe sur `id`.
    pub fn parse(raw: &str) -> Self {
        let mut parts = raw.split(',').map(str::trim);

        let field = match parts.next() {
            Some(f) if !f.is_empty() => f.to_string(),
            _ => "id".to_string(),
        };
        let ascending = parts
            .next()
            .is_some_and(|dir| dir.eq_ignore_ascii_case("asc"));

        Self { field, ascending }
    }

    pub fn order(&self) -> Order {
        if self.ascending { Order::Asc } else { Order::Desc }
    }

    /// Résout le champ de tri via la liste blanche propre à chaque entité.
    pub fn resolve<C, F>(&self, lookup: F) -> Result<(C, Order), AppError>
    where
        F: Fn(&str) -> Option<C>,
    {
        lookup(&self.field)
            .map(|column| (column, self.order()))
            .ok_or_else(|| AppError::Validation(format!("Unknown sort field: {}", self.field)))
    }
}

/// Requête de page normalisée (valeurs par défaut appliquées, taille bornée).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub size: u64,
    pub sort: SortSpec,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort: SortSpec::parse(DEFAULT_SORT),
        }
    }
}

impl From<PageParams> for PageRequest {
    fn from(params: PageParams) -> Self {
        let sort = params
            .sort
            .as_deref()
            .map(SortSpec::parse)
            .unwrap_or_else(|| SortSpec::parse(DEFAULT_SORT));

        Self {
            page: params.page.unwrap_or(0),
            size: params.size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
            sort,
        }
    }
}

/// Page de résultats, même forme JSON que celle consommée par le frontend
/// (`content`, `totalElements`, `totalPages`, `number`, `size`).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u64,
    pub number: u64,
    pub size: u64,
}

impl<T> Page<T> {
    /// Remplace le contenu en gardant les métadonnées de pagination.
    pub fn with_content<U>(self, content: Vec<U>) -> Page<U> {
        Page {
            content,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            number: self.number,
            size: self.size,
        }
    }
}
