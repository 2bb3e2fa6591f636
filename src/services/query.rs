// Briques de requêtes communes aux services (recherche texte, pagination)

use sea_orm::sea_query::{Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, PaginatorTrait, Select};

use crate::error::AppResult;
use crate::models::pagination::{Page, PageRequest};

/// Texte de recherche utile: `None` si absent ou blanc.
pub fn normalize_query(q: Option<&str>) -> Option<&str> {
    q.map(str::trim).filter(|q| !q.is_empty())
}

const LIKE_ESCAPE: char = '\\';

/// Échappe les jokers de LIKE pour que `%` et `_` soient cherchés tels quels.
fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

/// `LOWER(colonne) LIKE '%needle%'` (sous-chaîne, insensible à la casse).
pub fn contains_ignore_case<C: ColumnTrait>(column: C, needle: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like(&needle.to_lowercase()));
    Expr::expr(Func::lower(Expr::col(column.as_column_ref())))
        .like(LikeExpr::new(pattern).escape(LIKE_ESCAPE))
}

/// Exécute la requête triée en renvoyant la page demandée et les totaux.
pub async fn fetch_page<E>(
    db: &DatabaseConnection,
    query: Select<E>,
    request: &PageRequest,
) -> AppResult<Page<E::Model>>
where
    E: EntityTrait,
    E::Model: FromQueryResult + Send + Sync + 'static,
{
    let paginator = query.paginate(db, request.size);
    let totals = paginator.num_items_and_pages().await?;
    // au-delà de la dernière page: rien à lire, et page * size peut déborder
    let content = if request.page < totals.number_of_pages {
        paginator.fetch_page(request.page).await?
    } else {
        Vec::new()
    };

    Ok(Page {
        content,
        total_elements: totals.number_of_items,
        total_pages: totals.number_of_pages,
        number: request.page,
        size: request.size,
    })
}
