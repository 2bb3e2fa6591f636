use sea_orm::*;

use crate::error::{AppError, AppResult};
use crate::models::dto::ClientRequest;
use crate::models::pagination::{Page, PageRequest};
use crate::models::{client, site};
use crate::services::query::{contains_ignore_case, fetch_page, normalize_query};

pub struct ClientService;

fn sort_column(field: &str) -> Option<client::Column> {
    match field {
        "id" => Some(client::Column::Id),
        "name" => Some(client::Column::Name),
        _ => None,
    }
}

impl ClientService {
    /// Liste paginée, filtrée sur le nom si `q` est renseigné
    pub async fn search(
        db: &DatabaseConnection,
        q: Option<&str>,
        page: &PageRequest,
    ) -> AppResult<Page<client::Model>> {
        let (column, order) = page.sort.resolve(sort_column)?;

        let mut query = client::Entity::find();
        if let Some(q) = normalize_query(q) {
            query = query.filter(contains_ignore_case(client::Column::Name, q));
        }

        fetch_page(db, query.order_by(column, order), page).await
    }

    /// Recherche simple par id, utilisée aussi pour valider les références d'un chantier
    pub async fn find(db: &DatabaseConnection, id: i32) -> Result<Option<client::Model>, DbErr> {
        client::Entity::find_by_id(id).one(db).await
    }

    pub async fn get_by_id(db: &DatabaseConnection, id: i32) -> AppResult<client::Model> {
        Self::find(db, id)
            .await?
            .ok_or(AppError::NotFound { entity: "Client", id })
    }

    pub async fn create(db: &DatabaseConnection, request: ClientRequest) -> AppResult<client::Model> {
        let new_client = client::ActiveModel {
            name: Set(request.name),
            ..Default::default()
        };

        let created = new_client.insert(db).await?;
        tracing::info!(client_id = created.id, "Client created");
        Ok(created)
    }

    pub async fn update(
        db: &DatabaseConnection,
        id: i32,
        request: ClientRequest,
    ) -> AppResult<client::Model> {
        let existing = Self::get_by_id(db, id).await?;

        let mut active: client::ActiveModel = existing.into();
        active.name = Set(request.name);

        let updated = active.update(db).await?;
        tracing::info!(client_id = id, "Client updated");
        Ok(updated)
    }

    /// Refuse la suppression tant qu'un chantier référence ce client
    pub async fn delete(db: &DatabaseConnection, id: i32) -> AppResult<()> {
        Self::get_by_id(db, id).await?;

        let site_count = site::Entity::find()
            .filter(site::Column::ClientId.eq(id))
            .count(db)
            .await?;

        if site_count > 0 {
            return Err(AppError::Conflict(format!(
                "Client {} is still referenced by {} site(s)",
                id, site_count
            )));
        }

        client::Entity::delete_by_id(id).exec(db).await?;
        tracing::info!(client_id = id, "Client deleted");
        Ok(())
    }
}
