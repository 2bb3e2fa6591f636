use chrono::Utc;
use sea_orm::*;

use crate::error::{AppError, AppResult};
use crate::models::dto::TechnicianRequest;
use crate::models::pagination::{Page, PageRequest};
use crate::models::{site, technician};
use crate::services::query::{contains_ignore_case, fetch_page, normalize_query};

pub struct TechnicianService;

fn sort_column(field: &str) -> Option<technician::Column> {
    match field {
        "id" => Some(technician::Column::Id),
        "lastName" | "last_name" => Some(technician::Column::LastName),
        "firstName" | "first_name" => Some(technician::Column::FirstName),
        "email" => Some(technician::Column::Email),
        "createdAt" | "created_at" => Some(technician::Column::CreatedAt),
        _ => None,
    }
}

impl TechnicianService {
    /// Liste paginée; `q` cherche dans nom OU prénom OU email
    pub async fn search(
        db: &DatabaseConnection,
        q: Option<&str>,
        page: &PageRequest,
    ) -> AppResult<Page<technician::Model>> {
        let (column, order) = page.sort.resolve(sort_column)?;

        let mut query = technician::Entity::find();
        if let Some(q) = normalize_query(q) {
            query = query.filter(
                Condition::any()
                    .add(contains_ignore_case(technician::Column::LastName, q))
                    .add(contains_ignore_case(technician::Column::FirstName, q))
                    .add(contains_ignore_case(technician::Column::Email, q)),
            );
        }

        fetch_page(db, query.order_by(column, order), page).await
    }

    pub async fn find(db: &DatabaseConnection, id: i32) -> Result<Option<technician::Model>, DbErr> {
        technician::Entity::find_by_id(id).one(db).await
    }

    pub async fn get_by_id(db: &DatabaseConnection, id: i32) -> AppResult<technician::Model> {
        Self::find(db, id)
            .await?
            .ok_or(AppError::NotFound { entity: "Technician", id })
    }

    pub async fn create(
        db: &DatabaseConnection,
        request: TechnicianRequest,
    ) -> AppResult<technician::Model> {
        let new_technician = technician::ActiveModel {
            last_name: Set(request.last_name),
            first_name: Set(request.first_name),
            email: Set(request.email),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        let created = new_technician.insert(db).await?;
        tracing::info!(technician_id = created.id, "Technician created");
        Ok(created)
    }

    /// Remplace nom, prénom et email; created_at reste inchangé
    pub async fn update(
        db: &DatabaseConnection,
        id: i32,
        request: TechnicianRequest,
    ) -> AppResult<technician::Model> {
        let existing = Self::get_by_id(db, id).await?;

        let mut active: technician::ActiveModel = existing.into();
        active.last_name = Set(request.last_name);
        active.first_name = Set(request.first_name);
        active.email = Set(request.email);

        let updated = active.update(db).await?;
        tracing::info!(technician_id = id, "Technician updated");
        Ok(updated)
    }

    pub async fn delete(db: &DatabaseConnection, id: i32) -> AppResult<()> {
        Self::get_by_id(db, id).await?;

        let site_count = site::Entity::find()
            .filter(site::Column::TechnicianId.eq(id))
            .count(db)
            .await?;

        if site_count > 0 {
            return Err(AppError::Conflict(format!(
                "Technician {} is still assigned to {} site(s)",
                id, site_count
            )));
        }

        technician::Entity::delete_by_id(id).exec(db).await?;
        tracing::info!(technician_id = id, "Technician deleted");
        Ok(())
    }
}
