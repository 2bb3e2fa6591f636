use sea_orm::*;

use crate::error::{AppError, AppResult};
use crate::models::{site, verification};

pub struct VerificationService;

impl VerificationService {
    pub async fn list_all(db: &DatabaseConnection) -> AppResult<Vec<verification::Model>> {
        let verifications = verification::Entity::find()
            .order_by_asc(verification::Column::Id)
            .all(db)
            .await?;
        Ok(verifications)
    }

    /// Liste vide (et pas 404) si le chantier n'existe pas
    pub async fn list_by_site(
        db: &DatabaseConnection,
        site_id: i32,
    ) -> AppResult<Vec<verification::Model>> {
        let verifications = verification::Entity::find()
            .filter(verification::Column::SiteId.eq(site_id))
            .order_by_asc(verification::Column::Id)
            .all(db)
            .await?;
        Ok(verifications)
    }

    pub async fn get_by_id(db: &DatabaseConnection, id: i32) -> AppResult<verification::Model> {
        verification::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or(AppError::NotFound { entity: "Verification", id })
    }

    pub async fn create_for_site(
        db: &DatabaseConnection,
        site_id: i32,
    ) -> AppResult<verification::Model> {
        if site::Entity::find_by_id(site_id).one(db).await?.is_none() {
            return Err(AppError::NotFound { entity: "Site", id: site_id });
        }

        let new_verification = verification::ActiveModel {
            site_id: Set(site_id),
            ..Default::default()
        };

        let created = new_verification.insert(db).await?;
        tracing::info!(verification_id = created.id, site_id, "Verification created");
        Ok(created)
    }

    pub async fn delete(db: &DatabaseConnection, id: i32) -> AppResult<()> {
        let result = verification::Entity::delete_by_id(id).exec(db).await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound { entity: "Verification", id });
        }

        tracing::info!(verification_id = id, "Verification deleted");
        Ok(())
    }
}
