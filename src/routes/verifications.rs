use actix_web::{delete, get, post, web, HttpResponse};
use sea_orm::DatabaseConnection;

use crate::error::AppResult;
use crate::services::verification_service::VerificationService;

#[get("")]
pub async fn list_verifications(db: web::Data<DatabaseConnection>) -> AppResult<HttpResponse> {
    let verifications = VerificationService::list_all(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(verifications))
}

/// GET /verifications/site/{siteId}
#[get("/site/{site_id}")]
pub async fn list_site_verifications(
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let verifications = VerificationService::list_by_site(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(verifications))
}

#[get("/{id}")]
pub async fn get_verification(
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let verification = VerificationService::get_by_id(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(verification))
}

/// POST /verifications/site/{siteId} - 404 si le chantier n'existe pas
#[post("/site/{site_id}")]
pub async fn create_verification(
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let verification = VerificationService::create_for_site(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Created().json(verification))
}

#[delete("/{id}")]
pub async fn delete_verification(
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    VerificationService::delete(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn verifications_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/verifications")
            .service(list_verifications)
            .service(list_site_verifications)
            .service(create_verification)
            .service(get_verification)
            .service(delete_verification)
    );
}
