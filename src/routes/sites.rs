use actix_web::{delete, get, post, put, web, HttpResponse};
use sea_orm::DatabaseConnection;
use validator::Validate;

use crate::error::AppResult;
use crate::models::dto::{SiteFilter, SiteRequest};
use crate::models::pagination::{PageParams, PageRequest};
use crate::services::site_service::SiteService;

/// GET /sites?q&status&interventionDate&page&size&sort - Recherche paginée
#[get("")]
pub async fn search_sites(
    db: web::Data<DatabaseConnection>,
    filter: web::Query<SiteFilter>,
    params: web::Query<PageParams>,
) -> AppResult<HttpResponse> {
    let page = PageRequest::from(params.into_inner());
    let sites = SiteService::search(db.get_ref(), &filter, &page).await?;
    Ok(HttpResponse::Ok().json(sites))
}

/// GET /sites/{id}
#[get("/{id}")]
pub async fn get_site(
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let site = SiteService::get_by_id(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(site))
}

/// POST /sites - 400 si clientId ou technicianId est inconnu
#[post("")]
pub async fn create_site(
    db: web::Data<DatabaseConnection>,
    body: web::Json<SiteRequest>,
) -> AppResult<HttpResponse> {
    body.validate()?;
    let site = SiteService::create(db.get_ref(), body.into_inner()).await?;
    Ok(HttpResponse::Created().json(site))
}

/// PUT /sites/{id} - Remplacement complet
#[put("/{id}")]
pub async fn update_site(
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
    body: web::Json<SiteRequest>,
) -> AppResult<HttpResponse> {
    body.validate()?;
    let site = SiteService::update(db.get_ref(), path.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(site))
}

/// POST /sites/{id}/close - Clôture (statut DONE)
#[post("/{id}/close")]
pub async fn close_site(
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let site = SiteService::close_out(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(site))
}

/// DELETE /sites/{id} - Supprime aussi les vérifications
#[delete("/{id}")]
pub async fn delete_site(
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    SiteService::delete(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn sites_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/sites")
            .service(search_sites)
            .service(create_site)
            .service(get_site)
            .service(update_site)
            .service(close_site)
            .service(delete_site)
    );
}
