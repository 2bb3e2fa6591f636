use actix_web::{delete, get, post, put, web, HttpResponse};
use sea_orm::DatabaseConnection;
use validator::Validate;

use crate::error::AppResult;
use crate::models::dto::{SearchQuery, TechnicianRequest};
use crate::models::pagination::{PageParams, PageRequest};
use crate::services::technician_service::TechnicianService;

/// GET /technicians?q&page&size&sort - Recherche nom / prénom / email
#[get("")]
pub async fn search_technicians(
    db: web::Data<DatabaseConnection>,
    search: web::Query<SearchQuery>,
    params: web::Query<PageParams>,
) -> AppResult<HttpResponse> {
    let page = PageRequest::from(params.into_inner());
    let technicians = TechnicianService::search(db.get_ref(), search.q.as_deref(), &page).await?;
    Ok(HttpResponse::Ok().json(technicians))
}

#[get("/{id}")]
pub async fn get_technician(
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let technician = TechnicianService::get_by_id(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(technician))
}

#[post("")]
pub async fn create_technician(
    db: web::Data<DatabaseConnection>,
    body: web::Json<TechnicianRequest>,
) -> AppResult<HttpResponse> {
    body.validate()?;
    let technician = TechnicianService::create(db.get_ref(), body.into_inner()).await?;
    Ok(HttpResponse::Created().json(technician))
}

#[put("/{id}")]
pub async fn update_technician(
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
    body: web::Json<TechnicianRequest>,
) -> AppResult<HttpResponse> {
    body.validate()?;
    let technician =
        TechnicianService::update(db.get_ref(), path.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(technician))
}

#[delete("/{id}")]
pub async fn delete_technician(
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    TechnicianService::delete(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn technicians_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/technicians")
            .service(search_technicians)
            .service(create_technician)
            .service(get_technician)
            .service(update_technician)
            .service(delete_technician)
    );
}
