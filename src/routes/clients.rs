use actix_web::{delete, get, post, put, web, HttpResponse};
use sea_orm::DatabaseConnection;
use validator::Validate;

use crate::error::AppResult;
use crate::models::dto::{ClientRequest, SearchQuery};
use crate::models::pagination::{PageParams, PageRequest};
use crate::services::client_service::ClientService;

/// GET /clients?q&page&size&sort - Recherche sur le nom
#[get("")]
pub async fn search_clients(
    db: web::Data<DatabaseConnection>,
    search: web::Query<SearchQuery>,
    params: web::Query<PageParams>,
) -> AppResult<HttpResponse> {
    let page = PageRequest::from(params.into_inner());
    let clients = ClientService::search(db.get_ref(), search.q.as_deref(), &page).await?;
    Ok(HttpResponse::Ok().json(clients))
}

#[get("/{id}")]
pub async fn get_client(
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let client = ClientService::get_by_id(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(client))
}

#[post("")]
pub async fn create_client(
    db: web::Data<DatabaseConnection>,
    body: web::Json<ClientRequest>,
) -> AppResult<HttpResponse> {
    body.validate()?;
    let client = ClientService::create(db.get_ref(), body.into_inner()).await?;
    Ok(HttpResponse::Created().json(client))
}

#[put("/{id}")]
pub async fn update_client(
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
    body: web::Json<ClientRequest>,
) -> AppResult<HttpResponse> {
    body.validate()?;
    let client = ClientService::update(db.get_ref(), path.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(client))
}

/// DELETE /clients/{id} - 409 si des chantiers le référencent encore
#[delete("/{id}")]
pub async fn delete_client(
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    ClientService::delete(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn clients_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/clients")
            .service(search_clients)
            .service(create_client)
            .service(get_client)
            .service(update_client)
            .service(delete_client)
    );
}
