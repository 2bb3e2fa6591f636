pub mod health;
pub mod index;
pub mod sites;
pub mod clients;
pub mod technicians;
pub mod verifications;

use actix_web::web;

use crate::error::AppError;

// Les ressources sont servies sous /api et à la racine (alias)
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .service(
            web::scope("/api")
                .route("", web::get().to(index::api_index))
                .route("/", web::get().to(index::api_index))
                .service(health::health_check)
                .configure(resource_routes)
        )
        .configure(resource_routes);
}

fn resource_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(sites::sites_routes)
        .configure(clients::clients_routes)
        .configure(technicians::technicians_routes)
        .configure(verifications::verifications_routes);
}

// Corps JSON invalide => 400 au format d'erreur commun
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::Validation(err.to_string()).into())
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| AppError::Validation(err.to_string()).into())
}
