use actix_web::HttpResponse;
use serde_json::json;

/// GET /api - Liste des groupes d'endpoints
pub async fn api_index() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "message": "API Gestion Chantiers",
        "endpoints": {
            "clients": "/api/clients",
            "technicians": "/api/technicians",
            "sites": "/api/sites",
            "verifications": "/api/verifications"
        }
    }))
}
