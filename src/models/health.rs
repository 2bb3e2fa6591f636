use serde::Serialize;
use chrono::{DateTime, Utc};

// "ok" si la base répond au ping, "degraded" sinon
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    pub time: DateTime<Utc>,
}
