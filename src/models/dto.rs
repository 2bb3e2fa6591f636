//pour les requêtes et réponses structurées
use chrono::{NaiveDate, NaiveDateTime};
use serde::de::value::StringDeserializer;
use serde::de::IntoDeserializer;
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::models::{client, site, technician};
use crate::models::site::SiteStatus;

// Corps de POST /sites et PUT /sites/{id} (remplacement complet)
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SiteRequest {
    #[validate(length(min = 1, message = "reference is required"))]
    pub reference: String,
    #[validate(length(min = 1, message = "address is required"))]
    pub address: String,
    pub installation_type: Option<String>,
    pub intervention_date: Option<NaiveDate>,
    pub status: Option<SiteStatus>, // DRAFT si absent
    pub client_signature: Option<String>,
    pub signature_date: Option<NaiveDateTime>,
    pub client_id: i32,
    pub technician_id: i32,
}

// Filtres de GET /sites (en plus de page/size/sort)
// `?status=` ou `?interventionDate=` vides = pas de filtre
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteFilter {
    pub q: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub status: Option<SiteStatus>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub intervention_date: Option<NaiveDate>,
}

fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => {
            let value: StringDeserializer<D::Error> = raw.into_deserializer();
            T::deserialize(value).map(Some)
        }
        _ => Ok(None),
    }
}

// Chantier avec son client et son technicien embarqués
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteResponse {
    pub id: i32,
    pub reference: String,
    pub address: String,
    pub installation_type: Option<String>,
    pub intervention_date: Option<NaiveDate>,
    pub status: SiteStatus,
    pub client_signature: Option<String>,
    pub signature_date: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
    pub client: client::Model,
    pub technician: technician::Model,
}

impl SiteResponse {
    pub fn new(site: site::Model, client: client::Model, technician: technician::Model) -> Self {
        Self {
            id: site.id,
            reference: site.reference,
            address: site.address,
            installation_type: site.installation_type,
            intervention_date: site.intervention_date,
            status: site.status,
            client_signature: site.client_signature,
            signature_date: site.signature_date,
            created_at: site.created_at,
            updated_at: site.updated_at,
            client,
            technician,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ClientRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TechnicianRequest {
    #[validate(length(min = 1, message = "lastName is required"))]
    pub last_name: String,
    #[validate(length(min = 1, message = "firstName is required"))]
    pub first_name: String,
    #[validate(email(message = "email is invalid"))]
    pub email: String,
}

// ?q= pour les recherches clients / techniciens
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}
