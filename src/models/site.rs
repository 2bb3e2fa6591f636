// ============================================================================
// MODÈLE : SITE (CHANTIER)
// ============================================================================
//
// Colonnes de la table sites:
//   - id (INTEGER, PRIMARY KEY, SERIAL)
//   - reference (VARCHAR, NOT NULL)
//   - address (VARCHAR, NOT NULL)
//   - installation_type (VARCHAR, NULL)
//   - intervention_date (DATE, NULL)
//   - status (VARCHAR, NOT NULL) - 'DRAFT' | 'IN_PROGRESS' | 'DONE'
//   - client_signature (VARCHAR, NULL)
//   - signature_date (TIMESTAMP, NULL)
//   - created_at (TIMESTAMP, NOT NULL) - posé une seule fois à la création
//   - updated_at (TIMESTAMP, NULL) - rafraîchi à chaque modification
//   - client_id (INTEGER, NOT NULL, FK vers clients)
//   - technician_id (INTEGER, NOT NULL, FK vers technicians)
//
// Cycle de vie du statut:
//   DRAFT à la création si absent. Un PUT peut poser n'importe quel statut,
//   la clôture (POST /sites/{id}/close) force DONE quel que soit l'état.
//
// ============================================================================

use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sites")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub reference: String,
    pub address: String,
    pub installation_type: Option<String>,
    pub intervention_date: Option<Date>,
    pub status: SiteStatus,
    pub client_signature: Option<String>,
    pub signature_date: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: Option<DateTime>,
    pub client_id: i32,
    pub technician_id: i32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SiteStatus {
    #[default]
    #[sea_orm(string_value = "DRAFT")]
    Draft,
    #[sea_orm(string_value = "IN_PROGRESS")]
    InProgress,
    #[sea_orm(string_value = "DONE")]
    Done,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::client::Entity",
        from = "Column::ClientId",
        to = "super::client::Column::Id"
    )]
    Client,

    #[sea_orm(
        belongs_to = "super::technician::Entity",
        from = "Column::TechnicianId",
        to = "super::technician::Column::Id"
    )]
    Technician,

    #[sea_orm(has_many = "super::verification::Entity")]
    Verification,
}

impl Related<super::client::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl Related<super::technician::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Technician.def()
    }
}

impl Related<super::verification::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Verification.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
