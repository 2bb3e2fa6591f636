// Base SQLite en mémoire + jeux de données pour les tests

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};

use crate::db;
use crate::models::site::SiteStatus;
use crate::models::{client, site, technician};

pub struct Fixture {
    pub client: client::Model,
    pub technician: technician::Model,
}

/// Une seule connexion: chaque connexion SQLite `:memory:` a sa propre base.
pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options).await.unwrap();
    db::sync_schema(&db).await.unwrap();
    db
}

pub async fn insert_client(db: &DatabaseConnection, name: &str) -> client::Model {
    client::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn insert_technician(db: &DatabaseConnection, last_name: &str) -> technician::Model {
    technician::ActiveModel {
        last_name: Set(last_name.to_string()),
        first_name: Set("Alex".to_string()),
        email: Set(format!("{}@example.com", last_name.to_lowercase())),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn seed_references(db: &DatabaseConnection) -> Fixture {
    Fixture {
        client: insert_client(db, "Client Test").await,
        technician: insert_technician(db, "Technicien").await,
    }
}

/// Insère directement un chantier DRAFT, sans passer par le service
pub async fn insert_site(
    db: &DatabaseConnection,
    fixture: &Fixture,
    reference: &str,
    address: &str,
) -> site::Model {
    site::ActiveModel {
        reference: Set(reference.to_string()),
        address: Set(address.to_string()),
        installation_type: Set(None),
        intervention_date: Set(None),
        status: Set(SiteStatus::Draft),
        client_signature: Set(None),
        signature_date: Set(None),
        created_at: Set(Utc::now().naive_utc()),
        updated_at: Set(None),
        client_id: Set(fixture.client.id),
        technician_id: Set(fixture.technician.id),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}
