use std::collections::{HashMap, HashSet};

use chrono::Utc;
use sea_orm::*;

use crate::error::{AppError, AppResult};
use crate::models::dto::{SiteFilter, SiteRequest, SiteResponse};
use crate::models::pagination::{Page, PageRequest};
use crate::models::site::SiteStatus;
use crate::models::{client, site, technician, verification};
use crate::services::client_service::ClientService;
use crate::services::query::{contains_ignore_case, fetch_page, normalize_query};
use crate::services::technician_service::TechnicianService;

pub struct SiteService;

// Champs de tri acceptés (noms API, plus les noms de colonnes)
fn sort_column(field: &str) -> Option<site::Column> {
    match field {
        "id" => Some(site::Column::Id),
        "reference" => Some(site::Column::Reference),
        "address" => Some(site::Column::Address),
        "installationType" | "installation_type" => Some(site::Column::InstallationType),
        "interventionDate" | "intervention_date" => Some(site::Column::InterventionDate),
        "status" => Some(site::Column::Status),
        "createdAt" | "created_at" => Some(site::Column::CreatedAt),
        "updatedAt" | "updated_at" => Some(site::Column::UpdatedAt),
        _ => None,
    }
}

/// Conditions de recherche: chaque filtre présent s'ajoute en ET,
/// `q` porte sur la référence OU l'adresse.
fn search_condition(filter: &SiteFilter) -> Condition {
    let mut condition = Condition::all();

    if let Some(q) = normalize_query(filter.q.as_deref()) {
        condition = condition.add(
            Condition::any()
                .add(contains_ignore_case(site::Column::Reference, q))
                .add(contains_ignore_case(site::Column::Address, q)),
        );
    }
    if let Some(status) = filter.status {
        condition = condition.add(site::Column::Status.eq(status));
    }
    if let Some(date) = filter.intervention_date {
        condition = condition.add(site::Column::InterventionDate.eq(date));
    }

    condition
}

/// Remplace tous les champs scalaires (pas de patch partiel)
fn apply_request(active: &mut site::ActiveModel, request: SiteRequest) {
    active.reference = Set(request.reference);
    active.address = Set(request.address);
    active.installation_type = Set(request.installation_type);
    active.intervention_date = Set(request.intervention_date);
    active.status = Set(request.status.unwrap_or_default());
    active.client_signature = Set(request.client_signature);
    active.signature_date = Set(request.signature_date);
    active.client_id = Set(request.client_id);
    active.technician_id = Set(request.technician_id);
}

impl SiteService {
    pub async fn search(
        db: &DatabaseConnection,
        filter: &SiteFilter,
        page: &PageRequest,
    ) -> AppResult<Page<SiteResponse>> {
        let (column, order) = page.sort.resolve(sort_column)?;

        let mut query = site::Entity::find()
            .filter(search_condition(filter))
            .order_by(column, order.clone());
        // départage stable quand le tri porte sur un champ non unique
        if page.sort.field != "id" {
            query = query.order_by(site::Column::Id, order);
        }

        tracing::debug!(?filter, page = page.page, size = page.size, sort = %page.sort.field, "Searching sites");

        let mut found = fetch_page(db, query, page).await?;
        let sites = std::mem::take(&mut found.content);
        let content = Self::embed_references(db, sites).await?;
        Ok(found.with_content(content))
    }

    pub async fn get_by_id(db: &DatabaseConnection, id: i32) -> AppResult<SiteResponse> {
        let site = Self::find_site(db, id).await?;
        Self::embed_one(db, site).await
    }

    /// Crée un chantier après validation du client et du technicien.
    /// Statut DRAFT si absent, created_at posé ici.
    pub async fn create(db: &DatabaseConnection, request: SiteRequest) -> AppResult<SiteResponse> {
        let (client, technician) =
            Self::resolve_references(db, request.client_id, request.technician_id).await?;

        let mut new_site = site::ActiveModel {
            created_at: Set(Utc::now().naive_utc()),
            updated_at: Set(None),
            ..Default::default()
        };
        apply_request(&mut new_site, request);

        let created = new_site.insert(db).await?;
        tracing::info!(site_id = created.id, reference = %created.reference, status = ?created.status, "Site created");

        Ok(SiteResponse::new(created, client, technician))
    }

    /// Remplacement complet. Le chantier doit exister (404) avant que les
    /// références soient vérifiées (400); rien n'est écrit en cas d'échec.
    /// Les vérifications du chantier ne sont pas touchées.
    pub async fn update(
        db: &DatabaseConnection,
        id: i32,
        request: SiteRequest,
    ) -> AppResult<SiteResponse> {
        let existing = Self::find_site(db, id).await?;
        let (client, technician) =
            Self::resolve_references(db, request.client_id, request.technician_id).await?;

        let mut active: site::ActiveModel = existing.into();
        apply_request(&mut active, request);
        active.updated_at = Set(Some(Utc::now().naive_utc()));

        let updated = active.update(db).await?;
        tracing::info!(site_id = id, status = ?updated.status, "Site updated");

        Ok(SiteResponse::new(updated, client, technician))
    }

    /// Clôture: force DONE quel que soit le statut courant (idempotent)
    pub async fn close_out(db: &DatabaseConnection, id: i32) -> AppResult<SiteResponse> {
        let existing = Self::find_site(db, id).await?;
        let previous = existing.status;

        let mut active: site::ActiveModel = existing.into();
        active.status = Set(SiteStatus::Done);
        active.updated_at = Set(Some(Utc::now().naive_utc()));

        let closed = active.update(db).await?;
        tracing::info!(site_id = id, from = ?previous, "Site closed out");

        Self::embed_one(db, closed).await
    }

    /// Supprime le chantier et ses vérifications dans une même transaction
    pub async fn delete(db: &DatabaseConnection, id: i32) -> AppResult<()> {
        let txn = db.begin().await?;

        if site::Entity::find_by_id(id).one(&txn).await?.is_none() {
            return Err(AppError::NotFound { entity: "Site", id });
        }

        let removed = verification::Entity::delete_many()
            .filter(verification::Column::SiteId.eq(id))
            .exec(&txn)
            .await?;
        site::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        tracing::info!(site_id = id, verifications = removed.rows_affected, "Site deleted");
        Ok(())
    }

    async fn find_site(db: &DatabaseConnection, id: i32) -> AppResult<site::Model> {
        site::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or(AppError::NotFound { entity: "Site", id })
    }

    /// Le client est vérifié en premier: un client inconnu échoue quel que
    /// soit le technicien fourni.
    async fn resolve_references(
        db: &DatabaseConnection,
        client_id: i32,
        technician_id: i32,
    ) -> AppResult<(client::Model, technician::Model)> {
        let client = ClientService::find(db, client_id)
            .await?
            .ok_or(AppError::ReferenceNotFound { entity: "Client", id: client_id })?;

        let technician = TechnicianService::find(db, technician_id)
            .await?
            .ok_or(AppError::ReferenceNotFound { entity: "Technician", id: technician_id })?;

        Ok((client, technician))
    }

    async fn embed_one(db: &DatabaseConnection, site: site::Model) -> AppResult<SiteResponse> {
        let mut embedded = Self::embed_references(db, vec![site]).await?;
        embedded
            .pop()
            .ok_or_else(|| AppError::Internal("site lost while embedding references".to_string()))
    }

    /// Charge clients et techniciens en une requête chacun (pas de N+1),
    /// puis les associe à chaque chantier.
    async fn embed_references(
        db: &DatabaseConnection,
        sites: Vec<site::Model>,
    ) -> AppResult<Vec<SiteResponse>> {
        if sites.is_empty() {
            return Ok(Vec::new());
        }

        let client_ids: HashSet<i32> = sites.iter().map(|s| s.client_id).collect();
        let technician_ids: HashSet<i32> = sites.iter().map(|s| s.technician_id).collect();

        let clients: HashMap<i32, client::Model> = client::Entity::find()
            .filter(client::Column::Id.is_in(client_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        let technicians: HashMap<i32, technician::Model> = technician::Entity::find()
            .filter(technician::Column::Id.is_in(technician_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|t| (t.id, t))
            .collect();

        sites
            .into_iter()
            .map(|site| {
                let client = clients.get(&site.client_id).cloned().ok_or_else(|| {
                    AppError::Internal(format!("site {} references missing client {}", site.id, site.client_id))
                })?;
                let technician = technicians.get(&site.technician_id).cloned().ok_or_else(|| {
                    AppError::Internal(format!(
                        "site {} references missing technician {}",
                        site.id, site.technician_id
                    ))
                })?;
                Ok(SiteResponse::new(site, client, technician))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::pagination::{PageParams, SortSpec};
    use crate::services::verification_service::VerificationService;
    use crate::test_support::{self, Fixture};
    use assert_matches::assert_matches;
    use chrono::NaiveDate;

    fn request(fixture: &Fixture, reference: &str, address: &str) -> SiteRequest {
        SiteRequest {
            reference: reference.to_string(),
            address: address.to_string(),
            installation_type: Some("PAC air/eau".to_string()),
            intervention_date: None,
            status: None,
            client_signature: None,
            signature_date: None,
            client_id: fixture.client.id,
            technician_id: fixture.technician.id,
        }
    }

    fn page(size: u64, sort: &str) -> PageRequest {
        PageRequest::from(PageParams {
            page: Some(0),
            size: Some(size),
            sort: Some(sort.to_string()),
        })
    }

    #[actix_web::test]
    async fn test_create_defaults_to_draft_and_embeds_references() {
        let db = test_support::setup_db().await;
        let fixture = test_support::seed_references(&db).await;

        let created = SiteService::create(&db, request(&fixture, "CH-001", "3 rue des Lilas"))
            .await
            .unwrap();

        assert_eq!(created.status, SiteStatus::Draft);
        assert_eq!(created.client, fixture.client);
        assert_eq!(created.technician, fixture.technician);
        assert!(created.updated_at.is_none());
    }

    #[actix_web::test]
    async fn test_create_keeps_supplied_status() {
        let db = test_support::setup_db().await;
        let fixture = test_support::seed_references(&db).await;

        let mut req = request(&fixture, "CH-002", "Zone artisanale");
        req.status = Some(SiteStatus::InProgress);
        let created = SiteService::create(&db, req).await.unwrap();

        assert_eq!(created.status, SiteStatus::InProgress);
    }

    #[actix_web::test]
    async fn test_create_with_unknown_client_fails_whatever_the_technician() {
        let db = test_support::setup_db().await;
        let fixture = test_support::seed_references(&db).await;

        let mut req = request(&fixture, "CH-003", "Quai nord");
        req.client_id = 999;
        assert_matches!(
            SiteService::create(&db, req.clone()).await,
            Err(AppError::ReferenceNotFound { entity: "Client", id: 999 })
        );

        req.technician_id = 888;
        assert_matches!(
            SiteService::create(&db, req).await,
            Err(AppError::ReferenceNotFound { entity: "Client", id: 999 })
        );

        let all = SiteService::search(&db, &SiteFilter::default(), &PageRequest::default())
            .await
            .unwrap();
        assert_eq!(all.total_elements, 0);
    }

    #[actix_web::test]
    async fn test_create_with_unknown_technician_fails() {
        let db = test_support::setup_db().await;
        let fixture = test_support::seed_references(&db).await;

        let mut req = request(&fixture, "CH-004", "Route de Lyon");
        req.technician_id = 77;
        assert_matches!(
            SiteService::create(&db, req).await,
            Err(AppError::ReferenceNotFound { entity: "Technician", id: 77 })
        );
    }

    #[actix_web::test]
    async fn test_update_replaces_all_fields() {
        let db = test_support::setup_db().await;
        let fixture = test_support::seed_references(&db).await;
        let other_client = test_support::insert_client(&db, "Autre client").await;

        let mut req = request(&fixture, "CH-010", "Ancienne adresse");
        req.status = Some(SiteStatus::InProgress);
        req.intervention_date = NaiveDate::from_ymd_opt(2024, 5, 2);
        let created = SiteService::create(&db, req).await.unwrap();

        let mut replacement = request(&fixture, "CH-010-B", "Nouvelle adresse");
        replacement.client_id = other_client.id;
        replacement.installation_type = None;
        let updated = SiteService::update(&db, created.id, replacement).await.unwrap();

        assert_eq!(updated.reference, "CH-010-B");
        assert_eq!(updated.address, "Nouvelle adresse");
        assert_eq!(updated.installation_type, None);
        assert_eq!(updated.intervention_date, None);
        // statut absent => DRAFT, même depuis IN_PROGRESS
        assert_eq!(updated.status, SiteStatus::Draft);
        assert_eq!(updated.client, other_client);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at.is_some());
    }

    #[actix_web::test]
    async fn test_update_with_unknown_client_leaves_site_unchanged() {
        let db = test_support::setup_db().await;
        let fixture = test_support::seed_references(&db).await;
        let created = SiteService::create(&db, request(&fixture, "CH-020", "Rue haute"))
            .await
            .unwrap();

        let mut req = request(&fixture, "CH-020-MODIFIE", "Rue basse");
        req.client_id = 4242;
        assert_matches!(
            SiteService::update(&db, created.id, req).await,
            Err(AppError::ReferenceNotFound { entity: "Client", .. })
        );

        let stored = SiteService::get_by_id(&db, created.id).await.unwrap();
        assert_eq!(stored.reference, "CH-020");
        assert_eq!(stored.address, "Rue haute");
        assert!(stored.updated_at.is_none());
    }

    #[actix_web::test]
    async fn test_update_missing_site_is_not_found_before_reference_check() {
        let db = test_support::setup_db().await;
        let fixture = test_support::seed_references(&db).await;

        let mut req = request(&fixture, "X", "Y");
        req.client_id = 4242;
        assert_matches!(
            SiteService::update(&db, 555, req).await,
            Err(AppError::NotFound { entity: "Site", id: 555 })
        );
    }

    #[actix_web::test]
    async fn test_close_out_forces_done_from_any_status() {
        let db = test_support::setup_db().await;
        let fixture = test_support::seed_references(&db).await;

        for status in [SiteStatus::Draft, SiteStatus::InProgress, SiteStatus::Done] {
            let mut req = request(&fixture, "CH-030", "Chemin vert");
            req.status = Some(status);
            req.intervention_date = NaiveDate::from_ymd_opt(2024, 5, 17);
            req.client_signature = Some("J. Martin".to_string());
            req.signature_date = NaiveDate::from_ymd_opt(2024, 5, 17)
                .and_then(|d| d.and_hms_opt(16, 30, 0));
            let created = SiteService::create(&db, req).await.unwrap();
            assert!(created.updated_at.is_none());

            let closed = SiteService::close_out(&db, created.id).await.unwrap();
            assert_eq!(closed.status, SiteStatus::Done);
            assert!(closed.updated_at.is_some());

            // seuls status et updatedAt bougent
            assert_eq!(closed.id, created.id);
            assert_eq!(closed.reference, created.reference);
            assert_eq!(closed.address, created.address);
            assert_eq!(closed.installation_type, created.installation_type);
            assert_eq!(closed.intervention_date, created.intervention_date);
            assert_eq!(closed.client_signature, created.client_signature);
            assert_eq!(closed.signature_date, created.signature_date);
            assert_eq!(closed.created_at, created.created_at);
            assert_eq!(closed.client.id, created.client.id);
            assert_eq!(closed.technician.id, created.technician.id);

            let again = SiteService::close_out(&db, created.id).await.unwrap();
            assert_eq!(again.status, SiteStatus::Done);
            assert!(again.updated_at >= closed.updated_at);
        }
    }

    #[actix_web::test]
    async fn test_close_out_missing_site() {
        let db = test_support::setup_db().await;
        assert_matches!(
            SiteService::close_out(&db, 31).await,
            Err(AppError::NotFound { entity: "Site", id: 31 })
        );
    }

    #[actix_web::test]
    async fn test_delete_cascades_to_verifications() {
        let db = test_support::setup_db().await;
        let fixture = test_support::seed_references(&db).await;
        let doomed = SiteService::create(&db, request(&fixture, "CH-040", "Impasse"))
            .await
            .unwrap();
        let kept = SiteService::create(&db, request(&fixture, "CH-041", "Avenue"))
            .await
            .unwrap();

        VerificationService::create_for_site(&db, doomed.id).await.unwrap();
        VerificationService::create_for_site(&db, doomed.id).await.unwrap();
        let survivor = VerificationService::create_for_site(&db, kept.id).await.unwrap();

        SiteService::delete(&db, doomed.id).await.unwrap();

        assert_matches!(
            SiteService::get_by_id(&db, doomed.id).await,
            Err(AppError::NotFound { .. })
        );
        assert!(VerificationService::list_by_site(&db, doomed.id).await.unwrap().is_empty());
        assert_eq!(VerificationService::list_all(&db).await.unwrap(), vec![survivor]);

        assert_matches!(
            SiteService::delete(&db, doomed.id).await,
            Err(AppError::NotFound { entity: "Site", .. })
        );
    }

    #[actix_web::test]
    async fn test_search_text_matches_reference_or_address() {
        let db = test_support::setup_db().await;
        let fixture = test_support::seed_references(&db).await;
        SiteService::create(&db, request(&fixture, "ABC-1", "1 rue Pasteur")).await.unwrap();
        SiteService::create(&db, request(&fixture, "XYZ-2", "12 allée Abcd")).await.unwrap();
        SiteService::create(&db, request(&fixture, "XYZ-3", "5 place Nationale")).await.unwrap();

        let filter = SiteFilter { q: Some("abc".into()), ..Default::default() };
        let found = SiteService::search(&db, &filter, &PageRequest::default()).await.unwrap();

        let references: Vec<_> = found.content.iter().map(|s| s.reference.as_str()).collect();
        assert_eq!(references, vec!["XYZ-2", "ABC-1"]);
        assert_eq!(found.total_elements, 2);
    }

    #[actix_web::test]
    async fn test_search_text_treats_like_wildcards_literally() {
        let db = test_support::setup_db().await;
        let fixture = test_support::seed_references(&db).await;
        SiteService::create(&db, request(&fixture, "CH-1", "Rue A")).await.unwrap();
        let underscored = SiteService::create(&db, request(&fixture, "CH_2", "Rue B"))
            .await
            .unwrap();

        let search = |q: &str| SiteFilter { q: Some(q.into()), ..Default::default() };

        let found = SiteService::search(&db, &search("_"), &PageRequest::default()).await.unwrap();
        assert_eq!(found.total_elements, 1);
        assert_eq!(found.content[0].id, underscored.id);

        let found = SiteService::search(&db, &search("h_"), &PageRequest::default()).await.unwrap();
        assert_eq!(found.total_elements, 1);

        let found = SiteService::search(&db, &search("%"), &PageRequest::default()).await.unwrap();
        assert_eq!(found.total_elements, 0);
    }

    #[actix_web::test]
    async fn test_search_filters_are_combined_with_and() {
        let db = test_support::setup_db().await;
        let fixture = test_support::seed_references(&db).await;
        let day = NaiveDate::from_ymd_opt(2024, 9, 12);

        let mut a = request(&fixture, "ABC-1", "Nord");
        a.status = Some(SiteStatus::Done);
        a.intervention_date = day;
        let a = SiteService::create(&db, a).await.unwrap();

        let mut b = request(&fixture, "ABC-2", "Sud");
        b.status = Some(SiteStatus::Done);
        SiteService::create(&db, b).await.unwrap();

        let mut c = request(&fixture, "ABC-3", "Est");
        c.intervention_date = day;
        SiteService::create(&db, c).await.unwrap();

        let filter = SiteFilter {
            q: Some("abc".into()),
            status: Some(SiteStatus::Done),
            intervention_date: day,
        };
        let found = SiteService::search(&db, &filter, &PageRequest::default()).await.unwrap();

        assert_eq!(found.total_elements, 1);
        assert_eq!(found.content[0].id, a.id);

        let only_status = SiteFilter { status: Some(SiteStatus::Done), ..Default::default() };
        let found = SiteService::search(&db, &only_status, &PageRequest::default()).await.unwrap();
        assert_eq!(found.total_elements, 2);
    }

    #[actix_web::test]
    async fn test_search_pagination_metadata() {
        let db = test_support::setup_db().await;
        let fixture = test_support::seed_references(&db).await;
        for i in 0..5 {
            SiteService::create(&db, request(&fixture, &format!("CH-{i}"), "Lotissement"))
                .await
                .unwrap();
        }

        let first = SiteService::search(&db, &SiteFilter::default(), &page(2, "id,desc"))
            .await
            .unwrap();
        assert_eq!(first.content.len(), 2);
        assert_eq!(first.total_elements, 5);
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.number, 0);
        assert_eq!(first.size, 2);

        let mut last_page = page(2, "id,desc");
        last_page.page = 2;
        let last = SiteService::search(&db, &SiteFilter::default(), &last_page).await.unwrap();
        assert_eq!(last.content.len(), 1);
    }

    #[actix_web::test]
    async fn test_sort_direction_changes_order_only() {
        let db = test_support::setup_db().await;
        let fixture = test_support::seed_references(&db).await;
        for i in 0..4 {
            SiteService::create(&db, request(&fixture, &format!("CH-{i}"), "Rue"))
                .await
                .unwrap();
        }

        let desc = SiteService::search(&db, &SiteFilter::default(), &PageRequest::default())
            .await
            .unwrap();
        let asc = SiteService::search(&db, &SiteFilter::default(), &page(20, "id,ASC"))
            .await
            .unwrap();

        let desc_ids: Vec<i32> = desc.content.iter().map(|s| s.id).collect();
        let mut asc_ids: Vec<i32> = asc.content.iter().map(|s| s.id).collect();
        assert!(desc_ids.windows(2).all(|w| w[0] > w[1]));
        asc_ids.reverse();
        assert_eq!(asc_ids, desc_ids);
    }

    #[actix_web::test]
    async fn test_search_rejects_unknown_sort_field() {
        let db = test_support::setup_db().await;
        let mut bad = PageRequest::default();
        bad.sort = SortSpec::parse("clientSignature;drop,asc");

        assert_matches!(
            SiteService::search(&db, &SiteFilter::default(), &bad).await,
            Err(AppError::Validation(_))
        );
    }
}
