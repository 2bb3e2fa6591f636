// ============================================================================
// MODELS - MODULE PRINCIPAL
// ============================================================================
//
// Description:
//   Point d'entrée pour tous les modèles de données.
//   Chaque modèle correspond à une table PostgreSQL avec SeaORM.
//
// Liste des modules:
//   - health : Health check API
//   - client : Clients (propriétaires des chantiers)
//   - technician : Techniciens assignés aux chantiers
//   - site : Chantiers (référence, adresse, statut, signature)
//   - verification : Vérifications rattachées à un chantier
//   - dto : Data Transfer Objects pour les requêtes/réponses API
//   - pagination : Paramètres de page/tri et enveloppe Page<T>
//
// Points d'attention:
//   - Les relations sont des clés étrangères explicites (client_id, technician_id, site_id)
//   - Les timestamps sont posés par les services, pas par des hooks
//   - verifications.site_id est en ON DELETE CASCADE
//
// ============================================================================

pub mod health;
pub mod client;
pub mod technician;
pub mod site;
pub mod verification;
pub mod dto;
pub mod pagination;
