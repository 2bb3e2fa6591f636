pub mod query;
pub mod client_service;
pub mod technician_service;
pub mod site_service;
pub mod verification_service;
