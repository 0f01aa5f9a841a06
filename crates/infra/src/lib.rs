pub mod audit;
pub mod dashboard;
pub mod models;
pub mod ops;
pub mod refdata;
pub mod registries;
pub mod store;

pub use audit::AuditLog;
pub use ops::{DomainError, PlayerInput, ValidationErrors};
pub use registries::{
    BatchLeveller, ClubRegistry, PartnerLinkKeeper, PlayerRegistry, TournamentInput,
    TournamentRegistry,
};
pub use store::{DocumentStore, MemoryStore, PgStore};
