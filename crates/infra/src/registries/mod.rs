pub mod batch;
pub mod clubs;
pub mod partner;
pub mod players;
pub mod tournaments;

pub use batch::BatchLeveller;
pub use clubs::ClubRegistry;
pub use partner::PartnerLinkKeeper;
pub use players::PlayerRegistry;
pub use tournaments::{TournamentInput, TournamentRegistry};
