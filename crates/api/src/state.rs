use std::sync::Arc;

use infra::audit::AuditLog;
use infra::registries::{
    BatchLeveller, ClubRegistry, PlayerRegistry, TournamentRegistry,
};
use infra::store::DocumentStore;

use crate::auth::{AuthConfig, IdentityService, JwtService};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    jwt_service: JwtService,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>) -> anyhow::Result<Self> {
        let auth_config = AuthConfig::from_env()?;
        let jwt_service = JwtService::new(&auth_config);

        Ok(Self { store, jwt_service })
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }

    pub fn players(&self) -> PlayerRegistry {
        PlayerRegistry::new(self.store.clone())
    }

    pub fn clubs(&self) -> ClubRegistry {
        ClubRegistry::new(self.store.clone())
    }

    pub fn tournaments(&self) -> TournamentRegistry {
        TournamentRegistry::new(self.store.clone())
    }

    pub fn batch_leveller(&self) -> BatchLeveller {
        BatchLeveller::new(self.store.clone())
    }

    pub fn audit(&self) -> AuditLog {
        AuditLog::new(self.store.clone())
    }

    pub fn identity(&self) -> IdentityService {
        IdentityService::new(self.store.clone(), self.jwt_service.clone())
    }
}
