use std::sync::Arc;

use rentora_assistant::KnowledgeBase;
use rentora_core::auth::TokenService;
use rentora_core::catalogue::assemble_catalogue;
use rentora_core::config::AppConfig;
use rentora_core::domain::vehicle::Vehicle;
use rentora_core::workflow::{RequestStore, RequestWorkflow};
use rentora_store::{
    JsonStore, RequestRepository, ReservationRepository, TrafficLog, VehicleRepository,
};

/// Everything the handlers share: the configuration, one store per process,
/// the repositories over it, and the operator token service. Constructed once
/// at bootstrap and passed by dependency injection, so the tolerant-read
/// corruption policy lives in exactly one place (the store).
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<JsonStore>,
    pub reservations: ReservationRepository,
    pub requests: RequestRepository,
    pub vehicles: VehicleRepository,
    pub traffic: TrafficLog,
    pub tokens: Arc<TokenService>,
    pub knowledge: Arc<KnowledgeBase>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let store = Arc::new(JsonStore::new(config.storage.data_dir.clone()));
        let tokens =
            Arc::new(TokenService::new(&config.auth.token_secret, config.auth.access_ttl_secs));

        Self {
            config: Arc::new(config),
            reservations: ReservationRepository::new(store.clone()),
            requests: RequestRepository::new(store.clone()),
            vehicles: VehicleRepository::new(store.clone()),
            traffic: TrafficLog::new(store.clone()),
            store,
            tokens,
            knowledge: Arc::new(KnowledgeBase::default()),
        }
    }

    /// The catalogue as the public site sees it right now: built-in fleet,
    /// operator overrides, admin-added vehicles, then accepted-request
    /// projections.
    pub fn catalogue(&self) -> Vec<Vehicle> {
        assemble_catalogue(
            &rentora_store::fixtures::base_fleet(),
            &self.vehicles.overrides(),
            &self.vehicles.list(),
            &self.requests.list(),
        )
    }

    pub fn workflow(&self) -> RequestWorkflow<RequestRepository> {
        RequestWorkflow::new(self.requests.clone())
    }
}
