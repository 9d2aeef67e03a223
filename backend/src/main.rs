//! Portal entry-point: configuration, adapter wiring and server start-up.

use std::sync::Arc;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use actix_web::web;
use mockable::{Clock, DefaultClock};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use portal_backend::config::{PortalSettings, StoreBackend};
use portal_backend::domain::ports::{
    AnnouncementRepository, AuthProvider, DocumentRequestRepository, ResidentRepository,
    StaffDirectory,
};
use portal_backend::domain::{
    AnnouncementBoard, DocumentRequestService, RegistrationService, ReportService, SessionManager,
};
use portal_backend::inbound::http::health::HealthState;
use portal_backend::inbound::http::state::HttpState;
use portal_backend::outbound::{HttpDocumentStore, MemoryAuthProvider, MemoryStore};
use portal_backend::server::{create_server, ServerConfig};

const STORE_TIMEOUT: Duration = Duration::from_secs(10);

struct Adapters {
    residents: Arc<dyn ResidentRepository>,
    requests: Arc<dyn DocumentRequestRepository>,
    announcements: Arc<dyn AnnouncementRepository>,
    staff: Arc<dyn StaffDirectory>,
}

fn build_adapters(
    settings: &PortalSettings,
    clock: Arc<dyn Clock>,
) -> std::io::Result<Adapters> {
    match settings.store_backend {
        StoreBackend::Memory => {
            warn!("using the in-memory store; data is lost on restart");
            let store = Arc::new(MemoryStore::new(clock));
            Ok(Adapters {
                residents: store.clone(),
                requests: store.clone(),
                announcements: store.clone(),
                staff: store,
            })
        }
        StoreBackend::Http => {
            let url = settings.store_url.as_deref().ok_or_else(|| {
                std::io::Error::other("PORTAL_STORE_URL is required for the http store backend")
            })?;
            let base = url
                .parse()
                .map_err(|e| std::io::Error::other(format!("invalid store url {url}: {e}")))?;
            let store = HttpDocumentStore::new(base, STORE_TIMEOUT)
                .map_err(|e| std::io::Error::other(format!("store client: {e}")))?;
            let store = Arc::new(store);
            info!(url, "using the document-store gateway");
            Ok(Adapters {
                residents: store.clone(),
                requests: store.clone(),
                announcements: store.clone(),
                staff: store,
            })
        }
    }
}

fn load_session_key(settings: &PortalSettings) -> std::io::Result<Key> {
    let key_path = settings.session_key_file();
    match std::fs::read(&key_path) {
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(e) => {
            if cfg!(debug_assertions) {
                warn!(path = %key_path.display(), error = %e, "using temporary session key (dev only)");
                Ok(Key::generate())
            } else {
                Err(std::io::Error::other(format!(
                    "failed to read session key at {}: {e}",
                    key_path.display()
                )))
            }
        }
    }
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = PortalSettings::load()
        .map_err(|e| std::io::Error::other(format!("configuration: {e}")))?;
    let key = load_session_key(&settings)?;

    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let adapters = build_adapters(&settings, Arc::clone(&clock))?;

    // Identity accounts live in process; the auth provider reports "signed
    // out" immediately since no provider session survives a restart.
    let auth: Arc<dyn AuthProvider> = {
        let provider = Arc::new(MemoryAuthProvider::new());
        provider.resolve_signed_out();
        provider
    };

    let sessions = Arc::new(SessionManager::new(
        Arc::clone(&auth),
        Arc::clone(&adapters.staff),
        Arc::clone(&adapters.residents),
    ));
    sessions.initialize();

    let http_state = HttpState {
        sessions,
        registration: Arc::new(RegistrationService::new(
            auth,
            Arc::clone(&adapters.staff),
            Arc::clone(&adapters.residents),
            Arc::clone(&clock),
        )),
        requests: Arc::new(DocumentRequestService::new(
            Arc::clone(&adapters.requests),
            Arc::clone(&clock),
        )),
        reports: Arc::new(ReportService::new(
            Arc::clone(&adapters.residents),
            Arc::clone(&adapters.requests),
            Arc::clone(&clock),
        )),
        board: Arc::new(AnnouncementBoard::new(
            Arc::clone(&adapters.announcements),
            settings.undo_window(),
        )),
        residents: adapters.residents,
        staff: adapters.staff,
        announcements: adapters.announcements,
        clock,
    };

    let health_state = web::Data::new(HealthState::new());
    let config = ServerConfig::new(
        key,
        settings.cookie_secure,
        SameSite::Lax,
        settings.bind_addr(),
    );
    info!(addr = %config.bind_addr(), "starting portal server");
    create_server(health_state, config, http_state)?.await
}
