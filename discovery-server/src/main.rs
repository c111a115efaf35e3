use discovery_server::config::{AppConfig, BackendSource};
use discovery_server::discovery::SessionRegistry;
use discovery_server::providers::{Backend, BackendClient, MockBackend};
use discovery_server::web::{AppState, create_router};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "discovery_server=info,tower_http=info";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = AppConfig::from_env().expect("Invalid configuration");

    let backend = match &config.backend {
        BackendSource::Mock(dir) => {
            let mock = MockBackend::new(dir).expect("Failed to load mock data");
            info!(
                dir = %dir.display(),
                merchants = mock.merchant_count(),
                "using mock backend"
            );
            Backend::Mock(mock)
        }
        BackendSource::Http(backend_config) => {
            info!(base_url = %backend_config.base_url, "using HTTP backend");
            let client =
                BackendClient::new(backend_config.clone()).expect("Failed to create backend client");
            Backend::Http(client)
        }
    };

    // Build app state
    let state = AppState::new(
        backend,
        config.discovery.clone(),
        config.route.clone(),
        &config.cache,
        SessionRegistry::with_max_sessions(config.session_idle, config.max_sessions),
    );

    // Create router
    let app = create_router(state);

    // Bind and serve
    let addr = config.bind_addr;
    info!("Discovery server listening on http://{addr}");
    info!("API Endpoints:");
    info!("  GET  /health              - Health check");
    info!("  POST /discovery/location  - Record a location fix");
    info!("  POST /discovery/nearby    - Merchants around the viewport");
    info!("  GET  /places/:place_id    - Place details");
    info!("  GET  /route/leg           - Route alternatives for one mode");
    info!("  POST /route/course        - Multi-stop course");
    info!("  GET  /geocode             - Address lookup");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app).await.expect("Server error");
}
