use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{delete, get, post, put},
};
use carebook_auth::token::CookieSettings;
use carebook_auth::http as auth_http;
use carebook_auth::{AuthState, JwtService, TokenIssuer};
use carebook_db_memory::InMemoryStorage;
use carebook_db_postgres::PostgresStorage;
use carebook_media::{CloudinaryStore, DisabledStore, DynBlobStore};
use carebook_storage::{
    AppointmentStorage, DynAppointmentStorage, DynMessageStorage, DynUserStorage, MessageStorage,
    UserStorage,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::{AppConfig, StorageBackend};
use crate::handlers::{appointments, doctors, health, messages, users};
use crate::state::AppState;
use crate::{metrics, middleware as app_middleware};

pub struct CarebookServer {
    addr: SocketAddr,
    app: Router,
}

type Stores = (DynUserStorage, DynMessageStorage, DynAppointmentStorage);

fn split_stores<S>(storage: Arc<S>) -> Stores
where
    S: UserStorage + MessageStorage + AppointmentStorage + 'static,
{
    (storage.clone(), storage.clone(), storage)
}

/// Connects the configured backends and assembles handler state.
pub async fn build_state(cfg: &AppConfig) -> anyhow::Result<AppState> {
    let (users, messages, appointments) = match cfg.storage.backend {
        StorageBackend::Memory => {
            tracing::info!("Using in-memory storage");
            split_stores(Arc::new(InMemoryStorage::new()))
        }
        StorageBackend::Postgres => {
            let pg_config = cfg.storage.postgres_config().ok_or_else(|| {
                anyhow::anyhow!("storage.{}_url is not set", cfg.storage.active.as_str())
            })?;
            tracing::info!(active = %cfg.storage.active.as_str(), "Connecting to PostgreSQL");
            split_stores(Arc::new(PostgresStorage::new(pg_config).await?))
        }
    };

    let blobs: DynBlobStore = if cfg.media.is_configured() {
        Arc::new(CloudinaryStore::new(cfg.media.clone())?)
    } else {
        tracing::warn!("Cloudinary credentials not configured; doctor avatar uploads will fail");
        Arc::new(DisabledStore)
    };

    let jwt_service = Arc::new(JwtService::new(
        cfg.auth.jwt_secret.as_bytes(),
        cfg.auth.token_lifetime,
    ));
    let issuer = TokenIssuer::new(jwt_service.clone(), CookieSettings::from_config(&cfg.auth));
    let auth = AuthState::new(jwt_service, users.clone(), issuer);

    Ok(AppState {
        auth,
        users,
        messages,
        appointments,
        blobs,
    })
}

fn api_routes() -> Router<AppState> {
    Router::new()
        // Accounts
        .route("/user/patient/register", post(users::patient_register))
        .route("/user/login", post(users::login))
        .route("/user/admin/addnew", post(users::add_new_admin))
        .route("/user/me", get(users::get_user_details))
        .route("/user/admin/me", get(users::get_admin_details))
        .route("/user/patient/me", get(users::get_patient_details))
        .route("/user/admin/logout", get(auth_http::logout_admin))
        .route("/user/patient/logout", get(auth_http::logout_patient))
        // Doctors
        .route("/user/doctor/addnew", post(doctors::add_new_doctor))
        .route("/user/doctors", get(doctors::get_all_doctors))
        .route("/user/doctor/{id}", delete(doctors::delete_doctor))
        // Messages
        .route("/message/send", post(messages::send_message))
        .route("/message/getall", get(messages::get_all_messages))
        // Appointments
        .route("/appointment/post", post(appointments::post_appointment))
        .route("/appointment/getall", get(appointments::get_all_appointments))
        .route(
            "/appointment/update/{id}",
            put(appointments::update_appointment_status),
        )
        .route(
            "/appointment/delete/{id}",
            delete(appointments::delete_appointment),
        )
}

fn cors_layer(cfg: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = cfg
        .server
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
}

/// Builds the router around an existing state.
pub fn build_router(cfg: &AppConfig, state: AppState) -> Router {
    let body_limit = cfg.server.body_limit_bytes;
    Router::new()
        .route("/healthz", get(health::healthz))
        .route("/metrics", get(health::prometheus_metrics))
        .nest("/api/v1", api_routes())
        .with_state(state)
        // Middleware stack, innermost first: metrics -> cors -> trace -> request id -> body limit
        .layer(middleware::from_fn(app_middleware::track_metrics))
        .layer(cors_layer(cfg))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    use tracing::field::Empty;
                    let req_id = req
                        .extensions()
                        .get::<app_middleware::RequestId>()
                        .map(|id| id.as_str().to_string())
                        .unwrap_or_default();
                    tracing::info_span!(
                        "http.request",
                        http.method = %req.method(),
                        http.target = %req.uri(),
                        http.status_code = Empty,
                        request_id = %req_id
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>, latency: std::time::Duration, span: &tracing::Span| {
                        span.record("http.status_code", tracing::field::display(res.status().as_u16()));
                        tracing::info!(
                            http.status = %res.status().as_u16(),
                            elapsed_ms = %latency.as_millis(),
                            "request handled"
                        );
                    },
                ),
        )
        .layer(middleware::from_fn(app_middleware::request_id))
        .layer(axum::extract::DefaultBodyLimit::max(body_limit))
}

pub async fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    metrics::init_metrics();
    let state = build_state(cfg).await?;
    Ok(build_router(cfg, state))
}

pub struct ServerBuilder {
    addr: SocketAddr,
    config: AppConfig,
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerBuilder {
    pub fn new() -> Self {
        let cfg = AppConfig::default();
        Self {
            addr: cfg.addr(),
            config: cfg,
        }
    }

    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }

    pub fn with_config(mut self, cfg: AppConfig) -> Self {
        self.addr = cfg.addr();
        self.config = cfg;
        self
    }

    pub async fn build(self) -> anyhow::Result<CarebookServer> {
        let app = build_app(&self.config).await?;
        Ok(CarebookServer {
            addr: self.addr,
            app,
        })
    }
}

impl CarebookServer {
    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    // Wait for Ctrl+C
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
