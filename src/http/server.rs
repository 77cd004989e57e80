//! HTTP server setup and the edge pipeline.
//!
//! # Responsibilities
//! - Create the Axum Router with the single edge handler
//! - Configure HTTP/1.1 and HTTP/2 support
//! - Wire up middleware (timeout, body limit, request ID, trace,
//!   concurrency limit)
//! - Run the pipeline: health → normalize → enforce → classify → act
//! - Serve static assets with computed cache headers
//! - Forward dynamic requests to the backend
//! - Observability (metrics, request IDs) at every exit
//!
//! # Design Decisions
//! - One handler, explicit pipeline order; security can never be
//!   shadowed by a routing rule
//! - Routing state is swapped atomically on reload; a request uses the
//!   state it loaded for its whole lifetime
//! - The outer timeout layer sits above the dispatcher timeout, so
//!   upstream timeouts surface as 504, not 408

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header, HeaderValue, Method, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::assets::cache_policy::CachePolicy;
use crate::assets::store::StaticStore;
use crate::config::EdgeConfig;
use crate::error::EdgeError;
use crate::health;
use crate::http::request::{self, UuidRequestId, X_REQUEST_ID};
use crate::http::response::static_asset_response;
use crate::observability::metrics;
use crate::routing::rules::{CompileError, RouteAction, RuleTable};
use crate::routing::{classify, normalize_path};
use crate::security::enforcer::{Enforcer, EnforcerError, Verdict};
use crate::upstream::dispatcher::Dispatcher;

/// Error type for building routing state from configuration.
#[derive(Debug, Error)]
pub enum StateBuildError {
    #[error("rule table: {0}")]
    Rules(#[from] CompileError),

    #[error("security rules: {0}")]
    Security(#[from] EnforcerError),

    #[error("cache policy: {0}")]
    CachePolicy(#[from] regex::Error),

    #[error("upstream address: {0}")]
    Upstream(#[from] axum::http::uri::InvalidUri),
}

/// Everything classification needs, compiled from one config snapshot.
///
/// Swapped as a unit on reload so a request never sees a half-updated
/// view.
pub struct RouteState {
    pub rules: RuleTable,
    pub enforcer: Enforcer,
    pub cache: CachePolicy,
}

impl RouteState {
    /// Compile routing, security, and cache state from configuration.
    pub fn compile(config: &EdgeConfig) -> Result<Self, StateBuildError> {
        Ok(Self {
            rules: RuleTable::from_config(&config.routes, &config.upstream)?,
            enforcer: Enforcer::from_config(&config.security)?,
            cache: CachePolicy::from_config(&config.static_assets)?,
        })
    }
}

/// Application state injected into the handler.
#[derive(Clone)]
pub struct AppState {
    pub route_state: Arc<ArcSwap<RouteState>>,
    pub store: StaticStore,
    pub dispatcher: Arc<Dispatcher>,
    pub health_path: Arc<str>,
}

/// HTTP server for the edge router.
pub struct HttpServer {
    router: Router,
    config: EdgeConfig,
    route_state: Arc<ArcSwap<RouteState>>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: EdgeConfig) -> Result<Self, StateBuildError> {
        let route_state = Arc::new(ArcSwap::from_pointee(RouteState::compile(&config)?));
        let dispatcher = Arc::new(Dispatcher::from_config(&config.upstream)?);
        let store = StaticStore::new(&config.static_assets.document_root);

        let state = AppState {
            route_state: route_state.clone(),
            store,
            dispatcher,
            health_path: config.health.path.as_str().into(),
        };

        let router = Self::build_router(&config, state);
        Ok(Self {
            router,
            config,
            route_state,
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &EdgeConfig, state: AppState) -> Router {
        // Dispatcher timeout fires first; this layer is the backstop.
        let outer_timeout = Duration::from_secs(config.upstream.timeout_secs.saturating_add(5));

        Router::new()
            .route("/{*path}", any(edge_handler))
            .route("/", any(edge_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(outer_timeout))
            .layer(RequestBodyLimitLayer::new(config.upstream.max_body_bytes))
            .layer(PropagateRequestIdLayer::new(
                header::HeaderName::from_static(X_REQUEST_ID),
            ))
            .layer(SetRequestIdLayer::new(
                header::HeaderName::from_static(X_REQUEST_ID),
                UuidRequestId,
            ))
            .layer(TraceLayer::new_for_http())
            .layer(SetResponseHeaderLayer::if_not_present(
                header::SERVER,
                HeaderValue::from_static("edge-router"),
            ))
            .layer(GlobalConcurrencyLimitLayer::new(config.listener.max_connections))
    }

    /// The swappable routing state, for the reload task.
    pub fn route_state(&self) -> Arc<ArcSwap<RouteState>> {
        self.route_state.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &EdgeConfig {
        &self.config
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            rules = self.route_state.load().rules.len(),
            "HTTP server starting"
        );

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Main edge handler. Runs the full pipeline for one request.
async fn edge_handler(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request<Body>,
) -> Response {
    let start = Instant::now();
    let request_id = request::request_id(&request);
    let method = request.method().clone();
    let method_str = method.to_string();
    let raw_path = request.uri().path().to_string();

    // Liveness probe: fixed path, no security or classification.
    if raw_path == *state.health_path {
        let response = health::respond(&method);
        metrics::record_request(&method_str, response.status().as_u16(), "health", start);
        return response;
    }

    // Query is stripped for matching and forwarded untouched.
    let path = match normalize_path(&raw_path) {
        Ok(path) => path,
        Err(e) => return reject(e, &request_id, &method_str, &raw_path, start),
    };

    let route_state = state.route_state.load_full();

    if let Verdict::Deny(status) = route_state.enforcer.check(&path) {
        tracing::warn!(
            request_id = %request_id,
            path = %path,
            status = %status,
            "Security rule denied request"
        );
        metrics::record_request(&method_str, status.as_u16(), "deny", start);
        return EdgeError::SecurityDenied.into_response();
    }

    let rule = classify(&path, &route_state.rules);
    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        rule = %rule.name,
        "Request classified"
    );

    match &rule.action {
        RouteAction::ServeStatic { asset_class } => {
            match serve_static(&state, &route_state, &path, asset_class, &method).await {
                Ok(response) => {
                    metrics::record_request(
                        &method_str,
                        response.status().as_u16(),
                        "static",
                        start,
                    );
                    response
                }
                Err(e) => reject(e, &request_id, &method_str, &path, start),
            }
        }
        RouteAction::Dispatch { entry_script } => {
            let client_addr = addr.ip().to_string();
            match state
                .dispatcher
                .dispatch(request, &path, entry_script, &client_addr, &request_id)
                .await
            {
                Ok(response) => {
                    metrics::record_request(
                        &method_str,
                        response.status().as_u16(),
                        "dispatch",
                        start,
                    );
                    response.into_response()
                }
                Err(e) => {
                    metrics::record_upstream_failure(e.kind());
                    reject(e.into(), &request_id, &method_str, &path, start)
                }
            }
        }
        RouteAction::Deny { status } => {
            tracing::warn!(
                request_id = %request_id,
                path = %path,
                rule = %rule.name,
                status = %status,
                "Routing rule denied request"
            );
            metrics::record_request(&method_str, status.as_u16(), "deny", start);
            EdgeError::SecurityDenied.into_response()
        }
    }
}

/// Serve a static asset with cache headers, or fail with NotFound.
async fn serve_static(
    state: &AppState,
    route_state: &RouteState,
    path: &str,
    asset_class: &str,
    method: &Method,
) -> Result<Response, EdgeError> {
    if *method != Method::GET && *method != Method::HEAD {
        return Ok((StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed").into_response());
    }

    let asset = match state.store.get(path).await {
        Ok(Some(asset)) => asset,
        Ok(None) => return Err(EdgeError::NotFound),
        Err(e) => {
            tracing::error!(path = %path, error = %e, "Static store read failed");
            return Err(EdgeError::NotFound);
        }
    };

    let cache = route_state.cache.compute(path, asset_class);
    Ok(static_asset_response(asset, &cache, *method == Method::HEAD))
}

/// Log, record, and convert a pipeline error into a response.
fn reject(
    error: EdgeError,
    request_id: &str,
    method: &str,
    path: &str,
    start: Instant,
) -> Response {
    let status = error.status();
    if status.is_server_error() {
        tracing::error!(
            request_id = %request_id,
            path = %path,
            status = %status,
            error = %error,
            "Request failed"
        );
    } else {
        tracing::warn!(
            request_id = %request_id,
            path = %path,
            status = %status,
            error = %error,
            "Request rejected"
        );
    }
    metrics::record_request(method, status.as_u16(), error.kind(), start);
    error.into_response()
}
