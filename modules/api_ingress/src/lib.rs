//! HTTP ingress: the middleware stack every request passes through, the
//! health route, the 404 fallback and the graceful serve loop.

use std::future::Future;

use anyhow::{Context, Result};
use axum::{
    http::{header, HeaderValue},
    middleware::{from_fn, map_response},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
};

pub mod config;
pub mod request_id;
pub mod web;

pub use config::ApiIngressConfig;

/// Wrap the module routes with `/health`, the 404 fallback and the middleware stack.
///
/// Order, outermost to innermost:
/// SetRequestId -> PropagateRequestId -> Trace -> push_req_id_to_extensions
/// -> envelope_bare_errors -> Timeout -> CORS -> BodyLimit -> security headers
pub fn build_router(config: &ApiIngressConfig, api: Router) -> Router {
    tracing::debug!(?config, "Building router");
    let x_request_id = request_id::header();

    let mut router = Router::new()
        .route("/health", get(web::health_check))
        .merge(api)
        .fallback(web::route_not_found)
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        .layer(RequestBodyLimitLayer::new(config.body_limit_bytes));

    if config.cors_enabled {
        router = router.layer(CorsLayer::permissive());
    }

    router
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(map_response(web::envelope_bare_errors))
        .layer(from_fn(request_id::push_req_id_to_extensions))
        .layer(request_id::create_trace_layer())
        .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
        .layer(SetRequestIdLayer::new(x_request_id, request_id::MakeReqId))
}

/// Bind the listening socket; `bind_addr` from config wins over `host:port`.
pub async fn bind(config: &ApiIngressConfig, host: &str, port: u16) -> Result<TcpListener> {
    let addr = config
        .bind_addr
        .clone()
        .unwrap_or_else(|| format!("{host}:{port}"));
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind HTTP listener on {addr}"))?;
    tracing::info!("HTTP server bound on {}", listener.local_addr()?);
    Ok(listener)
}

/// Serve until `shutdown` resolves, then drain in-flight requests.
pub async fn serve<F>(listener: TcpListener, router: Router, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            shutdown.await;
            tracing::info!("HTTP server shutting down gracefully");
        })
        .await
        .map_err(|e| anyhow::anyhow!(e))
}
