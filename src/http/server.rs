//! HTTP server setup.
//!
//! # Responsibilities
//! - Create Axum Router with a single catch-all handler
//! - Wire up middleware (request ID, tracing, panic capture, timeout, body limit)
//! - Bind server to listener and stop on the shutdown broadcast
//! - Hand each request to the dispatcher and map faults to 500

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast::{self, error::RecvError};
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::dispatch::Dispatcher;
use crate::http::request::{DispatchRequest, MakeRequestUuid};
use crate::routing::PageTree;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Dispatcher,
}

/// HTTP front end for a page tree.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
}

impl HttpServer {
    /// Create a new HTTP server serving `tree`.
    pub fn new(config: ServerConfig, tree: PageTree) -> Self {
        tracing::info!(pages = tree.len(), "Page tree compiled");

        let state = AppState {
            dispatcher: Dispatcher::new(tree),
        };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        let middleware = ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(CatchPanicLayer::new())
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )));

        Router::new()
            .route("/", any(dispatch_handler))
            .route("/{*path}", any(dispatch_handler))
            .with_state(state)
            .layer(DefaultBodyLimit::max(config.limits.max_body_size))
            .layer(middleware)
    }

    /// The fully layered router, for driving in-process with `oneshot`.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until the shutdown broadcast fires. A channel whose
    /// senders are all dropped is not a shutdown request.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                match shutdown.recv().await {
                    Ok(()) | Err(RecvError::Lagged(_)) => {
                        tracing::info!("Shutdown signal received, draining connections");
                    }
                    Err(RecvError::Closed) => {
                        // Every sender is gone, so no shutdown can arrive any more.
                        tracing::warn!("Shutdown channel closed without a signal, serving on");
                        std::future::pending::<()>().await;
                    }
                }
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

/// Catch-all handler: every method and path goes through the dispatcher.
async fn dispatch_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request = DispatchRequest::from_parts(method, &uri, headers, body);

    match state.dispatcher.dispatch(request) {
        Ok(response) => response.into_response(),
        Err(fault) => {
            tracing::error!(uri = %uri, error = %fault, "Handler fault");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::ResponseSignal;
    use crate::page::{BoundArgs, HandlerFault, HandlerResult, HandlerSignature, Page, PageContext};
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    struct Echo;

    impl Page for Echo {
        fn index_signature(&self) -> Option<HandlerSignature> {
            Some(HandlerSignature::new().optional("word", "quiet"))
        }

        fn index(&self, _ctx: &mut PageContext<'_>, args: &BoundArgs) -> HandlerResult {
            match args.get_or("word", "quiet") {
                "fault" => Err(HandlerFault::new("asked to fail")),
                "panic" => panic!("asked to panic"),
                word => Ok(ResponseSignal::rendered(word.to_string())),
            }
        }
    }

    fn server() -> HttpServer {
        HttpServer::new(ServerConfig::default(), PageTree::new(Echo).unwrap())
    }

    async fn get(uri: &str) -> Response {
        server()
            .router()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_rendered_page_is_200_with_request_id() {
        let response = get("/?word=loud").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_fault_is_500() {
        let response = get("/?word=fault").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_closed_shutdown_channel_keeps_serving() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let shutdown = crate::Shutdown::new();
        let receiver = shutdown.subscribe();
        drop(shutdown);

        let handle = tokio::spawn(server().run(listener, receiver));
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!handle.is_finished());

        let response = reqwest::get(format!("http://{addr}/?word=still"))
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        assert_eq!(response.text().await.unwrap(), "still");

        handle.abort();
    }

    #[tokio::test]
    async fn test_panic_is_500() {
        let response = get("/?word=panic").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_unknown_segment_is_404() {
        let response = get("/nothing/here").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
