//! Matchit routing configuration.

use std::sync::Arc;

use hyper::{body::Bytes, Method, Request, Response};
use matchit::Router as MatchitRouter;
use task_query_core::{QueryConfig, QueryError, VariableQueryService};

use crate::handlers;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Query orchestration over the store and security gate
    pub service: VariableQueryService,
    /// Query configuration
    pub config: Arc<QueryConfig>,
}

/// HTTP request router.
pub struct Router {
    inner: MatchitRouter<RouteHandler>,
    state: AppState,
}

impl Router {
    /// Creates a new router with default routes.
    pub fn new(service: VariableQueryService, config: Arc<QueryConfig>) -> Self {
        let mut router = MatchitRouter::new();

        // Task variable endpoints
        router
            .insert("/v1/tasks/{task_id}/variables", RouteHandler::TaskVariables)
            .expect("Failed to insert /v1/tasks/{task_id}/variables route");
        // Empty id segment; reaches the handler so it is rejected as InvalidTaskId
        router
            .insert("/v1/tasks//variables", RouteHandler::TaskVariables)
            .expect("Failed to insert /v1/tasks//variables route");

        Self {
            inner: router,
            state: AppState { service, config },
        }
    }

    pub fn config(&self) -> &QueryConfig {
        &self.state.config
    }

    /// Routes an incoming request to the appropriate handler.
    ///
    /// # Arguments
    /// * `req` - HTTP request
    ///
    /// # Returns
    /// `Result<Response<Bytes>, RouterError>` containing the response or an error.
    pub async fn route<B>(&self, req: Request<B>) -> Result<Response<Bytes>, RouterError> {
        let path = req.uri().path().to_string();

        match self.inner.at(&path) {
            Ok(matched) => {
                let handler = matched.value;
                handler
                    .handle(req, matched.params, self.state.clone())
                    .await
            }
            Err(_) => Err(RouterError::NotFound(format!(
                "No route found for {}",
                path
            ))),
        }
    }
}

/// Route handler function.
enum RouteHandler {
    TaskVariables,
}

impl RouteHandler {
    /// Handles a request with the given route parameters.
    async fn handle<B>(
        &self,
        req: Request<B>,
        params: matchit::Params<'_, '_>,
        state: AppState,
    ) -> Result<Response<Bytes>, RouterError> {
        match self {
            RouteHandler::TaskVariables => {
                if req.method() == Method::GET {
                    handlers::list_task_variables(req, params, state).await
                } else {
                    Err(RouterError::MethodNotAllowed)
                }
            }
        }
    }
}

/// Router error type.
#[derive(Debug)]
pub enum RouterError {
    MethodNotAllowed,
    InternalError(String),
    Timeout,
    BadRequest(String),
    NotFound(String),
    /// Failure reported by the query core
    Query(QueryError),
}

impl RouterError {
    /// HTTP status code for this error.
    pub fn status(&self) -> u16 {
        match self {
            RouterError::MethodNotAllowed => 405,
            RouterError::InternalError(_) => 500,
            RouterError::Timeout => 503,
            RouterError::BadRequest(_) => 400,
            RouterError::NotFound(_) => 404,
            RouterError::Query(e) => match e {
                QueryError::InvalidPageRequest(_) | QueryError::InvalidTaskId(_) => 400,
                QueryError::AccessDenied { .. } => 403,
                QueryError::NotFound { .. } => 404,
                QueryError::NotAcceptable(_) => 406,
                QueryError::StoreUnavailable(_) => 503,
                QueryError::TypeMismatch { .. } => 500,
            },
        }
    }

    /// Stable identifier written to the problem body.
    pub fn kind(&self) -> &'static str {
        match self {
            RouterError::MethodNotAllowed => "MethodNotAllowed",
            RouterError::InternalError(_) => "InternalError",
            RouterError::Timeout => "Timeout",
            RouterError::BadRequest(_) => "BadRequest",
            RouterError::NotFound(_) => "NotFound",
            RouterError::Query(e) => e.kind(),
        }
    }
}

impl std::fmt::Display for RouterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouterError::MethodNotAllowed => write!(f, "Method Not Allowed"),
            RouterError::InternalError(msg) => write!(f, "Internal Error: {}", msg),
            RouterError::Timeout => write!(f, "Request Timeout"),
            RouterError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            RouterError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            RouterError::Query(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for RouterError {}

impl From<QueryError> for RouterError {
    fn from(e: QueryError) -> Self {
        RouterError::Query(e)
    }
}

impl From<RouterError> for Response<Bytes> {
    fn from(err: RouterError) -> Self {
        let status = err.status();
        let message = match &err {
            RouterError::MethodNotAllowed => "Method Not Allowed".to_string(),
            RouterError::Timeout => "Request Timeout".to_string(),
            RouterError::InternalError(msg)
            | RouterError::BadRequest(msg)
            | RouterError::NotFound(msg) => msg.clone(),
            RouterError::Query(e) => e.to_string(),
        };

        let error_response = crate::handlers::error_response(status, err.kind(), message, None);
        let body = serde_json::to_vec(&error_response).unwrap_or_else(|e| {
            format!(
                r#"{{"error":{{"code":"500","kind":"InternalError","message":"Failed to serialize error: {}"}}}}"#,
                e
            )
            .into_bytes()
        });

        let mut builder = Response::builder()
            .status(status)
            .header("Content-Type", "application/json");
        if status == 405 {
            builder = builder.header("Allow", "GET");
        }
        builder.body(Bytes::from(body)).unwrap_or_else(|_| {
            Response::builder()
                .status(500)
                .body(Bytes::from("Internal Server Error"))
                .expect("Failed to build fallback error response")
        })
    }
}
