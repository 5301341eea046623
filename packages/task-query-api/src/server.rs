//! Hyper server setup and request handling.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use http_body_util::Full;
use hyper::body::{Bytes, Incoming as IncomingBody};
use hyper::{Request, Response, Result as HyperResult};
use hyper_util::rt::TokioExecutor;
use hyper_util::rt::TokioIo;
use hyper_util::server::conn::auto::Builder as ConnectionBuilder;
use tokio::net::TcpListener;

use crate::router::{Router, RouterError};

/// HTTP server for the task variable query API.
pub struct Server {
    addr: SocketAddr,
    router: Arc<Router>,
}

impl Server {
    /// Creates a new server instance.
    ///
    /// # Arguments
    /// * `addr` - Socket address to bind to
    /// * `router` - Request router
    pub fn new(addr: SocketAddr, router: Router) -> Self {
        Self {
            addr,
            router: Arc::new(router),
        }
    }

    /// Binds the configured address and serves until the task is dropped.
    pub async fn serve(self) -> Result<(), std::io::Error> {
        let listener = TcpListener::bind(self.addr).await?;
        self.serve_listener(listener).await
    }

    /// Serves connections accepted from an already bound listener.
    pub async fn serve_listener(self, listener: TcpListener) -> Result<(), std::io::Error> {
        tracing::info!("Server listening on http://{}", listener.local_addr()?);

        loop {
            let (stream, peer) = listener.accept().await?;
            let io = TokioIo::new(stream);
            let router = Arc::clone(&self.router);

            tokio::task::spawn(async move {
                let builder = ConnectionBuilder::new(TokioExecutor::new());
                if let Err(err) = builder
                    .serve_connection(
                        io,
                        hyper::service::service_fn(move |req| handle_request(req, router.clone())),
                    )
                    .await
                {
                    tracing::error!("Error serving connection from {}: {}", peer, err);
                }
            });
        }
    }
}

/// Handles an incoming HTTP request.
///
/// On timeout only the response is abandoned; a store call already running
/// on the blocking pool finishes in the background.
async fn handle_request(
    req: Request<IncomingBody>,
    router: Arc<Router>,
) -> HyperResult<Response<Full<Bytes>>> {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let timeout = Duration::from_millis(router.config().request_timeout_ms);

    let result = match tokio::time::timeout(timeout, router.route(req)).await {
        Ok(result) => result,
        Err(_) => Err(RouterError::Timeout),
    };

    let response = match result {
        Ok(response) => response,
        Err(err) => {
            if err.status() >= 500 {
                tracing::error!("{} {} failed: {}", method, uri, err);
            } else {
                tracing::debug!("{} {} rejected: {}", method, uri, err);
            }
            Response::from(err)
        }
    };
    tracing::debug!("{} {} -> {}", method, uri, response.status());
    Ok(response.map(Full::new))
}
