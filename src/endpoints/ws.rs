use std::sync::Arc;

use hyper::header::{self, HeaderValue};
use hyper::upgrade::Upgraded;
use hyper::{Body, Request, Response, StatusCode};
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::config::WsConfig;
use crate::utils::plain_text;
use crate::ws::connection::serve_connection;
use crate::ws::handler::FrameHandler;
use crate::ws::handshake::{compute_accept_key, verify_request};

async fn handle_upgraded_connection(upgraded: Upgraded, handler: Arc<dyn FrameHandler>) {
    info!("upgraded");
    if let Err(error) = serve_connection(upgraded, handler).await {
        warn!(%error, "error handling upgraded connection");
    }
}

/// Answers a WebSocket upgrade request.
///
/// A request failing any handshake check gets `400 Bad Request` with the
/// failed rule as its body and is not upgraded. Otherwise the response is
/// `101 Switching Protocols` and, once hyper has sent it, the connection is
/// served by `handler`. Must be called inside a tokio runtime.
pub fn handle_ws(
    req: Request<Body>,
    handler: Arc<dyn FrameHandler>,
    config: &WsConfig,
) -> Response<Body> {
    let key = match verify_request(&req, &config.accepted_methods) {
        Ok(key) => key,
        Err(error) => {
            warn!(%error, uri = %req.uri(), "rejecting websocket handshake");
            return plain_text(StatusCode::BAD_REQUEST, error.to_string());
        }
    };
    let sec_accept = match HeaderValue::from_str(&compute_accept_key(&key)) {
        Ok(value) => value,
        Err(_) => return plain_text(StatusCode::INTERNAL_SERVER_ERROR, "Internal error"),
    };

    let span = info_span!("ws", id = %Uuid::new_v4(), uri = %req.uri());
    let on_upgrade = hyper::upgrade::on(req);
    tokio::spawn(
        async move {
            match on_upgrade.await {
                Ok(upgraded) => handle_upgraded_connection(upgraded, handler).await,
                Err(error) => warn!(%error, "upgrade error"),
            }
        }
        .instrument(span),
    );

    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::SWITCHING_PROTOCOLS;
    let headers = response.headers_mut();
    headers.insert(header::CONNECTION, HeaderValue::from_static("upgrade"));
    headers.insert(header::UPGRADE, HeaderValue::from_static("websocket"));
    headers.insert(header::SEC_WEBSOCKET_ACCEPT, sec_accept);
    response
}
