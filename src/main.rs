use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Request, Response, Server};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use hyper_websocket_bridge::endpoints::{handle_ws, hello, not_found, EchoHandler};
use hyper_websocket_bridge::ws::{FrameHandler, MessageFrameHandler};
use hyper_websocket_bridge::WsConfig;

/// WebSocket echo server.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8081")]
    addr: SocketAddr,

    /// Largest payload of an outgoing frame, longer messages are fragmented
    #[arg(long)]
    frame_size: Option<usize>,

    /// Reject reassembled messages larger than this many bytes
    #[arg(long)]
    max_message_size: Option<usize>,

    /// Capacity of the message and frame channels of each session
    #[arg(long)]
    channel_capacity: Option<usize>,
}

impl Args {
    fn config(&self) -> WsConfig {
        let mut config = WsConfig::default().max_message_size(self.max_message_size);
        if let Some(frame_size) = self.frame_size {
            config = config.frame_size(frame_size);
        }
        if let Some(capacity) = self.channel_capacity {
            config = config.channel_capacity(capacity);
        }
        config
    }
}

#[derive(Clone)]
struct AppState {
    handler: Arc<dyn FrameHandler>,
    config: Arc<WsConfig>,
}

async fn request_router(req: Request<Body>, state: AppState) -> Result<Response<Body>, Infallible> {
    debug!(method = %req.method(), uri = %req.uri(), "request");
    let response = match req.uri().path() {
        "/" => hello(),
        "/ws" => handle_ws(req, state.handler, &state.config),
        _ => not_found(),
    };
    Ok(response)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = args.config();
    let state = AppState {
        handler: Arc::new(MessageFrameHandler::with_config(
            Arc::new(EchoHandler),
            config.clone(),
        )),
        config: Arc::new(config),
    };

    let service = make_service_fn(move |_conn| {
        let state = state.clone();
        async move {
            Ok::<_, Infallible>(service_fn(move |req| request_router(req, state.clone())))
        }
    });
    let server = Server::bind(&args.addr).serve(service);

    info!("Listening at http://{}", args.addr);

    server.await?;

    Ok(())
}
