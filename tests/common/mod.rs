#![allow(dead_code)]
//! Shared integration test utilities.

use std::sync::Once;

use proptest::prelude::ProptestConfig;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tracing_subscriber::fmt::format::FmtSpan;

use hyper_websocket_bridge::ws::encoding::encode_frame;
use hyper_websocket_bridge::ws::read::next_frame;
use hyper_websocket_bridge::ws::{Frame, Mask};

static INIT_LOGGING: Once = Once::new();

pub const CLIENT_MASK: Mask = [0x37, 0xfa, 0x21, 0x3d];

/// Initialize test logging once per test binary.
pub fn init_test_logging() {
    INIT_LOGGING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_test_writer()
            .with_span_events(FmtSpan::CLOSE)
            .with_ansi(false)
            .try_init();
    });
}

pub fn test_proptest_config(cases: u32) -> ProptestConfig {
    ProptestConfig {
        cases,
        ..ProptestConfig::default()
    }
}

/// Sends `frame` the way a client must, masked.
pub async fn send_masked<T: AsyncWrite + Unpin>(io: &mut T, frame: Frame) {
    let bytes = encode_frame(&frame.with_mask(CLIENT_MASK));
    io.write_all(&bytes).await.unwrap();
    io.flush().await.unwrap();
}

pub async fn receive<T: AsyncRead + Unpin>(io: &mut T) -> Frame {
    next_frame(io)
        .await
        .unwrap()
        .expect("server closed the stream early")
}

pub async fn receive_end<T: AsyncRead + Unpin>(io: &mut T) {
    assert_eq!(next_frame(io).await.unwrap(), None);
}
