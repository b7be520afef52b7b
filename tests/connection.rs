//! End to end sessions over an in-memory duplex stream.

mod common;

use std::sync::Arc;

use futures::StreamExt;
use tokio::io::{duplex, AsyncWriteExt, DuplexStream};
use tokio::task::JoinHandle;

use common::{init_test_logging, receive, receive_end, send_masked};
use hyper_websocket_bridge::endpoints::EchoHandler;
use hyper_websocket_bridge::shared::types::MessageStream;
use hyper_websocket_bridge::ws::{
    serve_connection, CloseCode, Frame, Message, MessageFrameHandler, MessageHandler, Opcode,
    WsError,
};
use hyper_websocket_bridge::WsConfig;

type Session = JoinHandle<Result<(), WsError>>;

fn start(handler: impl MessageHandler, config: WsConfig) -> (DuplexStream, Session) {
    init_test_logging();
    let (client, server) = duplex(64 * 1024);
    let frames = MessageFrameHandler::with_config(Arc::new(handler), config);
    let session = tokio::spawn(serve_connection(server, Arc::new(frames)));
    (client, session)
}

fn echo() -> (DuplexStream, Session) {
    start(EchoHandler, WsConfig::default())
}

#[tokio::test]
async fn echoes_text_unmasked() {
    let (mut client, _session) = echo();

    send_masked(&mut client, Frame::text("Hello")).await;

    let frame = receive(&mut client).await;
    assert_eq!(frame, Frame::text("Hello"));
    assert_eq!(frame.mask, None);
}

#[tokio::test]
async fn answers_ping_with_pong() {
    let (mut client, _session) = echo();

    send_masked(&mut client, Frame::ping("are you there")).await;

    assert_eq!(receive(&mut client).await, Frame::pong("are you there"));
}

#[tokio::test]
async fn reassembles_fragmented_message() {
    let (mut client, _session) = echo();

    send_masked(&mut client, Frame::text("Fish ").with_fin(false)).await;
    send_masked(&mut client, Frame::ping("")).await;
    send_masked(&mut client, Frame::new(Opcode::Continuation, "& Chips")).await;

    assert_eq!(receive(&mut client).await, Frame::pong(""));
    assert_eq!(receive(&mut client).await, Frame::text("Fish & Chips"));
}

#[tokio::test]
async fn fragments_long_replies() {
    let (mut client, _session) = start(EchoHandler, WsConfig::default().frame_size(4));

    send_masked(&mut client, Frame::text("Jack of Hearts")).await;

    let mut frames = Vec::new();
    for _ in 0..4 {
        frames.push(receive(&mut client).await);
    }
    assert_eq!(
        frames,
        vec![
            Frame::text("Jack").with_fin(false),
            Frame::new(Opcode::Continuation, " of ").with_fin(false),
            Frame::new(Opcode::Continuation, "Hear").with_fin(false),
            Frame::new(Opcode::Continuation, "ts"),
        ]
    );
}

#[tokio::test]
async fn says_goodbye_to_close() {
    let (mut client, session) = echo();

    send_masked(&mut client, Frame::close(&CloseCode::NORMAL_CLOSURE)).await;

    let goodbye = CloseCode::NORMAL_CLOSURE.with_reason("Goodbye");
    assert_eq!(receive(&mut client).await, Frame::close(&goodbye));
    receive_end(&mut client).await;
    assert!(session.await.unwrap().is_ok());
}

#[tokio::test]
async fn closes_on_invalid_utf8() {
    let (mut client, session) = echo();

    send_masked(&mut client, Frame::new(Opcode::Text, vec![0xff, 0xfe])).await;

    let frame = receive(&mut client).await;
    assert_eq!(frame.opcode, Opcode::Close);
    let code = CloseCode::from_payload(&frame.payload).unwrap();
    assert_eq!(code, CloseCode::INVALID_FRAME_PAYLOAD_DATA.with_reason("Protocol Error"));
    receive_end(&mut client).await;
    assert!(session.await.unwrap().is_ok());
}

#[tokio::test]
async fn closes_on_orphan_continuation() {
    let (mut client, _session) = echo();

    send_masked(&mut client, Frame::new(Opcode::Continuation, "tail")).await;

    let frame = receive(&mut client).await;
    let code = CloseCode::from_payload(&frame.payload).unwrap();
    assert_eq!(code, CloseCode::PROTOCOL_ERROR.with_reason("Protocol Error"));
}

#[tokio::test]
async fn closes_on_oversized_message() {
    let (mut client, _session) = start(
        EchoHandler,
        WsConfig::default().max_message_size(Some(8)),
    );

    send_masked(&mut client, Frame::binary(vec![0u8; 5]).with_fin(false)).await;
    send_masked(&mut client, Frame::new(Opcode::Continuation, vec![0u8; 5])).await;

    let frame = receive(&mut client).await;
    let code = CloseCode::from_payload(&frame.payload).unwrap();
    assert_eq!(code, CloseCode::MESSAGE_TOO_BIG.with_reason("Protocol Error"));
}

#[tokio::test]
async fn closes_on_oversized_frame_header() {
    let (mut client, session) = start(
        EchoHandler,
        WsConfig::default().max_message_size(Some(8)),
    );

    let header = [
        &[0x82u8, 0xFF][..],
        &(1u64 << 62).to_be_bytes()[..],
        &common::CLIENT_MASK[..],
    ]
    .concat();
    client.write_all(&header).await.unwrap();

    let frame = receive(&mut client).await;
    let code = CloseCode::from_payload(&frame.payload).unwrap();
    assert_eq!(code, CloseCode::MESSAGE_TOO_BIG.with_reason("Protocol Error"));
    receive_end(&mut client).await;
    assert!(session.await.unwrap().is_ok());
}

#[tokio::test]
async fn ends_when_client_disconnects() {
    let (client, session) = echo();

    drop(client);

    assert!(session.await.unwrap().is_ok());
}

#[tokio::test]
async fn application_can_close_first() {
    let greeter = |_messages: MessageStream| {
        futures::stream::iter(vec![
            Message::from("Welcome"),
            Message::Close(CloseCode::GOING_AWAY),
        ])
        .boxed()
    };
    let (mut client, session) = start(greeter, WsConfig::default());

    assert_eq!(receive(&mut client).await, Frame::text("Welcome"));
    assert_eq!(
        receive(&mut client).await,
        Frame::close(&CloseCode::GOING_AWAY)
    );
    receive_end(&mut client).await;
    assert!(session.await.unwrap().is_ok());
}
