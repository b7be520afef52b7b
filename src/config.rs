use std::collections::HashSet;

use hyper::Method;

use crate::ws::consts::{DEFAULT_CHANNEL_CAPACITY, DEFAULT_FRAME_SIZE};

/// Per-endpoint WebSocket settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WsConfig {
    /// Largest payload of one outgoing frame; longer messages are fragmented.
    pub frame_size: usize,
    /// Request methods that may be upgraded.
    pub accepted_methods: HashSet<Method>,
    /// Capacity of the channels between the bridge tasks and the application.
    pub channel_capacity: usize,
    /// Largest reassembled inbound message, unbounded when `None`.
    pub max_message_size: Option<usize>,
}

impl Default for WsConfig {
    fn default() -> Self {
        WsConfig {
            frame_size: DEFAULT_FRAME_SIZE,
            accepted_methods: [Method::GET].into_iter().collect(),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            max_message_size: None,
        }
    }
}

impl WsConfig {
    pub fn frame_size(mut self, frame_size: usize) -> Self {
        self.frame_size = frame_size.max(1);
        self
    }

    pub fn accepted_methods(mut self, methods: impl IntoIterator<Item = Method>) -> Self {
        self.accepted_methods = methods.into_iter().collect();
        self
    }

    pub fn channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }

    pub fn max_message_size(mut self, max: Option<usize>) -> Self {
        self.max_message_size = max;
        self
    }
}
