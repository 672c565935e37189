//! Data transfer objects for the WebSocket protocol, the HTTP API and the
//! on-disk document.

pub mod http;
pub mod store;
pub mod websocket;
