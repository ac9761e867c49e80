//! Browser chess client that plays against a remote analysis service.
//!
//! Each browser board connects over a WebSocket to a [`websocket::ChessWebSocket`]
//! actor that owns one [`sync::ClientSession`]: local moves are gated and
//! committed, then exchanged with the analysis service, and the reply is
//! reconciled into the game state before the derived views are re-rendered.

pub mod config;
pub mod error;
pub mod game;
pub mod models;
pub mod routes;
pub mod service;
pub mod sync;
pub mod view;
pub mod websocket;
