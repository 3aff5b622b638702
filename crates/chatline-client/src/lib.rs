//! Client library for the Chatline backend.
//!
//! Provides the route table, an HTTP client and the [`ChatApi`] trait that
//! session logic is written against.

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod routes;

pub use api::{AgentReply, ChatApi};
pub use config::ClientConfig;
pub use error::ClientError;
pub use http::HttpClient;
pub use routes::Routes;
