//! HTTP transport shared by the prober and the chat notifier.
//!
//! This module provides:
//! - Request/response value types ([`HttpRequest`], [`HttpResponse`])
//! - The client abstraction ([`HttpClient`])
//! - The production client backed by reqwest ([`ReqwestClient`])

mod client;
mod error;
mod message;


pub use client::ReqwestClient;
pub use error::HttpError;
pub use message::{HttpClient, HttpRequest, HttpResponse, ReadMode};
