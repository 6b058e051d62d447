//! # lbaas-core
//!
//! Shared plumbing for LBaaS v2 (Octavia) resource bindings.
//!
//! Resource crates build on this for everything that is not specific to a
//! single resource: the transport client, option-to-wire translation and
//! linked pagination.
//!
//! ## Modules
//!
//! - [`error`] - Error taxonomy shared by every binding
//! - [`config`] - Validated client configuration
//! - [`client`] - The `ServiceClient` transport and its builder
//! - [`query`] - Query string construction from optional fields
//! - [`body`] - Request body construction under an envelope key
//! - [`result`] - Typed result envelope returned by single-resource calls
//! - [`pagination`] - Linked pagination engine

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod body;
pub mod client;
pub mod config;
pub mod error;
pub mod pagination;
pub mod query;
pub mod result;

// Re-export commonly used types
pub use client::{RequestOpts, Response, ServiceClient, ServiceClientBuilder};
pub use error::{Error, ErrorKind, Result};
pub use pagination::{LinkedPageBase, Page, PageResult, Pager, Pages};
pub use result::{ApiResult, ResponsePayload};
