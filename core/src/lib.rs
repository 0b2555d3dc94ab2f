//! Synchronous client for the PetFriends pet-catalog API.
//!
//! # Overview
//! `PetFriendsClient` builds `HttpRequest` values without touching the
//! network (host-does-IO pattern). `PetFriends` pairs it with a `Transport`
//! to offer one blocking method per remote operation, each returning the
//! server's status and body as a `ResponseEnvelope`.
//!
//! # Design
//! - Builders are stateless; they hold only `base_url`.
//! - Every response goes through `response::normalize`: JSON when the body
//!   parses, raw text otherwise. Non-2xx statuses are data, not errors.
//! - The transport is injectable, so tests can run against a fake or against
//!   the mock server crate.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod multipart;
pub mod response;
pub mod transport;
pub mod types;

pub use api::PetFriends;
pub use client::PetFriendsClient;
pub use config::ClientConfig;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use response::{normalize, ResponseBody, ResponseEnvelope};
pub use transport::{Transport, UreqTransport};
pub use types::{AuthKey, Credentials, Pet, PetFields, PetFilter, PetList, PetPhoto};
