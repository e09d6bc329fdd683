//! Synchronous API client for the PetFriends pet-store service.
//!
//! # Overview
//! Issues authentication, pet CRUD, and photo upload requests, and hands every
//! outcome back as an [`ApiResponse`] (`status` plus a JSON-or-text body) for
//! the caller to assert on. Non-2xx statuses are data, not errors.
//!
//! # Design
//! - `PetFriendsClient` is stateless: it holds only `base_url` and turns
//!   operations into `HttpRequest` values without touching the network.
//! - `Transport` executes requests; `UreqTransport` is the blocking default.
//! - `PetFriends` ties the two together and is what test code calls.
//! - DTOs are defined independently from the mock-server crate; the live
//!   suite catches schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod multipart;
pub mod petfriends;
pub mod response;
pub mod transport;
pub mod types;

pub use client::PetFriendsClient;
pub use config::ClientConfig;
pub use error::ClientError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use petfriends::PetFriends;
pub use response::{ApiResponse, ResponseBody, StatusClass};
pub use transport::{Transport, UreqTransport};
pub use types::{AuthKey, Credentials, Pet, PetFields, PetFilter, PetList, PhotoUpload};
