//! HTTP binding of the Snapline resource port.
//!
//! [`HttpSocialApi`] implements [`snapline_core::SocialApi`] on top of
//! `reqwest`, attaching the shared session credential to every request and
//! mapping failed responses onto [`snapline_core::SnaplineError`].

pub mod dto;
pub mod http_api;
pub mod response;

pub use http_api::HttpSocialApi;
pub use response::classify_failure;
