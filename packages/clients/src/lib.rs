//! Shared client library for API types and HTTP clients.
//!
//! This library provides the wire types exchanged with the Easel API and an
//! HTTP client implementation. Types are always available, while HTTP client
//! code is gated behind the `client` feature.
//!
//! ## Use of `#[non_exhaustive]`
//!
//! We use `#[non_exhaustive]` on structs to prevent users manually
//! constructing the types while still allowing their fields to be `pub` for
//! reading. Users must construct the types either by:
//! - Using constructors on the types
//! - Using builder methods
//! - Using deserialization

use derive_more::Display;
use enum_assoc::Assoc;
use http::header::{self, HeaderName, HeaderValue};

pub mod easel;

/// The latest Easel client version.
#[cfg(feature = "client")]
pub type Easel = easel::Client;

/// The header used to correlate requests with server logs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Content types used by the library.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Display, Assoc)]
#[func(pub const fn value(&self) -> HeaderValue)]
#[func(pub const fn to_str(&self) -> &'static str)]
#[display("{}", self.to_str())]
pub enum ContentType {
    #[assoc(to_str = "application/json")]
    #[assoc(value = HeaderValue::from_static(self.to_str()))]
    Json,
}

impl ContentType {
    pub const HEADER: HeaderName = header::CONTENT_TYPE;
    pub const ACCEPT: HeaderName = header::ACCEPT;
}

impl PartialEq<ContentType> for HeaderValue {
    fn eq(&self, other: &ContentType) -> bool {
        self == other.value()
    }
}

impl PartialEq<ContentType> for &HeaderValue {
    fn eq(&self, other: &ContentType) -> bool {
        *self == other.value()
    }
}
