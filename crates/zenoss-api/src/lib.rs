// zenoss-api: Async Rust client for the Zenoss JSON-RPC router API

//! Client for the Zenoss management API.
//!
//! Calls go through [`ZenossClient::dispatch`] (or its typed twin
//! [`ZenossClient::call`]): the router name is checked against the fixed
//! [`Router`] table, a fresh session cookie is obtained from the login
//! endpoint, and the parameters are POSTed as a `{tid, type, action,
//! method, data}` envelope to `{target}/{segment}_router`. The response
//! body is returned untouched.
//!
//! The `get_*` methods are thin wrappers that shape `data` for one
//! remote method each.

pub mod client;
pub mod device;
pub mod envelope;
pub mod error;
pub mod events;
pub mod mib;
pub mod params;
pub mod router;
pub mod session;
pub mod transport;

pub use client::{ClientConfig, RawResponse, Scheme, ZenossClient};
pub use envelope::RpcEnvelope;
pub use error::Error;
pub use params::{ComponentPage, DeviceListQuery, EventQuery, OidMappingQuery, SortDir};
pub use router::Router;
pub use session::SessionCookie;
pub use transport::TlsMode;
