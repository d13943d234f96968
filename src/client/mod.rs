//! Transport layer - one HTTP request per operation against the interop server
//!
//! This module provides:
//! - Endpoint resolution (explicit > PHARO_SIS_PORT > default)
//! - The result envelope returned by every operation
//! - PharoClient with one typed method per remote operation

pub mod endpoint;
pub mod envelope;
pub mod pharo;

pub use endpoint::{DEFAULT_HOST, DEFAULT_PORT, Endpoint, PORT_ENV_VAR};
pub use envelope::{Envelope, ErrorDetail, RemoteError};
pub use pharo::{DEFAULT_PACKAGE_PATH, Params, PharoClient, REQUEST_TIMEOUT, Verb, params};
