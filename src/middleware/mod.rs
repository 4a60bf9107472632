//! HTTP middleware.
//!
//! - **Request ID**: Propagation of the proxy's `X-Request-Id` for log correlation
//!
//! # Architecture
//!
//! ```text
//! Request → Catch Panic → Request ID → Trace → Handler → Response
//!               ↓              ↓
//!          500 internal   X-Request-Id header
//! ```

pub mod request_id;

pub use request_id::{REQUEST_ID_HEADER, RequestId, RequestIdExt, RequestIdLayer};
