//! Outbound side of the pipeline: building the request, sending it,
//! and scrubbing headers before anything is logged.

pub mod redact;
pub mod request;
pub mod transport;

pub use redact::{header_block, redact};
pub use request::{OutboundRequest, RequestError, build, resource_path};
pub use transport::{
    CancelHandle, CancelToken, ReqwestTransport, ResponseBody, Transport, TransportError,
    TransportResponse, cancel_pair,
};
