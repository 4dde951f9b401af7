//! # Geomyth Gateway
//!
//! An envelope-dispatch facade independent of the registry: a static method
//! table with a capability manifest, a no-op version-negotiation handshake,
//! and an `execute` endpoint dispatching over a closed set of handlers.
//! Only `myth.parse` carries real (trivial) logic; the `/vision/describe`
//! path is the single place the gateway performs outbound calls.

pub mod config;
pub mod describe;
pub mod dispatch;
pub mod envelope;
pub mod http;
pub mod methods;

pub use config::GatewayConfig;
pub use envelope::Envelope;
pub use http::{router, AppState};
pub use methods::{MethodRegistry, MethodSpec};
