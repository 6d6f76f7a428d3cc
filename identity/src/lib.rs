//! Session-token identity pipeline shared by the authentication and people services.
//!
//! The authentication service owns the signing key and answers verification
//! requests; every other service protects its routes with [`middleware::auth`]
//! backed by a [`rpc::RemoteVerifier`].

pub mod config;
pub mod context;
pub mod error;
pub mod middleware;
pub mod rpc;
pub mod telemetry;
pub mod verifier;

pub use context::{AuthContext, Identity, RequestMeta, Subject};
pub use error::{Envelope, HandlerError};
pub use verifier::{TokenVerifier, Verification, VerificationRequest, VerifyError};
