pub mod credentials;
pub mod profile_access;

pub use profile_access::{AccessError, ProfileAuthorizationCheck};
