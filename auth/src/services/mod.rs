pub mod token;
pub mod verifier;
