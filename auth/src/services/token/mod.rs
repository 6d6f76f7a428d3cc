pub mod codec;
pub mod issuer;

pub use codec::{TokenCodec, TokenError};
pub use issuer::TokenIssuer;
