//! Access-token encoding, decoding and claims.

pub mod claims;
pub mod codec;
pub mod error;

pub use claims::AccessClaims;
pub use codec::{AccessToken, TokenCodec};
pub use error::TokenError;
