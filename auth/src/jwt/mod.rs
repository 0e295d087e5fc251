pub mod claims;
pub mod codec;
pub mod errors;

pub use claims::Claims;
pub use codec::SignedToken;
pub use codec::TokenCodec;
pub use codec::TokenSettings;
pub use errors::JwtError;
pub use errors::TokenRejection;
