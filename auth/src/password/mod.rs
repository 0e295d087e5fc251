pub mod argon2;
pub mod errors;

pub use argon2::HashingConfig;
pub use argon2::PasswordHasher;
pub use errors::PasswordError;
