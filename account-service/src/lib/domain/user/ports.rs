use async_trait::async_trait;

use crate::domain::user::models::ChangePasswordCommand;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::LoginOutcome;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::models::Username;

/// Port for account operations.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Register a new principal.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `Password` - Hashing failed
    /// * `DatabaseError` - Store operation failed
    async fn register(&self, command: RegisterCommand) -> Result<User, UserError>;

    /// Verify credentials and issue a bearer token.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown username or wrong password, indistinguishably
    /// * `DatabaseError` - Store operation failed
    async fn login(&self, command: LoginCommand) -> Result<LoginOutcome, UserError>;

    /// Resolve a bearer token to the principal it was issued for.
    ///
    /// Recomputed on every call; nothing is cached between requests.
    ///
    /// # Errors
    /// * `Unauthenticated` - Invalid or expired token, no subject, or unknown subject
    /// * `DatabaseError` - Store operation failed
    async fn resolve_principal(&self, token: &str) -> Result<User, UserError>;

    /// Retrieve user by unique identifier.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Store operation failed
    async fn get_user(&self, id: &UserId) -> Result<User, UserError>;

    /// Replace a user's password after checking the current one.
    ///
    /// # Errors
    /// * `CurrentPasswordMismatch` - Current password does not match
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Store operation failed
    async fn change_password(
        &self,
        id: &UserId,
        command: ChangePasswordCommand,
    ) -> Result<User, UserError>;

    /// Delete existing user.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Store operation failed
    async fn delete_user(&self, id: &UserId) -> Result<(), UserError>;
}

/// Credential store for principals.
///
/// Implementations must keep usernames unique even under concurrent inserts:
/// of two racing `create` calls for one username, exactly one succeeds.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist new user to storage.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `DatabaseError` - Store operation failed
    async fn create(&self, user: User) -> Result<User, UserError>;

    /// Retrieve user by identifier.
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve user by username.
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError>;

    /// Update existing user in storage.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `UsernameAlreadyExists` - New username is already taken
    /// * `DatabaseError` - Store operation failed
    async fn update(&self, user: User) -> Result<User, UserError>;

    /// Remove user from storage.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Store operation failed
    async fn delete(&self, id: &UserId) -> Result<(), UserError>;
}
