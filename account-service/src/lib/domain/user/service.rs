use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use auth::Claims;
use chrono::Utc;
use tokio::sync::Semaphore;

use crate::domain::user::models::ChangePasswordCommand;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::LoginOutcome;
use crate::domain::user::models::PasswordHash;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::user::errors::AuthFailure;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for account operations.
///
/// Password hashing and verification run on the blocking pool, at most
/// `max_concurrent_hashing` at a time.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
    hashing_permits: Arc<Semaphore>,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Credential store implementation
    /// * `authenticator` - Password hashing and token handling
    /// * `max_concurrent_hashing` - Admission limit for hash/verify work
    pub fn new(
        repository: Arc<UR>,
        authenticator: Arc<Authenticator>,
        max_concurrent_hashing: usize,
    ) -> Self {
        Self {
            repository,
            authenticator,
            hashing_permits: Arc::new(Semaphore::new(max_concurrent_hashing.max(1))),
        }
    }

    async fn run_hashing<F, T>(&self, job: F) -> Result<T, UserError>
    where
        F: FnOnce(&Authenticator) -> T + Send + 'static,
        T: Send + 'static,
    {
        let permit = Arc::clone(&self.hashing_permits)
            .acquire_owned()
            .await
            .map_err(|e| UserError::Unknown(e.to_string()))?;

        // The permit lives with the blocking job, not with the caller
        let authenticator = Arc::clone(&self.authenticator);
        tokio::task::spawn_blocking(move || {
            let _permit = permit;
            job(&authenticator)
        })
        .await
        .map_err(|e| UserError::Unknown(format!("Hashing task failed: {}", e)))
    }

    async fn hash_password(&self, password: String) -> Result<PasswordHash, UserError> {
        let hash = self
            .run_hashing(move |authenticator| authenticator.hash_password(&password))
            .await??;

        Ok(PasswordHash::new(hash)?)
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn register(&self, command: RegisterCommand) -> Result<User, UserError> {
        if self
            .repository
            .find_by_username(&command.username)
            .await?
            .is_some()
        {
            return Err(UserError::UsernameAlreadyExists(
                command.username.to_string(),
            ));
        }

        let password_hash = self
            .hash_password(command.password.expose().to_string())
            .await?;

        // The store has the final say on uniqueness if another registration raced us
        let user = self
            .repository
            .create(User::new(command.username, password_hash, command.role))
            .await?;

        tracing::info!(
            user_id = %user.id,
            username = %user.username,
            role = %user.role,
            "User registered"
        );

        Ok(user)
    }

    async fn login(&self, command: LoginCommand) -> Result<LoginOutcome, UserError> {
        let user = match Username::new(&command.username) {
            Ok(username) => self.repository.find_by_username(&username).await?,
            Err(_) => None,
        };

        let password = command.password;

        let Some(user) = user else {
            self.run_hashing(move |authenticator| authenticator.reject_unknown(&password))
                .await?;
            tracing::debug!("Login rejected: unknown username");
            return Err(UserError::InvalidCredentials);
        };

        let claims = Claims::for_principal(user.username.as_str(), user.role.as_str());
        let stored_hash = user.password_hash.as_str().to_string();

        let result = self
            .run_hashing(move |authenticator| {
                authenticator.authenticate(&password, &stored_hash, &claims)
            })
            .await?
            .map_err(|e| match e {
                AuthenticationError::InvalidCredentials => {
                    tracing::debug!(user_id = %user.id, "Login rejected: wrong password");
                    UserError::InvalidCredentials
                }
                AuthenticationError::PasswordError(err) => UserError::Password(err),
                AuthenticationError::JwtError(err) => {
                    UserError::Unknown(format!("Token generation failed: {}", err))
                }
            })?;

        tracing::info!(user_id = %user.id, username = %user.username, "User logged in");

        Ok(LoginOutcome {
            access_token: result.access_token,
            token_type: result.token_type,
            expires_at: result.expires_at,
            user,
        })
    }

    async fn resolve_principal(&self, token: &str) -> Result<User, UserError> {
        let claims = self.authenticator.validate_token(token).map_err(|e| {
            tracing::warn!(reason = ?e.rejection(), "Bearer token rejected");
            UserError::Unauthenticated(AuthFailure::InvalidToken)
        })?;

        let subject = claims.sub.ok_or_else(|| {
            tracing::warn!("Bearer token has no subject");
            UserError::Unauthenticated(AuthFailure::MissingSubject)
        })?;

        let username = Username::new(&subject)
            .map_err(|_| UserError::Unauthenticated(AuthFailure::UnknownPrincipal))?;

        self.repository
            .find_by_username(&username)
            .await?
            .ok_or_else(|| {
                tracing::warn!(subject = %subject, "Bearer token subject not found");
                UserError::Unauthenticated(AuthFailure::UnknownPrincipal)
            })
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }

    async fn change_password(
        &self,
        id: &UserId,
        command: ChangePasswordCommand,
    ) -> Result<User, UserError> {
        let mut user = self.get_user(id).await?;

        let current = command.current_password;
        let stored_hash = user.password_hash.as_str().to_string();
        let matches = self
            .run_hashing(move |authenticator| {
                authenticator.verify_password(&current, &stored_hash)
            })
            .await??;

        if !matches {
            return Err(UserError::CurrentPasswordMismatch);
        }

        user.password_hash = self
            .hash_password(command.new_password.expose().to_string())
            .await?;
        user.updated_at = Some(Utc::now());

        let user = self.repository.update(user).await?;
        tracing::info!(user_id = %user.id, "Password changed");

        Ok(user)
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), UserError> {
        self.repository.delete(id).await?;
        tracing::info!(user_id = %id, "User deleted");

        Ok(())
    }
}
