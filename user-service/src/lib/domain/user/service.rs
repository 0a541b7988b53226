use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use auth::SessionCookieManager;
use axum_extra::extract::cookie::CookieJar;
use tokio::time::Instant;

use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::user::errors::UserError;
use crate::user::ports::AuthServicePort;
use crate::user::ports::UserRepository;

/// Store access budget for one service operation.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// Domain service implementation for authentication operations.
///
/// Holds no per-request state; every call is a self-contained transaction
/// against the repository.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
    cookies: SessionCookieManager,
    store_timeout: Duration,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `authenticator` - Password hashing and token issuing
    /// * `cookies` - Session cookie settings
    pub fn new(
        repository: Arc<UR>,
        authenticator: Arc<Authenticator>,
        cookies: SessionCookieManager,
    ) -> Self {
        Self {
            repository,
            authenticator,
            cookies,
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    /// Override the per-operation store budget.
    pub fn with_store_timeout(mut self, store_timeout: Duration) -> Self {
        self.store_timeout = store_timeout;
        self
    }

    fn deadline(&self) -> Instant {
        Instant::now() + self.store_timeout
    }

    /// Await a store call, failing with `StoreTimeout` once `deadline` passes.
    async fn within<T, F>(&self, deadline: Instant, operation: F) -> Result<T, UserError>
    where
        F: Future<Output = Result<T, UserError>>,
    {
        match tokio::time::timeout_at(deadline, operation).await {
            Ok(result) => result,
            Err(_) => {
                tracing::error!(
                    timeout_ms = self.store_timeout.as_millis() as u64,
                    "Credential store operation timed out"
                );
                Err(UserError::StoreTimeout(self.store_timeout))
            }
        }
    }
}

#[async_trait]
impl<UR> AuthServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn login(
        &self,
        command: LoginCommand,
        jar: CookieJar,
    ) -> Result<(CookieJar, String), UserError> {
        tracing::info!("Login attempt");
        let deadline = self.deadline();

        let user = match self
            .within(deadline, self.repository.find_by_email(&command.email))
            .await?
        {
            Some(user) => user,
            None => {
                // Keep the unknown-email path as expensive as a wrong password.
                self.authenticator.reject_unknown_account(&command.password);
                tracing::info!("Login rejected: user not found");
                return Err(UserError::UserNotFound(command.email));
            }
        };

        let result = self
            .authenticator
            .authenticate(&command.password, &user.password_hash, &auth::UserClaims::from(&user))
            .map_err(|e| {
                match &e {
                    AuthenticationError::InvalidCredentials => {
                        tracing::info!(user_id = %user.id, "Login rejected: invalid credentials");
                    }
                    other => {
                        tracing::error!(user_id = %user.id, error = %other, "Login failed");
                    }
                }
                UserError::from(e)
            })?;

        let jar = self.cookies.set(jar, &result.access_token)?;

        tracing::info!(user_id = %user.id, "Login successful");
        Ok((jar, result.access_token))
    }

    async fn register(&self, command: RegisterCommand) -> Result<String, UserError> {
        let deadline = self.deadline();

        let existing = self
            .within(deadline, self.repository.find_by_email(command.email.as_str()))
            .await?;
        if existing.is_some() {
            tracing::info!("Registration rejected: user already exists");
            return Err(UserError::UserAlreadyExists(command.email.to_string()));
        }

        let password_hash = self.authenticator.hash_password(&command.password)?;

        let user = self
            .within(
                deadline,
                self.repository.insert(NewUser {
                    name: command.name,
                    last_name: command.last_name,
                    email: command.email,
                    password_hash,
                }),
            )
            .await?;

        let token = self.authenticator.issue_token(&auth::UserClaims::from(&user))?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(token)
    }

    async fn update_user(&self, command: UpdateUserCommand) -> Result<User, UserError> {
        let deadline = self.deadline();
        let id = command.id;

        let mut user = self
            .within(deadline, self.repository.find_by_id(&id))
            .await?
            .ok_or_else(|| UserError::UserNotFound(id.to_string()))?;

        if let Some(name) = command.name {
            user.name = name;
        }

        if let Some(last_name) = command.last_name {
            user.last_name = last_name;
        }

        if let Some(email) = command.email {
            user.email = email;
        }

        if let Some(avatar) = command.avatar {
            user.avatar = Some(avatar);
        }

        if let Some(password) = command.password.filter(|p| !p.is_empty()) {
            user.password_hash = self.authenticator.hash_password(&password)?;
        }

        // The update's own result is provisional; the re-fetch below is authoritative.
        self.within(deadline, self.repository.update(user))
            .await?
            .ok_or_else(|| UserError::UserNotFound(id.to_string()))?;

        let updated_user = self
            .within(deadline, self.repository.find_by_id(&id))
            .await?
            .ok_or_else(|| UserError::UserNotFound(id.to_string()))?;

        tracing::info!(user_id = %id, "User updated");
        Ok(updated_user)
    }

    async fn logout(&self, jar: CookieJar) -> Result<CookieJar, UserError> {
        let jar = self.cookies.clear(jar).map_err(|e| {
            tracing::error!(error = %e, "Failed to clear session cookie");
            UserError::from(e)
        })?;

        tracing::info!("Session cookie cleared");
        Ok(jar)
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;
    use std::sync::Mutex;

    use mockall::mock;
    use time::OffsetDateTime;

    use super::*;
    use crate::domain::user::models::EmailAddress;
    use crate::domain::user::models::UserId;
    use crate::outbound::repositories::memory::InMemoryUserRepository;

    const SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-64-bytes-long-for-hs512";

    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;
            async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;
            async fn insert(&self, user: NewUser) -> Result<User, UserError>;
            async fn update(&self, user: User) -> Result<Option<User>, UserError>;
        }
    }

    /// Repository whose every call outlives any reasonable budget.
    struct SlowRepository;

    #[async_trait]
    impl UserRepository for SlowRepository {
        async fn find_by_email(&self, _email: &str) -> Result<Option<User>, UserError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(None)
        }

        async fn find_by_id(&self, _id: &UserId) -> Result<Option<User>, UserError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(None)
        }

        async fn insert(&self, _user: NewUser) -> Result<User, UserError> {
            Err(UserError::StoreUnavailable("unused".to_string()))
        }

        async fn update(&self, _user: User) -> Result<Option<User>, UserError> {
            Ok(None)
        }
    }

    /// Collects formatted log output for inspection.
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl LogBuffer {
        fn contents(&self) -> String {
            let bytes = self.0.lock().unwrap();
            String::from_utf8_lossy(&bytes).into_owned()
        }
    }

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn authenticator() -> Arc<Authenticator> {
        Arc::new(Authenticator::new(SECRET))
    }

    fn service<UR: UserRepository>(repository: UR) -> UserService<UR> {
        UserService::new(
            Arc::new(repository),
            authenticator(),
            SessionCookieManager::default(),
        )
    }

    fn stored_user(password: &str) -> User {
        User {
            id: UserId(1),
            name: "John".to_string(),
            last_name: "Doe".to_string(),
            email: EmailAddress::new("john@example.com".to_string()).unwrap(),
            password_hash: authenticator().hash_password(password).unwrap(),
            avatar: None,
        }
    }

    fn login(email: &str, password: &str) -> LoginCommand {
        LoginCommand::new(email.to_string(), password.to_string()).unwrap()
    }

    fn register(email: &str, password: &str) -> RegisterCommand {
        RegisterCommand::new(
            "A".to_string(),
            "B".to_string(),
            email.to_string(),
            password.to_string(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_login_success_sets_cookie() {
        let mut repository = MockTestUserRepository::new();
        let user = stored_user("password");

        repository
            .expect_find_by_email()
            .withf(|email| email == "john@example.com")
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let service = service(repository);

        let (jar, token) = service
            .login(login("john@example.com", "password"), CookieJar::new())
            .await
            .expect("Login failed");

        let claims = authenticator().validate_token(&token).unwrap();
        assert_eq!(claims.user.id, 1);
        assert_eq!(claims.user.name, "John");
        assert_eq!(claims.user.last_name, "Doe");
        assert_eq!(claims.user.email, "john@example.com");

        let cookie = jar.get("session_token").expect("Session cookie missing");
        assert_eq!(cookie.value(), token);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let mut repository = MockTestUserRepository::new();
        let user = stored_user("password");

        repository
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let service = service(repository);

        let result = service
            .login(login("john@example.com", "not-the-password"), CookieJar::new())
            .await;
        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));

        let service = service(repository);

        let result = service
            .login(login("nobody@example.com", "password"), CookieJar::new())
            .await;
        assert!(matches!(result, Err(UserError::UserNotFound(_))));
    }

    #[tokio::test]
    async fn test_login_store_failure_propagates() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Err(UserError::StoreUnavailable("connection refused".to_string())));

        let service = service(repository);

        let result = service
            .login(login("john@example.com", "password"), CookieJar::new())
            .await;
        assert!(matches!(result, Err(UserError::StoreUnavailable(_))));
    }

    #[tokio::test]
    async fn test_login_store_timeout() {
        let service = service(SlowRepository).with_store_timeout(Duration::from_millis(20));

        let result = service
            .login(login("john@example.com", "password"), CookieJar::new())
            .await;
        assert!(matches!(result, Err(UserError::StoreTimeout(_))));
    }

    #[tokio::test]
    async fn test_register_success() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_email()
            .withf(|email| email == "a@x.com")
            .times(1)
            .returning(|_| Ok(None));

        repository
            .expect_insert()
            .withf(|user| {
                user.email.as_str() == "a@x.com"
                    && user.password_hash != "p1"
                    && user.password_hash.starts_with("$argon2")
            })
            .times(1)
            .returning(|new_user| {
                Ok(User {
                    id: UserId(9),
                    name: new_user.name,
                    last_name: new_user.last_name,
                    email: new_user.email,
                    password_hash: new_user.password_hash,
                    avatar: None,
                })
            });

        let service = service(repository);

        let token = service
            .register(register("a@x.com", "p1"))
            .await
            .expect("Registration failed");

        let claims = authenticator().validate_token(&token).unwrap();
        assert_eq!(claims.sub, 9);
        assert_eq!(claims.user.email, "a@x.com");
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let mut repository = MockTestUserRepository::new();
        let user = stored_user("password");

        repository
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        repository.expect_insert().times(0);

        let service = service(repository);

        let result = service.register(register("john@example.com", "p1")).await;
        assert!(matches!(result, Err(UserError::UserAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_register_twice_with_in_memory_store() {
        let repository = Arc::new(InMemoryUserRepository::new());
        let service = UserService::new(
            Arc::clone(&repository),
            authenticator(),
            SessionCookieManager::default(),
        );

        service.register(register("a@x.com", "p1")).await.unwrap();
        let second = service.register(register("a@x.com", "p1")).await;
        assert!(matches!(second, Err(UserError::UserAlreadyExists(_))));

        let stored = repository.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "p1");
        assert!(authenticator().verify_password(&stored.password_hash, "p1").unwrap());
    }

    #[tokio::test]
    async fn test_update_user_without_password_keeps_hash() {
        let repository = Arc::new(InMemoryUserRepository::new());
        let service = UserService::new(
            Arc::clone(&repository),
            authenticator(),
            SessionCookieManager::default(),
        );

        service.register(register("a@x.com", "p1")).await.unwrap();
        let before = repository.find_by_email("a@x.com").await.unwrap().unwrap();

        let mut command = UpdateUserCommand::new(before.id);
        command.name = Some("Anne".to_string());
        command.password = Some(String::new());

        let updated = service.update_user(command).await.unwrap();

        assert_eq!(updated.name, "Anne");
        assert_eq!(updated.last_name, "B");
        assert_eq!(updated.password_hash, before.password_hash);
    }

    #[tokio::test]
    async fn test_update_user_with_password_rehashes() {
        let repository = Arc::new(InMemoryUserRepository::new());
        let service = UserService::new(
            Arc::clone(&repository),
            authenticator(),
            SessionCookieManager::default(),
        );

        service.register(register("a@x.com", "p1")).await.unwrap();
        let before = repository.find_by_email("a@x.com").await.unwrap().unwrap();

        let mut command = UpdateUserCommand::new(before.id);
        command.password = Some("p2".to_string());

        let updated = service.update_user(command).await.unwrap();
        let verifier = authenticator();

        assert_ne!(updated.password_hash, before.password_hash);
        assert_ne!(updated.password_hash, "p2");
        assert!(verifier.verify_password(&updated.password_hash, "p2").unwrap());
        assert!(!verifier.verify_password(&updated.password_hash, "p1").unwrap());
    }

    #[tokio::test]
    async fn test_update_user_not_found() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        repository.expect_update().times(0);

        let service = service(repository);

        let mut command = UpdateUserCommand::new(UserId(404));
        command.name = Some("Ghost".to_string());

        let result = service.update_user(command).await;
        assert!(matches!(result, Err(UserError::UserNotFound(_))));
    }

    #[tokio::test]
    async fn test_update_user_vanishes_before_refetch() {
        let mut repository = MockTestUserRepository::new();
        let user = stored_user("password");
        let lookups = Arc::new(AtomicUsize::new(0));

        let seen = Arc::clone(&lookups);
        repository
            .expect_find_by_id()
            .times(2)
            .returning(move |_| {
                if seen.fetch_add(1, Ordering::SeqCst) == 0 {
                    Ok(Some(user.clone()))
                } else {
                    Ok(None)
                }
            });

        repository
            .expect_update()
            .times(1)
            .returning(|user| Ok(Some(user)));

        let service = service(repository);

        let result = service.update_user(UpdateUserCommand::new(UserId(1))).await;
        assert!(matches!(result, Err(UserError::UserNotFound(_))));
        assert_eq!(lookups.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_update_returns_refetched_state() {
        let mut repository = MockTestUserRepository::new();
        let original = stored_user("password");
        let authoritative = User {
            name: "Johnny".to_string(),
            ..original.clone()
        };

        let first = original.clone();
        let second = authoritative.clone();
        let lookups = AtomicUsize::new(0);
        repository
            .expect_find_by_id()
            .times(2)
            .returning(move |_| {
                if lookups.fetch_add(1, Ordering::SeqCst) == 0 {
                    Ok(Some(first.clone()))
                } else {
                    Ok(Some(second.clone()))
                }
            });

        // Provisional result differs from what the re-fetch reports.
        repository
            .expect_update()
            .times(1)
            .returning(|mut user| {
                user.name = "provisional".to_string();
                Ok(Some(user))
            });

        let service = service(repository);

        let updated = service
            .update_user(UpdateUserCommand::new(UserId(1)))
            .await
            .unwrap();
        assert_eq!(updated, authoritative);
    }

    #[tokio::test]
    async fn test_logout_clears_cookie_without_store_access() {
        // No expectations: any repository call fails the test.
        let repository = MockTestUserRepository::new();
        let service = service(repository);

        let jar = service.logout(CookieJar::new()).await.expect("Logout failed");

        let cookie = jar.get("session_token").expect("Clearing cookie missing");
        assert_eq!(cookie.value(), "");
        assert!(cookie.expires_datetime().unwrap() < OffsetDateTime::now_utc());
    }

    #[tokio::test]
    async fn test_login_logs_do_not_contain_email() {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::TRACE)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let mut repository = MockTestUserRepository::new();
        let user = stored_user("password");
        repository
            .expect_find_by_email()
            .returning(move |email| {
                if email == "john@example.com" {
                    Ok(Some(user.clone()))
                } else {
                    Ok(None)
                }
            });
        let service = service(repository);

        let _ = service
            .login(login("nobody@example.com", "password"), CookieJar::new())
            .await;
        let _ = service
            .login(login("john@example.com", "not-the-password"), CookieJar::new())
            .await;
        let _ = service
            .login(login("john@example.com", "password"), CookieJar::new())
            .await;

        let output = logs.contents();
        assert!(output.contains("Login rejected: user not found"));
        assert!(output.contains("Login rejected: invalid credentials"));
        assert!(output.contains("Login successful"));
        assert!(!output.contains("nobody@example.com"));
        assert!(!output.contains("john@example.com"));
        assert!(!output.contains("not-the-password"));
    }
}
