use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// Process-local user store. Contents are lost on restart.
#[derive(Default)]
pub struct InMemoryUserRepository {
    state: RwLock<Store>,
}

#[derive(Default)]
struct Store {
    users: HashMap<UserId, User>,
    last_id: i64,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store {
    fn email_taken(&self, email: &str, except: Option<&UserId>) -> bool {
        self.users
            .values()
            .any(|u| u.email.as_str() == email && Some(&u.id) != except)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .find(|u| u.email.as_str() == email)
            .cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.state.read().await.users.get(id).cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<User, UserError> {
        let mut state = self.state.write().await;

        if state.email_taken(user.email.as_str(), None) {
            return Err(UserError::UserAlreadyExists(user.email.to_string()));
        }

        state.last_id += 1;
        let user = User {
            id: UserId(state.last_id),
            name: user.name,
            last_name: user.last_name,
            email: user.email,
            password_hash: user.password_hash,
            avatar: None,
        };
        state.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn update(&self, user: User) -> Result<Option<User>, UserError> {
        let mut state = self.state.write().await;

        if !state.users.contains_key(&user.id) {
            return Ok(None);
        }
        if state.email_taken(user.email.as_str(), Some(&user.id)) {
            return Err(UserError::UserAlreadyExists(user.email.to_string()));
        }

        state.users.insert(user.id, user.clone());
        Ok(Some(user))
    }
}
