//! In-memory user repository.
//!
//! Same locking discipline as the task store: one mutex over map plus
//! counter, snapshot reads, forward-only identifiers. Two unique fields are
//! checked instead of one.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::user::{EmailAddress, NewUser, User, UserId, Username};

#[derive(Debug, Default)]
struct UserStoreState {
    next_id: i64,
    users: BTreeMap<i64, User>,
}

impl UserStoreState {
    fn username_holder(&self, username: &Username) -> Option<&User> {
        self.users.values().find(|user| user.username() == username)
    }

    fn email_holder(&self, email: &EmailAddress) -> Option<&User> {
        self.users.values().find(|user| user.email() == email)
    }

    /// First unique field of `user` already held by a different record, as
    /// `(field, value)`.
    fn collision(&self, user: &User) -> Option<(&'static str, String)> {
        if self
            .username_holder(user.username())
            .is_some_and(|holder| holder.id() != user.id())
        {
            return Some(("username", user.username().as_ref().to_owned()));
        }
        if self
            .email_holder(user.email())
            .is_some_and(|holder| holder.id() != user.id())
        {
            return Some(("email", user.email().as_ref().to_owned()));
        }
        None
    }
}

/// Mutex-guarded map store for users.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    state: Mutex<UserStoreState>,
}

impl InMemoryUserStore {
    /// Create an empty store. The first assigned identifier is 1.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, UserStoreState>, UserRepositoryError> {
        self.state
            .lock()
            .map_err(|_| UserRepositoryError::query("user store mutex poisoned"))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserStore {
    async fn add(&self, user: NewUser) -> Result<User, UserRepositoryError> {
        let mut state = self.lock()?;

        if state.username_holder(&user.username).is_some() {
            return Err(UserRepositoryError::duplicate(
                "username",
                user.username.as_ref(),
            ));
        }
        if state.email_holder(&user.email).is_some() {
            return Err(UserRepositoryError::duplicate("email", user.email.as_ref()));
        }

        state.next_id += 1;
        let stored = User::new(
            UserId::new(state.next_id),
            user.username,
            user.password,
            user.email,
        );
        state.users.insert(stored.id().get(), stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(self.lock()?.users.get(&id.get()).cloned())
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserRepositoryError> {
        Ok(self.lock()?.username_holder(username).cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserRepositoryError> {
        Ok(self.lock()?.email_holder(email).cloned())
    }

    async fn find_all(&self) -> Result<Vec<User>, UserRepositoryError> {
        Ok(self.lock()?.users.values().cloned().collect())
    }

    async fn save(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut state = self.lock()?;

        if let Some((field, value)) = state.collision(user) {
            return Err(UserRepositoryError::duplicate(field, value));
        }

        state.users.insert(user.id().get(), user.clone());
        Ok(())
    }

    async fn delete_by_id(&self, id: UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(self.lock()?.users.remove(&id.get()))
    }

    async fn delete_all(&self) -> Result<(), UserRepositoryError> {
        self.lock()?.users.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::Password;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: Username::new(username).expect("valid username"),
            password: Password::new("password123"),
            email: EmailAddress::new(email).expect("valid email"),
        }
    }

    #[tokio::test]
    async fn add_assigns_increasing_ids_and_round_trips() {
        let store = InMemoryUserStore::new();

        let mark = store
            .add(new_user("mark", "mark@gmail.com"))
            .await
            .expect("add mark");
        let anna = store
            .add(new_user("anna", "anna@gmail.com"))
            .await
            .expect("add anna");

        assert_eq!(mark.id().get(), 1);
        assert_eq!(anna.id().get(), 2);
        assert_eq!(
            store
                .find_by_id(mark.id())
                .await
                .expect("find")
                .expect("present"),
            mark
        );
    }

    #[tokio::test]
    async fn duplicate_username_and_email_are_rejected_on_add() {
        let store = InMemoryUserStore::new();
        store
            .add(new_user("mark", "mark@gmail.com"))
            .await
            .expect("add");

        let username_err = store
            .add(new_user("mark", "other@gmail.com"))
            .await
            .expect_err("duplicate username");
        assert_eq!(
            username_err,
            UserRepositoryError::duplicate("username", "mark")
        );

        let email_err = store
            .add(new_user("other", "mark@gmail.com"))
            .await
            .expect_err("duplicate email");
        assert_eq!(
            email_err,
            UserRepositoryError::duplicate("email", "mark@gmail.com")
        );
    }

    #[tokio::test]
    async fn save_reports_the_colliding_field() {
        let store = InMemoryUserStore::new();
        let mark = store
            .add(new_user("mark", "mark@gmail.com"))
            .await
            .expect("add mark");
        store
            .add(new_user("anna", "anna@gmail.com"))
            .await
            .expect("add anna");

        let renamed = User::new(
            mark.id(),
            Username::new("anna").expect("valid username"),
            mark.password().clone(),
            mark.email().clone(),
        );
        let err = store.save(&renamed).await.expect_err("collision");
        assert_eq!(err, UserRepositoryError::duplicate("username", "anna"));

        // Unchanged values save cleanly.
        store.save(&mark).await.expect("self save");
    }

    #[tokio::test]
    async fn lookup_by_each_unique_field() {
        let store = InMemoryUserStore::new();
        let mark = store
            .add(new_user("mark", "mark@gmail.com"))
            .await
            .expect("add");

        let by_username = store
            .find_by_username(mark.username())
            .await
            .expect("lookup")
            .expect("present");
        assert_eq!(by_username.id(), mark.id());

        let by_email = store
            .find_by_email(mark.email())
            .await
            .expect("lookup")
            .expect("present");
        assert_eq!(by_email.id(), mark.id());

        let missing = Username::new("ghost").expect("valid username");
        assert!(
            store
                .find_by_username(&missing)
                .await
                .expect("lookup")
                .is_none()
        );
    }

    #[tokio::test]
    async fn delete_then_find_yields_absent() {
        let store = InMemoryUserStore::new();
        let mark = store
            .add(new_user("mark", "mark@gmail.com"))
            .await
            .expect("add");

        let removed = store
            .delete_by_id(mark.id())
            .await
            .expect("delete")
            .expect("present");
        assert_eq!(removed.id(), mark.id());
        assert!(store.find_by_id(mark.id()).await.expect("find").is_none());
    }
}
