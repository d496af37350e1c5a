//! User use-cases: lookup and conflict-resolving partial update.
//!
//! Users are created out of band, so the service exposes no creation path;
//! the boundary reads, updates, and deletes. Both unique fields follow the
//! same optimistic pre-check as tasks, with the store's constraint as the
//! fallback for pre-check/commit races.

use std::sync::Arc;

use serde_json::json;

use crate::domain::error::Error;
use crate::domain::patch::UserPatch;
use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::user::{User, UserId, Username};

fn map_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => Error::service_unavailable(message),
        UserRepositoryError::Query { message } => Error::internal(message),
        UserRepositoryError::Duplicate { field, value } => duplicate_field(&field, &value),
    }
}

fn not_found(id: UserId) -> Error {
    Error::not_found(format!("no user with id {id}"))
}

fn duplicate_field(field: &str, value: &str) -> Error {
    Error::conflict(format!("a user with {field} \"{value}\" already exists"))
        .with_details(json!({ "field": field, "value": value }))
}

/// Driving service for user operations.
#[derive(Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    /// Create a service backed by the given repository.
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    /// Fetch a user by identifier; absence is `Ok(None)`.
    pub async fn find_by_id(&self, id: UserId) -> Result<Option<User>, Error> {
        self.repository
            .find_by_id(id)
            .await
            .map_err(map_repository_error)
    }

    /// Fetch a user by its unique username.
    pub async fn find_by_username(&self, username: &Username) -> Result<Option<User>, Error> {
        self.repository
            .find_by_username(username)
            .await
            .map_err(map_repository_error)
    }

    /// Snapshot of all users in identifier order.
    pub async fn find_all(&self) -> Result<Vec<User>, Error> {
        self.repository.find_all().await.map_err(map_repository_error)
    }

    /// Merge a partial update into the user with the given identifier.
    ///
    /// Unknown identifiers fail with not-found before any merge. A staged
    /// username or email already held by a *different* user fails with a
    /// conflict naming that field; re-staging the user's own value succeeds.
    pub async fn update(&self, id: UserId, patch: UserPatch) -> Result<User, Error> {
        let Some(mut user) = self
            .repository
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
        else {
            return Err(not_found(id));
        };

        if let Some(username) = patch.username.staged() {
            if username != user.username() {
                let holder = self
                    .repository
                    .find_by_username(username)
                    .await
                    .map_err(map_repository_error)?;
                if holder.is_some_and(|other| other.id() != id) {
                    return Err(duplicate_field("username", username.as_ref()));
                }
            }
        }

        if let Some(email) = patch.email.staged() {
            if email != user.email() {
                let holder = self
                    .repository
                    .find_by_email(email)
                    .await
                    .map_err(map_repository_error)?;
                if holder.is_some_and(|other| other.id() != id) {
                    return Err(duplicate_field("email", email.as_ref()));
                }
            }
        }

        user.apply(patch);
        self.repository
            .save(&user)
            .await
            .map_err(map_repository_error)?;
        Ok(user)
    }

    /// Remove the user with the given identifier, failing with not-found
    /// when it does not exist.
    pub async fn delete_by_id(&self, id: UserId) -> Result<User, Error> {
        self.repository
            .delete_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| not_found(id))
    }

    /// Clear every user.
    pub async fn delete_all(&self) -> Result<(), Error> {
        self.repository
            .delete_all()
            .await
            .map_err(map_repository_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::patch::Patch;
    use crate::domain::ports::MockUserRepository;
    use crate::domain::user::{EmailAddress, Password};

    fn user(id: i64, username: &str, email: &str) -> User {
        User::new(
            UserId::new(id),
            Username::new(username).expect("valid username"),
            Password::new("password123"),
            EmailAddress::new(email).expect("valid email"),
        )
    }

    fn patch_username(raw: &str) -> UserPatch {
        UserPatch {
            username: Patch::Set(Username::new(raw).expect("valid username")),
            email: Patch::Keep,
        }
    }

    fn patch_email(raw: &str) -> UserPatch {
        UserPatch {
            username: Patch::Keep,
            email: Patch::Set(EmailAddress::new(raw).expect("valid email")),
        }
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let mut repository = MockUserRepository::new();
        repository.expect_find_by_id().returning(|_| Ok(None));

        let service = UserService::new(Arc::new(repository));
        let err = service
            .update(UserId::new(3), patch_username("shimon"))
            .await
            .expect_err("missing user should fail");

        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn username_held_by_another_user_conflicts_naming_username() {
        let mut repository = MockUserRepository::new();
        repository
            .expect_find_by_id()
            .returning(|_| Ok(Some(user(1, "mark", "mark@gmail.com"))));
        repository
            .expect_find_by_username()
            .returning(|_| Ok(Some(user(2, "anna", "anna@gmail.com"))));

        let service = UserService::new(Arc::new(repository));
        let err = service
            .update(UserId::new(1), patch_username("anna"))
            .await
            .expect_err("collision should fail");

        assert_eq!(err.code(), ErrorCode::Conflict);
        assert_eq!(err.details().expect("details")["field"], "username");
    }

    #[tokio::test]
    async fn email_held_by_another_user_conflicts_naming_email() {
        let mut repository = MockUserRepository::new();
        repository
            .expect_find_by_id()
            .returning(|_| Ok(Some(user(1, "mark", "mark@gmail.com"))));
        repository
            .expect_find_by_email()
            .returning(|_| Ok(Some(user(2, "anna", "anna@gmail.com"))));

        let service = UserService::new(Arc::new(repository));
        let err = service
            .update(UserId::new(1), patch_email("anna@gmail.com"))
            .await
            .expect_err("collision should fail");

        assert_eq!(err.code(), ErrorCode::Conflict);
        assert_eq!(err.details().expect("details")["field"], "email");
    }

    #[tokio::test]
    async fn restaging_own_username_saves_without_consulting_the_index() {
        let mut repository = MockUserRepository::new();
        repository
            .expect_find_by_id()
            .returning(|_| Ok(Some(user(1, "mark", "mark@gmail.com"))));
        repository.expect_save().returning(|_| Ok(()));

        let service = UserService::new(Arc::new(repository));
        let updated = service
            .update(UserId::new(1), patch_username("mark"))
            .await
            .expect("self-assignment succeeds");

        assert_eq!(updated.username().as_ref(), "mark");
    }

    #[tokio::test]
    async fn duplicate_reported_by_save_keeps_the_reported_field() {
        let mut repository = MockUserRepository::new();
        repository
            .expect_find_by_id()
            .returning(|_| Ok(Some(user(1, "mark", "mark@gmail.com"))));
        repository.expect_find_by_email().returning(|_| Ok(None));
        repository.expect_save().returning(|_| {
            Err(UserRepositoryError::duplicate("email", "anna@gmail.com"))
        });

        let service = UserService::new(Arc::new(repository));
        let err = service
            .update(UserId::new(1), patch_email("anna@gmail.com"))
            .await
            .expect_err("racing duplicate should fail");

        assert_eq!(err.code(), ErrorCode::Conflict);
        assert_eq!(err.details().expect("details")["field"], "email");
    }

    #[tokio::test]
    async fn delete_unknown_id_is_not_found() {
        let mut repository = MockUserRepository::new();
        repository.expect_delete_by_id().returning(|_| Ok(None));

        let service = UserService::new(Arc::new(repository));
        let err = service
            .delete_by_id(UserId::new(8))
            .await
            .expect_err("missing user should fail");

        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
