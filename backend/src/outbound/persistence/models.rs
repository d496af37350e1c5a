//! Row structs bridging Diesel and the domain entities.

use diesel::prelude::*;

use crate::domain::ports::{TaskRepositoryError, UserRepositoryError};
use crate::domain::task::{Task, TaskDescription, TaskId, TaskTitle};
use crate::domain::user::{EmailAddress, Password, User, UserId, Username};

use super::schema::{tasks, users};

/// Task row as read from PostgreSQL.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
}

/// Task insert payload; the database assigns the identifier.
#[derive(Debug, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub completed: bool,
}

/// User row as read from PostgreSQL.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub email: String,
}

/// User insert payload; the database assigns the identifier.
#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub email: &'a str,
}

/// Convert a task row into a domain task.
///
/// Stored values already passed validation on the way in; a row that no
/// longer does indicates out-of-band writes and maps to a query error.
pub fn row_to_task(row: TaskRow) -> Result<Task, TaskRepositoryError> {
    let TaskRow {
        id,
        title,
        description,
        completed,
    } = row;

    let title = TaskTitle::new(title)
        .map_err(|err| TaskRepositoryError::query(format!("stored task {id} is invalid: {err}")))?;
    let description = description
        .map(|raw| {
            TaskDescription::new(raw).map_err(|err| {
                TaskRepositoryError::query(format!("stored task {id} is invalid: {err}"))
            })
        })
        .transpose()?;

    Ok(Task::new(TaskId::new(id), title, description, completed))
}

/// Convert a user row into a domain user.
pub fn row_to_user(row: UserRow) -> Result<User, UserRepositoryError> {
    let UserRow {
        id,
        username,
        password,
        email,
    } = row;

    let username = Username::new(username)
        .map_err(|err| UserRepositoryError::query(format!("stored user {id} is invalid: {err}")))?;
    let email = EmailAddress::new(email)
        .map_err(|err| UserRepositoryError::query(format!("stored user {id} is invalid: {err}")))?;

    Ok(User::new(
        UserId::new(id),
        username,
        Password::new(password),
        email,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_row_conversion_preserves_fields() {
        let row = TaskRow {
            id: 5,
            title: "write report".into(),
            description: Some("quarterly numbers".into()),
            completed: true,
        };

        let task = row_to_task(row).expect("valid row converts");
        assert_eq!(task.id().get(), 5);
        assert_eq!(task.title().as_ref(), "write report");
        assert_eq!(
            task.description().map(AsRef::as_ref),
            Some("quarterly numbers")
        );
        assert!(task.completed());
    }

    #[test]
    fn invalid_stored_task_maps_to_query_error() {
        let row = TaskRow {
            id: 5,
            title: "   ".into(),
            description: None,
            completed: false,
        };

        let err = row_to_task(row).expect_err("blank stored title is invalid");
        assert!(matches!(err, TaskRepositoryError::Query { .. }));
    }

    #[test]
    fn user_row_conversion_preserves_fields() {
        let row = UserRow {
            id: 2,
            username: "anna".into(),
            password: "password246".into(),
            email: "anna@gmail.com".into(),
        };

        let user = row_to_user(row).expect("valid row converts");
        assert_eq!(user.id().get(), 2);
        assert_eq!(user.username().as_ref(), "anna");
        assert_eq!(user.email().as_ref(), "anna@gmail.com");
    }
}
