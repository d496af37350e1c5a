//! Task use-cases: creation, lookup, and conflict-resolving partial update.
//!
//! The service owns no state beyond its repository handle. Uniqueness is
//! checked optimistically before a write; if a concurrent write slips past
//! the pre-check, the store's own constraint reports the loser and the
//! resulting `Duplicate` maps to the same conflict error.

use std::sync::Arc;

use serde_json::json;

use crate::domain::error::Error;
use crate::domain::patch::TaskPatch;
use crate::domain::ports::{TaskRepository, TaskRepositoryError};
use crate::domain::task::{NewTask, Task, TaskId, TaskTitle};

fn map_repository_error(error: TaskRepositoryError) -> Error {
    match error {
        TaskRepositoryError::Connection { message } => Error::service_unavailable(message),
        TaskRepositoryError::Query { message } => Error::internal(message),
        TaskRepositoryError::Duplicate { value, .. } => duplicate_title(&value),
    }
}

fn not_found(id: TaskId) -> Error {
    Error::not_found(format!("no task with id {id}"))
}

fn duplicate_title(value: &str) -> Error {
    Error::conflict(format!("a task with title \"{value}\" already exists"))
        .with_details(json!({ "field": "title", "value": value }))
}

/// Driving service for task operations.
#[derive(Clone)]
pub struct TaskService {
    repository: Arc<dyn TaskRepository>,
}

impl TaskService {
    /// Create a service backed by the given repository.
    pub fn new(repository: Arc<dyn TaskRepository>) -> Self {
        Self { repository }
    }

    /// Store a new task, rejecting a title already held by another task.
    pub async fn create(&self, task: NewTask) -> Result<Task, Error> {
        let holder = self
            .repository
            .find_by_title(&task.title)
            .await
            .map_err(map_repository_error)?;
        if holder.is_some() {
            return Err(duplicate_title(task.title.as_ref()));
        }

        self.repository.add(task).await.map_err(map_repository_error)
    }

    /// Fetch a task by identifier; absence is `Ok(None)` for the boundary to
    /// translate.
    pub async fn find_by_id(&self, id: TaskId) -> Result<Option<Task>, Error> {
        self.repository
            .find_by_id(id)
            .await
            .map_err(map_repository_error)
    }

    /// Fetch a task by its unique title.
    pub async fn find_by_title(&self, title: &TaskTitle) -> Result<Option<Task>, Error> {
        self.repository
            .find_by_title(title)
            .await
            .map_err(map_repository_error)
    }

    /// Snapshot of all tasks in identifier order.
    pub async fn find_all(&self) -> Result<Vec<Task>, Error> {
        self.repository.find_all().await.map_err(map_repository_error)
    }

    /// Merge a partial update into the task with the given identifier.
    ///
    /// Fails with not-found before any merge when the identifier is unknown.
    /// A staged title that another task already holds fails with a conflict;
    /// re-staging the task's own title succeeds.
    pub async fn update(&self, id: TaskId, patch: TaskPatch) -> Result<Task, Error> {
        let Some(mut task) = self
            .repository
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
        else {
            return Err(not_found(id));
        };

        if let Some(new_title) = patch.title.staged() {
            if new_title != task.title() {
                let holder = self
                    .repository
                    .find_by_title(new_title)
                    .await
                    .map_err(map_repository_error)?;
                if holder.is_some_and(|other| other.id() != id) {
                    return Err(duplicate_title(new_title.as_ref()));
                }
            }
        }

        task.apply(patch);
        self.repository
            .save(&task)
            .await
            .map_err(map_repository_error)?;
        Ok(task)
    }

    /// Remove the task with the given identifier, failing with not-found
    /// when it does not exist.
    pub async fn delete_by_id(&self, id: TaskId) -> Result<Task, Error> {
        self.repository
            .delete_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| not_found(id))
    }

    /// Clear every task.
    pub async fn delete_all(&self) -> Result<(), Error> {
        self.repository
            .delete_all()
            .await
            .map_err(map_repository_error)
    }
}

#[cfg(test)]
mod tests {
    //! Failure-path coverage with a mocked repository; happy paths run
    //! against the real in-memory store in the adapter and handler tests.

    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::patch::Patch;
    use crate::domain::ports::MockTaskRepository;

    fn title(raw: &str) -> TaskTitle {
        TaskTitle::new(raw).expect("valid title")
    }

    fn task(id: i64, raw_title: &str) -> Task {
        Task::new(TaskId::new(id), title(raw_title), None, false)
    }

    fn patch_title(raw: &str) -> TaskPatch {
        TaskPatch {
            title: Patch::Set(title(raw)),
            ..TaskPatch::default()
        }
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found_before_any_merge() {
        let mut repository = MockTaskRepository::new();
        repository.expect_find_by_id().returning(|_| Ok(None));

        let service = TaskService::new(Arc::new(repository));
        let err = service
            .update(TaskId::new(9), patch_title("anything"))
            .await
            .expect_err("missing task should fail");

        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn update_title_held_by_another_task_is_a_conflict() {
        let mut repository = MockTaskRepository::new();
        repository
            .expect_find_by_id()
            .returning(|_| Ok(Some(task(1, "A"))));
        repository
            .expect_find_by_title()
            .returning(|_| Ok(Some(task(2, "B"))));

        let service = TaskService::new(Arc::new(repository));
        let err = service
            .update(TaskId::new(1), patch_title("B"))
            .await
            .expect_err("collision should fail");

        assert_eq!(err.code(), ErrorCode::Conflict);
        let details = err.details().expect("conflict details");
        assert_eq!(details["field"], "title");
        assert_eq!(details["value"], "B");
    }

    #[tokio::test]
    async fn update_title_to_its_own_value_skips_the_lookup_and_saves() {
        let mut repository = MockTaskRepository::new();
        repository
            .expect_find_by_id()
            .returning(|_| Ok(Some(task(1, "A"))));
        // No find_by_title expectation: staging the current title must not
        // consult the unique index at all.
        repository.expect_save().returning(|_| Ok(()));

        let service = TaskService::new(Arc::new(repository));
        let updated = service
            .update(TaskId::new(1), patch_title("A"))
            .await
            .expect("self-assignment succeeds");

        assert_eq!(updated.title().as_ref(), "A");
    }

    #[tokio::test]
    async fn duplicate_reported_by_save_maps_to_the_same_conflict() {
        let mut repository = MockTaskRepository::new();
        repository
            .expect_find_by_id()
            .returning(|_| Ok(Some(task(1, "A"))));
        repository.expect_find_by_title().returning(|_| Ok(None));
        repository
            .expect_save()
            .returning(|_| Err(TaskRepositoryError::duplicate("title", "B")));

        let service = TaskService::new(Arc::new(repository));
        let err = service
            .update(TaskId::new(1), patch_title("B"))
            .await
            .expect_err("racing duplicate should fail");

        assert_eq!(err.code(), ErrorCode::Conflict);
        assert_eq!(err.details().expect("details")["field"], "title");
    }

    #[tokio::test]
    async fn create_with_taken_title_never_reaches_add() {
        let mut repository = MockTaskRepository::new();
        repository
            .expect_find_by_title()
            .returning(|_| Ok(Some(task(1, "laundry"))));

        let service = TaskService::new(Arc::new(repository));
        let err = service
            .create(NewTask {
                title: title("laundry"),
                description: None,
                completed: false,
            })
            .await
            .expect_err("duplicate title should fail");

        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn delete_unknown_id_is_not_found() {
        let mut repository = MockTaskRepository::new();
        repository.expect_delete_by_id().returning(|_| Ok(None));

        let service = TaskService::new(Arc::new(repository));
        let err = service
            .delete_by_id(TaskId::new(41))
            .await
            .expect_err("missing task should fail");

        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn connection_failures_surface_as_service_unavailable() {
        let mut repository = MockTaskRepository::new();
        repository
            .expect_find_all()
            .returning(|| Err(TaskRepositoryError::connection("database unavailable")));

        let service = TaskService::new(Arc::new(repository));
        let err = service.find_all().await.expect_err("connection failure");

        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }
}
