//! PostgreSQL-backed `TaskRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{TaskRepository, TaskRepositoryError};
use crate::domain::task::{NewTask, Task, TaskId, TaskTitle};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewTaskRow, TaskRow, row_to_task};
use super::pool::DbPool;
use super::schema::tasks;

/// Diesel-backed implementation of the `TaskRepository` port.
///
/// Identity assignment rides on the table's `BIGSERIAL` sequence, which
/// never hands a value out twice; the `tasks_title_key` constraint backs the
/// duplicate-title signal.
#[derive(Clone)]
pub struct DieselTaskRepository {
    pool: DbPool,
}

impl DieselTaskRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskRepository for DieselTaskRepository {
    async fn add(&self, task: NewTask) -> Result<Task, TaskRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewTaskRow {
            title: task.title.as_ref(),
            description: task.description.as_ref().map(AsRef::as_ref),
            completed: task.completed,
        };

        let row: TaskRow = diesel::insert_into(tasks::table)
            .values(&new_row)
            .returning(TaskRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, &[("title", task.title.as_ref())]))?;

        row_to_task(row)
    }

    async fn find_by_id(&self, id: TaskId) -> Result<Option<Task>, TaskRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<TaskRow> = tasks::table
            .filter(tasks::id.eq(id.get()))
            .select(TaskRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, &[]))?;

        row.map(row_to_task).transpose()
    }

    async fn find_by_title(
        &self,
        title: &TaskTitle,
    ) -> Result<Option<Task>, TaskRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<TaskRow> = tasks::table
            .filter(tasks::title.eq(title.as_ref()))
            .select(TaskRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, &[]))?;

        row.map(row_to_task).transpose()
    }

    async fn find_all(&self) -> Result<Vec<Task>, TaskRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<TaskRow> = tasks::table
            .order(tasks::id.asc())
            .select(TaskRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, &[]))?;

        rows.into_iter().map(row_to_task).collect()
    }

    async fn save(&self, task: &Task) -> Result<(), TaskRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Upsert keyed on the identifier: a record deleted between find and
        // save is re-inserted rather than silently dropped.
        diesel::insert_into(tasks::table)
            .values((
                tasks::id.eq(task.id().get()),
                tasks::title.eq(task.title().as_ref()),
                tasks::description.eq(task.description().map(AsRef::as_ref)),
                tasks::completed.eq(task.completed()),
            ))
            .on_conflict(tasks::id)
            .do_update()
            .set((
                tasks::title.eq(excluded(tasks::title)),
                tasks::description.eq(excluded(tasks::description)),
                tasks::completed.eq(excluded(tasks::completed)),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_diesel_error(err, &[("title", task.title().as_ref())]))
    }

    async fn delete_by_id(&self, id: TaskId) -> Result<Option<Task>, TaskRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<TaskRow> = diesel::delete(tasks::table.filter(tasks::id.eq(id.get())))
            .returning(TaskRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, &[]))?;

        row.map(row_to_task).transpose()
    }

    async fn delete_all(&self) -> Result<(), TaskRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::delete(tasks::table)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_diesel_error(err, &[]))
    }
}
