//! In-memory task repository.
//!
//! A single mutex guards both the map and the identifier counter, so `add`
//! hands out identifiers atomically and writes are mutually exclusive. Reads
//! clone a snapshot under the lock; the lock is never held across an await.
//! The counter only moves forward, so identifiers are not reused after
//! deletion and `BTreeMap` iteration order doubles as insertion order.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{TaskRepository, TaskRepositoryError};
use crate::domain::task::{NewTask, Task, TaskId, TaskTitle};

#[derive(Debug, Default)]
struct TaskStoreState {
    next_id: i64,
    tasks: BTreeMap<i64, Task>,
}

impl TaskStoreState {
    fn title_holder(&self, title: &TaskTitle) -> Option<&Task> {
        self.tasks.values().find(|task| task.title() == title)
    }
}

/// Mutex-guarded map store for tasks.
#[derive(Debug, Default)]
pub struct InMemoryTaskStore {
    state: Mutex<TaskStoreState>,
}

impl InMemoryTaskStore {
    /// Create an empty store. The first assigned identifier is 1.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, TaskStoreState>, TaskRepositoryError> {
        self.state
            .lock()
            .map_err(|_| TaskRepositoryError::query("task store mutex poisoned"))
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskStore {
    async fn add(&self, task: NewTask) -> Result<Task, TaskRepositoryError> {
        let mut state = self.lock()?;

        if state.title_holder(&task.title).is_some() {
            return Err(TaskRepositoryError::duplicate(
                "title",
                task.title.as_ref(),
            ));
        }

        state.next_id += 1;
        let stored = Task::new(
            TaskId::new(state.next_id),
            task.title,
            task.description,
            task.completed,
        );
        state.tasks.insert(stored.id().get(), stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: TaskId) -> Result<Option<Task>, TaskRepositoryError> {
        Ok(self.lock()?.tasks.get(&id.get()).cloned())
    }

    async fn find_by_title(
        &self,
        title: &TaskTitle,
    ) -> Result<Option<Task>, TaskRepositoryError> {
        Ok(self.lock()?.title_holder(title).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Task>, TaskRepositoryError> {
        Ok(self.lock()?.tasks.values().cloned().collect())
    }

    async fn save(&self, task: &Task) -> Result<(), TaskRepositoryError> {
        let mut state = self.lock()?;

        if state
            .title_holder(task.title())
            .is_some_and(|holder| holder.id() != task.id())
        {
            return Err(TaskRepositoryError::duplicate(
                "title",
                task.title().as_ref(),
            ));
        }

        // Re-inserts when the record vanished between find and save.
        state.tasks.insert(task.id().get(), task.clone());
        Ok(())
    }

    async fn delete_by_id(&self, id: TaskId) -> Result<Option<Task>, TaskRepositoryError> {
        Ok(self.lock()?.tasks.remove(&id.get()))
    }

    async fn delete_all(&self) -> Result<(), TaskRepositoryError> {
        self.lock()?.tasks.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_task(raw_title: &str) -> NewTask {
        NewTask {
            title: TaskTitle::new(raw_title).expect("valid title"),
            description: None,
            completed: false,
        }
    }

    #[tokio::test]
    async fn ids_are_strictly_increasing_and_never_reused() {
        let store = InMemoryTaskStore::new();

        let first = store.add(new_task("one")).await.expect("add one");
        let second = store.add(new_task("two")).await.expect("add two");
        assert_eq!(first.id().get(), 1);
        assert_eq!(second.id().get(), 2);

        store
            .delete_by_id(second.id())
            .await
            .expect("delete second");
        let third = store.add(new_task("three")).await.expect("add three");
        assert_eq!(third.id().get(), 3);
    }

    #[tokio::test]
    async fn add_then_find_by_id_round_trips() {
        let store = InMemoryTaskStore::new();
        let stored = store.add(new_task("laundry")).await.expect("add");

        let found = store
            .find_by_id(stored.id())
            .await
            .expect("find")
            .expect("present");
        assert_eq!(found, stored);
    }

    #[tokio::test]
    async fn duplicate_title_on_add_is_rejected() {
        let store = InMemoryTaskStore::new();
        store.add(new_task("laundry")).await.expect("first add");

        let err = store
            .add(new_task("laundry"))
            .await
            .expect_err("duplicate should fail");
        assert_eq!(err, TaskRepositoryError::duplicate("title", "laundry"));
    }

    #[tokio::test]
    async fn save_rejects_a_title_held_by_a_different_task() {
        let store = InMemoryTaskStore::new();
        let first = store.add(new_task("A")).await.expect("add A");
        store.add(new_task("B")).await.expect("add B");

        let renamed = Task::new(
            first.id(),
            TaskTitle::new("B").expect("valid title"),
            None,
            false,
        );
        let err = store.save(&renamed).await.expect_err("collision");
        assert_eq!(err, TaskRepositoryError::duplicate("title", "B"));

        // Saving its own unchanged title is fine.
        store.save(&first).await.expect("self save");
    }

    #[tokio::test]
    async fn delete_on_missing_id_returns_none_and_leaves_store_alone() {
        let store = InMemoryTaskStore::new();
        store.add(new_task("keep me")).await.expect("add");

        let removed = store.delete_by_id(TaskId::new(99)).await.expect("delete");
        assert!(removed.is_none());
        assert_eq!(store.find_all().await.expect("find_all").len(), 1);
    }

    #[tokio::test]
    async fn find_all_returns_insertion_order_snapshots() {
        let store = InMemoryTaskStore::new();
        assert!(store.find_all().await.expect("empty").is_empty());

        for raw_title in ["a", "b", "c"] {
            store.add(new_task(raw_title)).await.expect("add");
        }

        let all = store.find_all().await.expect("find_all");
        assert_eq!(all.len(), 3);
        let ids: Vec<i64> = all.iter().map(|task| task.id().get()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn delete_all_empties_the_store() {
        let store = InMemoryTaskStore::new();
        store.add(new_task("a")).await.expect("add");
        store.add(new_task("b")).await.expect("add");

        store.delete_all().await.expect("delete_all");
        assert!(store.find_all().await.expect("find_all").is_empty());
    }
}
