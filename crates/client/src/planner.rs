//! Planner state: the selected date and the cached task set.
//!
//! Selecting a date fetches that day's tasks. Adding and completing a task
//! write through the backend and then refetch. Deleting writes through and
//! removes the task locally without a refetch. Every change is mirrored to
//! the snapshot.
//!
//! A failed fetch keeps the previous task set and marks the planner stale.
//! Network failures are logged and returned, never panicked on.

use std::time::Duration;

use chrono::{DateTime, Utc};
use daily_planner_core::{CreateTaskRequest, PlanDate, Task, TaskId};
use tracing::{debug, info, warn};

use crate::api::PlanBackend;
use crate::error::ClientError;
use crate::snapshot::{Snapshot, SnapshotStore};

/// Planner session over a task backend.
#[derive(Debug)]
pub struct Planner<B> {
    backend: B,
    snapshots: SnapshotStore,
    max_age: Duration,
    selected: PlanDate,
    tasks: Vec<Task>,
    /// Date `tasks` was last fetched for, which can lag `selected`.
    synced_date: Option<PlanDate>,
    last_synced: Option<DateTime<Utc>>,
    local_edits: bool,
    last_fetch_failed: bool,
}

impl<B: PlanBackend> Planner<B> {
    /// Open a planner on today's date.
    pub async fn open(backend: B, snapshots: SnapshotStore, max_age: Duration) -> Self {
        Self::open_on(backend, snapshots, max_age, PlanDate::today()).await
    }

    /// Open a planner on `date`.
    ///
    /// A fresh snapshot for `date` is used as is; otherwise the tasks are
    /// fetched. An unreadable snapshot is treated as missing.
    pub async fn open_on(
        backend: B,
        snapshots: SnapshotStore,
        max_age: Duration,
        date: PlanDate,
    ) -> Self {
        let snapshot = snapshots.load().unwrap_or_else(|err| {
            warn!(
                error = %err,
                path = %snapshots.path().display(),
                "Ignoring unreadable snapshot"
            );
            None
        });

        let mut planner = Self {
            backend,
            snapshots,
            max_age,
            selected: date,
            tasks: Vec::new(),
            synced_date: None,
            last_synced: None,
            local_edits: false,
            last_fetch_failed: false,
        };

        let fresh = snapshot
            .as_ref()
            .is_some_and(|s| s.is_fresh_for(date, Utc::now(), max_age));

        // A stale snapshot still seeds the cache, so a failed fetch shows it.
        if let Some(snapshot) = snapshot {
            planner.tasks = snapshot.tasks;
            planner.synced_date = snapshot.date;
            planner.last_synced = snapshot.last_synced;
            planner.local_edits = snapshot.local_edits;
        }

        if fresh {
            debug!(tasks = planner.tasks.len(), "Using cached snapshot");
        } else {
            let _ = planner.refresh().await;
        }

        planner
    }

    /// Currently selected date.
    #[must_use]
    pub const fn selected(&self) -> PlanDate {
        self.selected
    }

    /// Every cached task, in store order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// When the cache last matched the store.
    #[must_use]
    pub const fn last_synced(&self) -> Option<DateTime<Utc>> {
        self.last_synced
    }

    /// Whether the cache holds local edits made since the last sync.
    #[must_use]
    pub const fn has_local_edits(&self) -> bool {
        self.local_edits
    }

    /// Tasks on the selected date, in store order.
    ///
    /// A task is shown only if its date string equals the selected date's
    /// `YYYY-MM-DD` form exactly.
    pub fn visible_tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|task| task.is_on(&self.selected))
    }

    /// The `n`th visible task, counting from 1.
    #[must_use]
    pub fn task_at(&self, n: usize) -> Option<&Task> {
        n.checked_sub(1).and_then(|i| self.visible_tasks().nth(i))
    }

    /// Refetch, then return the `n`th visible task, counting from 1.
    ///
    /// Use this to resolve a position the user just read off a listing that
    /// may no longer match the store.
    ///
    /// # Errors
    ///
    /// Returns the fetch error; a position is never resolved against a cache
    /// that could not be refreshed.
    pub async fn current_task_at(&mut self, n: usize) -> Result<Option<&Task>, ClientError> {
        self.refresh().await?;
        Ok(self.task_at(n))
    }

    /// Whether the cache should not be trusted: the last fetch failed, it was
    /// never synced, or it is older than the configured max age.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        if self.last_fetch_failed {
            return true;
        }

        self.last_synced.is_none_or(|synced| {
            !Utc::now()
                .signed_duration_since(synced)
                .to_std()
                .is_ok_and(|age| age <= self.max_age)
        })
    }

    /// Select `date` and fetch its tasks.
    ///
    /// # Errors
    ///
    /// Returns the fetch error; the previous task set is kept.
    pub async fn select_date(&mut self, date: PlanDate) -> Result<(), ClientError> {
        info!(date = %date, "Date selected");
        self.selected = date;
        self.refresh().await
    }

    /// Fetch the selected date's tasks, replacing the cache.
    ///
    /// # Errors
    ///
    /// Returns the fetch error; the previous task set is kept.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        match self.backend.list_tasks(Some(self.selected)).await {
            Ok(tasks) => {
                debug!(date = %self.selected, count = tasks.len(), "Tasks fetched");
                self.tasks = tasks;
                self.synced_date = Some(self.selected);
                self.last_synced = Some(Utc::now());
                self.local_edits = false;
                self.last_fetch_failed = false;
                self.persist();
                Ok(())
            }
            Err(err) => {
                warn!(
                    error = %err,
                    date = %self.selected,
                    "Failed to fetch tasks, keeping cached list"
                );
                self.last_fetch_failed = true;
                Err(err)
            }
        }
    }

    /// Create a task, then refetch.
    ///
    /// A failed refetch after a successful create is logged, not returned.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::EmptyTask` without calling the backend if the
    /// description is missing or blank, otherwise the create error. Nothing
    /// changes locally on error.
    pub async fn add_task(&mut self, request: CreateTaskRequest) -> Result<Task, ClientError> {
        if request.todo.as_deref().is_none_or(|todo| todo.trim().is_empty()) {
            return Err(ClientError::EmptyTask);
        }

        let task = self.backend.create_task(&request).await?;
        info!(task_id = %task.id, "Task added");

        let _ = self.refresh().await;
        Ok(task)
    }

    /// Mark a task completed, then refetch.
    ///
    /// # Errors
    ///
    /// Returns the update error, including `ClientError::NotFound`.
    pub async fn complete_task(&mut self, id: TaskId) -> Result<Task, ClientError> {
        let task = self.backend.set_completed(id, true).await?;
        info!(task_id = %id, "Task completed");

        let _ = self.refresh().await;
        Ok(task)
    }

    /// Delete a task and drop it from the cache without refetching.
    ///
    /// The sync marker is kept and the cache is flagged as locally edited.
    ///
    /// # Errors
    ///
    /// Returns the delete error; the cache is left alone.
    pub async fn delete_task(&mut self, id: TaskId) -> Result<(), ClientError> {
        self.backend.delete_task(id).await?;
        info!(task_id = %id, "Task deleted");

        self.tasks.retain(|task| task.id != id);
        self.local_edits = true;
        self.persist();
        Ok(())
    }

    fn persist(&self) {
        let snapshot = Snapshot {
            date: self.synced_date,
            tasks: self.tasks.clone(),
            last_synced: self.last_synced,
            local_edits: self.local_edits,
        };

        if let Err(err) = self.snapshots.save(&snapshot) {
            warn!(
                error = %err,
                path = %self.snapshots.path().display(),
                "Failed to save snapshot"
            );
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use async_trait::async_trait;
    use daily_planner_core::ValidationMode;
    use tempfile::TempDir;

    use super::*;

    /// In-process backend with a switchable outage.
    #[derive(Default)]
    struct FakeBackend {
        tasks: Mutex<Vec<Task>>,
        offline: AtomicBool,
        listing_down: AtomicBool,
        list_calls: AtomicUsize,
    }

    impl FakeBackend {
        fn with_tasks(tasks: Vec<Task>) -> Self {
            Self {
                tasks: Mutex::new(tasks),
                ..Self::default()
            }
        }

        fn go_offline(&self) {
            self.offline.store(true, Ordering::SeqCst);
        }

        fn check_online(&self) -> Result<(), ClientError> {
            if self.offline.load(Ordering::SeqCst) {
                return Err(ClientError::Status {
                    status: 503,
                    message: "offline".to_string(),
                });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl PlanBackend for FakeBackend {
        async fn list_tasks(&self, date: Option<PlanDate>) -> Result<Vec<Task>, ClientError> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            self.check_online()?;
            if self.listing_down.load(Ordering::SeqCst) {
                return Err(ClientError::Status {
                    status: 500,
                    message: "Internal server error".to_string(),
                });
            }
            let tasks = self.tasks.lock().unwrap();
            Ok(tasks
                .iter()
                .filter(|t| date.is_none_or(|d| t.is_on(&d)))
                .cloned()
                .collect())
        }

        async fn create_task(&self, request: &CreateTaskRequest) -> Result<Task, ClientError> {
            self.check_online()?;
            let task = request
                .clone()
                .validate(ValidationMode::Strict)
                .map_err(|e| ClientError::Status {
                    status: 400,
                    message: e.to_string(),
                })?
                .into_task(TaskId::generate());
            self.tasks.lock().unwrap().push(task.clone());
            Ok(task)
        }

        async fn delete_task(&self, id: TaskId) -> Result<(), ClientError> {
            self.check_online()?;
            let mut tasks = self.tasks.lock().unwrap();
            let before = tasks.len();
            tasks.retain(|t| t.id != id);
            if tasks.len() == before {
                return Err(ClientError::NotFound(id));
            }
            Ok(())
        }

        async fn set_completed(&self, id: TaskId, completed: bool) -> Result<Task, ClientError> {
            self.check_online()?;
            let mut tasks = self.tasks.lock().unwrap();
            let task = tasks
                .iter_mut()
                .find(|t| t.id == id)
                .ok_or(ClientError::NotFound(id))?;
            task.completed = completed;
            Ok(task.clone())
        }
    }

    const MAX_AGE: Duration = Duration::from_secs(300);

    fn date(s: &str) -> PlanDate {
        PlanDate::parse(s).unwrap()
    }

    fn task(day: &str, todo: &str) -> Task {
        Task {
            id: TaskId::generate(),
            date: day.to_owned(),
            description: todo.to_owned(),
            start_time: None,
            end_time: None,
            completed: false,
        }
    }

    fn snapshots(dir: &TempDir) -> SnapshotStore {
        SnapshotStore::new(dir.path().join("snapshot.json"))
    }

    async fn open(
        backend: &Arc<FakeBackend>,
        dir: &TempDir,
        day: &str,
    ) -> Planner<Arc<FakeBackend>> {
        Planner::open_on(backend.clone(), snapshots(dir), MAX_AGE, date(day)).await
    }

    #[tokio::test]
    async fn test_open_fetches_without_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(FakeBackend::with_tasks(vec![task("2024-06-01", "a")]));

        let planner = open(&backend, &dir, "2024-06-01").await;

        assert_eq!(backend.list_calls.load(Ordering::SeqCst), 1);
        assert_eq!(planner.visible_tasks().count(), 1);
        assert!(!planner.is_stale());

        let saved = snapshots(&dir).load().unwrap().unwrap();
        assert_eq!(saved.date, Some(date("2024-06-01")));
        assert_eq!(saved.tasks.len(), 1);
    }

    #[tokio::test]
    async fn test_open_prefers_fresh_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let cached = task("2024-06-01", "cached");
        snapshots(&dir)
            .save(&Snapshot {
                date: Some(date("2024-06-01")),
                tasks: vec![cached.clone()],
                last_synced: Some(Utc::now()),
                local_edits: false,
            })
            .unwrap();
        let backend = Arc::new(FakeBackend::default());

        let planner = open(&backend, &dir, "2024-06-01").await;

        assert_eq!(backend.list_calls.load(Ordering::SeqCst), 0);
        assert_eq!(planner.tasks(), [cached]);
    }

    #[tokio::test]
    async fn test_open_refetches_stale_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        snapshots(&dir)
            .save(&Snapshot {
                date: Some(date("2024-06-01")),
                tasks: vec![task("2024-06-01", "old")],
                last_synced: Some(Utc::now() - chrono::Duration::hours(1)),
                local_edits: false,
            })
            .unwrap();
        let backend = Arc::new(FakeBackend::with_tasks(vec![task("2024-06-01", "new")]));

        let planner = open(&backend, &dir, "2024-06-01").await;

        assert_eq!(backend.list_calls.load(Ordering::SeqCst), 1);
        let names: Vec<_> = planner.visible_tasks().map(|t| t.description.as_str()).collect();
        assert_eq!(names, ["new"]);
    }

    #[tokio::test]
    async fn test_open_offline_keeps_snapshot_and_reports_stale() {
        let dir = tempfile::tempdir().unwrap();
        snapshots(&dir)
            .save(&Snapshot {
                date: Some(date("2024-06-01")),
                tasks: vec![task("2024-06-01", "old")],
                last_synced: Some(Utc::now() - chrono::Duration::hours(1)),
                local_edits: false,
            })
            .unwrap();
        let backend = Arc::new(FakeBackend::default());
        backend.go_offline();

        let planner = open(&backend, &dir, "2024-06-01").await;

        assert_eq!(planner.visible_tasks().count(), 1);
        assert!(planner.is_stale());
    }

    #[tokio::test]
    async fn test_visible_tasks_use_exact_date_match_in_store_order() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(FakeBackend::default());
        let mut planner = open(&backend, &dir, "2024-05-02").await;

        // Whatever the backend returns, only exact matches are shown.
        planner.tasks = vec![
            task("2024-05-02", "second day, first"),
            task("2024-05-01", "first day"),
            task("2024-5-2", "unpadded"),
            task("2024-05-02", "second day, second"),
        ];

        let names: Vec<_> = planner.visible_tasks().map(|t| t.description.as_str()).collect();
        assert_eq!(names, ["second day, first", "second day, second"]);
        assert_eq!(planner.task_at(2).unwrap().description, "second day, second");
        assert!(planner.task_at(0).is_none());
        assert!(planner.task_at(3).is_none());
    }

    #[tokio::test]
    async fn test_select_date_failure_keeps_tasks() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(FakeBackend::with_tasks(vec![task("2024-06-01", "a")]));
        let mut planner = open(&backend, &dir, "2024-06-01").await;
        backend.go_offline();

        let result = planner.select_date(date("2024-06-02")).await;

        assert!(result.is_err());
        assert_eq!(planner.selected(), date("2024-06-02"));
        assert_eq!(planner.tasks().len(), 1);
        assert_eq!(planner.visible_tasks().count(), 0);
        assert!(planner.is_stale());
    }

    #[tokio::test]
    async fn test_add_and_complete_refetch() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(FakeBackend::default());
        let mut planner = open(&backend, &dir, "2024-06-01").await;
        let calls_after_open = backend.list_calls.load(Ordering::SeqCst);

        let created = planner
            .add_task(CreateTaskRequest::new(date("2024-06-01"), "Write report"))
            .await
            .unwrap();
        assert_eq!(planner.visible_tasks().count(), 1);

        planner.complete_task(created.id).await.unwrap();
        assert!(planner.task_at(1).unwrap().completed);

        assert_eq!(backend.list_calls.load(Ordering::SeqCst), calls_after_open + 2);
    }

    #[tokio::test]
    async fn test_rejected_add_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(FakeBackend::default());
        let mut planner = open(&backend, &dir, "2024-06-01").await;

        let mut request = CreateTaskRequest::new(date("2024-06-01"), "Write report");
        request.start_time = Some("9am".to_owned());
        let result = planner.add_task(request).await;

        assert!(matches!(result, Err(ClientError::Status { status: 400, .. })));
        assert!(planner.tasks().is_empty());
    }

    #[tokio::test]
    async fn test_blank_add_never_reaches_backend() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(FakeBackend::default());
        let mut planner = open(&backend, &dir, "2024-06-01").await;

        let blank = CreateTaskRequest::new(date("2024-06-01"), "   ");
        assert!(matches!(planner.add_task(blank).await, Err(ClientError::EmptyTask)));

        let missing = CreateTaskRequest {
            todo: None,
            ..CreateTaskRequest::new(date("2024-06-01"), "")
        };
        assert!(matches!(planner.add_task(missing).await, Err(ClientError::EmptyTask)));

        assert!(backend.tasks.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_removes_locally_without_refetch() {
        let dir = tempfile::tempdir().unwrap();
        let doomed = task("2024-06-01", "doomed");
        let backend = Arc::new(FakeBackend::with_tasks(vec![
            doomed.clone(),
            task("2024-06-01", "keep"),
        ]));
        let mut planner = open(&backend, &dir, "2024-06-01").await;
        let synced = planner.last_synced();
        let calls = backend.list_calls.load(Ordering::SeqCst);

        planner.delete_task(doomed.id).await.unwrap();

        assert_eq!(backend.list_calls.load(Ordering::SeqCst), calls);
        assert!(planner.tasks().iter().all(|t| t.id != doomed.id));
        assert_eq!(planner.last_synced(), synced);
        assert!(planner.has_local_edits());

        let saved = snapshots(&dir).load().unwrap().unwrap();
        assert_eq!(saved.tasks.len(), 1);
        assert!(saved.local_edits);
    }

    #[tokio::test]
    async fn test_complete_unknown_reports_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(FakeBackend::default());
        let mut planner = open(&backend, &dir, "2024-06-01").await;

        let id = TaskId::generate();
        let result = planner.complete_task(id).await;
        assert!(matches!(result, Err(ClientError::NotFound(missing)) if missing == id));
    }

    #[tokio::test]
    async fn test_snapshot_keeps_date_of_last_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let a = task("2024-06-01", "a");
        let b = task("2024-06-01", "b");
        snapshots(&dir)
            .save(&Snapshot {
                date: Some(date("2024-06-01")),
                tasks: vec![a.clone(), b.clone()],
                last_synced: Some(Utc::now()),
                local_edits: false,
            })
            .unwrap();
        let backend = Arc::new(FakeBackend::with_tasks(vec![
            a.clone(),
            b,
            task("2024-06-02", "c"),
        ]));
        backend.listing_down.store(true, Ordering::SeqCst);

        let mut planner = open(&backend, &dir, "2024-06-02").await;
        assert!(planner.is_stale());
        planner.delete_task(a.id).await.unwrap();

        let saved = snapshots(&dir).load().unwrap().unwrap();
        assert_eq!(saved.date, Some(date("2024-06-01")));

        backend.listing_down.store(false, Ordering::SeqCst);
        let calls = backend.list_calls.load(Ordering::SeqCst);
        let planner = open(&backend, &dir, "2024-06-02").await;

        assert_eq!(backend.list_calls.load(Ordering::SeqCst), calls + 1);
        let names: Vec<_> = planner.visible_tasks().map(|t| t.description.as_str()).collect();
        assert_eq!(names, ["c"]);
    }

    #[tokio::test]
    async fn test_current_task_at_sees_changes_made_elsewhere() {
        let dir = tempfile::tempdir().unwrap();
        let first = task("2024-06-01", "first");
        let backend = Arc::new(FakeBackend::with_tasks(vec![
            first.clone(),
            task("2024-06-01", "second"),
        ]));
        let mut planner = open(&backend, &dir, "2024-06-01").await;
        assert_eq!(planner.task_at(1).unwrap().id, first.id);

        // Another client deletes the first task.
        backend.tasks.lock().unwrap().retain(|t| t.id != first.id);

        let current = planner.current_task_at(1).await.unwrap().unwrap();
        assert_eq!(current.description, "second");
        assert!(planner.current_task_at(2).await.unwrap().is_none());

        backend.go_offline();
        assert!(planner.current_task_at(1).await.is_err());
    }
}
