use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

use crate::client::{
    api::{ProgressFn, UploadApi},
    error::UploadError,
    task::{LocalFile, TaskList, UploadTask},
    validation::UploadOptions,
};

/// Lifecycle notifications for observers of an [`Uploader`].
#[derive(Debug, Clone)]
pub enum UploadEvent {
    Progress { id: String, progress: u8 },
    Completed(UploadTask),
    Failed { task: UploadTask, error: UploadError },
}

/// Drives files through validate → presign → transfer and keeps the visible
/// task list current. Persisting metadata is left to the caller.
pub struct Uploader {
    api: Arc<dyn UploadApi>,
    options: UploadOptions,
    tasks: TaskList,
    events: Option<UnboundedSender<UploadEvent>>,
}

impl Uploader {
    pub fn new(api: Arc<dyn UploadApi>, options: UploadOptions) -> Self {
        Self {
            api,
            options,
            tasks: TaskList::default(),
            events: None,
        }
    }

    pub fn with_events(mut self, events: UnboundedSender<UploadEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn options(&self) -> &UploadOptions {
        &self.options
    }

    pub fn tasks(&self) -> Vec<UploadTask> {
        self.tasks.snapshot()
    }

    pub fn task(&self, id: &str) -> Option<UploadTask> {
        self.tasks.get(id)
    }

    pub fn is_uploading(&self) -> bool {
        self.tasks.is_uploading()
    }

    /// Stops tracking the task. An in-flight transfer keeps running.
    pub fn remove(&self, id: &str) -> bool {
        self.tasks.remove(id)
    }

    pub fn clear(&self) {
        self.tasks.clear();
    }

    fn emit(&self, event: UploadEvent) {
        if let Some(events) = &self.events {
            // A dropped receiver only means nobody is listening.
            let _ = events.send(event);
        }
    }

    fn fail(&self, mut task: UploadTask, error: UploadError) -> UploadError {
        warn!("Upload of {} failed: {}", task.file.name, error);
        if let Some(listed) = self.tasks.get(&task.id) {
            task.progress = listed.progress;
        }
        task.fail(error.to_string());
        self.tasks.replace(&task);
        self.emit(UploadEvent::Failed {
            task,
            error: error.clone(),
        });
        error
    }

    pub async fn upload(&self, file: LocalFile) -> Result<UploadTask, UploadError> {
        let mut task = UploadTask::new(file);
        self.tasks.push(task.clone());

        if let Err(error) = self.options.validate(&task.file) {
            return Err(self.fail(task, error));
        }

        task.start();
        self.tasks.replace(&task);

        let target = match self
            .api
            .request_upload_url(&task.file.name, task.file.effective_content_type())
            .await
        {
            Ok(target) => target,
            Err(error) => return Err(self.fail(task, error)),
        };

        let on_progress: ProgressFn = {
            let tasks = self.tasks.clone();
            let events = self.events.clone();
            let id = task.id.clone();
            Arc::new(move |sent: u64, total: u64| {
                let progress = tasks.update(&id, |t| {
                    t.set_progress(sent, total);
                    t.progress
                });
                if let (Some(progress), Some(events)) = (progress, &events) {
                    let _ = events.send(UploadEvent::Progress {
                        id: id.clone(),
                        progress,
                    });
                }
            })
        };

        if let Err(error) = self
            .api
            .transfer(&target.presigned_url, &task.file, on_progress)
            .await
        {
            return Err(self.fail(task, error));
        }

        task.succeed(target.key, target.public_url);
        self.tasks.replace(&task);
        info!(
            "Uploaded {} as {}",
            task.file.name,
            task.key.as_deref().unwrap_or_default()
        );
        self.emit(UploadEvent::Completed(task.clone()));

        Ok(task)
    }

    /// Uploads every file concurrently and returns the tasks that succeeded.
    /// Failures stay visible in the task list.
    pub async fn upload_multiple(&self, files: Vec<LocalFile>) -> Vec<UploadTask> {
        join_all(files.into_iter().map(|file| self.upload(file)))
            .await
            .into_iter()
            .filter_map(Result::ok)
            .collect()
    }
}
