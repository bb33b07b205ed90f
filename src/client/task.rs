use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bytes::Bytes;
use serde::Serialize;
use uuid::Uuid;

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// A file picked on the client, held in memory.
#[derive(Debug, Clone)]
pub struct LocalFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl LocalFile {
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// `.ext` in lowercase, or empty when the name has no dot.
    pub fn dotted_extension(&self) -> String {
        match self.name.rsplit_once('.') {
            Some((_, ext)) => format!(".{}", ext.to_ascii_lowercase()),
            None => String::new(),
        }
    }

    /// The type the presigned PUT is signed for. Must match on transfer.
    pub fn effective_content_type(&self) -> &str {
        match self.content_type.trim() {
            "" => FALLBACK_CONTENT_TYPE,
            ct => ct,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    Idle,
    Uploading,
    Success,
    Error,
}

impl UploadStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, UploadStatus::Success | UploadStatus::Error)
    }
}

/// `floor(sent / total * 100)`, clamped to 100. Zero-length transfers stay
/// at 0 until the task succeeds.
pub fn progress_percent(sent: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    let percent = (sent as u128 * 100) / total as u128;
    percent.min(100) as u8
}

/// One upload attempt. Terminal states are final: a failed upload is retried
/// as a new task.
#[derive(Debug, Clone)]
pub struct UploadTask {
    pub id: String,
    pub file: LocalFile,
    pub key: Option<String>,
    pub public_url: Option<String>,
    pub status: UploadStatus,
    pub progress: u8,
    pub error: Option<String>,
}

impl UploadTask {
    pub fn new(file: LocalFile) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            file,
            key: None,
            public_url: None,
            status: UploadStatus::Idle,
            progress: 0,
            error: None,
        }
    }

    pub fn start(&mut self) -> bool {
        if self.status != UploadStatus::Idle {
            return false;
        }
        self.status = UploadStatus::Uploading;
        true
    }

    pub fn set_progress(&mut self, sent: u64, total: u64) -> bool {
        if self.status != UploadStatus::Uploading {
            return false;
        }
        self.progress = progress_percent(sent, total);
        true
    }

    pub fn succeed(&mut self, key: String, public_url: String) -> bool {
        if self.status != UploadStatus::Uploading {
            return false;
        }
        self.status = UploadStatus::Success;
        self.progress = 100;
        self.key = Some(key);
        self.public_url = Some(public_url);
        true
    }

    pub fn fail(&mut self, message: impl Into<String>) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = UploadStatus::Error;
        self.error = Some(message.into());
        true
    }
}

/// The visible task list. Cloning shares the same list.
#[derive(Debug, Clone, Default)]
pub struct TaskList {
    tasks: Arc<Mutex<Vec<UploadTask>>>,
}

impl TaskList {
    fn lock(&self) -> MutexGuard<'_, Vec<UploadTask>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn push(&self, task: UploadTask) {
        self.lock().push(task);
    }

    /// Applies `f` to the task with `id`, if it is still listed.
    pub fn update<R>(&self, id: &str, f: impl FnOnce(&mut UploadTask) -> R) -> Option<R> {
        self.lock().iter_mut().find(|t| t.id == id).map(f)
    }

    /// Overwrites the listed copy of `task`; no-op once it was removed.
    pub fn replace(&self, task: &UploadTask) {
        self.update(&task.id, |listed| *listed = task.clone());
    }

    pub fn get(&self, id: &str) -> Option<UploadTask> {
        self.lock().iter().find(|t| t.id == id).cloned()
    }

    pub fn snapshot(&self) -> Vec<UploadTask> {
        self.lock().clone()
    }

    pub fn remove(&self, id: &str) -> bool {
        let mut tasks = self.lock();
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        tasks.len() != before
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn is_uploading(&self) -> bool {
        self.lock()
            .iter()
            .any(|t| t.status == UploadStatus::Uploading)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
