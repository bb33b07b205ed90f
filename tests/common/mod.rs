#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use chrono::{TimeDelta, Utc};
use filebox_service::{
    adapters::state::AppState,
    application::{
        dto::{stored_file_dto::StoredFileDTO, user_dto::UserDTO},
        error::ApplicationError,
        repositories::{file_repository::FileRepository, user_repository::UserRepository},
        services::{AccessGuard, SessionResolver, StorageService},
    },
    create_app,
    domain::{
        config::storage::UploadSettings,
        models::{
            session::{Credentials, Session},
            stored_file::StoredFile,
            user::User,
        },
    },
};
use http_body_util::BodyExt;
use tower::ServiceExt;

/// Bearer token → user id.
pub struct StaticSessions(pub HashMap<String, String>);

impl StaticSessions {
    pub fn with(pairs: &[(&str, &str)]) -> Self {
        Self(
            pairs
                .iter()
                .map(|(token, user)| (token.to_string(), user.to_string()))
                .collect(),
        )
    }
}

#[async_trait]
impl SessionResolver for StaticSessions {
    async fn resolve_session(&self, credentials: &Credentials) -> Option<Session> {
        let token = credentials.token("session")?;
        let user_id = self.0.get(token)?;
        Some(Session {
            user: User {
                id: user_id.clone(),
                email: Some(format!("{}@example.com", user_id)),
                ..Default::default()
            },
            expires_at: None,
        })
    }

    fn provider_name(&self) -> &'static str {
        "static"
    }
}

#[derive(Default)]
pub struct MemoryStorage {
    pub objects: Mutex<HashSet<String>>,
    pub presign_calls: AtomicUsize,
    pub delete_calls: AtomicUsize,
}

impl MemoryStorage {
    pub fn put(&self, key: &str) {
        self.objects.lock().unwrap().insert(key.to_string());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects.lock().unwrap().contains(key)
    }
}

#[async_trait]
impl StorageService for MemoryStorage {
    async fn presign_upload(
        &self,
        key: &str,
        content_type: &str,
        ttl: Duration,
    ) -> Result<String, ApplicationError> {
        self.presign_calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!(
            "https://storage.test/bucket/{}?op=put&type={}&ttl={}",
            key,
            content_type,
            ttl.as_secs()
        ))
    }

    async fn presign_download(&self, key: &str, ttl: Duration) -> Result<String, ApplicationError> {
        Ok(format!(
            "https://storage.test/bucket/{}?op=get&ttl={}",
            key,
            ttl.as_secs()
        ))
    }

    async fn delete(&self, key: &str) -> Result<(), ApplicationError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if self.objects.lock().unwrap().remove(key) {
            Ok(())
        } else {
            Err(ApplicationError::NotFound)
        }
    }

    fn provider_name(&self) -> &'static str {
        "memory"
    }
}

/// Rows get strictly increasing creation times so ordering is deterministic.
#[derive(Default)]
pub struct MemoryFiles {
    pub rows: Mutex<Vec<StoredFile>>,
}

#[async_trait]
impl FileRepository for MemoryFiles {
    async fn list_files(&self, owner_id: &str) -> Result<Vec<StoredFile>, ApplicationError> {
        let mut files: Vec<_> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|f| f.owner_id == owner_id)
            .cloned()
            .collect();
        files.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(files)
    }

    async fn insert_file(&self, file: StoredFileDTO) -> Result<StoredFile, ApplicationError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|f| f.id == file.id || f.key == file.key) {
            return Err(ApplicationError::Conflict("duplicate file".to_string()));
        }
        let mut stored = StoredFile::from(file);
        stored.created_at = Utc::now() + TimeDelta::milliseconds(rows.len() as i64);
        rows.push(stored.clone());
        Ok(stored)
    }

    async fn delete_file_by_key(&self, key: &str) -> Result<Option<StoredFile>, ApplicationError> {
        let mut rows = self.rows.lock().unwrap();
        let position = rows.iter().position(|f| f.key == key);
        Ok(position.map(|i| rows.remove(i)))
    }
}

#[derive(Default)]
pub struct MemoryUsers {
    pub rows: Mutex<HashMap<String, User>>,
}

#[async_trait]
impl UserRepository for MemoryUsers {
    async fn get_user(&self, id: &str) -> Result<Option<User>, ApplicationError> {
        Ok(self.rows.lock().unwrap().get(id).cloned())
    }

    async fn ensure_user(&self, user: UserDTO) -> Result<User, ApplicationError> {
        let mut rows = self.rows.lock().unwrap();
        let stored = rows.entry(user.id.clone()).or_insert_with(|| User {
            id: user.id,
            email: user.email,
            name: user.name,
            image: user.image,
            created_at: Some(Utc::now()),
            updated_at: Some(Utc::now()),
        });
        Ok(stored.clone())
    }

    async fn update_user(&self, user: UserDTO) -> Result<User, ApplicationError> {
        let mut rows = self.rows.lock().unwrap();
        let stored = rows.get_mut(&user.id).ok_or(ApplicationError::NotFound)?;
        if let Some(name) = user.name {
            stored.name = Some(name);
        }
        if let Some(image) = user.image {
            stored.image = Some(image);
        }
        if let Some(email) = user.email {
            stored.email = Some(email);
        }
        stored.updated_at = Some(Utc::now());
        Ok(stored.clone())
    }
}

pub struct TestApp {
    pub router: Router,
    pub storage: Arc<MemoryStorage>,
    pub files: Arc<MemoryFiles>,
    pub users: Arc<MemoryUsers>,
}

/// Tokens `token-a` and `token-b` belong to users `user-a` and `user-b`.
pub fn test_app() -> TestApp {
    test_app_with(UploadSettings::default())
}

pub fn test_app_with(upload_settings: UploadSettings) -> TestApp {
    let storage = Arc::new(MemoryStorage::default());
    let files = Arc::new(MemoryFiles::default());
    let users = Arc::new(MemoryUsers::default());
    let sessions = StaticSessions::with(&[("token-a", "user-a"), ("token-b", "user-b")]);

    let state = AppState {
        access_guard: AccessGuard::new(Arc::new(sessions)),
        storage_service: storage.clone(),
        file_repository: files.clone(),
        user_repository: users.clone(),
        upload_settings,
    };

    TestApp {
        router: create_app(state),
        storage,
        files,
        users,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }
}

pub fn request(method: &str, uri: &str, token: Option<&str>, body: Option<serde_json::Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
