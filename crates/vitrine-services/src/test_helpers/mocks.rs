//! Mock implementations for testing
//!
//! These mocks allow testing services without database or filesystem
//! dependencies.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;
use vitrine_core::{AppError, Media, MediaType, NewMedia};
use vitrine_db::{MediaFileUpdate, MediaStore};
use vitrine_storage::{Storage, StorageError, StorageResult};

/// In-memory media store
#[derive(Clone, Default)]
pub struct MockMediaStore {
    rows: Arc<Mutex<Vec<Media>>>,
    next_id: Arc<Mutex<i64>>,
}

impl MockMediaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pre-built row as-is, keeping its id and timestamps.
    pub fn add_row(&self, media: Media) {
        let mut next_id = self.next_id.lock().unwrap();
        *next_id = (*next_id).max(media.id);
        self.rows.lock().unwrap().push(media);
    }

    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

fn newest_first(rows: &mut [Media]) {
    rows.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}

#[async_trait]
impl MediaStore for MockMediaStore {
    async fn insert(&self, media: NewMedia) -> Result<Media, AppError> {
        let id = {
            let mut next_id = self.next_id.lock().unwrap();
            *next_id += 1;
            *next_id
        };
        let now = Utc::now();
        let row = Media {
            id,
            uuid: media.uuid,
            filename: media.filename,
            original_name: media.original_name,
            mime_type: media.mime_type,
            extension: media.extension,
            size: media.size,
            disk: media.disk,
            path: media.path,
            url: media.url,
            media_type: media.media_type,
            metadata: media.metadata,
            description: media.description,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        self.rows.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn get(&self, id: i64) -> Result<Option<Media>, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.id == id && m.deleted_at.is_none())
            .cloned())
    }

    async fn get_by_uuid(&self, uuid: Uuid) -> Result<Option<Media>, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.uuid == uuid && m.deleted_at.is_none())
            .cloned())
    }

    async fn list(
        &self,
        media_type: Option<MediaType>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Media>, u64), AppError> {
        let mut rows: Vec<Media> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.deleted_at.is_none())
            .filter(|m| media_type.map_or(true, |t| m.media_type == t))
            .cloned()
            .collect();
        newest_first(&mut rows);

        let total = rows.len() as u64;
        let page: Vec<Media> = rows
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect();
        Ok((page, total))
    }

    async fn list_all(&self) -> Result<Vec<Media>, AppError> {
        let mut rows: Vec<Media> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.deleted_at.is_none())
            .cloned()
            .collect();
        newest_first(&mut rows);
        Ok(rows)
    }

    async fn update_file(
        &self,
        id: i64,
        update: MediaFileUpdate,
    ) -> Result<Option<Media>, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|m| m.id == id && m.deleted_at.is_none());
        Ok(row.map(|m| {
            m.filename = update.filename;
            m.original_name = update.original_name;
            m.mime_type = update.mime_type;
            m.extension = update.extension;
            m.size = update.size;
            m.path = update.path;
            m.url = update.url;
            m.media_type = update.media_type;
            m.metadata = update.metadata;
            m.updated_at = Utc::now();
            m.clone()
        }))
    }

    async fn soft_delete(&self, id: i64) -> Result<bool, AppError> {
        let mut rows = self.rows.lock().unwrap();
        match rows
            .iter_mut()
            .find(|m| m.id == id && m.deleted_at.is_none())
        {
            Some(m) => {
                m.deleted_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn hard_delete(&self, id: i64) -> Result<bool, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|m| m.id != id);
        Ok(rows.len() < before)
    }

    async fn referenced_paths(&self) -> Result<Vec<String>, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.deleted_at.is_none())
            .map(|m| m.path.clone())
            .collect())
    }
}

/// In-memory storage backend
#[derive(Clone)]
pub struct MockStorage {
    files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    base_url: String,
}

impl Default for MockStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl MockStorage {
    pub fn new() -> Self {
        Self {
            files: Arc::new(Mutex::new(HashMap::new())),
            base_url: "http://localhost:3000".to_string(),
        }
    }

    pub fn add_file(&self, path: &str, data: Vec<u8>) {
        self.files.lock().unwrap().insert(path.to_string(), data);
    }
}

#[async_trait]
impl Storage for MockStorage {
    async fn put(&self, path: &str, data: Vec<u8>, _content_type: &str) -> StorageResult<String> {
        self.files.lock().unwrap().insert(path.to_string(), data);
        Ok(self.url(path))
    }

    async fn exists(&self, path: &str) -> StorageResult<bool> {
        Ok(self.files.lock().unwrap().contains_key(path))
    }

    async fn size(&self, path: &str) -> StorageResult<u64> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .map(|d| d.len() as u64)
            .ok_or_else(|| StorageError::NotFound(path.to_string()))
    }

    fn url(&self, path: &str) -> String {
        format!("{}/storage/{}", self.base_url, path)
    }

    async fn delete(&self, path: &str) -> StorageResult<()> {
        self.files.lock().unwrap().remove(path);
        Ok(())
    }

    async fn copy(&self, from: &str, to: &str) -> StorageResult<String> {
        let data = self
            .files
            .lock()
            .unwrap()
            .get(from)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(from.to_string()))?;
        self.files.lock().unwrap().insert(to.to_string(), data);
        Ok(self.url(to))
    }

    async fn rename(&self, from: &str, to: &str) -> StorageResult<String> {
        let data = self
            .files
            .lock()
            .unwrap()
            .remove(from)
            .ok_or_else(|| StorageError::NotFound(from.to_string()))?;
        self.files.lock().unwrap().insert(to.to_string(), data);
        Ok(self.url(to))
    }

    async fn list_all(&self, prefix: &str) -> StorageResult<Vec<String>> {
        let dir_prefix = format!("{}/", prefix.trim_end_matches('/'));
        let mut paths: Vec<String> = self
            .files
            .lock()
            .unwrap()
            .keys()
            .filter(|p| p.starts_with(&dir_prefix))
            .cloned()
            .collect();
        paths.sort();
        Ok(paths)
    }

    fn disk_name(&self) -> &str {
        "public"
    }
}
