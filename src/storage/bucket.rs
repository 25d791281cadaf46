//! Bucket-scoped object storage (S3, local filesystem, memory)

use super::paths::ObjectLocation;
use crate::config::StorageBackend;
use crate::error::{Error, Result};
use bytes::Bytes;
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// One named bucket backed by an object store
#[derive(Debug, Clone)]
pub struct BucketStore {
    bucket: String,
    store: Arc<dyn ObjectStore>,
    scheme: &'static str,
}

impl BucketStore {
    /// Wrap an existing store
    pub fn new(bucket: impl Into<String>, store: Arc<dyn ObjectStore>) -> Self {
        Self {
            bucket: bucket.into(),
            store,
            scheme: "custom",
        }
    }

    /// Build the store for `bucket` on the configured backend
    pub fn from_backend(backend: &StorageBackend, bucket: &str) -> Result<Self> {
        match backend {
            StorageBackend::S3 => Self::s3(bucket),
            StorageBackend::Local { root } => Self::local(root, bucket),
            StorageBackend::Memory => Ok(Self::memory(bucket)),
        }
    }

    /// AWS S3 bucket; credentials and region come from the environment
    pub fn s3(bucket: &str) -> Result<Self> {
        let store = AmazonS3Builder::from_env()
            .with_bucket_name(bucket)
            .build()
            .map_err(|e| Error::config(format!("Failed to create s3 client: {e}")))?;

        Ok(Self {
            bucket: bucket.to_string(),
            store: Arc::new(store),
            scheme: "s3",
        })
    }

    /// Directory `{root}/{bucket}` on the local filesystem
    pub fn local(root: impl AsRef<Path>, bucket: &str) -> Result<Self> {
        let dir = root.as_ref().join(bucket);

        std::fs::create_dir_all(&dir).map_err(|e| {
            Error::config(format!("Failed to create directory {}: {e}", dir.display()))
        })?;

        let store = LocalFileSystem::new_with_prefix(&dir)
            .map_err(|e| Error::config(format!("Failed to create local store: {e}")))?;

        Ok(Self {
            bucket: bucket.to_string(),
            store: Arc::new(store),
            scheme: "file",
        })
    }

    /// Fresh in-memory bucket
    pub fn memory(bucket: &str) -> Self {
        Self {
            bucket: bucket.to_string(),
            store: Arc::new(InMemory::new()),
            scheme: "memory",
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Backend scheme (s3, file, memory, custom)
    pub fn scheme(&self) -> &str {
        self.scheme
    }

    /// Location of `key` in this bucket
    pub fn location(&self, key: impl Into<String>) -> ObjectLocation {
        ObjectLocation::new(self.bucket.clone(), key)
    }

    /// Write an object, replacing any existing one
    pub async fn put(&self, location: &ObjectLocation, data: Bytes) -> Result<()> {
        let path = self.object_path(location)?;
        let size = data.len();

        self.store
            .put(&path, data.into())
            .await
            .map_err(|e| Error::storage(location.to_string(), e.to_string()))?;

        debug!(location = %location, size, "object written");
        Ok(())
    }

    /// Read a whole object
    pub async fn get(&self, location: &ObjectLocation) -> Result<Bytes> {
        let path = self.object_path(location)?;

        let result = self
            .store
            .get(&path)
            .await
            .map_err(|e| Error::storage(location.to_string(), e.to_string()))?;

        result
            .bytes()
            .await
            .map_err(|e| Error::storage(location.to_string(), e.to_string()))
    }

    /// Map a location onto a path in this store
    fn object_path(&self, location: &ObjectLocation) -> Result<ObjectPath> {
        if location.bucket() != self.bucket {
            return Err(Error::storage(
                location.to_string(),
                format!("bucket '{}' is not '{}'", location.bucket(), self.bucket),
            ));
        }

        ObjectPath::parse(location.key())
            .map_err(|e| Error::invalid_location(location.to_string(), e.to_string()))
    }
}
