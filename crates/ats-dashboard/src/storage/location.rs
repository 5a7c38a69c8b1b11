use std::path::PathBuf;
use std::sync::Arc;

use object_store::aws::{AmazonS3Builder, S3ConditionalPut};
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::prefix::PrefixStore;
use object_store::ObjectStore;
use url::Url;

use super::StorageError;

/// Build the object store behind a storage root.
///
/// Accepted roots:
/// - `s3://bucket/prefix`, with credentials and region taken from the usual `AWS_*` variables;
/// - `memory://`, a process-local store;
/// - `file:///absolute/dir` or a plain directory path, created when missing.
pub fn build_object_store(root: &str) -> Result<Arc<dyn ObjectStore>, StorageError> {
    let trimmed = root.trim();
    if trimmed.is_empty() {
        return Err(StorageError::Location(
            "storage root must not be empty".to_string(),
        ));
    }

    match Url::parse(trimmed) {
        Ok(url) if url.scheme() == "s3" => build_s3(&url),
        Ok(url) if url.scheme() == "memory" => Ok(Arc::new(InMemory::new())),
        Ok(url) if url.scheme() == "file" => {
            let path = url.to_file_path().map_err(|_| {
                StorageError::Location(format!("'{trimmed}' is not a usable file URL"))
            })?;
            build_local(path)
        }
        // Single letter schemes are Windows drive letters, not URLs.
        Ok(url) if url.scheme().len() > 1 => Err(StorageError::Location(format!(
            "unsupported storage scheme '{}'",
            url.scheme()
        ))),
        _ => build_local(PathBuf::from(trimmed)),
    }
}

fn build_s3(url: &Url) -> Result<Arc<dyn ObjectStore>, StorageError> {
    let bucket = url
        .host_str()
        .filter(|bucket| !bucket.is_empty())
        .ok_or_else(|| StorageError::Location(format!("'{url}' names no bucket")))?;

    let s3 = AmazonS3Builder::from_env()
        .with_bucket_name(bucket)
        .with_conditional_put(S3ConditionalPut::ETagMatch)
        .build()
        .map_err(|err| StorageError::Location(format!("S3: {err}")))?;

    let prefix = url.path().trim_matches('/');
    if prefix.is_empty() {
        Ok(Arc::new(s3))
    } else {
        Ok(Arc::new(PrefixStore::new(s3, prefix)))
    }
}

fn build_local(path: PathBuf) -> Result<Arc<dyn ObjectStore>, StorageError> {
    if !path.exists() {
        std::fs::create_dir_all(&path).map_err(|err| {
            StorageError::Location(format!(
                "failed to create storage directory '{}': {err}",
                path.display()
            ))
        })?;
    }

    let absolute = path.canonicalize().map_err(|err| {
        StorageError::Location(format!(
            "failed to resolve storage directory '{}': {err}",
            path.display()
        ))
    })?;

    LocalFileSystem::new_with_prefix(absolute)
        .map(|fs| Arc::new(fs) as Arc<dyn ObjectStore>)
        .map_err(|err| StorageError::Location(format!("LocalFileSystem: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use object_store::path::Path as ObjectPath;
    use object_store::PutPayload;

    #[test]
    fn rejects_blank_and_unknown_roots() {
        assert!(matches!(
            build_object_store("  "),
            Err(StorageError::Location(_))
        ));
        assert!(matches!(
            build_object_store("ftp://example.com/data"),
            Err(StorageError::Location(message)) if message.contains("ftp")
        ));
    }

    #[tokio::test]
    async fn memory_roots_are_usable() {
        let store = build_object_store("memory://").expect("memory store");
        let location = ObjectPath::from("probe.csv");
        store
            .put(&location, PutPayload::from_static(b"a\n"))
            .await
            .expect("put");
        let bytes = store
            .get(&location)
            .await
            .expect("get")
            .bytes()
            .await
            .expect("bytes");
        assert_eq!(&bytes[..], b"a\n");
    }

    #[test]
    fn local_roots_create_their_directory() {
        let dir = std::env::temp_dir().join(format!("ats-dashboard-root-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);

        build_object_store(dir.to_str().expect("utf8 temp path")).expect("local store");
        assert!(dir.is_dir());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
