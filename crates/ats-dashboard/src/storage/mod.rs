//! Storage accessor: whole-object CSV reads and writes against any `object_store` backend.

mod codec;
mod location;

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::{
    Error as ObjectStoreError, ObjectStore, PutMode, PutPayload, PutResult, UpdateVersion,
};
use tracing::{debug, warn};

use crate::config::StorageConfig;
use crate::records::Record;
use crate::table::{ReferenceTable, Table};

pub use codec::{decode_reference, decode_table, encode_table, SchemaError};
pub use location::build_object_store;

/// Version of a stored object observed when it was read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageVersion {
    /// The object did not exist.
    Absent,
    Existing {
        e_tag: Option<String>,
        version: Option<String>,
    },
}

impl StorageVersion {
    fn from_put(result: PutResult) -> Self {
        Self::Existing {
            e_tag: result.e_tag,
            version: result.version,
        }
    }

    /// Opaque text form carried through HTML forms.
    pub fn token(&self) -> String {
        match self {
            StorageVersion::Absent => "absent".to_string(),
            StorageVersion::Existing { e_tag, version } => format!(
                "etag:{}|version:{}",
                e_tag.as_deref().unwrap_or_default(),
                version.as_deref().unwrap_or_default()
            ),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, StorageVersion::Absent)
    }
}

/// A loaded table together with the storage version it was read at.
#[derive(Debug, Clone)]
pub struct TableSnapshot<T> {
    pub table: T,
    pub version: StorageVersion,
}

impl<T> TableSnapshot<T> {
    /// The resource was absent and the table is an empty stand-in.
    pub fn is_missing(&self) -> bool {
        self.version.is_absent()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("{resource} has an unexpected layout: {source}")]
    Schema {
        resource: String,
        #[source]
        source: SchemaError,
    },
    #[error("{resource} changed since it was loaded; reload and retry")]
    Conflict { resource: String },
    #[error("storage backend failed for {resource}: {source}")]
    Backend {
        resource: String,
        #[source]
        source: ObjectStoreError,
    },
    #[error("invalid storage location: {0}")]
    Location(String),
}

impl StorageError {
    fn backend(resource: &str, source: ObjectStoreError) -> Self {
        Self::Backend {
            resource: resource.to_string(),
            source,
        }
    }

    fn schema(resource: &str, source: SchemaError) -> Self {
        Self::Schema {
            resource: resource.to_string(),
            source,
        }
    }
}

/// Reads and writes named tables under one storage root.
#[derive(Clone)]
pub struct StorageAccessor {
    store: Arc<dyn ObjectStore>,
    conflict_check: bool,
}

impl fmt::Debug for StorageAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageAccessor")
            .field("store", &self.store.to_string())
            .field("conflict_check", &self.conflict_check)
            .finish()
    }
}

impl StorageAccessor {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            store,
            conflict_check: true,
        }
    }

    /// Process-local storage, used by tests and `memory://` roots.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemory::new()))
    }

    pub fn from_config(config: &StorageConfig) -> Result<Self, StorageError> {
        let store = build_object_store(&config.url)?;
        Ok(Self::new(store).with_conflict_check(config.conflict_check))
    }

    /// Disable to fall back to plain last-writer-wins overwrites.
    pub fn with_conflict_check(mut self, enabled: bool) -> Self {
        self.conflict_check = enabled;
        self
    }

    pub fn conflict_check(&self) -> bool {
        self.conflict_check
    }

    /// Load a typed table; a missing object yields an empty table with the declared columns.
    pub async fn load<R: Record>(&self) -> Result<TableSnapshot<Table<R>>, StorageError> {
        match self.fetch(R::RESOURCE).await? {
            Some((bytes, version)) => {
                let table =
                    decode_table::<R>(&bytes).map_err(|err| StorageError::schema(R::RESOURCE, err))?;
                debug!(resource = R::RESOURCE, rows = table.len(), "table loaded");
                Ok(TableSnapshot { table, version })
            }
            None => Ok(TableSnapshot {
                table: Table::empty(),
                version: StorageVersion::Absent,
            }),
        }
    }

    /// Load an untyped, read-only table.
    pub async fn load_reference(
        &self,
        resource: &str,
    ) -> Result<TableSnapshot<ReferenceTable>, StorageError> {
        match self.fetch(resource).await? {
            Some((bytes, version)) => {
                let table =
                    decode_reference(&bytes).map_err(|err| StorageError::schema(resource, err))?;
                Ok(TableSnapshot { table, version })
            }
            None => Ok(TableSnapshot {
                table: ReferenceTable::default(),
                version: StorageVersion::Absent,
            }),
        }
    }

    /// Overwrite the whole object, provided it is still at `expected`.
    ///
    /// Returns the version of the newly written object.
    pub async fn save<R: Record>(
        &self,
        table: &Table<R>,
        expected: &StorageVersion,
    ) -> Result<StorageVersion, StorageError> {
        let bytes = encode_table(table).map_err(|err| StorageError::schema(R::RESOURCE, err))?;
        self.write(R::RESOURCE, Bytes::from(bytes), expected).await
    }

    async fn fetch(&self, resource: &str) -> Result<Option<(Bytes, StorageVersion)>, StorageError> {
        let location = ObjectPath::from(resource);
        let result = match self.store.get(&location).await {
            Ok(result) => result,
            Err(ObjectStoreError::NotFound { .. }) => {
                warn!(resource, "resource not found; starting with an empty dataset");
                return Ok(None);
            }
            Err(err) => return Err(StorageError::backend(resource, err)),
        };

        let version = StorageVersion::Existing {
            e_tag: result.meta.e_tag.clone(),
            version: result.meta.version.clone(),
        };
        let bytes = result
            .bytes()
            .await
            .map_err(|err| StorageError::backend(resource, err))?;

        Ok(Some((bytes, version)))
    }

    async fn write(
        &self,
        resource: &str,
        bytes: Bytes,
        expected: &StorageVersion,
    ) -> Result<StorageVersion, StorageError> {
        let location = ObjectPath::from(resource);
        let payload = PutPayload::from(bytes);

        if !self.conflict_check {
            let result = self
                .store
                .put(&location, payload)
                .await
                .map_err(|err| StorageError::backend(resource, err))?;
            return Ok(StorageVersion::from_put(result));
        }

        let mode = match expected {
            StorageVersion::Absent => PutMode::Create,
            StorageVersion::Existing { e_tag, version } => PutMode::Update(UpdateVersion {
                e_tag: e_tag.clone(),
                version: version.clone(),
            }),
        };

        match self
            .store
            .put_opts(&location, payload.clone(), mode.into())
            .await
        {
            Ok(result) => Ok(StorageVersion::from_put(result)),
            Err(ObjectStoreError::Precondition { .. } | ObjectStoreError::AlreadyExists { .. }) => {
                warn!(resource, "conditional write rejected; table changed since load");
                Err(StorageError::Conflict {
                    resource: resource.to_string(),
                })
            }
            Err(ObjectStoreError::NotImplemented) => {
                // Backend has no conditional writes: compare the current head, then overwrite.
                self.ensure_unchanged(resource, &location, expected).await?;
                let result = self
                    .store
                    .put(&location, payload)
                    .await
                    .map_err(|err| StorageError::backend(resource, err))?;
                Ok(StorageVersion::from_put(result))
            }
            Err(err) => Err(StorageError::backend(resource, err)),
        }
    }

    async fn ensure_unchanged(
        &self,
        resource: &str,
        location: &ObjectPath,
        expected: &StorageVersion,
    ) -> Result<(), StorageError> {
        let current = match self.store.head(location).await {
            Ok(meta) => StorageVersion::Existing {
                e_tag: meta.e_tag,
                version: meta.version,
            },
            Err(ObjectStoreError::NotFound { .. }) => StorageVersion::Absent,
            Err(err) => return Err(StorageError::backend(resource, err)),
        };

        if &current == expected {
            Ok(())
        } else {
            warn!(resource, "stored version moved since load");
            Err(StorageError::Conflict {
                resource: resource.to_string(),
            })
        }
    }
}
