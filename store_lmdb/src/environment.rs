//! LMDB environment setup.

use std::path::Path;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use crate::{LmdbError, LmdbEvidenceStore};

/// Number of named databases the environment may hold.
const MAX_DBS: u32 = 4;

/// Default map size: 256 MiB.
pub const DEFAULT_MAP_SIZE: usize = 256 * 1024 * 1024;

/// Wraps the LMDB environment and all database handles.
pub struct LmdbEnvironment {
    env: Arc<Env>,
    pub(crate) submissions_db: Database<Bytes, Bytes>,
    pub(crate) meta_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given directory.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;

        // SAFETY: the environment directory is owned by this process; nothing
        // else opens it with different flags or truncates the data file.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(MAX_DBS)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let submissions_db = env.create_database(&mut wtxn, Some("submissions"))?;
        let meta_db = env.create_database(&mut wtxn, Some("meta"))?;
        wtxn.commit()?;

        tracing::info!(path = %path.display(), map_size, "opened LMDB environment");

        Ok(Self {
            env: Arc::new(env),
            submissions_db,
            meta_db,
        })
    }

    /// An [`EvidenceStore`](worktrust_store::EvidenceStore) backed by this environment.
    pub fn evidence_store(&self) -> LmdbEvidenceStore {
        LmdbEvidenceStore {
            env: Arc::clone(&self.env),
            submissions_db: self.submissions_db,
            meta_db: self.meta_db,
        }
    }
}
