mod mem_ownership_store;
mod ownership_store;
mod sled_ownership_store;


use std::path::Path;

pub use mem_ownership_store::*;
pub use ownership_store::*;
pub use sled_ownership_store::*;
use tracing::debug;
use tracing::warn;

use crate::constants::LOCK_DB_DIR;

/// Opens (or creates) the sled database backing the ownership store under
/// `<db_root_dir>/lock`.
pub fn init_sled_lock_db(
    sled_db_root_path: impl AsRef<Path> + std::fmt::Debug
) -> std::result::Result<sled::Db, std::io::Error> {
    debug!("init_sled_lock_db from path: {:?}", &sled_db_root_path);

    let lock_db_path = sled_db_root_path.as_ref().join(LOCK_DB_DIR);

    sled::Config::default()
        .path(&lock_db_path)
        .cache_capacity(1024 * 1024)
        .use_compression(true)
        .compression_factor(1)
        .open()
        .map_err(|e| {
            warn!(
                "Try to open DB at this location: {:?} and failed: {:?}",
                lock_db_path, e
            );
            std::io::Error::other(e)
        })
}
