// -
// Database namespaces

/// Sled database tree holding the lock service record
pub(crate) const LOCK_SERVICE_TREE: &str = "lock_service";

/// Sled entry key of the combined owner + state record
pub(crate) const LOCK_RECORD_KEY: &str = "_lock_service_record";

/// Sub directory of `db_root_dir` the lock database lives in
pub(crate) const LOCK_DB_DIR: &str = "lock";
