pub(crate) mod commit;
pub mod discovery;
pub mod ops_check;
pub mod ops_deps;
pub mod ops_sync;
