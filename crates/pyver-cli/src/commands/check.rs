//! Check command implementation.

use miette::Result;

use pyver_ops::ops_check;
use pyver_util::errors::PyverError;

pub fn exec() -> Result<()> {
    let root = super::project_root()?;
    if ops_check::check(&root)? {
        return Ok(());
    }
    Err(PyverError::Generic {
        message: "Check failed: run `pyver sync` and `pyver deps` to update".to_string(),
    }
    .into())
}
