//! PyPI JSON API client for resolving versions of packages that are pinned
//! by policy but absent from the Poetry dependency table.

pub mod index;
