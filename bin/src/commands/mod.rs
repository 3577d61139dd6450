//! CLI command implementations.

pub(crate) mod fetch;
pub(crate) mod intervals;
pub(crate) mod load;
