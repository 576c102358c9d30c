//! CLI command implementations.

pub(crate) mod convert;
pub(crate) mod list;

pub(crate) use convert::ConvertArgs;
pub(crate) use list::ListArgs;
