//! Module containing the type-erased owner of a single heap object

mod raw;
mod storage;
pub(crate) mod vtable;

pub use self::raw::RawShim;
