//! Errors returned by the checked accessors.

/// Error returned when accessing the object of an empty [`ValueCell`] or
/// [`Unique`] through a checked accessor.
///
/// [`ValueCell`]: crate::ValueCell
/// [`Unique`]: crate::Unique
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EmptyCellError;

impl core::fmt::Display for EmptyCellError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "the value cell is empty")
    }
}

impl core::error::Error for EmptyCellError {}

/// Panics because an empty cell was dereferenced.
#[cold]
#[track_caller]
pub(crate) fn deref_empty(kind: &'static str) -> ! {
    panic!("dereferenced an empty {kind}")
}
