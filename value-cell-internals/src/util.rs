//! Internal utility types.

/// Marker type used when type-erasing the concrete type of a stored object.
///
/// This zero-sized type serves as a placeholder in pointer types when the
/// actual concrete type has been erased. A `NonNull<Erased>` inside a
/// [`RawShim`] points to some `C`, and only the shim's vtable knows which.
///
/// Using a distinct marker type (rather than `()` or `u8`) makes the intent
/// clearer in type signatures and error messages.
///
/// [`RawShim`]: crate::RawShim
pub(crate) struct Erased;
