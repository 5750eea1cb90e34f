//! Conversion between an owned [`Box<C>`] and the raw pointer a shim stores.
//!
//! For most types this is [`Box::into_raw`] and [`Box::from_raw`]. A
//! zero-sized `C` is different: its box never allocates, so every such box
//! has the same dangling address and two shims could not be told apart. Such
//! values are moved into a [`ZstSlot`] instead, which is at least one byte
//! large, so each object gets an address of its own.

use alloc::boxed::Box;
use core::{mem::size_of, ptr::NonNull};

/// Heap slot giving a zero-sized value a unique address.
///
/// The value sits at offset zero, so a pointer to the slot is also a valid
/// pointer to the value.
#[repr(C)]
struct ZstSlot<C> {
    /// The zero-sized value
    value: C,
    /// Padding that forces an allocation
    _byte: u8,
}

/// Returns `true` if values of `C` are stored in a [`ZstSlot`].
#[inline]
const fn needs_slot<C>() -> bool {
    size_of::<C>() == 0
}

/// Takes ownership of `value` and returns a pointer to it that is unique
/// among all live objects.
///
/// The pointer must be given back to [`from_raw`] with the same `C` to
/// release the object.
#[inline]
pub(crate) fn into_raw<C>(value: Box<C>) -> NonNull<C> {
    if needs_slot::<C>() {
        let slot = Box::new(ZstSlot {
            value: *value,
            _byte: 0,
        });
        NonNull::from(Box::leak(slot)).cast::<C>()
    } else {
        NonNull::from(Box::leak(value))
    }
}

/// Takes back ownership of an object stored with [`into_raw`].
///
/// For a zero-sized `C` the returned box is a fresh one, so its address
/// differs from `ptr`.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. The pointer was returned by [`into_raw`] for this same `C`.
/// 2. Ownership is transferred to this function, so the pointer has not
///    been passed to [`from_raw`] before and is not used afterwards.
#[inline]
pub(crate) unsafe fn from_raw<C>(ptr: NonNull<C>) -> Box<C> {
    if needs_slot::<C>() {
        let ptr: *mut ZstSlot<C> = ptr.cast::<ZstSlot<C>>().as_ptr();
        // SAFETY: The pointer came from leaking a `Box<ZstSlot<C>>` in `into_raw`,
        // and ownership is transferred to us, both guaranteed by the caller.
        let slot: Box<ZstSlot<C>> = unsafe { Box::from_raw(ptr) };
        let ZstSlot { value, .. } = *slot;
        Box::new(value)
    } else {
        let ptr: *mut C = ptr.as_ptr();
        // SAFETY: The pointer came from leaking a `Box<C>` in `into_raw`, and
        // ownership is transferred to us, both guaranteed by the caller.
        unsafe { Box::from_raw(ptr) }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::*;

    #[derive(Debug, PartialEq)]
    struct Unit;

    #[test]
    fn test_zero_sized_values_get_distinct_addresses() {
        let a = into_raw(Box::new(Unit));
        let b = into_raw(Box::new(Unit));
        assert_ne!(a, b);
        assert_eq!(a.as_ptr() as usize % core::mem::align_of::<Unit>(), 0);

        // SAFETY: Both pointers come from `into_raw::<Unit>` and are not used again.
        let a = unsafe { from_raw(a) };
        // SAFETY: As above.
        let b = unsafe { from_raw(b) };
        assert_eq!(*a, *b);
    }

    #[test]
    fn test_zero_sized_slot_respects_alignment() {
        #[repr(align(64))]
        struct Aligned;

        let ptr = into_raw(Box::new(Aligned));
        assert_eq!(ptr.as_ptr() as usize % 64, 0);
        // SAFETY: The pointer comes from `into_raw::<Aligned>` and is not used again.
        drop(unsafe { from_raw(ptr) });
    }

    #[test]
    fn test_sized_values_keep_their_box() {
        let boxed = Box::new(String::from("kept"));
        let addr: *const String = &*boxed;
        let ptr = into_raw(boxed);
        assert_eq!(ptr.as_ptr().cast_const(), addr);

        // SAFETY: The pointer comes from `into_raw::<String>` and is not used again.
        let boxed = unsafe { from_raw(ptr) };
        assert_eq!(&*boxed as *const String, addr);
        assert_eq!(*boxed, "kept");
    }
}
