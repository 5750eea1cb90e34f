//! Vtable for type-erased shim operations.
//!
//! This module contains the [`ShimVtable`] which enables operating on the
//! object owned by a [`RawShim`] once its concrete type `C` has been erased.
//! The vtable stores function pointers that dispatch to implementations
//! instantiated for that `C`.
//!
//! This module encapsulates the fields of [`ShimVtable`] so they cannot be
//! accessed directly. This visibility restriction guarantees the safety
//! invariant: **the vtable's concrete type parameter must match the actual
//! type of the object pointed to by the [`RawShim`]**.
//!
//! # Safety Invariant
//!
//! This invariant is maintained because vtables are created as `&'static`
//! references via [`ShimVtable::new`], which pairs the function pointers with
//! a specific type `C` at compile time.
//!
//! [`RawShim`]: crate::RawShim

use alloc::boxed::Box;
use core::{any::TypeId, ptr::NonNull};

use super::storage;
use crate::{upcast::Upcast, util::Erased};

/// Vtable for type-erased shim operations.
///
/// Contains function pointers for performing operations on an owned object
/// without knowing its concrete type at compile time. `T` is the declared
/// type the object is viewed through.
///
/// # Safety Invariant
///
/// The fields `as_ref`, `as_mut`, `clone`, `into_box` and `drop` are
/// guaranteed to point to the functions defined below instantiated with the
/// concrete type `C` that was used to create this [`ShimVtable`].
pub(crate) struct ShimVtable<T: ?Sized + 'static> {
    /// Gets the [`TypeId`] of the concrete type that was used to create this
    /// [`ShimVtable`].
    type_id: fn() -> TypeId,
    /// Gets the [`core::any::type_name`] of the concrete type that was used
    /// to create this [`ShimVtable`].
    type_name: fn() -> &'static str,
    /// Views the object as the declared type for shared access.
    as_ref: unsafe fn(NonNull<Erased>) -> NonNull<T>,
    /// Views the object as the declared type for exclusive access.
    as_mut: unsafe fn(NonNull<Erased>) -> NonNull<T>,
    /// Allocates a copy of the object using the concrete type's [`Clone`].
    clone: unsafe fn(NonNull<Erased>) -> NonNull<Erased>,
    /// Takes back the owned `C` as a [`Box<C>`] and converts it to [`Box<T>`].
    into_box: unsafe fn(NonNull<Erased>) -> Box<T>,
    /// Drops and frees the `C` pointed to by this pointer.
    drop: unsafe fn(NonNull<Erased>),
}

impl<T: ?Sized + 'static> ShimVtable<T> {
    /// Creates a new [`ShimVtable`] for the concrete type `C` viewed as the
    /// declared type `T`.
    pub(super) const fn new<C>() -> &'static Self
    where
        C: Clone + Upcast<T> + 'static,
    {
        const {
            &Self {
                type_id: TypeId::of::<C>,
                type_name: core::any::type_name::<C>,
                as_ref: as_ref::<T, C>,
                as_mut: as_mut::<T, C>,
                clone: clone::<T, C>,
                into_box: into_box::<T, C>,
                drop: drop::<C>,
            }
        }
    }

    /// Gets the [`TypeId`] of the concrete type that was used to create this
    /// [`ShimVtable`].
    #[inline]
    pub(super) fn type_id(&self) -> TypeId {
        (self.type_id)()
    }

    /// Gets the [`core::any::type_name`] of the concrete type that was used
    /// to create this [`ShimVtable`].
    #[inline]
    pub(super) fn type_name(&self) -> &'static str {
        (self.type_name)()
    }

    /// Views the object pointed to by `ptr` as the declared type.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The pointer comes from [`storage::into_raw`] for `C` and still
    ///    points to an initialized `C`.
    /// 2. This [`ShimVtable`] must be a vtable for the concrete type `C`.
    /// 3. The returned pointer is only used for shared access, and only while
    ///    the object is alive and not mutably borrowed.
    #[inline]
    pub(super) unsafe fn as_ref(&self, ptr: NonNull<Erased>) -> NonNull<T> {
        // SAFETY: We know that `self.as_ref` points to the function
        // `as_ref::<T, C>` below. That function's safety requirements are upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        // 3. Guaranteed by the caller
        unsafe { (self.as_ref)(ptr) }
    }

    /// Views the object pointed to by `ptr` as the declared type, for
    /// exclusive access.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The pointer comes from [`storage::into_raw`] for `C` and still
    ///    points to an initialized `C`.
    /// 2. This [`ShimVtable`] must be a vtable for the concrete type `C`.
    /// 3. No other reference to the object exists while the returned pointer
    ///    is in use.
    #[inline]
    pub(super) unsafe fn as_mut(&self, ptr: NonNull<Erased>) -> NonNull<T> {
        // SAFETY: We know that `self.as_mut` points to the function
        // `as_mut::<T, C>` below. That function's safety requirements are upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        // 3. Guaranteed by the caller
        unsafe { (self.as_mut)(ptr) }
    }

    /// Allocates an independent copy of the object pointed to by `ptr`,
    /// returning a pointer created with [`storage::into_raw`] for `C`.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The pointer comes from [`storage::into_raw`] for `C` and still
    ///    points to an initialized `C`.
    /// 2. This [`ShimVtable`] must be a vtable for the concrete type `C`.
    /// 3. The object is not mutably borrowed for the duration of the call.
    #[inline]
    pub(super) unsafe fn clone(&self, ptr: NonNull<Erased>) -> NonNull<Erased> {
        // SAFETY: We know that `self.clone` points to the function
        // `clone::<T, C>` below. That function's safety requirements are upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        // 3. Guaranteed by the caller
        unsafe { (self.clone)(ptr) }
    }

    /// Takes back the `C` pointed to by `ptr` as a [`Box<C>`] and converts it
    /// into a [`Box<T>`].
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The pointer comes from [`storage::into_raw`] for `C` and still
    ///    points to an initialized `C`.
    /// 2. This [`ShimVtable`] must be a vtable for the concrete type `C`.
    /// 3. This method takes ownership of the allocation, so the caller must
    ///    ensure that the pointer has not previously been released or
    ///    dropped, and that it will not use the pointer afterwards.
    #[inline]
    pub(super) unsafe fn into_box(&self, ptr: NonNull<Erased>) -> Box<T> {
        // SAFETY: We know that `self.into_box` points to the function
        // `into_box::<T, C>` below. That function's safety requirements are upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        // 3. Guaranteed by the caller
        unsafe { (self.into_box)(ptr) }
    }

    /// Drops and frees the `C` pointed to by this pointer.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The pointer comes from [`storage::into_raw`] for `C`
    /// 2. This [`ShimVtable`] must be a vtable for the concrete type `C`.
    /// 3. This method drops the object, so the caller must ensure that the
    ///    pointer has not previously been dropped, that it is able to transfer
    ///    ownership of the pointer, and that it will not use the pointer after
    ///    calling this method.
    #[inline]
    pub(super) unsafe fn drop(&self, ptr: NonNull<Erased>) {
        // SAFETY: We know that `self.drop` points to the function `drop::<C>`
        // below. That function's safety requirements are upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        // 3. Guaranteed by the caller
        unsafe { (self.drop)(ptr) }
    }
}

/// Views the `C` pointed to by `ptr` as a shared `T`.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. The pointer comes from [`storage::into_raw`] for `C` and points to an
///    initialized `C`.
/// 2. The returned pointer is only used for shared access while the object is
///    alive and not mutably borrowed.
unsafe fn as_ref<T: ?Sized, C: Upcast<T>>(ptr: NonNull<Erased>) -> NonNull<T> {
    let ptr: NonNull<C> = ptr.cast::<C>();
    // SAFETY: The pointer is non-null, aligned and points to an initialized `C`
    // (guaranteed by the caller), and no mutable borrow exists for the duration
    // of the returned pointer's use (guaranteed by the caller).
    let value: &C = unsafe { ptr.as_ref() };
    NonNull::from(Upcast::<T>::upcast_ref(value))
}

/// Views the `C` pointed to by `ptr` as an exclusive `T`.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. The pointer comes from [`storage::into_raw`] for `C` and points to an
///    initialized `C`.
/// 2. No other reference to the object exists while the returned pointer is in
///    use.
unsafe fn as_mut<T: ?Sized, C: Upcast<T>>(ptr: NonNull<Erased>) -> NonNull<T> {
    let mut ptr: NonNull<C> = ptr.cast::<C>();
    // SAFETY: The pointer is non-null, aligned and points to an initialized `C`
    // (guaranteed by the caller), and access is exclusive (guaranteed by the
    // caller).
    let value: &mut C = unsafe { ptr.as_mut() };
    NonNull::from(Upcast::<T>::upcast_mut(value))
}

/// Clones the `C` pointed to by `ptr` into a fresh [`Box<C>`] and erases it.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. The pointer comes from [`storage::into_raw`] for `C` and points to an
///    initialized `C`.
/// 2. The object is not mutably borrowed for the duration of the call.
unsafe fn clone<T: ?Sized, C: Clone + Upcast<T>>(ptr: NonNull<Erased>) -> NonNull<Erased> {
    let ptr: NonNull<C> = ptr.cast::<C>();
    // SAFETY: The pointer is non-null, aligned and points to an initialized `C`
    // (guaranteed by the caller), and no mutable borrow exists (guaranteed by the
    // caller).
    let value: &C = unsafe { ptr.as_ref() };
    let copy: Box<C> = Box::new(value.clone());
    storage::into_raw(copy).cast::<Erased>()
}

/// Takes back the `C` pointed to by `ptr` and upcasts it.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. The pointer comes from [`storage::into_raw`] for `C` and points to an
///    initialized `C`.
/// 2. Ownership of the allocation is transferred to this function and the
///    pointer is not used afterwards.
unsafe fn into_box<T: ?Sized, C: Upcast<T>>(ptr: NonNull<Erased>) -> Box<T> {
    let ptr: NonNull<C> = ptr.cast::<C>();
    // SAFETY: Our pointer has the correct type and came from `storage::into_raw`,
    // and ownership is being transferred to us, all as guaranteed by our caller.
    let boxed: Box<C> = unsafe { storage::from_raw(ptr) };
    Upcast::<T>::upcast_box(boxed)
}

/// Drops and frees the `C` pointed to by this pointer.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. The pointer comes from [`storage::into_raw`] for `C`
/// 2. The concrete type `C` matches the actual type of the object
/// 3. This method drops the object, so the caller must ensure that the
///    pointer has not previously been dropped, that it is able to transfer
///    ownership of the pointer, and that it will not use the pointer after
///    calling this method.
unsafe fn drop<C>(ptr: NonNull<Erased>) {
    let ptr: NonNull<C> = ptr.cast::<C>();
    // SAFETY: Our pointer has the correct type as guaranteed by the caller, and it
    // came from a call to `storage::into_raw` as also guaranteed by our caller.
    let boxed: Box<C> = unsafe { storage::from_raw(ptr) };
    core::mem::drop(boxed);
}
