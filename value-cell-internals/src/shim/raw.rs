//! Type-erased owner of a single heap object.
//!
//! This module encapsulates the `ptr` and `vtable` fields of [`RawShim`],
//! ensuring they are only visible within this module. This visibility
//! restriction guarantees the safety invariant: **the pointer always comes
//! from `storage::into_raw::<C>`, and the vtable was instantiated for that same
//! `C`**.
//!
//! # Safety Invariant
//!
//! Since both fields can only be set together via [`RawShim::new`] (which
//! creates the pointer with `storage::into_raw` and the vtable from the same type
//! parameter), [`RawShim::clone`] (which reuses the vtable for a pointer
//! created by that vtable's clone function) or [`RawShim::downcast`] (which
//! pairs the pointer with a vtable for its checked concrete type) or
//! [`RawShim::upcast`] (the same, for a new declared type), and cannot be
//! modified afterward,
//! the pair stays consistent throughout the value's lifetime.
//!
//! # Type Erasure
//!
//! The concrete type parameter `C` is erased by casting to `NonNull<Erased>`.
//! Only the declared type `T` remains visible in the type of the shim. Any
//! operation that needs `C` again, like cloning, goes through the vtable.

use alloc::boxed::Box;
use core::{any::TypeId, marker::PhantomData, mem::ManuallyDrop, ptr::NonNull};

use super::storage;
use crate::{shim::vtable::ShimVtable, upcast::Upcast, util::Erased};

/// Owner of a heap-allocated object of some concrete type `C`, viewed through
/// the declared type `T`.
///
/// The pointer is guaranteed to have been created by `storage::into_raw` from
/// a `Box<C>`. We cannot use a [`Box<C>`] directly, because that does not
/// allow us to type-erase the `C`, and we cannot use a [`Box<T>`] either,
/// because we need to be able to clone the object as a `C`.
///
/// Dropping a [`RawShim`] drops and deallocates the object. Use
/// [`RawShim::into_box`] to take ownership of it instead.
pub struct RawShim<T: ?Sized + 'static> {
    /// Pointer to the owned object
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long as
    /// this struct exists:
    ///
    /// 1. The pointer must have been created from a `Box<C>` for some `C`
    ///    using `storage::into_raw`, which also gives zero-sized objects an
    ///    address of their own.
    /// 2. The pointer will point to the same `C` for the entire lifetime of
    ///    this object.
    /// 3. The pointee is properly initialized for the entire lifetime of this
    ///    object, except during the execution of the `Drop` implementation
    ///    and of [`RawShim::into_box`].
    /// 4. No other pointer to the object is ever handed out except borrows
    ///    tied to the lifetime of a borrow of this struct.
    ptr: NonNull<Erased>,

    /// Vtable instantiated for the concrete type of the owned object
    ///
    /// # Safety
    ///
    /// The vtable must have been created by `ShimVtable::new::<C>` for the
    /// same `C` the pointer was created from.
    vtable: &'static ShimVtable<T>,

    /// Marker to tell the compiler that we own a `T`
    _marker: PhantomData<Box<T>>,
}

// SAFETY: The shim uniquely owns its object, the same way `Box<T>` does, and
// every method that touches the object follows Rust's borrowing rules through
// `&self`/`&mut self`. Sending the shim sends the object of concrete type `C`,
// which the `Upcast<T>` contract guarantees is `Send` when `T` is.
unsafe impl<T: ?Sized + Send + 'static> Send for RawShim<T> {}

// SAFETY: Shared access to the shim only gives out shared access to the object
// (including cloning it through `&C`). The `Upcast<T>` contract guarantees `C` is
// `Sync` when `T` is.
unsafe impl<T: ?Sized + Sync + 'static> Sync for RawShim<T> {}

impl<T: ?Sized + 'static> RawShim<T> {
    /// Creates a new [`RawShim`] that takes ownership of `value`.
    ///
    /// The concrete type `C` is captured here, in the vtable, and is used by
    /// every later clone of the shim.
    #[inline]
    pub fn new<C>(value: Box<C>) -> Self
    where
        C: Clone + Upcast<T> + 'static,
    {
        let ptr: NonNull<C> = storage::into_raw(value);
        let ptr: NonNull<Erased> = ptr.cast::<Erased>();

        Self {
            ptr,
            vtable: ShimVtable::<T>::new::<C>(),
            _marker: PhantomData,
        }
    }

    /// Returns the address of the owned object.
    ///
    /// This is the address of the concrete object, which is also the data
    /// address of [`RawShim::as_ptr`].
    #[inline]
    pub fn addr(&self) -> *const () {
        self.ptr.as_ptr().cast_const().cast::<()>()
    }

    /// Returns the [`TypeId`] of the concrete type of the owned object.
    #[inline]
    pub fn concrete_type_id(&self) -> TypeId {
        self.vtable.type_id()
    }

    /// Returns the [`core::any::type_name`] of the concrete type of the owned
    /// object.
    #[inline]
    pub fn concrete_type_name(&self) -> &'static str {
        self.vtable.type_name()
    }

    /// Returns a pointer to the owned object as the declared type.
    ///
    /// The pointer is valid for shared access for as long as the shim is
    /// neither dropped nor mutably borrowed.
    #[inline]
    pub fn as_ptr(&self) -> NonNull<T> {
        // SAFETY:
        // 1. The pointer comes from `storage::into_raw` and is initialized (guaranteed by
        //    the invariants on this type)
        // 2. The vtable matches the concrete type (guaranteed by the invariants on
        //    this type)
        // 3. The caller only gets shared access as long as the borrow of `self`
        //    stated above is respected
        unsafe { self.vtable.as_ref(self.ptr) }
    }

    /// Borrows the owned object as the declared type.
    #[inline]
    pub fn get(&self) -> &T {
        let ptr = self.as_ptr();
        // SAFETY: The pointer is valid for shared access, and the returned reference
        // is tied to the borrow of `self`, so the shim can neither be dropped nor
        // mutably borrowed while it exists.
        unsafe { ptr.as_ref() }
    }

    /// Mutably borrows the owned object as the declared type.
    #[inline]
    pub fn get_mut(&mut self) -> &mut T {
        // SAFETY:
        // 1. The pointer comes from `storage::into_raw` and is initialized (guaranteed by
        //    the invariants on this type)
        // 2. The vtable matches the concrete type (guaranteed by the invariants on
        //    this type)
        // 3. We hold `&mut self`, and the shim never hands out other pointers that
        //    outlive a borrow of it, so access is exclusive
        let mut ptr = unsafe { self.vtable.as_mut(self.ptr) };

        // SAFETY: The pointer is valid and exclusive for the lifetime of the borrow
        // of `self` the returned reference is tied to.
        unsafe { ptr.as_mut() }
    }

    /// Returns a reference to the owned object if its concrete type is `C`.
    #[inline]
    pub fn downcast_ref<C: 'static>(&self) -> Option<&C> {
        if self.concrete_type_id() != TypeId::of::<C>() {
            return None;
        }

        let ptr: NonNull<C> = self.ptr.cast::<C>();
        // SAFETY: The concrete type of the object is `C` as checked above, the pointer
        // is valid and initialized (guaranteed by the invariants on this type), and
        // the returned reference is tied to the borrow of `self`.
        Some(unsafe { ptr.as_ref() })
    }

    /// Returns a mutable reference to the owned object if its concrete type is
    /// `C`.
    #[inline]
    pub fn downcast_mut<C: 'static>(&mut self) -> Option<&mut C> {
        if self.concrete_type_id() != TypeId::of::<C>() {
            return None;
        }

        let mut ptr: NonNull<C> = self.ptr.cast::<C>();
        // SAFETY: The concrete type of the object is `C` as checked above, the pointer
        // is valid and initialized (guaranteed by the invariants on this type), and
        // the returned reference is tied to the exclusive borrow of `self`.
        Some(unsafe { ptr.as_mut() })
    }

    /// Converts the shim into a shim whose declared type is the concrete type
    /// `C`, without reallocating.
    ///
    /// Returns the shim unchanged if its concrete type is not `C`.
    #[inline]
    pub fn downcast<C>(self) -> Result<RawShim<C>, Self>
    where
        C: Clone + 'static,
    {
        if self.concrete_type_id() != TypeId::of::<C>() {
            return Err(self);
        }

        let this = ManuallyDrop::new(self);

        // The pointer was created by `storage::into_raw::<C>` as checked above, and the new
        // vtable is instantiated for that same `C`. `this` is never dropped, so
        // ownership moves into the new shim.
        Ok(RawShim {
            ptr: this.ptr,
            vtable: ShimVtable::<C>::new::<C>(),
            _marker: PhantomData,
        })
    }

    /// Converts the shim into a shim declared as `U`, without reallocating.
    ///
    /// This requires the concrete type of the object to be `T` itself, and
    /// returns the shim unchanged otherwise.
    #[inline]
    pub fn upcast<U>(self) -> Result<RawShim<U>, Self>
    where
        T: Sized + Clone + Upcast<U>,
        U: ?Sized + 'static,
    {
        if self.concrete_type_id() != TypeId::of::<T>() {
            return Err(self);
        }

        let this = ManuallyDrop::new(self);

        // The pointer was created by `storage::into_raw::<T>` as checked above, and
        // the new vtable is instantiated for that same `T`. `this` is never dropped,
        // so ownership moves into the new shim.
        Ok(RawShim {
            ptr: this.ptr,
            vtable: ShimVtable::<U>::new::<T>(),
            _marker: PhantomData,
        })
    }

    /// Consumes the shim and returns the owned object as a [`Box`] of the
    /// declared type.
    ///
    /// After this call the object is no longer managed by the shim and the
    /// shim performs no deletion. The box keeps the address of the object,
    /// except for a zero-sized concrete type, whose boxes all share one
    /// dangling address.
    #[inline]
    pub fn into_box(self) -> Box<T> {
        let this = ManuallyDrop::new(self);

        // SAFETY:
        // 1. The pointer comes from `storage::into_raw` and is initialized (guaranteed by
        //    the invariants on this type)
        // 2. The vtable matches the concrete type (guaranteed by the invariants on
        //    this type)
        // 3. `this` is wrapped in `ManuallyDrop`, so ownership moves into the box and
        //    the pointer is never used or dropped again
        unsafe { this.vtable.into_box(this.ptr) }
    }
}

impl<T: ?Sized + 'static> Clone for RawShim<T> {
    /// Creates an independent copy of the owned object, wrapped in a new shim
    /// with the same concrete type.
    ///
    /// If the concrete type's [`Clone`] implementation panics, the panic
    /// propagates and `self` is left untouched.
    #[inline]
    fn clone(&self) -> Self {
        // SAFETY:
        // 1. The pointer comes from `storage::into_raw` and is initialized (guaranteed by
        //    the invariants on this type)
        // 2. The vtable matches the concrete type (guaranteed by the invariants on
        //    this type)
        // 3. We hold `&self`, so nobody mutates the object during the call
        let ptr = unsafe { self.vtable.clone(self.ptr) };

        // The vtable's clone function returns a pointer from `storage::into_raw`
        // for the same `C` the vtable was created for, so reusing the vtable
        // upholds the invariants of the new shim.
        Self {
            ptr,
            vtable: self.vtable,
            _marker: PhantomData,
        }
    }
}

impl<T: ?Sized + 'static> core::ops::Drop for RawShim<T> {
    #[inline]
    fn drop(&mut self) {
        // SAFETY:
        // 1. The pointer comes from `storage::into_raw` (guaranteed by `RawShim::new` and
        //    `RawShim::clone`)
        // 2. The vtable is guaranteed to match the concrete type of the object.
        // 3. The pointer is initialized and has not been previously freed as
        //    guaranteed by the invariants on this type. We are correctly
        //    transferring ownership here and the pointer is not used afterwards, as
        //    we are in the drop function.
        unsafe { self.vtable.drop(self.ptr) }
    }
}

#[cfg(test)]
mod tests {
    use alloc::{boxed::Box, string::String};

    use super::*;

    trait Speak {
        fn speak(&self) -> &'static str;
    }

    #[derive(Clone)]
    struct Dog;

    impl Speak for Dog {
        fn speak(&self) -> &'static str {
            "woof"
        }
    }

    // SAFETY: Every method returns `self`, coerced to `dyn Speak`.
    unsafe impl Upcast<dyn Speak> for Dog {
        fn upcast_ref(&self) -> &(dyn Speak + 'static) {
            self
        }

        fn upcast_mut(&mut self) -> &mut (dyn Speak + 'static) {
            self
        }

        fn upcast_box(self: Box<Self>) -> Box<dyn Speak> {
            self
        }
    }

    #[test]
    fn test_raw_shim_size() {
        assert_eq!(
            core::mem::size_of::<RawShim<String>>(),
            2 * core::mem::size_of::<usize>()
        );
        assert_eq!(
            core::mem::size_of::<Option<RawShim<String>>>(),
            2 * core::mem::size_of::<usize>()
        );
        assert_eq!(
            core::mem::size_of::<Option<RawShim<dyn Speak>>>(),
            2 * core::mem::size_of::<usize>()
        );
    }

    #[test]
    fn test_raw_shim_addr_matches_declared_view() {
        let shim = RawShim::<dyn Speak>::new(Box::new(Dog));
        let declared = shim.as_ptr().as_ptr().cast_const().cast::<()>();
        assert_eq!(shim.addr(), declared);
        assert_eq!(shim.get().speak(), "woof");
    }

    #[test]
    fn test_raw_shim_clone_is_independent() {
        let shim = RawShim::<String>::new(Box::new(String::from("left")));
        let mut copy = shim.clone();
        assert_ne!(shim.addr(), copy.addr());

        copy.get_mut().push_str("-right");
        assert_eq!(shim.get(), "left");
        assert_eq!(copy.get(), "left-right");
    }

    #[test]
    fn test_raw_shim_clone_keeps_concrete_type() {
        let shim = RawShim::<dyn Speak>::new(Box::new(Dog));
        let copy = shim.clone();
        assert_eq!(copy.concrete_type_id(), TypeId::of::<Dog>());
        assert_eq!(copy.get().speak(), "woof");
        assert!(core::ptr::eq(shim.vtable, copy.vtable));
    }

    #[test]
    fn test_raw_shim_upcast_keeps_address() {
        let shim = RawShim::<Dog>::new(Box::new(Dog));
        let addr = shim.addr();
        let Ok(speaker) = shim.upcast::<dyn Speak>() else {
            panic!("concrete type is `Dog`");
        };
        assert_eq!(speaker.addr(), addr);
        assert_eq!(speaker.concrete_type_id(), TypeId::of::<Dog>());
        assert_eq!(speaker.clone().get().speak(), speaker.get().speak());
    }

    #[test]
    fn test_raw_shim_zero_sized_objects_have_distinct_addresses() {
        assert_eq!(core::mem::size_of::<Dog>(), 0);

        let shim = RawShim::<dyn Speak>::new(Box::new(Dog));
        let copy = shim.clone();
        let other = RawShim::<dyn Speak>::new(Box::new(Dog));
        assert_ne!(shim.addr(), copy.addr());
        assert_ne!(shim.addr(), other.addr());
        assert_ne!(copy.addr(), other.addr());
        assert_eq!(copy.as_ptr().as_ptr().cast_const().cast::<()>(), copy.addr());

        let boxed: Box<dyn Speak> = copy.into_box();
        assert_eq!(boxed.speak(), "woof");
        assert!(shim.downcast::<Dog>().is_ok());
    }

    #[test]
    fn test_raw_shim_into_box_keeps_address() {
        let shim = RawShim::<String>::new(Box::new(String::from("boxed")));
        let addr = shim.addr();
        let boxed = shim.into_box();
        assert_eq!(&*boxed as *const String as *const (), addr);
        assert_eq!(*boxed, "boxed");
    }

    #[test]
    fn test_raw_shim_downcast() {
        let mut shim = RawShim::<dyn Speak>::new(Box::new(Dog));
        assert!(shim.downcast_ref::<String>().is_none());
        assert!(shim.downcast_ref::<Dog>().is_some());
        assert!(shim.downcast_mut::<Dog>().is_some());

        let addr = shim.addr();
        let shim = match shim.downcast::<String>() {
            Ok(_) => panic!("downcast to the wrong type succeeded"),
            Err(shim) => shim,
        };
        let dog = match shim.downcast::<Dog>() {
            Ok(dog) => dog,
            Err(_) => panic!("downcast to the concrete type failed"),
        };
        assert_eq!(dog.addr(), addr);
        assert_eq!(dog.concrete_type_id(), TypeId::of::<Dog>());
    }

    #[test]
    fn test_send_sync() {
        static_assertions::assert_impl_all!(RawShim<String>: Send, Sync);
        static_assertions::assert_not_impl_any!(RawShim<dyn Speak>: Send, Sync);
        static_assertions::assert_impl_all!(RawShim<core::cell::Cell<u8>>: Send);
        static_assertions::assert_not_impl_any!(RawShim<core::cell::Cell<u8>>: Sync);
    }
}
