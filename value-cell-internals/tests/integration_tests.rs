//! Integration tests for the value-cell-internals crate.
//!
//! These exercise [`RawShim`] the way the `value-cell` crate drives it:
//!
//! - Ownership: objects are dropped exactly once, whether the shim is dropped
//!   or its object is taken out with `into_box`
//! - Cloning: clones are independent allocations and keep the concrete type,
//!   even when the declared type is a trait object
//! - Type inspection: the concrete `TypeId` and type name survive erasure

use std::{
    any::TypeId,
    cell::Cell,
    rc::Rc,
};

use value_cell_internals::{RawShim, Upcast};

/// Counts live instances through a shared counter.
#[derive(Debug)]
struct Counted {
    live: Rc<Cell<i32>>,
}

impl Counted {
    fn new(live: &Rc<Cell<i32>>) -> Self {
        live.set(live.get() + 1);
        Self { live: live.clone() }
    }
}

impl Clone for Counted {
    fn clone(&self) -> Self {
        Self::new(&self.live)
    }
}

impl Drop for Counted {
    fn drop(&mut self) {
        self.live.set(self.live.get() - 1);
    }
}

trait Base {
    fn value(&self) -> i32;
    fn set(&mut self, value: i32);
}

#[derive(Clone)]
struct Plain(i32);

impl Base for Plain {
    fn value(&self) -> i32 {
        self.0
    }

    fn set(&mut self, value: i32) {
        self.0 = value;
    }
}

/// Copying a `Bumped` yields a value one larger than the original.
struct Bumped(i32);

impl Clone for Bumped {
    fn clone(&self) -> Self {
        Bumped(self.0 + 1)
    }
}

impl Base for Bumped {
    fn value(&self) -> i32 {
        self.0
    }

    fn set(&mut self, value: i32) {
        self.0 = value;
    }
}

macro_rules! upcast_base {
    ($($ty:ty),*) => {
        $(
            // SAFETY: Every method returns `self`, coerced to `dyn Base`.
            unsafe impl Upcast<dyn Base> for $ty {
                fn upcast_ref(&self) -> &(dyn Base + 'static) {
                    self
                }

                fn upcast_mut(&mut self) -> &mut (dyn Base + 'static) {
                    self
                }

                fn upcast_box(self: Box<Self>) -> Box<dyn Base> {
                    self
                }
            }
        )*
    };
}

upcast_base!(Plain, Bumped, Marker);

thread_local! {
    static MARKER_DROPS: Cell<usize> = const { Cell::new(0) };
}

/// Zero-sized, counts its drops in a thread-local.
#[derive(Clone)]
struct Marker;

impl Drop for Marker {
    fn drop(&mut self) {
        MARKER_DROPS.with(|drops| drops.set(drops.get() + 1));
    }
}

impl Base for Marker {
    fn value(&self) -> i32 {
        0
    }

    fn set(&mut self, _value: i32) {}
}

#[test]
fn test_shim_drops_object_once() {
    let live = Rc::new(Cell::new(0));
    {
        let _shim = RawShim::<Counted>::new(Box::new(Counted::new(&live)));
        assert_eq!(live.get(), 1);
    }
    assert_eq!(live.get(), 0);
}

#[test]
fn test_shim_into_box_transfers_ownership() {
    let live = Rc::new(Cell::new(0));
    let shim = RawShim::<Counted>::new(Box::new(Counted::new(&live)));
    let boxed = shim.into_box();
    assert_eq!(live.get(), 1);
    drop(boxed);
    assert_eq!(live.get(), 0);
}

#[test]
fn test_shim_clone_counts() {
    let live = Rc::new(Cell::new(0));
    {
        let shim = RawShim::<Counted>::new(Box::new(Counted::new(&live)));
        let copy = shim.clone();
        let copy_of_copy = copy.clone();
        assert_eq!(live.get(), 3);
        assert_ne!(shim.addr(), copy.addr());
        assert_ne!(copy.addr(), copy_of_copy.addr());
    }
    assert_eq!(live.get(), 0);
}

#[test]
fn test_shim_clone_through_trait_object_keeps_concrete_type() {
    let shim = RawShim::<dyn Base>::new(Box::new(Bumped(22)));
    assert_eq!(shim.get().value(), 22);

    let copy = shim.clone();
    assert_eq!(shim.get().value(), 22);
    assert_eq!(copy.get().value(), 23);
    assert_eq!(copy.concrete_type_id(), TypeId::of::<Bumped>());
}

#[test]
fn test_shim_mutation_is_local_to_one_copy() {
    let mut shim = RawShim::<dyn Base>::new(Box::new(Plain(1)));
    let copy = shim.clone();
    shim.get_mut().set(10);
    assert_eq!(shim.get().value(), 10);
    assert_eq!(copy.get().value(), 1);
}

#[test]
fn test_shim_type_names() {
    let plain = RawShim::<dyn Base>::new(Box::new(Plain(0)));
    let bumped = RawShim::<dyn Base>::new(Box::new(Bumped(0)));

    assert_eq!(plain.concrete_type_id(), TypeId::of::<Plain>());
    assert_eq!(bumped.concrete_type_id(), TypeId::of::<Bumped>());
    assert!(plain.concrete_type_name().ends_with("Plain"));
    assert!(bumped.concrete_type_name().ends_with("Bumped"));
}

#[test]
fn test_shim_into_box_keeps_dynamic_behaviour() {
    let shim = RawShim::<dyn Base>::new(Box::new(Bumped(5)));
    let addr = shim.addr();
    let boxed: Box<dyn Base> = shim.into_box();
    assert_eq!(boxed.value(), 5);
    assert_eq!(&*boxed as *const dyn Base as *const (), addr);
}

#[test]
fn test_shim_declared_pointer_matches_get() {
    let shim = RawShim::<dyn Base>::new(Box::new(Plain(3)));
    let from_ptr = shim.as_ptr().as_ptr() as *const ();
    let from_get = shim.get() as *const dyn Base as *const ();
    assert_eq!(from_ptr, from_get);
    assert_eq!(from_ptr, shim.addr());
}

#[test]
fn test_shim_zero_sized_objects_are_distinct_and_dropped_once() {
    MARKER_DROPS.with(|drops| drops.set(0));
    {
        let shim = RawShim::<dyn Base>::new(Box::new(Marker));
        let copy = shim.clone();
        let other = RawShim::<dyn Base>::new(Box::new(Marker));
        assert_ne!(shim.addr(), copy.addr());
        assert_ne!(shim.addr(), other.addr());
        assert_eq!(MARKER_DROPS.with(Cell::get), 0);

        let boxed = copy.into_box();
        assert_eq!(boxed.value(), 0);
        assert_eq!(MARKER_DROPS.with(Cell::get), 0);
    }
    assert_eq!(MARKER_DROPS.with(Cell::get), 3);
}
