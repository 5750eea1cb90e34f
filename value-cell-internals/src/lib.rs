#![no_std]
#![forbid(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::missing_safety_doc,
    clippy::missing_docs_in_private_items,
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
#![allow(rustdoc::private_intra_doc_links)]
//! Internal implementation crate for [`value-cell`].
//!
//! # Overview
//!
//! This crate contains the low-level, type-erased storage and the unsafe
//! operations behind the [`value-cell`] smart pointer. Its job is narrow: own a
//! heap object whose concrete type has been forgotten, while still being able
//! to clone it, borrow it as its declared type, and hand it back out as a
//! [`Box`].
//!
//! **This crate is an implementation detail.** No semantic versioning guarantees
//! are provided. Users should depend on the [`value-cell`] crate, not this one.
//!
//! # Architecture
//!
//! - **[`shim`]**: Type-erased ownership of one heap object
//!   - [`RawShim`]: Owned object with [`Box`]-based allocation
//!   - [`ShimVtable`]: Function pointers instantiated for the concrete type
//!
//! - **[`upcast`]**: The [`Upcast`] trait, which relates a concrete type to
//!   the declared type it is viewed through (itself, or a trait object it
//!   implements)
//!
//! # Safety Strategy
//!
//! When a `Box<C>` is erased to a `NonNull<Erased>`, every later operation has
//! to be performed with the right `C` again. This crate keeps that correct by
//! pairing the pointer with a `&'static ShimVtable<T>` that was instantiated
//! for the same `C` in the same function call, and by never letting either
//! half be replaced afterwards:
//!
//! - **Module-based encapsulation**: the fields of [`RawShim`] and
//!   [`ShimVtable`] are private to their modules, so the invariants can be
//!   checked by reading a single file
//! - **Documented vtable contracts**: each vtable method states exactly when
//!   it can be called
//! - **An `unsafe` conversion trait**: [`Upcast`] implementations promise to
//!   return the object itself, which lets the shim derive `Send` and `Sync`
//!   from the declared type alone
//! - **Distinct addresses**: zero-sized objects are stored in a one-byte slot,
//!   so no two live objects share an address and the address can serve as
//!   the object's identity
//!
//! Cloning goes through the vtable too. Because the clone function was
//! instantiated for `C`, the copy is again a `C` wrapped with the same vtable,
//! which is what keeps a copy made through `dyn Trait` from losing the
//! concrete type.
//!
//! [`value-cell`]: https://docs.rs/value-cell/latest/value_cell/
//! [`ShimVtable`]: shim::vtable::ShimVtable
//! [`Box`]: alloc::boxed::Box

extern crate alloc;

mod shim;
mod upcast;
mod util;

pub use shim::RawShim;
pub use upcast::Upcast;
