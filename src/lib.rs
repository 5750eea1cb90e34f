#![cfg_attr(not(doc), no_std)]
#![deny(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::missing_safety_doc,
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    clippy::as_ptr_cast_mut,
    clippy::ptr_as_ptr,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
// Extra checks on nightly
#![cfg_attr(nightly_extra_checks, feature(rustdoc_missing_doc_code_examples))]
#![cfg_attr(nightly_extra_checks, forbid(rustdoc::missing_doc_code_examples))]
// Make docs.rs generate better docs
#![cfg_attr(docsrs, feature(doc_cfg))]

//! An owning pointer with value semantics.
//!
//! ## Overview
//!
//! A [`ValueCell<T>`] owns one heap-allocated object, the way a `Box<T>` does,
//! but it can be cloned even when `T` is a trait object. Cloning a cell
//! clones the object through the concrete type it was created with, so a
//! `ValueCell<dyn Shape>` holding a `Circle` clones into a cell holding a new
//! `Circle`. Nothing is shared between a cell and its clones.
//!
//! The concrete type is captured once, when an object is put into the cell
//! ([`ValueCell::new`], [`ValueCell::from_box`], [`ValueCell::reset_with`]),
//! and every later clone reuses it.
//!
//! ## Quick Example
//!
//! ```
//! use value_cell::{ValueCell, upcast};
//!
//! trait Shape {
//!     fn scale(&mut self, by: f64);
//!     fn area(&self) -> f64;
//! }
//!
//! #[derive(Clone)]
//! struct Square(f64);
//!
//! impl Shape for Square {
//!     fn scale(&mut self, by: f64) {
//!         self.0 *= by;
//!     }
//!
//!     fn area(&self) -> f64 {
//!         self.0 * self.0
//!     }
//! }
//!
//! upcast!(Square => dyn Shape);
//!
//! let original: ValueCell<dyn Shape> = ValueCell::new(Square(1.0));
//! let mut copy = original.clone();
//! copy.scale(3.0);
//!
//! assert_eq!(original.area(), 1.0);
//! assert_eq!(copy.area(), 9.0);
//! ```
//!
//! ## Identity
//!
//! Cells compare, order and hash by the address of their object, never by
//! value. This makes any `ValueCell` usable as a key in ordered and hashed
//! containers (see [`collections`]) regardless of what `T` implements.
//!
//! ## Deletion policies
//!
//! The second type parameter of [`ValueCell`] is a [`Deleter`], invoked on
//! the object when the cell is dropped or reset. The default,
//! [`DefaultDelete`], simply drops it. [`ValueCell::to_unique`] moves the
//! object into a [`Unique`], which carries a copy of the deleter along.
//!
//! ## Feature flags
//!
//! - `tracing`: Emits `trace`-level [`tracing`] events when cells are
//!   cloned, reset, released and deleted.
//!
//! [`tracing`]: https://docs.rs/tracing

extern crate alloc;

#[macro_use]
mod macros;

pub mod collections;
pub mod prelude;

mod cell;
mod cmp;
mod deleter;
mod error;
mod factory;
mod unique;

pub use value_cell_internals::Upcast;

pub use self::{
    cell::{ValueCell, swap},
    cmp::{Null, ptr_eq},
    deleter::{DefaultDelete, Deleter},
    error::EmptyCellError,
    factory::{make_derived_value, make_value},
    unique::Unique,
};

// Not public API. Referenced by macro-generated code.
#[doc(hidden)]
pub mod __private {
    #[doc(hidden)]
    pub use alloc::boxed::Box;
}
