//! Address-keyed hash containers for cells.
//!
//! A [`ValueCell`] hashes and compares by the address of its object, so it
//! can key a hash table without `T` being `Hash` or `Eq`. These aliases pair
//! `hashbrown`'s tables with `rustc-hash`'s hasher, which suits pointer keys
//! and works without `std`.
//!
//! # Examples
//! ```
//! use value_cell::{ValueCell, collections::CellSet};
//!
//! let a = ValueCell::<f64>::new(1.0);
//! let b = a.clone();
//!
//! let mut set = CellSet::default();
//! set.insert(a);
//! set.insert(b);
//! assert_eq!(set.len(), 2);
//! ```

use rustc_hash::FxBuildHasher;

use crate::{cell::ValueCell, deleter::DefaultDelete};

/// A set of cells, keyed by address.
pub type CellSet<T, D = DefaultDelete> = hashbrown::HashSet<ValueCell<T, D>, FxBuildHasher>;

/// A map from cells, keyed by address, to values of type `V`.
pub type CellMap<T, V, D = DefaultDelete> =
    hashbrown::HashMap<ValueCell<T, D>, V, FxBuildHasher>;
