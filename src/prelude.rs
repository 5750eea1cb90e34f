//! Commonly used items for convenient importing.
//!
//! # Usage
//!
//! ```rust
//! use value_cell::prelude::*;
//!
//! trait Shape {
//!     fn sides(&self) -> u32;
//! }
//!
//! #[derive(Clone)]
//! struct Hexagon;
//!
//! impl Shape for Hexagon {
//!     fn sides(&self) -> u32 {
//!         6
//!     }
//! }
//!
//! upcast!(Hexagon => dyn Shape);
//!
//! let shape: ValueCell<dyn Shape> = make_derived_value::<dyn Shape, _>(Hexagon);
//! assert_eq!(shape.clone().sides(), 6);
//! assert!(shape != Null);
//! ```
//!
//! # What's Included
//!
//! - **[`ValueCell`]** and **[`Unique`]**: The owning pointers
//! - **[`Deleter`]** and **[`DefaultDelete`]**: Deletion policies
//! - **[`Null`]**: The null cell literal
//! - **[`make_value`]** and **[`make_derived_value`]**: Factories
//! - **[`upcast!`]** and **[`Upcast`]**: Declaring the types a cell may hold

pub use crate::{
    DefaultDelete, Deleter, Null, Unique, Upcast, ValueCell, make_derived_value, make_value,
    upcast,
};
