//! Deletion policies applied to the objects a cell or [`Unique`] owns.
//!
//! A deletion policy is any value implementing [`Deleter`]. It is invoked
//! exactly once per owned object, with the object's [`Box`], when the owner
//! gives the object up by being dropped or reset. Objects handed out with
//! [`ValueCell::release`] or [`Unique::into_box`] are never seen by the
//! deleter.
//!
//! [`Unique`]: crate::Unique
//! [`Unique::into_box`]: crate::Unique::into_box
//! [`ValueCell::release`]: crate::ValueCell::release

use alloc::boxed::Box;

/// A pluggable strategy for disposing of an owned object.
///
/// The default policy, [`DefaultDelete`], drops the box, running the
/// object's destructor and freeing the memory. Custom policies can count,
/// recycle or deliberately leak objects. Closures taking a `Box<T>` are
/// deleters too.
///
/// # Examples
///
/// ```
/// use std::{cell::Cell, rc::Rc};
///
/// use value_cell::{Deleter, ValueCell};
///
/// #[derive(Clone, Default)]
/// struct CountingDelete(Rc<Cell<usize>>);
///
/// impl Deleter<u32> for CountingDelete {
///     fn delete(&mut self, value: Box<u32>) {
///         self.0.set(self.0.get() + 1);
///         drop(value);
///     }
/// }
///
/// let deleted = Rc::new(Cell::new(0));
/// let cell: ValueCell<u32, CountingDelete> =
///     ValueCell::with_deleter(Box::new(7_u32), CountingDelete(deleted.clone()));
/// let copy = cell.clone();
/// drop(cell);
/// drop(copy);
/// assert_eq!(deleted.get(), 2);
/// ```
pub trait Deleter<T: ?Sized> {
    /// Disposes of `value`.
    fn delete(&mut self, value: Box<T>);
}

/// The default deletion policy: drops the box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DefaultDelete;

impl<T: ?Sized> Deleter<T> for DefaultDelete {
    #[inline]
    fn delete(&mut self, value: Box<T>) {
        drop(value);
    }
}

impl<T: ?Sized, F> Deleter<T> for F
where
    F: FnMut(Box<T>),
{
    #[inline]
    fn delete(&mut self, value: Box<T>) {
        self(value)
    }
}
