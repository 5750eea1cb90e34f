use alloc::boxed::Box;
use core::mem::ManuallyDrop;

use crate::{
    deleter::{DefaultDelete, Deleter},
    error::{EmptyCellError, deref_empty},
    macros::trace_event,
};

/// An exclusively owning pointer bound to a deletion policy.
///
/// This is what [`ValueCell::to_unique`] hands out: a move-only handle that
/// owns at most one object and applies its deleter to it when dropped. It
/// plays the role a `Box` would if `Box` carried a deleter.
///
/// A `Unique<C, D>` whose element type is [`Clone`] converts back into a
/// [`ValueCell<C, D>`] with [`From`].
///
/// # Examples
/// ```
/// use value_cell::{Unique, ValueCell};
///
/// let mut cell = ValueCell::<String>::new(String::from("moved"));
/// let unique: Unique<String> = cell.to_unique();
/// assert!(cell.is_empty());
///
/// let cell = ValueCell::from(unique);
/// assert_eq!(*cell, "moved");
/// ```
///
/// [`ValueCell::to_unique`]: crate::ValueCell::to_unique
/// [`ValueCell<C, D>`]: crate::ValueCell
pub struct Unique<T: ?Sized, D: Deleter<T> = DefaultDelete> {
    /// The owned object, or `None` when empty
    value: Option<Box<T>>,
    /// Deletion policy applied to the owned object
    deleter: D,
}

impl<T: ?Sized, D: Deleter<T>> Unique<T, D> {
    /// Creates a handle owning `value` with a default deleter.
    #[must_use]
    pub fn new(value: Box<T>) -> Self
    where
        D: Default,
    {
        Self::from_parts(Some(value), D::default())
    }

    /// Creates a handle owning `value`, disposed of with `deleter`.
    #[must_use]
    pub fn with_deleter(value: Box<T>, deleter: D) -> Self {
        Self::from_parts(Some(value), deleter)
    }

    /// Assembles a handle from an optional object and a deleter.
    pub(crate) fn from_parts(value: Option<Box<T>>, deleter: D) -> Self {
        Self { value, deleter }
    }

    /// Splits the handle into its parts without running the deleter.
    pub(crate) fn into_parts(self) -> (Option<Box<T>>, D) {
        let mut this = ManuallyDrop::new(self);
        let value = this.value.take();

        // SAFETY: `this` is wrapped in `ManuallyDrop` and is never used again, so the
        // deleter is moved out exactly once and never dropped in place.
        let deleter = unsafe { core::ptr::read(&this.deleter) };

        (value, deleter)
    }

    /// Returns `true` if the handle owns an object.
    #[inline]
    pub fn is_some(&self) -> bool {
        self.value.is_some()
    }

    /// Returns `true` if the handle is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }

    /// Borrows the owned object, or returns `None` if the handle is empty.
    #[inline]
    pub fn get(&self) -> Option<&T> {
        self.value.as_deref()
    }

    /// Mutably borrows the owned object, or returns `None` if the handle is
    /// empty.
    #[inline]
    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.value.as_deref_mut()
    }

    /// Borrows the owned object, or fails with [`EmptyCellError`].
    #[inline]
    pub fn try_get(&self) -> Result<&T, EmptyCellError> {
        self.get().ok_or(EmptyCellError)
    }

    /// Returns a reference to the deletion policy.
    #[inline]
    pub fn deleter(&self) -> &D {
        &self.deleter
    }

    /// Returns a mutable reference to the deletion policy.
    #[inline]
    pub fn deleter_mut(&mut self) -> &mut D {
        &mut self.deleter
    }

    /// Takes the owned object out of the handle without running the deleter.
    #[inline]
    pub fn release(&mut self) -> Option<Box<T>> {
        self.value.take()
    }

    /// Consumes the handle and returns the owned object without running the
    /// deleter.
    #[inline]
    pub fn into_box(mut self) -> Option<Box<T>> {
        self.value.take()
    }

    /// Disposes of the owned object, if any, with the deleter.
    pub fn reset(&mut self) {
        if let Some(value) = self.value.take() {
            trace_event!("deleting unique object");
            self.deleter.delete(value);
        }
    }
}

impl<T: ?Sized, D: Deleter<T>> Drop for Unique<T, D> {
    fn drop(&mut self) {
        self.reset();
    }
}

impl<T: ?Sized, D: Deleter<T>> core::ops::Deref for Unique<T, D> {
    type Target = T;

    /// Borrows the owned object.
    ///
    /// # Panics
    ///
    /// Panics if the handle is empty.
    #[track_caller]
    fn deref(&self) -> &T {
        match self.get() {
            Some(value) => value,
            None => deref_empty("Unique"),
        }
    }
}

impl<T: ?Sized, D: Deleter<T>> core::ops::DerefMut for Unique<T, D> {
    /// Mutably borrows the owned object.
    ///
    /// # Panics
    ///
    /// Panics if the handle is empty.
    #[track_caller]
    fn deref_mut(&mut self) -> &mut T {
        match self.get_mut() {
            Some(value) => value,
            None => deref_empty("Unique"),
        }
    }
}

impl<T: ?Sized + core::fmt::Debug, D: Deleter<T>> core::fmt::Debug for Unique<T, D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.get() {
            Some(value) => f.debug_tuple("Unique").field(&value).finish(),
            None => f.write_str("Unique(<empty>)"),
        }
    }
}
