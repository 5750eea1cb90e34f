//! Identity comparison and hashing for [`ValueCell`].
//!
//! All of these look at [`ValueCell::addr`] only. An empty cell has the null
//! address, so it compares equal to every other empty cell and to [`Null`],
//! and orders before every non-empty cell.

use core::{
    cmp::Ordering,
    hash::{Hash, Hasher},
};

use crate::{cell::ValueCell, deleter::Deleter};

/// The null cell literal.
///
/// Compares equal to empty cells and converts into an empty cell.
///
/// # Examples
/// ```
/// use value_cell::{Null, ValueCell};
///
/// let mut cell = ValueCell::<u8>::new(1);
/// assert!(cell != Null);
///
/// cell = Null.into();
/// assert!(cell == Null);
/// assert!(Null <= cell);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Null;

impl<T, D> From<Null> for ValueCell<T, D>
where
    T: ?Sized + 'static,
    D: Deleter<T> + Default,
{
    fn from(_: Null) -> Self {
        Self::empty()
    }
}

impl<T, D, U, E> PartialEq<ValueCell<U, E>> for ValueCell<T, D>
where
    T: ?Sized + 'static,
    D: Deleter<T>,
    U: ?Sized + 'static,
    E: Deleter<U>,
{
    #[inline]
    fn eq(&self, other: &ValueCell<U, E>) -> bool {
        self.addr() == other.addr()
    }
}

impl<T: ?Sized + 'static, D: Deleter<T>> Eq for ValueCell<T, D> {}

impl<T, D, U, E> PartialOrd<ValueCell<U, E>> for ValueCell<T, D>
where
    T: ?Sized + 'static,
    D: Deleter<T>,
    U: ?Sized + 'static,
    E: Deleter<U>,
{
    #[inline]
    fn partial_cmp(&self, other: &ValueCell<U, E>) -> Option<Ordering> {
        Some(self.addr().cmp(&other.addr()))
    }
}

impl<T: ?Sized + 'static, D: Deleter<T>> Ord for ValueCell<T, D> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.addr().cmp(&other.addr())
    }
}

// Hashes the address only, so `T` need not be `Hash`.
impl<T: ?Sized + 'static, D: Deleter<T>> Hash for ValueCell<T, D> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}

impl<T: ?Sized + 'static, D: Deleter<T>> PartialEq<Null> for ValueCell<T, D> {
    #[inline]
    fn eq(&self, _: &Null) -> bool {
        self.is_empty()
    }
}

impl<T: ?Sized + 'static, D: Deleter<T>> PartialEq<ValueCell<T, D>> for Null {
    #[inline]
    fn eq(&self, other: &ValueCell<T, D>) -> bool {
        other.is_empty()
    }
}

impl<T: ?Sized + 'static, D: Deleter<T>> PartialOrd<Null> for ValueCell<T, D> {
    #[inline]
    fn partial_cmp(&self, _: &Null) -> Option<Ordering> {
        Some(self.addr().cmp(&core::ptr::null()))
    }
}

impl<T: ?Sized + 'static, D: Deleter<T>> PartialOrd<ValueCell<T, D>> for Null {
    #[inline]
    fn partial_cmp(&self, other: &ValueCell<T, D>) -> Option<Ordering> {
        Some(core::ptr::null::<()>().cmp(&other.addr()))
    }
}

/// Returns `true` if `a` and `b` own the same object, or are both empty.
///
/// This is `a == b` spelled out for cells whose declared types differ.
#[inline]
pub fn ptr_eq<T, D, U, E>(a: &ValueCell<T, D>, b: &ValueCell<U, E>) -> bool
where
    T: ?Sized + 'static,
    D: Deleter<T>,
    U: ?Sized + 'static,
    E: Deleter<U>,
{
    a.addr() == b.addr()
}
