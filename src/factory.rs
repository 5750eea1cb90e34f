use value_cell_internals::Upcast;

use crate::cell::ValueCell;

/// Allocates `value` and wraps it in a cell of the same declared type.
///
/// # Examples
/// ```
/// use value_cell::make_value;
///
/// let cell = make_value(vec![1, 2, 3]);
/// assert_eq!(cell.len(), 3);
/// ```
#[must_use]
pub fn make_value<T>(value: T) -> ValueCell<T>
where
    T: Clone + 'static,
{
    ValueCell::new(value)
}

/// Allocates `value` and wraps it in a cell declared as `Base`.
///
/// This is the usual way to get a cell whose declared and concrete types
/// differ. Clones of the returned cell keep `Derived` as their concrete type.
///
/// # Examples
/// ```
/// use value_cell::{ValueCell, make_derived_value, upcast};
///
/// trait Counter {
///     fn count(&self) -> u32;
/// }
///
/// struct Ticks(u32);
///
/// impl Clone for Ticks {
///     fn clone(&self) -> Self {
///         Ticks(self.0 + 1)
///     }
/// }
///
/// impl Counter for Ticks {
///     fn count(&self) -> u32 {
///         self.0
///     }
/// }
///
/// upcast!(Ticks => dyn Counter);
///
/// let cell: ValueCell<dyn Counter> = make_derived_value::<dyn Counter, _>(Ticks(22));
/// let copy = cell.clone();
/// assert_eq!(cell.count(), 22);
/// assert_eq!(copy.count(), 23);
/// ```
#[must_use]
pub fn make_derived_value<Base, Derived>(value: Derived) -> ValueCell<Base>
where
    Base: ?Sized + 'static,
    Derived: Clone + Upcast<Base> + 'static,
{
    ValueCell::new(value)
}
