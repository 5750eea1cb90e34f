//! The relation between a concrete type and the declared type it is viewed
//! through.

use alloc::boxed::Box;

/// Views a concrete type `Self` as the declared type `T`.
///
/// A [`RawShim<T>`] may hold any concrete type `C: Upcast<T>`. For `T = C` the
/// blanket implementation applies. For a trait object `T = dyn Trait` the
/// implementation is the identity function on each method, letting the
/// compiler perform the unsizing coercion:
///
/// ```
/// use value_cell_internals::Upcast;
///
/// trait Shape {
///     fn area(&self) -> f64;
/// }
///
/// #[derive(Clone)]
/// struct Square(f64);
///
/// impl Shape for Square {
///     fn area(&self) -> f64 {
///         self.0 * self.0
///     }
/// }
///
/// // SAFETY: Every method returns `self`, coerced to `dyn Shape`.
/// unsafe impl Upcast<dyn Shape> for Square {
///     fn upcast_ref(&self) -> &(dyn Shape + 'static) {
///         self
///     }
///
///     fn upcast_mut(&mut self) -> &mut (dyn Shape + 'static) {
///         self
///     }
///
///     fn upcast_box(self: Box<Self>) -> Box<dyn Shape> {
///         self
///     }
/// }
///
/// let square = Square(3.0);
/// // `Square` is also `Upcast<Square>`, so name the declared type.
/// assert_eq!(Upcast::<dyn Shape>::upcast_ref(&square).area(), 9.0);
/// ```
///
/// # Safety
///
/// Each method must return `self` itself, converted to `T` by the compiler's
/// unsizing coercion (or unchanged when `T = Self`). In particular:
///
/// 1. The returned reference or box points at the same object, with the same
///    address, as `self`.
/// 2. `Self` is [`Send`] whenever `T` is `Send`, and [`Sync`] whenever `T` is
///    `Sync`. The coercion guarantees this for trait objects with auto-trait
///    bounds.
///
/// [`RawShim`] relies on both to hand out views of, and derive the auto traits
/// of, an object it only knows as `T`. The `upcast!` macro of `value-cell`
/// writes conforming implementations.
///
/// [`RawShim<T>`]: crate::RawShim
/// [`RawShim`]: crate::RawShim
pub unsafe trait Upcast<T: ?Sized> {
    /// Borrows `self` as the declared type.
    fn upcast_ref(&self) -> &T;

    /// Mutably borrows `self` as the declared type.
    fn upcast_mut(&mut self) -> &mut T;

    /// Converts an owned box of `self` into an owned box of the declared
    /// type.
    fn upcast_box(self: Box<Self>) -> Box<T>;
}

// SAFETY: Every method returns `self` unchanged.
unsafe impl<T> Upcast<T> for T {
    #[inline]
    fn upcast_ref(&self) -> &T {
        self
    }

    #[inline]
    fn upcast_mut(&mut self) -> &mut T {
        self
    }

    #[inline]
    fn upcast_box(self: Box<Self>) -> Box<T> {
        self
    }
}
