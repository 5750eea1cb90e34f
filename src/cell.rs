use alloc::boxed::Box;
use core::{any::TypeId, mem::ManuallyDrop, ptr::NonNull};

use value_cell_internals::{RawShim, Upcast};

use crate::{
    deleter::{DefaultDelete, Deleter},
    error::{EmptyCellError, deref_empty},
    macros::trace_event,
    unique::Unique,
};

/// An owning pointer with value semantics.
///
/// A `ValueCell<T>` owns at most one heap-allocated object, like an
/// `Option<Box<T>>`. Unlike a box, cloning the cell clones the object through
/// its *concrete* type, even when `T` is a trait object: a
/// `ValueCell<dyn Shape>` holding a `Circle` clones into a new `Circle`.
///
/// # Type Parameters
/// - `T`: The declared type. This can be a concrete type, or a trait object
///   that the stored types implement [`Upcast`] to (see the [`upcast!`]
///   macro).
/// - `D`: The deletion policy invoked on the owned object when the cell is
///   dropped or reset. Defaults to [`DefaultDelete`].
///
/// # Identity
///
/// Comparison, ordering and hashing look only at the address of the owned
/// object ([`ValueCell::addr`]), never at its value. Two cells holding equal
/// but separately allocated objects are not equal; compare `*a == *b` to
/// compare the values.
///
/// # Examples
///
/// ```
/// use value_cell::{ValueCell, upcast};
///
/// trait Animal {
///     fn legs(&self) -> u32;
/// }
///
/// #[derive(Clone)]
/// struct Bird;
///
/// impl Animal for Bird {
///     fn legs(&self) -> u32 {
///         2
///     }
/// }
///
/// upcast!(Bird => dyn Animal);
///
/// let bird: ValueCell<dyn Animal> = ValueCell::new(Bird);
/// let copy = bird.clone();
///
/// assert_eq!(copy.legs(), 2);
/// assert!(bird != copy);
/// ```
///
/// Types that cannot be cloned cannot be stored:
///
/// ```compile_fail
/// use value_cell::ValueCell;
///
/// struct NotClone;
///
/// let cell: ValueCell<NotClone> = ValueCell::new(NotClone);
/// ```
///
/// [`upcast!`]: crate::upcast
pub struct ValueCell<T: ?Sized + 'static, D: Deleter<T> = DefaultDelete> {
    /// The owned object, or `None` when the cell is empty
    shim: Option<RawShim<T>>,
    /// Deletion policy applied to the owned object
    deleter: D,
}

impl<T: ?Sized + 'static, D: Deleter<T>> ValueCell<T, D> {
    /// Allocates `value` on the heap and creates a cell owning it.
    ///
    /// # Examples
    /// ```
    /// use value_cell::ValueCell;
    ///
    /// let cell: ValueCell<String> = ValueCell::new(String::from("hello"));
    /// assert_eq!(*cell, "hello");
    /// ```
    #[must_use]
    pub fn new<C>(value: C) -> Self
    where
        C: Clone + Upcast<T> + 'static,
        D: Default,
    {
        Self::from_box(Box::new(value))
    }

    /// Creates a cell taking ownership of an already allocated object.
    ///
    /// The concrete type `C` is captured here and used by every later clone.
    ///
    /// # Examples
    /// ```
    /// use value_cell::ValueCell;
    ///
    /// let boxed = Box::new(41);
    /// let mut cell = ValueCell::<i32>::from_box(boxed);
    /// *cell += 1;
    /// assert_eq!(*cell, 42);
    /// ```
    #[must_use]
    pub fn from_box<C>(value: Box<C>) -> Self
    where
        C: Clone + Upcast<T> + 'static,
        D: Default,
    {
        Self::with_deleter(value, D::default())
    }

    /// Creates a cell taking ownership of `value`, disposed of with
    /// `deleter`.
    #[must_use]
    pub fn with_deleter<C>(value: Box<C>, deleter: D) -> Self
    where
        C: Clone + Upcast<T> + 'static,
    {
        Self {
            shim: Some(RawShim::new(value)),
            deleter,
        }
    }

    /// Creates an empty cell. This never allocates.
    ///
    /// # Examples
    /// ```
    /// use value_cell::ValueCell;
    ///
    /// let cell = ValueCell::<u8>::empty();
    /// assert!(cell.is_empty());
    /// assert!(cell.get().is_none());
    /// ```
    #[must_use]
    pub fn empty() -> Self
    where
        D: Default,
    {
        Self::empty_with_deleter(D::default())
    }

    /// Creates an empty cell that will use `deleter` for objects stored in it
    /// later.
    #[must_use]
    pub const fn empty_with_deleter(deleter: D) -> Self {
        Self {
            shim: None,
            deleter,
        }
    }

    /// Creates a cell holding a deep copy of the object in `other`, whose
    /// declared type `U` converts to `T`.
    ///
    /// The object is cloned through its concrete type and then stored as a
    /// `U`, so later clones of the new cell copy it as a `U`. The new cell
    /// gets a default-constructed deleter.
    ///
    /// # Examples
    /// ```
    /// use value_cell::{ValueCell, upcast};
    ///
    /// trait Greet {
    ///     fn greet(&self) -> &'static str;
    /// }
    ///
    /// #[derive(Clone)]
    /// struct English;
    ///
    /// impl Greet for English {
    ///     fn greet(&self) -> &'static str {
    ///         "hello"
    ///     }
    /// }
    ///
    /// upcast!(English => dyn Greet);
    ///
    /// let english = ValueCell::<English>::new(English);
    /// let greeter = ValueCell::<dyn Greet>::cast_from(&english);
    /// assert_eq!(greeter.greet(), "hello");
    /// assert!(english.is_some());
    /// ```
    #[must_use]
    pub fn cast_from<U, E>(other: &ValueCell<U, E>) -> Self
    where
        U: Clone + Upcast<T> + 'static,
        E: Deleter<U>,
        D: Default,
    {
        match &other.shim {
            Some(shim) => Self::from_box(shim.clone().into_box()),
            None => Self::empty(),
        }
    }

    /// Returns `true` if the cell owns an object.
    #[inline]
    pub fn is_some(&self) -> bool {
        self.shim.is_some()
    }

    /// Returns `true` if the cell is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shim.is_none()
    }

    /// Borrows the owned object, or returns `None` if the cell is empty.
    #[inline]
    pub fn get(&self) -> Option<&T> {
        self.shim.as_ref().map(RawShim::get)
    }

    /// Mutably borrows the owned object, or returns `None` if the cell is
    /// empty.
    #[inline]
    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.shim.as_mut().map(RawShim::get_mut)
    }

    /// Borrows the owned object, or fails with [`EmptyCellError`].
    ///
    /// # Examples
    /// ```
    /// use value_cell::{EmptyCellError, ValueCell};
    ///
    /// fn len(cell: &ValueCell<String>) -> Result<usize, EmptyCellError> {
    ///     Ok(cell.try_get()?.len())
    /// }
    ///
    /// assert_eq!(len(&ValueCell::new(String::from("four"))), Ok(4));
    /// assert_eq!(len(&ValueCell::empty()), Err(EmptyCellError));
    /// ```
    #[inline]
    pub fn try_get(&self) -> Result<&T, EmptyCellError> {
        self.get().ok_or(EmptyCellError)
    }

    /// Mutably borrows the owned object, or fails with [`EmptyCellError`].
    #[inline]
    pub fn try_get_mut(&mut self) -> Result<&mut T, EmptyCellError> {
        self.get_mut().ok_or(EmptyCellError)
    }

    /// Returns a raw pointer to the owned object, or `None` if the cell is
    /// empty.
    ///
    /// The pointer stays valid until the cell is mutated or dropped.
    #[inline]
    pub fn as_ptr(&self) -> Option<NonNull<T>> {
        self.shim.as_ref().map(RawShim::as_ptr)
    }

    /// Returns the address of the owned object, or a null pointer if the cell
    /// is empty.
    ///
    /// This is the identity used by the comparison and hashing
    /// implementations.
    #[inline]
    pub fn addr(&self) -> *const () {
        match &self.shim {
            Some(shim) => shim.addr(),
            None => core::ptr::null(),
        }
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

    /// Takes the owned object out of the cell, leaving it empty.
    ///
    /// The deleter is not invoked: the returned box is now the caller's
    /// responsibility. It keeps the object's address, except for a
    /// zero-sized concrete type, which has no allocation to hand over.
    ///
    /// # Examples
    /// ```
    /// use value_cell::ValueCell;
    ///
    /// let mut cell = ValueCell::<Vec<u8>>::new(vec![1, 2]);
    /// let boxed = cell.release();
    /// assert_eq!(boxed.as_deref(), Some(&vec![1, 2]));
    /// assert!(cell.is_empty());
    /// ```
    pub fn release(&mut self) -> Option<Box<T>> {
        let shim = self.shim.take()?;
        trace_event!(
            concrete_type = shim.concrete_type_name(),
            addr = ?shim.addr(),
            "released value cell"
        );
        Some(shim.into_box())
    }

    /// Disposes of the owned object, if any, with the deleter. The cell is
    /// empty afterwards.
    pub fn reset(&mut self) {
        if let Some(shim) = self.shim.take() {
            trace_event!(
                concrete_type = shim.concrete_type_name(),
                addr = ?shim.addr(),
                "deleting value cell object"
            );
            self.deleter.delete(shim.into_box());
        }
    }

    /// Disposes of the owned object, if any, with the deleter, then takes
    /// ownership of `value`.
    ///
    /// The concrete type of `value` is captured anew, so later clones copy it
    /// as a `C` even if the previous object had a different concrete type.
    ///
    /// # Examples
    /// ```
    /// use value_cell::{ValueCell, upcast};
    ///
    /// trait Letter {
    ///     fn letter(&self) -> char;
    /// }
    ///
    /// #[derive(Clone)]
    /// struct A;
    /// #[derive(Clone)]
    /// struct B;
    ///
    /// impl Letter for A {
    ///     fn letter(&self) -> char {
    ///         'a'
    ///     }
    /// }
    ///
    /// impl Letter for B {
    ///     fn letter(&self) -> char {
    ///         'b'
    ///     }
    /// }
    ///
    /// upcast!(A, B => dyn Letter);
    ///
    /// let mut cell: ValueCell<dyn Letter> = ValueCell::new(A);
    /// cell.reset_with(Box::new(B));
    /// assert_eq!(cell.clone().letter(), 'b');
    /// ```
    ///
    /// The new object must be cloneable, since later clones of the cell copy
    /// it:
    ///
    /// ```compile_fail
    /// use value_cell::ValueCell;
    ///
    /// trait Letter {}
    ///
    /// struct NotClone;
    ///
    /// impl Letter for NotClone {}
    ///
    /// let mut cell: ValueCell<dyn Letter> = ValueCell::empty();
    /// cell.reset_with(Box::new(NotClone));
    /// ```
    pub fn reset_with<C>(&mut self, value: Box<C>)
    where
        C: Clone + Upcast<T> + 'static,
    {
        self.reset();
        let shim = RawShim::new(value);
        trace_event!(
            concrete_type = shim.concrete_type_name(),
            addr = ?shim.addr(),
            "reset value cell"
        );
        self.shim = Some(shim);
    }

    /// Moves the contents of the cell out, leaving an empty cell with a
    /// default deleter behind. This never allocates.
    #[must_use]
    pub fn take(&mut self) -> Self
    where
        D: Default,
    {
        core::mem::take(self)
    }

    /// Exchanges the objects and deleters of two cells. This never allocates.
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        core::mem::swap(self, other);
    }

    /// Moves the owned object into a [`Unique`] handle that uses a copy of
    /// this cell's deleter. The cell is empty afterwards.
    ///
    /// # Examples
    /// ```
    /// use value_cell::ValueCell;
    ///
    /// let mut cell = ValueCell::<i32>::new(5);
    /// let unique = cell.to_unique();
    /// assert_eq!(*unique, 5);
    /// assert!(cell.is_empty());
    /// ```
    #[must_use]
    pub fn to_unique(&mut self) -> Unique<T, D>
    where
        D: Clone,
    {
        trace_event!(addr = ?self.addr(), "converting value cell to unique");
        let value = self.shim.take().map(RawShim::into_box);
        Unique::from_parts(value, self.deleter.clone())
    }

    /// Returns the [`TypeId`] of the concrete type of the owned object, or
    /// `None` if the cell is empty.
    #[inline]
    pub fn concrete_type_id(&self) -> Option<TypeId> {
        self.shim.as_ref().map(RawShim::concrete_type_id)
    }

    /// Returns the [`core::any::type_name`] of the concrete type of the owned
    /// object, or `None` if the cell is empty.
    #[inline]
    pub fn concrete_type_name(&self) -> Option<&'static str> {
        self.shim.as_ref().map(RawShim::concrete_type_name)
    }

    /// Returns `true` if the cell owns an object of concrete type `C`.
    #[inline]
    pub fn is<C: 'static>(&self) -> bool {
        self.concrete_type_id() == Some(TypeId::of::<C>())
    }

    /// Borrows the owned object as its concrete type `C`, or returns `None`
    /// if the cell is empty or holds another type.
    #[inline]
    pub fn downcast_ref<C: 'static>(&self) -> Option<&C> {
        self.shim.as_ref()?.downcast_ref::<C>()
    }

    /// Mutably borrows the owned object as its concrete type `C`, or returns
    /// `None` if the cell is empty or holds another type.
    #[inline]
    pub fn downcast_mut<C: 'static>(&mut self) -> Option<&mut C> {
        self.shim.as_mut()?.downcast_mut::<C>()
    }

    /// Converts the cell into one whose declared type is the concrete type
    /// `C` of its object, without reallocating.
    ///
    /// Returns the cell unchanged if it is empty or holds another type.
    ///
    /// # Examples
    /// ```
    /// use value_cell::{ValueCell, upcast};
    ///
    /// trait Token {}
    ///
    /// #[derive(Clone, Debug, PartialEq)]
    /// struct Word(&'static str);
    ///
    /// impl Token for Word {}
    ///
    /// upcast!(Word => dyn Token);
    ///
    /// let token: ValueCell<dyn Token> = ValueCell::new(Word("let"));
    /// let token = token.downcast::<u8>().unwrap_err();
    /// let word = token.downcast::<Word>().ok().unwrap();
    /// assert_eq!(*word, Word("let"));
    /// ```
    pub fn downcast<C>(self) -> Result<ValueCell<C, D>, Self>
    where
        C: Clone + 'static,
        D: Deleter<C>,
    {
        let (shim, deleter) = self.into_parts();
        match shim.map(RawShim::downcast::<C>) {
            Some(Ok(shim)) => Ok(ValueCell {
                shim: Some(shim),
                deleter,
            }),
            Some(Err(shim)) => Err(ValueCell {
                shim: Some(shim),
                deleter,
            }),
            None => Err(ValueCell {
                shim: None,
                deleter,
            }),
        }
    }

    /// Splits the cell into its parts without running the deleter.
    fn into_parts(self) -> (Option<RawShim<T>>, D) {
        let mut this = ManuallyDrop::new(self);
        let shim = this.shim.take();

        // SAFETY: `this` is wrapped in `ManuallyDrop` and is never used again, so the
        // deleter is moved out exactly once and never dropped in place.
        let deleter = unsafe { core::ptr::read(&this.deleter) };

        (shim, deleter)
    }
}

impl<T: Sized + 'static, D: Deleter<T>> ValueCell<T, D> {
    /// Converts the cell into one with the declared type `U`, moving the
    /// object and the deleter. This never allocates.
    ///
    /// The object is stored as a `T` afterwards: later clones copy it as a
    /// `T`.
    ///
    /// # Examples
    /// ```
    /// use value_cell::{ValueCell, upcast};
    ///
    /// trait Named {
    ///     fn name(&self) -> String;
    /// }
    ///
    /// #[derive(Clone)]
    /// struct User(String);
    ///
    /// impl Named for User {
    ///     fn name(&self) -> String {
    ///         self.0.clone()
    ///     }
    /// }
    ///
    /// upcast!(User => dyn Named);
    ///
    /// let user = ValueCell::<User>::new(User(String::from("ada")));
    /// let addr = user.addr();
    /// let named: ValueCell<dyn Named> = user.upcast();
    /// assert_eq!(named.name(), "ada");
    /// assert_eq!(named.addr(), addr);
    /// ```
    #[must_use]
    pub fn upcast<U>(self) -> ValueCell<U, D>
    where
        U: ?Sized + 'static,
        T: Clone + Upcast<U>,
        D: Deleter<U>,
    {
        let (shim, deleter) = self.into_parts();
        ValueCell {
            shim: shim.map(|shim| {
                shim.upcast::<U>()
                    .unwrap_or_else(|shim| RawShim::new(shim.into_box()))
            }),
            deleter,
        }
    }
}

impl<T: ?Sized + 'static, D: Deleter<T>> Drop for ValueCell<T, D> {
    fn drop(&mut self) {
        self.reset();
    }
}

impl<T: ?Sized + 'static, D: Deleter<T> + Clone> Clone for ValueCell<T, D> {
    /// Creates a cell owning an independent deep copy of the object, cloned
    /// through its concrete type, and a copy of the deleter.
    fn clone(&self) -> Self {
        let deleter = self.deleter.clone();
        let shim = self.shim.as_ref().map(|shim| {
            let copy = shim.clone();
            trace_event!(
                concrete_type = copy.concrete_type_name(),
                from = ?shim.addr(),
                to = ?copy.addr(),
                "cloned value cell"
            );
            copy
        });
        Self { shim, deleter }
    }

    /// Replaces the contents of `self` with a deep copy of `source`.
    ///
    /// The copy is made before `self` is touched, so if cloning panics,
    /// `self` is left unchanged.
    fn clone_from(&mut self, source: &Self) {
        let mut fresh = source.clone();
        self.swap(&mut fresh);
    }
}

impl<T: ?Sized + 'static, D: Deleter<T> + Default> Default for ValueCell<T, D> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: ?Sized + 'static, D: Deleter<T>> core::ops::Deref for ValueCell<T, D> {
    type Target = T;

    /// Borrows the owned object.
    ///
    /// # Panics
    ///
    /// Panics if the cell is empty.
    #[track_caller]
    fn deref(&self) -> &T {
        match self.get() {
            Some(value) => value,
            None => deref_empty("ValueCell"),
        }
    }
}

impl<T: ?Sized + 'static, D: Deleter<T>> core::ops::DerefMut for ValueCell<T, D> {
    /// Mutably borrows the owned object.
    ///
    /// # Panics
    ///
    /// Panics if the cell is empty.
    #[track_caller]
    fn deref_mut(&mut self) -> &mut T {
        match self.get_mut() {
            Some(value) => value,
            None => deref_empty("ValueCell"),
        }
    }
}

impl<T, C, D> From<Box<C>> for ValueCell<T, D>
where
    T: ?Sized + 'static,
    C: Clone + Upcast<T> + 'static,
    D: Deleter<T> + Default,
{
    fn from(value: Box<C>) -> Self {
        Self::from_box(value)
    }
}

impl<C, D> From<Unique<C, D>> for ValueCell<C, D>
where
    C: Clone + 'static,
    D: Deleter<C>,
{
    fn from(unique: Unique<C, D>) -> Self {
        let (value, deleter) = unique.into_parts();
        Self {
            shim: value.map(RawShim::new),
            deleter,
        }
    }
}

impl<T: ?Sized + core::fmt::Debug + 'static, D: Deleter<T>> core::fmt::Debug for ValueCell<T, D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.get() {
            Some(value) => f.debug_tuple("ValueCell").field(&value).finish(),
            None => f.write_str("ValueCell(<empty>)"),
        }
    }
}

impl<T: ?Sized + 'static, D: Deleter<T>> core::fmt::Pointer for ValueCell<T, D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Pointer::fmt(&self.addr(), f)
    }
}

/// Exchanges the contents of two cells.
#[inline]
pub fn swap<T: ?Sized + 'static, D: Deleter<T>>(a: &mut ValueCell<T, D>, b: &mut ValueCell<T, D>) {
    a.swap(b);
}

#[cfg(test)]
mod tests {
    use alloc::{format, rc::Rc, string::String, vec::Vec};
    use core::cell::Cell;

    use super::*;
    use crate::upcast;

    trait Shape {
        fn sides(&self) -> u32;
    }

    #[derive(Clone, Debug)]
    struct Triangle;

    #[derive(Clone, Debug)]
    struct Square;

    impl Shape for Triangle {
        fn sides(&self) -> u32 {
            3
        }
    }

    impl Shape for Square {
        fn sides(&self) -> u32 {
            4
        }
    }

    upcast!(Triangle, Square => dyn Shape);

    #[allow(dead_code)]
    struct NonSend(*const ());

    #[test]
    fn test_value_cell_size() {
        assert_eq!(
            core::mem::size_of::<ValueCell<String>>(),
            2 * core::mem::size_of::<usize>()
        );
        assert_eq!(
            core::mem::size_of::<ValueCell<dyn Shape>>(),
            2 * core::mem::size_of::<usize>()
        );
    }

    #[test]
    fn test_value_cell_send_sync() {
        static_assertions::assert_impl_all!(ValueCell<String>: Send, Sync);
        static_assertions::assert_impl_all!(ValueCell<Cell<u8>>: Send);
        static_assertions::assert_not_impl_any!(ValueCell<Cell<u8>>: Sync);
        static_assertions::assert_not_impl_any!(ValueCell<Rc<u8>>: Send, Sync);
        static_assertions::assert_not_impl_any!(ValueCell<NonSend>: Send, Sync);
        static_assertions::assert_not_impl_any!(ValueCell<dyn Shape>: Send, Sync);
    }

    #[test]
    fn test_value_cell_unpin() {
        static_assertions::assert_impl_all!(ValueCell<String>: Unpin);
        static_assertions::assert_impl_all!(ValueCell<dyn Shape>: Unpin);
    }

    #[test]
    fn test_value_cell_clone_impls() {
        static_assertions::assert_impl_all!(ValueCell<String>: Clone);
        static_assertions::assert_impl_all!(ValueCell<dyn Shape>: Clone);
        static_assertions::assert_not_impl_any!(ValueCell<String>: Copy);
    }

    #[test]
    fn test_clone_is_deep() {
        let cell = ValueCell::<String>::new(String::from("deep"));
        let mut copy = cell.clone();
        assert_ne!(cell.addr(), copy.addr());
        assert_eq!(*cell, *copy);

        copy.push('!');
        assert_eq!(*cell, "deep");
        assert_eq!(*copy, "deep!");
    }

    #[test]
    fn test_clone_keeps_concrete_type() {
        let cell: ValueCell<dyn Shape> = ValueCell::new(Square);
        let copy = cell.clone();
        assert_eq!(copy.sides(), 4);
        assert!(copy.is::<Square>());
        assert!(!copy.is::<Triangle>());
    }

    #[test]
    fn test_reset_with_captures_new_concrete_type() {
        let mut cell: ValueCell<dyn Shape> = ValueCell::new(Triangle);
        cell.reset_with(Box::new(Square));
        let copy = cell.clone();
        assert_eq!(copy.sides(), 4);
        assert_eq!(copy.concrete_type_id(), Some(TypeId::of::<Square>()));
    }

    #[test]
    fn test_empty_cell_accessors() {
        let mut cell = ValueCell::<Vec<u8>>::empty();
        assert!(cell.is_empty());
        assert!(!cell.is_some());
        assert!(cell.get().is_none());
        assert!(cell.get_mut().is_none());
        assert!(cell.as_ptr().is_none());
        assert!(cell.addr().is_null());
        assert!(cell.release().is_none());
        assert_eq!(cell.try_get().err(), Some(EmptyCellError));
        assert_eq!(cell.concrete_type_id(), None);
        assert_eq!(cell.concrete_type_name(), None);
        assert!(cell.clone().is_empty());
    }

    #[test]
    #[should_panic(expected = "dereferenced an empty ValueCell")]
    fn test_deref_empty_panics() {
        let cell = ValueCell::<u8>::empty();
        let _value: u8 = *cell;
    }

    #[test]
    fn test_as_ptr_matches_addr() {
        let cell: ValueCell<dyn Shape> = ValueCell::new(Triangle);
        let ptr = cell.as_ptr().map(|ptr| ptr.as_ptr().cast_const().cast::<()>());
        assert_eq!(ptr, Some(cell.addr()));
        assert_eq!(&*cell as *const dyn Shape as *const (), cell.addr());
    }

    #[test]
    fn test_take_leaves_empty() {
        let mut cell = ValueCell::<u32>::new(9);
        let addr = cell.addr();
        let taken = cell.take();
        assert!(cell.is_empty());
        assert_eq!(taken.addr(), addr);
        assert_eq!(*taken, 9);
    }

    #[test]
    fn test_swap() {
        let mut a = ValueCell::<u32>::new(1);
        let mut b = ValueCell::<u32>::empty();
        let addr = a.addr();
        swap(&mut a, &mut b);
        assert!(a.is_empty());
        assert_eq!(b.addr(), addr);
        assert_eq!(*b, 1);
    }

    #[test]
    fn test_downcast_ref_and_mut() {
        let mut cell = ValueCell::<u32>::new(1);
        assert_eq!(cell.downcast_ref::<u32>(), Some(&1));
        assert_eq!(cell.downcast_ref::<u64>(), None);
        if let Some(value) = cell.downcast_mut::<u32>() {
            *value = 2;
        }
        assert_eq!(*cell, 2);
    }

    #[test]
    fn test_downcast_empty_returns_cell() {
        let cell = ValueCell::<dyn Shape>::empty();
        assert!(cell.downcast::<Square>().is_err());
    }

    #[test]
    fn test_upcast_moves_without_copy() {
        let cell = ValueCell::<Triangle>::new(Triangle);
        let addr = cell.addr();
        let shape: ValueCell<dyn Shape> = cell.upcast();
        assert_eq!(shape.addr(), addr);
        assert_eq!(shape.sides(), 3);
    }

    #[test]
    fn test_zero_sized_values_keep_identity() {
        let cell: ValueCell<dyn Shape> = ValueCell::new(Square);
        let copy = cell.clone();
        let other: ValueCell<dyn Shape> = ValueCell::new(Square);
        assert!(cell != copy);
        assert!(cell != other);
        assert!(copy != other);

        let mut unit = ValueCell::<()>::new(());
        let addr = unit.addr();
        assert_ne!(unit, unit.clone());
        let moved = unit.take();
        assert_eq!(moved.addr(), addr);
        assert!(unit.is_empty());

        let triangle = ValueCell::<Triangle>::new(Triangle);
        let addr = triangle.addr();
        let shape: ValueCell<dyn Shape> = triangle.upcast();
        assert_eq!(shape.addr(), addr);
        let Ok(triangle) = shape.downcast::<Triangle>() else {
            panic!("concrete type is `Triangle`");
        };
        assert_eq!(triangle.addr(), addr);
    }

    #[test]
    fn test_debug_and_pointer_format() {
        let cell = ValueCell::<u32>::new(7);
        assert_eq!(format!("{cell:?}"), "ValueCell(7)");
        assert_eq!(format!("{:?}", ValueCell::<u32>::empty()), "ValueCell(<empty>)");
        assert_eq!(format!("{cell:p}"), format!("{:p}", cell.addr()));
    }
}
