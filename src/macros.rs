/// Implements [`Upcast`] from one or more concrete types to a declared type.
///
/// The declared type is usually a trait object. Each generated implementation
/// is the identity function, so the compiler's unsizing coercion does the
/// work and the address of the object never changes. This is the safe way to
/// implement the `unsafe` [`Upcast`] trait.
///
/// [`Upcast`]: crate::Upcast
///
/// # Examples
///
/// ```
/// use value_cell::{ValueCell, upcast};
///
/// trait Shape {
///     fn area(&self) -> f64;
/// }
///
/// #[derive(Clone)]
/// struct Circle(f64);
///
/// #[derive(Clone)]
/// struct Rect(f64, f64);
///
/// impl Shape for Circle {
///     fn area(&self) -> f64 {
///         3.0 * self.0 * self.0
///     }
/// }
///
/// impl Shape for Rect {
///     fn area(&self) -> f64 {
///         self.0 * self.1
///     }
/// }
///
/// upcast!(Circle, Rect => dyn Shape);
///
/// let shape: ValueCell<dyn Shape> = ValueCell::new(Rect(2.0, 3.0));
/// assert_eq!(shape.area(), 6.0);
/// ```
///
/// Auto-trait bounds are part of the declared type:
///
/// ```
/// use value_cell::{ValueCell, upcast};
///
/// trait Job {
///     fn run(&self) -> u32;
/// }
///
/// #[derive(Clone)]
/// struct Noop;
///
/// impl Job for Noop {
///     fn run(&self) -> u32 {
///         0
///     }
/// }
///
/// upcast!(Noop => dyn Job + Send + Sync);
///
/// let job: ValueCell<dyn Job + Send + Sync> = ValueCell::new(Noop);
/// std::thread::spawn(move || job.run()).join().unwrap();
/// ```
#[macro_export]
macro_rules! upcast {
    ($($concrete:ty),+ $(,)? => $declared:ty) => {
        $(
            const _: () = {
                // Inside a type alias the trait object lifetime defaults to
                // `'static`, matching what a `ValueCell` stores.
                type Declared = $declared;

                // SAFETY: Every method returns `self`, coerced to the declared
                // type, so the address and the auto traits carry over.
                unsafe impl $crate::Upcast<Declared> for $concrete {
                    #[inline]
                    fn upcast_ref(&self) -> &Declared {
                        self
                    }

                    #[inline]
                    fn upcast_mut(&mut self) -> &mut Declared {
                        self
                    }

                    #[inline]
                    fn upcast_box(
                        self: $crate::__private::Box<Self>,
                    ) -> $crate::__private::Box<Declared> {
                        self
                    }
                }
            };
        )+
    };
}

/// Emits a `trace`-level event when the `tracing` feature is enabled.
#[cfg(feature = "tracing")]
macro_rules! trace_event {
    ($($arg:tt)*) => {
        ::tracing::trace!($($arg)*)
    };
}

/// Emits a `trace`-level event when the `tracing` feature is enabled.
#[cfg(not(feature = "tracing"))]
macro_rules! trace_event {
    ($($arg:tt)*) => {};
}

pub(crate) use trace_event;
