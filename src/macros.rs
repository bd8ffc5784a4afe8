//! Accessor generation macros
//!
//! Eliminates the repetitive `is_xxx` / `as_xxx` / `as_xxx_mut` match code on
//! sum types. Uses `paste` for identifier concatenation.

/// Generate is_xxx, as_xxx, as_xxx_mut methods for enum variants
///
/// Each variant `foo` must wrap a type named `Foo` (directly or boxed).
///
/// # Example
/// ```ignore
/// impl Node {
///     impl_enum_accessors!(element, fragment, text);
/// }
/// ```
macro_rules! impl_enum_accessors {
    ($($variant:ident),* $(,)?) => {
        ::paste::paste! {
            $(
                #[doc = "Check if this is a " $variant " node"]
                #[inline]
                pub fn [<is_ $variant>](&self) -> bool {
                    matches!(self, Self::[<$variant:camel>](_))
                }

                #[doc = "Try to get as " $variant " reference"]
                #[inline]
                pub fn [<as_ $variant>](&self) -> Option<&[<$variant:camel>]> {
                    match self { Self::[<$variant:camel>](v) => Some(v), _ => None }
                }

                #[doc = "Try to get as mutable " $variant " reference"]
                #[inline]
                pub fn [<as_ $variant _mut>](&mut self) -> Option<&mut [<$variant:camel>]> {
                    match self { Self::[<$variant:camel>](v) => Some(v), _ => None }
                }
            )*
        }
    };
}
