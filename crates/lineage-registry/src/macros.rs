/// Implement [`Composable`](crate::Composable) for a struct.
///
/// The common form names the first field and the parent type it embeds,
/// optionally followed by a closure-like block filling the type's method
/// table:
///
/// ```
/// use lineage_registry::{composable, Behavior, Root};
///
/// const AREA: Behavior<(), (f64,)> = Behavior::new("Shape::area");
///
/// #[derive(Default)]
/// struct Shape {
///     root: Root,
/// }
///
/// struct Square {
///     shape: Shape,
///     side: f64,
/// }
///
/// composable!(Shape: root => Root);
/// composable!(Square: shape => Shape, |methods| {
///     methods.define(&AREA, |square: &Square, ()| (square.side * square.side,));
/// });
/// ```
///
/// Leaf records whose first field is not composable use
/// `composable!(T: plain FirstFieldType)`, and field-less records use
/// `composable!(T: empty)`. Neither carries a root marker, so neither can be
/// registered; they exist to be walked.
#[macro_export]
macro_rules! composable {
    (@leaf $ty:ty, $first:expr) => {
        impl $crate::Composable for $ty {
            fn shape() -> $crate::TypeShape {
                $crate::TypeShape::new::<$ty>($first)
            }

            fn embedded(&self) -> ::std::option::Option<&dyn $crate::Composable> {
                ::std::option::Option::None
            }

            fn embedded_mut(&mut self) -> ::std::option::Option<&mut dyn $crate::Composable> {
                ::std::option::Option::None
            }

            fn type_key(&self) -> $crate::TypeKey {
                $crate::TypeKey::of::<$ty>()
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }
        }
    };
    ($ty:ty : $field:ident => $parent:ty) => {
        $crate::composable!($ty : $field => $parent, |_methods| {});
    };
    ($ty:ty : $field:ident => $parent:ty, |$methods:ident| $body:block) => {
        impl $crate::Composable for $ty {
            fn shape() -> $crate::TypeShape {
                $crate::TypeShape::embedding::<$ty, $parent>()
            }

            fn define_methods($methods: &mut $crate::Methods<Self>) $body

            fn embedded(&self) -> ::std::option::Option<&dyn $crate::Composable> {
                ::std::option::Option::Some(&self.$field)
            }

            fn embedded_mut(&mut self) -> ::std::option::Option<&mut dyn $crate::Composable> {
                ::std::option::Option::Some(&mut self.$field)
            }

            fn type_key(&self) -> $crate::TypeKey {
                $crate::TypeKey::of::<$ty>()
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }
        }
    };
    ($ty:ty : plain $first:ty) => {
        $crate::composable!(@leaf $ty, $crate::FirstMember::Plain($crate::TypeKey::of::<$first>()));
    };
    ($ty:ty : empty) => {
        $crate::composable!(@leaf $ty, $crate::FirstMember::Empty);
    };
}
