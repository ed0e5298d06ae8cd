//! Type-erased values and the argument/result lists that carry them.
//!
//! Dynamic dispatch crosses a type-erased boundary: the caller knows the
//! signature statically, the resolved implementation is stored erased. Both
//! sides agree on a tuple type implementing [`ValueList`], pack it into a
//! `Vec<Value>`, and unpack it with a per-slot type check.

use std::any::{type_name, Any};
use std::fmt;
use std::vec::IntoIter;

use crate::error::{LineageError, LineageResult, SlotKind};

/// A single marshalled argument or result.
pub struct Value {
    type_name: &'static str,
    inner: Box<dyn Any>,
}

impl Value {
    /// Erase `value`, remembering its type name for diagnostics.
    pub fn new<T: Any>(value: T) -> Self {
        Self {
            type_name: type_name::<T>(),
            inner: Box::new(value),
        }
    }

    /// Name of the type this value was created from.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns `true` if the value holds a `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }

    /// Borrow the value as `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Take the value out as `T`, or give it back unchanged.
    pub fn downcast<T: Any>(self) -> Result<T, Self> {
        let Self { type_name, inner } = self;
        match inner.downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(inner) => Err(Self { type_name, inner }),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Value")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// A fixed-arity, statically typed list of values (a tuple).
pub trait ValueList: Sized + 'static {
    /// Number of slots.
    const ARITY: usize;

    /// Type name of every slot, in order.
    fn type_names() -> Vec<&'static str>;

    /// Erase each slot.
    fn into_values(self) -> Vec<Value>;

    /// Rebuild the tuple, checking the count and every slot's type.
    fn from_values(behavior: &'static str, kind: SlotKind, values: Vec<Value>)
        -> LineageResult<Self>;
}

/// Argument lists accepted by dispatch: tuples of 0 to 7 elements.
pub trait ArgList: ValueList {}

/// Result lists returned by dispatch: tuples of 0 to 4 elements.
pub trait ResultList: ValueList {}

fn check_arity(
    behavior: &'static str,
    kind: SlotKind,
    expected: usize,
    found: usize,
) -> LineageResult<()> {
    if expected == found {
        Ok(())
    } else {
        Err(LineageError::ArityMismatch {
            behavior,
            kind,
            expected,
            found,
        })
    }
}

fn take<T: Any>(
    values: &mut IntoIter<Value>,
    behavior: &'static str,
    kind: SlotKind,
    slot: usize,
) -> LineageResult<T> {
    let value = values.next().ok_or(LineageError::ArityMismatch {
        behavior,
        kind,
        expected: slot + 1,
        found: slot,
    })?;
    value.downcast::<T>().map_err(|found| {
        LineageError::type_mismatch(kind, behavior, slot, type_name::<T>(), found.type_name())
    })
}

macro_rules! value_list {
    ($len:expr; $($name:ident . $idx:tt),*) => {
        impl<$($name: Any),*> ValueList for ($($name,)*) {
            const ARITY: usize = $len;

            fn type_names() -> Vec<&'static str> {
                vec![$(type_name::<$name>()),*]
            }

            #[allow(unused_variables)]
            fn into_values(self) -> Vec<Value> {
                vec![$(Value::new(self.$idx)),*]
            }

            #[allow(unused_variables, unused_mut)]
            fn from_values(
                behavior: &'static str,
                kind: SlotKind,
                values: Vec<Value>,
            ) -> LineageResult<Self> {
                check_arity(behavior, kind, $len, values.len())?;
                let mut values = values.into_iter();
                Ok(($(take::<$name>(&mut values, behavior, kind, $idx)?,)*))
            }
        }
    };
}

value_list!(0;);
value_list!(1; A0.0);
value_list!(2; A0.0, A1.1);
value_list!(3; A0.0, A1.1, A2.2);
value_list!(4; A0.0, A1.1, A2.2, A3.3);
value_list!(5; A0.0, A1.1, A2.2, A3.3, A4.4);
value_list!(6; A0.0, A1.1, A2.2, A3.3, A4.4, A5.5);
value_list!(7; A0.0, A1.1, A2.2, A3.3, A4.4, A5.5, A6.6);

macro_rules! mark_lists {
    ($marker:ident: $(($($name:ident),*)),*) => {
        $(impl<$($name: Any),*> $marker for ($($name,)*) {})*
    };
}

mark_lists!(ArgList:
    (),
    (A0),
    (A0, A1),
    (A0, A1, A2),
    (A0, A1, A2, A3),
    (A0, A1, A2, A3, A4),
    (A0, A1, A2, A3, A4, A5),
    (A0, A1, A2, A3, A4, A5, A6)
);

mark_lists!(ResultList:
    (),
    (R0),
    (R0, R1),
    (R0, R1, R2),
    (R0, R1, R2, R3)
);
