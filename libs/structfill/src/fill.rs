use std::any::Any;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::time::Duration;

use crate::error::ConvertError;
use crate::walk::Walker;

/// Coarse representation category of a value.
///
/// Scalar kinds (`Bool` .. `Str`) have built-in kind converters.
/// Structural kinds are recursed into unless a type converter claims them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Kind {
    Bool,
    Int,
    Uint,
    Float,
    Str,
    /// `Option<T>`, `Box<T>`.
    Pointer,
    /// `Vec<T>`, `VecDeque<T>`, `[T; N]`.
    Sequence,
    /// `HashMap<K, V>`, `BTreeMap<K, V>`.
    Map,
    /// Types with `#[derive(Fill)]`.
    Struct,
    /// Anything else. Never recursed, never converted by kind.
    Opaque,
}

impl Kind {
    pub fn is_structural(self) -> bool {
        matches!(self, Kind::Pointer | Kind::Sequence | Kind::Map | Kind::Struct)
    }
}

#[doc(hidden)]
pub trait AsAny: Any {
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A value the default engine can inspect and write.
///
/// Usually derived with `#[derive(Fill)]`. Hand-written impls for custom
/// scalars only need `kind` and `is_zero`, plus whichever `set_*` hook
/// matches their kind.
pub trait Fill: AsAny {
    fn kind(&self) -> Kind;

    /// Whether the value counts as "not provided".
    fn is_zero(&self) -> bool;

    /// Report nested eligible fields to `walker`. Scalars have none.
    fn walk<'a>(&'a mut self, walker: &mut Walker<'a, '_>) {
        let _ = walker;
    }

    fn set_bool(&mut self, value: bool) -> Result<(), ConvertError> {
        let _ = value;
        Err(ConvertError::unsupported::<Self>(Kind::Bool))
    }

    fn set_int(&mut self, value: i128) -> Result<(), ConvertError> {
        let _ = value;
        Err(ConvertError::unsupported::<Self>(Kind::Int))
    }

    fn set_uint(&mut self, value: u128) -> Result<(), ConvertError> {
        let _ = value;
        Err(ConvertError::unsupported::<Self>(Kind::Uint))
    }

    fn set_float(&mut self, value: f64) -> Result<(), ConvertError> {
        let _ = value;
        Err(ConvertError::unsupported::<Self>(Kind::Float))
    }

    fn set_str(&mut self, value: &str) -> Result<(), ConvertError> {
        let _ = value;
        Err(ConvertError::unsupported::<Self>(Kind::Str))
    }
}

// ---------------------------------------------------------------------------
// Scalars
// ---------------------------------------------------------------------------

impl Fill for bool {
    fn kind(&self) -> Kind {
        Kind::Bool
    }

    fn is_zero(&self) -> bool {
        !*self
    }

    fn set_bool(&mut self, value: bool) -> Result<(), ConvertError> {
        *self = value;
        Ok(())
    }
}

macro_rules! impl_fill_int {
    ($kind:ident, $setter:ident, $src:ty => $($ty:ty),+) => {
        $(
            impl Fill for $ty {
                fn kind(&self) -> Kind {
                    Kind::$kind
                }

                fn is_zero(&self) -> bool {
                    *self == 0
                }

                fn $setter(&mut self, value: $src) -> Result<(), ConvertError> {
                    *self = <$ty>::try_from(value)
                        .map_err(|_| ConvertError::out_of_range(value, stringify!($ty)))?;
                    Ok(())
                }
            }
        )+
    };
}

impl_fill_int!(Int, set_int, i128 => i8, i16, i32, i64, i128, isize);
impl_fill_int!(Uint, set_uint, u128 => u8, u16, u32, u64, u128, usize);

impl Fill for f32 {
    fn kind(&self) -> Kind {
        Kind::Float
    }

    fn is_zero(&self) -> bool {
        *self == 0.0
    }

    fn set_float(&mut self, value: f64) -> Result<(), ConvertError> {
        if value.is_finite() && value.abs() > f32::MAX as f64 {
            return Err(ConvertError::out_of_range(value, "f32"));
        }
        *self = value as f32;
        Ok(())
    }
}

impl Fill for f64 {
    fn kind(&self) -> Kind {
        Kind::Float
    }

    fn is_zero(&self) -> bool {
        *self == 0.0
    }

    fn set_float(&mut self, value: f64) -> Result<(), ConvertError> {
        *self = value;
        Ok(())
    }
}

impl Fill for String {
    fn kind(&self) -> Kind {
        Kind::Str
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn set_str(&mut self, value: &str) -> Result<(), ConvertError> {
        value.clone_into(self);
        Ok(())
    }
}

/// Counted in nanoseconds: an integer kind whose text form is a duration
/// literal, handled by the built-in `Duration` type converter.
impl Fill for Duration {
    fn kind(&self) -> Kind {
        Kind::Int
    }

    fn is_zero(&self) -> bool {
        Duration::is_zero(self)
    }

    fn set_int(&mut self, value: i128) -> Result<(), ConvertError> {
        let nanos =
            u64::try_from(value).map_err(|_| ConvertError::out_of_range(value, "Duration"))?;
        *self = Duration::from_nanos(nanos);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Indirections
// ---------------------------------------------------------------------------

impl<T: Fill> Fill for Option<T> {
    fn kind(&self) -> Kind {
        Kind::Pointer
    }

    fn is_zero(&self) -> bool {
        self.is_none()
    }

    fn walk<'a>(&'a mut self, walker: &mut Walker<'a, '_>) {
        if let Some(inner) = self {
            walker.deref(inner);
        }
    }
}

impl<T: Fill> Fill for Box<T> {
    fn kind(&self) -> Kind {
        Kind::Pointer
    }

    fn is_zero(&self) -> bool {
        false
    }

    fn walk<'a>(&'a mut self, walker: &mut Walker<'a, '_>) {
        walker.deref(&mut **self);
    }
}

// ---------------------------------------------------------------------------
// Sequences
// ---------------------------------------------------------------------------

impl<T: Fill> Fill for Vec<T> {
    fn kind(&self) -> Kind {
        Kind::Sequence
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn walk<'a>(&'a mut self, walker: &mut Walker<'a, '_>) {
        for (index, item) in self.iter_mut().enumerate() {
            walker.element(index, item);
        }
    }
}

impl<T: Fill> Fill for VecDeque<T> {
    fn kind(&self) -> Kind {
        Kind::Sequence
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn walk<'a>(&'a mut self, walker: &mut Walker<'a, '_>) {
        for (index, item) in self.iter_mut().enumerate() {
            walker.element(index, item);
        }
    }
}

impl<T: Fill, const N: usize> Fill for [T; N] {
    fn kind(&self) -> Kind {
        Kind::Sequence
    }

    fn is_zero(&self) -> bool {
        N == 0
    }

    fn walk<'a>(&'a mut self, walker: &mut Walker<'a, '_>) {
        for (index, item) in self.iter_mut().enumerate() {
            walker.element(index, item);
        }
    }
}

// ---------------------------------------------------------------------------
// Keyed containers
// ---------------------------------------------------------------------------

impl<K: 'static, V: Fill, S: 'static> Fill for HashMap<K, V, S> {
    fn kind(&self) -> Kind {
        Kind::Map
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn walk<'a>(&'a mut self, walker: &mut Walker<'a, '_>) {
        for value in self.values_mut() {
            walker.entry(value);
        }
    }
}

impl<K: 'static, V: Fill> Fill for BTreeMap<K, V> {
    fn kind(&self) -> Kind {
        Kind::Map
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn walk<'a>(&'a mut self, walker: &mut Walker<'a, '_>) {
        for value in self.values_mut() {
            walker.entry(value);
        }
    }
}
