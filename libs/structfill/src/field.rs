use std::any::TypeId;
use std::fmt;

use crate::error::ConvertError;
use crate::fill::{Fill, Kind};

/// One step from a structure root down to a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Field(&'static str),
    Index(usize),
    /// A keyed-container value. Keys are never inspected.
    Entry,
}

/// Location of a field inside the value passed to `apply`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath(Vec<Segment>);

impl FieldPath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    pub(crate) fn push(&mut self, segment: Segment) {
        self.0.push(segment);
    }

    pub(crate) fn pop(&mut self) {
        self.0.pop();
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<root>");
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                Segment::Field(name) if i == 0 => f.write_str(name)?,
                Segment::Field(name) => write!(f, ".{name}")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
                Segment::Entry => f.write_str("[..]")?,
            }
        }
        Ok(())
    }
}

/// A candidate location to fill: the field storage plus its annotation text.
///
/// Created by the walker, consumed by the registry's fill step.
pub struct FieldData<'a> {
    value: &'a mut dyn Fill,
    tag: &'a str,
    type_id: TypeId,
    type_name: &'static str,
    path: FieldPath,
}

impl<'a> FieldData<'a> {
    pub fn new<T: Fill>(value: &'a mut T, tag: &'a str, path: FieldPath) -> Self {
        Self {
            value,
            tag,
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            path,
        }
    }

    /// The raw default text. Empty when the field carries no annotation.
    pub fn tag(&self) -> &str {
        self.tag
    }

    pub fn kind(&self) -> Kind {
        self.value.kind()
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    pub fn value_mut(&mut self) -> &mut dyn Fill {
        &mut *self.value
    }

    pub fn downcast_mut<T: Fill>(&mut self) -> Option<&mut T> {
        (*self.value).as_any_mut().downcast_mut::<T>()
    }

    /// Replace the whole field value.
    pub fn set<T: Fill>(&mut self, value: T) -> Result<(), ConvertError> {
        let actual = self.type_name;
        let slot = self.downcast_mut::<T>().ok_or(ConvertError::TypeMismatch {
            expected: std::any::type_name::<T>(),
            actual,
        })?;
        *slot = value;
        Ok(())
    }
}

impl fmt::Debug for FieldData<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldData")
            .field("path", &self.path.to_string())
            .field("type", &self.type_name)
            .field("tag", &self.tag)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_renders_fields_indices_and_entries() {
        let mut path = FieldPath::root();
        assert_eq!(path.to_string(), "<root>");

        path.push(Segment::Field("children"));
        path.push(Segment::Index(1));
        path.push(Segment::Field("age"));
        assert_eq!(path.to_string(), "children[1].age");

        path.pop();
        path.pop();
        path.push(Segment::Entry);
        path.push(Segment::Field("limit"));
        assert_eq!(path.to_string(), "children[..].limit");
    }

    #[test]
    fn set_checks_exact_type() {
        let mut count = 0u32;
        let mut field = FieldData::new(&mut count, "7", FieldPath::root());
        assert_eq!(field.type_name(), "u32");
        assert_eq!(field.kind(), Kind::Uint);

        let err = field.set(7i64).unwrap_err();
        assert_eq!(
            err,
            ConvertError::TypeMismatch {
                expected: "i64",
                actual: "u32",
            }
        );

        field.set(7u32).unwrap();
        assert!(!field.is_zero());
        assert_eq!(count, 7);
    }
}
