use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::convert;
use crate::error::ConvertError;
use crate::field::FieldData;
use crate::fill::{Fill, Kind};
use crate::options::FillOptions;

/// Parses a field's default text and writes the result into the field.
///
/// The returned error is advisory: `Registry::apply` drops it and leaves the
/// field at its zero value.
pub type Converter = Arc<dyn Fn(&mut FieldData<'_>) -> Result<(), ConvertError> + Send + Sync>;

#[derive(Clone)]
struct TypeEntry {
    type_name: &'static str,
    converter: Converter,
}

/// Lookup from type identity, then kind, to a converter.
///
/// Type-keyed entries always win over kind-keyed ones. `Registry::new()`
/// comes with converters for every scalar kind, `Duration` and `Vec<u8>`;
/// `Registry::empty()` has none.
#[derive(Clone)]
pub struct Registry {
    by_type: HashMap<TypeId, TypeEntry>,
    by_kind: HashMap<Kind, Converter>,
    options: FillOptions,
}

impl Registry {
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.install_builtins();
        registry
    }

    pub fn empty() -> Self {
        Self {
            by_type: HashMap::new(),
            by_kind: HashMap::new(),
            options: FillOptions::default(),
        }
    }

    pub fn with_options(mut self, options: FillOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &FillOptions {
        &self.options
    }

    fn install_builtins(&mut self) {
        self.register_kind(Kind::Bool, convert::bool_converter);
        self.register_kind(Kind::Int, convert::int_converter);
        self.register_kind(Kind::Uint, convert::uint_converter);
        self.register_kind(Kind::Float, convert::float_converter);
        self.register_kind(Kind::Str, convert::string_converter);

        self.register::<Duration, _>(convert::duration_converter);
        self.register::<Vec<u8>, _>(convert::bytes_converter);
    }

    /// Bind `converter` to the exact type `T`. Replaces any previous binding.
    ///
    /// Registering a structural type (`Vec<Child>`, a derived struct, ...)
    /// also stops the walker from recursing into fields of that type: the
    /// whole value is handed to `converter` instead.
    pub fn register<T, F>(&mut self, converter: F)
    where
        T: Fill,
        F: Fn(&mut FieldData<'_>) -> Result<(), ConvertError> + Send + Sync + 'static,
    {
        let type_name = std::any::type_name::<T>();
        tracing::trace!(type_name, "registered type converter");
        self.by_type.insert(
            TypeId::of::<T>(),
            TypeEntry {
                type_name,
                converter: Arc::new(converter),
            },
        );
    }

    /// Bind a whole-value parser to `T`: the annotation text goes in, the
    /// new field value comes out.
    pub fn register_parser<T, F>(&mut self, parse: F)
    where
        T: Fill,
        F: Fn(&str) -> Result<T, ConvertError> + Send + Sync + 'static,
    {
        self.register::<T, _>(move |field: &mut FieldData<'_>| {
            let value = parse(field.tag())?;
            field.set(value)
        });
    }

    /// Bind `converter` to every field of `kind` without a type converter.
    pub fn register_kind<F>(&mut self, kind: Kind, converter: F)
    where
        F: Fn(&mut FieldData<'_>) -> Result<(), ConvertError> + Send + Sync + 'static,
    {
        tracing::trace!(?kind, "registered kind converter");
        self.by_kind.insert(kind, Arc::new(converter));
    }

    pub fn contains<T: Fill>(&self) -> bool {
        self.contains_type(TypeId::of::<T>())
    }

    pub fn contains_type(&self, type_id: TypeId) -> bool {
        self.by_type.contains_key(&type_id)
    }

    /// Type converter for `type_id` if any, else the kind converter for `kind`.
    pub fn resolve(&self, type_id: TypeId, kind: Kind) -> Option<&Converter> {
        self.by_type
            .get(&type_id)
            .map(|entry| &entry.converter)
            .or_else(|| self.by_kind.get(&kind))
    }

    /// Names of every type with a type converter, sorted.
    pub fn registered_types(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.by_type.values().map(|entry| entry.type_name).collect();
        names.sort_unstable();
        names
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self.by_kind.keys().collect();
        kinds.sort();
        f.debug_struct("Registry")
            .field("types", &self.registered_types())
            .field("kinds", &kinds)
            .field("options", &self.options)
            .finish()
    }
}
