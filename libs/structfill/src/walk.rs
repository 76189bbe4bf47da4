use crate::field::{FieldData, FieldPath, Segment};
use crate::fill::{Fill, Kind};
use crate::registry::Registry;

/// Result of one traversal: the eligible fields in discovery order, plus the
/// paths of branches cut off by the depth bound.
pub struct Collected<'a> {
    pub fields: Vec<FieldData<'a>>,
    pub truncated: Vec<FieldPath>,
}

/// Collects eligible fields while structures describe themselves.
///
/// Derived and built-in `Fill::walk` impls call back into this:
/// structures report fields, sequences report elements, keyed containers
/// report entries, pointers report their referent.
pub struct Walker<'a, 'r> {
    registry: &'r Registry,
    fields: Vec<FieldData<'a>>,
    truncated: Vec<FieldPath>,
    path: FieldPath,
    depth: usize,
    max_depth: usize,
}

impl<'a, 'r> Walker<'a, 'r> {
    pub(crate) fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            fields: Vec::new(),
            truncated: Vec::new(),
            path: FieldPath::root(),
            depth: 0,
            max_depth: registry.options().max_depth,
        }
    }

    /// Walk `root` and return everything eligible for defaulting.
    pub(crate) fn collect<T: Fill>(registry: &'r Registry, root: &'a mut T) -> Collected<'a> {
        let mut walker = Self::new(registry);
        walker.descend(root);
        Collected {
            fields: walker.fields,
            truncated: walker.truncated,
        }
    }

    /// A declared structure field carrying annotation text `tag`
    /// (empty when unannotated).
    ///
    /// Structural values are recursed into, unless a type converter is
    /// registered for their exact type: then the whole value is one
    /// eligible field. Scalars are eligible only when annotated.
    pub fn field<T: Fill>(&mut self, name: &'static str, value: &'a mut T, tag: &'static str) {
        self.path.push(Segment::Field(name));
        if value.kind().is_structural() {
            if self.registry.contains::<T>() {
                self.push(value, tag);
            } else {
                self.descend(value);
            }
        } else if !tag.is_empty() {
            self.push(value, tag);
        }
        self.path.pop();
    }

    /// Element `index` of a sequence.
    pub fn element<T: Fill>(&mut self, index: usize, value: &'a mut T) {
        self.path.push(Segment::Index(index));
        self.descend(value);
        self.path.pop();
    }

    /// A value stored in a keyed container.
    pub fn entry<T: Fill>(&mut self, value: &'a mut T) {
        self.path.push(Segment::Entry);
        self.descend(value);
        self.path.pop();
    }

    /// The referent of a present indirection.
    pub fn deref<T: Fill>(&mut self, value: &'a mut T) {
        self.descend(value);
    }

    /// Only struct levels count towards `max_depth`. Pointers, sequences and
    /// maps between them are free.
    fn descend<T: Fill>(&mut self, value: &'a mut T) {
        if value.kind() != Kind::Struct {
            value.walk(self);
            return;
        }
        if self.depth >= self.max_depth {
            tracing::warn!(
                path = %self.path,
                max_depth = self.max_depth,
                "structure nested too deeply, not descending"
            );
            self.truncated.push(self.path.clone());
            return;
        }
        self.depth += 1;
        value.walk(self);
        self.depth -= 1;
    }

    fn push<T: Fill>(&mut self, value: &'a mut T, tag: &'static str) {
        self.fields.push(FieldData::new(value, tag, self.path.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::FillOptions;

    #[derive(Default)]
    struct Leaf {
        size: u32,
        label: String,
    }

    impl Fill for Leaf {
        fn kind(&self) -> Kind {
            Kind::Struct
        }

        fn is_zero(&self) -> bool {
            self.size.is_zero() && self.label.is_zero()
        }

        fn walk<'a>(&'a mut self, walker: &mut Walker<'a, '_>) {
            walker.field("size", &mut self.size, "4");
            walker.field("label", &mut self.label, "");
        }
    }

    #[derive(Default)]
    struct Tree {
        name: String,
        leaves: Vec<Leaf>,
        first: Option<Box<Leaf>>,
        children: Vec<Tree>,
    }

    impl Fill for Tree {
        fn kind(&self) -> Kind {
            Kind::Struct
        }

        fn is_zero(&self) -> bool {
            self.name.is_zero() && self.leaves.is_zero() && self.first.is_zero()
        }

        fn walk<'a>(&'a mut self, walker: &mut Walker<'a, '_>) {
            walker.field("name", &mut self.name, "root");
            walker.field("leaves", &mut self.leaves, "");
            walker.field("first", &mut self.first, "");
            walker.field("children", &mut self.children, "");
        }
    }

    fn paths(collected: &Collected<'_>) -> Vec<String> {
        collected
            .fields
            .iter()
            .map(|field| field.path().to_string())
            .collect()
    }

    #[test]
    fn collects_in_declaration_order() {
        let registry = Registry::empty();
        let mut tree = Tree {
            leaves: vec![Leaf::default(), Leaf::default()],
            first: Some(Box::default()),
            ..Tree::default()
        };

        let collected = Walker::collect(&registry, &mut tree);
        assert_eq!(
            paths(&collected),
            ["name", "leaves[0].size", "leaves[1].size", "first.size"]
        );
        assert!(collected.truncated.is_empty());
        assert_eq!(collected.fields[1].tag(), "4");
    }

    #[test]
    fn absent_and_empty_branches_produce_nothing() {
        let registry = Registry::empty();
        let mut tree = Tree::default();

        let collected = Walker::collect(&registry, &mut tree);
        assert_eq!(paths(&collected), ["name"]);
    }

    #[test]
    fn registered_structural_type_is_a_single_field() {
        let mut registry = Registry::empty();
        registry.register::<Vec<Leaf>, _>(|_: &mut FieldData<'_>| Ok(()));
        let mut tree = Tree {
            leaves: vec![Leaf::default()],
            ..Tree::default()
        };

        let collected = Walker::collect(&registry, &mut tree);
        assert_eq!(paths(&collected), ["name", "leaves"]);
        assert_eq!(collected.fields[1].tag(), "");
    }

    #[test]
    fn depth_bound_truncates_deep_branches() {
        let registry = Registry::empty().with_options(FillOptions { max_depth: 2 });
        let mut tree = Tree {
            children: vec![Tree {
                children: vec![Tree::default()],
                ..Tree::default()
            }],
            ..Tree::default()
        };

        // root (1) -> children[0] (2) -> children[0].children[0] is cut off.
        let collected = Walker::collect(&registry, &mut tree);
        assert_eq!(paths(&collected), ["name", "children[0].name"]);
        assert_eq!(collected.truncated.len(), 1);
        assert_eq!(collected.truncated[0].to_string(), "children[0].children[0]");
    }
}
