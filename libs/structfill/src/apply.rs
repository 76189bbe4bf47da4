use crate::error::{ConvertError, FillError};
use crate::field::{FieldData, FieldPath};
use crate::fill::Fill;
use crate::registry::Registry;
use crate::walk::Walker;

/// What happened to one eligible field.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The field was empty and now holds its default.
    Applied,
    /// The field already held a value and was left alone.
    Present,
    /// No type or kind converter matched. The field stays empty.
    Unregistered,
    /// The converter rejected the default text. The field stays empty.
    Failed(ConvertError),
}

#[derive(Debug, Clone)]
pub struct FieldReport {
    pub path: FieldPath,
    pub type_name: &'static str,
    pub outcome: Outcome,
}

/// Per-field account of one `apply_with_report` call.
#[derive(Debug, Clone, Default)]
pub struct Report {
    pub fields: Vec<FieldReport>,
    /// Branches not descended because of `FillOptions::max_depth`.
    pub truncated: Vec<FieldPath>,
}

impl Report {
    pub fn applied(&self) -> usize {
        self.count(|outcome| matches!(outcome, Outcome::Applied))
    }

    pub fn present(&self) -> usize {
        self.count(|outcome| matches!(outcome, Outcome::Present))
    }

    /// No unregistered, malformed or truncated fields.
    pub fn is_clean(&self) -> bool {
        self.first_error().is_none() && self.truncated.is_empty()
    }

    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.fields.iter().filter(|field| pred(&field.outcome)).count()
    }

    fn first_error(&self) -> Option<FillError> {
        self.fields.iter().find_map(|field| match &field.outcome {
            Outcome::Unregistered => Some(FillError::Unregistered {
                path: field.path.to_string(),
                type_name: field.type_name,
            }),
            Outcome::Failed(source) => Some(FillError::Convert {
                path: field.path.to_string(),
                source: source.clone(),
            }),
            Outcome::Applied | Outcome::Present => None,
        })
    }

    /// `Err` with the first unregistered, malformed or truncated field.
    pub(crate) fn into_result(self, max_depth: usize) -> Result<Report, FillError> {
        if let Some(err) = self.first_error() {
            return Err(err);
        }
        if let Some(path) = self.truncated.first() {
            return Err(FillError::DepthExceeded {
                path: path.to_string(),
                max_depth,
            });
        }
        Ok(self)
    }
}

impl Registry {
    /// Every field of `target` a default could be written to, in traversal
    /// order, whether or not it is currently empty.
    pub fn eligible_fields<'a, T: Fill>(&self, target: &'a mut T) -> Vec<FieldData<'a>> {
        Walker::collect(self, target).fields
    }

    /// Write the default into one field if it is empty.
    pub fn fill_field(&self, field: &mut FieldData<'_>) -> Outcome {
        if !field.is_zero() {
            tracing::trace!(path = %field.path(), "value present, keeping it");
            return Outcome::Present;
        }
        let Some(converter) = self.resolve(field.type_id(), field.kind()) else {
            tracing::debug!(
                path = %field.path(),
                type_name = field.type_name(),
                "no converter registered"
            );
            return Outcome::Unregistered;
        };
        match converter(field) {
            Ok(()) => {
                tracing::debug!(path = %field.path(), tag = field.tag(), "default applied");
                Outcome::Applied
            }
            Err(err) => {
                tracing::debug!(
                    path = %field.path(),
                    tag = field.tag(),
                    error = %err,
                    "default not applied"
                );
                Outcome::Failed(err)
            }
        }
    }

    /// Fill every empty annotated field of `target` in place.
    ///
    /// Best effort: fields without a matching converter or with malformed
    /// default text keep their zero value, and nothing is reported.
    pub fn apply<T: Fill>(&self, target: &mut T) {
        let collected = Walker::collect(self, target);
        for mut field in collected.fields {
            let _ = self.fill_field(&mut field);
        }
    }

    /// Like `apply`, returning what happened to each eligible field.
    pub fn apply_with_report<T: Fill>(&self, target: &mut T) -> Report {
        let collected = Walker::collect(self, target);
        let fields = collected
            .fields
            .into_iter()
            .map(|mut field| {
                let outcome = self.fill_field(&mut field);
                FieldReport {
                    path: field.path().clone(),
                    type_name: field.type_name(),
                    outcome,
                }
            })
            .collect();
        Report {
            fields,
            truncated: collected.truncated,
        }
    }

    /// Like `apply`, but unregistered types, malformed default text and
    /// truncated branches are errors.
    ///
    /// Every field that can be filled is filled before the first problem is
    /// returned.
    pub fn apply_strict<T: Fill>(&self, target: &mut T) -> Result<Report, FillError> {
        self.apply_with_report(target).into_result(self.options().max_depth)
    }
}
