//! merge repeated blocks in a generic tree
//!
//! The generic tree stores every block as its own singleton map inside the list of its
//! identifier. Two `resource "aws_instance"` blocks end up as two slots that both hold an
//! `aws_instance` field:
//!
//! ```json
//! { "resource": [
//!     { "aws_instance": [ { "web": [ ... ] } ] },
//!     { "aws_instance": [ { "db":  [ ... ] } ] }
//! ] }
//! ```
//!
//! [Normalizer] folds those fields together. The field of the first slot receives the list of all
//! collected values (in encounter order) and every later slot is removed:
//!
//! ```json
//! { "resource": [
//!     { "aws_instance": [ [ { "web": [ ... ] } ], [ { "db": [ ... ] } ] ] }
//! ] }
//! ```
//!
//! Only `group -> slot -> field` is inspected, deeper nesting is left alone.
use crate::value::{Map, Value};

/// Where a field with a given name is considered "the same" field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MergeScope {
    /// Fields merge by name across all groups of a document
    ///
    /// A `variable "aws_instance"` block merges into `resource "aws_instance"` blocks.
    #[default]
    Global,
    /// Fields merge by name within their top-level group only
    PerGroup,
}

/// Location of a candidate field: `tree[group_key][slot_index][element_key]`
#[derive(derive_new::new, Debug, Clone, PartialEq, Eq)]
pub struct Keys {
    pub group_key: String,
    pub slot_index: usize,
    pub element_key: String,
}

/// First occurrence of a field and all values collected for it
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub keys: Keys,
    pub values: Vec<Value>,
}

impl Element {
    fn new(keys: Keys, first: Value) -> Self {
        Self {
            keys,
            values: vec![first],
        }
    }
}

/// State of one normalization pass
///
/// A [Normalizer] is consumed by [Normalizer::normalize], so the collected elements can never
/// leak into the next document.
#[derive(derive_new::new, Debug, Default)]
pub struct Normalizer {
    scope: MergeScope,
    #[new(default)]
    elements: Vec<Element>,
}

impl Normalizer {
    /// Merge repeated fields of `tree` in place
    pub fn normalize(mut self, tree: &mut Map) {
        self.collect(tree);

        for element in self.elements {
            let Keys {
                group_key,
                slot_index,
                element_key,
            } = element.keys;

            let Some(Value::Array(slots)) = tree.get_mut(&group_key) else {
                continue;
            };

            // an absorbed slot is null and drops its elements with it
            if let Some(Value::Object(fields)) = slots.get_mut(slot_index) {
                fields.insert(element_key, Value::Array(element.values));
            }
        }

        for group in tree.values_mut() {
            if let Value::Array(slots) = group {
                slots.retain(|slot| !slot.is_null());
            }
        }
    }

    fn collect(&mut self, tree: &mut Map) {
        for (group_key, group) in tree.iter_mut() {
            let Value::Array(slots) = group else {
                continue;
            };

            for (slot_index, slot) in slots.iter_mut().enumerate() {
                let Value::Object(fields) = slot else {
                    continue;
                };

                let mut absorbed = false;
                for (element_key, field) in fields.iter() {
                    if !matches!(field, Value::Array(_)) {
                        continue;
                    }

                    match self.position(group_key, element_key) {
                        Some(index) => {
                            tracing::trace!(%group_key, slot_index, %element_key, "merge repeated field");
                            self.elements[index].values.push(field.clone());
                            absorbed = true;
                        }
                        None => {
                            let keys = Keys::new(group_key.clone(), slot_index, element_key.clone());
                            self.elements.push(Element::new(keys, field.clone()));
                        }
                    }
                }

                if absorbed {
                    *slot = Value::Null;
                }
            }
        }

        tracing::debug!(elements = self.elements.len(), "collected repeated fields");
    }

    fn position(&self, group_key: &str, element_key: &str) -> Option<usize> {
        self.elements.iter().position(|element| {
            element.keys.element_key == element_key
                && (self.scope == MergeScope::Global || element.keys.group_key == group_key)
        })
    }
}

/// Normalize `tree` with a fresh [Normalizer]
pub fn normalize(tree: &mut Map, scope: MergeScope) {
    Normalizer::new(scope).normalize(tree)
}
