//! Validating builder for optimization schemas

use std::collections::HashMap;

use crate::error::{SchemaError, SchemaResult};

use super::directive::{
    Annotation, NestedSelect, OptimizationDirective, PrefetchSpec, PrefetchTarget,
};
use super::OptimizationSchema;

/// Fluent builder for [`OptimizationSchema`].
///
/// Declarations accumulate in call order; [`SchemaBuilder::build`] validates
/// them and rejects empty names, empty directive targets, and duplicate
/// field keys.
#[derive(Debug)]
pub struct SchemaBuilder<Q> {
    entity: String,
    fields: Vec<(String, OptimizationDirective<Q>)>,
}

impl<Q> SchemaBuilder<Q> {
    /// Start a schema for the named entity type
    pub fn new(entity: &str) -> Self {
        Self {
            entity: entity.to_string(),
            fields: Vec::new(),
        }
    }

    /// Declare a field with an explicit directive
    pub fn field(mut self, field: &str, directive: OptimizationDirective<Q>) -> Self {
        self.fields.push((field.to_string(), directive));
        self
    }

    /// Field resolves through an eager-joined to-one relation
    pub fn select(self, field: &str, relation: &str) -> Self {
        self.field(field, OptimizationDirective::Select(relation.to_string()))
    }

    /// Field resolves through a computed column on the base fetch
    pub fn annotate(self, field: &str, annotation: Annotation) -> Self {
        self.field(field, OptimizationDirective::Annotate(annotation))
    }

    /// Field resolves through a batched prefetch of a bare relation
    pub fn prefetch(self, field: &str, relation: &str) -> Self {
        self.field(
            field,
            OptimizationDirective::Prefetch(PrefetchTarget::Relation(relation.to_string())),
        )
    }

    /// Field resolves through a prefetch whose relation has its own schema
    /// and base query
    pub fn prefetch_with(self, field: &str, spec: PrefetchSpec<Q>) -> Self {
        self.field(
            field,
            OptimizationDirective::Prefetch(PrefetchTarget::Spec(spec)),
        )
    }

    /// Field resolves through a to-one join whose child schema hoists
    /// further directives into the current level
    pub fn select_with_children(self, field: &str, nested: NestedSelect<Q>) -> Self {
        self.field(field, OptimizationDirective::SelectWithChildren(nested))
    }

    /// Field resolves through an eager join on the enclosing level's query
    pub fn select_for_parent(self, field: &str, relation: &str) -> Self {
        self.field(
            field,
            OptimizationDirective::SelectForParent(relation.to_string()),
        )
    }

    /// Field resolves through a bare prefetch on the enclosing level's query
    pub fn prefetch_for_parent(self, field: &str, relation: &str) -> Self {
        self.field(
            field,
            OptimizationDirective::PrefetchForParent(PrefetchTarget::Relation(
                relation.to_string(),
            )),
        )
    }

    /// Field resolves through a refined prefetch on the enclosing level's
    /// query
    pub fn prefetch_for_parent_with(self, field: &str, spec: PrefetchSpec<Q>) -> Self {
        self.field(
            field,
            OptimizationDirective::PrefetchForParent(PrefetchTarget::Spec(spec)),
        )
    }

    /// Validate the declarations and build the schema
    pub fn build(self) -> SchemaResult<OptimizationSchema<Q>> {
        if self.entity.is_empty() {
            return Err(SchemaError::EmptyEntityName);
        }

        let mut fields = HashMap::with_capacity(self.fields.len());
        for (field, directive) in self.fields {
            if field.is_empty() {
                return Err(SchemaError::EmptyFieldName {
                    entity: self.entity,
                });
            }
            validate_directive(&self.entity, &field, &directive)?;
            if fields.insert(field.clone(), directive).is_some() {
                return Err(SchemaError::DuplicateField {
                    entity: self.entity,
                    field,
                });
            }
        }

        Ok(OptimizationSchema {
            entity: self.entity,
            fields,
        })
    }
}

fn validate_directive<Q>(
    entity: &str,
    field: &str,
    directive: &OptimizationDirective<Q>,
) -> SchemaResult<()> {
    let empty_target = |target: &str| SchemaError::EmptyTarget {
        entity: entity.to_string(),
        field: field.to_string(),
        target: target.to_string(),
    };

    match directive {
        OptimizationDirective::Select(relation)
        | OptimizationDirective::SelectForParent(relation) => {
            if relation.is_empty() {
                return Err(empty_target("relation"));
            }
        }
        OptimizationDirective::Annotate(annotation) => {
            if annotation.alias.is_empty() {
                return Err(empty_target("alias"));
            }
            if annotation.expression.is_empty() {
                return Err(empty_target("expression"));
            }
        }
        OptimizationDirective::Prefetch(target)
        | OptimizationDirective::PrefetchForParent(target) => {
            let relation = match target {
                PrefetchTarget::Relation(relation) => relation,
                PrefetchTarget::Spec(spec) => &spec.relation,
            };
            if relation.is_empty() {
                return Err(empty_target("relation"));
            }
        }
        OptimizationDirective::SelectWithChildren(nested) => {
            if nested.relation.is_empty() {
                return Err(empty_target("relation"));
            }
        }
    }

    Ok(())
}
