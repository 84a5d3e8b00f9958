use std::collections::{HashMap, HashSet};

use crate::error::PermiaError;
use crate::types::{
    Catalog, CatalogBuilder, CatalogError, CompiledPredicate, Field, FieldKind, FieldRegistry,
    FieldSpec, Output, OutputSpec, Predicate,
};

/// Validate a builder's declarations and compile them into a [`Catalog`].
///
/// All structural problems and malformed display clauses are caught here,
/// before any enumeration: the evaluator and enumerator only ever see
/// predicates whose references are known, strictly earlier, and branchable.
pub(crate) fn compile(builder: CatalogBuilder) -> Result<Catalog, PermiaError> {
    let CatalogBuilder {
        discriminator,
        fields: specs,
        outputs: output_specs,
        templates,
    } = builder;

    let (disc_name, disc_values) = discriminator.ok_or(CatalogError::NoDiscriminator)?;
    let disc_spec = FieldSpec {
        name: disc_name.clone(),
        kind: Some(FieldKind::Choice),
        valid_values: disc_values,
        default: None,
        hidden: false,
        service_scoped: false,
        display: None,
    };

    let mut all_specs = Vec::with_capacity(specs.len() + 1);
    all_specs.push(disc_spec);
    all_specs.extend(specs);

    let mut registry = FieldRegistry::new();
    let mut kinds = Vec::with_capacity(all_specs.len());
    for spec in &all_specs {
        if registry.register(&spec.name).is_none() {
            return Err(CatalogError::DuplicateField {
                name: spec.name.clone(),
            }
            .into());
        }
        kinds.push(spec.kind.ok_or_else(|| CatalogError::MissingKind {
            field: spec.name.clone(),
        })?);
    }

    let mut fields = Vec::with_capacity(all_specs.len());
    for (index, spec) in all_specs.into_iter().enumerate() {
        let kind = kinds[index];
        let valid_values = expand_templates(&spec.name, spec.valid_values, &templates)?;
        if matches!(kind, FieldKind::Choice | FieldKind::MultiChoice) && valid_values.is_empty() {
            return Err(CatalogError::EmptyValues {
                field: spec.name.clone(),
            }
            .into());
        }

        let predicate = crate::parse::parse(spec.display.as_deref(), &disc_name, &spec.name)?;
        let compiled =
            compile_predicate(&spec.name, &predicate, &registry, &kinds, Some(index))?;

        fields.push(Field {
            name: spec.name,
            kind,
            valid_values,
            default: spec.default,
            hidden: spec.hidden,
            service_scoped: spec.service_scoped,
            predicate,
            compiled,
        });
    }

    let mut outputs = Vec::with_capacity(output_specs.len());
    let mut seen_outputs: HashSet<&str> = HashSet::new();
    for spec in &output_specs {
        if !seen_outputs.insert(spec.name.as_str()) {
            return Err(CatalogError::DuplicateOutput {
                name: spec.name.clone(),
            }
            .into());
        }
    }
    for spec in output_specs {
        let predicate = crate::parse::parse(spec.display.as_deref(), &disc_name, &spec.name)?;
        let compiled = compile_predicate(&spec.name, &predicate, &registry, &kinds, None)?;
        outputs.push(Output {
            name: spec.name,
            kind: spec.kind,
            predicate,
            compiled,
        });
    }

    Ok(Catalog {
        fields,
        outputs,
        registry,
    })
}

/// Splice valid values of the exact form `{{key}}` with the registered
/// template list; everything else passes through literally.
fn expand_templates(
    field: &str,
    values: Vec<String>,
    templates: &HashMap<String, Vec<String>>,
) -> Result<Vec<String>, CatalogError> {
    let mut out = Vec::with_capacity(values.len());
    for value in values {
        if let Some(key) = value
            .strip_prefix("{{")
            .and_then(|rest| rest.strip_suffix("}}"))
        {
            let key = key.trim();
            let list = templates
                .get(key)
                .ok_or_else(|| CatalogError::UnknownTemplate {
                    field: field.to_owned(),
                    token: key.to_owned(),
                })?;
            out.extend(list.iter().cloned());
        } else {
            out.push(value);
        }
    }
    Ok(out)
}

/// Resolve a predicate's field references against the registry.
///
/// `limit` is the owner's own index for field predicates (references must be
/// strictly earlier) and `None` for output predicates, which are evaluated
/// against complete assignments and may reference any field. FreeForm
/// fields are never referenceable: an unconstrained value cannot pass a
/// membership test.
fn compile_predicate(
    owner: &str,
    predicate: &Predicate,
    registry: &FieldRegistry,
    kinds: &[FieldKind],
    limit: Option<usize>,
) -> Result<CompiledPredicate, CatalogError> {
    match predicate {
        Predicate::Literal(b) => Ok(CompiledPredicate::Literal(*b)),
        Predicate::FieldIn { field, values } => {
            let index = registry.get(field).ok_or_else(|| CatalogError::UnknownField {
                owner: owner.to_owned(),
                field: field.clone(),
            })?;
            if let Some(own) = limit {
                if index >= own {
                    return Err(CatalogError::ForwardReference {
                        owner: owner.to_owned(),
                        field: field.clone(),
                    });
                }
            }
            if kinds[index] == FieldKind::FreeForm {
                return Err(CatalogError::FreeFormReference {
                    owner: owner.to_owned(),
                    field: field.clone(),
                });
            }
            Ok(CompiledPredicate::FieldIn {
                field: field.clone(),
                index,
                values: values.clone(),
            })
        }
        Predicate::And(a, b) => Ok(CompiledPredicate::And(
            Box::new(compile_predicate(owner, a, registry, kinds, limit)?),
            Box::new(compile_predicate(owner, b, registry, kinds, limit)?),
        )),
    }
}
