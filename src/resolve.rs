use crate::evaluate::evaluate;
use crate::types::{Assignment, Catalog, EvaluationError, Output, Slot, Value};

/// Whether the named field is visible under `assignment`. Hidden fields are
/// never visible, regardless of their predicate.
pub(crate) fn is_field_visible(
    catalog: &Catalog,
    name: &str,
    assignment: &Assignment,
) -> Result<bool, EvaluationError> {
    let index = catalog
        .registry
        .get(name)
        .ok_or_else(|| EvaluationError::UnknownField {
            field: name.to_owned(),
        })?;
    let field = &catalog.fields[index];
    if field.is_hidden() {
        return Ok(false);
    }
    evaluate(&field.compiled, assignment.slots())
}

/// Resolve the outputs whose predicate holds under a completed assignment.
pub(crate) fn outputs_for_assignment<'c>(
    catalog: &'c Catalog,
    assignment: &Assignment,
) -> Result<Vec<&'c Output>, EvaluationError> {
    let mut visible = Vec::new();
    for output in &catalog.outputs {
        if evaluate(&output.compiled, assignment.slots())? {
            visible.push(output);
        }
    }
    Ok(visible)
}

/// Resolve outputs for a single discriminator value.
///
/// Strict partial-context mode: before anything is evaluated, every output
/// predicate is checked to reference the discriminator alone. A predicate
/// needing any other field fails the whole call; it is never vacuously
/// satisfied.
pub(crate) fn outputs_for_discriminator<'c>(
    catalog: &'c Catalog,
    value: &str,
) -> Result<Vec<&'c Output>, EvaluationError> {
    for output in &catalog.outputs {
        let mut refs = Vec::new();
        output.compiled.collect_refs(&mut refs);
        if let Some((field, _)) = refs.iter().find(|(_, index)| *index != 0) {
            return Err(EvaluationError::PartialContext {
                owner: output.name.clone(),
                field: (*field).to_owned(),
            });
        }
    }

    let mut slots = vec![Slot::Unvisited; catalog.registry.len()];
    slots[0] = Slot::Assigned(Value::Text(value.to_owned()));

    let mut visible = Vec::new();
    for output in &catalog.outputs {
        if evaluate(&output.compiled, &slots)? {
            visible.push(output);
        }
    }
    Ok(visible)
}
