use crate::types::{CompiledPredicate, EvaluationError, Slot};

/// Evaluate a compiled predicate against assignment slots by structural
/// recursion. No text is ever executed: the clause was compiled to this
/// tagged variant at catalog load.
///
/// Membership against an omitted field (visited, predicate false, not
/// hidden) is `false`; against an unvisited field it is an error, never a
/// default.
pub(crate) fn evaluate(
    predicate: &CompiledPredicate,
    slots: &[Slot],
) -> Result<bool, EvaluationError> {
    match predicate {
        CompiledPredicate::Literal(b) => Ok(*b),
        CompiledPredicate::FieldIn {
            field,
            index,
            values,
        } => match &slots[*index] {
            Slot::Assigned(value) => Ok(value.matches(values)),
            Slot::Omitted => Ok(false),
            Slot::Unvisited => Err(EvaluationError::Unassigned {
                field: field.clone(),
            }),
        },
        // Short-circuits left-to-right.
        CompiledPredicate::And(a, b) => Ok(evaluate(a, slots)? && evaluate(b, slots)?),
    }
}
