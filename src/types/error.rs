use thiserror::Error;

/// Structural problems with a catalog, raised at compile time before any
/// enumeration starts. A malformed catalog cannot produce a trustworthy
/// permutation set, so these are always fatal.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("duplicate field name '{name}'")]
    DuplicateField { name: String },

    #[error("duplicate output name '{name}'")]
    DuplicateOutput { name: String },

    #[error("no discriminator declared; every catalog needs a root discriminator field")]
    NoDiscriminator,

    #[error("field '{field}' has no kind; call one of boolean/choice/multi_choice/free_form")]
    MissingKind { field: String },

    #[error("field '{field}' is a choice field with an empty valid-value list")]
    EmptyValues { field: String },

    #[error("field '{field}' uses unknown value template '{{{{{token}}}}}'")]
    UnknownTemplate { field: String, token: String },

    #[error("predicate for '{owner}' references unknown field '{field}'")]
    UnknownField { owner: String, field: String },

    #[error("predicate for field '{owner}' references '{field}', which is declared later")]
    ForwardReference { owner: String, field: String },

    #[error("predicate for '{owner}' references free-form field '{field}'")]
    FreeFormReference { owner: String, field: String },
}

/// A predicate was evaluated against an assignment missing a referenced
/// field, or outside its permitted context. Aborts the current resolution
/// call or enumeration run; never silently defaults to true or false.
#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("field '{field}' referenced before it is assigned")]
    Unassigned { field: String },

    #[error("predicate for '{owner}' references field '{field}'; discriminator-only resolution requires a full assignment")]
    PartialContext { owner: String, field: String },

    #[error("unknown field '{field}'")]
    UnknownField { field: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_field_message() {
        let err = CatalogError::DuplicateField {
            name: "Action".into(),
        };
        assert_eq!(err.to_string(), "duplicate field name 'Action'");
    }

    #[test]
    fn unknown_template_message() {
        let err = CatalogError::UnknownTemplate {
            field: "Region".into(),
            token: "regions".into(),
        };
        assert_eq!(
            err.to_string(),
            "field 'Region' uses unknown value template '{{regions}}'"
        );
    }

    #[test]
    fn forward_reference_message() {
        let err = CatalogError::ForwardReference {
            owner: "Opt".into(),
            field: "Region".into(),
        };
        assert_eq!(
            err.to_string(),
            "predicate for field 'Opt' references 'Region', which is declared later"
        );
    }

    #[test]
    fn unassigned_message() {
        let err = EvaluationError::Unassigned {
            field: "Opt".into(),
        };
        assert_eq!(err.to_string(), "field 'Opt' referenced before it is assigned");
    }

    #[test]
    fn partial_context_message() {
        let err = EvaluationError::PartialContext {
            owner: "summary".into(),
            field: "Opt".into(),
        };
        assert_eq!(
            err.to_string(),
            "predicate for 'summary' references field 'Opt'; discriminator-only resolution requires a full assignment"
        );
    }
}
