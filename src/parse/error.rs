use std::fmt;

/// A raw display string could not be parsed into the supported clause
/// grammar. Carries the offending raw text and the field/output that owns
/// it. Fatal at catalog compile time.
#[derive(Debug)]
pub struct ParseError {
    owner: String,
    raw: String,
    message: String,
}

impl ParseError {
    pub(crate) fn new(
        owner: impl Into<String>,
        raw: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            raw: raw.into(),
            message: message.into(),
        }
    }

    /// The field or output the display string belongs to.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// The raw display text that failed to parse.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cannot parse display clause for '{}': {}: \"{}\"",
            self.owner, self.message, self.raw
        )
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_carries_owner_and_raw() {
        let err = ParseError::new("Opt", "Action in (A", "unterminated value list");
        assert_eq!(
            err.to_string(),
            "cannot parse display clause for 'Opt': unterminated value list: \"Action in (A\""
        );
        assert_eq!(err.owner(), "Opt");
        assert_eq!(err.raw(), "Action in (A");
    }
}
