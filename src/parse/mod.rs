mod error;
mod grammar;

pub use error::ParseError;

use crate::types::Predicate;

/// Parse the display clause embedded in `raw` into a [`Predicate`],
/// anchored on `anchor` (the discriminator). An absent or blank display
/// string means unconditionally visible.
///
/// # Errors
///
/// Returns [`ParseError`] carrying `owner` and the raw text if no
/// well-formed anchored clause can be extracted.
pub(crate) fn parse(
    raw: Option<&str>,
    anchor: &str,
    owner: &str,
) -> Result<Predicate, ParseError> {
    match raw {
        None => Ok(Predicate::Literal(true)),
        Some(text) if text.trim().is_empty() => Ok(Predicate::Literal(true)),
        Some(text) => {
            grammar::extract(text, anchor).map_err(|message| ParseError::new(owner, text, message))
        }
    }
}
