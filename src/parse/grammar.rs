use winnow::ascii::Caseless;
use winnow::combinator::{alt, cut_err, delimited, preceded, repeat, separated};
use winnow::error::{ErrMode, ModalResult, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::take_while;

use crate::types::Predicate;

// -- Whitespace & identifiers -----------------------------------------------

fn ws0(input: &mut &str) -> ModalResult<()> {
    take_while(0.., |c: char| c.is_ascii_whitespace())
        .void()
        .parse_next(input)
}

fn ws1(input: &mut &str) -> ModalResult<()> {
    take_while(1.., |c: char| c.is_ascii_whitespace())
        .void()
        .parse_next(input)
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.'
}

fn ident<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        take_while(1.., |c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., is_ident_char),
    )
        .take()
        .parse_next(input)
}

// -- Values -----------------------------------------------------------------

fn bare_value(input: &mut &str) -> ModalResult<String> {
    take_while(1.., |c: char| {
        c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | ':' | '-')
    })
    .map(str::to_owned)
    .parse_next(input)
}

fn quoted_value(input: &mut &str) -> ModalResult<String> {
    alt((
        delimited('\'', take_while(0.., |c: char| c != '\''), '\''),
        delimited('"', take_while(0.., |c: char| c != '"'), '"'),
    ))
    .map(str::to_owned)
    .parse_next(input)
}

fn value(input: &mut &str) -> ModalResult<String> {
    preceded(ws0, alt((quoted_value, bare_value)))
        .context(StrContext::Expected(StrContextValue::Description("value")))
        .parse_next(input)
}

// -- Membership tests -------------------------------------------------------

/// `field in (v1, v2, ...)`. Backtracks until the opening parenthesis is
/// seen, then commits: a malformed or unterminated value list is a hard
/// parse error rather than trailing free text.
fn membership(input: &mut &str) -> ModalResult<Predicate> {
    let field = ident.parse_next(input)?;
    (ws1, Caseless("in"), ws0, '(').parse_next(input)?;
    let values: Vec<String> = cut_err(separated(1.., value, (ws0, ',')))
        .context(StrContext::Expected(StrContextValue::Description(
            "value list",
        )))
        .parse_next(input)?;
    cut_err((ws0, ')'))
        .context(StrContext::Expected(StrContextValue::CharLiteral(')')))
        .parse_next(input)?;
    Ok(Predicate::FieldIn {
        field: field.to_owned(),
        values: values.into_iter().collect(),
    })
}

/// The full clause: an anchor-rooted membership test, conjoined with
/// further membership tests via a case-insensitive `AND`. Trailing free
/// text that does not form a committed conjunct is ignored.
fn clause<'a>(anchor: &'a str) -> impl FnMut(&mut &str) -> ModalResult<Predicate> + 'a {
    move |input: &mut &str| {
        let field = ident.parse_next(input)?;
        if field != anchor {
            return Err(ErrMode::from_input(input));
        }
        (ws1, Caseless("in"), ws0, '(').parse_next(input)?;
        let values: Vec<String> = cut_err(separated(1.., value, (ws0, ',')))
            .parse_next(input)?;
        cut_err((ws0, ')')).parse_next(input)?;

        let first = Predicate::FieldIn {
            field: field.to_owned(),
            values: values.into_iter().collect(),
        };
        let rest: Vec<Predicate> =
            repeat(0.., preceded((ws1, Caseless("and"), ws1), membership)).parse_next(input)?;
        Ok(rest.into_iter().fold(first, Predicate::and))
    }
}

// -- Extraction -------------------------------------------------------------

/// Scan free text for a clause anchored on `anchor in (...)` and compile it.
///
/// Candidate anchor occurrences must sit on an identifier boundary. A
/// candidate that commits (reaches the opening parenthesis) and then fails
/// is a hard error; candidates that never commit are skipped. Text with no
/// committing candidate at all is an error: an authored display string that
/// carries no recognizable clause never degrades to always-visible.
pub(crate) fn extract(raw: &str, anchor: &str) -> Result<Predicate, String> {
    for (idx, _) in raw.match_indices(anchor) {
        if idx > 0 {
            let boundary = raw[..idx]
                .chars()
                .next_back()
                .is_some_and(|c| !is_ident_char(c));
            if !boundary {
                continue;
            }
        }
        let mut input = &raw[idx..];
        match clause(anchor).parse_next(&mut input) {
            Ok(predicate) => return Ok(predicate),
            Err(ErrMode::Cut(e)) => return Err(format!("malformed clause: {e}")),
            Err(_) => continue,
        }
    }
    Err(format!("no clause anchored on '{anchor} in (...)' found"))
}
