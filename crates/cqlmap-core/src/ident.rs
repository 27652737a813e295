//! Identifier quoting for generated statement text.
//!
//! Every keyspace, table and column name interpolated into a statement goes
//! through [`quote`]; no caller-supplied name is trusted as a literal.

use std::borrow::Cow;

/// Quoting delimiter of the store's query grammar.
pub const DELIMITER: char = '"';

/// Quote an identifier for interpolation into statement text.
///
/// Names made solely of ASCII letters and digits are returned unchanged.
/// Anything else (including the empty name) is wrapped in double quotes with
/// embedded quotes doubled.
#[must_use]
pub fn quote(ident: &str) -> Cow<'_, str> {
    if is_bare(ident) {
        return Cow::Borrowed(ident);
    }

    let mut out = String::with_capacity(ident.len() + 2);
    out.push(DELIMITER);
    for ch in ident.chars() {
        if ch == DELIMITER {
            out.push(DELIMITER);
        }
        out.push(ch);
    }
    out.push(DELIMITER);

    Cow::Owned(out)
}

/// Quote a `keyspace.table` pair.
#[must_use]
pub fn qualified(keyspace: &str, table: &str) -> String {
    format!("{}.{}", quote(keyspace), quote(table))
}

fn is_bare(ident: &str) -> bool {
    !ident.is_empty() && ident.bytes().all(|b| b.is_ascii_alphanumeric())
}

///
/// TESTS
///
