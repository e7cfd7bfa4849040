//! Scoped cursor token encoding, parsing, and validation.
//!
//! Sources mint cursors as `pg:<scope>:<key>`. The scope names the table the
//! key belongs to so a cursor from one table is never replayed against another.

use pagewise_core::Cursor;
use thiserror::Error;

const TOKEN_PREFIX: &str = "pg";

/// Parsed cursor token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorToken {
    /// Logical table name (e.g. `library_pins`).
    pub scope: String,
    /// Keyset position inside the scope.
    pub key: String,
}

/// Validation outcome for cursors handed back by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CursorError {
    #[error("malformed cursor")]
    Invalid,
    #[error("cursor belongs to another table")]
    WrongScope,
}

/// Build an opaque cursor for `key` inside `scope`.
pub fn build_cursor(scope: &str, key: &str) -> Cursor {
    Cursor::new(format!("{TOKEN_PREFIX}:{scope}:{key}"))
}

/// Parse a cursor token. Keys may themselves contain `:`.
pub fn parse_cursor(raw: &str) -> Option<CursorToken> {
    let mut parts = raw.splitn(3, ':');

    let prefix = parts.next()?;
    if prefix != TOKEN_PREFIX {
        return None;
    }

    let scope = parts.next().filter(|scope| !scope.is_empty())?.to_owned();
    let key = parts.next()?.to_owned();

    Some(CursorToken { scope, key })
}

/// Validate a cursor against the expected scope and return its key.
pub fn validate_cursor(cursor: &Cursor, expected_scope: &str) -> Result<String, CursorError> {
    let token = parse_cursor(cursor.as_str()).ok_or(CursorError::Invalid)?;

    if token.scope != expected_scope {
        return Err(CursorError::WrongScope);
    }

    Ok(token.key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_with_separators_survive() {
        let cursor = build_cursor("library_pins", "CASS:0042");
        assert_eq!(cursor.as_str(), "pg:library_pins:CASS:0042");
        assert_eq!(
            validate_cursor(&cursor, "library_pins"),
            Ok("CASS:0042".to_owned())
        );
    }

    #[test]
    fn foreign_cursors_are_rejected() {
        let cursor = build_cursor("library_pins", "A1");
        assert_eq!(validate_cursor(&cursor, "pucks"), Err(CursorError::WrongScope));
        assert_eq!(
            validate_cursor(&Cursor::new("c1"), "library_pins"),
            Err(CursorError::Invalid)
        );
        assert_eq!(parse_cursor("pg::A1"), None);
        assert_eq!(parse_cursor("pg:library_pins"), None);
    }
}
