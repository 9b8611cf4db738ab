//! Clause splitter
//!
//! Separates the tail of a SELECT statement into an optional ORDER BY clause
//! and an optional row-limit clause, leaving the body. The limit clause is
//! stripped first: it legally follows ORDER BY, so cutting in the other
//! order would leave limit text stranded inside the order clause.

use crate::lex::{tokenize, Token, TokenKind};

/// A statement split into body, order clause and row-limit clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedClauses {
    pub body: String,
    pub order_clause: Option<String>,
    pub limit_clause: Option<String>,
}

/// Byte offset of the rightmost row-limit keyword, if any.
///
/// Recognizes `FETCH FIRST ... ROWS ONLY` / `FETCH NEXT ...` and `LIMIT n`.
fn limit_start(tokens: &[Token<'_>]) -> Option<usize> {
    let mut found = None;
    for (i, tok) in tokens.iter().enumerate() {
        if tok.is_word("FETCH") {
            let next = tokens.get(i + 1);
            if next.is_some_and(|t| t.is_word("FIRST") || t.is_word("NEXT")) {
                found = Some(tok.start);
            }
        } else if tok.is_word("LIMIT") {
            found = Some(tok.start);
        }
    }
    found
}

/// Byte offset of the rightmost `ORDER BY`, if any.
fn order_start(tokens: &[Token<'_>]) -> Option<usize> {
    let mut found = None;
    for (i, tok) in tokens.iter().enumerate() {
        if tok.is_word("ORDER") && tokens.get(i + 1).is_some_and(|t| t.is_word("BY")) {
            found = Some(tok.start);
        }
    }
    found
}

/// Split `stmt` into body, optional order clause and optional limit clause.
pub fn split(stmt: &str) -> ParsedClauses {
    let tokens = tokenize(stmt);

    let (rest, limit_clause) = match limit_start(&tokens) {
        Some(at) => (
            stmt[..at].trim_end(),
            Some(stmt[at..].trim().to_string()),
        ),
        None => (stmt.trim_end(), None),
    };

    let rest_tokens = tokenize(rest);
    let (body, order_clause) = match order_start(&rest_tokens) {
        Some(at) => (
            rest[..at].trim_end().to_string(),
            Some(rest[at..].trim().to_string()),
        ),
        None => (rest.to_string(), None),
    };

    ParsedClauses {
        body,
        order_clause,
        limit_clause,
    }
}

/// True when an order clause has no sortable reference after `ORDER BY`.
///
/// Generators occasionally emit a bare `ORDER BY` when truncated; the
/// sanitizer swaps those for the policy default instead of shipping broken
/// SQL to the database.
pub fn order_clause_is_malformed(clause: &str) -> bool {
    let tokens = tokenize(clause);
    if tokens.len() < 3 {
        return true;
    }
    !matches!(
        tokens[2].kind,
        TokenKind::Word | TokenKind::QuotedIdent | TokenKind::Number
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_order_and_fetch() {
        let parsed = split(
            "SELECT * FROM ap_holds_all WHERE hold_id > 5 ORDER BY hold_date DESC FETCH FIRST 20 ROWS ONLY",
        );
        assert_eq!(parsed.body, "SELECT * FROM ap_holds_all WHERE hold_id > 5");
        assert_eq!(parsed.order_clause.as_deref(), Some("ORDER BY hold_date DESC"));
        assert_eq!(parsed.limit_clause.as_deref(), Some("FETCH FIRST 20 ROWS ONLY"));
    }

    #[test]
    fn no_trailing_clauses() {
        let parsed = split("SELECT * FROM ap_holds_all");
        assert_eq!(parsed.body, "SELECT * FROM ap_holds_all");
        assert!(parsed.order_clause.is_none());
        assert!(parsed.limit_clause.is_none());
    }

    #[test]
    fn limit_without_order() {
        let parsed = split("SELECT * FROM ap_holds_all LIMIT 10");
        assert_eq!(parsed.body, "SELECT * FROM ap_holds_all");
        assert_eq!(parsed.limit_clause.as_deref(), Some("LIMIT 10"));
    }

    #[test]
    fn order_without_limit() {
        let parsed = split("SELECT * FROM ap_holds_all ORDER BY hold_id");
        assert_eq!(parsed.order_clause.as_deref(), Some("ORDER BY hold_id"));
        assert!(parsed.limit_clause.is_none());
    }

    #[test]
    fn order_inside_literal_is_ignored() {
        let parsed = split("SELECT * FROM t WHERE note = 'ORDER BY nothing'");
        assert!(parsed.order_clause.is_none());
        assert_eq!(parsed.body, "SELECT * FROM t WHERE note = 'ORDER BY nothing'");
    }

    #[test]
    fn fetch_next_variant() {
        let parsed = split("SELECT * FROM t FETCH NEXT 5 ROWS ONLY");
        assert_eq!(parsed.limit_clause.as_deref(), Some("FETCH NEXT 5 ROWS ONLY"));
    }

    #[test]
    fn truncated_limit_clause_preserved_verbatim() {
        // No repair path for the limit clause; the sanitizer ships it as-is
        let parsed = split("SELECT * FROM ap_holds_all FETCH FIRST");
        assert_eq!(parsed.body, "SELECT * FROM ap_holds_all");
        assert_eq!(parsed.limit_clause.as_deref(), Some("FETCH FIRST"));
    }

    #[test]
    fn malformed_order_detection() {
        assert!(order_clause_is_malformed("ORDER BY"));
        assert!(order_clause_is_malformed("ORDER BY ;"));
        assert!(!order_clause_is_malformed("ORDER BY hold_date DESC"));
        assert!(!order_clause_is_malformed("ORDER BY \"HOLD_DATE\" ASC"));
        assert!(!order_clause_is_malformed("ORDER BY 1"));
    }

    #[test]
    fn rightmost_order_by_wins() {
        // An ORDER BY inside a subquery must not shadow the outer clause.
        let parsed =
            split("SELECT * FROM (SELECT * FROM t ORDER BY a) x ORDER BY b DESC");
        assert_eq!(parsed.order_clause.as_deref(), Some("ORDER BY b DESC"));
    }
}
