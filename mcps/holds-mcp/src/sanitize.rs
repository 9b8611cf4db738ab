//! Statement sanitizer - the guardrail between the SQL generator and the
//! database
//!
//! Takes the generator's raw output (untrusted free text) and either
//! produces a policy-compliant statement or rejects it with the rule that
//! failed. Stages run in a fixed order, each able to short-circuit:
//! fence/terminator stripping, schema-qualifier rewrite, forbidden-keyword
//! scan, FROM/JOIN allowlist, clause normalization, mandatory predicate
//! injection, reassembly. Every stage is pure; nothing here touches I/O.

use std::fmt;

use crate::clauses::{self, order_clause_is_malformed};
use crate::lex::{tokenize, Token, TokenKind};
use crate::policy::SanitizationPolicy;
use crate::types::SanitizeError;

/// SQL text that has passed every policy check.
///
/// The only constructor is [`sanitize`]; the executor accepts nothing else,
/// so raw generator output has no path to the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedStatement(String);

impl SanitizedStatement {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for SanitizedStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Run the full sanitization pipeline over a raw generated statement.
pub fn sanitize(
    raw: &str,
    policy: &SanitizationPolicy,
) -> Result<SanitizedStatement, SanitizeError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SanitizeError::Empty);
    }

    let stripped = strip_fences_and_terminator(trimmed);
    if stripped.is_empty() {
        return Err(SanitizeError::Empty);
    }

    let stmt = match &policy.target_schema {
        Some(target) => rewrite_schema(stripped, &policy.source_schema, target),
        None => stripped.to_string(),
    };

    scan_forbidden(&stmt, &policy.forbidden_keywords)?;
    validate_tables(&stmt, &policy.allowed_table)?;

    let parsed = clauses::split(&stmt);

    let order_clause = resolve_order_clause(parsed.order_clause, policy);
    let body = inject_predicates(&parsed.body, &policy.mandatory_predicates);
    // The limit clause has no malformed-clause repair: whatever the
    // generator wrote ships verbatim, absence alone triggers the default
    let limit_clause = parsed
        .limit_clause
        .unwrap_or_else(|| policy.default_limit_clause.clone());

    let mut parts = vec![body.trim().to_string()];
    if let Some(order) = order_clause {
        if !order.is_empty() {
            parts.push(order);
        }
    }
    if !limit_clause.is_empty() {
        parts.push(limit_clause);
    }

    Ok(SanitizedStatement(parts.join(" ")))
}

/// Drop surrounding code-fence markers and one trailing `;`.
///
/// Pure text trimming: generators are told not to fence their output, but
/// the contract is routinely violated.
fn strip_fences_and_terminator(s: &str) -> &str {
    let mut s = s.trim();

    if let Some(rest) = s.strip_prefix("```") {
        // The opening fence may carry a language tag on its own line
        s = match rest.find('\n') {
            Some(nl) => &rest[nl + 1..],
            None => rest,
        };
    }
    s = s.trim_end();
    if let Some(rest) = s.strip_suffix("```") {
        s = rest.trim_end();
    }

    s.strip_suffix(';').unwrap_or(s).trim()
}

/// Replace `source.`-style schema qualifiers with the runtime schema.
///
/// Matches the schema token case-insensitively, quoted or bare, but only
/// when it directly qualifies an identifier. Applying the rewrite to an
/// already-rewritten statement is a no-op.
fn rewrite_schema(stmt: &str, source: &str, target: &str) -> String {
    let tokens = tokenize(stmt);
    let mut out = String::with_capacity(stmt.len());
    let mut copied = 0;

    for (i, tok) in tokens.iter().enumerate() {
        let qualifies = tok.is_identifier()
            && tok.unquoted().eq_ignore_ascii_case(source)
            && tokens
                .get(i + 1)
                .is_some_and(|t| t.kind == TokenKind::Symbol && t.text == ".")
            && tokens.get(i + 2).is_some_and(|t| t.is_identifier());

        if qualifies {
            out.push_str(&stmt[copied..tok.start]);
            out.push_str(target);
            copied = tok.end;
        }
    }

    out.push_str(&stmt[copied..]);
    out
}

/// Reject the statement if any forbidden verb appears anywhere in it.
///
/// Runs over the whole token stream, subqueries included - the allowlist
/// check below only sees top-level FROM/JOIN targets.
fn scan_forbidden(stmt: &str, forbidden: &[String]) -> Result<(), SanitizeError> {
    for tok in tokenize(stmt) {
        if tok.kind != TokenKind::Word {
            continue;
        }
        if forbidden.iter().any(|k| tok.text.eq_ignore_ascii_case(k)) {
            return Err(SanitizeError::Forbidden {
                keyword: tok.text.to_uppercase(),
            });
        }
    }
    Ok(())
}

/// Check every FROM/JOIN target against the single allowed table.
///
/// Targets may be quoted and/or schema-qualified; only the final identifier
/// segment is compared, case-insensitively. Known gap: only the chain
/// directly after FROM/JOIN is inspected, so a comma cross-join's second
/// table escapes the check; that is inherited behavior, same as the OR
/// widening noted on [`inject_predicates`].
pub fn validate_tables(stmt: &str, allowed_table: &str) -> Result<(), SanitizeError> {
    let tokens = tokenize(stmt);
    let allowed = allowed_table.to_uppercase();

    for (i, tok) in tokens.iter().enumerate() {
        if !(tok.is_word("FROM") || tok.is_word("JOIN")) {
            continue;
        }
        // A `(` after FROM is a derived table; its inner FROM gets its own visit
        if let Some((start, end, table)) = identifier_chain(&tokens, i + 1) {
            if !table.eq_ignore_ascii_case(&allowed) {
                return Err(SanitizeError::TableNotAllowed {
                    identifier: stmt[start..end].to_string(),
                });
            }
        }
    }
    Ok(())
}

/// Walk a dot-separated identifier chain starting at `tokens[i]`.
///
/// Returns the chain's byte span and the unquoted final segment.
fn identifier_chain<'a>(
    tokens: &[Token<'a>],
    mut i: usize,
) -> Option<(usize, usize, &'a str)> {
    let first = tokens.get(i)?;
    if !first.is_identifier() {
        return None;
    }
    let start = first.start;
    let mut last = first;

    while tokens
        .get(i + 1)
        .is_some_and(|t| t.kind == TokenKind::Symbol && t.text == ".")
        && tokens.get(i + 2).is_some_and(|t| t.is_identifier())
    {
        i += 2;
        last = &tokens[i];
    }

    Some((start, last.end, last.unquoted()))
}

/// Prepend the mandatory predicates to the body's WHERE clause, creating
/// one if the generator supplied none.
///
/// The injected conjunct always lands ahead of the generator's own
/// conditions, so policy predicates can only narrow the result. Known gap:
/// a top-level OR in the generator's clause binds looser than the injected
/// AND and can widen it back; that is inherited behavior, not guarded here.
pub fn inject_predicates(body: &str, predicates: &[String]) -> String {
    if predicates.is_empty() {
        return body.to_string();
    }
    let injected = predicates.join(" AND ");

    let tokens = tokenize(body);
    match tokens.iter().find(|t| t.is_word("WHERE")) {
        Some(tok) => format!(
            "{}WHERE {} AND{}",
            &body[..tok.start],
            injected,
            &body[tok.end..]
        ),
        None => format!("{} WHERE {}", body.trim_end(), injected),
    }
}

/// Apply the order-clause default rules.
///
/// A malformed clause (bare `ORDER BY` from a truncated generation) is
/// replaced by the policy default rather than failing the request; an
/// absent clause picks up the default only when the policy declares one.
fn resolve_order_clause(
    found: Option<String>,
    policy: &SanitizationPolicy,
) -> Option<String> {
    match found {
        Some(clause) if order_clause_is_malformed(&clause) => {
            tracing::warn!(
                clause = %clause,
                "malformed ORDER BY in generated statement, substituting default"
            );
            policy.default_order_clause.clone()
        }
        Some(clause) => Some(clause),
        None => policy.default_order_clause.clone(),
    }
}
