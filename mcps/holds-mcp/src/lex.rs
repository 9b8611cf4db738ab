//! Minimal SQL lexer
//!
//! Splits a single SELECT statement into spanned tokens so the guard stages
//! can inspect keywords and identifiers without tripping over string
//! literals or comments. Deliberately narrow: no CTEs, no dialect-specific
//! operators, no validation. The lexer never fails - an unterminated literal
//! or comment simply runs to end of input and the guard stages decide what
//! to do with what they see.

/// Token classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Bare identifier or keyword (`SELECT`, `ap_holds_all`)
    Word,
    /// Double-quoted identifier, quotes included in `text`
    QuotedIdent,
    /// Single-quoted string literal, quotes included in `text`
    StringLit,
    /// Numeric literal
    Number,
    /// Any other single character (`.`, `,`, `(`, `*`, ...)
    Symbol,
}

/// A token with its byte span into the source text.
#[derive(Debug, Clone, Copy)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
}

impl<'a> Token<'a> {
    /// Case-insensitive keyword test; only matches bare words.
    pub fn is_word(&self, keyword: &str) -> bool {
        self.kind == TokenKind::Word && self.text.eq_ignore_ascii_case(keyword)
    }

    /// True for tokens that can name a table or column.
    pub fn is_identifier(&self) -> bool {
        matches!(self.kind, TokenKind::Word | TokenKind::QuotedIdent)
    }

    /// Identifier text with surrounding double quotes stripped.
    pub fn unquoted(&self) -> &'a str {
        match self.kind {
            TokenKind::QuotedIdent => self
                .text
                .strip_prefix('"')
                .and_then(|t| t.strip_suffix('"'))
                .unwrap_or(self.text),
            _ => self.text,
        }
    }
}

fn is_word_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_word_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Tokenize `input`, skipping whitespace, `--` line comments and `/* */`
/// block comments.
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i] as char;

        if c.is_ascii_whitespace() {
            i += 1;
            continue;
        }

        // Line comment
        if c == '-' && bytes.get(i + 1) == Some(&b'-') {
            while i < bytes.len() && bytes[i] != b'\n' {
                i += 1;
            }
            continue;
        }

        // Block comment
        if c == '/' && bytes.get(i + 1) == Some(&b'*') {
            i += 2;
            while i < bytes.len() {
                if bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/') {
                    i += 2;
                    break;
                }
                i += 1;
            }
            continue;
        }

        let start = i;

        // String literal, '' is the escape for a single quote
        if c == '\'' {
            i += 1;
            while i < bytes.len() {
                if bytes[i] == b'\'' {
                    if bytes.get(i + 1) == Some(&b'\'') {
                        i += 2;
                        continue;
                    }
                    i += 1;
                    break;
                }
                i += 1;
            }
            tokens.push(Token {
                kind: TokenKind::StringLit,
                text: &input[start..i],
                start,
                end: i,
            });
            continue;
        }

        // Quoted identifier
        if c == '"' {
            i += 1;
            while i < bytes.len() {
                if bytes[i] == b'"' {
                    i += 1;
                    break;
                }
                i += 1;
            }
            tokens.push(Token {
                kind: TokenKind::QuotedIdent,
                text: &input[start..i],
                start,
                end: i,
            });
            continue;
        }

        if is_word_start(c) {
            i += 1;
            while i < bytes.len() && is_word_continue(bytes[i] as char) {
                i += 1;
            }
            tokens.push(Token {
                kind: TokenKind::Word,
                text: &input[start..i],
                start,
                end: i,
            });
            continue;
        }

        if c.is_ascii_digit() {
            i += 1;
            while i < bytes.len()
                && ((bytes[i] as char).is_ascii_digit() || bytes[i] == b'.')
            {
                i += 1;
            }
            tokens.push(Token {
                kind: TokenKind::Number,
                text: &input[start..i],
                start,
                end: i,
            });
            continue;
        }

        // Multi-byte characters land here too; step over the whole char
        let ch_len = input[start..].chars().next().map_or(1, |ch| ch.len_utf8());
        i += ch_len;
        tokens.push(Token {
            kind: TokenKind::Symbol,
            text: &input[start..i],
            start,
            end: i,
        });
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).iter().map(|t| t.kind).collect()
    }

    #[test]
    fn words_numbers_symbols() {
        let tokens = tokenize("SELECT * FROM ap_holds_all WHERE hold_id = 42");
        assert!(tokens[0].is_word("select"));
        assert_eq!(tokens[1].kind, TokenKind::Symbol);
        assert!(tokens[2].is_word("FROM"));
        assert_eq!(tokens.last().unwrap().kind, TokenKind::Number);
        assert_eq!(tokens.last().unwrap().text, "42");
    }

    #[test]
    fn string_literal_is_one_token() {
        let tokens = tokenize("code IN ('QTY ORD', 'PRICE')");
        let lits: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::StringLit)
            .collect();
        assert_eq!(lits.len(), 2);
        assert_eq!(lits[0].text, "'QTY ORD'");
    }

    #[test]
    fn escaped_quote_stays_inside_literal() {
        let tokens = tokenize("reason = 'can''t release'");
        let lit = tokens
            .iter()
            .find(|t| t.kind == TokenKind::StringLit)
            .unwrap();
        assert_eq!(lit.text, "'can''t release'");
    }

    #[test]
    fn keyword_inside_literal_is_not_a_word() {
        let tokens = tokenize("SELECT * FROM t WHERE note = 'please DROP this'");
        assert!(!tokens.iter().any(|t| t.is_word("drop")));
    }

    #[test]
    fn comments_are_skipped() {
        let tokens = tokenize("SELECT 1 -- DROP TABLE x\n/* UPDATE y */ FROM dual");
        assert!(!tokens.iter().any(|t| t.is_word("drop")));
        assert!(!tokens.iter().any(|t| t.is_word("update")));
        assert!(tokens.iter().any(|t| t.is_word("dual")));
    }

    #[test]
    fn quoted_identifier_unquotes() {
        let tokens = tokenize("\"HOLD_DATE\" ASC");
        assert_eq!(tokens[0].kind, TokenKind::QuotedIdent);
        assert_eq!(tokens[0].unquoted(), "HOLD_DATE");
    }

    #[test]
    fn unterminated_literal_runs_to_end() {
        let tokens = tokenize("WHERE x = 'oops");
        assert_eq!(tokens.last().unwrap().kind, TokenKind::StringLit);
        assert_eq!(kinds("WHERE x = 'oops").len(), 4);
    }
}
