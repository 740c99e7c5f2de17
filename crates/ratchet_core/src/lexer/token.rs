//! Token model for the scanner.

use std::fmt;

use bitflags::bitflags;

// ─────────────────────────────────────────────────────────────────────────────
// TokenKind
// ─────────────────────────────────────────────────────────────────────────────

/// The lexical category of a token.
///
/// This is a deliberately coarse classification: every operator is [`Op`],
/// every identifier-shaped run is [`Lit`], and `)`/`]`/`}` all collapse into
/// [`Close`].  Refinement (keywords, labels, which bracket closed) is the
/// business of whatever consumes the token stream.
///
/// [`Op`]: TokenKind::Op
/// [`Lit`]: TokenKind::Lit
/// [`Close`]: TokenKind::Close
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// End of input (always zero length).
    Eof,
    /// `// …` (newline excluded) or `/* … */` (terminator included).
    Comment,
    /// `;`
    Semicolon,
    /// Any operator run: `+`, `>>>=`, `===`, `&&`, division `/`, ….
    Op,
    /// `:`
    Colon,
    /// `{` opening an ordinary block or object literal.
    Brace,
    /// `[`
    Array,
    /// `(`
    Paren,
    /// `?`
    Ternary,
    /// `)`, `]`, or `}`.
    Close,
    /// A quoted string, or one segment of a template literal.
    String,
    /// Regular-expression literal `/pattern/flags`.
    Regexp,
    /// Numeric literal (permissive: any alphanumeric-and-dot run).
    Number,
    /// A lone `.`
    Dot,
    /// `...`
    Spread,
    /// `=>`
    Arrow,
    /// The two-byte `${` opening a template substitution.
    TemplateBrace,
    /// Identifier-shaped run: identifier, keyword, or label candidate.
    Lit,
    /// `,`
    Comma,
}

impl TokenKind {
    /// Whether a token of this kind can terminate an expression, making a
    /// following `/` the division operator rather than a regexp opener.
    ///
    /// This drives [`HeuristicOracle`](crate::lexer::oracle::HeuristicOracle).
    /// Note that [`Op`](TokenKind::Op) never ends a value here, so `x++ / y`
    /// is misread; a parser with grammar context supplies a better answer.
    pub fn ends_value(self) -> bool {
        matches!(
            self,
            TokenKind::Lit
                | TokenKind::Number
                | TokenKind::String
                | TokenKind::Regexp
                | TokenKind::Close
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TokenKind::Eof => "eof",
            TokenKind::Comment => "comment",
            TokenKind::Semicolon => "semicolon",
            TokenKind::Op => "op",
            TokenKind::Colon => "colon",
            TokenKind::Brace => "brace",
            TokenKind::Array => "array",
            TokenKind::Paren => "paren",
            TokenKind::Ternary => "ternary",
            TokenKind::Close => "close",
            TokenKind::String => "string",
            TokenKind::Regexp => "regexp",
            TokenKind::Number => "number",
            TokenKind::Dot => "dot",
            TokenKind::Spread => "spread",
            TokenKind::Arrow => "arrow",
            TokenKind::TemplateBrace => "t_brace",
            TokenKind::Lit => "lit",
            TokenKind::Comma => "comma",
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// TokenFlags
// ─────────────────────────────────────────────────────────────────────────────

bitflags! {
    /// Extra per-token facts that do not warrant their own [`TokenKind`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TokenFlags: u8 {
        /// Set on [`TokenKind::Lit`] tokens whose next significant byte
        /// (across whitespace and comments) is `:`, hinting that the token
        /// may be a label.  Meaningless on every other kind.
        const LIT_NEXT_COLON = 0b01;
        /// The token ran to the end of the buffer without its terminator.
        /// Set on block comments, strings, template segments, and regexps;
        /// such tokens are not errors.
        const UNTERMINATED = 0b10;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Token
// ─────────────────────────────────────────────────────────────────────────────

/// A single lexical token produced by [`Scanner`](crate::lexer::scanner::Scanner).
///
/// Tokens carry offsets into the source buffer rather than owned text; a
/// consumer that outlives the buffer must copy the bytes out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// The lexical category.
    pub kind: TokenKind,
    /// Byte offset of the token's first byte within the source buffer.
    pub offset: usize,
    /// Length in bytes.  Zero only for [`TokenKind::Eof`] and for an empty
    /// template segment between two substitutions.
    pub len: usize,
    /// 1-based line number of the token's first byte.
    pub line: u32,
    /// Extra facts; see [`TokenFlags`].
    pub flags: TokenFlags,
}

impl Token {
    /// Exclusive end offset.
    pub fn end(&self) -> usize {
        self.offset + self.len
    }

    /// The token's bytes within `source`, which must be the buffer the token
    /// was scanned from.
    pub fn bytes<'a>(&self, source: &'a [u8]) -> &'a [u8] {
        &source[self.offset..self.end()]
    }

    /// Whether the next significant byte after this token is a `:`.
    /// Only ever set on [`TokenKind::Lit`].
    pub fn lit_next_colon(&self) -> bool {
        self.flags.contains(TokenFlags::LIT_NEXT_COLON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names() {
        assert_eq!(TokenKind::TemplateBrace.to_string(), "t_brace");
        assert_eq!(TokenKind::Lit.to_string(), "lit");
        assert_eq!(TokenKind::Eof.to_string(), "eof");
    }

    #[test]
    fn test_ends_value() {
        assert!(TokenKind::Lit.ends_value());
        assert!(TokenKind::Close.ends_value());
        assert!(!TokenKind::Op.ends_value());
        assert!(!TokenKind::Brace.ends_value());
        assert!(!TokenKind::TemplateBrace.ends_value());
    }

    #[test]
    fn test_token_bytes() {
        let src = b"let x = 1;";
        let tok = Token {
            kind: TokenKind::Lit,
            offset: 4,
            len: 1,
            line: 1,
            flags: TokenFlags::empty(),
        };
        assert_eq!(tok.bytes(src), b"x");
        assert_eq!(tok.end(), 5);
    }
}
