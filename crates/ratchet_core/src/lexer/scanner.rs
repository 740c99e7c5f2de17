//! Streaming lexer for C-family scripting source with template literals.
//!
//! See [`Scanner`] for the main entry point.

use crate::error::{RatchetError, RatchetResult};
use crate::lexer::oracle::{ExpressionOracle, HeuristicOracle};
use crate::lexer::stack::BraceStack;
use crate::lexer::token::{Token, TokenFlags, TokenKind};

// ─────────────────────────────────────────────────────────────────────────────
// Byte classification
// ─────────────────────────────────────────────────────────────────────────────

/// Returns `true` for inter-token whitespace bytes.
fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\x0b' | b'\x0c' | b'\r')
}

/// Returns `true` for bytes that may *start* an identifier-shaped run.
/// High-bit bytes are accepted wholesale: non-ASCII identifier validation is
/// a downstream concern.
fn is_lit_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'$' || b == b'_' || b >= 0x80 || b == b'\\'
}

/// Returns `true` for bytes that *continue* an identifier-shaped run.
fn is_lit_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'$' || b == b'_' || b >= 0x80
}

// ─────────────────────────────────────────────────────────────────────────────
// Resume state
// ─────────────────────────────────────────────────────────────────────────────

/// A continuation forced onto the next token call by template-literal
/// handling.  At most one is armed at a time, and it is consumed by the very
/// next call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Resume {
    /// Nothing pending; dispatch on the next byte normally.
    #[default]
    None,
    /// The previous token was a template segment that stopped just before
    /// `${`; the next token must be the two-byte substitution opener.
    SubstitutionOpen,
    /// The previous token was the `}` closing a template substitution; the
    /// next token resumes the surrounding template-literal body.
    TemplateBody,
}

// ─────────────────────────────────────────────────────────────────────────────
// Scanner
// ─────────────────────────────────────────────────────────────────────────────

/// Streaming lexer over a borrowed byte buffer.
///
/// Call [`Scanner::next_token`] repeatedly until a token with
/// [`TokenKind::Eof`] comes back.  Each call consumes a bounded prefix of the
/// remaining input and returns exactly one token annotated with its byte
/// offset, length, and 1-based starting line.  The buffer is never mutated;
/// tokens reference it by offset only.
///
/// A NUL byte terminates scanning exactly like the end of the buffer.
///
/// # Example
///
/// ```
/// use ratchet_core::lexer::oracle::HeuristicOracle;
/// use ratchet_core::lexer::scanner::Scanner;
/// use ratchet_core::lexer::token::TokenKind;
///
/// let mut scanner = Scanner::from_str("let x = 42;");
/// let mut oracle = HeuristicOracle::new();
/// loop {
///     let tok = scanner.next_token(&mut oracle).unwrap();
///     if tok.kind == TokenKind::Eof { break; }
///     oracle.observe(tok.kind);
///     println!("{} at byte {}", tok.kind, tok.offset);
/// }
/// ```
pub struct Scanner<'src> {
    /// The complete source buffer (borrowed, read-only).
    buf: &'src [u8],
    /// Current byte offset into `buf`.
    curr: usize,
    /// Current 1-based line number.
    line_no: u32,
    /// Open-bracket stack; the bit marks template-substitution braces.
    stack: BraceStack,
    /// Forced continuation for the next token call.
    resume: Resume,
}

impl<'src> Scanner<'src> {
    /// Create a scanner over `buf`, positioned at offset 0, line 1.
    pub fn new(buf: &'src [u8]) -> Self {
        Self {
            buf,
            curr: 0,
            line_no: 1,
            stack: BraceStack::new(),
            resume: Resume::None,
        }
    }

    /// Create a scanner over the bytes of a string slice.
    pub fn from_str(source: &'src str) -> Self {
        Self::new(source.as_bytes())
    }

    /// Current byte offset of the cursor.
    pub fn offset(&self) -> usize {
        self.curr
    }

    /// Current 1-based line number at the cursor.
    pub fn line(&self) -> u32 {
        self.line_no
    }

    /// Number of unmatched open brackets consumed so far.
    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    /// Whether the cursor stands at the end of input (buffer end or NUL).
    pub fn is_eof(&self) -> bool {
        self.peek(0) == 0
    }

    // ── Low-level byte helpers ──────────────────────────────────────────────

    /// Byte at `curr + ahead`, or 0 past the end of the buffer.  NUL doubles
    /// as the end-of-input sentinel throughout the scanner.
    fn peek(&self, ahead: usize) -> u8 {
        self.buf.get(self.curr + ahead).copied().unwrap_or(0)
    }

    /// Build a token spanning `[offset, curr)`.
    fn make(&self, kind: TokenKind, offset: usize, line: u32) -> Token {
        Token {
            kind,
            offset,
            len: self.curr - offset,
            line,
            flags: TokenFlags::empty(),
        }
    }

    // ── Whitespace ──────────────────────────────────────────────────────────

    /// Advance over inter-token whitespace, counting newlines.
    fn skip_whitespace(&mut self) {
        loop {
            match self.peek(0) {
                b'\n' => {
                    self.line_no += 1;
                    self.curr += 1;
                }
                c if is_whitespace(c) => self.curr += 1,
                _ => break,
            }
        }
    }

    // ── Main public API ─────────────────────────────────────────────────────

    /// Scan and return the next [`Token`].
    ///
    /// The oracle is consulted exactly once per `/` that does not open a
    /// comment; see [`ExpressionOracle`].
    ///
    /// # Errors
    ///
    /// [`RatchetError::UnbalancedEof`] when input ends with open brackets;
    /// [`RatchetError::StackOverflow`] / [`RatchetError::StackUnderflow`] /
    /// [`RatchetError::TemplateBracketMismatch`] on bracket-stack violations;
    /// [`RatchetError::UnexpectedByte`] when no lexical rule matches; oracle
    /// errors are propagated verbatim.  The cursor is left on the offending
    /// byte in every case.
    pub fn next_token<O>(&mut self, oracle: &mut O) -> RatchetResult<Token>
    where
        O: ExpressionOracle + ?Sized,
    {
        let resume = std::mem::take(&mut self.resume);

        // A resumed template body owns every byte from the cursor onward:
        // whitespace there is template content, not an inter-token gap.
        if resume != Resume::TemplateBody {
            self.skip_whitespace();
        }
        let offset = self.curr;
        let line = self.line_no;

        // ── EOF ──
        if self.peek(0) == 0 {
            if !self.stack.is_empty() {
                return Err(RatchetError::UnbalancedEof {
                    depth: self.stack.depth(),
                });
            }
            return Ok(self.make(TokenKind::Eof, offset, line));
        }

        // ── Forced continuations from template-literal handling ──
        match resume {
            Resume::SubstitutionOpen => {
                if !self.stack.push(true) {
                    return Err(RatchetError::StackOverflow { offset });
                }
                self.curr += 2; // `${`
                return Ok(self.make(TokenKind::TemplateBrace, offset, line));
            }
            Resume::TemplateBody => {
                return Ok(self.scan_string_tail(b'`', offset, line));
            }
            Resume::None => {}
        }

        let c = self.peek(0);
        let next = self.peek(1);

        // ── Comments win over every other `/` interpretation ──
        if c == b'/' && (next == b'/' || next == b'*') {
            return Ok(self.scan_comment(offset, line));
        }

        let tok = match c {
            // ── Unambiguous single-byte punctuation ──
            b';' => {
                self.curr += 1;
                self.make(TokenKind::Semicolon, offset, line)
            }
            b'?' => {
                self.curr += 1;
                self.make(TokenKind::Ternary, offset, line)
            }
            b':' => {
                self.curr += 1;
                self.make(TokenKind::Colon, offset, line)
            }
            b',' => {
                self.curr += 1;
                self.make(TokenKind::Comma, offset, line)
            }

            // ── Open brackets ──
            b'(' => {
                if !self.stack.push(false) {
                    return Err(RatchetError::StackOverflow { offset });
                }
                self.curr += 1;
                self.make(TokenKind::Paren, offset, line)
            }
            b'[' => {
                if !self.stack.push(false) {
                    return Err(RatchetError::StackOverflow { offset });
                }
                self.curr += 1;
                self.make(TokenKind::Array, offset, line)
            }
            b'{' => {
                if !self.stack.push(false) {
                    return Err(RatchetError::StackOverflow { offset });
                }
                self.curr += 1;
                self.make(TokenKind::Brace, offset, line)
            }

            // ── Close brackets ──
            b')' | b']' => match self.stack.pop() {
                None => return Err(RatchetError::StackUnderflow { offset }),
                Some(true) => {
                    return Err(RatchetError::TemplateBracketMismatch { offset });
                }
                Some(false) => {
                    self.curr += 1;
                    self.make(TokenKind::Close, offset, line)
                }
            },
            b'}' => match self.stack.pop() {
                None => return Err(RatchetError::StackUnderflow { offset }),
                Some(substitution) => {
                    if substitution {
                        // The matching `{` opened a `${…}`; the next token
                        // resumes the surrounding template literal.
                        self.resume = Resume::TemplateBody;
                    }
                    self.curr += 1;
                    self.make(TokenKind::Close, offset, line)
                }
            },

            // ── Division, regexp, or compound slash operator ──
            b'/' => {
                if oracle.has_value()? {
                    let kind = self.scan_operator();
                    self.make(kind, offset, line)
                } else {
                    let flags = self.scan_regexp();
                    let mut tok = self.make(TokenKind::Regexp, offset, line);
                    tok.flags = flags;
                    tok
                }
            }

            // ── Other operator runs ──
            b'=' | b'&' | b'|' | b'^' | b'~' | b'!' | b'%' | b'+' | b'-' | b'*' | b'<'
            | b'>' => {
                let kind = self.scan_operator();
                self.make(kind, offset, line)
            }

            // ── Strings and template literals ──
            b'\'' | b'"' | b'`' => {
                self.curr += 1; // opening quote is part of the token
                self.scan_string_tail(c, offset, line)
            }

            // ── Numbers ──
            b'0'..=b'9' => {
                self.scan_number();
                self.make(TokenKind::Number, offset, line)
            }
            b'.' if next.is_ascii_digit() => {
                self.scan_number();
                self.make(TokenKind::Number, offset, line)
            }

            // ── Dot / spread ──
            b'.' => {
                if next == b'.' && self.peek(2) == b'.' {
                    self.curr += 3;
                    self.make(TokenKind::Spread, offset, line)
                } else {
                    self.curr += 1;
                    self.make(TokenKind::Dot, offset, line)
                }
            }

            // ── Identifier-shaped runs ──
            c if is_lit_start(c) => {
                self.scan_lit();
                let mut tok = self.make(TokenKind::Lit, offset, line);
                if self.lookahead_byte() == b':' {
                    tok.flags |= TokenFlags::LIT_NEXT_COLON;
                }
                tok
            }

            _ => return Err(RatchetError::UnexpectedByte { byte: c, offset }),
        };

        Ok(tok)
    }

    /// Tokenize `source` to completion using the bundled [`HeuristicOracle`].
    /// The [`TokenKind::Eof`] sentinel is **not** included.
    ///
    /// # Errors
    ///
    /// Returns the first error from [`Scanner::next_token`].
    pub fn tokenize_all(source: &'src [u8]) -> RatchetResult<Vec<Token>> {
        let mut scanner = Scanner::new(source);
        let mut oracle = HeuristicOracle::new();
        let mut tokens = Vec::new();
        loop {
            let tok = scanner.next_token(&mut oracle)?;
            if tok.kind == TokenKind::Eof {
                break;
            }
            oracle.observe(tok.kind);
            tokens.push(tok);
        }
        Ok(tokens)
    }

    // ── Comments ────────────────────────────────────────────────────────────

    /// Consume `//` (up to, not including, the newline) or `/*…*/` (closing
    /// delimiter included).  Interior newlines are counted.
    fn scan_comment(&mut self, offset: usize, line: u32) -> Token {
        let block = self.peek(1) == b'*';
        self.curr += 2;
        let mut tok;
        if block {
            let mut terminated = false;
            loop {
                match self.peek(0) {
                    0 => break,
                    b'*' if self.peek(1) == b'/' => {
                        self.curr += 2;
                        terminated = true;
                        break;
                    }
                    b'\n' => {
                        self.line_no += 1;
                        self.curr += 1;
                    }
                    _ => self.curr += 1,
                }
            }
            tok = self.make(TokenKind::Comment, offset, line);
            if !terminated {
                tok.flags |= TokenFlags::UNTERMINATED;
            }
        } else {
            while !matches!(self.peek(0), 0 | b'\n') {
                self.curr += 1;
            }
            tok = self.make(TokenKind::Comment, offset, line);
        }
        tok
    }

    // ── Operators ───────────────────────────────────────────────────────────

    /// Consume an operator run starting at the current byte.  Returns
    /// [`TokenKind::Arrow`] for `=>`, otherwise [`TokenKind::Op`].
    fn scan_operator(&mut self) -> TokenKind {
        let start = self.peek(0);
        // How many identical leading bytes the operator may have: `**`/`<<`
        // doubles, `>>>` triples, everything else stands alone.
        let allowed = match start {
            b'*' | b'<' => 2,
            b'>' => 3,
            _ => 1,
        };

        let mut len = 0;
        let mut c = start;
        while len < allowed {
            len += 1;
            c = self.peek(len);
            if c != start {
                break;
            }
        }

        if start == b'=' && c == b'>' {
            self.curr += 2;
            return TokenKind::Arrow;
        }

        if c == start && matches!(start, b'+' | b'-' | b'|' | b'&') {
            len += 1; // ++ -- || &&, and no further
        } else if c == b'=' {
            len += 1; // assignment suffix
            if (start == b'=' || start == b'!') && self.peek(len) == b'=' {
                len += 1; // === or !==
            }
        }

        self.curr += len;
        TokenKind::Op
    }

    // ── Strings and template literals ───────────────────────────────────────

    /// Scan string content up to `quote`, the cursor standing on the first
    /// content byte.  For backtick strings, a `${` stops the token just
    /// before the `$` and arms the substitution-open continuation.
    fn scan_string_tail(&mut self, quote: u8, offset: usize, line: u32) -> Token {
        let mut terminated = false;
        loop {
            match self.peek(0) {
                0 => break,
                c if c == quote => {
                    self.curr += 1;
                    terminated = true;
                    break;
                }
                b'$' if quote == b'`' && self.peek(1) == b'{' => {
                    // The `${` belongs to the next token.
                    self.resume = Resume::SubstitutionOpen;
                    terminated = true;
                    break;
                }
                b'\\' => {
                    self.curr += 1;
                    match self.peek(0) {
                        0 => break,
                        b'\n' => {
                            self.line_no += 1;
                            self.curr += 1;
                        }
                        _ => self.curr += 1,
                    }
                }
                b'\n' => {
                    // Forbidden in quoted strings by the language, tolerated
                    // here; validation is downstream.
                    self.line_no += 1;
                    self.curr += 1;
                }
                _ => self.curr += 1,
            }
        }
        let mut tok = self.make(TokenKind::String, offset, line);
        if !terminated {
            tok.flags |= TokenFlags::UNTERMINATED;
        }
        tok
    }

    // ── Regular-expression literals ─────────────────────────────────────────

    /// Scan a regexp literal, the cursor standing on the opening `/`.
    /// Returns the flags to stamp on the token.
    fn scan_regexp(&mut self) -> TokenFlags {
        self.curr += 1;
        let mut in_class = false;
        loop {
            match self.peek(0) {
                0 => return TokenFlags::UNTERMINATED,
                b'[' => {
                    in_class = true;
                    self.curr += 1;
                }
                b']' => {
                    in_class = false;
                    self.curr += 1;
                }
                b'/' if !in_class => {
                    self.curr += 1;
                    break;
                }
                b'\\' => {
                    self.curr += 1;
                    match self.peek(0) {
                        0 => return TokenFlags::UNTERMINATED,
                        b'\n' => {
                            self.line_no += 1;
                            self.curr += 1;
                        }
                        _ => self.curr += 1,
                    }
                }
                b'\n' => {
                    // Invalid per the language, tolerated here.
                    self.line_no += 1;
                    self.curr += 1;
                }
                _ => self.curr += 1,
            }
        }
        // Trailing flag characters.
        while self.peek(0).is_ascii_alphanumeric() {
            self.curr += 1;
        }
        TokenFlags::empty()
    }

    // ── Numbers ─────────────────────────────────────────────────────────────

    /// Permissive numeric scan: the first byte plus a maximal run of
    /// alphanumerics and `.`.  `0x1F`, `1e10`, and even `1.2.3` are each one
    /// token; misuse is a downstream diagnostic.
    fn scan_number(&mut self) {
        self.curr += 1;
        while self.peek(0).is_ascii_alphanumeric() || self.peek(0) == b'.' {
            self.curr += 1;
        }
    }

    // ── Identifier-shaped runs ──────────────────────────────────────────────

    /// Maximal identifier-like run.  `\u{…}` escapes are consumed through
    /// the closing `}`, other escapes consume one following byte; none are
    /// validated.
    fn scan_lit(&mut self) {
        loop {
            let c = self.peek(0);
            if c == b'\\' {
                self.curr += 1;
                if self.peek(0) == b'u' && self.peek(1) == b'{' {
                    self.curr += 2;
                    while !matches!(self.peek(0), 0 | b'}') {
                        self.curr += 1;
                    }
                    if self.peek(0) == b'}' {
                        self.curr += 1;
                    }
                } else if self.peek(0) != 0 {
                    self.curr += 1;
                }
            } else if is_lit_continue(c) {
                self.curr += 1;
            } else {
                break;
            }
        }
    }

    // ── Label lookahead ─────────────────────────────────────────────────────

    /// Peek past whitespace and comments to the next significant byte
    /// without moving the cursor.  Returns 0 at end of input, and a
    /// synthetic `` ` `` when the scanner is inside a template literal.
    fn lookahead_byte(&self) -> u8 {
        if self.resume == Resume::TemplateBody {
            return b'`';
        }
        let at = |i: usize| self.buf.get(i).copied().unwrap_or(0);
        let mut p = self.curr;
        loop {
            while is_whitespace(at(p)) {
                p += 1;
            }
            if at(p) != b'/' {
                return at(p);
            }
            match at(p + 1) {
                b'/' => {
                    p += 2;
                    while !matches!(at(p), 0 | b'\n') {
                        p += 1;
                    }
                }
                b'*' => {
                    p += 2;
                    loop {
                        match at(p) {
                            0 => return 0,
                            b'*' if at(p + 1) == b'/' => {
                                p += 2;
                                break;
                            }
                            _ => p += 1,
                        }
                    }
                }
                // Division or regexp; either way, not a `:`.
                _ => return b'/',
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
