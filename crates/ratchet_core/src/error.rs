//! Error types for the ratchet scanner.

use thiserror::Error;

/// All errors that can be produced by the scanner.
///
/// Every variant that points at the source carries the byte offset of the
/// offending position; the scanner's cursor is left parked there, so callers
/// can use either for diagnostics.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RatchetError {
    /// An open bracket would exceed the fixed stack capacity.
    #[error("bracket stack overflow at byte {offset}")]
    StackOverflow {
        /// Offset of the bracket that did not fit.
        offset: usize,
    },

    /// A `)`, `]`, or `}` appeared with no matching open bracket.
    #[error("unmatched closing bracket at byte {offset}")]
    StackUnderflow {
        /// Offset of the stray closing bracket.
        offset: usize,
    },

    /// A `)` or `]` closed a `${` substitution that only `}` may close.
    #[error("template substitution closed by the wrong bracket at byte {offset}")]
    TemplateBracketMismatch {
        /// Offset of the mismatched closing bracket.
        offset: usize,
    },

    /// Input ended while brackets were still open.
    #[error("end of input with {depth} unclosed bracket(s)")]
    UnbalancedEof {
        /// How many brackets were still open.
        depth: usize,
    },

    /// The expression-context oracle reported a failure.
    #[error("expression oracle failed: {0}")]
    Oracle(String),

    /// No lexical rule matched the byte at `offset`.
    #[error("unrecognized byte {byte:#04x} at byte {offset}")]
    UnexpectedByte {
        /// The byte that matched no rule.
        byte: u8,
        /// Its offset in the buffer.
        offset: usize,
    },
}

/// Convenient `Result` alias for fallible scanner operations.
pub type RatchetResult<T> = Result<T, RatchetError>;
