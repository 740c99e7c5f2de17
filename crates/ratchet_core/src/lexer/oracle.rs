//! Expression-context oracle: decides whether `/` divides or opens a regexp.
//!
//! The scanner cannot classify a `/` on its own — `a / b` divides while
//! `a = /b/` opens a regular-expression literal, and only the surrounding
//! grammar knows which.  The oracle is the capability through which that
//! knowledge is injected: typically a parser, but any closure will do.

use crate::error::RatchetResult;
use crate::lexer::token::TokenKind;

/// Callback consulted exactly once per `/` that is not part of a comment.
///
/// `Ok(true)` means a value just ended and the slash is division (or `/=`);
/// `Ok(false)` means no value is pending and the slash opens a
/// regular-expression literal.  An `Err` aborts the token call and surfaces
/// verbatim to the scanner's caller.
///
/// Implementations must not touch the source buffer or reenter the scanner.
pub trait ExpressionOracle {
    /// Report whether the current position follows a completed value.
    fn has_value(&mut self) -> RatchetResult<bool>;
}

impl<F> ExpressionOracle for F
where
    F: FnMut() -> RatchetResult<bool>,
{
    fn has_value(&mut self) -> RatchetResult<bool> {
        self()
    }
}

/// Last-token heuristic oracle for callers without a real parser.
///
/// Tracks the most recent significant token kind fed to [`observe`] and
/// reports a value whenever that kind can terminate an expression (see
/// [`TokenKind::ends_value`]).  Comments are ignored, matching how trivia
/// sits between grammar productions.
///
/// [`observe`]: HeuristicOracle::observe
#[derive(Debug, Clone, Default)]
pub struct HeuristicOracle {
    last: Option<TokenKind>,
}

impl HeuristicOracle {
    /// A fresh oracle: at the start of input no value is pending, so an
    /// initial `/` opens a regexp.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an emitted token.  Comment tokens are insignificant and leave
    /// the state untouched.
    pub fn observe(&mut self, kind: TokenKind) {
        if kind != TokenKind::Comment {
            self.last = Some(kind);
        }
    }
}

impl ExpressionOracle for HeuristicOracle {
    fn has_value(&mut self) -> RatchetResult<bool> {
        Ok(self.last.is_some_and(TokenKind::ends_value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_oracle_expects_regexp() {
        let mut oracle = HeuristicOracle::new();
        assert_eq!(oracle.has_value(), Ok(false));
    }

    #[test]
    fn test_value_kinds_flip_to_division() {
        let mut oracle = HeuristicOracle::new();
        oracle.observe(TokenKind::Lit);
        assert_eq!(oracle.has_value(), Ok(true));
        oracle.observe(TokenKind::Op);
        assert_eq!(oracle.has_value(), Ok(false));
        oracle.observe(TokenKind::Close);
        assert_eq!(oracle.has_value(), Ok(true));
    }

    #[test]
    fn test_comments_do_not_disturb_state() {
        let mut oracle = HeuristicOracle::new();
        oracle.observe(TokenKind::Number);
        oracle.observe(TokenKind::Comment);
        assert_eq!(oracle.has_value(), Ok(true));
    }

    #[test]
    fn test_closure_oracle() {
        let mut answers = [false, true].into_iter();
        let mut oracle = move || -> RatchetResult<bool> { Ok(answers.next().unwrap()) };
        assert_eq!(ExpressionOracle::has_value(&mut oracle), Ok(false));
        assert_eq!(ExpressionOracle::has_value(&mut oracle), Ok(true));
    }
}
