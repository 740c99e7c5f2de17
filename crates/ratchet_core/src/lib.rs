//! `ratchet_core` — streaming lexical scanner for JavaScript-family source
//! text.
//!
//! The scanner turns a byte buffer into a stream of offset/length tokens, one
//! per call, resolving the `/` division-versus-regexp ambiguity through a
//! caller-supplied [`lexer::oracle::ExpressionOracle`] and threading template
//! literals (`` `…${expr}…` ``) through a bracket bit stack.
//!
//! # Crate layout
//!
//! - [`error`] — Scanner error types and [`error::RatchetResult`] alias.
//! - [`lexer`] — Scanner state, tokens, bracket stack, and the oracle.

/// Scanner error types and [`RatchetResult`](error::RatchetResult) alias.
pub mod error;
/// Streaming lexical analysis: scanner, tokens, bracket stack, oracle.
pub mod lexer;
