//! Property-based tests for the scanner's universal invariants.
//!
//! Two input populations: fully arbitrary (NUL-free) byte soup, where the
//! invariants must hold on every *successful* run, and a grammar-biased
//! population of balanced bracket/template nests that must always scan.

use proptest::prelude::*;
use ratchet_core::error::RatchetError;
use ratchet_core::lexer::oracle::HeuristicOracle;
use ratchet_core::lexer::scanner::Scanner;
use ratchet_core::lexer::token::{Token, TokenKind};

fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\x0b' | b'\x0c' | b'\r')
}

/// Byte accounting: tokens are ordered, in bounds, and every inter-token gap
/// is whitespace, so tokens plus gaps reassemble the buffer.
fn assert_covers(src: &[u8], tokens: &[Token]) {
    let mut pos = 0;
    for tok in tokens {
        assert!(tok.offset >= pos, "tokens out of order at byte {}", tok.offset);
        assert!(
            src[pos..tok.offset].iter().all(|&b| is_whitespace(b)),
            "non-whitespace gap before byte {}",
            tok.offset
        );
        assert!(tok.end() <= src.len(), "token runs past the buffer");
        pos = tok.end();
    }
    assert!(
        src[pos..].iter().all(|&b| is_whitespace(b)),
        "unconsumed tail after byte {pos}"
    );
}

fn expected_line(src: &[u8], offset: usize) -> u32 {
    1 + src[..offset].iter().filter(|&&b| b == b'\n').count() as u32
}

// ─────────────────────────────────────────────────────────────────────────────
// Strategies
// ─────────────────────────────────────────────────────────────────────────────

fn arb_bytes() -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(1u8..=255, 0..256)
}

/// Fragments that always lex cleanly on their own.  Slashes appear only
/// inside comments so the bundled heuristic oracle is never exercised on an
/// ambiguous position.
fn arb_fragment() -> impl Strategy<Value = String> {
    let fixed = proptest::sample::select(vec![
        "'str'",
        "\"q\"",
        "`tpl`",
        "...",
        "=>",
        ">>>=",
        "===",
        "++",
        ";",
        ",",
        "?",
        ":",
        ".",
        "// note\n",
        "/* note */",
    ]);
    prop_oneof![
        "[a-z_$][a-zA-Z0-9_$]{0,6}",
        "[0-9]{1,4}",
        fixed.prop_map(|s| s.to_string()),
    ]
}

/// Balanced bracket and template nests around lexable fillers.
fn arb_balanced() -> impl Strategy<Value = String> {
    arb_fragment().prop_recursive(4, 64, 8, |inner| {
        (
            inner.clone(),
            prop_oneof![
                Just(("(", ")")),
                Just(("[", "]")),
                Just(("{", "}")),
                Just(("`${", "}`")),
            ],
            inner,
        )
            .prop_map(|(a, (open, close), b)| format!("{a} {open} {b} {close}"))
    })
}

fn arb_whitespace() -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(
        prop_oneof![
            Just(b' '),
            Just(b'\t'),
            Just(b'\n'),
            Just(b'\r'),
            Just(b'\x0b'),
            Just(b'\x0c'),
        ],
        0..64,
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Properties
// ─────────────────────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn coverage_on_arbitrary_bytes(src in arb_bytes()) {
        // Lexically broken input errors out; every successful run must
        // account for each byte exactly once.
        if let Ok(tokens) = Scanner::tokenize_all(&src) {
            assert_covers(&src, &tokens);
        }
    }

    #[test]
    fn scanning_is_deterministic(src in arb_bytes()) {
        prop_assert_eq!(Scanner::tokenize_all(&src), Scanner::tokenize_all(&src));
    }

    #[test]
    fn balanced_input_scans_clean(src in arb_balanced()) {
        let bytes = src.as_bytes();
        let tokens = Scanner::tokenize_all(bytes).unwrap();
        assert_covers(bytes, &tokens);
    }

    #[test]
    fn line_numbers_are_monotonic_and_exact(src in arb_balanced()) {
        let bytes = src.as_bytes();
        let tokens = Scanner::tokenize_all(bytes).unwrap();
        let mut last = 1;
        for tok in &tokens {
            prop_assert!(tok.line >= last, "line numbers went backwards");
            prop_assert_eq!(tok.line, expected_line(bytes, tok.offset));
            last = tok.line;
        }
    }

    #[test]
    fn balanced_input_ends_at_zero_depth(src in arb_balanced()) {
        let mut scanner = Scanner::from_str(&src);
        let mut oracle = HeuristicOracle::new();
        loop {
            let tok = scanner.next_token(&mut oracle).unwrap();
            if tok.kind == TokenKind::Eof {
                break;
            }
            oracle.observe(tok.kind);
        }
        prop_assert_eq!(scanner.depth(), 0);
    }

    #[test]
    fn unmatched_open_bracket_is_reported(src in arb_balanced()) {
        let unbalanced = format!("( {src}");
        prop_assert_eq!(
            Scanner::tokenize_all(unbalanced.as_bytes()),
            Err(RatchetError::UnbalancedEof { depth: 1 })
        );
    }

    #[test]
    fn whitespace_only_yields_no_tokens(src in arb_whitespace()) {
        prop_assert_eq!(Scanner::tokenize_all(&src), Ok(vec![]));
    }
}
