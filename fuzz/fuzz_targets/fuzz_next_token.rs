#![no_main]

use libfuzzer_sys::fuzz_target;
use ratchet_core::lexer::oracle::HeuristicOracle;
use ratchet_core::lexer::scanner::Scanner;
use ratchet_core::lexer::token::TokenKind;

fuzz_target!(|data: &[u8]| {
    let mut scanner = Scanner::new(data);
    let mut oracle = HeuristicOracle::new();
    let mut last_line = 1;

    // Zero-length tokens exist (EOF, empty template segments) but never two
    // in a row, so `2 * len + 2` calls bound any stream that terminates.
    for _ in 0..=2 * data.len() + 2 {
        match scanner.next_token(&mut oracle) {
            // A hard failure parks the cursor on the offending byte.
            Err(_) => {
                assert!(scanner.offset() <= data.len(), "cursor out of bounds on error");
                return;
            }
            Ok(tok) => {
                assert!(tok.end() <= data.len(), "token runs past the buffer");
                assert!(scanner.offset() <= data.len(), "cursor past end of buffer");
                assert!(tok.line >= last_line, "line numbers must not decrease");
                last_line = tok.line;
                if tok.kind == TokenKind::Eof {
                    assert_eq!(tok.len, 0, "EOF must be zero-length");
                    return;
                }
                oracle.observe(tok.kind);
            }
        }
    }
    panic!("scanner failed to terminate");
});
