#![no_main]

use libfuzzer_sys::fuzz_target;
use ratchet_core::lexer::oracle::HeuristicOracle;
use ratchet_core::lexer::scanner::Scanner;
use ratchet_core::lexer::token::TokenKind;

// Alphabet biased toward template-literal and bracket machinery so the
// fuzzer spends its time in the resumption protocol and the bit stack.
const ALPHABET: &[u8] = b"`${}()[]\\ \nabz19+=.:,;'\"/*";

fuzz_target!(|data: &[u8]| {
    let src: Vec<u8> = data
        .iter()
        .map(|&b| ALPHABET[b as usize % ALPHABET.len()])
        .collect();

    let mut scanner = Scanner::new(&src);
    let mut oracle = HeuristicOracle::new();
    loop {
        match scanner.next_token(&mut oracle) {
            Err(_) => break,
            Ok(tok) if tok.kind == TokenKind::Eof => {
                // Reaching EOF (rather than an unbalanced-input error) means
                // every bracket — template or ordinary — was matched.
                assert_eq!(scanner.depth(), 0, "EOF token implies balanced brackets");
                break;
            }
            Ok(tok) => oracle.observe(tok.kind),
        }
    }
});
