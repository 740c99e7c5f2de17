#![no_main]

use libfuzzer_sys::fuzz_target;
use ratchet_core::lexer::scanner::Scanner;

fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\x0b' | b'\x0c' | b'\r')
}

fuzz_target!(|data: &[u8]| {
    // A NUL terminates scanning early and legitimately leaves a tail behind.
    if data.contains(&0) {
        return;
    }

    let Ok(tokens) = Scanner::tokenize_all(data) else {
        return;
    };

    // Tokens plus inter-token whitespace must reassemble the buffer.
    let mut pos = 0;
    for tok in &tokens {
        assert!(tok.offset >= pos, "overlapping or unordered tokens");
        assert!(tok.end() <= data.len(), "token runs past the buffer");
        assert!(
            data[pos..tok.offset].iter().all(|&b| is_whitespace(b)),
            "non-whitespace between tokens"
        );
        pos = tok.end();
    }
    assert!(
        data[pos..].iter().all(|&b| is_whitespace(b)),
        "unconsumed tail"
    );

    assert_eq!(
        Scanner::tokenize_all(data),
        Ok(tokens),
        "scanning must be deterministic"
    );
});
