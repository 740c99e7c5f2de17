//! Criterion benchmarks for the scanner.
//!
//! Run with: `cargo bench --package ratchet_core`

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use ratchet_core::lexer::scanner::Scanner;

const TARGET_BYTES: usize = 64 * 1024;

// A mix of every token family: comments, strings, a regexp, a template with
// substitutions, operators, and plain statement punctuation.
const MIXED_SNIPPET: &str = r#"
// request dispatcher
const routes = { home: '/', user: /^\/u\/[a-z]+$/i };
function dispatch(path, ctx) {
  let hits = 0;
  for (let i = 0; i < path.length; ++i) {
    hits += path[i] === '/' ? 1 : 0;
  }
  return `${ctx.base}/${path}?hits=${hits / 2}`;
}
"#;

const TEMPLATE_SNIPPET: &str =
    "let row = `cell ${a} sep ${`inner ${b + 1}`} tail ${c[0]} end`;\n";

const COMMENT_SNIPPET: &str = "/* block\nspanning\nlines */ let x = 1; // trailing note\n";

fn source_of(snippet: &str) -> String {
    snippet.repeat(TARGET_BYTES / snippet.len() + 1)
}

fn bench_tokenize_mixed(c: &mut Criterion) {
    let src = source_of(MIXED_SNIPPET);
    c.bench_function("tokenize_mixed_64k", |b| {
        b.iter(|| {
            let tokens = Scanner::tokenize_all(black_box(src.as_bytes())).unwrap();
            black_box(tokens.len());
        });
    });
}

fn bench_tokenize_template_heavy(c: &mut Criterion) {
    let src = source_of(TEMPLATE_SNIPPET);
    c.bench_function("tokenize_template_heavy_64k", |b| {
        b.iter(|| {
            let tokens = Scanner::tokenize_all(black_box(src.as_bytes())).unwrap();
            black_box(tokens.len());
        });
    });
}

fn bench_tokenize_comment_heavy(c: &mut Criterion) {
    let src = source_of(COMMENT_SNIPPET);
    c.bench_function("tokenize_comment_heavy_64k", |b| {
        b.iter(|| {
            let tokens = Scanner::tokenize_all(black_box(src.as_bytes())).unwrap();
            black_box(tokens.len());
        });
    });
}

criterion_group!(
    benches,
    bench_tokenize_mixed,
    bench_tokenize_template_heavy,
    bench_tokenize_comment_heavy
);
criterion_main!(benches);
