//! Criterion benchmarks for the touchid-core line editor.
//!
//! Measures a full find-and-replace pass over in-memory PAM files of
//! increasing size, plus token-sequence matching on its own.
//!
//! Run with:
//! ```bash
//! cargo bench --package touchid-core --bench editor_bench
//! ```

use std::io::Cursor;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use touchid_core::{find_and_replace, DirectiveLine, FileSnapshot, TouchIdMode};

// ── Fixtures ──────────────────────────────────────────────────────────────────

/// Builds a PAM-like file with `filler` unrelated lines followed by the
/// disabled Touch ID directive.
fn make_file(filler: usize) -> String {
    let mut content = String::from("# sudo_local: local config file which survives system update\n");
    for i in 0..filler {
        content.push_str(&format!("auth       optional       pam_module_{i}.so\n"));
    }
    content.push_str("#auth sufficient pam_tid.so\n");
    content
}

// ── Benchmarks ────────────────────────────────────────────────────────────────

fn bench_find_and_replace(c: &mut Criterion) {
    let find = TouchIdMode::Disabled.directive();
    let replace = TouchIdMode::Enabled.directive();
    let mut group = c.benchmark_group("find_and_replace");

    for filler in [0usize, 16, 256] {
        let content = make_file(filler);
        group.bench_with_input(BenchmarkId::from_parameter(filler), &content, |b, content| {
            b.iter(|| {
                let mut target = Cursor::new(content.as_bytes().to_vec());
                black_box(find_and_replace(&mut target, &find, &replace).unwrap())
            })
        });
    }

    group.finish();
}

fn bench_rewrite_into(c: &mut Criterion) {
    let find = TouchIdMode::Disabled.directive();
    let replace = TouchIdMode::Enabled.directive();
    let snapshot = FileSnapshot::from_text(&make_file(256));

    c.bench_function("rewrite_into_256_lines", |b| {
        b.iter(|| {
            let mut out = Vec::with_capacity(16 * 1024);
            black_box(snapshot.rewrite_into(&find, &replace, &mut out).unwrap())
        })
    });
}

fn bench_matches(c: &mut Criterion) {
    let line = TouchIdMode::Enabled.directive();
    let candidates = [
        "auth sufficient pam_tid.so",
        "auth    sufficient\tpam_tid.so",
        "#auth sufficient pam_tid.so",
        "auth       optional       pam_module_1.so",
    ];

    c.bench_function("directive_matches", |b| {
        b.iter(|| {
            for raw in candidates {
                black_box(line.matches(black_box(raw)));
            }
        })
    });

    c.bench_function("directive_parse", |b| {
        b.iter(|| black_box(DirectiveLine::parse(black_box("auth   sufficient   pam_tid.so"))))
    });
}

criterion_group!(benches, bench_find_and_replace, bench_rewrite_into, bench_matches);
criterion_main!(benches);
