//! Benchmarks for ex command execution over a large buffer.

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use std::time::Duration;
use vim_core::{RopeEditor, Session, execute};

fn generate_sample_text(lines: usize) -> String {
    let mut text = String::new();
    for i in 0..lines {
        text.push_str(&format!(
            "This is line {} with some sample text for benchmarking ex commands.\n",
            (i * 7919) % lines + 1
        ));
        if i % 10 == 0 {
            text.push('\n');
        }
    }
    text
}

fn bench_command(c: &mut Criterion, name: &str, command: &str) {
    let text = generate_sample_text(1000);
    c.bench_function(name, |b| {
        b.iter_batched(
            || (Session::new(), RopeEditor::new(&text)),
            |(mut session, mut editor)| {
                let _ = execute(&mut session, &mut editor, black_box(command));
                black_box(editor.contents().len())
            },
            BatchSize::SmallInput,
        );
    });
}

fn benchmark_substitute(c: &mut Criterion) {
    bench_command(c, "substitute (%s///g)", r"%s/\<\(\w\)\(\w*\)\>/\u\1\2/g");
}

fn benchmark_global(c: &mut Criterion) {
    bench_command(c, "global delete (:g/7/d)", "g/7/d");
    bench_command(c, "global move (:g/^/m0)", "g/^/m0");
}

fn benchmark_sort(c: &mut Criterion) {
    bench_command(c, "numeric sort (:sort n)", "sort n");
}

fn benchmark_ranges(c: &mut Criterion) {
    bench_command(c, "search range delete", "/line 500 /,/line 900 /d");
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .measurement_time(Duration::from_secs(10))
        .sample_size(50);
    targets = benchmark_substitute,
              benchmark_global,
              benchmark_sort,
              benchmark_ranges
}
criterion_main!(benches);
