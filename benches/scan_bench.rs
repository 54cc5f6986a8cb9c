//! Benchmark of the scan kernel over representative pattern-set sizes,
//! grounded in the teacher's `benches/paraglob_bench.rs` structure: one
//! group per input shape, `black_box` around the hot call.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pfac_mpm::{MatchSink, Mpm, PatternFlags, ThreadContext};

fn build_matcher(pattern_count: usize) -> Mpm {
    let mut mpm = Mpm::new();
    for i in 0..pattern_count {
        let pattern = format!("needle{i:04}");
        mpm.add_pattern_case_sensitive(pattern.as_bytes(), i as u32, PatternFlags::default())
            .unwrap();
    }
    mpm.prepare().unwrap();
    mpm
}

fn generate_haystack(size: usize, match_rate: &str) -> Vec<u8> {
    let mut text = String::with_capacity(size);
    let mut i = 0usize;
    while text.len() < size {
        match match_rate {
            "dense" => text.push_str(&format!("needle{:04} ", i % 200)),
            "sparse" => {
                if i % 20 == 0 {
                    text.push_str(&format!("needle{:04} ", i % 200));
                } else {
                    text.push_str("filler text here ");
                }
            }
            _ => text.push_str("filler text with no matches at all "),
        }
        i += 1;
    }
    text.truncate(size);
    text.into_bytes()
}

fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan");

    for &pattern_count in &[10usize, 100, 1000] {
        let mpm = build_matcher(pattern_count);
        for match_rate in ["none", "sparse", "dense"] {
            let haystack = generate_haystack(64 * 1024, match_rate);
            group.throughput(Throughput::Bytes(haystack.len() as u64));
            group.bench_with_input(
                BenchmarkId::new(format!("{pattern_count}_patterns_{match_rate}"), haystack.len()),
                &haystack,
                |b, haystack| {
                    let mut thread_ctx = ThreadContext::new();
                    let mut sink = MatchSink::new(mpm.max_id() + 1);
                    b.iter(|| {
                        sink.clear();
                        black_box(mpm.search(&mut thread_ctx, &mut sink, black_box(haystack)));
                    });
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_scan);
criterion_main!(benches);
