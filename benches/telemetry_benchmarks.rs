use axiom_intake::evidence::{annotate, Region};
use axiom_intake::ledger::{ScanRecord, SessionLedger};
use axiom_intake::scan::{classify_with, Classification, Confidence, SeededRandom, Verdict};
use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

// Helper to build a ledger with `n` alternating records
fn setup_ledger(n: usize) -> SessionLedger {
    let mut ledger = SessionLedger::new();
    for i in 0..n {
        let verdict = if i % 3 == 0 {
            Verdict::Tampered
        } else {
            Verdict::Authentic
        };
        ledger.append(ScanRecord::new(
            format!("study_{i}.png"),
            Utc.timestamp_opt(1_700_000_000 + i as i64, 0)
                .single()
                .expect("valid timestamp"),
            Classification {
                verdict,
                confidence: Confidence::from_tenths(880 + (i % 120) as u16),
            },
        ));
    }
    ledger
}

// 1. Ledger snapshot (telemetry is recomputed on every read)
fn bench_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("ledger_snapshot");
    for size in [10usize, 100, 1000] {
        let ledger = setup_ledger(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &ledger, |b, ledger| {
            b.iter(|| black_box(ledger.snapshot()));
        });
    }
    group.finish();
}

// 2. Classification heuristic
fn bench_classify(c: &mut Criterion) {
    let names = [
        "scan.jpg",
        "scan_tempered.png",
        "xray_manipulated.jpg",
        "Röntgen_Thorax.png",
        "ankle_followup_2024.tiff",
    ];
    let mut source = SeededRandom::new(42);

    c.bench_function("classify_names", |b| {
        b.iter(|| {
            for name in &names {
                black_box(classify_with(black_box(name), &mut source));
            }
        })
    });
}

// 3. Region annotation
fn bench_annotate(c: &mut Criterion) {
    let region = Region::new(0.58, 0.22, 0.22, 0.22);
    c.bench_function("annotate_region", |b| {
        b.iter(|| black_box(annotate(black_box(&region))))
    });
}

criterion_group!(benches, bench_snapshot, bench_classify, bench_annotate);
criterion_main!(benches);
