// Criterion benchmarks for tnorm-hi.
//
// Grammar construction is measured once with a cold cache directory; the
// other benchmarks reuse the process-wide grammars.
//
// Run:
//   cargo bench -p tnorm-hi

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use tnorm_hi::{Normalizer, NormalizerConfig};

const SENTENCES: [&str; 6] = [
    "मैं बाज़ार से -12kg चावल लाया।",
    "यह इमारत 1000yr पुरानी है और वह पेड़ 70yr का है।",
    "उसे 1.5kg चीनी और 2.5 घंटे चाहिए।",
    "कमरा 12x14 का है ( लगभग ) .",
    "Flat 12, MG Road पर मिलो।",
    "पता : 12 पार्क स्ट्रीट मुंबई 400001 है।",
];

fn bench_build(c: &mut Criterion) {
    let dir = std::env::temp_dir().join(format!("tnorm-bench-{}", std::process::id()));
    c.bench_function("build_with_archives", |b| {
        b.iter(|| {
            let config = NormalizerConfig {
                cache_dir: Some(dir.clone()),
                ..NormalizerConfig::default()
            };
            black_box(Normalizer::new(config).expect("normalizer"))
        })
    });
    let _ = std::fs::remove_dir_all(&dir);
}

fn bench_normalize_sentences(c: &mut Criterion) {
    let normalizer = Normalizer::new(NormalizerConfig::default()).expect("normalizer");
    c.bench_function("normalize_sentences", |b| {
        b.iter(|| {
            for sentence in SENTENCES {
                black_box(normalizer.normalize(black_box(sentence)).expect("normalize"));
            }
        })
    });
}

fn bench_candidates(c: &mut Criterion) {
    let normalizer = Normalizer::new(NormalizerConfig {
        deterministic: false,
        ..NormalizerConfig::default()
    })
    .expect("normalizer");
    c.bench_function("normalize_candidates_5", |b| {
        b.iter(|| {
            for sentence in SENTENCES {
                black_box(
                    normalizer
                        .normalize_candidates(black_box(sentence), 5)
                        .expect("candidates"),
                );
            }
        })
    });
}

fn bench_tag(c: &mut Criterion) {
    let normalizer = Normalizer::new(NormalizerConfig::default()).expect("normalizer");
    c.bench_function("tag_sentences", |b| {
        b.iter(|| {
            for sentence in SENTENCES {
                black_box(normalizer.tag(black_box(sentence)).expect("tag"));
            }
        })
    });
}

criterion_group!(
    benches,
    bench_build,
    bench_normalize_sentences,
    bench_candidates,
    bench_tag
);
criterion_main!(benches);
