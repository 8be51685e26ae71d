// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Spanlabel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Spanlabel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};

use spanlabel::span::{InferredSpan, MarkerEnd, TokenSequence};

// Benchmark identity (keep stable):
// - Group names in this file: `span.infer`, `span.drag`
// - Case IDs (the string after the `/`) are the token counts of the edited segment
//   (`tokens_16`, `tokens_128`, `tokens_1024`) and must remain stable across refactors.
// - If implementations move/deduplicate, update the wiring but do not rename
//   group or case IDs.
fn checksum_span(span: &InferredSpan) -> u64 {
    let mut acc = 0u64;
    acc = acc.wrapping_mul(131).wrapping_add(span.offset as u64);
    acc = acc.wrapping_mul(131).wrapping_add(span.offset_end as u64);
    acc = acc
        .wrapping_mul(131)
        .wrapping_add(span.between.iter().filter(|flag| **flag).count() as u64);
    acc
}

const TOKEN_COUNTS: [usize; 3] = [16, 128, 1024];

fn benches_infer(c: &mut Criterion) {
    let mut group = c.benchmark_group("span.infer");

    for tokens in TOKEN_COUNTS {
        let sequence = TokenSequence::around(tokens, tokens / 3, tokens / 3 + 4);
        group.throughput(Throughput::Elements(sequence.len() as u64));
        group.bench_function(format!("tokens_{tokens}"), move |b| {
            b.iter(|| {
                let span = black_box(&sequence).infer(black_box(1000));
                black_box(checksum_span(&span))
            })
        });
    }

    group.finish();
}

fn benches_drag(c: &mut Criterion) {
    let mut group = c.benchmark_group("span.drag");

    // Drags the end marker across the whole segment, re-inferring after every drop.
    for tokens in TOKEN_COUNTS {
        let template = TokenSequence::around(tokens, 0, 1);
        group.throughput(Throughput::Elements(tokens as u64));
        group.bench_function(format!("tokens_{tokens}"), move |b| {
            b.iter_batched(
                || template.clone(),
                |mut sequence| {
                    let mut acc = 0u64;
                    for slot in 2..sequence.len() {
                        sequence
                            .move_marker(MarkerEnd::End, slot)
                            .expect("move_marker");
                        let span = sequence.infer(0);
                        acc = acc.wrapping_mul(131).wrapping_add(checksum_span(&span));
                    }
                    black_box(acc)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(benches, benches_infer, benches_drag);
criterion_main!(benches);
