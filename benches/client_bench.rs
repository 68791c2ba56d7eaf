// Copyright (c) 2026 Bountyy Oy. All rights reserved.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fgsm_client::attack::inline_png;
use fgsm_client::auth::{inspect_token, token::unsigned_token};

fn token_inspection_benchmark(c: &mut Criterion) {
    let valid = unsigned_token(&serde_json::json!({ "user_id": 1, "exp": 4_102_444_800i64 }));
    let tokens = vec![valid.as_str(), "not-a-token", "abc.def.ghi", "a.b c.d"];

    c.bench_function("inspect_token", |b| {
        b.iter(|| {
            for token in &tokens {
                black_box(inspect_token(token));
            }
        })
    });
}

fn normalization_benchmark(c: &mut Criterion) {
    let payload = "iVBORw0KGgo".repeat(4096);

    c.bench_function("inline_png", |b| {
        b.iter(|| black_box(inline_png(&payload)))
    });
}

criterion_group!(benches, token_inspection_benchmark, normalization_benchmark);
criterion_main!(benches);
