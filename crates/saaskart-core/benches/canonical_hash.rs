// SPDX-License-Identifier: Apache-2.0

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use saaskart_core::canonical;
use serde_json::json;

fn bench_stable_json_hash(c: &mut Criterion) {
    let payload = json!({
        "filters": {
            "countries": ["US", "DE", "FR"],
            "categories": ["crm", "analytics"],
            "revenue": {"min": 1_000_000.0, "max": 50_000_000.0},
            "query": "billing"
        },
        "sort": "revenue",
        "limit": 25
    });

    c.bench_function("stable_json_hash_hex", |b| {
        b.iter(|| canonical::stable_json_hash_hex(black_box(&payload)).expect("stable hash"))
    });
}

criterion_group!(benches, bench_stable_json_hash);
criterion_main!(benches);
