use criterion::{criterion_group, criterion_main, Criterion};
use entity_core::model::Attribute;
use entity_core::score::score;
use entity_core::translate_text;
use std::collections::BTreeMap;

fn bench_translate(c: &mut Criterion) {
    let text = r#"first_name:Allie last_name:"Van Dyke" city:Austin city:Dallas 202-555-1234 allie@example.com"#;
    c.bench_function("translate_search_bar", |b| b.iter(|| translate_text(text)));
}

fn bench_score(c: &mut Criterion) {
    let mut attributes = BTreeMap::new();
    let names: Vec<String> = (0..16).map(|i| format!("attr_{i}")).collect();
    for (i, name) in names.iter().enumerate() {
        attributes.insert(name.clone(), Attribute { score: Some(0.55 + i as f64 * 0.02), ..Default::default() });
    }
    c.bench_function("score_resolver_16", |b| b.iter(|| score(names.as_slice(), &attributes)));
}

criterion_group!(benches, bench_translate, bench_score);
criterion_main!(benches);
