use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use plainxml::{from_str, to_string, Document, WriteConfig};

const SIMPLE_XML: &str = "<root><child>text</child></root>";
const ATTR_XML: &str = "<root id=\"1\" name=\"test\"><item value=\"42\"/></root>";

fn wide_document(children: usize) -> Document {
    let mut doc = Document::new("catalog");
    let root = doc.root();
    for i in 0..children {
        let item = doc.append_child(root, "item");
        doc.node_mut(item).add_attribute("id", i.to_string());
        doc.append_child_with_value(item, "name", format!("item {i}"));
        doc.append_child_with_value(item, "price", "9.99");
    }
    doc
}

fn bench_simple(c: &mut Criterion) {
    c.bench_function("plainxml_simple", |b| {
        b.iter(|| from_str(black_box(SIMPLE_XML)))
    });
}

fn bench_attr(c: &mut Criterion) {
    c.bench_function("plainxml_attr", |b| b.iter(|| from_str(black_box(ATTR_XML))));
}

fn bench_parse_wide(c: &mut Criterion) {
    let text = to_string(&wide_document(1_000), WriteConfig::default());
    c.bench_function("plainxml_parse_1000_items", |b| {
        b.iter(|| from_str(black_box(&text)))
    });
}

fn bench_write_wide(c: &mut Criterion) {
    let doc = wide_document(1_000);
    c.bench_function("plainxml_write_1000_items", |b| {
        b.iter(|| to_string(black_box(&doc), WriteConfig::default()))
    });
}

criterion_group!(
    benches,
    bench_simple,
    bench_attr,
    bench_parse_wide,
    bench_write_wide
);
criterion_main!(benches);
