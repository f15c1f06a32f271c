use std::hint::black_box;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use micro_message::negotiation::{AcceptList, QualityList};
use micro_message::protocol::{Method, QueryString};

const ACCEPT_HEADERS: &[(&str, &str)] = &[
    (
        "browser",
        "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.9",
    ),
    ("api", "application/json;q=0.9, text/plain;q=0.5, */*;q=0.1"),
    ("any", "*/*"),
];

fn benchmark_accept(criterion: &mut Criterion) {
    let offered = [mime::APPLICATION_JSON, mime::TEXT_HTML, mime::TEXT_PLAIN];
    let mut group = criterion.benchmark_group("accept_best_match");

    for (name, header) in ACCEPT_HEADERS {
        group.bench_with_input(BenchmarkId::from_parameter(name), header, |b, header| {
            b.iter(|| {
                let list = AcceptList::parse(black_box(header));
                black_box(list.best_match(&offered))
            });
        });
    }

    group.finish();
}

fn benchmark_quality(criterion: &mut Criterion) {
    criterion.bench_function("accept_language_preferred", |b| {
        b.iter(|| {
            let list = QualityList::parse(black_box("zh-CN,zh;q=0.9,en-US;q=0.8,en;q=0.7"));
            black_box(list.preferred(&["en", "zh", "fr"]))
        });
    });
}

fn benchmark_query(criterion: &mut Criterion) {
    criterion.bench_function("query_parse", |b| {
        b.iter(|| {
            let query = QueryString::parse(black_box("?a=1,2,3&b&c=hello%20world&page=7&status=open,!archived"));
            black_box((query.get_or("page", 1_u32), query.filter("status").matches("open")))
        });
    });
}

fn benchmark_method(criterion: &mut Criterion) {
    criterion.bench_function("method_parse", |b| {
        b.iter(|| black_box(Method::parse(black_box("propfind"))));
    });
}

criterion_group!(negotiation, benchmark_accept, benchmark_quality, benchmark_query, benchmark_method);
criterion_main!(negotiation);
