use std::hint::black_box;
use bencher::{TestCase, TestFile};
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use micro_message::codec::{HeadEncoder, RequestHeadDecoder};
use micro_message::protocol::{Body, Request};
use tokio_util::bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

static SMALL_HEADER: TestFile = TestFile::new("get_small.txt", include_str!("../resources/request/get_small.txt"));
static LARGE_HEADER: TestFile = TestFile::new("get_large.txt", include_str!("../resources/request/get_large.txt"));

fn create_test_cases() -> Vec<TestCase> {
    vec![TestCase::small("small_head", SMALL_HEADER), TestCase::large("large_head", LARGE_HEADER)]
}

fn benchmark_head_decoder(criterion: &mut Criterion) {
    let test_cases = create_test_cases();
    let mut group = criterion.benchmark_group("head_decoder");

    for case in test_cases {
        group.throughput(Throughput::Bytes(case.file().content().len() as u64));
        let id = BenchmarkId::new(case.group().as_str(), format!("{}/{}_headers", case.name(), case.file().header_count()));
        group.bench_with_input(id, &case, |b, case| {
            let mut head_decoder = RequestHeadDecoder::new();
            b.iter_batched_ref(
                || BytesMut::from(case.file().content()),
                |bytes_mut| {
                    let request = head_decoder.decode(bytes_mut).expect("input should be a valid http request head").unwrap();
                    black_box(request);
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn benchmark_head_encoder(criterion: &mut Criterion) {
    let test_cases = create_test_cases();
    let mut group = criterion.benchmark_group("head_encoder");

    for case in test_cases {
        let request = Request::parse(case.file().content(), Body::empty()).expect("input should be a valid http request head");
        group.throughput(Throughput::Bytes(request.head().len() as u64));
        group.bench_with_input(BenchmarkId::new(case.group().as_str(), case.name()), &request, |b, request| {
            b.iter_batched_ref(
                || BytesMut::with_capacity(request.head().len()),
                |bytes_mut| {
                    HeadEncoder.encode(request, bytes_mut).expect("encoding into memory can't fail");
                    black_box(bytes_mut);
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn benchmark_freeze(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("builder_freeze");
    let file = LARGE_HEADER;

    group.bench_function(file.file_name(), |b| {
        b.iter_batched(
            || Request::parse(file.content(), Body::empty()).expect("input should be a valid http request head").into_builder(),
            |builder| black_box(builder.freeze().expect("a parsed head freezes again")),
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(decoder, benchmark_head_decoder, benchmark_head_encoder, benchmark_freeze);
criterion_main!(decoder);
