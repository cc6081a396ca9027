use std::hint::black_box;
use bencher::{TestCase, TestPage};
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use micro_meta_client::codec::ResponseDecoder;
use micro_meta_client::protocol::Message;
use tokio_util::bytes::BytesMut;
use tokio_util::codec::Decoder;

static SMALL_PAGE: TestPage = TestPage::new("small.html", include_str!("../resources/page/small.html"));
static LARGE_PAGE: TestPage = TestPage::new("large.html", include_str!("../resources/page/large.html"));

fn create_test_cases() -> Vec<TestCase> {
    vec![TestCase::whole("small_response_decoder", SMALL_PAGE), TestCase::whole("large_response_decoder", LARGE_PAGE)]
}

fn response_bytes(page: &TestPage) -> String {
    format!(
        "HTTP/1.1 200 OK\r\nServer: nginx\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        page.content().len(),
        page.content()
    )
}

fn benchmark_response_decoder(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("response_decoder");

    for case in create_test_cases() {
        let response = response_bytes(case.page());
        group.throughput(Throughput::Bytes(response.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(case.name()), &response, |b, response| {
            b.iter_batched_ref(
                || (ResponseDecoder::new(), BytesMut::from(response.as_str())),
                |(response_decoder, bytes_mut)| {
                    let header = response_decoder.decode(bytes_mut).expect("input should be valid http response header").unwrap();
                    let body = response_decoder.decode(bytes_mut).expect("input should be valid http response body").unwrap();
                    assert!(matches!(header, Message::Header(_)));
                    black_box((header, body));
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(decoder, benchmark_response_decoder);
criterion_main!(decoder);
