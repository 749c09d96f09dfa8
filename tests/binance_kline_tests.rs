use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread;
use std::time::Duration;

use candle_dash::core::{Candle, normalize};
use candle_dash::data::{
    BinanceKlineSource, CandleSource, KlineQuery, decode_kline_response,
};
use candle_dash::error::DashError;

#[test]
fn decodes_kline_rows_into_second_resolution_candles() {
    let body = r#"[[1704067200000,"42000","43500","41500","43200","1234.5",1704153599999]]"#;
    let candles = decode_kline_response(200, body).expect("decode");
    assert_eq!(
        candles,
        vec![Candle::new(1_704_067_200, 42_000.0, 43_500.0, 41_500.0, 43_200.0)]
    );
}

#[test]
fn error_payload_maps_to_network_error_with_message() {
    let body = r#"{"code":-1121,"msg":"Invalid symbol."}"#;
    let err = decode_kline_response(400, body).expect_err("error payload");
    match err {
        DashError::Network(message) => assert!(message.contains("Invalid symbol.")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn error_code_without_message_is_network_error_even_on_success_status() {
    let err = decode_kline_response(200, r#"{"code":-1100}"#).expect_err("code-only payload");
    match err {
        DashError::Network(message) => assert!(message.contains("-1100")),
        other => panic!("unexpected error: {other:?}"),
    }

    let err = decode_kline_response(200, r#"{"code":-1003,"msg":null}"#).expect_err("null msg");
    assert!(matches!(err, DashError::Network(message) if message.contains("-1003")));
}

#[test]
fn non_success_status_without_body_is_network_error() {
    let err = decode_kline_response(503, "Service Unavailable").expect_err("status");
    assert!(matches!(err, DashError::Network(_)));
    assert!(err.is_source_failure());
}

#[test]
fn unexpected_shapes_are_format_errors() {
    for body in [
        r#"{"data": []}"#,
        r#"[{"time": 1}]"#,
        r#"[[1704067200000, "1", "2"]]"#,
        r#"[["soon", "1", "2", "0.5", "1.5"]]"#,
        "not json",
    ] {
        let err = decode_kline_response(200, body).expect_err(body);
        assert!(matches!(err, DashError::Format(_)), "{body}: {err:?}");
    }
}

#[test]
fn unparsable_price_is_dropped_by_normalization() {
    let body = r#"[
        [1704067200000,"42000","43500","41500","43200"],
        [1704153600000,"n/a","43500","41500","43200"]
    ]"#;
    let candles = decode_kline_response(200, body).expect("decode");
    assert_eq!(candles.len(), 2);
    assert!(candles[1].open.is_nan());

    let series = normalize(candles);
    assert_eq!(series.len(), 1);
    assert_eq!(series.as_slice()[0].time, 1_704_067_200);
}

fn serve_once(status_line: &'static str, body: &'static str) -> (String, thread::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept");
        let mut reader = BufReader::new(stream.try_clone().expect("clone"));
        let mut request_line = String::new();
        reader.read_line(&mut request_line).expect("request line");
        loop {
            let mut header = String::new();
            reader.read_line(&mut header).expect("header");
            if header == "\r\n" || header.is_empty() {
                break;
            }
        }
        let response = format!(
            "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).expect("write");
        request_line
    });
    (format!("http://{addr}/api/v3/klines"), handle)
}

#[test]
fn fetch_issues_single_query_and_decodes_response() {
    let (endpoint, server) = serve_once(
        "HTTP/1.1 200 OK",
        r#"[[1704067200000,"42000","43500","41500","43200"]]"#,
    );
    let query = KlineQuery {
        endpoint,
        ..KlineQuery::default()
    };
    let source =
        BinanceKlineSource::new(query, Some(Duration::from_secs(5))).expect("client");
    assert_eq!(source.query().symbol, "BTCUSDT");

    let candles = source.fetch_candles().expect("fetch");
    assert_eq!(candles.len(), 1);

    let request_line = server.join().expect("server");
    assert!(request_line.starts_with("GET /api/v3/klines?"));
    assert!(request_line.contains("symbol=BTCUSDT"));
    assert!(request_line.contains("interval=1d"));
    assert!(request_line.contains("limit=150"));
}

#[test]
fn fetch_surfaces_upstream_error_as_network_failure() {
    let (endpoint, server) = serve_once(
        "HTTP/1.1 429 Too Many Requests",
        r#"{"code":-1003,"msg":"Too many requests."}"#,
    );
    let query = KlineQuery {
        endpoint,
        ..KlineQuery::default()
    };
    let source = BinanceKlineSource::new(query, None).expect("client");

    let err = source.fetch_candles().expect_err("rate limited");
    assert!(matches!(err, DashError::Network(ref message) if message.contains("Too many requests.")));
    server.join().expect("server");
}

#[test]
fn invalid_query_is_rejected_before_any_request() {
    let query = KlineQuery {
        limit: 0,
        ..KlineQuery::default()
    };
    let err = BinanceKlineSource::new(query, None).expect_err("limit");
    assert!(matches!(err, DashError::Config(_)));
}
