use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;

use proptest::prelude::*;
use transparency_dashboard::app::pipeline::{DashboardState, FetchRequest, run_fetch};
use transparency_dashboard::data::ingest::parse_donations_csv;
use transparency_dashboard::data::{ApiOptions, FetchParams, default_dataset, fetch_with_fallback};
use transparency_dashboard::domain::Source;
use transparency_dashboard::io::export::write_snapshot_json;

/// Serve exactly one HTTP response on a loopback port.
///
/// Returns the URL and a receiver yielding the request head lines.
fn serve_once(status: &str, body: &str) -> (String, mpsc::Receiver<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut head = Vec::new();
        loop {
            let mut line = String::new();
            if reader.read_line(&mut line).unwrap() == 0 {
                break;
            }
            let line = line.trim_end().to_string();
            if line.is_empty() {
                break;
            }
            head.push(line);
        }
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();
        let _ = tx.send(head);
    });
    (format!("http://{addr}/dashboard-data"), rx)
}

fn api_params(url: String) -> FetchParams {
    FetchParams {
        api_url: url,
        ..FetchParams::default()
    }
}

#[test]
fn csv_scenario_sorts_and_keeps_secondary_placeholders() {
    let outcome = fetch_with_fallback(
        Source::Csv,
        &FetchParams {
            csv_text: "year,donations\n2023,1000\n2022,500\n".to_string(),
            ..FetchParams::default()
        },
    );
    assert!(!outcome.is_fallback());
    let pairs: Vec<(i32, f64)> = outcome
        .data
        .donations_by_year
        .iter()
        .map(|d| (d.year, d.amount))
        .collect();
    assert_eq!(pairs, vec![(2022, 500.0), (2023, 1000.0)]);
    assert!(outcome.data.projects.is_empty());
    assert!(outcome.data.partnerships.is_empty());
    assert_eq!(outcome.data.donation_mix.len(), 3);
}

#[test]
fn api_server_error_falls_back_with_status_in_message() {
    let (url, _head) = serve_once("500 Internal Server Error", "{}");
    let outcome = fetch_with_fallback(Source::Api, &api_params(url));
    assert!(outcome.is_fallback());
    assert_eq!(outcome.data, default_dataset());
    let message = outcome.error.unwrap();
    assert!(message.starts_with("Network error"), "{message}");
    assert!(message.contains("500"), "{message}");
}

#[test]
fn api_success_replaces_dataset_and_sends_auth_headers() {
    let mut expected = default_dataset();
    expected.donations_by_year.truncate(2);
    expected.projects.clear();
    let body = serde_json::to_string(&expected).unwrap();
    let (url, head) = serve_once("200 OK", &body);

    let params = FetchParams {
        api_url: url,
        api: ApiOptions {
            api_key: Some("secret".to_string()),
            headers: vec![("X-Org".to_string(), "northwind".to_string())],
        },
        ..FetchParams::default()
    };
    let outcome = fetch_with_fallback(Source::Api, &params);
    assert!(!outcome.is_fallback(), "{:?}", outcome.error);
    assert_eq!(outcome.data, expected);

    let head: HashMap<String, String> = head
        .recv()
        .unwrap()
        .into_iter()
        .skip(1)
        .filter_map(|l| l.split_once(':').map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string())))
        .collect();
    assert_eq!(head.get("authorization").map(String::as_str), Some("Bearer secret"));
    assert_eq!(head.get("x-org").map(String::as_str), Some("northwind"));
}

#[test]
fn api_body_without_donations_is_a_schema_error() {
    let (url, _head) = serve_once("200 OK", r#"{"projects":[]}"#);
    let outcome = fetch_with_fallback(Source::Api, &api_params(url));
    assert_eq!(outcome.data, default_dataset());
    let message = outcome.error.unwrap();
    assert!(message.starts_with("Invalid data structure received"), "{message}");
}

#[test]
fn api_payload_with_odd_secondary_records_keeps_its_donations() {
    let body = r#"{
        "donationsByYear":[{"year":2024,"amount":5}],
        "projects":[{"year":2025,"name":"Pilot","partner":"P","funding":1,"outcome":"o","status":"Planned"}],
        "risk":[{"area":"A","score":0.5}]
    }"#;
    let (url, _head) = serve_once("200 OK", body);
    let outcome = fetch_with_fallback(Source::Api, &api_params(url));
    assert!(!outcome.is_fallback(), "{:?}", outcome.error);
    assert_eq!(outcome.data.donations_by_year.len(), 1);
    assert_eq!(outcome.data.projects.len(), 1);
    assert_eq!(outcome.data.risk.len(), 1);
}

#[test]
fn unreachable_api_is_a_network_error() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let outcome = fetch_with_fallback(Source::Api, &api_params(format!("http://127.0.0.1:{port}/")));
    assert!(outcome.is_fallback());
    assert!(outcome.error.unwrap().starts_with("Network error"));
}

#[test]
fn csv_file_fetch_then_export_round_trips_through_state() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("gifts.csv");
    std::fs::write(&csv_path, "\u{feff}Year,Donations\n2021, 10\n2020,5\n").unwrap();

    let request = FetchRequest {
        source: Source::Csv,
        params: FetchParams::default(),
        csv_path: Some(csv_path),
    };
    let mut state = DashboardState::new();
    state.apply(run_fetch(&request));
    assert_eq!(state.source, Source::Csv);
    assert!(state.last_error.is_none());

    let out = dir.path().join("dashboard_data.json");
    write_snapshot_json(&out, &state.snapshot()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert!(json.get("generatedAt").is_some());
    assert!(json.get("lastFetched").is_some());
    assert_eq!(json["donationsByYear"][0]["year"], 2020);
    assert_eq!(json["donationsByYear"][1]["amount"], 10.0);
}

#[test]
fn missing_csv_file_falls_back() {
    let dir = tempfile::tempdir().unwrap();
    let request = FetchRequest {
        source: Source::Csv,
        params: FetchParams::default(),
        csv_path: Some(dir.path().join("absent.csv")),
    };
    let outcome = run_fetch(&request);
    assert!(outcome.is_fallback());
    assert_eq!(outcome.data, default_dataset());
}

proptest! {
    #[test]
    fn csv_output_is_ascending_with_last_row_per_year(
        rows in prop::collection::vec((1990i32..2030, 0u32..1_000_000), 1..40)
    ) {
        let mut text = String::from("year,donations\n");
        for (year, amount) in &rows {
            text.push_str(&format!("{year},{amount}\n"));
        }
        let import = parse_donations_csv(&text).unwrap();
        let donations = &import.data.donations_by_year;

        prop_assert!(donations.windows(2).all(|w| w[0].year < w[1].year));

        let mut last: HashMap<i32, u32> = HashMap::new();
        for (year, amount) in &rows {
            last.insert(*year, *amount);
        }
        prop_assert_eq!(donations.len(), last.len());
        for d in donations {
            prop_assert_eq!(d.amount, f64::from(last[&d.year]));
        }
        prop_assert_eq!(import.report.rows_read, rows.len());
        prop_assert_eq!(import.report.duplicate_years, rows.len() - last.len());
    }

    #[test]
    fn csv_without_usable_rows_gets_placeholder_years(
        junk in prop::collection::vec("[a-z]{1,8}", 0..10)
    ) {
        let mut text = String::from("year,donations\n");
        for word in &junk {
            text.push_str(&format!("{word},{word}\n"));
        }
        let import = parse_donations_csv(&text).unwrap();
        let years: Vec<i32> = import.data.donations_by_year.iter().map(|d| d.year).collect();
        prop_assert_eq!(years, vec![2023, 2024]);
        prop_assert!(import.data.donations_by_year.iter().all(|d| d.amount == 0.0));
        prop_assert!(import.report.placeholder);
    }
}
