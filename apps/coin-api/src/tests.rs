//! HTTP endpoint integration tests using axum-test

use std::io::Cursor;
use std::sync::Arc;

use axum::body::Bytes;
use axum::http::StatusCode;
use axum_test::TestServer;
use coin_intake::encode_data_url;
use image::{ImageFormat, Rgb, RgbImage};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::build_router;
use crate::state::AppState;

const TEST_BODY_LIMIT: usize = 16 * 1024 * 1024;

/// Create a test server over a fresh in-memory store
async fn create_test_server() -> TestServer {
    let state = AppState::in_memory().await.unwrap();
    TestServer::new(build_router(Arc::new(state), TEST_BODY_LIMIT)).unwrap()
}

fn png_bytes(width: u32, height: u32, noisy: bool) -> Vec<u8> {
    let mut seed: u32 = 0x9E37_79B9;
    let img = RgbImage::from_fn(width, height, |x, y| {
        if noisy {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            let [r, g, b, _] = seed.to_le_bytes();
            Rgb([r, g, b])
        } else {
            Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        }
    });
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

fn coin_json(coin_no: &str, country: &str, year: &str) -> Value {
    json!({
        "coinNo": coin_no,
        "value": "1 Rupee",
        "material": "Nickel",
        "country": country,
        "year": year,
        "mint": "Bombay",
        "coinPresentValue": "150",
        "description": "Lion capital on the obverse",
        "remark": "",
        "photos": []
    })
}

async fn add_coin(server: &TestServer, body: Value) {
    server
        .post("/api/coins")
        .json(&body)
        .await
        .assert_status(StatusCode::CREATED);
}

#[tokio::test]
async fn test_health_returns_200() {
    let server = create_test_server().await;
    let response = server.get("/health").await;
    response.assert_status_ok();

    let json = response.json::<Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["service"], "coin-api");
}

// ============================================================
// Photo intake
// ============================================================

#[tokio::test]
async fn test_intake_small_photo_is_kept() {
    let server = create_test_server().await;
    let png = png_bytes(32, 32, false);

    let response = server
        .post("/api/images/intake")
        .content_type("image/png")
        .bytes(Bytes::from(png.clone()))
        .await;
    response.assert_status_ok();

    let json = response.json::<Value>();
    assert_eq!(json["compressed"], false);
    assert_eq!(json["dataUrl"], encode_data_url(&png, "image/png"));
}

#[tokio::test]
async fn test_intake_large_photo_is_downscaled() {
    let server = create_test_server().await;
    let png = png_bytes(800, 600, true);

    let response = server
        .post("/api/images/intake")
        .content_type("image/png")
        .bytes(Bytes::from(png))
        .await;
    response.assert_status_ok();

    let json = response.json::<Value>();
    assert_eq!(json["compressed"], true);
    assert_eq!(json["width"], 512);
    assert_eq!(json["height"], 384);
    assert!(json["dataUrl"]
        .as_str()
        .unwrap()
        .starts_with("data:image/png;base64,"));
}

#[tokio::test]
async fn test_intake_without_file_is_no_content() {
    let server = create_test_server().await;
    let response = server.post("/api/images/intake").await;
    response.assert_status(StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_intake_rejects_undecodable_large_file() {
    let server = create_test_server().await;
    let garbage = vec![0x42u8; 600 * 1024];

    let response = server
        .post("/api/images/intake")
        .content_type("image/jpeg")
        .bytes(Bytes::from(garbage))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.json::<Value>()["code"], "INVALID_IMAGE");
}

// ============================================================
// Submission
// ============================================================

#[tokio::test]
async fn test_create_coin_returns_record() {
    let server = create_test_server().await;
    let mut body = coin_json("IN-001", "India", "1975");
    body["photos"] = json!([encode_data_url(&png_bytes(8, 8, false), "image/png")]);

    let response = server.post("/api/coins").json(&body).await;
    response.assert_status(StatusCode::CREATED);

    let json = response.json::<Value>();
    assert_eq!(json["coinNo"], "IN-001");
    assert_eq!(json["photos"].as_array().unwrap().len(), 1);
    assert!(!json["id"].as_str().unwrap().is_empty());
    assert!(json["createdAt"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn test_create_duplicate_coin_no_conflicts() {
    let server = create_test_server().await;
    add_coin(&server, coin_json("IN-001", "India", "1975")).await;

    let response = server
        .post("/api/coins")
        .json(&coin_json("IN-001", "Nepal", "1980"))
        .await;
    response.assert_status(StatusCode::CONFLICT);

    let json = response.json::<Value>();
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "DUPLICATE_COIN_NO");
    assert_eq!(json["error"], "A coin with Coin No IN-001 already exists.");
}

#[tokio::test]
async fn test_create_oversized_record_is_rejected() {
    let server = create_test_server().await;
    let mut body = coin_json("BIG-1", "India", "1975");
    body["description"] = json!("x".repeat(1_100_000));

    let response = server.post("/api/coins").json(&body).await;
    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);

    let json = response.json::<Value>();
    assert_eq!(json["code"], "DOCUMENT_TOO_LARGE");
    let message = json["error"].as_str().unwrap();
    assert!(message.starts_with("Document size ("));
    assert!(message.contains("KB) exceeds the document store limit of 1 MB"));

    // Nothing was written
    let list = server.get("/api/coins").await.json::<Value>();
    assert_eq!(list["totalCount"], 0);
}

#[tokio::test]
async fn test_create_with_blank_fields_is_bad_request() {
    let server = create_test_server().await;
    let mut body = coin_json("IN-002", "India", "1975");
    body["mint"] = json!("   ");
    body["year"] = json!("");

    let response = server.post("/api/coins").json(&body).await;
    response.assert_status_bad_request();

    let json = response.json::<Value>();
    assert_eq!(json["code"], "INVALID_REQUEST");
    let message = json["error"].as_str().unwrap();
    assert!(message.contains("year"));
    assert!(message.contains("mint"));
}

#[tokio::test]
async fn test_create_without_mint_key_is_bad_request() {
    let server = create_test_server().await;
    let mut body = coin_json("IN-004", "India", "1975");
    body.as_object_mut().unwrap().remove("mint");

    let response = server.post("/api/coins").json(&body).await;
    response.assert_status_bad_request();

    let json = response.json::<Value>();
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "INVALID_REQUEST");
    assert!(json["error"].as_str().unwrap().contains("mint"));
}

#[tokio::test]
async fn test_create_with_malformed_json_is_bad_request() {
    let server = create_test_server().await;
    let response = server
        .post("/api/coins")
        .content_type("application/json")
        .bytes(Bytes::from_static(b"{\"coinNo\": "))
        .await;
    response.assert_status_bad_request();
    assert_eq!(response.json::<Value>()["code"], "INVALID_REQUEST");
}

#[tokio::test]
async fn test_create_with_three_photos_is_bad_request() {
    let server = create_test_server().await;
    let photo = encode_data_url(&png_bytes(4, 4, false), "image/png");
    let mut body = coin_json("IN-003", "India", "1975");
    body["photos"] = json!([photo.clone(), photo.clone(), photo]);

    let response = server.post("/api/coins").json(&body).await;
    response.assert_status_bad_request();
}

// ============================================================
// Duplicate check
// ============================================================

#[tokio::test]
async fn test_exists_reports_taken_numbers() {
    let server = create_test_server().await;
    add_coin(&server, coin_json("US-1921", "USA", "1921")).await;

    let taken = server
        .get("/api/coins/exists")
        .add_query_param("coinNo", "US-1921")
        .await;
    taken.assert_status_ok();
    assert_eq!(
        taken.json::<Value>(),
        json!({ "coinNo": "US-1921", "exists": true })
    );

    let free = server
        .get("/api/coins/exists")
        .add_query_param("coinNo", "US-1922")
        .await;
    assert_eq!(free.json::<Value>()["exists"], false);
}

#[tokio::test]
async fn test_exists_with_empty_number_is_false() {
    let server = create_test_server().await;
    let response = server.get("/api/coins/exists").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["exists"], false);
}

// ============================================================
// Listing
// ============================================================

#[tokio::test]
async fn test_list_pages_six_at_a_time() {
    let server = create_test_server().await;
    for i in 0..8 {
        add_coin(&server, coin_json(&format!("C-{i}"), "India", "1990")).await;
    }

    let first = server.get("/api/coins").await.json::<Value>();
    assert_eq!(first["page"], 1);
    assert_eq!(first["totalPages"], 2);
    assert_eq!(first["totalCount"], 8);
    assert_eq!(first["coins"].as_array().unwrap().len(), 6);

    let second = server
        .get("/api/coins")
        .add_query_param("page", 2)
        .await
        .json::<Value>();
    assert_eq!(second["page"], 2);
    assert_eq!(second["coins"].as_array().unwrap().len(), 2);

    let clamped = server
        .get("/api/coins")
        .add_query_param("page", 9)
        .await
        .json::<Value>();
    assert_eq!(clamped["page"], 2);
}

#[tokio::test]
async fn test_list_search_is_case_insensitive() {
    let server = create_test_server().await;
    add_coin(&server, coin_json("IN-1", "India", "1990")).await;
    add_coin(&server, coin_json("NP-1", "Nepal", "1991")).await;
    add_coin(&server, coin_json("IN-2", "India", "1992")).await;

    let response = server
        .get("/api/coins")
        .add_query_param("search", "INDIA")
        .await;
    response.assert_status_ok();

    let json = response.json::<Value>();
    assert_eq!(json["totalCount"], 2);
    let countries: Vec<&str> = json["coins"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["country"].as_str().unwrap())
        .collect();
    assert_eq!(countries, vec!["India", "India"]);
}

#[tokio::test]
async fn test_list_search_without_match_has_no_pages() {
    let server = create_test_server().await;
    add_coin(&server, coin_json("IN-1", "India", "1990")).await;

    let json = server
        .get("/api/coins")
        .add_query_param("search", "zz-none")
        .await
        .json::<Value>();
    assert_eq!(json["totalCount"], 0);
    assert_eq!(json["totalPages"], 0);
    assert_eq!(json["coins"], json!([]));
}

#[tokio::test]
async fn test_list_sorts_by_year() {
    let server = create_test_server().await;
    add_coin(&server, coin_json("A", "India", "1950")).await;
    add_coin(&server, coin_json("B", "India", "2001")).await;
    add_coin(&server, coin_json("C", "India", "1975")).await;

    let json = server
        .get("/api/coins")
        .add_query_param("sortBy", "year")
        .add_query_param("order", "asc")
        .await
        .json::<Value>();
    let years: Vec<&str> = json["coins"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["year"].as_str().unwrap())
        .collect();
    assert_eq!(years, vec!["1950", "1975", "2001"]);
}

#[tokio::test]
async fn test_list_rejects_unknown_sort_field() {
    let server = create_test_server().await;
    let response = server
        .get("/api/coins")
        .add_query_param("sortBy", "mint")
        .await;
    assert!(response.status_code().is_client_error());
}

// ============================================================
// Report export
// ============================================================

#[tokio::test]
async fn test_report_is_downloadable_pdf() {
    let server = create_test_server().await;
    for i in 0..4 {
        add_coin(&server, coin_json(&format!("R-{i}"), "India", "1990")).await;
    }

    let response = server.get("/api/coins/report").await;
    response.assert_status_ok();

    let headers = response.headers();
    assert_eq!(headers["content-type"], "application/pdf");
    let disposition = headers["content-disposition"].to_str().unwrap();
    assert!(disposition.starts_with("attachment; filename=\"coin-records-"));
    assert!(disposition.ends_with(".pdf\""));

    let bytes = response.as_bytes();
    assert!(bytes.starts_with(b"%PDF-"));
    let doc = lopdf::Document::load_mem(bytes).unwrap();
    // Three text-only records fit on a page
    assert_eq!(doc.get_pages().len(), 2);
}

#[tokio::test]
async fn test_report_with_no_records_has_title_page() {
    let server = create_test_server().await;
    let response = server.get("/api/coins/report").await;
    response.assert_status_ok();

    let doc = lopdf::Document::load_mem(response.as_bytes()).unwrap();
    assert_eq!(doc.get_pages().len(), 1);
}
