//! Compression and history integration tests.

mod helpers;

use axum_test::multipart::{MultipartForm, Part};
use bytes::Bytes;
use helpers::fixtures::{fake_png, sample_pdf};
use helpers::{setup_test_app, setup_test_app_with_limit};
use serde_json::Value;

fn file_part(data: Vec<u8>, name: &str, mime: &str) -> Part {
    Part::bytes(Bytes::from(data))
        .file_name(name.to_string())
        .mime_type(mime.to_string())
}

#[tokio::test]
async fn test_anonymous_batch_is_simulated_for_images() {
    let app = setup_test_app().await;

    let form = MultipartForm::new()
        .add_part("files", file_part(fake_png(1000), "photo.png", "image/png"))
        .add_text("quality", "low");
    let response = app.client().post("/api/compress").multipart(form).await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["accepted"], 1);
    let result = &body["results"][0];
    assert_eq!(result["status"], "compressed");
    assert_eq!(result["method"], "simulated");
    assert_eq!(result["original_size"], 1000);
    assert_eq!(result["compressed_size"], 600);
    assert_eq!(result["compression_ratio"], 40);
    assert_eq!(result["output_name"], "compressed-file-1.png");
    assert_eq!(result["sync_state"], "local");
    assert!(result.get("remote_url").is_none());

    assert_eq!(body["summary"]["bytes_saved"], 400);
    assert_eq!(body["summary"]["percent_saved"], 40);
    assert_eq!(app.store.record_count().await, 0);
}

#[tokio::test]
async fn test_rejected_files_are_reported_next_to_results() {
    let app = setup_test_app_with_limit(2048).await;

    let form = MultipartForm::new()
        .add_part("files", file_part(b"hello".to_vec(), "notes.txt", "text/plain"))
        .add_part("files", file_part(fake_png(4096), "huge.png", "image/png"))
        .add_part("files", file_part(fake_png(1000), "small.png", "image/png"))
        .add_text("output_name", "holiday");
    let response = app.client().post("/api/compress").multipart(form).await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["accepted"], 1);

    let rejected = body["rejected"].as_array().unwrap();
    assert_eq!(rejected.len(), 2);
    assert_eq!(rejected[0]["reason"], "Unsupported file type: notes.txt");
    assert_eq!(rejected[1]["file_name"], "huge.png");
    assert!(rejected[1]["reason"]
        .as_str()
        .unwrap()
        .starts_with("File too large: huge.png"));

    assert_eq!(body["results"][0]["output_name"], "holiday-1.png");
    assert_eq!(body["results"][0]["compressed_size"], 800);
}

#[tokio::test]
async fn test_batch_with_nothing_acceptable_is_bad_request() {
    let app = setup_test_app().await;

    let form = MultipartForm::new()
        .add_part("files", file_part(b"x".to_vec(), "script.exe", "application/octet-stream"));
    let response = app.client().post("/api/compress").multipart(form).await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"], "Please select files to compress");
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_invalid_quality_is_rejected() {
    let app = setup_test_app().await;

    let form = MultipartForm::new()
        .add_part("files", file_part(fake_png(100), "a.png", "image/png"))
        .add_text("quality", "ultra");
    let response = app.client().post("/api/compress").multipart(form).await;

    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_signed_in_batch_is_published_and_recorded() {
    let app = setup_test_app().await;
    let client = app.client();
    let pdf = sample_pdf();

    let form = MultipartForm::new()
        .add_part("files", file_part(pdf.clone(), "report.pdf", "application/pdf"))
        .add_part("files", file_part(fake_png(1000), "scan.png", "image/png"));
    let response = client
        .post("/api/compress")
        .add_header("X-User-Id", "user-9")
        .add_header("X-User-Email", "user9@example.com")
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);

    let pdf_result = &results[0];
    assert_eq!(pdf_result["method"], "pdf_rewrite");
    assert_eq!(pdf_result["sync_state"], "metadata_written");
    assert_eq!(
        pdf_result["remote_id"],
        "slimifypdf/users/user-9/compressed-file-1.pdf"
    );
    assert!(app
        .temp_dir
        .path()
        .join("slimifypdf/users/user-9/compressed-file-1.pdf")
        .exists());
    assert!(app
        .temp_dir
        .path()
        .join("slimifypdf/users/user-9/compressed-file-2.png")
        .exists());

    let history: Value = client
        .get("/api/users/user-9/compressions")
        .add_header("X-User-Id", "user-9")
        .await
        .json();
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert!(history.iter().all(|r| r["download_url"] == r["cloudinary_url"]));

    let stats_response = client
        .get("/api/users/user-9/stats")
        .add_header("X-User-Id", "user-9")
        .await;
    assert_eq!(stats_response.status_code(), 200);
    let stats: Value = stats_response.json();
    assert_eq!(stats["total_files"], 2);
    assert_eq!(stats["monthly_files"], 2);
    assert_eq!(stats["email"], "user9@example.com");
    assert_eq!(stats["space_saved"], body["summary"]["bytes_saved"]);
}

#[tokio::test]
async fn test_history_limit_export_and_record_delete() {
    let app = setup_test_app().await;
    let client = app.client();

    for _ in 0..3 {
        let form = MultipartForm::new()
            .add_part("files", file_part(fake_png(500), "a.png", "image/png"));
        let response = client
            .post("/api/compress")
            .add_header("X-User-Id", "user-5")
            .multipart(form)
            .await;
        assert_eq!(response.status_code(), 200);
    }

    let limited: Value = client
        .get("/api/users/user-5/compressions")
        .add_query_param("limit", 2)
        .add_header("X-User-Id", "user-5")
        .await
        .json();
    assert_eq!(limited.as_array().unwrap().len(), 2);

    let export_response = client
        .get("/api/users/user-5/export")
        .add_header("X-User-Id", "user-5")
        .await;
    assert_eq!(export_response.status_code(), 200);
    let export: Value = export_response.json();
    assert_eq!(export["compressions"].as_array().unwrap().len(), 3);
    assert_eq!(export["user"]["total_files"], 3);
    assert!(export["exportDate"].is_string());

    let record_id = export["compressions"][0]["id"].as_str().unwrap().to_string();
    let path = format!("/api/users/user-5/compressions/{}", record_id);
    let delete = || client.delete(&path).add_header("X-User-Id", "user-5");
    assert_eq!(delete().await.status_code(), 204);
    assert_eq!(delete().await.status_code(), 404);
    assert_eq!(app.store.record_count().await, 2);
}

#[tokio::test]
async fn test_new_user_gets_zeroed_stats() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .get("/api/users/newcomer/stats")
        .add_header("X-User-Id", "newcomer")
        .await;
    assert_eq!(response.status_code(), 200);
    let stats: Value = response.json();
    assert_eq!(stats["user_id"], "newcomer");
    assert_eq!(stats["total_files"], 0);
    assert_eq!(stats["space_saved"], 0);
    assert_eq!(stats["monthly_files"], 0);

    let response = app
        .client()
        .get("/api/users/newcomer/export")
        .add_header("X-User-Id", "newcomer")
        .await;
    assert_eq!(response.status_code(), 200);
    let export: Value = response.json();
    assert!(export["compressions"].as_array().unwrap().is_empty());
    assert_eq!(export["user"]["total_files"], 0);
}

#[tokio::test]
async fn test_history_requires_the_owner_session() {
    let app = setup_test_app().await;
    let client = app.client();

    let form = MultipartForm::new()
        .add_part("files", file_part(fake_png(500), "a.png", "image/png"));
    let response = client
        .post("/api/compress")
        .add_header("X-User-Id", "owner")
        .multipart(form)
        .await;
    assert_eq!(response.status_code(), 200);

    let own: Value = client
        .get("/api/users/owner/compressions")
        .add_header("X-User-Id", "owner")
        .await
        .json();
    let record_id = own[0]["id"].as_str().unwrap().to_string();
    let record_path = format!("/api/users/owner/compressions/{}", record_id);

    for path in [
        "/api/users/owner/compressions",
        "/api/users/owner/stats",
        "/api/users/owner/export",
    ] {
        let anonymous = client.get(path).await;
        assert_eq!(anonymous.status_code(), 401, "{}", path);
        assert_eq!(anonymous.json::<Value>()["code"], "UNAUTHORIZED");

        let other = client.get(path).add_header("X-User-Id", "intruder").await;
        assert_eq!(other.status_code(), 403, "{}", path);
        assert_eq!(other.json::<Value>()["code"], "FORBIDDEN");
    }

    assert_eq!(client.delete(&record_path).await.status_code(), 401);
    assert_eq!(
        client
            .delete(&record_path)
            .add_header("X-User-Id", "intruder")
            .await
            .status_code(),
        403
    );
    assert_eq!(app.store.record_count().await, 1);
}

#[tokio::test]
async fn test_health_and_openapi() {
    let app = setup_test_app().await;

    let response = app.client().get("/health").await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "healthy (memory)");

    let spec: Value = app.client().get("/api/openapi.json").await.json();
    assert!(spec["paths"]["/api/compress"].is_object());
}
