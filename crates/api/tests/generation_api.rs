//! Integration tests for `POST /api/v1/generate` and the artifacts it serves.

mod common;

use axum::http::StatusCode;
use common::{
    artifact_path, body_bytes, body_json, build_test_app, build_test_app_with, get, png,
    post_empty, post_multipart, Part, INPUT_BYTES, OUTPUT_BYTES,
};
use restyle_imagegen::MockImageEditor;

// ---------------------------------------------------------------------------
// Test: successful multi-style generation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn generate_returns_record_for_every_style() {
    let app = build_test_app(MockImageEditor::new(OUTPUT_BYTES)).await;

    let response = post_multipart(
        app.app(),
        "/api/v1/generate",
        &[
            png(INPUT_BYTES),
            Part::Text("styles", "Anime"),
            Part::Text("styles", "Pixel Art"),
            Part::Text("quality", "low"),
            Part::Text("size", "square"),
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    let images = json["images"].as_array().unwrap();
    assert_eq!(images.len(), 2);
    for image in images {
        assert!(image["url"].as_str().unwrap().starts_with("/images/"));
        assert!(image["timestamp"].is_string());
        assert!(image["processing_time"].as_f64().unwrap() >= 0.0);
    }
    assert!((json["total_cost"].as_f64().unwrap() - 0.022).abs() < 1e-9);
    assert!(json["generation_time"].is_number());
    assert!(json["original_image"]
        .as_str()
        .unwrap()
        .starts_with("/inputs/original_"));
    // No failures: the field is omitted.
    assert!(json.get("failures").is_none());

    assert_eq!(app.editor.calls(), 2);
}

#[tokio::test]
async fn comma_separated_styles_and_defaults_are_accepted() {
    let app = build_test_app(MockImageEditor::new(OUTPUT_BYTES)).await;

    let response = post_multipart(
        app.app(),
        "/api/v1/generate",
        &[png(INPUT_BYTES), Part::Text("styles", "Anime, Watercolor")],
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["images"].as_array().unwrap().len(), 2);

    // quality=auto, size=square by default.
    let sent = app.editor.requests();
    assert!(sent.iter().all(|r| r.quality == "auto" && r.size == "1024x1024"));
    assert!((json["total_cost"].as_f64().unwrap() - 0.084).abs() < 1e-9);
}

#[tokio::test]
async fn label_containing_a_comma_is_one_style() {
    let app = build_test_app(MockImageEditor::new(OUTPUT_BYTES)).await;
    std::fs::write(
        &app.config.styles_file,
        r#"[
          {"label": "Black, White", "style_id": "black_white", "prompt": "Render in mono"},
          {"label": "Anime", "style_id": "anime", "prompt": "Render as anime"}
        ]"#,
    )
    .unwrap();
    let reloaded = post_empty(app.app(), "/api/v1/styles/reload").await;
    assert_eq!(reloaded.status(), StatusCode::OK);

    let response = post_multipart(
        app.app(),
        "/api/v1/generate",
        &[
            png(INPUT_BYTES),
            Part::Text("styles", "Black, White"),
            Part::Text("styles", "Anime"),
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let images = json["images"].as_array().unwrap();
    assert_eq!(images.len(), 2);
    assert!(images
        .iter()
        .any(|i| i["url"].as_str().unwrap().starts_with("/images/black_white_")));
    assert_eq!(app.editor.calls(), 2);
}

#[tokio::test]
async fn generated_artifacts_are_served_statically() {
    let app = build_test_app(MockImageEditor::new(OUTPUT_BYTES)).await;

    let json = body_json(
        post_multipart(
            app.app(),
            "/api/v1/generate",
            &[png(INPUT_BYTES), Part::Text("styles", "Anime")],
        )
        .await,
    )
    .await;

    let output_url = json["images"][0]["url"].as_str().unwrap().to_string();
    let response = get(app.app(), &output_url).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, OUTPUT_BYTES);

    let original_url = json["original_image"].as_str().unwrap().to_string();
    let response = get(app.app(), &original_url).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, INPUT_BYTES);

    assert!(artifact_path(&app.config.output_dir, &output_url, "/images").exists());
}

// ---------------------------------------------------------------------------
// Test: partial failure
// ---------------------------------------------------------------------------

#[tokio::test]
async fn failed_style_is_reported_without_failing_the_request() {
    let editor = MockImageEditor::new(OUTPUT_BYTES).fail_prompt("Render as pixel art", 502);
    let app = build_test_app(editor).await;

    let response = post_multipart(
        app.app(),
        "/api/v1/generate",
        &[
            png(INPUT_BYTES),
            Part::Text("styles", "Anime,Pixel Art,Watercolor"),
            Part::Text("quality", "medium"),
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    assert_eq!(json["images"].as_array().unwrap().len(), 2);
    let failures = json["failures"].as_array().unwrap();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0]["style"], "Pixel Art");
    assert!((json["total_cost"].as_f64().unwrap() - 0.084).abs() < 1e-9);
}

// ---------------------------------------------------------------------------
// Test: validation failures are 400 and leave no trace
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_style_is_rejected_before_any_work() {
    let app = build_test_app(MockImageEditor::new(OUTPUT_BYTES)).await;

    let response = post_multipart(
        app.app(),
        "/api/v1/generate",
        &[png(INPUT_BYTES), Part::Text("styles", "Anime,Cubism")],
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"].as_str().unwrap().contains("Cubism"));

    assert_eq!(app.editor.calls(), 0);
    assert!(app.files_in(&app.config.input_dir).is_empty());
    assert!(app.files_in(&app.config.output_dir).is_empty());
}

#[tokio::test]
async fn non_image_upload_is_rejected() {
    let app = build_test_app(MockImageEditor::new(OUTPUT_BYTES)).await;

    let response = post_multipart(
        app.app(),
        "/api/v1/generate",
        &[
            Part::File {
                name: "image",
                filename: "notes.txt",
                content_type: "text/plain",
                bytes: b"hello",
            },
            Part::Text("styles", "Anime"),
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    assert_eq!(app.editor.calls(), 0);
}

#[tokio::test]
async fn invalid_quality_is_rejected() {
    let app = build_test_app(MockImageEditor::new(OUTPUT_BYTES)).await;

    let response = post_multipart(
        app.app(),
        "/api/v1/generate",
        &[
            png(INPUT_BYTES),
            Part::Text("styles", "Anime"),
            Part::Text("quality", "ultra"),
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn missing_image_is_a_bad_request() {
    let app = build_test_app(MockImageEditor::new(OUTPUT_BYTES)).await;

    let response = post_multipart(
        app.app(),
        "/api/v1/generate",
        &[Part::Text("styles", "Anime")],
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "No image file provided");
}

#[tokio::test]
async fn missing_styles_is_rejected() {
    let app = build_test_app(MockImageEditor::new(OUTPUT_BYTES)).await;

    let response = post_multipart(app.app(), "/api/v1/generate", &[png(INPUT_BYTES)]).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.editor.calls(), 0);
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
    let app = build_test_app_with(MockImageEditor::new(OUTPUT_BYTES), |config| {
        config.max_upload_bytes = 512;
    })
    .await;

    let big = vec![0u8; 4096];
    let response = post_multipart(
        app.app(),
        "/api/v1/generate",
        &[Part::Text("styles", "Anime"), png(&big)],
    )
    .await;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(app.editor.calls(), 0);
}

// ---------------------------------------------------------------------------
// Test: completed generations reach the history log
// ---------------------------------------------------------------------------

#[tokio::test]
async fn generation_is_recorded_in_history() {
    let app = build_test_app(MockImageEditor::new(OUTPUT_BYTES)).await;

    let record = body_json(
        post_multipart(
            app.app(),
            "/api/v1/generate",
            &[
                png(INPUT_BYTES),
                Part::Text("styles", "Watercolor"),
                Part::Text("size", "landscape"),
            ],
        )
        .await,
    )
    .await;

    app.wait_for_history(1).await;

    let json = body_json(get(app.app(), "/api/v1/history").await).await;
    let entries = json["generations"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["request"]["styles"][0], "Watercolor");
    assert_eq!(entries[0]["request"]["size"], "landscape");
    assert_eq!(entries[0]["response"], record);
}

#[tokio::test]
async fn rejected_requests_are_not_recorded() {
    let app = build_test_app(MockImageEditor::new(OUTPUT_BYTES)).await;

    post_multipart(
        app.app(),
        "/api/v1/generate",
        &[png(INPUT_BYTES), Part::Text("styles", "Cubism")],
    )
    .await;

    // A successful request afterwards is the only entry.
    post_multipart(
        app.app(),
        "/api/v1/generate",
        &[png(INPUT_BYTES), Part::Text("styles", "Anime")],
    )
    .await;
    app.wait_for_history(1).await;

    assert_eq!(app.history.read_all().await.len(), 1);
}
