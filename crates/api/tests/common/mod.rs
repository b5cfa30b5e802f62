#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use restyle_api::config::ServerConfig;
use restyle_api::router::build_app_router;
use restyle_api::state::AppState;
use restyle_core::styles::StyleRegistry;
use restyle_history::{HistoryStore, HistoryWriter};
use restyle_imagegen::MockImageEditor;
use restyle_pipeline::{ArtifactStore, GenerationOrchestrator};

pub const OUTPUT_BYTES: &[u8] = b"transformed-png";
pub const INPUT_BYTES: &[u8] = b"uploaded-png";

pub const STYLES_JSON: &str = r#"[
  {"label": "Anime", "style_id": "anime", "prompt": "Render as anime"},
  {"label": "Pixel Art", "style_id": "pixel_art", "prompt": "Render as pixel art"},
  {"label": "Watercolor", "style_id": "watercolor", "prompt": "Render as watercolor"}
]"#;

/// Build a test `ServerConfig` rooted in `root`.
pub fn test_config(root: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        max_upload_bytes: 1024 * 1024,
        output_dir: root.join("images"),
        input_dir: root.join("inputs"),
        styles_file: root.join("styles.json"),
        history_file: root.join("logs").join("generation_history.json"),
        max_concurrent_transforms: 3,
    }
}

/// A fully wired application backed by a temp directory and a mock editor.
pub struct TestApp {
    pub router: Router,
    pub config: ServerConfig,
    pub editor: Arc<MockImageEditor>,
    pub history: Arc<HistoryStore>,
    _dir: tempfile::TempDir,
}

impl TestApp {
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    pub fn files_in(&self, dir: &Path) -> Vec<String> {
        let mut names: Vec<_> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    /// Poll the history file until it holds `count` entries.
    pub async fn wait_for_history(&self, count: usize) {
        for _ in 0..100 {
            if self.history.read_all().await.len() >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("history never reached {count} entries");
    }
}

pub async fn build_test_app(editor: MockImageEditor) -> TestApp {
    build_test_app_with(editor, |_| {}).await
}

/// Build the application with the same router `main.rs` uses, letting the
/// caller tweak the config first.
pub async fn build_test_app_with(
    editor: MockImageEditor,
    tweak: impl FnOnce(&mut ServerConfig),
) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path());
    tweak(&mut config);

    std::fs::write(&config.styles_file, STYLES_JSON).unwrap();

    let store = Arc::new(ArtifactStore::new(&config.input_dir, &config.output_dir));
    store.ensure_dirs().await.unwrap();

    let styles = Arc::new(StyleRegistry::load(&config.styles_file).unwrap());
    let editor = Arc::new(editor);
    let orchestrator = Arc::new(GenerationOrchestrator::new(
        editor.clone(),
        store,
        Arc::clone(&styles),
        config.max_concurrent_transforms,
    ));

    let history = Arc::new(HistoryStore::new(&config.history_file));
    let (recorder, _handle) = HistoryWriter::spawn(Arc::clone(&history));

    let state = AppState {
        styles,
        orchestrator,
        history: Arc::clone(&history),
        recorder,
    };

    TestApp {
        router: build_app_router(state, &config),
        config,
        editor,
        history,
        _dir: dir,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_empty(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

// ---------------------------------------------------------------------------
// Multipart helpers
// ---------------------------------------------------------------------------

const BOUNDARY: &str = "restyle-test-boundary";

pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        filename: &'a str,
        content_type: &'a str,
        bytes: &'a [u8],
    },
}

/// The usual upload: a PNG `image` field.
pub fn png(bytes: &[u8]) -> Part<'_> {
    Part::File {
        name: "image",
        filename: "photo.png",
        content_type: "image/png",
        bytes,
    }
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                filename,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                         Content-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn post_multipart(app: Router, uri: &str, parts: &[Part<'_>]) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub fn artifact_path(dir: &Path, url: &str, prefix: &str) -> PathBuf {
    dir.join(url.strip_prefix(prefix).unwrap().trim_start_matches('/'))
}
