#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use bimfm_api::config::{ServerConfig, DEFAULT_MAX_UPLOAD_BYTES};
use bimfm_api::router::build_app_router;
use bimfm_api::state::AppState;
use bimfm_vision::DefectDetector;

/// Build a test `ServerConfig` with safe defaults and uploads under `upload_dir`.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout. No model is configured.
pub fn test_config(upload_dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        upload_dir: upload_dir.to_path_buf(),
        max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        ai_model_path: None,
        ai_image_size: 32,
        ai_threshold: 0.3,
    }
}

/// Upload root for tests that never write files.
fn scratch_dir() -> PathBuf {
    std::env::temp_dir().join("bimfm-api-tests")
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_in(pool, &scratch_dir())
}

/// Same as [`build_test_app`] with uploads stored under `upload_dir`.
pub fn build_test_app_in(pool: PgPool, upload_dir: &Path) -> Router {
    let config = test_config(upload_dir);
    let state = AppState::new(pool, Arc::new(config.clone()));
    build_app_router(state, &config)
}

/// Router whose AI endpoints use `detector` instead of loading a model.
pub fn build_test_app_with_detector(
    pool: PgPool,
    upload_dir: &Path,
    detector: DefectDetector,
) -> Router {
    let config = test_config(upload_dir);
    let state = AppState::with_detector(pool, Arc::new(config.clone()), detector);
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, Body::empty(), None).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Body::empty(), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send_json(app, Method::POST, uri, body).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send_json(app, Method::PUT, uri, body).await
}

pub async fn patch_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send_json(app, Method::PATCH, uri, body).await
}

pub async fn post_multipart(app: Router, uri: &str, form: MultipartForm) -> Response<Body> {
    let (content_type, body) = form.finish();
    send(app, Method::POST, uri, Body::from(body), Some(&content_type)).await
}

async fn send_json(
    app: Router,
    method: Method,
    uri: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(
        app,
        method,
        uri,
        Body::from(serde_json::to_vec(&body).unwrap()),
        Some("application/json"),
    )
    .await
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Body,
    content_type: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header("content-type", content_type);
    }
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Multipart
// ---------------------------------------------------------------------------

const BOUNDARY: &str = "bimfm-test-boundary";

/// Minimal `multipart/form-data` body builder.
#[derive(Default)]
pub struct MultipartForm {
    body: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; \
                 filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// Content type header and encoded body.
    pub fn finish(mut self) -> (String, Vec<u8>) {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        (
            format!("multipart/form-data; boundary={BOUNDARY}"),
            self.body,
        )
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Register an asset through the API and return its ID.
pub async fn create_asset(pool: &PgPool, guid: &str, extra: serde_json::Value) -> i64 {
    let mut body = serde_json::json!({
        "ifc_guid": guid,
        "ifc_type": "IfcPump",
        "name": format!("Pump {guid}"),
    });
    if let (Some(target), Some(extra)) = (body.as_object_mut(), extra.as_object()) {
        for (k, v) in extra {
            target.insert(k.clone(), v.clone());
        }
    }
    let response = post_json(build_test_app(pool.clone()), "/api/assets", body).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

/// Two-storey model with one wall, one door and one pipe.
pub const MODEL_IFC: &str = "ISO-10303-21;
HEADER;
FILE_DESCRIPTION(('ViewDefinition [CoordinationView]'),'2;1');
FILE_NAME('clinic.ifc','2024-01-01T00:00:00',(''),(''),'','','');
FILE_SCHEMA(('IFC4'));
ENDSEC;
DATA;
#1=IFCPROJECT('0YvctVUKr0kugbFTf53O9L',$,'Clinic','Outpatient clinic',$,$,$,$,$);
#11=IFCBUILDING('2YvctVUKr0kugbFTf53O9L',$,'Main Block',$,$,$,$,$,.ELEMENT.,$,$,$);
#12=IFCBUILDINGSTOREY('3YvctVUKr0kugbFTf53O9L',$,'Ground Floor',$,$,$,$,$,.ELEMENT.,0.);
#15=IFCRELAGGREGATES('6YvctVUKr0kugbFTf53O9L',$,$,$,#11,(#12));
#20=IFCWALL('7YvctVUKr0kugbFTf53O9L',$,'Wall-001','Exterior wall',$,$,$,'W1',.STANDARD.);
#21=IFCDOOR('8YvctVUKr0kugbFTf53O9L',$,'Door-001',$,$,$,$,'D1',2.1,0.9,.DOOR.,$,$);
#22=IFCPIPESEGMENT('9YvctVUKr0kugbFTf53O9L',$,'Pipe',$,$,$,$,$,$);
#23=IFCRELCONTAINEDINSPATIALSTRUCTURE('AYvctVUKr0kugbFTf53O9L',$,$,$,(#20,#21,#22),#12);
#30=IFCPROPERTYSINGLEVALUE('FireRating',$,IFCLABEL('REI60'),$);
#34=IFCPROPERTYSET('BYvctVUKr0kugbFTf53O9L',$,'Pset_WallCommon',$,(#30));
#35=IFCRELDEFINESBYPROPERTIES('CYvctVUKr0kugbFTf53O9L',$,$,$,(#20),#34);
ENDSEC;
END-ISO-10303-21;
";
