//! HTTP-level tests for the Blender add-on endpoints.

mod common;

use axum::http::StatusCode;
use bimfm_db::models::ifc_file::CreateIfcFile;
use bimfm_db::repositories::IfcFileRepo;
use common::{body_json, create_asset, get, post_json, post_multipart, MultipartForm};
use serde_json::json;
use sqlx::PgPool;

async fn register_file(pool: &PgPool) -> i64 {
    IfcFileRepo::create(
        pool,
        &CreateIfcFile {
            filename: "tower.ifc".to_string(),
            file_path: "uploads/ifc/tower.ifc".to_string(),
            file_size: Some(2048),
            project_name: Some("Tower".to_string()),
        },
    )
    .await
    .unwrap()
    .id
}

/// A file with two assets; the first has been graded Poor by an inspection.
async fn seed(pool: &PgPool, dir: &std::path::Path) -> (i64, i64, i64) {
    let file_id = register_file(pool).await;
    let ahu = create_asset(
        pool,
        "AHU-GUID",
        json!({"ifc_file_id": file_id, "location_building": "Tower", "location_floor": "L2"}),
    )
    .await;
    let fan = create_asset(pool, "FAN-GUID", json!({"ifc_file_id": file_id})).await;

    let form = MultipartForm::new()
        .text("code", "BL-1")
        .text("asset_id", &ahu.to_string())
        .text("inspection_date", "2024-05-01T08:00:00Z")
        .text("has_pathology", "true")
        .text("severity", "2")
        .text("location", "Roof");
    let app = common::build_test_app_in(pool.clone(), dir);
    assert_eq!(
        post_multipart(app, "/api/inspections", form).await.status(),
        StatusCode::CREATED
    );
    (file_id, ahu, fan)
}

// ---------------------------------------------------------------------------
// to_blender
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn to_blender_exports_assets_and_inspections(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    let (file_id, _, _) = seed(&pool, dir.path()).await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/blender/sync",
        json!({"ifc_file_id": file_id, "sync_direction": "to_blender"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Data synchronized to Blender");

    let data = &json["data"];
    assert_eq!(data["ifc_file"]["id"], file_id);
    assert_eq!(data["ifc_file"]["filename"], "tower.ifc");
    assert_eq!(data["ifc_file"]["file_path"], "uploads/ifc/tower.ifc");

    let assets = data["assets"].as_array().unwrap();
    assert_eq!(assets.len(), 2);
    assert_eq!(assets[0]["ifc_guid"], "AHU-GUID");
    assert_eq!(assets[0]["condition_status"], "Poor");
    assert_eq!(assets[0]["location"]["building"], "Tower");
    assert_eq!(assets[0]["location"]["floor"], "L2");
    assert!(assets[0]["location"]["room"].is_null());

    let inspections = data["inspections"].as_array().unwrap();
    assert_eq!(inspections.len(), 1);
    assert_eq!(inspections[0]["code"], "BL-1");
    assert_eq!(inspections[0]["asset_ifc_guid"], "AHU-GUID");
    assert_eq!(inspections[0]["severity"], 2);
}

// ---------------------------------------------------------------------------
// from_blender
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn from_blender_applies_condition_edits(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    let (file_id, ahu, fan) = seed(&pool, dir.path()).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/blender/sync",
        json!({
            "ifc_file_id": file_id,
            "sync_direction": "from_blender",
            "blender_data": {
                "assets": [
                    {"ifc_guid": "AHU-GUID", "condition_status": "Good", "condition_score": 4},
                    {"ifc_guid": "FAN-GUID", "condition_score": 9},
                    {"ifc_guid": "NOT-IN-FILE", "condition_score": 1},
                    {"condition_score": 1},
                ]
            }
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Data synchronized from Blender");
    assert_eq!(json["data"]["updated_count"], 2);
    assert_eq!(json["data"]["message"], "Updated 2 assets from Blender");

    let app = common::build_test_app(pool.clone());
    let asset = body_json(get(app, &format!("/api/assets/{ahu}")).await).await;
    assert_eq!(asset["condition_status"], "Good");
    assert_eq!(asset["condition_score"], 4);

    // Out-of-range score ignored.
    let app = common::build_test_app(pool);
    let asset = body_json(get(app, &format!("/api/assets/{fan}")).await).await;
    assert!(asset["condition_score"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn from_blender_accepts_float_scores(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    let (file_id, ahu, fan) = seed(&pool, dir.path()).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/blender/sync",
        json!({
            "ifc_file_id": file_id,
            "sync_direction": "from_blender",
            "blender_data": {
                "assets": [
                    {"ifc_guid": "AHU-GUID", "condition_status": "Fair", "condition_score": 3.0},
                    {"ifc_guid": "FAN-GUID", "condition_status": "Poor", "condition_score": 2.5},
                ]
            }
        }),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["updated_count"], 2);

    let app = common::build_test_app(pool.clone());
    let asset = body_json(get(app, &format!("/api/assets/{ahu}")).await).await;
    assert_eq!(asset["condition_status"], "Fair");
    assert_eq!(asset["condition_score"], 3);

    // Fractional score dropped, status from the same entry still applied.
    let app = common::build_test_app(pool);
    let asset = body_json(get(app, &format!("/api/assets/{fan}")).await).await;
    assert_eq!(asset["condition_status"], "Poor");
    assert!(asset["condition_score"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn from_blender_without_data(pool: PgPool) {
    let file_id = register_file(&pool).await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/blender/sync",
        json!({"ifc_file_id": file_id, "sync_direction": "from_blender"}),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["message"], "No data provided from Blender");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sync_rejects_unknown_file_and_direction(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/blender/sync",
        json!({"ifc_file_id": 999999, "sync_direction": "to_blender"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let file_id = register_file(&pool).await;
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/blender/sync",
        json!({"ifc_file_id": file_id, "sync_direction": "sideways"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// blender-data
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn blender_data_includes_viewport_colors(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    let (file_id, ahu, fan) = seed(&pool, dir.path()).await;

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/blender/{file_id}/blender-data")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["ifc_file"]["project_name"], "Tower");

    let assets = json["assets"].as_array().unwrap();
    let ahu_row = assets.iter().find(|a| a["id"] == ahu).unwrap();
    assert_eq!(ahu_row["condition_score"], 2);
    assert_eq!(ahu_row["viewport_color"], json!([1.0, 0.5, 0.0]));
    let fan_row = assets.iter().find(|a| a["id"] == fan).unwrap();
    assert_eq!(fan_row["viewport_color"], json!([0.5, 0.5, 0.5]));

    let inspections = json["inspections"].as_array().unwrap();
    assert_eq!(inspections[0]["asset_id"], ahu);
    assert_eq!(inspections[0]["has_pathology"], true);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn blender_data_for_missing_file_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/blender/999999/blender-data").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
