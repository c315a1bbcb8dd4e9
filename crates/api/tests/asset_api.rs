//! HTTP-level tests for the asset register.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_asset, delete, get, patch_json, post_json, put_json};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_asset_returns_201(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/assets",
        json!({
            "ifc_guid": "1abcDEF",
            "ifc_type": "IfcBoiler",
            "name": "Boiler B1",
            "manufacturer": "Acme",
            "condition_status": "Good",
            "condition_score": 4,
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert!(json["id"].is_number());
    assert_eq!(json["ifc_guid"], "1abcDEF");
    assert_eq!(json["manufacturer"], "Acme");
    assert_eq!(json["condition_score"], 4);
    assert!(json["ifc_file_id"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_with_trailing_slash(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/assets/",
        json!({"ifc_guid": "slash", "ifc_type": "IfcPump"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_guid_returns_400(pool: PgPool) {
    create_asset(&pool, "dup-guid", json!({})).await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/assets",
        json!({"ifc_guid": "dup-guid", "ifc_type": "IfcPump"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("already exists"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_serial_returns_400(pool: PgPool) {
    create_asset(&pool, "first", json!({"serial_number": "SN-1"})).await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/assets",
        json!({"ifc_guid": "second", "ifc_type": "IfcPump", "serial_number": "SN-1"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_condition_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/assets",
        json!({"ifc_guid": "g", "ifc_type": "IfcPump", "condition_score": 5}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/assets",
        json!({"ifc_guid": "g", "ifc_type": "IfcPump", "condition_status": "Broken"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_ifc_file_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/assets",
        json!({"ifc_guid": "g", "ifc_type": "IfcPump", "ifc_file_id": 999999}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Read, update, delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn get_missing_asset_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/assets/999999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn put_and_patch_update_given_fields(pool: PgPool) {
    let id = create_asset(&pool, "upd", json!({"manufacturer": "Acme"})).await;

    let app = common::build_test_app(pool.clone());
    let response = put_json(
        app,
        &format!("/api/assets/{id}"),
        json!({"location_room": "R-101", "condition_score": 2}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["location_room"], "R-101");
    assert_eq!(json["condition_score"], 2);
    assert_eq!(json["manufacturer"], "Acme");

    let app = common::build_test_app(pool);
    let response = patch_json(
        app,
        &format!("/api/assets/{id}"),
        json!({"condition_status": "Poor"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["condition_status"], "Poor");
    assert_eq!(json["location_room"], "R-101");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_rejects_out_of_range_score(pool: PgPool) {
    let id = create_asset(&pool, "score", json!({})).await;

    let app = common::build_test_app(pool);
    let response = put_json(
        app,
        &format!("/api/assets/{id}"),
        json!({"condition_score": 0}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_keeps_own_serial(pool: PgPool) {
    let id = create_asset(&pool, "own", json!({"serial_number": "SN-9"})).await;
    create_asset(&pool, "other", json!({"serial_number": "SN-10"})).await;

    let app = common::build_test_app(pool.clone());
    let response = put_json(
        app,
        &format!("/api/assets/{id}"),
        json!({"serial_number": "SN-9"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool);
    let response = put_json(
        app,
        &format!("/api/assets/{id}"),
        json!({"serial_number": "SN-10"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_missing_asset_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = put_json(app, "/api/assets/999999", json!({"name": "x"})).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_asset_then_404(pool: PgPool) {
    let id = create_asset(&pool, "bye", json!({})).await;

    let app = common::build_test_app(pool.clone());
    let response = delete(app, &format!("/api/assets/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["message"], "Asset deleted");

    let app = common::build_test_app(pool.clone());
    let response = get(app, &format!("/api/assets/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let app = common::build_test_app(pool);
    let response = delete(app, &format!("/api/assets/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_filters_and_pages(pool: PgPool) {
    create_asset(&pool, "a", json!({"condition_status": "Good"})).await;
    create_asset(&pool, "b", json!({"condition_status": "Poor"})).await;
    create_asset(&pool, "c", json!({"condition_status": "Good"})).await;

    let app = common::build_test_app(pool.clone());
    let all = body_json(get(app, "/api/assets/").await).await;
    assert_eq!(all.as_array().unwrap().len(), 3);

    let app = common::build_test_app(pool.clone());
    let good = body_json(get(app, "/api/assets?condition_status=Good").await).await;
    assert_eq!(good.as_array().unwrap().len(), 2);

    let app = common::build_test_app(pool.clone());
    let page = body_json(get(app, "/api/assets?skip=1&limit=1").await).await;
    assert_eq!(page.as_array().unwrap().len(), 1);

    let app = common::build_test_app(pool);
    let response = get(app, "/api/assets?condition_status=Broken").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Statistics, properties, MIR
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn statistics_without_inspections(pool: PgPool) {
    let id = create_asset(&pool, "stats", json!({"condition_status": "Fair", "condition_score": 3})).await;

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/assets/{id}/statistics")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["asset_id"], id);
    assert_eq!(json["total_inspections"], 0);
    assert_eq!(json["inspections_with_pathology"], 0);
    assert!(json["latest_inspection_date"].is_null());
    assert_eq!(json["current_condition"], "Fair");
    assert_eq!(json["current_condition_score"], 3);
    assert_eq!(json["severity_distribution"], json!({}));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn properties_of_manual_asset_are_empty(pool: PgPool) {
    let id = create_asset(&pool, "props", json!({})).await;

    let app = common::build_test_app(pool.clone());
    let response = get(app, &format!("/api/assets/{id}/properties")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));

    let app = common::build_test_app(pool);
    let response = get(app, "/api/assets/999999/properties").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn mir_report_counts_filled_fields(pool: PgPool) {
    let id = create_asset(
        &pool,
        "mir",
        json!({
            "manufacturer": "Acme",
            "serial_number": "SN-42",
            "location_building": "Main Block",
            "location_room": "   ",
            "spare_parts_list": [],
        }),
    )
    .await;

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/assets/{id}/mir")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["asset_id"], id);
    assert_eq!(json["total"], 20);
    assert_eq!(json["satisfied"], 3);
    assert_eq!(json["completeness"], 15.0);

    let missing: Vec<&str> = json["missing_mandatory"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(missing.len(), 8);
    assert!(missing.contains(&"model_number"));
    assert!(!missing.contains(&"manufacturer"));

    let room = json["requirements"]
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["asset_field"] == "location_room")
        .unwrap();
    assert_eq!(room["satisfied"], false);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn mir_catalog_is_seeded(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/mir/requirements").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let requirements = json.as_array().unwrap();
    assert_eq!(requirements.len(), 20);
    assert_eq!(requirements[0]["requirement_number"], 1);
    assert_eq!(requirements[0]["asset_field"], "design_criteria");
}
