//! End-to-end ingestion of small IFC files into the database.

use std::path::{Path, PathBuf};

use assert_matches::assert_matches;
use bimfm_core::processing_status::{STATUS_COMPLETED, STATUS_ERROR, STATUS_PROCESSING};
use bimfm_db::models::ifc_file::CreateIfcFile;
use bimfm_db::repositories::{AssetRepo, IfcElementRepo, IfcFileRepo, PropertyRepo};
use bimfm_ifc::{process_ifc_file, ProcessingOutcome};
use sqlx::PgPool;

const MODEL: &str = "ISO-10303-21;
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
#31=IFCPROPERTYSINGLEVALUE('IsExternal',$,IFCBOOLEAN(.T.),$);
#34=IFCPROPERTYSET('BYvctVUKr0kugbFTf53O9L',$,'Pset_WallCommon',$,(#30,#31));
#35=IFCRELDEFINESBYPROPERTIES('CYvctVUKr0kugbFTf53O9L',$,$,$,(#20),#34);
ENDSEC;
END-ISO-10303-21;
";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn write_model(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

/// A model with `count` products alternating walls and pipe segments.
///
/// Product `i` reuses the GUID of product `j` for every `(i, j)` in `reused`.
fn generated_model(count: usize, reused: &[(usize, usize)]) -> String {
    let guid = |i: usize| {
        let source = reused.iter().find(|(dup, _)| *dup == i).map_or(i, |(_, j)| *j);
        format!("G{source:021}")
    };
    let mut model = String::from(
        "ISO-10303-21;\nHEADER;\nFILE_SCHEMA(('IFC4'));\nENDSEC;\nDATA;\n\
         #1=IFCPROJECT('0YvctVUKr0kugbFTf53O9L',$,'Campus',$,$,$,$,$,$);\n",
    );
    for i in 0..count {
        let id = 100 + i;
        let line = if i % 2 == 0 {
            format!("#{id}=IFCWALL('{}',$,'Wall-{i}',$,$,$,$,$,.STANDARD.);\n", guid(i))
        } else {
            format!("#{id}=IFCPIPESEGMENT('{}',$,'Pipe-{i}',$,$,$,$,$,$);\n", guid(i))
        };
        model.push_str(&line);
    }
    model.push_str("ENDSEC;\nEND-ISO-10303-21;\n");
    model
}

async fn register(pool: &PgPool, path: &Path) -> i64 {
    let name = path.file_name().unwrap().to_string_lossy().to_string();
    IfcFileRepo::create(
        pool,
        &CreateIfcFile {
            filename: name.clone(),
            file_path: path.to_string_lossy().to_string(),
            file_size: Some(1024),
            project_name: Some(name),
        },
    )
    .await
    .unwrap()
    .id
}

// ---------------------------------------------------------------------------
// Successful ingestion
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn processes_elements_and_assets(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    let path = write_model(dir.path(), "clinic.ifc", MODEL);
    let file_id = register(&pool, &path).await;

    let outcome = process_ifc_file(&pool, file_id, &path).await;
    let summary = assert_matches!(outcome, ProcessingOutcome::Completed(s) => s);
    assert_eq!(summary.elements_processed, 5);
    assert_eq!(summary.assets_created, 2);
    assert_eq!(summary.duplicates_skipped, 0);
    assert_eq!(summary.failures, 0);

    let file = IfcFileRepo::find_by_id(&pool, file_id).await.unwrap().unwrap();
    assert_eq!(file.processing_status, STATUS_COMPLETED);
    assert!(file.processed_at.is_some());
    assert_eq!(file.ifc_schema.as_deref(), Some("IFC4"));
    assert_eq!(file.project_name.as_deref(), Some("Clinic"));
    assert_eq!(file.project_description.as_deref(), Some("Outpatient clinic"));
    assert_eq!(file.elements_processed, 5);
    assert_eq!(file.assets_created, 2);

    assert_eq!(IfcElementRepo::count_by_file(&pool, file_id).await.unwrap(), 5);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn asset_carries_location_and_properties(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    let path = write_model(dir.path(), "clinic.ifc", MODEL);
    let file_id = register(&pool, &path).await;
    process_ifc_file(&pool, file_id, &path).await;

    let wall = AssetRepo::find_by_guid(&pool, "7YvctVUKr0kugbFTf53O9L")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(wall.ifc_type, "IfcWall");
    assert_eq!(wall.name.as_deref(), Some("Wall-001"));
    assert_eq!(wall.description.as_deref(), Some("Exterior wall"));
    assert_eq!(wall.location_building.as_deref(), Some("Main Block"));
    assert_eq!(wall.location_floor.as_deref(), Some("Ground Floor"));
    assert_eq!(wall.ifc_file_id, Some(file_id));

    let props = PropertyRepo::list_for_asset(&pool, wall.id).await.unwrap();
    assert_eq!(props.len(), 2);
    let fire = props.iter().find(|p| p.name == "FireRating").unwrap();
    assert_eq!(fire.value.as_deref(), Some("REI60"));
    assert_eq!(fire.data_type.as_deref(), Some("IfcLabel"));
    assert_eq!(fire.property_set_name.as_deref(), Some("Pset_WallCommon"));

    // Not on the allow-list.
    let pipe = AssetRepo::find_by_guid(&pool, "9YvctVUKr0kugbFTf53O9L").await.unwrap();
    assert!(pipe.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn elements_link_to_assets(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    let path = write_model(dir.path(), "clinic.ifc", MODEL);
    let file_id = register(&pool, &path).await;
    process_ifc_file(&pool, file_id, &path).await;

    let elements = IfcElementRepo::list_by_file(&pool, file_id, 100, 0).await.unwrap();
    let ids: Vec<i64> = elements.iter().map(|e| e.ifc_id).collect();
    assert_eq!(ids, vec![11, 12, 20, 21, 22]);

    let wall = elements.iter().find(|e| e.ifc_id == 20).unwrap();
    assert!(wall.asset_id.is_some());
    let data = wall.ifc_data.as_ref().unwrap();
    assert_eq!(data["ifc_guid"], "7YvctVUKr0kugbFTf53O9L");
    assert_eq!(data["tag"], "W1");
    assert_eq!(
        data["properties"][0]["properties"]["IsExternal"]["value"],
        "True"
    );

    let pipe = elements.iter().find(|e| e.ifc_id == 22).unwrap();
    assert_eq!(pipe.asset_id, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn large_model_spans_several_batches(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    // 205 products: three batches. Product 100 opens the second batch with
    // the GUID of product 99 from the first; product 150 repeats wall 50.
    let content = generated_model(205, &[(100, 99), (150, 50)]);
    let path = write_model(dir.path(), "campus.ifc", &content);
    let file_id = register(&pool, &path).await;

    let outcome = process_ifc_file(&pool, file_id, &path).await;
    let summary = assert_matches!(outcome, ProcessingOutcome::Completed(s) => s);
    assert_eq!(summary.duplicates_skipped, 2);
    assert_eq!(summary.failures, 0);
    assert_eq!(summary.elements_processed, 203);
    // 103 walls, two of which are duplicates.
    assert_eq!(summary.assets_created, 101);

    let file = IfcFileRepo::find_by_id(&pool, file_id).await.unwrap().unwrap();
    assert_eq!(file.processing_status, STATUS_COMPLETED);
    assert_eq!(file.elements_processed, 203);
    assert_eq!(file.assets_created, 101);

    assert_eq!(IfcElementRepo::count_by_file(&pool, file_id).await.unwrap(), 203);
    let assets = AssetRepo::list_all_by_file(&pool, file_id).await.unwrap();
    assert_eq!(assets.len(), 101);

    let elements = IfcElementRepo::list_by_file(&pool, file_id, 1000, 0).await.unwrap();
    assert!(elements.iter().any(|e| e.ifc_id == 304));
    assert!(!elements.iter().any(|e| e.ifc_id == 200 || e.ifc_id == 250));
}

// ---------------------------------------------------------------------------
// Duplicates and failures
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn reupload_skips_existing_guids(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    let first = write_model(dir.path(), "clinic.ifc", MODEL);
    let second = write_model(dir.path(), "clinic-v2.ifc", MODEL);

    let first_id = register(&pool, &first).await;
    process_ifc_file(&pool, first_id, &first).await;

    let second_id = register(&pool, &second).await;
    let outcome = process_ifc_file(&pool, second_id, &second).await;
    let summary = assert_matches!(outcome, ProcessingOutcome::Completed(s) => s);
    assert_eq!(summary.elements_processed, 0);
    assert_eq!(summary.assets_created, 0);
    assert_eq!(summary.duplicates_skipped, 5);

    let file = IfcFileRepo::find_by_id(&pool, second_id).await.unwrap().unwrap();
    assert_eq!(file.processing_status, STATUS_COMPLETED);
    assert_eq!(IfcElementRepo::count_by_file(&pool, second_id).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_content_marks_error(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    let path = write_model(dir.path(), "broken.ifc", "this is not a model");
    let file_id = register(&pool, &path).await;

    let outcome = process_ifc_file(&pool, file_id, &path).await;
    let message = assert_matches!(outcome, ProcessingOutcome::Failed(m) => m);
    assert!(message.contains("ISO-10303-21"));

    let file = IfcFileRepo::find_by_id(&pool, file_id).await.unwrap().unwrap();
    assert_eq!(file.processing_status, STATUS_ERROR);
    assert_eq!(file.processing_error.as_deref(), Some(message.as_str()));
    assert!(file.processed_at.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_file_marks_error(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gone.ifc");
    let file_id = register(&pool, &path).await;

    let outcome = process_ifc_file(&pool, file_id, &path).await;
    assert_matches!(outcome, ProcessingOutcome::Failed(_));

    let file = IfcFileRepo::find_by_id(&pool, file_id).await.unwrap().unwrap();
    assert_eq!(file.processing_status, STATUS_ERROR);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_pending_file_is_skipped(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    let path = write_model(dir.path(), "clinic.ifc", MODEL);
    let file_id = register(&pool, &path).await;
    assert!(IfcFileRepo::mark_processing(&pool, file_id).await.unwrap());

    let outcome = process_ifc_file(&pool, file_id, &path).await;
    assert_eq!(outcome, ProcessingOutcome::Skipped);

    let file = IfcFileRepo::find_by_id(&pool, file_id).await.unwrap().unwrap();
    assert_eq!(file.processing_status, STATUS_PROCESSING);
    assert_eq!(IfcElementRepo::count_by_file(&pool, file_id).await.unwrap(), 0);
}
