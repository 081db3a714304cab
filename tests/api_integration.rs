// HTTP integration tests for the image sorting API
use std::fs;
use std::sync::Arc;

use actix_web::{test, web, App, http::StatusCode};
use serde_json::{json, Value};
use tempfile::TempDir;

use image_sorter::api;
use image_sorter::app_state::AppState;
use image_sorter::config::AppConfig;
use image_sorter::storage::local_store::LocalFileStore;
use image_sorter::storage::mock_store::MockFileStore;

/// Temp tree:
///   <tmp>/inbox/{cat1.jpg, dog.PNG, notes.txt, albums/}
fn seed_tree() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let inbox = tmp.path().join("inbox");
    fs::create_dir_all(inbox.join("albums")).unwrap();
    fs::write(inbox.join("cat1.jpg"), b"cat-bytes").unwrap();
    fs::write(inbox.join("dog.PNG"), b"dog-bytes").unwrap();
    fs::write(inbox.join("notes.txt"), b"not an image").unwrap();
    tmp
}

fn local_state(config: AppConfig) -> AppState {
    AppState::with_store(config, Arc::new(LocalFileStore::new()))
}

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .configure(api::configure),
        )
        .await
    };
}

#[actix_web::test]
async fn test_list_directories_includes_parent_entry() {
    let tmp = seed_tree();
    let app = init_app!(local_state(AppConfig::default()));
    let root = tmp.path().to_string_lossy().to_string();

    let req = test::TestRequest::get()
        .uri(&format!("/api/list-directories?root={}", root))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["current_path"], json!(root));
    let directories = body["directories"].as_array().unwrap();
    assert_eq!(directories.len(), 2);
    assert_eq!(directories[0]["name"], "..");
    assert_eq!(
        directories[0]["path"],
        json!(tmp.path().parent().unwrap().to_string_lossy())
    );
    assert_eq!(directories[1]["name"], "inbox");
}

#[actix_web::test]
async fn test_list_directories_rejects_missing_root() {
    let tmp = seed_tree();
    let app = init_app!(local_state(AppConfig::default()));

    let req = test::TestRequest::get()
        .uri(&format!("/api/list-directories?root={}/nope", tmp.path().display()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Invalid root directory path");
}

#[actix_web::test]
async fn test_list_subdirectories() {
    let tmp = seed_tree();
    let app = init_app!(local_state(AppConfig::default()));

    let req = test::TestRequest::post()
        .uri("/api/list-subdirectories")
        .set_json(json!({ "directory": tmp.path().join("inbox") }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let subdirectories = body["subdirectories"].as_array().unwrap();
    assert_eq!(subdirectories.len(), 1);
    assert_eq!(subdirectories[0]["name"], "albums");
    assert_eq!(
        subdirectories[0]["path"],
        json!(tmp.path().join("inbox").join("albums").to_string_lossy())
    );
}

#[actix_web::test]
async fn test_list_images_filters_by_extension() {
    let tmp = seed_tree();
    let app = init_app!(local_state(AppConfig::default()));
    let inbox = tmp.path().join("inbox").to_string_lossy().to_string();

    let req = test::TestRequest::post()
        .uri("/api/list-images")
        .set_json(json!({ "folderPath": inbox }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["images"], json!(["cat1.jpg", "dog.PNG"]));
    assert_eq!(body["totalCount"], 2);
    assert_eq!(body["folderPath"], json!(inbox));
}

#[actix_web::test]
async fn test_list_images_invalid_folder_is_bad_request() {
    let tmp = seed_tree();
    let app = init_app!(local_state(AppConfig::default()));

    let req = test::TestRequest::post()
        .uri("/api/list-images")
        .set_json(json!({ "folderPath": tmp.path().join("missing") }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Invalid folder path");
}

#[actix_web::test]
async fn test_malformed_body_gets_json_error() {
    let app = init_app!(local_state(AppConfig::default()));

    let req = test::TestRequest::post()
        .uri("/api/list-images")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));
}

#[actix_web::test]
async fn test_permission_denied_is_forbidden() {
    let store = Arc::new(MockFileStore::new());
    store.add_file("/vault/private.jpg", b"secret");
    store.deny("/vault");
    let app = init_app!(AppState::new_for_testing(store));

    let req = test::TestRequest::post()
        .uri("/api/list-images")
        .set_json(json!({ "folderPath": "/vault" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Permission denied. Cannot access the directory.");

    let req = test::TestRequest::get()
        .uri("/api/list-directories?root=/vault")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_get_image_serves_bytes_with_content_type() {
    let tmp = seed_tree();
    let app = init_app!(local_state(AppConfig::default()));
    let inbox = tmp.path().join("inbox");
    let folder = inbox.to_string_lossy().trim_start_matches('/').to_string();

    let req = test::TestRequest::get()
        .uri(&format!("/api/image/{}/cat1.jpg", folder))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get("content-type").unwrap(), "image/jpeg");
    let body = test::read_body(resp).await;
    assert_eq!(body.as_ref(), b"cat-bytes");

    let req = test::TestRequest::get()
        .uri(&format!("/api/image/{}/missing.jpg", folder))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_save_categorized_with_partial_failure() {
    let tmp = seed_tree();
    let app = init_app!(local_state(AppConfig::default()));
    let inbox = tmp.path().join("inbox");

    let payload = json!({
        "sourceFolder": inbox,
        "categorizedImages": [
            { "filename": "cat1.jpg", "category": "animal" },
            { "filename": "ghost.jpg", "category": "animal" },
            { "filename": "dog.PNG", "category": "pet" },
            { "filename": "notes.txt" }
        ]
    });

    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri("/api/save-categorized")
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        let results = body["results"].as_array().unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0]["renamed"], "cat1_animal.jpg");
        assert_eq!(results[1]["success"], false);
        assert!(results[1]["error"].is_string());
        assert_eq!(results[2]["renamed"], "dog_pet.PNG");
        assert_eq!(body["categorizedCount"], 2);
        assert_eq!(
            body["destinationFolder"],
            json!(tmp.path().join("categorized_images").to_string_lossy())
        );
    }

    let dest = tmp.path().join("categorized_images");
    assert_eq!(fs::read(dest.join("animal").join("cat1_animal.jpg")).unwrap(), b"cat-bytes");
    assert_eq!(fs::read(dest.join("pet").join("dog_pet.PNG")).unwrap(), b"dog-bytes");
    assert!(inbox.join("cat1.jpg").exists());
}

#[actix_web::test]
async fn test_save_categorized_rejects_invalid_data() {
    let tmp = seed_tree();
    let app = init_app!(local_state(AppConfig::default()));

    let req = test::TestRequest::post()
        .uri("/api/save-categorized")
        .set_json(json!({ "sourceFolder": tmp.path().join("inbox"), "categorizedImages": [] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Invalid data provided");
    assert!(!tmp.path().join("categorized_images").exists());
}

#[actix_web::test]
async fn test_allowed_roots_block_outside_paths() {
    let tmp = seed_tree();
    let mut config = AppConfig::default();
    config.browse.allowed_roots = vec![tmp.path().join("inbox").to_string_lossy().to_string()];
    let app = init_app!(local_state(config));

    let req = test::TestRequest::post()
        .uri("/api/list-subdirectories")
        .set_json(json!({ "directory": tmp.path() }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_frontend_assets_and_fallback() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir(tmp.path().join("assets")).unwrap();
    fs::write(tmp.path().join("index.html"), b"<html>app</html>").unwrap();
    fs::write(tmp.path().join("assets").join("app.js"), b"console.log(1)").unwrap();

    let mut config = AppConfig::default();
    config.frontend.static_dir = tmp.path().to_string_lossy().to_string();
    let app = init_app!(local_state(config));

    let req = test::TestRequest::get().uri("/assets/app.js").to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert_eq!(body.as_ref(), b"console.log(1)");

    for uri in ["/", "/sort/session"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body.as_ref(), b"<html>app</html>");
    }
}

#[actix_web::test]
async fn test_frontend_missing_index_is_not_found() {
    let tmp = TempDir::new().unwrap();
    let mut config = AppConfig::default();
    config.frontend.static_dir = tmp.path().to_string_lossy().to_string();
    let app = init_app!(local_state(config));

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

fn encode_path_component(raw: &str) -> String {
    raw.replace('%', "%25").replace('/', "%2F").replace(' ', "%20")
}

#[actix_web::test]
async fn test_get_image_with_encoded_folder_path() {
    let tmp = TempDir::new().unwrap();
    let folder = tmp.path().join("my pics");
    fs::create_dir(&folder).unwrap();
    fs::write(folder.join("a b.jpg"), b"spaced-bytes").unwrap();
    let app = init_app!(local_state(AppConfig::default()));
    let encoded_folder = encode_path_component(&folder.to_string_lossy());

    let req = test::TestRequest::get()
        .uri(&format!("/api/image/{}/{}", encoded_folder, encode_path_component("a b.jpg")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get("content-type").unwrap(), "image/jpeg");
    let body = test::read_body(resp).await;
    assert_eq!(body.as_ref(), b"spaced-bytes");

    let req = test::TestRequest::get()
        .uri(&format!("/api/image/{}/{}", encoded_folder, encode_path_component("../my pics/a b.jpg")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().starts_with("Invalid filename"));
}
