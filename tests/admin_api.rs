use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use granite_warehouse::{
    AppState,
    app::build_router,
    config::{AppConfig, CorsConfig, DatabaseConfig, ImageConfig, ServerConfig},
    services::ImageStore,
    store::MemoryCatalogStore,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "granite-test-boundary";

struct TestApp {
    router: Router,
    images: ImageStore,
    _dir: TempDir,
}

impl TestApp {
    fn spawn() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                max_body_size: 1024 * 1024,
            },
            database: DatabaseConfig {
                url: "memory".to_string(),
                max_connections: 1,
            },
            cors: CorsConfig {
                allowed_origins: vec!["http://localhost:4200".to_string()],
            },
            images: ImageConfig {
                web_root: dir.path().to_path_buf(),
                image_folder: "images/ProductImage".to_string(),
                default_image: "default_image.jpg".to_string(),
            },
        };

        let images = ImageStore::new(config.images.clone());
        std::fs::create_dir_all(images.folder_path()).unwrap();
        std::fs::write(images.default_image_path(), b"default").unwrap();

        let state = AppState {
            store: Arc::new(MemoryCatalogStore::new()),
            images: images.clone(),
        };
        let router = build_router(state, &config).expect("failed to build router");

        Self {
            router,
            images,
            _dir: dir,
        }
    }

    async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let response = self
            .send(Request::get(uri).body(Body::empty()).unwrap())
            .await;
        let status = response.status();
        (status, json_body(response).await)
    }

    async fn post_form(&self, uri: &str, body: &str) -> Response {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    async fn post_multipart(
        &self,
        uri: &str,
        fields: &[(&str, &str)],
        file: Option<(&str, &[u8])>,
    ) -> Response {
        let request = Request::post(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(multipart_body(fields, file)))
            .unwrap();
        self.send(request).await
    }

    async fn create_product_type(&self, name: &str) -> i64 {
        let response = self
            .post_form("/admin/product-types/create", &format!("name={}", name))
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        last_id(&self.get("/admin/product-types").await.1)
    }

    async fn create_special_tag(&self, name: &str) -> i64 {
        let response = self
            .post_form("/admin/special-tags/create", &format!("name={}", name))
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        last_id(&self.get("/admin/special-tags").await.1)
    }

    /// Creates a type, a tag and one product; returns the product JSON.
    async fn create_product(&self, file: Option<(&str, &[u8])>) -> Value {
        let type_id = self.create_product_type("Granite").await.to_string();
        let tag_id = self.create_special_tag("New").await.to_string();

        let response = self
            .post_multipart(
                "/admin/products/create",
                &product_fields(&type_id, &tag_id),
                file,
            )
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let (_, products) = self.get("/admin/products").await;
        products.as_array().unwrap().last().unwrap().clone()
    }
}

fn product_fields<'a>(type_id: &'a str, tag_id: &'a str) -> Vec<(&'a str, &'a str)> {
    vec![
        ("name", "Black Galaxy"),
        ("price", "149.90"),
        ("available", "true"),
        ("shade_color", "Black"),
        ("product_type_id", type_id),
        ("special_tag_id", tag_id),
    ]
}

fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }

    if let Some((file_name, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                BOUNDARY, file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

async fn json_body(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap()
}

fn last_id(list: &Value) -> i64 {
    list.as_array().unwrap().last().unwrap()["id"]
        .as_i64()
        .unwrap()
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
}

#[tokio::test]
async fn health_endpoints_report_ok() {
    let app = TestApp::spawn();

    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = app.get("/health/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn users_index_is_an_empty_stub() {
    let app = TestApp::spawn();

    let (status, body) = app.get("/admin/users").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["users"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn product_type_create_then_list() {
    let app = TestApp::spawn();

    let (status, form) = app.get("/admin/product-types/create").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(form["name"], "");

    let response = app
        .post_form("/admin/product-types/create", "name=Granite")
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin/product-types");

    let (_, list) = app.get("/admin/product-types").await;
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["name"], "Granite");
}

#[tokio::test]
async fn invalid_create_redisplays_form_without_inserting() {
    let app = TestApp::spawn();
    app.create_special_tag("Sale").await;

    let response = app
        .post_form("/admin/special-tags/create", "name=++")
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = json_body(response).await;
    assert_eq!(body["errors"]["name"], "Name is required");
    assert_eq!(body["form"]["name"], "  ");

    let (_, list) = app.get("/admin/special-tags").await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn edit_requires_matching_identifier() {
    let app = TestApp::spawn();
    let id = app.create_product_type("Granite").await;
    let tag = app.create_special_tag("New").await;

    let response = app
        .post_form(
            &format!("/admin/product-types/edit/{}", id),
            &format!("id={}&name=Marble", id + 1),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .post_form(&format!("/admin/product-types/edit/{}", id), "name=Marble")
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    for body in ["id=abc&name=Marble", "id=&name=Marble"] {
        let response = app
            .post_form(&format!("/admin/product-types/edit/{}", id), body)
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "body {}", body);
    }

    let response = app
        .post_form(&format!("/admin/special-tags/edit/{}", tag), "id=abc&name=Sale")
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let (_, current) = app.get(&format!("/admin/product-types/edit/{}", id)).await;
    assert_eq!(current["name"], "Granite");

    let response = app
        .post_form(
            &format!("/admin/product-types/edit/{}", id),
            &format!("id={}&name=Marble", id),
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let (_, current) = app
        .get(&format!("/admin/product-types/details/{}", id))
        .await;
    assert_eq!(current["name"], "Marble");
}

#[tokio::test]
async fn edit_with_invalid_name_keeps_row() {
    let app = TestApp::spawn();
    let id = app.create_special_tag("Sale").await;

    let response = app
        .post_form(
            &format!("/admin/special-tags/edit/{}", id),
            &format!("id={}&name=", id),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let (_, current) = app.get(&format!("/admin/special-tags/edit/{}", id)).await;
    assert_eq!(current["name"], "Sale");
}

#[tokio::test]
async fn missing_or_malformed_ids_are_not_found() {
    let app = TestApp::spawn();

    for uri in [
        "/admin/product-types/edit/99",
        "/admin/product-types/details/abc",
        "/admin/special-tags/delete/99",
        "/admin/products/details/5",
        "/admin/products/edit/not-a-number",
    ] {
        let (status, _) = app.get(uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
    }
}

#[tokio::test]
async fn lookup_delete_is_idempotent() {
    let app = TestApp::spawn();
    let id = app.create_product_type("Granite").await;

    let (status, confirm) = app
        .get(&format!("/admin/product-types/delete/{}", id))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(confirm["name"], "Granite");

    let response = app
        .post_form(&format!("/admin/product-types/delete/{}", id), "")
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let (_, list) = app.get("/admin/product-types").await;
    assert!(list.as_array().unwrap().is_empty());

    let response = app
        .post_form(&format!("/admin/product-types/delete/{}", id), "")
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn referenced_lookups_cannot_be_deleted() {
    let app = TestApp::spawn();
    let product = app.create_product(None).await;
    let type_id = product["product_type_id"].as_i64().unwrap();
    let tag_id = product["special_tag_id"].as_i64().unwrap();

    let response = app
        .post_form(&format!("/admin/special-tags/delete/{}", tag_id), "")
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .post_form(&format!("/admin/product-types/delete/{}", type_id), "")
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let (status, _) = app
        .get(&format!("/admin/special-tags/details/{}", tag_id))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn product_without_upload_gets_default_image() {
    let app = TestApp::spawn();
    let product = app.create_product(None).await;
    let id = product["id"].as_i64().unwrap() as i32;

    assert_eq!(
        product["image"],
        format!("/images/ProductImage/{}.jpg", id)
    );
    assert_eq!(
        std::fs::read(app.images.file_path(id, ".jpg")).unwrap(),
        b"default"
    );

    let response = app
        .send(
            Request::get(format!("/images/ProductImage/{}.jpg", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"default");
}

#[tokio::test]
async fn product_upload_is_renamed_to_its_id() {
    let app = TestApp::spawn();
    let product = app.create_product(Some(("x.png", b"png-bytes".as_slice()))).await;
    let id = product["id"].as_i64().unwrap() as i32;

    assert_eq!(product["image"], format!("/images/ProductImage/{}.png", id));
    assert_eq!(product["name"], "Black Galaxy");
    assert_eq!(product["price"], "149.90");
    assert_eq!(product["available"], true);
    assert_eq!(product["product_type"]["name"], "Granite");
    assert_eq!(product["special_tag"]["name"], "New");
    assert_eq!(
        std::fs::read(app.images.file_path(id, ".png")).unwrap(),
        b"png-bytes"
    );
    assert!(!app.images.file_path(id, ".jpg").exists());
}

#[tokio::test]
async fn product_create_rejects_invalid_fields_and_unknown_references() {
    let app = TestApp::spawn();
    app.create_product_type("Granite").await;

    let response = app
        .post_multipart(
            "/admin/products/create",
            &[("name", ""), ("price", "abc")],
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert_eq!(body["form"]["price"], "abc");
    assert!(body["errors"]["name"].is_string());

    let response = app
        .post_multipart("/admin/products/create", &product_fields("1", "42"), None)
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert_eq!(body["errors"]["special_tag_id"], "Special tag does not exist");

    let (_, products) = app.get("/admin/products").await;
    assert!(products.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn product_price_must_fit_the_stored_precision() {
    let app = TestApp::spawn();
    let type_id = app.create_product_type("Granite").await.to_string();
    let tag_id = app.create_special_tag("New").await.to_string();

    for price in ["123456789012345.6789", "10.005"] {
        let mut fields = product_fields(&type_id, &tag_id);
        fields[1] = ("price", price);

        let response = app
            .post_multipart("/admin/products/create", &fields, None)
            .await;
        assert_eq!(
            response.status(),
            StatusCode::UNPROCESSABLE_ENTITY,
            "price {}",
            price
        );
        let body = json_body(response).await;
        assert!(body["errors"]["price"].is_string());
        assert_eq!(body["form"]["price"], price);
    }

    let (_, products) = app.get("/admin/products").await;
    assert!(products.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn product_form_views_include_dropdowns() {
    let app = TestApp::spawn();
    let product = app.create_product(None).await;
    let id = product["id"].as_i64().unwrap();

    let (status, view) = app.get("/admin/products/create").await;
    assert_eq!(status, StatusCode::OK);
    assert!(view["product"].is_null());
    assert_eq!(view["product_types"].as_array().unwrap().len(), 1);
    assert_eq!(view["special_tags"].as_array().unwrap().len(), 1);

    for action in ["edit", "details", "delete"] {
        let (status, view) = app.get(&format!("/admin/products/{}/{}", action, id)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["product"]["id"], id);
        assert_eq!(view["product"]["product_type"]["name"], "Granite");
    }
}

#[tokio::test]
async fn product_edit_with_upload_replaces_old_file() {
    let app = TestApp::spawn();
    let product = app.create_product(None).await;
    let id = product["id"].as_i64().unwrap() as i32;
    let id_str = id.to_string();
    let type_id = product["product_type_id"].to_string();
    let tag_id = product["special_tag_id"].to_string();

    let mut fields = product_fields(&type_id, &tag_id);
    fields.push(("id", id_str.as_str()));
    fields.retain(|(name, _)| *name != "name");
    fields.push(("name", "Blue Pearl"));

    let response = app
        .post_multipart(
            &format!("/admin/products/edit/{}", id),
            &fields,
            Some(("pearl.png", b"pearl".as_slice())),
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin/products");

    assert!(!app.images.file_path(id, ".jpg").exists());
    assert_eq!(
        std::fs::read(app.images.file_path(id, ".png")).unwrap(),
        b"pearl"
    );

    let (_, view) = app.get(&format!("/admin/products/details/{}", id)).await;
    assert_eq!(view["product"]["name"], "Blue Pearl");
    assert_eq!(
        view["product"]["image"],
        format!("/images/ProductImage/{}.png", id)
    );
}

#[tokio::test]
async fn product_edit_without_upload_keeps_or_overrides_path() {
    let app = TestApp::spawn();
    let product = app.create_product(None).await;
    let id = product["id"].as_i64().unwrap();
    let id_str = id.to_string();
    let type_id = product["product_type_id"].to_string();
    let tag_id = product["special_tag_id"].to_string();
    let original_image = product["image"].clone();

    let mut fields = product_fields(&type_id, &tag_id);
    fields.push(("id", id_str.as_str()));
    fields.retain(|(name, _)| *name != "available");

    let response = app
        .post_multipart(&format!("/admin/products/edit/{}", id), &fields, None)
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let (_, view) = app.get(&format!("/admin/products/edit/{}", id)).await;
    assert_eq!(view["product"]["image"], original_image);
    assert_eq!(view["product"]["available"], false);

    fields.push(("image", "/images/ProductImage/shared.jpg"));
    let response = app
        .post_multipart(&format!("/admin/products/edit/{}", id), &fields, None)
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let (_, view) = app.get(&format!("/admin/products/edit/{}", id)).await;
    assert_eq!(view["product"]["image"], "/images/ProductImage/shared.jpg");
}

#[tokio::test]
async fn product_edit_with_mismatched_id_changes_nothing() {
    let app = TestApp::spawn();
    let product = app.create_product(None).await;
    let id = product["id"].as_i64().unwrap() as i32;
    let other_id = (id + 1).to_string();
    let type_id = product["product_type_id"].to_string();
    let tag_id = product["special_tag_id"].to_string();

    let mut fields = product_fields(&type_id, &tag_id);
    fields.push(("id", other_id.as_str()));

    let response = app
        .post_multipart(
            &format!("/admin/products/edit/{}", id),
            &fields,
            Some(("new.png", b"new".as_slice())),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    assert!(app.images.file_path(id, ".jpg").exists());
    assert!(!app.images.file_path(id, ".png").exists());
}

#[tokio::test]
async fn product_delete_removes_row_and_file() {
    let app = TestApp::spawn();
    let product = app.create_product(Some(("slab.webp", b"webp".as_slice()))).await;
    let id = product["id"].as_i64().unwrap() as i32;
    assert!(app.images.file_path(id, ".webp").exists());

    let response = app
        .post_form(&format!("/admin/products/delete/{}", id), "")
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    assert!(!app.images.file_path(id, ".webp").exists());
    let (_, products) = app.get("/admin/products").await;
    assert!(products.as_array().unwrap().is_empty());

    let response = app
        .post_form(&format!("/admin/products/delete/{}", id), "")
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn product_delete_tolerates_missing_image_file() {
    let app = TestApp::spawn();
    let product = app.create_product(None).await;
    let id = product["id"].as_i64().unwrap() as i32;
    std::fs::remove_file(app.images.file_path(id, ".jpg")).unwrap();

    let response = app
        .post_form(&format!("/admin/products/delete/{}", id), "")
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let (status, _) = app.get(&format!("/admin/products/details/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
