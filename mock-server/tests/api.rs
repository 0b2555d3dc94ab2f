use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mock_server::{app, app_with_accounts, Pet, PetList, DEMO_EMAIL, DEMO_PASSWORD};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

async fn send(app: &Router, request: Request<String>) -> axum::response::Response {
    app.clone().oneshot(request).await.unwrap()
}

async fn api_key(app: &Router, email: &str, password: &str) -> String {
    let resp = send(
        app,
        Request::builder()
            .uri("/api/key")
            .header("email", email)
            .header("password", password)
            .body(String::new())
            .unwrap(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = body_json(resp).await;
    body["key"].as_str().unwrap().to_string()
}

fn list_request(key: &str, filter: &str) -> Request<String> {
    Request::builder()
        .uri(format!("/api/pets?filter={filter}"))
        .header("auth_key", key)
        .body(String::new())
        .unwrap()
}

fn form_request(method: &str, uri: &str, key: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("auth_key", key)
        .header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(body.to_string())
        .unwrap()
}

fn photo_request(uri: &str, key: &str, fields: &[(&str, &str)]) -> Request<String> {
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--B\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    body.push_str(
        "--B\r\nContent-Disposition: form-data; name=\"pet_photo\"; filename=\"p.jpg\"\r\nContent-Type: image/jpeg\r\n\r\nhi\r\n--B--\r\n",
    );
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("auth_key", key)
        .header(http::header::CONTENT_TYPE, "multipart/form-data; boundary=B")
        .body(body)
        .unwrap()
}

// --- key ---

#[tokio::test]
async fn api_key_for_demo_account() {
    let app = app();
    let key = api_key(&app, DEMO_EMAIL, DEMO_PASSWORD).await;
    assert!(!key.is_empty());
    // Stable across calls.
    assert_eq!(api_key(&app, DEMO_EMAIL, DEMO_PASSWORD).await, key);
}

#[tokio::test]
async fn api_key_wrong_password_is_html_403() {
    let app = app();
    let resp = send(
        &app,
        Request::builder()
            .uri("/api/key")
            .header("email", DEMO_EMAIL)
            .header("password", "wrong")
            .body(String::new())
            .unwrap(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body = body_bytes(resp).await;
    assert!(body.starts_with(b"<!DOCTYPE html>"));
}

// --- list ---

#[tokio::test]
async fn list_without_key_is_forbidden() {
    let app = app();
    let resp = send(&app, list_request("", "")).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn list_empty() {
    let app = app();
    let key = api_key(&app, DEMO_EMAIL, DEMO_PASSWORD).await;
    let resp = send(&app, list_request(&key, "")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let list: PetList = body_json(resp).await;
    assert!(list.pets.is_empty());
}

#[tokio::test]
async fn list_unknown_filter_is_400() {
    let app = app();
    let key = api_key(&app, DEMO_EMAIL, DEMO_PASSWORD).await;
    let resp = send(&app, list_request(&key, "everything")).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn my_pets_filters_by_owner() {
    let app = app_with_accounts(&[("a@x", "1"), ("b@x", "2")]);
    let a = api_key(&app, "a@x", "1").await;
    let b = api_key(&app, "b@x", "2").await;

    let resp = send(&app, form_request("POST", "/api/create_pet_simple", &a, "name=A&animal_type=cat&age=1")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = send(&app, form_request("POST", "/api/create_pet_simple", &b, "name=B&animal_type=dog&age=2")).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let all: PetList = body_json(send(&app, list_request(&a, "")).await).await;
    assert_eq!(all.pets.len(), 2);
    let mine: PetList = body_json(send(&app, list_request(&a, "my_pets")).await).await;
    assert_eq!(mine.pets.len(), 1);
    assert_eq!(mine.pets[0].name, "A");
}

// --- create ---

#[tokio::test]
async fn create_simple_missing_field_is_400() {
    let app = app();
    let key = api_key(&app, DEMO_EMAIL, DEMO_PASSWORD).await;
    let resp = send(&app, form_request("POST", "/api/create_pet_simple", &key, "name=Rex")).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_with_photo() {
    let app = app();
    let key = api_key(&app, DEMO_EMAIL, DEMO_PASSWORD).await;
    let resp = send(
        &app,
        photo_request("/api/pets", &key, &[("name", "Rex"), ("animal_type", "dog"), ("age", "4")]),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let pet: Pet = body_json(resp).await;
    assert_eq!(pet.name, "Rex");
    assert_eq!(pet.age, "4");
    assert_eq!(pet.pet_photo, "data:image/jpeg;base64,aGk=");
}

// --- update / delete ---

#[tokio::test]
async fn update_unknown_pet_is_404() {
    let app = app();
    let key = api_key(&app, DEMO_EMAIL, DEMO_PASSWORD).await;
    let resp = send(&app, form_request("PUT", "/api/pets/nope", &key, "name=X")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn other_users_pet_is_forbidden() {
    let app = app_with_accounts(&[("a@x", "1"), ("b@x", "2")]);
    let a = api_key(&app, "a@x", "1").await;
    let b = api_key(&app, "b@x", "2").await;
    let pet: Pet = body_json(
        send(&app, form_request("POST", "/api/create_pet_simple", &a, "name=A&animal_type=cat&age=1")).await,
    )
    .await;

    let uri = format!("/api/pets/{}", pet.id);
    let resp = send(&app, form_request("PUT", &uri, &b, "name=Stolen")).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let resp = send(
        &app,
        Request::builder()
            .method("DELETE")
            .uri(&uri)
            .header("auth_key", &b)
            .body(String::new())
            .unwrap(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

// --- full lifecycle ---

#[tokio::test]
async fn pet_lifecycle() {
    let app = app();
    let key = api_key(&app, DEMO_EMAIL, DEMO_PASSWORD).await;

    // create
    let resp = send(&app, form_request("POST", "/api/create_pet_simple", &key, "name=Murka&animal_type=cat&age=2")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let created: Pet = body_json(resp).await;
    assert!(created.pet_photo.is_empty());
    let id = created.id.clone();

    // set photo
    let resp = send(&app, photo_request(&format!("/api/pets/set_photo/{id}"), &key, &[])).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let with_photo: Pet = body_json(resp).await;
    assert_eq!(with_photo.id, id);
    assert!(with_photo.pet_photo.starts_with("data:image/jpeg;base64,"));

    // update: only age
    let resp = send(&app, form_request("PUT", &format!("/api/pets/{id}"), &key, "age=3")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Pet = body_json(resp).await;
    assert_eq!(updated.name, "Murka"); // unchanged
    assert_eq!(updated.age, "3");

    // delete: 200 with an empty body
    let resp = send(
        &app,
        Request::builder()
            .method("DELETE")
            .uri(format!("/api/pets/{id}"))
            .header("auth_key", &key)
            .body(String::new())
            .unwrap(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_bytes(resp).await.is_empty());

    // list after delete
    let list: PetList = body_json(send(&app, list_request(&key, "my_pets")).await).await;
    assert!(list.pets.iter().all(|pet| pet.id != id));
}
