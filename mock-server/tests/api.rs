use axum::{
    body::Body,
    http::{self, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use petfriends_mock::{app, app_with, MockConfig, Pet, PetList, SeedPet};
use tower::ServiceExt;

const BOUNDARY: &str = "test-boundary";

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

async fn body_text(response: axum::response::Response) -> String {
    String::from_utf8(body_bytes(response).await.to_vec()).unwrap()
}

fn form_request(method: &str, uri: &str, auth_key: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(key) = auth_key {
        builder = builder.header("auth_key", key);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_request(uri: &str, auth_key: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("auth_key", auth_key)
        .body(Body::empty())
        .unwrap()
}

fn delete_request(uri: &str, auth_key: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .header("auth_key", auth_key)
        .body(Body::empty())
        .unwrap()
}

/// Hand-encoded multipart body: text fields, then an optional `pet_photo`.
fn multipart_request(uri: &str, auth_key: &str, fields: &[(&str, &str)], photo: Option<&[u8]>) -> Request<Body> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n").as_bytes(),
        );
    }
    if let Some(bytes) = photo {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"pet_photo\"; filename=\"Taipan.jpg\"\r\nContent-Type: image/jpeg\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header("auth_key", auth_key)
        .header(
            http::header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn default_login() -> String {
    let config = MockConfig::default();
    format!("email={}&password={}", config.email.replace('@', "%40"), config.password)
}

async fn login(app: &Router) -> String {
    let resp = app
        .clone()
        .oneshot(form_request("POST", "/api/key", None, &default_login()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = body_json(resp).await;
    body["key"].as_str().unwrap().to_string()
}

async fn add_taipan(app: &Router, key: &str, age: &str) -> Pet {
    let resp = app
        .clone()
        .oneshot(multipart_request(
            "/api/pets",
            key,
            &[("name", "Taipan"), ("animal_type", "Snake"), ("age", age)],
            Some(b"JPEG".as_slice()),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    body_json(resp).await
}

// --- auth ---

#[tokio::test]
async fn key_for_valid_account() {
    let app = app();
    let key = login(&app).await;
    assert_eq!(key.len(), 56);
}

#[tokio::test]
async fn key_for_wrong_password_is_forbidden() {
    let resp = app()
        .oneshot(form_request(
            "POST",
            "/api/key",
            None,
            "email=tester%40petfriends.test&password=nope",
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert!(body_text(resp).await.contains("Forbidden"));
}

#[tokio::test]
async fn key_for_empty_credentials_is_forbidden() {
    let resp = app()
        .oneshot(form_request("POST", "/api/key", None, "email=&password="))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert!(body_text(resp).await.contains("Forbidden"));
}

#[tokio::test]
async fn custom_account_is_honored() {
    let config = MockConfig {
        email: "qa@mail.ru".to_string(),
        password: "pw".to_string(),
        seed_pets: Vec::new(),
    };
    let resp = app_with(config)
        .oneshot(form_request("POST", "/api/key", None, "email=qa%40mail.ru&password=pw"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

// --- list ---

#[tokio::test]
async fn list_with_unknown_key_is_forbidden() {
    let resp = app()
        .oneshot(get_request("/api/pets?filter=", "ea738148a1f19838e1c5d1413877f3691a3731380e733e877b0ae728"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert!(body_text(resp).await.contains("Forbidden"));
}

#[tokio::test]
async fn list_all_includes_seeded_pets() {
    let app = app_with(MockConfig {
        seed_pets: vec![SeedPet::new("Murka", "Cat", "2")],
        ..MockConfig::default()
    });
    let key = login(&app).await;

    let resp = app.clone().oneshot(get_request("/api/pets?filter=", &key)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let list: PetList = body_json(resp).await;
    assert_eq!(list.pets.len(), 1);
    assert_eq!(list.pets[0].name, "Murka");

    let resp = app.oneshot(get_request("/api/pets?filter=my_pets", &key)).await.unwrap();
    let mine: PetList = body_json(resp).await;
    assert!(mine.pets.is_empty());
}

#[tokio::test]
async fn list_with_unrecognized_filter_is_500() {
    let app = app();
    let key = login(&app).await;

    for filter in ["pets", "%D0%9C%D0%BE%D0%B8+%D0%BF%D0%B8%D1%82%D0%BE%D0%BC%D1%86%D1%8B"] {
        let resp = app
            .clone()
            .oneshot(get_request(&format!("/api/pets?filter={filter}"), &key))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_text(resp).await.contains("Internal Server Error"));
    }
}

// --- create ---

#[tokio::test]
async fn add_pet_stores_photo_as_data_uri() {
    let app = app();
    let key = login(&app).await;
    let pet = add_taipan(&app, &key, "99").await;

    assert_eq!(pet.name, "Taipan");
    assert_eq!(pet.age, "99");
    assert_eq!(pet.pet_photo, "data:image/jpeg;base64,SlBFRw==");
}

#[tokio::test]
async fn add_pet_keeps_non_numeric_age() {
    let app = app();
    let key = login(&app).await;
    let pet = add_taipan(&app, &key, "One").await;
    assert_eq!(pet.age, "One");
}

#[tokio::test]
async fn add_pet_without_photo_is_400() {
    let app = app();
    let key = login(&app).await;
    let resp = app
        .oneshot(multipart_request(
            "/api/pets",
            &key,
            &[("name", "Taipan"), ("animal_type", "Snake"), ("age", "1")],
            None,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- update ---

#[tokio::test]
async fn update_of_someone_elses_pet_is_rejected() {
    let app = app();
    let key = login(&app).await;
    let resp = app.clone().oneshot(get_request("/api/pets?filter=", &key)).await.unwrap();
    let list: PetList = body_json(resp).await;
    let foreign = &list.pets[0];

    let resp = app
        .oneshot(form_request(
            "PUT",
            &format!("/api/pets/{}", foreign.id),
            Some(&key),
            "name=Kaa&animal_type=Snake&age=999",
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- delete ---

#[tokio::test]
async fn delete_with_empty_id_is_404() {
    let app = app();
    let key = login(&app).await;
    let resp = app.oneshot(delete_request("/api/pets/", &key)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_of_unknown_id_is_404() {
    let app = app();
    let key = login(&app).await;
    let resp = app
        .oneshot(delete_request("/api/pets/00000000-0000-0000-0000-000000000000", &key))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- full lifecycle ---

#[tokio::test]
async fn pet_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // login
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(form_request("POST", "/api/key", None, &default_login()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = body_json(resp).await;
    let key = body["key"].as_str().unwrap().to_string();

    // create
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(multipart_request(
            "/api/pets",
            &key,
            &[("name", "Тайпан"), ("animal_type", "Змей"), ("age", "99")],
            Some(b"JPEG".as_slice()),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let created: Pet = body_json(resp).await;
    assert_eq!(created.name, "Тайпан");
    let id = created.id.clone();

    // my_pets lists it first
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request("/api/pets?filter=my_pets", &key))
        .await
        .unwrap();
    let mine: PetList = body_json(resp).await;
    assert_eq!(mine.pets.len(), 1);
    assert_eq!(mine.pets[0].id, id);

    // update, partial: age left alone
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(form_request(
            "PUT",
            &format!("/api/pets/{id}"),
            Some(&key),
            "name=Kaa&animal_type=Snake",
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Pet = body_json(resp).await;
    assert_eq!(updated.name, "Kaa");
    assert_eq!(updated.age, "99");

    // photo
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(multipart_request(
            &format!("/api/pets/set_photo/{id}"),
            &key,
            &[],
            Some(b"PNG2".as_slice()),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let with_photo: Pet = body_json(resp).await;
    assert_eq!(with_photo.pet_photo, "data:image/jpeg;base64,UE5HMg==");

    // delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(delete_request(&format!("/api/pets/{id}"), &key))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_bytes(resp).await.is_empty());

    // my_pets after delete: empty
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request("/api/pets?filter=my_pets", &key))
        .await
        .unwrap();
    let mine: PetList = body_json(resp).await;
    assert!(mine.pets.is_empty());
}
