use std::{
    collections::HashMap,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post, put},
    Form, Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Pet {
    pub id: String,
    pub name: String,
    pub animal_type: String,
    pub age: String,
    pub pet_photo: String,
    pub user_id: String,
    pub created_at: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PetList {
    pub pets: Vec<Pet>,
}

/// A pet present before any client connects, owned by someone other than
/// the configured account.
#[derive(Clone, Debug)]
pub struct SeedPet {
    pub name: String,
    pub animal_type: String,
    pub age: String,
}

impl SeedPet {
    pub fn new(name: &str, animal_type: &str, age: &str) -> Self {
        Self {
            name: name.to_string(),
            animal_type: animal_type.to_string(),
            age: age.to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct MockConfig {
    pub email: String,
    pub password: String,
    pub seed_pets: Vec<SeedPet>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            email: "tester@petfriends.test".to_string(),
            password: "s3cr3t-pa55".to_string(),
            seed_pets: vec![
                SeedPet::new("Barsik", "Cat", "3"),
                SeedPet::new("Sharik", "Dog", "5"),
            ],
        }
    }
}

#[derive(Default)]
struct Store {
    /// Issued auth keys mapped to the owning user id.
    keys: HashMap<String, String>,
    /// Newest first, matching the service's listing order.
    pets: Vec<Pet>,
}

type Db = Arc<RwLock<Store>>;

#[derive(Clone)]
struct AppState {
    db: Db,
    account: Arc<Account>,
}

struct Account {
    user_id: String,
    email: String,
    password: String,
}

pub fn app() -> Router {
    app_with(MockConfig::default())
}

pub fn app_with(config: MockConfig) -> Router {
    let seed_owner = Uuid::new_v4().simple().to_string();
    let mut store = Store::default();
    for seed in &config.seed_pets {
        store.pets.push(Pet {
            id: new_id(),
            name: seed.name.clone(),
            animal_type: seed.animal_type.clone(),
            age: seed.age.clone(),
            pet_photo: String::new(),
            user_id: seed_owner.clone(),
            created_at: now(),
        });
    }
    let state = AppState {
        db: Arc::new(RwLock::new(store)),
        account: Arc::new(Account {
            user_id: Uuid::new_v4().simple().to_string(),
            email: config.email,
            password: config.password,
        }),
    };
    Router::new()
        .route("/api/key", post(get_api_key))
        .route("/api/pets", get(list_pets).post(add_pet))
        .route("/api/pets/{id}", put(update_pet).delete(delete_pet))
        .route("/api/pets/set_photo/{id}", post(set_photo))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with(listener, MockConfig::default()).await
}

pub async fn run_with(listener: TcpListener, config: MockConfig) -> Result<(), std::io::Error> {
    info!(addr = ?listener.local_addr().ok(), account = %config.email, "petfriends mock listening");
    axum::serve(listener, app_with(config)).await
}

#[derive(Deserialize)]
struct LoginForm {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Deserialize)]
struct ListQuery {
    filter: Option<String>,
}

#[derive(Deserialize)]
struct PetForm {
    name: Option<String>,
    animal_type: Option<String>,
    age: Option<String>,
}

async fn get_api_key(State(state): State<AppState>, Form(login): Form<LoginForm>) -> Response {
    let account = &state.account;
    if login.email.is_empty() || login.email != account.email || login.password != account.password {
        warn!(email = %login.email, "rejected login");
        return error_page(
            StatusCode::FORBIDDEN,
            "This user wasn't found in database",
        );
    }
    let key = new_key();
    state.db.write().await.keys.insert(key.clone(), account.user_id.clone());
    Json(serde_json::json!({ "key": key })).into_response()
}

async fn list_pets(State(state): State<AppState>, headers: HeaderMap, Query(query): Query<ListQuery>) -> Response {
    let db = state.db.read().await;
    let user_id = match caller(&db, &headers) {
        Ok(user_id) => user_id,
        Err(response) => return response,
    };
    let pets = match query.filter.as_deref().unwrap_or("") {
        "" => db.pets.clone(),
        "my_pets" => db.pets.iter().filter(|pet| pet.user_id == user_id).cloned().collect(),
        _ => {
            return error_page(
                StatusCode::INTERNAL_SERVER_ERROR,
                "The server encountered an internal error and was unable to complete your request.",
            )
        }
    };
    Json(PetList { pets }).into_response()
}

async fn add_pet(State(state): State<AppState>, headers: HeaderMap, multipart: Multipart) -> Response {
    let user_id = match caller(&*state.db.read().await, &headers) {
        Ok(user_id) => user_id,
        Err(response) => return response,
    };
    let mut upload = match read_upload(multipart).await {
        Ok(upload) => upload,
        Err(_) => return bad_request(),
    };
    let (Some(name), Some(animal_type), Some(age), Some(pet_photo)) = (
        upload.fields.remove("name"),
        upload.fields.remove("animal_type"),
        upload.fields.remove("age"),
        upload.photo,
    ) else {
        return bad_request();
    };
    let pet = Pet {
        id: new_id(),
        name,
        animal_type,
        age,
        pet_photo,
        user_id,
        created_at: now(),
    };
    state.db.write().await.pets.insert(0, pet.clone());
    Json(pet).into_response()
}

async fn update_pet(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Form(input): Form<PetForm>,
) -> Response {
    let mut db = state.db.write().await;
    let user_id = match caller(&db, &headers) {
        Ok(user_id) => user_id,
        Err(response) => return response,
    };
    let Some(pet) = owned_pet(&mut db, &id, &user_id) else {
        return bad_request();
    };
    if let Some(name) = input.name {
        pet.name = name;
    }
    if let Some(animal_type) = input.animal_type {
        pet.animal_type = animal_type;
    }
    if let Some(age) = input.age {
        pet.age = age;
    }
    Json(pet.clone()).into_response()
}

async fn set_photo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    let user_id = match caller(&*state.db.read().await, &headers) {
        Ok(user_id) => user_id,
        Err(response) => return response,
    };
    let Ok(Upload { photo: Some(photo), .. }) = read_upload(multipart).await else {
        return bad_request();
    };
    let mut db = state.db.write().await;
    let Some(pet) = owned_pet(&mut db, &id, &user_id) else {
        return bad_request();
    };
    pet.pet_photo = photo;
    Json(pet.clone()).into_response()
}

async fn delete_pet(State(state): State<AppState>, Path(id): Path<String>, headers: HeaderMap) -> Response {
    let mut db = state.db.write().await;
    let user_id = match caller(&db, &headers) {
        Ok(user_id) => user_id,
        Err(response) => return response,
    };
    let before = db.pets.len();
    db.pets.retain(|pet| !(pet.id == id && pet.user_id == user_id));
    if db.pets.len() == before {
        return error_page(
            StatusCode::NOT_FOUND,
            "The requested URL was not found on the server.",
        );
    }
    StatusCode::OK.into_response()
}

/// Resolve the `auth_key` header to a user id, or the 403 page to send back.
fn caller(db: &Store, headers: &HeaderMap) -> Result<String, Response> {
    headers
        .get("auth_key")
        .and_then(|value| value.to_str().ok())
        .and_then(|key| db.keys.get(key))
        .cloned()
        .ok_or_else(|| {
            warn!("request with missing or unknown auth_key");
            error_page(StatusCode::FORBIDDEN, "Please provide 'auth_key' Header")
        })
}

fn owned_pet<'a>(db: &'a mut Store, id: &str, user_id: &str) -> Option<&'a mut Pet> {
    db.pets.iter_mut().find(|pet| pet.id == id && pet.user_id == user_id)
}

#[derive(Default)]
struct Upload {
    fields: HashMap<String, String>,
    photo: Option<String>,
}

async fn read_upload(mut multipart: Multipart) -> Result<Upload, MultipartError> {
    let mut upload = Upload::default();
    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        if name == "pet_photo" {
            let mime = field.content_type().unwrap_or("application/octet-stream").to_string();
            let bytes = field.bytes().await?;
            upload.photo = Some(data_uri(&mime, &bytes));
        } else {
            upload.fields.insert(name, field.text().await?);
        }
    }
    Ok(upload)
}

pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

fn bad_request() -> Response {
    error_page(
        StatusCode::BAD_REQUEST,
        "The browser (or proxy) sent a request that this server could not understand.",
    )
}

/// HTML error page in the shape the real service produces.
fn error_page(status: StatusCode, detail: &str) -> Response {
    let code = status.as_u16();
    let reason = status.canonical_reason().unwrap_or("Error");
    let page = format!(
        "<!doctype html>\n<html lang=en>\n<title>{code} {reason}</title>\n<h1>{reason}</h1>\n<p>{detail}</p>\n"
    );
    (status, Html(page)).into_response()
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// 56 hex characters, the length of the service's keys.
fn new_key() -> String {
    let tail = Uuid::new_v4().simple().to_string();
    format!("{}{}", Uuid::new_v4().simple(), &tail[..24])
}

fn now() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs_f64().to_string())
        .unwrap_or_default()
}
