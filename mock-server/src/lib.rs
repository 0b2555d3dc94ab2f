use std::{
    collections::HashMap,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post, put},
    Form, Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;
use uuid::Uuid;

pub const DEMO_EMAIL: &str = "demo@petfriends.test";
pub const DEMO_PASSWORD: &str = "demo-password";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
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

/// Text fields of a pet as sent by forms. Missing fields stay `None`.
#[derive(Default, Deserialize)]
pub struct PetForm {
    pub name: Option<String>,
    pub animal_type: Option<String>,
    pub age: Option<String>,
}

#[derive(Deserialize)]
pub struct PetsQuery {
    #[serde(default)]
    pub filter: String,
}

struct Account {
    password: String,
    user_id: String,
    key: String,
}

#[derive(Default)]
pub struct Store {
    accounts: HashMap<String, Account>,
    pets: Vec<Pet>,
}

impl Store {
    pub fn with_accounts(accounts: &[(&str, &str)]) -> Self {
        let mut store = Self::default();
        for (email, password) in accounts {
            store.accounts.insert(
                email.to_string(),
                Account {
                    password: password.to_string(),
                    user_id: Uuid::new_v4().simple().to_string(),
                    key: Uuid::new_v4().simple().to_string(),
                },
            );
        }
        store
    }

    fn user_for_key(&self, key: &str) -> Option<&str> {
        self.accounts
            .values()
            .find(|account| account.key == key)
            .map(|account| account.user_id.as_str())
    }
}

pub type Db = Arc<RwLock<Store>>;

/// Router with the single demo account.
pub fn app() -> Router {
    app_with_accounts(&[(DEMO_EMAIL, DEMO_PASSWORD)])
}

pub fn app_with_accounts(accounts: &[(&str, &str)]) -> Router {
    let db: Db = Arc::new(RwLock::new(Store::with_accounts(accounts)));
    Router::new()
        .route("/api/key", get(get_api_key))
        .route("/api/pets", get(list_pets).post(add_new_pet))
        .route("/api/create_pet_simple", post(create_pet_simple))
        .route("/api/pets/set_photo/{pet_id}", post(set_photo))
        .route("/api/pets/{pet_id}", put(update_pet).delete(delete_pet))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    serve(listener, app()).await
}

pub async fn serve(listener: TcpListener, app: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, app).await
}

async fn get_api_key(State(db): State<Db>, headers: HeaderMap) -> Response {
    let email = header(&headers, "email");
    let store = db.read().await;
    match store.accounts.get(email) {
        Some(account) if account.password == header(&headers, "password") => {
            info!(email, "issued api key");
            Json(json!({ "key": account.key })).into_response()
        }
        _ => html_error(
            StatusCode::FORBIDDEN,
            "This user wasn't found in database",
        ),
    }
}

async fn list_pets(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(query): Query<PetsQuery>,
) -> Result<Json<PetList>, Response> {
    let store = db.read().await;
    let user_id = authorize(&store, &headers)?;
    let pets = match query.filter.as_str() {
        "" => store.pets.clone(),
        "my_pets" => store
            .pets
            .iter()
            .filter(|pet| pet.user_id == user_id)
            .cloned()
            .collect(),
        _ => {
            return Err(html_error(
                StatusCode::BAD_REQUEST,
                "Filter value is incorrect",
            ))
        }
    };
    info!(filter = %query.filter, count = pets.len(), "listed pets");
    Ok(Json(PetList { pets }))
}

async fn add_new_pet(
    State(db): State<Db>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<Pet>, Response> {
    let (form, photo) = read_multipart(multipart).await?;
    let mut store = db.write().await;
    let user_id = authorize(&store, &headers)?;
    let mut pet = new_pet(form, user_id)?;
    if let Some(bytes) = photo {
        pet.pet_photo = photo_data_url(&bytes);
    }
    info!(id = %pet.id, "created pet with photo");
    store.pets.push(pet.clone());
    Ok(Json(pet))
}

async fn create_pet_simple(
    State(db): State<Db>,
    headers: HeaderMap,
    Form(form): Form<PetForm>,
) -> Result<Json<Pet>, Response> {
    let mut store = db.write().await;
    let user_id = authorize(&store, &headers)?;
    let pet = new_pet(form, user_id)?;
    info!(id = %pet.id, "created pet");
    store.pets.push(pet.clone());
    Ok(Json(pet))
}

async fn set_photo(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(pet_id): Path<String>,
    multipart: Multipart,
) -> Result<Json<Pet>, Response> {
    let (_, photo) = read_multipart(multipart).await?;
    let mut store = db.write().await;
    let user_id = authorize(&store, &headers)?;
    let bytes =
        photo.ok_or_else(|| html_error(StatusCode::BAD_REQUEST, "pet_photo is required"))?;
    let pet = owned_pet_mut(&mut store, &pet_id, &user_id)?;
    pet.pet_photo = photo_data_url(&bytes);
    info!(id = %pet_id, "set pet photo");
    Ok(Json(pet.clone()))
}

async fn update_pet(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(pet_id): Path<String>,
    Form(form): Form<PetForm>,
) -> Result<Json<Pet>, Response> {
    let mut store = db.write().await;
    let user_id = authorize(&store, &headers)?;
    let pet = owned_pet_mut(&mut store, &pet_id, &user_id)?;
    if let Some(name) = form.name {
        pet.name = name;
    }
    if let Some(animal_type) = form.animal_type {
        pet.animal_type = animal_type;
    }
    if let Some(age) = form.age {
        pet.age = age;
    }
    info!(id = %pet_id, "updated pet");
    Ok(Json(pet.clone()))
}

async fn delete_pet(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(pet_id): Path<String>,
) -> Result<StatusCode, Response> {
    let mut store = db.write().await;
    let user_id = authorize(&store, &headers)?;
    owned_pet_mut(&mut store, &pet_id, &user_id)?;
    store.pets.retain(|pet| pet.id != pet_id);
    info!(id = %pet_id, "deleted pet");
    Ok(StatusCode::OK)
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
}

fn authorize(store: &Store, headers: &HeaderMap) -> Result<String, Response> {
    store
        .user_for_key(header(headers, "auth_key"))
        .map(str::to_string)
        .ok_or_else(|| {
            html_error(
                StatusCode::FORBIDDEN,
                "Please provide 'auth_key' Header",
            )
        })
}

fn owned_pet_mut<'a>(
    store: &'a mut Store,
    pet_id: &str,
    user_id: &str,
) -> Result<&'a mut Pet, Response> {
    let pet = store
        .pets
        .iter_mut()
        .find(|pet| pet.id == pet_id)
        .ok_or_else(|| (StatusCode::NOT_FOUND, "Pet not found").into_response())?;
    if pet.user_id != user_id {
        return Err(html_error(
            StatusCode::FORBIDDEN,
            "This pet belongs to another user",
        ));
    }
    Ok(pet)
}

fn new_pet(form: PetForm, user_id: String) -> Result<Pet, Response> {
    let (Some(name), Some(animal_type), Some(age)) = (form.name, form.animal_type, form.age) else {
        return Err(html_error(
            StatusCode::BAD_REQUEST,
            "name, animal_type and age are required",
        ));
    };
    let created_at = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or_default();
    Ok(Pet {
        id: Uuid::new_v4().simple().to_string(),
        name,
        animal_type,
        age,
        pet_photo: String::new(),
        user_id,
        created_at: created_at.to_string(),
    })
}

async fn read_multipart(mut multipart: Multipart) -> Result<(PetForm, Option<Vec<u8>>), Response> {
    let mut form = PetForm::default();
    let mut photo = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| html_error(StatusCode::BAD_REQUEST, &e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "pet_photo" {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| html_error(StatusCode::BAD_REQUEST, &e.body_text()))?;
            photo = Some(bytes.to_vec());
            continue;
        }
        let text = field
            .text()
            .await
            .map_err(|e| html_error(StatusCode::BAD_REQUEST, &e.body_text()))?;
        match name.as_str() {
            "name" => form.name = Some(text),
            "animal_type" => form.animal_type = Some(text),
            "age" => form.age = Some(text),
            _ => {}
        }
    }
    Ok((form, photo))
}

fn photo_data_url(bytes: &[u8]) -> String {
    format!("data:image/jpeg;base64,{}", STANDARD.encode(bytes))
}

/// Error page in the style of the real service, which answers failures with
/// HTML rather than JSON.
fn html_error(status: StatusCode, message: &str) -> Response {
    let reason = status.canonical_reason().unwrap_or("Error");
    let page = format!(
        "<!DOCTYPE html>\n<html><head><title>{} {reason}</title></head>\
         <body><h1>{reason}</h1><p>{message}</p></body></html>",
        status.as_u16()
    );
    (status, Html(page)).into_response()
}
