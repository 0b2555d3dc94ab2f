//! Stateless HTTP request builder for the PetFriends API.
//!
//! # Design
//! `PetFriendsClient` holds only a `base_url`. Each remote operation has a
//! `build_*` method that produces an `HttpRequest`; `parse` turns whatever
//! came back into a `ResponseEnvelope`. The caller (or `PetFriends`) executes
//! the round trip in between, keeping this layer free of I/O.
//!
//! Authentication uses the service's own headers: `email`/`password` for the
//! key call, then `auth_key` (plus `pet_id` on update and delete).

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::multipart::MultipartForm;
use crate::response::{self, ResponseEnvelope};
use crate::types::{AuthKey, Credentials, PetFields, PetFilter, PetPhoto};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

#[derive(Debug, Clone)]
pub struct PetFriendsClient {
    base_url: String,
}

impl PetFriendsClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET api/key` with the credentials in headers.
    pub fn build_get_api_key(&self, credentials: &Credentials) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: self.url("api/key"),
            headers: vec![
                ("email".to_string(), credentials.email.clone()),
                ("password".to_string(), credentials.password.clone()),
            ],
            body: None,
        }
    }

    /// `GET api/pets?filter=...`. An empty filter lists every visible pet.
    pub fn build_get_list_of_pets(
        &self,
        auth_key: &AuthKey,
        filter: &PetFilter,
    ) -> Result<HttpRequest, ApiError> {
        let headers = auth_headers(auth_key, None)?;
        let query = serde_urlencoded::to_string(&[("filter", filter.as_str())])
            .map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}?{query}", self.url("api/pets")),
            headers,
            body: None,
        })
    }

    /// `POST api/pets` as multipart with all fields and the photo.
    pub fn build_add_new_pet(
        &self,
        auth_key: &AuthKey,
        fields: &PetFields,
        photo: &PetPhoto,
    ) -> Result<HttpRequest, ApiError> {
        let mut headers = auth_headers(auth_key, None)?;
        let form = MultipartForm::new()
            .text("name", &fields.name)
            .text("animal_type", &fields.animal_type)
            .text("age", &fields.age);
        headers.push(("content-type".to_string(), form.content_type()));
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: self.url("api/pets"),
            headers,
            body: Some(form.file("pet_photo", photo).finish()),
        })
    }

    /// `POST api/create_pet_simple` as an urlencoded form.
    pub fn build_add_new_pet_without_photo(
        &self,
        auth_key: &AuthKey,
        fields: &PetFields,
    ) -> Result<HttpRequest, ApiError> {
        let headers = auth_headers(auth_key, None)?;
        self.form_request(HttpMethod::Post, "api/create_pet_simple", headers, fields)
    }

    /// `POST api/pets/set_photo/{pet_id}` as multipart with only the photo.
    pub fn build_add_photo_of_pet(
        &self,
        auth_key: &AuthKey,
        pet_id: &str,
        photo: &PetPhoto,
    ) -> Result<HttpRequest, ApiError> {
        require_pet_id(pet_id)?;
        let mut headers = auth_headers(auth_key, None)?;
        let form = MultipartForm::new();
        headers.push(("content-type".to_string(), form.content_type()));
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: self.url(&format!("api/pets/set_photo/{pet_id}")),
            headers,
            body: Some(form.file("pet_photo", photo).finish()),
        })
    }

    /// `PUT api/pets/{pet_id}` as an urlencoded form.
    pub fn build_update_pet_info(
        &self,
        auth_key: &AuthKey,
        pet_id: &str,
        fields: &PetFields,
    ) -> Result<HttpRequest, ApiError> {
        require_pet_id(pet_id)?;
        let headers = auth_headers(auth_key, Some(pet_id))?;
        self.form_request(HttpMethod::Put, &format!("api/pets/{pet_id}"), headers, fields)
    }

    /// `DELETE api/pets/{pet_id}`.
    pub fn build_delete_pet(&self, auth_key: &AuthKey, pet_id: &str) -> Result<HttpRequest, ApiError> {
        require_pet_id(pet_id)?;
        Ok(HttpRequest {
            method: HttpMethod::Delete,
            url: self.url(&format!("api/pets/{pet_id}")),
            headers: auth_headers(auth_key, Some(pet_id))?,
            body: None,
        })
    }

    /// Normalize any response, whatever its status.
    pub fn parse(&self, response: HttpResponse) -> ResponseEnvelope {
        response::normalize(response)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn form_request(
        &self,
        method: HttpMethod,
        path: &str,
        mut headers: Vec<(String, String)>,
        fields: &PetFields,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_urlencoded::to_string(fields)
            .map_err(|e| ApiError::Serialization(e.to_string()))?;
        headers.push(("content-type".to_string(), FORM_CONTENT_TYPE.to_string()));
        Ok(HttpRequest {
            method,
            url: self.url(path),
            headers,
            body: Some(body.into_bytes()),
        })
    }
}

fn auth_headers(auth_key: &AuthKey, pet_id: Option<&str>) -> Result<Vec<(String, String)>, ApiError> {
    require_auth_key(auth_key)?;
    let mut headers = vec![("auth_key".to_string(), auth_key.key.clone())];
    if let Some(pet_id) = pet_id {
        headers.push(("pet_id".to_string(), pet_id.to_string()));
    }
    Ok(headers)
}

pub(crate) fn require_auth_key(auth_key: &AuthKey) -> Result<(), ApiError> {
    if auth_key.key.is_empty() {
        return Err(ApiError::InvalidArgument("auth key must not be empty"));
    }
    Ok(())
}

pub(crate) fn require_pet_id(pet_id: &str) -> Result<(), ApiError> {
    if pet_id.is_empty() {
        return Err(ApiError::InvalidArgument("pet id must not be empty"));
    }
    Ok(())
}
