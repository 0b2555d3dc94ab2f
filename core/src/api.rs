//! Blocking PetFriends client: build, execute, normalize.
//!
//! Every method performs exactly one request and returns the server's status
//! and body as a `ResponseEnvelope`, including 4xx/5xx answers. `Err` means
//! the request never completed: a bad argument, an unreadable photo, or a
//! transport failure.

use std::path::Path;

use crate::client::{require_auth_key, require_pet_id, PetFriendsClient};
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::HttpRequest;
use crate::response::ResponseEnvelope;
use crate::transport::{Transport, UreqTransport};
use crate::types::{AuthKey, Credentials, PetFields, PetFilter, PetPhoto};

#[derive(Clone)]
pub struct PetFriends<T = UreqTransport> {
    client: PetFriendsClient,
    transport: T,
}

impl PetFriends<UreqTransport> {
    /// Client for the production service with no timeout.
    pub fn new() -> Self {
        Self::with_config(&ClientConfig::default())
    }

    pub fn with_config(config: &ClientConfig) -> Self {
        Self::with_transport(&config.base_url, UreqTransport::new(config.timeout))
    }
}

impl Default for PetFriends<UreqTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> PetFriends<T> {
    pub fn with_transport(base_url: &str, transport: T) -> Self {
        Self {
            client: PetFriendsClient::new(base_url),
            transport,
        }
    }

    pub fn client(&self) -> &PetFriendsClient {
        &self.client
    }

    pub fn get_api_key(&self, email: &str, password: &str) -> Result<ResponseEnvelope, ApiError> {
        let credentials = Credentials::new(email, password);
        self.send(self.client.build_get_api_key(&credentials))
    }

    pub fn get_list_of_pets(
        &self,
        auth_key: &AuthKey,
        filter: impl Into<PetFilter>,
    ) -> Result<ResponseEnvelope, ApiError> {
        let filter = filter.into();
        self.send(self.client.build_get_list_of_pets(auth_key, &filter)?)
    }

    pub fn add_new_pet(
        &self,
        auth_key: &AuthKey,
        name: &str,
        animal_type: &str,
        age: &str,
        pet_photo: impl AsRef<Path>,
    ) -> Result<ResponseEnvelope, ApiError> {
        require_auth_key(auth_key)?;
        let fields = PetFields::new(name, animal_type, age);
        let photo = PetPhoto::from_path(pet_photo)?;
        self.send(self.client.build_add_new_pet(auth_key, &fields, &photo)?)
    }

    pub fn add_new_pet_without_photo(
        &self,
        auth_key: &AuthKey,
        name: &str,
        animal_type: &str,
        age: &str,
    ) -> Result<ResponseEnvelope, ApiError> {
        let fields = PetFields::new(name, animal_type, age);
        self.send(self.client.build_add_new_pet_without_photo(auth_key, &fields)?)
    }

    pub fn add_photo_of_pet(
        &self,
        auth_key: &AuthKey,
        pet_id: &str,
        pet_photo: impl AsRef<Path>,
    ) -> Result<ResponseEnvelope, ApiError> {
        require_auth_key(auth_key)?;
        require_pet_id(pet_id)?;
        let photo = PetPhoto::from_path(pet_photo)?;
        self.send(self.client.build_add_photo_of_pet(auth_key, pet_id, &photo)?)
    }

    pub fn update_pet_info(
        &self,
        auth_key: &AuthKey,
        pet_id: &str,
        name: &str,
        animal_type: &str,
        age: &str,
    ) -> Result<ResponseEnvelope, ApiError> {
        let fields = PetFields::new(name, animal_type, age);
        self.send(self.client.build_update_pet_info(auth_key, pet_id, &fields)?)
    }

    pub fn delete_pet(&self, auth_key: &AuthKey, pet_id: &str) -> Result<ResponseEnvelope, ApiError> {
        self.send(self.client.build_delete_pet(auth_key, pet_id)?)
    }

    fn send(&self, request: HttpRequest) -> Result<ResponseEnvelope, ApiError> {
        let response = self.transport.execute(request)?;
        Ok(self.client.parse(response))
    }
}
