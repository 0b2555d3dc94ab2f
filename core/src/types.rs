//! Domain DTOs for the PetFriends API.
//!
//! # Design
//! Request-side types (`Credentials`, `PetFields`, `PetPhoto`) are built fresh
//! for one call. Response-side types (`AuthKey`, `Pet`, `PetList`) are only
//! used through `ResponseEnvelope::json`; the client itself never requires a
//! response to match them. The mock-server crate defines its own copies and
//! the integration tests catch drift between the two.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// MIME type declared for every uploaded photo.
pub const PHOTO_CONTENT_TYPE: &str = "image/jpeg";

/// Login pair for the key-retrieval call.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Session key returned by `GET api/key` as `{"key": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthKey {
    pub key: String,
}

impl AuthKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// Text fields of a pet. `age` is sent as text even though it is numeric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetFields {
    pub name: String,
    pub animal_type: String,
    pub age: String,
}

impl PetFields {
    pub fn new(
        name: impl Into<String>,
        animal_type: impl Into<String>,
        age: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            animal_type: animal_type.into(),
            age: age.into(),
        }
    }
}

/// Photo contents ready for a multipart upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetPhoto {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl PetPhoto {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: PHOTO_CONTENT_TYPE.to_string(),
            bytes,
        }
    }

    /// Read a photo from disk. The file handle is closed before this returns.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ApiError> {
        let path = path.as_ref();
        let photo_error = |source| ApiError::Photo {
            path: path.to_path_buf(),
            source,
        };
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                photo_error(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "path has no file name",
                ))
            })?;
        let bytes = fs::read(path).map_err(photo_error)?;
        Ok(Self::new(file_name, bytes))
    }
}

/// Value of the `filter` query parameter on `GET api/pets`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PetFilter {
    /// Every pet visible to the caller.
    #[default]
    All,
    /// Only the caller's own pets.
    MyPets,
    /// Sent verbatim.
    Custom(String),
}

impl PetFilter {
    pub fn as_str(&self) -> &str {
        match self {
            PetFilter::All => "",
            PetFilter::MyPets => "my_pets",
            PetFilter::Custom(value) => value.as_str(),
        }
    }
}

impl From<&str> for PetFilter {
    fn from(value: &str) -> Self {
        match value {
            "" => PetFilter::All,
            "my_pets" => PetFilter::MyPets,
            other => PetFilter::Custom(other.to_string()),
        }
    }
}

/// A pet as returned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    pub id: String,
    pub name: String,
    pub animal_type: String,
    pub age: String,
    #[serde(default)]
    pub pet_photo: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub created_at: String,
}

impl Pet {
    pub fn matches(&self, fields: &PetFields) -> bool {
        self.name == fields.name && self.animal_type == fields.animal_type && self.age == fields.age
    }
}

/// Body of a successful `GET api/pets`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetList {
    pub pets: Vec<Pet>,
}
