//! Uniform `(status, body)` view of every PetFriends response.
//!
//! # Design
//! The server answers with JSON on success but sometimes with an HTML page on
//! error paths. `normalize` tries JSON first and keeps the raw text otherwise,
//! so no response shape ever fails a call. The status code is copied through
//! untouched.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::error::ApiError;
use crate::http::HttpResponse;

/// Response body: parsed JSON, or the raw text when it was not JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl ResponseBody {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            ResponseBody::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseBody::Json(_) => None,
            ResponseBody::Text(text) => Some(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    pub status: u16,
    pub body: ResponseBody,
}

impl ResponseEnvelope {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Deserialize a JSON body into `T`.
    ///
    /// Fails with `Deserialization` for text bodies and for JSON of the wrong
    /// shape. The status is not checked.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        match &self.body {
            ResponseBody::Json(value) => serde_json::from_value(value.clone())
                .map_err(|e| ApiError::Deserialization(e.to_string())),
            ResponseBody::Text(text) => Err(ApiError::Deserialization(format!(
                "HTTP {} body is not JSON: {text}",
                self.status
            ))),
        }
    }
}

pub fn normalize(response: HttpResponse) -> ResponseEnvelope {
    let body = match serde_json::from_str::<Value>(&response.body) {
        Ok(value) => ResponseBody::Json(value),
        Err(e) => {
            if !response.body.is_empty() {
                warn!(status = response.status, error = %e, "response body is not JSON, keeping text");
            }
            ResponseBody::Text(response.body)
        }
    };
    ResponseEnvelope {
        status: response.status,
        body,
    }
}
