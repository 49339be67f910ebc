//! JSON mapping of request and response payloads.
//!
//! Payload field names are lower case words joined by underscores, which is
//! how model fields are already spelled, so models need no renaming beyond
//! the odd keyword clash. Unknown fields are ignored. A missing field is a
//! decode error unless the model declares it as `Option`. Failing to encode a
//! request body is a plain error, not a `CallError`.

use serde::{de::DeserializeOwned, Serialize};

use crate::{
    error::{AddContext, CallError},
    io::HttpResponse,
    Result,
};

pub fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T> {
    decode_str(&response.body)
}

pub fn decode_str<T: DeserializeOwned>(data: &str) -> Result<T> {
    serde_json::from_str(data).map_err(|e| CallError::DecodeError(e.to_string()).into())
}

pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string(value).err_context("encoding request body as JSON")
}
