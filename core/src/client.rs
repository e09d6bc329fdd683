//! Stateless HTTP request builder and response parser for the PetFriends API.
//!
//! # Design
//! `PetFriendsClient` holds only a `base_url`. Each operation has a `build_*`
//! method producing an `HttpRequest`; every response goes through the single
//! `parse_response`, because the API never hides a status from the caller.
//! No field is validated here: the service is the only judge of what is
//! legal, and its verdict is what callers want to observe.

use url::{form_urlencoded, Url};

use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::multipart::MultipartForm;
use crate::response::ApiResponse;
use crate::types::{AuthKey, Credentials, PetFields, PetFilter, PhotoUpload};

const AUTH_HEADER: &str = "auth_key";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Synchronous, stateless request builder for the PetFriends API.
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

    pub fn build_authenticate(&self, credentials: &Credentials) -> HttpRequest {
        let body = encode_form(&[
            ("email", credentials.email.as_str()),
            ("password", credentials.password.as_str()),
        ]);
        HttpRequest {
            method: HttpMethod::Post,
            url: self.endpoint(&["api", "key"]),
            headers: vec![("content-type".to_string(), FORM_CONTENT_TYPE.to_string())],
            body: Some(body.into_bytes()),
        }
    }

    pub fn build_list_pets(&self, auth_key: &AuthKey, filter: &PetFilter) -> HttpRequest {
        let query = encode_form(&[("filter", filter.as_str())]);
        HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}?{query}", self.endpoint(&["api", "pets"])),
            headers: vec![auth_header(auth_key)],
            body: None,
        }
    }

    pub fn build_add_pet(&self, auth_key: &AuthKey, fields: &PetFields, photo: &PhotoUpload) -> HttpRequest {
        let form = fields
            .pairs()
            .iter()
            .fold(MultipartForm::new(), |form, (name, value)| form.text(name, value))
            .file("pet_photo", &photo.file_name, &photo.content_type, &photo.bytes);
        multipart_request(self.endpoint(&["api", "pets"]), auth_key, &form)
    }

    pub fn build_update_pet(&self, auth_key: &AuthKey, pet_id: &str, fields: &PetFields) -> HttpRequest {
        let body = encode_form(&fields.pairs());
        HttpRequest {
            method: HttpMethod::Put,
            url: self.endpoint(&["api", "pets", pet_id]),
            headers: vec![
                auth_header(auth_key),
                ("content-type".to_string(), FORM_CONTENT_TYPE.to_string()),
            ],
            body: Some(body.into_bytes()),
        }
    }

    pub fn build_update_pet_photo(&self, auth_key: &AuthKey, pet_id: &str, photo: &PhotoUpload) -> HttpRequest {
        let form = MultipartForm::new().file("pet_photo", &photo.file_name, &photo.content_type, &photo.bytes);
        multipart_request(self.endpoint(&["api", "pets", "set_photo", pet_id]), auth_key, &form)
    }

    /// An empty `pet_id` yields `/api/pets/`, which the service answers with 404.
    pub fn build_delete_pet(&self, auth_key: &AuthKey, pet_id: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            url: self.endpoint(&["api", "pets", pet_id]),
            headers: vec![auth_header(auth_key)],
            body: None,
        }
    }

    pub fn parse_response(&self, response: HttpResponse) -> ApiResponse {
        ApiResponse::new(response.status, &response.body)
    }

    /// Append `segments` to the base URL, percent-encoding each one, so ids
    /// holding `/`, `?`, spaces or non-ASCII text stay a single path segment.
    /// An empty segment leaves a trailing slash.
    fn endpoint(&self, segments: &[&str]) -> String {
        let Ok(mut url) = Url::parse(&self.base_url) else {
            // Unparseable base: left for the transport to reject.
            return format!("{}/{}", self.base_url, segments.join("/"));
        };
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url.into()
    }
}

fn auth_header(auth_key: &AuthKey) -> (String, String) {
    (AUTH_HEADER.to_string(), auth_key.key.clone())
}

fn encode_form(pairs: &[(&str, &str)]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

fn multipart_request(url: String, auth_key: &AuthKey, form: &MultipartForm) -> HttpRequest {
    HttpRequest {
        method: HttpMethod::Post,
        url,
        headers: vec![
            auth_header(auth_key),
            ("content-type".to_string(), form.content_type()),
        ],
        body: Some(form.encode()),
    }
}
