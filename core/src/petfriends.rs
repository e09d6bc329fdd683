//! Caller-facing PetFriends API.
//!
//! Each method builds a request with `PetFriendsClient`, runs it through the
//! configured `Transport`, and returns the normalized `ApiResponse`. Photo
//! files are read up front, so a missing file fails before anything is sent.

use std::fmt::Display;
use std::path::Path;

use tracing::instrument;

use crate::client::PetFriendsClient;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::http::HttpRequest;
use crate::response::ApiResponse;
use crate::transport::{Transport, UreqTransport};
use crate::types::{AuthKey, Credentials, PetFields, PetFilter, PhotoUpload};

/// Blocking PetFriends API client.
#[derive(Debug, Clone)]
pub struct PetFriends<T = UreqTransport> {
    client: PetFriendsClient,
    transport: T,
}

impl PetFriends<UreqTransport> {
    pub fn new(base_url: &str) -> Self {
        Self::with_transport(base_url, UreqTransport::new())
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.base_url)
    }
}

impl Default for PetFriends<UreqTransport> {
    fn default() -> Self {
        Self::from_config(&ClientConfig::default())
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

    /// `POST /api/key`. 200 with `{"key": ...}`, or 403 `Forbidden`.
    #[instrument(level = "debug", skip_all)]
    pub fn authenticate(&self, email: &str, password: &str) -> Result<ApiResponse, ClientError> {
        let request = self.client.build_authenticate(&Credentials::new(email, password));
        self.send(request)
    }

    /// `GET /api/pets`. `filter` accepts `""`, `"my_pets"`, or any raw value.
    #[instrument(level = "debug", skip(self, auth_key, filter), fields(filter = tracing::field::Empty))]
    pub fn list_pets(&self, auth_key: &AuthKey, filter: impl Into<PetFilter>) -> Result<ApiResponse, ClientError> {
        let filter = filter.into();
        tracing::Span::current().record("filter", filter.as_str());
        self.send(self.client.build_list_pets(auth_key, &filter))
    }

    /// `POST /api/pets` as multipart. `age` is not checked locally.
    #[instrument(level = "debug", skip_all)]
    pub fn add_pet(
        &self,
        auth_key: &AuthKey,
        name: &str,
        animal_type: &str,
        age: impl Display,
        photo_path: impl AsRef<Path>,
    ) -> Result<ApiResponse, ClientError> {
        let photo = PhotoUpload::from_path(photo_path)?;
        let fields = PetFields::new(name, animal_type, age);
        self.send(self.client.build_add_pet(auth_key, &fields, &photo))
    }

    #[instrument(level = "debug", skip(self, auth_key, name, animal_type, age))]
    pub fn update_pet(
        &self,
        auth_key: &AuthKey,
        pet_id: &str,
        name: &str,
        animal_type: &str,
        age: impl Display,
    ) -> Result<ApiResponse, ClientError> {
        let fields = PetFields::new(name, animal_type, age);
        self.send(self.client.build_update_pet(auth_key, pet_id, &fields))
    }

    #[instrument(level = "debug", skip(self, auth_key, photo_path))]
    pub fn update_pet_photo(
        &self,
        auth_key: &AuthKey,
        pet_id: &str,
        photo_path: impl AsRef<Path>,
    ) -> Result<ApiResponse, ClientError> {
        let photo = PhotoUpload::from_path(photo_path)?;
        self.send(self.client.build_update_pet_photo(auth_key, pet_id, &photo))
    }

    #[instrument(level = "debug", skip(self, auth_key))]
    pub fn delete_pet(&self, auth_key: &AuthKey, pet_id: &str) -> Result<ApiResponse, ClientError> {
        self.send(self.client.build_delete_pet(auth_key, pet_id))
    }

    fn send(&self, request: HttpRequest) -> Result<ApiResponse, ClientError> {
        let response = self.transport.execute(request)?;
        Ok(self.client.parse_response(response))
    }
}
