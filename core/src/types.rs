//! Domain DTOs for the PetFriends API.
//!
//! # Design
//! Records are owned by the remote service, so decoding is lenient: unknown
//! fields are ignored and optional ones default. The test double defines its
//! own copies of these shapes; the live suite catches drift between the two.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Login credentials, passed through to the service untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
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

/// Session token issued by `/api/key`.
///
/// Has no expiry tracking; the caller holds it for as long as the remote
/// session lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthKey {
    pub key: String,
}

impl AuthKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// A single pet record as returned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    pub id: String,
    pub name: String,
    pub animal_type: String,
    pub age: String,
    /// Data URI of the photo, empty when none was uploaded.
    #[serde(default)]
    pub pet_photo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Body of a successful `GET /api/pets`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetList {
    pub pets: Vec<Pet>,
}

impl PetList {
    pub fn contains_id(&self, id: &str) -> bool {
        self.pets.iter().any(|pet| pet.id == id)
    }
}

/// Value of the `filter` query parameter on `GET /api/pets`.
///
/// Only `""` and `"my_pets"` mean something to the service; anything else is
/// forwarded as-is and the service decides what happens.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PetFilter {
    #[default]
    All,
    MyPets,
    Raw(String),
}

impl PetFilter {
    pub fn as_str(&self) -> &str {
        match self {
            PetFilter::All => "",
            PetFilter::MyPets => "my_pets",
            PetFilter::Raw(value) => value,
        }
    }
}

impl From<&str> for PetFilter {
    fn from(value: &str) -> Self {
        match value {
            "" => PetFilter::All,
            "my_pets" => PetFilter::MyPets,
            other => PetFilter::Raw(other.to_string()),
        }
    }
}

impl fmt::Display for PetFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Text fields of a pet, shared by create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetFields {
    pub name: String,
    pub animal_type: String,
    /// Sent verbatim; the service does not insist on a number.
    pub age: String,
}

impl PetFields {
    pub fn new(name: impl Into<String>, animal_type: impl Into<String>, age: impl fmt::Display) -> Self {
        Self {
            name: name.into(),
            animal_type: animal_type.into(),
            age: age.to_string(),
        }
    }

    pub(crate) fn pairs(&self) -> [(&'static str, &str); 3] {
        [
            ("name", self.name.as_str()),
            ("animal_type", self.animal_type.as_str()),
            ("age", self.age.as_str()),
        ]
    }
}

/// Photo content staged for a multipart upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl PhotoUpload {
    /// Read a photo from disk. The file handle is released before returning.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| ClientError::Photo {
            path: path.to_path_buf(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "photo".to_string());
        Ok(Self {
            content_type: content_type_for(path).to_string(),
            file_name,
            bytes,
        })
    }
}

fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase());
    match extension.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_maps_recognized_wire_values() {
        assert_eq!(PetFilter::from(""), PetFilter::All);
        assert_eq!(PetFilter::from("my_pets"), PetFilter::MyPets);
        assert_eq!(PetFilter::from("pets"), PetFilter::Raw("pets".to_string()));
        assert_eq!(PetFilter::Raw("Мои питомцы".to_string()).as_str(), "Мои питомцы");
    }

    #[test]
    fn pet_tolerates_missing_optional_fields() {
        let pet: Pet = serde_json::from_str(
            r#"{"id":"a1","name":"Kaa","animal_type":"Snake","age":"999","extra":true}"#,
        )
        .unwrap();
        assert_eq!(pet.name, "Kaa");
        assert!(pet.pet_photo.is_empty());
        assert!(pet.user_id.is_none());
    }

    #[test]
    fn pet_fields_accept_numeric_and_text_age() {
        assert_eq!(PetFields::new("Kaa", "Snake", 999).age, "999");
        assert_eq!(PetFields::new("Taipan", "Snake", "One").age, "One");
    }

    #[test]
    fn content_type_follows_extension() {
        assert_eq!(content_type_for(Path::new("images/Taipan.JPG")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("a.png")), "image/png");
        assert_eq!(content_type_for(Path::new("Taipan")), "application/octet-stream");
    }

    #[test]
    fn photo_from_missing_path_is_a_photo_error() {
        let err = PhotoUpload::from_path("/definitely/not/here.jpg").unwrap_err();
        assert!(matches!(err, ClientError::Photo { .. }));
    }

    #[test]
    fn pet_list_contains_id() {
        let list: PetList = serde_json::from_str(
            r#"{"pets":[{"id":"x","name":"n","animal_type":"t","age":"1"}]}"#,
        )
        .unwrap();
        assert!(list.contains_id("x"));
        assert!(!list.contains_id(""));
    }
}
