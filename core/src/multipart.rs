//! `multipart/form-data` encoding for pet and photo uploads.
//!
//! Parts are written in insertion order. The boundary is a random UUID so it
//! cannot collide with text field values in practice.

use uuid::Uuid;

#[derive(Debug, Clone)]
enum Part {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        content_type: String,
        bytes: Vec<u8>,
    },
}

/// In-memory multipart form.
#[derive(Debug, Clone)]
pub struct MultipartForm {
    boundary: String,
    parts: Vec<Part>,
}

impl Default for MultipartForm {
    fn default() -> Self {
        Self::new()
    }
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::with_boundary(format!("petfriends-{}", Uuid::new_v4().simple()))
    }

    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            parts: Vec::new(),
        }
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.parts.push(Part::Text {
            name: name.to_string(),
            value: value.to_string(),
        });
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.parts.push(Part::File {
            name: name.to_string(),
            file_name: file_name.to_string(),
            content_type: content_type.to_string(),
            bytes: bytes.to_vec(),
        });
        self
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Value for the request's `content-type` header.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for part in &self.parts {
            out.extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
            match part {
                Part::Text { name, value } => {
                    out.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", escape(name)).as_bytes(),
                    );
                    out.extend_from_slice(value.as_bytes());
                }
                Part::File {
                    name,
                    file_name,
                    content_type,
                    bytes,
                } => {
                    out.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                            escape(name),
                            escape(file_name)
                        )
                        .as_bytes(),
                    );
                    out.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
                    out.extend_from_slice(bytes);
                }
            }
            out.extend_from_slice(b"\r\n");
        }
        out.extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        out
    }
}

/// Quote-escape a disposition parameter the way browsers do.
fn escape(value: &str) -> String {
    value
        .replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_text_and_file_parts_in_order() {
        let form = MultipartForm::with_boundary("XYZ")
            .text("name", "Тайпан")
            .file("pet_photo", "Taipan.jpg", "image/jpeg", &[0xff, 0xd8, 0xff]);

        let mut expected = Vec::new();
        expected.extend_from_slice(b"--XYZ\r\nContent-Disposition: form-data; name=\"name\"\r\n\r\n");
        expected.extend_from_slice("Тайпан".as_bytes());
        expected.extend_from_slice(
            b"\r\n--XYZ\r\nContent-Disposition: form-data; name=\"pet_photo\"; filename=\"Taipan.jpg\"\r\nContent-Type: image/jpeg\r\n\r\n",
        );
        expected.extend_from_slice(&[0xff, 0xd8, 0xff]);
        expected.extend_from_slice(b"\r\n--XYZ--\r\n");

        assert_eq!(form.encode(), expected);
        assert_eq!(form.content_type(), "multipart/form-data; boundary=XYZ");
    }

    #[test]
    fn empty_form_is_just_the_closing_boundary() {
        let form = MultipartForm::with_boundary("b");
        assert_eq!(form.encode(), b"--b--\r\n");
    }

    #[test]
    fn random_boundaries_differ() {
        assert_ne!(MultipartForm::new().boundary(), MultipartForm::new().boundary());
    }

    #[test]
    fn quotes_in_file_names_are_escaped() {
        let body = MultipartForm::with_boundary("b")
            .file("pet_photo", "a\"b.jpg", "image/jpeg", b"")
            .encode();
        let text = String::from_utf8(body).unwrap();
        assert!(text.contains("filename=\"a%22b.jpg\""));
    }
}
