// SPDX-License-Identifier: MPL-2.0
//! Gallery endpoints and the image record they exchange.

use super::client::ApiClient;
use super::error::ApiError;
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::{Deserialize, Serialize};

/// One image in the remote collection.
///
/// `order` is the zero-based display rank; the server keeps it dense and
/// unique within the collection. `image` is the content URL, which may be
/// server-relative (resolve it with [`ApiClient::content_url`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub id: i64,
    pub title: String,
    pub image: String,
    pub order: i64,
}

#[derive(Serialize)]
struct OrderPatch {
    order: i64,
}

/// Maps a file name to the content type sent with uploads.
fn mime_for(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit('.')
        .next()
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}

fn image_part(file_name: String, bytes: Vec<u8>) -> Result<Part, ApiError> {
    let mime = mime_for(&file_name);
    Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(mime)
        .map_err(|e| ApiError::Transport(e.to_string()))
}

impl ApiClient {
    /// GET /api/images/ returning the whole collection, pre-sorted by rank.
    pub async fn list_images(&self) -> Result<Vec<ImageRecord>, ApiError> {
        self.execute_json(self.request(Method::GET, "/api/images/"))
            .await
    }

    /// POST /api/images/ as a multipart upload appended at `order`.
    pub async fn create_image(
        &self,
        title: String,
        file_name: String,
        bytes: Vec<u8>,
        order: i64,
    ) -> Result<ImageRecord, ApiError> {
        let form = Form::new()
            .text("title", title)
            .text("order", order.to_string())
            .part("image", image_part(file_name, bytes)?);

        self.execute_json(self.request(Method::POST, "/api/images/").multipart(form))
            .await
    }

    /// PATCH /api/images/{id}/ with a JSON `{order}` body.
    pub async fn update_image_order(&self, id: i64, order: i64) -> Result<ImageRecord, ApiError> {
        self.execute_json(
            self.request(Method::PATCH, &format!("/api/images/{}/", id))
                .json(&OrderPatch { order }),
        )
        .await
    }

    /// PATCH /api/images/{id}/ with multipart title and optional replacement
    /// content.
    pub async fn update_image(
        &self,
        id: i64,
        title: String,
        replacement: Option<(String, Vec<u8>)>,
    ) -> Result<ImageRecord, ApiError> {
        let mut form = Form::new().text("title", title);
        if let Some((file_name, bytes)) = replacement {
            form = form.part("image", image_part(file_name, bytes)?);
        }

        self.execute_json(
            self.request(Method::PATCH, &format!("/api/images/{}/", id))
                .multipart(form),
        )
        .await
    }

    /// DELETE /api/images/{id}/
    pub async fn delete_image(&self, id: i64) -> Result<(), ApiError> {
        self.execute(self.request(Method::DELETE, &format!("/api/images/{}/", id)))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_round_trips_through_json() {
        let record = ImageRecord {
            id: 7,
            title: "Sunset".to_string(),
            image: "/media/sunset.jpg".to_string(),
            order: 3,
        };
        let json = serde_json::to_string(&record).unwrap();
        let parsed: ImageRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn record_parses_service_payload() {
        let parsed: ImageRecord = serde_json::from_str(
            r#"{"id": 1, "title": "Cat", "image": "http://localhost:8000/media/cat.png", "order": 0}"#,
        )
        .unwrap();
        assert_eq!(parsed.id, 1);
        assert_eq!(parsed.order, 0);
    }

    #[test]
    fn mime_for_known_extensions() {
        assert_eq!(mime_for("photo.JPG"), "image/jpeg");
        assert_eq!(mime_for("photo.jpeg"), "image/jpeg");
        assert_eq!(mime_for("icon.png"), "image/png");
        assert_eq!(mime_for("anim.gif"), "image/gif");
        assert_eq!(mime_for("modern.webp"), "image/webp");
    }

    #[test]
    fn mime_for_unknown_extension_falls_back() {
        assert_eq!(mime_for("mystery.xyz"), "application/octet-stream");
        assert_eq!(mime_for("no_extension"), "application/octet-stream");
    }
}
