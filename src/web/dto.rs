//! Response DTOs for the filestash HTTP surface.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Successful upload response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    /// The stored name of the uploaded file.
    #[schema(example = "example.jpg")]
    pub filename: String,
    /// The URL path to access the uploaded file.
    #[schema(example = "/files/example.jpg")]
    pub url: String,
    /// The size of the uploaded file in bytes.
    #[schema(example = 12345)]
    pub size: u64,
    /// A message describing the operation result.
    #[schema(example = "File uploaded successfully")]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_response_json_shape() {
        let response = UploadResponse {
            filename: "photo.JPG".to_string(),
            url: "/files/photo.JPG".to_string(),
            size: 5120,
            message: "File uploaded successfully".to_string(),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["filename"], "photo.JPG");
        assert_eq!(json["url"], "/files/photo.JPG");
        assert_eq!(json["size"], 5120);
        assert_eq!(json["message"], "File uploaded successfully");
    }
}
