//! Presigned asset upload.
//!
//! Uploading evidence images is a two-step flow: ask the backend for a
//! presigned PUT URL per asset name, then PUT the bytes straight to that URL
//! (no bearer token; the signature in the URL is the authorization).

use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::Result;

use super::Connection;

#[derive(Debug, Clone, Serialize)]
struct PresignedUrlRequest {
    #[serde(rename = "assetNames")]
    asset_names: Vec<String>,
    #[serde(rename = "type")]
    asset_type: String,
}

/// One asset name paired with the URL to PUT it to.
#[derive(Debug, Clone, Deserialize)]
pub struct PresignedAsset {
    /// Asset name as requested.
    pub name: String,
    /// Presigned PUT URL.
    pub url: String,
}

/// Requests presigned upload URLs for the given asset names.
pub async fn presigned_upload_urls(
    conn: &Connection,
    asset_names: Vec<String>,
    asset_type: &str,
) -> Result<Vec<PresignedAsset>> {
    conn.post(
        "digitalassets/presignedurl",
        &PresignedUrlRequest {
            asset_names,
            asset_type: asset_type.to_owned(),
        },
    )
    .await
}

/// Uploads one asset's bytes to its presigned URL.
pub async fn upload_asset(
    conn: &Connection,
    asset: &PresignedAsset,
    bytes: Vec<u8>,
    content_type: &str,
) -> Result<()> {
    let url = Url::parse(&asset.url)?;
    conn.put_bytes(url, bytes, content_type).await
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn presign_request_uses_backend_key_names() {
        let body = serde_json::to_value(PresignedUrlRequest {
            asset_names: vec!["evidence-1.jpg".to_owned()],
            asset_type: "image/jpeg".to_owned(),
        })
        .unwrap();

        assert_eq!(body["assetNames"][0], "evidence-1.jpg");
        assert_eq!(body["type"], "image/jpeg");
    }

    #[test]
    fn presigned_assets_decode() {
        let assets: Vec<PresignedAsset> = serde_json::from_str(
            r#"[{"name": "evidence-1.jpg", "url": "https://bucket.example.com/evidence-1.jpg?sig=abc"}]"#,
        )
        .unwrap();

        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].name, "evidence-1.jpg");
    }
}
