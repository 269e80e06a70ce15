//! Immich REST implementation of the gateway.

use super::{AlbumMembership, AssetMetadata, DuplicateGroup, Gateway};
use crate::config::CleanerConfig;
use crate::error::{ConfigError, GatewayError};
use chrono::{DateTime, Utc};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

pub const DUPLICATES_ENDPOINT: &str = "/api/duplicates";
pub const ALBUMS_ENDPOINT: &str = "/api/albums";
pub const ASSETS_ENDPOINT: &str = "/api/assets";

const API_KEY_HEADER: &str = "x-api-key";

/// Gateway backed by the Immich HTTP API
///
/// Holds a single blocking client so connections are pooled across calls.
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    /// Build a client for the configured server
    pub fn new(config: &CleanerConfig) -> Result<Self, ConfigError> {
        let mut api_key =
            HeaderValue::from_str(&config.api_key).map_err(|_| ConfigError::InvalidApiKey)?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, api_key);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .user_agent(concat!("immich-dedup/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.server_url.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and return the body if the status is one of `accepted`
    fn send(
        &self,
        endpoint: &str,
        request: RequestBuilder,
        accepted: &[StatusCode],
    ) -> Result<String, GatewayError> {
        debug!("-> {}", endpoint);

        let response = request.send().map_err(|source| GatewayError::Transport {
            endpoint: endpoint.to_string(),
            source,
        })?;

        let status = response.status();
        let body = response.text().map_err(|source| GatewayError::Transport {
            endpoint: endpoint.to_string(),
            source,
        })?;

        debug!("<- {} {}", endpoint, status);

        if !accepted.contains(&status) {
            return Err(GatewayError::UnexpectedStatus {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }

    fn get_json<T: DeserializeOwned>(&self, endpoint: &str, url: &str) -> Result<T, GatewayError> {
        let body = self.send(endpoint, self.client.get(url), &[StatusCode::OK])?;
        serde_json::from_str(&body).map_err(|e| GatewayError::Decode {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })
    }
}

impl Gateway for HttpGateway {
    fn list_duplicate_groups(&self) -> Result<Vec<DuplicateGroup>, GatewayError> {
        let endpoint = format!("GET {}", DUPLICATES_ENDPOINT);
        let groups: Vec<DuplicateDto> = self.get_json(&endpoint, &self.url(DUPLICATES_ENDPOINT))?;
        Ok(groups.into_iter().map(DuplicateGroup::from).collect())
    }

    fn list_albums_for_asset(&self, asset_id: &str) -> Result<Vec<AlbumMembership>, GatewayError> {
        let endpoint = format!("GET {}?assetId={}", ALBUMS_ENDPOINT, asset_id);
        let url = Url::parse_with_params(&self.url(ALBUMS_ENDPOINT), &[("assetId", asset_id)])
            .map_err(|e| GatewayError::Decode {
                endpoint: endpoint.clone(),
                reason: format!("invalid request URL: {}", e),
            })?;

        let albums: Vec<AlbumDto> = self.get_json(&endpoint, url.as_str())?;
        Ok(albums.into_iter().map(AlbumMembership::from).collect())
    }

    fn get_asset_metadata(&self, asset_id: &str) -> Result<AssetMetadata, GatewayError> {
        let path = format!("{}/{}", ASSETS_ENDPOINT, asset_id);
        let endpoint = format!("GET {}", path);
        let asset: AssetDto = self.get_json(&endpoint, &self.url(&path))?;
        Ok(asset.into())
    }

    fn add_assets_to_album(&self, album_id: &str, asset_ids: &[String]) -> Result<(), GatewayError> {
        let path = format!("{}/{}/assets", ALBUMS_ENDPOINT, album_id);
        let endpoint = format!("PUT {}", path);
        let request = self.client.put(self.url(&path)).json(&BulkIdsDto { ids: asset_ids });
        self.send(&endpoint, request, &[StatusCode::OK])?;
        Ok(())
    }

    fn delete_asset(&self, asset_id: &str) -> Result<(), GatewayError> {
        let endpoint = format!("DELETE {}", ASSETS_ENDPOINT);
        let request = self.client.delete(self.url(ASSETS_ENDPOINT)).json(&DeleteAssetsDto {
            ids: vec![asset_id],
            force: true,
        });
        self.send(&endpoint, request, &[StatusCode::NO_CONTENT, StatusCode::OK])?;
        Ok(())
    }
}

// Wire formats

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DuplicateDto {
    duplicate_id: String,
    #[serde(default)]
    assets: Vec<AssetRefDto>,
}

#[derive(Debug, Deserialize)]
struct AssetRefDto {
    id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AlbumDto {
    id: String,
    #[serde(default)]
    album_name: String,
    #[serde(default)]
    assets: Vec<AssetRefDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssetDto {
    id: String,
    #[serde(default)]
    original_file_name: Option<String>,
    #[serde(default)]
    file_created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    exif_info: Option<ExifDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExifDto {
    #[serde(default)]
    file_size_in_byte: Option<u64>,
    #[serde(default, alias = "exifImageWidth")]
    image_width: Option<u32>,
    #[serde(default, alias = "exifImageHeight")]
    image_height: Option<u32>,
}

#[derive(Debug, Serialize)]
struct BulkIdsDto<'a> {
    ids: &'a [String],
}

#[derive(Debug, Serialize)]
struct DeleteAssetsDto<'a> {
    ids: Vec<&'a str>,
    force: bool,
}

impl From<DuplicateDto> for DuplicateGroup {
    fn from(dto: DuplicateDto) -> Self {
        DuplicateGroup::new(
            dto.duplicate_id,
            dto.assets.into_iter().map(|a| a.id).collect(),
        )
    }
}

impl From<AlbumDto> for AlbumMembership {
    fn from(dto: AlbumDto) -> Self {
        AlbumMembership {
            id: dto.id,
            name: dto.album_name,
            asset_ids: dto.assets.into_iter().map(|a| a.id).collect(),
        }
    }
}

impl From<AssetDto> for AssetMetadata {
    fn from(dto: AssetDto) -> Self {
        let (size_bytes, width, height) = match dto.exif_info {
            Some(exif) => (exif.file_size_in_byte, exif.image_width, exif.image_height),
            None => (None, None, None),
        };

        AssetMetadata {
            id: dto.id,
            original_file_name: dto.original_file_name.unwrap_or_default(),
            size_bytes,
            created_at: dto.file_created_at,
            width,
            height,
        }
    }
}
