//! REST API クライアント
//!
//! - `GET  /resources`
//! - `GET|POST /inventories`, `GET|PUT|DELETE /inventories/{id}`
//! - `POST /inventories/{id}/items/from-image`（multipart, フィールド名 `image`）

use crate::auth::{StaticToken, TokenProvider};
use crate::error::{AppError, Result};
use crate::upload::{OcrBackend, UploadReply};
use food_waste_common::types::{Envelope, ErrorBody, Inventory, InventoryUpdate, NewInventory, Resource};
use food_waste_common::SelectedImage;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

pub const RESOURCES_FETCH_FAILED: &str = "Failed to fetch resources";

pub struct ApiClient<P = StaticToken> {
    client: Client,
    base_url: String,
    tokens: P,
}

impl<P: TokenProvider> ApiClient<P> {
    pub fn new(base_url: impl Into<String>, timeout: Duration, tokens: P) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            client,
            base_url,
            tokens,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        let token = self.tokens.token().await?;
        Ok(request.header(AUTHORIZATION, format!("Bearer {}", token)))
    }

    /// 認証付きで送信し、`{ data }` もしくは素のJSONを取り出す
    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.authorized(request).await?.send().await?;
        let response = check_status(response).await?;
        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|e| AppError::ApiParse(e.to_string()))?;
        Ok(envelope.into_inner())
    }

    pub async fn list_resources(&self) -> Result<Vec<Resource>> {
        let response = self.client.get(self.url("/resources")).send().await?;

        if !response.status().is_success() {
            debug!("GET /resources -> {}", response.status());
            return Err(AppError::ApiCall(RESOURCES_FETCH_FAILED.into()));
        }

        let envelope: Envelope<Vec<Resource>> = response
            .json()
            .await
            .map_err(|e| AppError::ApiParse(e.to_string()))?;
        Ok(envelope.into_inner())
    }

    pub async fn list_inventories(&self) -> Result<Vec<Inventory>> {
        self.send_json(self.client.get(self.url("/inventories"))).await
    }

    pub async fn get_inventory(&self, id: &str) -> Result<Inventory> {
        self.send_json(self.client.get(self.url(&format!("/inventories/{}", id))))
            .await
    }

    pub async fn create_inventory(&self, inventory: &NewInventory) -> Result<Inventory> {
        self.send_json(self.client.post(self.url("/inventories")).json(inventory))
            .await
    }

    pub async fn update_inventory(&self, id: &str, update: &InventoryUpdate) -> Result<Inventory> {
        self.send_json(
            self.client
                .put(self.url(&format!("/inventories/{}", id)))
                .json(update),
        )
        .await
    }

    pub async fn delete_inventory(&self, id: &str) -> Result<()> {
        let request = self.client.delete(self.url(&format!("/inventories/{}", id)));
        let response = self.authorized(request).await?.send().await?;
        check_status(response).await?;
        Ok(())
    }
}

impl<P: TokenProvider> OcrBackend for ApiClient<P> {
    async fn upload_image(&self, inventory_id: &str, image: SelectedImage) -> Result<UploadReply> {
        let url = self.url(&format!("/inventories/{}/items/from-image", inventory_id));
        let size = image.size();

        let part = reqwest::multipart::Part::bytes(image.bytes)
            .file_name(image.file_name)
            .mime_str(&image.mime_type)?;
        let form = reqwest::multipart::Form::new().part("image", part);

        let request = self.authorized(self.client.post(&url).multipart(form)).await?;
        debug!("POST {} ({} bytes)", url, size);

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!("POST {} -> {}", url, status);

        Ok(UploadReply { status, body })
    }
}

/// 2xx 以外なら `{ error }` もしくはステータス文言でエラーにする
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        });

    Err(AppError::ApiStatus {
        status: status.as_u16(),
        message,
    })
}
