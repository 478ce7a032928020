//! APIの型定義
//!
//! CLIとサーバー間で受け渡しされる型:
//! - ExtractedItem: 画像OCRで追加された品目
//! - Inventory / InventoryItem: 在庫
//! - Resource: 食品ロス削減に関する記事・資料
//! - Envelope: `{ data: ... }` 形式と素のオブジェクトの両対応

use serde::{Deserialize, Serialize};

/// 画像から抽出された品目（サーバーが生成し、クライアントは表示のみ）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractedItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_name: Option<String>,
    pub quantity: f64,
    pub unit: String,
}

impl ExtractedItem {
    /// 表示名（customName優先）
    pub fn display_name(&self) -> &str {
        self.custom_name
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or_default()
    }
}

/// `POST /inventories/{id}/items/from-image` の成功レスポンス
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddedItemsResponse {
    pub added_items: Option<Vec<ExtractedItem>>,
}

impl AddedItemsResponse {
    /// `addedItems` が無い・nullの場合は空
    pub fn into_items(self) -> Vec<ExtractedItem> {
        self.added_items.unwrap_or_default()
    }
}

/// 失敗レスポンス `{ error: string }`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ErrorBody {
    pub error: Option<String>,
}

/// 記事・資料
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Resource {
    pub id: String,
    pub title: String,
    pub description: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub tags: Vec<String>,
}

/// 在庫の品目
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_name: Option<String>,

    #[serde(default)]
    pub quantity: f64,

    #[serde(default)]
    pub unit: String,

    /// 消費期限（YYYY-MM-DD もしくは RFC3339）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// 在庫
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inventory {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub items: Vec<InventoryItem>,
}

/// 在庫の新規作成リクエスト
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInventory {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// 在庫の更新リクエスト（指定したフィールドのみ送る）
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl InventoryItem {
    pub fn display_name(&self) -> &str {
        self.custom_name.as_deref().unwrap_or(&self.name)
    }
}

impl InventoryUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}

/// `{ data: T }` 形式、または素の `T`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    Wrapped { data: T },
    Raw(T),
}

impl<T> Envelope<T> {
    pub fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } => data,
            Envelope::Raw(value) => value,
        }
    }
}
