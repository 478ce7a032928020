//! 画像OCRアップロードのセッション状態
//!
//! 1つのアップロードダイアログが持つ状態遷移を扱う（I/Oは持たない）。
//!
//! ```text
//! Idle --選択(有効)--> Ready --送信--> Uploading --> Processing --> Complete
//!   |                   |                 |              |
//!   +--選択(無効)--> Error <--------------+--------------+
//! ```
//!
//! Uploading/Processing 以外の状態からは `clear` で Idle に戻せる。

use crate::error::{Error, Result};
use crate::types::{AddedItemsResponse, ErrorBody, ExtractedItem};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;

/// アップロード可能な画像サイズの上限 (10 MiB)
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

pub const INVALID_TYPE_MESSAGE: &str = "Please select an image file";
pub const FILE_TOO_LARGE_MESSAGE: &str = "File size must be less than 10MB";
/// サーバーがエラー内容を返さなかった場合のメッセージ
pub const UPLOAD_FAILED_MESSAGE: &str = "Failed to process image";

/// セッションの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    #[default]
    Idle,
    Ready,
    Uploading,
    Processing,
    Complete,
    Error,
}

impl UploadStatus {
    /// 送信中（Uploading/Processing）か
    pub fn is_submitting(self) -> bool {
        matches!(self, UploadStatus::Uploading | UploadStatus::Processing)
    }
}

impl std::fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UploadStatus::Idle => write!(f, "idle"),
            UploadStatus::Ready => write!(f, "ready"),
            UploadStatus::Uploading => write!(f, "uploading"),
            UploadStatus::Processing => write!(f, "processing"),
            UploadStatus::Complete => write!(f, "complete"),
            UploadStatus::Error => write!(f, "error"),
        }
    }
}

/// ユーザーが選択した画像
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedImage {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl SelectedImage {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    /// プレビュー用のData URL (`data:image/jpeg;base64,...`)
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.bytes))
    }

    /// 形式・サイズの検証。エラー時はUIに出すメッセージを返す
    pub fn validate(&self) -> std::result::Result<(), &'static str> {
        if !self.is_image() {
            return Err(INVALID_TYPE_MESSAGE);
        }
        if self.size() > MAX_IMAGE_BYTES {
            return Err(FILE_TOO_LARGE_MESSAGE);
        }
        Ok(())
    }
}

/// アップロードダイアログ1つ分の状態
#[derive(Debug, Clone, Default)]
pub struct UploadSession {
    selected: Option<SelectedImage>,
    preview_data_url: Option<String>,
    status: UploadStatus,
    error_message: Option<String>,
    extracted_items: Vec<ExtractedItem>,
}

impl UploadSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> UploadStatus {
        self.status
    }

    pub fn selected_file(&self) -> Option<&SelectedImage> {
        self.selected.as_ref()
    }

    pub fn preview_data_url(&self) -> Option<&str> {
        self.preview_data_url.as_deref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn extracted_items(&self) -> &[ExtractedItem] {
        &self.extracted_items
    }

    /// 画像を選択する
    ///
    /// 検証に失敗した場合は選択を解除して Error 状態になる。
    pub fn select_file(&mut self, image: SelectedImage) -> Result<()> {
        if self.status.is_submitting() {
            return Err(Error::InvalidState(format!(
                "cannot select a file while {}",
                self.status
            )));
        }

        if let Err(message) = image.validate() {
            self.selected = None;
            self.preview_data_url = None;
            self.extracted_items.clear();
            self.status = UploadStatus::Error;
            self.error_message = Some(message.to_string());
            return Err(Error::Validation(message.to_string()));
        }

        self.preview_data_url = Some(image.to_data_url());
        self.selected = Some(image);
        self.error_message = None;
        self.extracted_items.clear();
        self.status = UploadStatus::Ready;
        Ok(())
    }

    /// 送信可能か（画像選択済みで、送信中・完了済みでない）
    pub fn can_submit(&self) -> bool {
        self.selected.is_some()
            && !self.status.is_submitting()
            && self.status != UploadStatus::Complete
    }

    /// 送信開始。送信する画像の複製を返す
    pub fn begin_upload(&mut self) -> Result<SelectedImage> {
        if !self.can_submit() {
            return Err(Error::InvalidState(format!(
                "cannot submit while {}",
                self.status
            )));
        }
        let image = self
            .selected
            .clone()
            .ok_or_else(|| Error::InvalidState("no file selected".into()))?;

        self.status = UploadStatus::Uploading;
        self.error_message = None;
        Ok(image)
    }

    /// レスポンス受信後、内容の解釈に入る
    pub fn begin_processing(&mut self) -> Result<()> {
        if self.status != UploadStatus::Uploading {
            return Err(Error::InvalidState(format!(
                "cannot start processing while {}",
                self.status
            )));
        }
        self.status = UploadStatus::Processing;
        Ok(())
    }

    pub fn complete(&mut self, items: Vec<ExtractedItem>) -> Result<()> {
        if !self.status.is_submitting() {
            return Err(Error::InvalidState(format!(
                "cannot complete while {}",
                self.status
            )));
        }
        self.status = UploadStatus::Complete;
        self.extracted_items = items;
        Ok(())
    }

    /// 送信失敗。選択中の画像は残すので再送信できる
    pub fn fail(&mut self, message: impl Into<String>) -> Result<()> {
        if !self.status.is_submitting() {
            return Err(Error::InvalidState(format!(
                "cannot fail while {}",
                self.status
            )));
        }
        self.status = UploadStatus::Error;
        self.error_message = Some(message.into());
        Ok(())
    }

    /// 選択・プレビュー・エラー・抽出結果を破棄して Idle に戻す
    pub fn clear(&mut self) -> Result<()> {
        if self.status.is_submitting() {
            return Err(Error::InvalidState(format!(
                "cannot clear while {}",
                self.status
            )));
        }
        *self = Self::default();
        Ok(())
    }
}

/// アップロードAPIのレスポンスを解釈する
///
/// - 2xx 以外: `{ error }` の内容、無ければ [`UPLOAD_FAILED_MESSAGE`]
/// - 2xx: `addedItems`（無ければ空）
pub fn interpret_upload_reply(
    status: u16,
    body: &str,
) -> std::result::Result<Vec<ExtractedItem>, String> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.error)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| UPLOAD_FAILED_MESSAGE.to_string());
        return Err(message);
    }

    serde_json::from_str::<AddedItemsResponse>(body)
        .map(AddedItemsResponse::into_items)
        .map_err(|_| UPLOAD_FAILED_MESSAGE.to_string())
}
