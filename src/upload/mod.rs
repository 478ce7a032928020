//! 画像OCRアップロード
//!
//! [`UploadDialog`] がセッション状態（[`UploadSession`]）を保持し、
//! 画像の選択 → 送信 → レスポンスの解釈 → 完了通知 までを駆動する。
//!
//! - Uploading はリクエストが応答を返すまで続き、Processing は応答の解釈中を表す
//! - ダイアログを閉じた後に届いた応答はセッションに反映しない

mod file;

pub use file::{detect_mime_type, load_image};

use crate::error::Result;
use food_waste_common::{interpret_upload_reply, ExtractedItem, SelectedImage, UploadSession, UploadStatus};
use std::future::Future;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, info, warn};

/// 完了してから成功コールバックを呼ぶまでの待ち時間
pub const SUCCESS_DELAY: Duration = Duration::from_secs(2);

/// アップロードAPIの生レスポンス
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReply {
    pub status: u16,
    pub body: String,
}

/// 画像を受け取ってOCR処理するサーバー側の窓口
pub trait OcrBackend: Send + Sync {
    fn upload_image(
        &self,
        inventory_id: &str,
        image: SelectedImage,
    ) -> impl Future<Output = Result<UploadReply>> + Send;
}

/// 送信の結果
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Completed(Vec<ExtractedItem>),
    Failed(String),
    /// 応答前にダイアログが閉じられた
    Discarded,
}

/// アップロードダイアログ1つ分
pub struct UploadDialog<B> {
    backend: Arc<B>,
    inventory_id: String,
    session: Arc<Mutex<UploadSession>>,
    alive: Arc<AtomicBool>,
}

impl<B: OcrBackend> UploadDialog<B> {
    pub fn open(backend: Arc<B>, inventory_id: impl Into<String>) -> Self {
        Self {
            backend,
            inventory_id: inventory_id.into(),
            session: Arc::new(Mutex::new(UploadSession::new())),
            alive: Arc::new(AtomicBool::new(true)),
        }
    }

    fn session(&self) -> MutexGuard<'_, UploadSession> {
        self.session.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn inventory_id(&self) -> &str {
        &self.inventory_id
    }

    pub fn is_open(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    pub fn status(&self) -> UploadStatus {
        self.session().status()
    }

    /// 現在のセッション状態の複製
    pub fn snapshot(&self) -> UploadSession {
        self.session().clone()
    }

    pub fn select_image(&self, image: SelectedImage) -> Result<()> {
        debug!(
            "select {} ({}, {} bytes)",
            image.file_name,
            image.mime_type,
            image.size()
        );
        self.session().select_file(image)?;
        Ok(())
    }

    /// ファイルを読み込んで選択する
    pub async fn select_path(&self, path: &Path) -> Result<()> {
        let image = load_image(path).await?;
        self.select_image(image)
    }

    pub fn clear(&self) -> Result<()> {
        self.session().clear()?;
        Ok(())
    }

    /// ダイアログを閉じる。送信中のリクエストは中断しないが、結果は反映しない
    pub fn close<F: FnOnce()>(&self, on_close: F) {
        if self.alive.swap(false, Ordering::SeqCst) {
            debug!("upload dialog for inventory {} closed", self.inventory_id);
        }
        on_close();
    }

    /// 選択中の画像を送信する
    ///
    /// 成功時は [`SUCCESS_DELAY`] 待ってから `on_success` を呼ぶ。
    /// 送信中・未選択の場合はエラー。
    pub async fn submit<F>(&self, on_success: F) -> Result<SubmitOutcome>
    where
        F: FnOnce(&[ExtractedItem]),
    {
        let image = self.session().begin_upload()?;
        info!(
            "uploading {} to inventory {}",
            image.file_name, self.inventory_id
        );

        let reply = self.backend.upload_image(&self.inventory_id, image).await;

        if !self.is_open() {
            warn!("upload finished after the dialog was closed; result discarded");
            return Ok(SubmitOutcome::Discarded);
        }

        let items = match reply {
            Ok(reply) => {
                self.session().begin_processing()?;
                interpret_upload_reply(reply.status, &reply.body)
            }
            Err(e) => Err(e.to_string()),
        };

        let items = match items {
            Ok(items) => items,
            Err(message) => {
                warn!("upload failed: {}", message);
                self.session().fail(message.clone())?;
                return Ok(SubmitOutcome::Failed(message));
            }
        };

        info!("{} items added from image", items.len());
        self.session().complete(items.clone())?;

        tokio::time::sleep(SUCCESS_DELAY).await;

        if self.is_open() {
            on_success(&items);
        } else {
            debug!("dialog closed during success delay; callback skipped");
        }
        Ok(SubmitOutcome::Completed(items))
    }
}
