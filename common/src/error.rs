//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// 画像選択時の検証エラー（メッセージはそのままUIに表示する）
    #[error("{0}")]
    Validation(String),

    /// 現在の状態では許可されない操作
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
