//! 認証トークンの取得
//!
//! 外部のIDプロバイダから得たトークンを Bearer ヘッダに使う。

use crate::config::Config;
use crate::error::{AppError, Result};
use std::future::Future;

/// 認証トークンの提供元
pub trait TokenProvider: Send + Sync {
    fn token(&self) -> impl Future<Output = Result<String>> + Send;
}

/// 設定ファイル・環境変数から読んだ固定トークン
#[derive(Debug, Clone, Default)]
pub struct StaticToken(Option<String>);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Some(token.into()))
    }

    pub fn none() -> Self {
        Self(None)
    }

    pub fn from_config(config: &Config) -> Self {
        Self(config.auth_token())
    }
}

impl TokenProvider for StaticToken {
    async fn token(&self) -> Result<String> {
        self.0.clone().ok_or(AppError::MissingToken)
    }
}
