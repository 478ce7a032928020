//! 食品ロス削減ツール
//!
//! 在庫APIクライアント・画像OCRアップロード・AI応答の整形

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod render;
pub mod upload;
