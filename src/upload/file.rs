use crate::error::{AppError, Result};
use food_waste_common::SelectedImage;
use std::path::Path;

const UNKNOWN_MIME_TYPE: &str = "application/octet-stream";

/// ファイル内容からMIMEタイプを推定する（画像以外は octet-stream）
pub fn detect_mime_type(bytes: &[u8]) -> &'static str {
    image::guess_format(bytes)
        .map(|format| format.to_mime_type())
        .unwrap_or(UNKNOWN_MIME_TYPE)
}

/// 画像ファイルを読み込む（形式・サイズの検証はセッション側で行う）
pub async fn load_image(path: &Path) -> Result<SelectedImage> {
    if !path.is_file() {
        return Err(AppError::FileNotFound(path.display().to_string()));
    }

    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let mime_type = detect_mime_type(&bytes);

    Ok(SelectedImage::new(file_name, mime_type, bytes))
}
