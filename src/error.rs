use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("認証トークンが設定されていません。`food-waste config --set-token YOUR_TOKEN` で設定するか FOOD_WASTE_TOKEN を指定してください")]
    MissingToken,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("API呼び出しエラー: {0}")]
    ApiCall(String),

    /// サーバーが 2xx 以外を返した
    #[error("APIエラー ({status}): {message}")]
    ApiStatus { status: u16, message: String },

    #[error("APIレスポンスのパースに失敗: {0}")]
    ApiParse(String),

    #[error("アップロード失敗: {0}")]
    Upload(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTPエラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Common(#[from] food_waste_common::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
