//! Food Waste Common Library
//!
//! CLIとサーバー連携で共有される型とユーティリティ

pub mod types;
pub mod error;
pub mod text;
pub mod session;
pub mod resources;

pub use types::{ExtractedItem, Inventory, InventoryItem, Resource};
pub use error::{Error, Result};
pub use text::{clean_ai_response, format_ai_response_for_display, strip_markdown, FormattedDocument, Section};
pub use session::{interpret_upload_reply, SelectedImage, UploadSession, UploadStatus};
pub use resources::filter_resources;
