use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "food-waste")]
#[command(about = "食品ロス削減: 在庫管理・レシートOCR取り込み・AI応答整形ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// AI応答テキストを整形して表示
    Format {
        /// 入力テキストファイル（`-` で標準入力）
        #[arg(required = true)]
        input: PathBuf,

        /// 整形モード (plain/clean/outline)
        #[arg(short, long, value_enum, default_value = "outline")]
        mode: FormatMode,

        /// outline をJSONで出力
        #[arg(long)]
        json: bool,
    },

    /// レシート・食品の画像から在庫に品目を追加
    Upload {
        /// 追加先の在庫ID
        #[arg(required = true)]
        inventory_id: String,

        /// 画像ファイル
        #[arg(required = true)]
        image: PathBuf,

        /// 確認せずに送信
        #[arg(short, long)]
        yes: bool,
    },

    /// 食品ロス削減の記事・資料を表示
    Resources {
        /// 種類で絞り込み (article/video など)
        #[arg(short = 't', long = "type")]
        kind: Option<String>,

        /// キーワードで絞り込み
        #[arg(short, long)]
        query: Option<String>,
    },

    /// 在庫の管理
    Inventory {
        #[command(subcommand)]
        action: InventoryAction,
    },

    /// 設定を表示/編集
    Config {
        /// APIのベースURLを設定
        #[arg(long)]
        set_api_url: Option<String>,

        /// 認証トークンを設定
        #[arg(long)]
        set_token: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[derive(Subcommand)]
pub enum InventoryAction {
    /// 在庫の一覧
    List,

    /// 在庫の詳細（品目と消費期限）
    Show {
        #[arg(required = true)]
        id: String,
    },

    /// 在庫を作成
    Create {
        #[arg(required = true)]
        name: String,

        #[arg(short, long)]
        description: Option<String>,
    },

    /// 在庫を更新
    Update {
        #[arg(required = true)]
        id: String,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        description: Option<String>,
    },

    /// 在庫を削除
    Delete {
        #[arg(required = true)]
        id: String,

        /// 確認せずに削除
        #[arg(short, long)]
        yes: bool,
    },
}

/// AI応答の整形モード
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum FormatMode {
    /// 記法・絵文字をすべて除去
    Plain,
    /// 絵文字を残して整形
    Clean,
    /// 見出し単位のアウトライン
    #[default]
    Outline,
}
