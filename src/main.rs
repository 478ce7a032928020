use clap::Parser;
use dialoguer::Confirm;
use food_waste_common::types::{InventoryUpdate, NewInventory};
use food_waste_common::resources::resource_kinds;
use food_waste_common::{clean_ai_response, filter_resources, format_ai_response_for_display, strip_markdown, UploadStatus};
use food_waste_rust::{api, auth, cli, config, error, render, upload};
use api::ApiClient;
use auth::StaticToken;
use cli::{Cli, Commands, FormatMode, InventoryAction};
use config::Config;
use error::{AppError, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use upload::{SubmitOutcome, UploadDialog};

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "warn,food_waste_rust=debug,food_waste_common=debug"
    } else {
        "warn,food_waste_rust=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn build_client(config: &Config) -> Result<ApiClient> {
    let client = ApiClient::new(
        config.api_url(),
        Duration::from_secs(config.timeout_seconds),
        StaticToken::from_config(config),
    )?;
    debug!("API base URL: {}", client.base_url());
    Ok(client)
}

fn read_input(input: &Path) -> Result<String> {
    if input == Path::new("-") {
        return Ok(std::io::read_to_string(std::io::stdin())?);
    }
    if !input.exists() {
        return Err(AppError::FileNotFound(input.display().to_string()));
    }
    Ok(std::fs::read_to_string(input)?)
}

fn confirm(prompt: &str, skip: bool) -> Result<bool> {
    if skip {
        return Ok(true);
    }
    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| { let dialoguer::Error::IO(e) = e; AppError::Io(e) })
}

fn status_label(status: UploadStatus) -> &'static str {
    match status {
        UploadStatus::Uploading => "アップロード中...",
        UploadStatus::Processing => "画像を解析中...",
        _ => "待機中...",
    }
}

async fn run_upload(config: &Config, inventory_id: String, image: &Path, yes: bool) -> Result<()> {
    println!("🧾 food-waste - 画像から品目を追加\n");

    let client = Arc::new(build_client(config)?);
    let dialog = UploadDialog::open(Arc::clone(&client), inventory_id);

    // 1. 画像選択
    println!("[1/3] 画像を確認中...");
    if let Err(e) = dialog.select_path(image).await {
        dialog.close(|| {});
        return Err(e);
    }
    let session = dialog.snapshot();
    if let Some(file) = session.selected_file() {
        println!("✔ {} ({} KB)\n", file.file_name, file.size() / 1024);
    }

    if !confirm("この画像を送信しますか?", yes)? {
        dialog.close(|| println!("キャンセルしました"));
        return Ok(());
    }

    // 2. 送信
    println!("[2/3] 送信中...");
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));

    let mut refresh = false;
    let outcome = {
        let submit = dialog.submit(|_| refresh = true);
        tokio::pin!(submit);
        let mut ticker = tokio::time::interval(Duration::from_millis(100));
        loop {
            tokio::select! {
                outcome = &mut submit => break outcome,
                _ = ticker.tick() => spinner.set_message(status_label(dialog.status())),
            }
        }
    };
    spinner.finish_and_clear();

    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(e) => {
            dialog.close(|| {});
            return Err(e);
        }
    };

    match outcome {
        SubmitOutcome::Completed(items) => {
            println!("✔ {}件の品目を追加\n", items.len());
            print!("{}", render::render_extracted_items(&items));
        }
        SubmitOutcome::Failed(message) => {
            dialog.close(|| {});
            return Err(AppError::Upload(message));
        }
        SubmitOutcome::Discarded => {}
    }

    let inventory_id = dialog.inventory_id().to_string();
    dialog.close(|| {});

    // 3. 在庫の再取得
    if refresh {
        println!("\n[3/3] 在庫を更新中...");
        let inventory = client.get_inventory(&inventory_id).await?;
        let today = chrono::Local::now().date_naive();
        print!("{}", render::render_inventory(&inventory, today));
    }

    println!("\n✅ 完了");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Format { input, mode, json } => {
            let text = read_input(&input)?;
            match mode {
                FormatMode::Plain => println!("{}", strip_markdown(&text)),
                FormatMode::Clean => println!("{}", clean_ai_response(&text)),
                FormatMode::Outline => {
                    let doc = format_ai_response_for_display(&text);
                    if json {
                        println!("{}", doc.to_json()?);
                    } else {
                        print!("{}", render::render_document(&doc));
                    }
                }
            }
        }

        Commands::Upload { inventory_id, image, yes } => {
            run_upload(&config, inventory_id, &image, yes).await?;
        }

        Commands::Resources { kind, query } => {
            let client = build_client(&config)?;
            let resources = client.list_resources().await?;
            let filtered = filter_resources(&resources, kind.as_deref(), query.as_deref());
            print!("{}", render::render_resources(&filtered));
            if filtered.is_empty() && kind.is_some() {
                println!("種類: {}", resource_kinds(&resources).join(", "));
            }
        }

        Commands::Inventory { action } => {
            let client = build_client(&config)?;
            let today = chrono::Local::now().date_naive();

            match action {
                InventoryAction::List => {
                    let inventories = client.list_inventories().await?;
                    print!("{}", render::render_inventories(&inventories));
                }
                InventoryAction::Show { id } => {
                    let inventory = client.get_inventory(&id).await?;
                    print!("{}", render::render_inventory(&inventory, today));
                }
                InventoryAction::Create { name, description } => {
                    let inventory = client
                        .create_inventory(&NewInventory { name, description })
                        .await?;
                    println!("✔ 在庫を作成しました: {} ({})", inventory.name, inventory.id);
                }
                InventoryAction::Update { id, name, description } => {
                    let update = InventoryUpdate { name, description };
                    if update.is_empty() {
                        return Err(AppError::Config(
                            "--name または --description を指定してください".into(),
                        ));
                    }
                    let inventory = client.update_inventory(&id, &update).await?;
                    println!("✔ 在庫を更新しました: {} ({})", inventory.name, inventory.id);
                }
                InventoryAction::Delete { id, yes } => {
                    if !confirm(&format!("在庫 {} を削除しますか?", id), yes)? {
                        println!("キャンセルしました");
                        return Ok(());
                    }
                    client.delete_inventory(&id).await?;
                    println!("✔ 在庫を削除しました: {}", id);
                }
            }
        }

        Commands::Config { set_api_url, set_token, show } => {
            let mut config = config;

            if let Some(url) = set_api_url {
                config.set_api_url(url)?;
                println!("✔ APIのURLを設定しました");
            }

            if let Some(token) = set_token {
                config.set_auth_token(token)?;
                println!("✔ 認証トークンを設定しました");
            }

            if show {
                println!("設定:");
                println!("  API URL: {}", config.api_url());
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  認証トークン: {}", if config.auth_token().is_some() { "設定済み" } else { "未設定" });
            }
        }
    }

    Ok(())
}
