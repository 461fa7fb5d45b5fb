use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use inventory_client::{ClientConfig, HttpInventoryClient, InventoryView, SearchMode, render};
use inventory_domain_core::ItemId;

#[derive(Debug, Parser)]
#[command(name = "inventory", version, about = "Terminal client for the inventory service")]
struct Cli {
    /// 服务地址，默认读取 INVENTORY_API_URL
    #[arg(long)]
    api_url: Option<String>,

    /// 请求超时（秒），默认读取 INVENTORY_API_TIMEOUT_SECS
    #[arg(long)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 列出全部条目
    List,
    /// 按名称子串或精确数量搜索，不带参数时列出全部
    Search {
        #[arg(long, conflicts_with = "quantity")]
        name: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        quantity: Option<String>,
    },
    /// 添加条目
    Add {
        name: String,
        #[arg(allow_hyphen_values = true)]
        quantity: String,
    },
    /// 按 ID 删除条目
    Delete { id: i64 },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let log_level = std::env::var("INVENTORY_LOG").unwrap_or_else(|_| "error".to_string());
    inventory_telemetry::init_tracing(&log_level);

    let cli = Cli::parse();

    let mut config = ClientConfig::from_env();
    if let Some(url) = cli.api_url {
        config = ClientConfig::new(url).with_timeout(config.timeout);
    }
    if let Some(secs) = cli.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }

    let api = HttpInventoryClient::new(config).context("Failed to build HTTP client")?;
    let mut view = InventoryView::new(api);

    match cli.command {
        Command::List => view.fetch_all().await,
        Command::Search { name, quantity } => {
            match quantity {
                Some(term) => {
                    view.set_search_mode(SearchMode::Quantity);
                    view.set_quantity_term(term);
                }
                None => {
                    view.set_search_mode(SearchMode::Name);
                    view.set_name_term(name.unwrap_or_default());
                }
            }
            view.search().await;
        }
        Command::Add { name, quantity } => view.add(&name, &quantity).await,
        Command::Delete { id } => view.delete(ItemId(id)).await,
    }

    let state = view.state();
    if let Some(error) = &state.error {
        eprintln!("{}", render::error_banner(error));
        return Ok(ExitCode::FAILURE);
    }

    print!("{}", render::items_table(&state.items));
    Ok(ExitCode::SUCCESS)
}
