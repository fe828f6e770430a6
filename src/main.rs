use clap::Parser;
use tracing_subscriber::EnvFilter;

use library_mcp::application::service::LibraryService;
use library_mcp::config::{Config, DEFAULT_LOG_FILTER};
use library_mcp::infra::json_store::JsonCatalogRepository;
use library_mcp::interface::{mcp, menu};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdoutはMCPプロトコル/メニュー表示に使うため、ログはstderrへ
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = Config::parse();
    let repo = JsonCatalogRepository::new(&config.data_file);
    let mut service = LibraryService::open(repo)?;
    tracing::info!(
        path = %config.data_file.display(),
        books = service.catalog().len(),
        "library opened"
    );

    if config.menu {
        menu::run(&mut service)
    } else {
        mcp::run(service).await
    }
}
