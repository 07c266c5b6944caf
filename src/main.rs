use chrono::Local;
use clap::Parser;
use sx_collect::{
    cli::{log_directives, Cli},
    info_time, CollectorConfig, QuestionIdSearcher, Result, ResultSet,
};
use tokio::{fs, io::AsyncWriteExt};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let start_time = Local::now();
    let config = CollectorConfig::load(cli.config.as_deref())?;
    let print_quota = config.print_quota || cli.print_quota;

    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = EnvFilter::new(log_directives(cli.verbose, rust_log.as_deref(), print_quota));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!(site = %config.site, has_key = config.api_key.is_some(), "loaded config");

    let query = cli.search_query()?;
    let client = config.client_builder().build()?;
    let searcher = QuestionIdSearcher::new(client)
        .with_min_request_delay(config.min_request_delay())
        .with_print_quota(print_quota);

    // Page failures are already logged by the searcher.
    let report = searcher.search_report(&query).await;

    write_ids(&cli.output, &report.ids).await?;
    info_time!(
        start_time,
        "Wrote {} ids to file: {}",
        report.ids.len(),
        cli.output.display()
    );

    Ok(())
}

async fn write_ids(path: &std::path::Path, ids: &ResultSet) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    let contents = ids
        .iter()
        .flat_map(|id| format!("{id}\n").into_bytes())
        .collect::<Vec<_>>();
    let mut file = fs::File::create(path).await?;
    file.write_all(&contents).await?;
    Ok(())
}
