use anyhow::Result;
use clap::Parser;
use finreport::cli;
use tracing::error;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Args::parse();
    if let Err(err) = cli::dispatch(args).await {
        if err.downcast_ref::<cli::ReportFailed>().is_none() {
            error!("{:#}", err);
        }
        std::process::exit(1);
    }
    Ok(())
}
