use azure_storage_quickstart::config::Cli;
use azure_storage_quickstart::{logging, run};
use clap::Parser;

#[tokio::main]
async fn main() {
    // Do as little as possible in main.rs as it can't contain any tests
    logging::init("log4rs.yml");
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    //
    log::info!("#Start main()");

    if let Err(e) = run(&cli).await {
        log::error!("{e}");
        std::process::exit(1);
    }
}
