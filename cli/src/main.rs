use batchmark_cli::cmd::GlobalArgs;
use clap::Parser;

#[tokio::main]
async fn main() {
    env_logger::init();
    let app = GlobalArgs::parse();
    app.exec_subcmd().await.unwrap_or_else(|e| {
        eprintln!("Error: {:?}", e);
        std::process::exit(1);
    });
}
