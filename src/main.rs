use clap::Parser;
use colored::Colorize;

use hrms_exporter::config::{Cli, Command, StaticConfig};
use hrms_exporter::errors::ExporterError;
use hrms_exporter::runtime::run_server;
use hrms_exporter::system::init_logging;

#[actix_web::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Some(Command::GenerateConfig) = cli.command {
        println!("{}", StaticConfig::generate_sample_config());
        return;
    }

    let mut config = match StaticConfig::load(&cli.config) {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };
    cli.apply(&mut config);

    // 日志 guard 需要在整个进程生命周期内保持
    let _guard = match init_logging(&config.logging) {
        Ok(guard) => guard,
        Err(e) => exit_with(&e),
    };

    if let Err(e) = run_server(config).await {
        tracing::error!("Failed to start exporter: {:#}", e);
        eprintln!("{} {:#}", "[ERROR]".red().bold(), e);
        std::process::exit(1);
    }
}

fn exit_with(err: &ExporterError) -> ! {
    eprintln!("{}", err.format_colored());
    std::process::exit(1);
}
