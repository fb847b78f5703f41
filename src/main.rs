use std::io::Write;
use std::path::PathBuf;

use clap::Parser;

use waste_classifier::app_state::{AppConfig, AppState};
use waste_classifier::server;

#[derive(Parser, Debug)]
#[command(name = "waste-classifier", about = "Waste classification inference server")]
struct Cli {
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    #[arg(long, default_value_t = 8000)]
    port: u16,
    /// Path to the trained ONNX classifier artifact.
    #[arg(long, default_value = "waste_classifier.onnx")]
    model_path: PathBuf,
    /// Upper bound on the uploaded image size, in bytes.
    #[arg(long, default_value_t = 10 * 1024 * 1024)]
    max_body_bytes: usize,
}

fn main() -> std::io::Result<()> {
    let cli = Cli::parse();

    // default level is info
    env_logger::Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - {} - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter(None, log::LevelFilter::Info)
        .init();

    let config = AppConfig {
        host: cli.host,
        port: cli.port,
        model_path: cli.model_path,
        max_body_bytes: cli.max_body_bytes,
    };
    let app_state = AppState::new(&config);

    actix_web::rt::System::new().block_on(async move {
        tokio::select! {
            res = server::startup(config, app_state) => res,
            _ = tokio::signal::ctrl_c() => {
                println!("Received Ctrl+C, shutting down");
                Ok(())
            }
        }
    })
}
