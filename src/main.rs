use clap::Parser;
use ronin::core::config::{self, CliOverrides};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ronin", about = "Chat with a code assistant about the file you are reading")]
struct Args {
    /// Model passed to the responder (overrides config and RONIN_MODEL)
    #[arg(short, long)]
    model: Option<String>,

    /// File to open in the code view
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Project root (defaults to the current directory)
    #[arg(short, long)]
    project: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to ronin.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create("ronin.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            log::warn!("Falling back to default config: {}", e);
            eprintln!("ronin: {e}; using defaults");
            config::RoninConfig::default()
        }
    };
    let cli = CliOverrides {
        model: args.model,
        file: args.file,
        project: args.project,
    };
    let resolved = config::resolve(&file_config, &cli);

    log::info!(
        "Ronin starting up (project={}, model={:?}, file={:?})",
        resolved.project_root.display(),
        resolved.model_name,
        resolved.file
    );

    ronin::tui::run(resolved)
}
