use clap::{Parser, Subcommand};
use convertx_core::config::{
    converter_args_from_env_value, converter_program_from_env_value, data_dir_from_env_value,
    list_from_env_value, timeout_from_env_value,
};
use convertx_core::{ConvertService, CoreConfig, FormatNormalizer, KnownFormats, Upload};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "convertx")]
#[command(about = "ConvertX file conversion CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a local file through the same pipeline as the HTTP endpoint
    Convert {
        /// File to convert
        file: PathBuf,
        /// Target format, e.g. webp or pdf
        #[arg(long = "to")]
        target_format: String,
        /// Data directory (defaults to CONVERTX_DATA_DIR, then "data")
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// List accepted target formats
    Formats,
}

fn known_formats() -> KnownFormats {
    KnownFormats::with_extra(list_from_env_value(
        std::env::var("CONVERTX_EXTRA_FORMATS").ok(),
    ))
}

fn config(data_dir: Option<PathBuf>) -> Result<CoreConfig, Box<dyn std::error::Error>> {
    let data_dir = data_dir
        .unwrap_or_else(|| data_dir_from_env_value(std::env::var("CONVERTX_DATA_DIR").ok()));
    Ok(CoreConfig::new(
        data_dir,
        converter_program_from_env_value(std::env::var("CONVERTX_CONVERTER").ok()),
        converter_args_from_env_value(std::env::var("CONVERTX_CONVERTER_ARGS").ok()),
        timeout_from_env_value(std::env::var("CONVERTX_CONVERSION_TIMEOUT_SECS").ok())?,
    )?)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Convert {
            file,
            target_format,
            data_dir,
        }) => {
            let Some(format) = known_formats().normalize(&target_format) else {
                eprintln!("Unknown target format: {}", target_format);
                std::process::exit(2);
            };
            let file_name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let bytes = tokio::fs::read(&file).await?;

            let service = ConvertService::from_config(&config(data_dir)?);
            match service.convert(Upload::new(file_name, bytes), &format).await {
                Ok(job) => println!("{}", job.output_path().display()),
                Err(e) => {
                    eprintln!("Error converting {}: {}", file.display(), e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Formats) => {
            for format in known_formats().formats() {
                println!("{}", format);
            }
        }
        None => {
            println!("Use 'convertx --help' for commands");
        }
    }

    Ok(())
}
