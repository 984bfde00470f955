use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::*;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use test_case_sync::commands::{fetch_snapshot, format_snapshot, run_sync};
use test_case_sync::config::{Overrides, Settings};
use test_case_sync::Result;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Archivo de configuración TOML (opcional)
    #[arg(short, long, global = true, default_value = "test_case_sync.toml")]
    config: PathBuf,

    /// URL base de la API
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Identificador de la aplicación
    #[arg(long, global = true)]
    app_id: Option<String>,

    /// Archivo donde se guarda la respuesta cruda
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    /// Directorio de salida de los documentos
    #[arg(short, long, global = true)]
    output_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Descargar y generar los documentos (por defecto)
    Sync,
    /// Solo descargar la respuesta de la API
    Fetch,
    /// Solo generar los documentos a partir de una respuesta guardada
    Format {
        /// Ruta a la respuesta JSON (por defecto la configurada)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        tracing::error!(stage = error.stage(), "{error}");
        std::process::exit(error.exit_code());
    }
}

fn run(cli: Cli) -> Result<()> {
    let overrides = Overrides {
        endpoint: cli.endpoint,
        app_id: cli.app_id,
        snapshot_path: cli.snapshot,
        output_dir: cli.output_dir,
    };
    let settings = Settings::load(&cli.config, &overrides)?;

    match cli.command.unwrap_or(Commands::Sync) {
        Commands::Sync => {
            let report = run_sync(&settings)?;
            println!("{}", "📥 Respuesta de la API recibida".blue());
            print_titles(&report.format.titles);
            println!(
                "{}",
                format!(
                    "🎉 {} casos de prueba sincronizados en {}",
                    report.format.documents,
                    report.format.output_dir.display()
                )
                .green()
            );
        }
        Commands::Fetch => {
            let report = fetch_snapshot(&settings)?;
            println!(
                "{}",
                format!("📥 {} bytes guardados en {}", report.bytes, report.path.display()).green()
            );
        }
        Commands::Format { input } => {
            let input = input.unwrap_or_else(|| settings.snapshot_path.clone());
            let report = format_snapshot(&settings, &input)?;
            print_titles(&report.titles);
            println!(
                "{}",
                format!(
                    "📋 {} documentos e índice generados en {}",
                    report.documents,
                    report.output_dir.display()
                )
                .green()
            );
        }
    }

    Ok(())
}

fn print_titles(titles: &[String]) {
    if titles.is_empty() {
        println!("{}", "⚠️  No se encontraron casos de prueba".yellow());
    }
    for title in titles {
        println!("   📝 {}", title);
    }
}
