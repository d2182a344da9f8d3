//! Combogen CLI - expand prompt workbooks into combination tables
//!
//! # Commands
//!
//! ```bash
//! combogen generate prompts.xlsx              # JSON to stdout
//! combogen generate prompts.xlsx -f csv -o combinations.csv
//! combogen validate prompts.xlsx              # check sheets and columns
//! combogen preview prompts.xlsx               # first rows of each sheet
//! combogen sample                             # write example.xlsx
//! combogen serve                              # HTTP server (port 3000)
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use combogen::{
    read_workbook_file, run_file, sample_workbook, to_csv, to_json, validation_message, PipelineOptions,
    SheetPreview, DEFAULT_MAX_ROWS,
};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "combogen")]
#[command(about = "Expand prompt workbooks into prompt x model x parameter combinations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Csv,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a workbook and generate every combination
    Generate {
        /// Input workbook (.xlsx, .xls, .ods)
        input: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: Format,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write CSV to this file
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Also write JSON to this file
        #[arg(long)]
        json: Option<PathBuf>,

        /// Refuse workbooks that expand to more rows than this
        #[arg(long, default_value_t = DEFAULT_MAX_ROWS)]
        max_rows: usize,
    },

    /// Check required sheets and columns without generating
    Validate {
        /// Input workbook
        input: PathBuf,
    },

    /// Show the first rows of each input sheet
    Preview {
        /// Input workbook
        input: PathBuf,

        /// Rows per sheet
        #[arg(short = 'n', long, default_value = "5")]
        rows: usize,
    },

    /// Write the example workbook
    Sample {
        /// Output file
        #[arg(short, long, default_value = "example.xlsx")]
        output: PathBuf,
    },

    /// Start HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "COMBOGEN_PORT", default_value = "3000")]
        port: u16,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            input,
            format,
            output,
            csv,
            json,
            max_rows,
        } => {
            let options = PipelineOptions {
                max_rows,
                ..PipelineOptions::default()
            };
            cmd_generate(&input, &options, format, output.as_deref(), csv.as_deref(), json.as_deref())
        }

        Commands::Validate { input } => cmd_validate(&input),

        Commands::Preview { input, rows } => cmd_preview(&input, rows),

        Commands::Sample { output } => cmd_sample(&output),

        Commands::Serve { port } => cmd_serve(port).await,
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_generate(
    input: &Path,
    options: &PipelineOptions,
    format: Format,
    output: Option<&Path>,
    csv_path: Option<&Path>,
    json_path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Processing: {}", input.display());

    let result = run_file(input, options)?;
    let table = &result.combinations;

    eprintln!("\n⚙️  Generated {} rows", table.len());
    eprintln!("   Columns: {}", table.columns().join(", "));

    let content = match format {
        Format::Json => to_json(table)?,
        Format::Csv => to_csv(table)?,
    };
    write_output(&content, output)?;

    if let Some(path) = csv_path {
        fs::write(path, to_csv(table)?)?;
        eprintln!("💾 CSV written to: {}", path.display());
    }
    if let Some(path) = json_path {
        fs::write(path, to_json(table)?)?;
        eprintln!("💾 JSON written to: {}", path.display());
    }

    eprintln!("\n✨ Done!");
    Ok(())
}

fn cmd_validate(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("✔️  Validating: {}", input.display());

    let workbook = read_workbook_file(input)?;

    match validation_message(&workbook) {
        None => {
            println!("Validation Passed!");
            Ok(())
        }
        Some(message) => {
            println!("Validation Error:\n{}", message);
            std::process::exit(1);
        }
    }
}

fn cmd_preview(input: &Path, rows: usize) -> Result<(), Box<dyn std::error::Error>> {
    let workbook = read_workbook_file(input)?;

    for preview in workbook.previews(rows) {
        print_preview(&preview);
    }
    Ok(())
}

fn print_preview(preview: &SheetPreview) {
    println!("#### {} Sheet ({} rows)", preview.name, preview.total_rows);
    println!("{}", preview.columns.join(" | "));
    for row in &preview.rows {
        println!("{}", row.join(" | "));
    }
    if preview.total_rows > preview.rows.len() {
        println!("... +{} more", preview.total_rows - preview.rows.len());
    }
    println!();
}

fn cmd_sample(output: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = sample_workbook()?;
    fs::write(output, bytes)?;
    eprintln!("💾 Sample workbook written to: {}", output.display());
    Ok(())
}

async fn cmd_serve(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    combogen::server::start_server(port).await
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
