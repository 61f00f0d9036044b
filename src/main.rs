use anyhow::{Context, Result};
use barchart::csv_reader;
use barchart::render::renderer_for;
use barchart::{
    classify, Cell, ChartRequest, Color, ColorMode, Dataset, OutputFormat, PaletteName,
    PipelineOutcome, RenderOptions, SortOrder,
};
use clap::Parser;
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "barchart")]
#[command(about = "Aggregate a CSV column by category and export a bar chart", long_about = None)]
struct Args {
    /// Input file (.csv or .json); use '-' to read CSV from stdin
    input: PathBuf,

    /// Column holding the categories (default: first column)
    #[arg(short, long)]
    label: Option<String>,

    /// Numeric column to sum per category (default: second column)
    #[arg(short, long)]
    value: Option<String>,

    /// Sort bars by total: descending or ascending
    #[arg(long)]
    sort: Option<SortOrder>,

    /// Palette: viridis, plasma, cividis, coolwarm, Set2, tab10
    #[arg(long, conflicts_with = "color")]
    palette: Option<String>,

    /// Single fixed color for every bar, e.g. '#1f77b4'
    #[arg(long)]
    color: Option<String>,

    #[arg(long)]
    title: Option<String>,

    #[arg(long)]
    x_label: Option<String>,

    #[arg(long)]
    y_label: Option<String>,

    /// JSON file with a full chart request; flags override its fields
    #[arg(long)]
    request: Option<PathBuf>,

    /// Output path (default: '<value column>_chart.png')
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format: png or vega
    #[arg(long, default_value = "png")]
    format: OutputFormat,

    #[arg(long, default_value_t = 1200, value_parser = clap::value_parser!(u32).range(1..=16384))]
    width: u32,

    #[arg(long, default_value_t = 800, value_parser = clap::value_parser!(u32).range(1..=16384))]
    height: u32,

    /// Print column types and the first rows, then exit
    #[arg(long)]
    preview: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let dataset = if args.input.as_os_str() == "-" {
        csv_reader::read_csv_from_stdin().context("Failed to read CSV from stdin")?
    } else {
        csv_reader::load_dataset(&args.input)
            .with_context(|| format!("Failed to load '{}'", args.input.display()))?
    };

    if args.preview {
        print_preview(&dataset, 5);
        return Ok(());
    }

    let request = build_request(&args, &dataset)?;

    let output = match barchart::run(&dataset, &request).context("Failed to build chart")? {
        PipelineOutcome::Chart(output) => output,
        PipelineOutcome::Blocked { message, .. } => {
            eprintln!("Error: {}", message);
            std::process::exit(1);
        }
    };
    for warning in &output.warnings {
        warn!("{}", warning);
    }

    let options = RenderOptions {
        width: args.width,
        height: args.height,
        format: args.format,
    };
    let renderer = renderer_for(&options);
    let bytes = renderer.render(&output.spec).context("Failed to render chart")?;

    let path = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&request, renderer.extension()));
    fs::write(&path, &bytes)
        .with_context(|| format!("Failed to write '{}'", path.display()))?;
    info!("Wrote {} bars to '{}'", output.spec.bars.len(), path.display());

    Ok(())
}

/// Merge the optional request file, default column choice and CLI flags.
fn build_request(args: &Args, dataset: &Dataset) -> Result<ChartRequest> {
    let mut request = match &args.request {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read request '{}'", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("Invalid request '{}'", path.display()))?
        }
        None => ChartRequest::with_default_columns(dataset)?,
    };

    if let Some(label) = &args.label {
        request.label_column = label.clone();
    }
    if let Some(value) = &args.value {
        request.value_column = value.clone();
    }
    if let Some(sort) = args.sort {
        request.sort_order = sort;
    }
    if let Some(color) = &args.color {
        request.color_mode = ColorMode::Fixed(Color::parse(color)?);
    } else if let Some(palette) = &args.palette {
        request.color_mode = ColorMode::Automatic(PaletteName::from_name(palette));
    }
    if args.title.is_some() {
        request.title = args.title.clone();
    }
    if args.x_label.is_some() {
        request.x_label = args.x_label.clone();
    }
    if args.y_label.is_some() {
        request.y_label = args.y_label.clone();
    }

    Ok(request)
}

fn default_output_path(request: &ChartRequest, extension: &str) -> PathBuf {
    Path::new(&request.export_file_name()).with_extension(extension)
}

fn print_preview(dataset: &Dataset, rows: usize) {
    let classes = classify(dataset);
    for (name, kind) in &classes {
        println!("{:<24} {:?}", name, kind);
    }
    println!();

    let head = dataset.head(rows);
    println!("{}", head.column_names().join("\t"));
    for row in 0..head.row_count() {
        let cells: Vec<String> = head
            .columns()
            .iter()
            .map(|c| match &c.cells[row] {
                Cell::Missing => String::new(),
                cell => cell.label(),
            })
            .collect();
        println!("{}", cells.join("\t"));
    }
}
