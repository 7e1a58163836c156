use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use precip_compare::loader::{DEFAULT_DATA_FILE, DataSource, load_dataset};
use precip_compare::viz::ChartSide;
use precip_compare::viz::export::{self, HEADER_HEIGHT, Panel};
use precip_compare::{Canvas, Config, Controller};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "precip",
    version,
    about = "Compare monthly precipitation projections of two climate scenarios"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render both charts for one year to an SVG or PNG file.
    Render(RenderArgs),
    /// Print the years available in the data.
    Years(DataArgs),
}

#[derive(Args, Debug)]
struct DataArgs {
    /// Data file path or http(s) URL.
    #[arg(short, long, default_value = DEFAULT_DATA_FILE)]
    data: String,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    data: DataArgs,
    /// Year to render (default: first year in the data).
    #[arg(short, long)]
    year: Option<i32>,
    /// Output file (.svg or .png).
    #[arg(short, long)]
    out: PathBuf,
    /// Total image width; each chart gets half (default 1000).
    #[arg(long, default_value_t = 1000)]
    width: u32,
    /// Total image height including headers (default 420).
    #[arg(long, default_value_t = 420)]
    height: u32,
    /// JSON config file (scenarios, colors, margins).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Override the left scenario model id.
    #[arg(long)]
    model_a: Option<String>,
    /// Override the right scenario model id.
    #[arg(long)]
    model_b: Option<String>,
    /// TTF font used for PNG text (SVG output does not need one).
    #[arg(long)]
    font: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Years(args) => cmd_years(args),
    }
}

fn cmd_years(args: DataArgs) -> Result<()> {
    let source = DataSource::parse(&args.data);
    let data = load_dataset(&source).with_context(|| format!("loading {source}"))?;
    for y in data.years() {
        println!("{y}");
    }
    Ok(())
}

fn cmd_render(args: RenderArgs) -> Result<()> {
    let mut config = Config::load(args.config.as_deref()).context("reading config")?;
    if let Some(m) = args.model_a {
        config.scenario_mut(ChartSide::Left).model = m;
    }
    if let Some(m) = args.model_b {
        config.scenario_mut(ChartSide::Right).model = m;
    }
    if let Some(font) = args.font.as_ref() {
        export::register_font_file(font)?;
    }

    let source = DataSource::parse(&args.data.data);
    let data = load_dataset(&source).with_context(|| format!("loading {source}"))?;

    let chart_w = (args.width / 2) as f64;
    let chart_h = args.height.saturating_sub(HEADER_HEIGHT) as f64;
    let mut ctl = Controller::new(
        data,
        &config,
        Canvas::new(chart_w, chart_h),
        Canvas::new(chart_w, chart_h),
    )?;
    ctl.start();

    if let Some(year) = args.year {
        let idx = ctl
            .selection()
            .years()
            .iter()
            .position(|y| *y == year)
            .ok_or_else(|| anyhow::anyhow!("year {year} not in data"))?;
        ctl.on_slider_input(idx as i64);
    }

    let headers = ChartSide::BOTH.map(|side| ctl.header(side));
    let panels = [
        Panel {
            header: &headers[0],
            canvas: ctl.surface(ChartSide::Left),
        },
        Panel {
            header: &headers[1],
            canvas: ctl.surface(ChartSide::Right),
        },
    ];
    export::save_panels(&panels, &args.out, args.width, args.height)?;
    eprintln!("Wrote {} for {}", args.out.display(), ctl.year_label());
    Ok(())
}
