// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

// Use library instead of local modules
use growth_charts::{
    logging, AppConfig, CachingFetcher, ChildProfile, ComparisonService, FileFetcher, Gender, GrowthError,
    GrowthSession, Indicator, ReferenceCatalog, ScoreType, SourceFetcher,
};

#[derive(Parser, Debug)]
#[command(name = "growth-charts", version, about = "Compare a child's growth against WHO reference curves")]
struct Cli {
    /// JSON config file (defaults apply for missing fields)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Catalog JSON: [indicator][z|p][boys|girls][age_range] -> dataset
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Base directory for local dataset identifiers
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Serve reference files from the download cache when present
    #[arg(long, global = true)]
    use_cache: bool,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the WHO dataset a selection resolves to
    Link(Selection),
    /// Show the reference rows around the child's current age or height
    Preview(Selection),
    /// Print chart data (curves + child series) as JSON
    Chart(Selection),
    /// Write the measurement history to <name>_growth_data.csv
    Export {
        #[command(flatten)]
        child: ChildArgs,
        /// Output directory (overrides config export_dir)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// Interactive chart viewer
    #[cfg(feature = "tui")]
    Tui(Selection),
}

#[derive(Args, Debug)]
struct Selection {
    #[command(flatten)]
    child: ChildArgs,

    /// height-for-age, weight-for-age, weight-for-height, bmi-for-age, head-circumference-for-age
    #[arg(short, long, default_value = "weight-for-age")]
    indicator: Indicator,

    /// z or p
    #[arg(short, long, default_value = "z")]
    score: ScoreType,
}

#[derive(Args, Debug)]
struct ChildArgs {
    #[arg(long, default_value = "Child")]
    name: String,

    /// "female" selects the girls' tables, any other label the boys'
    #[arg(long, default_value = "male")]
    gender: String,

    /// YYYY-MM-DD
    #[arg(long, default_value = "2022-02-13")]
    birthdate: NaiveDate,

    /// Measurement history CSV; the two-row demo history is used when absent
    #[arg(long)]
    history: Option<PathBuf>,

    /// Reference date for the child's current age (defaults to today)
    #[arg(long)]
    today: Option<NaiveDate>,
}

impl ChildArgs {
    fn profile(&self) -> ChildProfile {
        ChildProfile::new(self.name.clone(), Gender::from_label(&self.gender), self.birthdate)
    }

    fn session(&self) -> Result<GrowthSession> {
        let profile = self.profile();
        match &self.history {
            Some(path) => GrowthSession::load_csv(profile, path),
            None => Ok(GrowthSession::demo(profile)),
        }
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let config = load_config(&cli)?;

    match &cli.command {
        Command::Link(sel) => run_link(&config, sel),
        Command::Preview(sel) => run_preview(&config, sel),
        Command::Chart(sel) => run_chart(&config, sel),
        Command::Export { child, out_dir } => run_export(&config, child, out_dir.clone()),
        #[cfg(feature = "tui")]
        Command::Tui(sel) => run_ui_mode(&config, sel),
    }
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::default(),
    };

    if let Some(catalog) = &cli.catalog {
        config.catalog_path = catalog.clone();
    }
    if let Some(data_dir) = &cli.data_dir {
        config.data_dir = Some(data_dir.clone());
    }
    if cli.use_cache {
        config.use_cache = true;
    }

    Ok(config)
}

fn build_service(config: &AppConfig) -> Result<ComparisonService<CachingFetcher<SourceFetcher>>> {
    let catalog = ReferenceCatalog::from_file(&config.catalog_path)?;

    let files = match &config.data_dir {
        Some(dir) => FileFetcher::with_base_dir(dir),
        None => FileFetcher::new(),
    };
    let source = SourceFetcher::new(files, config.http_timeout_secs)
        .context("Failed to set up reference retrieval")?;
    let fetcher = CachingFetcher::new(source, &config.cache_dir, config.use_cache);

    Ok(ComparisonService::new(catalog, fetcher).with_window_size(config.preview_window))
}

/// Domain errors are shown, not propagated: they abort only this request
fn report(err: &GrowthError) -> ! {
    eprintln!("❌ {}", err);
    std::process::exit(1);
}

fn run_link(config: &AppConfig, sel: &Selection) -> Result<()> {
    let service = build_service(config)?;
    let session = sel.child.session()?;

    match service.select(&session, sel.indicator, sel.score, sel.child.today()) {
        Ok(selection) => {
            println!("🔗 {} ({})", sel.indicator.name(), sel.score.key().to_uppercase());
            println!("   Range:   {}", selection.age_range);
            println!("   Gender:  {}", selection.gender.catalog_key());
            println!("   Dataset: {}", selection.identifier);
            Ok(())
        }
        Err(err) => report(&err),
    }
}

fn run_preview(config: &AppConfig, sel: &Selection) -> Result<()> {
    let service = build_service(config)?;
    let session = sel.child.session()?;

    let comparison = match service.compare(&session, sel.indicator, sel.score, sel.child.today()) {
        Ok(c) => c,
        Err(err) => report(&err),
    };

    println!("📂 Dataset: {}", comparison.selection.identifier);
    match comparison.preview_target {
        Some(target) => println!("🎯 Centered on {:.1} ({})", target, comparison.chart.x_label),
        None => println!("⚠️  No target value for this child, preview is empty"),
    }
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let curves = sel.score.curves();
    let header: Vec<String> = curves.iter().map(|c| format!("{:>8}", c.label())).collect();
    println!("{:>8}{}", "x", header.join(""));

    for row in &comparison.preview {
        let cells: Vec<String> = curves
            .iter()
            .map(|c| match row.value(*c) {
                Some(v) => format!("{:>8.2}", v),
                None => format!("{:>8}", "-"),
            })
            .collect();
        println!("{:>8.1}{}", row.x, cells.join(""));
    }

    Ok(())
}

fn run_chart(config: &AppConfig, sel: &Selection) -> Result<()> {
    let service = build_service(config)?;
    let session = sel.child.session()?;

    match service.compare(&session, sel.indicator, sel.score, sel.child.today()) {
        Ok(comparison) => {
            let json = serde_json::to_string_pretty(&comparison.chart).context("Failed to serialize chart data")?;
            println!("{}", json);
            Ok(())
        }
        Err(err) => report(&err),
    }
}

fn run_export(config: &AppConfig, child: &ChildArgs, out_dir: Option<PathBuf>) -> Result<()> {
    let session = child.session()?;
    let dir = out_dir.unwrap_or_else(|| config.export_dir.clone());

    println!("💾 Saving {} measurements...", session.len());
    let path = session.export_csv(&dir)?;
    println!("✓ Data saved to {}", path.display());

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: &AppConfig, sel: &Selection) -> Result<()> {
    let service = build_service(config)?;
    let session = sel.child.session()?;

    println!("🖥️  Loading growth chart viewer...\n");

    let mut app = ui::App::new(session, service, sel.child.today(), sel.indicator, sel.score);
    ui::run_ui(&mut app)?;

    println!("\n✅ Viewer closed");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn child_args(args: &[&str]) -> ChildArgs {
        let mut argv = vec!["growth-charts", "link"];
        argv.extend_from_slice(args);
        match Cli::try_parse_from(argv).unwrap().command {
            Command::Link(sel) => sel.child,
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_gender_label_selects_tables() {
        assert_eq!(child_args(&["--gender", "female"]).profile().gender, Gender::Female);
        assert_eq!(child_args(&[]).profile().gender, Gender::Male);
    }

    #[test]
    fn test_unrecognized_gender_label_falls_back_to_male() {
        assert_eq!(child_args(&["--gender", "Female"]).profile().gender, Gender::Male);
        assert_eq!(child_args(&["--gender", "unknown"]).profile().gender, Gender::Male);
    }
}
