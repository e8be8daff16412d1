use std::{env, error::Error, path::Path, path::PathBuf, time::Duration};

use caiso_renewables::{
    config::{ConfigOverrides, RunConfig, BASE_URL_ENV},
    db::{
        caiso::{
            daily_totals::DailyTotal,
            renewables_report::Category,
            renewables_watch::{run, RunSummary},
        },
        lib_download::{DirSource, HttpSource},
    },
};
use clap::Parser;
use jiff::civil::Date;
use log::info;
use tabled::{builder::Builder, settings::Style};

/// Download the CAISO Daily Renewables Watch reports for a range of days and
/// save them as csv files.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Environment name, e.g., test, prod.  Loads .env/<ENV>.env if it exists
    #[arg(short, long)]
    env: Option<String>,

    /// Json file with the run configuration.  Flags below take precedence
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// First day, e.g. 2020-01-01
    #[arg(long)]
    start: Option<Date>,

    /// Last day (inclusive), e.g. 2020-12-31
    #[arg(long)]
    end: Option<Date>,

    /// Where the reports are published
    #[arg(long)]
    base_url: Option<String>,

    /// Directory for the output files
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Also write the daily totals
    #[arg(long)]
    extended: bool,

    /// Leave out days with a missing or malformed report instead of failing
    #[arg(long)]
    skip_missing: bool,

    /// Read reports saved in this directory instead of downloading them
    #[arg(long)]
    source_dir: Option<PathBuf>,

    /// Per request timeout in seconds, 0 to wait forever
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Print a summary when done.  The table of daily totals is only
    /// available with --extended
    #[arg(long)]
    summary: bool,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            start_date: self.start,
            end_date: self.end,
            base_url: self.base_url.clone(),
            out_dir: self.out_dir.clone(),
            extended: self.extended,
            skip_missing: self.skip_missing,
            timeout_secs: self.timeout_secs,
        }
    }
}

/// Make an ASCII table from the daily totals
fn ascii_table(data: &[DailyTotal]) -> tabled::Table {
    let mut builder = Builder::new();
    let mut header = vec!["date".to_string()];
    header.extend(Category::ALL.iter().map(|c| c.column_name()));
    builder.push_record(header);
    for row in data {
        let mut record = vec![row.date.to_string()];
        record.extend(row.totals.iter().map(|e| e.normalize().to_string()));
        builder.push_record(record);
    }
    let mut table = builder.build();
    table.with(Style::sharp());
    table
}

fn print_summary(summary: &RunSummary) {
    println!(
        "{} hourly rows for {}, {} days skipped",
        summary.hourly_rows,
        summary.range,
        summary.skipped.len()
    );
    if summary.daily.is_empty() {
        println!("No daily totals, run with --extended to get them");
    } else {
        println!("{}", ascii_table(&summary.daily));
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Some(name) = &args.env {
        let path = format!(".env/{}.env", name);
        if Path::new(&path).exists() {
            dotenvy::from_path(Path::new(&path))?;
            info!("Loaded environment from {}", path);
        }
    }

    let config = RunConfig::resolve(
        args.config.as_deref(),
        env::var(BASE_URL_ENV).ok(),
        &args.overrides(),
    )?;
    let summary = match &args.source_dir {
        Some(dir) => run(&DirSource::new(dir), &config)?,
        None => {
            let source = HttpSource::new(config.timeout_secs.map(Duration::from_secs))?;
            run(&source, &config)?
        }
    };

    if args.summary {
        print_summary(&summary);
    }
    Ok(())
}
