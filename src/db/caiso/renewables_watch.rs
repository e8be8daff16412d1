// Hourly breakdown of CAISO renewable generation, published once a day.
// http://content.caiso.com/green/renewrpt/20200101_DailyRenewablesWatch.txt

use std::path::PathBuf;

use itertools::Itertools;
use jiff::civil::Date;
use log::{info, warn};
use thiserror::Error;

use crate::config::{ConfigError, FailurePolicy, OutputVariant, RunConfig};
use crate::db::lib_download::{FetchError, ReportSource};
use crate::interval::date_range::DateRange;
use crate::utils::lib_csv::{write_daily, write_hourly};

use super::daily_totals::{concat, daily_totals, DailyTotal, OverflowError};
use super::renewables_report::{parse_report, HourlyRecord, HourlyReport, ReportError};

#[derive(Error, Debug)]
pub enum RenewablesError {
    #[error("failed to fetch report for {date}: {source}")]
    Fetch { date: Date, source: FetchError },
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error(transparent)]
    Overflow(#[from] OverflowError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed writing output: {0}")]
    Csv(#[from] csv::Error),
    #[error("no data collected for {0}")]
    NoData(DateRange),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    /// Hourly rows, single file output
    DailyRenewablesWatch,
    /// Hourly rows, together with the daily totals
    Hourly,
    Daily,
}

impl Dataset {
    pub fn prefix(&self) -> &'static str {
        match self {
            Dataset::DailyRenewablesWatch => "caiso_daily_renewables_watch",
            Dataset::Hourly => "caiso_renewables_hourly",
            Dataset::Daily => "caiso_renewables_daily",
        }
    }
}

/// Reports that were collected for a date range.
#[derive(Debug, Default)]
pub struct Collected {
    pub reports: Vec<HourlyReport>,
    /// Days left out because their report could not be fetched or parsed.
    pub skipped: Vec<Date>,
}

#[derive(Debug)]
pub struct RunSummary {
    pub range: DateRange,
    pub skipped: Vec<Date>,
    pub hourly_rows: usize,
    pub daily: Vec<DailyTotal>,
    pub files: Vec<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct CaisoRenewablesWatchArchive {
    pub base_url: String,
    pub out_dir: PathBuf,
}

impl CaisoRenewablesWatchArchive {
    pub fn from_config(config: &RunConfig) -> Self {
        CaisoRenewablesWatchArchive {
            base_url: config.base_url.clone(),
            out_dir: config.out_dir.clone(),
        }
    }

    /// Location of the report for a given day, for example
    /// http://content.caiso.com/green/renewrpt/20200101_DailyRenewablesWatch.txt
    pub fn url(&self, date: &Date) -> String {
        format!(
            "{}/{}_DailyRenewablesWatch.txt",
            self.base_url.trim_end_matches('/'),
            date.strftime("%Y%m%d")
        )
    }

    /// Path of the output csv file for a dataset.  Does not check if the file exists.
    pub fn filename(&self, dataset: Dataset, range: &DateRange) -> PathBuf {
        self.out_dir.join(format!(
            "{}_{}_{}.csv",
            dataset.prefix(),
            range.start,
            range.end
        ))
    }

    /// Get and parse the report for one day.
    pub fn download_report<S: ReportSource>(
        &self,
        source: &S,
        date: Date,
    ) -> Result<HourlyReport, RenewablesError> {
        let text = source
            .fetch(&self.url(&date))
            .map_err(|source| RenewablesError::Fetch { date, source })?;
        Ok(parse_report(date, &text)?)
    }

    /// Get the reports for all the days in the range, one day at a time.
    pub fn collect<S: ReportSource>(
        &self,
        source: &S,
        range: &DateRange,
        policy: FailurePolicy,
    ) -> Result<Collected, RenewablesError> {
        let mut out = Collected::default();
        for date in range.days() {
            match self.download_report(source, date) {
                Ok(report) => out.reports.push(report),
                Err(e) => match policy {
                    FailurePolicy::FailFast => return Err(e),
                    FailurePolicy::SkipMissing => {
                        warn!("Skipping {}: {}", date, e);
                        out.skipped.push(date);
                    }
                },
            }
        }
        Ok(out)
    }

    /// Collect all the days in the range, then write the output files.
    /// Nothing is written if collecting fails.
    pub fn update<S: ReportSource>(
        &self,
        source: &S,
        range: &DateRange,
        variant: OutputVariant,
        policy: FailurePolicy,
    ) -> Result<RunSummary, RenewablesError> {
        info!("Gathering data for {} days, {} ...", range.len(), range);
        let collected = self.collect(source, range, policy)?;
        let rows: Vec<HourlyRecord> = concat(collected.reports);
        if rows.is_empty() {
            return Err(RenewablesError::NoData(*range));
        }
        if !collected.skipped.is_empty() {
            warn!(
                "Missing {} days: {}",
                collected.skipped.len(),
                collected.skipped.iter().join(", ")
            );
        }
        let daily = match variant {
            OutputVariant::Simple => Vec::new(),
            OutputVariant::Extended => daily_totals(&rows)?,
        };
        info!("Data collection complete. Now saving data...");

        let mut files: Vec<PathBuf> = Vec::new();
        match variant {
            OutputVariant::Simple => {
                let path = self.filename(Dataset::DailyRenewablesWatch, range);
                write_hourly(&path, &rows)?;
                files.push(path);
            }
            OutputVariant::Extended => {
                let path = self.filename(Dataset::Hourly, range);
                write_hourly(&path, &rows)?;
                files.push(path);
                let path = self.filename(Dataset::Daily, range);
                write_daily(&path, &daily)?;
                files.push(path);
            }
        }
        for file in &files {
            info!("Data has been saved to {}", file.display());
        }

        Ok(RunSummary {
            range: *range,
            skipped: collected.skipped,
            hourly_rows: rows.len(),
            daily,
            files,
        })
    }
}

/// Run the whole pipeline for a configuration.
pub fn run<S: ReportSource>(source: &S, config: &RunConfig) -> Result<RunSummary, RenewablesError> {
    let range = config.validate()?;
    let archive = CaisoRenewablesWatchArchive::from_config(config);
    archive.update(source, &range, config.variant, config.policy)
}
