// Parser for the CAISO Daily Renewables Watch text report.
// http://content.caiso.com/green/renewrpt/20200101_DailyRenewablesWatch.txt
//
// The report is tab delimited.  The first table has one row per hour ending,
// with the hour in column 1 and the generation (MW) of each renewable
// category in every other column after it.

use std::{fmt, str::FromStr};

use jiff::civil::Date;
use rust_decimal::Decimal;
use thiserror::Error;

/// Max number of hourly rows in one report.
pub const HOURS_PER_REPORT: usize = 24;

/// Column names of the hourly dataset, in output order.
pub const COLUMNS: [&str; 9] = [
    "date",
    "hour",
    "geothermal",
    "biomass",
    "biogas",
    "small_hydro",
    "wind_total",
    "solar_pv",
    "solar_thermal",
];

/// Zero-based position of the hour label in a report line.
const HOUR_COLUMN: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Geothermal,
    Biomass,
    Biogas,
    SmallHydro,
    WindTotal,
    SolarPv,
    SolarThermal,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Geothermal,
        Category::Biomass,
        Category::Biogas,
        Category::SmallHydro,
        Category::WindTotal,
        Category::SolarPv,
        Category::SolarThermal,
    ];

    /// Position of this category among the seven.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Zero-based column of this category in a report line, 3, 5, ..., 15.
    pub fn source_column(&self) -> usize {
        3 + 2 * self.index()
    }

    /// Header as it appears in the report.
    pub fn source_label(&self) -> &'static str {
        use Category::*;
        match self {
            Geothermal => "GEOTHERMAL",
            Biomass => "BIOMASS",
            Biogas => "BIOGAS",
            SmallHydro => "SMALL HYDRO",
            WindTotal => "WIND TOTAL",
            SolarPv => "SOLAR PV",
            SolarThermal => "SOLAR THERMAL",
        }
    }

    pub fn column_name(&self) -> String {
        normalize_column_name(self.source_label())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column_name())
    }
}

/// Lower case, spaces replaced by underscores.
pub fn normalize_column_name(label: &str) -> String {
    label.to_lowercase().replace(' ', "_")
}

/// Interpret a cell as a number.  Anything that doesn't parse is missing.
pub fn to_numeric(cell: &str) -> Option<Decimal> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    Decimal::from_str(cell)
        .or_else(|_| Decimal::from_scientific(cell))
        .ok()
}

#[derive(Error, Debug, PartialEq)]
pub enum ReportError {
    #[error("report for {date} is empty")]
    Empty { date: Date },
    #[error("report for {date}, line {line}: expected at least {expected} fields, found {found}")]
    Shape {
        date: Date,
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("report for {date}, line {line}: invalid hour {value:?}")]
    Hour {
        date: Date,
        line: usize,
        value: String,
    },
}

/// One hour of one report.  Cells are kept as they appear in the report,
/// trimmed, so the hourly dataset can be written back unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyRecord {
    pub date: Date,
    pub hour: u8,
    pub values: [String; 7],
}

impl HourlyRecord {
    pub fn raw(&self, category: Category) -> &str {
        &self.values[category.index()]
    }

    pub fn value(&self, category: Category) -> Option<Decimal> {
        to_numeric(self.raw(category))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HourlyReport {
    pub date: Date,
    pub rows: Vec<HourlyRecord>,
}

fn split_lines(text: &str) -> Vec<&str> {
    if text.contains('\n') {
        text.split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .collect()
    } else {
        text.split('\r').collect()
    }
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn is_data_line(line: &str) -> bool {
    line.split('\t')
        .nth(HOUR_COLUMN)
        .is_some_and(|e| e.trim().parse::<u8>().is_ok())
}

/// Parse the text of a report.
///
/// The first line is a header and is skipped.  If the next non-blank line is
/// a column label line (no numeric hour) it is skipped as well.  Blank lines
/// are ignored.  Data rows are read until 24 rows, the end of the text, or
/// the first line without a numeric hour (the title of the next table),
/// whichever comes first.
pub fn parse_report(date: Date, text: &str) -> Result<HourlyReport, ReportError> {
    let lines = split_lines(text);
    let mut it = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| !is_blank(line))
        .peekable();
    if it.next().is_none() {
        return Err(ReportError::Empty { date });
    }
    if it.peek().is_some_and(|(_, line)| !is_data_line(line)) {
        it.next();
    }

    let mut rows: Vec<HourlyRecord> = Vec::with_capacity(HOURS_PER_REPORT);
    for (i, line) in it.take_while(|(_, line)| is_data_line(line)) {
        if rows.len() == HOURS_PER_REPORT {
            break;
        }
        rows.push(parse_line(date, i + 1, line)?);
    }
    Ok(HourlyReport { date, rows })
}

fn parse_line(date: Date, line_number: usize, line: &str) -> Result<HourlyRecord, ReportError> {
    let fields: Vec<&str> = line.split('\t').collect();
    let expected = Category::SolarThermal.source_column() + 1;
    if fields.len() < expected {
        return Err(ReportError::Shape {
            date,
            line: line_number,
            expected,
            found: fields.len(),
        });
    }
    let label = fields[HOUR_COLUMN].trim();
    let hour = match label.parse::<u8>() {
        Ok(h) if (1..=HOURS_PER_REPORT as u8).contains(&h) => h,
        _ => {
            return Err(ReportError::Hour {
                date,
                line: line_number,
                value: label.to_string(),
            })
        }
    };
    let values = Category::ALL.map(|c| fields[c.source_column()].trim().to_string());
    Ok(HourlyRecord { date, hour, values })
}
