use std::{fs, path::Path};

use crate::db::caiso::{
    daily_totals::DailyTotal,
    renewables_report::{Category, HourlyRecord, COLUMNS},
};

fn create_parent_dir(path: &Path) -> Result<(), csv::Error> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
    }
    Ok(())
}

/// Write the hourly rows to a csv file, with a header.  An existing file is
/// overwritten.  Cells are written as they were read from the report.
pub fn write_hourly(path: &Path, rows: &[HourlyRecord]) -> Result<(), csv::Error> {
    create_parent_dir(path)?;
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(COLUMNS)?;
    for row in rows {
        let mut record = vec![row.date.to_string(), row.hour.to_string()];
        record.extend(row.values.iter().cloned());
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the daily totals to a csv file, with a header.  No hour column.
pub fn write_daily(path: &Path, rows: &[DailyTotal]) -> Result<(), csv::Error> {
    create_parent_dir(path)?;
    let mut wtr = csv::Writer::from_path(path)?;
    let mut header = vec!["date".to_string()];
    header.extend(Category::ALL.iter().map(|c| c.column_name()));
    wtr.write_record(&header)?;
    for row in rows {
        let mut record = vec![row.date.to_string()];
        record.extend(row.totals.iter().map(|e| e.normalize().to_string()));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use csv::StringRecord;
    use jiff::civil::date;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn hourly_round_trip() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("data").join("hourly.csv");
        let rows = vec![
            HourlyRecord {
                date: date(2020, 1, 1),
                hour: 1,
                values: ["883", "319", "201", "213", "4158", "0", ""].map(String::from),
            },
            HourlyRecord {
                date: date(2020, 1, 1),
                hour: 2,
                values: ["884", "320", "#N/A", "212", "4100.5", "0", "0"].map(String::from),
            },
        ];
        write_hourly(&path, &rows)?;

        let mut rdr = csv::Reader::from_path(&path)?;
        assert_eq!(rdr.headers()?, &StringRecord::from(COLUMNS.to_vec()));
        let records: Vec<StringRecord> = rdr.records().collect::<Result<_, _>>()?;
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[1],
            StringRecord::from(vec![
                "2020-01-01", "2", "884", "320", "#N/A", "212", "4100.5", "0", "0"
            ])
        );
        assert_eq!(records[0].get(8), Some(""));
        Ok(())
    }

    #[test]
    fn daily_overwrites_existing_file() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("daily.csv");
        fs::write(&path, "stale content\nthat is longer than the new one\n\n\n\n")?;
        let rows = vec![DailyTotal {
            date: date(2020, 1, 2),
            totals: [dec!(1), dec!(2.50), dec!(0), dec!(4), dec!(5), dec!(6), dec!(7)],
        }];
        write_daily(&path, &rows)?;
        let content = fs::read_to_string(&path)?;
        assert_eq!(
            content,
            "date,geothermal,biomass,biogas,small_hydro,wind_total,solar_pv,solar_thermal\n\
             2020-01-02,1,2.5,0,4,5,6,7\n"
        );
        Ok(())
    }
}
