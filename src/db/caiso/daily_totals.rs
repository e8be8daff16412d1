use std::collections::BTreeMap;

use jiff::civil::Date;
use rust_decimal::Decimal;
use thiserror::Error;

use super::renewables_report::{Category, HourlyRecord, HourlyReport};

#[derive(Error, Debug, PartialEq)]
#[error("sum of {category} for {date} overflowed at hour {hour}")]
pub struct OverflowError {
    pub date: Date,
    pub category: Category,
    pub hour: u8,
}

/// Daily sum of each generation category.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyTotal {
    pub date: Date,
    pub totals: [Decimal; 7],
}

impl DailyTotal {
    pub fn total(&self, category: Category) -> Decimal {
        self.totals[category.index()]
    }
}

/// Stack the hourly rows of all the reports, in the order given.
pub fn concat(reports: Vec<HourlyReport>) -> Vec<HourlyRecord> {
    reports.into_iter().flat_map(|e| e.rows).collect()
}

/// Sum the hourly values of each category by date.  Cells that are not
/// numeric don't contribute.  Output is sorted by date, one row for each
/// date that has at least one hourly row.  Fails if a sum doesn't fit in a
/// `Decimal`.
pub fn daily_totals(rows: &[HourlyRecord]) -> Result<Vec<DailyTotal>, OverflowError> {
    let mut groups: BTreeMap<Date, [Decimal; 7]> = BTreeMap::new();
    for row in rows {
        let totals = groups.entry(row.date).or_insert([Decimal::ZERO; 7]);
        for category in Category::ALL {
            if let Some(value) = row.value(category) {
                let total = &mut totals[category.index()];
                *total = total.checked_add(value).ok_or(OverflowError {
                    date: row.date,
                    category,
                    hour: row.hour,
                })?;
            }
        }
    }
    Ok(groups
        .into_iter()
        .map(|(date, totals)| DailyTotal { date, totals })
        .collect())
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use jiff::civil::date;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::db::caiso::renewables_report::{parse_report, tests::sample_report};

    fn record(date: Date, hour: u8, values: [&str; 7]) -> HourlyRecord {
        HourlyRecord {
            date,
            hour,
            values: values.map(|e| e.to_string()),
        }
    }

    #[test]
    fn concat_keeps_order() -> Result<(), Box<dyn Error>> {
        let r1 = parse_report(date(2020, 1, 1), &sample_report())?;
        let r2 = parse_report(date(2020, 1, 2), &sample_report())?;
        let rows = concat(vec![r1, r2]);
        assert_eq!(rows.len(), 48);
        assert_eq!((rows[0].date, rows[0].hour), (date(2020, 1, 1), 1));
        assert_eq!((rows[23].date, rows[23].hour), (date(2020, 1, 1), 24));
        assert_eq!((rows[24].date, rows[24].hour), (date(2020, 1, 2), 1));
        Ok(())
    }

    #[test]
    fn sum_sample_report() -> Result<(), Box<dyn Error>> {
        let rows = parse_report(date(2020, 1, 1), &sample_report())?.rows;
        let daily = daily_totals(&rows)?;
        assert_eq!(daily.len(), 1);
        // sum over h of 100 + h, h = 1..24
        assert_eq!(daily[0].total(Category::Geothermal), dec!(2700));
        assert_eq!(daily[0].total(Category::SolarThermal), dec!(17100));
        Ok(())
    }

    #[test]
    fn missing_values_are_skipped() -> Result<(), Box<dyn Error>> {
        let d = date(2020, 6, 1);
        let rows = vec![
            record(d, 1, ["10", "#N/A", "", "1.5", "x", "0", "2"]),
            record(d, 2, ["5", "7", "", "1.5", "3", "", "2"]),
        ];
        let daily = daily_totals(&rows)?;
        assert_eq!(
            daily,
            vec![DailyTotal {
                date: d,
                totals: [dec!(15), dec!(7), dec!(0), dec!(3.0), dec!(3), dec!(0), dec!(4)],
            }]
        );
        Ok(())
    }

    #[test]
    fn grouped_and_sorted_by_date() -> Result<(), Box<dyn Error>> {
        let rows = vec![
            record(date(2020, 1, 3), 1, ["1", "1", "1", "1", "1", "1", "1"]),
            record(date(2020, 1, 1), 1, ["2", "2", "2", "2", "2", "2", "2"]),
            record(date(2020, 1, 3), 2, ["1", "1", "1", "1", "1", "1", "1"]),
        ];
        let daily = daily_totals(&rows)?;
        let dates: Vec<Date> = daily.iter().map(|e| e.date).collect();
        assert_eq!(dates, vec![date(2020, 1, 1), date(2020, 1, 3)]);
        assert_eq!(daily[1].total(Category::Biogas), dec!(2));
        Ok(())
    }

    #[test]
    fn no_rows_no_totals() -> Result<(), Box<dyn Error>> {
        assert!(daily_totals(&[])?.is_empty());
        Ok(())
    }

    #[test]
    fn overflowing_sum_is_an_error() {
        let d = date(2020, 6, 1);
        let rows = vec![
            record(d, 1, ["7e28", "1", "1", "1", "1", "1", "1"]),
            record(d, 2, ["7e28", "1", "1", "1", "1", "1", "1"]),
        ];
        assert_eq!(
            daily_totals(&rows),
            Err(OverflowError {
                date: d,
                category: Category::Geothermal,
                hour: 2,
            })
        );
    }
}
