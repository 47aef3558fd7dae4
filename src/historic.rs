use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use crate::error::{PrtgError, Result};

pub const DATE_TIME_COLUMN: &str = "Date Time";

const PRTG_DATE_FORMAT: &str = "%m/%d/%Y %I:%M:%S %p";

/// Values from `historicdata.csv`, one column per header. `Date Time` is
/// parsed into [`HistoricData::timestamps`], all other cells are kept as
/// PRTG formatted them.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct HistoricData {
    pub headers: Vec<String>,
    pub timestamps: Vec<NaiveDateTime>,
    columns: BTreeMap<String, Vec<String>>,
}

impl HistoricData {
    pub fn column(&self, header: &str) -> Option<&[String]> {
        self.columns.get(header).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.columns
            .values()
            .map(Vec::len)
            .max()
            .unwrap_or(self.timestamps.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// `10/18/2026 1:00:00 PM - 1:05:00 PM` → start of the interval.
fn parse_prtg_date(cell: &str) -> Result<NaiveDateTime> {
    let start = cell.split(" - ").next().unwrap_or_default().trim();
    NaiveDateTime::parse_from_str(start, PRTG_DATE_FORMAT)
        .map_err(|err| PrtgError::ParserError(format!("invalid date {:?}: {}", cell, err)))
}

pub(crate) fn parse_historic_csv(raw: &str) -> Result<HistoricData> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(raw.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|header| header.trim_start_matches('\u{feff}').to_string())
        .collect();
    let date_index = headers.iter().position(|header| header == DATE_TIME_COLUMN);

    let mut data = HistoricData {
        headers: headers.clone(),
        ..Default::default()
    };
    for (index, header) in headers.iter().enumerate() {
        if Some(index) != date_index {
            data.columns.entry(header.clone()).or_default();
        }
    }

    for record in reader.records() {
        let record = record?;
        // the last row holds averages over the whole range
        match record.get(0).map(str::trim) {
            None | Some("") | Some("Averages") => continue,
            _ => {}
        }
        for (index, header) in headers.iter().enumerate() {
            let cell = record.get(index).unwrap_or_default();
            if Some(index) == date_index {
                data.timestamps.push(parse_prtg_date(cell)?);
            } else if let Some(column) = data.columns.get_mut(header) {
                column.push(cell.to_string());
            }
        }
    }

    Ok(data)
}
