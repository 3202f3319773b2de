//! Workbook decoding.
//!
//! The first row of the worksheet is the header; every later row becomes
//! one [`Incident`]. Cells are read leniently: blank coordinates become the
//! `(0, 0)` sentinel that coordinate repair fills in, blank `Killed` counts
//! become zero, and rows whose date cannot be read are skipped and counted.

use std::io::Cursor;

use avy_dashboard_incident_models::{Coordinates, Incident};
use calamine::{Data, DataType as _, Reader as _, Xlsx, open_workbook_from_rs};
use chrono::{Days, NaiveDate};

use crate::SourceError;
use crate::source_def::{FieldMapping, SourceDefinition};

static EMPTY: Data = Data::Empty;

/// Date formats accepted in text cells, tried in order.
const TEXT_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y", "%d-%b-%Y"];

/// Incidents read from a worksheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedSheet {
    /// Rows that produced an incident, in sheet order.
    pub incidents: Vec<Incident>,
    /// Data rows dropped because their date was missing or unreadable.
    pub skipped: usize,
}

/// Decodes an `.xlsx` workbook held in memory.
///
/// # Errors
///
/// Returns [`SourceError::Workbook`] if the bytes are not a readable
/// workbook or the configured sheet does not exist,
/// [`SourceError::EmptyWorkbook`] if it has no sheets, and
/// [`SourceError::MissingColumn`] if a mapped header is absent.
pub fn parse_workbook(bytes: Vec<u8>, source: &SourceDefinition) -> Result<ParsedSheet, SourceError> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes))?;

    let range = match &source.sheet {
        Some(name) => workbook.worksheet_range(name)?,
        None => workbook
            .worksheet_range_at(0)
            .ok_or(SourceError::EmptyWorkbook)??,
    };

    log::debug!(
        "[{}] Worksheet is {} rows x {} columns",
        source.id,
        range.height(),
        range.width()
    );

    let parsed = parse_rows(range.rows(), &source.fields)?;

    log::info!(
        "[{}] Parsed {} incidents ({} rows skipped without a date)",
        source.id,
        parsed.incidents.len(),
        parsed.skipped
    );

    Ok(parsed)
}

/// Converts worksheet rows, header first, into incidents.
///
/// # Errors
///
/// Returns [`SourceError::MissingColumn`] if the header row is missing or
/// lacks one of the required columns.
pub fn parse_rows<'a, I>(rows: I, fields: &FieldMapping) -> Result<ParsedSheet, SourceError>
where
    I: IntoIterator<Item = &'a [Data]>,
{
    let mut rows = rows.into_iter();
    let header = rows.next().unwrap_or(&[]);
    let columns = Columns::resolve(header, fields)?;

    let mut parsed = ParsedSheet::default();
    for row in rows {
        match columns.incident(row) {
            Some(incident) => parsed.incidents.push(incident),
            None => parsed.skipped += 1,
        }
    }

    Ok(parsed)
}

/// Column positions of the mapped fields.
#[derive(Debug, Clone, Copy)]
struct Columns {
    date: usize,
    primary_activity: usize,
    state: usize,
    location: usize,
    lat: usize,
    lon: usize,
    killed: usize,
    month: Option<usize>,
}

impl Columns {
    fn resolve(header: &[Data], fields: &FieldMapping) -> Result<Self, SourceError> {
        let names: Vec<String> = header.iter().map(|c| cell_text(c).to_lowercase()).collect();

        let find = |name: &str| {
            let wanted = name.trim().to_lowercase();
            names.iter().position(|h| *h == wanted)
        };
        let require = |name: &str| {
            find(name).ok_or_else(|| SourceError::MissingColumn {
                column: name.to_string(),
            })
        };

        Ok(Self {
            date: require(&fields.date)?,
            primary_activity: require(&fields.primary_activity)?,
            state: require(&fields.state)?,
            location: require(&fields.location)?,
            lat: require(&fields.lat)?,
            lon: require(&fields.lon)?,
            killed: require(&fields.killed)?,
            month: fields.month.as_deref().and_then(find),
        })
    }

    fn incident(&self, row: &[Data]) -> Option<Incident> {
        let cell = |idx: usize| row.get(idx).unwrap_or(&EMPTY);

        let date = cell_date(cell(self.date))?;
        let coordinates = Coordinates::new(
            cell_f64(cell(self.lat)).unwrap_or(0.0),
            cell_f64(cell(self.lon)).unwrap_or(0.0),
        );

        let mut incident = Incident::new(
            date,
            cell_text(cell(self.primary_activity)),
            cell_text(cell(self.state)),
            cell_text(cell(self.location)),
            coordinates,
            cell_count(cell(self.killed)),
        );

        if let Some(month) = self.month.and_then(|idx| cell_month(cell(idx))) {
            incident.month = month;
        }

        Some(incident)
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Empty | Data::Error(_) => String::new(),
        other => other.to_string(),
    }
}

fn cell_f64(cell: &Data) -> Option<f64> {
    #[allow(clippy::cast_precision_loss)]
    let value = match cell {
        Data::Float(f) => *f,
        Data::Int(i) => *i as f64,
        Data::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    value.is_finite().then_some(value)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn cell_count(cell: &Data) -> u32 {
    cell_f64(cell)
        .filter(|v| *v >= 0.0)
        .map_or(0, |v| v.round().min(f64::from(u32::MAX)) as u32)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn cell_month(cell: &Data) -> Option<u8> {
    let value = cell_f64(cell)?.round();
    (1.0..=12.0).contains(&value).then_some(value as u8)
}

fn cell_date(cell: &Data) -> Option<NaiveDate> {
    match cell {
        Data::String(s) | Data::DateTimeIso(s) => parse_date_text(s),
        Data::Float(serial) => excel_serial_date(*serial),
        #[allow(clippy::cast_precision_loss)]
        Data::Int(serial) => excel_serial_date(*serial as f64),
        Data::Empty | Data::Error(_) | Data::Bool(_) => None,
        other => other.as_date(),
    }
}

fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if let Some(prefix) = text.get(..10)
        && let Ok(date) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d")
    {
        return Some(date);
    }
    TEXT_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}

/// Converts an Excel 1900-system serial number to a date.
///
/// Day zero is 1899-12-30, which absorbs the 1900 leap-year quirk for
/// every date after February 1900.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn excel_serial_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_days(Days::new(serial.trunc() as u64))
}
