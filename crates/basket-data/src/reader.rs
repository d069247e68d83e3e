//! CSV loading for Bread Basket.
//!
//! Reads the bakery transaction export into a [`Dataset`]. Rows that cannot be
//! used are skipped and accounted for in the dataset's [`LoadReport`].

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use basket_core::error::DataLoadError;
use basket_core::models::{
    normalize_item, Dataset, DayType, Daypart, LoadReport, RowError, Transaction,
};
use basket_core::time_utils::{day_type_for, daypart_for, parse_datetime};
use csv::StringRecord;
use tracing::{debug, info, warn};

// ── Column names ──────────────────────────────────────────────────────────────

pub const COL_TRANSACTION: &str = "TransactionNo";
pub const COL_ITEMS: &str = "Items";
pub const COL_DATETIME: &str = "DateTime";
pub const COL_DAYPART: &str = "Daypart";
pub const COL_DAY_TYPE: &str = "DayType";

/// Columns without which no row can be interpreted.
pub const REQUIRED_COLUMNS: [&str; 3] = [COL_TRANSACTION, COL_ITEMS, COL_DATETIME];

// ── Public API ────────────────────────────────────────────────────────────────

/// Load the transaction CSV at `path`.
///
/// Fails when the file is missing, unreadable, not parseable as CSV, or lacks
/// one of [`REQUIRED_COLUMNS`]. Individual bad rows do not fail the load; they
/// are counted in [`LoadReport`].
pub fn load(path: &Path) -> Result<Dataset, DataLoadError> {
    if !path.exists() {
        return Err(DataLoadError::NotFound(path.to_path_buf()));
    }
    if !path.is_file() {
        return Err(DataLoadError::Read {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a regular file"),
        });
    }
    let file = std::fs::File::open(path).map_err(|source| DataLoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_reader(file, path)
}

/// Load transactions from any reader. `path` is only used for diagnostics.
pub fn load_from_reader<R: Read>(input: R, path: &Path) -> Result<Dataset, DataLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|source| DataLoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?
        .clone();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(DataLoadError::Empty(path.to_path_buf()));
    }

    let columns = Columns::resolve(&headers, path)?;
    if columns.daypart.is_none() || columns.day_type.is_none() {
        info!(
            "{} has no {} / {} column; deriving from timestamps",
            path.display(),
            COL_DAYPART,
            COL_DAY_TYPE
        );
    }

    let mut rows = Vec::new();
    let mut report = LoadReport::default();

    for (idx, result) in reader.records().enumerate() {
        // Header is line 1.
        let line = idx + 2;
        report.rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                report.discarded_invalid += 1;
                report.row_errors.push(RowError {
                    line,
                    message: e.to_string(),
                });
                continue;
            }
        };

        match parse_row(&record, &columns) {
            Ok((row, derived)) => {
                if derived {
                    report.derived_labels += 1;
                }
                rows.push(row);
            }
            Err(RowIssue::Timestamp(message)) => {
                report.discarded_timestamps += 1;
                debug!("line {line}: {message}");
                report.row_errors.push(RowError { line, message });
            }
            Err(RowIssue::Invalid(message)) => {
                report.discarded_invalid += 1;
                debug!("line {line}: {message}");
                report.row_errors.push(RowError { line, message });
            }
        }
    }

    report.rows_loaded = rows.len();

    if report.discarded_rows() > 0 {
        warn!(
            "Discarded {} of {} rows from {} ({} unparseable timestamps, {} invalid)",
            report.discarded_rows(),
            report.rows_read,
            path.display(),
            report.discarded_timestamps,
            report.discarded_invalid,
        );
    }
    info!(
        "Loaded {} rows from {}",
        report.rows_loaded,
        path.display()
    );

    Ok(Dataset::new(rows, report, Some(path.to_path_buf())))
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Header positions of the columns the loader understands.
struct Columns {
    transaction: usize,
    items: usize,
    datetime: usize,
    daypart: Option<usize>,
    day_type: Option<usize>,
}

impl Columns {
    fn resolve(headers: &StringRecord, path: &Path) -> Result<Self, DataLoadError> {
        let map: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            // Excel exports often start with a byte-order mark.
            .map(|(i, h)| (h.trim_start_matches('\u{feff}').trim().to_string(), i))
            .collect();

        let required = |name: &str| {
            map.get(name)
                .copied()
                .ok_or_else(|| DataLoadError::MissingColumn {
                    path: path.to_path_buf(),
                    column: name.to_string(),
                })
        };

        Ok(Self {
            transaction: required(COL_TRANSACTION)?,
            items: required(COL_ITEMS)?,
            datetime: required(COL_DATETIME)?,
            daypart: map.get(COL_DAYPART).copied(),
            day_type: map.get(COL_DAY_TYPE).copied(),
        })
    }
}

enum RowIssue {
    Timestamp(String),
    Invalid(String),
}

/// Turn one record into a [`Transaction`].
///
/// The boolean is `true` when a present daypart / day-type cell was unusable
/// and the value was derived from the timestamp.
fn parse_row(record: &StringRecord, columns: &Columns) -> Result<(Transaction, bool), RowIssue> {
    let raw_id = record.get(columns.transaction).unwrap_or("");
    let transaction_id = raw_id
        .trim()
        .parse::<u64>()
        .map_err(|_| RowIssue::Invalid(format!("invalid {COL_TRANSACTION} '{raw_id}'")))?;

    let item = normalize_item(record.get(columns.items).unwrap_or(""));
    if item.is_empty() {
        return Err(RowIssue::Invalid(format!("empty {COL_ITEMS}")));
    }

    let raw_ts = record.get(columns.datetime).unwrap_or("");
    let timestamp = parse_datetime(raw_ts)
        .ok_or_else(|| RowIssue::Timestamp(format!("unparseable {COL_DATETIME} '{raw_ts}'")))?;

    let mut derived = false;

    let daypart = match columns.daypart.and_then(|i| record.get(i)) {
        Some(cell) => cell.parse::<Daypart>().unwrap_or_else(|_| {
            derived = true;
            daypart_for(&timestamp)
        }),
        None => daypart_for(&timestamp),
    };

    let day_type = match columns.day_type.and_then(|i| record.get(i)) {
        Some(cell) => cell.parse::<DayType>().unwrap_or_else(|_| {
            derived = true;
            day_type_for(&timestamp)
        }),
        None => day_type_for(&timestamp),
    };

    Ok((
        Transaction {
            transaction_id,
            item,
            timestamp,
            daypart,
            day_type,
        },
        derived,
    ))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::TempDir;

    // ── Helpers ───────────────────────────────────────────────────────────────

    const HEADER: &str = "TransactionNo,Items,DateTime,Daypart,DayType";

    fn write_csv(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        path
    }

    fn load_lines(lines: &[&str]) -> Result<Dataset, DataLoadError> {
        let dir = TempDir::new().unwrap();
        let path = write_csv(dir.path(), "Bakery.csv", lines);
        load(&path)
    }

    // ── Happy path ────────────────────────────────────────────────────────────

    #[test]
    fn test_load_well_formed_file() {
        let ds = load_lines(&[
            HEADER,
            "1,Bread,2016-10-30 09:58:11,Morning,Weekend",
            "2,Scandinavian,2016-10-30 10:05:34,Morning,Weekend",
            "2,Scandinavian,2016-10-30 10:05:34,Morning,Weekend",
            "3,Hot chocolate,2016-10-30 10:07:57,Morning,Weekend",
        ])
        .unwrap();

        assert_eq!(ds.len(), 4);
        assert_eq!(ds.report().rows_read, 4);
        assert_eq!(ds.report().rows_loaded, 4);
        assert_eq!(ds.report().discarded_rows(), 0);
        assert_eq!(ds.rows()[0].transaction_id, 1);
        assert_eq!(ds.rows()[3].item, "Hot chocolate");
        assert_eq!(ds.rows()[0].daypart, Daypart::Morning);
        assert_eq!(ds.rows()[0].day_type, DayType::Weekend);
        assert!(ds.source().is_some());
    }

    #[test]
    fn test_load_trims_items_and_headers() {
        let ds = load_lines(&[
            " TransactionNo , Items ,DateTime,Daypart,DayType",
            "1,  Coffee  ,2016-10-30 09:58:11,Morning,Weekend",
        ])
        .unwrap();
        assert_eq!(ds.rows()[0].item, "Coffee");
    }

    #[test]
    fn test_load_trusts_present_labels() {
        // 23:00 on a Monday would derive Night / Weekday.
        let ds = load_lines(&[HEADER, "1,Bread,2016-10-31 23:00:00,Evening,Weekend"]).unwrap();
        assert_eq!(ds.rows()[0].daypart, Daypart::Evening);
        assert_eq!(ds.rows()[0].day_type, DayType::Weekend);
        assert_eq!(ds.report().derived_labels, 0);
    }

    #[test]
    fn test_load_derives_missing_label_columns() {
        let ds = load_lines(&[
            "TransactionNo,Items,DateTime",
            "1,Bread,2016-10-31 14:30:00",
            "2,Tea,2016-10-30 22:10:00",
        ])
        .unwrap();
        assert_eq!(ds.rows()[0].daypart, Daypart::Afternoon);
        assert_eq!(ds.rows()[0].day_type, DayType::Weekday);
        assert_eq!(ds.rows()[1].daypart, Daypart::Night);
        assert_eq!(ds.rows()[1].day_type, DayType::Weekend);
        assert_eq!(ds.report().derived_labels, 0);
    }

    #[test]
    fn test_load_derives_unusable_label_cells() {
        let ds = load_lines(&[HEADER, "1,Bread,2016-10-31 08:00:00,Brunch,"]).unwrap();
        assert_eq!(ds.rows()[0].daypart, Daypart::Morning);
        assert_eq!(ds.rows()[0].day_type, DayType::Weekday);
        assert_eq!(ds.report().derived_labels, 1);
    }

    // ── Discarded rows ────────────────────────────────────────────────────────

    #[test]
    fn test_load_reports_single_bad_timestamp() {
        let ds = load_lines(&[
            HEADER,
            "1,Bread,2016-10-30 09:58:11,Morning,Weekend",
            "2,Coffee,yesterday-ish,Morning,Weekend",
            "3,Tea,2016-10-30 10:07:57,Morning,Weekend",
        ])
        .unwrap();

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.report().discarded_timestamps, 1);
        assert_eq!(ds.report().discarded_rows(), 1);
        assert_eq!(ds.report().row_errors.len(), 1);
        assert_eq!(ds.report().row_errors[0].line, 3);
        assert!(ds.report().row_errors[0].message.contains("yesterday-ish"));
    }

    #[test]
    fn test_load_discards_invalid_ids_and_blank_items() {
        let ds = load_lines(&[
            HEADER,
            "abc,Bread,2016-10-30 09:58:11,Morning,Weekend",
            "2,   ,2016-10-30 09:58:11,Morning,Weekend",
            "3,Tea,2016-10-30 10:07:57,Morning,Weekend",
        ])
        .unwrap();

        assert_eq!(ds.len(), 1);
        assert_eq!(ds.report().discarded_invalid, 2);
        assert_eq!(ds.report().discarded_timestamps, 0);
    }

    #[test]
    fn test_load_short_row_is_discarded() {
        let ds = load_lines(&[HEADER, "1,Bread", "2,Tea,2016-10-30 10:07:57,Morning,Weekend"])
            .unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.report().discarded_timestamps, 1);
    }

    #[test]
    fn test_load_header_only_gives_empty_dataset() {
        let ds = load_lines(&[HEADER]).unwrap();
        assert!(ds.is_empty());
        assert_eq!(ds.report().rows_read, 0);
    }

    // ── Failures ──────────────────────────────────────────────────────────────

    #[test]
    fn test_load_missing_file() {
        let err = load(Path::new("/tmp/does-not-exist-basket-test/Bakery.csv")).unwrap_err();
        assert!(matches!(err, DataLoadError::NotFound(_)));
    }

    #[test]
    fn test_load_directory_is_read_error() {
        let dir = TempDir::new().unwrap();
        let err = load(dir.path()).unwrap_err();
        match err {
            DataLoadError::Read { path, .. } => assert_eq!(path, dir.path()),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_invalid_utf8_header_is_csv_error() {
        let data: &[u8] = b"TransactionNo,It\xffems,DateTime\n1,Bread,2016-10-30 09:58:11\n";
        let err = load_from_reader(data, Path::new("latin1.csv")).unwrap_err();
        match err {
            DataLoadError::Csv { path, .. } => assert_eq!(path, Path::new("latin1.csv")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_invalid_utf8_row_is_discarded() {
        let mut data = format!("{HEADER}\n").into_bytes();
        data.extend_from_slice(b"1,Caf\xe9,2016-10-30 09:58:11,Morning,Weekend\n");
        data.extend_from_slice(b"2,Bread,2016-10-30 10:05:34,Morning,Weekend\n");

        let ds = load_from_reader(data.as_slice(), Path::new("mixed.csv")).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.report().rows_read, 2);
        assert_eq!(ds.report().discarded_invalid, 1);

        let row_error = &ds.report().row_errors[0];
        assert_eq!(row_error.line, 2);
        assert_eq!(row_error.message.matches("CSV parse error").count(), 1);
    }

    #[test]
    fn test_load_missing_datetime_column() {
        let err = load_lines(&[
            "TransactionNo,Items,Daypart,DayType",
            "1,Bread,Morning,Weekend",
        ])
        .unwrap_err();
        match err {
            DataLoadError::MissingColumn { column, .. } => assert_eq!(column, "DateTime"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_missing_items_column() {
        let err = load_lines(&["TransactionNo,DateTime", "1,2016-10-30 09:58:11"]).unwrap_err();
        assert!(matches!(err, DataLoadError::MissingColumn { .. }));
    }

    #[test]
    fn test_load_empty_file() {
        let err = load_lines(&[]).unwrap_err();
        assert!(matches!(err, DataLoadError::Empty(_)));
    }

    #[test]
    fn test_load_from_reader_in_memory() {
        let data = format!("{HEADER}\n1,Bread,2016-10-30 09:58:11,Morning,Weekend\n");
        let ds = load_from_reader(data.as_bytes(), Path::new("memory.csv")).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.source(), Some(Path::new("memory.csv")));
    }
}
