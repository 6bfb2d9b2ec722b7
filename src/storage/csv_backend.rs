use std::{
    fs::{self, File, OpenOptions},
    io::{Read, Seek, SeekFrom, Write},
    path::{Path, PathBuf},
};

use csv::{ReaderBuilder, Terminator, WriterBuilder};
use tracing::debug;

use super::StorageBackend;
use crate::{
    errors::{Result, TrackerError},
    ledger::Transaction,
};

pub const LEDGER_EXTENSION: &str = "csv";
const FIELD_COUNT: usize = 4;
const TMP_SUFFIX: &str = "tmp";

/// Headerless comma-separated ledger files: `name,price,category,cashflow`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvStorage;

impl CsvStorage {
    pub fn new() -> Self {
        Self
    }
}

impl StorageBackend for CsvStorage {
    fn extension(&self) -> &str {
        LEDGER_EXTENSION
    }

    fn load(&self, path: &Path) -> Result<Vec<Transaction>> {
        load_ledger_from_path(path)
    }

    fn save(&self, transactions: &[Transaction], path: &Path) -> Result<()> {
        save_ledger_to_path(transactions, path)
    }
}

/// Decodes rows into transactions, skipping rows whose fields are all blank.
///
/// The first failing row aborts the whole decode; nothing is returned partially.
pub fn decode<I, R, S>(rows: I) -> Result<Vec<Transaction>>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    decode_numbered(
        rows.into_iter()
            .enumerate()
            .map(|(index, row)| (index + 1, row)),
    )
}

fn decode_numbered<I, R, S>(rows: I) -> Result<Vec<Transaction>>
where
    I: IntoIterator<Item = (usize, R)>,
    R: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut transactions = Vec::new();
    for (row_number, row) in rows {
        let fields: Vec<S> = row.into_iter().collect();
        let fields: Vec<&str> = fields.iter().map(|field| field.as_ref()).collect();
        if let Some(txn) = decode_row(row_number, &fields)? {
            transactions.push(txn);
        }
    }
    Ok(transactions)
}

/// Decodes a single row. `Ok(None)` means the row was blank and is skipped.
pub fn decode_row(row_number: usize, fields: &[&str]) -> Result<Option<Transaction>> {
    if fields.iter().all(|field| field.trim().is_empty()) {
        return Ok(None);
    }
    let [name, price, category, cashflow] = fields else {
        return Err(TrackerError::MalformedRecord {
            row: row_number,
            reason: format!("expected {} fields, found {}", FIELD_COUNT, fields.len()),
        });
    };
    Transaction::create(name, price, category, cashflow)
        .map(Some)
        .map_err(|err| TrackerError::MalformedRecord {
            row: row_number,
            reason: err.to_string(),
        })
}

/// Encodes transactions as four-field rows in canonical text form.
pub fn encode(transactions: &[Transaction]) -> Vec<[String; FIELD_COUNT]> {
    transactions.iter().map(Transaction::to_row).collect()
}

/// Renders transactions as file content. An empty ledger renders as no bytes.
pub fn encode_to_bytes(transactions: &[Transaction]) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    for row in encode(transactions) {
        writer.write_record(&row)?;
    }
    writer
        .into_inner()
        .map_err(|err| TrackerError::Io(err.into_error()))
}

/// Parses file content into transactions.
pub fn decode_from_reader<R: Read>(reader: R) -> Result<Vec<Transaction>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record
            .position()
            .map(|position| position.line() as usize)
            .unwrap_or(rows.len() + 1);
        rows.push((line, record));
    }
    decode_numbered(rows.iter().map(|(line, record)| (*line, record)))
}

pub fn load_ledger_from_path(path: &Path) -> Result<Vec<Transaction>> {
    let file = File::open(path)?;
    let transactions = decode_from_reader(file)?;
    debug!(path = %path.display(), count = transactions.len(), "ledger file decoded");
    Ok(transactions)
}

/// Overwrites `path` with the encoded transactions via a temporary file.
pub fn save_ledger_to_path(transactions: &[Transaction], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    ensure_trailing_newline(path)?;
    let data = encode_to_bytes(transactions)?;
    let tmp = tmp_path(path);
    write_atomic(&tmp, &data)?;
    if let Err(err) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(err.into());
    }
    debug!(path = %path.display(), count = transactions.len(), "ledger file written");
    Ok(())
}

/// Makes sure a non-empty file at `path` ends with `\n`, appending one if not.
///
/// Returns whether a newline was added. Missing and empty files, and paths that
/// are not regular files, are left alone.
pub fn ensure_trailing_newline(path: &Path) -> Result<bool> {
    if !path.is_file() {
        return Ok(false);
    }
    let mut file = OpenOptions::new().read(true).append(true).open(path)?;
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    if last[0] == b'\n' {
        return Ok(false);
    }
    file.write_all(b"\n")?;
    file.flush()?;
    Ok(true)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data)?;
    file.flush()?;
    Ok(())
}
