//! CSV via the `csv` crate.
//!
//! Encoding takes an array of objects: the first object's keys become the
//! header row and every object is written as one record in that column
//! order. Missing and null cells are empty; nested arrays and objects are
//! written as compact JSON. Decoding reads the header row and returns one
//! object of strings per record.

use crate::format::Format;
use crate::{Error, Map, Result, Value};
use csv::{ReaderBuilder, Terminator, WriterBuilder};

/// CSV adapter.
#[derive(Clone, Debug)]
pub struct CsvFormat {
    delimiter: u8,
}

impl CsvFormat {
    pub const NAME: &'static str = "csv";

    #[must_use]
    pub fn new() -> Self {
        CsvFormat { delimiter: b',' }
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

impl Default for CsvFormat {
    fn default() -> Self {
        Self::new()
    }
}

impl Format for CsvFormat {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn encode(&self, value: &Value) -> Result<String> {
        let rows = match value {
            Value::Array(rows) => rows,
            other => {
                return Err(Error::encoding(
                    Self::NAME,
                    format!(
                        "CSV encoding requires the value be an array, found {}",
                        other.kind()
                    ),
                ))
            }
        };
        let headers: Vec<&str> = match rows.first() {
            None => return Ok(String::new()),
            Some(Value::Object(first)) => first.keys().map(String::as_str).collect(),
            Some(other) => return Err(row_error(0, other)),
        };
        tracing::trace!(columns = headers.len(), rows = rows.len(), "writing csv");

        let mut writer = WriterBuilder::new()
            .delimiter(self.delimiter)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(Vec::new());
        writer
            .write_record(&headers)
            .map_err(|e| Error::encoding(Self::NAME, e))?;
        for (index, row) in rows.iter().enumerate() {
            let object = row.as_object().ok_or_else(|| row_error(index, row))?;
            let record = headers
                .iter()
                .map(|header| cell_text(object.get(header)))
                .collect::<Result<Vec<String>>>()?;
            writer
                .write_record(&record)
                .map_err(|e| Error::encoding(Self::NAME, e))?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| Error::encoding(Self::NAME, e))?;
        String::from_utf8(bytes).map_err(|e| Error::encoding(Self::NAME, e))
    }

    fn decode(&self, text: &str) -> Result<Value> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .from_reader(text.as_bytes());
        let headers = reader
            .headers()
            .map_err(|e| Error::decoding(Self::NAME, e))?
            .clone();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| Error::decoding(Self::NAME, e))?;
            let row: Map = headers
                .iter()
                .zip(record.iter())
                .map(|(header, field)| (header.to_string(), Value::String(field.to_string())))
                .collect();
            rows.push(Value::Object(row));
        }
        Ok(Value::Array(rows))
    }
}

fn row_error(index: usize, row: &Value) -> Error {
    Error::encoding(
        CsvFormat::NAME,
        format!("CSV rows must be objects, row {} is {}", index, row.kind()),
    )
}

fn cell_text(cell: Option<&Value>) -> Result<String> {
    match cell {
        None | Some(Value::Null) => Ok(String::new()),
        Some(nested @ (Value::Array(_) | Value::Object(_))) => {
            serde_json::to_string(nested).map_err(|e| Error::encoding(CsvFormat::NAME, e))
        }
        Some(scalar) => Ok(scalar.scalar_text().unwrap_or_default()),
    }
}
