use crate::error::Result;
use csv::{ByteRecord, ReaderBuilder, WriterBuilder};
use std::{fs::File, path::Path};

/// An in-memory CSV table: a header row plus each data row as a Vec of
/// Strings (one per field). Everything stays string-typed; callers that care
/// about a column's type parse at the point of use.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Table {
            headers,
            rows: Vec::new(),
        }
    }

    /// Read `path` as a headered CSV. Fields are decoded lossily so legacy
    /// Latin-1-ish exports load instead of aborting the run.
    pub fn read_csv(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let mut rdr = ReaderBuilder::new().has_headers(false).from_reader(file);

        let mut headers = Vec::new();
        let mut rows = Vec::new();
        let mut record = ByteRecord::new();
        let mut first = true;
        while rdr.read_byte_record(&mut record)? {
            let fields: Vec<String> = record
                .iter()
                .map(|f| String::from_utf8_lossy(f).into_owned())
                .collect();
            if first {
                headers = fields;
                first = false;
            } else {
                rows.push(fields);
            }
        }

        Ok(Table { headers, rows })
    }

    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut wtr = WriterBuilder::new().from_path(path.as_ref())?;
        wtr.write_record(&self.headers)?;
        for row in &self.rows {
            wtr.write_record(row)?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Append `values` as a new rightmost column. `values` must line up with
    /// the existing rows one-to-one.
    pub fn push_column(&mut self, name: &str, values: Vec<String>) {
        assert_eq!(values.len(), self.rows.len(), "column length mismatch");
        self.headers.push(name.to_string());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
    }

    /// Remove `name` and its field from every row. Returns false if the
    /// column does not exist.
    pub fn drop_column(&mut self, name: &str) -> bool {
        match self.column_index(name) {
            Some(idx) => {
                self.headers.remove(idx);
                for row in &mut self.rows {
                    row.remove(idx);
                }
                true
            }
            None => false,
        }
    }

    /// Move all of `other`'s rows onto the end of this table. Headers must
    /// already agree; the merge phase verifies that before calling.
    pub fn append(&mut self, other: Table) {
        assert_eq!(self.headers, other.headers, "header mismatch on append");
        self.rows.extend(other.rows);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
