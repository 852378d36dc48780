// src/importers/csv.rs
use std::path::Path;
use std::fs::File;
use std::io::{BufReader, BufRead, BufWriter, Write};
use thiserror::Error;

use crate::models::{NewPassword, PasswordEntry};

#[derive(Debug, Error)]
pub enum CsvImportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV format error at line {0}: {1}")]
    FormatError(usize, String),
}

pub const EXPORT_HEADER: [&str; 5] = ["site", "username", "password", "notes", "created_at"];

#[derive(Debug, Clone)]
pub struct CsvImporter {
    pub delimiter: char,
    pub has_header: bool,
}

impl Default for CsvImporter {
    fn default() -> Self {
        Self {
            delimiter: ',',
            has_header: true,
        }
    }
}

impl CsvImporter {
    pub fn new(delimiter: char, has_header: bool) -> Self {
        Self { delimiter, has_header }
    }

    /// Read every record from `path`. Nothing is returned unless the whole
    /// file parses.
    pub fn read(&self, path: &Path) -> Result<Vec<NewPassword>, CsvImportError> {
        let file = File::open(path)?;
        self.read_from(BufReader::new(file))
    }

    pub fn read_from<R: BufRead>(&self, reader: R) -> Result<Vec<NewPassword>, CsvImportError> {
        let mut records = Vec::new();

        for (line_num, line_result) in reader.lines().enumerate() {
            // Skip header line if present
            if self.has_header && line_num == 0 {
                continue;
            }

            let line = line_result?;
            if line.trim().is_empty() {
                continue;
            }

            let parts = split_record(&line, self.delimiter)
                .map_err(|msg| CsvImportError::FormatError(line_num + 1, msg))?;

            if parts.len() < 3 {
                return Err(CsvImportError::FormatError(
                    line_num + 1,
                    "Each line must have at least site, username, and password columns".to_string(),
                ));
            }

            let notes = parts
                .get(3)
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty());

            records.push(NewPassword {
                site: parts[0].trim().to_string(),
                username: parts[1].trim().to_string(),
                password: parts[2].clone(),
                notes,
            });
        }

        Ok(records)
    }

    // Export passwords to CSV
    pub fn write(&self, path: &Path, entries: &[PasswordEntry]) -> Result<usize, CsvImportError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer, entries)?;
        writer.flush()?;
        Ok(entries.len())
    }

    pub fn write_to<W: Write>(&self, writer: &mut W, entries: &[PasswordEntry]) -> Result<(), CsvImportError> {
        let sep = self.delimiter.to_string();
        let sep = sep.as_str();

        if self.has_header {
            writeln!(writer, "{}", EXPORT_HEADER.join(sep))?;
        }

        for entry in entries {
            let created_at = entry.created_at.to_rfc3339();
            let fields = [
                entry.site.as_str(),
                entry.username.as_str(),
                entry.password.as_str(),
                entry.notes.as_deref().unwrap_or(""),
                created_at.as_str(),
            ];

            let line: Vec<String> = fields
                .iter()
                .map(|f| escape_field(f, self.delimiter))
                .collect();
            writeln!(writer, "{}", line.join(sep))?;
        }

        Ok(())
    }
}

/// Split one record, honouring double-quoted fields and `""` escapes.
pub fn split_record(line: &str, delimiter: char) -> Result<Vec<String>, String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
        } else if c == '"' && field.trim().is_empty() {
            field.clear();
            in_quotes = true;
        } else if c == delimiter {
            fields.push(std::mem::take(&mut field));
        } else {
            field.push(c);
        }
    }

    if in_quotes {
        return Err("Unterminated quoted field".to_string());
    }

    fields.push(field);
    Ok(fields)
}

/// Quote `value` when it would not read back verbatim: delimiters, quotes,
/// line breaks, and leading or trailing whitespace.
pub fn escape_field(value: &str, delimiter: char) -> String {
    let padded = value.trim() != value;
    if padded || value.contains(delimiter) || value.contains('"') || value.contains('\n') || value.contains('\r') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
