//! CSV / JSON / text rendering of selected artworks, plus the Downloads
//! folder helpers used by the TUI export key.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::str::FromStr;

use directories::UserDirs;

use crate::artwork::{Artwork, COLUMN_HEADERS};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Json,
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Text => "txt",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            "txt" | "text" => Ok(OutputFormat::Text),
            other => Err(format!("unknown format {other:?} (csv, json, txt)")),
        }
    }
}

/// RFC-4180 CSV escaping
pub fn escape_csv(field: &str) -> String {
    let needs_quotes = field.contains(',') || field.contains('"')
        || field.contains('\n') || field.contains('\r');
    if needs_quotes {
        let escaped = field.replace('"', "\"\"");
        format!("\"{escaped}\"")
    } else {
        field.to_owned()
    }
}

fn header_row() -> Vec<&'static str> {
    std::iter::once("ID").chain(COLUMN_HEADERS).collect()
}

fn cells(art: &Artwork) -> Vec<String> {
    std::iter::once(art.id.to_string()).chain(art.columns()).collect()
}

pub fn render_records(records: &[&Artwork], format: OutputFormat) -> serde_json::Result<String> {
    Ok(match format {
        OutputFormat::Csv => {
            let mut lines = Vec::with_capacity(records.len() + 1);
            lines.push(header_row().join(","));
            for art in records {
                lines.push(cells(art).iter().map(|c| escape_csv(c.as_str())).collect::<Vec<_>>().join(","));
            }
            lines.join("\r\n")
        }
        OutputFormat::Json => serde_json::to_string_pretty(records)?,
        OutputFormat::Text => {
            // Tabs/newlines inside a cell would break the grid.
            let flat = |s: &str| s.replace(['\t', '\n', '\r'], " ");
            let mut lines = vec![header_row().join("\t")];
            for art in records {
                lines.push(cells(art).iter().map(|c| flat(c.as_str())).collect::<Vec<_>>().join("\t"));
            }
            lines.join("\n")
        }
    })
}

/// Selected ids as one `Row ID: n` line each, for the clipboard.
pub fn id_lines(ids: &[u64]) -> String {
    ids.iter().map(|id| format!("Row ID: {id}")).collect::<Vec<_>>().join("\n")
}

/// Returns the user's Downloads directory, or their Home directory if not available.
/// Falls back to current directory if all else fails.
pub fn get_downloads_folder() -> PathBuf {
    if let Some(user_dirs) = UserDirs::new() {
        if let Some(dl) = user_dirs.download_dir() {
            return dl.to_path_buf();
        }
        return user_dirs.home_dir().to_path_buf();
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home);
    }
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

pub fn save_to_downloads(export_filename: &str, data: &str) -> io::Result<PathBuf> {
    let mut target = get_downloads_folder();
    target.push(export_filename);
    fs::write(&target, data)?;
    Ok(target)
}
