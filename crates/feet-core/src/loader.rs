use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::str::FromStr;

/// Layout of a term file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TermFormat {
    /// One term per line, blank lines ignored
    #[default]
    Lines,
    /// Header row, then the term in the first column
    Csv,
}

impl TermFormat {
    /// `.csv` files are tabular, anything else is read line by line
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Self::Csv,
            _ => Self::Lines,
        }
    }
}

impl FromStr for TermFormat {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lines" | "text" | "txt" => Ok(Self::Lines),
            "csv" => Ok(Self::Csv),
            other => Err(LoadError::InvalidFormat(format!(
                "unknown term format '{other}'"
            ))),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Reads every term before anything is written, so a malformed source is
/// rejected as a whole
pub fn read_terms<R: Read>(reader: R, format: TermFormat) -> Result<Vec<String>, LoadError> {
    match format {
        TermFormat::Lines => read_lines(reader),
        TermFormat::Csv => read_csv(reader),
    }
}

pub fn read_terms_file(path: &Path, format: TermFormat) -> Result<Vec<String>, LoadError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => LoadError::FileNotFound(path.display().to_string()),
        _ => LoadError::Io(e),
    })?;
    read_terms(file, format)
}

fn read_lines<R: Read>(reader: R) -> Result<Vec<String>, LoadError> {
    let mut terms = Vec::new();

    for (index, line) in BufReader::new(reader).lines().enumerate() {
        let line = line.map_err(|e| match e.kind() {
            std::io::ErrorKind::InvalidData => {
                LoadError::InvalidFormat(format!("line {} is not valid UTF-8", index + 1))
            }
            _ => LoadError::Io(e),
        })?;

        let term = line.trim();
        if !term.is_empty() {
            terms.push(term.to_string());
        }
    }

    Ok(terms)
}

fn read_csv<R: Read>(reader: R) -> Result<Vec<String>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(reader);

    let mut terms = Vec::new();
    for record in reader.records() {
        let record = record?;
        match record.get(0).map(str::trim) {
            Some(term) if !term.is_empty() => terms.push(term.to_string()),
            _ => {
                let line = record.position().map(|p| p.line()).unwrap_or_default();
                return Err(LoadError::InvalidFormat(format!(
                    "row at line {line} has an empty first column"
                )));
            }
        }
    }

    Ok(terms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_skip_blanks() {
        let input = "Paris\n\n  Tokyo  \r\nNew York\n";
        let terms = read_terms(input.as_bytes(), TermFormat::Lines).unwrap();
        assert_eq!(terms, vec!["Paris", "Tokyo", "New York"]);
    }

    #[test]
    fn test_csv_first_column_after_header() {
        let input = "name,country\nParis,FR\n\"New York, NY\",US\n";
        let terms = read_terms(input.as_bytes(), TermFormat::Csv).unwrap();
        assert_eq!(terms, vec!["Paris", "New York, NY"]);
    }

    #[test]
    fn test_csv_ragged_rows_fail() {
        let input = "name,country\nParis,FR\nTokyo\n";
        let result = read_terms(input.as_bytes(), TermFormat::Csv);
        assert!(matches!(result, Err(LoadError::Csv(_))));
    }

    #[test]
    fn test_invalid_utf8_fails() {
        let input: &[u8] = b"Paris\n\xff\xfe\n";
        let result = read_terms(input, TermFormat::Lines);
        assert!(matches!(result, Err(LoadError::InvalidFormat(_))));
    }

    #[test]
    fn test_format_from_path_and_name() {
        assert_eq!(TermFormat::from_path(Path::new("a/b.CSV")), TermFormat::Csv);
        assert_eq!(TermFormat::from_path(Path::new("a/b.txt")), TermFormat::Lines);
        assert_eq!("csv".parse::<TermFormat>().unwrap(), TermFormat::Csv);
        assert!("xml".parse::<TermFormat>().is_err());
    }

    #[test]
    fn test_missing_file() {
        let result = read_terms_file(Path::new("/definitely/not/here.txt"), TermFormat::Lines);
        assert!(matches!(result, Err(LoadError::FileNotFound(_))));
    }
}
