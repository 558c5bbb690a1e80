use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Malformed record: {0}")]
    MalformedRecord(#[from] serde_json::Error),

    #[error("Record is not a key/value literal")]
    NotAnObject,

    #[error("Invalid record field: {0}")]
    InvalidRecord(serde_json::Error),

    #[error("Line {line}: section header has no record count: {header:?}")]
    MissingCount { line: usize, header: String },

    #[error("Line {line}: invalid record count {value:?}")]
    InvalidCount { line: usize, value: String },

    #[error("Line {line}: expected a blank separator, found {found:?}")]
    MissingSeparator { line: usize, found: String },

    #[error("Line {line}: report ended early")]
    UnexpectedEof { line: usize },

    #[error("Line {line}: {source}")]
    Record {
        line: usize,
        #[source]
        source: Box<ParseError>,
    },

    #[error("I/O error reading report: {0}")]
    Io(#[from] std::io::Error),
}
