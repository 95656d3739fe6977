use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("cannot create output directory {path}: {source}")]
    OutputDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot add worksheet \"{title}\": {reason}")]
    Sheet { title: String, reason: String },

    #[error("cannot write workbook {path}: {reason}")]
    Write { path: String, reason: String },
}
