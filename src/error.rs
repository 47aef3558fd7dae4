#[derive(thiserror::Error, Debug)]
pub enum PrtgError {
    #[error("http request failed: {0}")]
    Http(#[source] reqwest::Error),

    #[error("PRTG authentication failed. Check user name and passhash")]
    Authentication,

    #[error("resource not found: {0}")]
    ResourceNotFound(String),

    #[error("unexpected status code from PRTG: {0}")]
    Status(reqwest::StatusCode),

    #[error("cannot parse xml: `{0}`")]
    XMLParseError(#[from] serde_xml_rs::Error),

    #[error("parser error: `{0}`")]
    ParserError(String),

    #[error("cannot read historic data: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    #[error("invalid connection config: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot read confirmation: {0}")]
    Prompt(#[from] dialoguer::Error),
}

/// The passhash travels in the query string, so the url is dropped from
/// transport errors.
impl From<reqwest::Error> for PrtgError {
    fn from(err: reqwest::Error) -> Self {
        PrtgError::Http(err.without_url())
    }
}

pub type Result<T> = std::result::Result<T, PrtgError>;
