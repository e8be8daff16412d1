use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    time::Duration,
};

use log::debug;
use reqwest::{
    blocking::Client,
    header::{UPGRADE_INSECURE_REQUESTS, USER_AGENT},
    StatusCode,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("report not found: {0}")]
    NotFound(String),
    #[error("download of {url} failed with status {status}")]
    Status { url: String, status: StatusCode },
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("failed reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Where the text of a report comes from.  One call per report, no retries.
pub trait ReportSource {
    fn fetch(&self, location: &str) -> Result<String, FetchError>;
}

/// Download reports over HTTP, one blocking request at a time.
pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    /// With `timeout == None` the request waits as long as the server lets it.
    pub fn new(timeout: Option<Duration>) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(HttpSource { client })
    }
}

impl ReportSource for HttpSource {
    fn fetch(&self, location: &str) -> Result<String, FetchError> {
        debug!("GET {}", location);
        let response = self
            .client
            .get(location)
            .header(USER_AGENT, "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36")
            .header(UPGRADE_INSECURE_REQUESTS, "1")
            .send()?;
        match response.status() {
            StatusCode::OK => Ok(response.text()?),
            StatusCode::NOT_FOUND => Err(FetchError::NotFound(location.to_string())),
            status => Err(FetchError::Status {
                url: location.to_string(),
                status,
            }),
        }
    }
}

/// Serve reports from a local directory, keyed by the file name of the location.
/// Handy to replay a set of reports downloaded earlier.
pub struct DirSource {
    pub dir: PathBuf,
}

impl DirSource {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        DirSource {
            dir: dir.as_ref().to_path_buf(),
        }
    }
}

impl ReportSource for DirSource {
    fn fetch(&self, location: &str) -> Result<String, FetchError> {
        let name = location.rsplit('/').next().unwrap_or(location);
        let path = self.dir.join(name);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(FetchError::NotFound(path.display().to_string()))
            }
            Err(source) => Err(FetchError::Io { path, source }),
        }
    }
}
