use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use reqwest::{
    blocking::Client,
    header::{HeaderMap, HeaderName, HeaderValue},
    StatusCode,
};

use crate::Config;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("HTTP status {0}")]
    Status(StatusCode),
    #[error("invalid header {name:?}: {reason}")]
    InvalidHeader { name: String, reason: String },
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Source of the page HTML
pub trait Fetcher {
    fn fetch(&self) -> Result<String, FetchError>;
}

#[derive(Debug)]
pub struct HttpFetcher {
    client: Client,
    url: String,
}

impl HttpFetcher {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from(config.timeout))
            .default_headers(Self::header_map(config)?)
            .build()?;
        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }

    fn header_map(config: &Config) -> Result<HeaderMap, FetchError> {
        let mut result = HeaderMap::new();
        for (name, value) in config.headers.iter() {
            let invalid = |reason: String| FetchError::InvalidHeader {
                name: name.clone(),
                reason,
            };
            let header_name =
                HeaderName::from_bytes(name.as_bytes()).map_err(|e| invalid(e.to_string()))?;
            let header_value = HeaderValue::from_str(value).map_err(|e| invalid(e.to_string()))?;
            result.insert(header_name, header_value);
        }
        Ok(result)
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self) -> Result<String, FetchError> {
        let response = self.client.get(&self.url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        Ok(response.text()?)
    }
}

/// Reads a saved copy of the page instead of going to the network
#[derive(Debug)]
pub struct FileFetcher {
    path: PathBuf,
}

impl FileFetcher {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl Fetcher for FileFetcher {
    fn fetch(&self) -> Result<String, FetchError> {
        fs::read_to_string(&self.path).map_err(|source| FetchError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;

    use super::*;

    fn config_for(url: String) -> Config {
        Config {
            url,
            timeout: 2.into(),
            ..Config::default()
        }
    }

    #[test]
    fn sends_browser_headers() {
        // Arrange
        let server = MockServer::start();
        let page = server.mock(|when, then| {
            when.method(GET)
                .path("/driver.html")
                .header("Accept-Language", "en-US,en;q=0.5")
                .header_exists("User-Agent");
            then.status(200)
                .header("Content-Type", "text/html")
                .body("<p>Age : 21 years old</p>");
        });
        let fetcher = HttpFetcher::new(&config_for(server.url("/driver.html"))).unwrap();

        // Act
        let actual = fetcher.fetch().unwrap();

        // Assert
        page.assert();
        assert_eq!(actual, "<p>Age : 21 years old</p>");
    }

    #[test]
    fn non_success_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/gone");
            then.status(503);
        });
        let fetcher = HttpFetcher::new(&config_for(server.url("/gone"))).unwrap();

        let actual = fetcher.fetch();

        assert!(matches!(
            actual,
            Err(FetchError::Status(code)) if code == StatusCode::SERVICE_UNAVAILABLE
        ));
    }

    #[test]
    fn connection_refused() {
        let fetcher = HttpFetcher::new(&config_for("http://127.0.0.1:9/".to_string())).unwrap();
        assert!(matches!(fetcher.fetch(), Err(FetchError::Request(_))));
    }

    #[test]
    fn bad_header_value() {
        let mut config = Config::default();
        config
            .headers
            .insert("X-Broken".to_string(), "line\nbreak".to_string());
        let err = HttpFetcher::new(&config).unwrap_err();
        assert!(matches!(err, FetchError::InvalidHeader { ref name, .. } if name == "X-Broken"));
    }

    #[test]
    fn missing_file() {
        let fetcher = FileFetcher::new(Path::new("no/such/page.html"));
        assert!(matches!(fetcher.fetch(), Err(FetchError::Io { .. })));
    }
}
