//! URL-to-file downloads.

use crate::{Result, SrtmError};
use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Default HTTP timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Downloads a URL to a local file.
pub trait Downloader {
    /// Download `url` to `dest`, replacing any existing file.
    ///
    /// Returns the number of bytes written.
    fn download(&self, url: &str, dest: &Path) -> Result<u64>;
}

impl<D: Downloader + ?Sized> Downloader for &D {
    fn download(&self, url: &str, dest: &Path) -> Result<u64> {
        (**self).download(url, dest)
    }
}

impl<D: Downloader + ?Sized> Downloader for Box<D> {
    fn download(&self, url: &str, dest: &Path) -> Result<u64> {
        (**self).download(url, dest)
    }
}

/// HTTP basic-auth credentials (e.g. an Earthdata login).
#[derive(Clone)]
pub struct Credentials {
    /// User name.
    pub username: String,
    /// Password.
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Earthdata Login host that LP DAAC redirects to for authentication.
pub const EARTHDATA_LOGIN_HOST: &str = "urs.earthdata.nasa.gov";

/// Redirects followed before giving up.
const MAX_REDIRECTS: usize = 10;

/// [`Downloader`] backed by a blocking `reqwest` client.
///
/// Redirects are followed here rather than by the client, so credentials
/// can be re-sent to the login host. They go only to the host of the
/// requested URL and to the configured login hosts, never to other hosts a
/// redirect points at. Session cookies set along the way are kept.
pub struct HttpDownloader {
    client: reqwest::blocking::Client,
    credentials: Option<Credentials>,
    auth_hosts: Vec<String>,
}

impl std::fmt::Debug for HttpDownloader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpDownloader")
            .field("credentials", &self.credentials)
            .field("auth_hosts", &self.auth_hosts)
            .finish()
    }
}

impl HttpDownloader {
    /// Create a downloader with the default timeout and no credentials.
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a downloader with a request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Self::client_builder(timeout).build()?;
        Ok(Self::from_client(client))
    }

    /// Client settings the downloader expects: a timeout, a cookie store and
    /// no automatic redirects.
    pub fn client_builder(timeout: Duration) -> reqwest::blocking::ClientBuilder {
        reqwest::blocking::Client::builder()
            .timeout(timeout)
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
    }

    /// Wrap an already configured client, normally one from
    /// [`client_builder`](Self::client_builder).
    pub fn from_client(client: reqwest::blocking::Client) -> Self {
        Self {
            client,
            credentials: None,
            auth_hosts: vec![EARTHDATA_LOGIN_HOST.to_string()],
        }
    }

    /// Send basic-auth credentials to the archive host and the login hosts.
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Replace the login hosts, given as `host` or `host:port`.
    pub fn with_auth_hosts<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.auth_hosts = hosts.into_iter().map(Into::into).collect();
        self
    }

    fn sends_credentials(&self, url: &reqwest::Url, origin: &str) -> bool {
        let authority = authority(url);
        authority == origin || self.auth_hosts.iter().any(|host| *host == authority)
    }
}

/// `host[:port]` of `url`, omitting the scheme's default port.
fn authority(url: &reqwest::Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    }
}

impl Downloader for HttpDownloader {
    fn download(&self, url: &str, dest: &Path) -> Result<u64> {
        let mut current = reqwest::Url::parse(url).map_err(|e| SrtmError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        let origin = authority(&current);

        let mut redirects = 0;
        let response = loop {
            let mut request = self.client.get(current.clone());
            if let Some(creds) = &self.credentials {
                if self.sends_credentials(&current, &origin) {
                    request = request.basic_auth(&creds.username, Some(&creds.password));
                }
            }

            let response = request.send()?;
            let status = response.status();
            if !status.is_redirection() {
                break response;
            }

            redirects += 1;
            if redirects > MAX_REDIRECTS {
                return Err(SrtmError::InvalidUrl {
                    url: url.to_string(),
                    reason: format!("more than {} redirects", MAX_REDIRECTS),
                });
            }
            let location = response
                .headers()
                .get(reqwest::header::LOCATION)
                .and_then(|value| value.to_str().ok())
                .ok_or_else(|| SrtmError::DownloadFailed {
                    url: current.to_string(),
                    status: status.as_u16(),
                })?;
            let next = current.join(location).map_err(|e| SrtmError::InvalidUrl {
                url: location.to_string(),
                reason: e.to_string(),
            })?;
            debug!("{} redirected to {}", current, next);
            current = next;
        };

        if !response.status().is_success() {
            return Err(SrtmError::DownloadFailed {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let bytes = response.bytes()?;
        debug!("Downloaded {} bytes from {}", bytes.len(), url);

        if let Some(parent) = dest.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut file = fs::File::create(dest)?;
        file.write_all(&bytes)?;

        Ok(bytes.len() as u64)
    }
}
