use hyper::client::HttpConnector;
use hyper::{body, Client, Uri};
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeoError {
    #[error("geolocation request failed: {0}")]
    Transport(#[from] hyper::Error),
    #[error("cannot compose geolocation URI: {0}")]
    InvalidUri(#[from] hyper::http::Error),
    #[error("cannot decode geolocation response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Best-effort geolocation record for one IP, as returned by the provider.
/// Every field may be empty; unknown provider fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GeoInfo {
    pub query: String,
    pub country: String,
    #[serde(rename = "regionName")]
    pub region_name: String,
    pub city: String,
    pub isp: String,
    pub org: String,
    pub timezone: String,
}

pub struct GeoClient {
    client: Client<HttpConnector>,
    endpoint: Uri,
}

impl GeoClient {
    pub fn new(endpoint: Uri) -> Self {
        Self {
            client: Client::new(),
            endpoint,
        }
    }

    /// One GET to `<endpoint>/json/<ip>` per call, no retry, no cache and no
    /// timeout: an unresponsive provider blocks the caller until the
    /// transport gives up on its own.
    pub async fn lookup(&self, ip: &str) -> Result<GeoInfo, GeoError> {
        let uri = self.lookup_uri(ip)?;
        let response = self.client.get(uri).await?;
        let bytes = body::to_bytes(response.into_body()).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn lookup_uri(&self, ip: &str) -> Result<Uri, hyper::http::Error> {
        let path = [self.endpoint.path().trim_end_matches('/'), "/json/", ip].concat();
        let mut builder = Uri::builder().path_and_query(path);
        if let Some(scheme) = self.endpoint.scheme() {
            builder = builder.scheme(scheme.clone());
        }
        if let Some(authority) = self.endpoint.authority() {
            builder = builder.authority(authority.clone());
        }
        builder.build()
    }
}
