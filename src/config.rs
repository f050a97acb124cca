use hyper::Uri;
use serde::Deserialize;
use std::io::ErrorKind;
use std::net::SocketAddr;
#[cfg(feature = "multi-thread")]
use std::num::NonZeroUsize;
use std::path::Path;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "Config::default_host")]
    pub host: SocketAddr,
    #[serde(default = "Config::default_ip_headers")]
    pub ip_headers: Vec<String>,
    #[serde(with = "http_serde::uri", default = "Config::default_geoip_url")]
    pub geoip_url: Uri,
    #[serde(default = "Config::default_log_level")]
    pub log_level: log::Level,
    /// Worker threads, one per core when not set.
    #[cfg(feature = "multi-thread")]
    #[serde(default)]
    pub threads: Option<NonZeroUsize>,
}

impl Config {
    fn default_host() -> SocketAddr {
        ([0, 0, 0, 0], 8080).into()
    }

    fn default_ip_headers() -> Vec<String> {
        vec!["X-Forwarded-For".into()]
    }

    fn default_geoip_url() -> Uri {
        Uri::from_static("http://ip-api.com")
    }

    fn default_log_level() -> log::Level {
        log::Level::Info
    }
}

/// Parses the TOML config, falling back to the all-defaults config when the
/// file does not exist. Unreadable or malformed files are still errors.
pub fn parse_config<P: AsRef<Path>>(path: P) -> anyhow::Result<Config> {
    let toml_string = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e.into()),
    };
    let config: Config = toml::from_str(&toml_string)?;
    Ok(config)
}
