use crate::client_ip::resolve_client_ip;
use crate::config::Config;
use crate::geo::GeoClient;

use hyper::header::CONTENT_TYPE;
use hyper::{Body, Method, Request, Response, StatusCode};
use serde::Serialize;
use std::net::SocketAddr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(r#"Internal server error: "{0:?}""#)]
    InternalServerError(#[from] hyper::http::Error),
    #[error(r#"Cannot serialize response: "{0:?}""#)]
    ResponseSerialization(#[from] serde_json::Error),
}

/// Resolved client IP of the current request, stored in the request
/// extensions by [`GeologService::response`] before any handler runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

pub struct GeologService {
    ip_headers: Vec<String>,
    geo: GeoClient,
}

impl GeologService {
    pub fn from_config(config: Config) -> Self {
        let Config {
            ip_headers,
            geoip_url,
            ..
        } = config;
        Self {
            ip_headers,
            geo: GeoClient::new(geoip_url),
        }
    }

    /// Handles one request: resolves the client IP, stores it in the request
    /// extensions, logs one line with the geolocation outcome and routes the
    /// request. A failed lookup is informational only and never turns into an
    /// error response.
    pub async fn response(
        &self,
        socket_addr: SocketAddr,
        mut request: Request<Body>,
    ) -> Result<Response<Body>, ServiceError> {
        let client_ip = resolve_client_ip(
            request.headers(),
            &self.ip_headers,
            &socket_addr.to_string(),
        );
        request.extensions_mut().insert(ClientIp(client_ip.clone()));

        match self.geo.lookup(&client_ip).await {
            Ok(geo) => log::info!(
                "IP: {} - {}, {}, {} | ISP: {} ({}) - {} {}",
                geo.query,
                geo.city,
                geo.region_name,
                geo.country,
                geo.isp,
                geo.org,
                request.method(),
                request.uri().path(),
            ),
            Err(error) => {
                log::info!(
                    "IP: {} - {} {} (location unknown)",
                    client_ip,
                    request.method(),
                    request.uri().path(),
                );
                log::debug!("geolocation lookup for {client_ip} failed: {error}");
            }
        }

        route(&request)
    }
}

fn route(request: &Request<Body>) -> Result<Response<Body>, ServiceError> {
    match (request.method(), request.uri().path()) {
        (&Method::GET, "/ping") => ping(request),
        _ => not_found(),
    }
}

#[derive(Serialize)]
struct PingResponse<'a> {
    message: &'a str,
    ip: &'a str,
}

fn ping(request: &Request<Body>) -> Result<Response<Body>, ServiceError> {
    let ip = request
        .extensions()
        .get::<ClientIp>()
        .map(|ClientIp(ip)| ip.as_str())
        .unwrap_or_default();
    let body = serde_json::to_string(&PingResponse {
        message: "pong",
        ip,
    })?;
    let response = Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body))?;
    Ok(response)
}

fn not_found() -> Result<Response<Body>, ServiceError> {
    let response = Response::builder()
        .status(StatusCode::NOT_FOUND)
        .body(Body::empty())?;
    Ok(response)
}

pub fn make_error_response(error: ServiceError) -> Response<Body> {
    let status = match error {
        ServiceError::InternalServerError(_) | ServiceError::ResponseSerialization(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    Response::builder()
        .status(status)
        .body(format!("{error:?}").into())
        .unwrap()
}
