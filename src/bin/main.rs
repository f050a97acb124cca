use geolog::config::{parse_config, Config};
use geolog::service::{make_error_response, GeologService};

use hyper::server::conn::AddrStream;
use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Request, Server};
use std::convert::Infallible;
use std::sync::Arc;

async fn async_main(config: Config) -> anyhow::Result<()> {
    let host = config.host;

    simple_logger::init_with_level(config.log_level)?;

    let geolog_service = Arc::new(GeologService::from_config(config));

    let make_service = make_service_fn(move |connection: &AddrStream| {
        let socket_addr = connection.remote_addr();
        let geolog_service = geolog_service.clone();
        let service = service_fn(move |request: Request<Body>| {
            let geolog_service = geolog_service.clone();
            async move {
                let response = geolog_service
                    .response(socket_addr, request)
                    .await
                    .unwrap_or_else(make_error_response);
                Ok::<_, Infallible>(response)
            }
        });
        async move { Ok::<_, Infallible>(service) }
    });

    let server = Server::bind(&host).serve(make_service);

    if let Err(e) = server.await {
        log::error!("server error: {}", e);
    }
    Err(anyhow::anyhow!("server exited"))
}

fn main() -> anyhow::Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "geolog.toml".to_owned());

    let config = parse_config(&config_path)?;

    #[cfg(feature = "multi-thread")]
    let mut runtime_builder = match config.threads.map(Into::into) {
        Some(1) => tokio::runtime::Builder::new_current_thread(),
        Some(threads) => {
            let mut builder = tokio::runtime::Builder::new_multi_thread();
            builder.worker_threads(threads);
            builder
        }
        None => tokio::runtime::Builder::new_multi_thread(),
    };
    #[cfg(not(feature = "multi-thread"))]
    let mut runtime_builder = tokio::runtime::Builder::new_current_thread();
    let runtime = runtime_builder.enable_all().build()?;

    runtime.block_on(async_main(config))
}
