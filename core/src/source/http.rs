use crate::prelude::GaugeResult;
use crate::source::{RawReading, ReadingSource};
use crate::telemetry::log::LogManager;
use reqwest::blocking::Client;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:1337/api/v1/entries/sgv.json?count=10";

/// Blocking HTTP source issuing a single GET per fetch.
pub struct HttpSource {
    client: Client,
    url: String,
    logger: LogManager,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> GaugeResult<Self> {
        Ok(Self {
            client: Client::builder().build()?,
            url: url.into(),
            logger: LogManager::new("fetch"),
        })
    }
}

impl ReadingSource for HttpSource {
    fn fetch(&self) -> GaugeResult<Vec<RawReading>> {
        self.logger.detail(&format!("GET {}", self.url));
        let readings = self
            .client
            .get(&self.url)
            .send()?
            .error_for_status()?
            .json::<Vec<RawReading>>()?;
        self.logger
            .record(&format!("received {} readings", readings.len()));
        Ok(readings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::GaugeError;
    use std::net::SocketAddr;
    use std::sync::mpsc;
    use std::thread;
    use tokio::runtime::Builder;
    use warp::{http::StatusCode, Filter};

    fn serve(status: StatusCode, body: &'static str) -> SocketAddr {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let runtime = Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("failed to build runtime");
            runtime.block_on(async move {
                let route = warp::any().map(move || {
                    warp::reply::with_status(
                        warp::reply::with_header(body, "content-type", "application/json"),
                        status,
                    )
                });
                let (addr, server) = warp::serve(route).bind_ephemeral(([127, 0, 0, 1], 0));
                tx.send(addr).expect("failed to report address");
                server.await;
            });
        });
        rx.recv().expect("server did not start")
    }

    #[test]
    fn fetch_decodes_entry_array() {
        let addr = serve(
            StatusCode::OK,
            r#"[{"sgv":180,"date":1700000000000,"direction":"Flat","device":"xDrip"},
                {"sgv":175,"date":1699999700000,"direction":"FortyFiveUp"}]"#,
        );
        let source = HttpSource::new(format!("http://{addr}/api/v1/entries/sgv.json")).unwrap();
        let readings = source.fetch().unwrap();
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0], RawReading::new(180.0, 1_700_000_000_000, "Flat"));
        assert_eq!(readings[1].direction, "FortyFiveUp");
    }

    #[test]
    fn fetch_rejects_server_errors() {
        let addr = serve(StatusCode::INTERNAL_SERVER_ERROR, "[]");
        let source = HttpSource::new(format!("http://{addr}/")).unwrap();
        assert!(matches!(source.fetch(), Err(GaugeError::Http(_))));
    }

    #[test]
    fn fetch_rejects_malformed_json() {
        let addr = serve(StatusCode::OK, r#"{"status":"ok"}"#);
        let source = HttpSource::new(format!("http://{addr}/")).unwrap();
        assert!(matches!(source.fetch(), Err(GaugeError::Http(_))));
    }

    #[test]
    fn fetch_reports_connection_failures() {
        let source = HttpSource::new("http://127.0.0.1:9/").unwrap();
        assert!(source.fetch().is_err());
    }
}
