//! A recording HTTP backend for exercising the gateway end to end.
//!
//! Every request is captured and answered with one canned response, so tests
//! can assert both what the client got back and what (if anything) reached the
//! backend.

use std::sync::Arc;
use std::time::Duration;

use actix_web::dev::ServerHandle;
use actix_web::http::StatusCode;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use parking_lot::Mutex;
use serde_json::Value;

/// What the backend saw.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    /// First value of a header, by lowercase name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn header_count(&self, name: &str) -> usize {
        self.headers.iter().filter(|(k, _)| k == name).count()
    }

    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("recorded body should be JSON")
    }
}

/// The response the mock backend gives to every request.
#[derive(Debug, Clone)]
pub struct CannedResponse {
    pub status: u16,
    pub body: Value,
    pub headers: Vec<(String, String)>,
    pub delay: Option<Duration>,
}

impl CannedResponse {
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            body,
            headers: Vec::new(),
            delay: None,
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn respond(&self) -> HttpResponse {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut builder = HttpResponse::build(status);
        for (name, value) in &self.headers {
            builder.append_header((name.as_str(), value.as_str()));
        }
        builder.json(&self.body)
    }
}

pub struct MockBackend {
    url: String,
    recorded: Arc<Mutex<Vec<RecordedRequest>>>,
    handle: ServerHandle,
}

impl MockBackend {
    /// Bind to an ephemeral localhost port and start serving `response`.
    ///
    /// Must be called from within an actix system (e.g. `#[actix_web::test]`).
    pub async fn start(response: CannedResponse) -> std::io::Result<Self> {
        let recorded = Arc::new(Mutex::new(Vec::new()));
        let sink = recorded.clone();

        let server = HttpServer::new(move || {
            let sink = sink.clone();
            let response = response.clone();
            App::new().default_service(web::to(move |req: HttpRequest, body: web::Bytes| {
                let sink = sink.clone();
                let response = response.clone();
                async move {
                    sink.lock().push(RecordedRequest {
                        method: req.method().to_string(),
                        path: req.path().to_string(),
                        query: req.query_string().to_string(),
                        headers: req
                            .headers()
                            .iter()
                            .map(|(k, v)| {
                                (
                                    k.as_str().to_string(),
                                    v.to_str().unwrap_or_default().to_string(),
                                )
                            })
                            .collect(),
                        body: body.to_vec(),
                    });

                    if let Some(delay) = response.delay {
                        actix_web::rt::time::sleep(delay).await;
                    }
                    response.respond()
                }
            }))
        })
        .workers(1)
        .disable_signals()
        .bind(("127.0.0.1", 0))?;

        let addr = server.addrs()[0];
        let server = server.run();
        let handle = server.handle();
        actix_web::rt::spawn(server);

        Ok(Self {
            url: format!("http://{addr}"),
            recorded,
            handle,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.recorded.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.recorded.lock().len()
    }

    pub async fn stop(self) {
        self.handle.stop(false).await;
    }
}

/// A localhost URL with nothing listening on it.
pub fn unused_local_url() -> String {
    let listener =
        std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port for unused url");
    let port = listener
        .local_addr()
        .expect("ephemeral listener has an address")
        .port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}
