//! Fake backend for client tests: a tiny_http server on an ephemeral port
//! that answers from a routing closure and records what it received.

use std::io::Read;
use std::sync::{Arc, Mutex};
use std::thread;

use tiny_http::{Header, Response, Server};

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub url: String,
    pub body: String,
    pub headers: Vec<(String, String)>,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

pub struct FakeBackend {
    pub base_url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl FakeBackend {
    /// Starts a server answering every request with `route(method, url, body)`,
    /// which returns the status code and JSON body.
    pub fn start<F>(route: F) -> Self
    where
        F: Fn(&str, &str, &str) -> (u16, String) + Send + 'static,
    {
        let server = Server::http("127.0.0.1:0").expect("bind fake backend");
        let addr = server
            .server_addr()
            .to_ip()
            .expect("fake backend listens on TCP");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);

        thread::spawn(move || {
            for mut request in server.incoming_requests() {
                let mut body = String::new();
                let _ = request.as_reader().read_to_string(&mut body);
                let method = request.method().to_string();
                let url = request.url().to_string();
                let headers = request
                    .headers()
                    .iter()
                    .map(|h| (h.field.to_string(), h.value.to_string()))
                    .collect();

                let (status, reply) = route(&method, &url, &body);
                recorded.lock().unwrap().push(Recorded {
                    method,
                    url,
                    body,
                    headers,
                });

                let content_type =
                    Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap();
                let response = Response::from_string(reply)
                    .with_status_code(status)
                    .with_header(content_type);
                let _ = request.respond(response);
            }
        });

        Self {
            base_url: format!("http://{addr}"),
            requests,
        }
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

pub fn page_json(id: i64, name: &str, content: &str) -> String {
    serde_json::json!({
        "id": id,
        "name": name,
        "content": content,
        "created_at": "2024-05-01T09:00:00Z",
        "updated_at": "2024-05-01T09:00:00Z",
    })
    .to_string()
}
