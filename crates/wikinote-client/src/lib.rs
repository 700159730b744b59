pub mod client;
pub mod error;
pub mod proxy;
pub mod routes;
pub mod source;

pub use client::ApiClient;
pub use error::{ClientError, ClientResult};
pub use proxy::{ProxyRequest, ProxyResponse, backend_url};
pub use routes::{HomeRoute, RouteError, load_home, load_page, open_page, refresh_pages};
pub use source::PageSource;

pub use reqwest::{Method, StatusCode};
