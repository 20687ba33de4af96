//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use ersatz::config::ErsatzConfig;
use ersatz::http::HttpServer;
use ersatz::lifecycle::{self, Shutdown};
use tempfile::TempDir;

pub const DEFAULT_JSON: &str =
    r#"{ "response_code": 200, "headers": { "header-1": "some value" }, "body": { "a":1, "b":2, "c":3 }}"#;

/// A fixture tree in a temporary directory.
pub struct FixtureTree {
    dir: TempDir,
}

impl FixtureTree {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// Write `content` to `relative` (e.g. `"endpoint1/GET/default.json"`).
    pub fn file(self, relative: &str, content: &str) -> Self {
        let path = self.dir.path().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
        self
    }

    /// Create an empty directory.
    pub fn dir(self, relative: &str) -> Self {
        fs::create_dir_all(self.dir.path().join(relative)).unwrap();
        self
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// A running server bound to an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    shutdown: Shutdown,
    _tree: FixtureTree,
}

impl TestServer {
    pub async fn start(tree: FixtureTree) -> Self {
        Self::start_with(tree, ErsatzConfig::default()).await
    }

    pub async fn start_with(tree: FixtureTree, mut config: ErsatzConfig) -> Self {
        config.listener.bind_address = "127.0.0.1:0".to_string();
        config.fixtures.root_dir = tree.path().to_path_buf();

        let server: HttpServer = lifecycle::prepare(config).unwrap();
        let listener = lifecycle::bind(server.config()).await.unwrap();
        let addr = listener.local_addr().unwrap();

        let shutdown = Shutdown::new();
        let server_shutdown = shutdown.subscribe();
        tokio::spawn(async move {
            let _ = server.run(listener, server_shutdown).await;
        });

        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(0)
            .no_proxy()
            .build()
            .unwrap();

        Self {
            addr,
            client,
            shutdown,
            _tree: tree,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn request(&self, method: &str, path: &str) -> reqwest::Response {
        let method = reqwest::Method::from_bytes(method.as_bytes()).unwrap();
        self.client
            .request(method, self.url(path))
            .send()
            .await
            .expect("server unreachable")
    }

    /// POST a raw admin command body.
    pub async fn admin(&self, body: &str) -> reqwest::Response {
        self.client
            .post(self.url("/__ersatz"))
            .header("content-type", "application/json")
            .body(body.to_string())
            .send()
            .await
            .expect("server unreachable")
    }

    pub async fn vary(&self, url: &str, method: &str, variant: &str) -> reqwest::Response {
        self.admin(&format!(
            r#"{{"command":"vary","endpoint":{{"URL":"{url}","Method":"{method}","Variant":"{variant}"}}}}"#
        ))
        .await
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}
