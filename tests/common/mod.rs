//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use pagewalk::config::ServerConfig;
use pagewalk::routing::PageTree;
use pagewalk::{HttpServer, Shutdown};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A server running on an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<Result<(), std::io::Error>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Trigger shutdown and wait for the server task to finish.
    pub async fn stop(self) {
        self.shutdown.trigger();
        let result = tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .expect("server did not stop in time")
            .expect("server task panicked");
        result.expect("server returned an error");
    }
}

/// Start `tree` behind the full HTTP stack.
pub async fn start_server(tree: PageTree) -> TestServer {
    start_server_with(ServerConfig::default(), tree).await
}

pub async fn start_server_with(config: ServerConfig, tree: PageTree) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let receiver = shutdown.subscribe();
    let server = HttpServer::new(config, tree);
    let handle = tokio::spawn(server.run(listener, receiver));

    TestServer {
        addr,
        shutdown,
        handle,
    }
}

/// HTTP client that reports redirects instead of following them.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}
