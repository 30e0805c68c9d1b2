//! Local fixture site for tests that need real HTTP
//!
//! Serves a fixed route table over plain HTTP/1.1 on 127.0.0.1. Each route
//! can be delayed, fail with a status or cut its body short. The server
//! counts requests in flight and remembers the peak.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// One canned response
#[derive(Debug, Clone)]
pub struct Route {
    pub status: u16,
    pub delay_ms: u64,
    pub body: Vec<u8>,
    /// Advertise this many extra bytes, then close early
    pub missing_bytes: usize,
}

impl Route {
    pub fn html(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            delay_ms: 0,
            body: body.into().into_bytes(),
            missing_bytes: 0,
        }
    }

    pub fn bytes(body: &[u8]) -> Self {
        Self {
            body: body.to_vec(),
            ..Self::html("")
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            ..Self::html("error")
        }
    }

    pub fn delayed(mut self, ms: u64) -> Self {
        self.delay_ms = ms;
        self
    }

    pub fn truncated(mut self, missing_bytes: usize) -> Self {
        self.missing_bytes = missing_bytes;
        self
    }
}

#[derive(Debug, Default)]
pub struct Counters {
    pub in_flight: AtomicUsize,
    pub peak: AtomicUsize,
    pub requests: AtomicUsize,
}

/// A running fixture site
pub struct Site {
    pub origin: String,
    pub counters: Arc<Counters>,
}

impl Site {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.origin, path)
    }

    pub fn peak(&self) -> usize {
        self.counters.peak.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> usize {
        self.counters.requests.load(Ordering::SeqCst)
    }
}

/// Start serving `routes`; unknown paths answer 404
pub async fn serve(routes: Vec<(&str, Route)>) -> Site {
    let routes: Arc<HashMap<String, Route>> = Arc::new(
        routes
            .into_iter()
            .map(|(path, route)| (path.to_string(), route))
            .collect(),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let origin = format!("http://{}", listener.local_addr().unwrap());
    let counters = Arc::new(Counters::default());

    let accept_counters = counters.clone();
    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            let routes = routes.clone();
            let counters = accept_counters.clone();
            tokio::spawn(async move {
                let _ = handle(socket, &routes, &counters).await;
            });
        }
    });

    Site { origin, counters }
}

async fn handle(
    mut socket: TcpStream,
    routes: &HashMap<String, Route>,
    counters: &Counters,
) -> std::io::Result<()> {
    let mut buf = vec![0u8; 8192];
    let mut read = 0;
    while !buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
        if read == buf.len() {
            return Ok(());
        }
        let n = socket.read(&mut buf[read..]).await?;
        if n == 0 {
            return Ok(());
        }
        read += n;
    }
    let request = String::from_utf8_lossy(&buf[..read]);
    let path = request
        .split_whitespace()
        .nth(1)
        .unwrap_or("/")
        .to_string();

    counters.requests.fetch_add(1, Ordering::SeqCst);
    let now = counters.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    counters.peak.fetch_max(now, Ordering::SeqCst);

    let route = routes.get(&path).cloned().unwrap_or_else(|| Route::status(404));
    tokio::time::sleep(Duration::from_millis(route.delay_ms)).await;
    counters.in_flight.fetch_sub(1, Ordering::SeqCst);

    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        route.status,
        if route.status == 200 { "OK" } else { "Error" },
        route.body.len() + route.missing_bytes
    );
    socket.write_all(head.as_bytes()).await?;
    socket.write_all(&route.body).await?;
    socket.flush().await?;
    socket.shutdown().await
}

/// Fresh empty directory under the system temp dir
pub fn temp_dir(prefix: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("{}-{}", prefix, uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Files in `dir`, sorted
pub fn files_in(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
