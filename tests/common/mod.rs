//! Shared utilities for integration testing.

use std::net::SocketAddr;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use message_bridge::{BridgeConfig, BridgeServer, Handler, Shutdown};

/// Start a bridge server on an ephemeral port.
///
/// Returns the bound address and the handle that stops it.
pub async fn start_bridge<H: Handler>(config: BridgeConfig, handler: H) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();

    let server = BridgeServer::new(config, handler);
    let server_shutdown = shutdown.clone();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// Send a raw HTTP/1.1 request and read the whole reply.
///
/// The request should carry `Connection: close` so the server ends the
/// exchange by closing the socket.
#[allow(dead_code)]
pub async fn send_raw(addr: SocketAddr, request: &str) -> String {
    let mut socket = TcpStream::connect(addr).await.unwrap();
    socket.write_all(request.as_bytes()).await.unwrap();

    let mut reply = Vec::new();
    socket.read_to_end(&mut reply).await.unwrap();
    String::from_utf8_lossy(&reply).into_owned()
}
