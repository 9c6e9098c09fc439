#![allow(dead_code)]

use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use url_summary::SummaryOptions;
use wiremock::ResponseTemplate;

pub fn page(head: &str) -> String {
    format!("<!DOCTYPE html><html><head>{head}</head><body><h1>Body</h1></body></html>")
}

pub fn html(body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.into(), "text/html; charset=utf-8")
}

/// Options that skip the redirect probe, so mocks only see the extraction fetch.
pub fn direct() -> SummaryOptions {
    SummaryOptions::default().with_follow_redirects(false)
}

/// A server that answers every connection with `body` as an HTML response
/// without a content-length header, closing the connection to end the body.
pub async fn serve_without_content_length(body: String) -> String {
    serve_raw(vec![body], Duration::ZERO).await
}

/// Like [`serve_without_content_length`], but sends the headers at once and
/// then each of `chunks` after waiting `interval`.
pub async fn serve_trickle(chunks: Vec<String>, interval: Duration) -> String {
    serve_raw(chunks, interval).await
}

async fn serve_raw(chunks: Vec<String>, interval: Duration) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let head = "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nConnection: close\r\n\r\n";

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let chunks = chunks.clone();
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                if socket.write_all(head.as_bytes()).await.is_err() {
                    return;
                }
                let _ = socket.flush().await;
                for chunk in chunks {
                    if !interval.is_zero() {
                        tokio::time::sleep(interval).await;
                    }
                    if socket.write_all(chunk.as_bytes()).await.is_err() {
                        return;
                    }
                    let _ = socket.flush().await;
                }
                let _ = socket.shutdown().await;
            });
        }
    });

    format!("http://{addr}")
}
