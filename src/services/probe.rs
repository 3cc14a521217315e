use crate::models::report::ServiceState;
use log::{log, warn};
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Single-shot HTTP reachability check for the media services.
pub struct ServiceProber {
    client: Client,
}

impl ServiceProber {
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            // targets are LAN addresses
            .no_proxy()
            .build()
            .unwrap_or_else(|e| {
                warn!("Falling back to default HTTP client: {}", e);
                Client::new()
            });
        Self { client }
    }

    /// 200 is online, any other status is an error, no answer is offline.
    pub async fn probe(&self, url: &str) -> ServiceState {
        let (state, outcome) = match self.client.get(url).send().await {
            Ok(response) if response.status() == StatusCode::OK => {
                (ServiceState::Online, "answered 200".to_string())
            }
            Ok(response) => (ServiceState::Error, format!("answered {}", response.status())),
            Err(e) => (ServiceState::Offline, format!("unreachable: {}", e)),
        };
        log!(state.log_level(), "{} is {}: {}", url, state, outcome);
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    async fn serve_once(status_line: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 1024];
                let _ = socket.read(&mut buf).await;
                let response = format!("{status_line}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
                let _ = socket.write_all(response.as_bytes()).await;
            }
        });
        format!("http://{addr}/")
    }

    #[tokio::test]
    async fn test_ok_is_online() {
        let url = serve_once("HTTP/1.1 200 OK").await;
        let prober = ServiceProber::new(Duration::from_secs(3));
        assert_eq!(prober.probe(&url).await, ServiceState::Online);
    }

    #[tokio::test]
    async fn test_server_error_is_error() {
        let url = serve_once("HTTP/1.1 500 Internal Server Error").await;
        let prober = ServiceProber::new(Duration::from_secs(3));
        assert_eq!(prober.probe(&url).await, ServiceState::Error);
    }

    #[tokio::test]
    async fn test_unauthorized_is_error() {
        let url = serve_once("HTTP/1.1 401 Unauthorized").await;
        let prober = ServiceProber::new(Duration::from_secs(3));
        assert_eq!(prober.probe(&url).await, ServiceState::Error);
    }

    #[tokio::test]
    async fn test_connection_refused_is_offline() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let prober = ServiceProber::new(Duration::from_secs(3));
        assert_eq!(prober.probe(&format!("http://{addr}/")).await, ServiceState::Offline);
    }

    #[tokio::test]
    async fn test_silent_server_times_out_offline() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _held = listener.accept().await;
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let prober = ServiceProber::new(Duration::from_millis(200));
        assert_eq!(prober.probe(&format!("http://{addr}/")).await, ServiceState::Offline);
    }
}
