//! Endpoints and credentials for one server.

/// Where a client talks to and who it is.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the REST API, e.g. `http://localhost:5000/api/v1`.
    pub api_url: String,
    /// Board socket URL, e.g. `ws://localhost:5000/api/v1/ws`.
    pub ws_url: String,
    /// Bearer token for REST calls and the socket handshake.
    pub token: String,
}

impl ClientConfig {
    /// Derive both endpoints from a server origin such as
    /// `http://localhost:5000`.
    pub fn for_server(origin: &str, token: impl Into<String>) -> Self {
        let origin = origin.trim_end_matches('/');
        let ws_origin = if let Some(rest) = origin.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = origin.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            origin.to_string()
        };

        Self {
            api_url: format!("{origin}/api/v1"),
            ws_url: format!("{ws_origin}/api/v1/ws"),
            token: token.into(),
        }
    }
}
