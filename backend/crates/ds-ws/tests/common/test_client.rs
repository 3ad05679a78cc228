#![allow(dead_code)]

use crate::common::jwt_helper::create_test_token;
use crate::common::test_server::TEST_JWT_SECRET;

use axum_test::{TestServer, TestWebSocket};
use serde_json::Value;
use tokio::time::{Duration, timeout};

const RECEIVE_TIMEOUT: Duration = Duration::from_secs(2);

/// WebSocket test client wrapper
pub struct WsTestClient {
    ws: TestWebSocket,
    pub document_id: String,
    pub user_id: Option<String>,
}

impl WsTestClient {
    /// Connect as a named user through query parameters (auth disabled)
    pub async fn connect(
        server: &TestServer,
        document_id: &str,
        user_id: &str,
        username: &str,
    ) -> Self {
        let ws = server
            .get_websocket("/ws")
            .add_query_param("docId", document_id)
            .add_query_param("user_id", user_id)
            .add_query_param("username", username)
            .await
            .into_websocket()
            .await;

        Self {
            ws,
            document_id: document_id.to_string(),
            user_id: Some(user_id.to_string()),
        }
    }

    /// Connect without any identity
    pub async fn connect_anonymous(server: &TestServer, document_id: &str) -> Self {
        let ws = server
            .get_websocket("/ws")
            .add_query_param("docId", document_id)
            .await
            .into_websocket()
            .await;

        Self {
            ws,
            document_id: document_id.to_string(),
            user_id: None,
        }
    }

    /// Connect with a JWT in the Authorization header
    pub async fn connect_with_jwt(
        server: &TestServer,
        document_id: &str,
        user_id: &str,
        username: &str,
    ) -> Self {
        let token = create_test_token(user_id, username, TEST_JWT_SECRET);

        let ws = server
            .get_websocket("/ws")
            .add_query_param("docId", document_id)
            .add_header("Authorization", format!("Bearer {}", token))
            .await
            .into_websocket()
            .await;

        Self {
            ws,
            document_id: document_id.to_string(),
            user_id: Some(user_id.to_string()),
        }
    }

    /// Connect with a JWT in the `token` query parameter
    pub async fn connect_with_token_param(
        server: &TestServer,
        document_id: &str,
        token: &str,
    ) -> Self {
        let ws = server
            .get_websocket("/ws")
            .add_query_param("docId", document_id)
            .add_query_param("token", token)
            .await
            .into_websocket()
            .await;

        Self {
            ws,
            document_id: document_id.to_string(),
            user_id: None,
        }
    }

    pub async fn send_text(&mut self, text: impl std::fmt::Display) {
        self.ws.send_text(text).await;
    }

    /// Receive text message, failing the test if none arrives in time
    pub async fn receive_text(&mut self) -> String {
        timeout(RECEIVE_TIMEOUT, self.ws.receive_text())
            .await
            .expect("timed out waiting for a message")
    }

    pub async fn receive_json(&mut self) -> Value {
        let text = self.receive_text().await;
        serde_json::from_str(&text).expect("server sent invalid JSON")
    }

    /// Round-trip an update through the hub. Once the echo is back this
    /// client is known to be a member.
    pub async fn sync(&mut self, tag: &str) {
        self.send_text(sync_frame(tag)).await;
        let echoed = self.receive_text().await;
        assert_eq!(echoed, sync_frame(tag), "expected own sync echo first");
    }

    /// Close the WebSocket connection
    pub async fn close(self) {
        self.ws.close().await;
    }

    pub fn ws_mut(&mut self) -> &mut TestWebSocket {
        &mut self.ws
    }
}

pub fn sync_frame(tag: &str) -> String {
    format!(r#"{{"type":"update","data":{{"sync":"{tag}"}}}}"#)
}

/// Connect `count` anonymous clients to one document, each confirmed a
/// member before the next connects. All queues are drained on return.
pub async fn create_clients_for_document(
    server: &TestServer,
    document_id: &str,
    count: usize,
) -> Vec<WsTestClient> {
    let mut clients: Vec<WsTestClient> = Vec::with_capacity(count);
    for i in 0..count {
        let tag = format!("client-{}", i + 1);
        let mut client = WsTestClient::connect_anonymous(server, document_id).await;
        client.sync(&tag).await;
        for earlier in clients.iter_mut() {
            assert_eq!(earlier.receive_text().await, sync_frame(&tag));
        }
        clients.push(client);
    }
    clients
}
