//! Global test helpers for easel integration tests.

use aerosol::Aero;
use clients::easel::{Client, Document};
use color_eyre::{Result, eyre::Context};
use easel::{api, db::Store};
use serde_json::Value;
use url::Url;

/// Test fixture containing a spawned server and a client pointed at it.
pub struct TestFixture {
    /// Client for the spawned server.
    pub client: Client,

    /// The store backing the server, for direct inspection in tests.
    pub store: Store,
}

impl TestFixture {
    /// Spawn a server on a random local port backed by the given store.
    pub async fn spawn(store: Store) -> Result<Self> {
        let router = api::router(Aero::new().with(store.clone()));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .context("bind test server")?;
        let local_addr = listener.local_addr().context("get local addr")?;
        let base_url = Url::parse(&format!("http://{local_addr}/")).context("parse base URL")?;

        // The server task is dropped with the test runtime.
        tokio::task::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("test server failed");
        });

        let client = Client::new(base_url)?;
        Ok(Self {
            client,
            store,
        })
    }

    /// Spawn a server backed by a fresh in-memory store.
    pub async fn spawn_memory() -> Result<Self> {
        Self::spawn(Store::memory()).await
    }
}

/// Unwrap a JSON object literal into a document.
#[track_caller]
pub fn document(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        other => panic!("not an object: {other}"),
    }
}
