//! Cancel an Execution
//!
//! Shows how a rejected request surfaces: the error keeps the full response,
//! so the status and the server's error body can be inspected.
//!
//! Run with: cargo run --example cancel_execution -- 01GHGT0WXHZ7PCA23R11PPN6TR

use dune_rs::{Client, ClientConfig, ClientError, Config, TracingLogger};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("dune_rs=debug")
        .init();

    let execution_id = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("usage: cancel_execution <execution-id>"))?;

    let config: ClientConfig = Config::from_env()?.into();
    let client = Client::new(config.with_logger(Arc::new(TracingLogger)))?;

    match client.cancel(&execution_id).await {
        Ok(body) => println!("✅ Cancelled {execution_id}: {body}"),
        Err(ClientError::Api(err)) => {
            println!("❌ {}", err);
            println!("   status: {}", err.status());
            println!("   body:   {}", err.response().text());
        }
        Err(err) => return Err(err.into()),
    }

    Ok(())
}
