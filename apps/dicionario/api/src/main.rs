//! Dicionário Vetorial API - Entry Point
//!
//! Minimal entry point that delegates to the server module.

#[tokio::main]
async fn main() -> eyre::Result<()> {
    dicionario_api::run().await
}
