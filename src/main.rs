// File: src/main.rs

mod agentd;
mod agi;
mod app;
mod app_state;
mod config;
mod dialplan;
mod directory;
mod error;
mod handlers;
mod redis;

use app::App;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    App::bootstrap().await?.run().await
}
