mod api;
mod app;
mod clients;
mod config;
mod error;
mod rpc;
mod services;
mod state;

use crate::error::AppError;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    app::run().await
}
