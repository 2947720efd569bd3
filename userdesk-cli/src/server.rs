use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use userdesk_server::{
    AppState, ConnectionProvider, DatabaseConfig, QueryExecutor, ServerConfig, UserModel,
};

#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind the HTTP server to
    #[arg(long, env = "USERDESK_BIND", default_value = "127.0.0.1")]
    pub bind: IpAddr,

    /// Port to bind the HTTP server to
    #[arg(long, env = "USERDESK_PORT", default_value_t = 3030)]
    pub port: u16,
}

impl ServeArgs {
    fn server_config(&self) -> ServerConfig {
        ServerConfig {
            bind_addr: SocketAddr::new(self.bind, self.port),
        }
    }
}

/// Read the database settings and open the connection up front.
async fn connect() -> Result<UserModel> {
    let config = DatabaseConfig::from_env().context("Invalid database configuration")?;
    tracing::info!(kind = %config.kind, "Connecting to database");

    let provider = Arc::new(ConnectionProvider::new(config));
    if let Err(e) = provider.connection().await {
        tracing::error!("Connection failed: {}", e);
        return Err(e).context("Connection failed");
    }

    Ok(UserModel::new(QueryExecutor::new(provider)))
}

pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let users = connect().await?;
    let config = args.server_config();

    userdesk_server::run_server(AppState::new(users), config)
        .await
        .context("HTTP server failed")?;
    Ok(())
}

pub async fn run_check() -> Result<()> {
    let users = connect().await?;
    let count = users.count().await.context("Could not count users")?;
    println!("Connection ok, {} users", count);
    Ok(())
}
