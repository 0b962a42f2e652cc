use std::net::{IpAddr, SocketAddr};

use anyhow::{Context, Result};
use clap::Parser;
use vetbook_server::db::migrations;
use vetbook_server::{create_pool, run_server, ServerConfig};

#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Host to bind the HTTP server to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// Port to bind the HTTP server to
    #[arg(long, default_value_t = 5000, env = "PORT")]
    pub port: u16,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// Secret for signing bearer tokens
    #[arg(long, env = "VETBOOK_JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,

    /// Allow requests from any origin (development only)
    #[arg(long)]
    pub cors_permissive: bool,
}

pub async fn run(args: ServeArgs) -> Result<()> {
    let pool = create_pool(&args.database_url)
        .await
        .context("could not connect to the database")?;
    tracing::info!("Database connected");

    migrations::run(&pool)
        .await
        .context("could not run migrations")?;

    let config = ServerConfig {
        bind_addr: SocketAddr::from((args.host, args.port)),
        cors_permissive: args.cors_permissive,
        jwt_secret: args.jwt_secret,
    };

    run_server(pool, config).await?;
    Ok(())
}
