use tokio::net::TcpListener;
use todo_server::{Config, TodoRepository};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = Config::from_env()?;
    let repo = TodoRepository::in_memory().await?;
    let listener = TcpListener::bind(config.addr()).await?;
    let addr = listener.local_addr()?;

    tracing::info!("Server is running on http://{addr}");
    tracing::info!("Swagger docs: http://{addr}{}", todo_server::docs::DOCS_PATH);

    todo_server::run(listener, repo).await?;
    Ok(())
}
