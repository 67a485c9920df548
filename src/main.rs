use todoapp::{
    application::{tasks_repository::DefaultTasksRepository, tasks_service::TasksServiceImpl},
    config::AppConfig,
    domain::{data_source::TasksDataSource, source::Source},
    http,
    infrastructure::{memory_source::InMemoryTasksDataSource, sqlite_source::SqliteTasksDataSource},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env()?;
    let local = SqliteTasksDataSource::connect(&config.database_url).await?;
    local.init().await?;
    // the in-process remote is volatile; start it from what was persisted so the
    // first remote load does not wipe the local store
    let persisted = local.get_tasks().await.into_result()?;
    tracing::info!(count = persisted.len(), "seeding remote from local store");
    let remote = InMemoryTasksDataSource::with_tasks(Source::Remote, persisted).with_latency(config.remote_latency);
    let repo = DefaultTasksRepository::new(remote, local);
    let router = http::app(TasksServiceImpl::new(repo));

    let addr = config.bind_addr;
    tracing::info!(%addr, database_url = %config.database_url, "listening");
    axum::serve(tokio::net::TcpListener::bind(addr).await?, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal::ctrl_c;
    let _ = ctrl_c().await;
    tracing::info!("shutdown");
}
