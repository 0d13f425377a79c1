use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use openlaunch_worker::PromotionJob;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "openlaunch_worker=info,openlaunch_db=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let interval = PromotionJob::interval_from_env();

    let pool = openlaunch_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    openlaunch_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database connection pool created");

    let cancel = CancellationToken::new();
    let job = PromotionJob::new(pool, interval);
    let handle = {
        let cancel = cancel.clone();
        tokio::spawn(async move { job.run(cancel).await })
    };

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
    }
    tracing::info!("Received shutdown signal");

    cancel.cancel();
    if let Err(e) = handle.await {
        tracing::error!(error = %e, "Promotion job task failed");
    }

    tracing::info!("Worker stopped");
}
