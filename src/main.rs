use actix_web::{web, App, HttpServer};
use finsys::app::{self, AppServices};
use finsys::config::Config;
use finsys::middleware::{json_config, ErrorHandler, RequestId};
use finsys::modules::health;
use tracing_actix_web::TracingLogger;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env()?;
    config.validate()?;

    app::init_tracing(&config.app);

    tracing::info!("Starting finsys");
    tracing::info!("Environment: {}", config.app.env);
    tracing::info!("Server binding to: {}", config.server.bind_address());

    // Create database connection pool
    let db_pool = config.database.create_pool().await?;

    tracing::info!(
        "Database pool initialized ({} connections)",
        config.database.pool_size
    );

    if config.database.run_migrations {
        config.database.migrate(&db_pool).await?;
        tracing::info!("Database migrations applied");
    }

    let services = AppServices::from_pool(db_pool.clone(), config.scheduler.clone());

    if config.scheduler.enabled {
        tokio::spawn(services.job_runner.clone().start());
    } else {
        tracing::warn!("Job runner disabled; scheduled balance updates will not be applied");
    }

    let installments = services.installments.clone();
    let accounts = services.accounts.clone();
    let scheduler = web::Data::new(config.scheduler.clone());

    // Start HTTP server
    let bind_address = config.server.bind_address();
    let server = HttpServer::new(move || {
        App::new()
            .wrap(ErrorHandler)
            .wrap(RequestId)
            .wrap(TracingLogger::default())
            .app_data(json_config())
            .app_data(web::Data::new(db_pool.clone()))
            .app_data(scheduler.clone())
            .app_data(installments.clone())
            .app_data(accounts.clone())
            .configure(health::configure)
            .configure(app::configure_api)
    })
    .workers(config.server.workers)
    .bind(&bind_address)?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await?;
    Ok(())
}
