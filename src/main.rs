use std::{process, sync::Arc};

use mostinger::{
    application::{
        engagement::EngagementService,
        error::AppError,
        feed::{FeedService, PageLimits},
        posts::PostService,
        repos::{CommentsRepo, EngagementRepo, PostsRepo, PostsWriteRepo, UsersRepo},
    },
    cache::{CacheConfig, CacheStore, CacheTrigger, FeedCache, MemoryCacheStore, RedisCacheStore},
    config,
    infra::{db::PostgresRepositories, error::InfraError, http, telemetry},
};
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Migrate(_) => run_migrate(settings).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;
    let state = build_application_state(repositories, &settings).await?;

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(addr = %settings.server.addr, "mostinger listening");

    let router = http::build_router(state);
    axum::serve(listener, router.into_make_service())
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    Ok(())
}

async fn run_migrate(settings: config::Settings) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;
    repositories
        .health_check()
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    info!("migrations applied");
    Ok(())
}

async fn init_repositories(
    settings: &config::Settings,
) -> Result<Arc<PostgresRepositories>, AppError> {
    let database_url = settings
        .database
        .url
        .as_ref()
        .ok_or_else(|| InfraError::configuration("database url is not configured"))
        .map_err(AppError::from)?;

    let pool = PostgresRepositories::connect(database_url, settings.database.max_connections.get())
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    Ok(Arc::new(PostgresRepositories::new(pool)))
}

async fn init_cache(settings: &config::Settings) -> Result<Arc<FeedCache>, AppError> {
    let cache_config = CacheConfig::from(&settings.cache);

    let store: Arc<dyn CacheStore> = match cache_config.url.as_deref() {
        Some(url) => {
            let store = RedisCacheStore::connect(url)
                .await
                .map_err(|err| AppError::from(InfraError::cache(err.to_string())))?;
            info!(url, "feed cache backed by redis");
            Arc::new(store)
        }
        None => {
            info!("feed cache backed by in-process store");
            Arc::new(MemoryCacheStore::new())
        }
    };

    Ok(Arc::new(FeedCache::new(
        store,
        cache_config.ttl(),
        cache_config.enabled,
    )))
}

async fn build_application_state(
    repositories: Arc<PostgresRepositories>,
    settings: &config::Settings,
) -> Result<http::ApiState, AppError> {
    let cache = init_cache(settings).await?;
    let trigger = Arc::new(CacheTrigger::new(cache.clone()));

    let limits = PageLimits {
        default_page_size: settings.pagination.default_page_size.get(),
        max_page_size: settings.pagination.max_page_size.get(),
    };

    let posts_repo: Arc<dyn PostsRepo> = repositories.clone();
    let posts_write_repo: Arc<dyn PostsWriteRepo> = repositories.clone();
    let engagement_repo: Arc<dyn EngagementRepo> = repositories.clone();
    let comments_repo: Arc<dyn CommentsRepo> = repositories.clone();
    let users_repo: Arc<dyn UsersRepo> = repositories.clone();

    let feed = Arc::new(FeedService::new(posts_repo.clone(), cache, limits));
    let posts = Arc::new(PostService::new(
        posts_repo.clone(),
        posts_write_repo,
        trigger.clone(),
    ));
    let engagement = Arc::new(EngagementService::new(
        posts_repo,
        engagement_repo,
        comments_repo,
        users_repo,
        trigger,
        limits,
    ));

    Ok(http::ApiState {
        feed,
        posts,
        engagement,
    })
}
