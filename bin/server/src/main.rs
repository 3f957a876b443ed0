#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() {
    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::time::Duration;

    use axum::Router;
    use leptos::prelude::*;
    use leptos_axum::{LeptosRoutes, generate_route_list};
    use sandpiper_auth::JwtAuthenticator;
    use sandpiper_mail::ResendClient;
    use sandpiper_server::{
        api::{self, AppState, rate_limit::FixedWindowLimiter},
        app::App,
        config::ServerConfig,
        db::UserCache,
    };
    use sqlx::postgres::PgPoolOptions;
    use tower_http::services::ServeDir;
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment
    let config = Arc::new(ServerConfig::from_env().expect("failed to load configuration"));
    tracing::info!(namespace = %config.namespace, "Loaded configuration");

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.db.max_connections)
        .idle_timeout(Duration::from_secs(config.db.idle_timeout_seconds))
        .connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    // Run migrations
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("failed to run migrations");

    let mailer = Arc::new(
        ResendClient::new(
            config.mail.resend_api_key.clone(),
            config.mail.from_email.clone(),
            config.is_production(),
        )
        .expect("failed to configure mail client"),
    );

    let authenticator = Arc::new(JwtAuthenticator::new(
        &config.auth.token_secret,
        config.auth.issuer.clone(),
        chrono::Duration::hours(config.auth.token_lifetime_hours),
    ));

    let user_cache = if config.redis.enabled {
        let cache = UserCache::new(&config.redis.url).expect("failed to configure user cache");
        tracing::info!("User cache enabled");
        Some(cache)
    } else {
        None
    };

    let rate_limiter = FixedWindowLimiter::new(&config.rate_limit);

    let app_state = Arc::new(AppState {
        pool,
        config: Arc::clone(&config),
        mailer,
        authenticator,
        user_cache,
        rate_limiter,
    });

    let conf = get_configuration(None).expect("failed to get leptos configuration");
    let leptos_options = conf.leptos_options;
    let addr = leptos_options.site_addr;
    let routes = generate_route_list(App);

    // Combined state so both Leptos and API handlers find what they need
    let combined_state = CombinedState {
        leptos_options: leptos_options.clone(),
        app_state: Arc::clone(&app_state),
    };

    let app = Router::new()
        // Versioned JSON API
        .nest_service("/v1", api::router(Arc::clone(&app_state)))
        // Leptos routes
        .leptos_routes(&combined_state, routes, {
            let leptos_options = leptos_options.clone();
            move || shell(leptos_options.clone())
        })
        .fallback(leptos_axum::file_and_error_handler::<CombinedState, _>(
            shell,
        ))
        .nest_service("/pkg", ServeDir::new("target/site/pkg"))
        // Server functions read the config from request extensions
        .layer(axum::Extension(Arc::clone(&config)))
        .with_state(combined_state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind to address");

    tracing::info!("listening on http://{}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .expect("server error");
}

/// Resolves when the process receives SIGINT or SIGTERM.
#[cfg(feature = "ssr")]
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install ctrl-c handler");
    };

    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received");
}

/// Combined state for the application.
#[cfg(feature = "ssr")]
#[derive(Clone)]
struct CombinedState {
    leptos_options: leptos::prelude::LeptosOptions,
    app_state: std::sync::Arc<sandpiper_server::api::AppState>,
}

#[cfg(feature = "ssr")]
impl axum::extract::FromRef<CombinedState> for leptos::prelude::LeptosOptions {
    fn from_ref(state: &CombinedState) -> Self {
        state.leptos_options.clone()
    }
}

#[cfg(feature = "ssr")]
impl axum::extract::FromRef<CombinedState> for std::sync::Arc<sandpiper_server::api::AppState> {
    fn from_ref(state: &CombinedState) -> Self {
        state.app_state.clone()
    }
}

#[cfg(feature = "ssr")]
fn shell(options: leptos::prelude::LeptosOptions) -> impl leptos::prelude::IntoView {
    use leptos::prelude::*;
    use leptos_meta::*;
    use sandpiper_server::app::App;

    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <link rel="stylesheet" href="/pkg/sandpiper.css"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

#[cfg(not(feature = "ssr"))]
fn main() {
    // This main function is only used for WASM builds
    // The actual hydration happens in lib.rs
}
