#![recursion_limit = "256"]

#[cfg(feature = "ssr")]
mod server {
    use axum::{
        body::Body as AxumBody,
        extract::State,
        http::Request,
        response::{IntoResponse, Response},
        routing::get,
        Router,
    };
    use http::{header, Method};
    use leptos::prelude::*;
    use leptos_axum::{generate_route_list, LeptosRoutes};
    use state::server::AppState;
    use tower_http::{cors::CorsLayer, trace::TraceLayer};
    use tracing::instrument;
    use tracing_subscriber::EnvFilter;

    use tournament_platform::{
        app::{shell, App},
        fallback::file_and_error_handler,
        init::{AppStateBuilder, RelayConfig},
        relay,
    };

    const DEFAULT_LOG_FILTER: &str = "info,tournament_platform=debug,tower_http=info";

    #[instrument(skip(state))]
    pub async fn leptos_routes_handler(state: State<AppState>, req: Request<AxumBody>) -> Response {
        let State(app_state) = state.clone();
        let handler = leptos_axum::render_route_with_context(
            app_state.routes.clone(),
            || {},
            move || shell(app_state.leptos_options.clone()),
        );
        handler(state, req).await.into_response()
    }

    fn init_tracing() {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    pub async fn main_impl() -> Result<(), Box<dyn std::error::Error>> {
        dotenv::dotenv().ok();
        init_tracing();

        // Fail before binding a port when the relay cannot sign.
        let config = RelayConfig::from_env()?;
        tracing::debug!(?config, "relay configuration");

        // cargo-leptos provides these through the environment; see
        // `[package.metadata.leptos]` for local defaults.
        let conf = get_configuration(None)?;
        let leptos_options = conf.leptos_options;
        let addr = leptos_options.site_addr;
        let routes = generate_route_list(App);

        let res = AppStateBuilder::new(leptos_options, routes.clone(), config)
            .build()
            .await?;

        let terminate = {
            use tokio::signal;

            let ctrl_c = async {
                signal::ctrl_c()
                    .await
                    .expect("failed to install Ctrl+C handler");
            };

            #[cfg(unix)]
            let terminate = async {
                signal::unix::signal(signal::unix::SignalKind::terminate())
                    .expect("failed to install signal handler")
                    .recv()
                    .await;
            };

            #[cfg(not(unix))]
            let terminate = std::future::pending::<()>();

            async {
                tokio::select! {
                    _ = ctrl_c => {},
                    _ = terminate => {},
                }
                tracing::info!("stopping...");
            }
        };

        let relay_routes = relay::router(res.app_state.relay.clone());

        let app = Router::new()
            .leptos_routes_with_handler(routes, get(leptos_routes_handler))
            .fallback(file_and_error_handler)
            .with_state(res.app_state)
            .merge(relay_routes)
            .layer(
                CorsLayer::new()
                    .allow_origin(res.allowed_origin)
                    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                    .allow_headers([header::CONTENT_TYPE, header::ACCEPT]),
            )
            .layer(TraceLayer::new_for_http());

        tracing::info!("listening on http://{addr}");
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(listener, app.into_make_service())
            .with_graceful_shutdown(terminate)
            .await?;
        Ok(())
    }
}

#[cfg(feature = "ssr")]
fn main() {
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("failed to start runtime: {e}");
            std::process::exit(1);
        }
    };
    runtime.block_on(async {
        if let Err(e) = server::main_impl().await {
            eprintln!("Server error: {e}");
            std::process::exit(1);
        }
    });
}

#[cfg(not(feature = "ssr"))]
fn main() {}
