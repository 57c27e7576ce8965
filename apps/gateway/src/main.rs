use actix_web::{web, HttpServer};
use gateway::config::gateway::GatewayConfig;
use gateway::state::builder::build_state;
use gateway::build_app;
use tracing::{error, info};

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment:
    // - Docker: Set via docker-compose env_file or docker run --env-file
    // - Local dev: Source env files manually (e.g., set -a; . ./.env; set +a)
    let config = match GatewayConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid gateway configuration");
            std::process::exit(1);
        }
    };
    let (host, port) = (config.host.clone(), config.port);

    let app_state = match build_state().with_config(config).build() {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "failed to build application state");
            std::process::exit(1);
        }
    };

    for route in app_state.dispatcher.routes().iter() {
        info!(
            route = %route.name,
            prefix = %route.path_prefix,
            target = %route.target_address,
            requires_auth = route.requires_auth,
            "route registered"
        );
    }

    let data = web::Data::new(app_state);

    info!(%host, port, "API gateway listening");

    HttpServer::new(move || build_app(data.clone()))
        .bind((host.as_str(), port))?
        .run()
        .await
}
