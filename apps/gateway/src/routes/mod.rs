use actix_web::web;

pub mod health;
pub mod proxy;

/// Local endpoints. Everything else falls through to `proxy::forward`, which
/// `build_app` installs as the default service.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(health::configure_routes);
}
