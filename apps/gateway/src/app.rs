use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App, Error};

use crate::middleware::{cors_middleware, PanicGuard, RequestTrace, StructuredLogger};
use crate::routes;
use crate::state::app_state::AppState;

/// Assemble the gateway application: middleware stack, local routes and the
/// proxy default service.
///
/// Middleware runs outermost first: `RequestTrace` assigns the trace id,
/// `StructuredLogger` records the outcome, CORS answers preflights, and
/// `PanicGuard` turns panics below it into 500s.
pub fn build_app(
    state: web::Data<AppState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    let cors = cors_middleware(&state.config.cors_allowed_origins);

    App::new()
        .wrap(PanicGuard)
        .wrap(cors)
        .wrap(StructuredLogger)
        .wrap(RequestTrace)
        .app_data(state)
        .configure(routes::configure)
        .default_service(web::to(routes::proxy::forward))
}
