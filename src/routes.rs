use crate::{
    api::{employee, leave_request},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter config
    fn build_limiter(requests_per_min: u32) -> GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap()
    }

    let login_limiter = build_limiter(config.rate_login_per_min);
    let signup_limiter = build_limiter(config.rate_signup_per_min);
    let protected_limiter = build_limiter(config.rate_protected_per_min);

    // Public routes
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(Governor::new(&login_limiter))
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/signup")
                    .wrap(Governor::new(&signup_limiter))
                    .route(web::post().to(handlers::signup)),
            ),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware))
            // authentication
            .wrap(Governor::new(&protected_limiter)) // rate limiting
            .service(
                web::scope("/leave-requests")
                    // /leave-requests
                    .service(
                        web::resource("")
                            .route(web::get().to(leave_request::list_leave_requests))
                            .route(web::post().to(leave_request::create_leave_request)),
                    )
                    // /leave-requests/mine (must precede /{id})
                    .service(
                        web::resource("/mine")
                            .route(web::get().to(leave_request::list_my_leave_requests)),
                    )
                    // /leave-requests/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(leave_request::get_leave_request))
                            .route(web::patch().to(leave_request::decide_leave_request))
                            .route(web::delete().to(leave_request::cancel_leave_request)),
                    ),
            )
            .service(
                web::resource("/leave-balance")
                    .route(web::get().to(employee::my_leave_balances)),
            )
            .service(
                web::resource("/employees").route(web::get().to(employee::list_employees)),
            ),
    );
}
