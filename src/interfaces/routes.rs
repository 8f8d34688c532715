use actix_web::web;

use crate::{
    constants::API_PREFIX,
    handlers::{albums::portfolio, home::home, system::health_check},
};

mod admin;
mod albums;
mod auth;
mod payments;
mod request_limits;
mod users;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(home);

    cfg.service(
        web::scope(API_PREFIX)
            .service(health_check)
            .service(web::resource("/portfolio").route(web::get().to(portfolio)))
            .configure(auth::config_routes)
            .configure(admin::config_routes)
            .configure(users::config_routes)
            .configure(albums::config_routes)
            .configure(payments::config_routes)
    );

    cfg.configure(request_limits::config_routes);
}
