use actix_web::web;

use crate::handlers::payments;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/payments")
            .service(
                web::resource("")
                    .route(web::get().to(payments::list_my_payments))
            )
            .service(
                web::resource("/checkout")
                    .route(web::post().to(payments::initiate_checkout))
            )
            .service(
                web::resource("/verify")
                    .route(web::post().to(payments::verify_payment))
            )
            .service(
                web::resource("/webhook")
                    .route(web::post().to(payments::payment_webhook))
            )
    );
}
