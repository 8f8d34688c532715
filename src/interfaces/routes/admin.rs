use actix_web::web;

use crate::handlers::{albums, images, payments, selections, users};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .service(
                web::resource("/users")
                    .route(web::get().to(users::list_users))
            )
            .service(
                web::resource("/users/{user_id}")
                    .route(web::get().to(users::get_user))
            )
            .service(
                web::resource("/payments")
                    .route(web::get().to(payments::list_all_payments))
            )
            .service(
                web::resource("/albums")
                    .route(web::get().to(albums::list_all_albums))
                    .route(web::post().to(albums::create_album))
            )
            .service(
                web::resource("/albums/{album_id}")
                    .route(web::get().to(albums::get_album_detail))
                    .route(web::patch().to(albums::update_album))
                    .route(web::delete().to(albums::delete_album))
            )
            .service(
                web::resource("/albums/{album_id}/access")
                    .route(web::post().to(albums::grant_access))
            )
            .service(
                web::resource("/albums/{album_id}/access/{user_id}")
                    .route(web::delete().to(albums::revoke_access))
            )
            .service(
                web::resource("/albums/{album_id}/images")
                    .route(web::post().to(images::upload_images))
                    .route(web::delete().to(images::delete_images))
            )
            .service(
                web::resource("/albums/{album_id}/images/visibility")
                    .route(web::patch().to(images::set_image_visibility))
            )
            .service(
                web::resource("/albums/{album_id}/selections")
                    .route(web::get().to(selections::list_album_selections))
            )
    );
}
