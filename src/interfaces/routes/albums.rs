use actix_web::web;

use crate::handlers::{albums, archive, selections};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/albums")
            .service(
                web::resource("")
                    .route(web::get().to(albums::list_albums))
            )
            .service(
                web::resource("/{album_id}")
                    .route(web::get().to(albums::get_album))
            )
            .service(
                web::resource("/{album_id}/download")
                    .route(web::get().to(archive::download_archive))
            )
            .service(
                web::resource("/{album_id}/selection")
                    .route(web::get().to(selections::get_selection))
                    .route(web::put().to(selections::save_selection))
            )
            .service(
                web::resource("/{album_id}/images/{image_id}/original")
                    .route(web::get().to(albums::download_image))
            )
    );
}
