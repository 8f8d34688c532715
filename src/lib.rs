mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;

pub use domain::{access, entities, use_cases};
pub use interfaces::{handlers, repositories, middlewares, routes};
pub use infrastructure::{archive, auth, db, gateway, media, utils};

use archive::zip_stream::ZipStreamer;
use auth::jwt::JwtService;
use gateway::paystack::PaystackClient;
use media::cloudinary::CloudinaryClient;
use repositories::sqlx_repo::{
    SqlxAlbumRepo, SqlxImageRepo, SqlxPaymentRepo, SqlxSelectionRepo, SqlxUserRepo,
};
use use_cases::{
    albums::AlbumHandler, archive::ArchiveHandler, auth::AuthHandler, payments::PaymentHandler,
    selections::SelectionHandler, users::UserHandler,
};

pub type AppAuthHandler = AuthHandler<SqlxUserRepo, JwtService>;
pub type AppUserHandler = UserHandler<SqlxUserRepo, SqlxAlbumRepo>;
pub type AppAlbumHandler = AlbumHandler<SqlxAlbumRepo, SqlxImageRepo, CloudinaryClient>;
pub type AppPaymentHandler = PaymentHandler<SqlxPaymentRepo, SqlxAlbumRepo, PaystackClient>;
pub type AppSelectionHandler = SelectionHandler<SqlxSelectionRepo, SqlxAlbumRepo, SqlxImageRepo>;
pub type AppArchiveHandler = ArchiveHandler<SqlxAlbumRepo, SqlxImageRepo>;

pub struct AppState {
    pub auth_handler: AppAuthHandler,
    pub user_handler: AppUserHandler,
    pub album_handler: AppAlbumHandler,
    pub payment_handler: AppPaymentHandler,
    pub selection_handler: AppSelectionHandler,
    pub archive_handler: AppArchiveHandler,
    pub zip_streamer: ZipStreamer,
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Fails when an HTTP client cannot be built.
    pub fn new(config: &settings::AppConfig, pool: sqlx::PgPool) -> anyhow::Result<Self> {
        use anyhow::Context;

        let media = CloudinaryClient::new(config).context("media store client")?;
        let gateway = PaystackClient::new(config).context("payment gateway client")?;
        let zip_streamer = ZipStreamer::new(config).context("archive fetch client")?;

        let user_repo = SqlxUserRepo::new(pool.clone());
        let album_repo = SqlxAlbumRepo::new(pool.clone());
        let image_repo = SqlxImageRepo::new(pool.clone());
        let payment_repo = SqlxPaymentRepo::new(pool.clone());
        let selection_repo = SqlxSelectionRepo::new(pool);

        Ok(AppState {
            auth_handler: AuthHandler::new(user_repo.clone(), JwtService::new(config)),
            user_handler: UserHandler::new(user_repo, album_repo.clone()),
            album_handler: AlbumHandler::new(
                album_repo.clone(),
                image_repo.clone(),
                media,
                config.media_folder.clone(),
            ),
            payment_handler: PaymentHandler::new(
                payment_repo,
                album_repo.clone(),
                gateway,
                config.payment_currency.clone(),
                config.default_album_price_minor,
                config.payment_callback_url.clone(),
            ),
            selection_handler: SelectionHandler::new(
                selection_repo,
                album_repo.clone(),
                image_repo.clone(),
            ),
            archive_handler: ArchiveHandler::new(album_repo, image_repo),
            zip_streamer,
            max_upload_bytes: config.max_upload_bytes,
        })
    }
}
