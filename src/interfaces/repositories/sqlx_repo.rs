use sqlx::PgPool;

#[derive(Clone)]
pub struct SqlxUserRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxAlbumRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxImageRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxPaymentRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxSelectionRepo {
    pub pool: PgPool,
}
