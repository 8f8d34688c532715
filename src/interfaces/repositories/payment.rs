use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    entities::payment::{Payment, PaymentInsert, PaymentStatus, Settlement},
    errors::AppError,
    repositories::sqlx_repo::SqlxPaymentRepo,
};

pub const SUPERSEDED: &str = "superseded";

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Records a pending attempt and marks older pending attempts for the
    /// same account and album as superseded, atomically.
    async fn create_pending(&self, payment: &PaymentInsert) -> Result<Payment, AppError>;
    async fn find_by_reference(&self, reference: &str) -> Result<Option<Payment>, AppError>;
    /// Moves a pending payment to its terminal state. A success also marks the
    /// album paid and adds the payer to its access set in the same transaction.
    /// Returns `None` when the payment was no longer pending.
    async fn settle(&self, reference: &str, settlement: &Settlement) -> Result<Option<Payment>, AppError>;
    async fn list_for_user(&self, user_id: &Uuid) -> Result<Vec<Payment>, AppError>;
    async fn list_all(&self, status: Option<PaymentStatus>) -> Result<Vec<Payment>, AppError>;
}

impl SqlxPaymentRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxPaymentRepo { pool }
    }
}

#[async_trait]
impl PaymentRepository for SqlxPaymentRepo {
    async fn create_pending(&self, payment: &PaymentInsert) -> Result<Payment, AppError> {
        let mut tx = self.pool.begin().await?;

        let superseded = sqlx::query(
            r#"
            UPDATE payments
            SET status = 'failed', gateway_response = $3, updated_at = NOW()
            WHERE user_id = $1 AND album_id = $2 AND status = 'pending'
            "#,
        )
        .bind(payment.user_id)
        .bind(payment.album_id)
        .bind(SUPERSEDED)
        .execute(&mut *tx)
        .await?;

        if superseded.rows_affected() > 0 {
            tracing::info!(
                user_id = %payment.user_id,
                album_id = %payment.album_id,
                count = superseded.rows_affected(),
                "Superseded older pending payments"
            );
        }

        let created = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (user_id, album_id, reference, amount_minor, currency, status)
            VALUES ($1, $2, $3, $4, $5, 'pending')
            RETURNING *
            "#,
        )
        .bind(payment.user_id)
        .bind(payment.album_id)
        .bind(&payment.reference)
        .bind(payment.amount_minor)
        .bind(&payment.currency)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(created)
    }

    async fn find_by_reference(&self, reference: &str) -> Result<Option<Payment>, AppError> {
        sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE reference = $1")
            .bind(reference)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn settle(&self, reference: &str, settlement: &Settlement) -> Result<Option<Payment>, AppError> {
        let mut tx = self.pool.begin().await?;

        // the status guard is the idempotency point: only one caller can win the transition
        let updated = match settlement {
            Settlement::Success { amount_minor, channel, paid_at, gateway_response } => {
                sqlx::query_as::<_, Payment>(
                    r#"
                    UPDATE payments SET
                        status = 'success',
                        amount_minor = $2,
                        channel = $3,
                        paid_at = $4,
                        gateway_response = $5,
                        updated_at = NOW()
                    WHERE reference = $1 AND status = 'pending'
                    RETURNING *
                    "#,
                )
                .bind(reference)
                .bind(amount_minor)
                .bind(channel)
                .bind(paid_at)
                .bind(gateway_response)
                .fetch_optional(&mut *tx)
                .await?
            }
            Settlement::Failed { gateway_response } => {
                sqlx::query_as::<_, Payment>(
                    r#"
                    UPDATE payments SET
                        status = 'failed',
                        gateway_response = $2,
                        updated_at = NOW()
                    WHERE reference = $1 AND status = 'pending'
                    RETURNING *
                    "#,
                )
                .bind(reference)
                .bind(gateway_response)
                .fetch_optional(&mut *tx)
                .await?
            }
        };

        let Some(payment) = updated else {
            tx.rollback().await?;
            return Ok(None);
        };

        if let (PaymentStatus::Success, Some(album_id)) = (payment.status, payment.album_id) {
            sqlx::query("UPDATE albums SET paid = TRUE, updated_at = NOW() WHERE id = $1")
                .bind(album_id)
                .execute(&mut *tx)
                .await?;

            sqlx::query(
                r#"
                INSERT INTO album_access (album_id, user_id)
                VALUES ($1, $2)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(album_id)
            .bind(payment.user_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(Some(payment))
    }

    async fn list_for_user(&self, user_id: &Uuid) -> Result<Vec<Payment>, AppError> {
        sqlx::query_as::<_, Payment>(
            "SELECT * FROM payments WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn list_all(&self, status: Option<PaymentStatus>) -> Result<Vec<Payment>, AppError> {
        sqlx::query_as::<_, Payment>(
            r#"
            SELECT * FROM payments
            WHERE ($1::text IS NULL OR status = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }
}
