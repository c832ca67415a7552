use std::fmt::Debug;

use log::*;
use sqlx::SqlitePool;

use super::{db_url, new_pool, orders, SqliteDatabaseError};
use crate::{
    db_types::{NewOrder, NotificationUpdate, Order, PaymentId},
    traits::{OrderManagement, OrderManagementError},
};

/// `SqliteDatabase` is the SQLite implementation of the payment engine's order store.
#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object, using the URL in `PFG_DATABASE_URL`
    pub async fn new(max_connections: u32) -> Result<Self, SqliteDatabaseError> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, SqliteDatabaseError> {
        trace!("Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Applies any outstanding schema migrations
    pub async fn migrate(&self) -> Result<(), SqliteDatabaseError> {
        sqlx::migrate!("./src/db/sqlite/migrations").run(&self.pool).await.map_err(sqlx::Error::from)?;
        info!("🗃️ Database migrations complete");
        Ok(())
    }
}

impl OrderManagement for SqliteDatabase {
    async fn fetch_order(&self, payment_id: &PaymentId) -> Result<Option<Order>, OrderManagementError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order_by_payment_id(payment_id, &mut conn).await?;
        Ok(order)
    }

    async fn fetch_order_by_pf_payment_id(&self, pf_payment_id: &str) -> Result<Option<Order>, OrderManagementError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order_by_pf_payment_id(pf_payment_id, &mut conn).await?;
        Ok(order)
    }

    async fn create_order(&self, order: NewOrder) -> Result<Order, OrderManagementError> {
        let mut tx = self.pool.begin().await?;
        let order = orders::insert_order(order, &mut tx).await?;
        tx.commit().await?;
        Ok(order)
    }

    /// In a single atomic transaction,
    /// * fetches the order with the new order's payment id,
    /// * updates its amount if it differs from the new order's amount,
    /// * or inserts the new order if it did not exist.
    async fn get_or_create_order(&self, order: NewOrder) -> Result<(Order, bool), OrderManagementError> {
        let mut tx = self.pool.begin().await?;
        let existing = match &order.m_payment_id {
            Some(payment_id) => orders::fetch_order_by_payment_id(payment_id, &mut tx).await?,
            None => None,
        };
        let result = match existing {
            Some(existing) if existing.details.amount_gross == order.amount_gross => (existing, false),
            Some(existing) => {
                debug!(
                    "🗃️ Order {} exists with amount {:?}. Updating it to {:?}",
                    existing.m_payment_id, existing.details.amount_gross, order.amount_gross
                );
                orders::update_amount(&existing.m_payment_id, order.amount_gross, &mut tx).await?;
                let updated = orders::fetch_order_by_payment_id(&existing.m_payment_id, &mut tx)
                    .await?
                    .ok_or_else(|| OrderManagementError::OrderNotFound(existing.m_payment_id.clone()))?;
                (updated, false)
            },
            None => (orders::insert_order(order, &mut tx).await?, true),
        };
        tx.commit().await?;
        Ok(result)
    }

    async fn save_notification(
        &self,
        payment_id: &PaymentId,
        update: NotificationUpdate,
    ) -> Result<Order, OrderManagementError> {
        let mut tx = self.pool.begin().await?;
        let order = orders::update_notification(payment_id, update, &mut tx).await?;
        tx.commit().await?;
        Ok(order)
    }
}
