use log::{debug, trace};
use pfg_common::Amount;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::{
    db::sqlite::SqliteDatabaseError,
    db_types::{NewOrder, NotificationFields, NotificationUpdate, Order, PaymentId},
};

const ORDER_COLUMNS: &str = "id, m_payment_id, pf_payment_id, payment_status, item_name, item_description, \
                             amount_gross, amount_fee, amount_net, custom_str1, custom_str2, custom_str3, custom_str4, \
                             custom_str5, custom_int1, custom_int2, custom_int3, custom_int4, custom_int5, name_first, \
                             name_last, email_address, merchant_id, signature, request_ip, debug_info, trusted, \
                             created_at, updated_at";

/// Returns the order with the given merchant payment id, if it exists
pub async fn fetch_order_by_payment_id(
    payment_id: &PaymentId,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, SqliteDatabaseError> {
    let order = sqlx::query_as::<_, Order>(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE m_payment_id = $1"))
        .bind(payment_id)
        .fetch_optional(conn)
        .await?;
    Ok(order)
}

/// Returns the order that holds the given gateway transaction id, if any
pub async fn fetch_order_by_pf_payment_id(
    pf_payment_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, SqliteDatabaseError> {
    let order = sqlx::query_as::<_, Order>(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE pf_payment_id = $1"))
        .bind(pf_payment_id)
        .fetch_optional(conn)
        .await?;
    Ok(order)
}

pub async fn fetch_order_by_id(id: i64, conn: &mut SqliteConnection) -> Result<Option<Order>, SqliteDatabaseError> {
    let order = sqlx::query_as::<_, Order>(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"))
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(order)
}

/// Inserts a new order into the database using the given connection. This is not atomic. You can embed this call
/// inside a transaction if you need to ensure atomicity, and pass `&mut *tx` as the connection argument.
///
/// An order without a payment id gets its row id as payment id.
pub async fn insert_order(order: NewOrder, conn: &mut SqliteConnection) -> Result<Order, SqliteDatabaseError> {
    let sql = "INSERT INTO orders (m_payment_id, amount_gross) VALUES ($1, $2) RETURNING id";
    let result = sqlx::query_scalar::<_, i64>(sql)
        .bind(order.m_payment_id.as_ref())
        .bind(order.amount_gross)
        .fetch_one(&mut *conn)
        .await;
    let id = match (result, order.m_payment_id) {
        (Ok(id), _) => id,
        (Err(sqlx::Error::Database(e)), Some(payment_id)) if e.is_unique_violation() => {
            return Err(SqliteDatabaseError::DuplicateOrder(payment_id));
        },
        (Err(e), _) => return Err(e.into()),
    };
    sqlx::query("UPDATE orders SET m_payment_id = CAST(id AS TEXT) WHERE id = $1 AND m_payment_id IS NULL")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    let order = fetch_order_by_id(id, conn).await?.ok_or(SqliteDatabaseError::OrderVanished(id))?;
    debug!("🗃️ Order {} has been saved in the DB with id {id}", order.m_payment_id);
    Ok(order)
}

pub async fn update_amount(
    payment_id: &PaymentId,
    amount: Option<Amount>,
    conn: &mut SqliteConnection,
) -> Result<(), SqliteDatabaseError> {
    let result = sqlx::query("UPDATE orders SET amount_gross = $1, updated_at = CURRENT_TIMESTAMP WHERE m_payment_id = $2")
        .bind(amount)
        .bind(payment_id)
        .execute(conn)
        .await?;
    if result.rows_affected() == 0 {
        return Err(SqliteDatabaseError::OrderNotFound(payment_id.clone()));
    }
    trace!("🗃️ Amount for order {payment_id} updated to {amount:?}");
    Ok(())
}

/// Writes the outcome of a notification to the order and returns the updated order.
///
/// The trust flag, request IP and debug payload are always written. The notification fields are only written if the
/// update carries them, in which case every one of them is overwritten.
pub async fn update_notification(
    payment_id: &PaymentId,
    update: NotificationUpdate,
    conn: &mut SqliteConnection,
) -> Result<Order, SqliteDatabaseError> {
    let mut builder = QueryBuilder::<Sqlite>::new("UPDATE orders SET updated_at = CURRENT_TIMESTAMP, request_ip = ");
    builder.push_bind(update.request_ip);
    builder.push(", debug_info = ");
    builder.push_bind(update.debug_info);
    builder.push(", trusted = ");
    builder.push_bind(update.trusted.as_option());
    if let Some(fields) = update.fields {
        push_notification_fields(&mut builder, fields);
    }
    builder.push(" WHERE m_payment_id = ");
    builder.push_bind(payment_id.clone());
    builder.push(format!(" RETURNING {ORDER_COLUMNS}"));
    trace!("🗃️ Executing query: {}", builder.sql());
    let order = builder
        .build_query_as::<Order>()
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| SqliteDatabaseError::OrderNotFound(payment_id.clone()))?;
    debug!("🗃️ Order {payment_id} marked as {}", order.trusted);
    Ok(order)
}

fn push_notification_fields(builder: &mut QueryBuilder<'_, Sqlite>, fields: NotificationFields) {
    let NotificationFields {
        pf_payment_id,
        payment_status,
        item_name,
        item_description,
        amount_gross,
        amount_fee,
        amount_net,
        custom_str1,
        custom_str2,
        custom_str3,
        custom_str4,
        custom_str5,
        custom_int1,
        custom_int2,
        custom_int3,
        custom_int4,
        custom_int5,
        name_first,
        name_last,
        email_address,
        merchant_id,
        signature,
    } = fields;
    let text = [
        ("pf_payment_id", pf_payment_id),
        ("payment_status", payment_status),
        ("item_name", item_name),
        ("item_description", item_description),
        ("custom_str1", custom_str1),
        ("custom_str2", custom_str2),
        ("custom_str3", custom_str3),
        ("custom_str4", custom_str4),
        ("custom_str5", custom_str5),
        ("name_first", name_first),
        ("name_last", name_last),
        ("email_address", email_address),
        ("merchant_id", merchant_id),
        ("signature", signature),
    ];
    for (column, value) in text {
        builder.push(format!(", {column} = "));
        builder.push_bind(value);
    }
    for (column, value) in [("amount_gross", amount_gross), ("amount_fee", amount_fee), ("amount_net", amount_net)] {
        builder.push(format!(", {column} = "));
        builder.push_bind(value);
    }
    let integers = [
        ("custom_int1", custom_int1),
        ("custom_int2", custom_int2),
        ("custom_int3", custom_int3),
        ("custom_int4", custom_int4),
        ("custom_int5", custom_int5),
    ];
    for (column, value) in integers {
        builder.push(format!(", {column} = "));
        builder.push_bind(value);
    }
}
