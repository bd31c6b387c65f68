use chrono::{NaiveDate, NaiveDateTime, Utc};
use rusqlite::{params, Connection};

use crate::models::{Booking, BookingStatus};

// ── Bookings ──

pub fn insert_booking(conn: &Connection, booking: &Booking) -> anyhow::Result<()> {
    let date = booking.date.format("%Y-%m-%d").to_string();
    let created_at = booking.created_at.format("%Y-%m-%d %H:%M:%S").to_string();
    let updated_at = booking.updated_at.format("%Y-%m-%d %H:%M:%S").to_string();

    conn.execute(
        "INSERT INTO bookings (id, customer_name, customer_email, customer_phone, customer_whatsapp, workspace_type, date, time_slot, duration, total_price, status, confirmation_code, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        params![
            booking.id,
            booking.customer_name,
            booking.customer_email,
            booking.customer_phone,
            booking.customer_whatsapp,
            booking.workspace_type,
            date,
            booking.time_slot,
            booking.duration,
            booking.total_price,
            booking.status.as_str(),
            booking.confirmation_code,
            created_at,
            updated_at,
        ],
    )?;
    Ok(())
}

pub fn get_booking_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<Booking>> {
    let result = conn.query_row(
        "SELECT id, customer_name, customer_email, customer_phone, customer_whatsapp, workspace_type, date, time_slot, duration, total_price, status, confirmation_code, created_at, updated_at \
         FROM bookings WHERE id = ?1",
        params![id],
        |row| Ok(parse_booking_row(row)),
    );

    match result {
        Ok(booking) => Ok(Some(booking?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_bookings(
    conn: &Connection,
    status_filter: Option<&str>,
    limit: i64,
) -> anyhow::Result<Vec<Booking>> {
    let (sql, params_vec): (String, Vec<Box<dyn rusqlite::types::ToSql>>) = match status_filter {
        Some(status) => (
            "SELECT id, customer_name, customer_email, customer_phone, customer_whatsapp, workspace_type, date, time_slot, duration, total_price, status, confirmation_code, created_at, updated_at \
             FROM bookings WHERE status = ?1 ORDER BY created_at DESC LIMIT ?2"
                .to_string(),
            vec![
                Box::new(status.to_string()) as Box<dyn rusqlite::types::ToSql>,
                Box::new(limit),
            ],
        ),
        None => (
            "SELECT id, customer_name, customer_email, customer_phone, customer_whatsapp, workspace_type, date, time_slot, duration, total_price, status, confirmation_code, created_at, updated_at \
             FROM bookings ORDER BY created_at DESC LIMIT ?1"
                .to_string(),
            vec![Box::new(limit) as Box<dyn rusqlite::types::ToSql>],
        ),
    };

    let mut stmt = conn.prepare(&sql)?;
    let params_refs: Vec<&dyn rusqlite::types::ToSql> =
        params_vec.iter().map(|p| p.as_ref()).collect();
    let rows = stmt.query_map(params_refs.as_slice(), |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

pub fn update_booking_status(
    conn: &Connection,
    id: &str,
    status: &BookingStatus,
) -> anyhow::Result<bool> {
    let now = Utc::now()
        .naive_utc()
        .format("%Y-%m-%d %H:%M:%S")
        .to_string();
    let count = conn.execute(
        "UPDATE bookings SET status = ?1, updated_at = ?2 WHERE id = ?3",
        params![status.as_str(), now, id],
    )?;
    Ok(count > 0)
}

pub fn update_booking_code(
    conn: &Connection,
    id: &str,
    status: &BookingStatus,
    code: &str,
) -> anyhow::Result<bool> {
    let now = Utc::now()
        .naive_utc()
        .format("%Y-%m-%d %H:%M:%S")
        .to_string();
    let count = conn.execute(
        "UPDATE bookings SET status = ?1, confirmation_code = ?2, updated_at = ?3 WHERE id = ?4",
        params![status.as_str(), code, now, id],
    )?;
    Ok(count > 0)
}

pub fn get_dashboard_stats(conn: &Connection) -> anyhow::Result<DashboardStats> {
    let total_bookings: i64 = conn
        .query_row("SELECT COUNT(*) FROM bookings", [], |row| row.get(0))
        .unwrap_or(0);

    let pending_count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM bookings WHERE status = 'pending'",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);

    let confirmed_revenue: f64 = conn
        .query_row(
            "SELECT COALESCE(SUM(total_price), 0) FROM bookings WHERE status = 'confirmed'",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0.0);

    // Rough stand-in until a real membership table exists: 70% of all bookings.
    let active_members = total_bookings * 7 / 10;

    Ok(DashboardStats {
        total_bookings,
        pending_count,
        confirmed_revenue,
        active_members,
    })
}

pub struct DashboardStats {
    pub total_bookings: i64,
    pub pending_count: i64,
    pub confirmed_revenue: f64,
    pub active_members: i64,
}

fn parse_booking_row(row: &rusqlite::Row) -> anyhow::Result<Booking> {
    let id: String = row.get(0)?;
    let customer_name: String = row.get(1)?;
    let customer_email: String = row.get(2)?;
    let customer_phone: String = row.get(3)?;
    let customer_whatsapp: Option<String> = row.get(4)?;
    let workspace_type: String = row.get(5)?;
    let date_str: String = row.get(6)?;
    let time_slot: String = row.get(7)?;
    let duration: i64 = row.get(8)?;
    let total_price: f64 = row.get(9)?;
    let status_str: String = row.get(10)?;
    let confirmation_code: Option<String> = row.get(11)?;
    let created_at_str: String = row.get(12)?;
    let updated_at_str: String = row.get(13)?;

    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
        .unwrap_or_else(|_| Utc::now().date_naive());
    let created_at = NaiveDateTime::parse_from_str(&created_at_str, "%Y-%m-%d %H:%M:%S")
        .unwrap_or_else(|_| Utc::now().naive_utc());
    let updated_at = NaiveDateTime::parse_from_str(&updated_at_str, "%Y-%m-%d %H:%M:%S")
        .unwrap_or_else(|_| Utc::now().naive_utc());

    Ok(Booking {
        id,
        customer_name,
        customer_email,
        customer_phone,
        customer_whatsapp,
        workspace_type,
        date,
        time_slot,
        duration,
        total_price,
        status: BookingStatus::parse(&status_str),
        confirmation_code,
        created_at,
        updated_at,
    })
}

// ── Settings ──

pub fn get_setting(conn: &Connection, key: &str, default: &str) -> anyhow::Result<String> {
    let result = conn.query_row(
        "SELECT value FROM settings WHERE key = ?1",
        params![key],
        |row| row.get::<_, String>(0),
    );

    match result {
        Ok(value) => Ok(value),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(default.to_string()),
        Err(e) => Err(e.into()),
    }
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO settings (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
         ON CONFLICT(key) DO UPDATE SET
           value = excluded.value,
           updated_at = datetime('now')",
        params![key, value],
    )?;
    Ok(())
}
