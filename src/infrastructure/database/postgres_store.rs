use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{CredentialStore, DeviceType, LoginEvent, OtpChallenge, UserCredential};

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    phone: Option<String>,
    secret: String,
    otp_code: Option<String>,
    otp_expires_at: Option<DateTime<Utc>>,
    last_password_reset_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct LoginEventRow {
    ip: String,
    browser: String,
    os: String,
    device_type: String,
    occurred_at: DateTime<Utc>,
}

impl UserRow {
    fn into_credential(self, history: Vec<LoginEvent>) -> Result<UserCredential> {
        // ---
        // The two challenge columns are set and cleared together; a row
        // with only one of them is corrupt.
        let active_challenge = match (self.otp_code, self.otp_expires_at) {
            (Some(code), Some(expires_at)) => Some(OtpChallenge { code, expires_at }),
            (None, None) => None,
            _ => return Err(anyhow!("inconsistent challenge state for user {}", self.id)),
        };

        Ok(UserCredential {
            id: self.id,
            name: self.name,
            identifier: self.email,
            phone: self.phone,
            secret: self.secret,
            active_challenge,
            last_password_reset_at: self.last_password_reset_at,
            login_history: history,
            created_at: self.created_at,
        })
    }
}

fn parse_device_type(raw: &str) -> DeviceType {
    // ---
    match raw {
        "Mobile" => DeviceType::Mobile,
        _ => DeviceType::Desktop,
    }
}

pub struct PostgresCredentialStore {
    // ---
    pool: PgPool,
}

impl PostgresCredentialStore {
    // ---
    pub fn new(pool: PgPool) -> Self {
        // ---
        Self { pool }
    }

    async fn load_history(&self, user_id: Uuid) -> Result<Vec<LoginEvent>> {
        // ---
        let rows = sqlx::query_as::<_, LoginEventRow>(
            "SELECT ip, browser, os, device_type, occurred_at
             FROM login_events WHERE user_id = $1 ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| LoginEvent {
                ip: r.ip,
                browser: r.browser,
                os: r.os,
                device_type: parse_device_type(&r.device_type),
                occurred_at: r.occurred_at,
            })
            .collect())
    }
}

#[async_trait::async_trait]
impl CredentialStore for PostgresCredentialStore {
    // ---
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<UserCredential>> {
        // ---
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, email, phone, secret, otp_code, otp_expires_at,
                    last_password_reset_at, created_at
             FROM users WHERE email = $1 OR phone = $1",
        )
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let history = self.load_history(row.id).await?;
        Ok(Some(row.into_credential(history)?))
    }

    async fn create(&self, user: UserCredential) -> Result<()> {
        // ---
        sqlx::query(
            "INSERT INTO users (id, name, email, phone, secret, created_at)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.identifier)
        .bind(&user.phone)
        .bind(&user.secret)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn save(&self, user: &UserCredential) -> Result<()> {
        // ---
        let mut tx = self.pool.begin().await?;

        let (code, expires_at) = match &user.active_challenge {
            Some(c) => (Some(c.code.as_str()), Some(c.expires_at)),
            None => (None, None),
        };

        sqlx::query(
            "INSERT INTO users (id, name, email, phone, secret, otp_code, otp_expires_at,
                                last_password_reset_at, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             ON CONFLICT (id) DO UPDATE SET
                 name = EXCLUDED.name,
                 email = EXCLUDED.email,
                 phone = EXCLUDED.phone,
                 secret = EXCLUDED.secret,
                 otp_code = EXCLUDED.otp_code,
                 otp_expires_at = EXCLUDED.otp_expires_at,
                 last_password_reset_at = EXCLUDED.last_password_reset_at",
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.identifier)
        .bind(&user.phone)
        .bind(&user.secret)
        .bind(code)
        .bind(expires_at)
        .bind(user.last_password_reset_at)
        .bind(user.created_at)
        .execute(&mut *tx)
        .await?;

        // History is append-only: persist only the tail beyond what the
        // table already holds, never rewrite existing rows.
        let (persisted,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM login_events WHERE user_id = $1")
                .bind(user.id)
                .fetch_one(&mut *tx)
                .await?;

        for event in user.login_history.iter().skip(persisted as usize) {
            sqlx::query(
                "INSERT INTO login_events (user_id, ip, browser, os, device_type, occurred_at)
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(user.id)
            .bind(&event.ip)
            .bind(&event.browser)
            .bind(&event.os)
            .bind(event.device_type.as_str())
            .bind(event.occurred_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }
}
