//! Table definitions created at startup

/// Session token records
///
/// `token` is ASCII so the unique index fits the key length limit. Its width
/// is `MAX_TOKEN_LENGTH`; the issuer refuses anything longer. Record IDs
/// compare bytewise so same-second sessions order by their v7 ID.
pub const CREATE_TOKENS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS tokens (
        id CHAR(36) CHARACTER SET ascii COLLATE ascii_bin NOT NULL PRIMARY KEY,
        user_id CHAR(36) NOT NULL,
        token VARCHAR(2048) CHARACTER SET ascii NOT NULL,
        expires_at DATETIME NOT NULL,
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
        UNIQUE KEY uq_tokens_token (token),
        KEY idx_tokens_user_active (user_id, is_active),
        KEY idx_tokens_active_expiry (is_active, expires_at)
    ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4
"#;

/// User accounts read by the login flow
pub const CREATE_USERS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id CHAR(36) NOT NULL PRIMARY KEY,
        username VARCHAR(64) NOT NULL,
        email VARCHAR(255) NOT NULL,
        password_hash VARCHAR(255) NOT NULL,
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
        UNIQUE KEY uq_users_email (email)
    ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4
"#;

/// Statements run by [`super::DatabasePool::ensure_schema`], in order
pub const SCHEMA: &[(&str, &str)] = &[
    ("users", CREATE_USERS_TABLE),
    ("tokens", CREATE_TOKENS_TABLE),
];
