use serde_json::Value;
use uuid::Uuid;

use crate::db::DbPool;

/// Best-effort audit trail. A failed insert is logged and swallowed here so
/// a broken audit table never fails the request that triggered it.
pub async fn log_audit(
    pool: &DbPool,
    user_id: Option<Uuid>,
    action: &str,
    resource: Option<&str>,
    metadata: Option<Value>,
) {
    let result = sqlx::query(
        r#"
        INSERT INTO audit_logs (id, user_id, action, resource, metadata)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(action)
    .bind(resource)
    .bind(metadata)
    .execute(pool)
    .await;

    if let Err(err) = result {
        tracing::warn!(error = %err, action, "audit log failed");
    }
}
