use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::repo::User;
use crate::profile::dto::UpdateProfileRequest;

/// Merge the provided fields into the user row, leaving the rest untouched.
pub async fn update_profile(
    db: &PgPool,
    user_id: Uuid,
    changes: &UpdateProfileRequest,
) -> anyhow::Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET name      = COALESCE($2, name),
            surname   = COALESCE($3, surname),
            age       = COALESCE($4, age),
            height_cm = COALESCE($5, height_cm),
            weight_kg = COALESCE($6, weight_kg)
        WHERE id = $1
        RETURNING id, email, password_hash, name, surname, age, height_cm, weight_kg, created_at
        "#,
    )
    .bind(user_id)
    .bind(changes.name.as_deref().map(str::trim))
    .bind(changes.surname.as_deref().map(str::trim))
    .bind(changes.age)
    .bind(changes.height_cm)
    .bind(changes.weight_kg)
    .fetch_optional(db)
    .await?;
    Ok(user)
}
