use super::*;

impl PostgresUserRepository {
    pub(super) async fn create_impl(&self, user: &UserRecord) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, full_name, email, designation, department, password_hash, scores)
            VALUES ($1, $2, LOWER($3), $4, $5, $6, $7)
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(user.full_name.as_str())
        .bind(user.email.as_str())
        .bind(user.designation.as_str())
        .bind(user.department.as_deref())
        .bind(user.password_hash.as_str())
        .bind(scores_to_json(&user.scores))
        .execute(&self.pool)
        .await
        .map_err(|error| email_conflict_or_internal(error, "create user"))?;

        Ok(())
    }

    pub(super) async fn update_impl(&self, user: &UserRecord) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET full_name = $2,
                email = LOWER($3),
                designation = $4,
                department = $5,
                password_hash = $6,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(user.full_name.as_str())
        .bind(user.email.as_str())
        .bind(user.designation.as_str())
        .bind(user.department.as_deref())
        .bind(user.password_hash.as_str())
        .execute(&self.pool)
        .await
        .map_err(|error| email_conflict_or_internal(error, "update user"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("user '{}' not found", user.id)));
        }

        Ok(())
    }

    pub(super) async fn set_score_impl(
        &self,
        user_id: UserId,
        field: ScoreField,
        value: u32,
    ) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET scores = jsonb_set(scores, ARRAY[$2::TEXT], to_jsonb($3::BIGINT), true),
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(field.as_str())
        .bind(i64::from(value))
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to store score: {error}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("user '{user_id}' not found")));
        }

        Ok(())
    }
}
