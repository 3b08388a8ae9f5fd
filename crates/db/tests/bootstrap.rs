use sqlx::PgPool;

/// Connect, migrate, verify every table exists.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    opsdeck_db::health_check(&pool).await.unwrap();

    let tables = [
        "users",
        "ideas",
        "idea_criteria",
        "idea_scores",
        "idea_comparisons",
        "roadmaps",
        "milestones",
        "features",
        "tasks",
        "campaigns",
        "customers",
        "deals",
        "activities",
        "notifications",
    ];

    for table in tables {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, 0, "{table} should start empty");
    }
}

/// Score range is enforced by the schema as well as the write path.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_score_check_constraint(pool: PgPool) {
    let user_id: i64 = sqlx::query_scalar(
        "INSERT INTO users (email, name, password_hash) VALUES ('a@b.io', 'A', 'x') RETURNING id",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    let idea_id: i64 =
        sqlx::query_scalar("INSERT INTO ideas (user_id, name) VALUES ($1, 'i') RETURNING id")
            .bind(user_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    let criterion_id: i64 = sqlx::query_scalar(
        "INSERT INTO idea_criteria (user_id, name, weight) VALUES ($1, 'c', 5) RETURNING id",
    )
    .bind(user_id)
    .fetch_one(&pool)
    .await
    .unwrap();

    let result = sqlx::query(
        "INSERT INTO idea_scores (user_id, idea_id, criterion_id, score) VALUES ($1, $2, $3, 11)",
    )
    .bind(user_id)
    .bind(idea_id)
    .bind(criterion_id)
    .execute(&pool)
    .await;
    assert!(result.is_err(), "score 11 must violate ck_idea_scores_score");
}
