use sqlx::{Executor, QueryBuilder, Result, Sqlite, SqlitePool};

use super::{ConditionCount, ImageInfo, ImageRecord};

/// 添加图片记录
pub async fn add_image<'c, E>(executor: E, filename: &str, condition: &str, embedding: &[u8]) -> Result<i64>
where
    E: Executor<'c, Database = Sqlite>,
{
    sqlx::query_scalar(
        r#"
        INSERT INTO image (filename, condition, embedding)
        VALUES (?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(filename)
    .bind(condition)
    .bind(embedding)
    .fetch_one(executor)
    .await
}

/// 检查文件名是否已添加
pub async fn check_filename(executor: &SqlitePool, filename: &str) -> Result<bool> {
    let count: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM image WHERE filename = ?
        "#,
    )
    .bind(filename)
    .fetch_one(executor)
    .await?;

    Ok(count > 0)
}

/// 获取全部图片记录（含向量）
pub async fn get_all_images(executor: &SqlitePool) -> Result<Vec<ImageRecord>> {
    sqlx::query_as(
        r#"
        SELECT id, filename, condition, embedding FROM image ORDER BY id
        "#,
    )
    .fetch_all(executor)
    .await
}

/// 获取全部图片信息（不含向量）
pub async fn get_all_image_info(executor: &SqlitePool) -> Result<Vec<ImageInfo>> {
    sqlx::query_as(
        r#"
        SELECT id, filename, condition FROM image ORDER BY id
        "#,
    )
    .fetch_all(executor)
    .await
}

/// 根据一组 ID 获取图片信息，返回顺序不固定，不存在的 ID 会被忽略
pub async fn get_image_infos(executor: &SqlitePool, ids: &[i64]) -> Result<Vec<ImageInfo>> {
    if ids.is_empty() {
        return Ok(vec![]);
    }

    let mut query = QueryBuilder::<Sqlite>::new("SELECT id, filename, condition FROM image WHERE id IN (");
    let mut separated = query.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");

    query.build_query_as().fetch_all(executor).await
}

/// 按病症标签统计图片数量
pub async fn count_by_condition(executor: &SqlitePool) -> Result<Vec<ConditionCount>> {
    sqlx::query_as(
        r#"
        SELECT condition, COUNT(*) AS count FROM image
        GROUP BY condition ORDER BY count DESC, condition ASC
        "#,
    )
    .fetch_all(executor)
    .await
}
