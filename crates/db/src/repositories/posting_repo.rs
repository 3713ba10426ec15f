//! Repository for the `postings` table.

use joba_core::types::DbId;
use sqlx::PgPool;

use crate::models::posting::{CreatePosting, Posting, PostingListFilter, PostingSummary};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, owner_id, image_url, title, description, recruitment_field, \
    recruitment_headcount, school_specific, target_school_name, deadline, external_link, \
    views, created_at, updated_at";

/// Posting columns plus application counters, for the `postings p` alias.
const SUMMARY_SELECT: &str = "SELECT p.id, p.owner_id, p.image_url, p.title, p.description, \
        p.recruitment_field, p.recruitment_headcount, p.school_specific, \
        p.target_school_name, p.deadline, p.external_link, p.views, \
        p.created_at, p.updated_at, \
        COALESCE(ac.application_count, 0) AS application_count, \
        COALESCE(ac.recruited_count, 0) AS recruited_count \
     FROM postings p \
     LEFT JOIN ( \
        SELECT posting_id, \
               COUNT(*)::BIGINT AS application_count, \
               (COUNT(*) FILTER (WHERE status = 'accepted'))::BIGINT AS recruited_count \
        FROM applications \
        GROUP BY posting_id \
     ) ac ON ac.posting_id = p.id";

pub struct PostingRepo;

impl PostingRepo {
    /// Insert a posting owned by `owner_id`.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        image_url: &str,
        input: &CreatePosting,
    ) -> Result<Posting, sqlx::Error> {
        let query = format!(
            "INSERT INTO postings
                (owner_id, image_url, title, description, recruitment_field,
                 recruitment_headcount, school_specific, target_school_name,
                 deadline, external_link)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Posting>(&query)
            .bind(owner_id)
            .bind(image_url)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.recruitment_field.as_str())
            .bind(input.recruitment_headcount.as_str())
            .bind(input.school_specific)
            .bind(&input.target_school_name)
            .bind(input.deadline)
            .bind(&input.external_link)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Posting>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM postings WHERE id = $1");
        sqlx::query_as::<_, Posting>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a posting with its application counters.
    pub async fn find_summary(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<PostingSummary>, sqlx::Error> {
        let query = format!("{SUMMARY_SELECT} WHERE p.id = $1");
        sqlx::query_as::<_, PostingSummary>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Bump the view counter. Returns `false` if the posting does not exist.
    pub async fn increment_views(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE postings SET views = views + 1 WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Filtered, sorted page of postings plus the filtered total.
    pub async fn list(
        pool: &PgPool,
        filter: &PostingListFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<PostingSummary>, i64), sqlx::Error> {
        // Build dynamic WHERE clauses.
        let mut conditions = Vec::new();
        let mut bind_idx = 1u32;

        if filter.recruitment_field.is_some() {
            conditions.push(format!("p.recruitment_field = ${bind_idx}"));
            bind_idx += 1;
        }
        if filter.recruitment_headcount.is_some() {
            conditions.push(format!("p.recruitment_headcount = ${bind_idx}"));
            bind_idx += 1;
        }
        if filter.school_name.is_some() {
            conditions.push(format!(
                "(p.target_school_name = ${bind_idx} \
                  OR p.title ILIKE '%' || ${bind_idx} || '%' \
                  OR p.description ILIKE '%' || ${bind_idx} || '%')"
            ));
            bind_idx += 1;
        }
        if filter.deadline_before.is_some() {
            conditions.push(format!("p.deadline <= ${bind_idx}"));
            bind_idx += 1;
        }
        if filter.q.is_some() {
            conditions.push(format!(
                "(p.title ILIKE '%' || ${bind_idx} || '%' \
                  OR p.description ILIKE '%' || ${bind_idx} || '%')"
            ));
            bind_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_query = format!("SELECT COUNT(*)::BIGINT FROM postings p {where_clause}");
        let list_query = format!(
            "{SUMMARY_SELECT} {where_clause} ORDER BY {order} LIMIT ${bind_idx} OFFSET ${next_idx}",
            order = filter.sort.order_by_clause(),
            next_idx = bind_idx + 1,
        );

        let mut count_q = sqlx::query_scalar::<_, i64>(&count_query);
        let mut list_q = sqlx::query_as::<_, PostingSummary>(&list_query);

        // Bind dynamic parameters in order.
        if let Some(field) = filter.recruitment_field {
            count_q = count_q.bind(field.as_str());
            list_q = list_q.bind(field.as_str());
        }
        if let Some(headcount) = filter.recruitment_headcount {
            count_q = count_q.bind(headcount.as_str());
            list_q = list_q.bind(headcount.as_str());
        }
        if let Some(ref school) = filter.school_name {
            count_q = count_q.bind(school);
            list_q = list_q.bind(school);
        }
        if let Some(deadline) = filter.deadline_before {
            count_q = count_q.bind(deadline);
            list_q = list_q.bind(deadline);
        }
        if let Some(ref q) = filter.q {
            count_q = count_q.bind(q);
            list_q = list_q.bind(q);
        }

        let total = count_q.fetch_one(pool).await?;
        let items = list_q.bind(limit).bind(offset).fetch_all(pool).await?;
        Ok((items, total))
    }

    /// Postings created by `owner_id`, newest first.
    pub async fn list_by_owner(
        pool: &PgPool,
        owner_id: DbId,
    ) -> Result<Vec<PostingSummary>, sqlx::Error> {
        let query =
            format!("{SUMMARY_SELECT} WHERE p.owner_id = $1 ORDER BY p.created_at DESC, p.id DESC");
        sqlx::query_as::<_, PostingSummary>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }
}
