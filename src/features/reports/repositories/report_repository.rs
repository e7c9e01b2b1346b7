use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool, Postgres, Transaction};

use crate::core::error::{AppError, Result};
use crate::features::reports::models::{
    Report, ReportAttachment, ReportFilter, ReportStatus, ReportWithAttachments,
};

/// Column list for the `reports` table.
const COLUMNS: &str = "report_id, user_id, title, description_text, location_raw, status, \
    category_id, ai_confidence, transcribed_voice_text, created_at, updated_at";

/// Column list for the `report_attachments` table.
const ATTACHMENT_COLUMNS: &str =
    "attachment_id, report_id, blob_storage_uri, mime_type, file_type, file_size_bytes";

/// Result of inserting a report.
#[derive(Debug)]
pub enum InsertOutcome {
    Inserted(ReportWithAttachments),
    /// Another report already holds this identifier. Nothing was written.
    DuplicateId,
}

/// Storage for reports and the attachments they own.
///
/// Every read returns reports with their attachments fully materialized.
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Persist a report and all of its attachments in one transaction.
    async fn insert_with_attachments(
        &self,
        report: &Report,
        attachments: &[ReportAttachment],
    ) -> Result<InsertOutcome>;

    async fn find_by_id(&self, report_id: &str) -> Result<Option<ReportWithAttachments>>;

    /// One page of reports matching `filter`, newest first, and the total
    /// number of matches before pagination.
    async fn list(
        &self,
        filter: ReportFilter,
        skip: i64,
        limit: i64,
    ) -> Result<(Vec<ReportWithAttachments>, i64)>;

    /// Set `status` and move `updated_at` forward to at least `at`.
    async fn update_status(
        &self,
        report_id: &str,
        status: ReportStatus,
        at: DateTime<Utc>,
    ) -> Result<Option<ReportWithAttachments>>;

    /// Delete a report and its attachments in one transaction.
    /// Returns false when no report had that identifier.
    async fn delete_with_attachments(&self, report_id: &str) -> Result<bool>;
}

pub struct PgReportRepository {
    pool: PgPool,
}

impl PgReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Read-only transaction that sees one snapshot across several statements.
    async fn begin_snapshot(&self) -> Result<Transaction<'static, Postgres>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin read transaction"))?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to set read isolation"))?;
        Ok(tx)
    }

    async fn fetch_attachments<'e, E>(
        executor: E,
        report_ids: &[String],
    ) -> std::result::Result<Vec<ReportAttachment>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        if report_ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = format!(
            "SELECT {ATTACHMENT_COLUMNS} FROM report_attachments \
             WHERE report_id = ANY($1) \
             ORDER BY report_id, attachment_id"
        );
        sqlx::query_as::<_, ReportAttachment>(&query)
            .bind(report_ids)
            .fetch_all(executor)
            .await
    }
}

/// Attach each report's attachments, preserving report order.
fn assemble(
    reports: Vec<Report>,
    attachments: Vec<ReportAttachment>,
) -> Vec<ReportWithAttachments> {
    let mut by_report: HashMap<String, Vec<ReportAttachment>> = HashMap::new();
    for attachment in attachments {
        by_report
            .entry(attachment.report_id.clone())
            .or_default()
            .push(attachment);
    }

    reports
        .into_iter()
        .map(|report| {
            let attachments = by_report.remove(&report.report_id).unwrap_or_default();
            ReportWithAttachments {
                report,
                attachments,
            }
        })
        .collect()
}

fn db_error(context: &'static str) -> impl Fn(sqlx::Error) -> AppError {
    move |e| {
        tracing::error!("{}: {:?}", context, e);
        AppError::Database(e)
    }
}

#[async_trait]
impl ReportRepository for PgReportRepository {
    async fn insert_with_attachments(
        &self,
        report: &Report,
        attachments: &[ReportAttachment],
    ) -> Result<InsertOutcome> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin report transaction"))?;

        // Token subjects may not have a users row yet.
        if let Some(user_id) = &report.user_id {
            sqlx::query("INSERT INTO users (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING")
                .bind(user_id)
                .execute(&mut *tx)
                .await
                .map_err(db_error("Failed to register report owner"))?;
        }

        let insert_report = format!(
            "INSERT INTO reports \
                (report_id, user_id, title, description_text, location_raw, status, \
                 category_id, ai_confidence, transcribed_voice_text, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, Report>(&insert_report)
            .bind(&report.report_id)
            .bind(&report.user_id)
            .bind(&report.title)
            .bind(&report.description_text)
            .bind(&report.location_raw)
            .bind(report.status)
            .bind(report.category_id)
            .bind(report.ai_confidence)
            .bind(&report.transcribed_voice_text)
            .bind(report.created_at)
            .bind(report.updated_at)
            .fetch_one(&mut *tx)
            .await;
        let saved = match inserted {
            Ok(saved) => saved,
            Err(sqlx::Error::Database(e))
                if e.is_unique_violation() && e.constraint() == Some("reports_pkey") =>
            {
                // Dropping `tx` rolls back the owner upsert.
                return Ok(InsertOutcome::DuplicateId);
            }
            Err(e) => return Err(db_error("Failed to create report")(e)),
        };

        let insert_attachment = format!(
            "INSERT INTO report_attachments ({ATTACHMENT_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {ATTACHMENT_COLUMNS}"
        );
        let mut saved_attachments = Vec::with_capacity(attachments.len());
        for attachment in attachments {
            let row = sqlx::query_as::<_, ReportAttachment>(&insert_attachment)
                .bind(&attachment.attachment_id)
                .bind(&attachment.report_id)
                .bind(&attachment.blob_storage_uri)
                .bind(&attachment.mime_type)
                .bind(attachment.file_type)
                .bind(attachment.file_size_bytes)
                .fetch_one(&mut *tx)
                .await
                .map_err(db_error("Failed to create report attachment"))?;
            saved_attachments.push(row);
        }

        // Dropping `tx` on any earlier error rolls back the report as well.
        tx.commit()
            .await
            .map_err(db_error("Failed to commit report transaction"))?;

        Ok(InsertOutcome::Inserted(ReportWithAttachments {
            report: saved,
            attachments: saved_attachments,
        }))
    }

    async fn find_by_id(&self, report_id: &str) -> Result<Option<ReportWithAttachments>> {
        let mut tx = self.begin_snapshot().await?;

        let query = format!("SELECT {COLUMNS} FROM reports WHERE report_id = $1");
        let Some(report) = sqlx::query_as::<_, Report>(&query)
            .bind(report_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_error("Failed to get report"))?
        else {
            return Ok(None);
        };

        let attachments = Self::fetch_attachments(&mut *tx, &[report.report_id.clone()])
            .await
            .map_err(db_error("Failed to get report attachments"))?;

        tx.commit()
            .await
            .map_err(db_error("Failed to close read transaction"))?;

        Ok(Some(ReportWithAttachments {
            report,
            attachments,
        }))
    }

    async fn list(
        &self,
        filter: ReportFilter,
        skip: i64,
        limit: i64,
    ) -> Result<(Vec<ReportWithAttachments>, i64)> {
        const FILTER: &str = "($1::report_status IS NULL OR status = $1) \
            AND ($2::report_category IS NULL OR category_id = $2)";

        let mut tx = self.begin_snapshot().await?;

        let count_query = format!("SELECT COUNT(*) FROM reports WHERE {FILTER}");
        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(filter.status)
            .bind(filter.category)
            .fetch_one(&mut *tx)
            .await
            .map_err(db_error("Failed to count reports"))?;

        let page_query = format!(
            "SELECT {COLUMNS} FROM reports WHERE {FILTER} \
             ORDER BY created_at DESC, report_id DESC \
             OFFSET $3 LIMIT $4"
        );
        let reports = sqlx::query_as::<_, Report>(&page_query)
            .bind(filter.status)
            .bind(filter.category)
            .bind(skip)
            .bind(limit)
            .fetch_all(&mut *tx)
            .await
            .map_err(db_error("Failed to list reports"))?;

        let ids: Vec<String> = reports.iter().map(|r| r.report_id.clone()).collect();
        let attachments = Self::fetch_attachments(&mut *tx, &ids)
            .await
            .map_err(db_error("Failed to list report attachments"))?;

        tx.commit()
            .await
            .map_err(db_error("Failed to close read transaction"))?;

        Ok((assemble(reports, attachments), total))
    }

    async fn update_status(
        &self,
        report_id: &str,
        status: ReportStatus,
        at: DateTime<Utc>,
    ) -> Result<Option<ReportWithAttachments>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin status transaction"))?;

        let query = format!(
            "UPDATE reports \
             SET status = $2, updated_at = GREATEST($3, updated_at + INTERVAL '1 microsecond') \
             WHERE report_id = $1 \
             RETURNING {COLUMNS}"
        );
        let Some(report) = sqlx::query_as::<_, Report>(&query)
            .bind(report_id)
            .bind(status)
            .bind(at)
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_error("Failed to update report status"))?
        else {
            return Ok(None);
        };

        let attachments = Self::fetch_attachments(&mut *tx, &[report.report_id.clone()])
            .await
            .map_err(db_error("Failed to get report attachments"))?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit status transaction"))?;

        Ok(Some(ReportWithAttachments {
            report,
            attachments,
        }))
    }

    async fn delete_with_attachments(&self, report_id: &str) -> Result<bool> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin delete transaction"))?;

        let removed_attachments = sqlx::query("DELETE FROM report_attachments WHERE report_id = $1")
            .bind(report_id)
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to delete report attachments"))?
            .rows_affected();

        let removed_reports = sqlx::query("DELETE FROM reports WHERE report_id = $1")
            .bind(report_id)
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to delete report"))?
            .rows_affected();

        tx.commit()
            .await
            .map_err(db_error("Failed to commit delete transaction"))?;

        if removed_reports > 0 {
            tracing::debug!(
                "Deleted report {} with {} attachments",
                report_id,
                removed_attachments
            );
        }

        Ok(removed_reports > 0)
    }
}

// Run against a live database: `DATABASE_URL=... cargo test -- --ignored`
#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reports::models::{FileType, ReportCategory};
    use chrono::{Duration, TimeZone};

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, day, hour, 0, 0).unwrap()
    }

    fn report(id: &str, user_id: Option<&str>, created_at: DateTime<Utc>) -> Report {
        Report {
            report_id: id.to_string(),
            user_id: user_id.map(str::to_string),
            title: format!("Report {}", id),
            description_text: "Water pooling across the junction".to_string(),
            location_raw: "Elm St and 4th Ave".to_string(),
            status: ReportStatus::Submitted,
            category_id: ReportCategory::Other,
            ai_confidence: None,
            transcribed_voice_text: None,
            created_at,
            updated_at: created_at,
        }
    }

    fn attachment(id: &str, report_id: &str) -> ReportAttachment {
        ReportAttachment {
            attachment_id: id.to_string(),
            report_id: report_id.to_string(),
            blob_storage_uri: format!("https://storage.example.com/{}.jpg", id),
            mime_type: "image/jpeg".to_string(),
            file_type: FileType::Image,
            file_size_bytes: 2048,
        }
    }

    async fn insert(
        repo: &PgReportRepository,
        report: &Report,
        attachments: &[ReportAttachment],
    ) {
        let outcome = repo
            .insert_with_attachments(report, attachments)
            .await
            .unwrap();
        assert!(matches!(outcome, InsertOutcome::Inserted(_)));
    }

    async fn row_count(pool: &PgPool, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs DATABASE_URL"]
    async fn test_failed_attachment_rolls_back_whole_insert(pool: PgPool) {
        let repo = PgReportRepository::new(pool.clone());
        let r = report("R-00000001", Some("citizen-1"), at(1, 9));
        // Same attachment id twice violates the primary key on the second insert.
        let attachments = vec![
            attachment("a-1", &r.report_id),
            attachment("a-1", &r.report_id),
        ];

        let result = repo.insert_with_attachments(&r, &attachments).await;

        assert!(matches!(result, Err(AppError::Database(_))));
        assert_eq!(row_count(&pool, "reports").await, 0);
        assert_eq!(row_count(&pool, "report_attachments").await, 0);
        assert_eq!(row_count(&pool, "users").await, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs DATABASE_URL"]
    async fn test_taken_report_id_is_reported(pool: PgPool) {
        let repo = PgReportRepository::new(pool.clone());
        insert(&repo, &report("R-00000001", None, at(1, 9)), &[]).await;

        let again = report("R-00000001", Some("citizen-1"), at(2, 9));
        let outcome = repo
            .insert_with_attachments(&again, &[attachment("a-1", "R-00000001")])
            .await
            .unwrap();

        assert!(matches!(outcome, InsertOutcome::DuplicateId));
        assert_eq!(row_count(&pool, "report_attachments").await, 0);
        assert_eq!(row_count(&pool, "users").await, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs DATABASE_URL"]
    async fn test_insert_registers_unknown_owner(pool: PgPool) {
        let repo = PgReportRepository::new(pool.clone());
        insert(&repo, &report("R-00000001", Some("citizen-1"), at(1, 9)), &[]).await;
        insert(&repo, &report("R-00000002", Some("citizen-1"), at(1, 10)), &[]).await;

        let role: String = sqlx::query_scalar("SELECT role::TEXT FROM users WHERE user_id = $1")
            .bind("citizen-1")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(role, "citizen");
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs DATABASE_URL"]
    async fn test_filtered_list_counts_before_paging(pool: PgPool) {
        let repo = PgReportRepository::new(pool);
        for (i, category) in [
            ReportCategory::Traffic,
            ReportCategory::Crime,
            ReportCategory::Traffic,
            ReportCategory::Traffic,
        ]
        .into_iter()
        .enumerate()
        {
            let mut r = report(&format!("R-0000000{}", i), None, at(1 + i as u32, 9));
            r.category_id = category;
            insert(&repo, &r, &[attachment(&format!("a-{}", i), &r.report_id)]).await;
        }
        repo.update_status("R-00000003", ReportStatus::Assigned, at(20, 9))
            .await
            .unwrap();

        let traffic = ReportFilter {
            status: None,
            category: Some(ReportCategory::Traffic),
        };
        let (page, total) = repo.list(traffic, 0, 2).await.unwrap();
        assert_eq!(total, 3);
        let ids: Vec<&str> = page.iter().map(|r| r.report.report_id.as_str()).collect();
        assert_eq!(ids, vec!["R-00000003", "R-00000002"]);
        assert!(page.iter().all(|r| r.attachments.len() == 1));

        let (rest, total) = repo.list(traffic, 2, 2).await.unwrap();
        assert_eq!(total, 3);
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].report.report_id, "R-00000000");

        let assigned_traffic = ReportFilter {
            status: Some(ReportStatus::Assigned),
            ..traffic
        };
        let (page, total) = repo.list(assigned_traffic, 0, 10).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(page[0].report.report_id, "R-00000003");

        let (_, total) = repo.list(ReportFilter::default(), 0, 1).await.unwrap();
        assert_eq!(total, 4);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs DATABASE_URL"]
    async fn test_status_update_moves_timestamp_forward(pool: PgPool) {
        let repo = PgReportRepository::new(pool);
        let created = at(5, 12);
        insert(&repo, &report("R-00000001", None, created), &[]).await;

        let later = repo
            .update_status("R-00000001", ReportStatus::InProgress, at(6, 12))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(later.report.status, ReportStatus::InProgress);
        assert_eq!(later.report.updated_at, at(6, 12));

        // A clock behind the stored value still advances it.
        let skewed = repo
            .update_status("R-00000001", ReportStatus::Resolved, created)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(skewed.report.status, ReportStatus::Resolved);
        assert_eq!(
            skewed.report.updated_at,
            at(6, 12) + Duration::microseconds(1)
        );
        assert_eq!(skewed.report.created_at, created);

        let missing = repo
            .update_status("R-FFFFFFFF", ReportStatus::Resolved, at(7, 12))
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs DATABASE_URL"]
    async fn test_delete_removes_attachments(pool: PgPool) {
        let repo = PgReportRepository::new(pool.clone());
        let r = report("R-00000001", None, at(1, 9));
        insert(
            &repo,
            &r,
            &[attachment("a-1", &r.report_id), attachment("a-2", &r.report_id)],
        )
        .await;
        insert(
            &repo,
            &report("R-00000002", None, at(2, 9)),
            &[attachment("a-3", "R-00000002")],
        )
        .await;

        let fetched = repo.find_by_id("R-00000001").await.unwrap().unwrap();
        assert_eq!(fetched.attachments.len(), 2);

        assert!(repo.delete_with_attachments("R-00000001").await.unwrap());
        assert!(repo.find_by_id("R-00000001").await.unwrap().is_none());
        assert_eq!(row_count(&pool, "report_attachments").await, 1);

        assert!(!repo.delete_with_attachments("R-00000001").await.unwrap());
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs DATABASE_URL"]
    async fn test_reads_share_one_snapshot(pool: PgPool) {
        let repo = PgReportRepository::new(pool);
        let mut tx = repo.begin_snapshot().await.unwrap();

        let isolation: String = sqlx::query_scalar("SHOW transaction_isolation")
            .fetch_one(&mut *tx)
            .await
            .unwrap();
        let read_only: String = sqlx::query_scalar("SHOW transaction_read_only")
            .fetch_one(&mut *tx)
            .await
            .unwrap();

        assert_eq!(isolation, "repeatable read");
        assert_eq!(read_only, "on");
    }
}
