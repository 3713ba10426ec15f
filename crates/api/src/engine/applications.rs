//! Application lifecycle: submission, review, decisions and cancellation.

use futures::future::try_join_all;
use joba_core::application::{
    resolve_attachments, validate_answers, validate_cancel, validate_decision, AnswerInput,
    ApplicationSort, ApplicationStatus, QuestionRef, DEFAULT_APPLICATION_PAGE_SIZE,
    REASON_APPLICANT_CANCELLATION, REASON_DETAIL_VIEW,
};
use joba_core::error::CoreError;
use joba_core::pagination::{clamp_page, clamp_size, offset_for, Page};
use joba_core::question::QuestionType;
use joba_core::types::DbId;
use joba_core::upload::UploadKind;
use joba_db::models::application::{
    AnsweredQuestion, Application, ApplicationListItem, MyApplication, NewAnswer,
};
use joba_db::models::posting::Posting;
use joba_db::models::status_log::CreateStatusLog;
use joba_db::repositories::{ApplicationRepo, PostingQuestionRepo, PostingRepo, StatusLogRepo};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::engine::{not_found, EngineContext, UploadedFile};
use crate::error::{is_unique_violation, AppError, AppResult};

const UNIQUE_APPLICATION: &str = "uq_applications_applicant_posting";

/// The `application_data` part of a submission.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitApplication {
    pub posting_id: DbId,
    #[serde(default)]
    pub answers: Vec<AnswerInput>,
}

fn duplicate() -> AppError {
    CoreError::Conflict("You have already applied to this posting".into()).into()
}

/// Parse a stored status. The column is CHECK-constrained, so failure means
/// the row was written outside this service.
fn stored_status(application: &Application) -> AppResult<ApplicationStatus> {
    ApplicationStatus::from_name(&application.status).map_err(|_| {
        AppError::InternalError(format!(
            "Application {} has unknown status '{}'",
            application.id, application.status
        ))
    })
}

async fn load_posting(pool: &PgPool, posting_id: DbId) -> AppResult<Posting> {
    PostingRepo::find_by_id(pool, posting_id)
        .await?
        .ok_or_else(|| not_found("Posting", posting_id).into())
}

async fn load_application(pool: &PgPool, application_id: DbId) -> AppResult<Application> {
    ApplicationRepo::find_by_id(pool, application_id)
        .await?
        .ok_or_else(|| not_found("Application", application_id).into())
}

// ---------------------------------------------------------------------------
// Submit
// ---------------------------------------------------------------------------

/// Submit an application with its answers and attachment files.
///
/// Every check runs before any upload, and every upload finishes before the
/// insert transaction begins.
pub async fn submit(
    ctx: EngineContext<'_>,
    applicant_id: DbId,
    input: SubmitApplication,
    files: Vec<UploadedFile>,
) -> AppResult<Application> {
    let posting_id = input.posting_id;
    load_posting(ctx.pool, posting_id).await?;

    if ApplicationRepo::exists_for(ctx.pool, applicant_id, posting_id).await? {
        return Err(duplicate());
    }

    let questions = PostingQuestionRepo::list_for_posting(ctx.pool, posting_id).await?;
    let refs = questions
        .iter()
        .map(|q| {
            Ok(QuestionRef {
                id: q.id,
                question_type: QuestionType::from_name(&q.question_type)?,
                content: &q.question_content,
                is_required: q.is_required,
            })
        })
        .collect::<Result<Vec<_>, CoreError>>()?;

    validate_answers(&refs, &input.answers)?;

    for file in &files {
        ctx.check_size(file)?;
    }
    let filenames: Vec<&str> = files.iter().map(|f| f.filename.as_str()).collect();
    let resolved = resolve_attachments(&refs, &input.answers, &filenames)?;

    let file_count = files.len();
    let urls = try_join_all(
        files
            .into_iter()
            .map(|file| ctx.upload(UploadKind::ApplicationAttachment, file)),
    )
    .await?;

    let answers: Vec<NewAnswer> = input
        .answers
        .into_iter()
        .zip(resolved)
        .map(|(answer, file_index)| NewAnswer {
            posting_question_id: answer.posting_question_id,
            answer_content: match file_index {
                Some(index) => urls[index].clone(),
                None => answer.answer_content,
            },
        })
        .collect();

    let application =
        match ApplicationRepo::create_with_answers(ctx.pool, posting_id, applicant_id, &answers)
            .await
        {
            Ok(application) => application,
            Err(err) if is_unique_violation(&err, UNIQUE_APPLICATION) => return Err(duplicate()),
            Err(err) => return Err(err.into()),
        };

    tracing::info!(
        application_id = application.id,
        posting_id,
        applicant_id,
        answers = answers.len(),
        files = file_count,
        "Application submitted"
    );
    Ok(application)
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// The applicant's own application. Anyone else gets `NotFound`.
pub async fn get_own(
    pool: &PgPool,
    application_id: DbId,
    requester: DbId,
) -> AppResult<Application> {
    let application = load_application(pool, application_id).await?;
    if application.applicant_id != requester {
        return Err(not_found("Application", application_id).into());
    }
    Ok(application)
}

#[derive(Debug, Clone, Default)]
pub struct ApplicationListQuery {
    pub status: Option<ApplicationStatus>,
    pub sort: ApplicationSort,
    pub page: Option<i64>,
    pub size: Option<i64>,
}

/// A posting's applications, visible only to the posting owner.
pub async fn list_for_posting(
    pool: &PgPool,
    posting_id: DbId,
    requester: DbId,
    query: &ApplicationListQuery,
) -> AppResult<Page<ApplicationListItem>> {
    let posting = load_posting(pool, posting_id).await?;
    if posting.owner_id != requester {
        return Err(CoreError::Forbidden(
            "Only the posting owner can view its applications".into(),
        )
        .into());
    }

    let page = clamp_page(query.page);
    let size = clamp_size(query.size, DEFAULT_APPLICATION_PAGE_SIZE);
    let items = ApplicationRepo::list_for_posting(
        pool,
        posting_id,
        query.status,
        query.sort,
        size,
        offset_for(page, size),
    )
    .await?;
    let total_count = ApplicationRepo::count_for_posting(pool, posting_id, query.status).await?;

    Ok(Page {
        total_count,
        page,
        size,
        items,
    })
}

/// An application with every question of its posting and the given answers.
#[derive(Debug, Serialize)]
pub struct ApplicationDetail {
    #[serde(flatten)]
    pub application: Application,
    pub posting_title: String,
    pub questions: Vec<AnsweredQuestion>,
}

/// Full application view for the applicant or the posting owner.
///
/// An owner view is recorded in the status log.
pub async fn get_detail(
    pool: &PgPool,
    application_id: DbId,
    requester: DbId,
) -> AppResult<ApplicationDetail> {
    let application = load_application(pool, application_id).await?;
    let posting = load_posting(pool, application.posting_id).await?;

    let is_applicant = application.applicant_id == requester;
    let is_owner = posting.owner_id == requester;
    if !is_applicant && !is_owner {
        return Err(CoreError::Forbidden(
            "Only the applicant or the posting owner can view this application".into(),
        )
        .into());
    }

    let questions = ApplicationRepo::answered_questions(pool, application.id, posting.id).await?;

    if is_owner && !is_applicant {
        record_view(pool, &application, requester).await?;
    }

    Ok(ApplicationDetail {
        application,
        posting_title: posting.title,
        questions,
    })
}

/// Append an audit row for a posting owner opening an application.
pub async fn record_view(pool: &PgPool, application: &Application, actor: DbId) -> AppResult<()> {
    StatusLogRepo::append(
        pool,
        &CreateStatusLog {
            application_id: application.id,
            previous_status: &application.status,
            new_status: &application.status,
            changed_by: actor,
            change_reason: Some(REASON_DETAIL_VIEW),
        },
    )
    .await?;
    tracing::debug!(application_id = application.id, actor, "Application view recorded");
    Ok(())
}

/// The caller's own applications, newest first.
pub async fn list_mine(
    pool: &PgPool,
    applicant_id: DbId,
    page: Option<i64>,
    size: Option<i64>,
) -> AppResult<Page<MyApplication>> {
    let page = clamp_page(page);
    let size = clamp_size(size, DEFAULT_APPLICATION_PAGE_SIZE);
    let items =
        ApplicationRepo::list_for_applicant(pool, applicant_id, size, offset_for(page, size))
            .await?;
    let total_count = ApplicationRepo::count_for_applicant(pool, applicant_id).await?;
    Ok(Page {
        total_count,
        page,
        size,
        items,
    })
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// Accept or reject a submitted application. Owner only.
pub async fn update_status(
    pool: &PgPool,
    application_id: DbId,
    new_status: &str,
    actor: DbId,
) -> AppResult<Application> {
    let application = load_application(pool, application_id).await?;
    let posting = load_posting(pool, application.posting_id).await?;
    if posting.owner_id != actor {
        return Err(CoreError::Forbidden(
            "Only the posting owner can change an application's status".into(),
        )
        .into());
    }
    let new_status = ApplicationStatus::from_name(new_status)?;

    let mut tx = pool.begin().await?;
    let current = ApplicationRepo::find_by_id_for_update(&mut tx, application_id)
        .await?
        .ok_or_else(|| not_found("Application", application_id))?;
    validate_decision(stored_status(&current)?, new_status)?;
    let updated = ApplicationRepo::set_status(&mut tx, &current, new_status, actor, None).await?;
    tx.commit().await?;

    tracing::info!(
        application_id,
        actor,
        from = %current.status,
        to = new_status.as_str(),
        "Application status updated"
    );
    Ok(updated)
}

/// Withdraw a submitted application. Applicant only.
pub async fn cancel(
    pool: &PgPool,
    application_id: DbId,
    applicant: DbId,
) -> AppResult<Application> {
    let application = load_application(pool, application_id).await?;
    if application.applicant_id != applicant {
        return Err(CoreError::Forbidden(
            "Only the applicant can cancel this application".into(),
        )
        .into());
    }

    let mut tx = pool.begin().await?;
    let current = ApplicationRepo::find_by_id_for_update(&mut tx, application_id)
        .await?
        .ok_or_else(|| not_found("Application", application_id))?;
    validate_cancel(stored_status(&current)?)?;
    let updated = ApplicationRepo::set_status(
        &mut tx,
        &current,
        ApplicationStatus::Cancelled,
        applicant,
        Some(REASON_APPLICANT_CANCELLATION),
    )
    .await?;
    tx.commit().await?;

    tracing::info!(application_id, applicant, "Application cancelled");
    Ok(updated)
}
