//! Public profiles and self-service profile edits.

use joba_core::error::CoreError;
use joba_core::profile::{
    group_careers, parse_careers_json, validate_track, CareerYear, RECENT_PROJECT_LIMIT,
};
use joba_core::types::DbId;
use joba_core::upload::UploadKind;
use joba_db::models::application::RecentProject;
use joba_db::models::user::{UpdateUserProfile, User};
use joba_db::repositories::{ApplicationRepo, ProfileCareerRepo, UserRepo};
use serde::Serialize;
use sqlx::PgPool;

use crate::engine::{not_found, EngineContext, UploadedFile};
use crate::error::AppResult;

#[derive(Debug, Serialize)]
pub struct Profile {
    pub user_id: DbId,
    pub email: Option<String>,
    pub nickname: Option<String>,
    pub track: Option<String>,
    pub school: Option<String>,
    pub portfolio_url: Option<String>,
    pub avatar_url: Option<String>,
    pub cover_url: Option<String>,
    pub timetable_url: Option<String>,
    pub careers: Vec<CareerYear>,
    pub recent_projects: Vec<RecentProject>,
}

/// Fields of a profile edit. `None` leaves the stored value untouched.
#[derive(Debug, Default)]
pub struct ProfileUpdate {
    pub nickname: Option<String>,
    pub track: Option<String>,
    pub school: Option<String>,
    pub portfolio_url: Option<String>,
    /// Raw `careers` form field; replaces every career line when present.
    pub careers_json: Option<String>,
    pub avatar: Option<UploadedFile>,
    pub cover: Option<UploadedFile>,
}

fn ensure_self(user_id: DbId, actor: DbId) -> Result<(), CoreError> {
    if user_id != actor {
        return Err(CoreError::Forbidden(
            "You can only edit your own profile".into(),
        ));
    }
    Ok(())
}

async fn load_user(pool: &PgPool, user_id: DbId) -> AppResult<User> {
    UserRepo::find_by_id(pool, user_id)
        .await?
        .ok_or_else(|| not_found("User", user_id).into())
}

/// Assemble a profile: user fields, careers by year and recent projects.
pub async fn get_profile(pool: &PgPool, user_id: DbId) -> AppResult<Profile> {
    let user = load_user(pool, user_id).await?;
    let careers = ProfileCareerRepo::list_for_user(pool, user_id).await?;
    let recent_projects =
        ApplicationRepo::recent_accepted_projects(pool, user_id, RECENT_PROJECT_LIMIT).await?;

    Ok(Profile {
        user_id: user.id,
        email: user.email,
        nickname: user.nickname,
        track: user.track,
        school: user.school,
        portfolio_url: user.portfolio_url,
        avatar_url: user.avatar_url,
        cover_url: user.cover_url,
        timetable_url: user.timetable_url,
        careers: group_careers(careers.into_iter().map(|c| (c.id, c.year, c.description))),
        recent_projects,
    })
}

/// Edit the caller's own profile.
///
/// Images are uploaded first; the field patch and career replacement then
/// commit together.
pub async fn update_profile(
    ctx: EngineContext<'_>,
    user_id: DbId,
    actor: DbId,
    update: ProfileUpdate,
) -> AppResult<Profile> {
    ensure_self(user_id, actor)?;
    load_user(ctx.pool, user_id).await?;

    if let Some(track) = update.track.as_deref() {
        validate_track(track)?;
    }
    let careers = update
        .careers_json
        .as_deref()
        .map(parse_careers_json)
        .transpose()?;

    for file in update.avatar.iter().chain(update.cover.iter()) {
        ctx.check_size(file)?;
    }

    let avatar_url = match update.avatar {
        Some(file) => Some(ctx.upload(UploadKind::Avatar(user_id), file).await?),
        None => None,
    };
    let cover_url = match update.cover {
        Some(file) => Some(ctx.upload(UploadKind::Cover(user_id), file).await?),
        None => None,
    };

    let patch = UpdateUserProfile {
        nickname: update.nickname,
        track: update.track,
        school: update.school,
        portfolio_url: update.portfolio_url,
        avatar_url,
        cover_url,
    };
    UserRepo::update_profile(ctx.pool, user_id, &patch, careers.as_deref())
        .await?
        .ok_or_else(|| not_found("User", user_id))?;

    tracing::info!(
        user_id,
        careers = careers.as_ref().map(Vec::len),
        "Profile updated"
    );
    get_profile(ctx.pool, user_id).await
}

#[derive(Debug, Serialize)]
pub struct TimetableUpload {
    pub timetable_url: String,
}

/// Store a new timetable image for the caller.
pub async fn upload_timetable(
    ctx: EngineContext<'_>,
    user_id: DbId,
    actor: DbId,
    file: UploadedFile,
) -> AppResult<TimetableUpload> {
    ensure_self(user_id, actor)?;
    load_user(ctx.pool, user_id).await?;
    ctx.check_size(&file)?;

    let url = ctx.upload(UploadKind::Timetable(user_id), file).await?;
    let user = UserRepo::set_timetable(ctx.pool, user_id, &url)
        .await?
        .ok_or_else(|| not_found("User", user_id))?;
    tracing::info!(user_id, "Timetable uploaded");

    Ok(TimetableUpload {
        timetable_url: user.timetable_url.unwrap_or(url),
    })
}
