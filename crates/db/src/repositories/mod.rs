//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Methods that must share a
//! transaction with another repository take `&mut Transaction` instead.

pub mod application_repo;
pub mod notice_repo;
pub mod posting_question_repo;
pub mod posting_repo;
pub mod profile_career_repo;
pub mod status_log_repo;
pub mod user_repo;

pub use application_repo::ApplicationRepo;
pub use notice_repo::NoticeRepo;
pub use posting_question_repo::PostingQuestionRepo;
pub use posting_repo::PostingRepo;
pub use profile_career_repo::ProfileCareerRepo;
pub use status_log_repo::StatusLogRepo;
pub use user_repo::UserRepo;
