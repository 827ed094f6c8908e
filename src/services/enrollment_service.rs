// ==================== BULK ENROLLMENT ====================
// One Classroom call per recipient, sequential, never retried.
// Per-recipient failures become data in the summary; only a missing course aborts.

use crate::models::{
    BulkCourseSummary, BulkInvitationResult, BulkInvitationSummary, Invitation, InvitationRequest,
    Role, StudentSummary, TeacherMode, TeacherOpResult, TeacherSummary,
};
use crate::services::classroom_client::{ClassroomProvider, ProviderError};
use crate::services::course_resolver::resolve_course_id;
use std::collections::HashSet;

pub const ALREADY_INVITED_NOTE: &str = "Already invited or enrolled (409).";

/// Lightweight email shape check: exactly one '@', non-empty local part,
/// domain of 3+ chars containing a dot, no whitespace.
pub fn is_likely_email(value: &str) -> bool {
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return false;
    }

    let mut parts = value.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };

    !local.is_empty() && domain.len() >= 3 && domain.contains('.')
}

#[derive(Debug, Default, PartialEq)]
pub struct PreparedEmails {
    pub valid: Vec<String>,
    pub skipped: usize,
}

/// Trims, drops blank and malformed entries, dedupes case-insensitively (first seen wins).
pub fn prepare_emails(raw: &[String]) -> PreparedEmails {
    let mut seen = HashSet::new();
    let mut valid = Vec::new();

    for entry in raw {
        let email = entry.trim();
        if email.is_empty() || !is_likely_email(email) {
            continue;
        }
        if seen.insert(email.to_lowercase()) {
            valid.push(email.to_string());
        }
    }

    PreparedEmails {
        skipped: raw.len() - valid.len(),
        valid,
    }
}

/// Where a teacher enrollment ended up.
#[derive(Debug, Clone, PartialEq)]
pub enum TeacherOutcome {
    Added,
    Exists,
    Invited,
    Failed { error: String },
}

impl TeacherOutcome {
    pub fn into_result(self, email: &str) -> TeacherOpResult {
        let (mode, error) = match self {
            TeacherOutcome::Added => (TeacherMode::Added, None),
            TeacherOutcome::Exists => (TeacherMode::Exists, None),
            TeacherOutcome::Invited => (TeacherMode::Invited, None),
            TeacherOutcome::Failed { error } => (TeacherMode::Failed, Some(error)),
        };

        TeacherOpResult {
            email: email.to_string(),
            success: error.is_none(),
            mode,
            error,
        }
    }
}

/// Teacher enrollment state. Direct add first, invitation as the fallback.
///
/// `NotAttempted -> AddAttempted -> {Done, InvitePending}`, `InvitePending -> Done`.
#[derive(Debug, Clone, PartialEq)]
pub enum TeacherState {
    NotAttempted,
    AddAttempted(Result<(), ProviderError>),
    InvitePending { add_error: String },
    Done(TeacherOutcome),
}

impl TeacherState {
    pub fn after_add(self, outcome: Result<(), ProviderError>) -> TeacherState {
        match self {
            TeacherState::NotAttempted => TeacherState::AddAttempted(outcome),
            state => state,
        }
    }

    /// Classifies the direct-add outcome. A transport failure is final, with no invitation.
    pub fn settle_add(self) -> TeacherState {
        match self {
            TeacherState::AddAttempted(Ok(())) => TeacherState::Done(TeacherOutcome::Added),
            TeacherState::AddAttempted(Err(ProviderError::Conflict(_))) => {
                TeacherState::Done(TeacherOutcome::Exists)
            }
            TeacherState::AddAttempted(Err(ProviderError::Transport(msg))) => {
                TeacherState::Done(TeacherOutcome::Failed { error: msg })
            }
            TeacherState::AddAttempted(Err(e)) => TeacherState::InvitePending {
                add_error: e.message().to_string(),
            },
            state => state,
        }
    }

    pub fn after_invite(self, outcome: &Result<Invitation, ProviderError>) -> TeacherState {
        match (self, outcome) {
            (TeacherState::InvitePending { .. }, Ok(_)) => {
                TeacherState::Done(TeacherOutcome::Invited)
            }
            (TeacherState::InvitePending { .. }, Err(e)) => {
                TeacherState::Done(TeacherOutcome::Failed {
                    error: e.message().to_string(),
                })
            }
            (state, _) => state,
        }
    }
}

/// Raised when the Classroom API says the course itself does not exist.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseNotFound(pub String);

/// Lazy course existence check: a not-found before anything else came back aborts the batch.
#[derive(Default)]
struct CourseCheck {
    confirmed: bool,
}

impl CourseCheck {
    fn observe<T>(&mut self, outcome: &Result<T, ProviderError>) -> Result<(), CourseNotFound> {
        match outcome {
            Err(ProviderError::NotFound(msg)) if !self.confirmed => Err(CourseNotFound(msg.clone())),
            _ => {
                self.confirmed = true;
                Ok(())
            }
        }
    }
}

pub fn student_result(
    course_id: &str,
    email: &str,
    role: Role,
    outcome: Result<Invitation, ProviderError>,
) -> BulkInvitationResult {
    let request = InvitationRequest {
        course_id: course_id.to_string(),
        user_email: email.to_string(),
        role,
    };

    match outcome {
        Ok(invitation) => BulkInvitationResult {
            request,
            success: true,
            invitation_id: Some(invitation.id),
            error: None,
        },
        Err(ProviderError::Conflict(_)) => BulkInvitationResult {
            request,
            success: true,
            invitation_id: None,
            error: Some(ALREADY_INVITED_NOTE.to_string()),
        },
        Err(e) => BulkInvitationResult {
            request,
            success: false,
            invitation_id: None,
            error: Some(e.message().to_string()),
        },
    }
}

/// Drives one teacher through the state machine until it reaches an outcome.
async fn enroll_teacher(
    provider: &dyn ClassroomProvider,
    course_id: &str,
    email: &str,
    course_check: &mut CourseCheck,
) -> Result<TeacherOutcome, CourseNotFound> {
    let mut state = TeacherState::NotAttempted;

    loop {
        state = match state {
            TeacherState::NotAttempted => {
                let added = provider.add_teacher(course_id, email).await;
                course_check.observe(&added)?;
                TeacherState::NotAttempted.after_add(added)
            }
            TeacherState::AddAttempted(_) => state.settle_add(),
            TeacherState::InvitePending { ref add_error } => {
                log::info!(
                    "↪️ Direct add failed for {} ({}), falling back to invitation",
                    email,
                    add_error
                );
                let invited = provider.create_invitation(course_id, email, Role::Teacher).await;
                course_check.observe(&invited)?;
                state.after_invite(&invited)
            }
            TeacherState::Done(outcome) => return Ok(outcome),
        };
    }
}

/// Runs teacher then student enrollment for an already resolved course id.
pub async fn run_bulk_for_course(
    provider: &dyn ClassroomProvider,
    course_id: &str,
    teacher_emails: &[String],
    student_emails: &[String],
) -> Result<BulkCourseSummary, CourseNotFound> {
    let mut course_check = CourseCheck::default();

    let teachers = prepare_emails(teacher_emails);
    let mut teacher_results = Vec::with_capacity(teachers.valid.len());

    for email in &teachers.valid {
        let outcome = enroll_teacher(provider, course_id, email, &mut course_check).await?;
        let result = outcome.into_result(email);
        if !result.success {
            log::warn!("⚠️ Teacher {} failed: {:?}", email, result.error);
        }
        teacher_results.push(result);
    }

    let students = prepare_emails(student_emails);
    let mut student_results = Vec::with_capacity(students.valid.len());

    for email in &students.valid {
        let outcome = provider.create_invitation(course_id, email, Role::Student).await;
        course_check.observe(&outcome)?;
        let result = student_result(course_id, email, Role::Student, outcome);
        if !result.success {
            log::warn!("⚠️ Student {} failed: {:?}", email, result.error);
        }
        student_results.push(result);
    }

    Ok(BulkCourseSummary {
        teachers: TeacherSummary::from_results(teacher_results, teachers.skipped),
        students: StudentSummary::from_results(student_results, students.skipped),
    })
}

/// Generic bulk: every item carries its own course and role.
pub async fn run_bulk_invitations(
    provider: &dyn ClassroomProvider,
    items: &[InvitationRequest],
) -> BulkInvitationSummary {
    let mut results = Vec::with_capacity(items.len());

    for item in items {
        let email = item.user_email.trim();
        if item.course_id.trim().is_empty() || email.is_empty() {
            results.push(item_failure(item, "courseId and userEmail are required"));
            continue;
        }

        let Some(course_id) = resolve_course_id(&item.course_id) else {
            results.push(item_failure(
                item,
                &format!("Unable to resolve courseId from input: {}", item.course_id),
            ));
            continue;
        };

        let outcome = provider.create_invitation(&course_id, email, item.role).await;
        results.push(student_result(&course_id, email, item.role, outcome));
    }

    BulkInvitationSummary::from_results(results)
}

fn item_failure(item: &InvitationRequest, error: &str) -> BulkInvitationResult {
    BulkInvitationResult {
        request: item.clone(),
        success: false,
        invitation_id: None,
        error: Some(error.to_string()),
    }
}
