use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Course role requested for an invitation. Anything unrecognized is STUDENT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(from = "Option<String>", rename_all = "UPPERCASE")]
pub enum Role {
    #[default]
    Student,
    Teacher,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "STUDENT",
            Role::Teacher => "TEACHER",
        }
    }
}

impl From<Option<String>> for Role {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(role) if role.trim().eq_ignore_ascii_case("TEACHER") => Role::Teacher,
            _ => Role::Student,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvitationRequest {
    #[serde(default)]
    pub course_id: String,
    #[serde(default)]
    pub user_email: String,
    #[serde(default)]
    pub role: Role,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkCourseInvitationRequest {
    #[serde(default)]
    pub student_emails: Option<Vec<String>>,
    #[serde(default)]
    pub teacher_emails: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct BulkInvitationRequest {
    #[serde(default)]
    pub items: Option<Vec<InvitationRequest>>,
}

/// Invitation as returned by the Classroom API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Invitation {
    pub id: String,
    pub course_id: String,
    pub user_id: String,
    #[serde(default)]
    pub role: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TeacherMode {
    Added,
    Invited,
    Exists,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TeacherOpResult {
    pub email: String,
    pub mode: TeacherMode,
    pub success: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkInvitationResult {
    pub request: InvitationRequest,
    pub success: bool,
    pub invitation_id: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct TeacherSummary {
    pub total: usize,
    pub added: usize,
    pub invited: usize,
    pub exists: usize,
    pub failed: usize,
    pub skipped: usize,
    pub results: Vec<TeacherOpResult>,
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct StudentSummary {
    pub total: usize,
    pub success: usize,
    pub failed: usize,
    pub skipped: usize,
    pub results: Vec<BulkInvitationResult>,
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct BulkCourseSummary {
    pub teachers: TeacherSummary,
    pub students: StudentSummary,
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct BulkInvitationSummary {
    pub total: usize,
    pub success: usize,
    pub failed: usize,
    pub results: Vec<BulkInvitationResult>,
}

impl TeacherSummary {
    pub fn from_results(results: Vec<TeacherOpResult>, skipped: usize) -> Self {
        let count = |mode: TeacherMode| {
            results
                .iter()
                .filter(|r| r.success && r.mode == mode)
                .count()
        };

        Self {
            total: results.len(),
            added: count(TeacherMode::Added),
            invited: count(TeacherMode::Invited),
            exists: count(TeacherMode::Exists),
            failed: results.iter().filter(|r| !r.success).count(),
            skipped,
            results,
        }
    }
}

impl StudentSummary {
    pub fn from_results(results: Vec<BulkInvitationResult>, skipped: usize) -> Self {
        let success = results.iter().filter(|r| r.success).count();
        Self {
            total: results.len(),
            success,
            failed: results.len() - success,
            skipped,
            results,
        }
    }
}

impl BulkInvitationSummary {
    pub fn from_results(results: Vec<BulkInvitationResult>) -> Self {
        let success = results.iter().filter(|r| r.success).count();
        Self {
            total: results.len(),
            success,
            failed: results.len() - success,
            results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_defaults_to_student() {
        let req: InvitationRequest =
            serde_json::from_str(r#"{"courseId":"1","userEmail":"a@b.co","role":"owner"}"#).unwrap();
        assert_eq!(req.role, Role::Student);

        let req: InvitationRequest =
            serde_json::from_str(r#"{"courseId":"1","userEmail":"a@b.co"}"#).unwrap();
        assert_eq!(req.role, Role::Student);

        let req: InvitationRequest =
            serde_json::from_str(r#"{"courseId":"1","userEmail":"a@b.co","role":"teacher"}"#).unwrap();
        assert_eq!(req.role, Role::Teacher);
    }

    #[test]
    fn test_null_lists_are_accepted() {
        let body: BulkCourseInvitationRequest =
            serde_json::from_str(r#"{"teacherEmails":null}"#).unwrap();
        assert!(body.teacher_emails.is_none());
        assert!(body.student_emails.is_none());
    }

    #[test]
    fn test_teacher_summary_counts() {
        let result = |mode, success| TeacherOpResult {
            email: "t@x.com".into(),
            mode,
            success,
            error: None,
        };
        let summary = TeacherSummary::from_results(
            vec![
                result(TeacherMode::Added, true),
                result(TeacherMode::Invited, true),
                result(TeacherMode::Exists, true),
                result(TeacherMode::Failed, false),
            ],
            2,
        );
        assert_eq!(summary.total, 4);
        assert_eq!(summary.added, 1);
        assert_eq!(summary.invited, 1);
        assert_eq!(summary.exists, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.skipped, 2);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["results"][0]["mode"], "added");
    }
}
