use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Classroom Enrollment Service API",
        version = "1.0.0",
        description = "Bulk enrollment of teachers and students into Google Classroom courses.\n\n**Course identifiers:** every endpoint that takes a course accepts a numeric courseId, a full Classroom URL (`?courseid=...` or `/c/<token>`) or the bare base64 token.\n\n**Bulk results:** per-recipient failures are reported in the payload; the HTTP status only reflects request-level problems (unresolvable course, missing body, course not found).",
        contact(
            name = "Classroom Enrollment Team"
        )
    ),
    paths(
        // Invitations
        crate::api::invitations::bulk_for_course,
        crate::api::invitations::create_invitation,
        crate::api::invitations::get_invitation,
        crate::api::invitations::bulk_invitations,

        // Health & Metrics
        crate::api::health::health_check,
        crate::api::metrics::get_metrics,
    ),
    components(
        schemas(
            // Invitations
            crate::models::Role,
            crate::models::InvitationRequest,
            crate::models::BulkCourseInvitationRequest,
            crate::models::BulkInvitationRequest,
            crate::models::Invitation,
            crate::models::TeacherMode,
            crate::models::TeacherOpResult,
            crate::models::BulkInvitationResult,
            crate::models::TeacherSummary,
            crate::models::StudentSummary,
            crate::models::BulkCourseSummary,
            crate::models::BulkInvitationSummary,

            // Health
            crate::api::health::HealthResponse,
        )
    ),
    tags(
        (name = "Invitations", description = "Course invitations and bulk teacher/student enrollment."),
        (name = "Health", description = "Health check and system metrics endpoints for monitoring service status."),
    )
)]
pub struct ApiDoc;
