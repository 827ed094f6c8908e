use actix_web::{web, HttpResponse};
use crate::models::{
    BulkCourseInvitationRequest, BulkCourseSummary, BulkInvitationRequest, BulkInvitationSummary,
    Invitation, InvitationRequest,
};
use crate::services::{enrollment_service, resolve_course_id, ClassroomProvider};
use crate::utils::AppError;

/// POST /api/invitations/course/{courseIdOrUrlOrToken}/bulk
/// Invites teachers (optional) and students to a single course
#[utoipa::path(
    post,
    path = "/api/invitations/course/{course_ref}/bulk",
    tag = "Invitations",
    params(
        ("course_ref" = String, Path, description = "Numeric courseId, full Classroom URL (percent-encoded) or the base64 token after /c/")
    ),
    request_body = BulkCourseInvitationRequest,
    responses(
        (status = 200, description = "Per-recipient outcomes, even when some failed", body = BulkCourseSummary),
        (status = 400, description = "Course identifier could not be resolved or body missing"),
        (status = 404, description = "Course not found")
    )
)]
pub async fn bulk_for_course(
    provider: web::Data<dyn ClassroomProvider>,
    path: web::Path<String>,
    body: Option<web::Json<BulkCourseInvitationRequest>>,
) -> Result<HttpResponse, AppError> {
    let course_ref = path.into_inner();
    log::info!("📨 POST /invitations/course/{}/bulk", course_ref);

    if course_ref.trim().is_empty() {
        return Err(AppError::InvalidRequest("courseId is required".to_string()));
    }
    let body = body
        .ok_or_else(|| AppError::MissingBody(course_ref.clone()))?
        .into_inner();

    let course_id = resolve_course_id(&course_ref).ok_or_else(|| {
        log::warn!("⚠️ Unable to resolve courseId from '{}'", course_ref);
        AppError::UnresolvableCourse(course_ref.clone())
    })?;

    let teacher_emails = body.teacher_emails.unwrap_or_default();
    let student_emails = body.student_emails.unwrap_or_default();

    let summary = enrollment_service::run_bulk_for_course(
        provider.get_ref(),
        &course_id,
        &teacher_emails,
        &student_emails,
    )
    .await
    .map_err(|e| {
        log::error!("❌ Course {} not found: {}", course_id, e.0);
        AppError::CourseNotFound(e.0)
    })?;

    log::info!(
        "✅ Course {}: teachers {}/{} ok, students {}/{} ok",
        course_id,
        summary.teachers.total - summary.teachers.failed,
        summary.teachers.total,
        summary.students.success,
        summary.students.total
    );

    Ok(HttpResponse::Ok().json(summary))
}

/// POST /api/invitations
#[utoipa::path(
    post,
    path = "/api/invitations",
    tag = "Invitations",
    request_body = InvitationRequest,
    responses(
        (status = 201, description = "Invitation created", body = Invitation),
        (status = 400, description = "courseId or userEmail missing"),
        (status = 404, description = "Course or user not found"),
        (status = 409, description = "Already invited or enrolled")
    )
)]
pub async fn create_invitation(
    provider: web::Data<dyn ClassroomProvider>,
    body: Option<web::Json<InvitationRequest>>,
) -> Result<HttpResponse, AppError> {
    let request = body
        .ok_or_else(|| AppError::InvalidRequest("Request body is required".to_string()))?
        .into_inner();

    let email = request.user_email.trim();
    if request.course_id.trim().is_empty() || email.is_empty() {
        return Err(AppError::InvalidRequest(
            "courseId and userEmail are required".to_string(),
        ));
    }

    let course_id = resolve_course_id(&request.course_id)
        .ok_or_else(|| AppError::UnresolvableCourse(request.course_id.clone()))?;

    log::info!(
        "✉️ POST /invitations - course: {}, email: {}, role: {}",
        course_id,
        email,
        request.role.as_str()
    );

    let invitation = provider
        .create_invitation(&course_id, email, request.role)
        .await
        .map_err(|e| {
            log::error!("❌ Failed to create invitation for {}: {}", email, e);
            AppError::from(e)
        })?;

    log::info!("✅ Invitation {} created", invitation.id);
    Ok(HttpResponse::Created().json(invitation))
}

/// GET /api/invitations/{id}
#[utoipa::path(
    get,
    path = "/api/invitations/{id}",
    tag = "Invitations",
    params(
        ("id" = String, Path, description = "Invitation id")
    ),
    responses(
        (status = 200, description = "Invitation", body = Invitation),
        (status = 404, description = "Invitation not found")
    )
)]
pub async fn get_invitation(
    provider: web::Data<dyn ClassroomProvider>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    log::info!("🔍 GET /invitations/{}", id);

    match provider.get_invitation(&id).await {
        Ok(invitation) => Ok(HttpResponse::Ok().json(invitation)),
        Err(e) => {
            log::warn!("⚠️ Invitation {} lookup failed: {}", id, e);
            Err(AppError::from(e))
        }
    }
}

/// POST /api/invitations/bulk
/// Each item carries its own course and role
#[utoipa::path(
    post,
    path = "/api/invitations/bulk",
    tag = "Invitations",
    request_body = BulkInvitationRequest,
    responses(
        (status = 200, description = "Per-item outcomes", body = BulkInvitationSummary),
        (status = 400, description = "No items provided")
    )
)]
pub async fn bulk_invitations(
    provider: web::Data<dyn ClassroomProvider>,
    body: Option<web::Json<BulkInvitationRequest>>,
) -> Result<HttpResponse, AppError> {
    let items = body
        .and_then(|b| b.into_inner().items)
        .unwrap_or_default();

    if items.is_empty() {
        return Err(AppError::InvalidRequest("No items provided".to_string()));
    }

    log::info!("📨 POST /invitations/bulk - {} items", items.len());

    let summary = enrollment_service::run_bulk_invitations(provider.get_ref(), &items).await;

    log::info!("✅ Bulk invitations: {} ok, {} failed", summary.success, summary.failed);
    Ok(HttpResponse::Ok().json(summary))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/invitations")
            .route("", web::post().to(create_invitation))
            .route("/bulk", web::post().to(bulk_invitations))
            .route("/course/{course_ref:.+}/bulk", web::post().to(bulk_for_course))
            .route("/{id}", web::get().to(get_invitation)),
    );
}
