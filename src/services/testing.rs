// In-memory ClassroomProvider for tests: scripted outcomes per email, success otherwise.

use crate::models::{Invitation, Role};
use crate::services::classroom_client::{ClassroomProvider, ProviderError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Default)]
pub struct ScriptedClassroom {
    teachers: HashMap<String, Result<(), ProviderError>>,
    invitations: HashMap<String, Result<Invitation, ProviderError>>,
    stored: HashMap<String, Invitation>,
    teacher_calls: AtomicUsize,
    invitation_calls: AtomicUsize,
}

impl ScriptedClassroom {
    pub fn teacher(mut self, email: &str, outcome: Result<(), ProviderError>) -> Self {
        self.teachers.insert(email.to_string(), outcome);
        self
    }

    pub fn invitation(mut self, email: &str, outcome: Result<Invitation, ProviderError>) -> Self {
        self.invitations.insert(email.to_string(), outcome);
        self
    }

    pub fn stored_invitation(mut self, invitation: Invitation) -> Self {
        self.stored.insert(invitation.id.clone(), invitation);
        self
    }

    pub fn teacher_calls(&self) -> usize {
        self.teacher_calls.load(Ordering::SeqCst)
    }

    pub fn invitation_calls(&self) -> usize {
        self.invitation_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClassroomProvider for ScriptedClassroom {
    async fn add_teacher(&self, _course_id: &str, email: &str) -> Result<(), ProviderError> {
        self.teacher_calls.fetch_add(1, Ordering::SeqCst);
        self.teachers.get(email).cloned().unwrap_or(Ok(()))
    }

    async fn create_invitation(
        &self,
        course_id: &str,
        email: &str,
        role: Role,
    ) -> Result<Invitation, ProviderError> {
        let n = self.invitation_calls.fetch_add(1, Ordering::SeqCst);
        self.invitations.get(email).cloned().unwrap_or_else(|| {
            Ok(Invitation {
                id: format!("inv-{}", n + 1),
                course_id: course_id.to_string(),
                user_id: email.to_string(),
                role: role.as_str().to_string(),
            })
        })
    }

    async fn get_invitation(&self, id: &str) -> Result<Invitation, ProviderError> {
        self.stored
            .get(id)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound("Requested entity was not found.".to_string()))
    }
}
