//! Students and staff accounts.

mod staff;

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

pub use staff::{DEFAULT_STAFF, SeedSummary};

use crate::error::LeaveError;
use crate::model::department::{self, canonicalize};
use crate::model::student::Student;
use crate::store::{Collection, Filter, Patch, RecordStore, encode};

/// Fixed administrator login, taken from configuration.
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    pub id: String,
    pub password: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct ImportSummary {
    #[schema(example = 58)]
    pub inserted: usize,
    /// Records whose `regNo` already existed
    #[schema(example = 2)]
    pub skipped: usize,
}

pub struct Directory {
    store: Arc<dyn RecordStore>,
    admin: AdminCredentials,
}

impl Directory {
    pub fn new(store: Arc<dyn RecordStore>, admin: AdminCredentials) -> Self {
        Self { store, admin }
    }

    pub(crate) fn store(&self) -> &dyn RecordStore {
        self.store.as_ref()
    }

    pub(crate) fn admin(&self) -> &AdminCredentials {
        &self.admin
    }

    pub async fn list_students(&self, dept: Option<&str>) -> Vec<Student> {
        let filter = Filter::all().eq_opt(
            "dept",
            dept.map(str::trim)
                .filter(|dept| !dept.is_empty() && *dept != "null")
                .map(department::filter_value),
        );

        match self.store.find(Collection::Students, &filter).await {
            Ok(documents) => documents
                .into_iter()
                .filter_map(|document| {
                    let id = document.id.clone();
                    document
                        .decode::<Student>()
                        .map_err(|e| warn!(student_id = %id, error = %e, "Skipping malformed student"))
                        .ok()
                })
                .collect(),
            Err(e) => {
                warn!(error = %e, "Student list unavailable, returning empty result");
                Vec::new()
            }
        }
    }

    /// Adds one student; an existing `regNo` is a conflict.
    #[instrument(name = "student_add", skip(self, student), fields(reg_no = %student.reg_no))]
    pub async fn add_student(&self, student: Student) -> Result<String, LeaveError> {
        let student = normalize_student(student)?;

        if self.student_exists(&student.reg_no).await? {
            return Err(LeaveError::Conflict("Student already exists".to_string()));
        }

        let id = self
            .store
            .insert(Collection::Students, encode(&student)?)
            .await?;
        info!(student_id = %id, "Student created");
        Ok(id)
    }

    /// Inserts every student whose `regNo` is not stored yet. The whole batch
    /// is validated before anything is written.
    #[instrument(name = "student_import", skip(self, students), fields(records = students.len()))]
    pub async fn import_students(&self, students: Vec<Student>) -> Result<ImportSummary, LeaveError> {
        if students.is_empty() {
            return Err(LeaveError::EmptyImport);
        }

        let students = students
            .into_iter()
            .map(normalize_student)
            .collect::<Result<Vec<_>, _>>()?;

        let mut summary = ImportSummary {
            inserted: 0,
            skipped: 0,
        };
        for student in students {
            if self.student_exists(&student.reg_no).await? {
                summary.skipped += 1;
                continue;
            }
            self.store
                .insert(Collection::Students, encode(&student)?)
                .await?;
            summary.inserted += 1;
        }

        info!(inserted = summary.inserted, skipped = summary.skipped, "Students imported");
        Ok(summary)
    }

    pub async fn delete_student(&self, reg_no: &str) -> Result<u64, LeaveError> {
        let reg_no = reg_no.trim();
        if reg_no.is_empty() {
            return Err(LeaveError::MissingField("regNo"));
        }

        let deleted = self
            .store
            .delete(Collection::Students, &Filter::all().eq("regNo", reg_no))
            .await?;
        info!(reg_no, deleted, "Student deleted");
        Ok(deleted)
    }

    /// Stores the device token used for status-change notifications.
    pub async fn register_fcm_token(&self, reg_no: &str, token: &str) -> Result<(), LeaveError> {
        if !self.student_exists(reg_no).await? {
            return Err(LeaveError::NotFound("Student"));
        }

        self.store
            .update(
                Collection::Students,
                &Filter::all().eq("regNo", reg_no),
                &Patch::new().set("fcmToken", token),
            )
            .await?;
        Ok(())
    }

    async fn student_exists(&self, reg_no: &str) -> Result<bool, LeaveError> {
        Ok(self
            .store
            .count(Collection::Students, &Filter::all().eq("regNo", reg_no))
            .await?
            > 0)
    }
}

fn normalize_student(mut student: Student) -> Result<Student, LeaveError> {
    student.id = String::new();
    student.reg_no = student.reg_no.trim().to_string();
    if student.reg_no.is_empty() {
        return Err(LeaveError::MissingField("regNo"));
    }
    student.dept = student
        .dept
        .as_deref()
        .map(canonicalize)
        .transpose()?
        .map(str::to_string);
    Ok(student)
}
