//! Leave application lifecycle: submission, status changes, listing and
//! attendance statistics.

mod attendance;
pub mod transitions;

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

pub use attendance::AttendanceStats;
pub use transitions::TransitionPolicy;

use crate::clock::Clock;
use crate::error::LeaveError;
use crate::model::department::{self, canonicalize};
use crate::model::leave_application::{LeaveApplication, LeaveFilter, LeaveStatus, LeaveSubmission};
use crate::model::role::ActingRole;
use crate::model::student::Student;
use crate::notify::NotificationSink;
use crate::store::{Collection, Filter, Patch, RecordStore, encode};

/// Fields only the service writes; a submission cannot set them.
const SERVER_OWNED_FIELDS: [&str; 5] = ["_id", "status", "appliedDate", "advisorAction", "hodAction"];

pub struct LeaveLifecycle {
    store: Arc<dyn RecordStore>,
    notifier: Arc<dyn NotificationSink>,
    clock: Arc<dyn Clock>,
    policy: TransitionPolicy,
}

impl LeaveLifecycle {
    pub fn new(
        store: Arc<dyn RecordStore>,
        notifier: Arc<dyn NotificationSink>,
        clock: Arc<dyn Clock>,
        policy: TransitionPolicy,
    ) -> Self {
        Self {
            store,
            notifier,
            clock,
            policy,
        }
    }

    pub fn policy(&self) -> TransitionPolicy {
        self.policy
    }

    /// Records a new application as `Pending`, stamped with today's date, and
    /// copies the submitted contact details onto the student record.
    #[instrument(name = "leave_submit", skip(self, submission), fields(reg_no = ?submission.reg_no))]
    pub async fn submit(&self, submission: LeaveSubmission) -> Result<String, LeaveError> {
        let reg_no = submission
            .reg_no
            .as_deref()
            .map(str::trim)
            .filter(|reg_no| !reg_no.is_empty())
            .ok_or(LeaveError::MissingField("regNo"))?
            .to_string();

        let dept = match submission.dept.as_deref() {
            Some(dept) => Some(canonicalize(dept)?.to_string()),
            None => self.student_department(&reg_no).await,
        };

        let mut extra = submission.extra;
        for field in SERVER_OWNED_FIELDS {
            extra.remove(field);
        }

        let record = LeaveApplication {
            id: String::new(),
            reg_no: reg_no.clone(),
            name: submission.name,
            dept,
            from_date: submission.from_date,
            to_date: submission.to_date,
            reason: submission.reason,
            leave_type: submission.leave_type,
            student_email: submission.student_email.clone(),
            parent_mobile: submission.parent_mobile.clone(),
            applied_date: self.clock.today(),
            status: LeaveStatus::Pending,
            advisor_action: None,
            hod_action: None,
            extra,
        };

        let id = self
            .store
            .insert(Collection::LeaveApplications, encode(&record)?)
            .await?;
        info!(leave_id = %id, "Leave applied");

        let contact = Patch::new()
            .set_opt("email", submission.student_email)
            .set_opt("parentMobile", submission.parent_mobile);
        if !contact.is_empty() {
            if let Err(e) = self
                .store
                .update(Collection::Students, &Filter::all().eq("regNo", reg_no.as_str()), &contact)
                .await
            {
                warn!(error = %e, "Failed to copy contact details onto student record");
            }
        }

        Ok(id)
    }

    /// Moves an application to `new_status` and stamps the acting role's
    /// action date. The student is notified afterwards; a failed notification
    /// does not undo or fail the update.
    #[instrument(name = "leave_set_status", skip(self))]
    pub async fn set_status(
        &self,
        id: &str,
        new_status: LeaveStatus,
        role: Option<ActingRole>,
    ) -> Result<LeaveApplication, LeaveError> {
        let document = self
            .store
            .find_one(Collection::LeaveApplications, &Filter::by_id(id))
            .await?
            .ok_or(LeaveError::NotFound("Leave application"))?;
        let mut record: LeaveApplication = document.decode()?;

        if !self.policy.allows(record.status, new_status) {
            return Err(LeaveError::InvalidTransition {
                from: record.status,
                to: new_status,
            });
        }

        let today = self.clock.today();
        let mut patch = Patch::new().set("status", new_status.label());
        match role {
            Some(ActingRole::Advisor) => {
                patch = patch.set("advisorAction", today.to_string());
                record.advisor_action = Some(today);
            }
            Some(ActingRole::Hod) => {
                patch = patch.set("hodAction", today.to_string());
                record.hod_action = Some(today);
            }
            _ => {}
        }

        self.store
            .update(Collection::LeaveApplications, &Filter::by_id(id), &patch)
            .await?;

        info!(from = %record.status, to = %new_status, "Leave status updated");
        record.status = new_status;

        self.notify_student(&record).await;
        Ok(record)
    }

    /// Leave applications matching every supplied key, newest `appliedDate`
    /// first; same-day records keep insertion order. Store failures yield an
    /// empty list.
    pub async fn list(&self, filter: &LeaveFilter) -> Vec<LeaveApplication> {
        let store_filter = Filter::all()
            .eq_opt("regNo", filter.effective_reg_no())
            .eq_opt("dept", filter.effective_dept().map(department::filter_value))
            .eq_opt("status", filter.status.map(LeaveStatus::label));

        let documents = match self
            .store
            .find(Collection::LeaveApplications, &store_filter)
            .await
        {
            Ok(documents) => documents,
            Err(e) => {
                warn!(error = %e, "Leave list unavailable, returning empty result");
                return Vec::new();
            }
        };

        let mut records: Vec<LeaveApplication> = documents
            .into_iter()
            .filter_map(|document| {
                let id = document.id.clone();
                document
                    .decode::<LeaveApplication>()
                    .map_err(|e| warn!(leave_id = %id, error = %e, "Skipping malformed leave record"))
                    .ok()
            })
            .collect();

        // stable: ties stay in insertion order
        records.sort_by(|a, b| b.applied_date.cmp(&a.applied_date));
        records
    }

    pub async fn get(&self, id: &str) -> Result<LeaveApplication, LeaveError> {
        let document = match self
            .store
            .find_one(Collection::LeaveApplications, &Filter::by_id(id))
            .await
        {
            Ok(document) => document,
            Err(e) => {
                warn!(leave_id = id, error = %e, "Leave lookup failed");
                None
            }
        };

        Ok(document
            .ok_or(LeaveError::NotFound("Leave application"))?
            .decode()?)
    }

    async fn student(&self, reg_no: &str) -> Option<Student> {
        let found = self
            .store
            .find_one(Collection::Students, &Filter::all().eq("regNo", reg_no))
            .await;

        match found {
            Ok(Some(document)) => document
                .decode::<Student>()
                .map_err(|e| warn!(reg_no, error = %e, "Malformed student record"))
                .ok(),
            Ok(None) => None,
            Err(e) => {
                warn!(reg_no, error = %e, "Student lookup failed");
                None
            }
        }
    }

    async fn student_department(&self, reg_no: &str) -> Option<String> {
        self.student(reg_no).await.and_then(|student| student.dept)
    }

    async fn notify_student(&self, record: &LeaveApplication) {
        let Some(token) = self
            .student(&record.reg_no)
            .await
            .and_then(|student| student.fcm_token)
            .filter(|token| !token.is_empty())
        else {
            debug!(reg_no = %record.reg_no, "No push token registered, skipping notification");
            return;
        };

        let title = "Leave Status Update";
        let body = format!(
            "Your leave from {} to {} is now {}",
            record.from_date, record.to_date, record.status
        );

        if let Err(e) = self.notifier.send(&token, title, &body).await {
            warn!(reg_no = %record.reg_no, error = %e, "Failed to send leave notification");
        }
    }
}
