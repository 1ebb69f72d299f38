use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::ToSchema;

use super::password::verify_password;
use crate::accounts::Directory;
use crate::error::LeaveError;
use crate::model::department;
use crate::model::role::StaffRole;
use crate::model::staff::{StaffAccount, StaffProfile};
use crate::model::student::Student;
use crate::store::{Collection, Document, Filter, StoreError};

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentLogin {
    #[schema(example = "21CS001")]
    pub reg_no: String,
    #[schema(example = "2003-05-14")]
    pub dob: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct StaffLogin {
    pub role: StaffRole,
    #[schema(example = "csc_advisor")]
    pub id: String,
    #[schema(example = "advisor123")]
    pub password: String,
    /// Required for advisors and HODs
    #[schema(example = "CSC")]
    pub dept: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AdminLogin {
    #[schema(example = "admin")]
    pub id: String,
    #[schema(example = "admin")]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AdminProfile {
    #[schema(example = "admin")]
    pub id: String,
    #[schema(example = "Administrator")]
    pub name: String,
}

/// A failed lookup is logged and treated like a miss, so a store outage
/// reads as a failed login rather than a server error.
fn found_or_denied(found: Result<Option<Document>, StoreError>) -> Result<Document, LeaveError> {
    match found {
        Ok(Some(document)) => Ok(document),
        Ok(None) => Err(LeaveError::InvalidCredentials),
        Err(e) => {
            warn!(error = %e, "Credential lookup failed");
            Err(LeaveError::InvalidCredentials)
        }
    }
}

impl Directory {
    /// Students sign in with registration number and date of birth.
    pub async fn login_student(&self, login: &StudentLogin) -> Result<Student, LeaveError> {
        let filter = Filter::all()
            .eq("regNo", login.reg_no.trim())
            .eq("dob", login.dob.trim());
        let document = found_or_denied(
            self.store()
                .find_one(Collection::Students, &filter)
                .await,
        )?;

        let student = document.decode::<Student>()?;
        info!(reg_no = %student.reg_no, "Student logged in");
        Ok(student)
    }

    /// Advisors and HODs must name the department their account belongs to.
    pub async fn login_staff(&self, login: &StaffLogin) -> Result<StaffProfile, LeaveError> {
        let mut filter = Filter::all().eq("id", login.id.trim());
        if login.role.is_department_scoped() {
            let dept = login
                .dept
                .as_deref()
                .map(str::trim)
                .filter(|dept| !dept.is_empty())
                .ok_or(LeaveError::InvalidCredentials)?;
            filter = filter.eq("dept", department::filter_value(dept));
        }

        let document = found_or_denied(self.store().find_one(login.role.collection(), &filter).await)?;
        let account = document.decode::<StaffAccount>()?;
        if !verify_password(&login.password, &account.password) {
            return Err(LeaveError::InvalidCredentials);
        }

        info!(role = %login.role, id = %account.id, "Staff logged in");
        Ok(StaffProfile::from_account(account, login.role))
    }

    pub fn login_admin(&self, login: &AdminLogin) -> Result<AdminProfile, LeaveError> {
        let admin = self.admin();
        if login.id != admin.id || login.password != admin.password {
            return Err(LeaveError::InvalidCredentials);
        }

        Ok(AdminProfile {
            id: admin.id.clone(),
            name: "Administrator".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::accounts::AdminCredentials;
    use crate::store::MemoryStore;
    use serde_json::json;

    async fn seeded() -> (Arc<MemoryStore>, Directory) {
        let store = Arc::new(MemoryStore::new());
        let directory = Directory::new(
            store.clone(),
            AdminCredentials {
                id: "root".to_string(),
                password: "s3cret".to_string(),
            },
        );
        directory.seed().await.expect("seed");
        let student: Student = serde_json::from_value(json!({
            "regNo": "21CS001",
            "dob": "2003-05-14",
            "dept": "CSC"
        }))
        .expect("student");
        directory.add_student(student).await.expect("add");
        (store, directory)
    }

    fn staff(role: StaffRole, id: &str, password: &str, dept: Option<&str>) -> StaffLogin {
        StaffLogin {
            role,
            id: id.to_string(),
            password: password.to_string(),
            dept: dept.map(str::to_string),
        }
    }

    #[actix_web::test]
    async fn student_login_matches_reg_no_and_dob() {
        let (_, directory) = seeded().await;

        let student = directory
            .login_student(&StudentLogin {
                reg_no: "21CS001".to_string(),
                dob: "2003-05-14".to_string(),
            })
            .await
            .expect("login");
        assert_eq!(student.dept.as_deref(), Some("CSC"));
        assert!(!student.id.is_empty());

        assert!(matches!(
            directory
                .login_student(&StudentLogin {
                    reg_no: "21CS001".to_string(),
                    dob: "2003-05-15".to_string(),
                })
                .await,
            Err(LeaveError::InvalidCredentials)
        ));
    }

    #[actix_web::test]
    async fn advisor_login_is_scoped_to_department() {
        let (_, directory) = seeded().await;

        let profile = directory
            .login_staff(&staff(StaffRole::Advisor, "csc_advisor", "advisor123", Some("CSC")))
            .await
            .expect("login");
        assert_eq!(profile.name.as_deref(), Some("Dr. Ravi Kumar"));

        for attempt in [
            staff(StaffRole::Advisor, "csc_advisor", "advisor123", Some("ECE")),
            staff(StaffRole::Advisor, "csc_advisor", "advisor123", None),
            staff(StaffRole::Advisor, "csc_advisor", "wrong", Some("CSC")),
            staff(StaffRole::Hod, "csc_advisor", "advisor123", Some("CSC")),
        ] {
            assert!(matches!(
                directory.login_staff(&attempt).await,
                Err(LeaveError::InvalidCredentials)
            ));
        }
    }

    #[actix_web::test]
    async fn management_login_ignores_department() {
        let (_, directory) = seeded().await;
        let profile = directory
            .login_staff(&staff(StaffRole::Management, "management", "management123", Some("ECE")))
            .await
            .expect("login");
        assert_eq!(profile.role, StaffRole::Management);
    }

    #[actix_web::test]
    async fn store_outage_reads_as_bad_credentials() {
        let (store, directory) = seeded().await;
        store.set_unavailable(true);
        assert!(matches!(
            directory
                .login_staff(&staff(StaffRole::Hod, "csc_hod", "hod123", Some("CSC")))
                .await,
            Err(LeaveError::InvalidCredentials)
        ));
    }

    #[actix_web::test]
    async fn admin_login_uses_configured_credentials() {
        let (_, directory) = seeded().await;
        let login = |id: &str, password: &str| AdminLogin {
            id: id.to_string(),
            password: password.to_string(),
        };
        assert_eq!(
            directory.login_admin(&login("root", "s3cret")).expect("login").id,
            "root"
        );
        assert!(directory.login_admin(&login("admin", "admin")).is_err());
    }
}
