use serde::Serialize;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

use super::Directory;
use crate::auth::password::hash_password;
use crate::error::LeaveError;
use crate::model::department::{self, canonicalize};
use crate::model::role::StaffRole;
use crate::model::staff::{NewStaff, StaffAccount, StaffProfile};
use crate::store::{Collection, Filter, encode};

/// Accounts created on first start: (role, dept, id, password, name).
pub const DEFAULT_STAFF: [(StaffRole, Option<&str>, &str, &str, &str); 9] = [
    (StaffRole::Advisor, Some("CSC"), "csc_advisor", "advisor123", "Dr. Ravi Kumar"),
    (StaffRole::Advisor, Some("ECE"), "ece_advisor", "advisor123", "Dr. Priya Sharma"),
    (StaffRole::Advisor, Some("AI&ML"), "aiml_advisor", "advisor123", "Dr. Suresh Patel"),
    (StaffRole::Advisor, Some("CYBER"), "cyber_advisor", "advisor123", "Dr. Anjali Reddy"),
    (StaffRole::Hod, Some("CSC"), "csc_hod", "hod123", "Dr. Karthik Rajan"),
    (StaffRole::Hod, Some("ECE"), "ece_hod", "hod123", "Dr. Meena Iyer"),
    (StaffRole::Hod, Some("AI&ML"), "aiml_hod", "hod123", "Dr. Arjun Menon"),
    (StaffRole::Hod, Some("CYBER"), "cyber_hod", "hod123", "Dr. Neha Gupta"),
    (StaffRole::Management, None, "management", "management123", "College Management"),
];

/// Accounts inserted by a seed run, per role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct SeedSummary {
    #[schema(example = 4)]
    pub advisors: usize,
    #[schema(example = 4)]
    pub hods: usize,
    #[schema(example = 1)]
    pub management: usize,
}

impl SeedSummary {
    fn record(&mut self, role: StaffRole) {
        match role {
            StaffRole::Advisor => self.advisors += 1,
            StaffRole::Hod => self.hods += 1,
            StaffRole::Management => self.management += 1,
        }
    }
}

impl Directory {
    /// Staff of one role, optionally limited to a department. Store failures
    /// yield an empty list.
    pub async fn list_staff(&self, role: StaffRole, dept: Option<&str>) -> Vec<StaffProfile> {
        let filter = Filter::all().eq_opt(
            "dept",
            dept.map(str::trim)
                .filter(|dept| !dept.is_empty() && *dept != "null")
                .map(department::filter_value),
        );

        match self.store.find(role.collection(), &filter).await {
            Ok(documents) => documents
                .into_iter()
                .filter_map(|document| {
                    let id = document.id.clone();
                    document
                        .decode::<StaffAccount>()
                        .map_err(|e| warn!(%role, doc_id = %id, error = %e, "Skipping malformed staff record"))
                        .ok()
                })
                .map(|account| StaffProfile::from_account(account, role))
                .collect(),
            Err(e) => {
                warn!(%role, error = %e, "Staff list unavailable, returning empty result");
                Vec::new()
            }
        }
    }

    /// Creates an account with a hashed password. Staff ids are unique per role.
    #[instrument(name = "staff_create", skip(self, staff), fields(role = %staff.role, id = %staff.id))]
    pub async fn create_staff(&self, staff: NewStaff) -> Result<StaffProfile, LeaveError> {
        let id = staff.id.trim();
        if id.is_empty() {
            return Err(LeaveError::MissingField("id"));
        }
        if staff.password.is_empty() {
            return Err(LeaveError::MissingField("password"));
        }

        let dept = if staff.role.is_department_scoped() {
            let dept = staff
                .dept
                .as_deref()
                .filter(|dept| !dept.trim().is_empty())
                .ok_or(LeaveError::MissingField("dept"))?;
            Some(canonicalize(dept)?.to_string())
        } else {
            None
        };

        let collection = staff.role.collection();
        if self.store.count(collection, &Filter::all().eq("id", id)).await? > 0 {
            return Err(LeaveError::Conflict(format!(
                "{} `{id}` already exists",
                staff.role
            )));
        }

        let mut account = StaffAccount {
            doc_id: String::new(),
            id: id.to_string(),
            name: staff.name,
            dept,
            password: hash_password(&staff.password)?,
        };
        account.doc_id = self.store.insert(collection, encode(&account)?).await?;
        info!(doc_id = %account.doc_id, "Staff account created");

        Ok(StaffProfile::from_account(account, staff.role))
    }

    /// Inserts the default accounts into every staff collection that is still
    /// empty. Collections that already hold accounts are left alone.
    #[instrument(name = "staff_seed", skip(self))]
    pub async fn seed(&self) -> Result<SeedSummary, LeaveError> {
        let mut summary = SeedSummary::default();

        for role in StaffRole::ALL {
            let collection = role.collection();
            if self.store.count(collection, &Filter::all()).await? > 0 {
                continue;
            }

            for (_, dept, id, password, name) in DEFAULT_STAFF
                .iter()
                .copied()
                .filter(|(seed_role, ..)| *seed_role == role)
            {
                let account = StaffAccount {
                    doc_id: String::new(),
                    id: id.to_string(),
                    name: Some(name.to_string()),
                    dept: dept.map(str::to_string),
                    password: hash_password(password)?,
                };
                self.store.insert(collection, encode(&account)?).await?;
                summary.record(role);
            }
        }

        info!(?summary, "Default staff seeded");
        Ok(summary)
    }

    /// Deletes every record in every collection, then seeds the defaults.
    #[instrument(name = "store_reset", skip(self))]
    pub async fn reset(&self) -> Result<SeedSummary, LeaveError> {
        for collection in Collection::ALL {
            let deleted = self.store.delete(collection, &Filter::all()).await?;
            info!(%collection, deleted, "Collection cleared");
        }
        self.seed().await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::accounts::AdminCredentials;
    use crate::auth::password::verify_password;
    use crate::store::{MemoryStore, RecordStore};

    fn directory() -> (Arc<MemoryStore>, Directory) {
        let store = Arc::new(MemoryStore::new());
        let directory = Directory::new(
            store.clone(),
            AdminCredentials {
                id: "admin".to_string(),
                password: "admin".to_string(),
            },
        );
        (store, directory)
    }

    fn new_staff(role: StaffRole, id: &str, dept: Option<&str>) -> NewStaff {
        NewStaff {
            role,
            id: id.to_string(),
            password: "secret".to_string(),
            name: Some("Dr. Test".to_string()),
            dept: dept.map(str::to_string),
        }
    }

    #[actix_web::test]
    async fn seed_fills_empty_collections_once() {
        let (_, directory) = directory();

        let first = directory.seed().await.expect("seed");
        assert_eq!(first, SeedSummary { advisors: 4, hods: 4, management: 1 });

        let second = directory.seed().await.expect("seed again");
        assert_eq!(second, SeedSummary::default());

        let hods = directory.list_staff(StaffRole::Hod, Some("ECE")).await;
        assert_eq!(hods.len(), 1);
        assert_eq!(hods[0].id, "ece_hod");
        assert_eq!(hods[0].name.as_deref(), Some("Dr. Meena Iyer"));
    }

    #[actix_web::test]
    async fn seeded_passwords_are_hashed() {
        let (store, directory) = directory();
        directory.seed().await.expect("seed");

        let advisor = store
            .find_one(Collection::Advisors, &Filter::all().eq("id", "csc_advisor"))
            .await
            .expect("find")
            .expect("present");
        let stored = advisor.field_str("password").expect("password");
        assert_ne!(stored, "advisor123");
        assert!(verify_password("advisor123", stored));
    }

    #[actix_web::test]
    async fn seed_skips_collections_that_have_accounts() {
        let (_, directory) = directory();
        directory
            .create_staff(new_staff(StaffRole::Advisor, "mech_advisor", Some("CSC")))
            .await
            .expect("create");

        let summary = directory.seed().await.expect("seed");
        assert_eq!(summary.advisors, 0);
        assert_eq!(summary.hods, 4);
        assert_eq!(directory.list_staff(StaffRole::Advisor, None).await.len(), 1);
    }

    #[actix_web::test]
    async fn reset_clears_everything_and_reseeds() {
        let (store, directory) = directory();
        directory.seed().await.expect("seed");
        directory
            .create_staff(new_staff(StaffRole::Hod, "extra_hod", Some("CSC")))
            .await
            .expect("create");
        store
            .insert(Collection::Students, serde_json::Map::new())
            .await
            .expect("insert");

        let summary = directory.reset().await.expect("reset");
        assert_eq!(summary, SeedSummary { advisors: 4, hods: 4, management: 1 });
        assert_eq!(store.count(Collection::Students, &Filter::all()).await.expect("count"), 0);
        assert_eq!(directory.list_staff(StaffRole::Hod, None).await.len(), 4);
    }

    #[actix_web::test]
    async fn create_staff_validates_input() {
        let (_, directory) = directory();

        assert!(matches!(
            directory.create_staff(new_staff(StaffRole::Advisor, "a", None)).await,
            Err(LeaveError::MissingField("dept"))
        ));
        assert!(matches!(
            directory
                .create_staff(new_staff(StaffRole::Advisor, "a", Some("Mechanical")))
                .await,
            Err(LeaveError::UnknownDepartment(_))
        ));

        let management = directory
            .create_staff(new_staff(StaffRole::Management, "dean", Some("CSC")))
            .await
            .expect("management ignores dept");
        assert_eq!(management.dept, None);

        let advisor = directory
            .create_staff(new_staff(StaffRole::Advisor, "cs2", Some("Computer Science")))
            .await
            .expect("create");
        assert_eq!(advisor.dept.as_deref(), Some("CSC"));

        assert!(matches!(
            directory
                .create_staff(new_staff(StaffRole::Advisor, "cs2", Some("CSC")))
                .await,
            Err(LeaveError::Conflict(_))
        ));
        directory
            .create_staff(new_staff(StaffRole::Hod, "cs2", Some("CSC")))
            .await
            .expect("ids are unique per role only");
    }
}
