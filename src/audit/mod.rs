//! Offline department consistency report.
//!
//! Works on JSON snapshots rather than the live store, so it can run against
//! dumps taken from any deployment. It reports; fixing is `reconcile`'s job.

pub mod snapshot;

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

pub use snapshot::Snapshots;

/// Department coverage for one department that has leave records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentCoverage {
    pub dept: Option<String>,
    pub has_advisor: bool,
    /// `None` when no HOD snapshot was supplied.
    pub has_hod: Option<bool>,
}

impl DepartmentCoverage {
    /// No advisor (or, when known, no HOD) can act on these leaves.
    pub fn is_orphaned(&self) -> bool {
        !self.has_advisor || self.has_hod == Some(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingLeave {
    pub reg_no: Option<String>,
    pub dept: Option<String>,
    pub advisor_match: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    pub student_count: usize,
    pub leave_count: usize,
    pub advisor_count: usize,
    pub student_depts: BTreeSet<Option<String>>,
    pub leave_depts: BTreeSet<Option<String>>,
    pub advisor_depts: BTreeSet<Option<String>>,
    pub hod_depts: Option<BTreeSet<Option<String>>>,
    pub coverage: Vec<DepartmentCoverage>,
    pub pending: Vec<PendingLeave>,
}

impl AuditReport {
    pub fn orphaned(&self) -> impl Iterator<Item = &DepartmentCoverage> {
        self.coverage.iter().filter(|coverage| coverage.is_orphaned())
    }
}

fn string_field(record: &Value, field: &str) -> Option<String> {
    record.get(field).and_then(Value::as_str).map(str::to_string)
}

fn departments(records: &[Value]) -> BTreeSet<Option<String>> {
    records.iter().map(|record| string_field(record, "dept")).collect()
}

/// A missing department never counts as covered, even if some staff record
/// also lacks one.
fn covered(dept: &Option<String>, staff: &BTreeSet<Option<String>>) -> bool {
    dept.is_some() && staff.contains(dept)
}

pub fn audit(snapshots: &Snapshots) -> AuditReport {
    let student_depts = departments(&snapshots.students);
    let leave_depts = departments(&snapshots.leaves);
    let advisor_depts = departments(&snapshots.advisors);
    let hod_depts = snapshots.hods.as_deref().map(departments);

    let coverage = leave_depts
        .iter()
        .map(|dept| DepartmentCoverage {
            dept: dept.clone(),
            has_advisor: covered(dept, &advisor_depts),
            has_hod: hod_depts.as_ref().map(|hods| covered(dept, hods)),
        })
        .collect();

    let pending = snapshots
        .leaves
        .iter()
        .filter(|leave| leave.get("status").and_then(Value::as_str) == Some("Pending"))
        .map(|leave| {
            let dept = string_field(leave, "dept");
            PendingLeave {
                reg_no: string_field(leave, "regNo"),
                advisor_match: covered(&dept, &advisor_depts),
                dept,
            }
        })
        .collect();

    AuditReport {
        student_count: snapshots.students.len(),
        leave_count: snapshots.leaves.len(),
        advisor_count: snapshots.advisors.len(),
        student_depts,
        leave_depts,
        advisor_depts,
        hod_depts,
        coverage,
        pending,
    }
}

fn label(dept: &Option<String>) -> &str {
    dept.as_deref().unwrap_or("<none>")
}

fn write_set(f: &mut fmt::Formatter<'_>, name: &str, depts: &BTreeSet<Option<String>>) -> fmt::Result {
    let labels: Vec<_> = depts.iter().map(label).collect();
    writeln!(f, "{name:<14} {}", labels.join(", "))
}

impl fmt::Display for AuditReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Loaded {} leaves, {} students, {} advisors.",
            self.leave_count, self.student_count, self.advisor_count
        )?;

        writeln!(f, "\n--- Department codes ---")?;
        write_set(f, "Students:", &self.student_depts)?;
        write_set(f, "Leaves:", &self.leave_depts)?;
        write_set(f, "Advisors:", &self.advisor_depts)?;
        if let Some(hods) = &self.hod_depts {
            write_set(f, "HODs:", hods)?;
        }

        writeln!(f, "\n--- Coverage ---")?;
        for coverage in &self.coverage {
            let dept = label(&coverage.dept);
            if !coverage.has_advisor {
                writeln!(f, "CRITICAL: leaves exist for dept '{dept}' but no advisor has that dept.")?;
            }
            if coverage.has_hod == Some(false) {
                writeln!(f, "CRITICAL: leaves exist for dept '{dept}' but no HOD has that dept.")?;
            }
            if !coverage.is_orphaned() {
                writeln!(f, "OK: leaves for '{dept}' have a matching advisor.")?;
            }
        }

        writeln!(f, "\nTotal pending leaves: {}", self.pending.len())?;
        for leave in &self.pending {
            writeln!(
                f,
                "  - Pending: {} ({}) -> advisor match? {}",
                leave.reg_no.as_deref().unwrap_or("<no regNo>"),
                label(&leave.dept),
                leave.advisor_match
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshots(hods: Option<Vec<Value>>) -> Snapshots {
        Snapshots {
            students: vec![
                json!({"regNo": "21CS001", "dept": "CSC"}),
                json!({"regNo": "21CS002", "dept": "Computer Science"}),
            ],
            leaves: vec![
                json!({"regNo": "21CS001", "dept": "CSC", "status": "Pending"}),
                json!({"regNo": "21CS002", "dept": "Computer Science", "status": "Pending"}),
                json!({"regNo": "21EC001", "dept": "ECE", "status": "HOD Approved"}),
                json!({"regNo": "21XX001", "status": "Pending"}),
            ],
            advisors: vec![
                json!({"id": "csc_advisor", "dept": "CSC"}),
                json!({"id": "ece_advisor", "dept": "ECE"}),
                json!({"id": "floating"}),
            ],
            hods,
        }
    }

    #[test]
    fn reports_department_sets() {
        let report = audit(&snapshots(None));
        assert_eq!(report.leave_count, 4);
        assert!(report.student_depts.contains(&Some("Computer Science".to_string())));
        assert!(report.leave_depts.contains(&None));
        assert!(report.advisor_depts.contains(&None));
        assert_eq!(report.hod_depts, None);
    }

    #[test]
    fn flags_leave_departments_without_advisors() {
        let report = audit(&snapshots(None));
        let orphaned: Vec<_> = report.orphaned().map(|c| c.dept.clone()).collect();
        assert_eq!(orphaned, vec![None, Some("Computer Science".to_string())]);

        let csc = report
            .coverage
            .iter()
            .find(|c| c.dept.as_deref() == Some("CSC"))
            .expect("CSC coverage");
        assert!(csc.has_advisor);
        assert_eq!(csc.has_hod, None);
    }

    #[test]
    fn hod_snapshot_adds_hod_coverage() {
        let report = audit(&snapshots(Some(vec![json!({"id": "csc_hod", "dept": "CSC"})])));
        let ece = report
            .coverage
            .iter()
            .find(|c| c.dept.as_deref() == Some("ECE"))
            .expect("ECE coverage");
        assert!(ece.has_advisor);
        assert_eq!(ece.has_hod, Some(false));
        assert!(ece.is_orphaned());
    }

    #[test]
    fn lists_pending_leaves_with_advisor_match() {
        let report = audit(&snapshots(None));
        let pending: Vec<_> = report
            .pending
            .iter()
            .map(|p| (p.reg_no.as_deref(), p.advisor_match))
            .collect();
        assert_eq!(
            pending,
            vec![(Some("21CS001"), true), (Some("21CS002"), false), (Some("21XX001"), false)]
        );

        let rendered = report.to_string();
        assert!(rendered.contains("CRITICAL: leaves exist for dept 'Computer Science'"));
        assert!(rendered.contains("Total pending leaves: 3"));
    }
}
