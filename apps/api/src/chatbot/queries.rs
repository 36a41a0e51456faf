//! Aggregate queries over one snapshot of the active roster.
//!
//! Callers load the roster once (`EmployeeStore::active_roster`) and run as
//! many of these as they need against it.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::employee::{EmployeeStatus, RosterEntry};

pub const RECENT_HIRES_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalaryStats {
    pub average: Decimal,
    pub max: Decimal,
    pub min: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GeneralStats {
    pub total: usize,
    pub active: usize,
    pub on_vacation: usize,
    pub inactive: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentCount {
    pub department: String,
    pub count: usize,
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

pub fn count_by_position(roster: &[RosterEntry], position: &str) -> usize {
    count_by_any_position(roster, &[position])
}

/// Employees whose position contains any of `needles`, case-insensitively.
pub fn count_by_any_position(roster: &[RosterEntry], needles: &[&str]) -> usize {
    let needles: Vec<String> = needles.iter().map(|n| n.to_lowercase()).collect();
    roster
        .iter()
        .filter(|e| needles.iter().any(|n| contains_ci(&e.position, n)))
        .count()
}

pub fn count_by_department(roster: &[RosterEntry], department: &str) -> usize {
    let needle = department.to_lowercase();
    roster
        .iter()
        .filter(|e| contains_ci(&e.department_name, &needle))
        .count()
}

pub fn count_by_status(roster: &[RosterEntry], status: EmployeeStatus) -> usize {
    roster.iter().filter(|e| e.status == status).count()
}

/// `None` for an empty roster.
pub fn salary_stats(roster: &[RosterEntry]) -> Option<SalaryStats> {
    let first = roster.first()?.salary;
    let (sum, max, min) = roster.iter().fold(
        (Decimal::ZERO, first, first),
        |(sum, max, min), e| (sum + e.salary, max.max(e.salary), min.min(e.salary)),
    );
    Some(SalaryStats {
        average: sum / Decimal::from(roster.len()),
        max,
        min,
    })
}

/// Latest hires first. Equal hire dates keep roster order.
pub fn recent_hires(roster: &[RosterEntry], limit: usize) -> Vec<&RosterEntry> {
    let mut hires: Vec<&RosterEntry> = roster.iter().collect();
    hires.sort_by(|a, b| b.hire_date.cmp(&a.hire_date));
    hires.truncate(limit);
    hires
}

/// Headcount per department, largest first. Ties keep first-seen order.
pub fn department_breakdown(roster: &[RosterEntry]) -> Vec<DepartmentCount> {
    let mut groups: Vec<DepartmentCount> = Vec::new();
    for entry in roster {
        match groups.iter_mut().find(|g| g.department == entry.department_name) {
            Some(group) => group.count += 1,
            None => groups.push(DepartmentCount {
                department: entry.department_name.clone(),
                count: 1,
            }),
        }
    }
    groups.sort_by(|a, b| b.count.cmp(&a.count));
    groups
}

pub fn general_stats(roster: &[RosterEntry]) -> GeneralStats {
    GeneralStats {
        total: roster.len(),
        active: count_by_status(roster, EmployeeStatus::Active),
        on_vacation: count_by_status(roster, EmployeeStatus::OnVacation),
        inactive: count_by_status(roster, EmployeeStatus::Inactive),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use chrono::NaiveDate;
    use uuid::Uuid;

    use super::*;

    pub(crate) fn entry(
        name: &str,
        position: &str,
        department: &str,
        status: EmployeeStatus,
        salary: i64,
        hired: (i32, u32, u32),
    ) -> RosterEntry {
        RosterEntry {
            id: Uuid::new_v4(),
            full_name: name.to_string(),
            position: position.to_string(),
            department_name: department.to_string(),
            status,
            salary: Decimal::new(salary, 0),
            hire_date: NaiveDate::from_ymd_opt(hired.0, hired.1, hired.2).unwrap(),
        }
    }

    pub(crate) fn sample_roster() -> Vec<RosterEntry> {
        use EmployeeStatus::*;
        vec![
            entry("Ana", "Senior Developer", "Tecnología", Active, 5_000_000, (2021, 1, 10)),
            entry("Bob", "Auxiliar contable", "Contabilidad", Inactive, 1_500_000, (2022, 6, 1)),
            entry("Cam", "Sales Manager", "Ventas", OnVacation, 4_000_000, (2023, 2, 15)),
            entry("Dee", "Desarrollador", "Tecnología", Active, 3_500_000, (2024, 3, 20)),
            entry("Eve", "Analista", "Ventas", OnLeave, 2_000_000, (2024, 3, 20)),
            entry("Fay", "Auxiliar de bodega", "Logística", Active, 1_200_000, (2020, 8, 5)),
        ]
    }

    #[test]
    fn test_position_match_is_case_insensitive_substring() {
        let roster = sample_roster();
        assert_eq!(count_by_position(&roster, "AUXILIAR"), 2);
        assert_eq!(count_by_any_position(&roster, &["desarrollador", "developer"]), 2);
        assert_eq!(count_by_position(&roster, "piloto"), 0);
    }

    #[test]
    fn test_department_match_is_substring() {
        let roster = sample_roster();
        assert_eq!(count_by_department(&roster, "tecno"), 2);
        assert_eq!(count_by_department(&roster, "Legal"), 0);
    }

    #[test]
    fn test_status_counts() {
        let roster = sample_roster();
        assert_eq!(count_by_status(&roster, EmployeeStatus::Active), 3);
        assert_eq!(count_by_status(&roster, EmployeeStatus::OnLeave), 1);
    }

    #[test]
    fn test_salary_stats() {
        let stats = salary_stats(&sample_roster()).unwrap();
        assert_eq!(stats.max, Decimal::new(5_000_000, 0));
        assert_eq!(stats.min, Decimal::new(1_200_000, 0));
        assert_eq!(stats.average, Decimal::new(17_200_000, 0) / Decimal::from(6));
    }

    #[test]
    fn test_salary_stats_empty_roster() {
        assert_eq!(salary_stats(&[]), None);
    }

    #[test]
    fn test_recent_hires_order_and_limit() {
        let roster = sample_roster();
        let hires = recent_hires(&roster, RECENT_HIRES_LIMIT);
        assert_eq!(hires.len(), 5);
        let names: Vec<&str> = hires.iter().map(|e| e.full_name.as_str()).collect();
        assert_eq!(names, vec!["Dee", "Eve", "Cam", "Bob", "Ana"]);
        assert!(hires.windows(2).all(|w| w[0].hire_date >= w[1].hire_date));
    }

    #[test]
    fn test_department_breakdown_sorted_by_count() {
        let breakdown = department_breakdown(&sample_roster());
        assert_eq!(breakdown[0].count, 2);
        assert_eq!(breakdown[0].department, "Tecnología");
        assert_eq!(breakdown[1].department, "Ventas");
        assert_eq!(breakdown.len(), 4);
    }

    #[test]
    fn test_general_stats_from_one_snapshot() {
        let stats = general_stats(&sample_roster());
        assert_eq!(
            stats,
            GeneralStats {
                total: 6,
                active: 3,
                on_vacation: 1,
                inactive: 1,
            }
        );
    }
}
