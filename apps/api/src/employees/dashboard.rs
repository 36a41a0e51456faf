//! Dashboard figures, all computed from one roster snapshot.

use axum::{extract::State, Json};
use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::chatbot::queries::{
    department_breakdown, general_stats, recent_hires, salary_stats, DepartmentCount,
    RECENT_HIRES_LIMIT,
};
use crate::errors::AppError;
use crate::models::employee::RosterEntry;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub total_employees: usize,
    pub active_employees: usize,
    pub on_vacation: usize,
    pub inactive_employees: usize,
    pub average_salary: Decimal,
    pub new_this_month: usize,
    pub employees_by_department: Vec<DepartmentCount>,
    pub recent_hires: Vec<RosterEntry>,
}

pub fn build_dashboard(roster: &[RosterEntry], today: NaiveDate) -> DashboardStats {
    let stats = general_stats(roster);
    let month_start = today.with_day(1).unwrap_or(today);

    DashboardStats {
        total_employees: stats.total,
        active_employees: stats.active,
        on_vacation: stats.on_vacation,
        inactive_employees: stats.inactive,
        average_salary: salary_stats(roster)
            .map(|s| s.average.round_dp(2))
            .unwrap_or(Decimal::ZERO),
        new_this_month: roster.iter().filter(|e| e.hire_date >= month_start).count(),
        employees_by_department: department_breakdown(roster),
        recent_hires: recent_hires(roster, RECENT_HIRES_LIMIT)
            .into_iter()
            .cloned()
            .collect(),
    }
}

/// GET /api/v1/dashboard
pub async fn handle_dashboard(
    State(state): State<AppState>,
) -> Result<Json<DashboardStats>, AppError> {
    let roster = state.store.active_roster().await?;
    Ok(Json(build_dashboard(&roster, Utc::now().date_naive())))
}
