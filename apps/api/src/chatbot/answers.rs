//! Markdown replies for the chatbot.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::chatbot::queries::{DepartmentCount, GeneralStats, SalaryStats};
use crate::models::employee::{EmployeeStatus, RosterEntry};

pub const HELP_MESSAGE: &str = "🤔 I didn't understand your question. Try asking:\n\n\
    **By position:**\n\
    - How many auxiliares are there?\n\
    - ¿Cuántos desarrolladores hay?\n\n\
    **By department:**\n\
    - How many employees are in Tecnología?\n\
    - ¿Cuántos empleados hay en Ventas?\n\n\
    **By status:**\n\
    - ¿Cuántos empleados están inactivos?\n\
    - How many employees are on vacation?\n\n\
    **Other:**\n\
    - What is the average salary?\n\
    - ¿Cuántos empleados hay?";

pub const PROCESSING_ERROR: &str =
    "❌ Something went wrong while processing your question. Please try again.";

pub const NO_EMPLOYEES: &str = "📊 There are no employees registered.";

/// `3500000.5` → `"$3,500,001 COP"`.
pub fn format_cop(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let digits = rounded.abs().trunc().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}${grouped} COP")
}

pub fn position_count(count: usize, label: &str, emoji: &str) -> String {
    format!("{emoji} There are **{count} {label}** on the platform.")
}

pub fn position_match_count(count: usize, position: &str) -> String {
    format!("📋 There are **{count}** employees with a position related to '{position}'.")
}

/// Zero matches and an unknown department read the same.
pub fn department_count(count: usize, department: &str) -> String {
    if count == 0 {
        format!("🔍 No employees found in the {department} department.")
    } else {
        format!("🏢 There are **{count} employees** in the **{department}** department.")
    }
}

pub fn status_count(count: usize, status: EmployeeStatus) -> String {
    let (emoji, phrase) = match status {
        EmployeeStatus::Active => ("✅", "with status **active**"),
        EmployeeStatus::Inactive => ("⏸️", "with status **inactive**"),
        EmployeeStatus::OnVacation => ("🏖️", "on **vacation**"),
        EmployeeStatus::OnLeave => ("📋", "on **leave**"),
    };
    format!("{emoji} There are **{count} employees** {phrase}.")
}

pub fn unknown_status(status: &str) -> String {
    format!("🔍 Status '{status}' not recognized.")
}

pub fn salary_stats(stats: Option<&SalaryStats>) -> String {
    match stats {
        None => NO_EMPLOYEES.to_string(),
        Some(stats) => format!(
            "💰 **Salary statistics:**\n\n\
             - Average: **{}**\n\
             - Maximum: **{}**\n\
             - Minimum: **{}**",
            format_cop(stats.average),
            format_cop(stats.max),
            format_cop(stats.min)
        ),
    }
}

pub fn general_stats(stats: &GeneralStats) -> String {
    format!(
        "📊 **General statistics:**\n\n\
         - Total employees: **{}**\n\
         - Active: **{}**\n\
         - On vacation: **{}**\n\
         - Inactive: **{}**",
        stats.total, stats.active, stats.on_vacation, stats.inactive
    )
}

pub fn department_breakdown(groups: &[DepartmentCount]) -> String {
    let mut out = String::from("🏢 **Employees by department:**\n\n");
    for group in groups {
        out.push_str(&format!("- **{}**: {}\n", group.department, group.count));
    }
    out
}

pub fn recent_hires(hires: &[&RosterEntry]) -> String {
    if hires.is_empty() {
        return "🆕 There are no employees registered.".to_string();
    }
    let mut out = format!("🆕 **Last {} employees hired:**\n\n", hires.len());
    for hire in hires {
        out.push_str(&format!("- **{}** - {}\n", hire.full_name, hire.position));
        out.push_str(&format!(
            "  {} | {}\n\n",
            hire.department_name,
            hire.hire_date.format("%d/%m/%Y")
        ));
    }
    out
}
