//! Tier 1: deterministic keyword rules, tried in order before any classifier.
//!
//! Order matters. Position rules come before department rules, which come
//! before status rules, which come before salary and general queries. The
//! `inactive` rule precedes `active`, and `active` additionally refuses any
//! message mentioning inactivity, since "activo" is a substring of "inactivo".

use crate::models::employee::EmployeeStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    /// Substring of the lower-cased message.
    Contains(&'static str),
    /// Whole word, for short keywords that hide inside longer words.
    Word(&'static str),
}

impl Keyword {
    fn matches(self, message: &str) -> bool {
        match self {
            Keyword::Contains(needle) => message.contains(needle),
            Keyword::Word(word) => message
                .split(|c: char| !c.is_alphanumeric())
                .any(|token| token == word),
        }
    }
}

/// The aggregate query a rule answers with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalQuery {
    PositionCount {
        needles: &'static [&'static str],
        label: &'static str,
        emoji: &'static str,
    },
    DepartmentCount(&'static str),
    StatusCount(EmployeeStatus),
    SalaryStats,
    GeneralStats,
    DepartmentBreakdown,
    RecentHires,
}

#[derive(Debug)]
pub struct PatternRule {
    pub any: &'static [Keyword],
    pub none: &'static [&'static str],
    pub query: LocalQuery,
}

use Keyword::{Contains, Word};

const fn rule(any: &'static [Keyword], query: LocalQuery) -> PatternRule {
    PatternRule {
        any,
        none: &[],
        query,
    }
}

pub static RULES: &[PatternRule] = &[
    // positions
    rule(
        &[Contains("auxiliar")],
        LocalQuery::PositionCount {
            needles: &["auxiliar"],
            label: "auxiliares",
            emoji: "📋",
        },
    ),
    rule(
        &[Contains("desarrollador"), Contains("developer")],
        LocalQuery::PositionCount {
            needles: &["desarrollador", "developer"],
            label: "developers",
            emoji: "💻",
        },
    ),
    rule(
        &[Contains("gerente"), Contains("manager")],
        LocalQuery::PositionCount {
            needles: &["gerente", "manager"],
            label: "managers",
            emoji: "👔",
        },
    ),
    rule(
        &[Contains("analista"), Contains("analyst")],
        LocalQuery::PositionCount {
            needles: &["analista", "analyst"],
            label: "analysts",
            emoji: "📊",
        },
    ),
    // departments
    rule(
        &[
            Contains("tecnología"),
            Contains("tecnologia"),
            Contains("technology"),
            Word("ti"),
            Word("it"),
            Contains("sistemas"),
        ],
        LocalQuery::DepartmentCount("Tecnología"),
    ),
    rule(
        &[
            Contains("recursos humanos"),
            Contains("rrhh"),
            Contains("human resources"),
        ],
        LocalQuery::DepartmentCount("Recursos Humanos"),
    ),
    rule(
        &[Contains("ventas"), Contains("comercial"), Word("sales")],
        LocalQuery::DepartmentCount("Ventas"),
    ),
    rule(&[Contains("marketing")], LocalQuery::DepartmentCount("Marketing")),
    rule(
        &[Contains("finanzas"), Contains("contabilidad"), Contains("finance")],
        LocalQuery::DepartmentCount("Finanzas"),
    ),
    rule(
        &[
            Contains("operaciones"),
            Contains("logística"),
            Contains("logistica"),
            Contains("operations"),
            Contains("logistics"),
        ],
        LocalQuery::DepartmentCount("Operaciones"),
    ),
    // statuses
    rule(
        &[Contains("inactivo"), Contains("inactive")],
        LocalQuery::StatusCount(EmployeeStatus::Inactive),
    ),
    rule(
        &[Contains("vacaciones"), Contains("vacation")],
        LocalQuery::StatusCount(EmployeeStatus::OnVacation),
    ),
    rule(
        &[Contains("licencia"), Word("leave")],
        LocalQuery::StatusCount(EmployeeStatus::OnLeave),
    ),
    PatternRule {
        any: &[Contains("activo"), Contains("active")],
        none: &["inactivo", "inactive"],
        query: LocalQuery::StatusCount(EmployeeStatus::Active),
    },
    // salary and general
    rule(
        &[Contains("salario"), Contains("sueldo"), Contains("salary")],
        LocalQuery::SalaryStats,
    ),
    rule(
        &[
            Contains("cuántos empleados"),
            Contains("cuantos empleados"),
            Contains("total de empleados"),
            Contains("estadísticas"),
            Contains("how many employees"),
            Contains("statistics"),
        ],
        LocalQuery::GeneralStats,
    ),
    rule(
        &[
            Contains("departamento"),
            Contains("por área"),
            Contains("by department"),
        ],
        LocalQuery::DepartmentBreakdown,
    ),
    rule(
        &[
            Contains("nuevos"),
            Contains("reciente"),
            Contains("contrataron"),
            Contains("recent"),
            Contains("new hires"),
        ],
        LocalQuery::RecentHires,
    ),
];

impl PatternRule {
    fn matches(&self, message: &str) -> bool {
        self.any.iter().any(|k| k.matches(message))
            && !self.none.iter().any(|n| message.contains(n))
    }
}

/// First rule matching the lower-cased, trimmed message.
pub fn match_message(message: &str) -> Option<LocalQuery> {
    let message = message.trim().to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.matches(&message))
        .map(|rule| rule.query)
}
