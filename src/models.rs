use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MetricType {
    #[serde(rename = "Motorista", alias = "Driver")]
    Driver,
    #[serde(rename = "Corrida", alias = "Ride")]
    Ride,
}

impl MetricType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Driver => "Motorista",
            Self::Ride => "Corrida",
        }
    }

    pub fn unit_label(self) -> &'static str {
        match self {
            Self::Driver => "motoristas",
            Self::Ride => "corridas",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Self::Driver => "#28a745",
            Self::Ride => "#007bff",
        }
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "motorista" | "driver" => Ok(Self::Driver),
            "corrida" | "ride" => Ok(Self::Ride),
            other => Err(format!("unknown metric type '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GoalRecord {
    pub phase: String,
    pub city: String,
    pub metric_type: MetricType,
    pub target: f64,
    pub achieved: f64,
    pub unit: String,
    pub period: String,
}

impl GoalRecord {
    pub fn new(
        phase: impl Into<String>,
        city: impl Into<String>,
        metric_type: MetricType,
        target: f64,
        achieved: f64,
        period: impl Into<String>,
    ) -> Self {
        Self {
            phase: phase.into(),
            city: city.into(),
            metric_type,
            target,
            achieved,
            unit: metric_type.unit_label().to_string(),
            period: period.into(),
        }
    }

    pub fn check_quantities(&self) -> Result<(), String> {
        check_quantity(GoalField::Target, self.target)?;
        check_quantity(GoalField::Achieved, self.achieved)
    }

    pub fn field_value(&self, field: GoalField) -> String {
        match field {
            GoalField::Phase => self.phase.clone(),
            GoalField::City => self.city.clone(),
            GoalField::MetricType => self.metric_type.as_str().to_string(),
            GoalField::Target => format_number(self.target),
            GoalField::Achieved => format_number(self.achieved),
            GoalField::Unit => self.unit.clone(),
            GoalField::Period => self.period.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GoalField {
    Phase,
    City,
    MetricType,
    Target,
    Achieved,
    Unit,
    Period,
}

impl GoalField {
    pub const ALL: [GoalField; 7] = [
        Self::Phase,
        Self::City,
        Self::MetricType,
        Self::Target,
        Self::Achieved,
        Self::Unit,
        Self::Period,
    ];

    pub fn header(self) -> &'static str {
        match self {
            Self::Phase => "Phase",
            Self::City => "Cidade",
            Self::MetricType => "Tipo",
            Self::Target => "Meta",
            Self::Achieved => "Realizado",
            Self::Unit => "Unidade",
            Self::Period => "Periodo",
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Target | Self::Achieved)
    }
}

impl FromStr for GoalField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(field) = Self::ALL.iter().find(|field| field.header().eq_ignore_ascii_case(trimmed)) {
            return Ok(*field);
        }
        match trimmed.to_lowercase().as_str() {
            "fase" => Ok(Self::Phase),
            "city" => Ok(Self::City),
            "metric_type" | "metrictype" | "type" => Ok(Self::MetricType),
            "target" => Ok(Self::Target),
            "achieved" => Ok(Self::Achieved),
            "unit" => Ok(Self::Unit),
            "period" | "período" => Ok(Self::Period),
            _ => Err(format!("unknown field '{}'", trimmed)),
        }
    }
}

pub fn check_quantity(field: GoalField, value: f64) -> Result<(), String> {
    if !value.is_finite() || value < 0.0 {
        return Err(format!(
            "{} must be a non-negative number, got {}",
            field.header(),
            value
        ));
    }
    Ok(())
}

pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct NewGoal {
    pub phase: String,
    pub city: String,
    pub metric_type: MetricType,
    pub target: f64,
    pub achieved: f64,
    pub period: String,
}

impl Default for NewGoal {
    fn default() -> Self {
        Self {
            phase: "Fase 1".to_string(),
            city: "Monte Verde".to_string(),
            metric_type: MetricType::Driver,
            target: 10.0,
            achieved: 0.0,
            period: "01/xx - 15/xx".to_string(),
        }
    }
}

impl NewGoal {
    pub fn into_record(self) -> GoalRecord {
        GoalRecord::new(
            self.phase,
            self.city,
            self.metric_type,
            self.target,
            self.achieved,
            self.period,
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterSelection {
    pub phases: BTreeSet<String>,
    pub cities: BTreeSet<String>,
    pub metric_types: BTreeSet<MetricType>,
}

impl FilterSelection {
    pub fn is_empty(&self) -> bool {
        self.phases.is_empty() && self.cities.is_empty() && self.metric_types.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub phases: Vec<String>,
    pub cities: Vec<String>,
    pub metric_types: Vec<MetricType>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiSummary {
    pub driver_target_total: f64,
    pub driver_achieved_total: f64,
    pub driver_rate: f64,
    pub ride_target_total: f64,
    pub ride_achieved_total: f64,
    pub ride_rate: f64,
    pub active_city_count: usize,
    pub record_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiCard {
    pub title: String,
    pub value: String,
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressPoint {
    pub city: String,
    pub phase: String,
    pub progress_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSeries {
    pub metric_type: MetricType,
    pub color: String,
    pub points: Vec<ProgressPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetPoint {
    pub phase: String,
    pub paid: f64,
    pub planned: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemographicPoint {
    pub city: String,
    pub projected_first_month: f64,
    pub planned_target: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub records: Vec<GoalRecord>,
    pub kpis: KpiSummary,
    pub cards: Vec<KpiCard>,
    pub progress_by_city: Vec<ProgressSeries>,
    pub budget_by_phase: Vec<BudgetPoint>,
    pub demographic_comparison: Vec<DemographicPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveReceipt {
    pub path: String,
    pub records_written: usize,
    pub saved_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub storage_file: String,
    pub atomic_save: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            storage_file: "metas.csv".to_string(),
            atomic_save: true,
        }
    }
}
