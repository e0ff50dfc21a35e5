use crate::models::{BudgetPoint, GoalRecord, MetricType};
use once_cell::sync::Lazy;
use std::collections::BTreeMap;

pub const KNOWN_PHASES: [&str; 3] = ["Fase 1", "Fase 2", "Fase 3"];

pub const KNOWN_CITIES: [&str; 7] = [
    "Monte Verde",
    "Nova Bandeirantes",
    "Alta Floresta",
    "Paranaíta",
    "Colíder",
    "Nova Canaã do Norte",
    "Carlinda",
];

const SEED: [(&str, &str, MetricType, f64, &str); 14] = [
    ("Fase 1", "Monte Verde", MetricType::Driver, 4.0, "01/08 - 14/08"),
    ("Fase 1", "Nova Bandeirantes", MetricType::Driver, 6.0, "01/08 - 14/08"),
    ("Fase 1", "Monte Verde", MetricType::Ride, 20.0, "16/08 - 14/09"),
    ("Fase 1", "Nova Bandeirantes", MetricType::Ride, 30.0, "16/08 - 14/09"),
    ("Fase 2", "Alta Floresta", MetricType::Driver, 8.0, "15/09 - 29/09"),
    ("Fase 2", "Paranaíta", MetricType::Driver, 4.0, "15/09 - 29/09"),
    ("Fase 2", "Alta Floresta", MetricType::Ride, 20.0, "30/09 - 29/10"),
    ("Fase 2", "Paranaíta", MetricType::Ride, 30.0, "30/09 - 29/10"),
    ("Fase 3", "Colíder", MetricType::Driver, 6.0, "01/11 - 15/11"),
    ("Fase 3", "Nova Canaã do Norte", MetricType::Driver, 5.0, "01/11 - 15/11"),
    ("Fase 3", "Carlinda", MetricType::Driver, 4.0, "01/11 - 15/11"),
    ("Fase 3", "Colíder", MetricType::Ride, 50.0, "16/11 - 15/12"),
    ("Fase 3", "Nova Canaã do Norte", MetricType::Ride, 30.0, "16/11 - 15/12"),
    ("Fase 3", "Carlinda", MetricType::Ride, 30.0, "16/11 - 15/12"),
];

static BUDGET_BY_PHASE: Lazy<Vec<BudgetPoint>> = Lazy::new(|| {
    [("Fase 1", 2240.0, 1820.0), ("Fase 2", 3500.0, 3200.0), ("Fase 3", 4830.0, 4200.0)]
        .into_iter()
        .map(|(phase, paid, planned)| BudgetPoint {
            phase: phase.to_string(),
            paid,
            planned,
        })
        .collect()
});

static PROJECTED_FIRST_MONTH: Lazy<BTreeMap<&'static str, f64>> = Lazy::new(|| {
    BTreeMap::from([
        ("Monte Verde", 19.0),
        ("Nova Bandeirantes", 31.0),
        ("Alta Floresta", 137.0),
        ("Paranaíta", 25.0),
        ("Colíder", 70.0),
        ("Nova Canaã do Norte", 25.0),
        ("Carlinda", 20.0),
    ])
});

pub fn seed_records() -> Vec<GoalRecord> {
    SEED.iter()
        .map(|(phase, city, metric_type, target, period)| {
            GoalRecord::new(*phase, *city, *metric_type, *target, 0.0, *period)
        })
        .collect()
}

pub fn budget_by_phase() -> &'static [BudgetPoint] {
    &BUDGET_BY_PHASE
}

pub fn projected_first_month(city: &str) -> f64 {
    PROJECTED_FIRST_MONTH.get(city).copied().unwrap_or(0.0)
}
