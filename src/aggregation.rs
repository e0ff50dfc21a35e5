use crate::filter::apply_filters;
use crate::models::{
    format_number, BudgetPoint, DashboardView, DemographicPoint, FilterSelection, GoalRecord, KpiCard,
    KpiSummary, MetricType, ProgressPoint, ProgressSeries,
};
use crate::reference::{budget_by_phase, projected_first_month};
use std::collections::HashSet;

pub fn progress_pct(record: &GoalRecord) -> f64 {
    if record.target == 0.0 {
        return 0.0;
    }
    round2(record.achieved * 100.0 / record.target)
}

pub fn kpi_summary(records: &[GoalRecord]) -> KpiSummary {
    let (driver_target_total, driver_achieved_total) = totals(records, MetricType::Driver);
    let (ride_target_total, ride_achieved_total) = totals(records, MetricType::Ride);
    let active_city_count = records
        .iter()
        .map(|record| record.city.as_str())
        .collect::<HashSet<_>>()
        .len();

    KpiSummary {
        driver_target_total,
        driver_achieved_total,
        driver_rate: rate(driver_achieved_total, driver_target_total),
        ride_target_total,
        ride_achieved_total,
        ride_rate: rate(ride_achieved_total, ride_target_total),
        active_city_count,
        record_count: records.len(),
    }
}

impl KpiSummary {
    pub fn cards(&self) -> Vec<KpiCard> {
        vec![
            KpiCard {
                title: "Motoristas".to_string(),
                value: format!(
                    "{}/{}",
                    format_number(self.driver_achieved_total),
                    format_number(self.driver_target_total)
                ),
                caption: format!("{:.1}%", self.driver_rate),
            },
            KpiCard {
                title: "Corridas".to_string(),
                value: format!(
                    "{}/{}",
                    format_number(self.ride_achieved_total),
                    format_number(self.ride_target_total)
                ),
                caption: format!("{:.1}%", self.ride_rate),
            },
            KpiCard {
                title: "Cidades".to_string(),
                value: self.active_city_count.to_string(),
                caption: "ativas".to_string(),
            },
            KpiCard {
                title: "Metas".to_string(),
                value: self.record_count.to_string(),
                caption: "registradas".to_string(),
            },
        ]
    }
}

pub fn progress_by_city(records: &[GoalRecord]) -> Vec<ProgressSeries> {
    let mut series: Vec<ProgressSeries> = Vec::new();
    for record in records {
        let point = ProgressPoint {
            city: record.city.clone(),
            phase: record.phase.clone(),
            progress_pct: progress_pct(record),
        };
        match series.iter_mut().find(|entry| entry.metric_type == record.metric_type) {
            Some(entry) => entry.points.push(point),
            None => series.push(ProgressSeries {
                metric_type: record.metric_type,
                color: record.metric_type.color().to_string(),
                points: vec![point],
            }),
        }
    }
    series
}

pub fn budget_series() -> Vec<BudgetPoint> {
    budget_by_phase().to_vec()
}

pub fn demographic_comparison(records: &[GoalRecord]) -> Vec<DemographicPoint> {
    records
        .iter()
        .filter(|record| record.metric_type == MetricType::Ride)
        .map(|record| DemographicPoint {
            city: record.city.clone(),
            projected_first_month: projected_first_month(&record.city),
            planned_target: record.target,
        })
        .collect()
}

pub fn build_dashboard(records: &[GoalRecord], selection: &FilterSelection) -> DashboardView {
    let filtered = apply_filters(records, selection);
    let kpis = kpi_summary(&filtered);
    DashboardView {
        cards: kpis.cards(),
        kpis,
        progress_by_city: progress_by_city(&filtered),
        budget_by_phase: budget_series(),
        demographic_comparison: demographic_comparison(&filtered),
        records: filtered,
    }
}

fn totals(records: &[GoalRecord], metric_type: MetricType) -> (f64, f64) {
    records
        .iter()
        .filter(|record| record.metric_type == metric_type)
        .fold((0.0, 0.0), |(target, achieved), record| {
            (target + record.target, achieved + record.achieved)
        })
}

fn rate(achieved: f64, target: f64) -> f64 {
    let denominator = if target == 0.0 { 1.0 } else { target };
    achieved * 100.0 / denominator
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
