use crate::models::{FilterOptions, FilterSelection, GoalField, GoalRecord, SortDirection};
use std::cmp::Ordering;

pub fn apply_filters(records: &[GoalRecord], selection: &FilterSelection) -> Vec<GoalRecord> {
    records
        .iter()
        .filter(|record| matches_selection(record, selection))
        .cloned()
        .collect()
}

pub fn matches_selection(record: &GoalRecord, selection: &FilterSelection) -> bool {
    (selection.phases.is_empty() || selection.phases.contains(&record.phase))
        && (selection.cities.is_empty() || selection.cities.contains(&record.city))
        && (selection.metric_types.is_empty() || selection.metric_types.contains(&record.metric_type))
}

pub fn filter_options(records: &[GoalRecord]) -> FilterOptions {
    let mut options = FilterOptions::default();
    for record in records {
        if !options.phases.contains(&record.phase) {
            options.phases.push(record.phase.clone());
        }
        if !options.cities.contains(&record.city) {
            options.cities.push(record.city.clone());
        }
        if !options.metric_types.contains(&record.metric_type) {
            options.metric_types.push(record.metric_type);
        }
    }
    options
}

pub fn sort_records(records: &[GoalRecord], field: GoalField, direction: SortDirection) -> Vec<GoalRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|left, right| {
        let ordering = compare_field(left, right, field);
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
    sorted
}

fn compare_field(left: &GoalRecord, right: &GoalRecord, field: GoalField) -> Ordering {
    match field {
        GoalField::Target => left.target.total_cmp(&right.target),
        GoalField::Achieved => left.achieved.total_cmp(&right.achieved),
        GoalField::MetricType => left.metric_type.as_str().cmp(right.metric_type.as_str()),
        _ => left.field_value(field).cmp(&right.field_value(field)),
    }
}
