use crate::errors::{AppError, AppResult};
use crate::models::{check_quantity, GoalField, GoalRecord, NewGoal};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GoalRepository {
    records: Vec<GoalRecord>,
}

impl GoalRepository {
    pub fn new(records: Vec<GoalRecord>) -> Self {
        Self { records }
    }

    pub fn list(&self) -> &[GoalRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<GoalRecord> {
        self.records
    }

    pub fn replace_all(&mut self, records: Vec<GoalRecord>) -> &[GoalRecord] {
        self.records = records;
        &self.records
    }

    pub fn add(&mut self, record: GoalRecord) -> &[GoalRecord] {
        self.records.push(record);
        &self.records
    }

    pub fn add_new(&mut self, goal: NewGoal) -> AppResult<&[GoalRecord]> {
        check_quantity(GoalField::Target, goal.target).map_err(AppError::InvalidValue)?;
        check_quantity(GoalField::Achieved, goal.achieved).map_err(AppError::InvalidValue)?;
        Ok(self.add(goal.into_record()))
    }

    pub fn delete(&mut self, index: usize) -> AppResult<&[GoalRecord]> {
        self.check_index(index)?;
        self.records.remove(index);
        Ok(&self.records)
    }

    pub fn update_field(&mut self, index: usize, field: &str, value: &str) -> AppResult<&[GoalRecord]> {
        self.check_index(index)?;
        let field = field.parse::<GoalField>().map_err(AppError::InvalidValue)?;
        let record = &mut self.records[index];

        match field {
            GoalField::Phase => record.phase = value.to_string(),
            GoalField::City => record.city = value.to_string(),
            GoalField::MetricType => {
                record.metric_type = value.parse().map_err(AppError::InvalidValue)?;
            }
            GoalField::Target => record.target = parse_quantity(field, value)?,
            GoalField::Achieved => record.achieved = parse_quantity(field, value)?,
            GoalField::Unit => record.unit = value.to_string(),
            GoalField::Period => record.period = value.to_string(),
        }

        Ok(&self.records)
    }

    fn check_index(&self, index: usize) -> AppResult<()> {
        if index >= self.records.len() {
            return Err(AppError::OutOfRange {
                index,
                len: self.records.len(),
            });
        }
        Ok(())
    }
}

fn parse_quantity(field: GoalField, value: &str) -> AppResult<f64> {
    let parsed = value.trim().parse::<f64>().map_err(|_| {
        AppError::InvalidValue(format!("{} must be a number, got '{}'", field.header(), value))
    })?;
    check_quantity(field, parsed).map_err(AppError::InvalidValue)?;
    Ok(parsed)
}
