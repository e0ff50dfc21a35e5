use crate::aggregation::build_dashboard;
use crate::errors::{AppError, AppResult};
use crate::filter::{apply_filters, filter_options, sort_records};
use crate::models::{
    AppSettings, DashboardView, FilterOptions, FilterSelection, GoalField, GoalRecord, NewGoal, SaveReceipt,
    SortDirection,
};
use crate::repository::GoalRepository;
use crate::store::RecordStore;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug)]
pub struct Dashboard {
    store: RecordStore,
    repository: Mutex<GoalRepository>,
}

impl Dashboard {
    pub fn new(app_data_dir: PathBuf) -> AppResult<Arc<Self>> {
        let settings = AppSettings::load(&app_data_dir)?;
        Self::with_settings(app_data_dir, &settings)
    }

    pub fn with_settings(app_data_dir: PathBuf, settings: &AppSettings) -> AppResult<Arc<Self>> {
        let store = RecordStore::from_settings(&app_data_dir, settings)?;
        let records = store.load()?;

        Ok(Arc::new(Self {
            store,
            repository: Mutex::new(GoalRepository::new(records)),
        }))
    }

    pub fn list_goals(&self) -> AppResult<Vec<GoalRecord>> {
        Ok(self.repository()?.list().to_vec())
    }

    pub fn add_goal(&self, goal: NewGoal) -> AppResult<Vec<GoalRecord>> {
        let mut repository = self.repository()?;
        let records = repository.add_new(goal)?.to_vec();
        tracing::info!(index = records.len() - 1, "goal added");
        Ok(records)
    }

    pub fn delete_goal(&self, index: usize) -> AppResult<Vec<GoalRecord>> {
        let mut repository = self.repository()?;
        match repository.delete(index) {
            Ok(records) => {
                tracing::info!(index, remaining = records.len(), "goal deleted");
                Ok(records.to_vec())
            }
            Err(error) => {
                tracing::warn!(index, error = %error, "goal delete rejected");
                Err(error)
            }
        }
    }

    pub fn update_goal_field(&self, index: usize, field: &str, value: &str) -> AppResult<Vec<GoalRecord>> {
        let mut repository = self.repository()?;
        match repository.update_field(index, field, value) {
            Ok(records) => {
                tracing::debug!(index, field, "goal field updated");
                Ok(records.to_vec())
            }
            Err(error) => {
                tracing::warn!(index, field, error = %error, "goal edit rejected");
                Err(error)
            }
        }
    }

    pub fn replace_goals(&self, records: Vec<GoalRecord>) -> AppResult<Vec<GoalRecord>> {
        let mut repository = self.repository()?;
        Ok(repository.replace_all(records).to_vec())
    }

    pub fn save(&self) -> AppResult<SaveReceipt> {
        let snapshot = self.list_goals()?;
        self.store.save(&snapshot)
    }

    pub fn reload(&self) -> AppResult<Vec<GoalRecord>> {
        let records = self.store.load()?;
        let mut repository = self.repository()?;
        Ok(repository.replace_all(records).to_vec())
    }

    pub fn filter_options(&self) -> AppResult<FilterOptions> {
        Ok(filter_options(self.repository()?.list()))
    }

    pub fn filtered_goals(&self, selection: &FilterSelection) -> AppResult<Vec<GoalRecord>> {
        Ok(apply_filters(self.repository()?.list(), selection))
    }

    pub fn sorted_goals(&self, field: GoalField, direction: SortDirection) -> AppResult<Vec<GoalRecord>> {
        Ok(sort_records(self.repository()?.list(), field, direction))
    }

    pub fn view(&self, selection: &FilterSelection) -> AppResult<DashboardView> {
        Ok(build_dashboard(self.repository()?.list(), selection))
    }

    fn repository(&self) -> AppResult<MutexGuard<'_, GoalRepository>> {
        self.repository
            .lock()
            .map_err(|_| AppError::Internal("goal repository mutex poisoned".to_string()))
    }
}
