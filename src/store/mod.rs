use crate::errors::{AppError, AppResult};
use crate::models::{AppSettings, GoalField, GoalRecord, MetricType, SaveReceipt};
use crate::reference::seed_records;
use chrono::Utc;
use std::fs::{self, File};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const UTF8_BOM: char = '\u{feff}';

#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
    atomic_save: bool,
}

impl RecordStore {
    pub fn new(path: &Path, atomic_save: bool) -> AppResult<Self> {
        let store = Self {
            path: path.to_path_buf(),
            atomic_save,
        };
        store.ensure_storage_dir()?;
        Ok(store)
    }

    pub fn from_settings(app_data_dir: &Path, settings: &AppSettings) -> AppResult<Self> {
        Self::new(&app_data_dir.join(&settings.storage_file), settings.atomic_save)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> AppResult<Vec<GoalRecord>> {
        self.ensure_storage_dir()?;
        if !self.path.exists() {
            let seed = seed_records();
            self.save(&seed)?;
            tracing::info!(path = %self.path.display(), records = seed.len(), "seeded goal table");
            return Ok(seed);
        }

        let file = File::open(&self.path).map_err(|error| {
            AppError::StorageUnavailable(format!("cannot open {}: {}", self.path.display(), error))
        })?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(BufReader::new(file));

        let headers = reader.headers().map_err(|error| self.read_error(error))?.clone();
        let columns = resolve_columns(&headers)?;

        let mut records = Vec::new();
        for (row_index, row) in reader.records().enumerate() {
            let row = row.map_err(|error| self.read_error(error))?;
            // Header occupies line 1.
            let line = row_index + 2;
            let cell = |field: GoalField| row.get(columns[field_slot(field)]).unwrap_or("").to_string();

            let metric_type = cell(GoalField::MetricType)
                .parse::<MetricType>()
                .map_err(|error| AppError::MalformedStoredTable(format!("line {}: {}", line, error)))?;

            records.push(GoalRecord {
                phase: cell(GoalField::Phase),
                city: cell(GoalField::City),
                metric_type,
                target: parse_stored_number(&cell(GoalField::Target), GoalField::Target, line)?,
                achieved: parse_stored_number(&cell(GoalField::Achieved), GoalField::Achieved, line)?,
                unit: cell(GoalField::Unit),
                period: cell(GoalField::Period),
            });
        }

        tracing::info!(path = %self.path.display(), records = records.len(), "loaded goal table");
        Ok(records)
    }

    pub fn save(&self, records: &[GoalRecord]) -> AppResult<SaveReceipt> {
        for (index, record) in records.iter().enumerate() {
            record
                .check_quantities()
                .map_err(|error| AppError::InvalidValue(format!("record {}: {}", index, error)))?;
        }
        self.ensure_storage_dir()?;
        let contents = encode_table(records)?;

        if self.atomic_save {
            self.write_atomic(&contents)
                .map_err(|error| self.write_error(error))?;
        } else {
            fs::write(&self.path, &contents).map_err(|error| self.write_error(error))?;
        }

        tracing::info!(
            path = %self.path.display(),
            records = records.len(),
            atomic = self.atomic_save,
            "saved goal table"
        );
        Ok(SaveReceipt {
            path: self.path.to_string_lossy().to_string(),
            records_written: records.len(),
            saved_at: Utc::now(),
        })
    }

    fn write_atomic(&self, contents: &[u8]) -> std::io::Result<()> {
        let mut staged = NamedTempFile::new_in(self.storage_dir())?;
        staged.write_all(contents)?;
        staged.as_file().sync_all()?;
        staged.persist(&self.path).map_err(|error| error.error)?;
        Ok(())
    }

    fn read_error(&self, error: csv::Error) -> AppError {
        if error.is_io_error() {
            AppError::StorageUnavailable(format!("cannot read {}: {}", self.path.display(), error))
        } else {
            AppError::MalformedStoredTable(error.to_string())
        }
    }

    fn write_error(&self, error: std::io::Error) -> AppError {
        AppError::StorageUnavailable(format!("cannot write {}: {}", self.path.display(), error))
    }

    fn storage_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    fn ensure_storage_dir(&self) -> AppResult<()> {
        let dir = self.storage_dir();
        fs::create_dir_all(&dir).map_err(|error| {
            AppError::StorageUnavailable(format!("cannot create {}: {}", dir.display(), error))
        })
    }
}

fn field_slot(field: GoalField) -> usize {
    GoalField::ALL
        .iter()
        .position(|candidate| *candidate == field)
        .unwrap_or_default()
}

fn resolve_columns(headers: &csv::StringRecord) -> AppResult<[usize; 7]> {
    let mut columns = [usize::MAX; 7];
    let mut unexpected = Vec::new();

    for (position, raw) in headers.iter().enumerate() {
        let name = raw.trim_start_matches(UTF8_BOM).trim();
        match GoalField::ALL.iter().find(|field| field.header() == name) {
            Some(field) if columns[field_slot(*field)] == usize::MAX => {
                columns[field_slot(*field)] = position;
            }
            _ => unexpected.push(name.to_string()),
        }
    }

    let missing: Vec<&str> = GoalField::ALL
        .iter()
        .filter(|field| columns[field_slot(**field)] == usize::MAX)
        .map(|field| field.header())
        .collect();

    if !missing.is_empty() || !unexpected.is_empty() {
        return Err(AppError::MalformedStoredTable(format!(
            "missing columns [{}], unexpected columns [{}]",
            missing.join(", "),
            unexpected.join(", ")
        )));
    }
    Ok(columns)
}

fn parse_stored_number(raw: &str, field: GoalField, line: usize) -> AppResult<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err(AppError::MalformedStoredTable(format!(
            "line {}: {} is not a non-negative number: '{}'",
            line,
            field.header(),
            trimmed
        ))),
    }
}

fn encode_table(records: &[GoalRecord]) -> AppResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(GoalField::ALL.iter().map(|field| field.header()))?;
    for record in records {
        writer.write_record(GoalField::ALL.iter().map(|field| record.field_value(*field)))?;
    }
    writer
        .into_inner()
        .map_err(|error| AppError::Internal(error.to_string()))
}

#[cfg(test)]
mod tests {
    use super::RecordStore;
    use crate::errors::AppError;
    use crate::models::{GoalRecord, MetricType};

    #[test]
    fn first_load_writes_seed_table() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("data").join("metas.csv");
        let store = RecordStore::new(&path, true).expect("store");

        let records = store.load().expect("load");
        assert_eq!(records.len(), 14);
        assert!(path.exists());

        let raw = std::fs::read_to_string(&path).expect("read table");
        let mut lines = raw.lines();
        assert_eq!(lines.next(), Some("Phase,Cidade,Tipo,Meta,Realizado,Unidade,Periodo"));
        assert_eq!(
            lines.next(),
            Some("Fase 1,Monte Verde,Motorista,4,0,motoristas,01/08 - 14/08")
        );
    }

    #[test]
    fn save_then_load_round_trips_fields() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("metas.csv");
        let store = RecordStore::new(&path, false).expect("store");

        let mut drifted = GoalRecord::new("Fase 4", "Sinop, MT", MetricType::Ride, 12.5, 3.0, "01/01 - 31/01");
        drifted.unit = "motoristas".to_string();
        let records = vec![
            GoalRecord::new("Fase 3", "Nova Canaã do Norte", MetricType::Driver, 5.0, 7.0, "01/11 - 15/11"),
            drifted,
        ];
        let receipt = store.save(&records).expect("save");
        assert_eq!(receipt.records_written, 2);

        let reopened = RecordStore::new(&path, true).expect("store");
        assert_eq!(reopened.load().expect("load"), records);
    }

    #[test]
    fn columns_may_appear_in_any_order_and_empty_numbers_load_as_zero() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("metas.csv");
        std::fs::write(
            &path,
            "\u{feff}Cidade,Phase,Tipo,Realizado,Meta,Unidade,Periodo\nColíder,Fase 3,Corrida,,50.0,corridas,16/11 - 15/12\n",
        )
        .expect("write");

        let records = RecordStore::new(&path, true).expect("store").load().expect("load");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].city, "Colíder");
        assert_eq!(records[0].target, 50.0);
        assert_eq!(records[0].achieved, 0.0);
        assert_eq!(records[0].metric_type, MetricType::Ride);
    }

    #[test]
    fn missing_column_is_malformed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("metas.csv");
        std::fs::write(&path, "Phase,Cidade,Tipo,Meta,Realizado,Unidade\nFase 1,Carlinda,Motorista,4,0,motoristas\n")
            .expect("write");

        let error = RecordStore::new(&path, true).expect("store").load().unwrap_err();
        assert!(matches!(error, AppError::MalformedStoredTable(ref message) if message.contains("Periodo")));
    }

    #[test]
    fn extra_column_is_malformed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("metas.csv");
        std::fs::write(
            &path,
            "Phase,Cidade,Tipo,Meta,Realizado,Unidade,Periodo,Progresso (%)\nFase 1,Carlinda,Motorista,4,0,motoristas,x,0\n",
        )
        .expect("write");

        let error = RecordStore::new(&path, true).expect("store").load().unwrap_err();
        assert!(matches!(error, AppError::MalformedStoredTable(ref message) if message.contains("Progresso")));
    }

    #[test]
    fn unparseable_row_is_malformed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("metas.csv");
        std::fs::write(
            &path,
            "Phase,Cidade,Tipo,Meta,Realizado,Unidade,Periodo\nFase 1,Carlinda,Motorista,quatro,0,motoristas,x\n",
        )
        .expect("write");

        let error = RecordStore::new(&path, true).expect("store").load().unwrap_err();
        assert!(matches!(error, AppError::MalformedStoredTable(ref message) if message.contains("line 2")));
    }

    #[test]
    fn unreadable_table_is_unavailable() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("metas.csv");
        std::fs::create_dir(&path).expect("mkdir");

        let error = RecordStore::new(&path, true).expect("store").load().unwrap_err();
        assert!(matches!(error, AppError::StorageUnavailable(_)), "{:?}", error);
    }

    #[test]
    fn unwritable_table_is_unavailable() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("metas.csv");
        std::fs::create_dir(&path).expect("mkdir");
        std::fs::write(path.join("keep"), "x").expect("write");

        for atomic in [true, false] {
            let store = RecordStore::new(&path, atomic).expect("store");
            let error = store.save(&[]).unwrap_err();
            assert!(matches!(error, AppError::StorageUnavailable(_)), "{:?}", error);
        }
    }

    #[test]
    fn save_rejects_negative_quantities_without_writing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("metas.csv");
        let store = RecordStore::new(&path, true).expect("store");
        let mut records = store.load().expect("load");
        let before = std::fs::read_to_string(&path).expect("read");

        records.push(GoalRecord::new("Fase 4", "Sinop", MetricType::Driver, -1.0, 0.0, "01/01 - 15/01"));
        let error = store.save(&records).unwrap_err();
        assert!(matches!(error, AppError::InvalidValue(ref message) if message.contains("record 14")));

        assert_eq!(std::fs::read_to_string(&path).expect("read"), before);
        assert_eq!(store.load().expect("reload").len(), 14);
    }

    #[test]
    fn storage_dir_blocked_by_file_is_unavailable() {
        let dir = tempfile::tempdir().expect("tempdir");
        let blocker = dir.path().join("data");
        std::fs::write(&blocker, "not a directory").expect("write");

        let error = RecordStore::new(&blocker.join("metas.csv"), true).unwrap_err();
        assert!(matches!(error, AppError::StorageUnavailable(_)));
    }
}
