//! JSON Lines output: one serialized record per line

use crate::extract::VacancyRecord;
use crate::output::{OutputResult, RecordSink};
use crate::storage::Storage;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes records as newline-delimited JSON
pub struct JsonLinesSink<W: Write> {
    writer: W,
    written: usize,
}

impl JsonLinesSink<BufWriter<File>> {
    /// Creates (or truncates) the file at `path`
    pub fn create(path: &Path) -> OutputResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Number of records written so far
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RecordSink for JsonLinesSink<W> {
    fn accept(&mut self, record: &VacancyRecord) -> OutputResult<()> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Dumps every stored vacancy to `path` and returns how many were written
pub fn export_jsonl(storage: &dyn Storage, path: &Path) -> OutputResult<usize> {
    let records = storage.load_vacancies()?;
    let mut sink = JsonLinesSink::create(path)?;
    for record in &records {
        sink.accept(record)?;
    }
    sink.finish()?;

    tracing::info!("Exported {} vacancies to {}", sink.written(), path.display());
    Ok(sink.written())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SqliteStorage;
    use chrono::NaiveDate;

    fn record(url: &str) -> VacancyRecord {
        VacancyRecord {
            url: url.to_string(),
            title: "Python Developer".to_string(),
            salary: None,
            company: "Acme".to_string(),
            english_level: "Не вказано".to_string(),
            experience_years: 0,
            domain: None,
            job_type: None,
            company_type: None,
            test_task_exists: true,
            publication_date: NaiveDate::from_ymd_opt(2023, 1, 9).unwrap(),
            views_count: 5,
            applicant_count: 0,
            technologies: vec![],
            country: vec![],
        }
    }

    #[test]
    fn test_one_object_per_line() {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.accept(&record("https://djinni.co/jobs/1/")).unwrap();
        sink.accept(&record("https://djinni.co/jobs/2/")).unwrap();
        sink.finish().unwrap();
        assert_eq!(sink.written(), 2);

        let output = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);

        let value: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(value["url"], "https://djinni.co/jobs/1/");
        assert_eq!(value["salary"], serde_json::Value::Null);
        assert_eq!(value["publication_date"], "2023-01-09");
        assert_eq!(value["test_task_exists"], true);
    }

    #[test]
    fn test_export_from_storage() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let run_id = storage.create_run("hash").unwrap();
        storage
            .save_vacancy(run_id, &record("https://djinni.co/jobs/1/"))
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jsonl");
        let count = export_jsonl(&storage, &path).unwrap();
        assert_eq!(count, 1);

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: VacancyRecord = serde_json::from_str(content.trim_end()).unwrap();
        assert_eq!(parsed, record("https://djinni.co/jobs/1/"));
    }
}
