use csv::{ReaderBuilder, WriterBuilder};
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use super::data::AnnotationRecord;
use super::error::AppError;

/// The RecordStore keeps saved annotations in a single CSV file.
///
/// The first row is the header (`Name,Dosage,Ingredient,Type,Effects,Notes`);
/// every following row is one annotation. Rows are addressed by position only.
/// There is no locking: one process, one user, sequential calls.
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the path to the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record.
    ///
    /// Creates the file (and its parent directory) on first use and writes the
    /// header before the first row. Existing rows are never rewritten here.
    pub fn append(&self, record: &AnnotationRecord) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let needs_header = fs::metadata(&self.path)
            .map(|meta| meta.len() == 0)
            .unwrap_or(true);
        let unterminated = !needs_header && !ends_with_newline(&self.path)?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        // A hand-edited last row may lack its terminator
        if unterminated {
            file.write_all(b"\n")?;
        }

        let mut writer = WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer.serialize(record)?;
        writer.flush()?;

        Ok(())
    }

    /// Read every record in file order.
    ///
    /// A missing file, an empty file and a header-only file all read as no
    /// rows. Fields come back exactly as stored.
    pub fn load_all(&self) -> Result<Vec<AnnotationRecord>, AppError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);
        let mut records = Vec::new();
        for record in reader.deserialize::<AnnotationRecord>() {
            records.push(record?);
        }

        Ok(records)
    }

    /// Remove the record at `index` and rewrite the file.
    ///
    /// Out-of-range indexes fail with `IndexOutOfRange` before anything is
    /// written. The rewrite goes to a sibling temp file that is then renamed
    /// over the store. Returns the removed record.
    pub fn delete_at(&self, index: usize) -> Result<AnnotationRecord, AppError> {
        let mut records = self.load_all()?;
        if index >= records.len() {
            return Err(AppError::IndexOutOfRange {
                index,
                len: records.len(),
            });
        }

        let removed = records.remove(index);
        self.rewrite(&records)?;

        Ok(removed)
    }

    /// Replace the file contents with the header plus `records`
    fn rewrite(&self, records: &[AnnotationRecord]) -> Result<(), AppError> {
        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        {
            // Header written by hand so an emptied store keeps it
            let mut writer = WriterBuilder::new()
                .has_headers(false)
                .from_path(&tmp_path)?;
            writer.write_record(AnnotationRecord::COLUMNS)?;
            for record in records {
                writer.serialize(record)?;
            }
            writer.flush()?;
        }

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

/// Whether the last byte of a non-empty file is a line feed
fn ends_with_newline(path: &Path) -> Result<bool, AppError> {
    let mut file = File::open(path)?;
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

impl std::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("path", &self.path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn record(name: &str, dosage: &str) -> AnnotationRecord {
        AnnotationRecord {
            name: name.to_string(),
            dosage: dosage.to_string(),
            ingredient: format!("{name} base"),
            drug_type: "Analgesic".to_string(),
            effects: "Nausea".to_string(),
            notes: String::new(),
        }
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("pharma_data.csv"));
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_header_only_loads_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pharma_data.csv");
        fs::write(&path, "Name,Dosage,Ingredient,Type,Effects,Notes\n").unwrap();
        assert!(RecordStore::new(&path).load_all().unwrap().is_empty());

        fs::write(&path, "").unwrap();
        assert!(RecordStore::new(&path).load_all().unwrap().is_empty());
    }

    #[test]
    fn test_first_append_writes_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("pharma_data.csv");
        let store = RecordStore::new(&path);

        store.append(&record("Paracetamol", "500mg")).unwrap();
        store.append(&record("Ibuprofen", "200mg")).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Name,Dosage,Ingredient,Type,Effects,Notes",
                "Paracetamol,500mg,Paracetamol base,Analgesic,Nausea,",
                "Ibuprofen,200mg,Ibuprofen base,Analgesic,Nausea,",
            ]
        );
    }

    #[test]
    fn test_append_to_empty_file_writes_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pharma_data.csv");
        fs::write(&path, "").unwrap();
        let store = RecordStore::new(&path);

        store.append(&record("Aspirin", "75mg")).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("Name,Dosage,Ingredient,Type,Effects,Notes\n"));
        assert_eq!(store.load_all().unwrap(), vec![record("Aspirin", "75mg")]);
    }

    #[test]
    fn test_append_after_unterminated_row() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pharma_data.csv");
        fs::write(
            &path,
            "Name,Dosage,Ingredient,Type,Effects,Notes\nAspirin,75mg,ASA,Analgesic,None,x",
        )
        .unwrap();
        let store = RecordStore::new(&path);

        store.append(&record("Ibuprofen", "200mg")).unwrap();

        let rows = store.load_all().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Aspirin");
        assert_eq!(rows[0].notes, "x");
        assert_eq!(rows[1], record("Ibuprofen", "200mg"));
        assert!(fs::read_to_string(&path)
            .unwrap()
            .contains("None,x\nIbuprofen,200mg,"));
    }

    #[test]
    fn test_append_then_load_returns_last() {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("pharma_data.csv"));

        for i in 0..5 {
            let appended = record(&format!("Drug {i}"), &format!("{i}0mg"));
            store.append(&appended).unwrap();

            let all = store.load_all().unwrap();
            assert_eq!(all.len(), i + 1);
            assert_eq!(all.last(), Some(&appended));
        }
    }

    #[test]
    fn test_fields_are_literal_text() {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("pharma_data.csv"));
        let tricky = AnnotationRecord {
            name: "Co-codamol, 30/500".to_string(),
            dosage: "0500".to_string(),
            ingredient: "Codeine \"phosphate\"".to_string(),
            drug_type: "NaN".to_string(),
            effects: "Drowsiness\nConstipation".to_string(),
            notes: "  ".to_string(),
        };

        store.append(&tricky).unwrap();

        assert_eq!(store.load_all().unwrap(), vec![tricky]);
    }

    #[test]
    fn test_delete_shifts_later_rows() {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("pharma_data.csv"));
        let original: Vec<AnnotationRecord> = (0..4)
            .map(|i| record(&format!("Drug {i}"), "1mg"))
            .collect();
        for r in &original {
            store.append(r).unwrap();
        }

        let removed = store.delete_at(1).unwrap();

        assert_eq!(removed, original[1]);
        let remaining = store.load_all().unwrap();
        assert_eq!(remaining.len(), original.len() - 1);
        assert_eq!(remaining[0], original[0]);
        assert_eq!(remaining[1..], original[2..]);
    }

    #[test]
    fn test_delete_last_row_keeps_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pharma_data.csv");
        let store = RecordStore::new(&path);
        store.append(&record("Aspirin", "75mg")).unwrap();

        store.delete_at(0).unwrap();

        assert!(store.load_all().unwrap().is_empty());
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "Name,Dosage,Ingredient,Type,Effects,Notes\n"
        );

        // The next save still lands under the kept header
        store.append(&record("Ibuprofen", "200mg")).unwrap();
        assert_eq!(store.load_all().unwrap(), vec![record("Ibuprofen", "200mg")]);
    }

    #[test]
    fn test_delete_out_of_range_leaves_file_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pharma_data.csv");
        let store = RecordStore::new(&path);
        store.append(&record("Aspirin", "75mg")).unwrap();
        store.append(&record("Ibuprofen", "200mg")).unwrap();
        let before = fs::read(&path).unwrap();

        for index in [2, 3, usize::MAX] {
            let result = store.delete_at(index);
            assert!(matches!(
                result,
                Err(AppError::IndexOutOfRange { index: i, len: 2 }) if i == index
            ));
        }

        assert_eq!(fs::read(&path).unwrap(), before);
    }

    #[test]
    fn test_delete_on_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pharma_data.csv");
        let store = RecordStore::new(&path);

        assert!(matches!(
            store.delete_at(0),
            Err(AppError::IndexOutOfRange { index: 0, len: 0 })
        ));
        assert!(!path.exists());
    }
}
