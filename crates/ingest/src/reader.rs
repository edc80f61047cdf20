use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{IngestError, Result};

pub struct CsvFile;

impl CsvFile {
    /// Fail with [`IngestError::MissingInput`] unless `path` is an existing file.
    pub fn require(path: &Path, hint: &'static str) -> Result<()> {
        if path.is_file() {
            Ok(())
        } else {
            Err(IngestError::MissingInput {
                path: path.to_path_buf(),
                hint,
            })
        }
    }

    /// Read every row of a headed CSV file.
    pub fn read<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .map_err(|e| IngestError::csv(path, e))?;

        let mut rows = Vec::new();
        for record in reader.deserialize() {
            rows.push(record.map_err(|e| IngestError::csv(path, e))?);
        }
        Ok(rows)
    }

    /// Read the header row only.
    pub fn columns(path: &Path) -> Result<Vec<String>> {
        let mut reader = csv::Reader::from_path(path).map_err(|e| IngestError::csv(path, e))?;
        let headers = reader.headers().map_err(|e| IngestError::csv(path, e))?;
        Ok(headers.iter().map(str::to_string).collect())
    }

    /// Write rows to `path`. The file is written to a temporary sibling first
    /// and renamed into place, so readers never observe a partial file.
    pub fn write<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
        let tmp = Self::stage(path, rows)?;
        Self::commit(&[(tmp, path)])
    }

    /// Write rows to the temporary sibling of `path` and return its location.
    pub fn stage<T: Serialize>(path: &Path, rows: &[T]) -> Result<PathBuf> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| IngestError::io(parent, e))?;
        }

        let tmp = Self::sibling(path, ".tmp");
        if let Err(e) = Self::write_rows(&tmp, rows) {
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }
        Ok(tmp)
    }

    fn write_rows<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
        let mut writer = csv::Writer::from_path(path).map_err(|e| IngestError::csv(path, e))?;
        for row in rows {
            writer.serialize(row).map_err(|e| IngestError::csv(path, e))?;
        }
        writer.flush().map_err(|e| IngestError::io(path, e))
    }

    /// Move staged files into place as a group. When any move fails, files
    /// already replaced get their previous contents back and every staged
    /// file is removed.
    pub fn commit(staged: &[(PathBuf, &Path)]) -> Result<()> {
        let mut replaced: Vec<(&Path, Option<PathBuf>)> = Vec::new();

        for (tmp, dest) in staged {
            match Self::replace(tmp, dest) {
                Ok(backup) => replaced.push((*dest, backup)),
                Err(e) => {
                    for (dest, backup) in replaced.into_iter().rev() {
                        let _ = match backup {
                            Some(backup) => fs::rename(backup, dest),
                            None => fs::remove_file(dest),
                        };
                    }
                    for (tmp, _) in staged {
                        let _ = fs::remove_file(tmp);
                    }
                    return Err(e);
                }
            }
        }

        for (_, backup) in replaced {
            if let Some(backup) = backup {
                let _ = fs::remove_file(backup);
            }
        }
        Ok(())
    }

    /// Rename `tmp` over `dest`, keeping any existing file as a backup.
    fn replace(tmp: &Path, dest: &Path) -> Result<Option<PathBuf>> {
        let backup = if dest.is_file() {
            let backup = Self::sibling(dest, ".bak");
            fs::rename(dest, &backup).map_err(|e| IngestError::io(dest, e))?;
            Some(backup)
        } else {
            None
        };

        if let Err(e) = fs::rename(tmp, dest) {
            if let Some(backup) = &backup {
                let _ = fs::rename(backup, dest);
            }
            return Err(IngestError::io(dest, e));
        }
        Ok(backup)
    }

    fn sibling(path: &Path, suffix: &str) -> PathBuf {
        let mut name = path.file_name().unwrap_or_default().to_os_string();
        name.push(suffix);
        path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::RawArticle;

    #[test]
    fn test_missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = CsvFile::require(&dir.path().join("Fake.csv"), "download it").unwrap_err();
        assert!(matches!(err, IngestError::MissingInput { .. }));
        assert!(err.to_string().contains("Fake.csv not found"));
    }

    #[test]
    fn test_empty_cells_read_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw.csv");
        fs::write(
            &path,
            "title,text,subject,date\n\"Hello, world\",,News,\"December 31, 2017\"\n",
        )
        .unwrap();

        let rows: Vec<RawArticle> = CsvFile::read(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title.as_deref(), Some("Hello, world"));
        assert_eq!(rows[0].text, None);
        assert_eq!(rows[0].date.as_deref(), Some("December 31, 2017"));

        let columns = CsvFile::columns(&path).unwrap();
        assert_eq!(columns, vec!["title", "text", "subject", "date"]);
    }

    #[test]
    fn test_write_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.csv");
        let rows = vec![RawArticle {
            title: Some("t".to_string()),
            ..Default::default()
        }];

        CsvFile::write(&path, &rows).unwrap();

        assert!(path.is_file());
        assert!(!dir.path().join("nested").join("out.csv.tmp").exists());
        let back: Vec<RawArticle> = CsvFile::read(&path).unwrap();
        assert_eq!(back[0].title.as_deref(), Some("t"));
        assert_eq!(back[0].subject, None);
    }

    #[test]
    fn test_failed_commit_restores_previous_files() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.csv");
        let second = dir.path().join("second.csv");
        fs::write(&first, "title\nold\n").unwrap();
        // A directory cannot be replaced by a file.
        fs::create_dir(&second).unwrap();

        let rows = vec![RawArticle {
            title: Some("new".to_string()),
            ..Default::default()
        }];
        let staged = vec![
            (CsvFile::stage(&first, &rows).unwrap(), first.as_path()),
            (CsvFile::stage(&second, &rows).unwrap(), second.as_path()),
        ];

        assert!(CsvFile::commit(&staged).is_err());

        assert_eq!(fs::read_to_string(&first).unwrap(), "title\nold\n");
        let mut names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        assert_eq!(names, vec!["first.csv", "second.csv"]);
    }
}
