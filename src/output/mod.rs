use crate::stats::{Dataset, Pooling, Table};
use crate::Result;
use anyhow::bail;
use std::fs;
use std::path::{Path, PathBuf};

/// Deterministic location of one run's results. Existence of this file is
/// what makes re-runs with the same arguments a no-op, so the format is
/// load-bearing: `manifolds|dataset:<d>|pooling:<p>[|additional:True].csv`.
pub fn save_path(results_dir: &Path, dataset: Dataset, pooling: Pooling, additional: bool) -> PathBuf {
    let mut name = format!("manifolds|dataset:{}|pooling:{}", dataset, pooling);
    if additional {
        name.push_str("|additional:True");
    }
    name.push_str(".csv");
    results_dir.join(name)
}

/// Accumulates the per-model tables produced across one catalogue traversal.
/// The first appended table fixes the column set; every later table must
/// match it, since the rows all land in one CSV.
#[derive(Debug, Default)]
pub struct ResultTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, table: Table) -> Result<()> {
        if table.columns.is_empty() {
            bail!("statistics table has no columns");
        }
        if self.columns.is_empty() {
            self.columns = table.columns;
        } else if self.columns != table.columns {
            bail!(
                "statistics columns changed mid-run: expected {:?}, got {:?}",
                self.columns,
                table.columns
            );
        }
        for row in &table.rows {
            if row.len() != self.columns.len() {
                bail!(
                    "statistics row has {} fields, expected {}",
                    row.len(),
                    self.columns.len()
                );
            }
        }
        self.rows.extend(table.rows);
        Ok(())
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Writes header plus rows, no synthetic index column.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(&self.columns)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}
