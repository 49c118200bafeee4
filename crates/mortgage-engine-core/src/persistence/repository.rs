use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use super::needs::DocumentNeed;
use crate::preapproval::PreapprovalInput;
use crate::records::LoanFile;
use crate::{MortgageEngineError, MortgageEngineResult};

/// Storage abstraction so the engines can be driven without the web tier's
/// database.
pub trait LoanRepository: Send + Sync {
    fn load_file(&self, loan_id: &str) -> MortgageEngineResult<LoanFile>;

    /// Borrower, loan and credit for the preapproval engine. Guidelines are
    /// left to the caller.
    fn load_preapproval(&self, loan_id: &str) -> MortgageEngineResult<PreapprovalInput> {
        let file = self.load_file(loan_id)?;
        Ok(PreapprovalInput {
            borrower: file.borrower,
            loan: file.loan,
            credit: file.credit,
            guidelines: None,
        })
    }

    /// Append needs to whatever the loan already has on record.
    fn save_needs(&self, loan_id: &str, needs: &[DocumentNeed]) -> MortgageEngineResult<()>;

    fn needs(&self, loan_id: &str) -> MortgageEngineResult<Vec<DocumentNeed>>;
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct InMemoryLoanRepository {
    files: Mutex<BTreeMap<String, LoanFile>>,
    needs: Mutex<BTreeMap<String, Vec<DocumentNeed>>>,
}

fn guard<T>(m: &Mutex<T>) -> MortgageEngineResult<MutexGuard<'_, T>> {
    m.lock()
        .map_err(|_| MortgageEngineError::Storage("repository lock poisoned".into()))
}

impl InMemoryLoanRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, loan_id: &str, file: LoanFile) -> MortgageEngineResult<()> {
        guard(&self.files)?.insert(loan_id.to_string(), file);
        Ok(())
    }
}

impl LoanRepository for InMemoryLoanRepository {
    fn load_file(&self, loan_id: &str) -> MortgageEngineResult<LoanFile> {
        guard(&self.files)?
            .get(loan_id)
            .cloned()
            .ok_or_else(|| MortgageEngineError::NotFound(format!("loan {loan_id}")))
    }

    fn save_needs(&self, loan_id: &str, needs: &[DocumentNeed]) -> MortgageEngineResult<()> {
        guard(&self.needs)?
            .entry(loan_id.to_string())
            .or_default()
            .extend_from_slice(needs);
        tracing::debug!(loan_id, count = needs.len(), "document needs saved");
        Ok(())
    }

    fn needs(&self, loan_id: &str) -> MortgageEngineResult<Vec<DocumentNeed>> {
        Ok(guard(&self.needs)?.get(loan_id).cloned().unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// JSON files
// ---------------------------------------------------------------------------

/// A directory of `<loan_id>.json` loan snapshots, with needs kept alongside
/// in `<loan_id>.needs.json`.
#[derive(Debug)]
pub struct JsonFileRepository {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, loan_id: &str, suffix: &str) -> MortgageEngineResult<PathBuf> {
        let valid = !loan_id.is_empty()
            && loan_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(MortgageEngineError::InvalidInput {
                field: "loan_id".into(),
                reason: format!("'{loan_id}' is not a valid loan identifier"),
            });
        }
        Ok(self.root.join(format!("{loan_id}{suffix}")))
    }

    /// Write a loan snapshot, replacing any existing one.
    pub fn store_file(&self, loan_id: &str, file: &LoanFile) -> MortgageEngineResult<()> {
        let path = self.path_for(loan_id, ".json")?;
        let _lock = guard(&self.write_lock)?;
        fs::create_dir_all(&self.root)?;
        fs::write(&path, serde_json::to_vec_pretty(file)?)?;
        tracing::debug!(path = %path.display(), "loan file written");
        Ok(())
    }
}

impl LoanRepository for JsonFileRepository {
    fn load_file(&self, loan_id: &str) -> MortgageEngineResult<LoanFile> {
        let path = self.path_for(loan_id, ".json")?;
        if !path.exists() {
            return Err(MortgageEngineError::NotFound(format!("loan {loan_id}")));
        }
        let raw = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn save_needs(&self, loan_id: &str, needs: &[DocumentNeed]) -> MortgageEngineResult<()> {
        let path = self.path_for(loan_id, ".needs.json")?;
        let _lock = guard(&self.write_lock)?;

        let mut all = self.needs(loan_id)?;
        all.extend_from_slice(needs);

        fs::create_dir_all(&self.root)?;
        fs::write(&path, serde_json::to_vec_pretty(&all)?)?;
        tracing::debug!(path = %path.display(), count = needs.len(), "document needs saved");
        Ok(())
    }

    fn needs(&self, loan_id: &str) -> MortgageEngineResult<Vec<DocumentNeed>> {
        let path = self.path_for(loan_id, ".needs.json")?;
        if !path.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}
