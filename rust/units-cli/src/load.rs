use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, warn};
use units_repo::{Account, Unit, UnitName};

/// File extension of unit specification files.
pub const UNIT_EXTENSION: &str = "unit";

/// Load every `*.unit` file in `dir` into an account owned by `owner`.
///
/// The unit name is the file stem. Files whose stem is not a valid unit
/// name are skipped.
pub fn load_account(dir: &Path, owner: &str) -> Result<Account> {
    let mut account = Account::new(owner);
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))?;

    for entry in entries {
        let path = entry?.path();
        if !path.is_file() || path.extension().and_then(|ext| ext.to_str()) != Some(UNIT_EXTENSION)
        {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
            warn!(path = %path.display(), "skipping unit file with a non UTF-8 name");
            continue;
        };
        if !UnitName::is_valid(stem) {
            warn!(path = %path.display(), "skipping unit file with an invalid unit name");
            continue;
        }

        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        debug!(unit = stem, "loaded unit");
        account.insert(Unit::new(stem, text));
    }

    Ok(account)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use testresult::TestResult;
    use units_repo::User;

    #[test]
    fn it_loads_unit_files_by_stem() -> TestResult {
        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join("build.unit"), "shell.Step(\"make\")")?;
        std::fs::write(dir.path().join("deploy-prod.unit"), "[build]")?;
        std::fs::write(dir.path().join("notes.txt"), "not a unit")?;
        std::fs::write(dir.path().join("bad name.unit"), "1")?;

        let account = load_account(dir.path(), "alice")?;

        assert_eq!(account.owner(), "alice");
        assert_eq!(
            account.units().into_iter().collect::<Vec<_>>(),
            vec!["build".to_string(), "deploy-prod".to_string()]
        );
        assert_eq!(
            account.get("deploy-prod").map(|unit| unit.spec().as_text().to_owned()),
            Some("[build]".to_string())
        );
        Ok(())
    }

    #[test]
    fn it_fails_for_missing_directories() -> TestResult {
        let dir = tempfile::tempdir()?;
        let missing = dir.path().join("missing");

        let error = load_account(&missing, "alice").unwrap_err();

        assert!(error.to_string().starts_with("reading "));
        Ok(())
    }
}
