// src/core/vault.rs
use std::path::Path;
use thiserror::Error;
use uuid::Uuid;

use crate::core::config::Config;
use crate::db::{Database, DbError};
use crate::generators::{GeneratorError, PasswordGenerator};
use crate::importers::{CsvImportError, CsvImporter};
use crate::models::{NewPassword, PasswordEntry, PasswordFilter};
use crate::strength::{Evaluation, StrengthChecker, StrengthLabel};

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("Password is too weak ({label}); at least {required} is required")]
    InsufficientStrength {
        label: StrengthLabel,
        required: StrengthLabel,
    },

    #[error("{0} must not contain line breaks")]
    MultilineField(&'static str),

    #[error(transparent)]
    Db(#[from] DbError),

    #[error(transparent)]
    Generator(#[from] GeneratorError),

    #[error(transparent)]
    Csv(#[from] CsvImportError),
}

pub type Result<T> = std::result::Result<T, VaultError>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

/// Password store guarded by a strength threshold. Every write goes through
/// the checker first.
pub struct Vault {
    db: Database,
    generator: PasswordGenerator,
    checker: StrengthChecker,
    min_strength: StrengthLabel,
}

impl Vault {
    pub fn new(
        db: Database,
        generator: PasswordGenerator,
        checker: StrengthChecker,
        min_strength: StrengthLabel,
    ) -> Self {
        Self {
            db,
            generator,
            checker,
            min_strength,
        }
    }

    pub fn from_config(db: Database, config: &Config) -> Result<Self> {
        let generator = PasswordGenerator::with_policy(config.generator_policy())?;
        Ok(Self::new(db, generator, config.strength_checker(), config.min_strength))
    }

    pub fn generator(&self) -> &PasswordGenerator {
        &self.generator
    }

    pub fn checker(&self) -> &StrengthChecker {
        &self.checker
    }

    pub fn min_strength(&self) -> StrengthLabel {
        self.min_strength
    }

    pub async fn count_passwords(&self) -> Result<usize> {
        Ok(self.db.get_password_count().await?)
    }

    pub fn generate_password(&self, length: usize) -> Result<String> {
        Ok(self.generator.generate(length)?)
    }

    pub fn generate_passwords(&self, length: usize, count: usize) -> Result<Vec<String>> {
        Ok(self.generator.generate_many(length, count)?)
    }

    pub fn evaluate(&self, password: &str) -> Evaluation {
        self.checker.evaluate(password)
    }

    fn ensure_strength(&self, password: &str) -> Result<StrengthLabel> {
        let label = self.checker.get_strength_label(password);
        if label < self.min_strength {
            log::warn!("Rejected password rated {} (minimum {})", label, self.min_strength);
            return Err(VaultError::InsufficientStrength {
                label,
                required: self.min_strength,
            });
        }
        Ok(label)
    }

    pub async fn add_password(
        &self,
        site: &str,
        username: &str,
        password: &str,
        notes: Option<&str>,
    ) -> Result<(Uuid, StrengthLabel)> {
        ensure_single_line("Site", Some(site))?;
        ensure_single_line("Username", Some(username))?;
        ensure_single_line("Password", Some(password))?;
        ensure_single_line("Notes", notes)?;
        let label = self.ensure_strength(password)?;

        let entry = NewPassword {
            site: site.to_string(),
            username: username.to_string(),
            password: password.to_string(),
            notes: notes.map(String::from),
        };
        let id = self.db.add_password(&entry).await?;

        log::info!("Stored password for {} ({})", site, label);
        Ok((id, label))
    }

    pub async fn get_all_passwords(&self) -> Result<Vec<PasswordEntry>> {
        Ok(self.db.get_all_passwords().await?)
    }

    pub async fn get_passwords_for_site(&self, site: &str) -> Result<Vec<PasswordEntry>> {
        Ok(self.db.get_passwords_for_site(site).await?)
    }

    pub async fn search(&self, filter: &PasswordFilter) -> Result<Vec<PasswordEntry>> {
        Ok(self.db.get_filtered_passwords(filter).await?)
    }

    pub async fn get_password_by_id(&self, id: Uuid) -> Result<PasswordEntry> {
        Ok(self.db.get_password_by_id(id).await?)
    }

    pub async fn update_password(&self, id: Uuid, new_password: &str) -> Result<StrengthLabel> {
        ensure_single_line("Password", Some(new_password))?;
        let label = self.ensure_strength(new_password)?;
        self.db
            .update_password(id, None, None, Some(new_password), None)
            .await?;

        log::info!("Updated password {} ({})", id, label);
        Ok(label)
    }

    pub async fn update_details(
        &self,
        id: Uuid,
        site: Option<&str>,
        username: Option<&str>,
        notes: Option<&str>,
    ) -> Result<()> {
        ensure_single_line("Site", site)?;
        ensure_single_line("Username", username)?;
        ensure_single_line("Notes", notes)?;
        self.db.update_password(id, site, username, None, notes).await?;
        log::debug!("Updated details of {}", id);
        Ok(())
    }

    pub async fn remove_password(&self, id: Uuid) -> Result<()> {
        self.db.delete_password(id).await?;
        log::info!("Removed password {}", id);
        Ok(())
    }

    /// Import credentials from a CSV file. Rows rated below the threshold
    /// are skipped; the rest are written in a single transaction.
    pub async fn import_csv(&self, path: &Path, importer: &CsvImporter) -> Result<ImportSummary> {
        let records = importer.read(path)?;

        let mut summary = ImportSummary::default();
        let mut accepted = Vec::with_capacity(records.len());

        for record in records {
            if self.checker.meets_min_strength(&record.password, self.min_strength) {
                accepted.push(record);
            } else {
                log::warn!("Skipping weak password for {} during import", record.site);
                summary.skipped += 1;
            }
        }

        summary.imported = self.db.add_passwords(&accepted).await?.len();

        log::info!(
            "Imported {} passwords from {} ({} skipped)",
            summary.imported,
            path.display(),
            summary.skipped
        );
        Ok(summary)
    }

    pub async fn export_csv(&self, path: &Path, importer: &CsvImporter) -> Result<usize> {
        let entries = self.db.get_all_passwords().await?;
        let count = importer.write(path, &entries)?;
        log::info!("Exported {} passwords to {}", count, path.display());
        Ok(count)
    }
}

// CSV records are one line each, so stored fields must be too
fn ensure_single_line(field: &'static str, value: Option<&str>) -> Result<()> {
    match value {
        Some(v) if v.contains(['\n', '\r']) => Err(VaultError::MultilineField(field)),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn vault_in(dir: &TempDir) -> Vault {
        let url = format!("sqlite:{}", dir.path().join("vault.db").display());
        let db = Database::connect(&url).await.unwrap();
        Vault::new(
            db,
            PasswordGenerator::default(),
            StrengthChecker::default(),
            StrengthLabel::Medium,
        )
    }

    #[tokio::test]
    async fn add_strong_password() {
        let dir = TempDir::new().unwrap();
        let vault = vault_in(&dir).await;

        let (id, label) = vault
            .add_password("example.com", "alice", "A7f!k2Lp", Some("work"))
            .await
            .unwrap();
        assert_eq!(label, StrengthLabel::Strong);

        let entry = vault.get_password_by_id(id).await.unwrap();
        assert_eq!(entry.site, "example.com");
        assert_eq!(entry.password, "A7f!k2Lp");
        assert_eq!(entry.notes.as_deref(), Some("work"));
    }

    #[tokio::test]
    async fn weak_password_is_rejected_without_write() {
        let dir = TempDir::new().unwrap();
        let vault = vault_in(&dir).await;

        let err = vault
            .add_password("example.com", "alice", "1234", None)
            .await
            .unwrap_err();
        match err {
            VaultError::InsufficientStrength { label, required } => {
                assert_eq!(label, StrengthLabel::VeryWeak);
                assert_eq!(required, StrengthLabel::Medium);
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(vault.count_passwords().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn weak_update_keeps_old_password() {
        let dir = TempDir::new().unwrap();
        let vault = vault_in(&dir).await;

        let (id, _) = vault
            .add_password("example.com", "alice", "A7f!k2Lp", None)
            .await
            .unwrap();

        assert!(vault.update_password(id, "abc").await.is_err());
        assert_eq!(vault.get_password_by_id(id).await.unwrap().password, "A7f!k2Lp");

        let label = vault.update_password(id, "Zq9#mW4!xR").await.unwrap();
        assert_eq!(label, StrengthLabel::Strong);
        assert_eq!(vault.get_password_by_id(id).await.unwrap().password, "Zq9#mW4!xR");
    }

    #[tokio::test]
    async fn line_breaks_are_rejected_without_write() {
        let dir = TempDir::new().unwrap();
        let vault = vault_in(&dir).await;

        assert!(matches!(
            vault.add_password("example.com", "alice", "A7f!k2Lp", Some("line one\nline two")).await,
            Err(VaultError::MultilineField("Notes"))
        ));
        assert!(matches!(
            vault.add_password("example.com", "alice", "A7f!k2Lp\r\n", None).await,
            Err(VaultError::MultilineField("Password"))
        ));
        assert_eq!(vault.count_passwords().await.unwrap(), 0);

        let (id, _) = vault
            .add_password("example.com", "alice", "A7f!k2Lp", Some("ok"))
            .await
            .unwrap();
        assert!(matches!(
            vault.update_details(id, None, None, Some("a\nb")).await,
            Err(VaultError::MultilineField("Notes"))
        ));
        assert_eq!(vault.get_password_by_id(id).await.unwrap().notes.as_deref(), Some("ok"));

        // Whatever is stored exports to a file that imports again
        let path = dir.path().join("out.csv");
        vault.export_csv(&path, &CsvImporter::default()).await.unwrap();
        assert_eq!(CsvImporter::default().read(&path).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_details_and_remove() {
        let dir = TempDir::new().unwrap();
        let vault = vault_in(&dir).await;

        let (id, _) = vault
            .add_password("example.com", "alice", "A7f!k2Lp", None)
            .await
            .unwrap();

        vault
            .update_details(id, Some("example.org"), None, Some("moved"))
            .await
            .unwrap();
        let entry = vault.get_password_by_id(id).await.unwrap();
        assert_eq!(entry.site, "example.org");
        assert_eq!(entry.username, "alice");
        assert_eq!(entry.notes.as_deref(), Some("moved"));

        vault.remove_password(id).await.unwrap();
        assert!(matches!(
            vault.remove_password(id).await,
            Err(VaultError::Db(DbError::NotFound))
        ));
    }

    #[tokio::test]
    async fn generated_passwords_are_accepted() {
        let dir = TempDir::new().unwrap();
        let vault = vault_in(&dir).await;

        let passwords = vault.generate_passwords(20, 5).unwrap();
        assert_eq!(passwords.len(), 5);
        for password in &passwords {
            assert_eq!(password.chars().count(), 20);
            vault.add_password("example.com", "alice", password, None).await.unwrap();
        }
        assert_eq!(vault.get_passwords_for_site("EXAMPLE.com").await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn generate_rejects_out_of_range_length() {
        let dir = TempDir::new().unwrap();
        let vault = vault_in(&dir).await;

        assert!(matches!(
            vault.generate_password(5),
            Err(VaultError::Generator(GeneratorError::LengthOutOfRange { .. }))
        ));
    }

    #[tokio::test]
    async fn import_skips_weak_rows() {
        let dir = TempDir::new().unwrap();
        let vault = vault_in(&dir).await;

        let path = dir.path().join("in.csv");
        std::fs::write(
            &path,
            "site,username,password,notes\n\
             example.com,alice,A7f!k2Lp,work\n\
             weak.com,bob,1234,\n\
             other.org,carol,Zq9#mW4!xR,\n",
        )
        .unwrap();

        let summary = vault.import_csv(&path, &CsvImporter::default()).await.unwrap();
        assert_eq!(summary, ImportSummary { imported: 2, skipped: 1 });
        assert_eq!(vault.count_passwords().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn malformed_import_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let vault = vault_in(&dir).await;

        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "site,username,password\nexample.com,alice,A7f!k2Lp\nbroken\n").unwrap();

        assert!(matches!(
            vault.import_csv(&path, &CsvImporter::default()).await,
            Err(VaultError::Csv(CsvImportError::FormatError(3, _)))
        ));
        assert_eq!(vault.count_passwords().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn export_then_import_into_new_vault() {
        let dir = TempDir::new().unwrap();
        let vault = vault_in(&dir).await;
        vault
            .add_password("example.com", "alice", "A7f!k2Lp", Some("a, b"))
            .await
            .unwrap();
        vault
            .add_password("other.org", "bob", "Zq9#mW4!xR", None)
            .await
            .unwrap();

        let path = dir.path().join("out.csv");
        let importer = CsvImporter::default();
        assert_eq!(vault.export_csv(&path, &importer).await.unwrap(), 2);

        let other_dir = TempDir::new().unwrap();
        let other = vault_in(&other_dir).await;
        let summary = other.import_csv(&path, &importer).await.unwrap();
        assert_eq!(summary, ImportSummary { imported: 2, skipped: 0 });

        let entries = other.get_passwords_for_site("example.com").await.unwrap();
        assert_eq!(entries[0].notes.as_deref(), Some("a, b"));
    }

    #[tokio::test]
    async fn search_by_site_fragment() {
        let dir = TempDir::new().unwrap();
        let vault = vault_in(&dir).await;
        vault.add_password("mail.example.com", "alice", "A7f!k2Lp", None).await.unwrap();
        vault.add_password("other.org", "bob", "Zq9#mW4!xR", None).await.unwrap();

        let filter = PasswordFilter {
            site_contains: Some("example".to_string()),
            ..Default::default()
        };
        let found = vault.search(&filter).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].username, "alice");
    }
}
