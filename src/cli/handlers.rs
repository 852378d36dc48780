// src/cli/handlers.rs
use inquire::Password;
use serde::Serialize;
use std::error::Error;
use std::path::Path;
use uuid::Uuid;

use crate::cli::CliCommand;
use crate::core::config::Config;
use crate::core::vault::Vault;
use crate::db;
use crate::generators::{GeneratorError, PasswordGenerator, PolicyUpdate};
use crate::importers::CsvImporter;
use crate::models::PasswordEntry;
use crate::strength::{Evaluation, StrengthChecker};
use crate::utils::{format_entry_row, format_time_ago, parse_delimiter};

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedPassword {
    pub password: String,
    pub entropy_bits: f64,
}

/// Generator for the configured policy with the given categories switched off.
pub fn generator_with_toggles(
    config: &Config,
    no_uppercase: bool,
    no_lowercase: bool,
    no_digits: bool,
    no_symbols: bool,
) -> Result<PasswordGenerator, GeneratorError> {
    let mut generator = PasswordGenerator::with_policy(config.generator_policy())?;
    generator.set_policy(PolicyUpdate {
        require_upper: no_uppercase.then_some(false),
        require_lower: no_lowercase.then_some(false),
        require_digit: no_digits.then_some(false),
        require_symbol: no_symbols.then_some(false),
        ..Default::default()
    })?;
    Ok(generator)
}

pub fn generate_batch(
    generator: &PasswordGenerator,
    length: usize,
    count: usize,
) -> Result<Vec<GeneratedPassword>, GeneratorError> {
    Ok(generator
        .generate_many(length, count)?
        .into_iter()
        .map(|password| GeneratedPassword {
            entropy_bits: generator.estimate_entropy_bits(&password),
            password,
        })
        .collect())
}

pub fn handle_generate(
    generator: &PasswordGenerator,
    length: usize,
    count: usize,
    show_entropy: bool,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    let batch = generate_batch(generator, length, count)?;
    log::debug!("Generated {} passwords of length {}", batch.len(), length);

    if json {
        println!("{}", serde_json::to_string_pretty(&batch)?);
        return Ok(());
    }

    for generated in &batch {
        if show_entropy {
            println!("{}  ({:.1} bits)", generated.password, generated.entropy_bits);
        } else {
            println!("{}", generated.password);
        }
    }
    Ok(())
}

pub fn print_evaluation(evaluation: &Evaluation, min_length: usize) {
    let details = &evaluation.details;
    println!("Strength: {}", evaluation.strength);
    println!("  Score: {}/3", details.score);
    println!(
        "  Length >= {}: {}",
        min_length,
        if details.length_ok { "yes" } else { "no" }
    );
    println!("  Character classes: {}/4", details.variety_count);
    if details.contains_common_pattern {
        println!("  ⚠️ Contains a common pattern");
    }
}

pub fn handle_check(checker: &StrengthChecker, password: &str, json: bool) -> Result<(), Box<dyn Error>> {
    let evaluation = checker.evaluate(password);

    if json {
        println!("{}", serde_json::to_string_pretty(&evaluation)?);
    } else {
        print_evaluation(&evaluation, checker.min_length());
    }
    Ok(())
}

pub fn parse_id(id: &str) -> Result<Uuid, Box<dyn Error>> {
    Uuid::parse_str(id.trim()).map_err(|e| format!("Invalid password ID '{}': {}", id, e).into())
}

pub fn print_entries(entries: &[PasswordEntry], json: bool) -> Result<(), Box<dyn Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("❗ No passwords stored yet.");
        return Ok(());
    }

    println!("{}", format_entry_row("ID", "SITE", "USERNAME", "UPDATED"));
    for entry in entries {
        println!(
            "{}",
            format_entry_row(
                &entry.id.to_string(),
                &entry.site,
                &entry.username,
                &format_time_ago(entry.updated_at)
            )
        );
    }
    Ok(())
}

pub fn print_entry_details(entry: &PasswordEntry) {
    println!("\n🔐 Password Details");
    println!("ID: {}", entry.id);
    println!("Site: {}", entry.site);
    println!("Username: {}", entry.username);
    println!("Password: {}", entry.password);
    if let Some(notes) = &entry.notes {
        println!("Notes: {}", notes);
    }
    println!("Created: {}", entry.created_at);
    println!("Last updated: {}", entry.updated_at);
}

#[allow(clippy::too_many_arguments)]
pub async fn handle_add_password(
    vault: &Vault,
    site: &str,
    username: &str,
    password: Option<String>,
    generate: bool,
    length: usize,
    notes: Option<&str>,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    let password = match password {
        Some(pwd) => pwd,
        None if generate => vault.generate_password(length)?,
        None => Password::new("Enter password:")
            .with_display_mode(inquire::PasswordDisplayMode::Hidden)
            .without_confirmation()
            .prompt()?,
    };

    let (id, label) = vault.add_password(site, username, &password, notes).await?;

    if json {
        let mut body = serde_json::json!({ "id": id, "strength": label });
        if generate {
            body["password"] = serde_json::Value::String(password);
        }
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        if generate {
            println!("Generated password: {}", password);
        }
        println!("✅ Password added successfully! (ID: {}, strength: {})", id, label);
    }
    Ok(())
}

pub async fn handle_list_passwords(vault: &Vault, json: bool) -> Result<(), Box<dyn Error>> {
    let entries = vault.get_all_passwords().await?;
    print_entries(&entries, json)
}

pub async fn handle_search(vault: &Vault, site: &str, json: bool) -> Result<(), Box<dyn Error>> {
    let entries = vault.get_passwords_for_site(site).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else if entries.is_empty() {
        println!("❗ No passwords saved for {}.", site);
    } else {
        for entry in &entries {
            print_entry_details(entry);
        }
    }
    Ok(())
}

pub async fn handle_update_password(vault: &Vault, id: &str, password: &str, json: bool) -> Result<(), Box<dyn Error>> {
    let id = parse_id(id)?;
    let label = vault.update_password(id, password).await?;

    if json {
        println!("{}", serde_json::json!({ "id": id, "strength": label }));
    } else {
        println!("✅ Password updated (strength: {})", label);
    }
    Ok(())
}

pub async fn handle_delete_password(vault: &Vault, id: &str, json: bool) -> Result<(), Box<dyn Error>> {
    let id = parse_id(id)?;
    vault.remove_password(id).await?;

    if json {
        println!("{}", serde_json::json!({ "id": id, "deleted": true }));
    } else {
        println!("✅ Password deleted");
    }
    Ok(())
}

pub async fn handle_import(
    vault: &Vault,
    path: &Path,
    delimiter: &str,
    no_header: bool,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    let importer = CsvImporter::new(parse_delimiter(delimiter)?, !no_header);
    let summary = vault.import_csv(path, &importer).await?;

    if json {
        println!(
            "{}",
            serde_json::json!({ "imported": summary.imported, "skipped": summary.skipped })
        );
    } else {
        println!("✅ Imported {} passwords", summary.imported);
        if summary.skipped > 0 {
            println!("⚠️ Skipped {} passwords below {} strength", summary.skipped, vault.min_strength());
        }
    }
    Ok(())
}

pub async fn handle_export(
    vault: &Vault,
    path: &Path,
    delimiter: &str,
    no_header: bool,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    let importer = CsvImporter::new(parse_delimiter(delimiter)?, !no_header);
    let count = vault.export_csv(path, &importer).await?;

    if json {
        println!("{}", serde_json::json!({ "exported": count, "path": path.display().to_string() }));
    } else {
        println!("✅ Exported {} passwords to {}", count, path.display());
        println!("⚠️ The file contains plaintext passwords. Keep it safe.");
    }
    Ok(())
}

pub async fn open_vault(config: &Config, db_url: &str) -> Result<Vault, Box<dyn Error>> {
    let db = db::init_db(db_url).await?;
    Ok(Vault::from_config(db, config)?)
}

/// Run a single subcommand. `generate` and `check` never touch the database.
pub async fn run_command(
    command: CliCommand,
    config: &Config,
    db_url: &str,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    match command {
        CliCommand::Generate {
            length,
            count,
            no_uppercase,
            no_lowercase,
            no_digits,
            no_symbols,
            entropy,
        } => {
            let generator = generator_with_toggles(config, no_uppercase, no_lowercase, no_digits, no_symbols)?;
            let length = length.unwrap_or(config.default_password_length);
            handle_generate(&generator, length, count, entropy, json)
        }
        CliCommand::Check { password } => handle_check(&config.strength_checker(), &password, json),
        CliCommand::Add { site, username, password, generate, notes } => {
            let vault = open_vault(config, db_url).await?;
            handle_add_password(
                &vault,
                &site,
                &username,
                password,
                generate,
                config.default_password_length,
                notes.as_deref(),
                json,
            )
            .await
        }
        CliCommand::List => {
            let vault = open_vault(config, db_url).await?;
            handle_list_passwords(&vault, json).await
        }
        CliCommand::Search { site } => {
            let vault = open_vault(config, db_url).await?;
            handle_search(&vault, &site, json).await
        }
        CliCommand::Update { id, password } => {
            let vault = open_vault(config, db_url).await?;
            handle_update_password(&vault, &id, &password, json).await
        }
        CliCommand::Delete { id } => {
            let vault = open_vault(config, db_url).await?;
            handle_delete_password(&vault, &id, json).await
        }
        CliCommand::Import { path, delimiter, no_header } => {
            let vault = open_vault(config, db_url).await?;
            handle_import(&vault, &path, &delimiter, no_header, json).await
        }
        CliCommand::Export { path, delimiter, no_header } => {
            let vault = open_vault(config, db_url).await?;
            handle_export(&vault, &path, &delimiter, no_header, json).await
        }
    }
}
