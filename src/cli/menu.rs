// src/cli/menu.rs
use inquire::{Confirm, Password, Select, Text};
use std::error::Error;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::cli::handlers::{print_entries, print_entry_details, print_evaluation};
use crate::core::vault::{Vault, VaultError};
use crate::importers::CsvImporter;
use crate::models::PasswordEntry;
use crate::utils::parse_delimiter;

const ADD: &str = "➕  Add a new password";
const GENERATE: &str = "🔐  Generate secure password";
const VIEW_ALL: &str = "📋  View saved passwords";
const SEARCH: &str = "🔍  Search by site";
const UPDATE: &str = "✏️  Update a password";
const DELETE: &str = "🗑️  Delete password";
const CHECK: &str = "💪  Check password strength";
const EXPORT: &str = "📤  Export to CSV";
const IMPORT: &str = "📥  Import from CSV";
const EXIT: &str = "❌  Exit";

pub async fn run_cli_menu(vault: Vault, should_exit: Arc<AtomicBool>) -> Result<(), Box<dyn Error>> {
    println!("🦀🔐 Welcome to");
    println!("╔══════════════════════════════════════╗");
    println!("║        🦀 RUST PASSKEEPER            ║");
    println!("╚══════════════════════════════════════╝");
    println!("Policy: {}", vault.generator().explain_policy());
    println!("Minimum strength for stored passwords: {}", vault.min_strength());

    // Main application loop
    while !should_exit.load(Ordering::SeqCst) {
        let options = vec![ADD, GENERATE, VIEW_ALL, SEARCH, UPDATE, DELETE, CHECK, EXPORT, IMPORT, EXIT];

        let selection_result = tokio::task::spawn_blocking(move || {
            Select::new("Choose an option:", options)
                .with_help_message("Use arrow keys to navigate, Enter to select. Ctrl+C to exit.")
                .with_page_size(20)
                .prompt_skippable()
        })
        .await?;

        // Check if we should exit
        if should_exit.load(Ordering::SeqCst) {
            break;
        }

        let selection = match selection_result {
            Ok(Some(selection)) => selection,
            Ok(None) => continue,
            Err(inquire::InquireError::OperationInterrupted) => break,
            Err(e) => {
                log::error!("Menu prompt failed: {}", e);
                return Err(Box::new(e));
            }
        };

        let outcome = match selection {
            ADD => add_password(&vault).await,
            GENERATE => generate_password(&vault),
            VIEW_ALL => view_all(&vault).await,
            SEARCH => search_by_site(&vault).await,
            UPDATE => update_password(&vault).await,
            DELETE => delete_password(&vault).await,
            CHECK => check_strength(&vault),
            EXPORT => export_csv(&vault).await,
            IMPORT => import_csv(&vault).await,
            _ => break,
        };

        match outcome {
            Ok(()) => {}
            Err(e) => match e.downcast_ref::<inquire::InquireError>() {
                Some(inquire::InquireError::OperationCanceled) => println!("↩️ Cancelled"),
                Some(inquire::InquireError::OperationInterrupted) => break,
                _ => println!("❌ {}", e),
            },
        }
    }

    println!("👋 Goodbye!");
    Ok(())
}

fn prompt_length(vault: &Vault) -> Result<usize, Box<dyn Error>> {
    let policy = vault.generator().policy();
    let default = policy.min_length.max(16).min(policy.max_length).to_string();
    let length = Text::new("Password length:")
        .with_default(&default)
        .with_help_message(&format!("Between {} and {}", policy.min_length, policy.max_length))
        .prompt()?;
    length
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a valid length", length).into())
}

fn prompt_csv_options() -> Result<(PathBuf, CsvImporter), Box<dyn Error>> {
    let path = Text::new("CSV file path:").prompt()?;
    let delimiter = Text::new("Delimiter:").with_default(",").prompt()?;
    let has_header = Confirm::new("Does the file have a header line?")
        .with_default(true)
        .prompt()?;
    Ok((PathBuf::from(path.trim()), CsvImporter::new(parse_delimiter(&delimiter)?, has_header)))
}

async fn pick_entry(vault: &Vault, prompt: &str) -> Result<Option<PasswordEntry>, Box<dyn Error>> {
    let mut passwords = vault.get_all_passwords().await?;
    if passwords.is_empty() {
        println!("❗ No passwords stored yet.");
        return Ok(None);
    }

    let site_display: Vec<String> = passwords
        .iter()
        .map(|p| format!("{} ({})", p.site, p.username))
        .collect();

    let selection = Select::new(prompt, site_display)
        .with_page_size(20)
        .raw_prompt()?;

    Ok(Some(passwords.swap_remove(selection.index)))
}

async fn add_password(vault: &Vault) -> Result<(), Box<dyn Error>> {
    let site = Text::new("Website or service:").prompt()?;
    let username = Text::new("Username or email:").prompt()?;

    let generate = Confirm::new("Generate a secure password?")
        .with_default(true)
        .prompt()?;

    let mut generated = if generate {
        let password = vault.generate_password(prompt_length(vault)?)?;
        println!("Generated password: {}", password);
        Some(password)
    } else {
        None
    };

    let notes = Text::new("Notes (optional):").prompt()?;
    let notes = if notes.trim().is_empty() { None } else { Some(notes) };

    loop {
        let password = match generated.take() {
            Some(password) => password,
            None => {
                let password = Password::new("Enter password (empty to cancel):")
                    .with_display_mode(inquire::PasswordDisplayMode::Masked)
                    .without_confirmation()
                    .prompt()?;
                if password.is_empty() {
                    println!("↩️ Cancelled");
                    return Ok(());
                }
                password
            }
        };

        match vault.add_password(&site, &username, &password, notes.as_deref()).await {
            Ok((_, label)) => {
                println!("✅ Password added successfully! (strength: {})", label);
                return Ok(());
            }
            Err(e @ VaultError::InsufficientStrength { .. }) => {
                println!("❌ {}", e);
                print_evaluation(&vault.evaluate(&password), vault.checker().min_length());
            }
            Err(e) => return Err(Box::new(e)),
        }
    }
}

fn generate_password(vault: &Vault) -> Result<(), Box<dyn Error>> {
    let length = prompt_length(vault)?;
    let password = vault.generate_password(length)?;

    println!("🔐 {}", password);
    println!(
        "   Strength: {}, estimated entropy: {:.1} bits",
        vault.checker().get_strength_label(&password),
        vault.generator().estimate_entropy_bits(&password)
    );
    Ok(())
}

async fn view_all(vault: &Vault) -> Result<(), Box<dyn Error>> {
    let passwords = vault.get_all_passwords().await?;
    print_entries(&passwords, false)?;

    if !passwords.is_empty() {
        println!("\n{} passwords stored", passwords.len());
    }
    Ok(())
}

async fn search_by_site(vault: &Vault) -> Result<(), Box<dyn Error>> {
    let site = Text::new("Site:").prompt()?;
    let entries = vault.get_passwords_for_site(site.trim()).await?;

    if entries.is_empty() {
        println!("❗ No passwords saved for {}.", site.trim());
        return Ok(());
    }

    println!("\n🔍 {} passwords found", entries.len());
    for entry in &entries {
        print_entry_details(entry);
    }
    Ok(())
}

async fn update_password(vault: &Vault) -> Result<(), Box<dyn Error>> {
    let entry = match pick_entry(vault, "Select a password to update:").await? {
        Some(entry) => entry,
        None => return Ok(()),
    };

    let generate = Confirm::new("Generate a new password?")
        .with_default(true)
        .prompt()?;

    let password = if generate {
        vault.generate_password(prompt_length(vault)?)?
    } else {
        Password::new("New password:")
            .with_display_mode(inquire::PasswordDisplayMode::Masked)
            .prompt()?
    };

    let label = vault.update_password(entry.id, &password).await?;
    if generate {
        println!("Generated password: {}", password);
    }
    println!("✅ Password for {} updated (strength: {})", entry.site, label);
    Ok(())
}

async fn delete_password(vault: &Vault) -> Result<(), Box<dyn Error>> {
    let entry = match pick_entry(vault, "Select a site to delete:").await? {
        Some(entry) => entry,
        None => return Ok(()),
    };

    let confirm = Confirm::new(&format!("Delete the password for {} ({})?", entry.site, entry.username))
        .with_default(false)
        .prompt()?;

    if confirm {
        vault.remove_password(entry.id).await?;
        println!("✅ Password deleted");
    }
    Ok(())
}

fn check_strength(vault: &Vault) -> Result<(), Box<dyn Error>> {
    let password = Password::new("Password to check:")
        .with_display_mode(inquire::PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()?;

    print_evaluation(&vault.evaluate(&password), vault.checker().min_length());
    Ok(())
}

async fn export_csv(vault: &Vault) -> Result<(), Box<dyn Error>> {
    let (path, importer) = prompt_csv_options()?;
    let count = vault.export_csv(&path, &importer).await?;
    println!("✅ Exported {} passwords to {}", count, path.display());
    Ok(())
}

async fn import_csv(vault: &Vault) -> Result<(), Box<dyn Error>> {
    let (path, importer) = prompt_csv_options()?;
    let summary = vault.import_csv(&path, &importer).await?;

    println!("✅ Imported {} passwords", summary.imported);
    if summary.skipped > 0 {
        println!("⚠️ Skipped {} passwords below {} strength", summary.skipped, vault.min_strength());
    }
    Ok(())
}
