//! Interactive terminal client.
//!
//! Asks for birth details one field at a time, prints the reading, then
//! answers follow-up questions until `/quit` or end of input. `/report`
//! saves the conversation as a text file in the working directory.
//!
//! Uses the same environment variables as the server binary; logs go to
//! stderr at `warn` unless `RUST_LOG` says otherwise.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::Context;
use jyotish::chart::birth::{parse_date, parse_time, DEFAULT_TIMEZONE};
use jyotish::session::{render_report, report_file_name};
use jyotish::{load_model, load_rules, AppConfig, Astrologer, BirthDetailsForm, NarrativeRewriter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let config = AppConfig::from_env();
    let rules = load_rules(&config.rules_dir);
    let model = load_model(&config.model).await;
    let astrologer = Astrologer::new(Arc::new(rules), NarrativeRewriter::new(model));

    println!("=== Jyotish: your AI astrologer ===");
    println!("Enter your birth details. Press Ctrl-D to leave.\n");

    let Some(form) = read_birth_details()? else {
        return Ok(());
    };

    println!("\nCasting your chart...\n");
    let (mut session, reading) = astrologer.begin_session(&form).await?;

    println!("--- Astrological Insights ---");
    for prediction in &reading.predictions {
        println!("- {}", prediction);
    }
    println!("\nAstrologer: {}\n", reading.interpretation);
    println!("Ask a follow-up question, /report to save the conversation, or /quit.");

    loop {
        let Some(line) = prompt("You")? else {
            break;
        };
        match line.as_str() {
            "" => continue,
            "/quit" | "/exit" => break,
            "/report" => {
                let report = render_report(&session)?;
                let path = report_file_name(&session);
                std::fs::write(&path, report)
                    .with_context(|| format!("Failed to write {}", path))?;
                println!("Report saved to {}\n", path);
            }
            question => {
                let reply = astrologer.follow_up(&mut session, question).await?;
                println!("\nAstrologer: {}\n", reply);
            }
        }
    }

    println!("May the stars guide you.");
    Ok(())
}

/// Collect every field, re-asking until each one is acceptable.
///
/// Returns `None` if input ends before the form is complete.
fn read_birth_details() -> anyhow::Result<Option<BirthDetailsForm>> {
    let mut form = BirthDetailsForm::default();

    let fields: [(&str, &mut Option<String>, fn(&str) -> Result<(), String>); 5] = [
        ("Full name", &mut form.name, non_blank),
        ("Gender", &mut form.gender, non_blank),
        ("Date of birth (YYYY-MM-DD)", &mut form.dob, |v| {
            parse_date(v).map(|_| ()).map_err(|e| e.to_string())
        }),
        ("Time of birth (HH:MM)", &mut form.tob, |v| {
            parse_time(v).map(|_| ()).map_err(|e| e.to_string())
        }),
        ("Place of birth", &mut form.pob, non_blank),
    ];

    for (label, slot, check) in fields {
        loop {
            let Some(value) = prompt(label)? else {
                return Ok(None);
            };
            match check(&value) {
                Ok(()) => {
                    *slot = Some(value);
                    break;
                }
                Err(message) => println!("  {}", message),
            }
        }
    }

    let label = format!("Timezone (blank for {})", DEFAULT_TIMEZONE);
    let Some(timezone) = prompt(&label)? else {
        return Ok(None);
    };
    if !timezone.is_empty() {
        form.timezone = Some(timezone);
    }

    Ok(Some(form))
}

fn non_blank(value: &str) -> Result<(), String> {
    if value.is_empty() {
        Err("This field is required.".to_string())
    } else {
        Ok(())
    }
}

/// Show `label` and read one trimmed line. `None` at end of input.
fn prompt(label: &str) -> io::Result<Option<String>> {
    print!("{}: ", label);
    io::stdout().flush()?;

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
