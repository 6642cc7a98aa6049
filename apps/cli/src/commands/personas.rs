//! `azai personas` - list the configured personas.

use crate::config::CliConfig;
use anyhow::Result;
use azai_orchestrator::Persona;
use colored::Colorize;
use tabled::{Table, Tabled, settings::Style};

use super::render::persona_color;

/// Execute the personas command.
pub fn execute(config: &CliConfig, json: bool) -> Result<()> {
    let table = config.persona_table()?;

    if json {
        let personas: Vec<&Persona> = table.iter().collect();
        println!("{}", serde_json::to_string_pretty(&personas)?);
        return Ok(());
    }

    println!();
    println!("{}", format!("Personas ({})", table.len()).bold().cyan());
    println!();

    #[derive(Tabled)]
    struct PersonaRow {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Instruction")]
        instruction: String,
    }

    let rows: Vec<PersonaRow> = table
        .iter()
        .map(|p| PersonaRow {
            id: p.id.clone(),
            name: p.name.color(persona_color(&p.color)).to_string(),
            instruction: summarize(&p.instruction, 60),
        })
        .collect();

    println!("{}", Table::new(rows).with(Style::rounded()));
    println!();

    Ok(())
}

/// First line of `text`, cut to `max` characters.
fn summarize(text: &str, max: usize) -> String {
    let line = text.lines().next().unwrap_or_default().trim();
    if line.chars().count() <= max {
        return line.to_string();
    }
    let cut: String = line.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", cut)
}
