//! `crew agents`: inspect a roster before syncing it.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use crew_core::{map_model, validate_slug, AgentProfile, GatewayConfig};

use super::load_agents;

/// Arguments for `crew agents`.
#[derive(Args, Debug)]
pub struct AgentsArgs {
    /// Roster file (YAML or JSON) listing the agents.
    #[arg(long)]
    pub agents: PathBuf,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl AgentsArgs {
    pub fn run(self) -> Result<()> {
        let agents = load_agents(&self.agents)?;
        let gateway = GatewayConfig::from_env();
        let rows: Vec<AgentRow> = agents.iter().map(|a| AgentRow::new(a, &gateway)).collect();

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&rows).context("failed to serialize agents JSON")?
            );
            return Ok(());
        }

        print_table(rows, &gateway);
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct AgentRow {
    id: String,
    name: String,
    slug: String,
    /// `None` when the slug is usable, else the validation error.
    slug_error: Option<String>,
    model: Option<String>,
    skills: usize,
}

impl AgentRow {
    fn new(agent: &AgentProfile, gateway: &GatewayConfig) -> Self {
        AgentRow {
            id: agent.id.clone(),
            name: agent.name.clone(),
            slug: agent.slug.clone(),
            slug_error: validate_slug(&agent.slug).err().map(|e| e.to_string()),
            model: map_model(agent.model(), gateway),
            skills: agent.skills.iter().filter(|s| s.content().is_some()).count(),
        }
    }
}

#[derive(Tabled)]
struct AgentTableRow {
    #[tabled(rename = "slug")]
    slug: String,
    #[tabled(rename = "name")]
    name: String,
    #[tabled(rename = "check")]
    check: String,
    #[tabled(rename = "model")]
    model: String,
    #[tabled(rename = "skills")]
    skills: usize,
}

fn print_table(rows: Vec<AgentRow>, gateway: &GatewayConfig) {
    let invalid = rows.iter().filter(|r| r.slug_error.is_some()).count();
    println!(
        "crew v{} | {} agents | {} invalid | gateway {}",
        env!("CARGO_PKG_VERSION"),
        rows.len(),
        invalid,
        if gateway.is_enabled() { "on" } else { "off" },
    );

    if rows.is_empty() {
        println!("Roster is empty.");
        return;
    }

    let table_rows: Vec<AgentTableRow> = rows
        .into_iter()
        .map(|row| AgentTableRow {
            slug: row.slug,
            name: row.name,
            check: match row.slug_error {
                None => "ok".green().to_string(),
                Some(err) => err.red().to_string(),
            },
            model: row.model.unwrap_or_else(|| "-".to_string()),
            skills: row.skills,
        })
        .collect();
    let mut table = Table::new(table_rows);
    table.with(Style::rounded());
    println!("{table}");

    if invalid > 0 {
        println!("Agents with invalid slugs are skipped by 'crew sync'.");
    }
}
