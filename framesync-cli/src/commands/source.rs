//! `framesync source` — registry view and the source-switch action.

use anyhow::{Context, Result};
use clap::Subcommand;
use tabled::{settings::Style, Table, Tabled};

use framesync_core::types::SourceId;
use framesync_core::{pointer, registry};

#[derive(Subcommand, Debug)]
pub enum SourceCommand {
    /// List configured sources and mark the active one.
    List,
    /// Switch the active pointer to another registered source.
    Switch {
        /// Source id from `framesync source list`.
        id: String,
    },
}

#[derive(Tabled)]
struct SourceRow {
    #[tabled(rename = "")]
    active: &'static str,
    #[tabled(rename = "id")]
    id: String,
    #[tabled(rename = "label")]
    label: String,
    #[tabled(rename = "remote")]
    remote: String,
    #[tabled(rename = "local path")]
    local_path: String,
    #[tabled(rename = "enabled")]
    enabled: &'static str,
}

pub fn run(command: SourceCommand) -> Result<()> {
    let root = crate::default_root()?;
    let reg = registry::load_at(&root)
        .context("failed to load source registry — create config/sources.yaml first")?;

    match command {
        SourceCommand::List => {
            let active = pointer::read_at(&root)?;
            let rows: Vec<SourceRow> = reg
                .sources
                .iter()
                .map(|s| SourceRow {
                    active: if Some(&s.id) == active.as_ref() { "*" } else { "" },
                    id: s.id.0.clone(),
                    label: s.label.clone(),
                    remote: s.remote.clone(),
                    local_path: s.local_path.display().to_string(),
                    enabled: if s.enabled { "yes" } else { "no" },
                })
                .collect();

            if rows.is_empty() {
                println!("No sources configured.");
                return Ok(());
            }
            let mut table = Table::new(rows);
            table.with(Style::rounded());
            println!("{table}");
        }
        SourceCommand::Switch { id } => {
            let source = registry::require(&reg, &SourceId::from(id.as_str()))
                .with_context(|| format!("cannot switch to '{id}'"))?;
            pointer::write_at(&root, source)
                .with_context(|| format!("failed to switch active source to '{id}'"))?;
            println!("Active source is now '{}' ({}).", source.id, source.label);
        }
    }
    Ok(())
}
