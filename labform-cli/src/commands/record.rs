use clap::{Args, Subcommand};
use labform_core::view::render_table;
use labform_core::{FormLayout, MultiSectionForm, Record, SectionSync};
use std::path::PathBuf;

use super::{check_form_name, load_layout, open_form, OutputFormat};
use crate::config::Config;
use crate::store;

#[derive(Args)]
pub struct RecordCommand {
    #[command(subcommand)]
    pub command: RecordSubcommand,
}

#[derive(Subcommand)]
pub enum RecordSubcommand {
    /// Create a new record file from the layout templates
    New {
        /// Record file to create
        #[arg(long, short)]
        out: PathBuf,

        /// Layout file (defaults to the configured layout)
        #[arg(long)]
        layout: Option<PathBuf>,

        /// Template variant (defaults to the layout's default)
        #[arg(long)]
        variant: Option<String>,
    },

    /// Show a record's sections
    Show {
        /// Record file
        file: PathBuf,

        /// Only show this section
        #[arg(long, short)]
        section: Option<String>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Layout file (defaults to the configured layout)
        #[arg(long)]
        layout: Option<PathBuf>,
    },

    /// Check a record file against its layout
    Check {
        /// Record file
        file: PathBuf,

        /// Layout file (defaults to the configured layout)
        #[arg(long)]
        layout: Option<PathBuf>,
    },

    /// Switch the template variant; every section is reset to its template
    Variant {
        /// Record file
        file: PathBuf,

        /// Variant name
        name: String,

        /// Layout file (defaults to the configured layout)
        #[arg(long)]
        layout: Option<PathBuf>,
    },
}

impl RecordCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            RecordSubcommand::New {
                out,
                layout,
                variant,
            } => {
                let layout = load_layout(layout.as_deref(), config)?;
                let mut form = MultiSectionForm::new(layout, variant.as_deref(), None)?;
                form.set_prepared_by(config.prepared_by.value.clone());
                form.render();

                store::create_record(out, &form.payload())?;
                println!(
                    "Created {} record ({} variant, {} sections): {}",
                    form.layout().name,
                    form.variant(),
                    form.sections().len(),
                    out.display()
                );
                Ok(())
            }

            RecordSubcommand::Show {
                file,
                section,
                format,
                layout,
            } => {
                let form = open_form(file, layout.as_deref(), config)?;
                let shown: Vec<&SectionSync> = match section {
                    Some(name) => vec![form
                        .section(name)
                        .ok_or_else(|| format!("Section not found: {}", name))?],
                    None => form.sections().iter().collect(),
                };

                match format {
                    OutputFormat::Json => {
                        if let (Some(_), [only]) = (section, shown.as_slice()) {
                            println!("{}", serde_json::to_string_pretty(&only.entry())?);
                        } else {
                            println!("{}", serde_json::to_string_pretty(&form.payload())?);
                        }
                    }
                    OutputFormat::Text => {
                        println!("Record {}", form.record_id().unwrap_or("(not submitted)"));
                        println!("Form: {} (variant {})", form.layout().name, form.variant());
                        if let Some(by) = form.prepared_by() {
                            println!("Prepared by: {}", by);
                        }
                        for sync in shown {
                            let title = form
                                .section_title(sync.name().as_str())
                                .unwrap_or(sync.name().as_str());
                            println!();
                            print_section(title, sync);
                        }
                    }
                }
                Ok(())
            }

            RecordSubcommand::Check { file, layout } => {
                let record = store::load_record(file)?;
                let layout = load_layout(layout.as_deref(), config)?;
                check_form_name(&record, &layout)?;

                let problems = check_record(&record, &layout);
                if problems.is_empty() {
                    let state = if record.has_data() {
                        "has data"
                    } else {
                        "empty"
                    };
                    println!("{}: ok ({})", file.display(), state);
                    return Ok(());
                }
                for problem in &problems {
                    println!("  - {}", problem);
                }
                Err(format!("{} problem(s) found in {}", problems.len(), file.display()).into())
            }

            RecordSubcommand::Variant { file, name, layout } => {
                let mut form = open_form(file, layout.as_deref(), config)?;
                if !form.set_variant(name)? {
                    println!("Record already uses variant '{}'", name);
                    return Ok(());
                }
                form.render();
                store::save_record(file, &form.payload())?;
                println!(
                    "Switched to variant '{}'; {} section(s) reset to their templates",
                    name,
                    form.sections().len()
                );
                Ok(())
            }
        }
    }
}

fn print_section(title: &str, sync: &SectionSync) {
    println!("{}", title);
    println!("{}", "-".repeat(title.chars().count()));
    println!("{}", render_table(sync.table()));
    if let Some(url) = sync.design_photo_url() {
        println!("Design photo: {}", url);
    }
    if !sync.files().is_empty() {
        println!("Files:");
        for file in sync.files() {
            println!(
                "  - {} ({}, {} bytes)",
                file.name, file.content_type, file.size
            );
        }
    }
}

/// Structural problems of a saved record relative to its layout.
fn check_record(record: &Record, layout: &FormLayout) -> Vec<String> {
    let mut problems = Vec::new();
    let Some(templates) = layout.sections(&record.variant) else {
        problems.push(format!("unknown variant '{}'", record.variant));
        return problems;
    };

    for template in templates {
        if !record.sections.contains_key(&template.name) {
            problems.push(format!("section '{}' is missing", template.name));
        }
    }
    for (name, entry) in &record.sections {
        if !templates.iter().any(|t| &t.name == name) {
            problems.push(format!(
                "section '{}' is not part of variant '{}'",
                name, record.variant
            ));
        }

        let table = entry.table();
        for id in table.duplicate_column_ids() {
            problems.push(format!("section '{}': duplicate column id '{}'", name, id));
        }
        for key in table.orphan_keys() {
            problems.push(format!(
                "section '{}': row key '{}' has no column",
                name, key
            ));
        }
        for row in &table.rows {
            for column in &table.columns {
                if !row.contains_key(&column.accessor_key) {
                    problems.push(format!(
                        "section '{}': row '{}' has no '{}' cell",
                        name, row.id, column.accessor_key
                    ));
                }
            }
        }
        if entry.has_attachments()
            && !templates.iter().any(|t| &t.name == name && t.attachments)
        {
            problems.push(format!(
                "section '{}' has attachments but does not accept them",
                name
            ));
        }
    }
    problems
}
