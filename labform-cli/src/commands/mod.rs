mod config_cmd;
mod edit;
mod record;
mod remote;

pub use config_cmd::ConfigCommand;
pub use edit::EditCommand;
pub use record::RecordCommand;
pub use remote::{FetchCommand, PingCommand, SubmitCommand};

use clap::ValueEnum;
use labform_core::{FormLayout, MultiSectionForm, Record};
use std::path::Path;

use crate::config::Config;
use crate::store;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Layout from `--layout` when given, else the configured one.
fn load_layout(
    layout: Option<&Path>,
    config: &Config,
) -> Result<FormLayout, Box<dyn std::error::Error>> {
    let path = layout.unwrap_or(config.layout_path.value.as_path());
    Ok(FormLayout::load(path)?)
}

fn check_form_name(record: &Record, layout: &FormLayout) -> Result<(), Box<dyn std::error::Error>> {
    if record.form_name != layout.name {
        return Err(format!(
            "Record is a '{}' form but the layout is '{}'",
            record.form_name, layout.name
        )
        .into());
    }
    Ok(())
}

/// Opens a record file in edit mode and runs the first render.
fn open_form(
    file: &Path,
    layout: Option<&Path>,
    config: &Config,
) -> Result<MultiSectionForm, Box<dyn std::error::Error>> {
    let record = store::load_record(file)?;
    let layout = load_layout(layout, config)?;
    check_form_name(&record, &layout)?;
    let mut form = MultiSectionForm::new(layout, None, Some(record))?;
    form.render();
    Ok(form)
}

fn runtime() -> Result<tokio::runtime::Runtime, Box<dyn std::error::Error>> {
    Ok(tokio::runtime::Runtime::new()?)
}
