//! Commands that talk to the records backend.

use clap::Args;
use labform_core::HttpRecordClient;
use std::path::PathBuf;
use tracing::debug;

use super::{open_form, runtime};
use crate::config::{BackendConfig, Config};
use crate::store;

fn client(backend: &BackendConfig) -> Result<HttpRecordClient, labform_core::SubmitError> {
    HttpRecordClient::from_settings(backend.server_url.as_deref(), backend.api_key.as_deref())
}

/// Submit a record file to the backend
#[derive(Args)]
pub struct SubmitCommand {
    /// Record file
    pub file: PathBuf,

    /// Layout file (defaults to the configured layout)
    #[arg(long)]
    pub layout: Option<PathBuf>,
}

impl SubmitCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let client = client(&config.backend)?;
        let mut form = open_form(&self.file, self.layout.as_deref(), config)?;
        if form.prepared_by().is_none() {
            form.set_prepared_by(config.prepared_by.value.clone());
        }

        let rt = runtime()?;
        let receipt = rt.block_on(form.submit(&client))?;

        store::save_record(&self.file, &form.payload())?;
        match &receipt.status {
            Some(status) => println!("Submitted record {} ({})", receipt.id, status),
            None => println!("Submitted record {}", receipt.id),
        }
        Ok(())
    }
}

/// Download a saved record into a local file
#[derive(Args)]
pub struct FetchCommand {
    /// Record ID
    pub id: String,

    /// Record file to create
    #[arg(long, short)]
    pub out: PathBuf,
}

impl FetchCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let client = client(&config.backend)?;
        let rt = runtime()?;
        let record = rt.block_on(client.fetch(&self.id))?;
        debug!(id = %self.id, sections = record.sections.len(), "record fetched");

        store::create_record(&self.out, &record)?;
        println!(
            "Fetched {} record {} ({} sections): {}",
            record.form_name,
            self.id,
            record.sections.len(),
            self.out.display()
        );
        Ok(())
    }
}

/// Check that the backend is reachable
#[derive(Args)]
pub struct PingCommand {}

impl PingCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        if !config.backend.is_configured() {
            println!("Status: Not configured");
            println!();
            println!("To enable the backend, add to your config file:");
            println!();
            println!("  backend:");
            println!("    server_url: \"https://lims.example.com\"");
            println!("    api_key: \"your-api-key\"");
            println!();
            println!("Or set environment variables:");
            println!("  LABFORM_SERVER_URL, LABFORM_API_KEY");
            return Ok(());
        }

        let client = client(&config.backend)?;
        println!("Server: {}", client.server_url());
        let rt = runtime()?;
        match rt.block_on(client.check_server()) {
            Ok(()) => println!("Server status: ✓ reachable"),
            Err(e) => println!("Server status: ✗ {}", e),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_requires_backend() {
        let backend = BackendConfig::default();
        let err = client(&backend).unwrap_err();
        assert!(err.to_string().contains("Backend not configured"));

        let backend = BackendConfig {
            server_url: Some("https://lims.example/".into()),
            api_key: Some("key".into()),
        };
        assert_eq!(client(&backend).unwrap().server_url(), "https://lims.example");
    }
}
