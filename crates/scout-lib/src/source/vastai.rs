//! `vastai` command-line source

use async_trait::async_trait;
use std::process::Output;
use tokio::process::Command;
use tracing::{debug, info};

use super::{OfferSource, RentRequest};
use crate::error::SourceError;
use crate::models::{InstanceCategory, Offer, RawOffer};

/// Default program name, resolved through `PATH`
pub const DEFAULT_PROGRAM: &str = "vastai";

/// Shells out to the vast.ai CLI
///
/// Authentication is whatever the CLI itself is configured with.
#[derive(Debug, Clone)]
pub struct VastCli {
    program: String,
    template_hash: String,
}

impl VastCli {
    /// Create a source that creates instances from `template_hash`
    pub fn new(template_hash: impl Into<String>) -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            template_hash: template_hash.into(),
        }
    }

    /// Use a different executable
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Arguments for `search offers`
    pub fn search_args(category: InstanceCategory, query: &str) -> Vec<String> {
        let mode = match category {
            InstanceCategory::OnDemand => "-d",
            InstanceCategory::Interruptible => "-b",
        };
        vec![
            "search".to_string(),
            "offers".to_string(),
            query.to_string(),
            "--raw".to_string(),
            mode.to_string(),
        ]
    }

    /// Arguments for `create instance`
    pub fn create_args(&self, request: &RentRequest) -> Vec<String> {
        let mut args = vec![
            "create".to_string(),
            "instance".to_string(),
            request.offer_id.clone(),
            "--disk".to_string(),
            request.disk_gb.to_string(),
        ];
        if let Some(bid) = request.bid_price {
            args.push("--bid_price".to_string());
            args.push(format!("{:.4}", bid));
        }
        args.push("--template_hash".to_string());
        args.push(self.template_hash.clone());
        args
    }

    async fn run(&self, args: &[String]) -> Result<Output, SourceError> {
        debug!(program = %self.program, ?args, "Running marketplace command");

        let output = Command::new(&self.program)
            .args(args)
            .output()
            .await
            .map_err(|source| SourceError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(SourceError::ExitStatus {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output)
    }
}

#[async_trait]
impl OfferSource for VastCli {
    async fn fetch(&self, category: InstanceCategory, query: &str) -> Result<Vec<Offer>, SourceError> {
        let output = self.run(&Self::search_args(category, query)).await?;
        parse_offers(&String::from_utf8_lossy(&output.stdout), category)
    }

    async fn create_instance(&self, request: &RentRequest) -> Result<String, SourceError> {
        info!(
            offer_id = %request.offer_id,
            bid_price = ?request.bid_price,
            "Creating instance"
        );
        let output = self.run(&self.create_args(request)).await?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// Decode a `--raw` search response, a JSON array of offer objects
pub fn parse_offers(stdout: &str, category: InstanceCategory) -> Result<Vec<Offer>, SourceError> {
    let raw: Vec<RawOffer> = serde_json::from_str(stdout)?;
    Ok(raw
        .into_iter()
        .map(|raw| Offer::from_raw(raw, category))
        .collect())
}
