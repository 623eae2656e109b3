use crate::errors::AppResult;
use crate::script::{extract_from_bytes, OutputReport};
use clap::Args;
use tracing::debug;

#[derive(Args)]
pub struct DecodeCommand {
    /// Hex-encoded output script
    pub script_hex: String,

    /// Print compact single-line JSON
    #[arg(long)]
    pub compact: bool,
}

impl DecodeCommand {
    pub fn run(&self) -> AppResult<()> {
        println!("{}", self.render()?);
        Ok(())
    }

    /// Decode the script and render the JSON report
    pub fn render(&self) -> AppResult<String> {
        let bytes = hex::decode(self.script_hex.trim())?;
        let output = extract_from_bytes(&bytes);
        debug!("Decoded {} bytes as {}", bytes.len(), output.address_type());

        let report = OutputReport::from(&output);
        let json = if self.compact {
            serde_json::to_string(&report)?
        } else {
            serde_json::to_string_pretty(&report)?
        };
        Ok(json)
    }
}
