//! Client core for the Convert Buddy conversion service.
//!
//! Submits local files for a remote conversion and follows the resulting job
//! until it finishes:
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use convert_buddy::api::JobClient;
//! use convert_buddy::orchestrator::Orchestrator;
//! use convert_buddy::selection::{ConversionTarget, InputFile, InputSelection};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Arc::new(JobClient::with_base_url("http://localhost:8000"));
//! let orch = Orchestrator::new(client, "http://localhost:8000", Duration::from_millis(1500));
//!
//! let target = ConversionTarget::from("pdf->jpg");
//! let mut selection = InputSelection::for_target(&target);
//! selection.replace_with(vec![InputFile::new("a.pdf", std::fs::read("a.pdf")?)]);
//!
//! orch.on_update(|view| println!("{} {}%", view.label, view.progress));
//! orch.submit(&target, &selection, r#"{"dpi":300}"#).await?;
//! if let Some(view) = orch.wait().await {
//!     println!("download: {:?}", view.download_url);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod artifact;
pub mod config;
pub mod error;
pub mod options;
pub mod orchestrator;
pub mod poller;
pub mod request;
pub mod selection;
pub mod status;

pub use error::ConvertError;
