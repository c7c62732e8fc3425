//! Fetch command: enqueue every URL, drain the queue, report per-file results.

use anyhow::{bail, Context, Result};
use pinfetch_core::config::{self, PinfetchConfig};
use pinfetch_core::queue::{DownloadQueue, DrainReport, RequestOutcome};
use pinfetch_core::request::HttpsDownload;
use pinfetch_core::storage::PartialFilePolicy;
use pinfetch_core::url_model::{self, DEFAULT_FILENAME};
use std::path::PathBuf;
use url::Url;

#[derive(Debug)]
pub struct FetchArgs {
    pub urls: Vec<String>,
    pub outputs: Vec<String>,
    pub download_dir: Option<PathBuf>,
    pub remove_partial: bool,
}

/// Pairs each URL with its destination filename. Explicit `--output` names
/// apply positionally; the rest are derived from the URL path. An
/// unparsable URL still gets a name so its failure shows up in the report.
pub(crate) fn plan_requests(urls: &[String], outputs: &[String]) -> Result<Vec<(String, String)>> {
    if outputs.len() > urls.len() {
        bail!(
            "{} output names given for {} URLs",
            outputs.len(),
            urls.len()
        );
    }
    Ok(urls
        .iter()
        .enumerate()
        .map(|(i, raw)| {
            let name = match outputs.get(i) {
                Some(name) => name.clone(),
                None => Url::parse(raw)
                    .map(|u| url_model::derive_filename(&u))
                    .unwrap_or_else(|_| DEFAULT_FILENAME.to_string()),
            };
            (name, raw.clone())
        })
        .collect())
}

/// Applies command-line overrides on top of the loaded config.
pub(crate) fn effective_config(mut cfg: PinfetchConfig, args: &FetchArgs) -> PinfetchConfig {
    if let Some(dir) = &args.download_dir {
        cfg.download_dir = Some(dir.clone());
    }
    if args.remove_partial {
        cfg.partial_files = PartialFilePolicy::Remove;
    }
    cfg
}

pub fn run_fetch(args: FetchArgs) -> Result<()> {
    let cfg = effective_config(config::load_or_init()?, &args);
    tracing::debug!("loaded config: {:?}", cfg);

    let plan = plan_requests(&args.urls, &args.outputs)?;
    let mut queue = DownloadQueue::from_config(&cfg).context("preparing download directory")?;
    let dir = queue.output().dir().to_path_buf();

    for (name, raw) in plan {
        let saved = dir.join(&name);
        let request = HttpsDownload::new(
            name,
            move || Url::parse(&raw).with_context(|| format!("invalid URL {raw:?}")),
            move || println!("saved {}", saved.display()),
        )
        .with_min_tls(cfg.min_tls_version)
        .with_http_version(cfg.http_version);
        queue.enqueue(request);
    }

    let report = queue.drain_all();
    print_report(&report);

    if !report.all_completed() {
        bail!(
            "{} of {} downloads failed",
            report.len() - report.completed(),
            report.len()
        );
    }
    Ok(())
}

fn print_report(report: &DrainReport) {
    for (name, outcome) in &report.entries {
        match outcome {
            RequestOutcome::Completed { bytes } => println!("ok      {name} ({bytes} bytes)"),
            RequestOutcome::SetupFailed(e) => println!("setup   {name}: {e}"),
            RequestOutcome::TransferFailed(e) => println!("failed  {name}: {e}"),
        }
    }
}
