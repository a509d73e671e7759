//! Sync command - mirror every matching product into the local directory.

use std::collections::HashMap;
use std::path::Path;
use std::process;
use std::sync::Mutex;

use console::style;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use sentinel_mirror::app::{ReqwestMirrorSession, SessionSummary};
use sentinel_mirror::mirror::{ProductPlan, SyncDecision, SyncEvent, SyncEventCallback};

use super::common::{format_bytes, spinner, MirrorArgs};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Exit code used when the user interrupts a transfer.
const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Run the sync command.
pub fn run(
    runner: &CliRunner,
    args: &MirrorArgs,
    output: Option<&Path>,
    dry_run: bool,
) -> Result<(), CliError> {
    let config = runner.app_config(output);
    let (region, grid) = args.load_inputs()?;
    let request = args.search.request(&config);
    let session = ReqwestMirrorSession::connect(&config)?;

    if dry_run {
        let pb = spinner("Searching catalog...");
        let resolution = session.resolve(&region, &grid, &request);
        pb.finish_and_clear();
        let plans = session.plan(&resolution?.products)?;
        print_plans(&plans);
        return Ok(());
    }

    ctrlc::set_handler(|| {
        eprintln!();
        eprintln!("Interrupted. Partially transferred products are downloaded again on the next sync.");
        process::exit(INTERRUPTED_EXIT_CODE);
    })
    .map_err(|e| CliError::Interrupt(e.to_string()))?;

    let progress = SyncProgress::new();
    let on_event: SyncEventCallback = Box::new(move |event| progress.handle(event));
    let summary = session.run(&region, &grid, &request, &*on_event)?;
    print_summary(&summary, session.root());
    Ok(())
}

/// Terminal progress bars, one per product being downloaded.
struct SyncProgress {
    multi: MultiProgress,
    bars: Mutex<HashMap<String, ProgressBar>>,
}

impl SyncProgress {
    fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            bars: Mutex::new(HashMap::new()),
        }
    }

    fn handle(&self, event: &SyncEvent) {
        match event {
            SyncEvent::Queued { product } => {
                let _ = self
                    .multi
                    .println(format!("{} {}", style("queued").dim(), product));
            }
            SyncEvent::Started {
                product,
                decision: SyncDecision::NeedsDownload,
                total_bytes,
                ..
            } => {
                let bar = self.multi.add(ProgressBar::new(*total_bytes));
                bar.set_style(bar_style());
                bar.set_prefix(product.clone());
                if let Ok(mut bars) = self.bars.lock() {
                    bars.insert(product.clone(), bar);
                }
            }
            SyncEvent::Started { .. } => {}
            SyncEvent::Progress {
                product,
                bytes,
                bytes_per_sec,
                ..
            } => {
                if let Some(bar) = self.bar(product) {
                    bar.set_position(*bytes);
                    bar.set_message(format!("{}/s", format_bytes(*bytes_per_sec as u64)));
                }
            }
            SyncEvent::Finished { product, status } => match self.bar(product) {
                Some(bar) => bar.finish_with_message(status.to_string()),
                None => {
                    let _ = self
                        .multi
                        .println(format!("{} {}", style(status).green(), product));
                }
            },
        }
    }

    fn bar(&self, product: &str) -> Option<ProgressBar> {
        self.bars.lock().ok()?.get(product).cloned()
    }
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{prefix:.bold} [{bar:30.cyan/blue}] {bytes}/{total_bytes} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ")
}

fn print_plans(plans: &[ProductPlan]) {
    println!("{} product(s):", plans.len());
    for plan in plans {
        let decision = match plan.decision {
            SyncDecision::AlreadyComplete => style("already present").green(),
            SyncDecision::NeedsDownload => style("needs download").yellow(),
        };
        println!("  {}  {}", decision, plan.product.name());
        println!(
            "      remote {} in {} file(s), local {} in {} file(s)",
            format_bytes(plan.remote_bytes),
            plan.remote_files,
            format_bytes(plan.local.total_bytes),
            plan.local.file_count
        );
    }
}

fn print_summary(summary: &SessionSummary, root: &Path) {
    println!();
    println!(
        "{} product(s): {} downloaded, {} already present",
        summary.synced.len(),
        summary.downloaded(),
        summary.skipped()
    );
    println!(
        "Transferred {} into {}",
        format_bytes(summary.transferred_bytes()),
        style(root.display()).cyan()
    );
}
