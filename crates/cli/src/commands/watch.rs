use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use implgen_core::{CancellationToken, GenerationReport, Generator};
use notify::{Event, EventKind, RecursiveMode, Watcher};
use tracing::{debug, info, warn};

use crate::display::print_report;
use crate::sink::DirectorySink;
use crate::utils::{find_source_files, is_source_file, load_config, read_sources};

/// Quiet period before a burst of file events triggers a pass
const DEBOUNCE: Duration = Duration::from_millis(200);

/// A generation pass running on its own thread. The generator travels with
/// the pass so its cache survives into the next one.
struct Pass {
    token: CancellationToken,
    handle: JoinHandle<(Generator, Result<GenerationReport>)>,
}

impl Pass {
    fn start(mut generator: Generator, paths: Vec<PathBuf>, out: PathBuf) -> Self {
        let token = CancellationToken::new();
        let pass_token = token.clone();
        let handle = thread::spawn(move || {
            let result = run_pass(&mut generator, &paths, &out, &pass_token);
            (generator, result)
        });
        Self { token, handle }
    }

    /// Stop the pass early and take the generator back
    fn cancel(self) -> Result<Generator> {
        self.token.cancel();
        self.finish()
    }

    fn finish(self) -> Result<Generator> {
        let (generator, result) = self
            .handle
            .join()
            .map_err(|_| anyhow!("Generation thread panicked"))?;
        match result {
            Ok(report) if report.cancelled => info!("Pass cancelled by newer changes"),
            Ok(_) => {}
            Err(e) => warn!("Generation failed: {e:#}"),
        }
        Ok(generator)
    }
}

pub fn watch_command(paths: &[PathBuf], out: &Path, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let extension = config.output_extension.clone();
    let mut generator = Generator::new(config).context("Invalid configuration")?;

    let (tx, rx) = mpsc::channel();
    let mut watcher = notify::recommended_watcher(tx).context("Failed to create file watcher")?;
    for path in paths {
        watcher
            .watch(path, RecursiveMode::Recursive)
            .with_context(|| format!("Failed to watch {}", path.display()))?;
    }
    println!("👀 Watching {} path(s), writing to {}", paths.len(), out.display());

    let mut pass = Some(Pass::start(generator, paths.to_vec(), out.to_path_buf()));
    loop {
        if !wait_for_changes(&rx, &extension) {
            break;
        }
        generator = match pass.take() {
            Some(running) if running.handle.is_finished() => running.finish()?,
            Some(running) => running.cancel()?,
            None => break,
        };
        pass = Some(Pass::start(generator, paths.to_vec(), out.to_path_buf()));
    }

    if let Some(running) = pass {
        running.finish()?;
    }
    Ok(())
}

/// Block until a relevant change has settled. False once the watcher is gone.
fn wait_for_changes(rx: &Receiver<notify::Result<Event>>, extension: &str) -> bool {
    loop {
        match rx.recv() {
            Ok(Ok(event)) if is_relevant(&event, extension) => break,
            Ok(Ok(_)) => continue,
            Ok(Err(e)) => warn!("Watch error: {e}"),
            Err(_) => return false,
        }
    }

    loop {
        match rx.recv_timeout(DEBOUNCE) {
            Ok(_) => continue,
            Err(RecvTimeoutError::Timeout) => return true,
            Err(RecvTimeoutError::Disconnected) => return false,
        }
    }
}

fn is_relevant(event: &Event, extension: &str) -> bool {
    matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    ) && event
        .paths
        .iter()
        .any(|path| is_source_file(path, extension))
}

fn run_pass(
    generator: &mut Generator,
    paths: &[PathBuf],
    out: &Path,
    token: &CancellationToken,
) -> Result<GenerationReport> {
    let files = find_source_files(paths, &generator.config().output_extension)?;
    debug!("Pass over {} files", files.len());
    let sources = read_sources(&files)?;
    let mut sink = DirectorySink::new(out)
        .with_context(|| format!("Failed to create {}", out.display()))?;
    let report = generator
        .run(&sources, &mut sink, token)
        .context("Failed to parse sources")?;
    print_report(&report, Some(&sink));
    Ok(report)
}
