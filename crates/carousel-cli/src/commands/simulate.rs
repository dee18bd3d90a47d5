use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use carousel_core::script::{run_script, Script, TraceRecord};
use carousel_core::{AppConfig, Error};

pub fn run(config: &AppConfig, script_path: &Path, every: usize) -> Result<()> {
    if every == 0 {
        return Err(Error::Script("trace interval must be at least 1".to_string()).into());
    }

    let script = Script::load(script_path)
        .with_context(|| format!("Failed to load script {}", script_path.display()))?;
    let trace = run_script(&config.carousel, &script)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_trace(&mut out, &trace, every)?;
    out.flush()?;

    info!(
        frames = trace.len(),
        steps = script.steps.len(),
        "simulation finished"
    );
    Ok(())
}

/// One JSON object per line for every `every`-th record
fn write_trace<W: Write>(out: &mut W, trace: &[TraceRecord], every: usize) -> Result<()> {
    for record in trace.iter().step_by(every) {
        serde_json::to_writer(&mut *out, record)?;
        writeln!(out)?;
    }
    Ok(())
}
