//! Driving the subject program.
//!
//! The subject is an interactive program that reads commands on stdin and
//! prints its state after each one. A whole command script is written up
//! front and stdout is captured until the process exits.

use std::io::{Read, Write};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info};

use crate::config::{HarnessConfig, SourceConfig};
use crate::error::{Error, Result};
use crate::transcript;

/// Interval between child status polls.
const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Longest stderr excerpt kept in a failure message.
const STDERR_EXCERPT: usize = 512;

/// Captured output of one subject run.
#[derive(Debug, Clone)]
pub struct Transcript {
    pub stdout: String,
    pub stderr: String,
    pub elapsed: Duration,
}

/// Run `program args...`, feed it `script` on stdin and capture its output.
///
/// stdin is written and stdout/stderr are drained on helper threads so a
/// long script cannot deadlock against full pipes. The child is killed when
/// it outlives `timeout`.
pub fn run_subject(program: &str, args: &[String], script: &str, timeout: Duration) -> Result<Transcript> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| Error::Spawn {
            program: program.to_string(),
            source,
        })?;
    debug!("spawned {program} (pid {}), script {} bytes", child.id(), script.len());

    let writer = child.stdin.take().map(|mut stdin| {
        let script = script.to_owned();
        thread::spawn(move || {
            // The subject may quit before reading everything; a broken pipe
            // here is reported through its exit status instead.
            if let Err(e) = stdin.write_all(script.as_bytes()) {
                debug!("stdin closed early: {e}");
            }
        })
    });
    let stdout_reader = child.stdout.take().map(spawn_drain);
    let stderr_reader = child.stderr.take().map(spawn_drain);

    let start = Instant::now();
    let status = loop {
        match child.try_wait()? {
            Some(status) => break status,
            None if start.elapsed() >= timeout => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(Error::Timeout {
                    program: program.to_string(),
                    timeout,
                });
            }
            None => thread::sleep(POLL_INTERVAL),
        }
    };
    let elapsed = start.elapsed();

    if let Some(handle) = writer {
        let _ = handle.join();
    }
    let stdout = join_drain(stdout_reader)?;
    let stderr = join_drain(stderr_reader)?;

    if !status.success() {
        let excerpt: String = stderr.chars().take(STDERR_EXCERPT).collect();
        return Err(Error::SubjectFailed {
            program: program.to_string(),
            status: status.to_string(),
            stderr: excerpt.trim().to_string(),
        });
    }
    debug!("{program} finished in {:.2}s, {} bytes of output", elapsed.as_secs_f64(), stdout.len());
    Ok(Transcript {
        stdout,
        stderr,
        elapsed,
    })
}

fn spawn_drain<R: Read + Send + 'static>(mut pipe: R) -> thread::JoinHandle<std::io::Result<String>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        pipe.read_to_end(&mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    })
}

fn join_drain(handle: Option<thread::JoinHandle<std::io::Result<String>>>) -> Result<String> {
    match handle {
        Some(h) => h
            .join()
            .map_err(|_| Error::Io(std::io::Error::other("output reader panicked")))?
            .map_err(Error::from),
        None => Ok(String::new()),
    }
}

/// Samples collected from one source, with the time the subject took.
#[derive(Debug, Clone)]
pub struct Collection {
    pub samples: Vec<Vec<u32>>,
    pub elapsed: Duration,
}

/// Drive the subject for one source and extract its samples.
///
/// The subject must print exactly one sample per sample command; a missing
/// or extra sample fails the source.
pub fn collect_samples(config: &HarnessConfig, source: &SourceConfig) -> Result<Collection> {
    let script = config.script(source);
    let requested = config.iterations_for(source);
    info!(
        "collecting {requested} samples from {} ({})",
        config.program,
        source.label
    );
    let transcript = run_subject(&config.program, &config.args, &script, config.timeout())?;
    let samples = transcript::extract_samples(
        &transcript.stdout,
        &config.start_marker,
        &config.end_marker,
        config.analysis.symbols.len(),
    )?;
    debug!("{}: extracted {} samples", source.label, samples.len());
    if samples.len() != requested {
        return Err(Error::SampleCountMismatch {
            requested,
            extracted: samples.len(),
        });
    }
    Ok(Collection {
        samples,
        elapsed: transcript.elapsed,
    })
}
