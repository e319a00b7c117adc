//! Pipeline host and confirmation gate for the terminal.

use std::io::{BufRead, Write};

use opkit_core::{ConfirmGate, EmitSignal, PipelineHost, PipelineRecord};

/// Host that writes one JSON document per record: outputs to stdout,
/// captured error records to stderr.
#[derive(Debug)]
pub struct StdoutHost {
    first: Option<usize>,
    emitted: usize,
}

impl StdoutHost {
    /// Create a host, optionally stopping after `first` records.
    #[must_use]
    pub fn new(first: Option<usize>) -> Self {
        Self { first, emitted: 0 }
    }

    /// Number of records emitted so far.
    #[must_use]
    pub fn emitted(&self) -> usize {
        self.emitted
    }
}

impl PipelineHost for StdoutHost {
    fn emit(&mut self, record: PipelineRecord) -> EmitSignal {
        match &record {
            PipelineRecord::Output(value) => {
                if let Ok(text) = serde_json::to_string_pretty(value) {
                    println!("{text}");
                }
            }
            PipelineRecord::Error(error) => {
                if let Ok(text) = serde_json::to_string(error) {
                    eprintln!("{text}");
                }
            }
        }
        self.emitted += 1;
        match self.first {
            Some(n) if self.emitted >= n => EmitSignal::Stop,
            _ => EmitSignal::Continue,
        }
    }
}

/// Gate that prompts on stderr and reads the answer from stdin.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinGate;

impl ConfirmGate for StdinGate {
    fn should_process(&self, action: &str, target: &str) -> bool {
        eprint!("Perform {action} on {target:?}? [y/N] ");
        let _ = std::io::stderr().flush();

        let mut answer = String::new();
        if std::io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}
