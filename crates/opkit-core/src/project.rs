//! Pipeline output records and the host that consumes them.

use serde::Serialize;
use serde_json::Value;

use crate::error::PipelineError;

/// Signal returned by the host after each emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitSignal {
    /// Keep going.
    Continue,
    /// The consumer wants no more items; stop promptly without fetching
    /// further pages. Distinct from failure.
    Stop,
}

/// A structured error attached to the output stream instead of crashing
/// the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ErrorRecord {
    /// The operation that failed.
    pub operation: String,
    /// Error classification code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

impl ErrorRecord {
    /// Build a record from a pipeline error.
    #[must_use]
    pub fn from_error(operation: &str, error: &PipelineError) -> Self {
        let (code, message) = match error {
            PipelineError::Validation(m) => ("ValidationError".to_owned(), m.clone()),
            PipelineError::Transport { message, .. } => {
                ("TransportError".to_owned(), message.clone())
            }
            PipelineError::Service { code, message } => (code.clone(), message.clone()),
            PipelineError::Cancelled => {
                ("Cancelled".to_owned(), "operation cancelled".to_owned())
            }
            PipelineError::Internal(e) => ("InternalError".to_owned(), e.to_string()),
        };
        Self {
            operation: operation.to_owned(),
            code,
            message,
        }
    }
}

/// One record emitted to the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineRecord {
    /// A projected output object.
    Output(Value),
    /// A captured failure.
    Error(ErrorRecord),
}

/// Consumer of pipeline records.
pub trait PipelineHost {
    /// Accept one record; the returned signal controls further iteration.
    fn emit(&mut self, record: PipelineRecord) -> EmitSignal;
}

/// Host that collects records into memory; useful for tests and for
/// callers that post-process the whole result set.
#[derive(Debug, Default)]
pub struct CollectingHost {
    /// Records received so far.
    pub records: Vec<PipelineRecord>,
    /// Stop after this many records, if set.
    pub first: Option<usize>,
}

impl CollectingHost {
    /// Collect everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect at most `n` records, then signal stop.
    #[must_use]
    pub fn first(n: usize) -> Self {
        Self {
            records: Vec::new(),
            first: Some(n),
        }
    }

    /// The projected output values received so far.
    #[must_use]
    pub fn outputs(&self) -> Vec<&Value> {
        self.records
            .iter()
            .filter_map(|r| match r {
                PipelineRecord::Output(v) => Some(v),
                PipelineRecord::Error(_) => None,
            })
            .collect()
    }
}

impl PipelineHost for CollectingHost {
    fn emit(&mut self, record: PipelineRecord) -> EmitSignal {
        self.records.push(record);
        match self.first {
            Some(n) if self.records.len() >= n => EmitSignal::Stop,
            _ => EmitSignal::Continue,
        }
    }
}
