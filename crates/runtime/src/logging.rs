use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunLogEventKind {
    BacktestStarted,
    DegenerateInput,
    Rebalanced,
    BacktestCompleted,
    ReplayArtifactWritten,
}

impl RunLogEventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BacktestStarted => "backtest_started",
            Self::DegenerateInput => "degenerate_input",
            Self::Rebalanced => "rebalanced",
            Self::BacktestCompleted => "backtest_completed",
            Self::ReplayArtifactWritten => "replay_artifact_written",
        }
    }
}

/// One structured log record. `tick` is the step index the event refers to;
/// `fields` are rendered as `key=value` pairs in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct RunLogEvent {
    pub tick: u64,
    pub kind: RunLogEventKind,
    pub fields: Vec<(&'static str, String)>,
}

impl RunLogEvent {
    pub fn new(tick: u64, kind: RunLogEventKind) -> Self {
        Self {
            tick,
            kind,
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, key: &'static str, value: impl ToString) -> Self {
        self.fields.push((key, value.to_string()));
        self
    }

    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn render(&self) -> String {
        let mut line = format!("event={} tick={}", self.kind.as_str(), self.tick);
        for (key, value) in &self.fields {
            line.push(' ');
            line.push_str(key);
            line.push('=');
            line.push_str(value);
        }
        line
    }
}

pub trait RunLogWriter {
    fn write(&mut self, event: RunLogEvent);
}

#[derive(Debug, Default)]
pub struct InMemoryRunLogWriter {
    events: Vec<RunLogEvent>,
}

impl InMemoryRunLogWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[RunLogEvent] {
        &self.events
    }

    pub fn kinds(&self) -> Vec<RunLogEventKind> {
        self.events.iter().map(|event| event.kind).collect()
    }
}

impl RunLogWriter for InMemoryRunLogWriter {
    fn write(&mut self, event: RunLogEvent) {
        self.events.push(event);
    }
}

/// Writes one rendered line per event. Write failures are dropped so a
/// closed log stream never aborts a run.
#[derive(Debug)]
pub struct LineRunLogWriter<W: Write> {
    writer: W,
}

impl<W: Write> LineRunLogWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl LineRunLogWriter<io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write> RunLogWriter for LineRunLogWriter<W> {
    fn write(&mut self, event: RunLogEvent) {
        let _ = writeln!(self.writer, "{}", event.render());
    }
}
