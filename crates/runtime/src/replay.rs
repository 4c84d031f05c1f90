use std::io::{self, Write};

use backtest_core::{BacktestResult, Signal};

use crate::logging::{RunLogEvent, RunLogEventKind, RunLogWriter};

pub const REPLAY_CSV_HEADER: &str = "t,price,signal,position,pnl,equity\n";

pub struct ReplayCsvWriter<W: Write> {
    writer: W,
}

impl<W: Write> ReplayCsvWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn write_header(&mut self) -> io::Result<()> {
        self.writer.write_all(REPLAY_CSV_HEADER.as_bytes())
    }

    /// One row per step. Nothing is written for a degenerate (empty) result.
    pub fn append_result_rows(
        &mut self,
        prices: &[f64],
        signals: &[Signal],
        result: &BacktestResult,
    ) -> io::Result<()> {
        let rows = result.len().min(prices.len()).min(signals.len());
        for t in 0..rows {
            writeln!(
                self.writer,
                "{t},{},{},{},{},{}",
                prices[t],
                signals[t].value(),
                result.position[t],
                result.pnl[t],
                result.equity_curve[t]
            )?;
        }
        Ok(())
    }

    /// Writes the whole artifact, flushes, then logs `ReplayArtifactWritten`.
    pub fn write_result_and_log(
        &mut self,
        prices: &[f64],
        signals: &[Signal],
        result: &BacktestResult,
        run_log_writer: &mut dyn RunLogWriter,
    ) -> io::Result<()> {
        self.write_header()?;
        self.append_result_rows(prices, signals, result)?;
        self.writer.flush()?;
        run_log_writer.write(
            RunLogEvent::new(
                result.len().saturating_sub(1) as u64,
                RunLogEventKind::ReplayArtifactWritten,
            )
            .with_field("rows", result.len()),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, io, rc::Rc};

    use backtest_core::{BacktestResult, Backtester, Signal};

    use crate::logging::{InMemoryRunLogWriter, RunLogEvent, RunLogEventKind, RunLogWriter};

    use super::{ReplayCsvWriter, REPLAY_CSV_HEADER};

    struct TrackingWriter {
        bytes: Vec<u8>,
        flush_called: Rc<Cell<bool>>,
        flush_fails: bool,
    }

    impl TrackingWriter {
        fn new(flush_called: Rc<Cell<bool>>, flush_fails: bool) -> Self {
            Self {
                bytes: Vec::new(),
                flush_called,
                flush_fails,
            }
        }
    }

    impl io::Write for TrackingWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.bytes.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            self.flush_called.set(true);
            if self.flush_fails {
                return Err(io::Error::other("flush failed"));
            }
            Ok(())
        }
    }

    struct FlushAssertingLogWriter {
        flush_called: Rc<Cell<bool>>,
    }

    impl RunLogWriter for FlushAssertingLogWriter {
        fn write(&mut self, _event: RunLogEvent) {
            assert!(
                self.flush_called.get(),
                "expected writer flush before logging"
            );
        }
    }

    fn small_run() -> (Vec<f64>, Vec<Signal>, BacktestResult) {
        let prices = vec![10.0, 12.0, 11.0];
        let signals = vec![Signal::Flat, Signal::Long, Signal::Long];
        let result = Backtester::new(100.0, 0.0, 0.0).run(&prices, &signals, 1.0 / 252.0);
        (prices, signals, result)
    }

    #[test]
    fn writes_one_row_per_step() {
        let (prices, signals, result) = small_run();
        let mut output = Vec::new();
        let mut writer = ReplayCsvWriter::new(&mut output);

        writer.write_header().unwrap();
        writer.append_result_rows(&prices, &signals, &result).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            format!("{REPLAY_CSV_HEADER}0,10,0,0,0,100\n1,12,1,1,2,102\n2,11,1,1,-1,101\n")
        );
    }

    #[test]
    fn degenerate_result_writes_header_only() {
        let mut output = Vec::new();
        let mut writer = ReplayCsvWriter::new(&mut output);
        let mut log = InMemoryRunLogWriter::new();

        writer
            .write_result_and_log(&[1.0], &[Signal::Long], &BacktestResult::default(), &mut log)
            .unwrap();

        assert_eq!(String::from_utf8(output).unwrap(), REPLAY_CSV_HEADER);
        assert_eq!(log.events()[0].field("rows"), Some("0"));
    }

    #[test]
    fn write_result_and_log_flushes_before_emitting_log() {
        let (prices, signals, result) = small_run();
        let flush_called = Rc::new(Cell::new(false));
        let writer = TrackingWriter::new(Rc::clone(&flush_called), false);
        let mut replay_writer = ReplayCsvWriter::new(writer);
        let mut log_writer = FlushAssertingLogWriter { flush_called };

        replay_writer
            .write_result_and_log(&prices, &signals, &result, &mut log_writer)
            .expect("artifact write should flush and log");
    }

    #[test]
    fn write_result_and_log_propagates_flush_errors() {
        let (prices, signals, result) = small_run();
        let flush_called = Rc::new(Cell::new(false));
        let writer = TrackingWriter::new(Rc::clone(&flush_called), true);
        let mut replay_writer = ReplayCsvWriter::new(writer);
        let mut log_writer = InMemoryRunLogWriter::new();

        let err = replay_writer
            .write_result_and_log(&prices, &signals, &result, &mut log_writer)
            .expect_err("flush failure should be returned");

        assert_eq!(err.kind(), io::ErrorKind::Other);
        assert_eq!(log_writer.events().len(), 0);
    }

    #[test]
    fn logged_event_uses_last_step_as_tick() {
        let (prices, signals, result) = small_run();
        let mut output = Vec::new();
        let mut replay_writer = ReplayCsvWriter::new(&mut output);
        let mut log_writer = InMemoryRunLogWriter::new();

        replay_writer
            .write_result_and_log(&prices, &signals, &result, &mut log_writer)
            .unwrap();

        assert_eq!(log_writer.events().len(), 1);
        assert_eq!(log_writer.events()[0].tick, 2);
        assert_eq!(
            log_writer.events()[0].kind,
            RunLogEventKind::ReplayArtifactWritten
        );
    }
}
