//! VCD waveform recording.
//!
//! [`VcdRecorder`] writes IEEE 1364 Value Change Dump text that GTKWave,
//! Surfer and similar viewers can open. It is fed through the
//! [`ValueChangeSink`] interface, so it only sees signals that are watched by
//! a [`ValueCallbacks`](crate::callbacks::ValueCallbacks) registry.
//!
//! One tick is written as one nanosecond.

use std::io::Write;

use crate::callbacks::{ValueChange, ValueChangeSink};
use crate::error::SimError;
use crate::value::{SignalId, SignalTable};

/// VCD recorder writing to any [`Write`] implementation.
///
/// Signal identifiers use printable ASCII characters starting from `!` (0x21).
pub struct VcdRecorder<W: Write> {
    writer: W,
    id_map: Vec<(SignalId, String, u32)>, // (signal_id, id_code, width)
    next_id: u32,
    header_written: bool,
    definitions_closed: bool,
    current_time: Option<u64>,
}

impl<W: Write> VcdRecorder<W> {
    /// Creates a new VCD recorder writing to the given output.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            id_map: Vec::new(),
            next_id: 0,
            header_written: false,
            definitions_closed: false,
            current_time: None,
        }
    }

    /// Creates a recorder and declares every signal of `table`.
    ///
    /// Dotted hierarchical names become nested `$scope` blocks, so
    /// `TOP.Module1.m0.o_a_b` is declared as `o_a_b` inside
    /// `TOP` / `Module1` / `m0`.
    pub fn for_table(writer: W, table: &SignalTable) -> Result<Self, SimError> {
        let mut rec = Self::new(writer);
        let mut open: Vec<&str> = Vec::new();
        for (id, sig) in table.iter() {
            let mut parts: Vec<&str> = sig.name.split('.').collect();
            let leaf = parts.pop().unwrap_or(sig.name.as_str());

            let common = open
                .iter()
                .zip(parts.iter())
                .take_while(|(a, b)| a == b)
                .count();
            while open.len() > common {
                open.pop();
                rec.end_scope()?;
            }
            for scope in &parts[common..] {
                rec.begin_scope(scope)?;
                open.push(*scope);
            }
            rec.register_signal(id, leaf, sig.width)?;
        }
        while open.pop().is_some() {
            rec.end_scope()?;
        }
        Ok(rec)
    }

    /// Opens a new scope (hierarchy level).
    pub fn begin_scope(&mut self, name: &str) -> Result<(), SimError> {
        self.ensure_header()?;
        writeln!(self.writer, "$scope module {name} $end")?;
        Ok(())
    }

    /// Closes the current scope.
    pub fn end_scope(&mut self) -> Result<(), SimError> {
        writeln!(self.writer, "$upscope $end")?;
        Ok(())
    }

    /// Declares a signal inside the current scope.
    pub fn register_signal(
        &mut self,
        id: SignalId,
        name: &str,
        width: u32,
    ) -> Result<(), SimError> {
        self.ensure_header()?;
        let id_code = Self::make_id_code(self.next_id);
        self.next_id += 1;

        writeln!(self.writer, "$var wire {width} {id_code} {name} $end")?;

        self.id_map.push((id, id_code, width));
        Ok(())
    }

    /// Records a value change at the given tick.
    pub fn record_change(&mut self, tick: u64, id: SignalId, value: u64) -> Result<(), SimError> {
        self.ensure_header()?;

        if self.current_time != Some(tick) {
            if !self.definitions_closed {
                writeln!(self.writer, "$enddefinitions $end")?;
                writeln!(self.writer, "$dumpvars")?;
                self.definitions_closed = true;
            }
            writeln!(self.writer, "#{tick}")?;
            self.current_time = Some(tick);
        }

        let (_, id_code, width) = self
            .id_map
            .iter()
            .find(|(sid, _, _)| *sid == id)
            .ok_or_else(|| SimError::InvalidSignalRef {
                reason: format!("unregistered VCD signal {}", id.as_raw()),
            })?;

        if *width == 1 {
            writeln!(self.writer, "{}{id_code}", value & 1)?;
        } else {
            writeln!(
                self.writer,
                "{} {id_code}",
                Self::format_vector(value, *width)
            )?;
        }
        Ok(())
    }

    /// Flushes the output, closing the definitions section if nothing was recorded.
    pub fn finalize(&mut self) -> Result<(), SimError> {
        self.ensure_header()?;
        if !self.definitions_closed {
            writeln!(self.writer, "$enddefinitions $end")?;
            self.definitions_closed = true;
        }
        self.writer.flush()?;
        Ok(())
    }

    fn ensure_header(&mut self) -> Result<(), SimError> {
        if self.header_written {
            return Ok(());
        }
        writeln!(self.writer, "$version")?;
        writeln!(self.writer, "  pipecheck")?;
        writeln!(self.writer, "$end")?;
        writeln!(self.writer, "$timescale")?;
        writeln!(self.writer, "  1ns")?;
        writeln!(self.writer, "$end")?;
        self.header_written = true;
        Ok(())
    }

    /// Generates a VCD identifier code from a sequential index.
    ///
    /// Multi-character codes are generated for indices >= 94.
    fn make_id_code(index: u32) -> String {
        let mut result = String::new();
        let mut idx = index;
        loop {
            let c = (b'!' + (idx % 94) as u8) as char;
            result.push(c);
            idx /= 94;
            if idx == 0 {
                break;
            }
            idx -= 1;
        }
        result
    }

    /// Formats a multi-bit value as a VCD binary vector (`b1010`).
    fn format_vector(value: u64, width: u32) -> String {
        let mut s = String::with_capacity(width as usize + 1);
        s.push('b');
        for i in (0..width.min(64)).rev() {
            s.push(if (value >> i) & 1 == 1 { '1' } else { '0' });
        }
        s
    }
}

impl<W: Write> ValueChangeSink for VcdRecorder<W> {
    fn value_changed(&mut self, change: &ValueChange) -> Result<(), SimError> {
        self.record_change(change.time.ticks, change.signal, change.value)
    }

    fn finish(&mut self) -> Result<(), SimError> {
        self.finalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::SimTime;

    fn text(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn id_code_sequence() {
        assert_eq!(VcdRecorder::<Vec<u8>>::make_id_code(0), "!");
        assert_eq!(VcdRecorder::<Vec<u8>>::make_id_code(1), "\"");
        assert_eq!(VcdRecorder::<Vec<u8>>::make_id_code(93), "~");
        assert_eq!(VcdRecorder::<Vec<u8>>::make_id_code(94).len(), 2);
    }

    #[test]
    fn register_signal_writes_var() {
        let mut buf = Vec::new();
        let mut rec = VcdRecorder::new(&mut buf);
        let clk = SignalId::from_raw(0);
        rec.begin_scope("top").unwrap();
        rec.register_signal(clk, "clk", 1).unwrap();
        rec.end_scope().unwrap();
        drop(rec);

        let output = text(buf);
        assert!(output.contains("$var wire 1 ! clk $end"));
        assert!(output.contains("$scope module top $end"));
        assert!(output.contains("$upscope $end"));
    }

    #[test]
    fn record_single_bit_changes() {
        let mut buf = Vec::new();
        let mut rec = VcdRecorder::new(&mut buf);
        let clk = SignalId::from_raw(0);
        rec.register_signal(clk, "clk", 1).unwrap();
        rec.record_change(0, clk, 0).unwrap();
        rec.record_change(1, clk, 1).unwrap();
        rec.finalize().unwrap();
        drop(rec);

        let output = text(buf);
        assert!(output.contains("$dumpvars"));
        assert!(output.contains("#0\n0!"));
        assert!(output.contains("#1\n1!"));
        assert_eq!(output.matches("$enddefinitions $end").count(), 1);
    }

    #[test]
    fn record_vector_change() {
        let mut buf = Vec::new();
        let mut rec = VcdRecorder::new(&mut buf);
        let data = SignalId::from_raw(0);
        rec.register_signal(data, "data", 4).unwrap();
        rec.record_change(0, data, 0b1010).unwrap();
        drop(rec);
        assert!(text(buf).contains("b1010 !"));
    }

    #[test]
    fn unregistered_signal_errors() {
        let mut rec = VcdRecorder::new(Vec::new());
        let err = rec.record_change(0, SignalId::from_raw(9), 1).unwrap_err();
        assert!(matches!(err, SimError::InvalidSignalRef { .. }));
    }

    #[test]
    fn finalize_empty_recorder() {
        let mut buf = Vec::new();
        let mut rec = VcdRecorder::new(&mut buf);
        rec.finalize().unwrap();
        drop(rec);

        let output = text(buf);
        assert!(output.contains("$timescale"));
        assert!(output.contains("$enddefinitions $end"));
    }

    #[test]
    fn for_table_nests_scopes() {
        let mut table = SignalTable::new();
        table.declare("TOP.Module1.clock", 1, 0).unwrap();
        table.declare("TOP.Module1.m0.o_a_b", 1, 0).unwrap();
        table.declare("TOP.Module1.i_a_b", 1, 0).unwrap();
        let mut buf = Vec::new();
        VcdRecorder::for_table(&mut buf, &table).unwrap();
        let output = text(buf);

        let expected = "\
$scope module TOP $end
$scope module Module1 $end
$var wire 1 ! clock $end
$scope module m0 $end
$var wire 1 \" o_a_b $end
$upscope $end
$var wire 1 # i_a_b $end
$upscope $end
$upscope $end
";
        assert!(output.ends_with(expected), "got:\n{output}");
    }

    #[test]
    fn sink_interface_records_ticks() {
        let mut buf = Vec::new();
        let mut rec = VcdRecorder::new(&mut buf);
        let clk = SignalId::from_raw(0);
        rec.register_signal(clk, "clk", 1).unwrap();
        rec.value_changed(&ValueChange {
            time: SimTime::from_ticks(7),
            signal: clk,
            value: 1,
        })
        .unwrap();
        rec.finish().unwrap();
        drop(rec);
        assert!(text(buf).contains("#7\n1!"));
    }
}
