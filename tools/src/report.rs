//
// Summarise Vivado synthesis logs: cell usage and path delay for each
// synthesised top module, one column per module.
//

use std::collections::{BTreeMap, BTreeSet};
use std::io::{BufRead, Write};

use crate::{Error, Result};

/// I/O buffers are the same for every design, so leave them out.
const IGNORED_CELLS: [&str; 3] = ["IBUF", "OBUF", "BUFG"];

const NAME_FIELD: &str = ".";
const DELAY_FIELD: &str = ".delay";
const TOTAL_FIELD: &str = "_total";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleUsage {
    pub name: String,
    pub cells: BTreeMap<String, String>,
    pub total: u64,
    pub delay: Option<String>,
}

impl ModuleUsage {
    fn field(&self, field: &str) -> Option<String> {
        match field {
            NAME_FIELD => Some(self.name.clone()),
            DELAY_FIELD => self.delay.clone(),
            TOTAL_FIELD => Some(self.total.to_string()),
            cell => self.cells.get(cell).cloned(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum State {
    #[default]
    Idle,
    CellHeader,
    CellRows,
}

#[derive(Debug, Default)]
pub struct SynthReport {
    /// In the order the logs first synthesised them.
    pub modules: Vec<ModuleUsage>,
    /// Index into `modules` of the top being reported on.
    current: Option<usize>,
    state: State,
    lines_read: usize,
}

impl SynthReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse<R: BufRead>(reader: R) -> Result<Self> {
        let mut report = Self::new();
        report.feed(reader)?;
        Ok(report)
    }

    /// Scan one more log. Several logs may be fed in turn.
    pub fn feed<R: BufRead>(&mut self, reader: R) -> Result<()> {
        for line in reader.split(b'\n') {
            let line = line?;
            // Vivado echoes user strings, which may not be UTF-8.
            self.feed_line(String::from_utf8_lossy(&line).trim())?;
        }
        Ok(())
    }

    fn current_module(&mut self, what: &str) -> Result<&mut ModuleUsage> {
        let line = self.lines_read;
        let idx = self.current.ok_or_else(|| Error::Report {
            line,
            reason: format!("{} before any synth_design command", what),
        })?;
        Ok(&mut self.modules[idx])
    }

    /// Start reporting on `name`. Synthesising the same top again
    /// replaces its earlier results but keeps its column.
    fn start_module(&mut self, name: &str) {
        let fresh = ModuleUsage {
            name: name.to_string(),
            ..ModuleUsage::default()
        };
        let idx = match self.modules.iter().position(|m| m.name == name) {
            Some(idx) => {
                self.modules[idx] = fresh;
                idx
            }
            None => {
                self.modules.push(fresh);
                self.modules.len() - 1
            }
        };
        self.current = Some(idx);
    }

    fn feed_line(&mut self, line: &str) -> Result<()> {
        self.lines_read += 1;
        let state = self.state;

        if line.starts_with("# synth_design") {
            let name = line.split_whitespace().nth(3).ok_or_else(|| Error::Report {
                line: self.lines_read,
                reason: "synth_design command without a top module".to_string(),
            })?;
            self.start_module(name);
            return Ok(());
        }

        if line.starts_with("Report Cell Usage:") {
            self.state = State::CellHeader;
            return Ok(());
        }

        if state == State::CellHeader && line.starts_with('|') {
            self.state = State::CellRows;
            return Ok(());
        }

        if state == State::CellRows && line.starts_with('|') {
            let fields: Vec<&str> = line.split('|').collect();
            if fields.len() < 4 {
                return Err(Error::Report {
                    line: self.lines_read,
                    reason: format!("short cell usage row {:?}", line),
                });
            }
            let cell = fields[2].trim();
            let count = fields[3].trim();
            if IGNORED_CELLS.contains(&cell) {
                return Ok(());
            }
            let n: u64 = count.parse().map_err(|_| Error::Report {
                line: self.lines_read,
                reason: format!("cell count {:?} is not a number", count),
            })?;
            let module = self.current_module("cell usage")?;
            module.cells.insert(cell.to_string(), count.to_string());
            module.total += n;
            return Ok(());
        }

        if state == State::CellRows && line.is_empty() {
            self.state = State::Idle;
            return Ok(());
        }

        if line.starts_with("Data Path Delay:") {
            let delay = line.split_whitespace().nth(3).ok_or_else(|| Error::Report {
                line: self.lines_read,
                reason: "data path delay without a value".to_string(),
            })?;
            self.current_module("data path delay")?.delay = Some(delay.to_string());
        }
        Ok(())
    }

    /// Every field any module reported, sorted.
    pub fn fields(&self) -> BTreeSet<String> {
        let mut fields = BTreeSet::new();
        for module in &self.modules {
            fields.insert(NAME_FIELD.to_string());
            fields.insert(TOTAL_FIELD.to_string());
            if module.delay.is_some() {
                fields.insert(DELAY_FIELD.to_string());
            }
            fields.extend(module.cells.keys().cloned());
        }
        fields
    }

    pub fn write_table<W: Write>(&self, out: &mut W) -> Result<()> {
        for field in self.fields() {
            write!(out, "{:<10}", field)?;
            for module in &self.modules {
                let value = module.field(&field).unwrap_or_else(|| "0".to_string());
                write!(out, "{:>15}", value)?;
            }
            writeln!(out)?;
        }
        Ok(())
    }
}
