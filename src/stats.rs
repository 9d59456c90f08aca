//! # Statistics Collaborator
//!
//! Counters the engine increments as it runs, and rendered on request
//! via `--stats=PATH` plus any of `--insts --vars --hot --frequent
//! --print=STR --eol`. Flag ordering and the exact textual layout are
//! an external contract, not part of the engine itself (see the design
//! notes on statistics in the top-level spec this crate implements);
//! this module only guarantees the counters themselves are accurate.

use std::collections::HashMap;

use crate::program::Opcode;

/// One requested statistic, in the order it appeared on the command line.
#[derive(Clone, Debug, PartialEq)]
pub enum StatFlag {
    Insts,
    Vars,
    Hot,
    Frequent,
    Print(String),
    Eol,
}

#[derive(Default)]
pub struct Stats {
    insts: u64,
    vars_high_water: usize,
    executed_by_index: HashMap<usize, u64>,
    opcode_counts: HashMap<Opcode, u64>,
}

impl Stats {
    pub fn new() -> Stats {
        Stats::default()
    }

    /// Called once per dispatched instruction (every opcode counts,
    /// including `LABEL`/`BREAK`, which still occupy a program slot).
    pub fn record_instruction(&mut self, index: usize, opcode: Opcode) {
        self.insts += 1;
        *self.executed_by_index.entry(index).or_insert(0) += 1;
        *self.opcode_counts.entry(opcode).or_insert(0) += 1;
    }

    /// Called after any `DEFVAR` with the total number of currently-defined
    /// variables across GF, TF, and the LF stack.
    pub fn observe_var_count(&mut self, current: usize) {
        if current > self.vars_high_water {
            self.vars_high_water = current;
        }
    }

    /// The program index executed the most times; ties favor the
    /// lowest index.
    fn hottest_index(&self) -> Option<usize> {
        self.executed_by_index
            .iter()
            .max_by(|(ia, ca), (ib, cb)| ca.cmp(cb).then_with(|| ib.cmp(ia)))
            .map(|(i, _)| *i)
    }

    /// The opcode executed the most times; ties favor whichever sorts
    /// first among `Opcode`'s discriminants.
    fn most_frequent_opcode(&self) -> Option<Opcode> {
        self.opcode_counts
            .iter()
            .max_by(|(oa, ca), (ob, cb)| {
                ca.cmp(cb).then_with(|| (*ob as u8).cmp(&(*oa as u8)))
            })
            .map(|(o, _)| *o)
    }

    /// Render the requested flags, in the order given, into the stats
    /// file's text body.
    pub fn render(&self, flags: &[StatFlag]) -> String {
        let mut out = String::new();
        for flag in flags {
            match flag {
                StatFlag::Insts => out.push_str(&self.insts.to_string()),
                StatFlag::Vars => out.push_str(&self.vars_high_water.to_string()),
                StatFlag::Hot => {
                    if let Some(idx) = self.hottest_index() {
                        out.push_str(&(idx + 1).to_string());
                    }
                }
                StatFlag::Frequent => {
                    if let Some(op) = self.most_frequent_opcode() {
                        out.push_str(&format!("{:?}", op));
                    }
                }
                StatFlag::Print(s) => out.push_str(s),
                StatFlag::Eol => out.push('\n'),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_instruction_count() {
        let mut stats = Stats::new();
        stats.record_instruction(0, Opcode::Move);
        stats.record_instruction(1, Opcode::Write);
        assert_eq!(stats.render(&[StatFlag::Insts]), "2");
    }

    #[test]
    fn high_water_mark_tracks_peak_variable_count() {
        let mut stats = Stats::new();
        stats.observe_var_count(3);
        stats.observe_var_count(1);
        stats.observe_var_count(5);
        assert_eq!(stats.render(&[StatFlag::Vars]), "5");
    }

    #[test]
    fn hot_breaks_ties_toward_the_lowest_index() {
        let mut stats = Stats::new();
        stats.record_instruction(4, Opcode::Add);
        stats.record_instruction(1, Opcode::Add);
        assert_eq!(stats.render(&[StatFlag::Hot]), "2");
    }
}
