use std::fmt;

/// One stage of the bootstrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    SelectDatabase,
    EnsureCollection,
    EnsureIndexes,
    InsertSeed,
    SignalCompletion,
}

/// Stages in execution order. Each runs only after the previous one succeeded.
pub const STEP_ORDER: &[Step] = &[
    Step::SelectDatabase,   // ping first so nothing is written when unreachable
    Step::EnsureCollection,
    Step::EnsureIndexes,
    Step::InsertSeed,
    Step::SignalCompletion, // only on the all-success path
];

impl Step {
    pub fn name(self) -> &'static str {
        match self {
            Step::SelectDatabase => "select_database",
            Step::EnsureCollection => "ensure_collection",
            Step::EnsureIndexes => "ensure_indexes",
            Step::InsertSeed => "insert_seed",
            Step::SignalCompletion => "signal_completion",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
