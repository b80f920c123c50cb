//! Report settings passed explicitly into the pipeline.

pub const DEFAULT_COUNT: usize = 5;
pub const DEFAULT_SCRUBS: u32 = 4;

/// Knobs for one report run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    /// How many of the stalest PGs to show. Clamped to the rows available.
    pub count: usize,
    /// `osd_max_scrubs` value embedded in remediation commands.
    pub scrubs: u32,
    /// Whether to build remediation commands.
    pub emit_commands: bool,
    /// Whether callers should print per-row resolved instants.
    pub debug: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            count: DEFAULT_COUNT,
            scrubs: DEFAULT_SCRUBS,
            emit_commands: true,
            debug: false,
        }
    }
}

impl ReportConfig {
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn with_scrubs(mut self, scrubs: u32) -> Self {
        self.scrubs = scrubs;
        self
    }

    pub fn without_commands(mut self) -> Self {
        self.emit_commands = false;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}
