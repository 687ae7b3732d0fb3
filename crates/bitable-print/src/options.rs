//! Assembler options.

/// Documents produced by [`crate::prepare_multiple`] unless configured.
pub const DEFAULT_MAX_DOCUMENTS: usize = 100;

/// Rows taken by [`TableMode::FirstRecords`] unless configured.
pub const DEFAULT_TABLE_ROWS: usize = 10;

/// How the `table` of a record-backed single document is filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableMode {
    /// One row holding the first record.
    #[default]
    FirstRecord,
    /// Up to this many leading records, one row each.
    FirstRecords(usize),
}

impl TableMode {
    pub fn first_records() -> Self {
        TableMode::FirstRecords(DEFAULT_TABLE_ROWS)
    }

    pub(crate) fn row_limit(self) -> usize {
        match self {
            TableMode::FirstRecord => 1,
            TableMode::FirstRecords(rows) => rows.max(1),
        }
    }
}

/// Options for [`crate::prepare_single`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinglePrintOptions {
    /// Attach a `table` to the document.
    pub include_table_data: bool,
    /// Let non-empty test data win over fetched records.
    pub prefer_test_data: bool,
    /// Synthesize per-field placeholders when no other data exists.
    pub generate_samples: bool,
    pub table_mode: TableMode,
}

impl Default for SinglePrintOptions {
    fn default() -> Self {
        Self {
            include_table_data: true,
            prefer_test_data: true,
            generate_samples: false,
            table_mode: TableMode::default(),
        }
    }
}

impl SinglePrintOptions {
    pub fn with_table_data(mut self, include: bool) -> Self {
        self.include_table_data = include;
        self
    }

    pub fn with_prefer_test_data(mut self, prefer: bool) -> Self {
        self.prefer_test_data = prefer;
        self
    }

    pub fn with_samples(mut self, generate: bool) -> Self {
        self.generate_samples = generate;
        self
    }

    pub fn with_table_mode(mut self, mode: TableMode) -> Self {
        self.table_mode = mode;
        self
    }
}

/// Options for [`crate::prepare_multiple`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MultiplePrintOptions {
    /// Attach a one-row `table` to every document.
    pub include_table_data: bool,
    /// Records beyond this count are dropped with a warning.
    pub max_records: usize,
}

impl Default for MultiplePrintOptions {
    fn default() -> Self {
        Self {
            include_table_data: true,
            max_records: DEFAULT_MAX_DOCUMENTS,
        }
    }
}

impl MultiplePrintOptions {
    pub fn with_table_data(mut self, include: bool) -> Self {
        self.include_table_data = include;
        self
    }

    pub fn with_max_records(mut self, max_records: usize) -> Self {
        self.max_records = max_records;
        self
    }
}
