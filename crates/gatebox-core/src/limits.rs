//! Resource limits for networks and truth tables.

/// Hard ceiling on truth-table width, whatever `max_table_width` says.
///
/// A table of this width already holds 16M rows.
pub const TABLE_WIDTH_CEILING: usize = 24;

/// Resource limits for a [`Network`](crate::Network).
///
/// Composite gates build their private networks with the limits of the
/// network they are placed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum number of live gates in one network.
    pub max_gates: usize,
    /// Maximum composite nesting depth.
    pub max_nesting: usize,
    /// Maximum SysIN width accepted by the truth-table evaluator, capped
    /// at [`TABLE_WIDTH_CEILING`].
    pub max_table_width: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_gates: 1024,
            max_nesting: 16,
            max_table_width: 16,
        }
    }
}

impl Limits {
    /// Create limits with custom values.
    pub fn new(max_gates: usize, max_nesting: usize, max_table_width: usize) -> Self {
        Self {
            max_gates,
            max_nesting,
            max_table_width,
        }
    }

    /// Truth-table width actually enforced.
    pub fn table_width(&self) -> usize {
        self.max_table_width.min(TABLE_WIDTH_CEILING)
    }

    /// Permissive limits for testing and benchmarks.
    pub fn permissive() -> Self {
        Self {
            max_gates: 65_536,
            max_nesting: 64,
            max_table_width: 20,
        }
    }

    /// Strict limits for interactive editing.
    pub fn strict() -> Self {
        Self {
            max_gates: 256,
            max_nesting: 4,
            max_table_width: 8,
        }
    }
}
