//! # Analysis configuration
//!
//! Thresholds for the heuristics applied while classifying words. The
//! defaults suit small embedded stacks; the command line can override each.

/// Heuristic knobs for classification and trace rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisConfig
{
    /// How far past a zero-size symbol a value may land and still match it.
    pub max_unbounded_span: u64,
    /// Values closer than this to their own address are stack-local pointers.
    pub stack_local_threshold: u64,
    /// Fill patterns marking unused stack, compared with a word's low 32 bits.
    pub sentinels: Vec<u32>,
}

impl AnalysisConfig
{
    pub const DEFAULT_MAX_UNBOUNDED_SPAN: u64 = 0x10000;
    pub const DEFAULT_STACK_LOCAL_THRESHOLD: u64 = 0x1000;
    pub const DEFAULT_SENTINELS: [u32; 2] = [0xeeee_eeee, 0xdead_beef];

    /// Whether `word` is one of the fill patterns.
    pub fn is_sentinel(&self, word: u64) -> bool
    {
        // Only the low half matters on 64-bit targets.
        let low = (word & 0xffff_ffff) as u32;
        self.sentinels.contains(&low)
    }
}

impl Default for AnalysisConfig
{
    fn default() -> Self
    {
        Self {
            max_unbounded_span: Self::DEFAULT_MAX_UNBOUNDED_SPAN,
            stack_local_threshold: Self::DEFAULT_STACK_LOCAL_THRESHOLD,
            sentinels: Self::DEFAULT_SENTINELS.to_vec(),
        }
    }
}
