//! Trace walk: per-word events, linear frames and blank-stack runs.
//!
//! Frames are reconstructed linearly: every symbol reference is taken to
//! be a saved return address and opens a new frame; the words that follow
//! belong to it until the next symbol reference. Words that equal a
//! sentinel fill pattern are never classified. A run of them is reported
//! once, from its first word to the first non-sentinel word.

use std::sync::Arc;

use tracing::{debug, warn};

use super::{AddressWindow, DumpRenderer, WordEvent};
use crate::classify::{Classification, IgnoredSymbols};
use crate::dump::MemoryDump;
use crate::types::{Address, Symbol};

/// Consecutive sentinel words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlankRun
{
    pub start: Address,
    /// In bytes.
    pub length: u64,
}

impl BlankRun
{
    pub fn end(&self) -> Address
    {
        self.start.saturating_add(self.length)
    }
}

/// A word attributed to a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameWord
{
    pub address: Address,
    pub value: u64,
    /// The word points into the stack near itself.
    pub stack_relative: bool,
}

/// Words following a saved return address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackFrame
{
    pub caller: Arc<Symbol>,
    /// Where the return address was found.
    pub address: Address,
    /// The return address itself.
    pub return_address: u64,
    pub words: Vec<FrameWord>,
}

/// One step of the trace, in address order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEvent
{
    Word(WordEvent),
    BlankStart(Address),
    BlankEnd(BlankRun),
}

/// Result of [`DumpRenderer::trace`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trace
{
    pub events: Vec<TraceEvent>,
    pub frames: Vec<StackFrame>,
    /// Terminated runs only.
    pub blank_runs: Vec<BlankRun>,
    /// A run still open when the walk ended.
    pub unterminated_blank: Option<BlankRun>,
    pub ignored: IgnoredSymbols,
}

impl Trace
{
    pub fn words(&self) -> impl Iterator<Item = &WordEvent>
    {
        self.events.iter().filter_map(|event| match event {
            TraceEvent::Word(word) => Some(word),
            _ => None,
        })
    }
}

impl DumpRenderer<'_>
{
    /// Walk `dump` inside `window` as a raw stack.
    pub fn trace(&self, dump: &MemoryDump, window: AddressWindow) -> Trace
    {
        let config = self.classifier().config();
        let width = dump.word_width().bytes() as u64;

        let mut events = Vec::new();
        let mut frames: Vec<StackFrame> = Vec::new();
        let mut blank_runs = Vec::new();
        let mut ignored = IgnoredSymbols::new();
        let mut blank: Option<BlankRun> = None;

        for (address, value) in Self::words_in(dump, window) {
            if config.is_sentinel(value) {
                match blank.as_mut() {
                    Some(run) => run.length += width,
                    None => {
                        events.push(TraceEvent::BlankStart(address));
                        blank = Some(BlankRun {
                            start: address,
                            length: width,
                        });
                    }
                }
                continue;
            }

            if let Some(run) = blank.take() {
                debug!("blank stack 0x{:x}..0x{:x}", run.start, run.end());
                blank_runs.push(run);
                events.push(TraceEvent::BlankEnd(run));
            }

            let event = self.event(address, value, &mut ignored);
            match &event.classification {
                Classification::SymbolRef { symbol, .. } => frames.push(StackFrame {
                    caller: Arc::clone(symbol),
                    address,
                    return_address: value,
                    words: Vec::new(),
                }),
                classification => {
                    if let Some(frame) = frames.last_mut() {
                        frame.words.push(FrameWord {
                            address,
                            value,
                            stack_relative: matches!(classification, Classification::StackLocal { .. }),
                        });
                    }
                }
            }
            events.push(TraceEvent::Word(event));
        }

        if let Some(run) = &blank {
            warn!("blank stack never ended, started at 0x{:x}", run.start);
        }
        debug!("traced {} frames, {} blank runs", frames.len(), blank_runs.len());

        Trace {
            events,
            frames,
            blank_runs,
            unterminated_blank: blank,
            ignored,
        }
    }
}
