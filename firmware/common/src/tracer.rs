//! One main-loop pass of the tracer.
//!
//! Every pass does a bounded amount of work and never waits:
//!
//! 1. dispatch at most one input sample (throttled) into the output queue
//! 2. if the line buffer is drained, format one output sample into it
//! 3. if the channel is ready, send one character
//! 4. service the channel
//!
//! The banner is loaded into the line buffer by [`Tracer::start`], so it is
//! fully sent before the formatter writes the first sample.

use crate::config::BANNER;
use crate::dispatch::{Dispatch, DispatchStats, Dispatcher};
use crate::format::{Formatter, LineBuffer};
use crate::input_queue::InputQueue;
use crate::output_queue::OutputQueue;
use crate::transmit::{DebugChannel, Transmitter};

/// Snapshot of tracer counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TracerStats {
    pub dispatch: DispatchStats,
    /// Samples rendered to text.
    pub formatted: u32,
    /// Characters accepted by the channel.
    pub chars_sent: u32,
    /// Characters the channel rejected (retried).
    pub channel_errors: u32,
    /// Output queue depth at snapshot time.
    pub output_depth: u32,
}

/// Main-loop side of the tracer.
///
/// Borrows both queues: the input queue is shared with interrupt context,
/// the output queue is usually a large static.
pub struct Tracer<'q, C: DebugChannel, const I: usize, const O: usize> {
    input: &'q InputQueue<I>,
    output: &'q mut OutputQueue<O>,
    channel: C,
    dispatcher: Dispatcher,
    formatter: Formatter,
    line: LineBuffer,
    transmitter: Transmitter,
    formatted: u32,
}

impl<'q, C: DebugChannel, const I: usize, const O: usize> Tracer<'q, C, I, O> {
    /// Assemble a tracer. Nothing is sent until [`start`](Self::start).
    pub fn new(
        input: &'q InputQueue<I>,
        output: &'q mut OutputQueue<O>,
        channel: C,
    ) -> Self {
        Self {
            input,
            output,
            channel,
            dispatcher: Dispatcher::new(),
            formatter: Formatter::new(),
            line: LineBuffer::new(),
            transmitter: Transmitter::new(),
            formatted: 0,
        }
    }

    /// Queue the startup banner ahead of any sample text.
    pub fn start(&mut self) { self.line.load(BANNER.as_bytes()); }

    /// Run one main-loop pass. Returns what the dispatch step did.
    pub fn poll(&mut self) -> Dispatch {
        let dispatched = self.dispatcher.step(self.input, self.output);

        if self.line.is_drained()
            && let Some(sample) = self.output.pop()
        {
            self.formatter.render(&sample, &mut self.line);
            self.formatted = self.formatted.wrapping_add(1);
        }

        self.transmitter.pump(&mut self.line, &mut self.channel);

        // Once per pass, whether or not a character went out
        self.channel.service();

        dispatched
    }

    /// Poll forever.
    pub fn run(&mut self) -> ! {
        loop {
            self.poll();
        }
    }

    /// True when nothing is left anywhere in the pipeline.
    pub fn is_idle(&self) -> bool { self.input.is_empty() && self.output.is_empty() && self.line.is_drained() }

    /// Current counters.
    pub fn stats(&self) -> TracerStats {
        TracerStats {
            dispatch: self.dispatcher.stats(),
            formatted: self.formatted,
            chars_sent: self.transmitter.sent(),
            channel_errors: self.transmitter.errors(),
            output_depth: self.output.len() as u32,
        }
    }

    /// The channel, e.g. to inspect a test double.
    pub fn channel(&self) -> &C { &self.channel }

    /// Mutable access to the channel.
    pub fn channel_mut(&mut self) -> &mut C { &mut self.channel }
}
