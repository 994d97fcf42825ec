//! Outbound command scheduler
//!
//! Producers build one command at a time in a staging buffer and submit
//! it to a FIFO queue. The drive tick takes at most one command off the
//! queue per call, and only once the cooldown since the previous
//! transmission has passed.

use alloc::collections::VecDeque;
use alloc::string::String;
use alloc::vec::Vec;
use core::mem;

use panelink_protocol::frame::{self, PAYLOAD_RESERVE};

/// Queue length that triggers a backlog warning
pub const QUEUE_HIGH_WATER: usize = 32;

/// Staging buffer plus rate limited FIFO of finished commands
#[derive(Debug)]
pub struct CommandScheduler {
    /// Command under construction
    buffer: String,
    /// Finished commands, oldest first
    queue: VecDeque<String>,
    /// Time of the last transmission
    last_sent_ms: Option<u32>,
    /// Minimum gap between transmissions
    cooldown_ms: u32,
    /// Total frames handed to the transport
    sent: u32,
}

impl CommandScheduler {
    pub fn new(cooldown_ms: u32) -> Self {
        Self {
            buffer: String::with_capacity(PAYLOAD_RESERVE),
            queue: VecDeque::new(),
            last_sent_ms: None,
            cooldown_ms,
            sent: 0,
        }
    }

    /// Empty staging buffer for the next command
    ///
    /// A finished command still sitting in the buffer is queued first.
    pub fn stage(&mut self) -> &mut String {
        self.submit();
        &mut self.buffer
    }

    /// Move the staged command into the queue
    ///
    /// Nothing is sent here; an empty buffer is a no-op.
    pub fn submit(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let command = mem::replace(&mut self.buffer, String::with_capacity(PAYLOAD_RESERVE));
        trace!("Command queued: {=str}", command.as_str());
        self.queue.push_back(command);
        if self.queue.len() == QUEUE_HIGH_WATER {
            warn!("Command queue backlog: {} commands", self.queue.len());
        }
    }

    /// Drive the scheduler from the tick
    ///
    /// Within the cooldown nothing happens. Otherwise a staged command is
    /// queued, or, if nothing is staged, the oldest queued command is framed
    /// and returned for transmission. Never both in one call.
    pub fn poll(&mut self, now_ms: u32) -> Option<Vec<u8>> {
        if let Some(last) = self.last_sent_ms {
            if now_ms.wrapping_sub(last) <= self.cooldown_ms {
                return None;
            }
        }

        if !self.buffer.is_empty() {
            self.submit();
            return None;
        }

        let command = self.queue.pop_front()?;
        match frame::encode(command.as_bytes()) {
            Ok(bytes) => {
                debug!("Sending: {=str}", command.as_str());
                self.last_sent_ms = Some(now_ms);
                self.sent = self.sent.wrapping_add(1);
                Some(bytes)
            }
            Err(e) => {
                warn!("Dropping command: {:?}", e);
                None
            }
        }
    }

    /// Commands waiting, including a staged one
    pub fn pending(&self) -> usize {
        self.queue.len() + usize::from(!self.buffer.is_empty())
    }

    /// Queued commands, oldest first
    pub fn queued(&self) -> impl Iterator<Item = &str> {
        self.queue.iter().map(String::as_str)
    }

    pub fn sent(&self) -> u32 {
        self.sent
    }

    pub fn cooldown_ms(&self) -> u32 {
        self.cooldown_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use panelink_protocol::{CommandWriter, FrameDecoder};

    fn payload(bytes: &[u8]) -> String {
        let mut decoder = FrameDecoder::new();
        decoder.extend(bytes);
        let payload = decoder.poll().unwrap().unwrap();
        String::from_utf8(payload).unwrap()
    }

    #[test]
    fn test_submit_only_queues() {
        let mut scheduler = CommandScheduler::new(75);
        CommandWriter::new(scheduler.stage(), "timeout").field(10);
        scheduler.submit();

        assert_eq!(scheduler.pending(), 1);
        assert_eq!(scheduler.queued().collect::<Vec<_>>(), ["timeout~10"]);
    }

    #[test]
    fn test_stage_queues_previous_command() {
        let mut scheduler = CommandScheduler::new(75);
        CommandWriter::new(scheduler.stage(), "pageType").field("cardGrid");
        CommandWriter::new(scheduler.stage(), "timeout").field(20);
        scheduler.submit();

        assert_eq!(
            scheduler.queued().collect::<Vec<_>>(),
            ["pageType~cardGrid", "timeout~20"]
        );
    }

    #[test]
    fn test_fifo_with_cooldown() {
        let mut scheduler = CommandScheduler::new(75);
        CommandWriter::new(scheduler.stage(), "a");
        CommandWriter::new(scheduler.stage(), "b");
        scheduler.submit();

        let first = scheduler.poll(1000).unwrap();
        assert_eq!(payload(&first), "a");

        assert!(scheduler.poll(1050).is_none());
        assert!(scheduler.poll(1075).is_none());

        let second = scheduler.poll(1076).unwrap();
        assert_eq!(payload(&second), "b");
        assert!(scheduler.poll(2000).is_none());
        assert_eq!(scheduler.sent(), 2);
    }

    #[test]
    fn test_staged_command_is_queued_not_sent() {
        let mut scheduler = CommandScheduler::new(75);
        CommandWriter::new(scheduler.stage(), "a");
        scheduler.submit();
        CommandWriter::new(scheduler.stage(), "b");

        // Staged "b" moves to the queue; nothing goes out this turn
        assert!(scheduler.poll(0).is_none());
        assert_eq!(scheduler.pending(), 2);
        assert_eq!(payload(&scheduler.poll(1).unwrap()), "a");
    }

    #[test]
    fn test_empty_stage_is_noop() {
        let mut scheduler = CommandScheduler::new(75);
        scheduler.stage();
        scheduler.submit();
        assert_eq!(scheduler.pending(), 0);
        assert!(scheduler.poll(0).is_none());
    }
}
