//! Resumable frame receiver.
//!
//! The receiver pulls bytes from a [`PeerStream`] and produces at most one
//! message per [`Receiver::poll`]. It never waits: if the bytes needed for the
//! next step have not arrived, it records where it stopped and returns `None`.
//!
//! # Parse state
//!
//! ```text
//!            ≥12 bytes available
//!  ┌──────┐  ──────────────────>  ┌─────────┐  marker complete  ┌───────────────┐
//!  │ Idle │                       │ Syncing │ ────────────────> │ HeaderPending │
//!  └──────┘  <──────────────────  └─────────┘                   └───────────────┘
//!     ^      ran out, nothing            │                              │ 8 header bytes
//!     │      matched                     └──────────────┬───────────────┘
//!     │                                                 v
//!     │   payload read / discard                 ┌─────────────┐
//!     └───────────────────────────────────────── │ BodyPending │
//!                                                └─────────────┘
//! ```
//!
//! `Syncing` and `HeaderPending` are only ever observed between calls when
//! the stream stalled in the middle of a header. Bytes of a header consumed
//! before the stall are never re-read, so keeping the progress is what lets a
//! header split across polls parse at all.
//!
//! # Failure handling
//!
//! A bad header, an oversized length or a short read discards the in-flight
//! frame and resets to `Idle`. The caller only sees `None`; the reason is kept
//! in [`Receiver::last_error`] and logged.

use sockframe_proto::{Address, FrameHeader, address_matches};
use tracing::{debug, trace};

use crate::{
    error::{ConfigError, RecvError},
    transport::PeerStream,
};

const MAGIC_LEN: usize = FrameHeader::MAGIC_BYTES.len();

/// Header bytes that follow the start marker.
const HEADER_REST: usize = FrameHeader::SIZE - MAGIC_LEN;

/// Where the receiver stopped on its last call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    /// No partial frame.
    Idle,
    /// Scanning for the start marker; `matched` leading marker bytes seen.
    Syncing {
        /// Marker bytes matched so far
        matched: usize,
    },
    /// Start marker complete, remaining header bytes not yet available.
    HeaderPending,
    /// Header received and validated, payload not yet fully available.
    BodyPending(FrameHeader),
}

/// Receive counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecvStats {
    /// Messages handed to the caller.
    pub delivered: u64,
    /// Frames discarded as malformed, oversized or truncated.
    pub discarded: u64,
    /// Complete frames dropped because they were addressed elsewhere.
    pub dropped: u64,
    /// Bytes skipped while hunting for a start marker.
    pub skipped_bytes: u64,
}

/// Resumable frame parser with a fixed receive buffer.
#[derive(Debug)]
pub struct Receiver {
    /// Header followed by payload of the current or most recent frame.
    buf: Box<[u8]>,
    state: ParseState,
    last_len: usize,
    last_header: Option<FrameHeader>,
    last_error: Option<RecvError>,
    stats: RecvStats,
}

impl Receiver {
    /// Create a receiver whose buffer holds `capacity` bytes, header included.
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity < FrameHeader::SIZE {
            return Err(ConfigError::BufferTooSmall { capacity });
        }
        Ok(Self {
            buf: vec![0u8; capacity].into_boxed_slice(),
            state: ParseState::Idle,
            last_len: 0,
            last_header: None,
            last_error: None,
            stats: RecvStats::default(),
        })
    }

    /// Buffer capacity, header included.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Largest payload this receiver accepts.
    pub fn max_payload(&self) -> usize {
        (self.buf.len() - FrameHeader::SIZE).min(FrameHeader::MAX_PAYLOAD)
    }

    /// Current parse state.
    pub fn state(&self) -> ParseState {
        self.state
    }

    /// Length of the most recently delivered payload.
    pub fn last_len(&self) -> usize {
        self.last_len
    }

    /// Header of the most recently delivered message.
    pub fn last_header(&self) -> Option<&FrameHeader> {
        self.last_header.as_ref()
    }

    /// Why the most recent frame was thrown away, if it was.
    ///
    /// Cleared when a message is delivered.
    pub fn last_error(&self) -> Option<RecvError> {
        self.last_error
    }

    /// Receive counters.
    pub fn stats(&self) -> RecvStats {
        self.stats
    }

    /// Abandon any partial frame and forget the last delivered message.
    pub fn reset(&mut self) {
        self.state = ParseState::Idle;
        self.last_len = 0;
        self.last_header = None;
        self.last_error = None;
    }

    /// Whether [`Self::poll`] could make progress with `available` bytes
    /// buffered at the peer.
    pub fn can_advance(&self, available: usize) -> bool {
        match self.state {
            ParseState::Idle => available >= FrameHeader::SIZE,
            ParseState::Syncing { .. } => available > 0,
            ParseState::HeaderPending => available >= HEADER_REST,
            ParseState::BodyPending(header) => available >= header.payload_len(),
        }
    }

    /// Try to complete one message addressed to `filter`.
    ///
    /// Returns the payload of a complete, validated frame, or `None` if no
    /// such frame could be finished with the bytes available right now.
    /// Frames for other addresses are consumed and dropped.
    pub fn poll<P: PeerStream>(&mut self, peer: &mut P, filter: Address) -> Option<&[u8]> {
        match self.step(peer, filter) {
            Ok(Some(len)) => {
                self.stats.delivered += 1;
                self.last_len = len;
                self.last_error = None;
                Some(&self.buf[FrameHeader::SIZE..FrameHeader::SIZE + len])
            },
            Ok(None) => None,
            Err(err) => {
                self.discard(err);
                None
            },
        }
    }

    fn step<P: PeerStream>(
        &mut self,
        peer: &mut P,
        filter: Address,
    ) -> Result<Option<usize>, RecvError> {
        let header = match self.state {
            ParseState::BodyPending(header) => header,
            ParseState::Idle => {
                if peer.bytes_available() < FrameHeader::SIZE {
                    return Ok(None);
                }
                match self.read_header(peer, 0)? {
                    Some(header) => header,
                    None => return Ok(None),
                }
            },
            ParseState::Syncing { matched } => match self.read_header(peer, matched)? {
                Some(header) => header,
                None => return Ok(None),
            },
            ParseState::HeaderPending => match self.read_header(peer, MAGIC_LEN)? {
                Some(header) => header,
                None => return Ok(None),
            },
        };

        header.check()?;

        let length = header.payload_len();
        let max = self.max_payload();
        if length > max {
            return Err(RecvError::Oversized { length, max });
        }

        if peer.bytes_available() < length {
            trace!(have = peer.bytes_available(), need = length, "payload incomplete");
            self.state = ParseState::BodyPending(header);
            return Ok(None);
        }

        let body = &mut self.buf[FrameHeader::SIZE..FrameHeader::SIZE + length];
        let got = peer.read_exact(body);
        if got < length {
            return Err(RecvError::BodyTruncated { expected: length, got });
        }
        trace!(len = length, data = %hex::encode(&body[..]), "payload received");

        self.state = ParseState::Idle;
        if !address_matches(filter, &header) {
            return Err(RecvError::AddressMismatch { filter, destination: header.destination() });
        }

        self.last_header = Some(header);
        Ok(Some(length))
    }

    /// Scan for the start marker, then read the rest of the header.
    ///
    /// `matched` is the number of marker bytes already consumed. Returns
    /// `Ok(None)` after saving progress if the stream ran dry.
    fn read_header<P: PeerStream>(
        &mut self,
        peer: &mut P,
        mut matched: usize,
    ) -> Result<Option<FrameHeader>, RecvError> {
        while matched < MAGIC_LEN {
            let Some(byte) = peer.read_byte() else {
                self.state = if matched == 0 {
                    ParseState::Idle
                } else {
                    ParseState::Syncing { matched }
                };
                return Ok(None);
            };

            if byte == FrameHeader::MAGIC_BYTES[matched] {
                matched += 1;
                continue;
            }

            // Restart; the offending byte may itself begin a marker.
            let restart = usize::from(byte == FrameHeader::MAGIC_BYTES[0]);
            trace!(byte, offset = matched, "not a start byte");
            self.stats.skipped_bytes += (matched + 1 - restart) as u64;
            matched = restart;
        }

        self.buf[..MAGIC_LEN].copy_from_slice(&FrameHeader::MAGIC_BYTES);

        if peer.bytes_available() < HEADER_REST {
            self.state = ParseState::HeaderPending;
            return Ok(None);
        }

        let got = peer.read_exact(&mut self.buf[MAGIC_LEN..FrameHeader::SIZE]);
        if got < HEADER_REST {
            return Err(RecvError::HeaderTruncated { expected: HEADER_REST, got });
        }

        let header = *FrameHeader::from_bytes(&self.buf[..FrameHeader::SIZE])?;
        trace!(header = %hex::encode(header.to_bytes()), "header received");
        Ok(Some(header))
    }

    fn discard(&mut self, err: RecvError) {
        self.state = ParseState::Idle;
        if matches!(err, RecvError::AddressMismatch { .. }) {
            self.stats.dropped += 1;
        } else {
            self.stats.discarded += 1;
        }
        debug!(error = %err, "discarding frame");
        self.last_error = Some(err);
    }
}
