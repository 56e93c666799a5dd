//! Reassembly of *Program Specific Information* and *DVB Service Information* sections
//! from transport stream packets, and a shared store holding the latest version of each
//! section seen.
//!
//! # Concepts
//!
//! * There are multiple standard types of PSI/SI table, like the *Program Association
//!   Table* and the *Service Description Table*.  Standards derived from mpegts may define
//!   their own table types.
//! * A table splits into *sections*, identified by `(table_id, table_id_extension,
//!   section_number)` — represented here by [`SectionKey`].
//! * A section can be split across a small number of individual transport stream packets,
//!   so has to be reassembled before it can be read.
//! * Sections carry a `version_number`; broadcasters repeat sections periodically, and only
//!   a version change makes a repeated section interesting.
//!
//! # Core types
//!
//! * [`SectionAssembler`] consumes packets, reassembles sections, and installs each newly
//!   seen (or newly versioned) section into the store
//! * [`SectionStore`] is a cloneable handle to the keyed store; any thread may hold one and
//!   take read guards while packet ingestion continues elsewhere
//! * [`StoredSection`] is one fully reassembled section, supporting advisory CRC checking
//!
//! The per-table syntax readers ([`pat::PatSection`], [`pmt::PmtSection`], and friends in
//! the sibling modules) all borrow the stored bytes; nothing is copied out of the store to
//! read a table.

pub mod eit;
pub mod nit;
pub mod pat;
pub mod pmt;
pub mod rst;
pub mod sdt;
pub mod time;

use crate::fields;
use crate::mpegts_crc;
use crate::packet::{Packet, Pid};
use crate::parser::PacketSink;
use log::warn;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

/// Identity of a section within the store.
///
/// For sections whose `section_syntax_indicator` is 0, both `table_id_extension` and
/// `section_number` are 0.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub struct SectionKey {
    pub table_id: u8,
    pub table_id_extension: u16,
    pub section_number: u8,
}

/// The running status of a service or event, as signalled in SDT, EIT and RST sections.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum RunningStatus {
    Undefined,
    NotRunning,
    StartsInAFewSeconds,
    Pausing,
    Running,
    OffAir,
    Reserved(u8),
}

impl From<u8> for RunningStatus {
    fn from(v: u8) -> RunningStatus {
        match v {
            0 => RunningStatus::Undefined,
            1 => RunningStatus::NotRunning,
            2 => RunningStatus::StartsInAFewSeconds,
            3 => RunningStatus::Pausing,
            4 => RunningStatus::Running,
            5 => RunningStatus::OffAir,
            _ => RunningStatus::Reserved(v),
        }
    }
}

/// Zero-copy view of the header fields at the front of every PSI section.
///
/// The first three bytes (`table_id`, `section_syntax_indicator` and `section_length`) are
/// present in every section; the five bytes after that, exposed by `table_id_extension()`
/// through `last_section_number()`, are only meaningful when `section_syntax_indicator()`
/// returns `true`.
#[derive(Clone, Copy)]
pub struct SectionHeader<'buf> {
    buf: &'buf [u8],
}

impl<'buf> SectionHeader<'buf> {
    /// Size of the fields present in every section; 3 bytes.
    pub const COMMON_SIZE: usize = 3;
    /// Size of the additional fields present when `section_syntax_indicator` is set; 5 bytes.
    pub const SYNTAX_SIZE: usize = 5;

    pub fn new(buf: &'buf [u8]) -> SectionHeader<'buf> {
        SectionHeader { buf }
    }

    /// The type of table of which this is a section.
    pub fn table_id(&self) -> u8 {
        fields::u8_at(self.buf, 0)
    }

    /// `true` when the section uses 'section syntax' (versioning, multi-section tables and
    /// a trailing CRC); `false` for 'compact' sections such as the TDT.
    pub fn section_syntax_indicator(&self) -> bool {
        fields::bit_at(self.buf, 1, 7)
    }

    pub fn private_indicator(&self) -> bool {
        fields::bit_at(self.buf, 1, 6)
    }

    /// The number of bytes of section data following the `section_length` field itself.
    pub fn section_length(&self) -> usize {
        usize::from(fields::u16_at(self.buf, 1) & 0xfff)
    }

    /// The total size of the section in bytes: `section_length()` plus the three leading
    /// header bytes.
    pub fn section_size(&self) -> usize {
        self.section_length() + Self::COMMON_SIZE
    }

    /// The initial 16-bit field of the section-syntax header.  _13818-1_ refers to this
    /// field as `transport_stream_id` in a PAT, `program_number` in a PMT, and
    /// `table_id_extension` in a private section; DVB tables give it further names.
    pub fn table_id_extension(&self) -> u16 {
        fields::u16_at(self.buf, 3)
    }

    /// A 5-bit value incremented (modulo 32) whenever the content of the table changes.
    pub fn version_number(&self) -> u8 {
        (fields::u8_at(self.buf, 5) >> 1) & 0b1_1111
    }

    /// `true` when the section is currently applicable; `false` when it describes a future
    /// state of the table that is not yet in force.
    pub fn current_next_indicator(&self) -> bool {
        fields::bit_at(self.buf, 5, 0)
    }

    /// The number of this section, within a potentially multi-section table.
    pub fn section_number(&self) -> u8 {
        fields::u8_at(self.buf, 6)
    }

    /// Indicates the greatest `section_number()` within the current table.
    pub fn last_section_number(&self) -> u8 {
        fields::u8_at(self.buf, 7)
    }

    /// The key under which this section is stored.
    pub fn key(&self) -> SectionKey {
        if self.section_syntax_indicator() {
            SectionKey {
                table_id: self.table_id(),
                table_id_extension: self.table_id_extension(),
                section_number: self.section_number(),
            }
        } else {
            SectionKey {
                table_id: self.table_id(),
                table_id_extension: 0,
                section_number: 0,
            }
        }
    }

    // the version against which another copy of this section is judged a duplicate
    fn dedup_version(&self) -> u8 {
        if self.section_syntax_indicator() {
            self.version_number()
        } else {
            0
        }
    }
}

/// A fully reassembled PSI section.  Immutable once installed in the store.
pub struct StoredSection {
    key: SectionKey,
    data: Vec<u8>,
}

impl StoredSection {
    /// The complete section bytes, headers and (where present) trailing CRC included.
    /// The slice length always equals the section's `section_length` field plus 3.
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn key(&self) -> SectionKey {
        self.key
    }

    pub fn header(&self) -> SectionHeader<'_> {
        SectionHeader::new(&self.data)
    }

    /// Checks the section against its trailing `CRC_32` bytes.
    ///
    /// The result is advisory: sections are stored whether or not their CRC is intact, and
    /// not every table type carries a CRC at all (the TDT, for one, does not).
    pub fn crc32(&self) -> bool {
        self.data.len() >= SectionHeader::COMMON_SIZE + 4 && mpegts_crc::sum32(&self.data) == 0
    }
}

/// The map type held within a [`SectionStore`].
pub type SectionMap = BTreeMap<SectionKey, StoredSection>;

/// Cloneable, thread-safe handle to the store of reassembled sections.
///
/// The store is the one piece of pipeline state that may be shared across threads: packet
/// ingestion inserts completed sections under a brief write lock, while any number of
/// other threads inspect the current contents through read guards.  A reader holding a
/// guard observes a consistent snapshot; a key seen at some version never moves backwards
/// to an earlier version.
#[derive(Clone, Default)]
pub struct SectionStore {
    inner: Arc<RwLock<SectionMap>>,
}

impl SectionStore {
    pub fn new() -> SectionStore {
        Self::default()
    }

    /// Acquires shared read access to the stored sections.  The returned guard borrows the
    /// map for its lifetime; section installation blocks until all guards are released.
    pub fn read(&self) -> RwLockReadGuard<'_, SectionMap> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    /// Deletes all stored sections.
    pub fn clear(&self) {
        self.write().clear();
    }

    fn write(&self) -> RwLockWriteGuard<'_, SectionMap> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

/// Receives the bytes of each newly installed section.
///
/// See [`SectionAssembler::set_install_callback`].
pub trait SectionSink {
    /// Called with the complete bytes of a section that has just been installed in the
    /// store.  The slice is borrowed; copy it to retain it.
    fn section(&mut self, data: &[u8]);
}

// per-PID reassembly of one in-flight section
struct SectionBuffer {
    key: SectionKey,
    target: usize,
    data: Vec<u8>,
}

impl SectionBuffer {
    fn new(key: SectionKey, target: usize) -> SectionBuffer {
        SectionBuffer {
            key,
            target,
            data: Vec::with_capacity(target),
        }
    }

    fn remaining(&self) -> usize {
        self.target - self.data.len()
    }

    fn is_complete(&self) -> bool {
        self.data.len() == self.target
    }
}

/// Reassembles PSI sections from transport stream packets and maintains the latest version
/// of every section in a [`SectionStore`].
///
/// Feed packets either by registering the assembler with a
/// [`TsParser`](crate::parser::TsParser) binding, or by calling
/// [`consume_packet()`](SectionAssembler::consume_packet) directly.
///
/// A section already present in the store with an unchanged `version_number` is skipped
/// without reassembly; a changed version replaces the stored section.  Sections flagged as
/// not-yet-applicable (`current_next_indicator == 0`) are never cached.
pub struct SectionAssembler {
    store: SectionStore,
    open_sections: HashMap<Pid, SectionBuffer>,
    install_callback: Option<Weak<Mutex<dyn SectionSink + Send>>>,
}

impl Default for SectionAssembler {
    fn default() -> SectionAssembler {
        SectionAssembler::with_store(SectionStore::new())
    }
}

impl SectionAssembler {
    pub fn new() -> SectionAssembler {
        Self::default()
    }

    /// Creates an assembler installing sections into the given store, which the caller may
    /// have cloned handles to elsewhere.
    pub fn with_store(store: SectionStore) -> SectionAssembler {
        SectionAssembler {
            store,
            open_sections: HashMap::new(),
            install_callback: None,
        }
    }

    /// A handle to the store this assembler installs sections into.
    pub fn store(&self) -> SectionStore {
        self.store.clone()
    }

    /// Registers a sink to be notified of each newly installed section.
    ///
    /// The sink is held weakly: if the owning `Arc` has been dropped, notifications are
    /// silently discarded.  At most one sink is registered at a time; a second call
    /// replaces the first.
    ///
    /// The callback runs synchronously *while the store write lock is held*, so the
    /// delivered bytes can be borrowed straight out of the store.  The sink must not
    /// re-enter the store (via [`SectionStore::read`] or otherwise) or it will deadlock.
    pub fn set_install_callback(&mut self, sink: Weak<Mutex<dyn SectionSink + Send>>) {
        self.install_callback = Some(sink);
    }

    /// Processes the payload of one transport stream packet.
    pub fn consume_packet(&mut self, pk: &Packet<'_>) {
        if pk.transport_error_indicator() {
            return;
        }
        let pid = pk.pid();
        let payload = match pk.payload() {
            Some(p) => p,
            None => return,
        };
        let pusi = pk.payload_unit_start_indicator();
        let mut pos = 0;
        let pointer = if pusi {
            pos = 1;
            usize::from(payload[0])
        } else {
            0
        };

        // continuation bytes for a section already in flight on this PID
        if let Some(mut buf) = self.open_sections.remove(&pid) {
            if !pusi {
                let take = buf.remaining().min(payload.len() - pos);
                buf.data.extend_from_slice(&payload[pos..pos + take]);
                if buf.is_complete() {
                    self.install(buf);
                } else {
                    self.open_sections.insert(pid, buf);
                }
                return;
            } else if pointer > 0 {
                if pointer > buf.remaining() || pos + pointer > payload.len() {
                    warn!(
                        "[{:?}] pointer_field {} inconsistent with in-flight section \
                         ({} bytes outstanding); discarding",
                        pid,
                        pointer,
                        buf.remaining()
                    );
                } else {
                    buf.data.extend_from_slice(&payload[pos..pos + pointer]);
                    if buf.is_complete() {
                        self.install(buf);
                    } else {
                        warn!(
                            "[{:?}] section still incomplete after pointer_field bytes; \
                             discarding",
                            pid
                        );
                    }
                }
            } else {
                warn!(
                    "[{:?}] new section begins while {} bytes of the previous one were \
                     outstanding; discarding",
                    pid,
                    buf.remaining()
                );
            }
        }

        if !pusi {
            return;
        }

        // one or more new sections begin after the pointer_field region
        pos += pointer;
        while payload.len().saturating_sub(pos) > SectionHeader::COMMON_SIZE {
            let header = SectionHeader::new(&payload[pos..]);
            if header.table_id() == 0xff {
                break; // stuffing fills the remainder of the payload
            }
            let size = header.section_size();
            let key = header.key();

            let skip = (header.section_syntax_indicator() && !header.current_next_indicator())
                || self.stored_version_matches(key, header.dedup_version());
            if skip {
                if payload.len() - pos > size {
                    pos += size;
                    continue;
                } else {
                    break;
                }
            }

            let mut buf = SectionBuffer::new(key, size);
            let available = payload.len() - pos;
            if available < size {
                buf.data.extend_from_slice(&payload[pos..]);
                self.open_sections.insert(pid, buf);
                break;
            }
            buf.data.extend_from_slice(&payload[pos..pos + size]);
            self.install(buf);
            pos += size;
        }
    }

    fn stored_version_matches(&self, key: SectionKey, version: u8) -> bool {
        let guard = self.store.read();
        match guard.get(&key) {
            Some(stored) => stored.header().dedup_version() == version,
            None => false,
        }
    }

    fn install(&mut self, buf: SectionBuffer) {
        let key = buf.key;
        let mut guard = self.store.write();
        guard.insert(key, StoredSection { key, data: buf.data });
        if let Some(cb) = self.install_callback.as_ref().and_then(Weak::upgrade) {
            if let Some(stored) = guard.get(&key) {
                cb.lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .section(stored.bytes());
            }
        }
    }
}

impl PacketSink for SectionAssembler {
    fn consume(&mut self, data: &[u8]) {
        self.consume_packet(&Packet::new(data));
    }
}
