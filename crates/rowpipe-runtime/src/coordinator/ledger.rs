/// Independent request streams. A newer request only supersedes older
/// requests of its own lane.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Lane {
    Sort,
    Filter,
    FacetValues,
}

impl Lane {
    const COUNT: usize = 3;

    const fn index(self) -> usize {
        match self {
            Self::Sort => 0,
            Self::Filter => 1,
            Self::FacetValues => 2,
        }
    }
}

/// Outcome of matching a response against the ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// The response answers the latest request of its lane; apply it.
    Fresh,
    /// A newer request was issued (or the lane was reset); drop it.
    Stale,
}

/// Sequence numbers of the latest outstanding request per lane.
///
/// Sequence numbers are global and strictly increasing, so a number is never
/// reused across lanes or after a reset.
#[derive(Debug, Default)]
pub struct RequestLedger {
    last_seq: u64,
    outstanding: [Option<u64>; Lane::COUNT],
}

impl RequestLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamps a new request on `lane`, superseding any older one.
    pub fn issue(&mut self, lane: Lane) -> u64 {
        self.last_seq += 1;
        self.outstanding[lane.index()] = Some(self.last_seq);
        self.last_seq
    }

    /// Matches a response. A fresh response clears the lane.
    pub fn resolve(&mut self, lane: Lane, seq: u64) -> Resolution {
        let slot = &mut self.outstanding[lane.index()];
        if *slot == Some(seq) {
            *slot = None;
            Resolution::Fresh
        } else {
            Resolution::Stale
        }
    }

    /// Makes every in-flight response of `lane` stale.
    pub fn supersede(&mut self, lane: Lane) {
        self.outstanding[lane.index()] = None;
    }

    pub fn supersede_all(&mut self) {
        self.outstanding = [None; Lane::COUNT];
    }

    pub fn is_outstanding(&self, lane: Lane) -> bool {
        self.outstanding[lane.index()].is_some()
    }

    pub fn any_outstanding(&self) -> bool {
        self.outstanding.iter().any(Option::is_some)
    }

    pub const fn last_seq(&self) -> u64 {
        self.last_seq
    }
}
