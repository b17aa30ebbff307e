// ********* Input data structures ***********

use std::fmt::Debug;
use std::hash::Hash;

use serde::{Deserialize, Serialize};
use snafu::Snafu;

/// Read access to the ranked preferences of an election.
///
/// Every voter ranks every candidate: for a given voter, the ranks over all
/// the candidates are a permutation of `0..candidates().len()`, and rank 0 is
/// the most preferred candidate.
///
/// The voting rules only read a profile. Any storage works, as long as it
/// answers these three questions. See [crate::RankedProfile] for the in-memory
/// implementation shipped with this crate.
pub trait PreferenceProfile {
    type Candidate: Clone + Eq + Hash + Debug;
    type Voter: Clone + Eq + Hash + Debug;

    /// The candidates, in declaration order. This order is the scan order of
    /// the rules.
    fn candidates(&self) -> &[Self::Candidate];

    fn voters(&self) -> &[Self::Voter];

    /// The rank given by `voter` to `candidate` (0 is the top choice).
    ///
    /// Fails with [VotingErrors::InvalidCandidateOrVoter] if either is unknown.
    fn get_preference(
        &self,
        candidate: &Self::Candidate,
        voter: &Self::Voter,
    ) -> VotingResult<usize>;
}

// ******** Output data structures *********

/// Statistics for one round of single transferable vote.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct StvRoundStats<C> {
    pub round: u32,
    /// First-place votes of the candidates still running, in candidate order.
    pub tally: Vec<(C, u64)>,
    /// The candidates removed at the end of this round. Empty for the final round.
    pub eliminated: Vec<C>,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct StvResult<C> {
    pub winner: C,
    pub round_stats: Vec<StvRoundStats<C>>,
}

/// Errors that prevent a rule from electing a candidate.
///
/// They all come from a misuse by the caller or from a profile that breaks
/// its contract. None of them is transient.
#[derive(Eq, PartialEq, Debug, Clone, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum VotingErrors {
    #[snafu(display("Invalid agent {agent}: not a voter of this election"))]
    InvalidAgent { agent: String },

    #[snafu(display("Not a valid voter or candidate: candidate {candidate}, voter {voter}"))]
    InvalidCandidateOrVoter { candidate: String, voter: String },

    #[snafu(display(
        "Score vector length must match number of candidates: expected {expected}, got {actual}"
    ))]
    InvalidScoreVector { expected: usize, actual: usize },

    #[snafu(display("Rank {rank} is out of range for {candidates} candidates"))]
    InvalidRank { rank: usize, candidates: usize },

    #[snafu(display("Total score of candidate {candidate} does not fit in an i64"))]
    ScoreOverflow { candidate: String },

    #[snafu(display("Voter {voter} has no top choice"))]
    IncompleteRanking { voter: String },

    #[snafu(display("No candidate to choose from"))]
    EmptyElection {},

    #[snafu(display("No winner found: every candidate was eliminated"))]
    NoConvergence {},

    #[snafu(display("Candidate {candidate} is declared more than once"))]
    DuplicateCandidate { candidate: String },

    #[snafu(display("Voter {voter} already cast a ballot"))]
    DuplicateVoter { voter: String },

    #[snafu(display("Invalid ballot for voter {voter}: {reason}"))]
    InvalidBallot { voter: String, reason: String },
}

pub type VotingResult<T> = Result<T, VotingErrors>;

// ********* Configuration **********

/// The voting rule to apply.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// The top choice of the agent wins.
    Dictatorship,
    /// One point for each first place.
    Plurality,
    /// One point lost for each last place.
    Veto,
    /// `n - 1 - rank` points for each rank.
    Borda,
    /// A generic scoring rule. The vector holds the points for each rank.
    Scoring(Vec<i64>),
    /// Single transferable vote, with all the lowest candidates eliminated at once.
    Stv,
}

impl RuleKind {
    pub const DEFAULT: RuleKind = RuleKind::Plurality;
}

/// A rule and its designated agent.
///
/// The agent is the dictator for [RuleKind::Dictatorship], and the tie-break
/// agent for all the other rules.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct VoteRules<V> {
    pub rule: RuleKind,
    pub agent: V,
}

impl<V> VoteRules<V> {
    pub fn new(rule: RuleKind, agent: V) -> VoteRules<V> {
        VoteRules { rule, agent }
    }
}
