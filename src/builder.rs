use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use log::debug;
use snafu::ensure;

use crate::config::*;

/// A builder for an in-memory preference profile.
///
/// Candidates are declared first. Each ballot must then rank all of them.
///
/// ```
/// use voting_rules::{plurality, Builder};
/// # use voting_rules::VotingErrors;
///
/// let mut builder = Builder::new(&["Anna", "Bob", "Clara"])?;
/// builder.add_ballot("v1", &["Bob", "Clara", "Anna"])?;
/// builder.add_ballot("v2", &["Anna", "Bob", "Clara"])?;
/// let profile = builder.build();
///
/// assert_eq!(plurality(&profile, &"v1")?, "Bob");
///
/// # Ok::<(), VotingErrors>(())
/// ```
pub struct Builder<C, V> {
    pub(crate) _candidates: Vec<C>,
    pub(crate) _candidate_index: HashMap<C, usize>,
    pub(crate) _voters: Vec<V>,
    pub(crate) _voter_index: HashMap<V, usize>,
    pub(crate) _ranks: Vec<Vec<usize>>,
}

impl<C, V> Builder<C, V>
where
    C: Clone + Eq + Hash + Debug,
    V: Clone + Eq + Hash + Debug,
{
    pub fn new(candidates: &[C]) -> VotingResult<Builder<C, V>> {
        let mut candidate_index: HashMap<C, usize> = HashMap::new();
        for (idx, c) in candidates.iter().enumerate() {
            ensure!(
                candidate_index.insert(c.clone(), idx).is_none(),
                DuplicateCandidateSnafu {
                    candidate: format!("{:?}", c)
                }
            );
        }
        Ok(Builder {
            _candidates: candidates.to_vec(),
            _candidate_index: candidate_index,
            _voters: Vec::new(),
            _voter_index: HashMap::new(),
            _ranks: Vec::new(),
        })
    }

    /// Adds the ballot of a voter.
    ///
    /// ordering: all the declared candidates, from the most preferred to the least preferred.
    pub fn add_ballot(&mut self, voter: V, ordering: &[C]) -> VotingResult<()> {
        let n = self._candidates.len();
        ensure!(
            ordering.len() == n,
            InvalidBallotSnafu {
                voter: format!("{:?}", voter),
                reason: format!("expected {} choices, got {}", n, ordering.len()),
            }
        );
        let mut ranks: Vec<Option<usize>> = vec![None; n];
        for (rank, c) in ordering.iter().enumerate() {
            match self._candidate_index.get(c) {
                None => {
                    return InvalidBallotSnafu {
                        voter: format!("{:?}", voter),
                        reason: format!("unknown candidate {:?}", c),
                    }
                    .fail();
                }
                Some(&cidx) if ranks[cidx].is_some() => {
                    return InvalidBallotSnafu {
                        voter: format!("{:?}", voter),
                        reason: format!("candidate {:?} is ranked more than once", c),
                    }
                    .fail();
                }
                Some(&cidx) => {
                    ranks[cidx] = Some(rank);
                }
            }
        }
        // Right length and no repeat: every slot is filled.
        let ranks: Vec<usize> = ranks.into_iter().flatten().collect();
        self.push_ranks(voter, ranks)
    }

    /// Adds the ballot of a voter, given as the rank of each declared candidate
    /// (in declaration order).
    pub fn add_ranks(&mut self, voter: V, ranks: &[usize]) -> VotingResult<()> {
        let n = self._candidates.len();
        ensure!(
            ranks.len() == n,
            InvalidBallotSnafu {
                voter: format!("{:?}", voter),
                reason: format!("expected {} ranks, got {}", n, ranks.len()),
            }
        );
        let mut seen = vec![false; n];
        for &rank in ranks.iter() {
            ensure!(
                rank < n && !seen[rank],
                InvalidBallotSnafu {
                    voter: format!("{:?}", voter),
                    reason: format!("ranks {:?} are not a permutation of 0..{}", ranks, n),
                }
            );
            seen[rank] = true;
        }
        self.push_ranks(voter, ranks.to_vec())
    }

    fn push_ranks(&mut self, voter: V, ranks: Vec<usize>) -> VotingResult<()> {
        ensure!(
            !self._voter_index.contains_key(&voter),
            DuplicateVoterSnafu {
                voter: format!("{:?}", voter)
            }
        );
        debug!("push_ranks: voter {:?}: ranks {:?}", voter, ranks);
        self._voter_index.insert(voter.clone(), self._voters.len());
        self._voters.push(voter);
        self._ranks.push(ranks);
        Ok(())
    }

    pub fn build(self) -> RankedProfile<C, V> {
        RankedProfile {
            candidates: self._candidates,
            candidate_index: self._candidate_index,
            voters: self._voters,
            voter_index: self._voter_index,
            ranks: self._ranks,
        }
    }
}

/// A preference profile held in memory.
///
/// Only [Builder] creates it, so every ballot is a strict ranking of all the candidates.
#[derive(Debug, Clone)]
pub struct RankedProfile<C, V> {
    candidates: Vec<C>,
    candidate_index: HashMap<C, usize>,
    voters: Vec<V>,
    voter_index: HashMap<V, usize>,
    // Indexed by voter, then by candidate.
    ranks: Vec<Vec<usize>>,
}

impl<C, V> PreferenceProfile for RankedProfile<C, V>
where
    C: Clone + Eq + Hash + Debug,
    V: Clone + Eq + Hash + Debug,
{
    type Candidate = C;
    type Voter = V;

    fn candidates(&self) -> &[C] {
        &self.candidates
    }

    fn voters(&self) -> &[V] {
        &self.voters
    }

    fn get_preference(&self, candidate: &C, voter: &V) -> VotingResult<usize> {
        match (
            self.candidate_index.get(candidate),
            self.voter_index.get(voter),
        ) {
            (Some(&cidx), Some(&vidx)) => Ok(self.ranks[vidx][cidx]),
            _ => InvalidCandidateOrVoterSnafu {
                candidate: format!("{:?}", candidate),
                voter: format!("{:?}", voter),
            }
            .fail(),
        }
    }
}
