//! Classical social-choice rules to elect one candidate from ranked preferences.
//!
//! The rules read the ballots through the [PreferenceProfile] trait. Every voter
//! ranks every candidate, 0 being the favourite. When several candidates end up
//! tied, a designated voter (the tie-break agent) settles it: the tied candidate
//! this voter ranks best wins.
//!
//! ```
//! use voting_rules::{borda, dictatorship, stv, Builder};
//! # use voting_rules::VotingErrors;
//!
//! let mut builder = Builder::new(&[1, 2, 3])?;
//! builder.add_ballot(1, &[2, 3, 1])?;
//! builder.add_ballot(2, &[1, 2, 3])?;
//! let profile = builder.build();
//!
//! assert_eq!(dictatorship(&profile, &2)?, 1);
//! assert_eq!(borda(&profile, &1)?, 2);
//! assert_eq!(stv(&profile, &1)?, 2);
//! # Ok::<(), VotingErrors>(())
//! ```
mod builder;
mod config;
pub mod manual;

use log::{debug, info};
use snafu::{ensure, OptionExt};

pub use crate::builder::*;
pub use crate::config::*;

/// Runs the rule selected in the configuration.
pub fn run_election<P: PreferenceProfile>(
    profile: &P,
    rules: &VoteRules<P::Voter>,
) -> VotingResult<P::Candidate> {
    info!(
        "Processing {:?} voters, candidates: {:?}, rules: {:?}",
        profile.voters().len(),
        profile.candidates(),
        rules
    );
    let agent = &rules.agent;
    let winner = match &rules.rule {
        RuleKind::Dictatorship => dictatorship(profile, agent)?,
        RuleKind::Plurality => plurality(profile, agent)?,
        RuleKind::Veto => veto(profile, agent)?,
        RuleKind::Borda => borda(profile, agent)?,
        RuleKind::Scoring(score_vector) => scoring_rule(profile, score_vector, agent)?,
        RuleKind::Stv => stv(profile, agent)?,
    };
    info!("run_election: winner: {:?}", winner);
    Ok(winner)
}

/// The top choice of `agent` wins.
pub fn dictatorship<P: PreferenceProfile>(
    profile: &P,
    agent: &P::Voter,
) -> VotingResult<P::Candidate> {
    ensure!(
        profile.voters().contains(agent),
        InvalidAgentSnafu {
            agent: format!("{:?}", agent)
        }
    );
    for candidate in profile.candidates() {
        if profile.get_preference(candidate, agent)? == 0 {
            debug!("dictatorship: {:?} is the top choice of {:?}", candidate, agent);
            return Ok(candidate.clone());
        }
    }
    IncompleteRankingSnafu {
        voter: format!("{:?}", agent),
    }
    .fail()
}

/// The total score of each candidate, in candidate order.
///
/// A candidate receives `score_vector[rank]` from each voter.
pub fn scoring_totals<P: PreferenceProfile>(
    profile: &P,
    score_vector: &[i64],
) -> VotingResult<Vec<(P::Candidate, i64)>> {
    let candidates = profile.candidates();
    ensure!(
        score_vector.len() == candidates.len(),
        InvalidScoreVectorSnafu {
            expected: candidates.len(),
            actual: score_vector.len(),
        }
    );
    let mut totals: Vec<(P::Candidate, i64)> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let mut total: i64 = 0;
        for voter in profile.voters() {
            let rank = profile.get_preference(candidate, voter)?;
            let score = *score_vector.get(rank).context(InvalidRankSnafu {
                rank,
                candidates: candidates.len(),
            })?;
            total = total.checked_add(score).context(ScoreOverflowSnafu {
                candidate: format!("{:?}", candidate),
            })?;
        }
        totals.push((candidate.clone(), total));
    }
    debug!("scoring_totals: {:?} -> {:?}", score_vector, totals);
    Ok(totals)
}

/// Generic scoring rule: the highest total score wins.
pub fn scoring_rule<P: PreferenceProfile>(
    profile: &P,
    score_vector: &[i64],
    tie_break_agent: &P::Voter,
) -> VotingResult<P::Candidate> {
    let totals = scoring_totals(profile, score_vector)?;
    pick_winner(profile, &totals, tie_break_agent)
}

/// The candidate with the most first places wins.
pub fn plurality<P: PreferenceProfile>(
    profile: &P,
    tie_break: &P::Voter,
) -> VotingResult<P::Candidate> {
    let candidates = profile.candidates();
    let mut first_places: Vec<u64> = vec![0; candidates.len()];
    for voter in profile.voters() {
        if let Some(idx) = find_with_rank(profile, voter, 0)? {
            first_places[idx] += 1;
        }
    }
    let tally: Vec<(P::Candidate, u64)> = candidates.iter().cloned().zip(first_places).collect();
    pick_winner(profile, &tally, tie_break)
}

/// Each voter vetoes their last choice. The candidate with the fewest vetoes wins.
pub fn veto<P: PreferenceProfile>(profile: &P, tie_break: &P::Voter) -> VotingResult<P::Candidate> {
    let candidates = profile.candidates();
    let num_voters = profile.voters().len() as u64;
    let mut points: Vec<u64> = vec![num_voters; candidates.len()];
    if let Some(last_rank) = candidates.len().checked_sub(1) {
        for voter in profile.voters() {
            if let Some(idx) = find_with_rank(profile, voter, last_rank)? {
                points[idx] -= 1;
            }
        }
    }
    let tally: Vec<(P::Candidate, u64)> = candidates.iter().cloned().zip(points).collect();
    pick_winner(profile, &tally, tie_break)
}

/// Scoring rule with the vector `[n-1, n-2, ..., 1, 0]`.
pub fn borda<P: PreferenceProfile>(
    profile: &P,
    tie_break: &P::Voter,
) -> VotingResult<P::Candidate> {
    let score_vector = borda_vector(profile.candidates().len());
    scoring_rule(profile, &score_vector, tie_break)
}

fn borda_vector(num_candidates: usize) -> Vec<i64> {
    (0..num_candidates).rev().map(|score| score as i64).collect()
}

/// Single transferable vote.
///
/// See [stv_stats] for the details of the rounds.
pub fn stv<P: PreferenceProfile>(profile: &P, tie_break: &P::Voter) -> VotingResult<P::Candidate> {
    Ok(stv_stats(profile, tie_break)?.winner)
}

/// Single transferable vote, with the statistics of every round.
///
/// At each round, every voter gives one vote to their favourite among the
/// candidates still running. All the candidates with the lowest count are
/// eliminated together. When all the remaining candidates share the lowest
/// count (in particular when only one is left), the tie-break agent picks
/// the winner among them.
pub fn stv_stats<P: PreferenceProfile>(
    profile: &P,
    tie_break: &P::Voter,
) -> VotingResult<StvResult<P::Candidate>> {
    // The candidates still running, in candidate order.
    let mut remaining: Vec<P::Candidate> = profile.candidates().to_vec();
    let mut round_stats: Vec<StvRoundStats<P::Candidate>> = Vec::new();
    let mut round: u32 = 0;

    while !remaining.is_empty() {
        round += 1;
        let tally = first_choice_tally(profile, &remaining)?;
        let min_count = tally
            .iter()
            .map(|(_, count)| *count)
            .min()
            .context(NoConvergenceSnafu {})?;
        let losers: Vec<P::Candidate> = tally
            .iter()
            .filter(|(_, count)| *count == min_count)
            .map(|(cand, _)| cand.clone())
            .collect();
        info!(
            "Round id: {:?} tally: {:?} lowest: {:?}",
            round, tally, losers
        );

        if losers.len() == remaining.len() {
            let winner = break_tie(profile, &remaining, tie_break)?;
            info!("stv_stats: {:?} elected in round {:?}", winner, round);
            round_stats.push(StvRoundStats {
                round,
                tally,
                eliminated: Vec::new(),
            });
            return Ok(StvResult {
                winner,
                round_stats,
            });
        }

        remaining.retain(|cand| !losers.contains(cand));
        round_stats.push(StvRoundStats {
            round,
            tally,
            eliminated: losers,
        });
    }
    NoConvergenceSnafu {}.fail()
}

/// Among the tied candidates, the one ranked best by `agent`.
pub fn break_tie<P: PreferenceProfile>(
    profile: &P,
    tied: &[P::Candidate],
    agent: &P::Voter,
) -> VotingResult<P::Candidate> {
    let mut best: Option<(usize, &P::Candidate)> = None;
    for cand in tied {
        let rank = profile.get_preference(cand, agent)?;
        match best {
            Some((best_rank, _)) if best_rank <= rank => {}
            _ => best = Some((rank, cand)),
        }
    }
    let (rank, winner) = best.context(EmptyElectionSnafu {})?;
    debug!(
        "break_tie: {:?} ranks {:?} at {:?} among {:?}",
        agent, winner, rank, tied
    );
    Ok(winner.clone())
}

// The highest tally wins, ties go to the tie-break agent.
fn pick_winner<P, N>(
    profile: &P,
    tally: &[(P::Candidate, N)],
    tie_break: &P::Voter,
) -> VotingResult<P::Candidate>
where
    P: PreferenceProfile,
    N: Ord + Copy + std::fmt::Debug,
{
    let best = top_scorers(tally);
    debug!("pick_winner: tally: {:?} best: {:?}", tally, best);
    match best.as_slice() {
        [] => EmptyElectionSnafu {}.fail(),
        [winner] => Ok(winner.clone()),
        _ => break_tie(profile, &best, tie_break),
    }
}

fn top_scorers<C: Clone, N: Ord + Copy>(tally: &[(C, N)]) -> Vec<C> {
    match tally.iter().map(|(_, n)| *n).max() {
        Some(max_count) => tally
            .iter()
            .filter(|(_, n)| *n == max_count)
            .map(|(c, _)| c.clone())
            .collect(),
        None => Vec::new(),
    }
}

// Position (in candidate order) of the first candidate that `voter` puts at `rank`.
fn find_with_rank<P: PreferenceProfile>(
    profile: &P,
    voter: &P::Voter,
    rank: usize,
) -> VotingResult<Option<usize>> {
    for (idx, cand) in profile.candidates().iter().enumerate() {
        if profile.get_preference(cand, voter)? == rank {
            return Ok(Some(idx));
        }
    }
    Ok(None)
}

// First-place votes among the remaining candidates, in the order of `remaining`.
fn first_choice_tally<P: PreferenceProfile>(
    profile: &P,
    remaining: &[P::Candidate],
) -> VotingResult<Vec<(P::Candidate, u64)>> {
    let mut counts: Vec<u64> = vec![0; remaining.len()];
    for voter in profile.voters() {
        let mut favourite: Option<(usize, usize)> = None;
        for (idx, cand) in remaining.iter().enumerate() {
            let rank = profile.get_preference(cand, voter)?;
            match favourite {
                Some((best_rank, _)) if best_rank <= rank => {}
                _ => favourite = Some((rank, idx)),
            }
        }
        // A voter only abstains if nobody is left.
        if let Some((_, idx)) = favourite {
            counts[idx] += 1;
        }
    }
    Ok(remaining.iter().cloned().zip(counts).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn profile(candidates: &[u32], ballots: &[&[u32]]) -> RankedProfile<u32, u32> {
        let mut builder = Builder::new(candidates).unwrap();
        for (idx, ballot) in ballots.iter().enumerate() {
            builder.add_ballot(idx as u32 + 1, ballot).unwrap();
        }
        builder.build()
    }

    #[test]
    fn borda_vector_is_decreasing() {
        assert_eq!(borda_vector(4), vec![3, 2, 1, 0]);
        assert_eq!(borda_vector(1), vec![0]);
        assert!(borda_vector(0).is_empty());
    }

    #[test]
    fn top_scorers_keeps_candidate_order() {
        let tally = vec![("a", 2), ("b", 5), ("c", 1), ("d", 5)];
        assert_eq!(top_scorers(&tally), vec!["b", "d"]);
        let empty: Vec<(&str, u64)> = vec![];
        assert!(top_scorers(&empty).is_empty());
    }

    #[test]
    fn break_tie_uses_the_agent_ranking() {
        init();
        let p = profile(&[1, 2, 3, 4], &[&[3, 1, 4, 2], &[2, 4, 1, 3]]);
        assert_eq!(break_tie(&p, &[1, 2, 4], &1), Ok(1));
        assert_eq!(break_tie(&p, &[1, 2, 4], &2), Ok(2));
        assert_eq!(break_tie(&p, &[1, 3], &2), Ok(1));
        assert_eq!(break_tie(&p, &[], &1), Err(VotingErrors::EmptyElection {}));
        assert!(matches!(
            break_tie(&p, &[1, 2], &9),
            Err(VotingErrors::InvalidCandidateOrVoter { .. })
        ));
    }

    #[test]
    fn tie_break_agent_is_only_consulted_on_ties() {
        init();
        let p = profile(&[1, 2, 3], &[&[1, 2, 3], &[1, 3, 2], &[2, 1, 3]]);
        // Voter 9 does not exist, but there is no tie to break.
        assert_eq!(plurality(&p, &9), Ok(1));
        assert_eq!(borda(&p, &9), Ok(1));
    }

    #[test]
    fn dictatorship_rejects_unknown_agent() {
        let p = profile(&[1, 2], &[&[2, 1]]);
        assert_eq!(
            dictatorship(&p, &3),
            Err(VotingErrors::InvalidAgent {
                agent: "3".to_string()
            })
        );
    }

    #[test]
    fn scoring_rule_rejects_mismatched_vector() {
        let p = profile(&[1, 2, 3], &[&[2, 1, 3]]);
        assert_eq!(
            scoring_rule(&p, &[1, 0], &1),
            Err(VotingErrors::InvalidScoreVector {
                expected: 3,
                actual: 2
            })
        );
        assert_eq!(
            scoring_totals(&p, &[1, 0, 0, 0]),
            Err(VotingErrors::InvalidScoreVector {
                expected: 3,
                actual: 4
            })
        );
    }

    #[test]
    fn scoring_totals_reject_overflow() {
        let p = profile(&[1, 2], &[&[1, 2], &[1, 2]]);
        assert_eq!(
            scoring_rule(&p, &[i64::MAX, 0], &1),
            Err(VotingErrors::ScoreOverflow {
                candidate: "1".to_string()
            })
        );
        // Large weights that fit are fine.
        assert_eq!(
            scoring_totals(&p, &[i64::MAX / 2, -1]),
            Ok(vec![(1, i64::MAX / 2 * 2), (2, -2)])
        );
    }

    #[test]
    fn scoring_totals_sum_over_voters() {
        let p = profile(&[1, 2, 3], &[&[2, 3, 1], &[1, 2, 3]]);
        assert_eq!(
            scoring_totals(&p, &[2, 1, 0]),
            Ok(vec![(1, 2), (2, 3), (3, 1)])
        );
        // Negative weights are allowed.
        assert_eq!(
            scoring_totals(&p, &[0, 0, -1]),
            Ok(vec![(1, -1), (2, 0), (3, -1)])
        );
    }

    #[test]
    fn veto_counts_last_places() {
        init();
        // Candidate 1 is vetoed twice, candidate 3 once.
        let p = profile(&[1, 2, 3], &[&[2, 3, 1], &[3, 2, 1], &[1, 2, 3]]);
        assert_eq!(veto(&p, &1), Ok(2));
    }

    #[test]
    fn rules_fail_on_empty_election() {
        let p: RankedProfile<u32, u32> = Builder::new(&[]).unwrap().build();
        assert_eq!(plurality(&p, &1), Err(VotingErrors::EmptyElection {}));
        assert_eq!(veto(&p, &1), Err(VotingErrors::EmptyElection {}));
        assert_eq!(borda(&p, &1), Err(VotingErrors::EmptyElection {}));
        assert_eq!(stv(&p, &1), Err(VotingErrors::NoConvergence {}));
    }

    #[test]
    fn stv_single_candidate_wins_in_one_round() {
        let p = profile(&[7], &[&[7], &[7]]);
        let res = stv_stats(&p, &1).unwrap();
        assert_eq!(res.winner, 7);
        assert_eq!(res.round_stats.len(), 1);
        assert_eq!(res.round_stats[0].tally, vec![(7, 2)]);
        assert!(res.round_stats[0].eliminated.is_empty());
    }

    #[test]
    fn stv_eliminates_all_lowest_candidates_together() {
        init();
        // Candidates 2 and 3 both have no first place in round 1.
        let p = profile(&[1, 2, 3], &[&[1, 2, 3], &[1, 3, 2]]);
        let res = stv_stats(&p, &2).unwrap();
        assert_eq!(res.winner, 1);
        assert_eq!(
            res.round_stats,
            vec![
                StvRoundStats {
                    round: 1,
                    tally: vec![(1, 2), (2, 0), (3, 0)],
                    eliminated: vec![2, 3],
                },
                StvRoundStats {
                    round: 2,
                    tally: vec![(1, 2)],
                    eliminated: vec![],
                },
            ]
        );
    }

    #[test]
    fn stv_transfers_votes_of_eliminated_candidates() {
        init();
        // Round 1: 1 -> 2 votes, 2 -> 2 votes, 3 -> 1 vote. 3 is eliminated and
        // its voter moves to 2, who then wins without any tie.
        let p = profile(
            &[1, 2, 3],
            &[&[1, 2, 3], &[1, 3, 2], &[2, 1, 3], &[2, 3, 1], &[3, 2, 1]],
        );
        let res = stv_stats(&p, &1).unwrap();
        assert_eq!(res.winner, 2);
        assert_eq!(res.round_stats[0].eliminated, vec![3]);
        assert_eq!(res.round_stats[1].tally, vec![(1, 2), (2, 3)]);
        assert_eq!(res.round_stats[1].eliminated, vec![1]);
        assert_eq!(res.round_stats.len(), 3);
    }

    #[test]
    fn run_election_dispatches_on_rule() {
        init();
        let p = profile(&[1, 2, 3], &[&[2, 3, 1], &[1, 2, 3]]);
        let rules = VoteRules::new(RuleKind::Dictatorship, 2);
        assert_eq!(run_election(&p, &rules), Ok(1));
        let rules = VoteRules::new(RuleKind::Scoring(vec![0, 1, 0]), 1);
        assert_eq!(run_election(&p, &rules), Ok(2));
        let rules = VoteRules::new(RuleKind::DEFAULT, 1);
        assert_eq!(run_election(&p, &rules), Ok(2));
    }
}
