/*!

This is the long-form manual for `voting_rules`.

## Preference profiles

All the rules read the ballots through [crate::PreferenceProfile]. A profile has:
* an ordered list of candidates. The order is the order in which the rules scan
  the candidates. It never changes the winner.
* an ordered list of voters.
* the rank given by each voter to each candidate. Rank 0 is the top choice, and
  every voter ranks every candidate exactly once.

Any type can implement the trait. The crate provides [crate::RankedProfile],
built with [crate::Builder], which checks that each ballot is a complete strict
ranking.

## Tie-break agent

Every rule but the dictatorship takes a tie-break agent. It is a voter of the
election. When several candidates share the best result, the winner is the one
this agent ranks best. The agent is only looked up when a tie actually occurs.

## Rules

### `dictatorship`

The top choice of the given agent. The agent must be a voter of the election.

### `scoring_rule`

Takes a score vector with one entry per rank. Each voter gives
`score_vector[rank]` points to each candidate. The highest total wins. The
length of the vector must be the number of candidates. The totals themselves are
available with [crate::scoring_totals].

### `plurality`

One point per first place. Same result as `scoring_rule` with `[1, 0, ..., 0]`.

### `veto`

Every candidate starts with one point per voter, and loses one point each time a
voter ranks them last. Same result as `scoring_rule` with `[0, ..., 0, -1]`.

### `borda`

`scoring_rule` with `[n-1, n-2, ..., 1, 0]` for `n` candidates.

### `stv`

Single transferable vote. At each round, each voter gives one vote to their
favourite among the candidates still running. All the candidates with the lowest
count are eliminated at the same time. When every remaining candidate shares the
lowest count (which includes the case of a single remaining candidate), the
tie-break agent picks the winner among them.

For example, with 3 candidates and 2 voters:

|         | first | second | third |
|---------|-------|--------|-------|
| voter 1 | 2     | 3      | 1     |
| voter 2 | 1     | 2      | 3     |

Candidate 3 has no first place and is eliminated. Candidates 1 and 2 then have
one vote each, and voter 1 (the tie-break agent) prefers 2.

[crate::stv_stats] returns the tally and the eliminated candidates of each round.

## Configuration

[crate::VoteRules] selects a rule ([crate::RuleKind]) and its agent. It can be
deserialized with serde, for example from JSON:

```text
{ "rule": "stv", "agent": 1 }
{ "rule": { "scoring": [2, 1, 0] }, "agent": 1 }
```

[crate::run_election] then applies it to a profile.

 */
