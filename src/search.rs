use std::collections::HashMap;

use tracing::debug;

use crate::distance::{shortest_distances, DistanceTable};
use crate::error::Error;
use crate::volcano::Volcano;

/// Caps on the exponential search, so a hostile scan fails fast instead of
/// stalling.
#[derive(Clone, Copy, Debug)]
pub struct SearchLimits {
    /// Most openable valves the bitmask state space will take on.
    pub max_openable: usize,
    /// Most distinct states one call may expand before giving up.
    pub max_states: u64,
}

impl Default for SearchLimits {
    fn default() -> Self {
        // The reachable state space is bounded by
        // openable * horizon * 2^openable, about 31M at 16 valves and 30
        // time units.
        SearchLimits {
            max_openable: 16,
            max_states: 1 << 26,
        }
    }
}

/// Highest total release one agent can manage from `start` within `horizon`
/// time units, moving one tunnel per unit and spending one unit per valve
/// opened. An opened valve contributes its rate for every remaining unit.
pub fn best_release(
    volcano: &Volcano,
    start: &str,
    horizon: u32,
    limits: SearchLimits,
) -> Result<u32, Error> {
    let mut search = Search::new(volcano, start, limits)?;
    let (at, universe) = (search.start, search.universe);
    search.solve(at, horizon, universe)
}

/// Highest combined release two agents can manage, both starting at `start`
/// with `horizon` time units each and no valve opened twice. Tries every
/// split of the openable valves between the agents; handing an agent a valve
/// doesn't force it open, so "neither agent bothers" is covered too.
pub fn best_release_pair(
    volcano: &Volcano,
    start: &str,
    horizon: u32,
    limits: SearchLimits,
) -> Result<u32, Error> {
    let mut search = Search::new(volcano, start, limits)?;
    let (at, universe) = (search.start, search.universe);

    let mut best = 0;
    for mask in 0..=universe {
        let mine = search.solve(at, horizon, mask)?;
        let theirs = search.solve(at, horizon, universe & !mask)?;
        best = best.max(mine + theirs);
    }
    Ok(best)
}

/// One top-level search: dense bit assignment for the valves worth opening,
/// the travel table between them, and a private memo. Results depend only on
/// the arguments, so repeated runs agree.
struct Search {
    travel: DistanceTable,
    start: usize,
    /// Travel-table index per bit.
    pos_for_bit: Vec<usize>,
    rate_for_bit: Vec<u32>,
    /// All assigned bits set.
    universe: u32,
    memo: HashMap<(usize, u32, u32), u32>,
    expanded: u64,
    max_states: u64,
}

impl Search {
    fn new(volcano: &Volcano, start_name: &str, limits: SearchLimits) -> Result<Search, Error> {
        let start = volcano.handle(start_name)?;
        let interesting = volcano.interesting(start);
        let travel = shortest_distances(volcano, &interesting);
        let start_pos = travel
            .index_of(start)
            .ok_or_else(|| Error::UnknownValve(start_name.to_string()))?;

        // Bits go only to valves that could ever be opened: positive rate
        // and a path from the start.
        let mut pos_for_bit = Vec::new();
        let mut rate_for_bit = Vec::new();
        for &valve in &interesting {
            if volcano.rate(valve) == 0 {
                continue;
            }
            match (travel.between(start, valve), travel.index_of(valve)) {
                (Some(_), Some(pos)) => {
                    pos_for_bit.push(pos);
                    rate_for_bit.push(volcano.rate(valve));
                }
                _ => debug!(
                    valve = volcano.name(valve),
                    "no path from the start, excluding valve"
                ),
            }
        }

        let openable = pos_for_bit.len();
        if openable > limits.max_openable || openable >= u32::BITS as usize {
            return Err(Error::ResourceExhausted(format!(
                "{openable} openable valves, over the enumeration limit of {}",
                limits.max_openable
            )));
        }

        Ok(Search {
            travel,
            start: start_pos,
            universe: (1u32 << openable) - 1,
            pos_for_bit,
            rate_for_bit,
            memo: HashMap::new(),
            expanded: 0,
            max_states: limits.max_states,
        })
    }

    /// Best achievable release from position `at` with `time` units left and
    /// the valves in `remaining` still closed and up for grabs. Rather than
    /// simulating unit by unit, jump valve to valve over the travel table:
    /// opening valve v with r units on the clock is worth exactly
    /// rate(v) * r, so nothing in between matters.
    fn solve(&mut self, at: usize, time: u32, remaining: u32) -> Result<u32, Error> {
        if time == 0 || remaining == 0 {
            return Ok(0);
        }
        if let Some(&known) = self.memo.get(&(at, time, remaining)) {
            return Ok(known);
        }
        self.expanded += 1;
        if self.expanded > self.max_states {
            return Err(Error::ResourceExhausted(format!(
                "search expanded more than {} states",
                self.max_states
            )));
        }

        let mut best = 0;
        let mut candidates = remaining;
        while candidates != 0 {
            let bit = candidates.trailing_zeros() as usize;
            candidates &= candidates - 1;

            let Some(hops) = self.travel.at(at, self.pos_for_bit[bit]) else {
                continue;
            };
            // One unit per hop plus one to open, and opening must leave time
            // on the clock or the valve contributes nothing.
            if hops + 1 >= time {
                continue;
            }
            let left = time - hops - 1;
            let tail = self.solve(self.pos_for_bit[bit], left, remaining & !(1 << bit))?;
            best = best.max(self.rate_for_bit[bit] * left + tail);
        }

        self.memo.insert((at, time, remaining), best);
        Ok(best)
    }
}
