use std::collections::VecDeque;

use rayon::prelude::*;

use crate::volcano::{ValveHandle, Volcano};

/// Hop counts between a fixed set of valves. `None` means no path; that is
/// an answer, not an error.
pub struct DistanceTable {
    cols: usize,
    sources: Vec<ValveHandle>,
    index_for: Vec<Option<usize>>,
    data: Vec<Option<u32>>,
}

impl DistanceTable {
    /// The valves this table has rows and columns for, in row order.
    pub fn sources(&self) -> &[ValveHandle] {
        &self.sources
    }

    /// Dense row/column index of a valve, if it is in the table.
    pub fn index_of(&self, h: ValveHandle) -> Option<usize> {
        self.index_for.get(h.as_usize()).copied().flatten()
    }

    pub fn at(&self, src: usize, dst: usize) -> Option<u32> {
        self.data[src * self.cols + dst]
    }

    pub fn between(&self, src: ValveHandle, dst: ValveHandle) -> Option<u32> {
        self.at(self.index_of(src)?, self.index_of(dst)?)
    }
}

/// Breadth-first sweep of the whole network from each source. Only `sources`
/// get rows and columns, but the traversal crosses every valve, so zero-rate
/// valves still serve as intermediate hops. Rows are independent and run on
/// the rayon pool.
pub fn shortest_distances(volcano: &Volcano, sources: &[ValveHandle]) -> DistanceTable {
    let rows: Vec<Vec<Option<u32>>> = sources
        .par_iter()
        .map(|&src| bfs_row(volcano, sources, src))
        .collect();

    let cols = sources.len();
    let mut data = Vec::with_capacity(cols * cols);
    for row in rows {
        data.extend(row);
    }

    let mut index_for = vec![None; volcano.len()];
    for (i, &src) in sources.iter().enumerate() {
        index_for[src.as_usize()] = Some(i);
    }

    DistanceTable {
        cols,
        sources: sources.to_vec(),
        index_for,
        data,
    }
}

fn bfs_row(volcano: &Volcano, sources: &[ValveHandle], src: ValveHandle) -> Vec<Option<u32>> {
    let mut dist: Vec<Option<u32>> = vec![None; volcano.len()];
    let mut frontier: VecDeque<(ValveHandle, u32)> = VecDeque::new();

    dist[src.as_usize()] = Some(0);
    frontier.push_back((src, 0));
    while let Some((valve, hops)) = frontier.pop_front() {
        for &next in volcano.tunnels(valve) {
            if dist[next.as_usize()].is_none() {
                dist[next.as_usize()] = Some(hops + 1);
                frontier.push_back((next, hops + 1));
            }
        }
    }

    sources.iter().map(|&dst| dist[dst.as_usize()]).collect()
}
