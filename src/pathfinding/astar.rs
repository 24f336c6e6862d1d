//! Generic A* search
//!
//! Works over any node type. The caller supplies three callbacks: which nodes
//! are reachable from a node, the true (possibly asymmetric) cost of an edge,
//! and an admissible estimate of the remaining cost. Infinite edge costs never
//! improve a node's best-known cost, so impassable edges are simply never
//! taken.
//!
//! The search can be driven one expansion at a time with [`AStar::step`] for
//! partial inspection, or run to completion with [`AStar::finish`].

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use crate::core::error::{EcoError, Result};
use crate::pathfinding::priority_queue::PriorityQueue;

/// Search state after each step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Idle,
    Initialized,
    InProgress,
    PathFound,
    NoPathExists,
}

impl SearchState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SearchState::PathFound | SearchState::NoPathExists)
    }
}

pub struct AStar<N, Nb, C, H> {
    neighbors: Nb,
    edge_cost: C,
    heuristic: H,
    /// Open set keyed by f = g + h
    open: PriorityQueue<N>,
    closed: HashSet<N>,
    came_from: HashMap<N, N>,
    /// Best known cost from start (g)
    g_scores: HashMap<N, f32>,
    start: Option<N>,
    goal: Option<N>,
    state: SearchState,
}

impl<N, Nb, C, H> AStar<N, Nb, C, H>
where
    N: Clone + Eq + Hash,
    Nb: FnMut(&N) -> Vec<N>,
    C: FnMut(&N, &N) -> f32,
    H: FnMut(&N, &N) -> f32,
{
    pub fn new(neighbors: Nb, edge_cost: C, heuristic: H) -> Self {
        Self {
            neighbors,
            edge_cost,
            heuristic,
            open: PriorityQueue::new(),
            closed: HashSet::new(),
            came_from: HashMap::new(),
            g_scores: HashMap::new(),
            start: None,
            goal: None,
            state: SearchState::Idle,
        }
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    /// Number of nodes expanded (closed) since the last `start`
    pub fn expanded(&self) -> usize {
        self.closed.len()
    }

    /// Reset all search state for a new start/goal pair
    pub fn start(&mut self, start: N, goal: N) -> &mut Self {
        self.open.clear();
        self.closed.clear();
        self.came_from.clear();
        self.g_scores.clear();

        let h = (self.heuristic)(&start, &goal);
        self.open.push(start.clone(), h);
        self.g_scores.insert(start.clone(), 0.0);

        self.start = Some(start);
        self.goal = Some(goal);
        self.state = SearchState::Initialized;
        self
    }

    /// Expand one node
    ///
    /// Terminal states are sticky: stepping a finished search returns the
    /// same state again.
    pub fn step(&mut self) -> Result<SearchState> {
        match self.state {
            SearchState::Idle => return Err(EcoError::NotInitialized),
            SearchState::PathFound | SearchState::NoPathExists => return Ok(self.state),
            SearchState::Initialized | SearchState::InProgress => {}
        }
        let goal = self.goal.clone().ok_or(EcoError::NotInitialized)?;

        // Skip superseded duplicates of already-closed nodes
        loop {
            let Ok(top) = self.open.peek_min() else {
                self.state = SearchState::NoPathExists;
                return Ok(self.state);
            };
            if *top == goal {
                self.state = SearchState::PathFound;
                return Ok(self.state);
            }
            if self.closed.contains(top) {
                self.open.pop_min()?;
                continue;
            }
            break;
        }

        let current = self.open.pop_min()?;
        self.closed.insert(current.clone());

        let current_g = self.g_scores.get(&current).copied().unwrap_or(f32::INFINITY);
        let neighbors = (self.neighbors)(&current);

        for neighbor in neighbors {
            if self.closed.contains(&neighbor) {
                continue;
            }

            let tentative_g = current_g + (self.edge_cost)(&current, &neighbor);
            let neighbor_g = self.g_scores.get(&neighbor).copied().unwrap_or(f32::INFINITY);

            if tentative_g < neighbor_g {
                let f_cost = tentative_g + (self.heuristic)(&neighbor, &goal);
                self.g_scores.insert(neighbor.clone(), tentative_g);
                self.came_from.insert(neighbor.clone(), current.clone());
                self.open.push(neighbor, f_cost);
            }
        }

        self.state = SearchState::InProgress;
        Ok(self.state)
    }

    /// Step until a terminal state
    pub fn finish(&mut self) -> Result<SearchState> {
        loop {
            let state = self.step()?;
            if state.is_terminal() {
                return Ok(state);
            }
        }
    }

    /// Step until a terminal state or until `max_steps` expansions
    ///
    /// Returns `InProgress` when the budget ran out first.
    pub fn finish_within(&mut self, max_steps: usize) -> Result<SearchState> {
        let mut state = self.state;
        for _ in 0..max_steps {
            state = self.step()?;
            if state.is_terminal() {
                return Ok(state);
            }
        }
        if state == SearchState::Idle {
            return Err(EcoError::NotInitialized);
        }
        Ok(state)
    }

    /// Best path found so far, from start to the current open minimum
    ///
    /// Once the search has found the goal this is the full path.
    pub fn current_path(&self) -> Option<Vec<N>> {
        let node = self.open.peek_min().ok()?;
        self.reconstruct_path(node.clone())
    }

    /// Start and finish in one call, returning the path if one exists
    pub fn find_path(&mut self, start: N, goal: N) -> Result<Option<Vec<N>>> {
        match self.start(start, goal).finish()? {
            SearchState::PathFound => Ok(self.current_path()),
            _ => Ok(None),
        }
    }

    fn reconstruct_path(&self, mut current: N) -> Option<Vec<N>> {
        let start = self.start.as_ref()?;
        if current == *start {
            return Some(vec![current]);
        }
        if !self.came_from.contains_key(&current) {
            return None;
        }

        let mut path = vec![current.clone()];
        while let Some(prev) = self.came_from.get(&current) {
            path.push(prev.clone());
            current = prev.clone();
        }
        path.reverse();
        Some(path)
    }
}
