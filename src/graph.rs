//! A static directed weighted graph and Dijkstra's algorithm, generic over
//! the weight type. Edges are append-only and addressed by a stable edge
//! id; reused by the transit router for its time-expanded graph but has no
//! transit-specific knowledge itself.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A weight usable in shortest-path search: has a zero, is additively
/// combinable, and is totally ordered.
pub trait Weight: Copy + PartialOrd + std::ops::Add<Output = Self> {
    const ZERO: Self;
}

impl Weight for f64 {
    const ZERO: f64 = 0.0;
}

#[derive(Debug, Clone)]
pub struct Edge<W, L> {
    pub from: u32,
    pub to: u32,
    pub weight: W,
    pub label: L,
}

/// A directed graph over `vertex_count` vertices, storing edges in an
/// append-only array plus a per-vertex adjacency list of edge ids.
#[derive(Debug, Clone)]
pub struct Graph<W, L> {
    edges: Vec<Edge<W, L>>,
    adjacency: Vec<Vec<u32>>,
}

impl<W: Weight, L> Graph<W, L> {
    pub fn new(vertex_count: usize) -> Self {
        Self {
            edges: Vec::new(),
            adjacency: vec![Vec::new(); vertex_count],
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Appends an edge and returns its id.
    pub fn add_edge(&mut self, from: u32, to: u32, weight: W, label: L) -> u32 {
        let id = self.edges.len() as u32;
        self.edges.push(Edge {
            from,
            to,
            weight,
            label,
        });
        self.adjacency[from as usize].push(id);
        id
    }

    pub fn edge(&self, id: u32) -> &Edge<W, L> {
        &self.edges[id as usize]
    }

    /// Shortest path from `source` to `target`, as the ordered sequence of
    /// edge ids taken. Ties on equal distance are broken by edge-id order
    /// on relaxation, so results are stable for a given graph. Returns
    /// `None` if `target` is unreachable.
    pub fn shortest_path(&self, source: u32, target: u32) -> Option<Vec<u32>>
    where
        W: PartialOrd,
    {
        let n = self.vertex_count();
        let mut distance: Vec<Option<W>> = vec![None; n];
        let mut predecessor_edge: Vec<Option<u32>> = vec![None; n];
        let mut heap = BinaryHeap::new();

        distance[source as usize] = Some(W::ZERO);
        heap.push(HeapEntry {
            distance: W::ZERO,
            vertex: source,
        });

        while let Some(HeapEntry { distance: d, vertex: u }) = heap.pop() {
            match distance[u as usize] {
                Some(best) if best < d => continue,
                _ => {}
            }
            if u == target {
                break;
            }
            for &edge_id in &self.adjacency[u as usize] {
                let edge = &self.edges[edge_id as usize];
                let candidate = d + edge.weight;
                let better = match distance[edge.to as usize] {
                    None => true,
                    Some(current) => candidate < current,
                };
                if better {
                    distance[edge.to as usize] = Some(candidate);
                    predecessor_edge[edge.to as usize] = Some(edge_id);
                    heap.push(HeapEntry {
                        distance: candidate,
                        vertex: edge.to,
                    });
                }
            }
        }

        distance[target as usize]?;
        let mut path = Vec::new();
        let mut at = target;
        while at != source {
            let edge_id = predecessor_edge[at as usize]?;
            path.push(edge_id);
            at = self.edges[edge_id as usize].from;
        }
        path.reverse();
        Some(path)
    }
}

/// Min-heap entry; `Ord` is reversed relative to the natural order of `W`
/// so that `BinaryHeap` (a max-heap) pops the smallest distance first.
struct HeapEntry<W> {
    distance: W,
    vertex: u32,
}

impl<W: PartialEq> PartialEq for HeapEntry<W> {
    fn eq(&self, other: &Self) -> bool {
        self.vertex == other.vertex
    }
}

impl<W: PartialEq> Eq for HeapEntry<W> {}

impl<W: PartialOrd> PartialOrd for HeapEntry<W> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<W: PartialOrd> Ord for HeapEntry<W> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .partial_cmp(&self.distance)
            .unwrap_or(Ordering::Equal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_shortest_path_over_multiple_edges() {
        let mut g: Graph<f64, &str> = Graph::new(4);
        g.add_edge(0, 1, 1.0, "a");
        g.add_edge(1, 2, 1.0, "b");
        g.add_edge(0, 2, 5.0, "c");
        g.add_edge(2, 3, 1.0, "d");

        let path = g.shortest_path(0, 3).unwrap();
        let labels: Vec<&str> = path.iter().map(|&id| g.edge(id).label).collect();
        assert_eq!(labels, vec!["a", "b", "d"]);
    }

    #[test]
    fn unreachable_target_is_none() {
        let mut g: Graph<f64, &str> = Graph::new(3);
        g.add_edge(0, 1, 1.0, "a");
        assert!(g.shortest_path(0, 2).is_none());
    }

    #[test]
    fn source_equals_target_is_empty_path() {
        let g: Graph<f64, &str> = Graph::new(2);
        assert_eq!(g.shortest_path(0, 0), Some(vec![]));
    }
}
