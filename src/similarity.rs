/**
 * CandReco
 * Copyright (C) 2018 Sebastian Schelter
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <http://www.gnu.org/licenses/>.
 */

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use types::{DenseVector, SparseMatrix, SparseVector};

/// Result type used to find the top-n most similar items per item via a
/// binary heap.
#[derive(PartialEq, Debug)]
pub struct ScoredItem {
    pub item: u32,
    pub score: f64,
}

/// Ordering for our max-heap. Note that we must use a special implementation
/// here as there is no total order on floating point numbers. The ordering is
/// reversed so that the heap keeps the lowest-scoring item on top, and score
/// ties are decided by ascending item id to make the selection deterministic.
fn cmp_reverse(scored_item_a: &ScoredItem, scored_item_b: &ScoredItem) -> Ordering {
    match scored_item_a.score.partial_cmp(&scored_item_b.score) {
        Some(Ordering::Less) => Ordering::Greater,
        Some(Ordering::Greater) => Ordering::Less,
        _ => scored_item_a.item.cmp(&scored_item_b.item),
    }
}

impl Eq for ScoredItem {}

impl Ord for ScoredItem {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_reverse(self, other)
    }
}

impl PartialOrd for ScoredItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(cmp_reverse(self, other))
    }
}

/// Cosine similarity between the item rows of a sparse item×user interaction
/// matrix. We keep the sparse rows and their norms and compute similarities
/// on demand instead of materializing the quadratic item×item matrix.
pub struct Similarities {
    rows: SparseMatrix,
    norms: DenseVector,
}

impl Similarities {

    pub fn from_matrix(rows: SparseMatrix) -> Self {
        let norms = rows.iter()
            .map(|row| row.values().map(|weight| weight * weight).sum::<f64>().sqrt())
            .collect();

        Similarities { rows, norms }
    }

    pub fn num_items(&self) -> usize {
        self.rows.len()
    }

    /// Cosine similarity between the rows of `item` and `other_item`. An
    /// all-zero row has similarity 0 to everything, a non-zero row has
    /// similarity exactly 1 to itself.
    pub fn between(&self, item: u32, other_item: u32) -> f64 {
        let norm_a = self.norms[item as usize];
        let norm_b = self.norms[other_item as usize];

        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }

        if item == other_item {
            return 1.0;
        }

        dot(&self.rows[item as usize], &self.rows[other_item as usize]) / (norm_a * norm_b)
    }

    /// The full similarity row of `item` as a dense vector.
    pub fn row(&self, item: u32) -> DenseVector {
        (0..self.num_items())
            .map(|other_item| self.between(item, other_item as u32))
            .collect()
    }

    /// The indices of the (at most) `n` most similar items to `item`,
    /// excluding the item itself and an optional further index. Score ties at
    /// the selection boundary are broken by ascending item id.
    pub fn top_n_similar(&self, item: u32, excluded: Option<u32>, n: usize) -> Vec<u32> {

        if n == 0 {
            return Vec::new();
        }

        let row = self.row(item);

        let mut heap: BinaryHeap<ScoredItem> = BinaryHeap::with_capacity(n);

        for (other_item, &score) in row.iter().enumerate() {
            let other_item = other_item as u32;

            if other_item == item || Some(other_item) == excluded {
                continue;
            }

            let scored_item = ScoredItem { item: other_item, score };

            if heap.len() < n {
                heap.push(scored_item);
            } else {
                let mut top = heap.peek_mut().unwrap();
                if scored_item < *top {
                    *top = scored_item;
                }
            }
        }

        heap.into_iter()
            .map(|scored_item| scored_item.item)
            .collect()
    }
}

fn dot(row_a: &SparseVector, row_b: &SparseVector) -> f64 {
    let (smaller, larger) = if row_a.len() <= row_b.len() {
        (row_a, row_b)
    } else {
        (row_b, row_a)
    };

    smaller.iter()
        .filter_map(|(user, weight)| larger.get(user).map(|other_weight| weight * other_weight))
        .sum()
}


#[cfg(test)]
mod tests {

    use types;
    use similarity::{ScoredItem, Similarities};

    fn matrix_from_triples(num_items: usize, triples: &[(u32, u32, f64)]) -> Similarities {
        let mut rows = types::new_sparse_matrix(num_items);
        for &(item, user, weight) in triples {
            *rows[item as usize].entry(user).or_insert(0.0) += weight;
        }
        Similarities::from_matrix(rows)
    }

    #[test]
    fn scored_item_ordering_reversed() {
        let item_a = ScoredItem { item: 1, score: 0.5 };
        let item_b = ScoredItem { item: 2, score: 1.5 };
        let item_c = ScoredItem { item: 3, score: 0.3 };

        assert!(item_a > item_b);
        assert!(item_a < item_c);
        assert!(item_b < item_c);
    }

    #[test]
    fn scored_item_ties_decided_by_item() {
        let item_a = ScoredItem { item: 1, score: 0.5 };
        let item_b = ScoredItem { item: 2, score: 0.5 };

        assert!(item_a < item_b);
    }

    #[test]
    fn cosine_of_disjoint_and_identical_rows() {
        let similarities = matrix_from_triples(3, &[
            (0, 0, 1.0),
            (0, 1, 1.0),
            (1, 2, 1.0),
            (2, 1, 1.0),
        ]);

        assert!((similarities.between(0, 0) - 1.0).abs() < 1e-12);
        assert!(similarities.between(0, 1).abs() < 1e-12);
        // overlap in user 1 only
        let expected = 1.0 / (2.0_f64).sqrt();
        assert!((similarities.between(0, 2) - expected).abs() < 1e-12);
    }

    #[test]
    fn cosine_is_symmetric_and_bounded() {
        let similarities = matrix_from_triples(4, &[
            (0, 0, 2.0),
            (0, 1, 1.0),
            (1, 1, 3.0),
            (2, 0, 1.0),
            (2, 2, 5.0),
            (3, 2, 1.0),
        ]);

        for item in 0..4 {
            for other_item in 0..4 {
                let forward = similarities.between(item, other_item);
                let backward = similarities.between(other_item, item);
                assert!((forward - backward).abs() < 1e-12);
                assert!(forward >= -1.0 && forward <= 1.0);
            }
        }
    }

    #[test]
    fn all_zero_row_has_zero_similarity() {
        // item 1 never occurs in any interaction
        let similarities = matrix_from_triples(3, &[
            (0, 0, 1.0),
            (2, 0, 1.0),
        ]);

        assert!(similarities.between(1, 1).abs() < 1e-12);
        assert!(similarities.between(0, 1).abs() < 1e-12);
    }

    #[test]
    fn dense_row_matches_indexed_access() {
        let similarities = matrix_from_triples(3, &[
            (0, 0, 1.0),
            (1, 0, 1.0),
            (1, 1, 1.0),
            (2, 1, 1.0),
        ]);

        let row = similarities.row(1);

        assert_eq!(row.len(), 3);
        for other_item in 0..3 {
            assert!((row[other_item] - similarities.between(1, other_item as u32)).abs() < 1e-12);
        }
    }

    #[test]
    fn top_n_excludes_self_and_excluded_index() {
        let similarities = matrix_from_triples(4, &[
            (0, 0, 1.0),
            (1, 0, 1.0),
            (2, 0, 1.0),
            (3, 0, 1.0),
        ]);

        let top = similarities.top_n_similar(0, Some(2), 10);

        assert!(!top.contains(&0));
        assert!(!top.contains(&2));
        assert_eq!(top.len(), 2);
    }

    #[test]
    fn top_n_breaks_ties_by_ascending_item() {
        // items 1, 2, 3 all have identical rows, so their similarity to
        // item 0 is identical as well
        let similarities = matrix_from_triples(4, &[
            (0, 0, 1.0),
            (1, 0, 1.0),
            (2, 0, 1.0),
            (3, 0, 1.0),
        ]);

        let mut top = similarities.top_n_similar(0, None, 2);
        top.sort();

        assert_eq!(top, vec![1, 2]);
    }

    #[test]
    fn top_n_with_fewer_available_items() {
        let similarities = matrix_from_triples(2, &[
            (0, 0, 1.0),
            (1, 0, 1.0),
        ]);

        let top = similarities.top_n_similar(0, None, 5);

        assert_eq!(top, vec![1]);
    }
}
