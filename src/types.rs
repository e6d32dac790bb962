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

extern crate fnv;

use fnv::{FnvHashMap, FnvHashSet};

pub type DenseVector = Vec<f64>;

pub type SparseVector = FnvHashMap<u32, f64>;
pub type SparseMatrix = Vec<SparseVector>;

pub type ItemSet = FnvHashSet<u32>;
pub type UserProfiles = Vec<ItemSet>;

pub fn new_dense_vector(dimensions: usize) -> DenseVector {
    vec![0.0; dimensions]
}

pub fn new_sparse_matrix(num_rows: usize) -> SparseMatrix {
    vec![FnvHashMap::with_capacity_and_hasher(0, Default::default()); num_rows]
}

pub fn new_user_profiles(num_users: usize) -> UserProfiles {
    vec![FnvHashSet::with_capacity_and_hasher(0, Default::default()); num_users]
}

/// A single observed interaction between a user and an item. Interactions
/// without an explicit weight count as 1.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Interaction {
    pub item: u32,
    pub user: u32,
    pub weight: f64,
}

impl Interaction {

    pub fn new(item: u32, user: u32, weight: f64) -> Self {
        Interaction { item, user, weight }
    }

    pub fn unweighted(item: u32, user: u32) -> Self {
        Interaction { item, user, weight: 1.0 }
    }
}

/// The computed output for a single selected user: the held-out test item,
/// the candidate items and their relevance scores. `relevances[k]` refers to
/// `candidates[k]`.
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct UserRecord {
    pub user: u32,
    pub test_item: u32,
    pub candidates: Vec<u32>,
    pub relevances: Vec<f64>,
}
