extern crate fnv;
extern crate scoped_pool;
#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate serde_json;

use std::sync::Mutex;
use std::time::Instant;

use scoped_pool::Pool;

pub mod errors;
pub mod io;
pub mod similarity;
pub mod stats;
pub mod types;
pub mod utils;


use errors::PipelineError;
use similarity::Similarities;
use stats::InteractionStats;
use types::{Interaction, ItemSet, SparseMatrix, UserProfiles, UserRecord};

/// Builds the sparse item×user interaction matrix. Weights of colliding
/// (item, user) coordinates are summed up.
pub fn interaction_matrix(
    interactions: &[Interaction],
    num_items: usize,
    num_users: usize,
) -> Result<SparseMatrix, PipelineError> {

    let mut matrix = types::new_sparse_matrix(num_items);

    for interaction in interactions {

        if interaction.item as usize >= num_items {
            return Err(PipelineError::IndexOutOfRange {
                what: "item", index: interaction.item, bound: num_items });
        }

        if interaction.user as usize >= num_users {
            return Err(PipelineError::IndexOutOfRange {
                what: "user", index: interaction.user, bound: num_users });
        }

        *matrix[interaction.item as usize].entry(interaction.user).or_insert(0.0) +=
            interaction.weight;
    }

    Ok(matrix)
}

/// Groups the interactions by user into per-user item sets.
pub fn user_profiles(
    interactions: &[Interaction],
    num_users: usize,
) -> Result<UserProfiles, PipelineError> {

    let mut profiles = types::new_user_profiles(num_users);

    for interaction in interactions {

        if interaction.user as usize >= num_users {
            return Err(PipelineError::IndexOutOfRange {
                what: "user", index: interaction.user, bound: num_users });
        }

        profiles[interaction.user as usize].insert(interaction.item);
    }

    Ok(profiles)
}

/// The `top_u` users with the largest profiles, most active first. Ties are
/// broken by ascending user id via the stable sort. Users without any
/// interactions are never returned.
pub fn select_active_users(profiles: &UserProfiles, top_u: usize) -> Vec<u32> {

    let mut counted: Vec<(u32, usize)> = profiles.iter()
        .enumerate()
        .filter(|&(_, profile)| !profile.is_empty())
        .map(|(user, profile)| (user as u32, profile.len()))
        .collect();

    counted.sort_by(|counted_a, counted_b| counted_b.1.cmp(&counted_a.1));

    counted.into_iter()
        .take(top_u)
        .map(|(user, _)| user)
        .collect()
}

/// Removes the item with the smallest id from the profile and returns it as
/// the held-out test item for later evaluation.
pub fn hold_out_test_item(profile: &mut ItemSet, user: u32) -> Result<u32, PipelineError> {

    let test_item = match profile.iter().min() {
        Some(&item) => item,
        None => return Err(PipelineError::DegenerateRow { user }),
    };

    profile.remove(&test_item);

    Ok(test_item)
}

/// The candidate set for a single profile: the union of the `top_n` most
/// similar items to each profile item, excluding self-similarity and an
/// optional held-out item, sorted by ascending item id. Note that we do not
/// filter out the remaining profile items, an item may be part of both the
/// profile and the candidate set.
pub fn candidate_set(
    similarities: &Similarities,
    profile: &ItemSet,
    excluded: Option<u32>,
    top_n: usize,
) -> Vec<u32> {

    let mut candidates = ItemSet::default();

    for &item in profile.iter() {
        for candidate in similarities.top_n_similar(item, excluded, top_n) {
            candidates.insert(candidate);
        }
    }

    let mut candidates: Vec<u32> = candidates.into_iter().collect();
    candidates.sort();

    candidates
}

/// The relevance of each candidate, aligned positionally with `candidates`:
/// the sum of its similarities to every profile item.
pub fn relevance_scores(
    similarities: &Similarities,
    profile: &ItemSet,
    candidates: &[u32],
) -> Vec<f64> {

    candidates.iter()
        .map(|&candidate| {
            profile.iter()
                .map(|&item| similarities.between(candidate, item))
                .sum()
        })
        .collect()
}

/// Runs the whole batch pipeline: builds the interaction matrix and the
/// similarity structure, selects the most active users, holds out one test
/// item per selected user and computes candidate sets and relevance scores
/// for them. All structures are fully built in memory before anything is
/// returned, a failure at any stage aborts the run.
pub fn user_candidates(
    interactions: &[Interaction],
    stats: &InteractionStats,
    pool_size: usize,
    top_n: usize,
    top_u: usize,
) -> Result<Vec<UserRecord>, PipelineError> {

    let matrix = interaction_matrix(interactions, stats.num_items(), stats.num_users())?;
    let similarities = Similarities::from_matrix(matrix);

    let mut profiles = user_profiles(interactions, stats.num_users())?;
    let users = select_active_users(&profiles, top_u);

    let mut test_items: Vec<u32> = Vec::with_capacity(users.len());
    for &user in users.iter() {
        test_items.push(hold_out_test_item(&mut profiles[user as usize], user)?);
    }

    println!(
        "Computing candidates for {} users over {} items (pool size {})",
        users.len(),
        similarities.num_items(),
        pool_size,
    );

    let pool = Pool::new(pool_size);
    let batch_start = Instant::now();

    let candidate_slots: Vec<Mutex<Vec<u32>>> =
        users.iter().map(|_| Mutex::new(Vec::new())).collect();

    pool.scoped(|scope| {
        for (slot, (&user, &test_item)) in
            candidate_slots.iter().zip(users.iter().zip(test_items.iter())) {

            let profile = &profiles[user as usize];
            let reference_to_similarities = &similarities;

            scope.execute(move || {
                let candidates =
                    candidate_set(reference_to_similarities, profile, Some(test_item), top_n);
                *slot.lock().unwrap() = candidates;
            });
        }
    });

    let candidates_per_user: Vec<Vec<u32>> = candidate_slots.into_iter()
        .map(|slot| slot.into_inner().unwrap())
        .collect();

    for ((&user, &test_item), candidates) in
        users.iter().zip(test_items.iter()).zip(candidates_per_user.iter()) {

        if profiles[user as usize].contains(&test_item) || candidates.contains(&test_item) {
            return Err(PipelineError::ConsistencyViolation { user, test_item });
        }
    }

    let relevance_slots: Vec<Mutex<Vec<f64>>> =
        users.iter().map(|_| Mutex::new(Vec::new())).collect();

    pool.scoped(|scope| {
        for (slot, (&user, candidates)) in
            relevance_slots.iter().zip(users.iter().zip(candidates_per_user.iter())) {

            let profile = &profiles[user as usize];
            let reference_to_similarities = &similarities;

            scope.execute(move || {
                let relevances =
                    relevance_scores(reference_to_similarities, profile, candidates);
                *slot.lock().unwrap() = relevances;
            });
        }
    });

    let relevances_per_user: Vec<Vec<f64>> = relevance_slots.into_iter()
        .map(|slot| slot.into_inner().unwrap())
        .collect();

    let duration_for_batch = utils::to_millis(batch_start.elapsed());
    println!("{} candidate sets computed, {}ms scoring time", users.len(), duration_for_batch);

    let records = users.into_iter()
        .zip(test_items.into_iter())
        .zip(candidates_per_user.into_iter().zip(relevances_per_user.into_iter()))
        .map(|((user, test_item), (candidates, relevances))| {
            UserRecord { user, test_item, candidates, relevances }
        })
        .collect();

    Ok(records)
}
