use types::Interaction;

/// Basic statistics of the interaction data, computed in a single pass. The
/// matrix dimensions are derived from the largest observed ids, so item and
/// user ids are expected to be reasonably dense non-negative integers.
pub struct InteractionStats {
    num_items: usize,
    num_users: usize,
    num_interactions: u64,
}

impl InteractionStats {

    pub fn num_items(&self) -> usize {
        self.num_items
    }

    pub fn num_users(&self) -> usize {
        self.num_users
    }

    pub fn num_interactions(&self) -> u64 {
        self.num_interactions
    }
}

impl InteractionStats {

    pub fn from(interactions: &[Interaction]) -> Self {

        let mut num_items: usize = 0;
        let mut num_users: usize = 0;
        let mut num_interactions: u64 = 0;

        for interaction in interactions {

            if interaction.item as usize >= num_items {
                num_items = interaction.item as usize + 1;
            }

            if interaction.user as usize >= num_users {
                num_users = interaction.user as usize + 1;
            }

            num_interactions += 1;
        }

        InteractionStats { num_items, num_users, num_interactions }
    }
}


#[cfg(test)]
mod tests {

    use stats::InteractionStats;
    use types::Interaction;

    #[test]
    fn dimensions_from_largest_observed_ids() {
        let interactions = vec![
            Interaction::unweighted(0, 0),
            Interaction::unweighted(4, 1),
            Interaction::unweighted(2, 7),
        ];

        let stats = InteractionStats::from(&interactions);

        assert_eq!(stats.num_items(), 5);
        assert_eq!(stats.num_users(), 8);
        assert_eq!(stats.num_interactions(), 3);
    }

    #[test]
    fn empty_input() {
        let stats = InteractionStats::from(&[]);

        assert_eq!(stats.num_items(), 0);
        assert_eq!(stats.num_users(), 0);
        assert_eq!(stats.num_interactions(), 0);
    }
}
