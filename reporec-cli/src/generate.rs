use ahash::AHashSet;
use rand::distributions::{Distribution, Uniform};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_pcg::Pcg64;
use rayon::prelude::*;
use reporec::Preferences;

/// Generates users that star repositories the way communities do: every
/// community has its own pool of repositories, and each of its users stars
/// `stars_per_user` of them, a fraction `noise` of which is replaced by
/// repositories picked from the whole catalog.
///
/// Users of one community end up with overlapping sets, so repositories of
/// one pool are similar to each other and dissimilar to other pools.
/// The output only depends on the parameters and the seed.
pub struct CommunityGenerator {
    pub num_communities: usize,
    pub users_per_community: usize,
    pub repos_per_community: usize,
    pub stars_per_user: usize,
    pub noise: f64,
    pub seed: u64,
}

impl CommunityGenerator {

    pub fn new(num_communities: usize, users_per_community: usize,
               repos_per_community: usize, stars_per_user: usize,
               noise: f64, seed: u64) -> Self {
        CommunityGenerator {
            num_communities: num_communities,
            users_per_community: users_per_community,
            repos_per_community: repos_per_community.max(1),
            stars_per_user: stars_per_user.min(repos_per_community),
            noise: noise.clamp(0.0, 1.0),
            seed: seed,
        }
    }

    pub fn repo_name(community: usize, repo: usize) -> String {
        format!("community{}/repo{}", community, repo)
    }

    pub fn generate(&self) -> Preferences {
        (0..self.num_communities)
            .into_par_iter()
            .flat_map_iter(|community| self.generate_community(community))
            .collect::<Vec<_>>()
            .into_iter()
            .collect()
    }

    /// Every community draws from its own generator so the result does not
    /// depend on how rayon schedules the communities.
    fn generate_community(&self, community: usize) -> Vec<(String, AHashSet<String>)> {
        let mut rng = Pcg64::seed_from_u64(self.seed.wrapping_add(community as u64));
        let pool: Vec<usize> = (0..self.repos_per_community).collect();
        let communities = Uniform::new(0, self.num_communities);
        let repos = Uniform::new(0, self.repos_per_community);
        let num_noisy = (self.stars_per_user as f64 * self.noise).round() as usize;

        (0..self.users_per_community)
            .map(|user| {
                let mut starred: AHashSet<String> = pool
                    .choose_multiple(&mut rng, self.stars_per_user - num_noisy)
                    .map(|repo| Self::repo_name(community, *repo))
                    .collect();
                for _ in 0..num_noisy {
                    starred.insert(Self::repo_name(communities.sample(&mut rng), repos.sample(&mut rng)));
                }
                (format!("user{}-{}", community, user), starred)
            })
            .collect()
    }
}
