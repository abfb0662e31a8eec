mod dump;
mod error;
mod generate;
mod metrics;

use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use clap::Parser;
use log::{error, info, warn};
use reporec::{filter_min_size, invert_preferences, ItemUniverse, PreferenceProvider, RecError,
              Recommender, RecommenderConfig};

use crate::dump::JsonDumpProvider;
use crate::error::CliError;
use crate::generate::CommunityGenerator;
use crate::metrics::Metrics;

/// Recommends repositories to a user from repositories starred by the same people.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// JSON dump of users and the repositories they starred. Synthetic users are generated when omitted.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Field of each dump document holding the starred repositories
    #[arg(long, default_value_t = String::from("repos"))]
    key: String,

    /// JSON configuration file. Flags below override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    hash_count: Option<usize>,

    #[arg(long)]
    band_size: Option<usize>,

    #[arg(long)]
    top_n: Option<usize>,

    #[arg(long)]
    min_similarity: Option<f64>,

    #[arg(long)]
    seed: Option<u64>,

    /// Only keep repositories starred by more than this many users
    #[arg(long, default_value_t = 0)]
    min_stars: usize,

    /// User to recommend repositories to. Defaults to the first user by name.
    #[arg(short, long)]
    user: Option<String>,

    #[arg(short, long, default_value_t = 10)]
    limit: usize,

    /// Rank neighbors with exact jaccard similarity instead of MinHash
    #[arg(long, default_value_t = false)]
    exact: bool,

    /// Report precision and recall of MinHash neighbors against exact ones
    #[arg(long, default_value_t = false)]
    compare: bool,

    #[arg(long, default_value_t = 20)]
    communities: usize,
}

fn load_config(args: &Args) -> Result<RecommenderConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path).map_err(|source| CliError::Io {
                path: path.clone(),
                source: source,
            })?;
            RecommenderConfig::from_json_str(&json)?
        }
        None => RecommenderConfig::default(),
    };
    if let Some(hash_count) = args.hash_count {
        config.hash_count = hash_count;
    }
    if let Some(band_size) = args.band_size {
        config.band_size = band_size;
    }
    if let Some(top_n) = args.top_n {
        config.top_n = top_n;
    }
    if let Some(min_similarity) = args.min_similarity {
        config.min_similarity = min_similarity;
    }
    if args.seed.is_some() {
        config.random_seed = args.seed;
    }
    config.validate()?;
    Ok(config)
}

fn run(args: &Args) -> Result<(), CliError> {
    let config = load_config(args)?;

    let user_repos = match &args.input {
        Some(path) => JsonDumpProvider::new(path, &args.key).preferences()?,
        None => {
            let generator = CommunityGenerator::new(args.communities, 50, 40, 12, 0.2,
                                                    config.random_seed.unwrap_or(0));
            generator.generate()
        }
    };
    println!("Loaded {} users", user_repos.len());

    let repo_users = filter_min_size(&invert_preferences(&user_repos), args.min_stars);
    println!("{} repositories starred by more than {} users", repo_users.len(), args.min_stars);

    let recommender = Recommender::new(config, ItemUniverse::from_preferences(&repo_users))?;
    println!("{}", recommender);

    let now = Instant::now();
    let similar_repos = if args.exact {
        recommender.similar_items_exact(&repo_users)?
    } else {
        let signatures = recommender.generate_signatures(&repo_users)?;
        info!("{}", signatures);
        recommender.similar_items(&repo_users, &signatures)?
    };
    println!("Elapsed millis {}. Similar repositories for {} repositories", now.elapsed().as_millis(), similar_repos.len());

    if args.compare {
        if args.exact {
            warn!("--compare has no effect together with --exact");
        } else {
            let exact = recommender.similar_items_exact(&repo_users)?;
            let mut metrics = Metrics::new();
            metrics.compare_tables(&similar_repos, &exact);
            println!("{:?}", metrics.get_result());
        }
    }

    let user = match &args.user {
        Some(user) => user.clone(),
        None => match user_repos.keys().min() {
            Some(user) => user.clone(),
            None => return Ok(()),
        },
    };
    let ranking = recommender
        .recommend_for_user(&user, &user_repos, &similar_repos)
        .map_err(|e| match e {
            RecError::MissingEntity { .. } => CliError::UnknownUser(user.clone()),
            e => CliError::from(e),
        })?;
    println!("Recommendations for {}", user);
    for scored in ranking.iter().take(args.limit) {
        println!("{:.4}\t{}", scored.score, scored.id);
    }
    Ok(())
}

fn main() {
    env_logger::init();
    info!("Beginning to calculate repository recommendations");

    let args = Args::parse();
    if let Err(e) = run(&args) {
        error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
