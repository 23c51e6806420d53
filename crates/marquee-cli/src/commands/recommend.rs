use anyhow::Result;
use marquee_search::{Recommendation, Recommender};

use super::load_library;
use crate::config::Config;

/// How many near-miss titles to offer when a title is not found.
const SUGGESTION_LIMIT: usize = 5;

/// Print the movies most similar to `title`.
pub fn run_recommend(
    config: &Config,
    title: &str,
    top_k: Option<usize>,
    show_scores: bool,
    json: bool,
) -> Result<()> {
    let library = load_library(config)?;
    let recommender = Recommender::new(&library).with_top_k(top_k.unwrap_or(config.top_k));

    let recommendations = match recommender.recommend_scored(title, recommender.top_k()) {
        Ok(recs) => recs,
        Err(e) if e.is_not_found() => {
            let suggestions = library.catalog().suggest(title, SUGGESTION_LIMIT);
            if !suggestions.is_empty() {
                eprintln!("Did you mean:");
                for suggestion in suggestions {
                    eprintln!("  {}", suggestion);
                }
                eprintln!();
            }
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&recommendations)?);
    } else {
        print_recommendations(title, &recommendations, show_scores);
    }

    Ok(())
}

fn print_recommendations(title: &str, recommendations: &[Recommendation], show_scores: bool) {
    if recommendations.is_empty() {
        println!("No other movies to recommend for \"{}\".", title);
        return;
    }

    println!("Because you picked \"{}\":\n", title);
    for (rank, rec) in recommendations.iter().enumerate() {
        if show_scores {
            println!("  {:>2}. {} ({:.4})", rank + 1, rec.title, rec.score);
        } else {
            println!("  {:>2}. {}", rank + 1, rec.title);
        }
    }
}
