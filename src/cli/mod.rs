use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::{
    analysis::{Filters, filter::GenreFilter, recompute_view_models},
    config,
    domain::selection::{Endpoint, YearRange},
    ingest,
};

#[derive(Parser)]
#[command(name = "tracklens")]
#[command(version = "0.1")]
#[command(about = "Music catalog analytics")]
pub struct Cli {
    /// Path to the config TOML file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print summary statistics and rankings for the filtered catalog
    Stats {
        /// Genre to filter by ("All" disables the filter)
        #[arg(short, long, default_value = "All")]
        genre: String,

        /// First release year of the window
        #[arg(long)]
        from: Option<i32>,

        /// Last release year of the window
        #[arg(long)]
        to: Option<i32>,
    },
    /// List every genre present in the catalog
    Genres,
    /// Run the http server exposing the chart view-models
    Serve,
}

/// Entrypoint for CLI
pub fn run() {
    env_logger::init();

    let cli = Cli::parse();

    let cfg = config::Config::load(cli.config.to_str().unwrap()).unwrap();

    match &cli.command {
        Commands::Stats { genre, from, to } => {
            let catalog = ingest::spawn_load(cfg.catalog).wait_or_empty();

            let filters = Filters {
                genre: GenreFilter::from_selector(genre),
                range: build_range(*from, *to),
            };
            let models = recompute_view_models(&catalog, &filters);

            println!("Tracks: {}", models.summary.track_count);
            println!("Avg popularity: {:.1}", models.summary.avg_popularity);
            println!("Avg duration: {:.2} min", models.summary.avg_duration_minutes);

            if !models.genre_counts.is_empty() {
                println!("Genres by track count:");
                for bucket in &models.genre_counts {
                    println!("  {:>6}  {}", bucket.count, bucket.genre);
                }
            }

            if !models.top_artists.is_empty() {
                println!("Top artists by followers:");
                for artist in &models.top_artists {
                    println!("  {:>12}  {}", artist.followers, artist.label);
                }
            }

            if !models.top_tracks.is_empty() {
                println!("Top tracks by popularity:");
                for track in &models.top_tracks {
                    println!(
                        "  {:>2}. [{}] \"{}\" by {}",
                        track.rank, track.popularity, track.full_name, track.artist
                    );
                }
            }
        }

        Commands::Genres => {
            let catalog = ingest::spawn_load(cfg.catalog).wait_or_empty();

            for genre in catalog.distinct_sorted_genres() {
                println!("{genre}");
            }
        }

        Commands::Serve => {
            println!("Loading catalog...");
            let catalog = ingest::spawn_load(cfg.catalog).wait_or_empty();
            println!("Catalog ready: {} tracks", catalog.len());

            let http_server = crate::http::server::HttpServer::new(catalog, cfg.http);

            println!(
                "HTTP server running at http://{}:{}",
                http_server.config.bind_addr, http_server.config.port
            );
            http_server.run();
        }
    }
}

/// Turns the optional CLI year bounds into a range, reusing the
/// slider's clamp rules.
fn build_range(from: Option<i32>, to: Option<i32>) -> YearRange {
    let mut range = YearRange::full();
    if let Some(from) = from {
        range = range.set(Endpoint::Start, from as f64);
    }
    if let Some(to) = to {
        range = range.set(Endpoint::End, to as f64);
    }
    range
}
