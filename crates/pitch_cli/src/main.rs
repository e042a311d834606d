use clap::{Args, Parser, Subcommand};
use pitch_core::{ArticleStorage, EmbeddingModel, GeographyFilter, OutletType};
use pitch_inference::EmbeddingGenerator;
use pitch_search::{MockContactEnricher, SearchRequest, SearchResponse, SearchService};
use pitch_web::AppState;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

mod logging;
mod seed;

use logging::init_logging;

#[derive(Parser, Debug)]
#[command(author, version, about = "Match a story brief to the reporters covering it", long_about = None)]
pub struct Cli {
    #[arg(long, global = true, env = "PITCH_STORAGE", default_value = "memory", help = "Storage backend: memory (default), sqlite")]
    storage: String,
    #[arg(long, global = true, env = "PITCH_BACKEND_URL")]
    backend_url: Option<String>,
    #[arg(long, global = true, env = "PITCH_MODEL", default_value = "openai", help = "Embedding model: openai (default), dummy")]
    model: String,
    #[arg(long, global = true, env = "PITCH_MODEL_URL")]
    model_url: Option<String>,
    /// Model name sent to an OpenAI-compatible server (default text-embedding-3-small).
    #[arg(long, global = true, env = "PITCH_EMBEDDING_MODEL")]
    embedding_model: Option<String>,
    #[arg(long, global = true, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API.
    Serve {
        #[arg(long, env = "PORT", default_value_t = 4000)]
        port: u16,
        #[command(flatten)]
        seed: SeedArgs,
    },
    /// Rank reporters for a brief and print them.
    Search(SearchArgs),
    /// Load seed articles from a JSON file.
    Import {
        file: PathBuf,
    },
    /// Embed stored articles that have no vector yet.
    Embed {
        #[arg(long, default_value_t = 100)]
        batch_size: usize,
    },
}

#[derive(Args, Debug)]
struct SeedArgs {
    /// Import and embed this seed file before starting (handy with the memory backend).
    #[arg(long)]
    seed: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct SearchArgs {
    brief: String,
    #[arg(long = "outlet-type")]
    outlet_types: Vec<OutletType>,
    #[arg(long)]
    geography: Vec<GeographyFilter>,
    #[arg(long)]
    focus: Option<String>,
    #[arg(long)]
    competitors: Option<String>,
    #[arg(long = "refine")]
    refinements: Vec<String>,
    /// Print the raw JSON response.
    #[arg(long)]
    json: bool,
    #[command(flatten)]
    seed: SeedArgs,
}

impl SearchArgs {
    fn request(&self) -> SearchRequest {
        SearchRequest {
            brief: self.brief.clone(),
            outlet_types: self.outlet_types.clone(),
            geography: self.geography.clone(),
            focus_publications: self.focus.clone(),
            competitors: self.competitors.clone(),
            refinements: self.refinements.clone(),
        }
    }
}

struct Runtime {
    storage: Arc<dyn ArticleStorage>,
    model: Arc<dyn EmbeddingModel>,
}

impl Runtime {
    async fn open(cli: &Cli) -> anyhow::Result<Self> {
        let storage = pitch_storage::create_storage(&cli.storage, cli.backend_url.as_deref()).await?;
        info!("💾 Storage ready (using {})", cli.storage);

        let config = pitch_inference::Config {
            api_key: cli.api_key.clone(),
            model_name: Some(cli.model.clone()),
            model_url: cli.model_url.clone(),
            embedding_model: cli.embedding_model.clone(),
            ..pitch_inference::Config::default()
        };
        let model = pitch_inference::create_model(Some(config)).await?;
        info!("🧠 Embedding model ready (using {})", model.name());

        Ok(Self { storage, model })
    }

    async fn seed(&self, args: &SeedArgs) -> anyhow::Result<()> {
        let Some(path) = &args.seed else {
            return Ok(());
        };
        let articles = seed::read_seed_file(path).await?;
        seed::import_articles(self.storage.as_ref(), &articles).await?;
        self.embed(100).await?;
        Ok(())
    }

    async fn embed(&self, batch_size: usize) -> anyhow::Result<usize> {
        let generator = EmbeddingGenerator::new(self.model.clone());
        Ok(seed::backfill_embeddings(self.storage.as_ref(), &generator, batch_size).await?)
    }

    fn search_service(&self) -> SearchService {
        SearchService::new(self.model.clone(), self.storage.clone(), Arc::new(MockContactEnricher::new()))
    }
}

fn print_table(response: &SearchResponse) {
    if response.reporters.is_empty() {
        println!("No matching reporters.");
        return;
    }
    for (rank, ranked) in response.reporters.iter().enumerate() {
        let reporter = &ranked.reporter;
        println!(
            "{:>2}. {} ({}) score {:.3} {}",
            rank + 1,
            reporter.name,
            reporter.outlet,
            ranked.score,
            reporter.email.as_deref().unwrap_or("-")
        );
        println!("    {}", ranked.justification);
        for article in &ranked.articles {
            println!("    - {} [{:.3}] {}", article.title, article.similarity, article.url);
        }
    }
    println!("{} reporter(s)", response.total);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    init_logging();
    let cli = Cli::parse();
    let runtime = Runtime::open(&cli).await?;

    match &cli.command {
        Commands::Serve { port, seed } => {
            runtime.seed(seed).await?;
            let state = AppState::new(runtime.search_service());
            pitch_web::serve(state, &format!("0.0.0.0:{}", port)).await?;
        }
        Commands::Search(args) => {
            runtime.seed(&args.seed).await?;
            let service = runtime.search_service();
            let response = service.search(&args.request()).await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                print_table(&response);
            }
        }
        Commands::Import { file } => {
            let articles = seed::read_seed_file(file).await?;
            let report = seed::import_articles(runtime.storage.as_ref(), &articles).await?;
            println!(
                "Imported {} article(s), skipped {} known url(s), rejected {} reused id(s)",
                report.inserted, report.skipped, report.id_conflicts
            );
        }
        Commands::Embed { batch_size } => {
            let embedded = runtime.embed(*batch_size).await?;
            println!("Embedded {} article(s)", embedded);
        }
    }

    runtime.storage.shutdown().await?;
    Ok(())
}
