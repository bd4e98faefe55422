use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, put, web};
use clap::Parser;
use log::{error, info};
use serde::{Deserialize, Serialize};

use rs_markov_core::io::{CORPUS_EXTENSION, list_corpora, normalize_folder};
use rs_markov_core::{
	BuildConfig, Chain, ChainBuilder, ChainError, ChainStats, GenerationConfig, SequenceGenerator, render,
};

/// Upper bound for `count` on `/v1/generate`.
const MAX_COUNT: usize = 20;

/// Serves Markov chain sequences over HTTP.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
	/// Directory holding `<name>.txt` corpora
	#[arg(long, env = "MARKOV_DATA_DIR", default_value = "./data")]
	data_dir: String,

	/// Corpus name loaded at startup
	#[arg(long, env = "MARKOV_CORPUS")]
	corpus: Option<String>,

	#[arg(long, env = "MARKOV_HOST", default_value = "127.0.0.1")]
	host: String,

	#[arg(long, env = "MARKOV_PORT", default_value_t = 5000)]
	port: u16,

	/// Tokenization workers (defaults to the number of CPUs)
	#[arg(long, env = "MARKOV_JOBS")]
	jobs: Option<usize>,

	/// Walks attempted per sequence before giving up
	#[arg(long, env = "MARKOV_MAX_ATTEMPTS")]
	max_attempts: Option<usize>,
}

/// Query parameters for the `/v1/generate` endpoint
#[derive(Deserialize)]
struct GenerateParams {
	count: Option<usize>,
	json: Option<bool>,
}

#[derive(Deserialize)]
struct LoadQuery {
	name: Option<String>,
}

#[derive(Serialize)]
struct StatsResponse<'a> {
	corpus: &'a str,
	#[serde(flatten)]
	stats: ChainStats,
}

/// A chain together with the corpus it was built from.
struct LoadedChain {
	name: String,
	chain: Arc<Chain>,
}

/// State shared by every worker of the server.
///
/// The chain is swapped as a whole, readers never see a partial build.
struct SharedData {
	data_dir: PathBuf,
	build: BuildConfig,
	generation: GenerationConfig,
	loaded: RwLock<Option<LoadedChain>>,
}

impl SharedData {
	fn corpus_path(&self, name: &str) -> PathBuf {
		self.data_dir.join(format!("{name}.{CORPUS_EXTENSION}"))
	}

	fn current(&self) -> Result<(String, Arc<Chain>), HttpResponse> {
		let loaded = self
			.loaded
			.read()
			.map_err(|_| HttpResponse::InternalServerError().body("Model lock failed"))?;
		match loaded.as_ref() {
			Some(loaded) => Ok((loaded.name.clone(), Arc::clone(&loaded.chain))),
			None => Err(HttpResponse::ServiceUnavailable().body(ChainError::EmptyModel.to_string())),
		}
	}
}

/// HTTP GET endpoint `/v1/generate`
///
/// Returns `count` rendered sequences, one per line, or a JSON array of
/// token arrays when `json=true`.
#[get("/v1/generate")]
async fn get_generated(data: web::Data<SharedData>, query: web::Query<GenerateParams>) -> impl Responder {
	let count = query.count.unwrap_or(1);
	if count == 0 || count > MAX_COUNT {
		return HttpResponse::BadRequest().body(format!("count must be between 1 and {MAX_COUNT}"));
	}

	let chain = match data.current() {
		Ok((_, chain)) => chain,
		Err(response) => return response,
	};
	let generator = match SequenceGenerator::new(&chain, data.generation.clone()) {
		Ok(generator) => generator,
		Err(e) => return HttpResponse::InternalServerError().body(e.to_string()),
	};

	let mut sequences = Vec::with_capacity(count);
	for _ in 0..count {
		match generator.generate() {
			Ok(tokens) => sequences.push(tokens),
			Err(e) => return HttpResponse::InternalServerError().body(e.to_string()),
		}
	}

	if query.json.unwrap_or(false) {
		HttpResponse::Ok().json(sequences)
	} else {
		let text: Vec<String> = sequences.iter().map(|tokens| render(tokens.as_slice())).collect();
		HttpResponse::Ok().body(text.join("\n"))
	}
}

#[get("/v1/corpora")]
async fn get_corpora(data: web::Data<SharedData>) -> impl Responder {
	match list_corpora(&data.data_dir, CORPUS_EXTENSION) {
		Ok(names) => HttpResponse::Ok().body(names.join("\n")),
		Err(_) => HttpResponse::InternalServerError().body("Failed to list corpora"),
	}
}

#[get("/v1/stats")]
async fn get_stats(data: web::Data<SharedData>) -> impl Responder {
	match data.current() {
		Ok((name, chain)) => HttpResponse::Ok().json(StatsResponse { corpus: &name, stats: chain.stats() }),
		Err(response) => response,
	}
}

/// HTTP PUT endpoint `/v1/load`
///
/// Builds the named corpus on the blocking pool and replaces the current
/// chain only if the build succeeds.
#[put("/v1/load")]
async fn put_load(data: web::Data<SharedData>, query: web::Query<LoadQuery>) -> impl Responder {
	let name = match &query.name {
		Some(s) if !s.trim().is_empty() => s.trim().to_owned(),
		_ => return HttpResponse::BadRequest().body("Missing or empty corpus name"),
	};
	if name.contains(['/', '\\']) || name.starts_with('.') {
		return HttpResponse::BadRequest().body("Invalid corpus name");
	}

	let path = data.corpus_path(&name);
	if !path.is_file() {
		return HttpResponse::NotFound().body(format!("Unknown corpus: {name}"));
	}

	let builder = ChainBuilder::new(data.build.clone());
	let chain = match web::block(move || builder.build_from_path(path)).await {
		Ok(Ok(chain)) => chain,
		Ok(Err(e)) => {
			error!("failed to build {name}: {e}");
			return HttpResponse::InternalServerError().body(format!("Failed to build chain: {e}"));
		}
		Err(_) => return HttpResponse::InternalServerError().body("Build task failed"),
	};

	let mut loaded = match data.loaded.write() {
		Ok(l) => l,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	*loaded = Some(LoadedChain { name: name.clone(), chain: Arc::new(chain) });
	info!("corpus {name} loaded");

	HttpResponse::Ok().body("Corpus loaded successfully")
}

/// Main entry point for the server.
///
/// Optionally builds the startup corpus, then serves the chain on
/// `host:port` until interrupted.
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
	let cli = Cli::parse();

	let build = BuildConfig { concurrency: cli.jobs };
	build.validate()?;
	let mut generation = GenerationConfig::default();
	if let Some(max_attempts) = cli.max_attempts {
		generation.max_attempts = max_attempts;
	}
	generation.validate()?;

	let mut shared_data = SharedData {
		data_dir: normalize_folder(&cli.data_dir),
		build,
		generation,
		loaded: RwLock::new(None),
	};

	if let Some(name) = &cli.corpus {
		let path = shared_data.corpus_path(name);
		let chain = ChainBuilder::new(shared_data.build.clone()).build_from_path(&path)?;
		info!("corpus {name} loaded from {}", path.display());
		shared_data.loaded = RwLock::new(Some(LoadedChain { name: name.clone(), chain: Arc::new(chain) }));
	}

	let shared_data = web::Data::new(shared_data);
	info!("listening on {}:{}", cli.host, cli.port);

	HttpServer::new(move || {
		App::new()
			.wrap(Cors::permissive())
			.app_data(shared_data.clone())
			.service(get_generated)
			.service(get_corpora)
			.service(get_stats)
			.service(put_load)
	})
		.bind((cli.host.as_str(), cli.port))?
		.run()
		.await?;

	Ok(())
}
