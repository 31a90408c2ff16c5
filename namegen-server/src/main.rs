use std::path::PathBuf;
use std::sync::RwLock;

use actix_web::middleware::Logger;
use actix_web::{get, put, web, App, HttpResponse, HttpServer, Responder};
use clap::Parser;
use log::{info, warn};

use serde::Deserialize;
use namegen_core::{GenerateOptions, MissingContext, NameGenError, Registry};

/// Command-line configuration, with environment fallbacks.
#[derive(Parser, Debug)]
#[command(name = "namegen-server", about = "HTTP front-end for the Markov name generator")]
struct ServerConfig {
	#[arg(long, env = "NAMEGEN_HOST", default_value = "127.0.0.1")]
	host: String,

	#[arg(long, env = "NAMEGEN_PORT", default_value_t = 5000)]
	port: u16,

	/// Directory holding `<variant>.dat` corpus files
	#[arg(long, env = "NAMEGEN_DATA_DIR", default_value = "./data")]
	data_dir: PathBuf,
}

/// Query parameters of `/v1/generate`
#[derive(Deserialize)]
struct GenerateParams {
	variant: String,
	nb_try: Option<usize>,
	placeholder: Option<char>,
	strict: Option<bool>,
}

#[derive(Deserialize)]
struct VariantQuery {
	variant: Option<String>,
}

#[derive(Deserialize)]
struct LoadQuery {
	names: Option<String>,
}

struct SharedData {
	registry: RwLock<Registry>,
	data_dir: PathBuf,
}

impl GenerateParams {
	/// Builds generation options from the query.
	fn options(&self) -> Result<GenerateOptions, NameGenError> {
		let mut options = GenerateOptions::new();
		options.nb_try = self.nb_try.unwrap_or(0);
		match (self.strict.unwrap_or(false), self.placeholder) {
			(true, Some(_)) => {
				return Err(NameGenError::InvalidOption("strict and placeholder are exclusive".to_owned()));
			}
			(true, None) => options.set_missing_context(MissingContext::Fail)?,
			(false, Some(c)) => options.set_placeholder(c)?,
			(false, None) => (),
		}
		Ok(options)
	}
}

/// Maps a library error to an HTTP response.
fn error_response(e: NameGenError) -> HttpResponse {
	match e {
		NameGenError::UnknownVariant(_) => HttpResponse::NotFound().body(e.to_string()),
		NameGenError::NoData(_) | NameGenError::MissingContext(_) => {
			HttpResponse::UnprocessableEntity().body(e.to_string())
		}
		NameGenError::InvalidOption(_) | NameGenError::InvalidLabel(_) => {
			HttpResponse::BadRequest().body(e.to_string())
		}
		NameGenError::AlreadyLoaded(_) => HttpResponse::Conflict().body(e.to_string()),
		NameGenError::Io(_) | NameGenError::Serialization(_) => {
			warn!("{e}");
			HttpResponse::InternalServerError().body(e.to_string())
		}
	}
}

/// HTTP GET endpoint `/v1/generate`
///
/// Generates a name for the requested variant.
/// Returns the generated name as the response body.
#[get("/v1/generate")]
async fn get_generated(data: web::Data<SharedData>, query: web::Query<GenerateParams>) -> impl Responder {
	let options = match query.options() {
		Ok(o) => o,
		Err(e) => return error_response(e),
	};

	let registry = match data.registry.read() {
		Ok(r) => r,
		Err(_) => return HttpResponse::InternalServerError().body("Registry lock failed"),
	};

	match registry.generate_with(&query.variant, &options, &mut rand::rng()) {
		Ok(name) => HttpResponse::Ok().body(name),
		Err(e) => error_response(e),
	}
}

#[get("/v1/variants")]
async fn get_variants(data: web::Data<SharedData>) -> impl Responder {
	let registry = match data.registry.read() {
		Ok(r) => r,
		Err(_) => return HttpResponse::InternalServerError().body("Registry lock failed"),
	};
	let mut variants = registry.variants();
	variants.sort();
	HttpResponse::Ok().body(variants.join("\n"))
}

#[get("/v1/corpora")]
async fn get_corpora(data: web::Data<SharedData>) -> impl Responder {
	match Registry::list_corpora(&data.data_dir) {
		Ok(labels) => HttpResponse::Ok().body(labels.join("\n")),
		Err(e) => error_response(e),
	}
}

/// HTTP PUT endpoint `/v1/seed`
///
/// Seeds (or replaces) a variant from a newline separated body.
#[put("/v1/seed")]
async fn put_seed(data: web::Data<SharedData>, query: web::Query<VariantQuery>, body: String) -> impl Responder {
	let label = match &query.variant {
		Some(s) if !s.trim().is_empty() => s.trim(),
		_ => return HttpResponse::BadRequest().body("Missing or empty variant name"),
	};

	let names: Vec<&str> = body.lines().map(str::trim).filter(|s| !s.is_empty()).collect();
	if names.is_empty() {
		return HttpResponse::BadRequest().body("No names provided");
	}

	let mut registry = match data.registry.write() {
		Ok(r) => r,
		Err(_) => return HttpResponse::InternalServerError().body("Registry lock failed"),
	};
	registry.seed(label, &names);
	info!("variant {label} seeded with {} names", names.len());

	HttpResponse::Ok().body("Variant seeded successfully")
}

/// HTTP PUT endpoint `/v1/load`
///
/// Loads comma separated corpus files from the data directory.
/// Either every corpus is loaded or none is.
#[put("/v1/load")]
async fn put_load(data: web::Data<SharedData>, query: web::Query<LoadQuery>) -> impl Responder {
	let query_names = match &query.names {
		Some(s) if !s.trim().is_empty() => s.trim(),
		_ => return HttpResponse::BadRequest().body("Missing or empty corpus name"),
	};
	let names: Vec<&str> = query_names.split(',').map(str::trim).filter(|s| !s.is_empty()).collect();

	let mut registry = match data.registry.write() {
		Ok(r) => r,
		Err(_) => return HttpResponse::InternalServerError().body("Registry lock failed"),
	};

	match registry.load_corpora(&data.data_dir, &names) {
		Ok(loaded) => {
			info!("loaded corpora: {}", loaded.join(", "));
			HttpResponse::Ok().body("Corpora loaded successfully")
		}
		Err(e) => error_response(e),
	}
}

/// Main entry point for the server.
///
/// Loads every corpus of the data directory when it exists, wraps the
/// registry in a `RwLock` and starts an Actix-web HTTP server.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
	let config = ServerConfig::parse();

	let registry = if config.data_dir.is_dir() {
		Registry::from_dir(&config.data_dir).map_err(std::io::Error::other)?
	} else {
		warn!("data directory {} not found, starting empty", config.data_dir.display());
		Registry::new()
	};
	info!("{} variants loaded", registry.len());

	let shared = web::Data::new(SharedData {
		registry: RwLock::new(registry),
		data_dir: config.data_dir,
	});

	HttpServer::new(move || {
		App::new()
			.wrap(Logger::default())
			.app_data(shared.clone())
			.service(get_generated)
			.service(get_variants)
			.service(get_corpora)
			.service(put_seed)
			.service(put_load)
	})
		.bind((config.host.as_str(), config.port))?
		.run()
		.await
}
