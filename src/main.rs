//! `mediastage-submit`: stage local image files into a product and submit it.
//!
//! ```text
//! mediastage-submit <product.json> [-o <out.json>] [main=<file>] [gallery=<file>] [color:<k>=<file>]...
//! mediastage-submit --write-config
//! ```
//!
//! The assembled product JSON is written to `<out.json>`, or stdout.
//! `--write-config` writes the config in effect to `$MEDIASTAGE_CONFIG` or the
//! default config path, so it can be edited.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use async_trait::async_trait;

use mediastage::{
    BucketId, HttpUploader, MediaConfig, MediaEditor, ProductRecord, ProductSaver, SaveError,
    SelectedFile,
};

/// Environment variable naming a config file to use instead of the default path.
const CONFIG_ENV: &str = "MEDIASTAGE_CONFIG";

/// Parsed command line.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Submit(SubmitArgs),
    WriteConfig,
}

#[derive(Debug, PartialEq, Eq)]
struct SubmitArgs {
    product: PathBuf,
    output: Option<PathBuf>,
    files: Vec<(BucketId, PathBuf)>,
}

fn usage() -> &'static str {
    "usage: mediastage-submit <product.json> [-o <out.json>] [main=<file>] [gallery=<file>] [color:<k>=<file>]...\n       mediastage-submit --write-config"
}

fn parse_bucket(name: &str) -> Option<BucketId> {
    match name {
        "main" => Some(BucketId::Main),
        "gallery" => Some(BucketId::Gallery),
        _ => name
            .strip_prefix("color:")
            .and_then(|k| k.parse().ok())
            .map(BucketId::Color),
    }
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Command, String> {
    let mut product = None;
    let mut output = None;
    let mut files = Vec::new();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        if arg == "--write-config" {
            return match args.next() {
                None if product.is_none() && files.is_empty() => Ok(Command::WriteConfig),
                _ => Err("--write-config takes no other arguments".to_string()),
            };
        } else if arg == "-o" || arg == "--output" {
            let path = args.next().ok_or("missing path after -o")?;
            output = Some(PathBuf::from(path));
        } else if let Some((bucket, path)) = arg.split_once('=') {
            let bucket = parse_bucket(bucket).ok_or_else(|| format!("unknown bucket '{}'", bucket))?;
            files.push((bucket, PathBuf::from(path)));
        } else if product.is_none() {
            product = Some(PathBuf::from(arg));
        } else {
            return Err(format!("unexpected argument '{}'", arg));
        }
    }

    Ok(Command::Submit(SubmitArgs {
        product: product.ok_or("missing product file")?,
        output,
        files,
    }))
}

fn write_config(config: &MediaConfig) -> Result<(), mediastage::ConfigError> {
    match std::env::var(CONFIG_ENV) {
        Ok(path) => config.save(Path::new(&path)),
        Err(_) => config.save_to_default_path(),
    }
}

fn load_config() -> MediaConfig {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        match MediaConfig::load(Path::new(&path)) {
            Ok(config) => return config,
            Err(e) => eprintln!("Ignoring {}={}: {}", CONFIG_ENV, path, e),
        }
    }
    MediaConfig::load_from_default_path().unwrap_or_default()
}

fn init_logging(config: &MediaConfig) {
    env_logger::Builder::new()
        .filter_level(config.log_level.to_level_filter())
        .parse_default_env()
        .init();
}

/// Writes the assembled product as pretty JSON.
struct JsonSaver {
    output: Option<PathBuf>,
}

#[async_trait]
impl ProductSaver for JsonSaver {
    async fn save(&self, record: ProductRecord) -> Result<(), SaveError> {
        let json = record.to_json().map_err(|e| SaveError::new(e.to_string()))?;
        match &self.output {
            Some(path) => {
                std::fs::write(path, json).map_err(|e| SaveError::new(e.to_string()))?;
                log::info!("💾 Wrote product to {:?}", path);
            }
            None => println!("{}", json),
        }
        Ok(())
    }
}

async fn run(args: SubmitArgs, config: MediaConfig) -> Result<(), Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(&args.product)?;
    let record = ProductRecord::from_json(&json)?;
    let uploader = HttpUploader::new(config.upload.to_options())?;
    let mut editor = MediaEditor::load(record, config);

    for (bucket, path) in &args.files {
        let file = SelectedFile::from_path(path)?;
        editor.add_files(*bucket, vec![file])?;
    }

    let saver = JsonSaver {
        output: args.output,
    };
    let report = editor.submit(&uploader, &saver).await?;
    log::info!("Uploaded {} image(s)", report.uploaded_count());
    editor.close();
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let command = match parse_args(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{}\n{}", e, usage());
            return ExitCode::from(2);
        }
    };

    let config = load_config();
    init_logging(&config);

    let result: Result<(), Box<dyn std::error::Error>> = match command {
        Command::WriteConfig => write_config(&config).map_err(Into::into),
        Command::Submit(args) => run(args, config).await,
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
