use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use clap::{Parser, Subcommand};
mod auth;
use scryptgate::{Gateway, Preset, ScryptOptions, params};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, clap::Args)]
struct CostArgs {
    /// Named cost preset: interactive, moderate or sensitive
    #[arg(long, env = "SCRYPTGATE_PRESET")]
    preset: Option<Preset>,

    /// JSON file holding an options mapping, e.g. {"N": 16384, "r": 8, "p": 1, "dkLen": 32}
    #[arg(long = "options", value_name = "PATH", env = "SCRYPTGATE_OPTIONS")]
    options_file: Option<PathBuf>,

    /// CPU/memory cost N (power of two, 2..=2^24)
    #[arg(short = 'N', long = "cost")]
    n: Option<i64>,

    /// Block size r (1..=256)
    #[arg(short = 'r', long = "block-size")]
    r: Option<i64>,

    /// Parallelization p (1..=256)
    #[arg(short = 'p', long = "parallelism")]
    p: Option<i64>,

    /// Derived key length in bytes (1..=64)
    #[arg(long = "dk-len")]
    dk_len: Option<i64>,
}

impl CostArgs {
    /// Flags override the options file, which overrides the preset.
    fn to_options(&self) -> Result<ScryptOptions> {
        let mut options = self.preset.map(ScryptOptions::from).unwrap_or_default();

        if let Some(path) = &self.options_file {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read options file {}", path.display()))?;
            let from_file = ScryptOptions::from_json(&json)
                .with_context(|| format!("invalid options file {}", path.display()))?;
            options = options.merge(from_file);
        }

        Ok(options.merge(ScryptOptions {
            n: self.n,
            r: self.r,
            p: self.p,
            dk_len: self.dk_len,
        }))
    }
}

#[derive(Debug, Parser)]
#[command(name = "scryptgate")]
#[command(version, about = "Validated scrypt key derivation.")]
struct Cli {
    /// Log filter, e.g. "debug" or "scryptgate=debug"
    #[arg(long, global = true, value_name = "FILTER", env = "SCRYPTGATE_LOG", default_value = "warn")]
    log: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Derives a key from a UTF-8 password and salt, printed as hex
    Derive {
        /// Salt as UTF-8 text (8..=32 bytes)
        #[arg(long, env = "SCRYPTGATE_SALT")]
        salt: String,

        /// Print the key as a JSON array of byte values instead of hex
        #[arg(long, default_value_t = false)]
        bytes: bool,

        #[command(flatten)]
        cost: CostArgs,
    },

    /// Derives a key from a base64 password and salt, printed as byte values
    #[command(name = "derive-b64")]
    DeriveB64 {
        /// Password as base64
        #[arg(long)]
        password: String,

        /// Salt as base64
        #[arg(long)]
        salt: String,

        #[command(flatten)]
        cost: CostArgs,
    },

    /// Checks cost parameters and prints the memory they need
    Check {
        #[command(flatten)]
        cost: CostArgs,
    },

    /// Prints a random salt
    Salt {
        /// Salt length in bytes
        #[arg(long, default_value_t = 16, value_parser = clap::value_parser!(u8).range(8..=32))]
        len: u8,

        /// Print as hex instead of base64
        #[arg(long = "hex", default_value_t = false)]
        as_hex: bool,
    },
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Cli::parse();
    init_tracing(&args.log);

    let gateway = Gateway::new();
    match args.command {
        Commands::Derive { salt, bytes, cost } => {
            let options = cost.to_options()?;
            let password = auth::read_password()?;
            if bytes {
                let key = gateway.call::<Vec<u8>>(
                    scryptgate::Input::Utf8,
                    &password,
                    &salt,
                    &options,
                    None,
                )?;
                println!("{}", serde_json::to_string(&key)?);
            } else {
                let key = gateway.scrypt_text(&password, &salt, &options, None)?;
                println!("{key}");
            }
        }
        Commands::DeriveB64 {
            password,
            salt,
            cost,
        } => {
            let options = cost.to_options()?;
            let key = gateway.scrypt_binary(&password, &salt, &options, None)?;
            println!("{}", serde_json::to_string(&key)?);
        }
        Commands::Check { cost } => {
            let options = cost.to_options()?;
            // Placeholder inputs that satisfy the length rules.
            let admitted = params::admit(b"check", &[0u8; params::MIN_SALT_LEN], &options)?;
            let memory = admitted.memory_cost();
            println!("N       {}", admitted.n());
            println!("r       {}", admitted.r());
            println!("p       {}", admitted.p());
            println!("dkLen   {}", admitted.dk_len());
            println!(
                "memory  {memory} bytes (~{:.1} MiB)",
                memory as f64 / (1024.0 * 1024.0)
            );
        }
        Commands::Salt { len, as_hex } => {
            let mut salt = vec![0u8; usize::from(len)];
            getrandom::fill(&mut salt)
                .map_err(|e| anyhow::anyhow!("OS random generator unavailable: {e}"))?;
            if as_hex {
                println!("{}", hex::encode(&salt));
            } else {
                println!("{}", STANDARD.encode(&salt));
            }
        }
    }

    Ok(())
}
