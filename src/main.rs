use clap::{Parser, Subcommand};
mod auth;
use saltpeter::{CipherAlgorithm, Config, Digest, Hasher};

#[derive(Debug, clap::Args)]
struct HashingArgs {
    /// Derived hash length in bytes (default: 128)
    #[arg(long = "hash-length", global = true)]
    hash_length: Option<usize>,

    /// Lower bound for the per-record iteration count (default: 12000)
    #[arg(long = "min-iterations", global = true)]
    min_iterations: Option<u32>,

    /// Upper bound for the per-record iteration count (default: 15000)
    #[arg(long = "max-iterations", global = true)]
    max_iterations: Option<u32>,

    /// Length of the salt text inside the encrypted payload (default: 32)
    #[arg(long = "salt-min-length", global = true)]
    salt_min_length: Option<usize>,

    /// Digest for the derivation: sha256 or sha512 (default: sha512)
    #[arg(long, global = true)]
    digest: Option<Digest>,

    /// Cipher sealing the salt: aes256gcm or xchacha20poly1305 (default: aes256gcm)
    #[arg(long, global = true)]
    algorithm: Option<CipherAlgorithm>,
}

impl HashingArgs {
    fn to_config(&self, key: String) -> Config {
        let default = Config::default();

        Config::builder()
            .key(key)
            .hash_length(self.hash_length.unwrap_or(default.hash_length()))
            .iterations(
                self.min_iterations.unwrap_or(default.iterations().min()),
                self.max_iterations.unwrap_or(default.iterations().max()),
            )
            .unencrypted_salt_min_length(
                self.salt_min_length.unwrap_or(default.unencrypted_salt_min_length()),
            )
            .digest(self.digest.unwrap_or(default.digest()))
            .algorithm(self.algorithm.unwrap_or(default.algorithm()))
            .build()
    }
}

#[derive(Debug, Parser)]
#[command(name = "saltpeter")]
#[command(
    version,
    about = "Salted, iterated, peppered password hashing for credentials at rest."
)]
struct Cli {
    ///Key the salt payloads are sealed under
    #[arg(
        long,
        global = true,
        value_name = "KEY",
        env = "SALTPETER_KEY",
        hide_env_values = true
    )]
    key: Option<String>,

    #[command(flatten)]
    hashing: HashingArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Hashes a password and prints the credential as JSON
    Hash,

    /// Verifies a password against a stored salt and hash
    #[command(arg_required_else_help = true)]
    Verify { salt: String, hash: String },

    /// Shows the iteration count sealed inside a stored salt
    #[command(arg_required_else_help = true)]
    Inspect { salt: String },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let args = Cli::parse();

    let Some(key) = args.key.clone() else {
        return Err("an encryption key is required (--key or SALTPETER_KEY)".into());
    };
    let hasher = Hasher::new(args.hashing.to_config(key));

    match args.command {
        Commands::Hash => {
            let password = auth::read_password()?;
            let credential = hasher.hash(&password)?;
            println!("{}", serde_json::to_string(&credential)?);
        }
        Commands::Verify { salt, hash } => {
            let password = auth::read_password()?;
            let ok = hasher.verify(&password, &salt, &hash)?;
            drop(password);

            if ok {
                println!("password verified");
            } else {
                eprintln!("password mismatch");
                std::process::exit(1);
            }
        }
        Commands::Inspect { salt } => {
            let iterations = hasher.recover_iterations(&salt)?;
            println!("{iterations}");
        }
    }

    Ok(())
}
