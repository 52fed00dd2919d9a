use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use avault::cli::commands::{self, decrypt_yaml::PolicyFlags};
use avault::cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Encrypt {
            ref file,
            ref output,
        } => commands::encrypt::execute(&cli, file, output.as_deref()),
        Commands::Decrypt {
            ref file,
            ref output,
        } => commands::decrypt::execute(&cli, file, output.as_deref()),
        Commands::View { ref file } => commands::view::execute(&cli, file),
        Commands::Rekey {
            ref file,
            ref new_vault_password_file,
        } => commands::rekey::execute(&cli, file, new_vault_password_file.as_ref()),
        Commands::IsEncrypted { ref file } => match commands::is_encrypted::execute(file) {
            Ok(false) => std::process::exit(1),
            other => other.map(|_| ()),
        },
        Commands::EncryptString {
            ref value,
            ref name,
        } => commands::encrypt_string::execute(&cli, value, name.as_deref()),
        Commands::DecryptYaml {
            ref file,
            aliases,
            ref allow_classes,
            ref allow_symbols,
        } => commands::decrypt_yaml::execute(
            &cli,
            file,
            PolicyFlags {
                aliases,
                allow_classes,
                allow_symbols,
            },
        ),
        Commands::Completions { ref shell } => commands::completions::execute(shell),
        Commands::Version => commands::version::execute(),
    };

    if let Err(e) = result {
        avault::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}

/// Log to stderr, filtered by `RUST_LOG` (default `warn`, or `debug` with `--verbose`).
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
