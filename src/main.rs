//! ssl-setup - obtain a TLS certificate via certbot and install it for the
//! SSL-terminating service.

use std::env;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use tracing::error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ssl_setup::config::Settings;
use ssl_setup::error::SetupResult;
use ssl_setup::provision::{Outcome, Provisioner};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const NAME: &str = env!("CARGO_PKG_NAME");

/// Default configuration file location.
const DEFAULT_CONFIG_PATH: &str = "/etc/ssl-setup/config.toml";

fn main() -> ExitCode {
    // Parse command line arguments (simple std::env approach)
    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return ExitCode::SUCCESS;
    }

    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("{} {}", NAME, VERSION);
        return ExitCode::SUCCESS;
    }

    let config_path = get_arg(&args, "--config", "-c").unwrap_or_else(|| {
        DEFAULT_CONFIG_PATH.to_string()
    });

    // Load configuration (defaults apply when no config file is present)
    let settings = match Settings::load_or_default(&config_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Initialize logging based on configuration
    if let Err(e) = init_logging(&settings) {
        eprintln!("Error initializing logging: {}", e);
        return ExitCode::FAILURE;
    }

    // Domain and email come from flags or interactive prompts
    let domain = match get_arg(&args, "--domain", "-d") {
        Some(d) => d,
        None => match prompt("Enter the domain: ") {
            Ok(d) => d,
            Err(e) => {
                eprintln!("Error reading domain: {}", e);
                return ExitCode::FAILURE;
            }
        },
    };

    let email = match get_arg(&args, "--email", "-e") {
        Some(e) => e,
        None => match prompt("Enter the email address: ") {
            Ok(e) => e,
            Err(e) => {
                eprintln!("Error reading email: {}", e);
                return ExitCode::FAILURE;
            }
        },
    };

    let provisioner = Provisioner::new(settings);

    match provisioner.provision(&domain, &email) {
        Ok(Outcome::AlreadyIssued { cert, key }) => {
            println!("Certificate and key already exist.");
            println!("Certificate: {}", cert.display());
            println!("Key: {}", key.display());
            ExitCode::SUCCESS
        }
        Ok(Outcome::Installed {
            cert,
            key,
            client_output,
        }) => {
            println!("Certificate provisioned successfully.");
            if !client_output.trim().is_empty() {
                println!("{}", client_output.trim_end());
            }
            println!("Certificate copied to {}", cert.display());
            println!("Key copied to {}", key.display());
            ExitCode::SUCCESS
        }
        Ok(Outcome::RequestFailed { stderr }) => {
            println!("Failed to provision certificate.");
            if !stderr.trim().is_empty() {
                println!("{}", stderr.trim_end());
            }
            ExitCode::FAILURE
        }
        Err(e) => {
            error!(error = %e, "Provisioning failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Print a prompt and read one trimmed line from stdin.
fn prompt(label: &str) -> SetupResult<String> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Print help message.
fn print_help() {
    println!(
        r#"{} {}
Obtain a TLS certificate via certbot and install it for the SSL-terminating service.

USAGE:
    {} [OPTIONS]

OPTIONS:
    -c, --config <PATH>    Path to configuration file
                           [default: {}]
    -d, --domain <DOMAIN>  Domain to provision (prompted for if omitted)
    -e, --email <EMAIL>    Registration email (prompted for if omitted)
    -h, --help             Print help information
    -V, --version          Print version information
"#,
        NAME, VERSION, NAME, DEFAULT_CONFIG_PATH
    );
}

/// Get the value following a `--long`/`-short` flag, or `--long=value`.
fn get_arg(args: &[String], long: &str, short: &str) -> Option<String> {
    for (i, arg) in args.iter().enumerate() {
        if (arg == long || arg == short) && i + 1 < args.len() {
            return Some(args[i + 1].clone());
        }
        if let Some(value) = arg.strip_prefix(&format!("{}=", long)) {
            return Some(value.to_string());
        }
    }
    None
}

/// Initialize logging based on settings.
fn init_logging(settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));

    match settings.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        _ => {
            // Default to pretty format
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}
