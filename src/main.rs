use clap::{CommandFactory, FromArgMatches};

use tugboat::cli::{self, Cli, EXIT_AUTH, EXIT_CONFIG, EXIT_NETWORK, EXIT_SUCCESS};

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for rustls 0.23+)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let matches = Cli::command().get_matches();
    let cli = match Cli::from_arg_matches(&matches) {
        Ok(c) => c,
        Err(e) => e.exit(),
    };

    cli::init_logging(cli.debug);

    let config = match tugboat::config::load_config(cli.config.clone()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };
    let settings = config.merge(cli.overrides(&matches));

    let secret =
        match tugboat::credentials::resolve_secret(cli.password.clone(), settings.username.as_deref()) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Credential error: {:#}", e);
                std::process::exit(EXIT_AUTH);
            }
        };

    let client = match tugboat::github::create_client(
        &settings.github_url,
        settings.username.as_deref(),
        &secret,
    ) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to create GitHub client: {:#}", e);
            std::process::exit(EXIT_NETWORK);
        }
    };
    let api = tugboat::github::OctocrabHosting::new(client);

    if let Err(e) =
        tugboat::run::run_report(&api, &settings, &cli.output, cli.verbosity()).await
    {
        if cli.debug {
            eprintln!("Error: {:?}", e);
        } else {
            eprintln!("Error: {:#}", e);
        }
        std::process::exit(cli::exit_code_for(&e));
    }

    std::process::exit(EXIT_SUCCESS);
}
