// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! fgsm-client CLI
//!
//! Log in, run attacks and inspect the stored session from a terminal.

use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use fgsm_client::auth::inspect_token;
use fgsm_client::{
    AttackParameters, AttackResult, AttackSelection, ClientApp, ClientConfig, Error, ImageFile,
    ModelId, RegistrationForm, SessionPhase,
};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fgsm_client=info".parse().unwrap()),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::from(1);
    }

    match args[1].as_str() {
        "--help" | "-h" | "help" => {
            print_usage();
            return ExitCode::SUCCESS;
        }
        "--version" | "-v" | "version" => {
            println!("fgsm-client {}", env!("CARGO_PKG_VERSION"));
            return ExitCode::SUCCESS;
        }
        _ => {}
    }

    let app = match open_app() {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Failed to start client: {}", e);
            return ExitCode::from(1);
        }
    };

    match args[1].as_str() {
        "login" => {
            if args.len() < 4 {
                eprintln!("Usage: fgsm-client login <email> <password>");
                return ExitCode::from(1);
            }
            login(&app, &args[2], &args[3]).await
        }
        "register" => {
            if args.len() < 6 {
                eprintln!("Usage: fgsm-client register <email> <password> <first> <last>");
                return ExitCode::from(1);
            }
            register(&app, &args[2..6]).await
        }
        "logout" => {
            app.logout();
            println!("Logged out");
            ExitCode::SUCCESS
        }
        "status" => status(&app).await,
        "images" => list_images(&app).await,
        "attack" => match AttackArgs::parse(&args[2..]) {
            Ok(attack_args) => run_attack(&app, attack_args).await,
            Err(msg) => {
                eprintln!("{}", msg);
                eprintln!("Usage: fgsm-client attack --file <path> | --url <url> [--model m] [--epsilon e] [--auto-tune] [--out dir]");
                ExitCode::from(1)
            }
        },
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            ExitCode::from(1)
        }
    }
}

fn print_usage() {
    println!(
        r#"fgsm-client - Client for the FGSM adversarial attack service

USAGE:
    fgsm-client <COMMAND> [OPTIONS]

COMMANDS:
    login <email> <password>                    Log in and store the session
    register <email> <password> <first> <last>  Create an account and log in
    logout                                      Forget the stored session
    status                                      Show the stored session
    images                                      List sample images for URL attacks
    attack --file <path> | --url <url>          Run an attack
        --model <mobilenet_v2|inception_v3>     Target model (default mobilenet_v2)
        --epsilon <0..1>                        Perturbation size (default 0.05)
        --auto-tune                             Let the server choose epsilon
        --out <dir>                             Save the returned images
    help                                        Show this help message
    version                                     Show version information

ENVIRONMENT:
    FGSM_API_URL        Service base URL (default http://localhost:5000)
    FGSM_TIMEOUT_SECS   Request timeout in seconds
    FGSM_RECHECK_SECS   Session re-check period in seconds
    FGSM_STORAGE_PATH   Credentials file (default .fgsm-credentials.json)
    FGSM_PROXY          Proxy URL
    RUST_LOG            Log filter

EXAMPLES:
    fgsm-client login user@example.com secret
    fgsm-client attack --file cat.png --epsilon 0.1
    fgsm-client attack --url http://localhost:5000/static/images/dog.jpg --auto-tune
"#
    );
}

fn open_app() -> fgsm_client::Result<ClientApp> {
    ClientApp::new(ClientConfig::for_cli().with_env()?)
}

/// Print an error the way the service's UI would alert it
fn report(context: &str, error: &Error) -> ExitCode {
    eprintln!("{}: {}", context, error.user_message());
    ExitCode::from(1)
}

async fn login(app: &ClientApp, email: &str, password: &str) -> ExitCode {
    match app.login(email, password).await {
        Ok(record) => {
            let name = record
                .user
                .as_ref()
                .and_then(|u| u.display_name())
                .unwrap_or_else(|| email.to_string());
            println!("Logged in as {}", name);
            ExitCode::SUCCESS
        }
        Err(e) => report("Login failed", &e),
    }
}

async fn register(app: &ClientApp, fields: &[String]) -> ExitCode {
    let form = RegistrationForm {
        email: fields[0].clone(),
        password: fields[1].clone(),
        confirm_password: fields[1].clone(),
        first_name: fields[2].clone(),
        last_name: fields[3].clone(),
    };

    match app.register(&form).await {
        Ok(_) => {
            println!("Registered and logged in as {}", form.email);
            ExitCode::SUCCESS
        }
        Err(e) => report("Registration failed", &e),
    }
}

async fn status(app: &ClientApp) -> ExitCode {
    let record = app.credentials();
    println!("\n=== Session ===");
    println!("Tab: {}", app.tab());
    println!("Phase: {:?}", app.phase());

    let Some(token) = record.token.as_deref() else {
        println!("No stored session");
        return ExitCode::SUCCESS;
    };

    match inspect_token(token) {
        fgsm_client::TokenStatus::Valid {
            expires_at: Some(at),
        } => println!("Token expires: {}", at.to_rfc3339()),
        fgsm_client::TokenStatus::Valid { expires_at: None } => {
            println!("Token expires: unknown")
        }
        other => println!("Token: {:?}", other),
    }
    if let Some(name) = record.user.as_ref().and_then(|u| u.display_name()) {
        println!("User: {}", name);
    }

    if app.phase() != SessionPhase::Authenticated {
        return ExitCode::SUCCESS;
    }

    match app.auth().verify_token().await {
        Ok(_) => {
            println!("Server: session accepted");
            ExitCode::SUCCESS
        }
        Err(Error::TokenInvalid(reason)) => {
            println!("Server: session rejected ({})", reason);
            ExitCode::from(1)
        }
        Err(e) => {
            println!("Server: could not verify ({})", e.user_message());
            ExitCode::SUCCESS
        }
    }
}

async fn list_images(app: &ClientApp) -> ExitCode {
    match app.available_images().await {
        Ok(images) => {
            if images.is_empty() {
                println!("No images available");
            } else {
                println!("\n=== Images ({}) ===", images.len());
                for image in &images {
                    println!("  - {} [{}] {}", image.filename, image.label, image.url);
                }
            }
            ExitCode::SUCCESS
        }
        Err(e) => report("Failed to load images", &e),
    }
}

#[derive(Debug, Default)]
struct AttackArgs {
    file: Option<PathBuf>,
    url: Option<String>,
    params: AttackParameters,
    out: Option<PathBuf>,
}

impl AttackArgs {
    fn parse(args: &[String]) -> Result<Self, String> {
        let mut parsed = AttackArgs::default();
        let mut iter = args.iter();

        while let Some(arg) = iter.next() {
            let mut value = |flag: &str| {
                iter.next()
                    .cloned()
                    .ok_or_else(|| format!("Missing value for {}", flag))
            };
            match arg.as_str() {
                "--file" => parsed.file = Some(PathBuf::from(value("--file")?)),
                "--url" => parsed.url = Some(value("--url")?),
                "--model" => {
                    let model: ModelId = value("--model")?.parse().map_err(|e: Error| e.user_message())?;
                    parsed.params = parsed.params.model(model);
                }
                "--epsilon" => {
                    let raw = value("--epsilon")?;
                    let epsilon: f64 = raw
                        .parse()
                        .map_err(|_| format!("Invalid epsilon: {}", raw))?;
                    parsed.params = parsed.params.epsilon(epsilon);
                }
                "--auto-tune" => parsed.params = parsed.params.auto_tune(true),
                "--out" => parsed.out = Some(PathBuf::from(value("--out")?)),
                other => return Err(format!("Unknown option: {}", other)),
            }
        }

        if parsed.file.is_some() && parsed.url.is_some() {
            return Err("Use either --file or --url, not both".to_string());
        }
        Ok(parsed)
    }
}

async fn run_attack(app: &ClientApp, args: AttackArgs) -> ExitCode {
    let mut selection = AttackSelection::new();
    if let Some(path) = &args.file {
        match ImageFile::from_path(path).await {
            Ok(file) => selection.select_file(file),
            Err(e) => {
                eprintln!("Failed to read {}: {}", path.display(), e);
                return ExitCode::from(1);
            }
        }
    }
    if let Some(url) = &args.url {
        selection.select_url(url.clone());
    }

    let outcome = match app.attack(&selection, &args.params).await {
        Ok(outcome) => outcome,
        Err(e) => return report("Attack failed", &e),
    };

    if let Some(warning) = &outcome.warning {
        println!("[!] {}", warning);
    }

    let result = &outcome.result;
    println!("\n=== Attack Result ===");
    if let Some(model) = &result.model_used {
        println!("Model: {}", model);
    }
    println!("Epsilon used: {}", result.epsilon_used);
    println!(
        "Original:    {} ({:.2}%)",
        result.orig_class,
        result.orig_conf * 100.0
    );
    println!(
        "Adversarial: {} ({:.2}%)",
        result.adv_class,
        result.adv_conf * 100.0
    );
    if result.orig_class != result.adv_class {
        println!("\n[FOOLED] Classification changed");
    }

    if let Some(dir) = &args.out {
        if let Err(e) = save_images(result, dir).await {
            eprintln!("Failed to save images: {}", e);
            return ExitCode::from(1);
        }
        println!("\nImages saved to {}", dir.display());
    }

    ExitCode::SUCCESS
}

async fn save_images(result: &AttackResult, dir: &Path) -> fgsm_client::Result<()> {
    tokio::fs::create_dir_all(dir).await?;
    for (name, inline) in [
        ("original.png", &result.original_image),
        ("perturbation.png", &result.perturbation_image),
        ("adversarial.png", &result.adversarial_image),
    ] {
        let bytes = AttackResult::decode_image(inline)?;
        tokio::fs::write(dir.join(name), bytes).await?;
    }
    Ok(())
}
