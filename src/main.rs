use anyhow::{anyhow, Result};
use clap::Parser;
use log::info;
use metrics_exporter_prometheus::PrometheusBuilder;
use rustyline::DefaultEditor;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use academix::auth::machine::{AuthEvent, AuthMode, SignupStage};
use academix::auth::verify::{prefix_classifier, IdVerifier};
use academix::auth::AuthFlow;
use academix::directory::mock::{Latency, MockDirectory};
use academix::directory::Directory;
use academix::materials::filter::MaterialFilter;
use academix::materials::rating::RatingControl;
use academix::materials::upload::UploadForm;
use academix::models::{FileRef, Material, MaterialType, User};
use academix::notify::{Notice, Notifier, TerminalNotifier};
use academix::routing::{Location, Navigator};
use academix::utils::config::Config;

#[derive(Parser)]
#[command(name = "academix")]
#[command(about = "AcademiX study material exchange, interactive demo shell", long_about = None)]
struct Args {
    /// Start the account screen in sign-up mode (like /login?signup=true).
    #[arg(long)]
    signup: bool,
    /// Preselect a sign-up role: junior or senior.
    #[arg(long)]
    role: Option<String>,
    /// Override ACADEMIX_LATENCY_SCALE.
    #[arg(long)]
    latency_scale: Option<f32>,
    /// Override ACADEMIX_FAIL_RATE.
    #[arg(long)]
    fail_rate: Option<f32>,
}

fn check_login(session: &Option<User>) -> Result<&User> {
    session.as_ref().ok_or_else(|| anyhow!("Please login first."))
}

fn format_rating(material: &Material) -> String {
    match (material.rating, material.total_ratings) {
        (Some(avg), Some(total)) => format!("{avg:.1} ({total})"),
        _ => "-".to_string(),
    }
}

fn print_materials(materials: &[Material]) {
    if materials.is_empty() {
        println!("No materials found. Try changing your filters or search query.");
        return;
    }
    for m in materials {
        println!(
            "{}  [{}] {} - {} ({} downloads, rating {})",
            m.id,
            m.subject.code,
            m.material_type.label(),
            m.title,
            m.downloads,
            format_rating(m),
        );
    }
}

/// browse accepts free-text words plus --subject <id> and --type <t> flags.
fn parse_browse_filter(args: &[&str]) -> Result<MaterialFilter> {
    let mut filter = MaterialFilter::default();
    let mut words: Vec<&str> = Vec::new();
    let mut i = 0;
    while i < args.len() {
        match args[i] {
            "--subject" => {
                let value = args
                    .get(i + 1)
                    .ok_or_else(|| anyhow!("Usage: browse [text...] [--subject <id>] [--type <type>]"))?;
                filter.subject_id = value.to_string();
                i += 2;
            }
            "--type" => {
                let value = args
                    .get(i + 1)
                    .ok_or_else(|| anyhow!("Usage: browse [text...] [--subject <id>] [--type <type>]"))?;
                filter.material_type =
                    Some(MaterialType::from_str(value).map_err(|e| anyhow!(e))?);
                i += 2;
            }
            word => {
                words.push(word);
                i += 1;
            }
        }
    }
    filter.query = words.join(" ");
    Ok(filter)
}

fn read_file_ref(path: &str) -> Option<FileRef> {
    let name = path.rsplit('/').next().unwrap_or(path);
    match std::fs::read(path) {
        Ok(bytes) => Some(FileRef::from_bytes(name, &bytes)),
        Err(_) => None,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let cfg = Config::from_env()?;
    let latency_scale = args.latency_scale.unwrap_or(cfg.latency_scale);
    let fail_rate = args.fail_rate.unwrap_or(cfg.fail_rate);
    info!("starting with latency scale {latency_scale}, fail rate {fail_rate}");

    let prometheus = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow!("install metrics recorder: {e}"))?;

    let mut query_parts: Vec<String> = Vec::new();
    if args.signup {
        query_parts.push("signup=true".to_string());
    }
    if let Some(role) = &args.role {
        query_parts.push(format!("role={role}"));
    }

    let directory: Arc<dyn Directory> = Arc::new(MockDirectory::new(
        Latency::scaled(latency_scale),
        fail_rate,
    ));
    let location = Arc::new(Location::new("/login", &query_parts.join("&")));
    let notifier: Arc<dyn Notifier> = Arc::new(TerminalNotifier);
    let mut flow = AuthFlow::new(directory.clone(), location.clone(), notifier.clone());
    let verifier = IdVerifier::new(directory.clone(), prefix_classifier());

    let mut session: Option<User> = None;
    let mut my_ratings: HashMap<Uuid, u8> = HashMap::new();

    let mut rl = DefaultEditor::new()?;
    println!("Welcome to AcademiX, the study material exchange!");
    println!("Type 'help' for available commands, 'exit' to quit.");

    loop {
        let line = rl.readline("academix> ");
        match line {
            Ok(cmdline) => {
                let _ = rl.add_history_entry(cmdline.as_str());
                let args: Vec<_> = cmdline.split_whitespace().collect();
                if args.is_empty() {
                    continue;
                }

                match args[0] {
                    "exit" => break,
                    "help" => {
                        println!("Commands:");
                        println!("  login <email> <password>");
                        println!("  signup <name> <email> <password>");
                        println!("  verify <college-id> <id-card-image-path>");
                        println!("  confirm                       (finish signup after verification)");
                        println!("  toggle                        (switch between login and signup)");
                        println!("  browse [text...] [--subject <id>] [--type <notes|paper|book|assignment|other>]");
                        println!("  subjects");
                        println!("  upload <file-path> <subject-id> <type> <title...>");
                        println!("  rate <material-id> <1-5>");
                        println!("  inspect <material-id>");
                        println!("  download <material-id>");
                        println!("  dashboard");
                        println!("  whoami");
                        println!("  location");
                        println!("  stats");
                        println!("  logout");
                        println!("  exit");
                    }
                    "login" => {
                        if args.len() < 3 {
                            println!("Usage: login <email> <password>");
                            continue;
                        }
                        if flow.state().mode == AuthMode::Signup {
                            flow.dispatch(AuthEvent::ToggleMode).await;
                        }
                        flow.dispatch(AuthEvent::EmailChanged(args[1].to_string()))
                            .await;
                        flow.dispatch(AuthEvent::PasswordChanged(args[2].to_string()))
                            .await;
                        flow.dispatch(AuthEvent::Submit).await;
                        if let Some(user) = flow.take_signed_in() {
                            println!("Signed in as {} ({}).", user.name, user.role);
                            println!("You are now at {}", location.href());
                            session = Some(user);
                        }
                    }
                    "signup" => {
                        if args.len() < 4 {
                            println!("Usage: signup <name> <email> <password>");
                            continue;
                        }
                        if flow.state().mode == AuthMode::Login {
                            flow.dispatch(AuthEvent::ToggleMode).await;
                        }
                        flow.dispatch(AuthEvent::NameChanged(args[1].to_string()))
                            .await;
                        flow.dispatch(AuthEvent::EmailChanged(args[2].to_string()))
                            .await;
                        flow.dispatch(AuthEvent::PasswordChanged(args[3].to_string()))
                            .await;
                        flow.dispatch(AuthEvent::Submit).await;
                        if flow.state().stage == SignupStage::Verifying {
                            println!("College ID verification required.");
                            println!("Run: verify <college-id> <id-card-image-path>");
                        }
                    }
                    "verify" => {
                        if flow.state().stage != SignupStage::Verifying {
                            println!("Nothing to verify right now. Start with 'signup'.");
                            continue;
                        }
                        let college_id = args.get(1).copied().unwrap_or("");
                        let image = args.get(2).and_then(|path| read_file_ref(path));
                        match verifier.verify(college_id, image.as_ref()).await {
                            Ok(verification) => {
                                notifier.display(Notice::info(
                                    "Verification Successful",
                                    format!(
                                        "Your college ID has been verified. You are identified as a {} student.",
                                        verification.role
                                    ),
                                ));
                                flow.dispatch(AuthEvent::VerificationPassed {
                                    college_id: verification.college_id,
                                    role: verification.role,
                                })
                                .await;
                                println!("Run 'confirm' to finish creating your account.");
                            }
                            Err(academix::errors::FlowError::Validation(msg)) => {
                                notifier.display(Notice::destructive("Validation Error", msg));
                            }
                            Err(_) => {
                                notifier.display(Notice::destructive(
                                    "Verification Failed",
                                    "There was an error verifying your ID. Please try again.",
                                ));
                            }
                        }
                    }
                    "confirm" => {
                        flow.dispatch(AuthEvent::Submit).await;
                        if let Some(user) = flow.take_signed_in() {
                            println!("Signed in as {} ({}).", user.name, user.role);
                            println!("You are now at {}", location.href());
                            session = Some(user);
                        }
                    }
                    "toggle" => {
                        flow.dispatch(AuthEvent::ToggleMode).await;
                        match flow.state().mode {
                            AuthMode::Login => println!("Log in to your account"),
                            AuthMode::Signup => println!("Create a new account"),
                        }
                    }
                    "browse" => {
                        let filter = match parse_browse_filter(&args[1..]) {
                            Ok(f) => f,
                            Err(e) => {
                                println!("{e}");
                                continue;
                            }
                        };
                        match directory.list_materials(&filter).await {
                            Ok(materials) => print_materials(&materials),
                            Err(e) => println!("Error: {e}"),
                        }
                    }
                    "subjects" => match directory.subjects().await {
                        Ok(subjects) => {
                            for s in subjects {
                                println!("{}  {} - {} (Sem {})", s.id, s.code, s.name, s.semester);
                            }
                        }
                        Err(e) => println!("Error: {e}"),
                    },
                    "upload" => {
                        let user = match check_login(&session) {
                            Ok(u) => u.clone(),
                            Err(e) => {
                                println!("{e}");
                                continue;
                            }
                        };
                        if args.len() < 5 {
                            println!("Usage: upload <file-path> <subject-id> <type> <title...>");
                            continue;
                        }
                        let file = match read_file_ref(args[1]) {
                            Some(f) => f,
                            None => {
                                println!("Failed to read '{}'.", args[1]);
                                continue;
                            }
                        };
                        let material_type = match MaterialType::from_str(args[3]) {
                            Ok(t) => t,
                            Err(e) => {
                                println!("{e}");
                                continue;
                            }
                        };
                        let description = match rl.readline("description> ") {
                            Ok(d) => d,
                            Err(_) => continue,
                        };
                        let mut form = UploadForm::new();
                        form.title = args[4..].join(" ");
                        form.description = description.trim().to_string();
                        form.subject_id = args[2].to_string();
                        form.material_type = Some(material_type);
                        form.attach(file);
                        if let Some(material) =
                            form.submit(&user, directory.as_ref(), notifier.as_ref()).await
                        {
                            println!("Uploaded: {} ({})", material.title, material.id);
                        }
                    }
                    "rate" => {
                        let user = match check_login(&session) {
                            Ok(u) => u.clone(),
                            Err(e) => {
                                println!("{e}");
                                continue;
                            }
                        };
                        if args.len() < 3 {
                            println!("Usage: rate <material-id> <1-5>");
                            continue;
                        }
                        let material_id = match Uuid::parse_str(args[1]) {
                            Ok(id) => id,
                            Err(_) => {
                                println!("Invalid material id.");
                                continue;
                            }
                        };
                        let value: u8 = match args[2].parse() {
                            Ok(v) => v,
                            Err(_) => {
                                println!("Stars must be a number from 1 to 5.");
                                continue;
                            }
                        };
                        let mut control = RatingControl::new(
                            material_id,
                            user.id,
                            my_ratings.get(&material_id).copied(),
                        );
                        if let Some(ack) = control
                            .submit(value, directory.as_ref(), notifier.as_ref())
                            .await
                        {
                            my_ratings.insert(material_id, value);
                            println!(
                                "New average: {:.1} over {} ratings.",
                                ack.average, ack.total
                            );
                        }
                    }
                    "inspect" => {
                        if args.len() < 2 {
                            println!("Usage: inspect <material-id>");
                            continue;
                        }
                        let material_id = match Uuid::parse_str(args[1]) {
                            Ok(id) => id,
                            Err(_) => {
                                println!("Invalid material id.");
                                continue;
                            }
                        };
                        match directory.list_materials(&MaterialFilter::default()).await {
                            Ok(materials) => {
                                match materials.iter().find(|m| m.id == material_id) {
                                    Some(material) => {
                                        println!("{}", serde_json::to_string_pretty(material)?)
                                    }
                                    None => println!("No material with that id."),
                                }
                            }
                            Err(e) => println!("Error: {e}"),
                        }
                    }
                    "download" => {
                        if args.len() < 2 {
                            println!("Usage: download <material-id>");
                            continue;
                        }
                        let material_id = match Uuid::parse_str(args[1]) {
                            Ok(id) => id,
                            Err(_) => {
                                println!("Invalid material id.");
                                continue;
                            }
                        };
                        match directory.record_download(material_id).await {
                            Ok(material) => notifier.display(Notice::info(
                                "Download Started",
                                format!("{} will download shortly", material.title),
                            )),
                            Err(e) => println!("Error: {e}"),
                        }
                    }
                    "dashboard" => {
                        let user = match check_login(&session) {
                            Ok(u) => u.clone(),
                            Err(e) => {
                                println!("{e}");
                                continue;
                            }
                        };
                        match directory.materials_by(user.id).await {
                            Ok(materials) => {
                                let total_downloads: u32 =
                                    materials.iter().map(|m| m.downloads).sum();
                                println!("Dashboard for {} ({})", user.name, user.role);
                                println!("  Uploaded materials: {}", materials.len());
                                println!("  Total downloads:    {total_downloads}");
                                if let (Some(avg), Some(total)) = (user.rating, user.total_ratings)
                                {
                                    println!("  Contributor rating: {avg:.1} ({total} ratings)");
                                }
                                print_materials(&materials);
                            }
                            Err(e) => println!("Error: {e}"),
                        }
                    }
                    "whoami" => match &session {
                        Some(user) => {
                            println!("Logged in as: {}", user.name);
                            println!("Email: {}", user.email);
                            println!("Role: {}", user.role);
                            if let Some(college_id) = &user.college_id {
                                println!("College ID: {college_id}");
                            }
                            println!("Verified: {}", user.verified);
                        }
                        None => println!("Not logged in."),
                    },
                    "location" => println!("{}", location.href()),
                    "stats" => println!("{}", prometheus.render()),
                    "logout" => {
                        if session.take().is_some() {
                            location.navigate("/");
                            println!("Logged out.");
                        } else {
                            println!("Not logged in.");
                        }
                    }
                    other => {
                        println!("Unknown command '{other}'. Type 'help' for commands.");
                    }
                }
            }
            Err(e) => {
                println!("Error reading line: {e:?}");
                break;
            }
        }
    }

    Ok(())
}
