//! ResolveIT CLI
//!
//! Command-line client for a running ResolveIT API:
//! - Sign in and register
//! - Submit complaints and drive them through their lifecycle
//! - Manage the student directory
//! - Export reports

use clap::{Parser, Subcommand, ValueEnum};
use resolveit::client::{ClientError, ResolveClient};
use resolveit::store::{
    Complaint, ComplaintDraft, Notification, Priority, Stats, Student, StudentInput,
    TimelineEntry, User,
};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "resolveit")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Grievance tracking from the command line")]
#[command(long_about = "ResolveIT tracks complaints from submission to resolution.\nSign in with `resolveit login`, then export RESOLVEIT_TOKEN for the other commands.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL
    #[arg(long, default_value = "http://localhost:8080", env = "RESOLVEIT_API_URL", global = true)]
    pub api_url: String,

    /// Bearer token from `resolveit login`
    #[arg(long, env = "RESOLVEIT_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Table, global = true)]
    pub format: Format,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and print a bearer token
    Login {
        email: String,
        /// Password (prompted on stdin if omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Create an account
    Register {
        name: String,
        email: String,
        #[arg(short, long)]
        password: String,
        /// USER, ADMIN or SENIOR_ADMIN
        #[arg(long)]
        role: Option<String>,
    },

    /// Complaint operations
    #[command(subcommand)]
    Complaints(ComplaintCommand),

    /// Show a complaint's timeline
    Timeline { id: i64 },

    /// Show complaint statistics
    Stats,

    /// Download the CSV report (staff)
    Export {
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Student directory
    #[command(subcommand)]
    Students(StudentCommand),

    /// List accounts (staff)
    Users,

    /// List your notifications
    Notifications {
        /// Mark this notification as read instead of listing
        #[arg(long)]
        read: Option<i64>,
    },

    /// Run the SLA escalation sweep now (staff)
    Escalate,

    /// Show server health
    Status,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum ComplaintCommand {
    /// All complaints (staff)
    List,
    /// Your own complaints
    Mine,
    /// One complaint with its attachments
    Show { id: i64 },
    /// Submit a new complaint
    Submit {
        #[arg(short, long)]
        title: String,
        #[arg(short, long)]
        description: String,
        #[arg(short, long)]
        category: Option<String>,
        /// LOW, MEDIUM, HIGH or CRITICAL
        #[arg(short, long)]
        priority: Option<String>,
        /// Hide your identity from non-staff readers
        #[arg(long)]
        anonymous: bool,
        /// Contact address for anonymous complaints
        #[arg(long, requires = "anonymous")]
        contact_email: Option<String>,
        /// Evidence file to attach
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Assign to a staff member
    Assign { id: i64, user_id: i64 },
    /// Add a comment
    Comment {
        id: i64,
        text: String,
        /// Visible to staff only
        #[arg(long)]
        internal: bool,
    },
    /// Mark resolved (staff)
    Resolve {
        id: i64,
        #[arg(short, long)]
        comment: Option<String>,
    },
    /// Acknowledge a resolution
    Close {
        id: i64,
        #[arg(short, long)]
        comment: Option<String>,
    },
    /// Reject a resolution
    Reopen { id: i64, reason: String },
    /// Delete (staff)
    Delete { id: i64 },
}

#[derive(Subcommand)]
pub enum StudentCommand {
    List,
    Add {
        name: String,
        email: String,
        department: String,
        #[arg(long)]
        phone: Option<String>,
    },
    Update {
        id: i64,
        name: String,
        email: String,
        department: String,
        #[arg(long)]
        phone: Option<String>,
    },
    Delete { id: i64 },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut client = ResolveClient::new(&cli.api_url)?;
    if let Some(token) = &cli.token {
        client.set_token(token.clone());
    }

    match run(&cli, &client).await {
        Ok(()) => Ok(()),
        Err(CliError::Client(ClientError::Unavailable(url))) => {
            eprintln!("Cannot connect to ResolveIT API at {}", url);
            eprintln!();
            eprintln!("Make sure the ResolveIT API server is running:");
            eprintln!("  cargo run --bin resolveit-api");
            std::process::exit(1);
        }
        Err(CliError::Client(ClientError::Api { status: 401, message })) => {
            eprintln!("Not signed in ({}).", message);
            eprintln!("Run `resolveit login <email>` and export RESOLVEIT_TOKEN.");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Usage(String),
}

async fn run(cli: &Cli, client: &ResolveClient) -> Result<(), CliError> {
    match &cli.command {
        Commands::Login { email, password } => {
            let password = match password {
                Some(p) => p.clone(),
                None => prompt("Password: ")?,
            };
            let session = client.auth().login(email, &password).await?;
            match cli.format {
                Format::Json => println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "token": session.token,
                        "user": session.user,
                    }))?
                ),
                Format::Table => {
                    eprintln!(
                        "Signed in as {} ({})",
                        session.user.name, session.user.role
                    );
                    println!("{}", session.token);
                }
            }
        }

        Commands::Register {
            name,
            email,
            password,
            role,
        } => {
            let answer = client
                .auth()
                .register(name, email, password, role.as_deref())
                .await?;
            println!("{}", answer);
        }

        Commands::Complaints(command) => run_complaint(cli.format, client, command).await?,

        Commands::Timeline { id } => {
            let entries = client.complaints().timeline(*id).await?;
            emit(cli.format, entries.as_slice(), print_timeline)?;
        }

        Commands::Stats => {
            let stats = client.complaints().stats().await?;
            emit(cli.format, &stats, print_stats)?;
        }

        Commands::Export { output } => {
            let csv = client.complaints().export().await?;
            match output {
                Some(path) => {
                    std::fs::write(path, &csv)?;
                    println!("Exported to {:?}", path);
                }
                None => print!("{}", csv),
            }
        }

        Commands::Students(command) => run_student(cli.format, client, command).await?,

        Commands::Users => {
            let users = client.users().await?;
            emit(cli.format, users.as_slice(), print_users)?;
        }

        Commands::Notifications { read } => match read {
            Some(id) => {
                client.notifications().mark_read(*id).await?;
                println!("Notification {} marked as read", id);
            }
            None => {
                let notifications = client.notifications().mine().await?;
                emit(cli.format, notifications.as_slice(), print_notifications)?;
            }
        },

        Commands::Escalate => {
            let escalated = client.run_escalations().await?;
            println!("Escalated {} complaint(s)", escalated);
        }

        Commands::Status => {
            let health = client.health().await?;
            match cli.format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&health)?),
                Format::Table => {
                    println!("ResolveIT v{}", health.version);
                    println!();
                    println!("API Status: {}", health.status);
                    println!("Database:   {}", health.database);
                    println!("Uptime:     {}", format_duration(health.uptime_seconds));
                }
            }
        }

        Commands::Config { output } => {
            let config = resolveit::config::generate_default_config();

            match output {
                Some(path) => {
                    // Create parent directory if needed
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => print!("{}", config),
            }
        }
    }

    Ok(())
}

async fn run_complaint(
    format: Format,
    client: &ResolveClient,
    command: &ComplaintCommand,
) -> Result<(), CliError> {
    let complaints = client.complaints();

    let updated = match command {
        ComplaintCommand::List => {
            let list = complaints.all().await?;
            return emit(format, list.as_slice(), print_complaints);
        }
        ComplaintCommand::Mine => {
            let list = complaints.mine().await?;
            return emit(format, list.as_slice(), print_complaints);
        }
        ComplaintCommand::Show { id } => {
            let complaint = complaints.get(*id).await?;
            let attachments = complaints.attachments(*id).await?;
            if format == Format::Json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "complaint": complaint,
                        "attachments": attachments,
                    }))?
                );
            } else {
                print_complaint_detail(&complaint);
                for a in &attachments {
                    println!("Attachment:  {} ({} bytes)", a.file_name, a.file_size);
                }
            }
            return Ok(());
        }
        ComplaintCommand::Submit {
            title,
            description,
            category,
            priority,
            anonymous,
            contact_email,
            file,
        } => {
            let priority = match priority {
                Some(p) => Some(Priority::parse(p).ok_or_else(|| {
                    CliError::Usage(format!(
                        "Unknown priority '{}'. Use LOW, MEDIUM, HIGH or CRITICAL",
                        p
                    ))
                })?),
                None => None,
            };
            let draft = ComplaintDraft {
                title: title.clone(),
                description: description.clone(),
                category: category.clone(),
                priority,
                is_anonymous: *anonymous,
                anonymous_email: contact_email.clone(),
            };
            let upload = match file {
                Some(path) => {
                    let name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| "upload".to_string());
                    Some((name, std::fs::read(path)?))
                }
                None => None,
            };
            complaints.create(&draft, upload).await?
        }
        ComplaintCommand::Assign { id, user_id } => complaints.assign(*id, *user_id).await?,
        ComplaintCommand::Comment { id, text, internal } => {
            let entry = complaints.comment(*id, text, !internal).await?;
            return emit(format, std::slice::from_ref(&entry), print_timeline);
        }
        ComplaintCommand::Resolve { id, comment } => {
            complaints.resolve(*id, comment.as_deref()).await?
        }
        ComplaintCommand::Close { id, comment } => {
            complaints.close(*id, comment.as_deref()).await?
        }
        ComplaintCommand::Reopen { id, reason } => complaints.reopen(*id, reason).await?,
        ComplaintCommand::Delete { id } => {
            complaints.delete(*id).await?;
            println!("Complaint {} deleted", id);
            return Ok(());
        }
    };

    emit(format, &updated, print_complaint_detail)
}

async fn run_student(
    format: Format,
    client: &ResolveClient,
    command: &StudentCommand,
) -> Result<(), CliError> {
    let students = client.students();

    match command {
        StudentCommand::List => {
            let list = students.list().await?;
            emit(format, list.as_slice(), print_students)
        }
        StudentCommand::Add {
            name,
            email,
            department,
            phone,
        } => {
            let input = StudentInput {
                name: name.clone(),
                email: email.clone(),
                department: department.clone(),
                phone: phone.clone(),
            };
            let student = students.create(&input).await?;
            emit(format, std::slice::from_ref(&student), print_students)
        }
        StudentCommand::Update {
            id,
            name,
            email,
            department,
            phone,
        } => {
            let input = StudentInput {
                name: name.clone(),
                email: email.clone(),
                department: department.clone(),
                phone: phone.clone(),
            };
            let student = students.update(*id, &input).await?;
            emit(format, std::slice::from_ref(&student), print_students)
        }
        StudentCommand::Delete { id } => {
            students.delete(*id).await?;
            println!("Student {} deleted", id);
            Ok(())
        }
    }
}

fn prompt(label: &str) -> Result<String, CliError> {
    use std::io::Write;

    eprint!("{}", label);
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn emit<T: Serialize + ?Sized>(
    format: Format,
    value: &T,
    table: impl Fn(&T),
) -> Result<(), CliError> {
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(value)?),
        Format::Table => table(value),
    }
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else if seconds < 86400 {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    } else {
        format!("{}d {}h", seconds / 86400, (seconds % 86400) / 3600)
    }
}

fn print_complaints(complaints: &[Complaint]) {
    if complaints.is_empty() {
        println!("No complaints yet.");
        println!();
        println!("Submit one with:");
        println!("  resolveit complaints submit -t <title> -d <description>");
        return;
    }

    println!(
        "{:<6} {:<32} {:<16} {:<12} {:<9} {}",
        "ID", "Title", "Category", "Status", "Priority", "Created"
    );
    println!("{}", "-".repeat(92));

    for c in complaints {
        println!(
            "{:<6} {:<32} {:<16} {:<12} {:<9} {}{}",
            c.complaint_id,
            truncate(&c.title, 32),
            truncate(&c.category, 16),
            c.status.as_str(),
            c.priority.as_str(),
            c.created_at.format("%Y-%m-%d"),
            if c.is_anonymous { "  (anonymous)" } else { "" }
        );
    }
}

fn print_complaint_detail(c: &Complaint) {
    println!("Complaint #{}: {}", c.complaint_id, c.title);
    println!("Status:      {}", c.status);
    println!("Priority:    {}", c.priority);
    println!("Category:    {}", c.category);
    match &c.user {
        Some(u) => println!("Submitted:   {} by {}", c.created_at.format("%Y-%m-%d %H:%M"), u.email),
        None => println!("Submitted:   {} (anonymous)", c.created_at.format("%Y-%m-%d %H:%M")),
    }
    if let Some(a) = &c.assigned_to {
        println!("Assigned to: {} <{}>", a.name, a.email);
    }
    if let Some(at) = c.resolved_at {
        println!("Resolved:    {}", at.format("%Y-%m-%d %H:%M"));
    }
    println!();
    println!("{}", c.description);
}

fn print_timeline(entries: &[TimelineEntry]) {
    if entries.is_empty() {
        println!("No timeline entries");
        return;
    }

    for e in entries {
        let author = e
            .updated_by
            .as_ref()
            .map(|u| u.name.as_str())
            .unwrap_or("System");
        println!(
            "{}  {:<12} {}{}",
            e.timestamp.format("%Y-%m-%d %H:%M"),
            e.status.replace('_', " "),
            author,
            if e.is_public { "" } else { " [internal]" }
        );
        if let Some(comment) = &e.comment {
            println!("                   {}", comment);
        }
    }
}

fn print_stats(stats: &Stats) {
    println!("Total:      {}", stats.total);
    println!("Open:       {}", stats.open);
    println!("Resolved:   {}", stats.resolved);
    println!("Closed:     {}", stats.closed);
    println!("Escalated:  {}", stats.escalated);
    println!("Resolution: {}%", stats.resolution_rate());

    if !stats.categories.is_empty() {
        println!();
        println!("By category:");
        for (name, count) in &stats.categories {
            println!("  {:<20} {}", name, count);
        }
    }
}

fn print_students(students: &[Student]) {
    if students.is_empty() {
        println!("No students");
        return;
    }

    println!("{:<6} {:<24} {:<30} {:<12} {}", "ID", "Name", "Email", "Department", "Phone");
    println!("{}", "-".repeat(86));
    for s in students {
        println!(
            "{:<6} {:<24} {:<30} {:<12} {}",
            s.id,
            truncate(&s.name, 24),
            truncate(&s.email, 30),
            truncate(&s.department, 12),
            s.phone.as_deref().unwrap_or("-")
        );
    }
}

fn print_users(users: &[User]) {
    println!("{:<6} {:<24} {:<30} {}", "ID", "Name", "Email", "Role");
    println!("{}", "-".repeat(76));
    for u in users {
        println!(
            "{:<6} {:<24} {:<30} {}",
            u.id,
            truncate(&u.name, 24),
            truncate(&u.email, 30),
            u.role
        );
    }
}

fn print_notifications(notifications: &[Notification]) {
    if notifications.is_empty() {
        println!("No notifications");
        return;
    }

    for n in notifications {
        println!(
            "{} #{:<5} {}  {}",
            if n.is_read { " " } else { "*" },
            n.id,
            n.created_at.format("%Y-%m-%d %H:%M"),
            n.title
        );
        println!("         {}", n.message);
    }
}
