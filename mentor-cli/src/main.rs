mod logging;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use mentor_client::connections::AcceptOutcome;
use mentor_client::models::{
    Connection, ConnectionStatus, CreatePostRequest, MentorshipApplication, Post, ProfileUpdate,
    Role,
};
use mentor_client::payments::{format_price, DEFAULT_CURRENCY};
use mentor_client::refund::RefundAffordance;
use mentor_client::token_store::TokenStore;
use mentor_client::upload::{read_files, UploadContext};
use mentor_client::{ClientConfig, ClientError, MentorClient};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Backend origin, overrides MENTOR_API_URL
    #[arg(short, long)]
    server: Option<String>,

    #[arg(long)]
    token_file: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Register {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,

        #[arg(long, value_enum, default_value_t = RoleArg::Student)]
        role: RoleArg,
    },

    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },

    Logout,

    Status,

    #[command(subcommand)]
    Profile(ProfileCommand),

    /// Show the feed, loading as many pages as asked
    Feed {
        #[arg(short, long, default_value_t = 10)]
        limit: u32,

        #[arg(long, default_value_t = 1)]
        pages: u32,
    },

    /// Create a post, uploading any images first
    Post {
        #[arg(short, long)]
        content: String,

        #[arg(short, long, value_delimiter = ',')]
        tags: Vec<String>,

        #[arg(short, long)]
        image: Vec<PathBuf>,
    },

    Like {
        id: String,
    },

    Comment {
        id: String,

        #[arg(short, long)]
        text: String,
    },

    Share {
        id: String,
    },

    /// Upload images and print their URLs
    Upload {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Upload as the profile picture
        #[arg(long)]
        profile: bool,
    },

    #[command(subcommand)]
    Connection(ConnectionCommand),

    #[command(subcommand)]
    Mentorship(MentorshipCommand),
}

#[derive(Subcommand)]
enum ProfileCommand {
    Show {
        /// Another user's id; defaults to the current user
        id: Option<String>,
    },

    Update {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        bio: Option<String>,

        #[arg(long, value_delimiter = ',')]
        skills: Option<Vec<String>>,

        /// Mentorship price in cents
        #[arg(long)]
        price: Option<i64>,
    },
}

#[derive(Subcommand)]
enum ConnectionCommand {
    List {
        #[arg(short, long, value_enum)]
        status: Option<StatusArg>,
    },

    Request {
        user_id: String,

        #[arg(short, long)]
        message: Option<String>,
    },

    Accept {
        id: String,
    },

    Reject {
        id: String,
    },

    Cancel {
        id: String,
    },

    Block {
        id: String,
    },
}

#[derive(Subcommand)]
enum MentorshipCommand {
    /// Apply to a mentor; paid mentorships need a payment method
    Apply {
        mentor_id: String,

        #[arg(short, long)]
        message: String,

        #[arg(long)]
        goals: Option<String>,

        #[arg(long)]
        availability: Option<String>,

        /// Mentor's price in cents, for paid mentorships
        #[arg(long)]
        price: Option<i64>,

        #[arg(long, default_value = DEFAULT_CURRENCY)]
        currency: String,

        /// Card payment method id; only meaningful with --price
        #[arg(long, requires = "price")]
        payment_method: Option<String>,
    },

    /// Pending mentorship requests for the current mentor
    Requests,

    Accept {
        id: String,

        #[arg(long)]
        payment_method: Option<String>,
    },

    /// Reject a request; without --reason an empty reason is sent
    Reject {
        id: String,

        #[arg(short, long, default_value = "")]
        reason: String,
    },

    Refund {
        id: String,

        #[arg(short, long)]
        reason: String,
    },

    Payment {
        id: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum RoleArg {
    Student,
    Mentor,
}

impl From<RoleArg> for Role {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::Student => Role::Student,
            RoleArg::Mentor => Role::Mentor,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum StatusArg {
    Pending,
    Accepted,
    Rejected,
    Cancelled,
    Blocked,
}

impl From<StatusArg> for ConnectionStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Pending => ConnectionStatus::Pending,
            StatusArg::Accepted => ConnectionStatus::Accepted,
            StatusArg::Rejected => ConnectionStatus::Rejected,
            StatusArg::Cancelled => ConnectionStatus::Cancelled,
            StatusArg::Blocked => ConnectionStatus::Blocked,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let mut config = ClientConfig::from_env().context("Failed to load configuration")?;
    if let Some(server) = cli.server.clone() {
        config.api_url = server;
    }

    let token_store = match cli.token_file.clone() {
        Some(path) => TokenStore::new(path),
        None => {
            let home = dirs::home_dir().context("Failed to get home directory")?;
            TokenStore::in_home(&home)
        }
    };

    println!("🔌 Connecting to: {}", config.api_url);
    let client = MentorClient::new(config);

    if let Some(token) = token_store.load()? {
        client.set_token(token).await;
        tracing::debug!("Authenticated with saved token");
    }

    if let Err(e) = run(&client, &token_store, cli.command).await {
        report(&e);
        std::process::exit(1);
    }

    Ok(())
}

fn report(err: &anyhow::Error) {
    eprintln!("{} {:#}", "❌".red(), err);

    if let Some(client_err) = err.downcast_ref::<ClientError>() {
        if client_err.is_unauthorized() {
            eprintln!("   Please login first: mentor login --email <email> --password <password>");
        } else if client_err.is_not_found() {
            eprintln!("   Tip: use 'mentor connection list' or 'mentor feed' to see available ids");
        }
    }
}

async fn run(client: &MentorClient, token_store: &TokenStore, command: Commands) -> Result<()> {
    match command {
        Commands::Register {
            name,
            email,
            password,
            role,
        } => {
            println!("📝 Registering: {}", email);
            let response = client
                .auth()
                .register(name, email, password, role.into())
                .await
                .context("Registration failed")?;
            println!("{} Registered as {} ({})", "✅".green(), response.user.name, response.user.id);
            token_store.save(&response.token)?;
            println!("✓ Token saved to {:?}", token_store.path());
        }

        Commands::Login { email, password } => {
            println!("🔑 Logging in as: {}", email);
            let response = client
                .auth()
                .login(email, password)
                .await
                .context("Login failed")?;
            println!("{} Welcome back, {}", "✅".green(), response.user.name);
            token_store.save(&response.token)?;
            println!("✓ Token saved to {:?}", token_store.path());
        }

        Commands::Logout => {
            client.auth().logout().await;
            if token_store.clear()? {
                println!("✓ Token file removed");
            } else {
                println!("Already logged out");
            }
        }

        Commands::Status => match token_store.load()? {
            Some(token) => {
                println!("🔑 Token file: {:?}", token_store.path());
                println!("   Token: {}...", token.chars().take(20).collect::<String>());
                match client.auth().me().await {
                    Ok(user) => println!("   Logged in as {} <{}>", user.name, user.email),
                    Err(e) => println!("   Token not accepted: {}", e),
                }
            }
            None => {
                println!("❌ No token found");
                println!("   Please login first: mentor login --email <email> --password <password>");
            }
        },

        Commands::Profile(cmd) => run_profile(client, cmd).await?,

        Commands::Feed { limit, pages } => {
            let mut feed = client.feed(limit);
            feed.refresh().await.context("Failed to load feed")?;
            for _ in 1..pages {
                if feed.load_more().await? == 0 {
                    break;
                }
            }

            let state = feed.state();
            if state.posts().is_empty() {
                println!("   No posts yet");
            }
            for post in state.posts() {
                print_post(post);
            }
            if state.has_more() {
                println!("… more posts available (use --pages {})", state.page() + 1);
            }
        }

        Commands::Post {
            content,
            tags,
            image,
        } => {
            let images = if image.is_empty() {
                Vec::new()
            } else {
                let files = read_files(&image).await?;
                for file in &files {
                    println!("🖼  {} ({} bytes)", file.file_name, file.size());
                }
                client.uploads().upload_post_images(files).await?
            };

            let req = CreatePostRequest {
                content,
                tags,
                images,
            };
            let post = client.feed_client().create_post(&req).await?;
            println!("{} Post created: {}", "✅".green(), post.id);
        }

        Commands::Like { id } => {
            let post = client.feed_client().toggle_like(&id).await?;
            print_post(&post);
        }

        Commands::Comment { id, text } => {
            let post = client.feed_client().add_comment(&id, &text).await?;
            print_post(&post);
        }

        Commands::Share { id } => {
            let post = client.feed_client().share_post(&id).await?;
            print_post(&post);
        }

        Commands::Upload { files, profile } => {
            let context = if profile {
                UploadContext::ProfilePicture
            } else {
                UploadContext::PostImages
            };
            let files = read_files(&files).await?;
            let uploads = client.uploads();
            uploads.policy().validate(context, &files)?;

            for file in &files {
                let preview = file.preview();
                println!(
                    "🖼  {} ({} bytes, {}…)",
                    preview.file_name,
                    file.size(),
                    preview.data_url.chars().take(32).collect::<String>()
                );
            }

            let response = uploads.upload(context, files).await?;
            for url in response.urls {
                if profile {
                    println!("{} Profile picture: {}", "✅".green(), url);
                } else {
                    println!("{} {}", "✅".green(), url);
                }
            }
        }

        Commands::Connection(cmd) => run_connection(client, cmd).await?,

        Commands::Mentorship(cmd) => run_mentorship(client, cmd).await?,
    }

    Ok(())
}

async fn run_profile(client: &MentorClient, cmd: ProfileCommand) -> Result<()> {
    let profiles = client.profile();
    let user = match cmd {
        ProfileCommand::Show { id: Some(id) } => profiles.get_user(&id).await?,
        ProfileCommand::Show { id: None } => profiles.get_profile().await?,
        ProfileCommand::Update {
            name,
            bio,
            skills,
            price,
        } => {
            let update = ProfileUpdate {
                name,
                bio,
                skills,
                mentorship_price: price,
            };
            let user = profiles.update_profile(&update).await?;
            println!("{} Profile updated", "✅".green());
            user
        }
    };

    println!("👤 {} <{}> [{:?}]", user.name, user.email, user.role);
    if let Some(bio) = &user.bio {
        println!("   {}", bio);
    }
    if !user.skills.is_empty() {
        println!("   Skills: {}", user.skills.join(", "));
    }
    if let Some(price) = user.mentorship_price {
        println!("   Mentorship: {}", format_price(price, DEFAULT_CURRENCY));
    }
    Ok(())
}

async fn run_connection(client: &MentorClient, cmd: ConnectionCommand) -> Result<()> {
    let connections = client.connections();
    let updated = match cmd {
        ConnectionCommand::List { status } => {
            let list = connections.list(status.map(Into::into)).await?;
            if list.is_empty() {
                println!("   No connections");
            }
            for connection in &list {
                print_connection(connection);
            }
            return Ok(());
        }
        ConnectionCommand::Request { user_id, message } => {
            connections.request_connection(user_id, message).await?
        }
        ConnectionCommand::Accept { id } => connections.accept(&id).await?,
        ConnectionCommand::Reject { id } => connections.reject(&id).await?,
        ConnectionCommand::Cancel { id } => connections.cancel(&id).await?,
        ConnectionCommand::Block { id } => connections.block(&id).await?,
    };

    print_connection(&updated);
    Ok(())
}

async fn run_mentorship(client: &MentorClient, cmd: MentorshipCommand) -> Result<()> {
    let connections = client.connections();

    match cmd {
        MentorshipCommand::Apply {
            mentor_id,
            message,
            goals,
            availability,
            price,
            currency,
            payment_method,
        } => {
            let payment_intent_id = match price {
                Some(amount) => {
                    let payment_method = payment_method.context(
                        "This mentorship is paid: pass --payment-method from the card form",
                    )?;
                    println!("💳 Authorizing {}", format_price(amount, &currency));

                    let intent = client
                        .payments()
                        .create_mentorship_intent(&mentor_id, amount, &currency)
                        .await?;
                    let processor = client.payment_processor().await?;
                    let confirmed = processor
                        .confirm_card_payment(&intent.client_secret, &payment_method)
                        .await?;
                    Some(confirmed.id)
                }
                None => None,
            };

            let application = MentorshipApplication {
                mentor_id,
                message,
                goals,
                availability,
                payment_intent_id,
            };
            let connection = connections.apply_for_mentorship(&application).await?;
            println!("{} Application sent", "✅".green());
            print_connection(&connection);
        }

        MentorshipCommand::Requests => {
            let pending = connections.pending_mentorship_requests().await?;
            if pending.is_empty() {
                println!("   No pending mentorship requests");
            }
            for connection in &pending {
                print_connection(connection);
            }
        }

        MentorshipCommand::Accept { id, payment_method } => {
            let connection = connections
                .list(Some(ConnectionStatus::Pending))
                .await?
                .into_iter()
                .find(|c| c.id == id)
                .with_context(|| format!("No pending request with id {}", id))?;

            match connections
                .accept_mentorship(&connection, payment_method.as_deref())
                .await?
            {
                AcceptOutcome::Accepted(accepted) => {
                    println!("{} Mentorship accepted", "✅".green());
                    print_connection(&accepted);
                }
                AcceptOutcome::PaymentRequired {
                    connection_id,
                    amount,
                    currency,
                } => {
                    println!(
                        "💳 {} requires payment of {}",
                        connection_id,
                        format_price(amount, &currency)
                    );
                    println!("   Re-run with --payment-method <id from the card form>");
                }
            }
        }

        MentorshipCommand::Reject { id, reason } => {
            let rejected = connections.reject_mentorship(&id, &reason).await?;
            print_connection(&rejected);
        }

        MentorshipCommand::Refund { id, reason } => {
            let details = connections.request_refund(&id, &reason).await?;
            println!(
                "{} Refund requested: {} ({:?})",
                "✅".green(),
                format_price(details.refunded_amount.unwrap_or(details.amount), &details.currency),
                details.refund_status
            );
        }

        MentorshipCommand::Payment { id } => {
            let details = connections.payment_details(&id).await?;
            println!(
                "💳 {} [{:?}]",
                format_price(details.amount, &details.currency),
                details.payment_status
            );
            if let Some(charged_at) = details.charged_at {
                println!("   Charged: {}", charged_at.format("%Y-%m-%d"));
            }
            if let Some(refunded_at) = details.refunded_at {
                println!("   Refunded: {}", refunded_at.format("%Y-%m-%d"));
            }
            println!("   {}", RefundAffordance::for_payment(&details, Utc::now()).message());
        }
    }

    Ok(())
}

fn print_post(post: &Post) {
    println!("📝 [{}] {}", post.id, post.author.name);
    println!("   {}", truncate(&post.content, 80));
    if !post.tags.is_empty() {
        println!("   #{}", post.tags.join(" #"));
    }
    println!(
        "   ♥ {}  💬 {}  ↻ {}  · {}",
        post.stats.like_count,
        post.stats.comment_count,
        post.stats.share_count,
        post.created_at.format("%Y-%m-%d %H:%M")
    );
}

fn print_connection(connection: &Connection) {
    let other = connection
        .other_user
        .as_ref()
        .map(|u| u.name.as_str())
        .unwrap_or("unknown");
    println!(
        "🤝 [{}] {} with {}",
        connection.id,
        connection.status.as_str(),
        other
    );
    if connection.is_paid {
        println!(
            "   Paid: {} ({:?})",
            format_price(
                connection.mentorship_price.unwrap_or(0),
                connection.currency.as_deref().unwrap_or(DEFAULT_CURRENCY)
            ),
            connection.payment_status
        );
    }
    if let Some(goals) = &connection.metadata.goals {
        println!("   Goals: {}", goals);
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        format!("{}...", s.chars().take(max_chars).collect::<String>())
    }
}
