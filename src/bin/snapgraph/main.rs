mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

use commands::{
    handle_avatar, handle_comment, handle_comments, handle_explore, handle_feed, handle_follow,
    handle_followers, handle_following, handle_like, handle_login, handle_logout, handle_mark_read,
    handle_notifications, handle_post, handle_register, handle_unfollow, AvatarArgs, CommentArgs,
    FeedArgs, FollowArgs, LoginArgs, PostArgs, RegisterArgs,
};
use snapgraph::{RedisBackend, Social};

#[derive(Parser)]
#[command(name = "snapgraph")]
#[command(version = "0.1.0")]
#[command(about = "Redis-backed social graph: identities, follows, posts and notifications")]
#[command(subcommand_required = true, arg_required_else_help = true)]
struct Cli {
    /// Redis connection URL
    #[arg(long, env = "REDIS_URL", default_value = "redis://127.0.0.1/")]
    redis_url: String,

    /// Key prefix for all stored data
    #[arg(long, default_value = "snapgraph")]
    prefix: String,

    /// Session token from a previous login
    #[arg(long, env = "SNAPGRAPH_TOKEN", global = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and print a session token
    Register(RegisterArgs),
    /// Authenticate and print a session token
    Login(LoginArgs),
    /// Invalidate the current session token
    Logout,
    /// Publish a post
    Post(PostArgs),
    /// Set your profile image
    Avatar(AvatarArgs),
    /// Follow another identity
    Follow(FollowArgs),
    /// Stop following another identity
    Unfollow(FollowArgs),
    /// Toggle a like on a post
    Like(FeedArgs),
    /// Comment on a post
    Comment(CommentArgs),
    /// List comments on a post, oldest first
    Comments(FeedArgs),
    /// Posts from identities you follow, newest first
    Feed,
    /// All posts, newest first
    Explore,
    /// Identities following the given identity
    Followers(FollowArgs),
    /// Identities the given identity follows
    Following(FollowArgs),
    /// Your notifications, newest first
    Notifications,
    /// Mark one of your notifications as read
    MarkRead(commands::MarkReadArgs),
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match execute(cli).await {
        Ok(()) => {}
        Err(err) => {
            eprintln!("{} {err}", "Error:".red().bold());
            std::process::exit(1);
        }
    }
}

async fn execute(cli: Cli) -> Result<()> {
    let backend = RedisBackend::connect(&cli.redis_url).await?;
    let mut social = Social::new(backend, cli.prefix);

    match cli.command {
        Commands::Register(args) => handle_register(&mut social, args).await,
        Commands::Login(args) => handle_login(&mut social, args).await,
        Commands::Logout => handle_logout(&mut social, cli.token).await,
        Commands::Post(args) => handle_post(&mut social, cli.token, args).await,
        Commands::Avatar(args) => handle_avatar(&mut social, cli.token, args).await,
        Commands::Follow(args) => handle_follow(&mut social, cli.token, args).await,
        Commands::Unfollow(args) => handle_unfollow(&mut social, cli.token, args).await,
        Commands::Like(args) => handle_like(&mut social, cli.token, args).await,
        Commands::Comment(args) => handle_comment(&mut social, cli.token, args).await,
        Commands::Comments(args) => handle_comments(&mut social, args).await,
        Commands::Feed => handle_feed(&mut social, cli.token).await,
        Commands::Explore => handle_explore(&mut social).await,
        Commands::Followers(args) => handle_followers(&mut social, args).await,
        Commands::Following(args) => handle_following(&mut social, args).await,
        Commands::Notifications => handle_notifications(&mut social, cli.token).await,
        Commands::MarkRead(args) => handle_mark_read(&mut social, cli.token, args).await,
    }
}
