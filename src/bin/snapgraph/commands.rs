use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;

use snapgraph::validators::{is_allowed_image, ALLOWED_IMAGE_EXTENSIONS};
use snapgraph::{
    Backend, IdentityId, NewIdentity, NotificationId, PostId, SessionContext, SessionToken, Social,
};

use crate::output::{comment_table, identity_table, notification_table, post_table};

#[derive(Args)]
pub struct RegisterArgs {
    pub username: String,
    pub email: String,
    pub password: String,
    /// Must match the password
    pub confirm: String,
}

#[derive(Args)]
pub struct LoginArgs {
    pub email: String,
    pub password: String,
}

#[derive(Args)]
pub struct PostArgs {
    /// Image reference, e.g. photo.jpg
    pub image: String,
    /// Optional caption
    #[arg(default_value = "")]
    pub description: String,
}

#[derive(Args)]
pub struct AvatarArgs {
    /// Image reference, e.g. portrait.png
    pub image: String,
}

#[derive(Args)]
pub struct FollowArgs {
    pub identity: IdentityId,
}

#[derive(Args)]
pub struct FeedArgs {
    pub post: PostId,
}

#[derive(Args)]
pub struct CommentArgs {
    pub post: PostId,
    pub text: String,
}

#[derive(Args)]
pub struct MarkReadArgs {
    pub notification: NotificationId,
}

async fn require_session<B: Backend>(
    social: &mut Social<B>,
    token: Option<String>,
) -> Result<(SessionContext, SessionToken)> {
    let Some(raw) = token else {
        bail!("no session token; pass --token or set SNAPGRAPH_TOKEN");
    };
    let token = SessionToken(raw);
    let ctx = social.require_session(&token).await?;
    Ok((ctx, token))
}

fn require_image(reference: &str) -> Result<()> {
    if !is_allowed_image(reference) {
        bail!(
            "unsupported image type; allowed extensions: {}",
            ALLOWED_IMAGE_EXTENSIONS.join(", ")
        );
    }
    Ok(())
}

pub async fn handle_register<B: Backend>(social: &mut Social<B>, args: RegisterArgs) -> Result<()> {
    if args.password != args.confirm {
        bail!("passwords do not match");
    }
    let (identity, token) = social
        .register(NewIdentity {
            username: args.username,
            email: args.email,
            password: args.password,
        })
        .await?;
    println!(
        "{} registered {} (id {})",
        "ok".green().bold(),
        identity.username,
        identity.id
    );
    println!("token: {token}");
    Ok(())
}

pub async fn handle_login<B: Backend>(social: &mut Social<B>, args: LoginArgs) -> Result<()> {
    let token = social.login(&args.email, &args.password).await?;
    println!("token: {token}");
    Ok(())
}

pub async fn handle_logout<B: Backend>(social: &mut Social<B>, token: Option<String>) -> Result<()> {
    let Some(raw) = token else {
        bail!("no session token; pass --token or set SNAPGRAPH_TOKEN");
    };
    social.logout(&SessionToken(raw)).await?;
    println!("{} logged out", "ok".green().bold());
    Ok(())
}

pub async fn handle_post<B: Backend>(
    social: &mut Social<B>,
    token: Option<String>,
    args: PostArgs,
) -> Result<()> {
    require_image(&args.image)?;
    let (ctx, _) = require_session(social, token).await?;
    let post = social.create_post(&ctx, &args.image, &args.description).await?;
    println!("{} posted {} (id {})", "ok".green().bold(), post.image_ref, post.id);
    Ok(())
}

pub async fn handle_avatar<B: Backend>(
    social: &mut Social<B>,
    token: Option<String>,
    args: AvatarArgs,
) -> Result<()> {
    require_image(&args.image)?;
    let (ctx, _) = require_session(social, token).await?;
    let identity = social.set_profile_image(&ctx, &args.image).await?;
    println!("{} avatar set for {}", "ok".green().bold(), identity.username);
    Ok(())
}

pub async fn handle_follow<B: Backend>(
    social: &mut Social<B>,
    token: Option<String>,
    args: FollowArgs,
) -> Result<()> {
    let (ctx, _) = require_session(social, token).await?;
    let edge = social.follow(&ctx, args.identity).await?;
    println!("{} following {}", "ok".green().bold(), edge.target_id);
    Ok(())
}

pub async fn handle_unfollow<B: Backend>(
    social: &mut Social<B>,
    token: Option<String>,
    args: FollowArgs,
) -> Result<()> {
    let (ctx, _) = require_session(social, token).await?;
    social.unfollow(&ctx, args.identity).await?;
    println!("{} unfollowed {}", "ok".green().bold(), args.identity);
    Ok(())
}

pub async fn handle_like<B: Backend>(
    social: &mut Social<B>,
    token: Option<String>,
    args: FeedArgs,
) -> Result<()> {
    let (ctx, _) = require_session(social, token).await?;
    let outcome = social.like(&ctx, args.post).await?;
    if outcome.is_liked() {
        println!("{} liked post {}", "ok".green().bold(), args.post);
    } else {
        println!("{} unliked post {}", "ok".green().bold(), args.post);
    }
    let count = social.like_count(args.post).await?;
    println!("likes: {count}");
    Ok(())
}

pub async fn handle_comment<B: Backend>(
    social: &mut Social<B>,
    token: Option<String>,
    args: CommentArgs,
) -> Result<()> {
    let (ctx, _) = require_session(social, token).await?;
    let comment = social.comment(&ctx, args.post, &args.text).await?;
    println!("{} comment {} added", "ok".green().bold(), comment.id);
    Ok(())
}

pub async fn handle_comments<B: Backend>(social: &mut Social<B>, args: FeedArgs) -> Result<()> {
    let comments = social.list_comments(args.post).await?;
    println!("{}", comment_table(&comments));
    Ok(())
}

pub async fn handle_feed<B: Backend>(social: &mut Social<B>, token: Option<String>) -> Result<()> {
    let (ctx, _) = require_session(social, token).await?;
    let posts = social.home_feed(&ctx).await?;
    println!("{}", post_table(&posts));
    Ok(())
}

pub async fn handle_explore<B: Backend>(social: &mut Social<B>) -> Result<()> {
    let posts = social.explore().await?;
    println!("{}", post_table(&posts));
    Ok(())
}

pub async fn handle_followers<B: Backend>(social: &mut Social<B>, args: FollowArgs) -> Result<()> {
    let identities = social.list_followers(args.identity).await?;
    println!("{}", identity_table(&identities));
    Ok(())
}

pub async fn handle_following<B: Backend>(social: &mut Social<B>, args: FollowArgs) -> Result<()> {
    let identities = social.list_following(args.identity).await?;
    println!("{}", identity_table(&identities));
    Ok(())
}

pub async fn handle_notifications<B: Backend>(
    social: &mut Social<B>,
    token: Option<String>,
) -> Result<()> {
    let (ctx, _) = require_session(social, token).await?;
    let notifications = social.list_notifications(&ctx).await?;
    println!("{}", notification_table(&notifications));
    Ok(())
}

pub async fn handle_mark_read<B: Backend>(
    social: &mut Social<B>,
    token: Option<String>,
    args: MarkReadArgs,
) -> Result<()> {
    let (ctx, _) = require_session(social, token).await?;
    let notification = social.mark_read(&ctx, args.notification).await?;
    println!("{} marked {} read", "ok".green().bold(), notification.id);
    Ok(())
}
