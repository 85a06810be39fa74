use comfy_table::{presets, Cell, Table};

use snapgraph::model::{Comment, Identity, Notification, Post};

fn base_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_header(headers.iter().map(|header| Cell::new(header)));
    table
}

pub fn post_table(posts: &[Post]) -> Table {
    let mut table = base_table(&["id", "owner", "image", "description", "created"]);
    for post in posts {
        table.add_row(vec![
            Cell::new(post.id),
            Cell::new(post.owner_id),
            Cell::new(&post.image_ref),
            Cell::new(&post.description),
            Cell::new(post.created_at.to_rfc3339()),
        ]);
    }
    table
}

pub fn identity_table(identities: &[Identity]) -> Table {
    let mut table = base_table(&["id", "username", "bio"]);
    for identity in identities {
        table.add_row(vec![
            Cell::new(identity.id),
            Cell::new(&identity.username),
            Cell::new(&identity.bio),
        ]);
    }
    table
}

pub fn comment_table(comments: &[Comment]) -> Table {
    let mut table = base_table(&["id", "identity", "text", "created"]);
    for comment in comments {
        table.add_row(vec![
            Cell::new(comment.id),
            Cell::new(comment.identity_id),
            Cell::new(&comment.text),
            Cell::new(comment.created_at.to_rfc3339()),
        ]);
    }
    table
}

pub fn notification_table(notifications: &[Notification]) -> Table {
    let mut table = base_table(&["id", "text", "read", "created"]);
    for notification in notifications {
        table.add_row(vec![
            Cell::new(notification.id),
            Cell::new(&notification.text),
            Cell::new(if notification.read { "yes" } else { "no" }),
            Cell::new(notification.created_at.to_rfc3339()),
        ]);
    }
    table
}
