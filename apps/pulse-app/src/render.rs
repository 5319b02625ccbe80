//! Plain-text rendering of screen states.

use pulse_core::domain::{Comment, Post, User};
use pulse_shared::{ErrorState, Notice, SaveState, ViewState};

fn author_name(author: Option<&User>) -> &str {
    author
        .and_then(|a| a.display_name.as_deref())
        .unwrap_or("anonymous")
}

pub fn error(state: &ErrorState, empty_message: &str) -> String {
    match state {
        ErrorState::Empty => empty_message.to_string(),
        ErrorState::Network => "No network connection. Pull to refresh once you are back online."
            .to_string(),
        ErrorState::Generic(message) => format!("Something went wrong: {message}"),
    }
}

fn post_line(post: &Post) -> String {
    let mut line = format!(
        "[{}] {} by {}",
        post.created_at.format("%Y-%m-%d"),
        post.title,
        author_name(post.author.as_ref())
    );
    if post.photo_url.is_some() {
        line.push_str(" (photo)");
    }
    line
}

pub fn feed(state: &ViewState<Vec<Post>>) -> Vec<String> {
    match state {
        ViewState::Loading => vec!["Loading posts...".to_string()],
        ViewState::Success(posts) => posts.iter().map(post_line).collect(),
        ViewState::Error(e) => vec![error(e, "No posts found")],
    }
}

pub fn post(state: &ViewState<Post>) -> Vec<String> {
    match state {
        ViewState::Loading => vec!["Loading post...".to_string()],
        ViewState::Success(post) => {
            let mut lines = vec![post_line(post)];
            if let Some(description) = &post.description {
                lines.push(description.clone());
            }
            if let Some(photo) = &post.photo_url {
                lines.push(format!("photo: {photo}"));
            }
            lines
        }
        ViewState::Error(e) => vec![error(e, "Post not found")],
    }
}

pub fn comments(state: &ViewState<Vec<Comment>>) -> Vec<String> {
    match state {
        ViewState::Loading => vec!["Loading comments...".to_string()],
        ViewState::Success(comments) => comments
            .iter()
            .map(|c| format!("{}: {}", author_name(c.author.as_ref()), c.content))
            .collect(),
        ViewState::Error(e) => vec![error(e, "No comments yet")],
    }
}

pub fn save<T>(state: &SaveState<T>, noun: &str) -> String {
    match state {
        SaveState::Idle => String::new(),
        SaveState::Saving => format!("Saving {noun}..."),
        SaveState::Saved(_) => format!("{noun} saved"),
        SaveState::Failed(e) => error(e, "Nothing to save"),
    }
}

pub fn notice(notice: &Notice) -> String {
    match notice {
        Notice::NoNetwork => "No network connection".to_string(),
        Notice::Invalid(reason) => reason.to_string(),
        Notice::Failure(message) => format!("Error: {message}"),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn sample() -> Post {
        Post {
            id: "4".to_string(),
            title: "The Door's Game".to_string(),
            description: None,
            photo_url: Some("https://picsum.photos/id/85/1080/".to_string()),
            created_at: Utc.timestamp_opt(1_451_638_679, 0).unwrap(),
            author: Some(User::new("3").with_display_name("Wally Claud")),
        }
    }

    #[test]
    fn test_feed_lines() {
        let lines = feed(&ViewState::Success(vec![sample()]));
        assert_eq!(lines, vec!["[2016-01-01] The Door's Game by Wally Claud (photo)"]);
    }

    #[test]
    fn test_error_lines() {
        assert_eq!(
            feed(&ViewState::Error(ErrorState::Empty)),
            vec!["No posts found"]
        );
        assert_eq!(
            comments(&ViewState::Error(ErrorState::Generic("permission denied".into()))),
            vec!["Something went wrong: permission denied"]
        );
    }

    #[test]
    fn test_save_lines() {
        assert_eq!(save::<Post>(&SaveState::Idle, "post"), "");
        assert_eq!(save::<Post>(&SaveState::Saving, "post"), "Saving post...");
    }
}
